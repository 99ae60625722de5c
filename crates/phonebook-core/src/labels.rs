// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable labels for contact data type codes.
//
// The numeric codes follow the Android `ContactsContract.CommonDataKinds`
// constants. A non-empty custom label always wins over the built-in name.

/// Which field group a type code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Phone,
    Email,
    Postal,
}

/// `TYPE_CUSTOM` is shared by every field group.
pub const TYPE_CUSTOM: i32 = 0;

/// Resolve the label for a phone, email or postal row.
pub fn type_label(group: FieldGroup, kind: i32, custom_label: Option<&str>) -> String {
    if let Some(label) = custom_label.map(str::trim).filter(|l| !l.is_empty()) {
        return label.to_string();
    }
    let builtin = match group {
        FieldGroup::Phone => phone_label(kind),
        FieldGroup::Email => email_label(kind),
        FieldGroup::Postal => postal_label(kind),
    };
    builtin.to_string()
}

fn phone_label(kind: i32) -> &'static str {
    match kind {
        TYPE_CUSTOM => "Custom",
        1 => "Home",
        2 => "Mobile",
        3 => "Work",
        4 => "Work Fax",
        5 => "Home Fax",
        6 => "Pager",
        8 => "Callback",
        9 => "Car",
        10 => "Company Main",
        11 => "ISDN",
        12 => "Main",
        13 => "Other Fax",
        14 => "Radio",
        15 => "Telex",
        16 => "TTY TDD",
        17 => "Work Mobile",
        18 => "Work Pager",
        19 => "Assistant",
        20 => "MMS",
        _ => "Other",
    }
}

fn email_label(kind: i32) -> &'static str {
    match kind {
        TYPE_CUSTOM => "Custom",
        1 => "Home",
        2 => "Work",
        4 => "Mobile",
        _ => "Other",
    }
}

fn postal_label(kind: i32) -> &'static str {
    match kind {
        TYPE_CUSTOM => "Custom",
        1 => "Home",
        2 => "Work",
        _ => "Other",
    }
}
