// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the native contacts capabilities.
//
// The picker only talks to the host through these traits. The platform owns
// permission state, the picker UI and the contact database; nothing here is
// cached on the Rust side.

use phonebook_core::error::Result;
use phonebook_core::labels::{self, FieldGroup};

/// Unified bridge that groups every capability the picker needs.
pub trait ContactsPlatform:
    NativePermissions + NativeContactPicker + NativeContactStore + NativeTypeLabels
{
    /// Human-readable platform name (e.g. "Android").
    fn platform_name(&self) -> &str;
}

/// Read-contacts permission checks.
pub trait NativePermissions {
    /// Current grant state. No side effects.
    fn has_read_contacts(&self) -> bool;

    /// Show the platform permission dialog. Returns once the request has
    /// been issued, not once the user has answered.
    fn request_read_contacts(&self, request_code: i32) -> Result<()>;
}

/// The platform "pick one contact" UI.
pub trait NativeContactPicker {
    /// Whether a foreground activity is available to host UI.
    fn has_foreground_activity(&self) -> bool;

    /// Launch the picker. The result arrives later through the host's
    /// activity-result callback carrying `request_code`.
    fn launch_picker(&self, request_code: i32) -> Result<()>;
}

/// Read-only queries against the platform contact store.
///
/// Every query is synchronous. Implementations must release the underlying
/// cursor on every exit path.
pub trait NativeContactStore {
    /// Look up the core record behind a picker selection URI. `Ok(None)`
    /// when the URI matches no row.
    fn core_record(&self, selection_uri: &str) -> Result<Option<CoreRow>>;

    /// All phone rows for a contact, in store order.
    fn phone_rows(&self, contact_id: &str) -> Result<Vec<LabelledRow>>;

    /// All email rows for a contact, in store order.
    fn email_rows(&self, contact_id: &str) -> Result<Vec<LabelledRow>>;

    /// The first organization row for a contact, if any.
    fn organization_row(&self, contact_id: &str) -> Result<Option<OrganizationRow>>;

    /// All structured postal rows for a contact, in store order.
    fn postal_rows(&self, contact_id: &str) -> Result<Vec<PostalRow>>;
}

/// Type-code to label lookup. The default uses the built-in English
/// labels; platforms can override to return localised strings.
pub trait NativeTypeLabels {
    fn type_label(&self, group: FieldGroup, kind: i32, custom_label: Option<&str>) -> String {
        labels::type_label(group, kind, custom_label)
    }
}

// ---------------------------------------------------------------------------
// Raw rows as read from the store
// ---------------------------------------------------------------------------

/// Minimal contact row fetched first to confirm the contact exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreRow {
    pub id: String,
    pub display_name: Option<String>,
    pub has_phone_number: bool,
}

/// A phone or email row: the value plus its type code and custom label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledRow {
    pub value: Option<String>,
    pub kind: i32,
    pub custom_label: Option<String>,
}

/// Organization row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationRow {
    pub company: Option<String>,
    pub title: Option<String>,
}

/// Structured postal row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalRow {
    pub kind: i32,
    pub custom_label: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}
