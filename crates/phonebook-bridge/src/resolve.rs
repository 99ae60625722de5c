// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field resolution: turn a picker selection into a normalised ContactRecord.
//
// Only the core-record lookup can abort resolution. A failing field-group
// query is logged and contributes nothing, while data gathered by the other
// queries is kept.

use phonebook_core::error::Result;
use phonebook_core::labels::FieldGroup;
use phonebook_core::types::{ContactRecord, EmailAddress, PhoneNumber, PostalAddress};
use tracing::{debug, instrument, warn};

use crate::traits::{NativeContactStore, NativeTypeLabels};

/// Resolve every field of the contact behind `selection_uri`.
///
/// Returns `None` when the core record is missing or unreadable.
#[instrument(skip(platform), fields(contact_id = tracing::field::Empty))]
pub fn resolve_contact<P>(
    platform: &P,
    selection_uri: &str,
    include_addresses: bool,
) -> Option<ContactRecord>
where
    P: NativeContactStore + NativeTypeLabels + ?Sized,
{
    let core = match platform.core_record(selection_uri) {
        Ok(Some(core)) => core,
        Ok(None) => {
            warn!(uri = selection_uri, "no contact row behind selection");
            return None;
        }
        Err(e) => {
            warn!(uri = selection_uri, error = %e, "core contact lookup failed");
            return None;
        }
    };
    tracing::Span::current().record("contact_id", core.id.as_str());

    let mut contact = ContactRecord::new(core.id, core.display_name.unwrap_or_default());
    let id = contact.id.clone();

    if core.has_phone_number {
        contact.phone_numbers = field_group("phone", platform.phone_rows(&id))
            .into_iter()
            .map(|row| PhoneNumber {
                label: platform.type_label(FieldGroup::Phone, row.kind, row.custom_label.as_deref()),
                number: row.value.unwrap_or_default(),
            })
            .collect();
    }

    // Emails are queried regardless of any "has email" hint.
    contact.emails = field_group("email", platform.email_rows(&id))
        .into_iter()
        .map(|row| EmailAddress {
            label: platform.type_label(FieldGroup::Email, row.kind, row.custom_label.as_deref()),
            email: row.value.unwrap_or_default(),
        })
        .collect();

    if let Some(org) = field_group("organization", platform.organization_row(&id)) {
        if let Some(company) = org.company.filter(|c| !c.is_empty()) {
            contact.organization = company;
        }
        if let Some(title) = org.title.filter(|t| !t.is_empty()) {
            contact.job_title = title;
        }
    }

    if include_addresses {
        let addresses = field_group("postal", platform.postal_rows(&id))
            .into_iter()
            .map(|row| PostalAddress {
                label: platform.type_label(
                    FieldGroup::Postal,
                    row.kind,
                    row.custom_label.as_deref(),
                ),
                street: row.street.unwrap_or_default(),
                city: row.city.unwrap_or_default(),
                state: row.region.unwrap_or_default(),
                postal_code: row.postcode.unwrap_or_default(),
                country: row.country.unwrap_or_default(),
            })
            .collect();
        contact.addresses = Some(addresses);
    }

    debug!(
        phones = contact.phone_numbers.len(),
        emails = contact.emails.len(),
        "contact resolved"
    );
    Some(contact)
}

/// Downgrade a failed field-group query to "no data".
fn field_group<T: Default>(group: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(group, error = %e, "field-group query failed; treating as empty");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeContact, FakePlatform, jane_doe};
    use crate::traits::{LabelledRow, OrganizationRow, PostalRow};

    #[test]
    fn resolves_full_contact() {
        let platform = FakePlatform::granted().with_contact(jane_doe());
        let contact = resolve_contact(&platform, "content://contacts/42", false).expect("resolved");

        assert_eq!(contact.id, "42");
        assert_eq!(contact.name, "Jane Doe");
        assert_eq!(contact.organization, "Acme");
        assert_eq!(contact.job_title, "Engineer");
        assert_eq!(
            contact.phone_numbers,
            vec![PhoneNumber {
                label: "Mobile".into(),
                number: "555-1234".into(),
            }]
        );
        assert_eq!(
            contact.emails,
            vec![EmailAddress {
                label: "Work".into(),
                email: "jane@x.com".into(),
            }]
        );
        assert!(contact.addresses.is_none());
    }

    #[test]
    fn missing_core_row_yields_nothing() {
        let platform = FakePlatform::granted();
        assert!(resolve_contact(&platform, "content://contacts/404", false).is_none());
    }

    #[test]
    fn core_failure_is_fatal() {
        let platform = FakePlatform::granted().with_contact(jane_doe()).failing("core");
        assert!(resolve_contact(&platform, "content://contacts/42", false).is_none());
    }

    #[test]
    fn phone_flag_gates_phone_query() {
        let mut contact = jane_doe();
        contact.has_phone_number = false;
        let platform = FakePlatform::granted().with_contact(contact);

        let resolved = resolve_contact(&platform, "content://contacts/42", false).expect("resolved");
        assert!(resolved.phone_numbers.is_empty());
        assert!(!platform.queried("phone"));
        assert!(platform.queried("email"));
    }

    #[test]
    fn failed_sub_query_keeps_other_fields() {
        let platform = FakePlatform::granted().with_contact(jane_doe()).failing("email");

        let resolved = resolve_contact(&platform, "content://contacts/42", false).expect("resolved");
        assert!(resolved.emails.is_empty());
        assert_eq!(resolved.phone_numbers.len(), 1);
        assert_eq!(resolved.organization, "Acme");
    }

    #[test]
    fn empty_organization_values_do_not_overwrite() {
        let mut contact = jane_doe();
        contact.organization = Some(OrganizationRow {
            company: Some(String::new()),
            title: Some("Engineer".into()),
        });
        let platform = FakePlatform::granted().with_contact(contact);

        let resolved = resolve_contact(&platform, "content://contacts/42", false).expect("resolved");
        assert_eq!(resolved.organization, "");
        assert_eq!(resolved.job_title, "Engineer");
    }

    #[test]
    fn null_values_become_empty_strings() {
        let platform = FakePlatform::granted().with_contact(FakeContact {
            id: "9".into(),
            display_name: None,
            has_phone_number: true,
            phones: vec![LabelledRow {
                value: None,
                kind: 0,
                custom_label: Some("Boat".into()),
            }],
            emails: Vec::new(),
            organization: None,
            postal: Vec::new(),
        });

        let resolved = resolve_contact(&platform, "content://contacts/9", false).expect("resolved");
        assert_eq!(resolved.name, "");
        assert_eq!(
            resolved.phone_numbers,
            vec![PhoneNumber {
                label: "Boat".into(),
                number: String::new(),
            }]
        );
        assert!(resolved.emails.is_empty());
    }

    #[test]
    fn addresses_only_when_enabled() {
        let mut contact = jane_doe();
        contact.postal = vec![PostalRow {
            kind: 2,
            street: Some("1 Main St".into()),
            city: Some("Springfield".into()),
            ..PostalRow::default()
        }];
        let platform = FakePlatform::granted().with_contact(contact);

        let without = resolve_contact(&platform, "content://contacts/42", false).expect("resolved");
        assert!(without.addresses.is_none());
        assert!(!platform.queried("postal"));

        let with = resolve_contact(&platform, "content://contacts/42", true).expect("resolved");
        let addresses = with.addresses.expect("addresses");
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].label, "Work");
        assert_eq!(addresses[0].city, "Springfield");
        assert_eq!(addresses[0].country, "");
    }
}
