// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the phonebook bridge.
//
// Field names serialise in camelCase because the application layer reads
// the envelope as a plain JS object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for a single pick request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labelled phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub label: String,
    pub number: String,
}

/// A labelled email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub label: String,
    pub email: String,
}

/// A labelled postal address. Only reported when addresses are enabled in
/// [`crate::PickerConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub label: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Normalised contact returned to the application layer.
///
/// `first_name`, `last_name` and `note` are reserved and always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub job_title: String,
    pub note: String,
    pub phone_numbers: Vec<PhoneNumber>,
    pub emails: Vec<EmailAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<PostalAddress>>,
}

impl ContactRecord {
    /// A record with the given identity and every other field at its
    /// default: empty strings and empty sequences.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            first_name: String::new(),
            last_name: String::new(),
            organization: String::new(),
            job_title: String::new(),
            note: String::new(),
            phone_numbers: Vec::new(),
            emails: Vec::new(),
            addresses: None,
        }
    }
}

/// Result structure delivered exactly once per pick request.
///
/// `contacts` is present only on success and `error` only on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<ContactRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn success(contacts: Vec<ContactRecord>) -> Self {
        Self {
            success: true,
            contacts: Some(contacts),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            contacts: None,
            error: Some(message.into()),
        }
    }

    /// First contact of a successful envelope.
    pub fn into_first_contact(self) -> Option<ContactRecord> {
        if !self.success {
            return None;
        }
        self.contacts.and_then(|c| c.into_iter().next())
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Caller-supplied picker options.
///
/// None of these change behaviour today. Unknown keys are kept so that
/// future filtering criteria can be read without a breaking change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub allow_multiple_selection: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PickerOptions {
    /// Parse options sent by the application layer. An empty string is
    /// treated as `{}`.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}
