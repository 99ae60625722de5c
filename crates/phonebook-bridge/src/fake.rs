// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted in-memory platform used by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use phonebook_core::error::{PhonebookError, Result};

use crate::traits::*;

/// One contact as the fake store holds it.
#[derive(Debug, Clone)]
pub struct FakeContact {
    pub id: String,
    pub display_name: Option<String>,
    pub has_phone_number: bool,
    pub phones: Vec<LabelledRow>,
    pub emails: Vec<LabelledRow>,
    pub organization: Option<OrganizationRow>,
    pub postal: Vec<PostalRow>,
}

/// Contact "42" used across the tests.
pub fn jane_doe() -> FakeContact {
    FakeContact {
        id: "42".into(),
        display_name: Some("Jane Doe".into()),
        has_phone_number: true,
        phones: vec![LabelledRow {
            value: Some("555-1234".into()),
            kind: 2,
            custom_label: None,
        }],
        emails: vec![LabelledRow {
            value: Some("jane@x.com".into()),
            kind: 2,
            custom_label: None,
        }],
        organization: Some(OrganizationRow {
            company: Some("Acme".into()),
            title: Some("Engineer".into()),
        }),
        postal: Vec::new(),
    }
}

pub struct FakePlatform {
    granted: AtomicBool,
    activity: AtomicBool,
    grant_on_request: AtomicBool,
    launch_error: Mutex<Option<String>>,
    contacts: HashMap<String, FakeContact>,
    failing: HashSet<&'static str>,
    queries: Mutex<Vec<&'static str>>,
    launches: Mutex<Vec<i32>>,
    permission_requests: Mutex<Vec<i32>>,
}

impl FakePlatform {
    /// Foreground activity present, permission granted, empty store.
    pub fn granted() -> Self {
        Self {
            granted: AtomicBool::new(true),
            activity: AtomicBool::new(true),
            grant_on_request: AtomicBool::new(false),
            launch_error: Mutex::new(None),
            contacts: HashMap::new(),
            failing: HashSet::new(),
            queries: Mutex::new(Vec::new()),
            launches: Mutex::new(Vec::new()),
            permission_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn denied() -> Self {
        let platform = Self::granted();
        platform.granted.store(false, Ordering::SeqCst);
        platform
    }

    pub fn without_activity(self) -> Self {
        self.activity.store(false, Ordering::SeqCst);
        self
    }

    /// The permission dialog grants synchronously when requested.
    pub fn granting_on_request(self) -> Self {
        self.grant_on_request.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_launch_error(self, message: &str) -> Self {
        *self.launch_error.lock().expect("lock") = Some(message.to_string());
        self
    }

    pub fn with_contact(mut self, contact: FakeContact) -> Self {
        self.contacts.insert(uri_for(&contact.id), contact);
        self
    }

    /// Make the named query (`core`, `phone`, `email`, `organization`,
    /// `postal`) fail.
    pub fn failing(mut self, query: &'static str) -> Self {
        self.failing.insert(query);
        self
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn queried(&self, query: &str) -> bool {
        self.queries.lock().expect("lock").iter().any(|q| *q == query)
    }

    pub fn launches(&self) -> Vec<i32> {
        self.launches.lock().expect("lock").clone()
    }

    pub fn permission_requests(&self) -> Vec<i32> {
        self.permission_requests.lock().expect("lock").clone()
    }

    fn query(&self, name: &'static str) -> Result<()> {
        self.queries.lock().expect("lock").push(name);
        if self.failing.contains(name) {
            return Err(PhonebookError::Store(format!("{name} cursor unavailable")));
        }
        Ok(())
    }

    fn contact(&self, id: &str) -> Option<&FakeContact> {
        self.contacts.get(&uri_for(id))
    }
}

pub fn uri_for(id: &str) -> String {
    format!("content://contacts/{id}")
}

impl ContactsPlatform for FakePlatform {
    fn platform_name(&self) -> &str {
        "Fake"
    }
}

impl NativePermissions for FakePlatform {
    fn has_read_contacts(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn request_read_contacts(&self, request_code: i32) -> Result<()> {
        self.permission_requests.lock().expect("lock").push(request_code);
        if self.grant_on_request.load(Ordering::SeqCst) {
            self.granted.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl NativeContactPicker for FakePlatform {
    fn has_foreground_activity(&self) -> bool {
        self.activity.load(Ordering::SeqCst)
    }

    fn launch_picker(&self, request_code: i32) -> Result<()> {
        if let Some(message) = self.launch_error.lock().expect("lock").clone() {
            return Err(PhonebookError::Bridge(message));
        }
        self.launches.lock().expect("lock").push(request_code);
        Ok(())
    }
}

impl NativeContactStore for FakePlatform {
    fn core_record(&self, selection_uri: &str) -> Result<Option<CoreRow>> {
        self.query("core")?;
        Ok(self.contacts.get(selection_uri).map(|c| CoreRow {
            id: c.id.clone(),
            display_name: c.display_name.clone(),
            has_phone_number: c.has_phone_number,
        }))
    }

    fn phone_rows(&self, contact_id: &str) -> Result<Vec<LabelledRow>> {
        self.query("phone")?;
        Ok(self.contact(contact_id).map(|c| c.phones.clone()).unwrap_or_default())
    }

    fn email_rows(&self, contact_id: &str) -> Result<Vec<LabelledRow>> {
        self.query("email")?;
        Ok(self.contact(contact_id).map(|c| c.emails.clone()).unwrap_or_default())
    }

    fn organization_row(&self, contact_id: &str) -> Result<Option<OrganizationRow>> {
        self.query("organization")?;
        Ok(self.contact(contact_id).and_then(|c| c.organization.clone()))
    }

    fn postal_rows(&self, contact_id: &str) -> Result<Vec<PostalRow>> {
        self.query("postal")?;
        Ok(self.contact(contact_id).map(|c| c.postal.clone()).unwrap_or_default())
    }
}

impl NativeTypeLabels for FakePlatform {}
