// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub platform for desktop/CI builds where no contacts provider exists.
//
// There is never a foreground activity, so every pick fails with the
// "no activity" envelope; store queries return `PlatformUnavailable`.

use phonebook_core::error::{PhonebookError, Result};

use crate::traits::*;

/// No-op platform returned on non-mobile targets.
pub struct StubPlatform;

impl ContactsPlatform for StubPlatform {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativePermissions for StubPlatform {
    fn has_read_contacts(&self) -> bool {
        false
    }

    fn request_read_contacts(&self, _request_code: i32) -> Result<()> {
        tracing::warn!("NativePermissions::request_read_contacts called on stub platform");
        Err(PhonebookError::PlatformUnavailable)
    }
}

impl NativeContactPicker for StubPlatform {
    fn has_foreground_activity(&self) -> bool {
        false
    }

    fn launch_picker(&self, _request_code: i32) -> Result<()> {
        tracing::warn!("NativeContactPicker::launch_picker called on stub platform");
        Err(PhonebookError::PlatformUnavailable)
    }
}

impl NativeContactStore for StubPlatform {
    fn core_record(&self, _selection_uri: &str) -> Result<Option<CoreRow>> {
        Err(PhonebookError::PlatformUnavailable)
    }

    fn phone_rows(&self, _contact_id: &str) -> Result<Vec<LabelledRow>> {
        Err(PhonebookError::PlatformUnavailable)
    }

    fn email_rows(&self, _contact_id: &str) -> Result<Vec<LabelledRow>> {
        Err(PhonebookError::PlatformUnavailable)
    }

    fn organization_row(&self, _contact_id: &str) -> Result<Option<OrganizationRow>> {
        Err(PhonebookError::PlatformUnavailable)
    }

    fn postal_rows(&self, _contact_id: &str) -> Result<Vec<PostalRow>> {
        Err(PhonebookError::PlatformUnavailable)
    }
}

impl NativeTypeLabels for StubPlatform {}
