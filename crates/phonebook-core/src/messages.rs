// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Failure messages delivered to the application layer.
//
// The application layer matches on these strings, so they are part of the
// public contract and must not be reworded.

pub const NO_ACTIVITY: &str = "No current activity available";
pub const PERMISSION_NOT_GRANTED: &str = "Contacts permission not granted";
pub const USER_CANCELLED: &str = "User cancelled contact selection";
pub const NO_CONTACT_SELECTED: &str = "No contact selected";
pub const DETAILS_UNAVAILABLE: &str = "Failed to retrieve contact details";
pub const SELECTION_FAILED: &str = "Failed to select contact";
pub const PICKER_BUSY: &str = "Contact picker already in progress";

/// Message for a picker UI that could not be launched.
pub fn launch_failed(detail: &str) -> String {
    format!("Failed to open contact picker: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_failure_embeds_platform_message() {
        assert_eq!(
            launch_failed("ActivityNotFoundException"),
            "Failed to open contact picker: ActivityNotFoundException"
        );
    }
}
