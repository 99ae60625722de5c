// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Picker configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PhonebookError, Result};

/// What happens when a pick is requested while another is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlapPolicy {
    /// The newer request fails immediately; the outstanding one is kept.
    #[default]
    RejectBusy,
    /// The newer request takes the slot and the outstanding caller is
    /// dropped without a completion. Legacy behaviour.
    ReplacePending,
}

/// Settings supplied by the host at module initialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfig {
    /// Request code passed to the picker activity launch. Completion events
    /// carrying any other code are ignored.
    pub picker_request_code: i32,
    /// Request code passed to the permission dialog.
    pub permission_request_code: i32,
    /// Policy for overlapping pick requests.
    pub overlap_policy: OverlapPolicy,
    /// Also read postal addresses and report them under `addresses`.
    pub include_addresses: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            picker_request_code: 1002,
            permission_request_code: 1001,
            overlap_policy: OverlapPolicy::RejectBusy,
            include_addresses: false,
        }
    }
}

impl PickerConfig {
    /// Parse a host-supplied JSON blob. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PhonebookError::Config(e.to_string()))?;
        if config.picker_request_code == config.permission_request_code {
            return Err(PhonebookError::Config(format!(
                "picker and permission request codes must differ (both {})",
                config.picker_request_code
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PickerConfig::from_json(r#"{"includeAddresses":true}"#).expect("parse");
        assert!(config.include_addresses);
        assert_eq!(config.picker_request_code, 1002);
        assert_eq!(config.overlap_policy, OverlapPolicy::RejectBusy);
    }

    #[test]
    fn overlap_policy_parses_camel_case() {
        let config =
            PickerConfig::from_json(r#"{"overlapPolicy":"replacePending"}"#).expect("parse");
        assert_eq!(config.overlap_policy, OverlapPolicy::ReplacePending);
    }

    #[test]
    fn clashing_request_codes_rejected() {
        let err = PickerConfig::from_json(r#"{"pickerRequestCode":7,"permissionRequestCode":7}"#)
            .unwrap_err();
        assert!(matches!(err, PhonebookError::Config(_)));
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(
            PickerConfig::from_json("{not json"),
            Err(PhonebookError::Config(_))
        ));
    }
}
