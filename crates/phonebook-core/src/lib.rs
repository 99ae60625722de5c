// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Phonebook — Core types and error definitions shared by the bridge.

pub mod config;
pub mod error;
pub mod labels;
pub mod messages;
pub mod types;

pub use config::{OverlapPolicy, PickerConfig};
pub use error::PhonebookError;
pub use types::*;
