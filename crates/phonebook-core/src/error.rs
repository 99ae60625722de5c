// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the phonebook bridge.
//
// These never reach the application layer directly. The picker converts
// every failure into an `Envelope` carrying a fixed message.

use thiserror::Error;

/// Top-level error type for internal phonebook operations.
#[derive(Debug, Error)]
pub enum PhonebookError {
    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Contact store --
    #[error("contact store query failed: {0}")]
    Store(String),

    // -- Configuration / payloads --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PhonebookError>;
