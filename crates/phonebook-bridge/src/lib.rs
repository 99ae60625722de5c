// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Phonebook — native contact picker bridge.
//!
//! [`ContactPicker`] drives the pick flow (permission, picker UI, field
//! resolution) over a [`traits::ContactsPlatform`]. On Android the platform
//! is implemented through JNI and exposed to the Java module via the
//! functions in `android::exports`; desktop and CI builds get a stub whose
//! picks always fail with the "no activity" envelope.

pub mod picker;
pub mod registry;
pub mod resolve;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

#[cfg(test)]
mod fake;

pub use picker::{
    Completion, ContactPick, ContactPicker, PermissionOutcome, PickHandle, PickStatus,
    PickerOutcome,
};
pub use registry::PickerRegistry;

/// The platform implementation for the target operating system.
#[cfg(target_os = "android")]
pub type NativePlatform = android::AndroidPlatform;

/// The platform implementation for the target operating system.
#[cfg(not(target_os = "android"))]
pub type NativePlatform = stub::StubPlatform;

/// Build a picker over the stub platform. On Android the picker is created
/// by `nativeInit`, which needs the host module object.
#[cfg(not(target_os = "android"))]
pub fn contact_picker(config: phonebook_core::PickerConfig) -> ContactPicker<NativePlatform> {
    ContactPicker::new(stub::StubPlatform, config)
}

/// Install the global `tracing` subscriber with an `EnvFilter` (default
/// `info`). Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
