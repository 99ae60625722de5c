// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide picker slot for hosts that can be torn down and rebuilt.
//
// A host such as a React Native module may be constructed again after a
// reload. Each construction installs a fresh picker bound to the new host
// object; the previous picker's outstanding request is interrupted so its
// caller is not left waiting on a result that will never be routed back.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::picker::ContactPicker;
use crate::traits::ContactsPlatform;

/// Holds the picker for the current host instance.
pub struct PickerRegistry<P> {
    current: RwLock<Option<Arc<ContactPicker<P>>>>,
}

impl<P> PickerRegistry<P> {
    pub const fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// The installed picker, if the host has initialised.
    pub fn current(&self) -> Option<Arc<ContactPicker<P>>> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Arc<ContactPicker<P>>>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Arc<ContactPicker<P>>>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<P: ContactsPlatform> PickerRegistry<P> {
    /// Replace the installed picker. Returns the previous one after its
    /// outstanding request, if any, has been interrupted.
    pub fn install(&self, picker: ContactPicker<P>) -> Option<Arc<ContactPicker<P>>> {
        let previous = self.write().replace(Arc::new(picker));
        if let Some(old) = &previous {
            if let Some(id) = old.interrupt_pending() {
                info!(request_id = %id, "previous host's pick interrupted on re-initialisation");
            }
        }
        previous
    }

    /// Interrupt the current picker's outstanding request, if any.
    pub fn interrupt(&self) -> bool {
        self.current()
            .is_some_and(|picker| picker.interrupt_pending().is_some())
    }
}

impl<P> Default for PickerRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
