// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contact picker adapter.
//
// A pick runs in two phases. Phase one checks the environment and the
// permission, then launches the platform picker and returns. Phase two runs
// when the host forwards the picker's activity result to
// `handle_activity_result`, on whatever thread the host dispatches it.
//
// Each request owns exactly one `Completion`. Every terminal transition,
// success or failure, goes through `Completion::deliver`, which consumes it,
// so an envelope is delivered at most once.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};
use std::task::{Context, Poll};

use phonebook_core::messages;
use phonebook_core::types::{ContactRecord, Envelope, PickerOptions, RequestId};
use phonebook_core::{OverlapPolicy, PickerConfig};
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};

use crate::resolve::resolve_contact;
use crate::traits::ContactsPlatform;

/// Android `Activity.RESULT_OK`.
pub const RESULT_OK: i32 = -1;
/// Android `Activity.RESULT_CANCELED`.
pub const RESULT_CANCELED: i32 = 0;

// ---------------------------------------------------------------------------
// Completion channels
// ---------------------------------------------------------------------------

/// Where a request's envelope goes.
pub enum Completion {
    /// Single-resolution future, observed through a [`PickHandle`].
    Future(oneshot::Sender<Envelope>),
    /// Caller-supplied callback.
    Callback(Box<dyn FnOnce(Envelope) + Send>),
}

impl Completion {
    fn deliver(self, envelope: Envelope) {
        match self {
            Self::Future(tx) => {
                if tx.send(envelope).is_err() {
                    debug!("pick handle dropped before completion");
                }
            }
            Self::Callback(callback) => callback(envelope),
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Future(_) => f.write_str("Completion::Future"),
            Self::Callback(_) => f.write_str("Completion::Callback"),
        }
    }
}

/// Non-blocking view of a [`PickHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickStatus {
    Ready(Envelope),
    Waiting,
    /// The request was dropped without a completion.
    Abandoned,
}

/// Future side of [`ContactPicker::open_picker`].
///
/// Resolves to `None` only if the request was abandoned, which can happen
/// under [`OverlapPolicy::ReplacePending`].
#[derive(Debug)]
pub struct PickHandle {
    id: RequestId,
    rx: oneshot::Receiver<Envelope>,
}

impl PickHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Check for an envelope without waiting.
    pub fn status(&mut self) -> PickStatus {
        match self.rx.try_recv() {
            Ok(envelope) => PickStatus::Ready(envelope),
            Err(oneshot::error::TryRecvError::Empty) => PickStatus::Waiting,
            Err(oneshot::error::TryRecvError::Closed) => PickStatus::Abandoned,
        }
    }
}

impl Future for PickHandle {
    type Output = Option<Envelope>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|r| r.ok())
    }
}

/// Future returned by [`ContactPicker::pick_contact`].
#[derive(Debug)]
pub struct ContactPick(PickHandle);

impl Future for ContactPick {
    type Output = Option<ContactRecord>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0)
            .poll(cx)
            .map(|envelope| envelope.and_then(Envelope::into_first_contact))
    }
}

// ---------------------------------------------------------------------------
// Picker outcome and permission outcome
// ---------------------------------------------------------------------------

/// What the picker UI reported when it returned control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Cancelled,
    /// Success, with the selection URI if the UI supplied one.
    Selected(Option<String>),
    /// Any other result code.
    Other(i32),
}

impl PickerOutcome {
    /// Classify a raw activity result code.
    pub fn from_result_code(result_code: i32, data_uri: Option<String>) -> Self {
        match result_code {
            RESULT_OK => Self::Selected(data_uri),
            RESULT_CANCELED => Self::Cancelled,
            other => Self::Other(other),
        }
    }
}

/// Result of [`ContactPicker::request_permission`].
///
/// `Requested` carries the grant state read right after the dialog was
/// issued. The user has usually not answered yet, so it is a best-effort
/// snapshot; the settled value arrives through
/// [`ContactPicker::handle_permission_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    NoActivity,
    AlreadyGranted,
    Requested { snapshot: bool },
    RequestFailed,
}

impl PermissionOutcome {
    pub fn granted(self) -> bool {
        match self {
            Self::AlreadyGranted => true,
            Self::Requested { snapshot } => snapshot,
            Self::NoActivity | Self::RequestFailed => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

struct Pending {
    id: RequestId,
    completion: Completion,
}

/// The contact picker adapter. Holds at most one outstanding request.
pub struct ContactPicker<P> {
    platform: P,
    config: PickerConfig,
    pending: Mutex<Option<Pending>>,
}

impl<P: ContactsPlatform> ContactPicker<P> {
    pub fn new(platform: P, config: PickerConfig) -> Self {
        info!(
            platform = platform.platform_name(),
            request_code = config.picker_request_code,
            policy = ?config.overlap_policy,
            "contact picker ready"
        );
        Self {
            platform,
            config,
            pending: Mutex::new(None),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Picker capability exists on every supported build.
    pub fn is_available(&self) -> bool {
        true
    }

    pub fn has_permission(&self) -> bool {
        self.platform.has_read_contacts()
    }

    /// Whether a pick is waiting for the picker UI to return.
    pub fn is_pending(&self) -> bool {
        self.slot().is_some()
    }

    /// Ask for read-contacts permission if it is not already granted.
    #[instrument(skip(self))]
    pub fn request_permission(&self) -> PermissionOutcome {
        if !self.platform.has_foreground_activity() {
            debug!("no foreground activity; cannot show permission dialog");
            return PermissionOutcome::NoActivity;
        }
        if self.platform.has_read_contacts() {
            return PermissionOutcome::AlreadyGranted;
        }
        if let Err(e) = self
            .platform
            .request_read_contacts(self.config.permission_request_code)
        {
            warn!(error = %e, "permission request failed");
            return PermissionOutcome::RequestFailed;
        }
        let snapshot = self.platform.has_read_contacts();
        debug!(snapshot, "permission dialog issued");
        PermissionOutcome::Requested { snapshot }
    }

    /// Host permission-result event. Returns the freshly read grant state
    /// when the request code is ours.
    pub fn handle_permission_result(&self, request_code: i32, granted: bool) -> Option<bool> {
        if request_code != self.config.permission_request_code {
            debug!(
                expected = self.config.permission_request_code,
                received = request_code,
                "ignoring permission result for another request"
            );
            return None;
        }
        let current = self.platform.has_read_contacts();
        info!(reported = granted, current, "contacts permission settled");
        Some(current)
    }

    /// Start a pick whose envelope is observed through the returned handle.
    pub fn open_picker(&self, options: &PickerOptions) -> PickHandle {
        let id = RequestId::new();
        let (tx, rx) = oneshot::channel();
        self.start(id, options, Completion::Future(tx));
        PickHandle { id, rx }
    }

    /// Start a pick whose envelope is passed to `callback`.
    pub fn open_picker_with_callback<F>(&self, options: &PickerOptions, callback: F) -> RequestId
    where
        F: FnOnce(Envelope) + Send + 'static,
    {
        let id = RequestId::new();
        self.start(id, options, Completion::Callback(Box::new(callback)));
        id
    }

    /// Start a pick and resolve to the selected contact, or `None` on any
    /// failure.
    pub fn pick_contact(&self, options: &PickerOptions) -> ContactPick {
        ContactPick(self.open_picker(options))
    }

    #[instrument(skip(self, options, completion), fields(request_id = %id))]
    fn start(&self, id: RequestId, options: &PickerOptions, completion: Completion) {
        if options.allow_multiple_selection {
            debug!("multiple selection requested; picking a single contact");
        }

        {
            let mut slot = self.slot();
            if let Some(outstanding) = slot.as_ref().map(|p| p.id) {
                match self.config.overlap_policy {
                    OverlapPolicy::RejectBusy => {
                        warn!(%outstanding, "pick already in progress");
                        drop(slot);
                        completion.deliver(Envelope::failure(messages::PICKER_BUSY));
                        return;
                    }
                    OverlapPolicy::ReplacePending => {
                        warn!(dropped = %outstanding, "replacing outstanding pick; its caller gets no completion");
                        slot.take();
                    }
                }
            }
        }

        if !self.platform.has_foreground_activity() {
            completion.deliver(Envelope::failure(messages::NO_ACTIVITY));
            return;
        }
        if !self.platform.has_read_contacts() {
            completion.deliver(Envelope::failure(messages::PERMISSION_NOT_GRANTED));
            return;
        }

        *self.slot() = Some(Pending { id, completion });

        let request_code = self.config.picker_request_code;
        match self.platform.launch_picker(request_code) {
            Ok(()) => info!(request_code, "contact picker launched"),
            Err(e) => {
                warn!(error = %e, "contact picker launch failed");
                let detail = launch_detail(&e);
                if let Some(pending) = self.take_pending_if(id) {
                    pending
                        .completion
                        .deliver(Envelope::failure(messages::launch_failed(&detail)));
                }
            }
        }
    }

    /// Activity-result event from the host. Returns `false` when the event
    /// belongs to another request code and was ignored.
    #[instrument(skip(self, outcome), fields(outcome = ?outcome))]
    pub fn handle_activity_result(&self, request_code: i32, outcome: PickerOutcome) -> bool {
        if request_code != self.config.picker_request_code {
            debug!(
                expected = self.config.picker_request_code,
                received = request_code,
                "ignoring activity result for another request"
            );
            return false;
        }

        let Some(pending) = self.slot().take() else {
            warn!("picker returned with no outstanding request");
            return true;
        };

        let envelope = match outcome {
            PickerOutcome::Cancelled => Envelope::failure(messages::USER_CANCELLED),
            PickerOutcome::Selected(None) => Envelope::failure(messages::NO_CONTACT_SELECTED),
            PickerOutcome::Selected(Some(uri)) => {
                match resolve_contact(&self.platform, &uri, self.config.include_addresses) {
                    Some(contact) => Envelope::success(vec![contact]),
                    None => Envelope::failure(messages::DETAILS_UNAVAILABLE),
                }
            }
            PickerOutcome::Other(code) => {
                debug!(result_code = code, "unexpected picker result code");
                Envelope::failure(messages::SELECTION_FAILED)
            }
        };

        info!(request_id = %pending.id, success = envelope.success, "delivering pick result");
        pending.completion.deliver(envelope);
        true
    }

    /// Fail the outstanding request, if any, with the selection-failed
    /// envelope. Used when the picker result can no longer arrive, such as
    /// after the host activity was destroyed or the host was re-initialised.
    #[instrument(skip(self))]
    pub fn interrupt_pending(&self) -> Option<RequestId> {
        let pending = self.slot().take()?;
        warn!(request_id = %pending.id, "interrupting outstanding pick");
        pending
            .completion
            .deliver(Envelope::failure(messages::SELECTION_FAILED));
        Some(pending.id)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Pending>> {
        // Callbacks run outside this lock, so a poisoned slot is still
        // consistent.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn take_pending_if(&self, id: RequestId) -> Option<Pending> {
        let mut slot = self.slot();
        match slot.as_ref() {
            Some(pending) if pending.id == id => slot.take(),
            _ => None,
        }
    }
}

/// Platform message for a failed launch, without our own error prefix.
fn launch_detail(e: &phonebook_core::PhonebookError) -> String {
    match e {
        phonebook_core::PhonebookError::Bridge(detail) => detail.clone(),
        other => other.to_string(),
    }
}
