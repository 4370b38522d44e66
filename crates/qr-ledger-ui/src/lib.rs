#![warn(missing_docs)]
//! # qr-ledger-ui
//!
//! ## Purpose
//! Defines the scan screen state model and the controller that reduces
//! permission, scan, lookup and tap events into it.
//!
//! ## Responsibilities
//! - Represent permission status, the displayed result and lookup failures.
//! - Debounce repeated reads of the code whose result is on screen.
//! - Hand out lookup requests and apply their outcomes.
//! - Project state into a front-end agnostic [`Screen`] and plain text.
//!
//! ## Data flow
//! Session events call [`ScanController`] methods, which mutate [`ScanState`];
//! [`ScanController::render`] drives the view shown by the front-end.
//!
//! ## Ownership and lifetimes
//! The controller owns all state. Lookup requests are owned values so the
//! session can move them into worker threads and hand them back on completion.
//!
//! ## Error model
//! Lookup failures are data, not errors: they land in
//! [`ScanState::last_error`] and are rendered as an error popup.

use std::fmt;

use qr_ledger_core::PermissionStatus;
use tracing::{debug, info};

/// Base view text while the permission request is pending.
pub const REQUESTING_PERMISSION_TEXT: &str = "Requesting for camera permission";
/// Base view text after permission was refused.
pub const PERMISSION_DENIED_TEXT: &str = "Camera permission is not granted";
/// Help banner drawn above the scanner.
pub const SCANNER_HELP_TEXT: &str = "Locating Qr Code";
/// Popup action label that dismisses the popup.
pub const DISMISS_ACTION_TEXT: &str = "Tap to scan another item";
/// Title of the error popup.
pub const LOOKUP_FAILED_TEXT: &str = "Transaction lookup failed";

/// Aggregate scan screen state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Camera permission as answered by the platform.
    pub permission: PermissionStatus,
    /// Decoded text currently shown in the result popup.
    pub last_result: Option<String>,
    /// Most recent lookup failure, shown in the error popup.
    pub last_error: Option<LookupFailure>,
}

/// A lookup that did not produce text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    /// Identifier that was looked up.
    pub identifier: String,
    /// Human-readable failure description.
    pub message: String,
}

/// Sequence number of one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupTicket(pub u64);

impl fmt::Display for LookupTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lookup the session must perform on behalf of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Ticket used to correlate the outcome.
    pub ticket: LookupTicket,
    /// Scanned payload, passed verbatim to the lookup client.
    pub identifier: String,
}

/// Result of feeding one scanned payload to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDecision {
    /// Start exactly one lookup.
    Lookup(LookupRequest),
    /// Payload equals the result on screen.
    Debounced,
    /// Payload is already being looked up and in-flight suppression is on.
    AlreadyInFlight,
    /// Scanner is not mounted because permission is not granted.
    ScannerInactive,
}

/// View transition requested after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Spring animation into the popup.
    Spring,
}

/// Controller behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Also debounce payloads whose lookup is still running.
    pub suppress_in_flight: bool,
}

/// Base view, mutually exclusive by permission status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseView {
    /// Waiting for the platform permission answer.
    RequestingPermission,
    /// Permission refused; no scanner is mounted.
    PermissionDenied,
    /// Live scanner.
    Scanner,
}

/// Popup overlaying the base view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    /// Decoded transaction text.
    Result {
        /// Text exactly as decoded.
        text: String,
    },
    /// Lookup failure.
    Error {
        /// Identifier that failed.
        identifier: String,
        /// Failure description.
        message: String,
    },
}

/// Front-end agnostic view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// Base view.
    pub base: BaseView,
    /// Help banner, always drawn.
    pub banner: &'static str,
    /// Optional overlay.
    pub popup: Option<Popup>,
}

impl Screen {
    /// Returns `true` when the live scanner is mounted.
    pub fn scanner_mounted(&self) -> bool {
        self.base == BaseView::Scanner
    }

    /// Renders the screen as plain text lines.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        match self.base {
            BaseView::RequestingPermission => lines.push(REQUESTING_PERMISSION_TEXT.to_string()),
            BaseView::PermissionDenied => lines.push(PERMISSION_DENIED_TEXT.to_string()),
            BaseView::Scanner => lines.push("[scanner]".to_string()),
        }
        lines.push(format!("[{}]", self.banner));

        match &self.popup {
            Some(Popup::Result { text }) => {
                lines.push(text.clone());
                lines.push(format!("> {DISMISS_ACTION_TEXT}"));
            }
            Some(Popup::Error {
                identifier,
                message,
            }) => {
                lines.push(format!("{LOOKUP_FAILED_TEXT}: {identifier}"));
                lines.push(message.clone());
                lines.push(format!("> {DISMISS_ACTION_TEXT}"));
            }
            None => {}
        }

        lines.join("\n")
    }
}

/// Reducer owning [`ScanState`].
#[derive(Debug, Clone, Default)]
pub struct ScanController {
    state: ScanState,
    options: ControllerOptions,
    next_ticket: u64,
    in_flight: Vec<LookupRequest>,
}

impl ScanController {
    /// Creates a controller with permission unknown and no result.
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Returns current state snapshot.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Returns lookups started but not yet resolved.
    pub fn in_flight(&self) -> &[LookupRequest] {
        &self.in_flight
    }

    /// Applies the platform permission answer.
    ///
    /// Only an explicit grant mounts the scanner.
    pub fn on_permission_resolved(&mut self, granted: bool) {
        self.state.permission = PermissionStatus::from_granted(granted);
        info!(permission = ?self.state.permission, "camera permission resolved");
    }

    /// Handles one decoded QR payload.
    pub fn on_scan(&mut self, payload: &str) -> ScanDecision {
        if self.state.permission != PermissionStatus::Granted {
            return ScanDecision::ScannerInactive;
        }

        if self.state.last_result.as_deref() == Some(payload) {
            debug!("scan matches displayed result, debounced");
            return ScanDecision::Debounced;
        }

        if self.options.suppress_in_flight
            && self
                .in_flight
                .iter()
                .any(|request| request.identifier == payload)
        {
            debug!("scan matches in-flight lookup, debounced");
            return ScanDecision::AlreadyInFlight;
        }

        self.next_ticket += 1;
        let request = LookupRequest {
            ticket: LookupTicket(self.next_ticket),
            identifier: payload.to_string(),
        };
        self.in_flight.push(request.clone());
        info!(ticket = %request.ticket, identifier = %request.identifier, "lookup started");
        ScanDecision::Lookup(request)
    }

    /// Applies a lookup outcome.
    ///
    /// Outcomes are applied in arrival order, also after a dismiss. Success
    /// replaces the displayed result and clears any error. Failure replaces
    /// the result popup with the error popup, so `last_result` is dropped.
    pub fn on_lookup_resolved<E: fmt::Display>(
        &mut self,
        request: &LookupRequest,
        outcome: Result<String, E>,
    ) -> Transition {
        self.in_flight.retain(|pending| pending.ticket != request.ticket);

        match outcome {
            Ok(text) => {
                info!(ticket = %request.ticket, "lookup resolved");
                self.state.last_result = Some(text);
                self.state.last_error = None;
            }
            Err(error) => {
                info!(ticket = %request.ticket, %error, "lookup failed");
                self.state.last_result = None;
                self.state.last_error = Some(LookupFailure {
                    identifier: request.identifier.clone(),
                    message: error.to_string(),
                });
            }
        }

        Transition::Spring
    }

    /// Dismisses any popup and resumes scanning.
    pub fn on_dismiss(&mut self) {
        self.state.last_result = None;
        self.state.last_error = None;
        debug!("popup dismissed");
    }

    /// Projects state into the view model.
    pub fn render(&self) -> Screen {
        let base = match self.state.permission {
            PermissionStatus::Unknown => BaseView::RequestingPermission,
            PermissionStatus::Denied => BaseView::PermissionDenied,
            PermissionStatus::Granted => BaseView::Scanner,
        };

        let popup = if let Some(failure) = &self.state.last_error {
            Some(Popup::Error {
                identifier: failure.identifier.clone(),
                message: failure.message.clone(),
            })
        } else {
            self.state
                .last_result
                .as_ref()
                .map(|text| Popup::Result { text: text.clone() })
        };

        Screen {
            base,
            banner: SCANNER_HELP_TEXT,
            popup,
        }
    }
}
