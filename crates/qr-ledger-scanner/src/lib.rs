#![warn(missing_docs)]
//! # qr-ledger-scanner
//!
//! ## Purpose
//! Provides the camera-side collaborators of the scan workflow: permission
//! acquisition and decoded QR payload delivery.
//!
//! ## Responsibilities
//! - Define backend-agnostic [`PermissionProvider`] and [`ScanSource`] traits.
//! - Expose a line-based source that reads decoded payloads from any reader
//!   (stdin, or a pipe from an external QR decoder).
//! - Expose deterministic synthetic backends for CI and unit tests.
//!
//! ## Data flow
//! Front-end asks [`PermissionProvider`] once at mount -> [`ScanSource`]
//! yields [`ScanInput`] values -> session feeds them to the scan controller.
//!
//! ## Ownership and lifetimes
//! Sources own their readers and queued inputs. Emitted events own their
//! payload strings.
//!
//! ## Error model
//! Reader and backend failures are reported as [`ScanSourceError`] values.
//! End of input is `Ok(None)`, not an error.

use std::collections::VecDeque;
use std::io::BufRead;

use qr_ledger_core::ScanEvent;
use thiserror::Error;
use tracing::trace;

/// Environment variable read by [`EnvPermissionProvider`].
pub const CAMERA_PERMISSION_ENV: &str = "QR_LEDGER_CAMERA_PERMISSION";

/// Line that ends a console session.
pub const QUIT_COMMAND: &str = ":quit";

/// One input delivered to the session by the scanning front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanInput {
    /// A QR code was decoded.
    Scan(ScanEvent),
    /// The user tapped the popup action.
    Tap,
    /// The front-end is shutting down.
    Quit,
}

/// Platform permission collaborator.
pub trait PermissionProvider: Send + Sync {
    /// Requests camera access and returns `true` only on an explicit grant.
    ///
    /// # Errors
    /// Returns [`ScanSourceError::Permission`] when the platform cannot answer.
    fn request_camera(&self) -> Result<bool, ScanSourceError>;
}

/// Camera/decoder collaborator.
pub trait ScanSource: Send {
    /// Blocks until the next input is available.
    ///
    /// # Returns
    /// `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    /// Returns [`ScanSourceError`] on reader or backend failure.
    fn next_input(&mut self) -> Result<Option<ScanInput>, ScanSourceError>;
}

/// Permission provider with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPermissionProvider {
    granted: bool,
}

impl FixedPermissionProvider {
    /// Provider that always grants access.
    pub fn granted() -> Self {
        Self { granted: true }
    }

    /// Provider that always denies access.
    pub fn denied() -> Self {
        Self { granted: false }
    }
}

impl PermissionProvider for FixedPermissionProvider {
    fn request_camera(&self) -> Result<bool, ScanSourceError> {
        Ok(self.granted)
    }
}

/// Permission provider driven by [`CAMERA_PERMISSION_ENV`].
///
/// Semantics:
/// - Unset => granted.
/// - `0`, `false`, `off`, `denied` (case-insensitive) => denied.
/// - Any other value => granted.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvPermissionProvider;

impl PermissionProvider for EnvPermissionProvider {
    fn request_camera(&self) -> Result<bool, ScanSourceError> {
        match std::env::var(CAMERA_PERMISSION_ENV) {
            Ok(value) => {
                let normalized = value.trim().to_ascii_lowercase();
                Ok(!matches!(
                    normalized.as_str(),
                    "0" | "false" | "off" | "denied"
                ))
            }
            Err(std::env::VarError::NotPresent) => Ok(true),
            Err(error) => Err(ScanSourceError::Permission(error.to_string())),
        }
    }
}

/// Reads one input per line from a buffered reader.
///
/// A blank line is a tap, [`QUIT_COMMAND`] quits, anything else is a scanned
/// payload with surrounding whitespace removed.
#[derive(Debug)]
pub struct LineScanSource<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LineScanSource<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead + Send> ScanSource for LineScanSource<R> {
    fn next_input(&mut self) -> Result<Option<ScanInput>, ScanSourceError> {
        self.line.clear();
        let read = self.reader.read_line(&mut self.line)?;
        if read == 0 {
            return Ok(None);
        }

        let input = parse_line(&self.line);
        trace!(?input, "console input");
        Ok(Some(input))
    }
}

/// Maps one console line into a [`ScanInput`].
pub fn parse_line(line: &str) -> ScanInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        ScanInput::Tap
    } else if trimmed == QUIT_COMMAND {
        ScanInput::Quit
    } else {
        ScanInput::Scan(ScanEvent::new(trimmed))
    }
}

/// Deterministic source replaying a fixed input queue.
#[derive(Debug, Default)]
pub struct SyntheticScanSource {
    inputs: VecDeque<ScanInput>,
}

impl SyntheticScanSource {
    /// Creates a source replaying `inputs` in order.
    pub fn new(inputs: impl IntoIterator<Item = ScanInput>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
        }
    }

    /// Creates a source replaying scans of the given payloads.
    pub fn from_payloads<I, S>(payloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            payloads
                .into_iter()
                .map(|payload| ScanInput::Scan(ScanEvent::new(payload))),
        )
    }

    /// Returns number of inputs not yet delivered.
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

impl ScanSource for SyntheticScanSource {
    fn next_input(&mut self) -> Result<Option<ScanInput>, ScanSourceError> {
        Ok(self.inputs.pop_front())
    }
}

/// Scanner layer error type.
#[derive(Debug, Error)]
pub enum ScanSourceError {
    /// Reading the input stream failed.
    #[error("scan input read failure: {0}")]
    Io(#[from] std::io::Error),
    /// Permission backend could not answer.
    #[error("camera permission backend failure: {0}")]
    Permission(String),
}
