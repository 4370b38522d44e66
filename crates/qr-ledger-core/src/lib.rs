#![warn(missing_docs)]
//! # qr-ledger-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `qr-ledger` workspace.
//!
//! ## Responsibilities
//! - Represent camera permission status and decoded scan events.
//! - Normalize scanned payloads into opaque transaction identifiers.
//! - Model the externally owned transaction record returned by the node.
//! - Decode a transaction `input` payload into display text.
//!
//! ## Data flow
//! Scanner backends emit [`ScanEvent`] values. The session turns the payload
//! into a [`TransactionId`], the lookup layer fetches a [`TransactionRecord`],
//! and [`decode_input_text`] produces the string shown in the result popup.
//!
//! ## Ownership and lifetimes
//! All values own their strings so they can cross worker-thread boundaries
//! without borrowing from transient network buffers.
//!
//! ## Error model
//! Blank identifiers and non-hex input payloads return [`CoreError`].
//! Any well-formed byte sequence decodes successfully, even when the result is
//! not readable text.
//!
//! ## Example
//! ```rust
//! use qr_ledger_core::decode_input_text;
//!
//! assert_eq!(decode_input_text("0x68656c6c6f").unwrap(), "hello");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera permission as reported by the platform collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PermissionStatus {
    /// Permission has not been resolved yet.
    #[default]
    Unknown,
    /// Permission was explicitly granted.
    Granted,
    /// Permission was denied or could not be obtained.
    Denied,
}

impl PermissionStatus {
    /// Maps a platform answer into a resolved status.
    ///
    /// Only an explicit grant yields [`PermissionStatus::Granted`].
    pub fn from_granted(granted: bool) -> Self {
        if granted {
            Self::Granted
        } else {
            Self::Denied
        }
    }

    /// Returns `true` once the platform has answered.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// One decoded QR read delivered by the camera/decoder collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Raw decoded payload text.
    pub data: String,
}

impl ScanEvent {
    /// Creates a scan event from decoded payload text.
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Opaque transaction reference taken from a scanned payload.
///
/// The identifier is only trimmed; its format is validated by the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    /// Creates an identifier from scanned text.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyIdentifier`] when the payload is blank.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyIdentifier);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction object as returned by `eth_getTransactionByHash`.
///
/// Only `input` is required; the remaining fields are kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Transaction hash.
    #[serde(default)]
    pub hash: Option<String>,
    /// Sender address.
    #[serde(default)]
    pub from: Option<String>,
    /// Recipient address, absent for contract creation.
    #[serde(default)]
    pub to: Option<String>,
    /// Block number (hex quantity), absent while pending.
    #[serde(default)]
    pub block_number: Option<String>,
    /// Hex encoded input payload.
    pub input: String,
}

impl TransactionRecord {
    /// Decodes this record's input payload into display text.
    ///
    /// # Errors
    /// See [`decode_input_text`].
    pub fn input_text(&self) -> Result<String, CoreError> {
        decode_input_text(&self.input)
    }
}

/// Decodes a hex input payload into text, one character per byte.
///
/// Each byte maps to the code point of the same value (Latin-1), so
/// non-text payloads still decode into possibly unreadable characters.
/// An optional `0x`/`0X` prefix is accepted and `"0x"` decodes to `""`.
///
/// # Errors
/// Returns [`CoreError::InvalidInputPayload`] when the payload is not an
/// even-length hex string.
pub fn decode_input_text(input: &str) -> Result<String, CoreError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    let bytes = hex::decode(digits).map_err(CoreError::InvalidInputPayload)?;
    Ok(bytes.into_iter().map(char::from).collect())
}

/// Error type for core model validation and payload decoding.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Scanned payload was empty or whitespace.
    #[error("scanned identifier is empty")]
    EmptyIdentifier,
    /// Input payload is not valid hex.
    #[error("invalid input payload: {0}")]
    InvalidInputPayload(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    //! Unit tests for identifier normalization and input decoding.

    use super::*;

    #[test]
    fn identifier_is_trimmed_and_must_not_be_blank() {
        let id = TransactionId::new("  0xabc123\n").expect("identifier should be valid");
        assert_eq!(id.as_str(), "0xabc123");
        assert!(matches!(
            TransactionId::new("   "),
            Err(CoreError::EmptyIdentifier)
        ));
    }

    #[test]
    fn decodes_bytes_above_ascii_as_latin1() {
        assert_eq!(decode_input_text("0xe9ff").expect("valid hex"), "\u{e9}\u{ff}");
    }

    #[test]
    fn permission_defaults_to_unknown() {
        assert_eq!(PermissionStatus::default(), PermissionStatus::Unknown);
        assert!(!PermissionStatus::Unknown.is_resolved());
        assert_eq!(PermissionStatus::from_granted(false), PermissionStatus::Denied);
    }
}
