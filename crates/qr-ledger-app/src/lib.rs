#![warn(missing_docs)]
//! # qr-ledger-app
//!
//! ## Purpose
//! Orchestrates permission, scanning, transaction lookup and screen state for
//! `qr-ledger`.
//!
//! ## Responsibilities
//! - Resolve layered configuration and build the lookup client.
//! - Run the scan session: one state owner, worker threads for lookups.
//! - Install structured logging and keep secrets out of log lines.
//!
//! ## Data flow
//! Permission provider -> scan source -> [`ScanSession`] -> lookup worker ->
//! completion event -> controller -> rendered [`qr_ledger_ui::Screen`].
//!
//! ## Ownership and lifetimes
//! The session owns the controller. Workers receive owned requests and a
//! cloned `Arc` of the lookup client and report back by channel.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. Lookup failures are not
//! errors at this level; they become the visible error popup.
//!
//! ## Security and privacy notes
//! Node endpoints may carry API keys in their path or query. Log them only
//! through [`redact_endpoint`].

pub mod config;
pub mod logging;
pub mod session;

use std::sync::Arc;

use qr_ledger_lookup::{HttpRpcTransport, LookupClient, LookupError};
use qr_ledger_scanner::ScanSourceError;
use thiserror::Error;
use url::Url;

pub use config::{AppConfig, ConfigOverrides, PermissionMode};
pub use logging::init_logging;
pub use session::{ScanSession, SessionEvent, SessionStep};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("QR_LEDGER_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Builds the HTTP-backed lookup client described by `config`.
///
/// # Errors
/// Returns [`AppError::Lookup`] when the transport cannot be built or the
/// endpoint violates URL policy.
pub fn build_lookup_client(config: &AppConfig) -> Result<LookupClient, AppError> {
    let transport = HttpRpcTransport::new(config.timeout())?;
    Ok(LookupClient::new(config.endpoint.clone(), Arc::new(transport))?)
}

/// Returns a log-safe form of a node endpoint.
///
/// Scheme, host and port are kept. Credentials, a non-root path and the query
/// are replaced by `<redacted>`. Unparsable input is fully redacted.
pub fn redact_endpoint(endpoint: &str) -> String {
    let Ok(parsed) = Url::parse(endpoint) else {
        return "<redacted>".to_string();
    };

    let mut origin = format!("{}://", parsed.scheme());
    if !parsed.username().is_empty() || parsed.password().is_some() {
        origin.push_str("<redacted>@");
    }
    origin.push_str(parsed.host_str().unwrap_or_default());
    if let Some(port) = parsed.port() {
        origin.push_str(&format!(":{port}"));
    }

    let has_secret_path = parsed.path() != "/" && !parsed.path().is_empty();
    if has_secret_path || parsed.query().is_some() {
        format!("{origin}/<redacted>")
    } else {
        format!("{origin}/")
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),
    /// Lookup client construction error.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),
    /// Scan source failure.
    #[error("scanner error: {0}")]
    Scanner(#[from] ScanSourceError),
    /// Worker thread or channel failure.
    #[error("worker error: {0}")]
    Worker(String),
    /// Logging setup failure.
    #[error("logging error: {0}")]
    Logging(String),
}
