//! Process-wide `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::AppError;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (for example
/// `info` or `qr_ledger_app=debug`) is used. Output goes to stderr so the
/// rendered screen on stdout stays clean.
///
/// # Errors
/// Returns [`AppError::Logging`] for an invalid directive or when a global
/// subscriber is already installed.
pub fn init_logging(default_directive: &str) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|error| AppError::Logging(format!("invalid log directive: {error}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}
