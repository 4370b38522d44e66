//! Layered runtime configuration: defaults, then environment, then flags.

use std::time::Duration;

use qr_ledger_lookup::{DEFAULT_RPC_ENDPOINT, DEFAULT_TIMEOUT_MS, validate_rpc_endpoint};
use qr_ledger_scanner::{EnvPermissionProvider, FixedPermissionProvider, PermissionProvider};
use qr_ledger_ui::ControllerOptions;

use crate::AppError;

/// Overrides the node endpoint.
pub const RPC_ENDPOINT_ENV: &str = "QR_LEDGER_RPC_ENDPOINT";
/// Overrides the request timeout in milliseconds.
pub const RPC_TIMEOUT_ENV: &str = "QR_LEDGER_RPC_TIMEOUT_MS";
/// Enables in-flight scan suppression.
pub const SUPPRESS_IN_FLIGHT_ENV: &str = "QR_LEDGER_SUPPRESS_IN_FLIGHT";

/// Where the camera permission answer comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionMode {
    /// Ask the platform collaborator ([`EnvPermissionProvider`], which reads
    /// `QR_LEDGER_CAMERA_PERMISSION`).
    #[default]
    Platform,
    /// Always granted.
    Granted,
    /// Always denied.
    Denied,
}

/// Command-line layer applied on top of defaults and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replaces the endpoint.
    pub endpoint: Option<String>,
    /// Replaces the timeout.
    pub timeout_ms: Option<u64>,
    /// Forces in-flight suppression on.
    pub suppress_in_flight: bool,
    /// Replaces the permission source.
    pub permission: Option<PermissionMode>,
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON-RPC node endpoint.
    pub endpoint: String,
    /// Whole-request timeout for one lookup.
    pub timeout_ms: u64,
    /// Debounce scans whose lookup is still running.
    pub suppress_in_flight: bool,
    /// Camera permission source.
    pub permission: PermissionMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RPC_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            suppress_in_flight: false,
            permission: PermissionMode::Platform,
        }
    }
}

impl AppConfig {
    /// Builds configuration from process environment.
    ///
    /// # Errors
    /// See [`AppConfig::resolve`].
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_env_with(&ConfigOverrides::default())
    }

    /// Builds configuration from process environment and flag overrides.
    ///
    /// # Errors
    /// See [`AppConfig::resolve`].
    pub fn from_env_with(overrides: &ConfigOverrides) -> Result<Self, AppError> {
        Self::resolve(|name| std::env::var(name).ok(), overrides)
    }

    /// Builds configuration from an arbitrary variable source.
    ///
    /// # Errors
    /// See [`AppConfig::resolve`].
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Self::resolve(var, &ConfigOverrides::default())
    }

    /// Layers defaults, then variables, then overrides, and validates once.
    ///
    /// Blank variables are treated as unset. A variable shadowed by an
    /// override is never parsed.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when the effective timeout is not a
    /// positive integer or the effective endpoint fails URL policy.
    pub fn resolve(
        var: impl Fn(&str) -> Option<String>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, AppError> {
        let var = |name: &str| var(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        match &overrides.endpoint {
            Some(endpoint) => config.endpoint = endpoint.trim().to_string(),
            None => {
                if let Some(endpoint) = var(RPC_ENDPOINT_ENV) {
                    config.endpoint = endpoint.trim().to_string();
                }
            }
        }

        match overrides.timeout_ms {
            Some(timeout_ms) => config.timeout_ms = timeout_ms,
            None => {
                if let Some(raw) = var(RPC_TIMEOUT_ENV) {
                    config.timeout_ms = raw.trim().parse().map_err(|error| {
                        AppError::Config(format!(
                            "{RPC_TIMEOUT_ENV}={raw:?} is not a number: {error}"
                        ))
                    })?;
                }
            }
        }

        if let Some(raw) = var(SUPPRESS_IN_FLIGHT_ENV) {
            config.suppress_in_flight = parse_flag(&raw);
        }
        config.suppress_in_flight |= overrides.suppress_in_flight;

        if let Some(permission) = overrides.permission {
            config.permission = permission;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks endpoint policy and timeout bounds.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] on the first violated constraint.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_rpc_endpoint(&self.endpoint)
            .map_err(|error| AppError::Config(error.to_string()))?;
        if self.timeout_ms == 0 {
            return Err(AppError::Config(
                "lookup timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the lookup timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the permission collaborator selected by [`AppConfig::permission`].
    pub fn permission_provider(&self) -> Box<dyn PermissionProvider> {
        match self.permission {
            PermissionMode::Platform => Box::new(EnvPermissionProvider),
            PermissionMode::Granted => Box::new(FixedPermissionProvider::granted()),
            PermissionMode::Denied => Box::new(FixedPermissionProvider::denied()),
        }
    }

    /// Returns controller switches derived from this configuration.
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            suppress_in_flight: self.suppress_in_flight,
        }
    }
}

/// Parses a boolean switch.
///
/// Semantics:
/// - `1`, `true`, `on`, `yes` (case-insensitive) => enabled.
/// - Any other value => disabled.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_variables_keep_defaults() {
        let config = AppConfig::from_vars(|_| Some("  ".to_string())).expect("config should load");
        assert_eq!(config, AppConfig::default());
    }
}
