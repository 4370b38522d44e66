#![warn(missing_docs)]
//! # qr-ledger binary
//!
//! Terminal front-end: each stdin line is a decoded QR payload, an empty line
//! taps the popup, `:quit` exits. Pipe a QR decoder into stdin to scan from a
//! camera.

use std::io::{BufReader, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use qr_ledger_app::{
    AppConfig, ConfigOverrides, PermissionMode, ScanSession, app_version, build_lookup_client,
    redact_endpoint,
};
use qr_ledger_scanner::LineScanSource;
use qr_ledger_ui::{Screen, Transition};
use tracing::info;

/// Camera permission source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CameraPermission {
    /// Ask the platform (`QR_LEDGER_CAMERA_PERMISSION`).
    Platform,
    /// Always granted.
    Granted,
    /// Always denied.
    Denied,
}

impl From<CameraPermission> for PermissionMode {
    fn from(value: CameraPermission) -> Self {
        match value {
            CameraPermission::Platform => PermissionMode::Platform,
            CameraPermission::Granted => PermissionMode::Granted,
            CameraPermission::Denied => PermissionMode::Denied,
        }
    }
}

/// Scan QR codes and show the text stored in the referenced transaction.
#[derive(Debug, Parser)]
#[command(name = "qr-ledger", version = app_version(), long_about = None)]
struct Cli {
    /// JSON-RPC node endpoint (overrides QR_LEDGER_RPC_ENDPOINT).
    #[arg(long, alias = "rpc")]
    endpoint: Option<String>,

    /// Lookup timeout in milliseconds (overrides QR_LEDGER_RPC_TIMEOUT_MS).
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Also ignore scans whose lookup is still running.
    #[arg(long)]
    suppress_in_flight: bool,

    /// Where the camera permission answer comes from.
    #[arg(long, value_enum)]
    camera_permission: Option<CameraPermission>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// CLI entry point.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    qr_ledger_app::init_logging(&cli.log_level)?;

    let overrides = ConfigOverrides {
        endpoint: cli.endpoint,
        timeout_ms: cli.timeout_ms,
        suppress_in_flight: cli.suppress_in_flight,
        permission: cli.camera_permission.map(PermissionMode::from),
    };
    let config = AppConfig::from_env_with(&overrides).context("failed to load configuration")?;

    info!(
        version = app_version(),
        endpoint = %redact_endpoint(&config.endpoint),
        timeout_ms = config.timeout_ms,
        "starting qr-ledger"
    );

    let client = build_lookup_client(&config).context("failed to build lookup client")?;
    let mut session = ScanSession::new(Arc::new(client), config.controller_options());

    session.mount(config.permission_provider().as_ref());

    let source = Box::new(LineScanSource::new(BufReader::new(std::io::stdin())));
    let mut stdout = std::io::stdout();
    session.run(source, &mut |screen: &Screen, transition: Option<Transition>| {
        print_screen(&mut stdout, screen, transition);
    })?;

    Ok(())
}

fn print_screen(out: &mut impl Write, screen: &Screen, transition: Option<Transition>) {
    if transition == Some(Transition::Spring) {
        let _ = writeln!(out, "~~~~~~~~~~~~~~~~~~~~~~~~");
    }
    let _ = writeln!(out, "{}\n", screen.to_text());
    let _ = out.flush();
}
