#![warn(missing_docs)]
//! # qr-ledger-lookup
//!
//! ## Purpose
//! Resolves a scanned transaction identifier into the decoded text carried by
//! the transaction's `input` payload.
//!
//! ## Responsibilities
//! - Validate the node endpoint (absolute `http`/`https` URL).
//! - Execute `eth_getTransactionByHash` through an injectable transport.
//! - Decode the returned input payload into display text.
//! - Provide a blocking HTTP transport for real nodes.
//!
//! ## Data flow
//! Session hands an identifier to [`RecordLookup::get_record_by_id`] ->
//! [`LookupClient`] builds a JSON-RPC body -> [`RpcTransport`] posts it ->
//! response envelope is parsed -> input bytes are decoded to text.
//!
//! ## Ownership and lifetimes
//! The client owns its endpoint string and shares its transport through an
//! `Arc`, so clones are cheap and can move into lookup worker threads.
//!
//! ## Error model
//! Every failure (endpoint policy, transport, HTTP status, node error, unknown
//! transaction, malformed payload) is returned as [`LookupError`]. Nothing is
//! retried here; callers decide how to surface failures.
//!
//! ## Security and privacy notes
//! Hosted node endpoints often embed an API key in the path. This crate never
//! logs the endpoint; callers must redact it before logging.
//!
//! ## Example
//! ```rust
//! use qr_ledger_lookup::validate_rpc_endpoint;
//!
//! assert!(validate_rpc_endpoint("https://mainnet.infura.io/").is_ok());
//! assert!(validate_rpc_endpoint("ftp://mainnet.infura.io/").is_err());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use qr_ledger_core::{CoreError, TransactionId, TransactionRecord};
use qr_ledger_rpc::{
    RpcContractError, encode_request, get_transaction_request, parse_transaction_response,
};
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Public node queried when no endpoint is configured.
pub const DEFAULT_RPC_ENDPOINT: &str = "https://mainnet.infura.io/";

/// Default whole-request timeout for the HTTP transport.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Abstract transport used by [`LookupClient`].
pub trait RpcTransport: Send + Sync {
    /// Posts one JSON body to `endpoint` and returns the raw response body.
    ///
    /// # Errors
    /// Returns [`LookupError::Transport`] for connection failures and
    /// [`LookupError::HttpStatus`] for non-success statuses.
    fn post_json(&self, endpoint: &str, body: &str) -> Result<String, LookupError>;
}

/// Lookup seam the scan session depends on.
pub trait RecordLookup: Send + Sync {
    /// Fetches the transaction identified by `id` and returns its decoded
    /// input text.
    ///
    /// # Errors
    /// Returns [`LookupError`] when the record cannot be fetched or decoded.
    fn get_record_by_id(&self, id: &str) -> Result<String, LookupError>;
}

/// JSON-RPC lookup client bound to one node endpoint.
#[derive(Clone)]
pub struct LookupClient {
    endpoint: String,
    transport: Arc<dyn RpcTransport>,
    next_request_id: Arc<AtomicU64>,
}

impl LookupClient {
    /// Creates a validated lookup client.
    ///
    /// # Errors
    /// Returns [`LookupError::InvalidEndpoint`] when the URL is malformed or
    /// does not use `http`/`https`.
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn RpcTransport>,
    ) -> Result<Self, LookupError> {
        let endpoint = endpoint.into();
        validate_rpc_endpoint(&endpoint)?;
        Ok(Self {
            endpoint,
            transport,
            next_request_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Fetches the raw transaction record for `id`.
    ///
    /// # Errors
    /// Returns [`LookupError::NotFound`] when the node has no such transaction.
    /// Propagates transport and contract errors as-is.
    pub fn fetch_record(&self, id: &TransactionId) -> Result<TransactionRecord, LookupError> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let body = encode_request(&get_transaction_request(id, request_id))?;

        debug!(request_id, identifier = %id, "sending eth_getTransactionByHash");
        let raw = self.transport.post_json(&self.endpoint, &body)?;

        parse_transaction_response(&raw, request_id)?
            .ok_or_else(|| LookupError::NotFound(id.to_string()))
    }

    /// Returns configured node endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecordLookup for LookupClient {
    fn get_record_by_id(&self, id: &str) -> Result<String, LookupError> {
        let id = TransactionId::new(id).map_err(LookupError::InvalidIdentifier)?;
        let record = self.fetch_record(&id)?;
        record.input_text().map_err(LookupError::Decode)
    }
}

/// Blocking HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRpcTransport {
    client: reqwest::blocking::Client,
}

impl HttpRpcTransport {
    /// Creates a transport with a whole-request timeout.
    ///
    /// # Errors
    /// Returns [`LookupError::Transport`] when the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| LookupError::Transport(format!("http client build failed: {error}")))?;
        Ok(Self { client })
    }
}

impl RpcTransport for HttpRpcTransport {
    fn post_json(&self, endpoint: &str, body: &str) -> Result<String, LookupError> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|error| LookupError::Transport(error.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus(status.as_u16()));
        }

        response
            .text()
            .map_err(|error| LookupError::Transport(error.without_url().to_string()))
    }
}

/// Validates node endpoint constraints.
///
/// # Errors
/// Returns [`LookupError::InvalidEndpoint`] for unparsable URLs, unsupported
/// schemes or a missing host.
pub fn validate_rpc_endpoint(endpoint: &str) -> Result<(), LookupError> {
    let parsed = Url::parse(endpoint)
        .map_err(|error| LookupError::InvalidEndpoint(format!("invalid rpc url: {error}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LookupError::InvalidEndpoint(format!(
            "rpc endpoint must use http or https, got {}",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(LookupError::InvalidEndpoint(
            "rpc endpoint must include a host".to_string(),
        ));
    }

    Ok(())
}

/// Errors produced by the lookup client and transports.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Endpoint violates URL policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Scanned identifier was blank.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(CoreError),
    /// Connection, TLS or timeout failure.
    #[error("rpc transport failure: {0}")]
    Transport(String),
    /// Node answered with a non-success HTTP status.
    #[error("rpc endpoint returned http status {0}")]
    HttpStatus(u16),
    /// Envelope was malformed or the node reported an error.
    #[error(transparent)]
    Rpc(#[from] RpcContractError),
    /// Node has no transaction with this identifier.
    #[error("transaction not found: {0}")]
    NotFound(String),
    /// Input payload was not valid hex.
    #[error("input payload decode failure: {0}")]
    Decode(CoreError),
}
