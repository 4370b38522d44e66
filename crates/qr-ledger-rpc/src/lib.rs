#![warn(missing_docs)]
//! # qr-ledger-rpc
//!
//! ## Purpose
//! Defines the JSON-RPC 2.0 envelope used to fetch transactions from an
//! Ethereum node, plus request/response helpers for `eth_getTransactionByHash`.
//!
//! ## Responsibilities
//! - Build versioned request envelopes with a caller-chosen request id.
//! - Parse response envelopes and surface node-reported errors.
//! - Map a `null` result to "no such transaction".
//!
//! ## Data flow
//! [`TransactionId`] -> [`get_transaction_request`] -> [`encode_request`] ->
//! transport -> [`parse_transaction_response`] -> [`TransactionRecord`].
//!
//! ## Error model
//! Invalid JSON, mismatched ids and node errors return [`RpcContractError`].

use qr_ledger_core::{TransactionId, TransactionRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Node method returning one transaction by hash.
pub const GET_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";

/// JSON-RPC request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always [`JSONRPC_VERSION`].
    pub jsonrpc: String,
    /// Request id echoed by the node.
    pub id: u64,
    /// Remote method name.
    pub method: String,
    /// Positional parameters.
    #[serde(default)]
    pub params: Vec<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version reported by the node.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Echoed request id.
    #[serde(default)]
    pub id: Option<Value>,
    /// Successful result, `None` for both absent and `null`.
    #[serde(default)]
    pub result: Option<Value>,
    /// Node-reported error.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// Error object embedded in a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Builds an `eth_getTransactionByHash` request for one identifier.
pub fn get_transaction_request(id: &TransactionId, request_id: u64) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.to_string(),
        id: request_id,
        method: GET_TRANSACTION_BY_HASH.to_string(),
        params: vec![Value::String(id.as_str().to_string())],
    }
}

/// Serializes a request envelope to a JSON body.
///
/// # Errors
/// Returns [`RpcContractError::Encode`] when serialization fails.
pub fn encode_request(request: &JsonRpcRequest) -> Result<String, RpcContractError> {
    serde_json::to_string(request).map_err(RpcContractError::Encode)
}

/// Parses a raw response body into a response envelope.
///
/// # Errors
/// Returns [`RpcContractError::Decode`] for invalid JSON.
pub fn parse_response(raw: &str) -> Result<JsonRpcResponse, RpcContractError> {
    serde_json::from_str(raw).map_err(RpcContractError::Decode)
}

/// Parses an `eth_getTransactionByHash` response.
///
/// # Returns
/// - `Ok(Some(record))` when the node returned a transaction object.
/// - `Ok(None)` when the node knows no transaction with that hash.
///
/// # Errors
/// Returns [`RpcContractError::Remote`] when the node reported an error,
/// [`RpcContractError::InvalidContract`] when the echoed id does not match
/// `expected_id` or the result is not a transaction object.
pub fn parse_transaction_response(
    raw: &str,
    expected_id: u64,
) -> Result<Option<TransactionRecord>, RpcContractError> {
    let response = parse_response(raw)?;

    if let Some(error) = response.error {
        return Err(RpcContractError::Remote {
            code: error.code,
            message: error.message,
        });
    }

    match response.id.as_ref().and_then(Value::as_u64) {
        Some(id) if id == expected_id => {}
        other => {
            return Err(RpcContractError::InvalidContract(format!(
                "response id {other:?} does not match request id {expected_id}"
            )));
        }
    }

    match response.result {
        None => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(|error| {
            RpcContractError::InvalidContract(format!("result is not a transaction: {error}"))
        }),
    }
}

/// JSON-RPC contract errors.
#[derive(Debug, Error)]
pub enum RpcContractError {
    /// Request serialization failure.
    #[error("rpc encode failure: {0}")]
    Encode(serde_json::Error),
    /// Response JSON decode failure.
    #[error("rpc decode failure: {0}")]
    Decode(serde_json::Error),
    /// Node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Remote {
        /// Node error code.
        code: i64,
        /// Node error message.
        message: String,
    },
    /// Response violated envelope expectations.
    #[error("rpc contract violation: {0}")]
    InvalidContract(String),
}
