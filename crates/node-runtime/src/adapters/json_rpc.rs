//! # JSON-RPC Execution Client
//!
//! Implements [`HeaderSource`] and [`StorageReader`] against an Ethereum
//! JSON-RPC endpoint. Every request is bounded by the configured deadline
//! and reports failures as [`TransportError`] naming the endpoint.

use async_trait::async_trait;
use reqwest::Client;
use rw_01_block_locator::HeaderSource;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::encoding::{decode_hash, encode_hash, parse_quantity};
use shared_types::{Address, ExecutionHeader, Hash, StorageReader, TransportError, U256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;

use super::abi::{self, AbiError};

/// `RocketStorage.getUint(bytes32)`.
pub const GET_UINT: &str = "getUint(bytes32)";

/// `RocketStorage.getAddress(bytes32)`.
pub const GET_ADDRESS: &str = "getAddress(bytes32)";

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcHeader {
    number: String,
    hash: String,
    parent_hash: String,
    timestamp: String,
}

/// One `eth_getLogs` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    /// Indexed topics, `0x` hex.
    pub topics: Vec<String>,
    /// Non-indexed data, `0x` hex.
    pub data: String,
    /// Block the log was emitted in.
    #[serde(default)]
    pub block_number: Option<String>,
}

impl RpcLog {
    /// Decoded data bytes.
    pub fn data_bytes(&self) -> Result<Vec<u8>, String> {
        hex::decode(self.data.trim_start_matches("0x")).map_err(|e| e.to_string())
    }
}

/// Ethereum JSON-RPC client bound to one endpoint and storage contract.
#[derive(Debug)]
pub struct JsonRpcExecutionClient {
    client: Client,
    url: String,
    storage_address: Address,
    timeout: Duration,
    next_id: AtomicU64,
}

impl JsonRpcExecutionClient {
    /// Create a client for `url` reading storage words from `storage_address`.
    pub fn new(
        url: impl Into<String>,
        storage_address: Address,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            storage_address,
            timeout,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Storage contract address.
    pub fn storage_address(&self) -> Address {
        self.storage_address
    }

    /// Issue one JSON-RPC request and return its `result`.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        trace!(method, id = request.id, "[node] JSON-RPC request");

        let send = async {
            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| self.map_error(e))?;
            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    endpoint: self.url.clone(),
                    status: status.as_u16(),
                });
            }
            response.bytes().await.map_err(|e| self.map_error(e))
        };

        let body = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| self.timeout_error())??;
        parse_response(&self.url, &body)
    }

    /// `eth_call` against the latest block.
    pub async fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, TransportError> {
        let params = json!([
            { "to": to.to_string(), "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);
        let result = self.request("eth_call", params).await?;
        let text = result
            .as_str()
            .ok_or_else(|| self.decode_error("eth_call result is not a string"))?;
        hex::decode(text.trim_start_matches("0x")).map_err(|e| self.decode_error(e))
    }

    /// Current head number.
    pub async fn block_number(&self) -> Result<u64, TransportError> {
        let result = self.request("eth_blockNumber", json!([])).await?;
        let text = result
            .as_str()
            .ok_or_else(|| self.decode_error("eth_blockNumber result is not a string"))?;
        parse_quantity(text).map_err(|e| self.decode_error(e))
    }

    /// `eth_getLogs` for `address` and `topics` over `from..=to`.
    pub async fn get_logs(
        &self,
        address: &Address,
        topics: &[Hash],
        from: u64,
        to: u64,
    ) -> Result<Vec<RpcLog>, TransportError> {
        let topics: Vec<String> = topics.iter().map(encode_hash).collect();
        let params = json!([{
            "address": address.to_string(),
            "topics": topics,
            "fromBlock": format!("0x{from:x}"),
            "toBlock": format!("0x{to:x}"),
        }]);
        let result = self.request("eth_getLogs", params).await?;
        serde_json::from_value(result).map_err(|e| self.decode_error(e))
    }

    /// `RocketStorage.getAddress(key)`.
    pub async fn get_address(&self, key: Hash) -> Result<Address, TransportError> {
        let output = self
            .call(&self.storage_address, &abi::encode_call(GET_ADDRESS, &[key]))
            .await?;
        abi::read_address(&output, 0).map_err(|e| self.abi_error(e))
    }

    async fn get_block(&self, tag: String) -> Result<Option<ExecutionHeader>, TransportError> {
        let result = self
            .request("eth_getBlockByNumber", json!([tag, false]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        decode_header(&self.url, result).map(Some)
    }

    fn map_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            self.timeout_error()
        } else {
            TransportError::Unreachable {
                endpoint: self.url.clone(),
                reason: e.to_string(),
            }
        }
    }

    fn timeout_error(&self) -> TransportError {
        TransportError::Timeout {
            endpoint: self.url.clone(),
            after_ms: self.timeout.as_millis() as u64,
        }
    }

    fn decode_error(&self, reason: impl ToString) -> TransportError {
        TransportError::Decode {
            endpoint: self.url.clone(),
            reason: reason.to_string(),
        }
    }

    /// Map an ABI decoding failure onto this endpoint.
    pub fn abi_error(&self, e: AbiError) -> TransportError {
        self.decode_error(e)
    }
}

/// Extract `result` from a JSON-RPC response body.
fn parse_response(endpoint: &str, body: &[u8]) -> Result<Value, TransportError> {
    let response: RpcResponse =
        serde_json::from_slice(body).map_err(|e| TransportError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(error) = response.error {
        return Err(TransportError::Rpc {
            endpoint: endpoint.to_string(),
            message: format!("{} (code {})", error.message, error.code),
        });
    }
    Ok(response.result.unwrap_or(Value::Null))
}

fn decode_header(endpoint: &str, value: Value) -> Result<ExecutionHeader, TransportError> {
    let decode = |reason: String| TransportError::Decode {
        endpoint: endpoint.to_string(),
        reason,
    };
    let raw: RpcHeader = serde_json::from_value(value).map_err(|e| decode(e.to_string()))?;

    Ok(ExecutionHeader {
        number: parse_quantity(&raw.number).map_err(|e| decode(e.to_string()))?,
        hash: decode_hash(&raw.hash).map_err(|e| decode(e.to_string()))?,
        parent_hash: decode_hash(&raw.parent_hash).map_err(|e| decode(e.to_string()))?,
        timestamp: parse_quantity(&raw.timestamp).map_err(|e| decode(e.to_string()))?,
    })
}

#[async_trait]
impl HeaderSource for JsonRpcExecutionClient {
    async fn latest_header(&self) -> Result<ExecutionHeader, TransportError> {
        self.get_block("latest".to_string())
            .await?
            .ok_or_else(|| TransportError::Rpc {
                endpoint: self.url.clone(),
                message: "latest block unavailable".to_string(),
            })
    }

    async fn header_by_number(
        &self,
        number: u64,
    ) -> Result<Option<ExecutionHeader>, TransportError> {
        self.get_block(format!("0x{number:x}")).await
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StorageReader for JsonRpcExecutionClient {
    async fn get_uint(&self, key: Hash) -> Result<U256, TransportError> {
        let output = self
            .call(&self.storage_address, &abi::encode_call(GET_UINT, &[key]))
            .await?;
        abi::read_u256(&output, 0).map_err(|e| self.abi_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EC: &str = "http://ec:8545";

    #[test]
    fn test_parse_result() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":"0x10"}"#;
        assert_eq!(parse_response(EC, body).unwrap(), json!("0x10"));
    }

    #[test]
    fn test_parse_rpc_error() {
        let body = br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"missing trie node"}}"#;
        let err = parse_response(EC, body).unwrap_err();
        assert!(matches!(err, TransportError::Rpc { .. }));
        assert!(err.to_string().contains("missing trie node"));
        assert_eq!(err.endpoint(), EC);
    }

    #[test]
    fn test_parse_garbage_is_decode_error() {
        let err = parse_response(EC, b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
    }

    #[test]
    fn test_decode_header() {
        let value = json!({
            "number": "0x1b4",
            "hash": format!("0x{}", "11".repeat(32)),
            "parentHash": format!("0x{}", "22".repeat(32)),
            "timestamp": "0x64a1b2c3",
            "gasUsed": "0x0"
        });
        let header = decode_header(EC, value).unwrap();
        assert_eq!(header.number, 436);
        assert_eq!(header.timestamp, 0x64a1_b2c3);
        assert_eq!(header.hash, [0x11; 32]);
        assert_eq!(header.parent_hash, [0x22; 32]);
    }

    #[test]
    fn test_log_data_bytes() {
        let log: RpcLog = serde_json::from_value(json!({
            "topics": [],
            "data": "0x0102",
            "blockNumber": "0x5"
        }))
        .unwrap();
        assert_eq!(log.data_bytes().unwrap(), vec![1, 2]);
    }
}
