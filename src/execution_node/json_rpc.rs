use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ExecutionNode, UpstreamError};

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<String>,
    error: Option<JsonRpcError>,
}

/// Execution node reached over JSON-RPC 2.0 on HTTP, e.g. Infura.
pub struct JsonRpcNode {
    client: reqwest::Client,
    url: Url,
}

impl JsonRpcNode {
    /// `timeout` bounds each request as a whole, from connecting until the body is read.
    pub fn new(url: Url, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl ExecutionNode for JsonRpcNode {
    async fn get_balance(&self, address: &str, block_tag: &str) -> Result<String, UpstreamError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "eth_getBalance",
            "params": [address, block_tag],
            "id": 1
        });

        debug!(%payload, "calling execution node");

        let response = self
            .client
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let JsonRpcResponse { result, error } =
            response.json().await.map_err(|err| {
                if err.is_decode() {
                    UpstreamError::Decode(err)
                } else {
                    UpstreamError::Transport(err)
                }
            })?;

        match (result, error) {
            (_, Some(JsonRpcError { code, message })) => Err(UpstreamError::Rpc { code, message }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(UpstreamError::MissingResult),
        }
    }
}
