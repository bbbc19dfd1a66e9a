mod json_rpc;

pub use json_rpc::JsonRpcNode;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection failures, timeouts and errors while reading the response body.
    #[error("request rpc endpoint: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc endpoint returned status {0}")]
    Status(u16),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("decode rpc response: {0}")]
    Decode(reqwest::Error),
    #[error("rpc response contains neither result nor error")]
    MissingResult,
}

#[async_trait]
pub trait ExecutionNode {
    /// Fetches the balance of `address` at `block_tag`, returning the hex encoded wei amount
    /// exactly as the node sent it.
    async fn get_balance(&self, address: &str, block_tag: &str) -> Result<String, UpstreamError>;
}
