use std::{sync::LazyLock, time::Duration};

use reqwest::Url;
use serde::Deserialize;

use crate::env::{
    deserialize_duration_millis, deserialize_non_zero, deserialize_url, get_app_config,
};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Block tag used when a balance request doesn't specify one.
    #[serde(default = "default_block_tag")]
    pub default_block_tag: String,
    /// Number of records `/requests/history` returns when no limit is given.
    #[serde(
        default = "default_history_list_limit",
        deserialize_with = "deserialize_non_zero"
    )]
    pub history_list_limit: usize,
    #[serde(
        default = "default_history_max_records",
        deserialize_with = "deserialize_non_zero"
    )]
    pub history_max_records: usize,
    /// JSON-RPC endpoint of the execution node.
    #[serde(deserialize_with = "deserialize_url")]
    pub infura_url: Url,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(
        rename = "request_timeout_ms",
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration_millis"
    )]
    pub request_timeout: Duration,
}

fn default_block_tag() -> String {
    "latest".to_string()
}

fn default_history_list_limit() -> usize {
    20
}

fn default_history_max_records() -> usize {
    1000
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(get_app_config);
