use anyhow::Result;

#[tokio::main]
pub async fn main() -> Result<()> {
    eth_balance_api::start_server().await
}
