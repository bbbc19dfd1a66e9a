use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    address::Address,
    execution_node::ExecutionNode,
    history::{AttemptRecord, HistoryRepository},
    units::wei_hex_to_ether_string,
};

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("invalid address")]
    InvalidAddress,
    /// The execution node could not be reached, rejected the call or sent back something that
    /// isn't a balance. Callers are not told which.
    #[error("upstream failure: {0}")]
    Upstream(anyhow::Error),
}

pub struct BalanceService {
    node: Arc<dyn ExecutionNode + Send + Sync>,
    history: Arc<dyn HistoryRepository + Send + Sync>,
    default_block_tag: String,
}

impl BalanceService {
    pub fn new(
        node: Arc<dyn ExecutionNode + Send + Sync>,
        history: Arc<dyn HistoryRepository + Send + Sync>,
        default_block_tag: String,
    ) -> Self {
        Self {
            node,
            history,
            default_block_tag,
        }
    }

    /// Looks up the ether balance of `address` at `block_tag`, falling back to the default block
    /// tag when none is given. Every call, successful or not, leaves exactly one record in the
    /// history.
    pub async fn get_balance(
        &self,
        address: &str,
        block_tag: Option<&str>,
    ) -> Result<String, BalanceError> {
        let block_tag = block_tag
            .filter(|tag| !tag.is_empty())
            .unwrap_or(&self.default_block_tag)
            .to_string();

        let address = match address.parse::<Address>() {
            Ok(address) => address,
            Err(_) => {
                let err = BalanceError::InvalidAddress;
                warn!(address, block_tag, "rejecting balance request, {}", err);
                self.history.append(AttemptRecord::error(
                    address.to_string(),
                    block_tag,
                    err.to_string(),
                ));
                return Err(err);
            }
        };

        let attempt = PendingAttempt::new(self.history.as_ref(), address.to_string(), block_tag);

        let fetched = self
            .node
            .get_balance(address.as_str(), &attempt.block_tag)
            .await
            .map_err(anyhow::Error::from)
            .and_then(|hex_wei| wei_hex_to_ether_string(&hex_wei).map_err(anyhow::Error::from));

        match fetched {
            Ok(balance) => {
                info!(%address, block_tag = attempt.block_tag, balance, "fetched balance");
                attempt.succeed(balance.clone());
                Ok(balance)
            }
            Err(err) => {
                warn!(%address, block_tag = attempt.block_tag, %err, "failed to fetch balance");
                attempt.fail(err.to_string());
                Err(BalanceError::Upstream(err))
            }
        }
    }
}

const CANCELLED: &str = "request cancelled";

/// A lookup that passed validation and still owes the history its record. Dropping it unfinished,
/// which happens when the caller abandons the lookup mid-call, records the attempt as cancelled.
struct PendingAttempt<'a> {
    history: &'a (dyn HistoryRepository + Send + Sync),
    address: String,
    block_tag: String,
    finished: bool,
}

impl<'a> PendingAttempt<'a> {
    fn new(
        history: &'a (dyn HistoryRepository + Send + Sync),
        address: String,
        block_tag: String,
    ) -> Self {
        Self {
            history,
            address,
            block_tag,
            finished: false,
        }
    }

    fn finish(mut self, record: impl FnOnce(String, String) -> AttemptRecord) {
        self.finished = true;
        let record = record(
            std::mem::take(&mut self.address),
            std::mem::take(&mut self.block_tag),
        );
        self.history.append(record);
    }

    fn succeed(self, balance: String) {
        self.finish(|address, block_tag| AttemptRecord::success(address, block_tag, balance))
    }

    fn fail(self, message: String) {
        self.finish(|address, block_tag| AttemptRecord::error(address, block_tag, message))
    }
}

impl Drop for PendingAttempt<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        warn!(
            address = self.address,
            block_tag = self.block_tag,
            "balance lookup cancelled before completing"
        );
        self.history.append(AttemptRecord::error(
            std::mem::take(&mut self.address),
            std::mem::take(&mut self.block_tag),
            CANCELLED.to_string(),
        ));
    }
}
