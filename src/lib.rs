pub mod address;
pub mod balance;
mod env;
pub mod execution_node;
pub mod history;
mod log;
mod serve;
pub mod units;

pub use serve::{router, start_server, AppState};
