use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

mod env;

use env::APP_CONFIG;

use crate::{
    balance::{BalanceError, BalanceService},
    execution_node::JsonRpcNode,
    history::{AttemptRecord, MemoryHistory, RequestHistory},
};

#[derive(Clone)]
pub struct AppState {
    balances: Arc<BalanceService>,
    history: Arc<RequestHistory>,
}

impl AppState {
    pub fn new(balances: Arc<BalanceService>, history: Arc<RequestHistory>) -> Self {
        Self { balances, history }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

type ApiResponse<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/healthz", get(health))
        .route("/address/balance/:address", get(balance))
        .route("/requests/history", get(request_history))
        .with_state(state)
        .layer(cors)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct BalanceParams {
    block: Option<String>,
}

#[derive(Serialize)]
struct BalanceBody {
    balance: String,
}

async fn balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(BalanceParams { block }): Query<BalanceParams>,
) -> ApiResponse<BalanceBody> {
    state
        .balances
        .get_balance(&address, block.as_deref())
        .await
        .map(|balance| Json(BalanceBody { balance }))
        .map_err(|err| {
            let status = match err {
                BalanceError::InvalidAddress => StatusCode::BAD_REQUEST,
                BalanceError::Upstream(_) => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            )
        })
}

#[derive(Deserialize)]
struct HistoryParams {
    limit: Option<usize>,
}

async fn request_history(
    State(state): State<AppState>,
    Query(HistoryParams { limit }): Query<HistoryParams>,
) -> Json<Vec<AttemptRecord>> {
    Json(state.history.list(limit))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}

pub async fn start_server() -> Result<()> {
    crate::log::init();

    let addr = SocketAddr::from(([0, 0, 0, 0], APP_CONFIG.port));

    let node = JsonRpcNode::new(APP_CONFIG.infura_url.clone(), APP_CONFIG.request_timeout)?;
    let history = Arc::new(MemoryHistory::new(APP_CONFIG.history_max_records));

    let balances = BalanceService::new(
        Arc::new(node),
        history.clone(),
        APP_CONFIG.default_block_tag.clone(),
    );
    let request_history = RequestHistory::new(history, APP_CONFIG.history_list_limit);

    let app = router(AppState::new(
        Arc::new(balances),
        Arc::new(request_history),
    ));

    info!(
        %addr,
        history_max_records = APP_CONFIG.history_max_records,
        request_timeout_ms = APP_CONFIG.request_timeout.as_millis() as u64,
        "listening"
    );

    axum::Server::try_bind(&addr)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Into::into)
}

/// Serves `app` on an ephemeral localhost port for the lifetime of the test runtime.
#[cfg(test)]
pub(crate) fn spawn_test_server(app: Router) -> SocketAddr {
    let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
        .serve(app.into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}
