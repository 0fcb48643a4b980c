//! HTTP surface: route table, shared state and the server loop.

pub mod api;
pub mod assets;
pub mod error;

use crate::core::history::HistoryService;
use axum::Router;
use axum::extract::Request;
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::info;

/// Per-process handles shared by every request. Holds no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub history: HistoryService,
    pub web_root: Arc<PathBuf>,
}

impl AppState {
    pub fn new(history: HistoryService, web_root: impl Into<PathBuf>) -> Self {
        Self {
            history,
            web_root: Arc::new(web_root.into()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(assets::index))
        .route("/favicon.ico", get(assets::favicon))
        .route("/static/{*path}", get(assets::static_file))
        .route(
            "/api/history",
            get(api::get_history)
                .post(api::add_history_entry)
                .delete(api::delete_all_history),
        )
        .route("/api/history/filter", get(api::filter_history))
        .route(
            "/api/history/{id}",
            get(assets::missing_file).delete(api::delete_history_entry),
        )
        .route("/{filename}", get(assets::root_file))
        .fallback(fallback)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Unknown paths: GET gets the plain-text file 404, other methods the JSON one.
async fn fallback(method: Method) -> Response {
    if method == Method::GET || method == Method::HEAD {
        assets::missing_file().await
    } else {
        error::ApiError::not_found().into_response()
    }
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, table = state.history.table(), "listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
}
