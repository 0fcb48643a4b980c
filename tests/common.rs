#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use timespent::core::history::HistoryService;
use timespent::store::{SqliteStore, Store};
use timespent::web::AppState;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// The binary, isolated from the developer's home, `.env` and Supabase environment.
pub fn ts(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("timespent");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_KEY")
        .env_remove("PORT");
    cmd
}

/// Database path inside `dir`.
pub fn db_in(dir: &Path) -> String {
    let mut path: PathBuf = dir.to_path_buf();
    path.push("history.sqlite");
    path.to_string_lossy().to_string()
}

/// A server bound to an ephemeral port, stopped on drop.
pub struct TestServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn_server(app: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    TestServer {
        base_url: format!("http://{}", addr),
        shutdown: Some(shutdown_tx),
    }
}

pub fn state_with(store: Arc<dyn Store>, web_root: &Path) -> AppState {
    AppState::new(HistoryService::new(store), web_root)
}

/// Full app over a fresh in-memory SQLite table.
pub async fn spawn_sqlite_app(web_root: &Path) -> TestServer {
    let store = Arc::new(SqliteStore::in_memory().expect("sqlite"));
    spawn_server(timespent::web::router(state_with(store, web_root))).await
}
