//! Page and static file routes.
//!
//! All files are read from the configured web root:
//!
//! ```text
//! <web_root>/
//!   .version                       build label shown in the page footer
//!   templates/index.html           the single page
//!   static/...                     scripts, styles, favicon
//!   531030__creeeeak__bell9.wav    timer bell
//! ```

use super::AppState;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use std::io::ErrorKind;
use std::path::{Component, Path as FsPath, PathBuf};
use tracing::{error, warn};

pub const BELL_SOUND: &str = "531030__creeeeak__bell9.wav";
pub const VERSION_PLACEHOLDER: &str = "{{ git_version }}";

/// Contents of `.version`, `unknown` when missing, `error` when unreadable.
pub async fn git_version(web_root: &FsPath) -> String {
    match tokio::fs::read_to_string(web_root.join(".version")).await {
        Ok(v) => v.trim().to_string(),
        Err(e) if e.kind() == ErrorKind::NotFound => "unknown".to_string(),
        Err(e) => {
            warn!(error = %e, "error reading version file");
            "error".to_string()
        }
    }
}

pub fn render_index(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Response {
    let path = state.web_root.join("templates").join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(template) => {
            let version = git_version(&state.web_root).await;
            Html(render_index(&template, &version)).into_response()
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "index template unavailable");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// GET /favicon.ico
pub async fn favicon(State(state): State<AppState>) -> Response {
    let path = state.web_root.join("static").join("favicon.ico");
    send_file(&path, "image/vnd.microsoft.icon").await
}

/// GET /static/{*path}
pub async fn static_file(State(state): State<AppState>, Path(rel): Path<String>) -> Response {
    let base = state.web_root.join("static");
    match safe_join(&base, &rel) {
        Some(path) => send_file(&path, content_type(&path)).await,
        None => file_not_found(),
    }
}

/// GET /{filename}: only the bell sound lives at the root.
pub async fn root_file(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    if filename == BELL_SOUND {
        send_file(&state.web_root.join(BELL_SOUND), "audio/wav").await
    } else {
        file_not_found()
    }
}

/// GET on any path without a page or file behind it.
pub async fn missing_file() -> Response {
    file_not_found()
}

fn file_not_found() -> Response {
    (StatusCode::NOT_FOUND, "File not found").into_response()
}

async fn send_file(path: &FsPath, content_type: &'static str) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                warn!(error = %e, path = %path.display(), "failed to read file");
            }
            file_not_found()
        }
    }
}

/// Join `rel` under `base`, refusing anything that could climb out of it.
pub fn safe_join(base: &FsPath, rel: &str) -> Option<PathBuf> {
    let rel = FsPath::new(rel);
    let mut out = base.to_path_buf();
    let mut any = false;
    for component in rel.components() {
        match component {
            Component::Normal(part) => {
                out.push(part);
                any = true;
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    any.then_some(out)
}

pub fn content_type(path: &FsPath) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/vnd.microsoft.icon",
        "webp" => "image/webp",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "txt" => "text/plain; charset=utf-8",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
