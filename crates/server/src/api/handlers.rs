use axum::{
    extract::{Path as UrlPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Component, Path};
use std::sync::Arc;
use tracing::{error, info, warn};

use strokegif_core::{input::validate_character, list_outputs, ManifestEntry};

use super::OUTPUT_URL_PREFIX;
use crate::metrics::{self, GENERATED_FILES, GENERATE_REQUESTS_TOTAL};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

fn json_error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// GET /api/list
pub async fn list_generated(State(state): State<Arc<AppState>>) -> Response {
    match list_outputs(&state.config().output.dir, OUTPUT_URL_PREFIX).await {
        Ok(entries) => {
            GENERATED_FILES.set(entries.len() as i64);
            Json::<Vec<ManifestEntry>>(entries).into_response()
        }
        Err(e) => {
            error!("Failed to list outputs: {}", e);
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to read output directory" }),
            )
        }
    }
}

/// Extracts a non-empty `char` from the request document.
fn requested_character(body: &Value) -> Option<&str> {
    body.get("char")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
}

/// POST /api/generate
///
/// The body is parsed by hand so malformed JSON maps to the documented
/// `{"error": "Invalid JSON"}` payload instead of axum's rejection.
pub async fn generate(State(state): State<Arc<AppState>>, body: String) -> Response {
    let document: Value = match serde_json::from_str(&body) {
        Ok(Value::Null) | Err(_) => {
            GENERATE_REQUESTS_TOTAL.with_label_values(&["rejected"]).inc();
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Invalid JSON" }),
            );
        }
        Ok(document) => document,
    };

    let Some(character) = requested_character(&document) else {
        GENERATE_REQUESTS_TOTAL.with_label_values(&["rejected"]).inc();
        return json_error(
            StatusCode::BAD_REQUEST,
            json!({ "error": "Character is required" }),
        );
    };

    if let Err(e) = validate_character(character) {
        GENERATE_REQUESTS_TOTAL.with_label_values(&["rejected"]).inc();
        return json_error(StatusCode::BAD_REQUEST, json!({ "error": e.to_string() }));
    }

    info!("Received request to generate: {}", character);

    let command = state.generate_command();
    match command.run(character).await {
        Ok(status) if status.success() => {
            GENERATE_REQUESTS_TOTAL.with_label_values(&["success"]).inc();
            (
                StatusCode::OK,
                Json(json!({ "success": true, "message": format!("Generated {}", character) })),
            )
                .into_response()
        }
        Ok(status) => {
            warn!("Generation of {} failed: {}", character, status);
            GENERATE_REQUESTS_TOTAL.with_label_values(&["failed"]).inc();
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Generation failed", "code": status.code() }),
            )
        }
        Err(e) => {
            error!(
                "Failed to run {}: {}",
                command.program().display(),
                e
            );
            GENERATE_REQUESTS_TOTAL.with_label_values(&["failed"]).inc();
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Generation failed", "code": Value::Null }),
            )
        }
    }
}

/// MIME type by file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("gif") => "image/gif",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Whether a request path stays inside the directory it is joined to.
fn is_contained(relative: &Path) -> bool {
    relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
}

async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(path))],
            bytes,
        )
            .into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound || path.is_dir() => {
            (StatusCode::NOT_FOUND, "File Not Found").into_response()
        }
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
        }
    }
}

/// GET /output/{*name}
pub async fn output_file(
    State(state): State<Arc<AppState>>,
    UrlPath(name): UrlPath<String>,
) -> Response {
    let relative = Path::new(&name);
    if name.is_empty() || !is_contained(relative) {
        return (StatusCode::NOT_FOUND, "File Not Found").into_response();
    }
    serve_file(&state.config().output.dir.join(relative)).await
}

/// GET / and GET /index.html
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Response {
    serve_file(&state.config().server.dashboard_path).await
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    metrics::collect_dynamic_metrics(&state).await;
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::encode_metrics(),
    )
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("中.gif")), "image/gif");
        assert_eq!(content_type_for(Path::new("A.GIF")), "image/gif");
        assert_eq!(content_type_for(Path::new("data.json")), "application/json");
        assert_eq!(content_type_for(Path::new("index.html")), "text/html");
        assert_eq!(content_type_for(Path::new("app.js")), "text/javascript");
        assert_eq!(content_type_for(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(
            content_type_for(Path::new("archive.tar")),
            "application/octet-stream"
        );
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_is_contained() {
        assert!(is_contained(Path::new("中.gif")));
        assert!(is_contained(Path::new("nested/中.gif")));
        assert!(!is_contained(Path::new("../secret")));
        assert!(!is_contained(Path::new("a/../../b")));
        assert!(!is_contained(Path::new("/etc/passwd")));
    }

    #[test]
    fn test_requested_character() {
        assert_eq!(requested_character(&json!({ "char": "中" })), Some("中"));
        assert_eq!(requested_character(&json!({ "char": "" })), None);
        assert_eq!(requested_character(&json!({})), None);
        assert_eq!(requested_character(&json!({ "char": 5 })), None);
        assert_eq!(requested_character(&json!(["中"])), None);
    }
}
