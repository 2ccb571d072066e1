//! HTTP handlers

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use lifehub_core::sync::{PublishError, SyncPayload};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::AppState;

/// Body of every write endpoint's response
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            timestamp: None,
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            timestamp: None,
            error: None,
        }
    }
}

type Reply = (StatusCode, Json<ApiResponse>);

/// Answer 404 for any path with a segment starting with `.`, so `.env` and
/// `.git/` under the web root are never served.
pub async fn hide_dotfiles(request: Request, next: Next) -> Response {
    if is_hidden_path(request.uri().path()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

fn is_hidden_path(path: &str) -> bool {
    path.split('/').any(|segment| {
        segment.starts_with('.')
            || segment
                .get(..3)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
    })
}

/// Health check
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// POST /save-data
pub async fn save_data(State(state): State<AppState>, Json(data): Json<Value>) -> Reply {
    match state.gateway.save(&data).await {
        Ok(()) => {
            info!(path = %state.gateway.status_path().display(), "Data saved");
            (StatusCode::OK, Json(ApiResponse::ok("Data saved successfully")))
        }
        Err(e) => {
            error!(error = %e, "Error saving data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failed("Error saving data")),
            )
        }
    }
}

/// POST /push-to-github
pub async fn push_to_github(
    State(state): State<AppState>,
    Json(payload): Json<SyncPayload>,
) -> Reply {
    match state.gateway.publish(&payload).await {
        Ok(receipt) => {
            info!(message = %receipt.commit_message, "Data published");
            (
                StatusCode::OK,
                Json(ApiResponse {
                    timestamp: Some(receipt.timestamp),
                    ..ApiResponse::ok("Data pushed to GitHub successfully")
                }),
            )
        }
        Err(e) => {
            error!(error = %e, "Publish failed");
            let message = match &e {
                PublishError::Step { step, .. } => format!(
                    "Git {step} failed. Make sure you have git configured and have push access."
                ),
                _ => "Error pushing to GitHub".to_string(),
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse {
                    error: Some(e.to_string()),
                    ..ApiResponse::failed(message)
                }),
            )
        }
    }
}

/// GET /data/status.json
pub async fn status_document(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.gateway.load_or_init().await.map(Json).map_err(|e| {
        error!(error = %e, "Error reading data");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Error reading data" })),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_paths() {
        assert!(is_hidden_path("/.env"));
        assert!(is_hidden_path("/.git/config"));
        assert!(is_hidden_path("/assets/.secret"));
        assert!(is_hidden_path("/%2Eenv"));
        assert!(is_hidden_path("/../status.json"));

        assert!(!is_hidden_path("/"));
        assert!(!is_hidden_path("/index.html"));
        assert!(!is_hidden_path("/data/status.json"));
    }
}
