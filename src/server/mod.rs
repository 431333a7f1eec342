//! HTTP endpoint for batch synchronization.
//!
//! ## Routes
//!
//! | Method | Path                | Description                     |
//! |--------|---------------------|---------------------------------|
//! | POST   | `/api/github/push`  | Push a file set (JSON body)     |
//! | GET    | `/health`           | Liveness probe                  |
//!
//! ## Status codes
//!
//! - 400: validation failure, nothing attempted
//! - 404: target repository not found
//! - 500: authentication, network, or setup failure, or every attempted file failed
//! - 200: at least one file pushed, or nothing to push (`ok: false`, no errors)

use crate::core::{SyncError, SyncResult};
use crate::sync::{BatchRequest, BatchSyncOrchestrator, FileChange, FileContent};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// JSON body of `POST /api/github/push`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    #[serde(default)]
    pub installation_id: Option<u64>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub files: BTreeMap<String, FileContent>,
    #[serde(default)]
    pub destination_dir: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl PushRequest {
    /// Resolve the loose JSON shape into a batch request
    pub fn into_batch_request(self) -> BatchRequest {
        BatchRequest {
            installation_id: self.installation_id.unwrap_or(0),
            repository: self.repository.unwrap_or_default(),
            files: FileChange::from_map(self.files),
            destination_dir: self.destination_dir,
            branch: self.branch,
            project_id: self.project_id,
        }
    }
}

/// Build the router around a shared orchestrator
pub fn build_router(orchestrator: Arc<BatchSyncOrchestrator>) -> Router {
    Router::new()
        .route("/api/github/push", post(push_files))
        .route("/health", get(health))
        .with_state(orchestrator)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: SocketAddr, orchestrator: Arc<BatchSyncOrchestrator>) -> SyncResult<()> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "Push endpoint listening");

    axum::serve(listener, build_router(orchestrator))
        .await
        .map_err(SyncError::Io)
}

async fn health() -> &'static str {
    "ok"
}

/// Run one batch.
///
/// A body that does not decode is a validation failure (400). A batch in
/// which every attempted file failed is an aggregate failure: 500, with the
/// full `BatchResult` body so the per-file errors are still returned.
async fn push_files(
    State(orchestrator): State<Arc<BatchSyncOrchestrator>>,
    payload: Result<Json<PushRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Malformed push request");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "error": rejection.body_text() })),
            );
        }
    };

    match orchestrator.run(body.into_batch_request()).await {
        Ok(result) => {
            let status = status_code(result.http_status());
            let body = serde_json::to_value(&result)
                .unwrap_or_else(|e| json!({ "ok": false, "error": e.to_string() }));
            (status, Json(body))
        }
        Err(e) => {
            warn!(error = %e, "Push rejected");
            (
                status_code(e.http_status()),
                Json(json!({ "ok": false, "error": e.to_string() })),
            )
        }
    }
}

fn status_code(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
