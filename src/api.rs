//! HTTP surface for the notesum server.
//!
//! This module exposes a compact Axum router with three endpoints:
//!
//! - `POST /summarize` – Validate a document, chunk it, summarize each chunk, and
//!   return the merged summary with word/chunk counters.
//! - `GET /health` – Liveness probe.
//! - `GET /metrics` – Observe summarization counters.
//!
//! Handlers are generic over [`SummarizeApi`] so tests can drive the router with
//! a stubbed pipeline. Document-level failures map to structured
//! `{ "error": ..., "success": false }` payloads: validation problems become
//! `400`, extraction problems `422`, anything unexpected `500`.

use crate::config::get_config;
use crate::extraction::DocumentKind;
use crate::processing::{PipelineError, SummarizeApi, SummarizeRequest};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: SummarizeApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_document::<S>))
        .route("/health", get(health))
        .route("/metrics", get(get_metrics::<S>))
        .with_state(service)
}

/// Request body for the `POST /summarize` endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeRequestBody {
    /// Document contents: plain text, or base64 when `isBase64` is set.
    content: String,
    /// Declared format: `txt` (default), `pdf`, or `docx`.
    #[serde(default)]
    file_type: Option<String>,
    /// Whether `content` is base64-encoded.
    #[serde(default, alias = "isEncoded")]
    is_base64: bool,
    /// Word budget per chunk (defaults to `DEFAULT_CHUNK_LENGTH`).
    #[serde(default)]
    chunk_length: Option<usize>,
    /// Overlap word budget between chunks (defaults to `DEFAULT_OVERLAP_LENGTH`).
    #[serde(default)]
    overlap_length: Option<usize>,
}

/// Success response for the `POST /summarize` endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeResponseBody {
    /// Merged summary text, fragments joined in chunk order.
    summary: String,
    /// Word count of the normalized input document.
    word_count: usize,
    /// Number of chunks the document was split into.
    chunk_count: usize,
    /// Chunks whose fragment came from the fallback rule.
    degraded_chunks: usize,
    /// Always `true` on this code path.
    success: bool,
}

/// Summarize a document.
async fn summarize_document<S>(
    State(service): State<Arc<S>>,
    Json(body): Json<SummarizeRequestBody>,
) -> Result<Json<SummarizeResponseBody>, AppError>
where
    S: SummarizeApi,
{
    let config = get_config();
    let declared_type = body.file_type.as_deref().unwrap_or("txt");
    let kind: DocumentKind = declared_type
        .parse()
        .map_err(|()| AppError::bad_request(format!("Unsupported file type: {declared_type}")))?;

    let request = SummarizeRequest {
        content: body.content,
        kind,
        is_encoded: body.is_base64,
        chunk_length: body.chunk_length.unwrap_or(config.default_chunk_length),
        overlap_length: body.overlap_length.unwrap_or(config.default_overlap_length),
    };

    let outcome = service.summarize_document(request).await?;
    tracing::info!(
        word_count = outcome.word_count,
        chunks = outcome.chunk_count,
        degraded = outcome.degraded_chunks,
        "Summarize request completed"
    );
    Ok(Json(SummarizeResponseBody {
        summary: outcome.summary,
        word_count: outcome.word_count,
        chunk_count: outcome.chunk_count,
        degraded_chunks: outcome.degraded_chunks,
        success: true,
    }))
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Return summarization counters for observability dashboards.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<crate::metrics::MetricsSnapshot>
where
    S: SummarizeApi,
{
    Json(service.metrics_snapshot())
}

struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message, "success": false }));
        (self.status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        let status = match &inner {
            PipelineError::NoContent
            | PipelineError::TooLong { .. }
            | PipelineError::TooShort { .. }
            | PipelineError::InvalidParameters => StatusCode::BAD_REQUEST,
            PipelineError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            message: inner.to_string(),
        }
    }
}
