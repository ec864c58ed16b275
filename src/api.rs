//! HTTP surface for Rusty Summary.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /summarize-text` – JSON `{ "text": string }` → `{ "summary": string }`.
//! - `POST /summarize-document` – multipart form with a `file` part holding PDF bytes →
//!   `{ "extracted_text": string, "summary": string }`.
//! - `GET /metrics` – Request counters since startup.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools.
//! - `GET /health` – Liveness check.
//!
//! Every error is returned as JSON `{ "error": string }`. Unrecognised backend responses add a
//! `raw` field carrying the body verbatim so clients can tell them apart from real summaries.

use crate::processing::types::{NO_FILE_UPLOADED, NO_TEXT_PROVIDED};
use crate::processing::{ServiceError, SummaryApi, UploadedDocument};
use crate::summarization::SummarizationError;
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Multipart field carrying the uploaded document.
const FILE_FIELD: &str = "file";

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/summarize-text", post(summarize_text::<S>))
        .route("/summarize-document", post(summarize_document::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Request body for `POST /summarize-text`.
#[derive(Deserialize)]
struct SummarizeTextRequest {
    /// Text to summarize; absent, null, and blank values are rejected.
    #[serde(default)]
    text: Option<String>,
}

/// Success response for `POST /summarize-text`.
#[derive(Serialize)]
struct SummarizeTextResponse {
    summary: String,
}

/// Success response for `POST /summarize-document`.
#[derive(Serialize)]
struct SummarizeDocumentResponse {
    extracted_text: String,
    summary: String,
}

/// Summarize a raw text payload.
async fn summarize_text<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<SummarizeTextRequest>, JsonRejection>,
) -> Result<Json<SummarizeTextResponse>, AppError>
where
    S: SummaryApi,
{
    let Json(request) =
        payload.map_err(|rejection| AppError::Request(rejection.status(), rejection.body_text()))?;
    let text = request
        .text
        .filter(|text| !text.trim().is_empty())
        .ok_or(ServiceError::InputMissing(NO_TEXT_PROVIDED))?;

    let result = service.summarize_text(text).await?;
    Ok(Json(SummarizeTextResponse {
        summary: result.summary,
    }))
}

/// Extract text from an uploaded PDF and summarize it.
async fn summarize_document<S>(
    State(service): State<Arc<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummarizeDocumentResponse>, AppError>
where
    S: SummaryApi,
{
    // A request that is not multipart at all carries no file part.
    let Ok(multipart) = multipart else {
        return Err(ServiceError::InputMissing(NO_FILE_UPLOADED).into());
    };
    let document = read_file_field(multipart)
        .await?
        .ok_or(ServiceError::InputMissing(NO_FILE_UPLOADED))?;

    let result = service.summarize_document(document).await?;
    Ok(Json(SummarizeDocumentResponse {
        extracted_text: result.extracted_text.unwrap_or_default(),
        summary: result.summary,
    }))
}

/// Pull the `file` part out of a multipart form, skipping every other field.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedDocument>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| multipart_error("Failed to read form field", error))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|error| multipart_error("Failed to read file data", error))?;
        return Ok(Some(UploadedDocument {
            filename,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// Keep the status multer reports, so an oversized upload answers 413 rather than 400.
fn multipart_error(context: &str, error: MultipartError) -> AppError {
    AppError::Request(error.status(), format!("{context}: {}", error.body_text()))
}

/// Return request counters since startup.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> impl IntoResponse
where
    S: SummaryApi,
{
    Json(service.metrics_snapshot())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery by hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize_text",
                method: "POST",
                path: "/summarize-text",
                description: "Summarize raw text. Response returns { \"summary\": string }.",
                request_example: Some(json!({
                    "text": "The quick brown fox jumps over the lazy dog."
                })),
            },
            CommandDescriptor {
                name: "summarize_document",
                method: "POST",
                path: "/summarize-document",
                description: "Upload a PDF as multipart field `file`. Response returns { \"extracted_text\": string, \"summary\": string }.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return request counters useful for observability dashboards.",
                request_example: None,
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Liveness check.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    /// Request body could not be read; carries the extractor's status.
    Request(StatusCode, String),
    Service(ServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error = match self {
            Self::Request(status, message) => {
                return (status, Json(json!({ "error": message }))).into_response();
            }
            Self::Service(error) => error,
        };

        let status = match &error {
            ServiceError::InputMissing(_) => StatusCode::BAD_REQUEST,
            ServiceError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Summarization(SummarizationError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServiceError::Summarization(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match &error {
            ServiceError::Summarization(SummarizationError::MalformedResponse(raw)) => json!({
                "error": "Summarization backend returned an unrecognised response",
                "raw": raw,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(inner: ServiceError) -> Self {
        Self::Service(inner)
    }
}
