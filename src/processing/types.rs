//! Data types and error definitions shared by the request pipeline.

use crate::extraction::ExtractionError;
use crate::summarization::SummarizationError;
use serde::Serialize;
use thiserror::Error;

/// Message returned when `summarize-text` receives no usable text.
pub const NO_TEXT_PROVIDED: &str = "No text provided";
/// Message returned when `summarize-document` receives no file part.
pub const NO_FILE_UPLOADED: &str = "No file uploaded";

/// Errors emitted while serving a summarization request.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Required input was absent or empty.
    #[error("{0}")]
    InputMissing(&'static str),
    /// Uploaded document could not be parsed as a PDF.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Summarization backend failed or answered with an unusable body.
    #[error(transparent)]
    Summarization(#[from] SummarizationError),
    /// Upload could not be staged on disk.
    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
}

/// Raw document bytes received from a client.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Client-supplied filename; used only as a hint for the storage key.
    pub filename: Option<String>,
    /// Document contents.
    pub bytes: Vec<u8>,
}

/// Outcome of a summarization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizationResult {
    /// Text recovered from an uploaded document; absent for plain text requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    /// Summary produced by the configured backend.
    pub summary: String,
}
