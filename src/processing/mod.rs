//! Request orchestration: upload staging, PDF extraction, and summarization dispatch.

mod service;
pub mod types;

pub use service::{SummaryApi, SummaryService};
pub use types::{ServiceError, SummarizationResult, UploadedDocument};
