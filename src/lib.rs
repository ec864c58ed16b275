#![deny(missing_docs)]

//! Core library for the Rusty Summary server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Request counters.
pub mod metrics;
/// Request orchestration shared by the HTTP surface and the CLI.
pub mod processing;
/// Summarization backends behind a common client trait.
pub mod summarization;
/// Transient storage for uploaded documents.
pub mod uploads;
