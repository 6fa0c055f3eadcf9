#![deny(missing_docs)]

//! Core library for the notesum summarization server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Binary document decoding and text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization metrics helpers.
pub mod metrics;
/// Summarization model client abstraction and adapters.
pub mod model;
/// Chunking and summary-merge pipeline.
pub mod processing;
