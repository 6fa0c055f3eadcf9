//! Core data types and error definitions for the summarization pipeline.

use crate::extraction::{DocumentKind, ExtractionError};
use thiserror::Error;

/// Errors emitted by the document summarization pipeline.
///
/// Per-chunk model failures are deliberately absent: they are contained inside
/// the chunk summarizer and surface only as degraded fragments.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request carried no usable text.
    #[error("No content provided")]
    NoContent,
    /// Document word count exceeds the configured upper bound.
    #[error("Document exceeds {limit} words ({word_count} words)")]
    TooLong {
        /// Word count of the normalized document.
        word_count: usize,
        /// Configured upper bound.
        limit: usize,
    },
    /// Document word count is below the configured lower bound.
    #[error("Document is below the {limit} word minimum ({word_count} words)")]
    TooShort {
        /// Word count of the normalized document.
        word_count: usize,
        /// Configured lower bound.
        limit: usize,
    },
    /// Request parameters cannot produce a valid chunking.
    #[error("Chunk length must be greater than zero")]
    InvalidParameters,
    /// Binary decode or text extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Document acceptance policy applied before chunking.
///
/// The two observed deployments differ only in these bounds, so they are a
/// configuration record rather than separate code paths.
#[derive(Debug, Clone, Copy)]
pub struct DocumentPolicy {
    /// Upper bound on document word count.
    pub max_words: usize,
    /// Lower bound on document word count; `None` disables the check.
    pub min_words: Option<usize>,
    /// Whether base64-encoded PDF/DOCX uploads are accepted.
    pub binary_extraction: bool,
}

impl DocumentPolicy {
    /// Text-only deployment: 2000-word ceiling, no lower bound.
    pub const fn strict() -> Self {
        Self {
            max_words: 2_000,
            min_words: None,
            binary_extraction: false,
        }
    }

    /// Full deployment: 10000-word ceiling, 10-word floor, binary uploads.
    pub const fn extended() -> Self {
        Self {
            max_words: 10_000,
            min_words: Some(10),
            binary_extraction: true,
        }
    }
}

/// Parameters for one summarization run, independent of the transport layer.
#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    /// Raw request body: plain text, or base64 when `is_encoded` is set.
    pub content: String,
    /// Declared document format.
    pub kind: DocumentKind,
    /// Whether `content` is base64-encoded.
    pub is_encoded: bool,
    /// Word budget per chunk.
    pub chunk_length: usize,
    /// Word budget carried over between consecutive chunks.
    pub overlap_length: usize,
}

/// A bounded-size, sentence-aligned span of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Constituent sentences joined by single spaces.
    pub text: String,
    /// Sum of constituent sentence word counts.
    pub word_count: usize,
}

/// Summary produced for a single chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFragment {
    /// Fragment text: model output, or fallback text when degraded.
    pub text: String,
    /// Index of the chunk this fragment was produced from.
    pub source_chunk: usize,
    /// True when the fragment came from the fallback rule rather than the model.
    pub degraded: bool,
}

/// Result of a completed summarization run.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// Fragment texts concatenated with single spaces, in chunk order.
    pub summary: String,
    /// Word count of the normalized input document.
    pub word_count: usize,
    /// Number of chunks the document was split into.
    pub chunk_count: usize,
    /// Number of fragments produced via the fallback rule.
    pub degraded_chunks: usize,
}
