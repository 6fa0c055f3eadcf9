//! Pipeline service coordinating extraction, chunking, and per-chunk summarization.

use crate::{
    config::get_config,
    extraction::{
        BinaryTextExtractor, DocumentKind, ExtractionError, TextExtractor, decode_base64,
    },
    metrics::{MetricsSnapshot, SummaryMetrics},
    model::{ModelClient, get_model_client},
    processing::{
        chunking::{chunk_text, count_words},
        summarize::summarize_chunk,
        types::{DocumentPolicy, PipelineError, SummarizeRequest, SummaryOutcome},
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// Coordinates the full summarization pipeline: decoding, chunking, per-chunk
/// summarization, and merge.
///
/// The service owns the model client, the binary extractor, and the metrics
/// registry so every transport surface shares the same components. Construct it
/// once near process start and share it through an `Arc`; it holds no per-request
/// state, so concurrent requests are safe.
pub struct PipelineService {
    policy: DocumentPolicy,
    min_summarizable_words: usize,
    model_client: Box<dyn ModelClient + Send + Sync>,
    extractor: Box<dyn TextExtractor + Send + Sync>,
    metrics: Arc<SummaryMetrics>,
}

/// Abstraction over the summarization pipeline used by transport surfaces.
#[async_trait]
pub trait SummarizeApi: Send + Sync {
    /// Validate, chunk, and summarize one document.
    async fn summarize_document(
        &self,
        request: SummarizeRequest,
    ) -> Result<SummaryOutcome, PipelineError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl PipelineService {
    /// Build a pipeline with explicit collaborators.
    ///
    /// The model is an injected capability rather than shared global state so
    /// tests can substitute a scripted implementation.
    pub fn new(
        policy: DocumentPolicy,
        min_summarizable_words: usize,
        model_client: Box<dyn ModelClient + Send + Sync>,
        extractor: Box<dyn TextExtractor + Send + Sync>,
    ) -> Self {
        Self {
            policy,
            min_summarizable_words,
            model_client,
            extractor,
            metrics: Arc::new(SummaryMetrics::new()),
        }
    }

    /// Build a pipeline from the loaded configuration.
    pub fn from_config() -> Self {
        let config = get_config();
        tracing::info!(model = %config.model_name, "Initializing summarization pipeline");
        Self::new(
            config.document_policy(),
            config.min_summarizable_words,
            get_model_client(),
            Box::new(BinaryTextExtractor::new()),
        )
    }

    /// Run the pipeline over one document.
    ///
    /// All document-level failures are returned as [`PipelineError`]; per-chunk
    /// model failures are contained by the chunk summarizer and only show up as
    /// degraded fragments in the outcome.
    pub async fn summarize_document(
        &self,
        request: SummarizeRequest,
    ) -> Result<SummaryOutcome, PipelineError> {
        let SummarizeRequest {
            content,
            kind,
            is_encoded,
            chunk_length,
            overlap_length,
        } = request;

        if content.trim().is_empty() {
            return Err(PipelineError::NoContent);
        }
        if chunk_length == 0 {
            return Err(PipelineError::InvalidParameters);
        }

        let raw_text = self.resolve_text(content, kind, is_encoded)?;
        let text = normalize_whitespace(&raw_text);
        let word_count = count_words(&text);
        if word_count == 0 {
            return Err(PipelineError::NoContent);
        }
        self.validate_word_count(word_count)?;

        let chunks = chunk_text(&text, chunk_length, overlap_length);
        tracing::debug!(
            word_count,
            chunks = chunks.len(),
            chunk_length,
            overlap_length,
            "Document chunked"
        );

        let mut fragments = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let fragment = summarize_chunk(
                self.model_client.as_ref(),
                chunk,
                index,
                self.min_summarizable_words,
            )
            .await;
            fragments.push(fragment);
        }

        let degraded_chunks = fragments.iter().filter(|f| f.degraded).count();
        let summary = fragments
            .iter()
            .map(|fragment| fragment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        self.metrics
            .record_document(chunks.len() as u64, degraded_chunks as u64);
        tracing::info!(
            word_count,
            chunks = chunks.len(),
            degraded = degraded_chunks,
            "Document summarized"
        );

        Ok(SummaryOutcome {
            summary,
            word_count,
            chunk_count: chunks.len(),
            degraded_chunks,
        })
    }

    /// Return the current summarization metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn resolve_text(
        &self,
        content: String,
        kind: DocumentKind,
        is_encoded: bool,
    ) -> Result<String, PipelineError> {
        if kind.is_binary() && is_encoded {
            if !self.policy.binary_extraction {
                return Err(ExtractionError::Disabled.into());
            }
            let bytes = decode_base64(&content)?;
            let text = self.extractor.extract(&bytes, kind)?;
            tracing::debug!(
                format = kind.label(),
                bytes = bytes.len(),
                "Extracted binary document"
            );
            Ok(text)
        } else {
            Ok(content)
        }
    }

    fn validate_word_count(&self, word_count: usize) -> Result<(), PipelineError> {
        if word_count > self.policy.max_words {
            return Err(PipelineError::TooLong {
                word_count,
                limit: self.policy.max_words,
            });
        }
        if let Some(min_words) = self.policy.min_words {
            if word_count < min_words {
                return Err(PipelineError::TooShort {
                    word_count,
                    limit: min_words,
                });
            }
        }
        Ok(())
    }
}

/// Collapse whitespace runs to single spaces and trim the ends.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl SummarizeApi for PipelineService {
    async fn summarize_document(
        &self,
        request: SummarizeRequest,
    ) -> Result<SummaryOutcome, PipelineError> {
        PipelineService::summarize_document(self, request).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        PipelineService::metrics_snapshot(self)
    }
}
