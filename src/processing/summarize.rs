//! Per-chunk summarization policy: adaptive length bounds and failure fallback.

use crate::model::{GenerationRequest, ModelClient};

use super::types::{Chunk, SummaryFragment};

/// Characters of chunk text substituted when the model fails.
const FALLBACK_PREFIX_CHARS: usize = 200;

/// Generation-length bounds for the model, in its own units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AdaptiveBounds {
    pub(crate) max_length: usize,
    pub(crate) min_length: usize,
}

/// Derive length bounds from the chunk's word count.
///
/// Longer chunks get proportionally longer allowed summaries, clamped so the
/// model never sees a degenerate budget.
pub(crate) fn adaptive_bounds(word_count: usize) -> AdaptiveBounds {
    let max_length = (word_count / 3).clamp(50, 150);
    let min_length = 30.min(max_length - 10);
    AdaptiveBounds {
        max_length,
        min_length,
    }
}

/// Summarize one chunk, never propagating a model failure.
///
/// Chunks at or below `min_summarizable_words` are passed through untouched;
/// they are already short enough to stand in for their own summary. A model
/// failure of any kind downgrades the fragment to the first
/// [`FALLBACK_PREFIX_CHARS`] characters of the chunk instead of failing the
/// request.
pub(crate) async fn summarize_chunk(
    model: &dyn ModelClient,
    chunk: &Chunk,
    index: usize,
    min_summarizable_words: usize,
) -> SummaryFragment {
    if chunk.word_count <= min_summarizable_words {
        return SummaryFragment {
            text: chunk.text.clone(),
            source_chunk: index,
            degraded: false,
        };
    }

    let bounds = adaptive_bounds(chunk.word_count);
    let request = GenerationRequest {
        text: chunk.text.clone(),
        max_length: bounds.max_length,
        min_length: bounds.min_length,
    };

    match model.generate(request).await {
        Ok(summary) => SummaryFragment {
            text: summary,
            source_chunk: index,
            degraded: false,
        },
        Err(error) => {
            tracing::warn!(
                chunk = index,
                words = chunk.word_count,
                error = %error,
                "Model failed for chunk; substituting truncated chunk text"
            );
            SummaryFragment {
                text: truncate_chars(&chunk.text, FALLBACK_PREFIX_CHARS),
                source_chunk: index,
                degraded: true,
            }
        }
    }
}

/// Take the first `max_chars` characters, respecting char boundaries.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}
