//! Sentence-aware chunking with word-count overlap.
//!
//! The summarization model only accepts a bounded input window, so documents are
//! split into chunks that respect a word budget without ever breaking a sentence.
//! Highlights:
//!
//! - Sentence alignment: a chunk closes when the next sentence would push it past
//!   `target_length`; a sentence longer than the whole budget still becomes its
//!   own chunk rather than being truncated or dropped.
//! - Overlap: the tail sentences of a closed chunk seed the next one so context
//!   survives across chunk boundaries. The tail is the longest contiguous suffix
//!   whose word count stays within the overlap budget, scanned greedily from the
//!   end.
//! - Sentence detection: UAX #29 sentence bounds via `unicode-segmentation`;
//!   callers can inject a different splitter for tests or other languages.

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use super::types::Chunk;

/// Sentence-boundary detector injected into the chunker.
pub(crate) type SentenceSplitter = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Default splitter backed by Unicode sentence segmentation.
///
/// Handles abbreviations, decimal numbers, and ellipses well enough for prose;
/// whitespace-only segments are dropped.
pub(crate) fn default_sentence_splitter() -> SentenceSplitter {
    Arc::new(|text: &str| {
        text.split_sentence_bounds()
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
}

/// Count whitespace-delimited words.
pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split `text` into sentence-aligned chunks of roughly `target_length` words,
/// carrying up to `overlap` words of trailing context into each new chunk.
///
/// Never fails: empty or whitespace-only input yields an empty vector, and every
/// produced chunk is non-empty. `target_length` must be validated as positive by
/// the caller.
pub(crate) fn chunk_text(text: &str, target_length: usize, overlap: usize) -> Vec<Chunk> {
    chunk_text_with_splitter(text, target_length, overlap, &default_sentence_splitter())
}

/// Lower-level chunker that accepts an explicit sentence splitter.
///
/// You likely want [`chunk_text`]; this helper exists for tests and for callers
/// that need custom sentence segmentation.
fn chunk_text_with_splitter(
    text: &str,
    target_length: usize,
    overlap: usize,
    splitter: &SentenceSplitter,
) -> Vec<Chunk> {
    debug_assert!(target_length > 0, "target_length must be positive");
    if text.trim().is_empty() {
        return Vec::new();
    }

    // Keep the carried-over tail strictly smaller than a full chunk so the
    // accumulator always has room for new sentences.
    let effective_overlap = overlap.min(target_length.saturating_sub(1));

    let sentences = splitter.as_ref()(text);
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut word_count = 0usize;

    for sentence in sentences {
        let words = count_words(&sentence);

        if word_count + words > target_length && !current.is_empty() {
            chunks.push(close_chunk(&current));
            current = overlap_tail(&current, effective_overlap);
            word_count = current.iter().map(|s| count_words(s)).sum();
        }

        current.push(sentence);
        word_count += words;
    }

    if !current.is_empty() {
        chunks.push(close_chunk(&current));
    }

    chunks
}

fn close_chunk(sentences: &[String]) -> Chunk {
    let text = sentences.join(" ");
    let word_count = count_words(&text);
    Chunk { text, word_count }
}

/// Collect the suffix of `sentences` whose total word count stays within
/// `overlap`, walking backward and stopping at the first sentence that would
/// exceed the budget.
fn overlap_tail(sentences: &[String], overlap: usize) -> Vec<String> {
    let mut tail: Vec<String> = Vec::new();
    let mut carried = 0usize;

    for sentence in sentences.iter().rev() {
        let words = count_words(sentence);
        if carried + words > overlap {
            break;
        }
        tail.push(sentence.clone());
        carried += words;
    }

    tail.reverse();
    tail
}
