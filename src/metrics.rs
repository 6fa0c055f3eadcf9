use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    documents_summarized: AtomicU64,
    chunks_summarized: AtomicU64,
    degraded_chunks: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summarized document, its chunk count, and how many chunks fell back.
    pub fn record_document(&self, chunk_count: u64, degraded: u64) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.chunks_summarized
            .fetch_add(chunk_count, Ordering::Relaxed);
        self.degraded_chunks.fetch_add(degraded, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            degraded_chunks: self.degraded_chunks.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Number of documents summarized since startup.
    pub documents_summarized: u64,
    /// Total chunk count produced across all summarized documents.
    pub chunks_summarized: u64,
    /// Chunks whose summary came from the fallback rule rather than the model.
    pub degraded_chunks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_documents_and_chunks() {
        let metrics = SummaryMetrics::new();
        metrics.record_document(2, 0);
        metrics.record_document(3, 1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_summarized, 2);
        assert_eq!(snapshot.chunks_summarized, 5);
        assert_eq!(snapshot.degraded_chunks, 1);
    }

    #[test]
    fn snapshot_starts_at_zero() {
        let metrics = SummaryMetrics::new();
        assert_eq!(metrics.snapshot().documents_summarized, 0);
        assert_eq!(metrics.snapshot().chunks_summarized, 0);
        assert_eq!(metrics.snapshot().degraded_chunks, 0);
    }
}
