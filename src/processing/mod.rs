//! Document summarization pipeline: chunking, per-chunk summarization, and merge.

pub mod chunking;
mod service;
mod summarize;
pub mod types;

pub use service::{PipelineService, SummarizeApi};
pub use types::{
    Chunk, DocumentPolicy, PipelineError, SummarizeRequest, SummaryFragment, SummaryOutcome,
};
