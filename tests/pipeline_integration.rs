//! End-to-end pipeline scenarios driven with a scripted model client.

use async_trait::async_trait;
use notesum::extraction::{BinaryTextExtractor, DocumentKind, ExtractionError};
use notesum::model::{GenerationRequest, ModelClient, ModelClientError};
use notesum::processing::{DocumentPolicy, PipelineError, PipelineService, SummarizeRequest};
use std::sync::{Arc, Mutex};

/// Model stand-in that fails whenever the request text contains the marker.
struct ScriptedModel {
    fail_marker: Option<&'static str>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedModel {
    fn succeeding() -> Self {
        Self {
            fail_marker: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing_on(marker: &'static str) -> Self {
        Self {
            fail_marker: Some(marker),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn requests_handle(&self) -> Arc<Mutex<Vec<GenerationRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn generate(&self, request: GenerationRequest) -> Result<String, ModelClientError> {
        let should_fail = self
            .fail_marker
            .is_some_and(|marker| request.text.contains(marker));
        let index = {
            let mut guard = self.requests.lock().expect("requests lock");
            guard.push(request);
            guard.len()
        };
        if should_fail {
            Err(ModelClientError::GenerationFailed("scripted failure".into()))
        } else {
            Ok(format!("[summary {index}]"))
        }
    }
}

fn pipeline(policy: DocumentPolicy, model: ScriptedModel) -> PipelineService {
    PipelineService::new(
        policy,
        50,
        Box::new(model),
        Box::new(BinaryTextExtractor::new()),
    )
}

fn text_request(
    content: impl Into<String>,
    chunk_length: usize,
    overlap: usize,
) -> SummarizeRequest {
    SummarizeRequest {
        content: content.into(),
        kind: DocumentKind::Txt,
        is_encoded: false,
        chunk_length,
        overlap_length: overlap,
    }
}

/// Sentence of exactly 20 words ending in a period, tagged for traceability.
///
/// The first word is capitalized so UAX #29 recognizes the boundary after the
/// preceding sentence's period.
fn sentence(tag: &str) -> String {
    let capitalized = {
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    };
    let mut words = vec![format!("{capitalized}01")];
    words.extend((2..20).map(|idx| format!("{tag}{idx:02}")));
    words.push(format!("{tag}end."));
    words.join(" ")
}

#[tokio::test]
async fn short_document_passes_through_without_the_model() {
    let model = ScriptedModel::succeeding();
    let requests = model.requests_handle();
    let service = pipeline(DocumentPolicy::extended(), model);

    // Two 20-word sentences, 40 words total: below the 50-word skip threshold,
    // so the chunk text itself is the summary and the model is never consulted.
    let content = format!("  {}   \n\t {} ", sentence("aaa"), sentence("bbb"));
    let normalized = format!("{} {}", sentence("aaa"), sentence("bbb"));

    let outcome = service
        .summarize_document(text_request(content, 500, 50))
        .await
        .expect("outcome");

    assert_eq!(outcome.chunk_count, 1);
    assert_eq!(outcome.word_count, 40);
    assert_eq!(outcome.summary, normalized);
    assert_eq!(outcome.degraded_chunks, 0);
    assert!(requests.lock().expect("requests lock").is_empty());
}

#[tokio::test]
async fn failing_chunk_degrades_without_failing_the_request() {
    let model = ScriptedModel::failing_on("failme");
    let service = pipeline(DocumentPolicy::extended(), model);

    // Twelve 20-word sentences at 80 words per chunk and no overlap form three
    // chunks of four sentences each; the marker lands in the middle chunk.
    let tags = [
        "aa", "ab", "ac", "ad", "ba", "failme", "bc", "bd", "ca", "cb", "cc", "cd",
    ];
    let sentences: Vec<String> = tags.iter().map(|tag| sentence(tag)).collect();
    let content = sentences.join(" ");
    let middle_chunk = sentences[4..8].join(" ");

    let outcome = service
        .summarize_document(text_request(content, 80, 0))
        .await
        .expect("outcome");

    assert_eq!(outcome.chunk_count, 3);
    assert_eq!(outcome.degraded_chunks, 1);

    let fallback: String = middle_chunk.chars().take(200).collect();
    let fragments: Vec<&str> = vec!["[summary 1]", &fallback, "[summary 3]"];
    assert_eq!(outcome.summary, fragments.join(" "));
}

#[tokio::test]
async fn adaptive_bounds_follow_chunk_word_count() {
    let model = ScriptedModel::succeeding();
    let requests = model.requests_handle();
    let service = pipeline(DocumentPolicy::extended(), model);

    // One 2001-word run with no sentence breaks stays a single chunk even though
    // it dwarfs the chunk budget; its bounds hit the 150-token ceiling.
    let content = (0..2001)
        .map(|idx| format!("w{idx}"))
        .collect::<Vec<_>>()
        .join(" ");
    let outcome = service
        .summarize_document(text_request(content, 500, 50))
        .await
        .expect("outcome");

    assert_eq!(outcome.chunk_count, 1);
    assert_eq!(outcome.word_count, 2001);
    assert_eq!(outcome.degraded_chunks, 0);

    let recorded = requests.lock().expect("requests lock");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].max_length, 150);
    assert_eq!(recorded[0].min_length, 30);
}

#[tokio::test]
async fn word_limits_differ_between_policies() {
    let content = (0..2001)
        .map(|idx| format!("w{idx}"))
        .collect::<Vec<_>>()
        .join(" ");

    let strict = pipeline(DocumentPolicy::strict(), ScriptedModel::succeeding());
    let error = strict
        .summarize_document(text_request(content.clone(), 500, 50))
        .await
        .expect_err("strict limit");
    assert!(matches!(
        error,
        PipelineError::TooLong {
            word_count: 2001,
            limit: 2000
        }
    ));

    let extended = pipeline(DocumentPolicy::extended(), ScriptedModel::succeeding());
    let outcome = extended
        .summarize_document(text_request(content, 500, 50))
        .await
        .expect("extended limit");
    assert_eq!(outcome.word_count, 2001);
}

#[tokio::test]
async fn minimum_word_floor_applies_only_when_configured() {
    let content = "one two three four five six seven eight nine";

    let extended = pipeline(DocumentPolicy::extended(), ScriptedModel::succeeding());
    let error = extended
        .summarize_document(text_request(content, 500, 50))
        .await
        .expect_err("below minimum");
    assert!(matches!(
        error,
        PipelineError::TooShort {
            word_count: 9,
            limit: 10
        }
    ));

    // The strict policy has no floor; nine words pass straight through.
    let strict = pipeline(DocumentPolicy::strict(), ScriptedModel::succeeding());
    let outcome = strict
        .summarize_document(text_request(content, 500, 50))
        .await
        .expect("no floor");
    assert_eq!(outcome.summary, content);
    assert_eq!(outcome.chunk_count, 1);
}

#[tokio::test]
async fn empty_and_zero_length_requests_are_rejected() {
    let service = pipeline(DocumentPolicy::extended(), ScriptedModel::succeeding());

    let error = service
        .summarize_document(text_request("   ", 500, 50))
        .await
        .expect_err("empty content");
    assert!(matches!(error, PipelineError::NoContent));

    let error = service
        .summarize_document(text_request(
            "some words here and more words here too",
            0,
            50,
        ))
        .await
        .expect_err("zero chunk length");
    assert!(matches!(error, PipelineError::InvalidParameters));
}

#[tokio::test]
async fn binary_uploads_respect_policy_and_encoding() {
    let strict = pipeline(DocumentPolicy::strict(), ScriptedModel::succeeding());
    let error = strict
        .summarize_document(SummarizeRequest {
            content: "aGVsbG8=".into(),
            kind: DocumentKind::Pdf,
            is_encoded: true,
            chunk_length: 500,
            overlap_length: 50,
        })
        .await
        .expect_err("binary disabled");
    assert!(matches!(
        error,
        PipelineError::Extraction(ExtractionError::Disabled)
    ));

    let extended = pipeline(DocumentPolicy::extended(), ScriptedModel::succeeding());
    let error = extended
        .summarize_document(SummarizeRequest {
            content: "definitely %% not base64 !!".into(),
            kind: DocumentKind::Pdf,
            is_encoded: true,
            chunk_length: 500,
            overlap_length: 50,
        })
        .await
        .expect_err("bad base64");
    assert!(matches!(
        error,
        PipelineError::Extraction(ExtractionError::Decode(_))
    ));
}

#[tokio::test]
async fn every_chunk_failing_still_produces_a_summary() {
    // A marker in every sentence makes every model call fail; the request must
    // still succeed, with every fragment degraded to truncated chunk text.
    let model = ScriptedModel::failing_on("xx");
    let service = pipeline(DocumentPolicy::extended(), model);

    // Six 20-word sentences at 60 words per chunk: two chunks of 60 words, both
    // above the 50-word skip threshold.
    let sentences: Vec<String> = (0..6).map(|_| sentence("xx")).collect();
    let content = sentences.join(" ");

    let outcome = service
        .summarize_document(text_request(content, 60, 0))
        .await
        .expect("outcome");

    assert_eq!(outcome.chunk_count, 2);
    assert_eq!(outcome.degraded_chunks, 2);

    let chunk_text = sentences[0..3].join(" ");
    let fallback: String = chunk_text.chars().take(200).collect();
    assert_eq!(outcome.summary, format!("{fallback} {fallback}"));
}
