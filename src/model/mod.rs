//! Abstractions for the external abstractive-summarization model.
//!
//! The pipeline treats the model as a black box: a text span plus generation-length
//! bounds goes in, a summary string comes out, and any failure is contained by the
//! caller. The HTTP adapter targets a BART-style inference server and mirrors the
//! request shape of the `transformers` summarization pipeline.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced while attempting chunk summarization.
#[derive(Debug, Error)]
pub enum ModelClientError {
    /// Inference server was unreachable or the endpoint is missing.
    #[error("Summarization model unavailable: {0}")]
    ProviderUnavailable(String),
    /// Inference server returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Inference server response could not be parsed.
    #[error("Malformed model response: {0}")]
    InvalidResponse(String),
}

/// Generation request passed to the summarization model.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Chunk text to summarize.
    pub text: String,
    /// Upper bound on generated length, in the model's own units.
    pub max_length: usize,
    /// Lower bound on generated length, in the model's own units.
    pub min_length: usize,
}

/// Interface implemented by summarization model backends.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generate a summary for one chunk, requesting deterministic output.
    async fn generate(&self, request: GenerationRequest) -> Result<String, ModelClientError>;
}

/// Build a model client for the configured inference server.
pub fn get_model_client() -> Box<dyn ModelClient + Send + Sync> {
    let config = get_config();
    Box::new(HttpModelClient::new(
        config.model_url.clone(),
        config.model_name.clone(),
    ))
}

/// HTTP adapter for a BART-style summarization server.
pub struct HttpModelClient {
    http: Client,
    base_url: String,
    model: String,
}

impl HttpModelClient {
    /// Create a client targeting `base_url` with the given model identifier.
    pub fn new(base_url: String, model: String) -> Self {
        let http = Client::builder()
            .user_agent("notesum/model")
            .build()
            .expect("Failed to construct reqwest::Client for summarization");
        Self {
            http,
            base_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/summarize", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    summary_text: String,
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, ModelClientError> {
        let payload = json!({
            "model": self.model,
            "text": request.text,
            "max_length": request.max_length,
            "min_length": request.min_length,
            // Sampling off so repeated requests produce identical summaries.
            "do_sample": false,
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                ModelClientError::ProviderUnavailable(format!(
                    "failed to reach inference server at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ModelClientError::ProviderUnavailable(format!(
                "inference endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelClientError::GenerationFailed(format!(
                "inference server returned {status}: {body}"
            )));
        }

        let body: InferenceResponse = response.json().await.map_err(|error| {
            ModelClientError::InvalidResponse(format!(
                "failed to decode inference response: {error}"
            ))
        })?;

        let summary = body.summary_text.trim().to_string();
        if summary.is_empty() {
            return Err(ModelClientError::InvalidResponse(
                "inference server returned an empty summary".into(),
            ));
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn test_client(base_url: String) -> HttpModelClient {
        HttpModelClient {
            http: Client::builder()
                .user_agent("notesum-test")
                .build()
                .expect("client"),
            base_url,
            model: "facebook/bart-large-cnn".into(),
        }
    }

    #[tokio::test]
    async fn http_client_handles_successful_response() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/summarize");
                then.status(200)
                    .json_body(json!({ "summary_text": "Summary text" }));
            })
            .await;

        let summary = client
            .generate(GenerationRequest {
                text: "A long chunk of text.".into(),
                max_length: 150,
                min_length: 30,
            })
            .await
            .expect("summary");

        mock.assert();
        assert_eq!(summary, "Summary text");
    }

    #[tokio::test]
    async fn http_client_handles_error_status() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/summarize");
                then.status(500).body("boom");
            })
            .await;

        let error = client
            .generate(GenerationRequest {
                text: "A long chunk of text.".into(),
                max_length: 150,
                min_length: 30,
            })
            .await
            .expect_err("error response");

        assert!(
            matches!(error, ModelClientError::GenerationFailed(message) if message.contains("500"))
        );
    }

    #[tokio::test]
    async fn http_client_rejects_empty_summary() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/summarize");
                then.status(200).json_body(json!({ "summary_text": "  " }));
            })
            .await;

        let error = client
            .generate(GenerationRequest {
                text: "A long chunk of text.".into(),
                max_length: 150,
                min_length: 30,
            })
            .await
            .expect_err("empty summary rejected");

        assert!(matches!(error, ModelClientError::InvalidResponse(_)));
    }
}
