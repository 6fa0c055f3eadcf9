use crate::processing::DocumentPolicy;
use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the notesum server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the inference server hosting the summarization model.
    pub model_url: String,
    /// Model identifier passed along with generation requests.
    pub model_name: String,
    /// Upper bound on accepted document word count.
    pub max_document_words: usize,
    /// Lower bound on accepted document word count; `None` disables it.
    pub min_document_words: Option<usize>,
    /// Chunks at or below this word count skip the model entirely.
    pub min_summarizable_words: usize,
    /// Whether base64-encoded PDF/DOCX uploads are accepted.
    pub binary_extraction: bool,
    /// Chunk word budget applied when a request omits `chunkLength`.
    pub default_chunk_length: usize,
    /// Overlap word budget applied when a request omits `overlapLength`.
    pub default_overlap_length: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            model_url: load_env("SUMMARIZER_MODEL_URL")?,
            model_name: load_env("SUMMARIZER_MODEL")?,
            max_document_words: parse_env_or("MAX_DOCUMENT_WORDS", 10_000)?,
            // A zero lower bound means "no lower bound" so the strict
            // deployment can disable the check without a second variable.
            min_document_words: match parse_env_or("MIN_DOCUMENT_WORDS", 10)? {
                0 => None,
                words => Some(words),
            },
            min_summarizable_words: parse_env_or("MIN_SUMMARIZABLE_WORDS", 50)?,
            binary_extraction: parse_env_or("BINARY_EXTRACTION", true)?,
            default_chunk_length: parse_env_or("DEFAULT_CHUNK_LENGTH", 500)?,
            default_overlap_length: parse_env_or("DEFAULT_OVERLAP_LENGTH", 50)?,
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }

    /// Document acceptance policy derived from the loaded bounds.
    pub fn document_policy(&self) -> DocumentPolicy {
        DocumentPolicy {
            max_words: self.max_document_words,
            min_words: self.min_document_words,
            binary_extraction: self.binary_extraction,
        }
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
        .map(|parsed| parsed.unwrap_or(default))
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        model_url = %config.model_url,
        model = %config.model_name,
        max_words = config.max_document_words,
        min_words = ?config.min_document_words,
        binary_extraction = config.binary_extraction,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
