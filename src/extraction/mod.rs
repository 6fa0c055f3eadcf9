//! Decoding and text extraction for binary document uploads.
//!
//! PDF and DOCX bodies arrive base64-encoded; this module turns them back into
//! plain text before the pipeline ever sees them. PDF extraction uses the
//! pure-Rust `pdf-extract` crate and works entirely from memory. DOCX files are
//! ZIP/XML containers parsed by `docx-rs`; text lives on the
//! paragraph → run → text path of its document tree.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// Document formats accepted by the summarization endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DocumentKind {
    /// Plain UTF-8 text; used verbatim.
    #[default]
    Txt,
    /// PDF container; requires base64 decoding and extraction.
    Pdf,
    /// DOCX container; requires base64 decoding and extraction.
    Docx,
}

impl DocumentKind {
    /// Whether this format needs the extraction step before chunking.
    pub fn is_binary(self) -> bool {
        !matches!(self, Self::Txt)
    }

    /// Short lowercase label used in logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(()),
        }
    }
}

/// Errors raised while decoding or extracting a binary document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Deployment policy does not accept binary uploads.
    #[error("Binary document extraction is disabled on this server")]
    Disabled,
    /// Request body was not valid base64.
    #[error("Failed to decode base64 content: {0}")]
    Decode(#[from] base64::DecodeError),
    /// Document bytes could not be parsed as the declared format.
    #[error("Failed to extract text from {format} document")]
    Parse {
        /// Declared document format.
        format: &'static str,
        /// Parser error, kept opaque across extraction backends.
        #[source]
        source: anyhow::Error,
    },
}

/// Interface implemented by binary text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from decoded document bytes.
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError>;
}

/// Decode a base64 request body into raw document bytes.
pub fn decode_base64(content: &str) -> Result<Vec<u8>, ExtractionError> {
    Ok(BASE64.decode(content.trim())?)
}

/// Extraction backend for the supported binary formats.
pub struct BinaryTextExtractor;

impl BinaryTextExtractor {
    /// Construct the default extractor.
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BinaryTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for BinaryTextExtractor {
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
        match kind {
            DocumentKind::Txt => Ok(String::from_utf8_lossy(bytes).into_owned()),
            DocumentKind::Pdf => pdf_to_text(bytes),
            DocumentKind::Docx => docx_to_text(bytes),
        }
    }
}

/// Extract text from an in-memory PDF body.
///
/// Extraction quality varies by PDF (text layer vs scanned images); scanned
/// documents come back empty and are rejected downstream as `NoContent`.
fn pdf_to_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|error| ExtractionError::Parse {
        format: "pdf",
        source: anyhow::anyhow!(error.to_string()),
    })
}

/// Extract text from an in-memory DOCX body.
///
/// Walks paragraph → run → text through the `docx-rs` tree, joining paragraphs
/// with newlines. Tables, images, and headers are skipped.
fn docx_to_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|error| ExtractionError::Parse {
        format: "docx",
        source: anyhow::anyhow!("{error:?}"),
    })?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            let text = paragraph_text(paragraph);
            if !text.trim().is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut parts: Vec<String> = Vec::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(text) = run_child {
                    parts.push(text.text.clone());
                }
            }
        }
    }
    // Runs are fragments of the same sentence, so no separator.
    parts.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_kind_parses_known_formats() {
        assert_eq!("txt".parse(), Ok(DocumentKind::Txt));
        assert_eq!("PDF".parse(), Ok(DocumentKind::Pdf));
        assert_eq!("docx".parse(), Ok(DocumentKind::Docx));
        assert_eq!("odt".parse::<DocumentKind>(), Err(()));
    }

    #[test]
    fn decode_base64_round_trips_text() {
        let encoded = BASE64.encode("hello world");
        let decoded = decode_base64(&encoded).expect("decode");
        assert_eq!(decoded, b"hello world");
    }

    #[test]
    fn decode_base64_rejects_invalid_input() {
        let error = decode_base64("not valid base64!!!").expect_err("invalid base64");
        assert!(matches!(error, ExtractionError::Decode(_)));
    }

    #[test]
    fn pdf_extraction_rejects_garbage_bytes() {
        let error = BinaryTextExtractor::new()
            .extract(b"definitely not a pdf", DocumentKind::Pdf)
            .expect_err("garbage pdf");
        assert!(matches!(error, ExtractionError::Parse { format: "pdf", .. }));
    }

    #[test]
    fn docx_extraction_rejects_garbage_bytes() {
        let error = BinaryTextExtractor::new()
            .extract(b"definitely not a docx", DocumentKind::Docx)
            .expect_err("garbage docx");
        assert!(matches!(
            error,
            ExtractionError::Parse {
                format: "docx",
                ..
            }
        ));
    }
}
