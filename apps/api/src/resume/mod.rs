//! Résumé handling: text extraction from uploads and LLM summaries.
//! Résumé text lives only for the duration of one request.

pub mod prompts;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::{LlmError, TextCompleter};
use crate::resume::prompts::{SUMMARY_PROMPT_PREFIX, SUMMARY_SYSTEM};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{0}")]
    Pdf(String),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Converts an uploaded document into plain text.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError>;
}

/// Extracts text from PDF bytes. Parsing runs on the blocking pool.
pub struct PdfExtractor;

#[async_trait]
impl ResumeExtractor for PdfExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&document).map_err(|e| ExtractionError::Pdf(e.to_string()))
        })
        .await??;

        debug!("Extracted {} characters from PDF", text.chars().count());
        Ok(text)
    }
}

/// Only PDF uploads are accepted.
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

/// Summarizes a résumé into skill and role-keyword bullets.
pub async fn summarize_resume(
    resume_text: &str,
    llm: &dyn TextCompleter,
) -> Result<String, LlmError> {
    let prompt = format!("{SUMMARY_PROMPT_PREFIX}{resume_text}");
    llm.complete(&prompt, SUMMARY_SYSTEM).await
}
