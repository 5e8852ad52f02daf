//! Search form validation and defaults.

use std::num::IntErrorKind;

use bytes::Bytes;

use crate::errors::AppError;
use crate::providers::ProviderRegistry;
use crate::resume::is_pdf_filename;

pub const DEFAULT_LOCATION: &str = "India";
pub const DEFAULT_ROWS: u32 = 5;
pub const MIN_ROWS: u32 = 1;
pub const MAX_ROWS: u32 = 20;

pub const EMPTY_QUERY_NOTICE: &str = "Please enter a target role to search for jobs.";
pub const PDF_ONLY_NOTICE: &str = "Only PDF resumes are supported.";

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub bytes: Bytes,
}

/// Raw form fields as submitted.
#[derive(Debug, Default)]
pub struct SearchForm {
    pub query: Option<String>,
    pub location: Option<String>,
    pub rows: Option<String>,
    pub sources: Vec<String>,
    pub resume: Option<ResumeUpload>,
}

/// A search that passed validation, with every default applied.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub location: String,
    pub rows: u32,
    /// Requested provider ids in order. May include ids the registry doesn't know.
    pub sources: Vec<String>,
    pub resume: Option<ResumeUpload>,
}

impl SearchForm {
    pub fn validate(self, registry: &ProviderRegistry) -> Result<SearchRequest, AppError> {
        let query = self.query.as_deref().unwrap_or_default().trim().to_string();
        if query.is_empty() {
            return Err(AppError::Validation(EMPTY_QUERY_NOTICE.to_string()));
        }

        if let Some(resume) = &self.resume {
            if !is_pdf_filename(&resume.filename) {
                return Err(AppError::Validation(PDF_ONLY_NOTICE.to_string()));
            }
        }

        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();

        let mut sources: Vec<String> = self
            .sources
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if sources.is_empty() {
            sources = registry.ids();
        }

        Ok(SearchRequest {
            query,
            location,
            rows: parse_rows(self.rows.as_deref()),
            sources,
            resume: self.resume,
        })
    }
}

/// Parses the row-count hint, clamped to [MIN_ROWS, MAX_ROWS]. Integers too
/// large for `i64` saturate; anything else unparseable falls back to
/// DEFAULT_ROWS.
pub fn parse_rows(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_ROWS;
    };
    let rows = match raw.trim().parse::<i64>() {
        Ok(rows) => rows,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => return DEFAULT_ROWS,
        },
    };
    rows.clamp(MIN_ROWS as i64, MAX_ROWS as i64) as u32
}
