//! Axum route handlers for the Search API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::providers::ProviderInfo;
use crate::search::form::{
    ResumeUpload, SearchForm, DEFAULT_LOCATION, DEFAULT_ROWS, MAX_ROWS, MIN_ROWS,
};
use crate::search::service::{run_search, SearchResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchOptionsResponse {
    pub location: &'static str,
    pub rows: u32,
    pub min_rows: u32,
    pub max_rows: u32,
    pub sources: Vec<ProviderInfo>,
}

/// GET /api/v1/search/options
///
/// Defaults and choices for the search form.
pub async fn handle_search_options(State(state): State<AppState>) -> Json<SearchOptionsResponse> {
    Json(SearchOptionsResponse {
        location: DEFAULT_LOCATION,
        rows: DEFAULT_ROWS,
        min_rows: MIN_ROWS,
        max_rows: MAX_ROWS,
        sources: state.providers.info(),
    })
}

/// POST /api/v1/search
///
/// Multipart form: `query`, `location`, `rows`, repeated `sources`, optional
/// `resume` PDF. A blank query is rejected before any provider is called.
pub async fn handle_search(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SearchResponse>, AppError> {
    let form = read_search_form(&mut multipart).await?;
    let request = form.validate(&state.providers)?;
    Ok(Json(run_search(&state, request).await))
}

async fn read_search_form(multipart: &mut Multipart) -> Result<SearchForm, AppError> {
    let mut form = SearchForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "query" => form.query = Some(field.text().await?),
            "location" => form.location = Some(field.text().await?),
            "rows" => form.rows = Some(field.text().await?),
            "sources" => form.sources.push(field.text().await?),
            "resume" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty, unnamed part when no file was chosen.
                if !filename.is_empty() {
                    form.resume = Some(ResumeUpload { filename, bytes });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}
