//! Search workflow: résumé extraction and summary, provider aggregation, then
//! résumé matching over the merged list.
//!
//! Only validation (done before this runs) can reject a search. Every other
//! failure degrades the response and is reported in `errors`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::jobs::aggregator::{aggregate, SearchQuery};
use crate::matching::orchestrator::{score_jobs, MATCH_CAP};
use crate::models::job::CanonicalJob;
use crate::resume::summarize_resume;
use crate::search::form::SearchRequest;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub search_id: Uuid,
    pub searched_at: DateTime<Utc>,
    pub query: String,
    pub location: String,
    pub jobs: Vec<CanonicalJob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_summary: Option<String>,
    /// Human-readable, non-fatal diagnostics in the order they occurred.
    pub errors: Vec<String>,
    /// Number of jobs carrying match data.
    pub matched: usize,
}

pub async fn run_search(state: &AppState, request: SearchRequest) -> SearchResponse {
    run_search_with_id(state, request, Uuid::new_v4()).await
}

#[instrument(skip_all, fields(search_id = %search_id, query = %request.query))]
async fn run_search_with_id(
    state: &AppState,
    request: SearchRequest,
    search_id: Uuid,
) -> SearchResponse {
    let mut errors = Vec::new();

    let resume_text = match &request.resume {
        Some(upload) => match state.extractor.extract(upload.bytes.clone()).await {
            Ok(text) => text,
            Err(e) => {
                warn!("PDF extraction failed for '{}': {e}", upload.filename);
                errors.push(format!("PDF extraction failed: {e}"));
                String::new()
            }
        },
        None => String::new(),
    };
    let has_resume = !resume_text.trim().is_empty();

    let summary = async {
        if has_resume {
            Some(summarize_resume(&resume_text, state.llm.as_ref()).await)
        } else {
            None
        }
    };
    let aggregation = aggregate(
        SearchQuery {
            query: &request.query,
            location: &request.location,
            rows: request.rows,
        },
        &request.sources,
        &state.providers,
        Duration::from_secs(state.config.provider_timeout_secs),
    );
    let (summary, aggregation) = tokio::join!(summary, aggregation);

    let resume_summary = match summary {
        Some(Ok(text)) => Some(text),
        Some(Err(e)) => {
            warn!("Resume summary failed: {e}");
            errors.push(format!("Resume summary failed: {e}"));
            None
        }
        None => None,
    };

    errors.extend(aggregation.errors.iter().map(ToString::to_string));
    let mut jobs = aggregation.jobs;

    let matched = if has_resume && !jobs.is_empty() {
        score_jobs(
            &mut jobs,
            &resume_text,
            state.matcher.as_ref(),
            MATCH_CAP,
            state.config.match_concurrency,
        )
        .await
    } else {
        0
    };

    info!(
        "Search complete: {} jobs, {} matched, {} diagnostics",
        jobs.len(),
        matched,
        errors.len()
    );

    SearchResponse {
        search_id,
        searched_at: Utc::now(),
        query: request.query,
        location: request.location,
        jobs,
        resume_summary,
        errors,
        matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderRegistry;
    use crate::search::form::ResumeUpload;
    use crate::search::testing::{test_state, FakeCompleter, FakeMatcher, FakeProvider};
    use bytes::Bytes;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn request(sources: &[&str], resume: Option<&'static str>) -> SearchRequest {
        SearchRequest {
            query: "Data Analyst".into(),
            location: "India".into(),
            rows: 5,
            sources: sources.iter().map(|s| s.to_string()).collect(),
            resume: resume.map(|text| ResumeUpload {
                filename: "cv.pdf".into(),
                bytes: Bytes::from_static(text.as_bytes()),
            }),
        }
    }

    fn many_jobs(n: usize) -> Vec<serde_json::Value> {
        (0..n).map(|i| json!({ "title": format!("Job {i}") })).collect()
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_search_future_is_send() {
        let providers = ProviderRegistry::new()
            .with(Arc::new(FakeProvider::new("linkedin", many_jobs(1))));
        let state = test_state(
            providers,
            Arc::new(FakeCompleter::new(false)),
            Arc::new(FakeMatcher::new()),
        );
        let future = run_search(&state, request(&["linkedin"], Some("SQL")));
        assert_send(&future);
    }

    #[tokio::test]
    async fn test_search_without_resume_skips_llm() {
        let llm = Arc::new(FakeCompleter::new(false));
        let matcher = Arc::new(FakeMatcher::new());
        let providers = ProviderRegistry::new()
            .with(Arc::new(FakeProvider::new("linkedin", many_jobs(3))));
        let state = test_state(providers, llm.clone(), matcher.clone());

        let response = run_search(&state, request(&["linkedin"], None)).await;

        assert_eq!(response.jobs.len(), 3);
        assert!(response.resume_summary.is_none());
        assert!(response.errors.is_empty());
        assert_eq!(response.matched, 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
        assert_eq!(matcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_with_resume_summarizes_and_matches_capped_prefix() {
        let llm = Arc::new(FakeCompleter::new(false));
        let matcher = Arc::new(FakeMatcher::new());
        let providers = ProviderRegistry::new()
            .with(Arc::new(FakeProvider::new("linkedin", many_jobs(12))))
            .with(Arc::new(FakeProvider::new("workday", many_jobs(8))));
        let state = test_state(providers, llm, matcher.clone());

        let response =
            run_search(&state, request(&["linkedin", "workday"], Some("SQL, Python"))).await;

        assert_eq!(response.jobs.len(), 20);
        assert_eq!(response.resume_summary.as_deref(), Some("- SQL\n- Python"));
        assert_eq!(response.matched, 15);
        assert!(response.jobs[..15].iter().all(|j| j.match_score == Some(70)));
        assert!(response.jobs[15..].iter().all(|j| j.match_score.is_none()));
        assert_eq!(response.jobs[12].source, "Workday");
    }

    #[tokio::test]
    async fn test_extraction_failure_still_searches() {
        let llm = Arc::new(FakeCompleter::new(false));
        let matcher = Arc::new(FakeMatcher::new());
        let providers = ProviderRegistry::new()
            .with(Arc::new(FakeProvider::new("linkedin", many_jobs(2))));
        let state = test_state(providers, llm.clone(), matcher.clone());

        let response = run_search(&state, request(&["linkedin"], Some("broken"))).await;

        assert_eq!(response.jobs.len(), 2);
        assert_eq!(
            response.errors,
            vec!["PDF extraction failed: Invalid file header"]
        );
        assert!(response.resume_summary.is_none());
        assert_eq!(response.matched, 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_resume_text_skips_summary_and_matching() {
        let llm = Arc::new(FakeCompleter::new(false));
        let matcher = Arc::new(FakeMatcher::new());
        let providers = ProviderRegistry::new()
            .with(Arc::new(FakeProvider::new("linkedin", many_jobs(2))));
        let state = test_state(providers, llm.clone(), matcher.clone());

        let response = run_search(&state, request(&["linkedin"], Some("  \n "))).await;

        assert!(response.errors.is_empty());
        assert_eq!(response.matched, 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_summary_failure_is_reported_not_fatal() {
        let llm = Arc::new(FakeCompleter::new(true));
        let matcher = Arc::new(FakeMatcher::new());
        let providers = ProviderRegistry::new()
            .with(Arc::new(FakeProvider::new("linkedin", many_jobs(2))));
        let state = test_state(providers, llm, matcher);

        let response = run_search(&state, request(&["linkedin"], Some("SQL"))).await;

        assert!(response.resume_summary.is_none());
        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].starts_with("Resume summary failed:"));
        assert_eq!(response.matched, 2);
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported_after_resume_diagnostics() {
        let llm = Arc::new(FakeCompleter::new(true));
        let matcher = Arc::new(FakeMatcher::new());
        let providers = ProviderRegistry::new()
            .with(Arc::new(FakeProvider::failing("linkedin")))
            .with(Arc::new(FakeProvider::new("workday", many_jobs(1))));
        let state = test_state(providers, llm, matcher);

        let response =
            run_search(&state, request(&["linkedin", "workday"], Some("SQL"))).await;

        assert_eq!(response.jobs.len(), 1);
        assert_eq!(response.errors.len(), 2);
        assert!(response.errors[0].starts_with("Resume summary failed:"));
        assert_eq!(response.errors[1], "Linkedin search failed: site unreachable");
    }

    #[tokio::test]
    async fn test_response_serializes_without_absent_fields() {
        let llm = Arc::new(FakeCompleter::new(false));
        let matcher = Arc::new(FakeMatcher::new());
        let providers = ProviderRegistry::new()
            .with(Arc::new(FakeProvider::new("linkedin", vec![json!({"title": "DA"})])));
        let state = test_state(providers, llm, matcher);

        let response = run_search(&state, request(&["linkedin"], None)).await;
        let body = serde_json::to_value(&response).unwrap();

        assert!(body.get("resume_summary").is_none());
        let job = &body["jobs"][0];
        assert_eq!(job["title"], "DA");
        assert!(job.get("url").is_none());
        assert!(job.get("match_score").is_none());
        assert!(job.get("match_tips").is_none());
    }
}
