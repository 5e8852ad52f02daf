use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use crate::models::job::RawJobRecord;
use crate::providers::{demo, with_fallback, JobProvider};

const SITE_NAME: &str = "Workday";
const SITE_HOST: &str = "https://workday.wd5.myworkdayjobs.com";
const SITE_BASE: &str = "https://workday.wd5.myworkdayjobs.com/Workday";
const SITE_API: &str = "https://workday.wd5.myworkdayjobs.com/wday/cxs/workday/Workday/jobs";

/// Queries Workday's own career-site job search API.
pub struct WorkdayProvider {
    client: Client,
    demo_fallback: bool,
}

impl WorkdayProvider {
    pub fn new(client: Client, demo_fallback: bool) -> Self {
        Self {
            client,
            demo_fallback,
        }
    }

    async fn search(&self, query: &str, rows: u32) -> Result<Vec<RawJobRecord>> {
        info!("Querying Workday careers API for '{}'", query);

        let payload = json!({
            "appliedFacets": {},
            "limit": rows,
            "offset": 0,
            "searchText": query,
        });

        let response = self
            .client
            .post(SITE_API)
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to reach Workday careers API")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("Workday returned a non-JSON body")?;

        Ok(parse_postings(&body, rows))
    }
}

#[async_trait]
impl JobProvider for WorkdayProvider {
    fn id(&self) -> &str {
        "workday"
    }

    async fn fetch(&self, query: &str, location: &str, rows: u32) -> Result<Vec<RawJobRecord>> {
        let outcome = self.search(query, rows).await;
        with_fallback("Workday", outcome, self.demo_fallback, || {
            demo::workday_listings(query, location, rows)
        })
    }
}

/// Maps the `jobPostings` array of a Workday search response to raw records.
/// A body without postings yields no records.
pub fn parse_postings(body: &Value, rows: u32) -> Vec<RawJobRecord> {
    let Some(postings) = body.get("jobPostings").and_then(Value::as_array) else {
        return Vec::new();
    };

    postings
        .iter()
        .filter(|p| p.is_object())
        .take(rows as usize)
        .filter_map(|posting| {
            let title = posting
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("Job Opening");
            let location = posting
                .get("locationsText")
                .and_then(Value::as_str)
                .unwrap_or("Remote");

            match json!({
                "title": title,
                "company": SITE_NAME,
                "location": location,
                "url": posting_url(posting),
                "description": format!("Career opportunity at {SITE_NAME}"),
                "source": SITE_NAME,
            }) {
                Value::Object(map) => Some(map),
                _ => None,
            }
        })
        .collect()
}

fn posting_url(posting: &Value) -> String {
    let external_path = posting
        .get("externalPath")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if external_path.starts_with("/Workday") {
        format!("{SITE_HOST}{external_path}")
    } else if !external_path.is_empty() {
        format!("{SITE_BASE}{external_path}")
    } else {
        let job_id = posting
            .get("bulletFields")
            .and_then(Value::as_array)
            .and_then(|fields| fields.first())
            .and_then(Value::as_str)
            .unwrap_or("job");
        format!("{SITE_BASE}/job/{job_id}")
    }
}
