use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};
use tracing::info;

use crate::models::job::RawJobRecord;
use crate::providers::{demo, with_fallback, JobProvider};

const SEARCH_URL: &str = "https://www.linkedin.com/jobs/search";

/// Scrapes LinkedIn's public job search page.
pub struct LinkedInProvider {
    client: Client,
    demo_fallback: bool,
}

impl LinkedInProvider {
    pub fn new(client: Client, demo_fallback: bool) -> Self {
        Self {
            client,
            demo_fallback,
        }
    }

    async fn scrape(&self, query: &str, location: &str, rows: u32) -> Result<Vec<RawJobRecord>> {
        info!("Fetching LinkedIn search page for '{}' in {}", query, location);

        let count = rows.to_string();
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("keywords", query),
                ("location", location),
                ("start", "0"),
                ("count", count.as_str()),
            ])
            .send()
            .await
            .context("Failed to fetch LinkedIn search page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let html = response
            .text()
            .await
            .context("Failed to read LinkedIn response body")?;

        parse_search_page(&html, location, rows)
    }
}

#[async_trait]
impl JobProvider for LinkedInProvider {
    fn id(&self) -> &str {
        "linkedin"
    }

    async fn fetch(&self, query: &str, location: &str, rows: u32) -> Result<Vec<RawJobRecord>> {
        let outcome = self.scrape(query, location, rows).await;
        with_fallback("LinkedIn", outcome, self.demo_fallback, || {
            demo::linkedin_listings(query, location, rows)
        })
    }
}

/// Extracts up to `rows` job cards from a LinkedIn search results page.
/// Cards with masked titles are skipped.
pub fn parse_search_page(html: &str, location: &str, rows: u32) -> Result<Vec<RawJobRecord>> {
    let card = selector("div.base-card")?;
    let title = selector("h3.base-search-card__title")?;
    let company = selector("h4.base-search-card__subtitle")?;
    let card_location = selector("span.job-search-card__location")?;
    let link = selector("a.base-card__full-link")?;

    let document = Html::parse_document(html);
    let mut jobs = Vec::new();

    for element in document.select(&card).take(rows as usize) {
        let title_text = first_text(&element, &title).unwrap_or_else(|| "Untitled".to_string());
        if title_text.contains("***") {
            continue;
        }

        let url = element
            .select(&link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| Value::String(href.to_string()))
            .unwrap_or(Value::Null);

        let record = json!({
            "title": title_text,
            "company": first_text(&element, &company).unwrap_or_else(|| "Company N/A".to_string()),
            "location": first_text(&element, &card_location).unwrap_or_else(|| location.to_string()),
            "url": url,
            "description": "",
            "source": "LinkedIn",
        });

        if let Value::Object(map) = record {
            jobs.push(map);
        }
    }

    Ok(jobs)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector '{css}': {e:?}"))
}

fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| clean_text(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
