//! Synthetic listings served in demo mode when a live provider comes back empty
//! or fails.

use serde_json::json;

use crate::models::job::RawJobRecord;

const MAX_DEMO_ROWS: usize = 5;

pub fn linkedin_listings(query: &str, location: &str, rows: u32) -> Vec<RawJobRecord> {
    let levels = ["Senior", "Mid Level", "Entry Level", "Lead", "Specialist"];
    let companies = ["TechCorp", "DataSys", "InnovateLabs", "FutureWorks", "CloudDynamics"];

    levels
        .iter()
        .zip(companies.iter())
        .take(capped(rows))
        .enumerate()
        .map(|(i, (level, company))| {
            as_record(json!({
                "title": format!("{query} - {level}"),
                "company": company,
                "location": location,
                "url": format!("https://linkedin.com/jobs/view/{}", i + 1000),
                "description": format!("Seeking talented professional for {query} role."),
                "source": "LinkedIn",
            }))
        })
        .collect()
}

pub fn workday_listings(query: &str, location: &str, rows: u32) -> Vec<RawJobRecord> {
    let tracks = ["Enterprise", "Cloud", "Analytics", "Strategy", "Operations"];

    tracks
        .iter()
        .take(capped(rows))
        .enumerate()
        .map(|(i, track)| {
            as_record(json!({
                "title": format!("{query} - {track}"),
                "company": "Workday",
                "location": location,
                "url": format!("https://workday.wd5.myworkdayjobs.com/job-details-{i}"),
                "description": format!("Join Workday as a {query}. Help our customers succeed."),
                "source": "Workday",
            }))
        })
        .collect()
}

fn capped(rows: u32) -> usize {
    (rows as usize).min(MAX_DEMO_ROWS)
}

fn as_record(value: serde_json::Value) -> RawJobRecord {
    match value {
        serde_json::Value::Object(map) => map,
        _ => RawJobRecord::new(),
    }
}
