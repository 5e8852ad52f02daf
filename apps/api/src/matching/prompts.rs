// Prompt constants for résumé-to-job matching.
// Reuses the JSON-only system fragment from llm_client::prompts.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as MATCH_SYSTEM;

/// Matching prompt template. Replace `{resume_text}`, `{job_title}` and
/// `{job_snippet}` before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Compare the candidate resume below with the job posting and estimate how well they match.

Return a JSON object with this EXACT schema (no extra fields):
{
  "percentage": 72,
  "tips": [
    "Highlight your SQL reporting work near the top",
    "Add a Power BI or Tableau project",
    "Quantify the impact of your dashboards"
  ]
}

Rules:
- "percentage" is an integer from 0 to 100.
- "tips" holds exactly 3 short, actionable suggestions for improving the resume for THIS job.

JOB TITLE: {job_title}

JOB DESCRIPTION:
{job_snippet}

RESUME:
{resume_text}"#;
