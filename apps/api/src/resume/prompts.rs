/// System prompt for résumé summaries.
pub const SUMMARY_SYSTEM: &str = "You are an experienced technical recruiter. \
    Answer with bullet points only. \
    Do NOT include a preamble, headings or closing remarks.";

/// Summary prompt prefix. The full résumé text is appended after it.
pub const SUMMARY_PROMPT_PREFIX: &str = "Extract the top 5 skills and 3 role keywords from this resume. \
    Return bullet points only.\n\n";
