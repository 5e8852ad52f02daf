//! Matching orchestrator: scores a bounded prefix of the job list against a
//! résumé and writes results back in place.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::matching::ResumeMatcher;
use crate::models::job::CanonicalJob;

/// Only the first this-many jobs of a search are ever matched.
pub const MATCH_CAP: usize = 15;

/// Matches the first `cap` jobs against `resume_text`, at most `concurrency`
/// calls in flight. Returns how many jobs received match data.
///
/// Blank résumé text or an empty list is a no-op. A failed call leaves that
/// job's match fields unset and does not affect the others.
pub async fn score_jobs(
    jobs: &mut [CanonicalJob],
    resume_text: &str,
    matcher: &dyn ResumeMatcher,
    cap: usize,
    concurrency: usize,
) -> usize {
    if resume_text.trim().is_empty() || jobs.is_empty() {
        return 0;
    }

    let limit = cap.min(jobs.len());

    // Collected eagerly; a lazy `map` adapter here leaves the future !Send.
    let calls: Vec<_> = jobs[..limit]
        .iter()
        .map(|job| matcher.match_resume(resume_text, &job.title, &job.snippet))
        .collect();

    // `buffered` yields in submission order, so results line up with indices.
    let outcomes: Vec<_> = stream::iter(calls)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut matched = 0;
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(result) => {
                let job = &mut jobs[index];
                job.match_score = Some(result.percentage);
                job.match_tips = Some(result.tips);
                matched += 1;
            }
            Err(e) => warn!("Matching failed for job {index}: {e}"),
        }
    }

    info!("Matched {matched}/{limit} jobs against resume");
    matched
}
