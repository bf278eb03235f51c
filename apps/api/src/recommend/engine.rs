//! Skill-overlap recommendations: score = number of input tokens that are also
//! one of the job's skills. No weighting, no stemming.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::models::job::Job;

pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct Recommendation {
    pub score: usize,
    /// Matched skills, alphabetical, comma-joined.
    pub matched_skills: String,
    pub job: Job,
}

/// Ranks visible jobs by overlap with `tokens`.
///
/// Jobs with no shared skill are dropped. Ties on score go to the lower job id,
/// so the result does not depend on the order `jobs` arrives in.
pub fn recommend(tokens: &BTreeSet<String>, jobs: &[Job]) -> Vec<Recommendation> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<Recommendation> = jobs
        .iter()
        .filter(|job| job.is_visible())
        .filter_map(|job| {
            let job_tokens = job.skills.tokens();
            let matched: Vec<&str> = tokens
                .intersection(&job_tokens)
                .map(String::as_str)
                .collect();
            if matched.is_empty() {
                return None;
            }
            Some(Recommendation {
                score: matched.len(),
                matched_skills: matched.join(", "),
                job: job.clone(),
            })
        })
        .collect();

    scored.sort_by_key(|r| (Reverse(r.score), r.job.id));
    scored.truncate(MAX_RECOMMENDATIONS);
    scored
}
