//! Listing filters. Categories combine with AND; the free-text query matches
//! title OR description OR skills.

use serde::Deserialize;

use crate::errors::AppError;
#[cfg(test)]
use crate::models::job::Job;
use crate::models::job::JobStatus;
use crate::models::skills::Skills;

/// Raw query string of `GET /api/v1/jobs`. Empty values mean "no filter".
#[derive(Debug, Default, Clone, Deserialize)]
pub struct JobListQuery {
    pub q: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<String>,
    pub max_salary: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct JobFilter {
    /// `None` matches every status (moderation queue only).
    pub status: Option<JobStatus>,
    pub text: Option<String>,
    pub location: Option<String>,
    /// Seeker wants at least this much: keeps jobs whose `max_salary >= value`.
    pub min_salary: Option<i64>,
    /// Seeker wants at most this much: keeps jobs whose `min_salary <= value`.
    pub max_salary: Option<i64>,
}

impl JobListQuery {
    /// Public listing filter. Always restricted to approved jobs.
    pub fn into_filter(self) -> Result<JobFilter, AppError> {
        Ok(JobFilter {
            status: Some(JobStatus::Approved),
            text: non_empty(self.q),
            location: non_empty(self.location),
            min_salary: parse_salary("min_salary", self.min_salary)?,
            max_salary: parse_salary("max_salary", self.max_salary)?,
        })
    }
}

impl JobFilter {
    pub fn approved() -> Self {
        JobFilter {
            status: Some(JobStatus::Approved),
            ..Default::default()
        }
    }

    pub fn with_status(status: Option<JobStatus>) -> Self {
        JobFilter {
            status,
            ..Default::default()
        }
    }

    /// Text query as compared against the stored skills column. A query that
    /// lists several skills is encoded the way skills are stored, so
    /// `python,sql` finds a job saved as `Python, SQL`.
    pub fn skills_needle(&self) -> Option<String> {
        let text = self.text.as_deref()?;
        if !text.contains(',') {
            return Some(text.to_string());
        }
        let encoded = Skills::new([text]).to_csv();
        Some(if encoded.is_empty() { text.to_string() } else { encoded })
    }

    /// In-process evaluation of the filter, used by the in-memory store. A
    /// NULL salary bound never satisfies a salary filter.
    #[cfg(test)]
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let hit = contains_ci(&job.title, text)
                || contains_ci(&job.description, text)
                || self
                    .skills_needle()
                    .is_some_and(|needle| contains_ci(&job.skills.to_csv(), &needle));
            if !hit {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ci(&job.location, location) {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            if !job.max_salary.is_some_and(|max| max >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_salary {
            if !job.min_salary.is_some_and(|min| min <= max) {
                return false;
            }
        }
        true
    }
}

/// `ILIKE` pattern for a substring match, with LIKE metacharacters escaped.
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_salary(name: &str, value: Option<String>) -> Result<Option<i64>, AppError> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{name} must be a whole number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::fixtures::job;

    fn salaried(min: Option<i64>, max: Option<i64>) -> Job {
        let mut j = job(1, "Python, SQL", JobStatus::Approved);
        j.min_salary = min;
        j.max_salary = max;
        j
    }

    fn salary_filter(min: Option<i64>, max: Option<i64>) -> JobFilter {
        JobFilter {
            min_salary: min,
            max_salary: max,
            ..JobFilter::approved()
        }
    }

    #[test]
    fn test_min_salary_above_job_max_excludes() {
        let j = salaried(Some(50000), Some(80000));
        assert!(!salary_filter(Some(90000), None).matches(&j));
        assert!(salary_filter(Some(60000), None).matches(&j));
    }

    #[test]
    fn test_max_salary_compares_job_min() {
        let j = salaried(Some(50000), Some(80000));
        assert!(salary_filter(None, Some(50000)).matches(&j));
        assert!(!salary_filter(None, Some(40000)).matches(&j));
    }

    #[test]
    fn test_null_salary_never_matches_salary_filter() {
        let j = salaried(None, None);
        assert!(!salary_filter(Some(1), None).matches(&j));
        assert!(!salary_filter(None, Some(1_000_000)).matches(&j));
        assert!(salary_filter(None, None).matches(&j));
    }

    #[test]
    fn test_text_matches_any_field_case_insensitive() {
        let mut j = job(1, "Kubernetes, Go", JobStatus::Approved);
        j.title = "Platform Engineer".to_string();
        j.description = "Own our deploy pipeline".to_string();
        let by = |t: &str| JobFilter {
            text: Some(t.to_string()),
            ..JobFilter::approved()
        };
        assert!(by("platform").matches(&j));
        assert!(by("DEPLOY").matches(&j));
        assert!(by("kubernetes").matches(&j));
        assert!(!by("rust").matches(&j));
    }

    #[test]
    fn test_skill_list_query_matches_normalised_storage() {
        let j = Job {
            skills: Skills::new(["Python,SQL"]),
            ..job(1, "", JobStatus::Approved)
        };
        for q in ["python,sql", "Python, SQL", "sql,"] {
            let f = JobFilter {
                text: Some(q.to_string()),
                ..JobFilter::approved()
            };
            assert!(f.matches(&j), "query {q:?} should match");
        }
    }

    #[test]
    fn test_skills_needle_keeps_plain_queries() {
        let by = |t: &str| JobFilter {
            text: Some(t.to_string()),
            ..JobFilter::approved()
        };
        assert_eq!(by("C++").skills_needle().as_deref(), Some("C++"));
        assert_eq!(by("go ,rust").skills_needle().as_deref(), Some("go, rust"));
        assert_eq!(by(",").skills_needle().as_deref(), Some(","));
        assert_eq!(JobFilter::approved().skills_needle(), None);
    }

    #[test]
    fn test_location_substring() {
        let mut j = job(1, "", JobStatus::Approved);
        j.location = "Berlin, Germany".to_string();
        let f = JobFilter {
            location: Some("berlin".to_string()),
            ..JobFilter::approved()
        };
        assert!(f.matches(&j));
        j.location = "Munich".to_string();
        assert!(!f.matches(&j));
    }

    #[test]
    fn test_unapproved_never_listed() {
        for status in [JobStatus::Draft, JobStatus::Pending, JobStatus::Rejected] {
            let j = job(1, "Python", status);
            assert!(!JobFilter::approved().matches(&j));
        }
    }

    #[test]
    fn test_query_empty_values_are_absent() {
        let filter = JobListQuery {
            q: Some(String::new()),
            location: Some(String::new()),
            min_salary: Some(String::new()),
            max_salary: None,
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter, JobFilter::approved());
    }

    #[test]
    fn test_query_bad_salary_is_validation_error() {
        let result = JobListQuery {
            min_salary: Some("lots".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}
