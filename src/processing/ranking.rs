//! Batch scoring: one candidate against many jobs, or many candidates
//! against one job

use crate::processing::recommendations::generate_recommendations;
use crate::processing::scorer::{CandidateProfile, Comparison, CompatibilityScorer, JobRequirement};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(flatten)]
    pub requirement: JobRequirement,
}

impl JobPosting {
    /// `<role> at <company>`, falling back to whichever part is present
    pub fn title(&self) -> String {
        match (self.role.trim(), self.company.trim()) {
            ("", "") if !self.id.is_empty() => self.id.clone(),
            ("", "") => "Untitled job".to_string(),
            (role, "") => role.to_string(),
            ("", company) => company.to_string(),
            (role, company) => format!("{} at {}", role, company),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateEntry {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub profile: CandidateProfile,
}

/// A job ranked for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub job: JobPosting,
    pub comparison: Comparison,
    pub recommendations: Vec<String>,
}

/// A candidate ranked for one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub candidate: CandidateEntry,
    pub comparison: Comparison,
    pub recommendations: Vec<String>,
}

fn score_pair(
    scorer: &CompatibilityScorer,
    candidate: &CandidateProfile,
    job: &JobRequirement,
) -> (Comparison, Vec<String>) {
    let comparison = scorer.compare(candidate, job);
    if comparison.is_degraded() {
        warn!("Comparison degraded to zero scores");
    }
    let recommendations = generate_recommendations(&comparison.matrix, job);
    (comparison, recommendations)
}

fn sort_and_truncate<T>(items: &mut Vec<T>, overall: impl Fn(&T) -> f64, top_n: usize) {
    // Stable sort: equal scores keep input order
    items.sort_by(|a, b| overall(b).total_cmp(&overall(a)));
    if top_n > 0 {
        items.truncate(top_n);
    }
}

/// Rank jobs for a candidate by overall score, best first. `top_n == 0`
/// keeps every job.
pub fn rank_jobs(
    scorer: &CompatibilityScorer,
    candidate: &CandidateProfile,
    jobs: &[JobPosting],
    top_n: usize,
) -> Vec<JobMatch> {
    rank_jobs_with_progress(scorer, candidate, jobs, top_n, |_| {})
}

/// [`rank_jobs`], calling `on_scored` after each job is scored
pub fn rank_jobs_with_progress<F>(
    scorer: &CompatibilityScorer,
    candidate: &CandidateProfile,
    jobs: &[JobPosting],
    top_n: usize,
    mut on_scored: F,
) -> Vec<JobMatch>
where
    F: FnMut(&JobPosting),
{
    let mut matches: Vec<JobMatch> = jobs
        .iter()
        .map(|job| {
            let (comparison, recommendations) = score_pair(scorer, candidate, &job.requirement);
            debug!("{}: overall {:.2}", job.title(), comparison.scores.overall);
            on_scored(job);
            JobMatch {
                job: job.clone(),
                comparison,
                recommendations,
            }
        })
        .collect();

    sort_and_truncate(&mut matches, |m| m.comparison.scores.overall, top_n);
    matches
}

/// Rank candidates for a job by overall score, best first. `top_n == 0`
/// keeps every candidate.
pub fn rank_candidates(
    scorer: &CompatibilityScorer,
    job: &JobRequirement,
    candidates: &[CandidateEntry],
    top_n: usize,
) -> Vec<CandidateMatch> {
    rank_candidates_with_progress(scorer, job, candidates, top_n, |_| {})
}

/// [`rank_candidates`], calling `on_scored` after each candidate is scored
pub fn rank_candidates_with_progress<F>(
    scorer: &CompatibilityScorer,
    job: &JobRequirement,
    candidates: &[CandidateEntry],
    top_n: usize,
    mut on_scored: F,
) -> Vec<CandidateMatch>
where
    F: FnMut(&CandidateEntry),
{
    let mut matches: Vec<CandidateMatch> = candidates
        .iter()
        .map(|candidate| {
            let (comparison, recommendations) = score_pair(scorer, &candidate.profile, job);
            debug!("{}: overall {:.2}", candidate.name, comparison.scores.overall);
            on_scored(candidate);
            CandidateMatch {
                candidate: candidate.clone(),
                comparison,
                recommendations,
            }
        })
        .collect();

    sort_and_truncate(&mut matches, |m| m.comparison.scores.overall, top_n);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(id: &str, education: &str, skills: &[&str], experience: &str) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            company: format!("{} Corp", id),
            role: "Engineer".to_string(),
            requirement: JobRequirement {
                education: education.to_string(),
                skills: skills.iter().map(|s| s.to_string()).collect(),
                experience: experience.to_string(),
            },
        }
    }

    fn candidate() -> CandidateProfile {
        CandidateProfile {
            education: "B.Tech in Computer Science".to_string(),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            experience_years: 2.0,
        }
    }

    #[test]
    fn test_rank_jobs_orders_by_overall() {
        let scorer = CompatibilityScorer::default();
        let jobs = vec![
            posting("weak", "PhD", &["Java", "Go"], "10 years"),
            posting("strong", "B.Tech", &["Rust", "SQL"], "1-3 years"),
            posting("middle", "B.Tech", &["Rust", "Kafka"], "2+ years"),
        ];

        let ranked = rank_jobs(&scorer, &candidate(), &jobs, 0);
        let ids: Vec<&str> = ranked.iter().map(|m| m.job.id.as_str()).collect();
        assert_eq!(ids, vec!["strong", "middle", "weak"]);
        assert_eq!(ranked[0].comparison.scores.overall, 100.0);
        assert_eq!(ranked[0].recommendations, vec!["No specific recommendations available."]);
        assert_eq!(ranked[1].recommendations, vec!["Upskill in: kafka."]);
    }

    #[test]
    fn test_top_n_and_stable_ties() {
        let scorer = CompatibilityScorer::default();
        let jobs = vec![
            posting("a", "B.Tech", &["Rust"], "1 year"),
            posting("b", "B.Tech", &["Rust"], "1 year"),
            posting("c", "B.Tech", &["Rust"], "1 year"),
        ];

        let ranked = rank_jobs(&scorer, &candidate(), &jobs, 2);
        let ids: Vec<&str> = ranked.iter().map(|m| m.job.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_rank_candidates() {
        let scorer = CompatibilityScorer::default();
        let job = posting("j", "B.Tech", &["Rust", "SQL"], "2 years").requirement;
        let candidates = vec![
            CandidateEntry {
                name: "Junior".to_string(),
                profile: CandidateProfile {
                    experience_years: 1.0,
                    ..candidate()
                },
            },
            CandidateEntry {
                name: "Senior".to_string(),
                profile: candidate(),
            },
        ];

        let ranked = rank_candidates(&scorer, &job, &candidates, 0);
        assert_eq!(ranked[0].candidate.name, "Senior");
        assert_eq!(ranked[1].recommendations, vec!["Consider gaining more relevant experience."]);
    }

    #[test]
    fn test_progress_callback_sees_every_job() {
        let scorer = CompatibilityScorer::default();
        let jobs = vec![posting("a", "", &["Rust"], ""), posting("b", "", &["Go"], "")];
        let mut seen = Vec::new();

        let ranked = rank_jobs_with_progress(&scorer, &candidate(), &jobs, 1, |job| seen.push(job.id.clone()));
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].job.id, "a");
    }

    #[test]
    fn test_job_title() {
        assert_eq!(posting("x", "", &[], "").title(), "Engineer at x Corp");
        let bare = JobPosting {
            id: "42".to_string(),
            ..JobPosting::default()
        };
        assert_eq!(bare.title(), "42");
        assert_eq!(JobPosting::default().title(), "Untitled job");
    }
}
