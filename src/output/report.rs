//! Report structures wrapping comparisons for presentation

use crate::processing::ranking::{CandidateMatch, JobMatch};
use crate::processing::scorer::{Comparison, CriterionKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candidate scored against one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub summary: ScoreSummary,
    pub comparison: Comparison,
    pub recommendations: Vec<String>,
    pub metadata: ReportMetadata,
}

/// Jobs ranked for a candidate, or candidates ranked for a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub view: RankingView,
    pub entries: Vec<RankedEntry>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingView {
    /// Jobs ranked for one candidate
    Jobs,
    /// Candidates ranked for one job
    Candidates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub title: String,
    pub summary: ScoreSummary,
    pub comparison: Comparison,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub overall: f64,
    pub band: ScoreBand,
    pub verdict: String,
    pub matched_skills: usize,
    pub required_skills: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Excellent,
    VeryGood,
    Good,
    Fair,
    BelowAverage,
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub candidate_source: String,
    pub job_source: String,
    pub processing_time_ms: u64,
}

impl ScoreBand {
    pub fn from_percentage(score: f64) -> Self {
        match score {
            s if s >= 90.0 => ScoreBand::Excellent,
            s if s >= 80.0 => ScoreBand::VeryGood,
            s if s >= 70.0 => ScoreBand::Good,
            s if s >= 60.0 => ScoreBand::Fair,
            s if s >= 50.0 => ScoreBand::BelowAverage,
            _ => ScoreBand::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "EXCELLENT",
            ScoreBand::VeryGood => "VERY GOOD",
            ScoreBand::Good => "GOOD",
            ScoreBand::Fair => "FAIR",
            ScoreBand::BelowAverage => "BELOW AVG",
            ScoreBand::Poor => "POOR",
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent match - strong candidate for this role",
            ScoreBand::VeryGood => "Very good match - minor gaps to close",
            ScoreBand::Good => "Good match - some targeted upskilling recommended",
            ScoreBand::Fair => "Fair match - several requirements unmet",
            ScoreBand::BelowAverage => "Below average match - significant gaps",
            ScoreBand::Poor => "Poor match",
        }
    }
}

impl ScoreSummary {
    pub fn from_comparison(comparison: &Comparison) -> Self {
        let overall = comparison.scores.overall;
        let band = ScoreBand::from_percentage(overall);
        let skill_rows = || comparison.matrix.iter().filter(|row| row.kind == CriterionKind::Skill);

        let verdict = if comparison.is_degraded() {
            comparison.scores.recommendation.clone()
        } else {
            band.verdict().to_string()
        };

        Self {
            overall,
            band,
            verdict,
            matched_skills: skill_rows().filter(|row| row.matched).count(),
            required_skills: skill_rows().count(),
        }
    }
}

impl ReportMetadata {
    pub fn new(candidate_source: impl Into<String>, job_source: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            candidate_source: candidate_source.into(),
            job_source: job_source.into(),
            processing_time_ms,
        }
    }
}

impl CompatibilityReport {
    pub fn new(comparison: Comparison, recommendations: Vec<String>, metadata: ReportMetadata) -> Self {
        Self {
            summary: ScoreSummary::from_comparison(&comparison),
            comparison,
            recommendations,
            metadata,
        }
    }
}

impl RankedEntry {
    fn new(rank: usize, title: String, comparison: Comparison, recommendations: Vec<String>) -> Self {
        Self {
            rank,
            title,
            summary: ScoreSummary::from_comparison(&comparison),
            comparison,
            recommendations,
        }
    }
}

impl RankingReport {
    pub fn from_job_matches(matches: Vec<JobMatch>, metadata: ReportMetadata) -> Self {
        let entries = matches
            .into_iter()
            .enumerate()
            .map(|(i, m)| RankedEntry::new(i + 1, m.job.title(), m.comparison, m.recommendations))
            .collect();

        Self {
            view: RankingView::Jobs,
            entries,
            metadata,
        }
    }

    pub fn from_candidate_matches(matches: Vec<CandidateMatch>, metadata: ReportMetadata) -> Self {
        let entries = matches
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                let title = if m.candidate.name.trim().is_empty() {
                    format!("Candidate {}", i + 1)
                } else {
                    m.candidate.name
                };
                RankedEntry::new(i + 1, title, m.comparison, m.recommendations)
            })
            .collect();

        Self {
            view: RankingView::Candidates,
            entries,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::scorer::{CandidateProfile, CompatibilityScorer, JobRequirement};

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_percentage(100.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percentage(80.0), ScoreBand::VeryGood);
        assert_eq!(ScoreBand::from_percentage(79.99), ScoreBand::Good);
        assert_eq!(ScoreBand::from_percentage(0.0), ScoreBand::Poor);
    }

    #[test]
    fn test_summary_counts_skills() {
        let scorer = CompatibilityScorer::default();
        let comparison = scorer.compare(
            &CandidateProfile {
                education: "MBA".into(),
                skills: vec!["Excel".into()],
                experience_years: 5.0,
            },
            &JobRequirement {
                education: "MBA".into(),
                skills: vec!["Excel".into(), "SQL".into(), "Tableau".into()],
                experience: "3 years".into(),
            },
        );

        let summary = ScoreSummary::from_comparison(&comparison);
        assert_eq!(summary.matched_skills, 1);
        assert_eq!(summary.required_skills, 3);
    }

    #[test]
    fn test_degraded_summary_uses_error_text() {
        let summary = ScoreSummary::from_comparison(&Comparison::degraded());
        assert_eq!(summary.band, ScoreBand::Poor);
        assert_eq!(summary.verdict, "An error occurred. Unable to calculate compatibility.");
    }
}
