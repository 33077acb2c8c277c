//! Compatibility scoring: education, skills and experience combined into
//! one weighted score plus a per-criterion comparison matrix

use crate::config::Config;
use crate::error::{JobCompatError, Result};
use crate::input::fields::{deserialize_skills, education_for_scoring, format_education};
use crate::processing::education::EducationNormalizer;
use crate::processing::education_matcher::EducationComparator;
use crate::processing::education_table::EducationLookup;
use crate::processing::experience::{experience_score, ExperienceParser};
use crate::processing::skills::SkillMatcher;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const EDUCATION_WEIGHT: f64 = 0.3;
pub const SKILLS_WEIGHT: f64 = 0.4;
pub const EXPERIENCE_WEIGHT: f64 = 0.3;

/// Sub-score at or above which a criterion row counts as matched
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

pub const NOT_SPECIFIED: &str = "Not Specified";
pub const EXPERIENCE_CRITERION: &str = "Experience (Years)";
pub const EDUCATION_CRITERION: &str = "Education";
pub const ERROR_RECOMMENDATION: &str = "An error occurred. Unable to calculate compatibility.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub education: String,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    #[serde(default)]
    pub education: String,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriterionKind {
    Education,
    Experience,
    Skill,
}

/// One row of the compatibility matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionRow {
    pub criterion: String,
    pub kind: CriterionKind,
    pub candidate_value: String,
    pub required_value: String,
    pub matched: bool,
    pub comment: String,
}

impl CriterionRow {
    pub fn match_label(&self) -> &'static str {
        if self.matched {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Sub-scores and overall score as percentages in `[0, 100]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub education: f64,
    pub skills: f64,
    pub experience: f64,
    pub overall: f64,
    pub recommendation: String,
    /// Set only when scoring failed and the zero scores are a fallback
    #[serde(default)]
    pub degraded: bool,
}

impl ScoreSet {
    pub fn degraded() -> Self {
        Self {
            education: 0.0,
            skills: 0.0,
            experience: 0.0,
            overall: 0.0,
            recommendation: ERROR_RECOMMENDATION.to_string(),
            degraded: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub matrix: Vec<CriterionRow>,
    pub scores: ScoreSet,
}

impl Comparison {
    pub fn degraded() -> Self {
        Self {
            matrix: Vec::new(),
            scores: ScoreSet::degraded(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.scores.degraded
    }
}

/// `overall = 0.3 * education + 0.4 * skills + 0.3 * experience`, clamped to
/// `[0, 1]` and rounded to two decimals as a fraction, so 0.6733 becomes 0.67.
pub fn overall_score(education: f64, skills: f64, experience: f64) -> f64 {
    let raw = (education * EDUCATION_WEIGHT + skills * SKILLS_WEIGHT + experience * EXPERIENCE_WEIGHT).clamp(0.0, 1.0);
    (raw * 100.0).round() / 100.0
}

/// Fraction in `[0, 1]` to a percentage rounded to two decimals
pub fn to_percentage(score: f64) -> f64 {
    (score.clamp(0.0, 1.0) * 100.0 * 100.0).round() / 100.0
}

fn format_years(years: f64) -> String {
    if years > 0.0 {
        format!("{} years", years)
    } else {
        "0 years".to_string()
    }
}

/// Stateless scorer; safe to share between threads
pub struct CompatibilityScorer {
    comparator: EducationComparator,
    experience_parser: ExperienceParser,
    skill_matcher: SkillMatcher,
    match_threshold: f64,
}

impl CompatibilityScorer {
    pub fn new(lookup: Arc<EducationLookup>) -> Self {
        Self {
            comparator: EducationComparator::new(EducationNormalizer::new(lookup)),
            experience_parser: ExperienceParser::new(),
            skill_matcher: SkillMatcher::default(),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    /// Build a scorer from configuration, loading a custom education table
    /// when one is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let lookup = match &config.matching.education_table {
            Some(path) => EducationLookup::from_file(path)?,
            None => EducationLookup::builtin()?,
        };

        Ok(Self::new(Arc::new(lookup))
            .with_skill_matcher(SkillMatcher::new(config.matching.case_insensitive_skills))
            .with_match_threshold(config.scoring.match_threshold))
    }

    pub fn with_skill_matcher(mut self, skill_matcher: SkillMatcher) -> Self {
        self.skill_matcher = skill_matcher;
        self
    }

    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn normalizer(&self) -> &EducationNormalizer {
        self.comparator.normalizer()
    }

    pub fn experience_parser(&self) -> &ExperienceParser {
        &self.experience_parser
    }

    /// Compare a candidate with a job, degrading to an all-zero score set
    /// (flagged as degraded) instead of failing.
    pub fn compare(&self, candidate: &CandidateProfile, job: &JobRequirement) -> Comparison {
        match self.try_compare(candidate, job) {
            Ok(comparison) => comparison,
            Err(e) => {
                error!("Error comparing resume with job: {}", e);
                Comparison::degraded()
            }
        }
    }

    pub fn try_compare(&self, candidate: &CandidateProfile, job: &JobRequirement) -> Result<Comparison> {
        if !candidate.experience_years.is_finite() || candidate.experience_years < 0.0 {
            return Err(JobCompatError::InvalidInput(format!(
                "experience_years must be a non-negative number, got {}",
                candidate.experience_years
            )));
        }

        let education = self.comparator.compare_education(
            &education_for_scoring(&candidate.education),
            &education_for_scoring(&job.education),
        );

        let required_years = self.experience_parser.extract_min_experience(&job.experience);
        let experience = experience_score(candidate.experience_years, required_years);

        let skill_match = self.skill_matcher.match_skills(&candidate.skills, &job.skills);
        let overall = overall_score(education, skill_match.score, experience);

        let mut matrix = Vec::with_capacity(2 + skill_match.required_count());

        let education_matched = education >= self.match_threshold;
        matrix.push(CriterionRow {
            criterion: EDUCATION_CRITERION.to_string(),
            kind: CriterionKind::Education,
            candidate_value: self.display_education(&candidate.education),
            required_value: self.display_education(&job.education),
            matched: education_matched,
            comment: if education_matched { "Matches" } else { "Mismatch" }.to_string(),
        });

        let experience_matched = experience >= self.match_threshold;
        matrix.push(CriterionRow {
            criterion: EXPERIENCE_CRITERION.to_string(),
            kind: CriterionKind::Experience,
            candidate_value: format_years(candidate.experience_years),
            required_value: format_years(required_years),
            matched: experience_matched,
            comment: if experience_matched { "Matches" } else { "Experience mismatch" }.to_string(),
        });

        for (required, spelling) in &skill_match.matched {
            matrix.push(CriterionRow {
                criterion: required.clone(),
                kind: CriterionKind::Skill,
                candidate_value: spelling.clone(),
                required_value: required.clone(),
                matched: true,
                comment: "Matches".to_string(),
            });
        }
        for required in &skill_match.missing {
            matrix.push(CriterionRow {
                criterion: required.clone(),
                kind: CriterionKind::Skill,
                candidate_value: NOT_SPECIFIED.to_string(),
                required_value: required.clone(),
                matched: false,
                comment: "Missing".to_string(),
            });
        }

        // Skill rows follow the job's order regardless of match state
        let order = self.skill_matcher.required_skills(&job.skills);
        matrix[2..].sort_by_key(|row| order.iter().position(|s| *s == row.criterion));

        let recommendation = if skill_match.missing.is_empty() {
            "All required skills are present. No upskill needed.".to_string()
        } else {
            format!(
                "Upskill in: {}. Pursue certifications or additional education to match job requirements.",
                skill_match.missing.join(", ")
            )
        };

        let scores = ScoreSet {
            education: to_percentage(education),
            skills: to_percentage(skill_match.score),
            experience: to_percentage(experience),
            overall: to_percentage(overall),
            recommendation,
            degraded: false,
        };

        debug!("Compatibility matrix: {:?}", matrix);
        debug!("Compatibility scores: {:?}", scores);

        Ok(Comparison { matrix, scores })
    }

    fn display_education(&self, education: &str) -> String {
        let formatted = format_education(education);
        if !formatted.is_empty() {
            return formatted;
        }
        let normalized = self.normalizer().normalize_education(education);
        if normalized.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            normalized.join("; ")
        }
    }
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::new(Arc::new(EducationLookup::default()))
    }
}
