//! Compatibility scoring: education, experience and skills

pub mod education;
pub mod education_matcher;
pub mod education_table;
pub mod experience;
pub mod ranking;
pub mod recommendations;
pub mod scorer;
pub mod similarity;
pub mod skills;

pub use scorer::{CandidateProfile, Comparison, CompatibilityScorer, CriterionRow, JobRequirement, ScoreSet};
