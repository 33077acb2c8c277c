//! Upskilling advice derived from a compatibility matrix

use crate::processing::scorer::{CriterionKind, CriterionRow, JobRequirement};
use std::collections::BTreeSet;

pub const NO_RECOMMENDATIONS: &str = "No specific recommendations available.";
pub const GAIN_EXPERIENCE: &str = "Consider gaining more relevant experience.";
pub const PURSUE_EDUCATION: &str = "Pursue certifications or additional education to match job requirements.";

/// Advice lines for one comparison, in matrix order after the skill line.
///
/// Missing skills are only reported when the job actually lists them, and
/// are lowercased and sorted.
pub fn generate_recommendations(matrix: &[CriterionRow], job: &JobRequirement) -> Vec<String> {
    let job_skills: BTreeSet<String> = job.skills.iter().map(|s| s.trim().to_lowercase()).collect();

    let missing: BTreeSet<String> = matrix
        .iter()
        .filter(|row| row.kind == CriterionKind::Skill && !row.matched)
        .map(|row| row.criterion.trim().to_lowercase())
        .filter(|skill| job_skills.contains(skill))
        .collect();

    let mut recommendations = Vec::new();

    if !missing.is_empty() {
        let skills: Vec<&str> = missing.iter().map(String::as_str).collect();
        recommendations.push(format!("Upskill in: {}.", skills.join(", ")));
    }

    for row in matrix {
        match row.kind {
            CriterionKind::Experience if !row.matched && row.comment.contains("Experience mismatch") => {
                recommendations.push(GAIN_EXPERIENCE.to_string());
            }
            CriterionKind::Education if !row.matched => {
                recommendations.push(PURSUE_EDUCATION.to_string());
            }
            _ => {}
        }
    }

    if recommendations.is_empty() {
        recommendations.push(NO_RECOMMENDATIONS.to_string());
    }

    recommendations
}
