//! Education requirement matching

use crate::processing::education::{split_specialization, EducationLevel, EducationNormalizer};
use crate::processing::similarity::{PartialRatio, SimilarityMetric, TokenSortRatio};
use log::debug;

const NOT_SPECIFIED: &str = "not specified";

const GRADUATE_KEYWORDS: &[&str] = &[
    "bachelor", "b.", "b ", "undergraduate", "be", "btech", "bca", "bsc", "bcom", "ba",
];

const POSTGRADUATE_KEYWORDS: &[&str] = &[
    "master", "m.", "m ", "postgraduate", "phd", "doctorate", "me", "mtech", "mca", "msc", "mcom", "ma", "mba",
];

/// Specialization similarity needed before two specializations count as alike
const SPECIALIZATION_THRESHOLD: f64 = 0.7;

/// Fuzzy fallback similarity above which the match is treated as complete
const FUZZY_PROMOTION_THRESHOLD: f64 = 0.8;

const SAME_DEGREE_SIMILAR_SPECIALIZATION: f64 = 0.9;
const LEVEL_SATISFIED: f64 = 0.8;
const OTHER_DEGREE_SIMILAR_SPECIALIZATION: f64 = 0.7;

/// Scores a candidate's education against a job's education requirement.
///
/// Rules are evaluated in a fixed order and the first one that applies
/// decides the score:
/// 1. missing candidate education scores 0, a missing requirement scores 1
/// 2. "any graduate" / "any postgraduate" requirements
/// 3. "X or Y" alternatives
/// 4. exact qualification, specialization and degree level comparison
/// 5. fuzzy similarity of the normalized strings
pub struct EducationComparator {
    normalizer: EducationNormalizer,
    fallback_metric: Box<dyn SimilarityMetric>,
    specialization_metric: Box<dyn SimilarityMetric>,
}

impl EducationComparator {
    pub fn new(normalizer: EducationNormalizer) -> Self {
        Self {
            normalizer,
            fallback_metric: Box::new(PartialRatio),
            specialization_metric: Box::new(TokenSortRatio),
        }
    }

    /// Replace the metric used for the final fuzzy comparison
    pub fn with_fallback_metric(mut self, metric: Box<dyn SimilarityMetric>) -> Self {
        self.fallback_metric = metric;
        self
    }

    /// Replace the metric used to compare specializations
    pub fn with_specialization_metric(mut self, metric: Box<dyn SimilarityMetric>) -> Self {
        self.specialization_metric = metric;
        self
    }

    pub fn normalizer(&self) -> &EducationNormalizer {
        &self.normalizer
    }

    /// Score in `[0, 1]`
    pub fn compare_education(&self, candidate: &str, required: &str) -> f64 {
        let candidate = candidate.trim();
        let required = required.trim();

        if candidate.is_empty() || candidate.eq_ignore_ascii_case(NOT_SPECIFIED) {
            return 0.0;
        }
        if required.is_empty() || required.eq_ignore_ascii_case(NOT_SPECIFIED) {
            return 1.0;
        }

        let candidate_quals = self.normalizer.normalize_education(candidate);
        let required_quals = self.normalizer.normalize_education(required);
        debug!("Education normalized: candidate={:?} required={:?}", candidate_quals, required_quals);

        if candidate_quals.is_empty() {
            return 0.0;
        }
        if required_quals.is_empty() {
            return 1.0;
        }

        if let Some(score) = self.any_degree_requirement(candidate, required) {
            return score;
        }

        if let Some(score) = self.alternative_requirement(&candidate_quals, &required_quals) {
            return score;
        }

        let qualification_score = self.qualification_score(&candidate_quals, &required_quals);
        if qualification_score > 0.0 {
            return qualification_score;
        }

        let similarity = self.fallback_metric.similarity(
            &candidate_quals.join(" ").to_lowercase(),
            &required_quals.join(" ").to_lowercase(),
        );
        debug!("Education fallback {} = {:.3}", self.fallback_metric.name(), similarity);

        if similarity > FUZZY_PROMOTION_THRESHOLD {
            1.0
        } else {
            similarity
        }
    }

    fn any_degree_requirement(&self, candidate: &str, required: &str) -> Option<f64> {
        let required_lower = required.to_lowercase();
        let candidate_lower = candidate.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| candidate_lower.contains(k));

        if required_lower.contains("any graduate") && mentions(GRADUATE_KEYWORDS) {
            return Some(1.0);
        }
        if required_lower.contains("any postgraduate") && mentions(POSTGRADUATE_KEYWORDS) {
            return Some(1.0);
        }
        None
    }

    fn alternative_requirement(&self, candidate_quals: &[String], required_quals: &[String]) -> Option<f64> {
        for required in required_quals {
            let required_lower = required.to_lowercase();
            if !required_lower.contains(" or ") {
                continue;
            }

            let mut options: Vec<String> = Vec::new();
            for option in required_lower.split(" or ").map(str::trim).filter(|o| !o.is_empty()) {
                options.push(option.to_string());
                options.extend(
                    self.normalizer
                        .normalize_education(option)
                        .into_iter()
                        .map(|q| q.to_lowercase()),
                );
            }

            let satisfied = candidate_quals.iter().any(|candidate| {
                let candidate_lower = candidate.to_lowercase();
                options.iter().any(|option| candidate_lower.contains(option.as_str()))
            });

            if satisfied {
                return Some(1.0);
            }
        }
        None
    }

    fn qualification_score(&self, candidate_quals: &[String], required_quals: &[String]) -> f64 {
        let candidate_max_level = candidate_quals
            .iter()
            .map(|q| EducationLevel::classify(q))
            .max()
            .unwrap_or(EducationLevel::Other);

        let mut best: f64 = 0.0;

        for required in required_quals {
            let required_level = EducationLevel::classify(required);
            let (required_base, required_spec) = split_specialization(required);

            for candidate in candidate_quals {
                if candidate.eq_ignore_ascii_case(required) {
                    return 1.0;
                }

                let (candidate_base, candidate_spec) = split_specialization(candidate);
                let same_base = candidate_base.eq_ignore_ascii_case(required_base);

                // An unspecialized requirement accepts any specialization of the same degree
                if required_spec.is_none() && same_base {
                    return 1.0;
                }

                if let (Some(required_spec), Some(candidate_spec)) = (required_spec, candidate_spec) {
                    let spec_score = self.specialization_metric.similarity(candidate_spec, required_spec);
                    if spec_score > SPECIALIZATION_THRESHOLD {
                        best = best.max(if same_base {
                            SAME_DEGREE_SIMILAR_SPECIALIZATION
                        } else {
                            OTHER_DEGREE_SIMILAR_SPECIALIZATION
                        });
                    }
                }
            }

            if candidate_max_level >= required_level
                && candidate_max_level > EducationLevel::Other
                && required_level > EducationLevel::Other
            {
                best = best.max(LEVEL_SATISFIED);
            }
        }

        best
    }
}

impl Default for EducationComparator {
    fn default() -> Self {
        Self::new(EducationNormalizer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Never;

    impl SimilarityMetric for Never {
        fn similarity(&self, _a: &str, _b: &str) -> f64 {
            0.0
        }

        fn name(&self) -> &'static str {
            "never"
        }
    }

    #[test]
    fn test_missing_education() {
        let comparator = EducationComparator::default();
        assert_eq!(comparator.compare_education("", "Bachelor of Science"), 0.0);
        assert_eq!(comparator.compare_education("Not Specified", "Bachelor of Science"), 0.0);
        assert_eq!(comparator.compare_education("MSc", ""), 1.0);
        assert_eq!(comparator.compare_education("MSc", "Not Specified"), 1.0);
    }

    #[test]
    fn test_any_graduate() {
        let comparator = EducationComparator::default();
        assert_eq!(comparator.compare_education("Bachelor of Science", "Any Graduate"), 1.0);
        assert_eq!(comparator.compare_education("MBA", "Any Postgraduate"), 1.0);
    }

    #[test]
    fn test_or_alternatives() {
        let comparator = EducationComparator::default();
        assert_eq!(
            comparator.compare_education("Diploma in Civil Engineering", "Engineering or Science graduate"),
            1.0
        );
    }

    #[test]
    fn test_exact_and_base_degree_match() {
        let comparator = EducationComparator::default();
        assert_eq!(comparator.compare_education("B.Tech", "Bachelor of Technology"), 1.0);
        assert_eq!(
            comparator.compare_education("Bachelor of Science in Computer Science", "B.Sc"),
            1.0
        );
    }

    #[test]
    fn test_similar_specialization() {
        let comparator = EducationComparator::default();
        assert_eq!(
            comparator.compare_education("M.Sc in Computer Science", "MSc in Science Computer"),
            0.9
        );
    }

    #[test]
    fn test_higher_level_gets_partial_credit() {
        let comparator = EducationComparator::default();
        assert_eq!(comparator.compare_education("Master of Science", "Bachelor of Arts"), 0.8);
        assert_eq!(comparator.compare_education("PhD", "MBA"), 0.8);
    }

    #[test]
    fn test_lower_level_falls_back_to_similarity() {
        let comparator = EducationComparator::default().with_fallback_metric(Box::new(Never));
        assert_eq!(comparator.compare_education("Bachelor of Arts", "Master of Science"), 0.0);

        let comparator = EducationComparator::default();
        let score = comparator.compare_education("Bachelor of Arts", "Master of Science");
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn test_specialization_metric_is_swappable() {
        let comparator = EducationComparator::default().with_specialization_metric(Box::new(Never));
        // Without a specialization match only the level rule applies
        assert_eq!(
            comparator.compare_education("M.Sc in Computer Science", "MSc in Science Computer"),
            0.8
        );
    }

    #[test]
    fn test_comparison_is_deterministic() {
        let comparator = EducationComparator::default();
        let first = comparator.compare_education("B.Com; CA", "Master of Commerce");
        let second = comparator.compare_education("B.Com; CA", "Master of Commerce");
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
