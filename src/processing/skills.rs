//! Skill set matching between a candidate and a job

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of comparing candidate skills against required skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// Fraction of required skills the candidate has, in `[0, 1]`
    pub score: f64,
    /// Required skills paired with the candidate's spelling, in job order
    pub matched: Vec<(String, String)>,
    /// Required skills the candidate lacks, in job order
    pub missing: Vec<String>,
}

impl SkillMatch {
    pub fn required_count(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    /// Candidate spelling of a required skill, if present
    pub fn candidate_spelling(&self, required: &str) -> Option<&str> {
        self.matched
            .iter()
            .find(|(req, _)| req == required)
            .map(|(_, candidate)| candidate.as_str())
    }
}

/// Set-intersection skill matcher.
///
/// Skills are trimmed and blank entries ignored. Matching is
/// case-insensitive unless configured otherwise.
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    case_insensitive: bool,
}

impl SkillMatcher {
    pub fn new(case_insensitive: bool) -> Self {
        Self { case_insensitive }
    }

    fn key(&self, skill: &str) -> String {
        if self.case_insensitive {
            skill.trim().to_lowercase()
        } else {
            skill.trim().to_string()
        }
    }

    /// Required skills trimmed and deduplicated, keeping first-seen order
    pub fn required_skills<S: AsRef<str>>(&self, required: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        required
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(self.key(s)))
            .map(str::to_string)
            .collect()
    }

    /// An empty requirement scores 0 rather than dividing by zero.
    pub fn match_skills<C: AsRef<str>, R: AsRef<str>>(&self, candidate: &[C], required: &[R]) -> SkillMatch {
        let mut candidate_by_key: Vec<(String, &str)> = Vec::new();
        for skill in candidate.iter().map(|s| s.as_ref().trim()).filter(|s| !s.is_empty()) {
            let key = self.key(skill);
            if !candidate_by_key.iter().any(|(k, _)| *k == key) {
                candidate_by_key.push((key, skill));
            }
        }

        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for skill in self.required_skills(required) {
            let key = self.key(&skill);
            match candidate_by_key.iter().find(|(k, _)| *k == key) {
                Some((_, spelling)) => matched.push((skill, spelling.to_string())),
                None => missing.push(skill),
            }
        }

        let required_count = matched.len() + missing.len();
        let score = if required_count == 0 {
            0.0
        } else {
            matched.len() as f64 / required_count as f64
        };

        SkillMatch { score, matched, missing }
    }
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_match() {
        let matcher = SkillMatcher::default();
        let result = matcher.match_skills(&["python", "sql"], &["python", "java"]);
        assert_eq!(result.score, 0.5);
        assert_eq!(result.missing, vec!["java"]);
        assert_eq!(result.candidate_spelling("python"), Some("python"));
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        let matcher = SkillMatcher::default();
        let result = matcher.match_skills(&[" Python ", "SQL"], &["python", "sql ", ""]);
        assert_eq!(result.score, 1.0);
        assert!(result.missing.is_empty());
        assert_eq!(result.required_count(), 2);
        assert_eq!(result.candidate_spelling("python"), Some("Python"));
    }

    #[test]
    fn test_case_sensitive_mode() {
        let matcher = SkillMatcher::new(false);
        let result = matcher.match_skills(&["Python"], &["python"]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.missing, vec!["python"]);
    }

    #[test]
    fn test_empty_requirement_scores_zero() {
        let matcher = SkillMatcher::default();
        let none: [&str; 0] = [];
        assert_eq!(matcher.match_skills(&["rust"], &none).score, 0.0);
        assert_eq!(matcher.match_skills(&["rust"], &[" ", ""]).score, 0.0);
    }

    #[test]
    fn test_duplicate_requirements_count_once() {
        let matcher = SkillMatcher::default();
        let result = matcher.match_skills(&["Go"], &["go", "Go", "Docker"]);
        assert_eq!(result.score, 0.5);
        assert_eq!(matcher.required_skills(&["go", "Go", "Docker"]), vec!["go", "Docker"]);
    }
}
