//! Education normalization: free text to canonical qualification names

use crate::processing::education_table::{EducationLookup, LookupEntry};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// Coarse degree level used when exact qualifications differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    Other = 0,
    Bachelor = 1,
    Master = 2,
    Doctoral = 3,
}

const DOCTORAL_TERMS: &[&str] = &["phd", "doctorate", "doctor of"];

const MASTER_TERMS: &[&str] = &[
    "master", "post graduate", "postgraduate", "post-graduate", "m.", "ms ", " ms", "mtech", "mca", "mba",
];

const BACHELOR_TERMS: &[&str] = &[
    "bachelor", "graduate", "b.", "bs ", " bs", "btech", "be ", " be", "bca",
];

impl EducationLevel {
    /// Keyword-based classification of a (normalized) qualification
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        let has_any = |terms: &[&str]| terms.iter().any(|term| lower.contains(term));

        if has_any(DOCTORAL_TERMS) {
            EducationLevel::Doctoral
        } else if has_any(MASTER_TERMS) {
            EducationLevel::Master
        } else if has_any(BACHELOR_TERMS) {
            EducationLevel::Bachelor
        } else {
            EducationLevel::Other
        }
    }
}

impl std::fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EducationLevel::Other => "Other",
            EducationLevel::Bachelor => "Bachelor's",
            EducationLevel::Master => "Master's",
            EducationLevel::Doctoral => "Doctoral",
        };
        write!(f, "{}", label)
    }
}

/// Split a normalized qualification into its base degree and specialization
pub fn split_specialization(qualification: &str) -> (&str, Option<&str>) {
    match qualification.split_once(" in ") {
        Some((base, spec)) => (base, Some(spec)),
        None => (qualification, None),
    }
}

/// Maps free-text education strings to canonical qualification names
pub struct EducationNormalizer {
    lookup: Arc<EducationLookup>,
    abbreviation_regex: Regex,
    head_marker_regex: Regex,
    specialization_patterns: Vec<Regex>,
}

impl EducationNormalizer {
    pub fn new(lookup: Arc<EducationLookup>) -> Self {
        // Dotted abbreviations (B.Tech, Ph.D.) or short bare words (MBA, BSc)
        let abbreviation_regex = Regex::new(r"(?i)\b(?:[a-z]+(?:\.[a-z]+)+\.?|[a-z]{1,5}\b)")
            .expect("Invalid abbreviation regex");

        let head_marker_regex = Regex::new(r"(?i)\s(?:in|with|specializing|specialising)\s")
            .expect("Invalid head marker regex");

        let specialization_patterns = [
            r"(?i)\bin\s+([^;,]+)",
            r"(?i)\bof\s+([^;,]+)",
            r"(?i)\bwith\s+focus\s+on\s+([^;,]+)",
            r"(?i)\bwith\s+specialization\s+in\s+([^;,]+)",
            r"(?i)\bspecializing\s+in\s+([^;,]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid specialization regex"))
        .collect();

        Self {
            lookup,
            abbreviation_regex,
            head_marker_regex,
            specialization_patterns,
        }
    }

    /// Normalize text that may hold several qualifications separated by
    /// `/`, `;` or `,`. Returns canonical names in first-seen order without
    /// duplicates; unrecognised fragments are kept as written.
    pub fn normalize_education(&self, text: &str) -> Vec<String> {
        let mut normalized: Vec<String> = Vec::new();

        for fragment in text.split(['/', ';', ',']) {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }

            let qualification = self.normalize_fragment(fragment);
            if !normalized.contains(&qualification) {
                normalized.push(qualification);
            }
        }

        normalized
    }

    fn normalize_fragment(&self, fragment: &str) -> String {
        match self.identify_degree(fragment) {
            Some((entry, span)) => match self.extract_specialization(&fragment[span.end..]) {
                Some(specialization) => format!("{} in {}", entry.canonical, specialization),
                None => entry.canonical.clone(),
            },
            None => fragment.to_string(),
        }
    }

    /// Locate the degree in a fragment, returning the table entry and the
    /// byte span of the matched text.
    fn identify_degree(&self, fragment: &str) -> Option<(&LookupEntry, Range<usize>)> {
        if let Some(entry) = self.lookup.exact(fragment) {
            return Some((entry, 0..fragment.len()));
        }

        // Look at the degree head first so a specialization like "in CS"
        // cannot shadow the actual degree.
        let head = self
            .head_marker_regex
            .find(fragment)
            .map(|m| &fragment[..m.start()])
            .unwrap_or(fragment);

        self.search(head).or_else(|| {
            if head.len() < fragment.len() {
                self.search(fragment)
            } else {
                None
            }
        })
    }

    fn search(&self, text: &str) -> Option<(&LookupEntry, Range<usize>)> {
        for token in self.abbreviation_regex.find_iter(text) {
            if let Some(entry) = self.lookup.abbreviation(token.as_str()) {
                return Some((entry, token.range()));
            }
        }

        if let Some(hit) = self.lookup.find_key_word(text) {
            return Some((hit.entry, hit.span));
        }

        self.lookup
            .find_full_form(text)
            .map(|hit| (hit.entry, hit.span))
    }

    fn extract_specialization(&self, rest: &str) -> Option<String> {
        let captured = self
            .specialization_patterns
            .iter()
            .find_map(|pattern| pattern.captures(rest))
            .and_then(|caps| caps.get(1))?;

        let cleaned = captured
            .as_str()
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '.' | ':' | '-'));

        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }
}

impl Default for EducationNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(EducationLookup::default()))
    }
}
