//! Experience requirement parsing and scoring

use regex::Regex;

/// Extracts the minimum years of experience from free-text requirements
/// such as "2-5 years", "3+ years" or "minimum 2 years".
pub struct ExperienceParser {
    patterns: Vec<Regex>,
}

impl ExperienceParser {
    pub fn new() -> Self {
        // Order matters: the first matching pattern wins
        let patterns = [
            r"(?i)(\d+(?:\.\d+)?)(?:\s*[-–]\s*|\s+to\s+)(\d+(?:\.\d+)?)",
            r"(?i)(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b",
            r"(?i)\b(?:minimum|min|at\s+least)\s*(?:of\s+)?(\d+(?:\.\d+)?)",
            r"(?i)(\d+(?:\.\d+)?)\s*\+",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid experience regex"))
        .collect();

        Self { patterns }
    }

    /// Minimum required years, or 0 when nothing can be parsed
    pub fn extract_min_experience(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        self.patterns
            .iter()
            .find_map(|pattern| pattern.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

impl Default for ExperienceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear experience credit: full when the requirement is met, proportional
/// below it, and nothing for zero experience against a real requirement.
pub fn experience_score(candidate_years: f64, required_years: f64) -> f64 {
    if candidate_years >= required_years {
        1.0
    } else if candidate_years > 0.0 {
        (candidate_years / required_years).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_return_lower_bound() {
        let parser = ExperienceParser::new();
        assert_eq!(parser.extract_min_experience("2-5 years"), 2.0);
        assert_eq!(parser.extract_min_experience("2 - 5 Years"), 2.0);
        assert_eq!(parser.extract_min_experience("3 to 6 yrs"), 3.0);
        assert_eq!(parser.extract_min_experience("1.5-3 years"), 1.5);
    }

    #[test]
    fn test_single_values() {
        let parser = ExperienceParser::new();
        assert_eq!(parser.extract_min_experience("3+ years"), 3.0);
        assert_eq!(parser.extract_min_experience("4 yrs"), 4.0);
        assert_eq!(parser.extract_min_experience("at least 4 years"), 4.0);
        assert_eq!(parser.extract_min_experience("Minimum 2"), 2.0);
        assert_eq!(parser.extract_min_experience("at least 7"), 7.0);
        assert_eq!(parser.extract_min_experience("5+"), 5.0);
    }

    #[test]
    fn test_unparseable_defaults_to_zero() {
        let parser = ExperienceParser::new();
        assert_eq!(parser.extract_min_experience(""), 0.0);
        assert_eq!(parser.extract_min_experience("Fresher"), 0.0);
        assert_eq!(parser.extract_min_experience("0"), 0.0);
    }

    #[test]
    fn test_experience_score() {
        assert_eq!(experience_score(3.0, 2.0), 1.0);
        assert_eq!(experience_score(0.0, 0.0), 1.0);
        assert_eq!(experience_score(1.0, 4.0), 0.25);
        assert_eq!(experience_score(0.0, 2.0), 0.0);
    }
}
