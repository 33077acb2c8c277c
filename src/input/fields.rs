//! Helpers for the loosely formatted fields stored on profiles and jobs

use serde::{Deserialize, Deserializer, Serialize};

/// One entry of a structured education list such as
/// `[{'degree': 'B.Sc', 'institution': 'Delhi University', 'year': 2019}]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordItem {
    Record(EducationRecord),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
    Missing(()),
}

/// Strings pass through, numbers are rendered and null becomes empty
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(text) => text,
        StringOrNumber::Number(number) => number.to_string(),
        StringOrNumber::Missing(()) => String::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillField {
    List(Vec<String>),
    Text(String),
}

/// Accept skills either as a list or as comma-joined text
pub fn deserialize_skills<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SkillField::deserialize(deserializer)? {
        SkillField::List(skills) => skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        SkillField::Text(text) => parse_skill_list(&text),
    })
}

/// Split comma-joined skill text into trimmed, non-empty skills
pub fn parse_skill_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a structured education list. Plain text yields `None`.
pub fn parse_education_records(text: &str) -> Option<Vec<EducationRecord>> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return None;
    }

    let items: Vec<RecordItem> = match serde_json::from_str(trimmed) {
        Ok(items) => items,
        Err(_) => serde_json::from_str(&python_literal_to_json(trimmed)?).ok()?,
    };

    Some(
        items
            .into_iter()
            .map(|item| match item {
                RecordItem::Record(record) => record,
                RecordItem::Text(degree) => EducationRecord {
                    degree,
                    ..EducationRecord::default()
                },
            })
            .collect(),
    )
}

/// Rewrite a Python list/dict literal as JSON. Strings may use either quote
/// character; `None`, `True` and `False` become their JSON counterparts and
/// trailing commas are dropped. Unterminated strings yield `None`.
fn python_literal_to_json(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let mut value = String::new();
                let mut closed = false;
                while let Some(ch) = chars.next() {
                    match ch {
                        '\\' => match chars.next()? {
                            'n' => value.push('\n'),
                            't' => value.push('\t'),
                            escaped @ ('\\' | '\'' | '"') => value.push(escaped),
                            other => {
                                value.push('\\');
                                value.push(other);
                            }
                        },
                        ch if ch == c => {
                            closed = true;
                            break;
                        }
                        ch => value.push(ch),
                    }
                }
                if !closed {
                    return None;
                }
                out.push_str(&serde_json::to_string(&value).ok()?);
            }
            ']' | '}' => {
                let kept = out.trim_end().len();
                out.truncate(kept);
                if out.ends_with(',') {
                    out.pop();
                }
                out.push(c);
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_alphanumeric() && next != '_' {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                out.push_str(match word.as_str() {
                    "None" => "null",
                    "True" => "true",
                    "False" => "false",
                    other => other,
                });
            }
            c => out.push(c),
        }
    }

    Some(out)
}

/// Human-readable education: one `<degree> from <institution> (<year>)` per
/// line for structured input, the text itself otherwise.
pub fn format_education(text: &str) -> String {
    match parse_education_records(text) {
        Some(records) => records
            .iter()
            .filter(|r| !r.degree.trim().is_empty())
            .map(|record| {
                let mut line = record.degree.trim().to_string();
                let institution = record.institution.trim();
                if !institution.is_empty() && !institution.eq_ignore_ascii_case("not specified") {
                    line.push_str(&format!(" from {}", institution));
                }
                if !record.year.trim().is_empty() {
                    line.push_str(&format!(" ({})", record.year.trim()));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => text.trim().to_string(),
    }
}

/// Education text to feed the normalizer: degrees joined by `; ` for
/// structured input, the text itself otherwise.
pub fn education_for_scoring(text: &str) -> String {
    match parse_education_records(text) {
        Some(records) => records
            .iter()
            .map(|r| r.degree.trim())
            .filter(|d| !d.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skill_list() {
        assert_eq!(parse_skill_list(" Python, SQL ,, Docker "), vec!["Python", "SQL", "Docker"]);
        assert!(parse_skill_list("").is_empty());
    }

    #[test]
    fn test_python_style_records() {
        let text = "[{'degree': 'B.Sc', 'institution': 'Delhi University', 'year': 2019}, {'degree': 'MBA', 'institution': 'Not Specified', 'year': ''}]";
        let records = parse_education_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, "2019");

        assert_eq!(format_education(text), "B.Sc from Delhi University (2019)\nMBA");
        assert_eq!(education_for_scoring(text), "B.Sc; MBA");
    }

    #[test]
    fn test_mixed_quote_records() {
        let text = r#"[{'degree': 'B.Sc', 'institution': "St. Xavier's College", 'year': 2018}, {'degree': 'M.Sc', 'institution': None, 'year': None,},]"#;
        let records = parse_education_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].institution, "St. Xavier's College");
        assert_eq!(records[0].year, "2018");
        assert_eq!(records[1].year, "");

        assert_eq!(format_education(text), "B.Sc from St. Xavier's College (2018)\nM.Sc");
        assert_eq!(education_for_scoring(text), "B.Sc; M.Sc");
    }

    #[test]
    fn test_python_literal_escapes() {
        assert_eq!(
            python_literal_to_json(r#"['O\'Brien "Hall"', 'a\\b']"#).unwrap(),
            r#"["O'Brien \"Hall\"", "a\\b"]"#
        );
        assert!(python_literal_to_json("['unterminated]").is_none());
        assert!(parse_education_records("['unterminated]").is_none());
    }

    #[test]
    fn test_string_records_and_plain_text() {
        assert_eq!(education_for_scoring(r#"["BCA", "MCA"]"#), "BCA; MCA");
        assert!(parse_education_records("Bachelor of Science").is_none());
        assert_eq!(format_education("  Bachelor of Science "), "Bachelor of Science");
        assert!(parse_education_records("[not json").is_none());
    }

    #[test]
    fn test_skills_deserialize_from_list_or_text() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "deserialize_skills")]
            skills: Vec<String>,
        }

        let from_text: Holder = serde_json::from_str(r#"{"skills": "Rust, Go"}"#).unwrap();
        let from_list: Holder = serde_json::from_str(r#"{"skills": [" Rust", "", "Go"]}"#).unwrap();
        assert_eq!(from_text.skills, vec!["Rust", "Go"]);
        assert_eq!(from_list.skills, from_text.skills);
    }
}
