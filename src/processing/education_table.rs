//! Education lookup table mapping qualification variants to canonical names
//!
//! The table ships as data (`data/education_lookup.toml`) and is loaded once
//! into an immutable [`EducationLookup`] that callers share by reference.

use crate::error::{JobCompatError, Result};
use aho_corasick::AhoCorasick;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

const BUILTIN_TABLE: &str = include_str!("../../data/education_lookup.toml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub key: String,
    pub canonical: String,
    pub category: String,
}

/// A table hit inside a piece of text
#[derive(Debug, Clone)]
pub struct TableMatch<'a> {
    pub entry: &'a LookupEntry,
    pub span: Range<usize>,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    category: Vec<CategoryFile>,
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    name: String,
    entries: Vec<(String, String)>,
}

/// Immutable qualification lookup with prebuilt matchers
pub struct EducationLookup {
    entries: Vec<LookupEntry>,
    by_key: HashMap<String, usize>,
    by_compact_key: HashMap<String, usize>,
    key_matcher: AhoCorasick,
    form_matcher: AhoCorasick,
    form_entries: Vec<usize>,
}

impl EducationLookup {
    /// Load the table embedded in the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    /// Load a table from a TOML file with the same layout as the built-in one
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!("Loading education table from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(content)?;

        let entries = file
            .category
            .into_iter()
            .flat_map(|category| {
                let name = category.name;
                category.entries.into_iter().map(move |(key, canonical)| LookupEntry {
                    key,
                    canonical,
                    category: name.clone(),
                })
            })
            .collect();

        Self::from_entries(entries)
    }

    /// Build the lookup from entries in priority order.
    ///
    /// Keys are lowercased; a repeated key keeps its first definition.
    pub fn from_entries(raw_entries: Vec<LookupEntry>) -> Result<Self> {
        let mut entries: Vec<LookupEntry> = Vec::with_capacity(raw_entries.len());
        let mut by_key = HashMap::new();

        for mut entry in raw_entries {
            entry.key = entry.key.trim().to_lowercase();
            entry.canonical = entry.canonical.trim().to_string();

            if entry.key.is_empty() || entry.canonical.is_empty() {
                return Err(JobCompatError::Configuration(format!(
                    "Education table entry in '{}' has an empty key or canonical name",
                    entry.category
                )));
            }

            if by_key.contains_key(&entry.key) {
                warn!("Duplicate education table key '{}' ignored", entry.key);
                continue;
            }

            by_key.insert(entry.key.clone(), entries.len());
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(JobCompatError::Configuration(
                "Education table has no entries".to_string(),
            ));
        }

        let mut by_compact_key = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_compact_key.entry(compact(&entry.key)).or_insert(idx);
        }

        let key_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(entries.iter().map(|e| e.key.as_str()))
            .map_err(|e| JobCompatError::Configuration(format!("Failed to build key matcher: {}", e)))?;

        // One pattern per distinct canonical form, pointing at its first entry
        let mut form_entries = Vec::new();
        let mut seen_forms = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            let form = entry.canonical.to_lowercase();
            if !seen_forms.contains_key(&form) {
                seen_forms.insert(form, form_entries.len());
                form_entries.push(idx);
            }
        }

        let form_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(form_entries.iter().map(|&idx| entries[idx].canonical.as_str()))
            .map_err(|e| JobCompatError::Configuration(format!("Failed to build form matcher: {}", e)))?;

        Ok(Self {
            entries,
            by_key,
            by_compact_key,
            key_matcher,
            form_matcher,
            form_entries,
        })
    }

    /// Exact (case-insensitive, trimmed) key lookup
    pub fn exact(&self, text: &str) -> Option<&LookupEntry> {
        self.by_key
            .get(&text.trim().to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    /// Lookup ignoring dots, e.g. `B.Tech` finds the `btech` family
    pub fn abbreviation(&self, token: &str) -> Option<&LookupEntry> {
        self.by_compact_key
            .get(&compact(token))
            .map(|&idx| &self.entries[idx])
    }

    /// Earliest table key that occurs in `text` as a whole space-delimited word
    pub fn find_key_word(&self, text: &str) -> Option<TableMatch<'_>> {
        self.key_matcher
            .find_overlapping_iter(text)
            .filter(|m| is_word_bounded(text, m.start(), m.end()))
            .min_by_key(|m| (m.pattern().as_usize(), m.start()))
            .map(|m| TableMatch {
                entry: &self.entries[m.pattern().as_usize()],
                span: m.start()..m.end(),
            })
    }

    /// Earliest canonical full form that occurs anywhere in `text`
    pub fn find_full_form(&self, text: &str) -> Option<TableMatch<'_>> {
        self.form_matcher
            .find_overlapping_iter(text)
            .min_by_key(|m| (m.pattern().as_usize(), m.start()))
            .map(|m| TableMatch {
                entry: &self.entries[self.form_entries[m.pattern().as_usize()]],
                span: m.start()..m.end(),
            })
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category names in table order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if categories.last() != Some(&entry.category.as_str()) {
                categories.push(&entry.category);
            }
        }
        categories
    }
}

impl Default for EducationLookup {
    fn default() -> Self {
        Self::builtin().expect("Built-in education table is invalid")
    }
}

impl std::fmt::Debug for EducationLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EducationLookup")
            .field("entries", &self.entries.len())
            .field("canonical_forms", &self.form_entries.len())
            .finish()
    }
}

/// Lowercase and drop dots
fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back().map_or(true, char::is_whitespace);
    let after = text[end..].chars().next().map_or(true, char::is_whitespace);
    before && after
}
