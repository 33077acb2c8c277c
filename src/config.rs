//! Configuration management for job-compat

use crate::error::{JobCompatError, Result};
use crate::processing::scorer::DEFAULT_MATCH_THRESHOLD;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Sub-score needed for a matrix row to count as matched
    pub match_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub case_insensitive_skills: bool,
    /// Replaces the built-in education lookup table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_table: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub include_recommendations: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of jobs kept by `rank`; 0 keeps all
    pub top_n: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            case_insensitive_skills: true,
            education_table: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            include_recommendations: true,
            color_output: true,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| JobCompatError::Configuration(format!("Failed to parse config: {}", e)))?;
            debug!("Loaded configuration from {}", config_path.display());
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobCompatError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-compat")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.scoring.match_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(JobCompatError::Configuration(format!(
                "scoring.match_threshold must be between 0 and 1, got {}",
                threshold
            )));
        }
        Ok(())
    }
}
