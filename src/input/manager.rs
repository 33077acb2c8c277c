//! Input manager for loading candidate profiles and job files

use crate::error::{JobCompatError, Result};
use crate::input::file_detector::FileType;
use crate::processing::ranking::{CandidateEntry, JobPosting};
use crate::processing::scorer::{CandidateProfile, JobRequirement};
use log::info;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct JobsFile {
    #[serde(default)]
    jobs: Vec<JobPosting>,
}

#[derive(Debug, Deserialize)]
struct CandidatesFile {
    #[serde(default)]
    candidates: Vec<CandidateEntry>,
}

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn load_candidate(&mut self, path: &Path) -> Result<CandidateProfile> {
        self.load(path).await
    }

    pub async fn load_job(&mut self, path: &Path) -> Result<JobRequirement> {
        self.load(path).await
    }

    /// Load a file holding a `jobs` array of postings
    pub async fn load_jobs(&mut self, path: &Path) -> Result<Vec<JobPosting>> {
        let file: JobsFile = self.load(path).await?;
        if file.jobs.is_empty() {
            return Err(JobCompatError::InvalidInput(format!(
                "No jobs found in {}",
                path.display()
            )));
        }
        Ok(file.jobs)
    }

    /// Load a file holding a `candidates` array
    pub async fn load_candidates(&mut self, path: &Path) -> Result<Vec<CandidateEntry>> {
        let file: CandidatesFile = self.load(path).await?;
        if file.candidates.is_empty() {
            return Err(JobCompatError::InvalidInput(format!(
                "No candidates found in {}",
                path.display()
            )));
        }
        Ok(file.candidates)
    }

    async fn load<T: DeserializeOwned>(&mut self, path: &Path) -> Result<T> {
        let file_type = FileType::from_path(path);
        let content = self.read_text(path).await?;

        match file_type {
            FileType::Toml => Ok(toml::from_str(&content)?),
            FileType::Json => Ok(serde_json::from_str(&content)?),
            FileType::Unknown => Err(JobCompatError::UnsupportedFormat(format!(
                "Unsupported file type for: {} (expected .toml or .json)",
                path.display()
            ))),
        }
    }

    pub async fn read_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                info!("Using cached contents for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(JobCompatError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        info!("Reading {}", path.display());
        let text = tokio::fs::read_to_string(path).await?;

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
