//! CLI interface for job-compat

use crate::config::OutputFormat;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "job-compat")]
#[command(about = "Resume/job compatibility scoring")]
#[command(long_about = "Score candidate profiles against job requirements on education, skills and experience, and rank jobs or candidates by compatibility")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one candidate against one job
    Score {
        /// Candidate profile (TOML or JSON)
        #[arg(long)]
        candidate: PathBuf,

        /// Job requirement (TOML or JSON)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show every matrix row
        #[arg(short, long)]
        detailed: bool,
    },

    /// Rank jobs for a candidate, or candidates for a job
    #[command(group(ArgGroup::new("subject").required(true).args(["candidate", "job"])))]
    Rank {
        /// Candidate profile; ranks the postings in --jobs
        #[arg(long, requires = "jobs")]
        candidate: Option<PathBuf>,

        /// File with a `jobs` array of postings
        #[arg(long)]
        jobs: Option<PathBuf>,

        /// Job requirement; ranks the entries in --candidates
        #[arg(short, long, requires = "candidates", conflicts_with = "candidate")]
        job: Option<PathBuf>,

        /// File with a `candidates` array
        #[arg(long)]
        candidates: Option<PathBuf>,

        /// Number of results to keep (0 keeps all)
        #[arg(short, long)]
        top: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show the matrix for every entry
        #[arg(short, long)]
        detailed: bool,
    },

    /// Normalize an education string to canonical qualifications
    Normalize {
        /// Free-text education, e.g. "B.Tech in CSE; MBA"
        text: String,
    },

    /// Extract the minimum years from an experience requirement
    Experience {
        /// Free-text requirement, e.g. "3-5 years"
        text: String,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
