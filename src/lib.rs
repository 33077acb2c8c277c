//! Resume/job compatibility scoring library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{JobCompatError, Result};
pub use processing::{CandidateProfile, Comparison, CompatibilityScorer, JobRequirement};
