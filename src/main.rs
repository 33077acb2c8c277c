//! job-compat: resume/job compatibility scoring

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use job_compat::cli::{self, Cli, Commands, ConfigAction};
use job_compat::config::{Config, OutputFormat};
use job_compat::error::{JobCompatError, Result};
use job_compat::input::InputManager;
use job_compat::output::{
    save_report_to_file, suggest_filename, CompatibilityReport, RankingReport, ReportGenerator, ReportMetadata,
};
use job_compat::processing::education::EducationLevel;
use job_compat::processing::ranking::{rank_candidates_with_progress, rank_jobs_with_progress};
use job_compat::processing::recommendations::generate_recommendations;
use job_compat::processing::CompatibilityScorer;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

const INPUT_EXTENSIONS: &[&str] = &["toml", "json"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(JobCompatError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn validate_input(path: &Path, label: &str) -> Result<()> {
    cli::validate_file_extension(path, INPUT_EXTENSIONS)
        .map_err(|e| JobCompatError::InvalidInput(format!("{} file: {}", label, e)))
}

/// Print the report, or save it. A directory gets a generated file name.
fn emit(content: &str, save: Option<&PathBuf>, format: OutputFormat, source: &Path) -> Result<()> {
    match save {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(suggest_filename(format, &source.to_string_lossy(), true))
            } else {
                path.clone()
            };
            save_report_to_file(content, &path)?;
            info!("Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress
}

async fn run_command(command: Commands, config: Config, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Score {
            candidate,
            job,
            output,
            save,
            detailed,
        } => {
            validate_input(&candidate, "Candidate")?;
            validate_input(&job, "Job")?;
            let format = resolve_format(output.as_deref(), &config)?;

            let started = Instant::now();
            let scorer = CompatibilityScorer::from_config(&config)?;
            // Each path is read once per run
            let mut input_manager = InputManager::new().with_cache(false);
            let profile = input_manager.load_candidate(&candidate).await?;
            let requirement = input_manager.load_job(&job).await?;

            let comparison = scorer.compare(&profile, &requirement);
            if comparison.is_degraded() {
                warn!("Scoring degraded; reporting zero scores");
            }
            let recommendations = generate_recommendations(&comparison.matrix, &requirement);

            let metadata = ReportMetadata::new(
                candidate.display().to_string(),
                job.display().to_string(),
                started.elapsed().as_millis() as u64,
            );
            let report = CompatibilityReport::new(comparison, recommendations, metadata);

            let generator = ReportGenerator::from_config(&config.output, detailed);
            let content = generator.generate_report(&report, format)?;
            emit(&content, save.as_ref(), format, &candidate)?;
        }

        Commands::Rank {
            candidate,
            jobs,
            job,
            candidates,
            top,
            output,
            save,
            detailed,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let top_n = top.unwrap_or(config.ranking.top_n);
            let started = Instant::now();
            let scorer = CompatibilityScorer::from_config(&config)?;
            // Each path is read once per run
            let mut input_manager = InputManager::new().with_cache(false);

            let source = candidate.clone().or_else(|| job.clone()).unwrap_or_default();
            let report = match (candidate, jobs, job, candidates) {
                (Some(candidate), Some(jobs), _, _) => {
                    validate_input(&candidate, "Candidate")?;
                    validate_input(&jobs, "Jobs")?;
                    let profile = input_manager.load_candidate(&candidate).await?;
                    let postings = input_manager.load_jobs(&jobs).await?;
                    info!("Ranking {} jobs", postings.len());

                    let progress = progress_bar(postings.len());
                    let matches = rank_jobs_with_progress(&scorer, &profile, &postings, top_n, |posting| {
                        progress.set_message(posting.title());
                        progress.inc(1);
                    });
                    progress.finish_and_clear();

                    let metadata = ReportMetadata::new(
                        candidate.display().to_string(),
                        jobs.display().to_string(),
                        started.elapsed().as_millis() as u64,
                    );
                    RankingReport::from_job_matches(matches, metadata)
                }
                (_, _, Some(job), Some(candidates)) => {
                    validate_input(&job, "Job")?;
                    validate_input(&candidates, "Candidates")?;
                    let requirement = input_manager.load_job(&job).await?;
                    let entries = input_manager.load_candidates(&candidates).await?;
                    info!("Ranking {} candidates", entries.len());

                    let progress = progress_bar(entries.len());
                    let matches = rank_candidates_with_progress(&scorer, &requirement, &entries, top_n, |entry| {
                        progress.set_message(entry.name.clone());
                        progress.inc(1);
                    });
                    progress.finish_and_clear();

                    let metadata = ReportMetadata::new(
                        candidates.display().to_string(),
                        job.display().to_string(),
                        started.elapsed().as_millis() as u64,
                    );
                    RankingReport::from_candidate_matches(matches, metadata)
                }
                _ => {
                    return Err(JobCompatError::InvalidInput(
                        "rank needs --candidate with --jobs, or --job with --candidates".to_string(),
                    ));
                }
            };

            let generator = ReportGenerator::from_config(&config.output, detailed);
            let content = generator.generate_ranking(&report, format)?;
            emit(&content, save.as_ref(), format, &source)?;
        }

        Commands::Normalize { text } => {
            let scorer = CompatibilityScorer::from_config(&config)?;
            let qualifications = scorer.normalizer().normalize_education(&text);

            if qualifications.is_empty() {
                println!("No qualifications found");
            }
            for qualification in &qualifications {
                println!("{} ({})", qualification, EducationLevel::classify(qualification));
            }
        }

        Commands::Experience { text } => {
            let scorer = CompatibilityScorer::from_config(&config)?;
            let years = scorer.experience_parser().extract_min_experience(&text);
            println!("Minimum experience: {} years", years);
        }

        Commands::Config { action } => {
            let config_path = config_override.unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    println!("Current Configuration ({})\n", config_path.display());
                    println!("Scoring:");
                    println!("  Match threshold: {:.2}", config.scoring.match_threshold);
                    println!("\nMatching:");
                    println!("  Case-insensitive skills: {}", config.matching.case_insensitive_skills);
                    match &config.matching.education_table {
                        Some(path) => println!("  Education table: {}", path.display()),
                        None => println!("  Education table: built-in"),
                    }
                    println!("\nOutput:");
                    println!("  Format: {:?}", config.output.format);
                    println!("  Detailed: {}", config.output.detailed);
                    println!("  Include recommendations: {}", config.output.include_recommendations);
                    println!("  Color output: {}", config.output.color_output);
                    println!("\nRanking:");
                    println!("  Top N: {}", config.ranking.top_n);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&config_path)?;
                    println!("Configuration reset: {}", config_path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
        }
    }

    Ok(())
}
