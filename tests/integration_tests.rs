//! Integration tests for job-compat

use job_compat::config::{Config, OutputFormat};
use job_compat::error::JobCompatError;
use job_compat::input::InputManager;
use job_compat::output::{CompatibilityReport, RankingReport, ReportGenerator, ReportMetadata};
use job_compat::processing::education_table::EducationLookup;
use job_compat::processing::ranking::{rank_candidates, rank_jobs};
use job_compat::processing::recommendations::generate_recommendations;
use job_compat::processing::scorer::{CandidateProfile, CompatibilityScorer, CriterionKind, JobRequirement};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_score_from_fixture_files() {
    let mut manager = InputManager::new();
    let candidate = manager.load_candidate(Path::new("tests/fixtures/candidate.toml")).await.unwrap();
    let job = manager.load_job(Path::new("tests/fixtures/job.toml")).await.unwrap();

    assert_eq!(job.skills, vec!["Python", "Java"]);

    let comparison = CompatibilityScorer::default().compare(&candidate, &job);
    assert_eq!(comparison.scores.education, 100.0);
    assert_eq!(comparison.scores.experience, 100.0);
    assert_eq!(comparison.scores.skills, 50.0);
    assert_eq!(comparison.scores.overall, 80.0);
    assert_eq!(
        generate_recommendations(&comparison.matrix, &job),
        vec!["Upskill in: java."]
    );
}

#[tokio::test]
async fn test_structured_education_from_json() {
    let mut manager = InputManager::new();
    let candidate = manager.load_candidate(Path::new("tests/fixtures/candidate.json")).await.unwrap();

    assert_eq!(candidate.skills, vec!["Rust", "SQL", "Docker"]);
    assert_eq!(candidate.experience_years, 4.5);

    let scorer = CompatibilityScorer::default();
    let job = JobRequirement {
        education: "MBA".into(),
        skills: vec!["SQL".into()],
        experience: "3 years".into(),
    };
    let comparison = scorer.compare(&candidate, &job);
    assert_eq!(comparison.scores.overall, 100.0);

    let education_row = &comparison.matrix[0];
    assert_eq!(education_row.kind, CriterionKind::Education);
    assert_eq!(education_row.candidate_value, "B.Tech from IIT Bombay (2019)\nMBA");
}

#[tokio::test]
async fn test_rank_jobs_from_file() {
    let mut manager = InputManager::new();
    let candidate = manager.load_candidate(Path::new("tests/fixtures/candidate.json")).await.unwrap();
    let jobs = manager.load_jobs(Path::new("tests/fixtures/jobs.toml")).await.unwrap();
    assert_eq!(jobs.len(), 3);

    let ranked = rank_jobs(&CompatibilityScorer::default(), &candidate, &jobs, 0);
    let ids: Vec<&str> = ranked.iter().map(|m| m.job.id.as_str()).collect();
    assert_eq!(ids, vec!["platform", "backend", "research"]);
    assert_eq!(ranked[0].comparison.scores.overall, 100.0);
    assert_eq!(ranked[1].comparison.scores.overall, 87.0);
    assert_eq!(ranked[1].recommendations, vec!["Upskill in: kafka."]);

    let report = RankingReport::from_job_matches(ranked, ReportMetadata::new("candidate.json", "jobs.toml", 0));
    assert_eq!(report.entries[0].title, "Platform Engineer at Cloudy");
    assert_eq!(report.entries[2].rank, 3);
}

#[tokio::test]
async fn test_rank_candidates_from_file() {
    let mut manager = InputManager::new();
    let job = manager.load_job(Path::new("tests/fixtures/job.toml")).await.unwrap();
    let candidates = manager.load_candidates(Path::new("tests/fixtures/candidates.json")).await.unwrap();

    let ranked = rank_candidates(&CompatibilityScorer::default(), &job, &candidates, 1);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].candidate.name, "Ravi");
    assert_eq!(ranked[0].comparison.scores.overall, 100.0);
}

#[tokio::test]
async fn test_caching_functionality() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("job.toml");
    std::fs::write(&path, "education = \"MBA\"\nskills = [\"Excel\"]\n").unwrap();

    let mut manager = InputManager::new();
    let first = manager.load_job(&path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    // A second load is served from the cache, not from disk
    std::fs::write(&path, "education = \"PhD\"\n").unwrap();
    let second = manager.load_job(&path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    let mut uncached = InputManager::new().with_cache(false);
    let fresh = uncached.load_job(&path).await.unwrap();
    assert_eq!(fresh.education, "PhD");
    assert_eq!(uncached.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.load_job(Path::new("tests/fixtures/unsupported.txt")).await;
    assert!(matches!(result, Err(JobCompatError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.load_candidate(Path::new("tests/fixtures/nonexistent.toml")).await;
    assert!(matches!(result, Err(JobCompatError::InvalidInput(_))));
}

#[tokio::test]
async fn test_malformed_and_empty_files() {
    let temp_dir = TempDir::new().unwrap();
    let broken = temp_dir.path().join("broken.json");
    std::fs::write(&broken, "{ \"skills\": ").unwrap();
    let empty_jobs = temp_dir.path().join("jobs.toml");
    std::fs::write(&empty_jobs, "jobs = []\n").unwrap();

    let mut manager = InputManager::new().with_cache(false);
    assert!(matches!(
        manager.load_job(&broken).await,
        Err(JobCompatError::Serialization(_))
    ));
    assert!(matches!(
        manager.load_jobs(&empty_jobs).await,
        Err(JobCompatError::InvalidInput(_))
    ));
    assert_eq!(manager.cache_size(), 0);
}

#[test]
fn test_custom_education_table_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let table = temp_dir.path().join("table.toml");
    std::fs::write(
        &table,
        r#"
[[category]]
name = "custom"
entries = [
    ["hnd", "Higher National Diploma"],
    ["higher national diploma", "Higher National Diploma"],
]
"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.matching.education_table = Some(table.clone());
    let scorer = CompatibilityScorer::from_config(&config).unwrap();
    assert_eq!(
        scorer.normalizer().normalize_education("HND"),
        vec!["Higher National Diploma"]
    );

    config.matching.education_table = Some(temp_dir.path().join("missing.toml"));
    assert!(CompatibilityScorer::from_config(&config).is_err());
}

#[test]
fn test_case_sensitive_skills_from_config() {
    let mut config = Config::default();
    config.matching.case_insensitive_skills = false;
    let scorer = CompatibilityScorer::from_config(&config).unwrap();

    let comparison = scorer.compare(
        &CandidateProfile {
            education: "MSc".into(),
            skills: vec!["python".into()],
            experience_years: 1.0,
        },
        &JobRequirement {
            education: String::new(),
            skills: vec!["Python".into()],
            experience: String::new(),
        },
    );
    assert_eq!(comparison.scores.skills, 0.0);
}

#[test]
fn test_shared_lookup_across_threads() {
    let scorer = Arc::new(CompatibilityScorer::new(Arc::new(EducationLookup::builtin().unwrap())));
    let candidate = CandidateProfile {
        education: "B.E. in Mechanical Engineering".into(),
        skills: vec!["CAD".into()],
        experience_years: 2.0,
    };
    let job = JobRequirement {
        education: "Bachelor of Engineering".into(),
        skills: vec!["CAD".into(), "FEA".into()],
        experience: "1-3 years".into(),
    };
    let expected = scorer.compare(&candidate, &job);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scorer = Arc::clone(&scorer);
            let candidate = candidate.clone();
            let job = job.clone();
            std::thread::spawn(move || scorer.compare(&candidate, &job))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_report_output_formats() {
    let scorer = CompatibilityScorer::default();
    let job = JobRequirement {
        education: "Any Postgraduate".into(),
        skills: vec!["Excel".into()],
        experience: "5+ years".into(),
    };
    let comparison = scorer.compare(
        &CandidateProfile {
            education: "MBA".into(),
            skills: vec!["Excel".into()],
            experience_years: 2.0,
        },
        &job,
    );
    let recommendations = generate_recommendations(&comparison.matrix, &job);
    assert_eq!(recommendations, vec!["Consider gaining more relevant experience."]);

    let report = CompatibilityReport::new(comparison, recommendations, ReportMetadata::new("c.toml", "j.toml", 1));
    let generator = ReportGenerator::with_options(false, true, true, true, true);

    let json = generator.generate_report(&report, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["comparison"]["scores"]["education"], 100.0);
    assert_eq!(value["comparison"]["scores"]["experience"], 40.0);

    let markdown = generator.generate_report(&report, OutputFormat::Markdown).unwrap();
    assert!(markdown.contains("- Consider gaining more relevant experience."));

    let console = generator.generate_report(&report, OutputFormat::Console).unwrap();
    assert!(console.contains("Experience mismatch"));
}
