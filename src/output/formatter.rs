//! Output formatters for compatibility and ranking reports

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::output::report::*;
use crate::processing::scorer::{CriterionKind, CriterionRow, EDUCATION_WEIGHT, EXPERIENCE_WEIGHT, SKILLS_WEIGHT};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting reports
pub trait OutputFormatter {
    fn format_report(&self, report: &CompatibilityReport) -> Result<String>;
    fn format_ranking(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and aligned tables
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    include_recommendations: bool,
}

/// JSON formatter for structured output
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
    include_recommendations: bool,
}

/// Report generator that dispatches to the formatter for a format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn single_line(text: &str) -> String {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join("; ")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool, include_recommendations: bool) -> Self {
        Self {
            use_colors,
            detailed,
            include_recommendations,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, band: ScoreBand) -> String {
        let color = match band {
            ScoreBand::Excellent => Color::Green,
            ScoreBand::VeryGood => Color::BrightGreen,
            ScoreBand::Good => Color::Yellow,
            ScoreBand::Fair => Color::BrightYellow,
            ScoreBand::BelowAverage => Color::Red,
            ScoreBand::Poor => Color::BrightRed,
        };

        if self.use_colors {
            format!("[{}]", band.label().color(color).bold())
        } else {
            format!("[{}]", band.label())
        }
    }

    fn format_row(&self, row: &CriterionRow) -> String {
        let line = format!(
            "  {:<22} {:<32} {:<32} ",
            truncate(&row.criterion, 22),
            truncate(&single_line(&row.candidate_value), 32),
            truncate(&single_line(&row.required_value), 32),
        );
        let verdict = format!("{:<4} {}", row.match_label(), row.comment);
        let color = if row.matched { Color::Green } else { Color::Red };
        format!("{}{}\n", line, self.colorize(&verdict, color))
    }

    fn format_matrix(&self, rows: &[CriterionRow]) -> String {
        let mut output = format!(
            "  {:<22} {:<32} {:<32} {:<4} {}\n",
            "Criterion", "Candidate", "Required", "Match", "Comment"
        );
        output.push_str(&format!("  {}\n", "-".repeat(100)));

        for row in rows {
            // Without --detailed only gaps are listed among skills
            if !self.detailed && row.kind == CriterionKind::Skill && row.matched {
                continue;
            }
            output.push_str(&self.format_row(row));
        }
        output
    }

    fn format_recommendations(&self, recommendations: &[String]) -> String {
        let mut output = String::new();
        for recommendation in recommendations {
            output.push_str(&format!("  • {}\n", self.colorize(recommendation, Color::Cyan)));
        }
        output
    }

    fn format_footer(&self, metadata: &ReportMetadata) -> String {
        format!(
            "\n{} Generated by job-compat v{} at {} ({}ms)\n",
            self.colorize("ℹ", Color::Blue),
            metadata.tool_version,
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.processing_time_ms
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &CompatibilityReport) -> Result<String> {
        let mut output = String::new();
        let scores = &report.comparison.scores;

        output.push_str(&self.format_header("COMPATIBILITY REPORT", 1));
        output.push_str(&format!(
            "Candidate: {} | Job: {}\n",
            report.metadata.candidate_source, report.metadata.job_source
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Overall Score: {:.2}% {}\n",
            scores.overall,
            self.format_score_badge(report.summary.band)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.summary.verdict, Color::Cyan)));

        output.push_str(&self.format_header("Score Breakdown", 3));
        output.push_str(&format!(
            "  Education:  {:>6.2}% (weight: {:.0}%)\n",
            scores.education,
            EDUCATION_WEIGHT * 100.0
        ));
        output.push_str(&format!(
            "  Skills:     {:>6.2}% (weight: {:.0}%) {}/{} matched\n",
            scores.skills,
            SKILLS_WEIGHT * 100.0,
            report.summary.matched_skills,
            report.summary.required_skills
        ));
        output.push_str(&format!(
            "  Experience: {:>6.2}% (weight: {:.0}%)\n",
            scores.experience,
            EXPERIENCE_WEIGHT * 100.0
        ));

        if !report.comparison.matrix.is_empty() {
            output.push_str(&self.format_header("Compatibility Matrix", 2));
            output.push_str(&self.format_matrix(&report.comparison.matrix));
        }

        output.push_str(&self.format_header("Recommendation", 2));
        output.push_str(&format!("  {}\n", scores.recommendation));

        if self.include_recommendations && !report.recommendations.is_empty() {
            output.push_str(&self.format_header("Next Steps", 3));
            output.push_str(&self.format_recommendations(&report.recommendations));
        }

        output.push_str(&self.format_footer(&report.metadata));
        Ok(output)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        let title = match report.view {
            RankingView::Jobs => "TOP JOB MATCHES",
            RankingView::Candidates => "TOP CANDIDATES",
        };
        output.push_str(&self.format_header(title, 1));
        output.push_str(&format!(
            "Candidate: {} | Job: {}\n",
            report.metadata.candidate_source, report.metadata.job_source
        ));

        if report.entries.is_empty() {
            output.push_str("\nNothing to rank.\n");
        }

        for entry in &report.entries {
            output.push_str(&self.format_header(&format!("{}. {}", entry.rank, entry.title), 2));
            let scores = &entry.comparison.scores;
            output.push_str(&format!(
                "Overall: {:.2}% {} | Education {:.2}% | Skills {:.2}% ({}/{}) | Experience {:.2}%\n",
                scores.overall,
                self.format_score_badge(entry.summary.band),
                scores.education,
                scores.skills,
                entry.summary.matched_skills,
                entry.summary.required_skills,
                scores.experience
            ));

            if self.detailed && !entry.comparison.matrix.is_empty() {
                output.push('\n');
                output.push_str(&self.format_matrix(&entry.comparison.matrix));
            }

            if self.include_recommendations {
                output.push_str(&self.format_recommendations(&entry.recommendations));
            }
        }

        output.push_str(&self.format_footer(&report.metadata));
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &CompatibilityReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, include_recommendations: bool) -> Self {
        Self {
            include_metadata,
            include_recommendations,
        }
    }

    fn markdown_score_badge(band: ScoreBand) -> &'static str {
        match band {
            ScoreBand::Excellent => "🟢 Excellent",
            ScoreBand::VeryGood => "🟡 Very Good",
            ScoreBand::Good => "🟠 Good",
            ScoreBand::Fair => "🔴 Fair",
            ScoreBand::BelowAverage => "🔴 Below Average",
            ScoreBand::Poor => "🔴 Poor",
        }
    }

    fn cell(text: &str) -> String {
        text.trim().replace('|', "\\|").replace('\n', "<br>")
    }

    fn matrix_table(rows: &[CriterionRow]) -> String {
        let mut output = String::from("| Criterion | Candidate | Required | Match | Comment |\n");
        output.push_str("|-----------|-----------|----------|-------|---------|\n");
        for row in rows {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                Self::cell(&row.criterion),
                Self::cell(&row.candidate_value),
                Self::cell(&row.required_value),
                row.match_label(),
                Self::cell(&row.comment)
            ));
        }
        output.push('\n');
        output
    }

    fn metadata_line(metadata: &ReportMetadata) -> String {
        format!(
            "**Generated:** {} | **Candidate:** `{}` | **Job:** `{}`\n\n",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.candidate_source,
            metadata.job_source
        )
    }

    fn footer(metadata: &ReportMetadata) -> String {
        format!("---\n\n*Generated by job-compat v{}*\n", metadata.tool_version)
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &CompatibilityReport) -> Result<String> {
        let mut output = String::from("# Compatibility Report\n\n");
        let scores = &report.comparison.scores;

        if self.include_metadata {
            output.push_str(&Self::metadata_line(&report.metadata));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Overall Score:** {:.2}% {}\n\n",
            scores.overall,
            Self::markdown_score_badge(report.summary.band)
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", report.summary.verdict));

        output.push_str("| Component | Score | Weight |\n");
        output.push_str("|-----------|-------|--------|\n");
        output.push_str(&format!("| Education | {:.2}% | {:.0}% |\n", scores.education, EDUCATION_WEIGHT * 100.0));
        output.push_str(&format!("| Skills | {:.2}% | {:.0}% |\n", scores.skills, SKILLS_WEIGHT * 100.0));
        output.push_str(&format!("| Experience | {:.2}% | {:.0}% |\n\n", scores.experience, EXPERIENCE_WEIGHT * 100.0));

        if !report.comparison.matrix.is_empty() {
            output.push_str("## Compatibility Matrix\n\n");
            output.push_str(&Self::matrix_table(&report.comparison.matrix));
        }

        output.push_str("## Recommendation\n\n");
        output.push_str(&format!("{}\n\n", scores.recommendation));

        if self.include_recommendations && !report.recommendations.is_empty() {
            output.push_str("### Next Steps\n\n");
            for recommendation in &report.recommendations {
                output.push_str(&format!("- {}\n", recommendation));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str(&Self::footer(&report.metadata));
        }

        Ok(output)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut output = match report.view {
            RankingView::Jobs => String::from("# Top Job Matches\n\n"),
            RankingView::Candidates => String::from("# Top Candidates\n\n"),
        };

        if self.include_metadata {
            output.push_str(&Self::metadata_line(&report.metadata));
        }

        output.push_str("| Rank | Match | Overall | Education | Skills | Experience |\n");
        output.push_str("|------|-------|---------|-----------|--------|------------|\n");
        for entry in &report.entries {
            let scores = &entry.comparison.scores;
            output.push_str(&format!(
                "| {} | {} | {:.2}% | {:.2}% | {:.2}% | {:.2}% |\n",
                entry.rank,
                Self::cell(&entry.title),
                scores.overall,
                scores.education,
                scores.skills,
                scores.experience
            ));
        }
        output.push('\n');

        if self.include_recommendations {
            for entry in &report.entries {
                output.push_str(&format!("## {}. {}\n\n", entry.rank, entry.title));
                for recommendation in &entry.recommendations {
                    output.push_str(&format!("- {}\n", recommendation));
                }
                output.push('\n');
            }
        }

        if self.include_metadata {
            output.push_str(&Self::footer(&report.metadata));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false, true),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true, true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_recommendations: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed, include_recommendations),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata, include_recommendations),
        }
    }

    pub fn from_config(output: &OutputConfig, detailed: bool) -> Self {
        Self::with_options(
            output.color_output,
            output.detailed || detailed,
            true,
            true,
            output.include_recommendations,
        )
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_report(&self, report: &CompatibilityReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_ranking(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_ranking(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, source_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(source_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_compat{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_compat{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_compat{}.md", base_name, timestamp_suffix),
    }
}
