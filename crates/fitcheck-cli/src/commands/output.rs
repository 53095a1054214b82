//! Shared session setup and report output for `take` and `score`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use fitcheck_core::bank::load_bank_or_reference;
use fitcheck_core::config::{load_config_from, FitcheckConfig};
use fitcheck_core::report::AssessmentReport;
use fitcheck_core::session::Session;
use fitcheck_report::html::write_html_report;
use fitcheck_report::markdown::write_markdown_report;

/// A report file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Html,
    Markdown,
}

impl ReportFormat {
    fn extension(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
        }
    }
}

/// Parse a comma-separated format list, or `all`.
pub fn parse_formats(format: &str) -> Result<Vec<ReportFormat>> {
    if format.trim() == "all" {
        return Ok(vec![
            ReportFormat::Json,
            ReportFormat::Html,
            ReportFormat::Markdown,
        ]);
    }
    format
        .split(',')
        .map(str::trim)
        .map(|fmt| match fmt {
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => anyhow::bail!(
                "unknown report format '{other}' (expected json, html, markdown or all)"
            ),
        })
        .collect()
}

/// Resolved settings for a scoring run.
pub struct RunSettings {
    pub config: FitcheckConfig,
    pub output: PathBuf,
    pub formats: Vec<ReportFormat>,
}

/// Merge command-line flags over the loaded configuration.
///
/// Fails before any question is asked if the report format is unknown.
pub fn resolve(
    bank: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<RunSettings> {
    let mut config = load_config_from(config_path.as_deref())?;
    if bank.is_some() {
        config.bank = bank;
    }
    let format = format.unwrap_or_else(|| config.format.clone());
    Ok(RunSettings {
        output: output.unwrap_or_else(|| config.output_dir.clone()),
        formats: parse_formats(&format)?,
        config,
    })
}

/// A fresh session over the configured bank.
pub fn new_session(config: &FitcheckConfig) -> Result<Session> {
    let bank = load_bank_or_reference(config.bank.as_deref())?;
    Ok(Session::with_config(Arc::new(bank), config))
}

/// Write the report in every requested format. Returns the written paths.
pub fn save_report(
    report: &AssessmentReport,
    output: &Path,
    formats: &[ReportFormat],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let mut written = Vec::new();
    for &fmt in formats {
        let path = output.join(format!("report-{timestamp}.{}", fmt.extension()));
        match fmt {
            ReportFormat::Json => {
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            ReportFormat::Html => {
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            ReportFormat::Markdown => {
                write_markdown_report(report, &path)?;
                eprintln!("Markdown summary: {}", path.display());
            }
        }
        written.push(path);
    }
    tracing::info!(report_id = %report.id, files = written.len(), "report saved");

    Ok(written)
}

/// Print scores and guidance to stdout.
pub fn print_summary(report: &AssessmentReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Instrument", "Category", "Score"]);

    for (instrument, overall) in report.scores.overalls() {
        table.add_row(vec![
            Cell::new(instrument.title()),
            Cell::new("overall"),
            Cell::new(format!("{overall}%")),
        ]);
        for c in &report.scores.get(instrument).categories {
            table.add_row(vec![
                Cell::new(""),
                Cell::new(c.category.label()),
                Cell::new(format!("{}%", c.value)),
            ]);
        }
    }

    let rec = &report.recommendation;
    println!("\n{table}");
    println!(
        "\nFinal score: {}/100 ({})",
        rec.final_score, rec.tier
    );
    println!("Should you pursue this career? {}", rec.tier.verdict());
    println!("\n{}", rec.narrative);

    println!("\nNext steps:");
    for (i, step) in rec.next_steps.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }

    println!("\nSuggested roles:");
    for role in &rec.suggested_roles {
        println!(
            "  {} ({} match): {}",
            role.title,
            role.match_level,
            role.skills.join(", ")
        );
    }
}
