//! Markdown results summary.

use anyhow::Result;
use std::path::Path;

use fitcheck_core::report::AssessmentReport;
use fitcheck_core::scoring::ScoreBand;

fn band_label(value: u8) -> &'static str {
    match ScoreBand::of(value) {
        ScoreBand::Strong => "strong",
        ScoreBand::Moderate => "moderate",
        ScoreBand::Weak => "weak",
    }
}

/// Generate a markdown summary of an assessment report.
pub fn generate_markdown(report: &AssessmentReport) -> String {
    let rec = &report.recommendation;
    let mut md = String::new();

    md.push_str("# Assessment Results\n\n");
    md.push_str(&format!(
        "Bank: **{}** ({} questions), {}\n\n",
        report.bank.name,
        report.bank.question_count,
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    md.push_str(&format!(
        "## Final score: {}/100 ({})\n\n",
        rec.final_score, rec.tier
    ));
    md.push_str(&format!(
        "**Should you pursue this career?** {}\n\n",
        rec.tier.verdict()
    ));
    md.push_str(&format!("{}\n\n", rec.narrative));

    md.push_str("## Scores\n\n");
    md.push_str("| Instrument | Category | Score | Band |\n");
    md.push_str("|------------|----------|-------|------|\n");
    for (instrument, overall) in report.scores.overalls() {
        md.push_str(&format!(
            "| **{}** | overall | **{}%** | {} |\n",
            instrument.title(),
            overall,
            band_label(overall)
        ));
        for c in &report.scores.get(instrument).categories {
            md.push_str(&format!(
                "| | {} | {}% | {} |\n",
                c.category.label(),
                c.value,
                band_label(c.value)
            ));
        }
    }
    md.push('\n');

    md.push_str("## Next steps\n\n");
    for (i, step) in rec.next_steps.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, step));
    }
    md.push('\n');

    md.push_str("## Suggested roles\n\n");
    for role in &rec.suggested_roles {
        md.push_str(&format!(
            "- **{}** ({} match): {}\n",
            role.title,
            role.match_level,
            role.skills.join(", ")
        ));
    }

    md
}

/// Write a markdown summary to a file.
pub fn write_markdown_report(report: &AssessmentReport, path: &Path) -> Result<()> {
    let md = generate_markdown(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)?;
    Ok(())
}
