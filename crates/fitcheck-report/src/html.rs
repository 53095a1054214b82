//! HTML results page generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use fitcheck_core::report::AssessmentReport;
use fitcheck_core::scoring::{InstrumentScore, ScoreBand, ScoreSet};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn band_class(value: u8) -> &'static str {
    match ScoreBand::of(value) {
        ScoreBand::Strong => "strong",
        ScoreBand::Moderate => "moderate",
        ScoreBand::Weak => "weak",
    }
}

fn band_color(value: u8) -> &'static str {
    match ScoreBand::of(value) {
        ScoreBand::Strong => "#22c55e",
        ScoreBand::Moderate => "#eab308",
        ScoreBand::Weak => "#ef4444",
    }
}

/// Generate an HTML results page from an assessment report.
pub fn generate_html(report: &AssessmentReport) -> String {
    let rec = &report.recommendation;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>fitcheck results: {}</title>\n",
        html_escape(&report.bank.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Assessment Results</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Bank: <strong>{}</strong> | {} questions | {}</p>\n",
        html_escape(&report.bank.name),
        report.bank.question_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Verdict
    html.push_str(&format!(
        "<section class=\"verdict {}\">\n",
        band_class(rec.final_score)
    ));
    html.push_str(&format!(
        "<p class=\"final\">{}<span>/100</span></p>\n",
        rec.final_score
    ));
    html.push_str(&format!(
        "<h2>Should you pursue this career? {}</h2>\n",
        rec.tier.verdict()
    ));
    html.push_str(&format!("<p>{}</p>\n", html_escape(&rec.narrative)));
    html.push_str("</section>\n");

    // Instrument overview
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&generate_bar_chart(&report.scores));
    html.push_str("</section>\n");

    // Category breakdown
    html.push_str("<section class=\"categories\">\n");
    html.push_str("<h2>Breakdown</h2>\n");
    for (instrument, _) in report.scores.overalls() {
        html.push_str(&instrument_table(report.scores.get(instrument)));
    }
    html.push_str("</section>\n");

    // Guidance
    html.push_str("<section class=\"guidance\">\n");
    html.push_str("<h2>Next Steps</h2>\n<ol>\n");
    for step in &rec.next_steps {
        html.push_str(&format!("<li>{}</li>\n", html_escape(step)));
    }
    html.push_str("</ol>\n");

    html.push_str("<h2>Suggested Roles</h2>\n");
    html.push_str("<table class=\"roles\">\n");
    html.push_str("<thead><tr><th>Role</th><th>Match</th><th>Skills</th></tr></thead>\n<tbody>\n");
    for role in &rec.suggested_roles {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"match-{}\">{}</td><td>{}</td></tr>\n",
            html_escape(&role.title),
            role.match_level.to_string().to_lowercase(),
            role.match_level,
            html_escape(&role.skills.join(", "))
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML results page to a file.
pub fn write_html_report(report: &AssessmentReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn instrument_table(score: &InstrumentScore) -> String {
    let mut table = format!(
        "<h3>{} <span class=\"{}\">{}%</span></h3>\n",
        score.instrument.title(),
        band_class(score.overall),
        score.overall
    );
    table.push_str("<table class=\"category-table\">\n");
    table.push_str("<thead><tr><th>Category</th><th>Score</th></tr></thead>\n<tbody>\n");
    for c in &score.categories {
        table.push_str(&format!(
            "<tr><td>{}</td><td class=\"{}\">{}%</td></tr>\n",
            c.category.label(),
            band_class(c.value),
            c.value
        ));
    }
    table.push_str("</tbody></table>\n");
    table
}

fn generate_bar_chart(scores: &ScoreSet) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let bars = scores.overalls();
    let total_height = bars.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (instrument, overall)) in bars.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = usize::from(*overall) * max_width / 100;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            instrument.title()
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width,
            y,
            width,
            bar_height,
            band_color(*overall)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            overall
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --strong: #dcfce7; --moderate: #fef9c3; --weak: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --strong: #064e3b; --moderate: #713f12; --weak: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.verdict { padding: 1rem 2rem; border-radius: 8px; }
.final { font-size: 3rem; font-weight: bold; margin: 0; }
.final span { font-size: 1.25rem; color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.strong { background: var(--strong); }
.moderate { background: var(--moderate); }
.weak { background: var(--weak); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::make_test_report;

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Test Bank"));
        assert!(html.contains("Psychological Fit"));
        assert!(html.contains("Real-World Alignment"));
        assert!(html.contains("Should you pursue this career? Maybe"));
        assert!(html.contains("Web3 Product Manager"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn bars_are_colored_by_band() {
        let report = make_test_report();
        let html = generate_html(&report);
        // 80 / 60 / 40
        assert!(html.contains("fill=\"#22c55e\""));
        assert!(html.contains("fill=\"#eab308\""));
        assert!(html.contains("fill=\"#ef4444\""));
    }

    #[test]
    fn html_escapes_bank_name() {
        let mut report = make_test_report();
        report.bank.name = "<script>alert(1)</script>".into();
        let html = generate_html(&report);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
