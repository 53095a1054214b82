//! The `fitcheck compare` command.

use std::path::PathBuf;

use anyhow::Result;

use fitcheck_core::report::AssessmentReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: u8,
    fail_on_decline: bool,
    format: String,
) -> Result<()> {
    let baseline = AssessmentReport::load_json(&baseline_path)?;
    let current = AssessmentReport::load_json(&current_path)?;

    let cmp = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", cmp.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&cmp)?);
        }
        _ => {
            // text format
            println!(
                "Final score: {} -> {} ({:+})",
                cmp.baseline_final, cmp.current_final, cmp.final_delta
            );
            if cmp.tier_changed() {
                println!("Tier: {} -> {}", cmp.baseline_tier, cmp.current_tier);
            } else {
                println!("Tier: {} (unchanged)", cmp.current_tier);
            }

            println!();
            for i in &cmp.instruments {
                println!(
                    "  {:<20} {:>3}% -> {:>3}% ({:+})",
                    i.instrument.title(),
                    i.baseline,
                    i.current,
                    i.delta
                );
            }

            println!(
                "\nCategories: {} declines, {} improvements, {} unchanged",
                cmp.declines.len(),
                cmp.improvements.len(),
                cmp.unchanged
            );

            if !cmp.declines.is_empty() {
                println!("\nDeclines:");
                for c in &cmp.declines {
                    println!(
                        "  {} ({}) {}% -> {}% ({:+})",
                        c.category.label(),
                        c.category.instrument(),
                        c.baseline,
                        c.current,
                        c.delta
                    );
                }
            }

            if !cmp.improvements.is_empty() {
                println!("\nImprovements:");
                for c in &cmp.improvements {
                    println!(
                        "  {} ({}) {}% -> {}% ({:+})",
                        c.category.label(),
                        c.category.instrument(),
                        c.baseline,
                        c.current,
                        c.delta
                    );
                }
            }
        }
    }

    if fail_on_decline && cmp.has_declines() {
        std::process::exit(1);
    }

    Ok(())
}
