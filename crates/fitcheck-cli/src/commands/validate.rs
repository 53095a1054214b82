//! The `fitcheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use fitcheck_core::bank::parse_bank;
use fitcheck_core::model::Instrument;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = parse_bank(&bank_path)?;

    println!("Bank: {} ({} questions)", bank.name, bank.total_questions());

    let mut total_warnings = 0;

    for instrument in Instrument::ALL {
        println!(
            "  {} ({} questions)",
            instrument.title(),
            bank.questions(instrument).len()
        );
        for (category, count) in bank.category_counts(instrument) {
            if count == 0 {
                println!(
                    "    {:<24} WARNING: no questions, omitted from scores",
                    category.label()
                );
                total_warnings += 1;
            } else {
                println!("    {:<24} {count}", category.label());
            }
        }
    }

    if total_warnings == 0 {
        println!("Bank is valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
