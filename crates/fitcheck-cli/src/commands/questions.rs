//! The `fitcheck questions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use fitcheck_core::bank::load_bank_or_reference;
use fitcheck_core::model::Instrument;

pub fn execute(stage: Option<String>, bank_path: Option<PathBuf>) -> Result<()> {
    let bank = load_bank_or_reference(bank_path.as_deref())?;

    let instruments: Vec<Instrument> = match &stage {
        Some(s) => vec![s.parse().map_err(anyhow::Error::msg)?],
        None => Instrument::ALL.to_vec(),
    };

    for instrument in instruments {
        let catalog = bank.catalog(instrument);
        println!("{} ({} questions)", instrument.title(), catalog.len());

        let mut table = Table::new();
        if instrument.is_likert() {
            table.set_header(vec!["#", "ID", "Category", "Statement"]);
        } else {
            table.set_header(vec!["#", "ID", "Category", "Question", "Options"]);
        }

        for (i, q) in catalog.questions.iter().enumerate() {
            let mut row = vec![
                Cell::new(i + 1),
                Cell::new(&q.id),
                Cell::new(q.category.label()),
                Cell::new(&q.prompt),
            ];
            if !instrument.is_likert() {
                let options: Vec<String> = q
                    .options
                    .iter()
                    .enumerate()
                    .map(|(j, o)| format!("{}) {o}", j + 1))
                    .collect();
                row.push(Cell::new(options.join("\n")));
            }
            table.add_row(row);
        }

        println!("{table}\n");
    }

    Ok(())
}
