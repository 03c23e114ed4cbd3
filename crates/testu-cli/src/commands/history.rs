//! The `testu history` command: list recent quiz results.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use testu_core::history::HistoryStore;
use testu_providers::load_config_from;

pub fn execute(limit: usize, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = HistoryStore::load(&config.history_file);

    if store.entries().is_empty() {
        println!("No quiz history yet. Run `testu run --topic <topic>` to take a quiz.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Topic", "Difficulty", "Score", "%"]);

    for entry in store.recent(limit) {
        table.add_row(vec![
            Cell::new(entry.date.format("%Y-%m-%d %H:%M")),
            Cell::new(&entry.topic),
            Cell::new(entry.difficulty),
            Cell::new(format!("{}/{}", entry.score, entry.total)),
            Cell::new(format!("{:.1}", entry.percentage)),
        ]);
    }

    println!("{table}");
    Ok(())
}
