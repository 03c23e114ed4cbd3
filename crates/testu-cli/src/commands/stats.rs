//! The `testu stats` command: aggregate statistics over the quiz history.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use testu_core::history::HistoryStore;
use testu_core::statistics::compute_history_stats;
use testu_providers::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = HistoryStore::load(&config.history_file);

    let Some(stats) = compute_history_stats(store.entries()) else {
        println!("No quiz history yet. Run `testu run --topic <topic>` to take a quiz.");
        return Ok(());
    };

    println!("Quizzes taken:  {}", stats.total_quizzes);
    println!("Average score:  {:.1}%", stats.average_score);
    println!(
        "Best result:    {:.1}% ({}, {})",
        stats.best.percentage,
        stats.best.topic,
        stats.best.date.format("%Y-%m-%d")
    );

    let mut table = Table::new();
    table.set_header(vec!["Topic", "Quizzes", "Average %"]);

    let mut topics: Vec<_> = stats.topics.iter().collect();
    topics.sort_by(|a, b| a.0.cmp(b.0));
    for (topic, topic_stats) in topics {
        table.add_row(vec![
            Cell::new(topic),
            Cell::new(topic_stats.count),
            Cell::new(format!("{:.1}", topic_stats.average)),
        ]);
    }

    println!("\n{table}");
    Ok(())
}
