//! Aggregate statistics over the quiz history.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::history::HistoryEntry;
use crate::score::round1;

/// Statistics computed across the whole history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Number of quizzes taken.
    pub total_quizzes: usize,
    /// Mean percentage across all quizzes, rounded to one decimal.
    pub average_score: f64,
    /// The best-scoring quiz.
    pub best: HistoryEntry,
    /// Per-topic statistics.
    pub topics: HashMap<String, TopicStats>,
}

/// Statistics for a single topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicStats {
    /// Number of quizzes taken on this topic.
    pub count: usize,
    /// Mean percentage for this topic, rounded to one decimal.
    pub average: f64,
}

/// Compute statistics over the history, newest first.
/// Returns `None` for an empty history.
pub fn compute_history_stats(entries: &[HistoryEntry]) -> Option<HistoryStats> {
    if entries.is_empty() {
        return None;
    }

    let total_quizzes = entries.len();
    let average_score =
        round1(entries.iter().map(|e| e.percentage).sum::<f64>() / total_quizzes as f64);

    let best = entries
        .iter()
        .max_by(|a, b| {
            a.percentage
                .partial_cmp(&b.percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        })?
        .clone();

    let mut sums: HashMap<String, (usize, f64)> = HashMap::new();
    for e in entries {
        let slot = sums.entry(e.topic.clone()).or_insert((0, 0.0));
        slot.0 += 1;
        slot.1 += e.percentage;
    }

    let topics = sums
        .into_iter()
        .map(|(topic, (count, sum))| {
            (
                topic,
                TopicStats {
                    count,
                    average: round1(sum / count as f64),
                },
            )
        })
        .collect();

    Some(HistoryStats {
        total_quizzes,
        average_score,
        best,
        topics,
    })
}
