//! Quiz history with JSON persistence.
//!
//! One entry per completed quiz, newest first, capped so the file never
//! grows without bound.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Difficulty;
use crate::score::ScoreSummary;

/// Maximum number of entries kept on disk.
const MAX_ENTRIES: usize = 50;

/// One completed quiz in the history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub topic: String,
    pub difficulty: Difficulty,
    pub date: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
}

impl HistoryEntry {
    /// Build an entry for a quiz finished right now.
    pub fn from_score(topic: &str, difficulty: Difficulty, score: &ScoreSummary) -> Self {
        Self {
            topic: topic.to_string(),
            difficulty,
            date: Utc::now(),
            score: score.correct,
            total: score.total,
            percentage: score.percentage,
        }
    }
}

/// File-backed quiz history, newest entries first.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Load history from `path`. A missing file is an empty history; a
    /// corrupt file is logged and treated as empty rather than blocking
    /// the quiz.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("ignoring corrupt history file {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// Record a completed quiz and persist the file.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<()> {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ENTRIES);
        self.save()
    }

    /// The most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> &[HistoryEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn save(&self) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&self.entries).context("failed to serialize history")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write history to {}", self.path.display()))?;
        Ok(())
    }
}
