//! High score leaderboard
//!
//! Keeps the top 10 runs ordered by score, then level, then age. The engine
//! only decides what the list contains; reading and writing it is up to
//! [`crate::persistence`].

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{HIGH_SCORE_LIMIT, HIGH_SCORE_NAME_MAX_LENGTH};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub id: String,
    /// Empty until the player names the run
    #[serde(default)]
    pub name: String,
    pub score: i64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// Leaderboard ordering: score desc, level desc, timestamp asc
fn rank_order(a: &HighScoreEntry, b: &HighScoreEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(b.level.cmp(&a.level))
        .then(a.timestamp.cmp(&b.timestamp))
}

/// Random v4 UUID drawn from `rng`
pub fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

/// Strip control characters, collapse whitespace and cap the length
pub fn sanitize_name(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(HIGH_SCORE_NAME_MAX_LENGTH)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// High score leaderboard. Serializes as a plain array of entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from loosely-shaped persisted JSON. Entries without a numeric
    /// score are dropped; other missing fields get defaults.
    pub fn from_json<R: Rng + ?Sized>(raw: &str, now_ms: u64, rng: &mut R) -> Self {
        let items = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                log::warn!("Leaderboard data is not a list, starting fresh");
                return Self::new();
            }
            Err(e) => {
                log::warn!("Leaderboard data unreadable ({}), starting fresh", e);
                return Self::new();
            }
        };

        let entries = items
            .iter()
            .filter_map(|item| {
                let score = item.get("score").and_then(Value::as_f64)?;
                let id = match item.get("id").and_then(Value::as_str) {
                    Some(id) => id.to_string(),
                    None => generate_id(rng),
                };
                let name = item
                    .get("name")
                    .and_then(Value::as_str)
                    .map(sanitize_name)
                    .unwrap_or_default();
                let level = item
                    .get("level")
                    .and_then(Value::as_f64)
                    .map(|l| l.max(1.0) as u32)
                    .unwrap_or(1);
                let timestamp = item
                    .get("timestamp")
                    .and_then(Value::as_f64)
                    .map(|t| t.max(0.0) as u64)
                    .unwrap_or(now_ms);
                Some(HighScoreEntry {
                    id,
                    name,
                    score: score.round() as i64,
                    level,
                    timestamp,
                })
            })
            .collect();

        let mut scores = Self { entries };
        scores.normalize();
        scores
    }

    /// Sanitize names, sort and cap to `HIGH_SCORE_LIMIT`
    pub fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.name = sanitize_name(&entry.name);
        }
        self.entries.sort_by(rank_order);
        self.entries.truncate(HIGH_SCORE_LIMIT);
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: i64, level: u32) -> bool {
        if self.entries.len() < HIGH_SCORE_LIMIT {
            return true;
        }
        // A newcomer loses timestamp ties, so it must strictly beat the last
        self.entries
            .last()
            .map(|e| score > e.score || (score == e.score && level > e.level))
            .unwrap_or(true)
    }

    /// Insert an entry and re-normalize. Returns whether it survived the cut.
    pub fn record(&mut self, entry: HighScoreEntry) -> bool {
        let id = entry.id.clone();
        self.entries.push(entry);
        self.normalize();
        self.entries.iter().any(|e| e.id == id)
    }

    /// Name the entry with `id`. Names that sanitize to nothing are ignored.
    pub fn set_name(&mut self, id: &str, name: &str) -> bool {
        let name = sanitize_name(name);
        if name.is_empty() {
            return false;
        }
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.name = name;
                true
            }
            None => false,
        }
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }
}
