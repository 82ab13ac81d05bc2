//! High score record
//!
//! One best score per installation, with the level it was reached on. Where
//! it is stored is up to a [`crate::persistence::HighScoreStore`].

use serde::{Deserialize, Serialize};

/// Best score seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u64,
    /// Level reached (1-based) when the score was set
    #[serde(default)]
    pub level: usize,
}

impl HighScore {
    /// Check if a score would replace this record
    pub fn beats(&self, score: u64) -> bool {
        score > self.score
    }

    /// Record a score if it is a new best. Returns true when it was.
    pub fn submit(&mut self, score: u64, level: usize) -> bool {
        if !self.beats(score) {
            return false;
        }
        self.score = score;
        self.level = level;
        true
    }
}
