//! Contract for leaderboard persistence collaborators.

use thiserror::Error;

/// Maximum number of scores retained by a leaderboard.
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Persistent, descending list of the best final scores.
pub trait ScoreStore {
    /// Loads the stored scores, best first. A missing store yields an empty list.
    fn load(&self) -> Result<Vec<u32>, ScoreStoreError>;

    /// Records a final score and returns the updated list, best first.
    fn save(&mut self, score: u32) -> Result<Vec<u32>, ScoreStoreError>;
}

/// Failures raised by score stores.
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    /// The backing storage could not be read or written.
    #[error("score storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// A stored line is not an unsigned integer.
    #[error("line {line} of the score list is not a score: `{value}`")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// Offending contents.
        value: String,
    },
}
