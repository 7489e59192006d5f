#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Leaderboard persistence backed by a plain text file with one score per line.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tower_defence_core::{ScoreStore, ScoreStoreError, LEADERBOARD_CAPACITY};
use tracing::debug;

/// Orders scores best first and keeps the top [`LEADERBOARD_CAPACITY`].
///
/// Equal scores are all retained, so the result is non-increasing rather than
/// strictly decreasing.
#[must_use]
pub fn rank_scores(mut scores: Vec<u32>) -> Vec<u32> {
    scores.sort_by(|left, right| right.cmp(left));
    scores.truncate(LEADERBOARD_CAPACITY);
    scores
}

/// Leaderboard stored as a text file.
#[derive(Clone, Debug)]
pub struct FileLeaderboard {
    path: PathBuf,
}

impl FileLeaderboard {
    /// Creates a leaderboard persisted at `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileLeaderboard {
    fn load(&self) -> Result<Vec<u32>, ScoreStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        parse_scores(&contents)
    }

    fn save(&mut self, score: u32) -> Result<Vec<u32>, ScoreStoreError> {
        let mut scores = self.load()?;
        scores.push(score);
        let ranked = rank_scores(scores);

        let mut contents = String::new();
        for entry in &ranked {
            contents.push_str(&entry.to_string());
            contents.push('\n');
        }
        fs::write(&self.path, contents)?;
        debug!(score, path = %self.path.display(), "score saved");
        Ok(ranked)
    }
}

fn parse_scores(contents: &str) -> Result<Vec<u32>, ScoreStoreError> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line, value)| {
            value.parse().map_err(|_| ScoreStoreError::Malformed {
                line,
                value: value.to_owned(),
            })
        })
        .collect()
}

/// Leaderboard held in memory, for sessions that should not touch the filesystem.
#[derive(Clone, Debug, Default)]
pub struct MemoryLeaderboard {
    scores: Vec<u32>,
}

impl MemoryLeaderboard {
    /// Creates a leaderboard seeded with existing scores.
    #[must_use]
    pub fn with_scores(scores: Vec<u32>) -> Self {
        Self {
            scores: rank_scores(scores),
        }
    }
}

impl ScoreStore for MemoryLeaderboard {
    fn load(&self) -> Result<Vec<u32>, ScoreStoreError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, score: u32) -> Result<Vec<u32>, ScoreStoreError> {
        let mut scores = std::mem::take(&mut self.scores);
        scores.push(score);
        self.scores = rank_scores(scores);
        Ok(self.scores.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_is_descending_keeps_ties_and_truncates() {
        let ranked = rank_scores(vec![5, 90, 5, 12, 1, 2, 3, 4, 6, 7, 8, 9]);
        assert_eq!(ranked, vec![90, 12, 9, 8, 7, 6, 5, 5, 4, 3]);
    }

    #[test]
    fn blank_lines_are_skipped_and_garbage_is_reported() {
        assert_eq!(parse_scores("30\n\n  10 \n").ok(), Some(vec![30, 10]));
        assert!(matches!(
            parse_scores("30\nabc\n"),
            Err(ScoreStoreError::Malformed { line: 2, ref value }) if value == "abc"
        ));
    }

    #[test]
    fn memory_leaderboard_ranks_on_save() {
        let mut board = MemoryLeaderboard::with_scores(vec![10, 40]);
        let ranked = board.save(25).expect("save");
        assert_eq!(ranked, vec![40, 25, 10]);
        assert_eq!(board.load().expect("load"), ranked);
    }
}
