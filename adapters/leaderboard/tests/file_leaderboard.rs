use std::fs;

use tower_defence_core::{ScoreStore, ScoreStoreError};
use tower_defence_leaderboard::FileLeaderboard;

#[test]
fn missing_file_loads_as_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let board = FileLeaderboard::new(dir.path().join("scores.txt"));
    assert!(board.load().expect("load").is_empty());
}

#[test]
fn saving_then_reloading_yields_ranked_top_ten() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut board = FileLeaderboard::new(dir.path().join("scores.txt"));

    for score in [40, 10, 70, 10, 90, 20, 30, 60, 50, 80, 5] {
        let _ = board.save(score).expect("save");
    }
    let saved = board.save(55).expect("save");

    let reloaded = board.load().expect("load");
    assert_eq!(reloaded, saved);
    assert_eq!(reloaded, vec![90, 80, 70, 60, 55, 50, 40, 30, 20, 10]);
    assert!(reloaded.windows(2).all(|pair| pair[0] >= pair[1]));

    let contents = fs::read_to_string(board.path()).expect("read");
    assert_eq!(contents.lines().count(), 10);
    assert!(contents.ends_with('\n'));
}

#[test]
fn low_score_is_dropped_from_a_full_board() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scores.txt");
    fs::write(&path, "100\n90\n80\n70\n60\n50\n40\n30\n20\n10\n").expect("seed");

    let mut board = FileLeaderboard::new(&path);
    let ranked = board.save(1).expect("save");
    assert_eq!(ranked.len(), 10);
    assert!(!ranked.contains(&1));
}

#[test]
fn malformed_file_is_reported_not_overwritten() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scores.txt");
    fs::write(&path, "12\nnot-a-score\n").expect("seed");

    let mut board = FileLeaderboard::new(&path);
    let error = board.save(5).expect_err("malformed line");
    assert!(matches!(error, ScoreStoreError::Malformed { line: 2, .. }));
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "12\nnot-a-score\n"
    );
}
