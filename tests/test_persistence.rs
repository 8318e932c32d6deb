use std::fs;

use car_dodge::persistence::{JsonScoreStore, ScoreStore};

#[test]
fn missing_record_reads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonScoreStore::new(dir.path().join("score.json"));
    assert_eq!(store.load_high_score(), 0);
}

#[test]
fn corrupt_record_reads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.json");
    for junk in ["", "not json", "{\"highscore\": -3}", "{\"best\": 12}", "[]"] {
        fs::write(&path, junk).unwrap();
        assert_eq!(JsonScoreStore::new(&path).load_high_score(), 0, "{junk:?}");
    }
}

#[test]
fn unreadable_record_reads_zero() {
    // A directory where the file should be.
    let dir = tempfile::tempdir().unwrap();
    let store = JsonScoreStore::new(dir.path());
    assert_eq!(store.load_high_score(), 0);
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.json");
    let mut store = JsonScoreStore::new(&path);
    store.save_high_score(27).unwrap();
    assert_eq!(store.load_high_score(), 27);
    assert_eq!(JsonScoreStore::new(&path).load_high_score(), 27);
}

#[test]
fn save_overwrites_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.json");
    let mut store = JsonScoreStore::new(&path);
    store.save_high_score(50).unwrap();
    store.save_high_score(8).unwrap();
    assert_eq!(store.load_high_score(), 8);
}

#[test]
fn record_is_keyed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.json");
    JsonScoreStore::new(&path).save_high_score(14).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["highscore"], 14);
}

#[test]
fn hand_written_record_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.json");
    fs::write(&path, "{ \"highscore\": 99 }\n").unwrap();
    assert_eq!(JsonScoreStore::new(&path).load_high_score(), 99);
}

#[test]
fn save_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("score.json");
    let mut store = JsonScoreStore::new(&path);
    store.save_high_score(3).unwrap();
    assert_eq!(store.load_high_score(), 3);
}

#[test]
fn save_into_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonScoreStore::new(dir.path());
    assert!(store.save_high_score(1).is_err());
}

#[test]
fn default_path_is_a_dotfile() {
    let path = JsonScoreStore::default_path();
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some(".car_dodge_score.json")
    );
}
