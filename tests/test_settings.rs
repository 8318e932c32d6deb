use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use car_dodge::rules::Ruleset;
use car_dodge::settings::{Settings, SettingsError};
use log::LevelFilter;

#[test]
fn defaults() {
    let s = Settings::default();
    assert_eq!(s.ruleset, Ruleset::Shield);
    assert_eq!(s.fps, 60);
    assert!(s.sound);
    assert_eq!(s.high_score_file, None);
    assert_eq!(s.log_file, None);
    assert_eq!(s.log_level_filter(), LevelFilter::Info);
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load(&dir.path().join("settings.json")).unwrap();
    assert_eq!(s, Settings::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "ruleset": "classic", "sound": false }"#).unwrap();
    let s = Settings::load(&path).unwrap();
    assert_eq!(s.ruleset, Ruleset::Classic);
    assert!(!s.sound);
    assert_eq!(s.fps, 60);
}

#[test]
fn full_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{
            "ruleset": "lanes",
            "fps": 30,
            "sound": true,
            "high_score_file": "/tmp/best.json",
            "log_file": "/tmp/car_dodge.log",
            "log_level": "debug"
        }"#,
    )
    .unwrap();
    let s = Settings::load(&path).unwrap();
    assert_eq!(s.ruleset, Ruleset::Lanes);
    assert_eq!(s.fps, 30);
    assert_eq!(s.high_score_file, Some(PathBuf::from("/tmp/best.json")));
    assert_eq!(s.log_file, Some(PathBuf::from("/tmp/car_dodge.log")));
    assert_eq!(s.log_level_filter(), LevelFilter::Debug);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "ruleset": "turbo" }"#).unwrap();
    assert!(matches!(
        Settings::load(&path),
        Err(SettingsError::Parse { .. })
    ));
}

#[test]
fn frame_duration_from_fps() {
    let mut s = Settings::default();
    s.fps = 50;
    assert_eq!(s.frame_duration(), Duration::from_millis(20));
    s.fps = 0;
    assert_eq!(s.frame_duration(), Duration::from_secs(1) / 60);
}

#[test]
fn unknown_log_level_falls_back_to_info() {
    let s = Settings {
        log_level: "chatty".to_string(),
        ..Settings::default()
    };
    assert_eq!(s.log_level_filter(), LevelFilter::Info);
}

#[test]
fn settings_round_trip_through_json() {
    let s = Settings {
        ruleset: Ruleset::Classic,
        fps: 45,
        ..Settings::default()
    };
    let json = serde_json::to_string(&s).unwrap();
    assert_eq!(serde_json::from_str::<Settings>(&json).unwrap(), s);
}
