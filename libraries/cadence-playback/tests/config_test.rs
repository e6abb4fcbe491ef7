//! Configuration loading from disk

use cadence_playback::{PlaybackConfig, PlaybackError, RepeatMode};
use std::fs;

#[test]
fn loads_toml_file_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playback.toml");
    fs::write(
        &path,
        r#"
history_capacity = 16
repeat = "all"
shuffle_seed = 7
"#,
    )
    .unwrap();

    let config = PlaybackConfig::load(Some(&path)).unwrap();
    assert_eq!(config.history_capacity, 16);
    assert_eq!(config.repeat, RepeatMode::All);
    assert_eq!(config.shuffle_seed, Some(7));
    assert!(!config.shuffle);
    assert_eq!(config.volume, 1.0);
}

#[test]
fn invalid_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playback.toml");
    fs::write(&path, "volume = 3.5\n").unwrap();

    assert!(matches!(
        PlaybackConfig::load(Some(&path)),
        Err(PlaybackError::Config(_))
    ));
}

#[test]
fn unknown_repeat_mode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playback.toml");
    fs::write(&path, "repeat = \"sometimes\"\n").unwrap();

    assert!(PlaybackConfig::load(Some(&path)).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        PlaybackConfig::load(Some(&path)),
        Err(PlaybackError::Config(_))
    ));
}
