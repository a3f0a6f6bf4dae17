use crate::config::loader::{
    CONFIG_ENV_VAR, ConfigError, get_config_file_path, load_config_from_path,
    save_config_to_path,
};
use crate::config::{AudioConfig, BoardConfig, Config};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let config = Config::default();

    assert_eq!(config.gravity_interval_ms, 200);
    assert_eq!(config.gravity_interval(), Duration::from_millis(200));
    assert_eq!(config.records_path.to_str(), Some("data/records.txt"));
    assert_eq!(config.board, BoardConfig { width: 12, height: 20 });
    assert!(config.audio.music_enabled);
    assert!(config.audio.sound_enabled);
    assert_eq!(config.audio.volume, 0.5);
}

#[test]
fn test_zero_gravity_interval_is_clamped() {
    let config = Config {
        gravity_interval_ms: 0,
        ..Config::default()
    };
    assert_eq!(config.gravity_interval(), Duration::from_millis(1));
}

#[test]
fn test_load_nonexistent_config_writes_default() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = load_config_from_path(&config_path).expect("Failed to load default config");

    assert_eq!(config, Config::default());
    assert!(config_path.exists(), "Config file should have been created");
}

#[test]
fn test_save_and_load_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");

    let config = Config {
        gravity_interval_ms: 350,
        board: BoardConfig {
            width: 10,
            height: 22,
        },
        audio: AudioConfig {
            music_enabled: false,
            sound_enabled: true,
            volume: 0.25,
        },
        ..Config::default()
    };

    save_config_to_path(&config, &config_path).expect("Failed to save config");
    let loaded = load_config_from_path(&config_path).expect("Failed to load config");

    assert_eq!(loaded, config);
}

#[test]
fn test_partial_config_falls_back_to_defaults() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[board]\nwidth = 8\n").unwrap();

    let config = load_config_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config.board.width, 8);
    assert_eq!(config.board.height, 20);
    assert_eq!(config.gravity_interval_ms, 200);
    assert_eq!(config.audio, AudioConfig::default());
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "gravity_interval_ms = \"fast\"").unwrap();

    let result = load_config_from_path(&config_path);

    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_env_var_overrides_config_path() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("from_env.toml");

    // Only this test touches the variable
    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, &config_path);
    }
    let resolved = get_config_file_path();
    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }

    assert_eq!(resolved, config_path);
}
