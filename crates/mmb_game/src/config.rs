use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mmb_platform::window::PlatformConfig;

pub const CONFIG_PATH: &str = "assets/config/game.json";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowSection,
    pub tick_ms: u64,
    pub starting_lives: u32,
    pub respawn_delay_ms: u64,
    pub asset_root: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "Mini Mario Bros".to_string(),
            width: 1200,
            height: 700,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowSection::default(),
            tick_ms: 20,
            starting_lives: 3,
            respawn_delay_ms: 1000,
            asset_root: PathBuf::from("assets"),
        }
    }
}

impl GameConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn respawn_delay(&self) -> Duration {
        Duration::from_millis(self.respawn_delay_ms)
    }

    pub fn platform(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.window.title.clone(),
            width: self.window.width,
            height: self.window.height,
        }
    }

    pub fn asset(&self, relative: &str) -> PathBuf {
        self.asset_root.join(relative)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Config from `path`, or the built-in defaults when the file is absent or
/// unusable. Never fails.
pub fn load_config_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::info!(
            "No config file at {}, using defaults.",
            path.display()
        );
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Config loaded from {}", path.display());
            config
        }
        Err(err) => {
            log::warn!("{err}. Using defaults.");
            GameConfig::default()
        }
    }
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.tick_ms == 0 {
        return Err("Config validation failed: tick_ms must be > 0".to_string());
    }
    if config.window.width == 0 || config.window.height == 0 {
        return Err(format!(
            "Config validation failed: window size {}x{} must be non-zero",
            config.window.width, config.window.height
        ));
    }
    if config.starting_lives == 0 {
        return Err("Config validation failed: starting_lives must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "mmb_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "tick_ms": 10, "window": { "width": 800 } }"#)
            .expect("write temp config");

        let config = load_config_from_path(&path).expect("config should parse");
        assert_eq!(config.tick_ms, 10);
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 700);
        assert_eq!(config.window.title, "Mini Mario Bros");
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.respawn_delay(), Duration::from_millis(1000));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_tick_is_rejected() {
        let path = temp_file_path("zero_tick");
        fs::write(&path, r#"{ "tick_ms": 0 }"#).expect("write temp config");

        let err = load_config_from_path(&path).expect_err("zero tick should fail");
        assert!(err.contains("tick_ms"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_lives_is_rejected() {
        let path = temp_file_path("zero_lives");
        fs::write(&path, r#"{ "starting_lives": 0 }"#).expect("write temp config");

        let err = load_config_from_path(&path).expect_err("zero lives should fail");
        assert!(err.contains("starting_lives"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_or_missing_file_falls_back_to_defaults() {
        let path = temp_file_path("malformed");
        fs::write(&path, "{ not json").expect("write temp config");
        assert_eq!(load_config_or_default(&path), GameConfig::default());
        let _ = fs::remove_file(&path);

        assert_eq!(load_config_or_default(&path), GameConfig::default());
    }

    #[test]
    fn asset_paths_resolve_under_root() {
        let config = GameConfig {
            asset_root: PathBuf::from("data"),
            ..Default::default()
        };
        assert_eq!(
            config.asset("sounds/jump.wav"),
            Path::new("data").join("sounds/jump.wav")
        );
    }
}
