pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, GRAVITY_INTERVAL_MS, RECORDS_FILE_PATH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gravity_interval_ms: u64,
    pub records_path: PathBuf,
    pub board: BoardConfig,
    pub audio: AudioConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gravity_interval_ms: GRAVITY_INTERVAL_MS,
            records_path: PathBuf::from(RECORDS_FILE_PATH),
            board: BoardConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn gravity_interval(&self) -> Duration {
        Duration::from_millis(self.gravity_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub music_enabled: bool,
    pub sound_enabled: bool,
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sound_enabled: true,
            volume: 0.5,
        }
    }
}
