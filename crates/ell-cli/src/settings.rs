//! Player settings, read from `ell.toml`.

use std::path::{Path, PathBuf};

use ell_dialogue::EngineConfig;
use ell_save::DEFAULT_SAVE_KEY;
use serde::Deserialize;

/// File looked up in the working directory when `--config` is not given.
pub const SETTINGS_FILE: &str = "ell.toml";

/// All settings. Every section and field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dialogue engine configuration.
    pub engine: EngineConfig,
    /// Presentation.
    pub play: PlaySettings,
    /// Save location.
    pub save: SaveSettings,
    /// Logging.
    pub log: LogSettings,
}

/// Presentation settings (`[play]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaySettings {
    /// Delay per character in milliseconds; 0 prints text at once.
    pub typewriter_ms: u64,
    /// Name for new games.
    pub player_name: String,
    /// Save after every step.
    pub autosave: bool,
}

impl Default for PlaySettings {
    fn default() -> Self {
        Self {
            typewriter_ms: 20,
            player_name: "Traveler".to_string(),
            autosave: true,
        }
    }
}

/// Where saves are written (`[save]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    /// Directory holding save files.
    pub dir: PathBuf,
    /// Storage key of the save slot.
    pub key: String,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".ellidra"),
            key: DEFAULT_SAVE_KEY.to_string(),
        }
    }
}

/// Logging settings (`[log]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("invalid settings: {e}"))
    }

    /// Read an explicit settings file, or `ell.toml` if present, or fall
    /// back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let path = match path {
            Some(path) => path,
            None if Path::new(SETTINGS_FILE).is_file() => Path::new(SETTINGS_FILE),
            None => return Ok(Self::default()),
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Replace the save directory when one was given on the command line.
    pub fn override_save_dir(&mut self, dir: Option<PathBuf>) {
        if let Some(dir) = dir {
            self.save.dir = dir;
        }
    }
}
