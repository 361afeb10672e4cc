use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    coding::{morse, Preset},
    error::{Error, Result},
    session::{PracticeMode, RoundLimit},
};

pub const DEFAULT_CONFIG_FILE: &str = "morse_drill_config.json";

/// Speeds and pitch a session is played with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSettings {
    pub char_wpm: f64,
    pub word_wpm: f64,
    pub frequency: f64,
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            char_wpm: 20.0,
            word_wpm: 5.0,
            frequency: 600.0,
        }
    }
}

impl ToneSettings {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("character speed", self.char_wpm),
            ("word speed", self.word_wpm),
            ("frequency", self.frequency),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid(format!("{name} must be positive, got {value}")));
            }
        }

        Ok(())
    }
}

/// Trainer defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub char_wpm: f64,
    pub word_wpm: f64,
    pub frequency: f64,
    /// `0` runs until stopped.
    pub rounds: u32,
    pub round_size: usize,
    pub mode: PracticeMode,
    /// Characters to practice. The beginner preset is used when empty.
    pub characters: String,
    /// Output device name, the system default when unset.
    pub device: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let tone = ToneSettings::default();
        Self {
            char_wpm: tone.char_wpm,
            word_wpm: tone.word_wpm,
            frequency: tone.frequency,
            rounds: 5,
            round_size: 10,
            mode: PracticeMode::default(),
            characters: String::new(),
            device: None,
        }
    }
}

impl Config {
    pub fn tone(&self) -> ToneSettings {
        ToneSettings {
            char_wpm: self.char_wpm,
            word_wpm: self.word_wpm,
            frequency: self.frequency,
        }
    }

    pub fn round_limit(&self) -> RoundLimit {
        RoundLimit::from_count(self.rounds)
    }

    pub fn selection(&self) -> Vec<char> {
        match morse::selection(&self.characters) {
            x if x.is_empty() => Preset::Beginner.selection(),
            x => x,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_path(DEFAULT_CONFIG_FILE)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files give the default config.
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };

        serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), "ignoring unreadable config: {err}");
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = Config {
            char_wpm: 25.0,
            word_wpm: 12.0,
            frequency: 700.0,
            rounds: 0,
            round_size: 25,
            mode: PracticeMode::HandCopy,
            characters: "KMRSU".into(),
            device: Some("speakers".into()),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
        assert_eq!(loaded.round_limit(), RoundLimit::Unbounded);
    }

    #[test]
    fn missing_or_broken_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());

        fs::write(&path, b"{ nope").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"char_wpm": 30, "mode": "continuous_keyboard"}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.char_wpm, 30.0);
        assert_eq!(cfg.mode, PracticeMode::ContinuousKeyboard);
        assert_eq!(cfg.round_size, 10);
    }

    #[test]
    fn selection_falls_back_to_beginner() {
        let cfg = Config::default();
        assert_eq!(cfg.selection(), vec!['E', 'T', 'A', 'N', 'I', 'M']);
        assert!(ToneSettings::default().validate().is_ok());
        assert!(ToneSettings {
            word_wpm: 0.0,
            ..Default::default()
        }
        .validate()
        .is_err());
    }
}
