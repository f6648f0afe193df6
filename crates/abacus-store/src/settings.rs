use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use abacus_core::DEFAULT_UNDO_DEPTH;

use crate::error::{Result, StoreError};

pub const SETTINGS_FILE: &str = "config.toml";

/// User preferences read from `<data dir>/config.toml`. Every field is
/// optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ring the terminal bell for sound cues.
    pub sound: bool,
    pub undo_depth: usize,
    pub default_profile: Option<String>,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            undo_depth: DEFAULT_UNDO_DEPTH,
            default_profile: None,
            plot_width: 72,
            plot_height: 24,
        }
    }
}

impl Settings {
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(SETTINGS_FILE)
    }

    /// Missing file means defaults; a malformed one is an error.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = Self::path(base_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
            .map_err(|e| StoreError::InvalidData(format!("{}: {e}", path.display())))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| StoreError::InvalidData(e.to_string()))
    }

    pub fn save(&self, base_dir: &Path) -> Result<()> {
        fs::create_dir_all(base_dir)?;
        fs::write(Self::path(base_dir), self.to_toml()?)?;
        Ok(())
    }
}
