//! User configuration and default file locations for mapslides
//!
//! The config file is optional. Missing keys fall back to the built-in
//! defaults, so an empty `{}` is a valid config.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mapslides_session::SessionDefaults;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Deck file used when `--deck` is not given
    pub deck: Option<PathBuf>,
    #[serde(flatten)]
    pub defaults: SessionDefaults,
}

impl Config {
    /// Load the config. An explicit path must exist; the default path may not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let path = config_path();
                if path.exists() {
                    Self::read(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config {:?}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        tracing::debug!(?path, "Loaded config");
        Ok(config)
    }

    /// Deck file to operate on: the command line wins over the config
    pub fn deck_path(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.deck.clone()).unwrap_or_else(default_deck_path)
    }
}

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var).map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(fallback)
    })
}

/// `$XDG_CONFIG_HOME/mapslides/config.json`
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("mapslides").join("config.json")
}

/// `$XDG_DATA_HOME/mapslides/deck.json`
pub fn default_deck_path() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share").join("mapslides").join("deck.json")
}
