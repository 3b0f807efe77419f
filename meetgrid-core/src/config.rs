//! Global meetgrid configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{MeetgridError, MeetgridResult};

static DEFAULT_DATA_DIR: &str = "~/.meetgrid";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

/// Configuration at ~/.config/meetgrid/config.toml
///
/// Any key can be overridden from the environment with a `MEETGRID_`
/// prefix, e.g. `MEETGRID_USERNAME=alice`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MeetgridConfig {
    /// Where event documents are stored.
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    /// Who you are when painting availability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Default for MeetgridConfig {
    fn default() -> Self {
        MeetgridConfig {
            data_dir: default_data_dir(),
            username: None,
        }
    }
}

impl MeetgridConfig {
    pub fn config_path() -> MeetgridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| MeetgridError::Config("Could not determine config directory".into()))?
            .join("meetgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented default on first use.
    pub fn load() -> MeetgridResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("MEETGRID"))
            .build()
            .map_err(|e| MeetgridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| MeetgridError::Config(e.to_string()))
    }

    /// Load from a specific file, without environment overrides.
    pub fn load_from(path: &Path) -> MeetgridResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| MeetgridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| MeetgridError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn save(&self) -> MeetgridResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> MeetgridResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| MeetgridError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MeetgridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| MeetgridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> MeetgridResult<()> {
        let contents = format!(
            "\
# meetgrid configuration

# Where event documents live:
# data_dir = \"{}\"

# Your name on availability grids:
# username = \"alice\"
",
            DEFAULT_DATA_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MeetgridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| MeetgridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meetgrid").join("config.toml");

        MeetgridConfig::create_default_config(&path).unwrap();
        let config = MeetgridConfig::load_from(&path).unwrap();
        assert_eq!(config, MeetgridConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = MeetgridConfig {
            data_dir: dir.path().join("events"),
            username: Some("alice".into()),
        };
        config.save_to(&path).unwrap();

        let reloaded = MeetgridConfig::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.data_path(), dir.path().join("events"));
    }

    #[test]
    fn test_default_data_dir_is_not_written() {
        let content = toml::to_string_pretty(&MeetgridConfig::default()).unwrap();
        assert!(content.trim().is_empty());
    }
}
