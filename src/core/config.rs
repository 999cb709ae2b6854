use crate::core::compat::{CompatibilityMatrix, MatrixEntry};
use crate::core::spend::DEFAULT_CURRENCY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Currency assumed for assets that do not name one.
    #[serde(default = "default_currency")]
    pub currency: String,
    pub data_path: Option<String>,
    /// Known avatar-base compatibility facts.
    #[serde(default)]
    pub compatibility: Vec<MatrixEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            data_path: None,
            compatibility: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "avtr", "avtr")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "avtr", "avtr")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!(
            "Successfully loaded config with {} compatibility entries",
            config.compatibility.len()
        );
        Ok(config)
    }

    /// Builds the compatibility matrix handed to the resolver.
    pub fn matrix(&self) -> CompatibilityMatrix {
        self.compatibility.iter().cloned().collect()
    }
}
