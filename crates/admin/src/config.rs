use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_dir = match std::env::var("REPPI_DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            Ok(_) | Err(std::env::VarError::NotPresent) => PathBuf::from(DEFAULT_DATA_DIR),
            Err(e) => return Err(e).context("Cannot load REPPI_DATA_DIR env variable"),
        };

        Ok(Self {
            data_dir,
            log_level: std::env::var("REPPI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Command-line flags win over the environment
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, verbose: bool) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if verbose {
            self.log_level = "debug".to_string();
        }
        self
    }
}
