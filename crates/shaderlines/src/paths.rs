//! Resolves where shaderlines looks for its configuration file.
//!
//! `SHADERLINES_CONFIG_DIR` wins over the platform config directory
//! reported by `directories-next`.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "SHADERLINES_CONFIG_DIR";
pub const CONFIG_FILE_NAME: &str = "shaderlines.toml";

const QUALIFIER: &str = "com";
const ORGANISATION: &str = "zafbush";
const APPLICATION: &str = "shaderlines";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        if let Some(dir) = env::var_os(ENV_CONFIG_DIR).filter(|value| !value.is_empty()) {
            return Ok(Self::from_config_dir(PathBuf::from(dir)));
        }

        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
            .ok_or_else(|| anyhow!("failed to determine user directories"))?;
        Ok(Self::from_config_dir(project_dirs.config_dir().to_path_buf()))
    }

    pub fn from_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }
}
