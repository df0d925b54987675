//! CLI configuration: a small JSON file under the intake base directory.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::CliError;
use crate::utils::{ensure_dir, tmp_path, write_atomic};

const CONFIG_FILE: &str = "config.json";
const BASE_DIR_ENV: &str = "INTAKE_CORE_HOME";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Wizard definition to load instead of the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_path: Option<PathBuf>,
    /// Where accepted submissions are written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submissions_dir: Option<PathBuf>,
    #[serde(default)]
    pub quiet: bool,
}

/// Resolves the base directory: `$INTAKE_CORE_HOME`, then the platform data
/// dir, then `.intake_core` in the working directory as a last resort.
pub fn base_dir() -> PathBuf {
    if let Some(dir) = env::var_os(BASE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|dir| dir.join("intake_core"))
        .unwrap_or_else(|| PathBuf::from(".intake_core"))
}

/// Default location for accepted submissions.
pub fn default_submissions_dir() -> PathBuf {
    base_dir().join("submissions")
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, CliError> {
        Self::from_base(base_dir())
    }

    /// Anchors the config under an explicit base directory; used by tests
    /// and embedders that manage their own layout.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, CliError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, CliError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, CliError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), CliError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
