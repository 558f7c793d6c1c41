use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::{FormError, Result};

const CONFIG_DIR_NAME: &str = "benefits_core";
const CONFIG_FILE_NAME: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Display and wiring constants shared by projections, gates and submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "EngineConfig::default_placeholder")]
    pub placeholder: String,
    /// Value written into a gate field when at least one source is checked.
    #[serde(default = "EngineConfig::default_gate_sentinel")]
    pub gate_sentinel: String,
    #[serde(default = "EngineConfig::default_address_separator")]
    pub address_separator: String,
    #[serde(default = "EngineConfig::default_multi_value_separator")]
    pub multi_value_separator: String,
    #[serde(default = "EngineConfig::default_date_range_separator")]
    pub date_range_separator: String,
    #[serde(default = "EngineConfig::default_submission_failure_message")]
    pub submission_failure_message: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placeholder: Self::default_placeholder(),
            gate_sentinel: Self::default_gate_sentinel(),
            address_separator: Self::default_address_separator(),
            multi_value_separator: Self::default_multi_value_separator(),
            date_range_separator: Self::default_date_range_separator(),
            submission_failure_message: Self::default_submission_failure_message(),
        }
    }
}

impl EngineConfig {
    pub fn default_placeholder() -> String {
        "--".into()
    }

    pub fn default_gate_sentinel() -> String {
        "yes".into()
    }

    pub fn default_address_separator() -> String {
        "<br />".into()
    }

    pub fn default_multi_value_separator() -> String {
        " ".into()
    }

    pub fn default_date_range_separator() -> String {
        " - ".into()
    }

    pub fn default_submission_failure_message() -> String {
        "Error submitting application".into()
    }
}

/// Loads and persists [`EngineConfig`] as pretty JSON.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::with_path(
            base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        ))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<EngineConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| {
                FormError::ConfigError(format!("{}: {}", self.path.display(), err))
            })
        } else {
            tracing::debug!(path = %self.path.display(), "config file absent, using defaults");
            Ok(EngineConfig::default())
        }
    }

    pub fn save(&self, config: &EngineConfig) -> Result<()> {
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

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
