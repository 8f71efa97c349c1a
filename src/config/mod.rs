use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::{BudgetError, Result},
    ledger::CyclePolicy,
    storage::{StorageKeys, DEFAULT_KEY_PREFIX},
    utils::paths::{self, ensure_dir},
};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const DATA_DIR: &str = "data";
const TMP_SUFFIX: &str = "tmp";

/// User preferences for the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_key_prefix")]
    pub key_prefix: String,
    #[serde(default)]
    pub allow_future_cycle_dates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the ledger records. Defaults to `<app dir>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "fil-PH".into(),
            currency: "PHP".into(),
            key_prefix: Self::default_key_prefix(),
            allow_future_cycle_dates: false,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_key_prefix() -> String {
        DEFAULT_KEY_PREFIX.into()
    }

    pub fn storage_keys(&self) -> StorageKeys {
        let prefix = self.key_prefix.trim();
        if prefix.is_empty() {
            StorageKeys::default()
        } else {
            StorageKeys::with_prefix(prefix)
        }
    }

    pub fn cycle_policy(&self) -> CyclePolicy {
        CyclePolicy {
            allow_future_dates: self.allow_future_cycle_dates,
        }
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => paths::app_data_dir().join(DATA_DIR),
        }
    }
}

/// Loads and saves [`Config`] as JSON under the application directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        let config_dir = base.join(CONFIG_DIR);
        ensure_dir(&config_dir).map_err(config_error)?;
        Ok(Self {
            path: config_dir.join(CONFIG_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file yields the defaults.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path).map_err(|err| config_error(err.into()))?;
        serde_json::from_str(&data).map_err(|err| {
            BudgetError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| BudgetError::Config(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json).map_err(config_error)?;
        fs::rename(&tmp, &self.path).map_err(|err| config_error(err.into()))?;
        Ok(())
    }
}

fn config_error(err: BudgetError) -> BudgetError {
    match err {
        BudgetError::Persistence(message) => BudgetError::Config(message),
        other => other,
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
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
