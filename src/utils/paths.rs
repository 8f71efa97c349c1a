use dirs::home_dir;
use std::{env, fs, path::Path, path::PathBuf};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".budget_cycle";
const HOME_ENV: &str = "BUDGET_CYCLE_HOME";

/// Returns the application-specific data directory, defaulting to `~/.budget_cycle`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
