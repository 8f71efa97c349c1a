use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use super::KeyValueStore;
use crate::{config::Config, errors::Result, utils::paths::ensure_dir};

const RECORD_EXTENSION: &str = "kv";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed store keeping one file per key under a data directory.
///
/// Values are stored verbatim; the JSON inside them comes from [`super::codec`].
///
/// Writes are staged to a temporary sibling and renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    /// Opens the store in the data directory selected by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.resolve_data_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), RECORD_EXTENSION))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::trace!(key, path = %path.display(), "record written");
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "record".into()
    } else {
        sanitized
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
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
