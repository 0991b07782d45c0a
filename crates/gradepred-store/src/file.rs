//! JSON-file store: one `<key>.json` file per key.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gradepred_core::traits::PersistentStore;

/// Stores each key as a pretty-printed JSON file under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// The directory is created lazily on the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        anyhow::ensure!(valid, "invalid store key: {key:?}");
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PersistentStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create data directory {}", self.dir.display()))?;

        let json = serde_json::to_string_pretty(value).context("failed to serialize value")?;

        // Write then rename so a crash never leaves a half-written file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;

        tracing::debug!(key, path = %path.display(), "saved");
        Ok(())
    }
}
