//! JSON file cache with a fixed expiration window.
//!
//! Each key is stored as `<dir>/<key>.json`. An entry is fresh while the
//! file's modification time is within the window. Writes overwrite the file
//! unconditionally and there is no locking: concurrent writers race and the
//! last write wins.

use crate::error::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FileCache {
    /// Create a cache rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, ttl })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stored value for `key`, or `None` when missing, expired or unreadable
    pub fn get(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;

        // A modification time in the future counts as just written
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age >= self.ttl {
            debug!(key, age_secs = age.as_secs(), "Cache entry expired");
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(key, error = %e, "Failed to read cache file");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Ignoring corrupt cache file");
                None
            }
        }
    }

    /// Overwrite the entry for `key`
    pub fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key);
        let content = serde_json::to_string(value)?;
        fs::write(&path, content)?;
        debug!(key, path = %path.display(), "Cache entry written");
        Ok(())
    }

    /// Backing file for a key; anything outside `[A-Za-z0-9_-]` becomes `_`
    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", sanitized))
    }
}
