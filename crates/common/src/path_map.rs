//! Remote-to-local path translation.
//!
//! Scene metadata reports video paths under the library server's filesystem
//! convention. A user-maintained prefix table translates those into paths
//! reachable from this machine. Longest matching prefix wins.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Prefix-mapping table, persisted wholesale as a flat JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PathMappings {
    entries: HashMap<String, String>,
}

impl PathMappings {
    /// Built-in entries used when no stored table exists.
    pub fn defaults() -> Self {
        let mut entries = HashMap::new();
        entries.insert("/data/Extra".to_string(), "X:\\".to_string());
        entries.insert("/data/Extra-II".to_string(), "H:\\".to_string());
        Self { entries }
    }

    pub fn insert(&mut self, remote_prefix: impl Into<String>, local_prefix: impl Into<String>) {
        self.entries.insert(remote_prefix.into(), local_prefix.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the table from `path`, falling back to the built-in defaults if
    /// the file is absent or unreadable. Failures are logged, never raised.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(file = %path.display(), "no stored path mappings, using defaults");
            return Self::defaults();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(mappings) => mappings,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to parse path mappings, using defaults");
                    Self::defaults()
                }
            },
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to read path mappings, using defaults");
                Self::defaults()
            }
        }
    }

    /// Atomically replace the stored table with this one. Returns whether the
    /// write succeeded; failures are logged, never raised.
    pub fn save(&self, path: &Path) -> bool {
        let contents = match serde_json::to_string_pretty(&self) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "failed to serialize path mappings");
                return false;
            }
        };

        let temp_path = path.with_extension("json.tmp");
        if let Err(e) = fs::write(&temp_path, contents) {
            warn!(file = %temp_path.display(), error = %e, "failed to write path mappings");
            return false;
        }
        if let Err(e) = fs::rename(&temp_path, path) {
            warn!(file = %path.display(), error = %e, "failed to replace path mappings");
            let _ = fs::remove_file(&temp_path);
            return false;
        }
        true
    }

    /// Translate a remote-reported path into a local one.
    ///
    /// Backslashes in the input are normalized to forward slashes first, so
    /// both separator conventions resolve identically. Entries are tried
    /// longest-prefix-first; the matched prefix is substituted with the local
    /// prefix (joined with exactly one separator) and the remainder's
    /// separators are converted to backslashes. An unmatched path is returned
    /// unchanged apart from normalization.
    pub fn resolve(&self, remote_path: &str) -> String {
        if remote_path.is_empty() {
            return String::new();
        }

        let normalized = remote_path.replace('\\', "/");

        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        for key in keys {
            if let Some(rest) = normalized.strip_prefix(key.as_str()) {
                let mut local = self.entries[key].clone();
                if !local.ends_with('\\') {
                    local.push('\\');
                }
                let rest = rest.trim_start_matches('/');
                return local + &rest.replace('/', "\\");
            }
        }

        warn!(path = %normalized, "no mapping entry covers path, using it unchanged");
        normalized
    }
}
