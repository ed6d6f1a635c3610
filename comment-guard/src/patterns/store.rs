//! Persisted, append-only pattern store
//!
//! Scoring takes a shared read lock; `append`/`remove`/`persist` are
//! serialized through a file lock so only one writer touches the backing file
//! at a time.

use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, error, info, warn};

use super::types::{CompiledPattern, PatternCategory, SpamPattern};
use crate::error::{GuardError, Result};

/// Pattern store backed by a JSON file (or nothing, for ephemeral use).
pub struct PatternStore {
    path: Option<PathBuf>,
    patterns: RwLock<Vec<CompiledPattern>>,
    file_lock: Mutex<()>,
}

impl PatternStore {
    /// Load the store from `path`.
    ///
    /// Never fails: a missing file is created empty, an unreadable or corrupt
    /// one is logged and the store starts empty. Built-in heuristics keep
    /// working either way.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<Vec<SpamPattern>>(&content) {
                Ok(records) => {
                    info!("Loaded {} spam patterns from {}", records.len(), path.display());
                    records
                }
                Err(e) => {
                    warn!("Pattern store {} is corrupt, starting empty: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No pattern store at {}, creating an empty one", path.display());
                if let Err(e) = write_file(&path, &[]).await {
                    warn!("Could not create pattern store {}: {}", path.display(), e);
                }
                Vec::new()
            }
            Err(e) => {
                warn!("Could not read pattern store {}, starting empty: {}", path.display(), e);
                Vec::new()
            }
        };

        Self::build(Some(path), dedup(records))
    }

    /// A store that lives only in memory. `persist` is a no-op.
    pub fn in_memory(records: Vec<SpamPattern>) -> Self {
        Self::build(None, dedup(records))
    }

    fn build(path: Option<PathBuf>, records: Vec<SpamPattern>) -> Self {
        Self {
            path,
            patterns: RwLock::new(records.into_iter().map(CompiledPattern::compile).collect()),
            file_lock: Mutex::new(()),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Shared view of the compiled patterns, in store order.
    pub async fn read(&self) -> RwLockReadGuard<'_, Vec<CompiledPattern>> {
        self.patterns.read().await
    }

    /// Copy of every stored record.
    pub async fn list(&self) -> Vec<SpamPattern> {
        self.patterns.read().await.iter().map(|p| p.record.clone()).collect()
    }

    pub async fn len(&self) -> usize {
        self.patterns.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.patterns.read().await.is_empty()
    }

    pub async fn contains(&self, pattern: &str) -> bool {
        self.patterns.read().await.iter().any(|p| p.record.pattern == pattern)
    }

    /// Add `pattern` unless an identical pattern string is already stored.
    ///
    /// Returns `true` if the pattern was new. The store is persisted before
    /// returning; a failed write is logged and the pattern stays in memory.
    pub async fn append(&self, pattern: &str, category: PatternCategory) -> bool {
        let _file = self.file_lock.lock().await;

        let mut patterns = self.patterns.write().await;
        if patterns.iter().any(|p| p.record.pattern == pattern) {
            debug!("Pattern already stored: {}", pattern);
            return false;
        }

        patterns.push(CompiledPattern::compile(SpamPattern::new(pattern, category)));
        info!("Learned new {} pattern: {}", category, pattern);

        let patterns = patterns.downgrade();
        if let Err(e) = self.write_locked(&patterns).await {
            error!("Failed to persist learned pattern: {}", e);
        }

        true
    }

    /// Remove a pattern by exact string. Administrative only, never called
    /// from the classification path.
    pub async fn remove(&self, pattern: &str) -> Result<bool> {
        let _file = self.file_lock.lock().await;

        let mut patterns = self.patterns.write().await;
        let before = patterns.len();
        patterns.retain(|p| p.record.pattern != pattern);
        if patterns.len() == before {
            return Ok(false);
        }

        info!("Removed pattern: {}", pattern);
        let patterns = patterns.downgrade();
        self.write_locked(&patterns).await?;
        Ok(true)
    }

    /// Rewrite the backing file with the current contents.
    pub async fn persist(&self) -> Result<()> {
        let _file = self.file_lock.lock().await;
        let patterns = self.patterns.read().await;
        self.write_locked(&patterns).await
    }

    // Caller holds `file_lock`.
    async fn write_locked(&self, patterns: &[CompiledPattern]) -> Result<()> {
        match &self.path {
            Some(path) => {
                let records: Vec<SpamPattern> = patterns.iter().map(|p| p.record.clone()).collect();
                write_file(path, &records).await
            }
            None => Ok(()),
        }
    }
}

/// First occurrence wins; a hand-edited file may carry duplicates.
fn dedup(records: Vec<SpamPattern>) -> Vec<SpamPattern> {
    let mut seen = std::collections::HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.pattern.clone()))
        .collect()
}

/// Write the whole store next to `path` and rename it into place, so a crash
/// mid-write leaves the previous file intact.
async fn write_file(path: &Path, records: &[SpamPattern]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| GuardError::Store(format!("not a file path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, json).await?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    debug!("Wrote {} patterns to {}", records.len(), path.display());
    Ok(())
}
