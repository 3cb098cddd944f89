use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::task::Task;

/// Storage key holding the full task collection as one JSON array.
pub const TASKS_KEY: &str = "tasks";

/// The synchronous key-value storage the app persists into. Values are
/// opaque strings; layout is the adapter's business.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Disk-backed store: one file per key under a data directory, replaced
/// atomically on every write.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[tracing::instrument(skip(dir))]
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        info!(dir = %dir.display(), "opened key-value store");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("failed reading {}", path.display()))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path)
            .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Adapter between the task collection and the key-value backend. Reads are
/// tolerant: a missing key or unparseable payload is an empty collection,
/// because there is no recovery path for partial corruption. Writes always
/// replace the whole collection.
#[derive(Debug)]
pub struct TaskStore<S> {
    backend: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> anyhow::Result<Vec<Task>> {
        let Some(raw) = self
            .backend
            .get(TASKS_KEY)
            .context("failed reading task store")?
        else {
            debug!("task store empty; starting fresh");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded task collection");
                Ok(tasks)
            }
            Err(err) => {
                warn!(error = %err, "stored task data unparseable; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn save(&self, tasks: &[Task]) -> anyhow::Result<()> {
        let raw = serde_json::to_string(tasks).context("failed serializing task collection")?;
        self.backend
            .set(TASKS_KEY, &raw)
            .context("failed writing task store")?;
        debug!(count = tasks.len(), "saved task collection");
        Ok(())
    }
}
