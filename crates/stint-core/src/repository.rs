use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::store::{KeyValueStore, TaskStore};
use crate::task::{Task, TaskDraft, TaskPatch, ValidationError};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task store unavailable")]
    Store(#[source] anyhow::Error),
}

/// Domain-level API over the task collection. Every mutation is a full
/// load-modify-save cycle against the adapter; validation runs before
/// anything reaches the store.
#[derive(Debug)]
pub struct TaskRepository<S> {
    store: TaskStore<S>,
}

impl<S: KeyValueStore> TaskRepository<S> {
    pub fn new(backend: S) -> Self {
        Self {
            store: TaskStore::new(backend),
        }
    }

    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        self.store.load().map_err(RepositoryError::Store)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepositoryError> {
        Ok(self.list()?.into_iter().find(|task| task.id == id))
    }

    #[instrument(skip(self, draft))]
    pub fn insert(&self, draft: TaskDraft) -> Result<Task, RepositoryError> {
        let task = Task::from_draft(draft)?;
        let mut tasks = self.list()?;
        tasks.push(task.clone());
        self.store.save(&tasks).map_err(RepositoryError::Store)?;
        info!(id = %task.id, count = tasks.len(), "task inserted");
        Ok(task)
    }

    /// Shallow-merges `patch` over the matching entry. A missing id is a
    /// silent no-op: the caller is expected to have resolved the id from
    /// selection state, so a miss means that state went stale.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub fn update(&self, id: Uuid, patch: &TaskPatch) -> Result<Option<Task>, RepositoryError> {
        let mut tasks = self.list()?;
        let Some(slot) = tasks.iter_mut().find(|task| task.id == id) else {
            debug!("update target not found; leaving store unchanged");
            return Ok(None);
        };

        let merged = slot.merged(patch);
        merged.validate()?;
        *slot = merged.clone();
        self.store.save(&tasks).map_err(RepositoryError::Store)?;
        info!("task updated");
        Ok(Some(merged))
    }

    #[instrument(skip(self), fields(id = %id))]
    pub fn remove(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut tasks = self.list()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            debug!("remove target not found; leaving store unchanged");
            return Ok(());
        }

        self.store.save(&tasks).map_err(RepositoryError::Store)?;
        info!(remaining = tasks.len(), "task removed");
        Ok(())
    }
}
