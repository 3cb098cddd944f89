use std::sync::Arc;

use parking_lot::Mutex;
use stint_core::filter::filter_tasks;
use stint_core::repository::{RepositoryError, TaskRepository};
use stint_core::store::KeyValueStore;
use stint_core::task::{Task, TaskDraft, TaskPatch};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::navigation::{Location, Navigator};
use crate::notify::{self, Notify, TracingNotify};

/// Which modal occupies the screen. At most one; opening a modal closes
/// whatever was open before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Closed,
    Creating,
    Editing(Uuid),
    ViewingDetails(Uuid),
    ConfirmingDelete(Uuid),
}

impl Modal {
    pub fn selected_id(self) -> Option<Uuid> {
        match self {
            Modal::Closed | Modal::Creating => None,
            Modal::Editing(id) | Modal::ViewingDetails(id) | Modal::ConfirmingDelete(id) => {
                Some(id)
            }
        }
    }

    fn location(self) -> Location {
        match self {
            Modal::Closed => Location::Home,
            Modal::Creating => Location::Create,
            Modal::Editing(_) => Location::Edit,
            Modal::ViewingDetails(_) => Location::Details,
            Modal::ConfirmingDelete(_) => Location::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Read-only view of coordinator state. This is the entire surface the
/// presentation layer may touch; mutations go through coordinator methods.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub visible: Vec<Task>,
    pub load: LoadState,
    pub modal: Modal,
    pub selected: Option<Uuid>,
    pub search_term: String,
    pub location: Location,
}

type Listener = Box<dyn Fn(&Snapshot)>;

struct Inner<S> {
    repo: TaskRepository<S>,
    tasks: Vec<Task>,
    load: LoadState,
    modal: Modal,
    search_term: String,
    navigator: Navigator,
    refresh_gen: u64,
    notifier: Box<dyn Notify>,
}

/// The shared application state machine: in-memory mirror of the task
/// collection plus modal/selection/search state. Cloning the coordinator
/// clones a handle to the same state; all writes go through its methods.
pub struct Coordinator<S> {
    state: Arc<Mutex<Inner<S>>>,
    listeners: Arc<Mutex<Vec<Listener>>>,
}

impl<S> Clone for Coordinator<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<S: KeyValueStore> Coordinator<S> {
    pub fn new(repo: TaskRepository<S>) -> Self {
        Self::with_notifier(repo, Box::new(TracingNotify))
    }

    pub fn with_notifier(repo: TaskRepository<S>, notifier: Box<dyn Notify>) -> Self {
        Self {
            state: Arc::new(Mutex::new(Inner {
                repo,
                tasks: Vec::new(),
                load: LoadState::Idle,
                modal: Modal::Closed,
                search_term: String::new(),
                navigator: Navigator::at_home(),
                refresh_gen: 0,
                notifier,
            })),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replaces the in-memory list from the store. A refresh superseded by a
    /// newer one discards its result; the newest caller owns the list.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let generation = {
            let mut inner = self.state.lock();
            inner.refresh_gen += 1;
            inner.load = LoadState::Loading;
            inner.refresh_gen
        };
        self.emit();

        tokio::task::yield_now().await;
        let result = self.state.lock().repo.list();

        {
            let mut inner = self.state.lock();
            if inner.refresh_gen != generation {
                debug!(
                    generation,
                    current = inner.refresh_gen,
                    "refresh superseded; discarding result"
                );
                return;
            }
            match result {
                Ok(tasks) => {
                    debug!(count = tasks.len(), "task list refreshed");
                    inner.tasks = tasks;
                    inner.load = LoadState::Ready;
                }
                Err(err) => {
                    warn!(error = %err, "task list refresh failed");
                    inner.load = LoadState::Failed(notify::FETCH_FAILED.to_string());
                }
            }
        }
        self.emit();
    }

    /// Creates a task from the form draft. Validation failures go back to the
    /// form untouched; store failures are notified and leave both the store
    /// and the in-memory list as they were.
    #[instrument(skip(self, draft))]
    pub async fn create_task(&self, draft: TaskDraft) -> Result<Task, RepositoryError> {
        let result = self.state.lock().repo.insert(draft);
        match &result {
            Ok(task) => {
                info!(id = %task.id, "task created");
                self.notify_success(notify::CREATED);
                self.refresh().await;
                self.close_modal();
            }
            Err(RepositoryError::Validation(err)) => {
                debug!(fields = ?err.fields, "task rejected by validation");
            }
            Err(RepositoryError::Store(err)) => {
                warn!(error = %err, "task create failed at the store");
                self.notify_error(notify::SAVE_FAILED);
            }
        }
        result
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update_task(
        &self,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>, RepositoryError> {
        let result = self.state.lock().repo.update(id, &patch);
        match &result {
            Ok(Some(task)) => {
                info!(id = %task.id, "task updated");
                self.notify_success(notify::UPDATED);
                self.refresh().await;
                self.close_modal();
            }
            Ok(None) => {
                debug!("update target missing; selection state went stale");
                self.refresh().await;
                self.close_modal();
            }
            Err(RepositoryError::Validation(err)) => {
                debug!(fields = ?err.fields, "task rejected by validation");
            }
            Err(RepositoryError::Store(err)) => {
                warn!(error = %err, "task update failed at the store");
                self.notify_error(notify::SAVE_FAILED);
            }
        }
        result
    }

    /// Deletes whatever ConfirmingDelete holds. Called with any other modal
    /// state it does nothing: there is nothing the user confirmed.
    #[instrument(skip(self))]
    pub async fn delete_confirmed(&self) -> Result<(), RepositoryError> {
        let modal = self.state.lock().modal;
        let Modal::ConfirmingDelete(id) = modal else {
            debug!(?modal, "delete confirmed without a pending confirmation");
            return Ok(());
        };

        let result = self.state.lock().repo.remove(id);
        match &result {
            Ok(()) => {
                info!(%id, "task deleted");
                self.notify_success(notify::DELETED);
                self.refresh().await;
                self.close_modal();
            }
            Err(err) => {
                warn!(error = %err, "task delete failed at the store");
                self.notify_error(notify::DELETE_FAILED);
            }
        }
        result
    }

    pub fn open_create(&self) {
        self.set_modal(Modal::Creating);
    }

    /// The add button toggles: opening clears any stale selection, a second
    /// press closes the form again.
    pub fn toggle_create(&self) {
        let next = if self.state.lock().modal == Modal::Creating {
            Modal::Closed
        } else {
            Modal::Creating
        };
        self.set_modal(next);
    }

    pub fn select_for_edit(&self, id: Uuid) {
        self.set_modal(Modal::Editing(id));
    }

    pub fn select_for_details(&self, id: Uuid) {
        self.set_modal(Modal::ViewingDetails(id));
    }

    pub fn select_for_delete(&self, id: Uuid) {
        self.set_modal(Modal::ConfirmingDelete(id));
    }

    pub fn close_modal(&self) {
        self.set_modal(Modal::Closed);
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.state.lock().search_term = term.into();
        self.emit();
    }

    pub fn snapshot(&self) -> Snapshot {
        snapshot_of(&self.state.lock())
    }

    /// Resolves the current selection against the in-memory list. `None`
    /// either means nothing is selected or the selection went stale.
    pub fn selected_task(&self) -> Option<Task> {
        let inner = self.state.lock();
        let id = inner.modal.selected_id()?;
        inner.tasks.iter().find(|task| task.id == id).cloned()
    }

    /// Dependent views register here; each state change hands every listener
    /// a fresh snapshot.
    pub fn subscribe(&self, listener: impl Fn(&Snapshot) + 'static) {
        self.listeners.lock().push(Box::new(listener));
    }

    fn set_modal(&self, modal: Modal) {
        {
            let mut inner = self.state.lock();
            if inner.modal != modal {
                debug!(from = ?inner.modal, to = ?modal, "modal transition");
            }
            inner.modal = modal;
            inner.navigator.mark(modal.location());
        }
        self.emit();
    }

    fn emit(&self) {
        let snapshot = self.snapshot();
        for listener in self.listeners.lock().iter() {
            listener(&snapshot);
        }
    }

    fn notify_success(&self, message: &str) {
        self.state.lock().notifier.success(message);
    }

    fn notify_error(&self, message: &str) {
        self.state.lock().notifier.error(message);
    }
}

fn snapshot_of<S>(inner: &Inner<S>) -> Snapshot {
    let visible = filter_tasks(&inner.tasks, &inner.search_term)
        .into_iter()
        .cloned()
        .collect();
    Snapshot {
        tasks: inner.tasks.clone(),
        visible,
        load: inner.load.clone(),
        modal: inner.modal,
        selected: inner.modal.selected_id(),
        search_term: inner.search_term.clone(),
        location: inner.navigator.current(),
    }
}
