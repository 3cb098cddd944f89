use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Waker};

use anyhow::bail;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use stint_app::coordinator::{Coordinator, LoadState, Modal};
use stint_app::navigation::Location;
use stint_app::notify::{self, Notify};
use stint_core::repository::{RepositoryError, TaskRepository};
use stint_core::store::{KeyValueStore, MemoryStore};
use stint_core::task::{Day, Priority, TaskDraft, TaskPatch};

#[derive(Clone, Default)]
struct RecordingNotify {
    events: Arc<Mutex<Vec<(bool, String)>>>,
}

impl RecordingNotify {
    fn successes(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|(ok, _)| *ok)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|(ok, _)| !*ok)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Notify for RecordingNotify {
    fn success(&self, message: &str) {
        self.events.lock().push((true, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.events.lock().push((false, message.to_string()));
    }
}

/// Memory store whose failures can be scripted from the outside.
#[derive(Default)]
struct ScriptedStore {
    inner: MemoryStore,
    fail_next_get: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl KeyValueStore for ScriptedStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        if self.fail_next_get.swap(false, Ordering::SeqCst) {
            bail!("storage access denied");
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("storage quota exceeded");
        }
        self.inner.set(key, value)
    }
}

fn coordinator() -> (Coordinator<MemoryStore>, RecordingNotify) {
    let notifier = RecordingNotify::default();
    let coordinator = Coordinator::with_notifier(
        TaskRepository::new(MemoryStore::new()),
        Box::new(notifier.clone()),
    );
    (coordinator, notifier)
}

fn draft(name: &str, description: &str) -> TaskDraft {
    TaskDraft {
        task_name: name.to_string(),
        description: description.to_string(),
        selected_day: Some(Day::Today),
        selected_priority: Some(Priority::Low),
        tags: vec![],
    }
}

#[tokio::test]
async fn create_flow_lands_in_ready_closed_state() {
    let (coordinator, notifier) = coordinator();

    coordinator.open_create();
    assert_eq!(coordinator.snapshot().location, Location::Create);

    coordinator
        .create_task(draft("Buy milk", "2%"))
        .await
        .expect("create");

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.load, LoadState::Ready);
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.modal, Modal::Closed);
    assert_eq!(snapshot.selected, None);
    assert_eq!(snapshot.location, Location::Home);
    assert_eq!(notifier.successes(), vec![notify::CREATED.to_string()]);
}

#[tokio::test]
async fn two_open_close_cycles_leave_modal_closed_and_selection_clear() {
    let (coordinator, _) = coordinator();

    for _ in 0..2 {
        coordinator.open_create();
        assert_eq!(coordinator.snapshot().modal, Modal::Creating);
        coordinator.close_modal();

        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.modal, Modal::Closed);
        assert_eq!(snapshot.selected, None);
        assert_eq!(snapshot.location, Location::Home);
    }
}

#[tokio::test]
async fn opening_a_modal_closes_the_previous_one() {
    let (coordinator, _) = coordinator();
    let task = coordinator
        .create_task(draft("Buy milk", "2%"))
        .await
        .expect("create");

    coordinator.select_for_details(task.id);
    assert_eq!(coordinator.snapshot().modal, Modal::ViewingDetails(task.id));

    coordinator.select_for_edit(task.id);
    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.modal, Modal::Editing(task.id));
    assert_eq!(snapshot.selected, Some(task.id));
    assert_eq!(snapshot.location, Location::Edit);
}

#[tokio::test]
async fn search_term_narrows_the_visible_subset() {
    let (coordinator, _) = coordinator();
    coordinator
        .create_task(draft("Buy milk", "2%"))
        .await
        .expect("create");
    coordinator
        .create_task(draft("Call mom", "Sunday"))
        .await
        .expect("create");

    coordinator.set_search_term("MOM");
    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.search_term, "MOM");
    assert_eq!(snapshot.tasks.len(), 2);
    assert_eq!(snapshot.visible.len(), 1);
    assert_eq!(snapshot.visible[0].task_name, "Call mom");
}

#[tokio::test]
async fn update_flow_merges_and_notifies() {
    let (coordinator, notifier) = coordinator();
    let task = coordinator
        .create_task(draft("Buy milk", "2%"))
        .await
        .expect("create");

    coordinator.select_for_edit(task.id);
    let patch = TaskPatch {
        description: Some("Whole milk".to_string()),
        ..TaskPatch::default()
    };
    let updated = coordinator
        .update_task(task.id, patch)
        .await
        .expect("update")
        .expect("task present");
    assert_eq!(updated.description, "Whole milk");
    assert_eq!(updated.task_name, "Buy milk");

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.modal, Modal::Closed);
    assert_eq!(snapshot.tasks[0].description, "Whole milk");
    assert!(notifier.successes().contains(&notify::UPDATED.to_string()));
}

#[tokio::test]
async fn delete_flow_removes_the_selected_task() {
    let (coordinator, notifier) = coordinator();
    let first = coordinator
        .create_task(draft("Buy milk", "2%"))
        .await
        .expect("create");
    let second = coordinator
        .create_task(draft("Call mom", "Sunday"))
        .await
        .expect("create");

    coordinator.select_for_delete(second.id);
    coordinator.delete_confirmed().await.expect("delete");

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].id, first.id);
    assert_eq!(snapshot.modal, Modal::Closed);
    assert_eq!(snapshot.selected, None);
    assert!(notifier.successes().contains(&notify::DELETED.to_string()));
}

#[tokio::test]
async fn delete_without_a_pending_confirmation_is_a_noop() {
    let (coordinator, notifier) = coordinator();
    coordinator
        .create_task(draft("Buy milk", "2%"))
        .await
        .expect("create");

    coordinator.delete_confirmed().await.expect("noop");

    assert_eq!(coordinator.snapshot().tasks.len(), 1);
    assert!(!notifier.successes().contains(&notify::DELETED.to_string()));
}

#[tokio::test]
async fn validation_failure_leaves_everything_untouched() {
    let (coordinator, notifier) = coordinator();

    coordinator.open_create();
    let err = coordinator
        .create_task(draft("   ", "2%"))
        .await
        .expect_err("blank name must be rejected");
    assert!(matches!(err, RepositoryError::Validation(_)));

    let snapshot = coordinator.snapshot();
    assert!(snapshot.tasks.is_empty());
    assert_eq!(snapshot.modal, Modal::Creating);
    assert!(notifier.successes().is_empty());
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn store_write_failure_keeps_the_premutation_snapshot() {
    let notifier = RecordingNotify::default();
    let store = ScriptedStore::default();
    let fail_writes = Arc::clone(&store.fail_writes);
    let coordinator =
        Coordinator::with_notifier(TaskRepository::new(store), Box::new(notifier.clone()));

    let task = coordinator
        .create_task(draft("Buy milk", "2%"))
        .await
        .expect("create");

    fail_writes.store(true, Ordering::SeqCst);
    coordinator.open_create();
    let err = coordinator
        .create_task(draft("Call mom", "Sunday"))
        .await
        .expect_err("write must fail");
    assert!(matches!(err, RepositoryError::Store(_)));

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].id, task.id);
    assert_eq!(snapshot.modal, Modal::Creating);
    assert_eq!(notifier.errors(), vec![notify::SAVE_FAILED.to_string()]);

    fail_writes.store(false, Ordering::SeqCst);
    coordinator.refresh().await;
    assert_eq!(coordinator.snapshot().tasks.len(), 1);
}

#[tokio::test]
async fn refresh_failure_surfaces_the_fetch_message() {
    let notifier = RecordingNotify::default();
    let store = ScriptedStore::default();
    let fail_next_get = Arc::clone(&store.fail_next_get);
    let coordinator =
        Coordinator::with_notifier(TaskRepository::new(store), Box::new(notifier.clone()));

    fail_next_get.store(true, Ordering::SeqCst);
    coordinator.refresh().await;

    assert_eq!(
        coordinator.snapshot().load,
        LoadState::Failed(notify::FETCH_FAILED.to_string())
    );

    coordinator.refresh().await;
    assert_eq!(coordinator.snapshot().load, LoadState::Ready);
}

#[tokio::test]
async fn superseded_refresh_discards_its_result() {
    let notifier = RecordingNotify::default();
    let store = ScriptedStore::default();
    let fail_next_get = Arc::clone(&store.fail_next_get);
    let coordinator =
        Coordinator::with_notifier(TaskRepository::new(store), Box::new(notifier.clone()));
    coordinator
        .create_task(draft("Buy milk", "2%"))
        .await
        .expect("create");

    let waker = Waker::noop();
    let mut cx = Context::from_waker(waker);

    let mut older = pin!(coordinator.refresh());
    let mut newer = pin!(coordinator.refresh());

    assert!(older.as_mut().poll(&mut cx).is_pending());
    assert!(newer.as_mut().poll(&mut cx).is_pending());

    // The older refresh reads next and hits a failure, but a newer refresh
    // has started, so the failure must be discarded rather than published.
    fail_next_get.store(true, Ordering::SeqCst);
    assert!(older.as_mut().poll(&mut cx).is_ready());
    assert!(newer.as_mut().poll(&mut cx).is_ready());

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.load, LoadState::Ready);
    assert_eq!(snapshot.tasks.len(), 1);
}

#[tokio::test]
async fn listeners_see_every_transition() {
    let (coordinator, _) = coordinator();
    let seen: Arc<Mutex<Vec<Modal>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    coordinator.subscribe(move |snapshot| sink.lock().push(snapshot.modal));

    coordinator.open_create();
    coordinator.close_modal();

    assert_eq!(*seen.lock(), vec![Modal::Creating, Modal::Closed]);
}
