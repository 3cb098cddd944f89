use tracing::trace;

use crate::task::Task;

/// Case-insensitive substring match on the task's name or description. An
/// empty term matches every task.
pub fn matches(task: &Task, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    let needle = term.to_lowercase();
    let ok = task.task_name.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle);
    trace!(id = %task.id, term = %needle, ok, "search term evaluation");
    ok
}

/// Derived view of the collection: the ordered subsequence matching `term`.
/// Never mutates anything; recomputable at any time.
pub fn filter_tasks<'a>(tasks: &'a [Task], term: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|task| matches(task, term)).collect()
}
