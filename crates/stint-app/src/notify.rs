use tracing::{error, info};

pub const CREATED: &str = "Task Created Successfully!";
pub const UPDATED: &str = "Task Updated Successfully!";
pub const DELETED: &str = "Task deleted successfully!";
pub const SAVE_FAILED: &str = "Failed to save task. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete task. Please try again.";
pub const FETCH_FAILED: &str = "Failed to fetch tasks.";
pub const TASK_NOT_FOUND: &str = "Task not found.";

/// Toast sink. The coordinator pushes human-readable outcome messages here;
/// what a "toast" looks like is the presentation layer's problem.
pub trait Notify {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default sink: notifications go to the log stream.
#[derive(Debug, Default)]
pub struct TracingNotify;

impl Notify for TracingNotify {
    fn success(&self, message: &str) {
        info!(message, "notification");
    }

    fn error(&self, message: &str) {
        error!(message, "notification");
    }
}

/// CLI sink: successes on stdout, failures on stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotify;

impl Notify for ConsoleNotify {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}
