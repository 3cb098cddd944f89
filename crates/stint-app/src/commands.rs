use anyhow::anyhow;
use stint_core::store::KeyValueStore;
use stint_core::task::{Day, Priority, TaskDraft, TaskPatch};
use tracing::info;
use uuid::Uuid;

use crate::cli::Command;
use crate::coordinator::{Coordinator, LoadState};
use crate::notify;
use crate::render;

pub async fn dispatch<S: KeyValueStore>(
    coordinator: &Coordinator<S>,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Add {
            name,
            desc,
            day,
            priority,
            tags,
        } => cmd_add(coordinator, name, desc, day, priority, tags).await,
        Command::List { term } => cmd_list(coordinator, term).await,
        Command::Show { id } => cmd_show(coordinator, id).await,
        Command::Edit {
            id,
            name,
            desc,
            day,
            priority,
            tags,
        } => cmd_edit(coordinator, id, name, desc, day, priority, tags).await,
        Command::Rm { id, force } => cmd_rm(coordinator, id, force).await,
    }
}

async fn cmd_add<S: KeyValueStore>(
    coordinator: &Coordinator<S>,
    name: String,
    desc: Option<String>,
    day: Option<String>,
    priority: Option<String>,
    tags: Vec<String>,
) -> anyhow::Result<()> {
    info!("command add");

    let draft = TaskDraft {
        task_name: name,
        description: desc.unwrap_or_default(),
        selected_day: parse_day(day.as_deref())?,
        selected_priority: parse_priority(priority.as_deref())?,
        tags,
    };

    coordinator.open_create();
    match coordinator.create_task(draft).await {
        Ok(task) => {
            println!("Created task {}.", task.id);
            Ok(())
        }
        Err(err) => {
            coordinator.close_modal();
            Err(err.into())
        }
    }
}

async fn cmd_list<S: KeyValueStore>(
    coordinator: &Coordinator<S>,
    term: Option<String>,
) -> anyhow::Result<()> {
    info!("command list");

    coordinator.refresh().await;
    if let Some(term) = term {
        coordinator.set_search_term(term);
    }

    let snapshot = coordinator.snapshot();
    if let LoadState::Failed(reason) = &snapshot.load {
        return Err(anyhow!(reason.clone()));
    }
    if snapshot.visible.is_empty() {
        println!("No tasks available.");
        return Ok(());
    }
    print!("{}", render::task_table(&snapshot.visible));
    Ok(())
}

async fn cmd_show<S: KeyValueStore>(coordinator: &Coordinator<S>, id: Uuid) -> anyhow::Result<()> {
    info!("command show");

    coordinator.refresh().await;
    coordinator.select_for_details(id);
    let task = coordinator.selected_task();
    coordinator.close_modal();
    match task {
        Some(task) => {
            print!("{}", render::task_details(&task));
            Ok(())
        }
        None => Err(anyhow!(notify::TASK_NOT_FOUND)),
    }
}

async fn cmd_edit<S: KeyValueStore>(
    coordinator: &Coordinator<S>,
    id: Uuid,
    name: Option<String>,
    desc: Option<String>,
    day: Option<String>,
    priority: Option<String>,
    tags: Vec<String>,
) -> anyhow::Result<()> {
    info!("command edit");

    let patch = TaskPatch {
        task_name: name,
        description: desc,
        selected_day: parse_day(day.as_deref())?,
        selected_priority: parse_priority(priority.as_deref())?,
        tags: if tags.is_empty() { None } else { Some(tags) },
        avatar: None,
    };

    coordinator.refresh().await;
    coordinator.select_for_edit(id);
    match coordinator.update_task(id, patch).await {
        Ok(Some(task)) => {
            println!("Updated task {}.", task.id);
            Ok(())
        }
        Ok(None) => {
            println!("No task with id {id}.");
            Ok(())
        }
        Err(err) => {
            coordinator.close_modal();
            Err(err.into())
        }
    }
}

async fn cmd_rm<S: KeyValueStore>(
    coordinator: &Coordinator<S>,
    id: Uuid,
    force: bool,
) -> anyhow::Result<()> {
    info!("command rm");

    coordinator.refresh().await;
    coordinator.select_for_delete(id);

    let Some(task) = coordinator.selected_task() else {
        coordinator.close_modal();
        println!("No task with id {id}.");
        return Ok(());
    };

    if !force {
        println!(
            "Would delete '{}'. Re-run with --force to confirm.",
            task.task_name
        );
        coordinator.close_modal();
        return Ok(());
    }

    coordinator.delete_confirmed().await?;
    Ok(())
}

fn parse_day(value: Option<&str>) -> anyhow::Result<Option<Day>> {
    let Some(value) = value else {
        return Ok(None);
    };
    Day::from_key(value)
        .map(Some)
        .ok_or_else(|| anyhow!("unknown day: {value} (expected today or tomorrow)"))
}

fn parse_priority(value: Option<&str>) -> anyhow::Result<Option<Priority>> {
    let Some(value) = value else {
        return Ok(None);
    };
    Priority::from_key(value)
        .map(Some)
        .ok_or_else(|| anyhow!("unknown priority: {value} (expected high, medium or low)"))
}
