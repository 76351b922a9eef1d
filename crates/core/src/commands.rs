use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::capture::TaskInput;
use crate::config::AppConfig;
use crate::model::{sort_recent_first, AddOutcome, DeleteResult, StatusUpdate, Task, TaskView};
use crate::storage::FileStore;
use crate::store::{now_millis, TaskStore};

/// Open the task store backed by the configured data directory.
pub fn open_store(config: &AppConfig) -> Result<TaskStore<FileStore>> {
    TaskStore::open(FileStore::new(config.data_dir())).with_context(|| {
        format!(
            "Failed to load tasks from {}",
            config.store_path().display()
        )
    })
}

/// Capture a task; `Ok(None)` when the title is blank or no date was given.
pub fn add_task(config: &AppConfig, input: &TaskInput) -> Result<Option<AddOutcome>> {
    let mut store = open_store(config)?;
    Ok(store.capture(input, now_millis())?)
}

/// Tasks for a tab, newest first. `date` scopes the Today tab.
pub fn list_tasks(config: &AppConfig, view: TaskView, date: NaiveDate) -> Result<Vec<Task>> {
    let store = open_store(config)?;
    let mut tasks: Vec<Task> = store
        .tasks()
        .iter()
        .filter(|task| view.matches(task, Some(date)))
        .cloned()
        .collect();
    sort_recent_first(&mut tasks);
    Ok(tasks)
}

/// Mark the tasks with the provided ids completed and return per-id results.
pub fn complete_tasks(config: &AppConfig, ids: &[String]) -> Result<Vec<StatusUpdate>> {
    let mut store = open_store(config)?;
    Ok(store.mark_completed(ids)?)
}

/// Move the tasks with the provided ids to drafts and return per-id results.
pub fn draft_tasks(config: &AppConfig, ids: &[String]) -> Result<Vec<StatusUpdate>> {
    let mut store = open_store(config)?;
    Ok(store.mark_draft(ids)?)
}

/// Delete the tasks with the provided ids and return per-id results.
pub fn delete_tasks(config: &AppConfig, ids: &[String]) -> Result<Vec<DeleteResult>> {
    let mut store = open_store(config)?;
    Ok(store.delete_tasks(ids)?)
}
