use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::capture::{normalize_title, TaskInput};
use crate::config::TASKS_KEY;
use crate::model::{AddOutcome, DeleteResult, StatusUpdate, Task, TaskStatus};
use crate::storage::{KeyValueStore, Repository, StoreError};

/// In-memory task collection mirrored to a single key of a [`KeyValueStore`].
///
/// The collection is read once when the store is opened and written back in
/// full after every change. A change whose write fails is undone in memory.
#[derive(Debug)]
pub struct TaskStore<S> {
    repo: Repository<S>,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn open(backend: S) -> Result<Self, StoreError> {
        let repo = Repository::new(backend);
        let tasks = repo.load_tasks(TASKS_KEY)?;
        debug!(key = TASKS_KEY, count = tasks.len(), "loaded tasks");
        Ok(Self { repo, tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn backend(&self) -> &S {
        self.repo.backend()
    }

    /// Appends a new active task. Returns `Ok(None)` without touching storage
    /// when the trimmed title is empty.
    pub fn add_task(
        &mut self,
        title: &str,
        date: NaiveDate,
        created_at: i64,
    ) -> Result<Option<AddOutcome>, StoreError> {
        let Some(title) = normalize_title(title) else {
            return Ok(None);
        };

        let id = self.next_id(created_at);
        let task = Task::new(id.clone(), title.clone(), date, created_at);
        self.tasks.push(task);
        if let Err(err) = self.save() {
            self.tasks.pop();
            return Err(err);
        }
        info!(task_id = id.as_str(), %date, "task added");
        Ok(Some(AddOutcome { id, title, date }))
    }

    /// Captures from normalized client input; a missing date or empty title
    /// is a no-op.
    pub fn capture(
        &mut self,
        input: &TaskInput,
        created_at: i64,
    ) -> Result<Option<AddOutcome>, StoreError> {
        match input.date {
            Some(date) => self.add_task(&input.title(), date, created_at),
            None => Ok(None),
        }
    }

    pub fn complete(&mut self, id: &str) -> Result<StatusUpdate, StoreError> {
        self.transition(id, TaskStatus::Completed)
    }

    pub fn move_to_draft(&mut self, id: &str) -> Result<StatusUpdate, StoreError> {
        self.transition(id, TaskStatus::Draft)
    }

    pub fn mark_completed(&mut self, ids: &[String]) -> Result<Vec<StatusUpdate>, StoreError> {
        ids.iter().map(|id| self.complete(id)).collect()
    }

    pub fn mark_draft(&mut self, ids: &[String]) -> Result<Vec<StatusUpdate>, StoreError> {
        ids.iter().map(|id| self.move_to_draft(id)).collect()
    }

    fn transition(&mut self, id: &str, status: TaskStatus) -> Result<StatusUpdate, StoreError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id && task.status.can_transition_to(status));

        let changed = match index {
            Some(index) => {
                let previous = self.tasks[index].status;
                self.tasks[index].status = status;
                if let Err(err) = self.save() {
                    self.tasks[index].status = previous;
                    return Err(err);
                }
                info!(task_id = id, status = status.as_str(), "task status changed");
                true
            }
            None => {
                debug!(task_id = id, status = status.as_str(), "status change ignored");
                false
            }
        };

        Ok(StatusUpdate {
            id: id.to_string(),
            changed,
        })
    }

    pub fn delete(&mut self, id: &str) -> Result<DeleteResult, StoreError> {
        let index = self.tasks.iter().position(|task| task.id == id);
        if let Some(index) = index {
            let removed = self.tasks.remove(index);
            if let Err(err) = self.save() {
                self.tasks.insert(index, removed);
                return Err(err);
            }
            info!(task_id = id, "task deleted");
        }
        Ok(DeleteResult {
            id: id.to_string(),
            deleted: index.is_some(),
        })
    }

    pub fn delete_tasks(&mut self, ids: &[String]) -> Result<Vec<DeleteResult>, StoreError> {
        ids.iter().map(|id| self.delete(id)).collect()
    }

    /// Overwrites the persisted blob with the current collection.
    fn save(&mut self) -> Result<(), StoreError> {
        self.repo.save(TASKS_KEY, &self.tasks)
    }

    /// Ids derive from the creation instant; collisions take the next free value.
    fn next_id(&self, created_at: i64) -> String {
        let mut candidate = created_at;
        loop {
            let id = candidate.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            candidate += 1;
        }
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::io;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// Memory backend whose writes can be switched off from outside.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: Rc<Cell<bool>>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                return Err(StoreError::Write {
                    key: key.to_string(),
                    path: PathBuf::from("flaky"),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn store() -> TaskStore<MemoryStore> {
        TaskStore::open(MemoryStore::new()).unwrap()
    }

    fn persisted(store: &TaskStore<MemoryStore>) -> Vec<Task> {
        Repository::new(store.backend().clone())
            .load_tasks(TASKS_KEY)
            .unwrap()
    }

    #[test]
    fn add_task_creates_active_task_and_persists() {
        let mut store = store();
        let outcome = store
            .add_task("  Write report  ", day(19), 1_000)
            .unwrap()
            .expect("task added");

        assert_eq!(outcome.title, "Write report");
        assert_eq!(store.len(), 1);
        let task = store.get(&outcome.id).unwrap();
        assert_eq!(task.status, TaskStatus::Active);
        assert_eq!(task.date, day(19));
        assert_eq!(task.assigned_date, day(19));
        assert_eq!(persisted(&store), store.tasks().to_vec());
    }

    #[test]
    fn blank_titles_are_ignored() {
        let mut store = store();
        assert_eq!(store.add_task("", day(19), 1).unwrap(), None);
        assert_eq!(store.add_task(" \t\n", day(19), 2).unwrap(), None);
        assert!(store.is_empty());
        assert_eq!(store.backend().get(TASKS_KEY).unwrap(), None);
    }

    #[test]
    fn capture_without_date_is_ignored() {
        let mut store = store();
        let input = TaskInput::new("Call mom", None);
        assert_eq!(store.capture(&input, 1).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn ids_stay_unique_within_the_same_millisecond() {
        let mut store = store();
        let a = store.add_task("One", day(19), 5_000).unwrap().unwrap();
        let b = store.add_task("Two", day(19), 5_000).unwrap().unwrap();
        let c = store.add_task("Three", day(19), 5_000).unwrap().unwrap();

        assert_eq!(a.id, "5000");
        assert_eq!(b.id, "5001");
        assert_eq!(c.id, "5002");
    }

    #[test]
    fn status_only_moves_forward() {
        let mut store = store();
        let id = store.add_task("Plan", day(19), 1).unwrap().unwrap().id;

        assert!(store.move_to_draft(&id).unwrap().changed);
        assert!(!store.move_to_draft(&id).unwrap().changed);
        assert!(store.complete(&id).unwrap().changed);
        assert!(!store.move_to_draft(&id).unwrap().changed);
        assert!(!store.complete(&id).unwrap().changed);

        let task = store.get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.date, day(19));
        assert_eq!(task.assigned_date, day(19));
        assert_eq!(persisted(&store)[0].status, TaskStatus::Completed);
    }

    #[test]
    fn unknown_ids_report_no_change() {
        let mut store = store();
        assert!(!store.complete("missing").unwrap().changed);
        assert!(!store.delete("missing").unwrap().deleted);
    }

    #[test]
    fn delete_removes_and_persists() {
        let mut store = store();
        let keep = store.add_task("Keep", day(19), 1).unwrap().unwrap().id;
        let drop = store.add_task("Drop", day(19), 2).unwrap().unwrap().id;

        let results = store
            .delete_tasks(&[drop.clone(), "missing".into()])
            .unwrap();
        assert!(results[0].deleted);
        assert!(!results[1].deleted);
        assert_eq!(store.len(), 1);
        assert_eq!(persisted(&store)[0].id, keep);
    }

    #[test]
    fn reopen_restores_collection() {
        let mut store = store();
        store.add_task("Alpha", day(18), 10).unwrap();
        let id = store.add_task("Beta", day(19), 20).unwrap().unwrap().id;
        store.move_to_draft(&id).unwrap();

        let reopened = TaskStore::open(store.backend().clone()).unwrap();
        assert_eq!(reopened.tasks(), store.tasks());
    }

    #[test]
    fn failed_writes_leave_collection_unchanged() {
        let backend = FlakyStore::default();
        let fail_writes = Rc::clone(&backend.fail_writes);
        let mut store = TaskStore::open(backend).unwrap();
        let keep = store.add_task("Keep", day(19), 1).unwrap().unwrap().id;
        let before = store.tasks().to_vec();

        fail_writes.set(true);
        assert!(store.add_task("Retry me", day(19), 2).is_err());
        assert!(store.add_task("Retry me", day(19), 3).is_err());
        assert!(store.complete(&keep).is_err());
        assert!(store.move_to_draft(&keep).is_err());
        assert!(store.delete(&keep).is_err());
        assert_eq!(store.tasks(), before.as_slice());

        fail_writes.set(false);
        store.add_task("Retry me", day(19), 4).unwrap();
        assert_eq!(store.len(), 2);
        let persisted = Repository::new(store.backend().inner.clone())
            .load_tasks(TASKS_KEY)
            .unwrap();
        assert_eq!(persisted, store.tasks().to_vec());
    }
}
