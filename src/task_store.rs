use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::due::{DueInput, TimeFormat};
use crate::error::{Result, TaskError};
use crate::task::{Task, TaskId};

/// Ordered, in-memory task list. Insertion order is display order.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn add(&mut self, description: String, due_at: NaiveDateTime) -> Task {
        let task = Task::new(description, due_at);
        debug!(id = %task.id, due_at = %task.due_at, "task added");
        self.tasks.push(task.clone());
        task
    }

    /// Parses `due` with the active entry format before adding. The store is
    /// untouched when parsing fails.
    pub fn add_from_input(
        &mut self,
        description: String,
        due: &DueInput,
        format: TimeFormat,
    ) -> Result<Task> {
        let due_at = format.parse(due)?;
        Ok(self.add(description, due_at))
    }

    pub fn remove(&mut self, id: TaskId) -> Result<Task> {
        let index = self.position(id).ok_or(TaskError::TaskNotFound(id))?;
        let task = self.tasks.remove(index);
        debug!(id = %id, "task removed");
        Ok(task)
    }

    pub fn mark_complete(&mut self, id: TaskId) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::TaskNotFound(id))?;
        if !task.completed {
            task.completed = true;
            debug!(id = %id, "task marked complete");
        }
        Ok(())
    }

    pub fn list(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

/// Store handle shared between the UI thread and the reminder monitor.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<TaskStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every mutation completes within a single statement, so a panic while
    /// holding the lock cannot leave a half-written task behind.
    pub fn lock(&self) -> MutexGuard<'_, TaskStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::due::Meridiem;
    use chrono::NaiveDate;

    fn due(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn descriptions(store: &TaskStore) -> Vec<String> {
        store.list().into_iter().map(|t| t.description).collect()
    }

    #[test]
    fn test_add_appends_pending_task() {
        let mut store = TaskStore::new();
        let task = store.add("Call mom".to_string(), due(1));
        assert_eq!(store.len(), 1);
        assert!(!task.completed);
        assert_eq!(store.get(task.id), Some(&task));
    }

    #[test]
    fn test_add_allows_duplicates() {
        let mut store = TaskStore::new();
        let a = store.add("Gym".to_string(), due(1));
        let b = store.add("Gym".to_string(), due(1));
        assert_eq!(store.len(), 2);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_from_input_valid() {
        let mut store = TaskStore::new();
        let input = DueInput::new("2024-05-01", "9:00", Meridiem::Am);
        let task = store
            .add_from_input("Standup".to_string(), &input, TimeFormat::TwelveHour)
            .unwrap();
        assert_eq!(task.due_at, due(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_from_input_invalid_leaves_store_unchanged() {
        let mut store = TaskStore::new();
        store.add("Existing".to_string(), due(1));

        let bad = [
            DueInput::new("2024-05-01", "25:00", Meridiem::Am),
            DueInput::new("05/01/2024", "09:00", Meridiem::Am),
            DueInput::new("", "", Meridiem::Pm),
        ];
        for input in &bad {
            for format in [TimeFormat::TwelveHour, TimeFormat::TwentyFourHour] {
                let result = store.add_from_input("New".to_string(), input, format);
                assert!(matches!(result, Err(TaskError::InvalidDueFormat(f)) if f == format));
            }
        }
        assert_eq!(descriptions(&store), vec!["Existing"]);
    }

    #[test]
    fn test_remove_preserves_order_of_rest() {
        let mut store = TaskStore::new();
        store.add("a".to_string(), due(1));
        let b = store.add("b".to_string(), due(2));
        store.add("c".to_string(), due(3));

        let removed = store.remove(b.id).unwrap();
        assert_eq!(removed.description, "b");
        assert_eq!(descriptions(&store), vec!["a", "c"]);
        assert!(store.get(b.id).is_none());
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut store = TaskStore::new();
        store.add("a".to_string(), due(1));
        let stranger = TaskId::new();
        assert!(matches!(
            store.remove(stranger),
            Err(TaskError::TaskNotFound(id)) if id == stranger
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_mark_complete_is_idempotent() {
        let mut store = TaskStore::new();
        let task = store.add("a".to_string(), due(1));
        store.add("b".to_string(), due(2));

        store.mark_complete(task.id).unwrap();
        let once = store.list();
        store.mark_complete(task.id).unwrap();
        assert_eq!(store.list(), once);
        assert!(once[0].completed);
        assert!(!once[1].completed);
    }

    #[test]
    fn test_mark_complete_unknown_id() {
        let mut store = TaskStore::new();
        assert!(store.mark_complete(TaskId::new()).is_err());
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let mut store = TaskStore::new();
        let task = store.add("a".to_string(), due(1));
        let snapshot = store.list();
        store.mark_complete(task.id).unwrap();
        assert!(!snapshot[0].completed);
    }

    #[test]
    fn test_shared_store_clones_share_state() {
        let store = SharedStore::new();
        let other = store.clone();
        store.lock().add("a".to_string(), due(1));
        assert_eq!(other.lock().len(), 1);
    }

    #[test]
    fn test_shared_store_survives_poisoning() {
        let store = SharedStore::new();
        store.lock().add("a".to_string(), due(1));

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(store.lock().len(), 1);
    }
}
