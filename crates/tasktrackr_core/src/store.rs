use crate::error::AppError;
use crate::model::{self, Priority, Task, TaskDraft, TaskPatch};
use crate::storage::json_store::{self, StoreSnapshot};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::OffsetDateTime;

/// Authoritative in-memory task collection, in insertion order, behind a
/// single lock shared by the interactive loop and the reminder scheduler.
/// Every mutation persists the full collection before returning; a failed
/// save surfaces a persistence error but the in-memory state stays
/// authoritative for the running process.
pub struct TaskStore {
    inner: Mutex<StoreState>,
}

struct StoreState {
    path: PathBuf,
    tasks: Vec<Task>,
    last_issued_nanos: i128,
}

impl TaskStore {
    /// Missing persisted state starts an empty store; malformed state is
    /// logged and also starts empty rather than aborting startup.
    pub fn open(path: PathBuf) -> Self {
        let snapshot = match json_store::load_state(&path) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "could not load persisted tasks, starting empty"
                );
                StoreSnapshot::default()
            }
        };

        // Files written before the high-water mark existed carry 0; the
        // live ids still bound it from below.
        let mut last_issued_nanos = snapshot.last_issued_nanos;
        for task in &snapshot.tasks {
            if let Some(nanos) = task
                .id
                .strip_prefix("task-")
                .and_then(|raw| raw.parse::<i128>().ok())
            {
                last_issued_nanos = last_issued_nanos.max(nanos);
            }
        }

        Self {
            inner: Mutex::new(StoreState {
                path,
                tasks: snapshot.tasks,
                last_issued_nanos,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, draft: TaskDraft) -> Result<Task, AppError> {
        let now = OffsetDateTime::now_utc();
        let title = model::validate_title(&draft.title)?;
        let priority = match draft.priority.as_deref() {
            Some(raw) => Priority::parse(raw)?,
            None => Priority::default(),
        };
        let due_at = draft
            .due_at
            .as_deref()
            .map(model::parse_datetime)
            .transpose()?;
        let reminder_at = draft
            .reminder_at
            .as_deref()
            .map(model::parse_datetime)
            .transpose()?;
        if let Some(reminder_at) = reminder_at.as_deref() {
            model::ensure_not_past(reminder_at, now)?;
        }
        let created_at = model::now_rfc3339()?;

        let mut state = self.lock();
        let id = state.fresh_id(now);
        let task = Task {
            id,
            title,
            description: draft.description.trim().to_string(),
            due_at,
            priority,
            reminder_at,
            completed: false,
            reminder_fired: false,
            created_at,
        };
        state.tasks.push(task.clone());
        state.save()?;

        Ok(task)
    }

    /// Snapshot in insertion order; never triggers persistence.
    pub fn list(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    pub fn pending(&self) -> Vec<Task> {
        self.lock()
            .tasks
            .iter()
            .filter(|task| !task.completed)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<Task, AppError> {
        let trimmed = id.trim();
        self.lock()
            .tasks
            .iter()
            .find(|task| task.id == trimmed)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("no task with id {trimmed}")))
    }

    /// Changed fields are re-validated with the same rules as creation.
    /// Setting a new reminder resets `reminder_fired` so it fires again.
    pub fn update(&self, id: &str, patch: TaskPatch) -> Result<Task, AppError> {
        let now = OffsetDateTime::now_utc();
        let title = patch
            .title
            .as_deref()
            .map(model::validate_title)
            .transpose()?;
        let priority = patch
            .priority
            .as_deref()
            .map(Priority::parse)
            .transpose()?;
        let due_at = patch
            .due_at
            .as_deref()
            .map(model::parse_datetime)
            .transpose()?;
        let reminder_at = patch
            .reminder_at
            .as_deref()
            .map(model::parse_datetime)
            .transpose()?;
        if let Some(reminder_at) = reminder_at.as_deref() {
            model::ensure_not_past(reminder_at, now)?;
        }

        let mut state = self.lock();
        let task = state.find_mut(id)?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description.trim().to_string();
        }
        if let Some(due_at) = due_at {
            task.due_at = Some(due_at);
        }
        if let Some(priority) = priority {
            task.priority = priority;
        }
        if let Some(reminder_at) = reminder_at {
            task.reminder_at = Some(reminder_at);
            task.reminder_fired = false;
        }
        let updated = task.clone();
        state.save()?;

        Ok(updated)
    }

    pub fn toggle_complete(&self, id: &str) -> Result<Task, AppError> {
        let mut state = self.lock();
        let task = state.find_mut(id)?;
        task.completed = !task.completed;
        let updated = task.clone();
        state.save()?;

        Ok(updated)
    }

    /// Deleted ids are never reused; fresh ids stay above the persisted
    /// high-water mark.
    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        let trimmed = id.trim();
        let mut state = self.lock();
        let index = state
            .tasks
            .iter()
            .position(|task| task.id == trimmed)
            .ok_or_else(|| AppError::not_found(format!("no task with id {trimmed}")))?;

        state.tasks.remove(index);
        state.save()?;

        Ok(())
    }

    /// Scheduler flag update; goes through the same lock and save path as
    /// every other mutation. Idempotent.
    pub fn mark_reminder_fired(&self, id: &str) -> Result<Task, AppError> {
        let mut state = self.lock();
        let task = state.find_mut(id)?;
        if task.reminder_fired {
            return Ok(task.clone());
        }
        task.reminder_fired = true;
        let updated = task.clone();
        state.save()?;

        Ok(updated)
    }
}

impl StoreState {
    /// Ids advance monotonically past everything ever issued, so a deleted
    /// id is never reissued even if the wall clock moves backwards.
    fn fresh_id(&mut self, now: OffsetDateTime) -> String {
        let nanos = now
            .unix_timestamp_nanos()
            .max(self.last_issued_nanos + 1);
        self.last_issued_nanos = nanos;
        format!("task-{nanos}")
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task, AppError> {
        let trimmed = id.trim();
        self.tasks
            .iter_mut()
            .find(|task| task.id == trimmed)
            .ok_or_else(|| AppError::not_found(format!("no task with id {trimmed}")))
    }

    fn save(&self) -> Result<(), AppError> {
        json_store::save_state(
            &self.path,
            &StoreSnapshot {
                tasks: self.tasks.clone(),
                last_issued_nanos: self.last_issued_nanos,
            },
        )
    }
}
