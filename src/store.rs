//! The task store: owns the ordered task sequence and its persistence.
//!
//! Insertion order is display order. Ids are `max(id) + 1` and are never handed
//! out twice, even after the highest task is deleted within one session.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::dates::{parse_due_date, Clock, SystemClock};
use crate::error::{Result, StorageError, TaskError};
use crate::fields::*;
use crate::storage::{write_json_atomic, TaskStorage};
use crate::task::{dedup_tags, trimmed_opt, NewTask, Task};

/// In-memory task sequence backed by an injected load/save capability.
#[derive(Debug)]
pub struct TaskStore<S, C = SystemClock> {
    pub(crate) tasks: Vec<Task>,
    pub(crate) storage: S,
    pub(crate) clock: C,
    /// Highest id ever issued by or loaded into this store.
    high_water: u64,
}

impl<S: TaskStorage> TaskStore<S, SystemClock> {
    /// Load the store using the wall clock.
    pub fn open(storage: S) -> Result<Self> {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: TaskStorage, C: Clock> TaskStore<S, C> {
    /// Load the store, reading "now" and "today" from `clock`.
    pub fn with_clock(storage: S, clock: C) -> Result<Self> {
        let tasks = storage.load()?;
        let high_water = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        debug!(count = tasks.len(), "task store loaded");
        Ok(TaskStore {
            tasks,
            storage,
            clock,
            high_water,
        })
    }

    /// All tasks in store order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The id the next `add` will assign.
    pub fn next_id(&self) -> u64 {
        let max_present = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        max_present.max(self.high_water) + 1
    }

    pub fn find_by_id(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub(crate) fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Resolve a due date expression against the store's clock.
    pub fn parse_due(&self, expr: &str) -> Result<NaiveDate> {
        parse_due_date(expr, self.today()).ok_or_else(|| TaskError::InvalidDueDate(expr.to_string()))
    }

    /// Write the full sequence through the storage capability.
    ///
    /// The in-memory state is kept even when this fails.
    pub(crate) fn persist(&self) -> Result<()> {
        self.storage.save(&self.tasks).map_err(|e| {
            warn!(error = %e, "failed to persist tasks");
            TaskError::from(e)
        })
    }

    /// Validate and append a new task, then persist.
    pub fn add(&mut self, new: NewTask) -> Result<Task> {
        let title = new.title.trim();
        if title.is_empty() {
            warn!("rejected task with empty title");
            return Err(TaskError::EmptyTitle);
        }
        let priority = match new.priority.as_deref() {
            None => Priority::default(),
            Some(raw) => raw.parse::<Priority>()?,
        };
        let due_date = match new.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(expr) => Some(self.parse_due(expr)?),
        };

        let now = self.now();
        let task = Task {
            id: self.next_id(),
            title: title.to_string(),
            description: new.description.as_deref().map(str::trim).unwrap_or_default().to_string(),
            priority,
            status: Status::Pending,
            tags: dedup_tags(new.tags.iter().map(String::as_str)),
            project: trimmed_opt(new.project.as_deref()),
            due_date,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.high_water = task.id;
        self.tasks.push(task.clone());
        info!(id = task.id, title = %task.title, "task added");
        self.persist()?;
        Ok(task)
    }

    /// Remove a task. Returns `false` when no task has that id.
    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let Some(idx) = self.position(id) else {
            debug!(id, "delete: task not found");
            return Ok(false);
        };
        let removed = self.tasks.remove(idx);
        info!(id, title = %removed.title, "task deleted");
        self.persist()?;
        Ok(true)
    }

    /// Write the current sequence to `path` as JSON. Does not change the store.
    pub fn export(&self, path: &Path) -> std::result::Result<usize, StorageError> {
        write_json_atomic(path, &self.tasks)?;
        info!(path = %path.display(), count = self.tasks.len(), "tasks exported");
        Ok(self.tasks.len())
    }
}
