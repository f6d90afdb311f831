//! Field updates, tag operations and bulk status/delete.
//!
//! Every operation validates its whole input before touching any task, so a
//! rejected call leaves the store exactly as it was.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::dates::Clock;
use crate::error::{Result, TaskError};
use crate::fields::*;
use crate::storage::TaskStorage;
use crate::store::TaskStore;
use crate::task::{dedup_tags, trimmed_opt, Task, TaskPatch};

/// A patch with every value parsed and validated.
struct ValidPatch {
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    tags: Option<Vec<String>>,
    project: Option<Option<String>>,
    due_date: Option<Option<NaiveDate>>,
}

impl<S: TaskStorage, C: Clock> TaskStore<S, C> {
    fn validate_patch(&self, patch: TaskPatch) -> Result<ValidPatch> {
        let title = match patch.title {
            Some(t) if t.trim().is_empty() => return Err(TaskError::EmptyTitle),
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };
        let due_expr = patch.due_date.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let due_date = match (due_expr, patch.clear_due_date) {
            (Some(_), true) => return Err(TaskError::ConflictingDueDate),
            (Some(expr), false) => Some(Some(self.parse_due(expr)?)),
            (None, true) => Some(None),
            (None, false) => None,
        };
        Ok(ValidPatch {
            title,
            description: patch.description.map(|d| d.trim().to_string()),
            priority: parse_optional(patch.priority.as_deref())?,
            status: parse_optional(patch.status.as_deref())?,
            tags: patch.tags.map(|tags| dedup_tags(tags.iter().map(String::as_str))),
            project: patch.project.map(|p| trimmed_opt(Some(p.as_str()))),
            due_date,
        })
    }

    /// Apply `patch` to task `id`. Returns `Ok(None)` when the id is unknown.
    ///
    /// An empty patch still refreshes `updated_at`.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> Result<Option<Task>> {
        let valid = self.validate_patch(patch)?;
        let Some(idx) = self.position(id) else {
            debug!(id, "update: task not found");
            return Ok(None);
        };
        let now = self.now();
        let task = &mut self.tasks[idx];

        if let Some(title) = valid.title {
            task.title = title;
        }
        if let Some(description) = valid.description {
            task.description = description;
        }
        if let Some(priority) = valid.priority {
            task.priority = priority;
        }
        if let Some(status) = valid.status {
            task.transition_to(status, now);
        }
        if let Some(tags) = valid.tags {
            task.tags = tags;
        }
        if let Some(project) = valid.project {
            task.project = project;
        }
        if let Some(due_date) = valid.due_date {
            task.due_date = due_date;
        }
        task.updated_at = now;

        let updated = task.clone();
        info!(id, "task updated");
        self.persist()?;
        Ok(Some(updated))
    }

    /// Union `tags` into the task's tag set without introducing case-insensitive duplicates.
    pub fn add_tags(&mut self, id: u64, tags: &[String]) -> Result<Option<Task>> {
        self.retag(id, |task| task.merge_tags(tags.iter().map(String::as_str)))
    }

    /// Remove every tag equal (ignoring case) to one of `tags`.
    pub fn remove_tags(&mut self, id: u64, tags: &[String]) -> Result<Option<Task>> {
        self.retag(id, |task| task.strip_tags(tags.iter().map(String::as_str)))
    }

    fn retag<F>(&mut self, id: u64, op: F) -> Result<Option<Task>>
    where
        F: FnOnce(&mut Task) -> usize,
    {
        let Some(idx) = self.position(id) else {
            debug!(id, "retag: task not found");
            return Ok(None);
        };
        let now = self.now();
        let task = &mut self.tasks[idx];
        let changed = op(task);
        task.updated_at = now;
        let updated = task.clone();
        info!(id, changed, "task tags changed");
        self.persist()?;
        Ok(Some(updated))
    }

    /// Set `status` on every task whose id is in `ids`. Returns how many matched.
    ///
    /// An invalid status rejects the whole batch.
    pub fn bulk_update_status(&mut self, ids: &[u64], status: &str) -> Result<usize> {
        let status: Status = status.parse()?;
        let wanted: HashSet<u64> = ids.iter().copied().collect();
        let now = self.now();
        let mut count = 0;
        for task in self.tasks.iter_mut().filter(|t| wanted.contains(&t.id)) {
            task.transition_to(status, now);
            task.updated_at = now;
            count += 1;
        }
        if count > 0 {
            info!(count, %status, "bulk status update");
            self.persist()?;
        }
        Ok(count)
    }

    /// Delete every task whose id is in `ids`. Returns how many were removed.
    pub fn bulk_delete(&mut self, ids: &[u64]) -> Result<usize> {
        let wanted: HashSet<u64> = ids.iter().copied().collect();
        let before = self.tasks.len();
        self.tasks.retain(|t| !wanted.contains(&t.id));
        let count = before - self.tasks.len();
        if count > 0 {
            info!(count, "bulk delete");
            self.persist()?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::FixedClock;
    use crate::storage::MemoryStorage;
    use crate::store::tests::{day, store_on};
    use crate::task::NewTask;

    fn later(store: &mut TaskStore<&MemoryStorage, FixedClock>, hours: i64) {
        store.clock.now = store.clock.now + chrono::Duration::hours(hours);
    }

    fn patch() -> TaskPatch {
        TaskPatch::default()
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_patch_only_touches_updated_at() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        let before = store.add(NewTask::new("a").tags(["x"]).due("+1w")).unwrap();
        later(&mut store, 1);

        let after = store.update(before.id, patch()).unwrap().unwrap();
        assert!(after.updated_at > before.updated_at);
        assert_eq!(Task { updated_at: before.updated_at, ..after }, before);
    }

    #[test]
    fn update_applies_supplied_fields() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        store.add(NewTask::new("a").description("old").project("P").due("today")).unwrap();

        let t = store
            .update(
                1,
                TaskPatch {
                    title: Some(" renamed ".into()),
                    description: Some(String::new()),
                    priority: Some("high".into()),
                    tags: Some(strings(&["One", "one", "Two"])),
                    project: Some("  ".into()),
                    due_date: Some("+2w".into()),
                    ..patch()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(t.title, "renamed");
        assert_eq!(t.description, "");
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.tags, strings(&["One", "Two"]));
        assert_eq!(t.project, None);
        assert_eq!(t.due_date, Some(day("2025-06-24")));

        let cleared = store.update(1, TaskPatch { clear_due_date: true, ..patch() }).unwrap().unwrap();
        assert_eq!(cleared.due_date, None);
    }

    #[test]
    fn invalid_patch_applies_nothing() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        let original = store.add(NewTask::new("a")).unwrap();
        let saves = storage.save_count();

        let bad = [
            TaskPatch { title: Some("new".into()), status: Some("done".into()), ..patch() },
            TaskPatch { title: Some("new".into()), priority: Some("urgent".into()), ..patch() },
            TaskPatch { title: Some("new".into()), due_date: Some("someday".into()), ..patch() },
            TaskPatch { title: Some("  ".into()), ..patch() },
            TaskPatch { due_date: Some("today".into()), clear_due_date: true, ..patch() },
        ];
        for p in bad {
            assert!(store.update(1, p).unwrap_err().is_validation());
        }
        assert_eq!(store.find_by_id(1), Some(&original));
        assert_eq!(storage.save_count(), saves);
    }

    #[test]
    fn update_missing_id_is_none() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        assert_eq!(store.update(9, patch()).unwrap(), None);
        assert_eq!(store.add_tags(9, &strings(&["x"])).unwrap(), None);
        assert_eq!(store.remove_tags(9, &strings(&["x"])).unwrap(), None);
    }

    #[test]
    fn status_transitions_manage_completed_at() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        store.add(NewTask::new("a")).unwrap();
        let complete = || TaskPatch { status: Some("completed".into()), ..TaskPatch::default() };

        let done = store.update(1, complete()).unwrap().unwrap();
        let stamp = done.completed_at.unwrap();

        later(&mut store, 2);
        let again = store.update(1, complete()).unwrap().unwrap();
        assert_eq!(again.completed_at, Some(stamp));

        let reopened = store
            .update(1, TaskPatch { status: Some("in_progress".into()), ..patch() })
            .unwrap()
            .unwrap();
        assert_eq!(reopened.completed_at, None);
    }

    #[test]
    fn tag_add_then_remove() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        store.add(NewTask::new("a")).unwrap();

        let t = store.add_tags(1, &strings(&["Work", "work"])).unwrap().unwrap();
        assert_eq!(t.tags, strings(&["Work"]));
        let t = store.add_tags(1, &strings(&["WORK", "home"])).unwrap().unwrap();
        assert_eq!(t.tags, strings(&["Work", "home"]));
        let t = store.remove_tags(1, &strings(&["WORK", "HOME"])).unwrap().unwrap();
        assert!(t.tags.is_empty());
    }

    #[test]
    fn bulk_status_rejects_invalid_status() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        store.add(NewTask::new("a")).unwrap();
        store.add(NewTask::new("b")).unwrap();

        assert!(matches!(store.bulk_update_status(&[1, 2], "finished"), Err(TaskError::InvalidStatus(_))));
        assert!(store.tasks().iter().all(|t| t.status == Status::Pending));
    }

    #[test]
    fn bulk_status_then_bulk_delete() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        for title in ["a", "b", "c"] {
            store.add(NewTask::new(title)).unwrap();
        }

        assert_eq!(store.bulk_update_status(&[1, 3, 99], "completed").unwrap(), 2);
        assert!(store.find_by_id(1).unwrap().completed_at.is_some());
        assert_eq!(store.find_by_id(2).unwrap().status, Status::Pending);

        let completed: Vec<u64> = store
            .tasks()
            .iter()
            .filter(|t| t.is_completed())
            .map(|t| t.id)
            .collect();
        assert_eq!(store.bulk_delete(&completed).unwrap(), 2);
        assert_eq!(store.tasks().iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn bulk_with_no_matches_is_zero_and_not_persisted() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        store.add(NewTask::new("a")).unwrap();
        let saves = storage.save_count();
        assert_eq!(store.bulk_delete(&[5, 6]).unwrap(), 0);
        assert_eq!(store.bulk_update_status(&[], "pending").unwrap(), 0);
        assert_eq!(storage.save_count(), saves);
    }
}
