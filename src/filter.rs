//! Listing filters and full-text search.
//!
//! All predicates are AND-composed and applied over the whole sequence in store
//! order. Nothing in here mutates or persists.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::dates::Clock;
use crate::error::{Result, TaskError};
use crate::fields::*;
use crate::storage::TaskStorage;
use crate::store::TaskStore;
use crate::task::Task;

/// Listing criteria. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct ListCriteria {
    /// Exact status; unknown values are a validation error.
    pub status: Option<String>,
    /// Exact priority; unknown values are a validation error.
    pub priority: Option<String>,
    /// Case-insensitive tag membership.
    pub tag: Option<String>,
    /// Case-insensitive substring of the project name.
    pub project: Option<String>,
    pub overdue_only: bool,
    pub due_today: bool,
    pub due_this_week: bool,
}

/// Due before today and not completed.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    matches!(task.due_date, Some(d) if d < today) && !task.is_completed()
}

pub fn is_due_today(task: &Task, today: NaiveDate) -> bool {
    task.due_date == Some(today)
}

/// Due between today and today + 7 days, inclusive.
pub fn is_due_this_week(task: &Task, today: NaiveDate) -> bool {
    let week_end = today.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
    matches!(task.due_date, Some(d) if today <= d && d <= week_end)
}

/// Validated form of [`ListCriteria`].
struct Predicates {
    status: Option<Status>,
    priority: Option<Priority>,
    tag: Option<String>,
    project: Option<String>,
    overdue_only: bool,
    due_today: bool,
    due_this_week: bool,
    today: NaiveDate,
}

impl Predicates {
    fn compile(criteria: &ListCriteria, today: NaiveDate) -> Result<Self> {
        let lowered = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
        };
        Ok(Predicates {
            status: parse_optional(criteria.status.as_deref())?,
            priority: parse_optional(criteria.priority.as_deref())?,
            tag: lowered(&criteria.tag),
            project: lowered(&criteria.project),
            overdue_only: criteria.overdue_only,
            due_today: criteria.due_today,
            due_this_week: criteria.due_this_week,
            today,
        })
    }

    fn matches(&self, t: &Task) -> bool {
        if let Some(s) = self.status {
            if t.status != s {
                return false;
            }
        }
        if let Some(p) = self.priority {
            if t.priority != p {
                return false;
            }
        }
        if let Some(ref tag) = self.tag {
            if !t.has_tag(tag) {
                return false;
            }
        }
        if let Some(ref project) = self.project {
            match t.project {
                Some(ref p) if p.to_lowercase().contains(project.as_str()) => {}
                _ => return false,
            }
        }
        if self.overdue_only && !is_overdue(t, self.today) {
            return false;
        }
        if self.due_today && !is_due_today(t, self.today) {
            return false;
        }
        if self.due_this_week && !is_due_this_week(t, self.today) {
            return false;
        }
        true
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn search_matches(t: &Task, needle: &str, field: SearchField) -> bool {
    let title = || contains_ci(&t.title, needle);
    let description = || contains_ci(&t.description, needle);
    let tags = || t.tags.iter().any(|tag| contains_ci(tag, needle));
    let project = || t.project.as_deref().is_some_and(|p| contains_ci(p, needle));
    match field {
        SearchField::All => title() || description() || tags() || project(),
        SearchField::Title => title(),
        SearchField::Description => description(),
        SearchField::Tags => tags(),
        SearchField::Project => project(),
    }
}

impl<S: TaskStorage, C: Clock> TaskStore<S, C> {
    /// Tasks matching every supplied criterion, in store order.
    pub fn list(&self, criteria: &ListCriteria) -> Result<Vec<&Task>> {
        let predicates = Predicates::compile(criteria, self.today())?;
        let out: Vec<&Task> = self.tasks.iter().filter(|t| predicates.matches(t)).collect();
        debug!(matched = out.len(), total = self.tasks.len(), "list");
        Ok(out)
    }

    /// Case-insensitive substring search over the chosen field(s).
    pub fn search(&self, query: &str, field: SearchField) -> Result<Vec<&Task>> {
        if query.trim().is_empty() {
            return Err(TaskError::EmptyQuery);
        }
        let needle = query.to_lowercase();
        let out: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| search_matches(t, &needle, field))
            .collect();
        debug!(query, ?field, matched = out.len(), "search");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::tests::{day, store_on};
    use crate::task::{NewTask, TaskPatch};

    fn ids(tasks: &[&Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    fn seeded(storage: &MemoryStorage) -> TaskStore<&MemoryStorage, crate::dates::FixedClock> {
        let mut store = store_on(storage, "2025-06-10");
        store
            .add(NewTask::new("Buy groceries").description("milk, eggs").tags(["Home"]).due("2025-06-09"))
            .unwrap();
        store
            .add(NewTask::new("Ship release").priority("high").project("Backend API").tags(["Work", "urgent"]).due("today"))
            .unwrap();
        store
            .add(NewTask::new("Plan offsite").priority("low").project("Team").due("+7d"))
            .unwrap();
        store.add(NewTask::new("Read book").description("novel")).unwrap();
        store
    }

    #[test]
    fn no_criteria_returns_everything_in_order() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);
        assert_eq!(ids(&store.list(&ListCriteria::default()).unwrap()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn overdue_excludes_completed() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        store.add(NewTask::new("one").due("2025-06-09")).unwrap();
        store.add(NewTask::new("two").due("2025-06-09")).unwrap();
        store
            .update(2, TaskPatch { status: Some("completed".into()), ..Default::default() })
            .unwrap();

        let criteria = ListCriteria { overdue_only: true, ..Default::default() };
        assert_eq!(ids(&store.list(&criteria).unwrap()), vec![1]);
    }

    #[test]
    fn due_windows() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);
        let today = ListCriteria { due_today: true, ..Default::default() };
        let week = ListCriteria { due_this_week: true, ..Default::default() };
        assert_eq!(ids(&store.list(&today).unwrap()), vec![2]);
        assert_eq!(ids(&store.list(&week).unwrap()), vec![2, 3]);
    }

    #[test]
    fn criteria_compose_conjunctively() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);
        let criteria = ListCriteria {
            priority: Some("HIGH".into()),
            tag: Some("work".into()),
            project: Some("api".into()),
            ..Default::default()
        };
        assert_eq!(ids(&store.list(&criteria).unwrap()), vec![2]);

        let none = ListCriteria {
            priority: Some("low".into()),
            tag: Some("work".into()),
            ..Default::default()
        };
        assert!(store.list(&none).unwrap().is_empty());
    }

    #[test]
    fn project_filter_skips_tasks_without_project() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);
        let criteria = ListCriteria { project: Some("e".into()), ..Default::default() };
        assert_eq!(ids(&store.list(&criteria).unwrap()), vec![2, 3]);
    }

    #[test]
    fn invalid_enum_filter_is_rejected() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);
        let criteria = ListCriteria { status: Some("done".into()), ..Default::default() };
        assert!(matches!(store.list(&criteria), Err(TaskError::InvalidStatus(_))));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);
        assert_eq!(ids(&store.search("GROCERIES", SearchField::All).unwrap()), vec![1]);
        assert_eq!(ids(&store.search("urgent", SearchField::All).unwrap()), vec![2]);
        assert_eq!(ids(&store.search("team", SearchField::All).unwrap()), vec![3]);
        assert_eq!(ids(&store.search("novel", SearchField::Description).unwrap()), vec![4]);
    }

    #[test]
    fn search_restricted_to_one_field() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);
        assert!(store.search("milk", SearchField::Title).unwrap().is_empty());
        assert_eq!(ids(&store.search("HOM", SearchField::Tags).unwrap()), vec![1]);
        assert_eq!(ids(&store.search("backend", SearchField::Project).unwrap()), vec![2]);
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_query() {
        let storage = MemoryStorage::new();
        let mut store = store_on(&storage, "2025-06-10");
        store.add(NewTask::new("buyer meeting")).unwrap();
        store.add(NewTask::new("Buy milk")).unwrap();
        assert_eq!(ids(&store.search("buy ", SearchField::Title).unwrap()), vec![2]);
        assert_eq!(ids(&store.search("buy", SearchField::Title).unwrap()), vec![1, 2]);
    }

    #[test]
    fn blank_query_is_rejected() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);
        assert!(matches!(store.search("   ", SearchField::All), Err(TaskError::EmptyQuery)));
    }

    #[test]
    fn week_window_is_inclusive() {
        let today = day("2025-06-10");
        let mut t = seeded(&MemoryStorage::new()).tasks()[0].clone();
        t.due_date = Some(day("2025-06-17"));
        assert!(is_due_this_week(&t, today));
        t.due_date = Some(day("2025-06-18"));
        assert!(!is_due_this_week(&t, today));
    }
}
