//! Aggregate statistics derived from the current task sequence.

use std::collections::HashMap;

use serde::Serialize;

use crate::dates::Clock;
use crate::fields::*;
use crate::filter::{is_due_this_week, is_due_today, is_overdue};
use crate::storage::TaskStorage;
use crate::store::TaskStore;
use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DueCounts {
    /// Tasks carrying any due date.
    pub dated: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub due_this_week: usize,
}

/// Snapshot of the store. An empty store yields zero counts and no completion rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
    /// Percentage of completed tasks; `None` when there are no tasks.
    pub completion_rate: Option<f64>,
    /// `(project, tasks)` ranked by count, descending.
    pub projects: Vec<(String, usize)>,
    /// `(tag, tasks)` ranked by count, descending.
    pub tags: Vec<(String, usize)>,
    pub due: DueCounts,
}

impl Statistics {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// True when at least one task carries a due date.
    pub fn has_due_dates(&self) -> bool {
        self.due.dated > 0
    }
}

/// Count names case-insensitively, keeping the first spelling seen, and rank by
/// count descending with ties broken alphabetically.
fn rank<'a, I>(names: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();
    for name in names {
        counts
            .entry(name.to_lowercase())
            .or_insert_with(|| (name.to_string(), 0))
            .1 += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_values().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase())));
    ranked
}

pub fn project_counts(tasks: &[Task]) -> Vec<(String, usize)> {
    rank(tasks.iter().filter_map(|t| t.project.as_deref()))
}

pub fn tag_counts(tasks: &[Task]) -> Vec<(String, usize)> {
    rank(tasks.iter().flat_map(|t| t.tags.iter().map(String::as_str)))
}

impl<S: TaskStorage, C: Clock> TaskStore<S, C> {
    pub fn statistics(&self) -> Statistics {
        let today = self.today();
        let mut stats = Statistics {
            total: self.tasks.len(),
            ..Default::default()
        };
        for t in &self.tasks {
            match t.status {
                Status::Pending => stats.by_status.pending += 1,
                Status::InProgress => stats.by_status.in_progress += 1,
                Status::Completed => stats.by_status.completed += 1,
            }
            match t.priority {
                Priority::Low => stats.by_priority.low += 1,
                Priority::Medium => stats.by_priority.medium += 1,
                Priority::High => stats.by_priority.high += 1,
            }
            stats.due.dated += usize::from(t.due_date.is_some());
            stats.due.overdue += usize::from(is_overdue(t, today));
            stats.due.due_today += usize::from(is_due_today(t, today));
            stats.due.due_this_week += usize::from(is_due_this_week(t, today));
        }
        if stats.total > 0 {
            stats.completion_rate = Some(stats.by_status.completed as f64 / stats.total as f64 * 100.0);
        }
        stats.projects = project_counts(&self.tasks);
        stats.tags = tag_counts(&self.tasks);
        stats
    }

    /// Distinct projects with task counts, most used first.
    pub fn projects(&self) -> Vec<(String, usize)> {
        project_counts(&self.tasks)
    }

    /// Distinct tags with task counts, most used first.
    pub fn tags(&self) -> Vec<(String, usize)> {
        tag_counts(&self.tasks)
    }
}
