//! Task data structure and the input records used to create and change tasks.
//!
//! `Task` is what gets stored. `NewTask` and `TaskPatch` carry raw caller input
//! (enum values and due dates as text) so the store can validate everything in one
//! place before touching any state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A single trackable work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    /// Case preserved; no two entries are equal ignoring case.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Apply a status change, keeping `completed_at` in step with it.
    ///
    /// Re-submitting `completed` on a task that already carries a completion
    /// timestamp keeps the original timestamp.
    pub(crate) fn transition_to(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        if status == Status::Completed {
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        } else {
            self.completed_at = None;
        }
    }

    /// Union `incoming` into the tag set, skipping blanks and case-insensitive duplicates.
    /// Returns how many tags were actually inserted.
    pub(crate) fn merge_tags<'a, I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut added = 0;
        for raw in incoming {
            let tag = raw.trim();
            if tag.is_empty() || self.has_tag(tag) {
                continue;
            }
            self.tags.push(tag.to_string());
            added += 1;
        }
        added
    }

    /// Drop every tag matching (case-insensitively) any of `names`.
    pub(crate) fn strip_tags<'a, I>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let doomed: Vec<String> = names
            .into_iter()
            .map(|n| n.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        let before = self.tags.len();
        self.tags.retain(|t| !doomed.contains(&t.to_lowercase()));
        before - self.tags.len()
    }
}

/// Trim tags, drop blanks and fold case-insensitive duplicates (first spelling wins).
pub fn dedup_tags<'a, I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for raw in tags {
        let tag = raw.trim();
        if tag.is_empty() {
            continue;
        }
        let lower = tag.to_lowercase();
        if !out.iter().any(|t| t.to_lowercase() == lower) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Trim an optional text field, mapping blank input to `None`.
pub(crate) fn trimmed_opt(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Caller input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    /// `low | medium | high`, defaults to `medium`.
    pub priority: Option<String>,
    pub tags: Vec<String>,
    pub project: Option<String>,
    /// Any expression accepted by [`crate::dates::parse_due_date`].
    pub due_date: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn due(mut self, due: impl Into<String>) -> Self {
        self.due_date = Some(due.into());
        self
    }
}

/// A partial update. `None` means "leave unchanged".
///
/// `description: Some("")` empties the description and `project: Some("")` clears
/// the project. `tags: Some(..)` replaces the whole tag set.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub project: Option<String>,
    pub due_date: Option<String>,
    pub clear_due_date: bool,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.tags.is_none()
            && self.project.is_none()
            && self.due_date.is_none()
            && !self.clear_due_date
    }
}
