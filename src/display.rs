//! Console rendering of tasks and statistics.

use chrono::NaiveDate;

use taskmgr::stats::Statistics;
use taskmgr::{Priority, Status, Task};

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = (d - today).num_days();
            if delta == 0 {
                "today".into()
            } else if delta == 1 {
                "tomorrow".into()
            } else if delta > 1 {
                format!("in {delta}d")
            } else {
                format!("{}d late", -delta)
            }
        }
    }
}

pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Pending => "Pending",
        Status::InProgress => "In Progress",
        Status::Completed => "Completed",
    }
}

pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Print tasks as a table, one row per task.
pub fn print_table(tasks: &[&Task], today: NaiveDate) {
    println!(
        "{:<5} {:<12} {:<7} {:<10} {:<14} {}",
        "ID", "Status", "Pri", "Due", "Project", "Title [tags]"
    );
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        let project = t.project.as_deref().unwrap_or("-");
        println!(
            "{:<5} {:<12} {:<7} {:<10} {:<14} {}{}",
            t.id,
            format_status(t.status),
            format_priority(t.priority),
            format_due_relative(t.due_date, today),
            truncate(project, 14),
            t.title,
            tags
        );
    }
    println!("\n{} task(s)", tasks.len());
}

/// Print every field of a single task.
pub fn print_task(t: &Task, today: NaiveDate) {
    println!("ID:          {}", t.id);
    println!("Title:       {}", t.title);
    if !t.description.is_empty() {
        println!("Description: {}", t.description);
    }
    println!("Status:      {}", format_status(t.status));
    println!("Priority:    {}", format_priority(t.priority));
    if !t.tags.is_empty() {
        println!("Tags:        {}", t.tags.join(", "));
    }
    if let Some(ref p) = t.project {
        println!("Project:     {p}");
    }
    if let Some(d) = t.due_date {
        println!("Due:         {d} ({})", format_due_relative(Some(d), today));
    }
    println!("Created:     {}", t.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Updated:     {}", t.updated_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(c) = t.completed_at {
        println!("Completed:   {}", c.format("%Y-%m-%d %H:%M:%S"));
    }
}

/// Print a `(name, count)` breakdown under a heading.
pub fn print_counts(heading: &str, rows: &[(String, usize)], limit: Option<usize>) {
    println!("{:<16} Count", heading);
    for (name, count) in rows.iter().take(limit.unwrap_or(usize::MAX)) {
        println!("{:<16} {}", truncate(name, 16), count);
    }
}

pub fn print_statistics(stats: &Statistics) {
    if stats.is_empty() {
        println!("No tasks found.");
        return;
    }
    println!("Total:        {}", stats.total);
    println!("Pending:      {}", stats.by_status.pending);
    println!("In Progress:  {}", stats.by_status.in_progress);
    println!("Completed:    {}", stats.by_status.completed);
    println!();
    println!("High:         {}", stats.by_priority.high);
    println!("Medium:       {}", stats.by_priority.medium);
    println!("Low:          {}", stats.by_priority.low);
    if let Some(rate) = stats.completion_rate {
        println!("\nCompletion:   {rate:.1}%");
    }
    if !stats.projects.is_empty() {
        println!();
        print_counts("Project", &stats.projects, Some(10));
    }
    if !stats.tags.is_empty() {
        println!();
        print_counts("Tag", &stats.tags, Some(10));
    }
    if stats.has_due_dates() {
        println!();
        println!("Overdue:      {}", stats.due.overdue);
        println!("Due today:    {}", stats.due.due_today);
        println!("Due 7 days:   {}", stats.due.due_this_week);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_due_labels() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let at = |d| NaiveDate::from_ymd_opt(2025, 6, d);
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(at(10), today), "today");
        assert_eq!(format_due_relative(at(11), today), "tomorrow");
        assert_eq!(format_due_relative(at(14), today), "in 4d");
        assert_eq!(format_due_relative(at(8), today), "2d late");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 14), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
    }
}
