//! Pure derivations over the task collection.
//!
//! Everything here is recomputed from `(tasks, filter, today)` on each
//! render. Nothing is cached: due-soon and overdue shift as `today` moves.

use chrono::NaiveDate;

use crate::models::{Category, Filter, Task};

/// Inclusive upper bound of the due-soon window, in calendar days.
pub const DUE_SOON_DAYS: i64 = 3;

/// Whole calendar days from `today` to the due date (negative when past).
pub fn days_until_due(task: &Task, today: NaiveDate) -> i64 {
    (task.due_date - today).num_days()
}

/// Not completed and due within `0..=DUE_SOON_DAYS` days.
pub fn is_due_soon(task: &Task, today: NaiveDate) -> bool {
    if task.completed {
        return false;
    }
    let days = days_until_due(task, today);
    (0..=DUE_SOON_DAYS).contains(&days)
}

/// Not completed and due strictly before today. A task due today is never
/// overdue, whatever the time of day.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.completed && task.due_date < today
}

pub fn matches(task: &Task, filter: Filter, today: NaiveDate) -> bool {
    match filter {
        Filter::All => true,
        Filter::School => task.category == Category::School,
        Filter::Personal => task.category == Category::Personal,
        Filter::Pending => !task.completed,
        Filter::Completed => task.completed,
        Filter::DueSoon => is_due_soon(task, today),
        Filter::Overdue => is_overdue(task, today),
    }
}

/// Tasks matching `filter`, in collection order.
pub fn filter_tasks(tasks: &[Task], filter: Filter, today: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| matches(t, filter, today)).collect()
}

/// Per-filter totals for the filter bar, always taken over the full
/// collection so they do not depend on the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub school: usize,
    pub personal: usize,
    pub pending: usize,
    pub completed: usize,
    pub due_soon: usize,
    pub overdue: usize,
}

impl TaskCounts {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let count = |filter| tasks.iter().filter(|t| matches(t, filter, today)).count();
        Self {
            all: tasks.len(),
            school: count(Filter::School),
            personal: count(Filter::Personal),
            pending: count(Filter::Pending),
            completed: count(Filter::Completed),
            due_soon: count(Filter::DueSoon),
            overdue: count(Filter::Overdue),
        }
    }

    pub fn get(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::School => self.school,
            Filter::Personal => self.personal,
            Filter::Pending => self.pending,
            Filter::Completed => self.completed,
            Filter::DueSoon => self.due_soon,
            Filter::Overdue => self.overdue,
        }
    }
}

/// The four stat cards above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub completed: usize,
    pub total: usize,
    pub due_soon: usize,
    pub overdue: usize,
    pub school: usize,
}

impl TaskStats {
    pub fn from_counts(counts: &TaskCounts) -> Self {
        Self {
            completed: counts.completed,
            total: counts.all,
            due_soon: counts.due_soon,
            overdue: counts.overdue,
            school: counts.school,
        }
    }
}

/// Status line shown on a task card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Completed,
    Overdue,
    DueSoon,
    DaysLeft(i64),
}

impl DueStatus {
    pub fn of(task: &Task, today: NaiveDate) -> Self {
        if task.completed {
            DueStatus::Completed
        } else if is_overdue(task, today) {
            DueStatus::Overdue
        } else if is_due_soon(task, today) {
            DueStatus::DueSoon
        } else {
            DueStatus::DaysLeft(days_until_due(task, today))
        }
    }

    pub fn label(&self) -> String {
        match self {
            DueStatus::Completed => "Completed".to_string(),
            DueStatus::Overdue => "Overdue".to_string(),
            DueStatus::DueSoon => "Due Soon".to_string(),
            DueStatus::DaysLeft(days) => format!("{} days left", days),
        }
    }
}
