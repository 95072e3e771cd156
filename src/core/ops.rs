//! Collection mutations.
//!
//! Each operation takes the current collection and returns the next one.
//! A rejected operation returns an error and the caller keeps its old
//! collection untouched.

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::MutationError;
use crate::models::{Task, TaskDraft, TaskId};

/// Validate `draft` and prepend a new task with `id` and `created_at = now`.
///
/// `now` is truncated to milliseconds so the stored timestamp reads back
/// identical.
pub fn create(
    tasks: &[Task],
    draft: &TaskDraft,
    id: TaskId,
    now: DateTime<Utc>,
) -> Result<Vec<Task>, MutationError> {
    let valid = draft.validate()?;
    if tasks.iter().any(|t| t.id == id) {
        return Err(MutationError::DuplicateId(id));
    }

    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.push(Task::from_draft(id, &valid, now.trunc_subsecs(3)));
    next.extend_from_slice(tasks);
    Ok(next)
}

/// Replace the mutable fields of task `id` in place.
pub fn update(tasks: &[Task], id: &str, draft: &TaskDraft) -> Result<Vec<Task>, MutationError> {
    let valid = draft.validate()?;
    let pos = position(tasks, id)?;

    let mut next = tasks.to_vec();
    next[pos].apply(&valid);
    Ok(next)
}

pub fn delete(tasks: &[Task], id: &str) -> Result<Vec<Task>, MutationError> {
    let pos = position(tasks, id)?;
    let mut next = tasks.to_vec();
    next.remove(pos);
    Ok(next)
}

/// Flip `completed` on task `id`; nothing else changes.
pub fn toggle_complete(tasks: &[Task], id: &str) -> Result<Vec<Task>, MutationError> {
    let pos = position(tasks, id)?;
    let mut next = tasks.to_vec();
    next[pos].completed = !next[pos].completed;
    Ok(next)
}

/// Drop every completed task. Returns the next collection and how many
/// tasks were removed.
pub fn clear_completed(tasks: &[Task]) -> (Vec<Task>, usize) {
    let next: Vec<Task> = tasks.iter().filter(|t| !t.completed).cloned().collect();
    let removed = tasks.len() - next.len();
    (next, removed)
}

/// Tasks whose `completed` went from false to true between two snapshots.
pub fn newly_completed(before: &[Task], after: &[Task]) -> usize {
    after
        .iter()
        .filter(|t| t.completed)
        .filter(|t| before.iter().any(|b| b.id == t.id && !b.completed))
        .count()
}

fn position(tasks: &[Task], id: &str) -> Result<usize, MutationError> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| MutationError::NotFound(id.to_string()))
}
