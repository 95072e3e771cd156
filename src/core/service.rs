//! Task mutation service.
//!
//! # Responsibility
//! - Own the canonical task collection for the session.
//! - Apply `ops` mutations, persist one snapshot per successful mutation,
//!   and describe the outcome as a user-facing notice.
//!
//! # Invariants
//! - A rejected mutation changes nothing and writes nothing.
//! - A failed write never rolls back the in-memory collection; it is
//!   reported as a warning and the session continues.

use chrono::{NaiveDate, Utc};
use log::{info, warn};

use crate::core::awards::{self, AwardCounting};
use crate::core::clock::Clock;
use crate::core::derive::{self, TaskCounts};
use crate::core::id::IdGenerator;
use crate::core::ops;
use crate::error::{MutationError, StorageError};
use crate::models::{Filter, Task, TaskDraft, TaskId};
use crate::store::kv::KeyValueStore;
use crate::store::tasks::TaskStorage;

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// User-facing outcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level,
        }
    }

    /// Notice for a rejected mutation.
    pub fn from_error(err: &MutationError) -> Self {
        let title = match err {
            MutationError::Validation(_) => "Missing information",
            MutationError::NotFound(_) | MutationError::DuplicateId(_) => "Task unavailable",
        };
        Self::new(NoticeLevel::Error, title, err.to_string())
    }

    fn save_failed(err: &StorageError) -> Self {
        Self::new(
            NoticeLevel::Warning,
            "Changes not saved",
            format!("Could not write to storage ({}). Changes are kept for this session.", err),
        )
    }
}

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub notice: Notice,
    /// Set when the snapshot could not be persisted.
    pub save_warning: Option<Notice>,
    /// Task the mutation touched, when there is exactly one.
    pub task_id: Option<TaskId>,
}

pub struct TaskService<S: KeyValueStore, C: Clock, G: IdGenerator> {
    tasks: Vec<Task>,
    storage: TaskStorage<S>,
    clock: C,
    ids: G,
    counting: AwardCounting,
    lifetime_completed: u64,
}

impl<S: KeyValueStore, C: Clock, G: IdGenerator> TaskService<S, C, G> {
    /// Load the stored collection and start a session over it.
    pub fn open(mut storage: TaskStorage<S>, clock: C, ids: G, counting: AwardCounting) -> Self {
        let tasks = storage.load();
        let lifetime_completed = match storage.load_lifetime_completed() {
            Some(count) => count,
            // First run with the counter: start from what is already done.
            None => awards::live_completed(&tasks),
        };

        Self {
            tasks,
            storage,
            clock,
            ids,
            counting,
            lifetime_completed,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn filtered(&self, filter: Filter) -> Vec<&Task> {
        derive::filter_tasks(&self.tasks, filter, self.today())
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::compute(&self.tasks, self.today())
    }

    pub fn award_counting(&self) -> AwardCounting {
        self.counting
    }

    /// Counter that drives the awards overlay.
    pub fn completed_counter(&self) -> u64 {
        match self.counting {
            AwardCounting::Live => awards::live_completed(&self.tasks),
            AwardCounting::Lifetime => self.lifetime_completed,
        }
    }

    pub fn storage(&self) -> &TaskStorage<S> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut TaskStorage<S> {
        &mut self.storage
    }

    pub fn create(&mut self, draft: &TaskDraft) -> Result<Receipt, MutationError> {
        let now = self.clock.now().with_timezone(&Utc);
        let mut id = self.ids.next_id(now);
        while self.get(&id).is_some() {
            id = self.ids.next_id(now);
        }

        let next = ops::create(&self.tasks, draft, id.clone(), now)?;
        info!("event=task_create id={}", id);
        Ok(self.commit(
            next,
            Notice::new(
                NoticeLevel::Success,
                "Task Created! 🎉",
                "Your new task has been added to your list.",
            ),
            Some(id),
        ))
    }

    pub fn update(&mut self, id: &str, draft: &TaskDraft) -> Result<Receipt, MutationError> {
        let next = ops::update(&self.tasks, id, draft)?;
        info!("event=task_update id={}", id);
        Ok(self.commit(
            next,
            Notice::new(
                NoticeLevel::Success,
                "Task Updated! ✨",
                "Your task has been successfully updated.",
            ),
            Some(id.to_string()),
        ))
    }

    pub fn delete(&mut self, id: &str) -> Result<Receipt, MutationError> {
        let next = ops::delete(&self.tasks, id)?;
        info!("event=task_delete id={}", id);
        Ok(self.commit(
            next,
            Notice::new(
                NoticeLevel::Error,
                "Task Deleted",
                "Task has been removed from your list.",
            ),
            Some(id.to_string()),
        ))
    }

    pub fn toggle_complete(&mut self, id: &str) -> Result<Receipt, MutationError> {
        let was_completed = self
            .get(id)
            .map(|t| t.completed)
            .ok_or_else(|| MutationError::NotFound(id.to_string()))?;
        let next = ops::toggle_complete(&self.tasks, id)?;
        info!("event=task_toggle id={} completed={}", id, !was_completed);

        let notice = if was_completed {
            Notice::new(
                NoticeLevel::Info,
                "Task Reopened",
                "Task has been marked as incomplete.",
            )
        } else {
            Notice::new(
                NoticeLevel::Success,
                "Task Completed! 🎉",
                "Great job on completing your task!",
            )
        };
        Ok(self.commit(next, notice, Some(id.to_string())))
    }

    /// Remove every completed task. With nothing to remove this is a no-op
    /// that does not touch storage.
    pub fn clear_completed(&mut self) -> Receipt {
        let (next, removed) = ops::clear_completed(&self.tasks);
        if removed == 0 {
            return Receipt {
                notice: Notice::new(
                    NoticeLevel::Info,
                    "Nothing to clear",
                    "There are no completed tasks.",
                ),
                save_warning: None,
                task_id: None,
            };
        }

        info!("event=tasks_clear_completed removed={}", removed);
        let description = if removed == 1 {
            "1 completed task removed.".to_string()
        } else {
            format!("{} completed tasks removed.", removed)
        };
        self.commit(
            next,
            Notice::new(NoticeLevel::Success, "Completed tasks cleared", description),
            None,
        )
    }

    /// Swap in the next collection and persist it.
    fn commit(&mut self, next: Vec<Task>, notice: Notice, task_id: Option<TaskId>) -> Receipt {
        let newly_completed = ops::newly_completed(&self.tasks, &next) as u64;
        self.tasks = next;

        let mut save_warning = None;
        if let Err(e) = self.storage.save(&self.tasks) {
            warn!("event=tasks_save status=failed error={}", e);
            save_warning = Some(Notice::save_failed(&e));
        }

        if newly_completed > 0 {
            self.lifetime_completed += newly_completed;
            if let Err(e) = self.storage.save_lifetime_completed(self.lifetime_completed) {
                warn!("event=lifetime_save status=failed error={}", e);
                save_warning.get_or_insert_with(|| Notice::save_failed(&e));
            }
        }

        Receipt {
            notice,
            save_warning,
            task_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::id::{SequentialIdGenerator, TimestampIdGenerator};
    use crate::error::ValidationError;
    use crate::models::{Category, Priority};
    use crate::store::kv::MemoryStore;
    use crate::store::tasks::TASKS_KEY;

    type TestService = TaskService<MemoryStore, FixedClock, SequentialIdGenerator>;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
    }

    fn days(n: i64) -> NaiveDate {
        today() + chrono::Duration::days(n)
    }

    fn service_with(store: MemoryStore, counting: AwardCounting) -> TestService {
        TaskService::open(
            TaskStorage::new(store),
            FixedClock::at(today(), 14),
            SequentialIdGenerator::default(),
            counting,
        )
    }

    fn service() -> TestService {
        service_with(MemoryStore::default(), AwardCounting::Live)
    }

    fn writes(svc: &mut TestService) -> usize {
        svc.storage_mut().store().writes
    }

    #[test]
    fn test_create_persists_and_notifies() {
        let mut svc = service();
        let receipt = svc.create(&TaskDraft::new("Essay", days(2))).unwrap();

        assert_eq!(receipt.notice.title, "Task Created! 🎉");
        assert_eq!(receipt.notice.level, NoticeLevel::Success);
        assert_eq!(receipt.task_id.as_deref(), Some("task-1"));
        assert!(receipt.save_warning.is_none());
        assert_eq!(svc.tasks().len(), 1);
        assert_eq!(writes(&mut svc), 1);

        let stored = svc.storage_mut().try_load().unwrap();
        assert_eq!(stored, svc.tasks());
    }

    #[test]
    fn test_essay_scenario_counts() {
        let mut svc = service();
        svc.create(&TaskDraft::new("Old chores", days(-3)).with_category(Category::Personal))
            .unwrap();
        let before = svc.counts();

        let draft = TaskDraft::new("Essay", days(2))
            .with_category(Category::School)
            .with_priority(Priority::High);
        svc.create(&draft).unwrap();
        let after = svc.counts();

        assert_eq!(after.due_soon, before.due_soon + 1);
        assert_eq!(after.overdue, before.overdue);
        assert_eq!(after.school, before.school + 1);
    }

    #[test]
    fn test_rejected_create_changes_nothing() {
        let mut svc = service();
        svc.create(&TaskDraft::new("Read", days(1))).unwrap();
        let snapshot = svc.tasks().to_vec();
        let writes_before = writes(&mut svc);

        let err = svc.create(&TaskDraft::new("  ", days(1))).unwrap_err();
        assert_eq!(err, MutationError::Validation(ValidationError::EmptyTitle));
        assert_eq!(svc.tasks(), snapshot.as_slice());
        assert_eq!(writes(&mut svc), writes_before);
        assert_eq!(Notice::from_error(&err).level, NoticeLevel::Error);
    }

    #[test]
    fn test_not_found_reported() {
        let mut svc = service();
        assert_eq!(
            svc.toggle_complete("ghost").unwrap_err(),
            MutationError::NotFound("ghost".into())
        );
        assert!(svc.delete("ghost").is_err());
        assert!(svc.update("ghost", &TaskDraft::new("x", days(0))).is_err());
        assert_eq!(writes(&mut svc), 0);
    }

    #[test]
    fn test_toggle_notices() {
        let mut svc = service();
        let id = svc.create(&TaskDraft::new("Lab", days(1))).unwrap().task_id.unwrap();

        let done = svc.toggle_complete(&id).unwrap();
        assert_eq!(done.notice.title, "Task Completed! 🎉");
        let reopened = svc.toggle_complete(&id).unwrap();
        assert_eq!(reopened.notice.title, "Task Reopened");
        assert!(!svc.get(&id).unwrap().completed);
    }

    #[test]
    fn test_write_failure_keeps_session_state() {
        let store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        };
        let mut svc = service_with(store, AwardCounting::Live);

        let receipt = svc.create(&TaskDraft::new("Offline", days(4))).unwrap();
        let warning = receipt.save_warning.expect("warning expected");
        assert_eq!(warning.level, NoticeLevel::Warning);
        assert_eq!(svc.tasks().len(), 1);
    }

    #[test]
    fn test_clear_completed_receipts() {
        let mut svc = service();
        let nothing = svc.clear_completed();
        assert_eq!(nothing.notice.level, NoticeLevel::Info);
        assert_eq!(writes(&mut svc), 0);

        for i in 0..5 {
            svc.create(&TaskDraft::new(format!("T{}", i), days(i))).unwrap();
        }
        svc.toggle_complete("task-2").unwrap();
        svc.toggle_complete("task-4").unwrap();

        let receipt = svc.clear_completed();
        assert_eq!(receipt.notice.description, "2 completed tasks removed.");
        let ids: Vec<_> = svc.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["task-5", "task-3", "task-1"]);
    }

    #[test]
    fn test_reopen_from_storage() {
        let mut svc = service();
        svc.create(&TaskDraft::new("Persist me", days(3))).unwrap();
        let store = svc.storage_mut().store().clone();

        let reopened = service_with(store, AwardCounting::Live);
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.tasks()[0].title, "Persist me");
    }

    #[test]
    fn test_live_counter_drops_on_delete() {
        let mut svc = service();
        let id = svc.create(&TaskDraft::new("A", days(1))).unwrap().task_id.unwrap();
        svc.toggle_complete(&id).unwrap();
        assert_eq!(svc.completed_counter(), 1);
        svc.delete(&id).unwrap();
        assert_eq!(svc.completed_counter(), 0);
    }

    #[test]
    fn test_lifetime_counter_is_monotonic() {
        let mut svc = service_with(MemoryStore::default(), AwardCounting::Lifetime);
        let id = svc.create(&TaskDraft::new("A", days(1))).unwrap().task_id.unwrap();
        svc.toggle_complete(&id).unwrap();
        assert_eq!(svc.completed_counter(), 1);

        svc.toggle_complete(&id).unwrap();
        assert_eq!(svc.completed_counter(), 1);
        svc.delete(&id).unwrap();
        assert_eq!(svc.completed_counter(), 1);

        let store = svc.storage_mut().store().clone();
        let reopened = service_with(store, AwardCounting::Lifetime);
        assert_eq!(reopened.completed_counter(), 1);
    }

    #[test]
    fn test_lifetime_counter_seeded_from_existing_data() {
        let mut svc = service();
        let id = svc.create(&TaskDraft::new("A", days(1))).unwrap().task_id.unwrap();
        svc.toggle_complete(&id).unwrap();

        let mut store = svc.storage_mut().store().clone();
        store.entries.remove(crate::store::tasks::LIFETIME_COMPLETED_KEY);
        assert!(store.entries.contains_key(TASKS_KEY));

        let reopened = service_with(store, AwardCounting::Lifetime);
        assert_eq!(reopened.completed_counter(), 1);
    }

    #[test]
    fn test_due_soon_follows_clock() {
        let mut svc = service();
        svc.create(&TaskDraft::new("Later", days(5))).unwrap();
        assert_eq!(svc.counts().due_soon, 0);
        svc.clock.advance(chrono::Duration::days(2));
        assert_eq!(svc.counts().due_soon, 1);
        svc.clock.advance(chrono::Duration::days(4));
        assert_eq!(svc.counts().overdue, 1);
    }

    #[test]
    fn test_timestamp_ids_unique_under_fixed_clock() {
        let mut svc = TaskService::open(
            TaskStorage::new(MemoryStore::default()),
            FixedClock::at(today(), 9),
            TimestampIdGenerator::new(),
            AwardCounting::Live,
        );
        for i in 0..20 {
            svc.create(&TaskDraft::new(format!("T{}", i), days(1))).unwrap();
        }
        let mut ids: Vec<_> = svc.tasks().iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }
}
