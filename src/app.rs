use crate::config::Config;
use crate::core::{Notice, NoticeLevel, Receipt, SystemClock, TaskService, TimestampIdGenerator};
use crate::error::MutationError;
use crate::models::{Filter, Task, TaskId};
use crate::store::tasks::TaskStorage;
use crate::store::FileStore;
use crate::ui::dialogs::DialogType;
use anyhow::{Context, Result};
use log::{info, warn};
use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

pub type Service = TaskService<FileStore, SystemClock, TimestampIdGenerator>;

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
const MAX_QUEUED_NOTIFICATIONS: usize = 4;

/// Notification waiting for or occupying the notification bar
#[derive(Debug, Clone)]
pub struct Notification {
    pub notice: Notice,
    /// Set when the notification reaches the bar.
    pub shown_at: Option<Instant>,
}

impl Notification {
    pub fn is_expired(&self) -> bool {
        self.shown_at
            .map(|t| t.elapsed() >= NOTIFICATION_TTL)
            .unwrap_or(false)
    }
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigate the task list
    Normal,
    /// Task form or confirmation dialog
    Dialog,
    /// Key binding overlay
    Help,
    /// Awards overlay
    Awards,
}

/// Open the task store under `data_dir`; shared by the TUI and the CLI.
pub fn open_service(data_dir: &Path, config: &Config) -> Result<Service> {
    let store = FileStore::open(data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let service = TaskService::open(
        TaskStorage::new(store),
        SystemClock,
        TimestampIdGenerator::new(),
        config.award_counting,
    );
    info!(
        "event=service_open count={} dir={}",
        service.tasks().len(),
        data_dir.display()
    );
    Ok(service)
}

pub struct App {
    pub service: Service,
    pub mode: Mode,
    /// Key buffer for multi-key sequences (`gg`)
    pub key_buffer: Vec<char>,
    pub active_filter: Filter,
    /// Selected row within the filtered list
    pub selected: usize,
    pub dialog: Option<DialogType>,
    pub config: Config,
    /// First run welcome dialog
    pub show_welcome_dialog: bool,
    pub notifications: VecDeque<Notification>,
}

impl App {
    /// Open the store under `data_dir` and restore the last UI state.
    pub fn new(config: Config, data_dir: &Path, first_run: bool) -> Result<Self> {
        let service = open_service(data_dir, &config)?;
        let ui_state = crate::state::load_state(service.storage().store());
        let mut app = Self {
            service,
            mode: Mode::Normal,
            key_buffer: Vec::new(),
            active_filter: Filter::All,
            selected: 0,
            dialog: None,
            config,
            show_welcome_dialog: first_run,
            notifications: VecDeque::new(),
        };
        crate::state::apply_state(&mut app, ui_state);
        Ok(app)
    }

    /// Returns false when the app should quit.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        crate::input::handle_key_input(self, key)
    }

    /// Tasks under the active filter, in list order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.service.filtered(self.active_filter)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected).copied()
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id.clone())
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        self.selected = if len == 0 { 0 } else { self.selected.min(len - 1) };
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if self.active_filter != filter {
            self.active_filter = filter;
            self.selected = 0;
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    /// Select the task with `id` if the active filter shows it.
    pub fn select_task(&mut self, id: &str) {
        if let Some(idx) = self.visible_tasks().iter().position(|t| t.id == id) {
            self.selected = idx;
        }
        self.clamp_selection();
    }

    pub fn notify(&mut self, notice: Notice) {
        if self.notifications.len() >= MAX_QUEUED_NOTIFICATIONS {
            self.notifications.pop_back();
        }
        self.notifications.push_back(Notification {
            notice,
            shown_at: None,
        });
        self.start_front_notification();
    }

    pub fn notify_error(&mut self, err: &MutationError) {
        warn!("event=mutation_rejected error={}", err);
        self.notify(Notice::from_error(err));
    }

    /// Surface a mutation outcome and keep the selection on the touched task.
    pub fn apply_receipt(&mut self, receipt: Receipt) {
        let Receipt {
            notice,
            save_warning,
            task_id,
        } = receipt;
        self.notify(notice);
        if let Some(warning) = save_warning {
            self.notify(warning);
        }
        match task_id {
            Some(id) => self.select_task(&id),
            None => self.clamp_selection(),
        }
    }

    pub fn notify_info(&mut self, title: &str, description: impl Into<String>) {
        self.notify(Notice::new(NoticeLevel::Info, title, description));
    }

    /// Notification currently on the bar
    pub fn current_notification(&self) -> Option<&Notification> {
        self.notifications.front()
    }

    /// Drop the front notification once it has been visible long enough.
    pub fn clear_expired_notification(&mut self) {
        while self.notifications.front().is_some_and(|n| n.is_expired()) {
            self.notifications.pop_front();
            self.start_front_notification();
        }
    }

    fn start_front_notification(&mut self) {
        if let Some(front) = self.notifications.front_mut() {
            front.shown_at.get_or_insert_with(Instant::now);
        }
    }

    /// Persist the active filter and selection.
    pub fn save_ui_state(&mut self) {
        let state = crate::state::extract_state(self);
        if let Err(e) = crate::state::save_state(self.service.storage_mut().store_mut(), &state) {
            warn!("event=ui_state_save status=failed error={}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::TaskDraft;
    use chrono::Local;
    use tempfile::TempDir;

    pub(crate) fn test_app(dir: &TempDir) -> App {
        App::new(Config::default(), dir.path(), false).unwrap()
    }

    pub(crate) fn add(app: &mut App, title: &str, due_in_days: i64) -> TaskId {
        let due = Local::now().date_naive() + chrono::Duration::days(due_in_days);
        let receipt = app.service.create(&TaskDraft::new(title, due)).unwrap();
        let id = receipt.task_id.clone().unwrap();
        app.apply_receipt(receipt);
        id
    }

    #[test]
    fn test_open_service_with_corrupt_blob_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("study-tasks.json"), "{not json").unwrap();
        let service = open_service(dir.path(), &Config::default()).unwrap();
        assert!(service.tasks().is_empty());
        assert!(dir.path().join("study-tasks-corrupt.json").exists());
    }

    #[test]
    fn test_selection_follows_created_task() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        add(&mut app, "First", 5);
        app.move_selection(1);
        let id = add(&mut app, "Second", 6);
        assert_eq!(app.selected_task_id(), Some(id));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_selection_is_clamped() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        add(&mut app, "A", 5);
        add(&mut app, "B", 5);
        app.move_selection(10);
        assert_eq!(app.selected, 1);
        app.move_selection(-10);
        assert_eq!(app.selected, 0);

        app.set_filter(Filter::Completed);
        assert!(app.selected_task().is_none());
        app.move_selection(1);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_notifications_queue_in_order() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.notify_info("one", "");
        app.notify_info("two", "");
        assert_eq!(app.current_notification().unwrap().notice.title, "one");
        assert!(app.notifications[0].shown_at.is_some());
        assert!(app.notifications[1].shown_at.is_none());

        app.notifications[0].shown_at = Some(Instant::now() - NOTIFICATION_TTL);
        app.clear_expired_notification();
        assert_eq!(app.current_notification().unwrap().notice.title, "two");
        assert!(app.current_notification().unwrap().shown_at.is_some());
    }

    #[test]
    fn test_ui_state_survives_restart() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        add(&mut app, "A", 1);
        add(&mut app, "B", 2);
        app.set_filter(Filter::DueSoon);
        app.move_selection(1);
        app.save_ui_state();
        drop(app);

        let app = test_app(&dir);
        assert_eq!(app.active_filter, Filter::DueSoon);
        assert_eq!(app.selected, 1);
        assert_eq!(app.service.tasks().len(), 2);
    }
}
