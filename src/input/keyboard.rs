use crate::app::{App, Mode};
use crate::core::derive::DueStatus;
use crate::core::{Notice, NoticeLevel};
use crate::input::Command;
use crate::models::{Filter, Task};
use crate::store::dates;
use crate::ui::dialogs::{ConfirmAction, DialogType};
use crate::ui::task_form::TaskForm;
use crate::ui::text_input::InputAction;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, warn};

/// Handle a key press.
/// Returns false when the app should quit.
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    // Any key closes the welcome dialog
    if app.show_welcome_dialog {
        app.show_welcome_dialog = false;
        return true;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Dialog => handle_dialog_mode(app, key),
        Mode::Help => handle_overlay_mode(app, key, '?'),
        Mode::Awards => handle_overlay_mode(app, key, 'a'),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    let mut matched = match_key_sequence(&app.key_buffer, key);
    if matched.is_none() && !app.key_buffer.is_empty() {
        // Broken sequence: drop the prefix and read the key on its own
        app.key_buffer.clear();
        matched = match_key_sequence(&[], key);
    }

    if let Some(cmd) = matched {
        app.key_buffer.clear();

        if cmd == Command::Quit {
            return false;
        }

        execute_command(app, cmd);
        return true;
    }

    // Unmatched character keys may start a sequence
    if let KeyCode::Char(c) = key.code {
        app.key_buffer.push(c);
    } else {
        app.key_buffer.clear();
    }

    if app.key_buffer.len() > 2 {
        app.key_buffer.clear();
    }

    true
}

/// Match a key sequence to a command.
/// buffer: keys pressed before (not including `key`)
pub fn match_key_sequence(buffer: &[char], key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match (buffer, key.code) {
        ([], KeyCode::Char('q')) => Some(Command::Quit),
        ([], KeyCode::Char('j')) | ([], KeyCode::Down) => Some(Command::TaskDown),
        ([], KeyCode::Char('k')) | ([], KeyCode::Up) => Some(Command::TaskUp),
        ([], KeyCode::Char('G')) | ([], KeyCode::End) => Some(Command::LastTask),
        ([], KeyCode::Home) => Some(Command::FirstTask),
        (['g'], KeyCode::Char('g')) => Some(Command::FirstTask),

        ([], KeyCode::Char('l')) | ([], KeyCode::Right) | ([], KeyCode::Tab) => {
            Some(Command::NextFilter)
        }
        ([], KeyCode::Char('h')) | ([], KeyCode::Left) | ([], KeyCode::BackTab) => {
            Some(Command::PrevFilter)
        }
        ([], KeyCode::Char(c @ '1'..='7')) => {
            let idx = c as usize - '1' as usize;
            Filter::ALL.get(idx).copied().map(Command::SetFilter)
        }

        ([], KeyCode::Char('n')) => Some(Command::NewTask),
        ([], KeyCode::Char('e')) | ([], KeyCode::Enter) => Some(Command::EditTask),
        ([], KeyCode::Char(' ')) | ([], KeyCode::Char('x')) => Some(Command::ToggleTask),
        ([], KeyCode::Char('d')) | ([], KeyCode::Delete) => Some(Command::DeleteTask),
        ([], KeyCode::Char('C')) => Some(Command::ClearCompleted),
        ([], KeyCode::Char('y')) => Some(Command::CopyTask),
        ([], KeyCode::Char('a')) => Some(Command::ShowAwards),
        ([], KeyCode::Char('?')) => Some(Command::ShowHelp),
        (_, KeyCode::Esc) => Some(Command::Cancel),

        _ => None,
    }
}

fn execute_command(app: &mut App, cmd: Command) {
    match cmd {
        Command::Quit => {}
        Command::TaskDown => app.move_selection(1),
        Command::TaskUp => app.move_selection(-1),
        Command::FirstTask => app.selected = 0,
        Command::LastTask => {
            app.selected = app.visible_tasks().len().saturating_sub(1);
        }
        Command::NextFilter => app.set_filter(app.active_filter.next()),
        Command::PrevFilter => app.set_filter(app.active_filter.prev()),
        Command::SetFilter(filter) => app.set_filter(filter),

        Command::NewTask => {
            let form = TaskForm::new_task(app.config.default_category, app.config.default_priority);
            app.dialog = Some(DialogType::TaskForm(form));
            app.mode = Mode::Dialog;
        }
        Command::EditTask => {
            if let Some(task) = app.selected_task() {
                let form = TaskForm::edit(task);
                app.dialog = Some(DialogType::TaskForm(form));
                app.mode = Mode::Dialog;
            }
        }
        Command::ToggleTask => {
            if let Some(id) = app.selected_task_id() {
                match app.service.toggle_complete(&id) {
                    Ok(receipt) => {
                        app.apply_receipt(receipt);
                        // The task may have left the active filter
                        app.clamp_selection();
                    }
                    Err(e) => app.notify_error(&e),
                }
            }
        }
        Command::DeleteTask => {
            if let Some(task) = app.selected_task() {
                let message = format!("Delete \"{}\"? This cannot be undone.", task.title);
                let action = ConfirmAction::DeleteTask(task.id.clone());
                open_confirm(app, "Delete Task", message, action);
            }
        }
        Command::ClearCompleted => {
            let completed = app.service.counts().completed;
            if completed == 0 {
                app.notify_info("Nothing to clear", "There are no completed tasks.");
            } else {
                let message = format!(
                    "Remove {} completed task{}?",
                    completed,
                    if completed == 1 { "" } else { "s" }
                );
                open_confirm(app, "Clear Completed", message, ConfirmAction::ClearCompleted);
            }
        }
        Command::CopyTask => {
            if let Some(task) = app.selected_task() {
                let text = task_clipboard_text(task, app.service.today());
                match copy_to_clipboard(&text) {
                    Ok(()) => app.notify_info("Copied", "Task copied to clipboard."),
                    Err(e) => {
                        warn!("event=clipboard_copy status=failed error={}", e);
                        app.notify(Notice::new(
                            NoticeLevel::Warning,
                            "Copy failed",
                            e,
                        ));
                    }
                }
            }
        }

        Command::ShowAwards => app.mode = Mode::Awards,
        Command::ShowHelp => app.mode = Mode::Help,
        Command::Cancel => app.key_buffer.clear(),
    }
}

fn open_confirm(app: &mut App, title: &str, message: String, action: ConfirmAction) {
    app.dialog = Some(DialogType::Confirm {
        title: title.to_string(),
        message,
        yes_selected: false,
        action,
    });
    app.mode = Mode::Dialog;
}

fn close_dialog(app: &mut App) {
    app.dialog = None;
    app.mode = Mode::Normal;
}

fn handle_dialog_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(dialog) = app.dialog.as_mut() else {
        app.mode = Mode::Normal;
        return true;
    };

    match dialog {
        DialogType::TaskForm(form) => match form.handle_key(key) {
            InputAction::Continue => {}
            InputAction::Cancel => close_dialog(app),
            InputAction::Submit => submit_form(app),
        },
        DialogType::Confirm {
            yes_selected,
            action,
            ..
        } => match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => close_dialog(app),
            KeyCode::Left | KeyCode::Char('h') => *yes_selected = false,
            KeyCode::Right | KeyCode::Char('l') => *yes_selected = true,
            KeyCode::Tab => *yes_selected = !*yes_selected,
            KeyCode::Enter => {
                let confirmed = *yes_selected;
                let action = action.clone();
                close_dialog(app);
                if confirmed {
                    run_confirmed(app, action);
                }
            }
            KeyCode::Char('y') => {
                let action = action.clone();
                close_dialog(app);
                run_confirmed(app, action);
            }
            _ => {}
        },
    }
    true
}

/// Submit the open task form. The form stays open on error.
fn submit_form(app: &mut App) {
    let today = app.service.today();
    let Some(DialogType::TaskForm(form)) = app.dialog.as_mut() else {
        return;
    };

    let draft = match form.to_draft(today) {
        Ok(draft) => draft,
        Err(msg) => {
            form.error = Some(msg);
            return;
        }
    };
    let editing = form.editing.clone();

    let result = match &editing {
        Some(id) => app.service.update(id, &draft),
        None => app.service.create(&draft),
    };

    match result {
        Ok(receipt) => {
            close_dialog(app);
            app.apply_receipt(receipt);
        }
        Err(e) => {
            debug!("event=form_submit status=rejected error={}", e);
            if let Some(DialogType::TaskForm(form)) = app.dialog.as_mut() {
                form.error = Some(e.to_string());
            }
            app.notify_error(&e);
        }
    }
}

fn run_confirmed(app: &mut App, action: ConfirmAction) {
    match action {
        ConfirmAction::DeleteTask(id) => match app.service.delete(&id) {
            Ok(receipt) => app.apply_receipt(receipt),
            Err(e) => app.notify_error(&e),
        },
        ConfirmAction::ClearCompleted => {
            let receipt = app.service.clear_completed();
            app.apply_receipt(receipt);
        }
    }
}

/// Help and awards overlays close with Esc, q or their own key.
fn handle_overlay_mode(app: &mut App, key: KeyEvent, toggle: char) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.mode = Mode::Normal,
        KeyCode::Char(c) if c == toggle => app.mode = Mode::Normal,
        _ => {}
    }
    true
}

/// Plain-text rendering of a task for the clipboard.
pub fn task_clipboard_text(task: &Task, today: NaiveDate) -> String {
    let mut text = format!(
        "{}\nDue: {} ({})\nCategory: {} | Priority: {}",
        task.title,
        dates::display_due_date(task.due_date),
        DueStatus::of(task, today).label(),
        task.category.label(),
        task.priority.label(),
    );
    if !task.description.is_empty() {
        text.push_str("\n\n");
        text.push_str(&task.description);
    }
    text
}

#[cfg(feature = "clipboard")]
fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(text.to_string()).map_err(|e| e.to_string())
}

#[cfg(not(feature = "clipboard"))]
fn copy_to_clipboard(_text: &str) -> Result<(), String> {
    Err("Clipboard support is not enabled in this build.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{add, test_app};
    use crate::models::{Category, Priority};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_input(app, key(code))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_key_sequences() {
        assert_eq!(match_key_sequence(&[], key(KeyCode::Char('j'))), Some(Command::TaskDown));
        assert_eq!(match_key_sequence(&[], key(KeyCode::Char('g'))), None);
        assert_eq!(
            match_key_sequence(&['g'], key(KeyCode::Char('g'))),
            Some(Command::FirstTask)
        );
        assert_eq!(
            match_key_sequence(&[], key(KeyCode::Char('6'))),
            Some(Command::SetFilter(Filter::DueSoon))
        );
        assert_eq!(match_key_sequence(&[], key(KeyCode::Char('8'))), None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(match_key_sequence(&[], ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn test_quit_and_welcome() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.show_welcome_dialog = true;
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(!app.show_welcome_dialog);
        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_create_task_through_form() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Dialog);
        type_str(&mut app, "Essay");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "+2");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Normal);
        let task = &app.service.tasks()[0];
        assert_eq!(task.title, "Essay");
        assert_eq!(task.category, Category::School);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(
            app.current_notification().unwrap().notice.title,
            "Task Created! 🎉"
        );
        assert_eq!(app.service.counts().due_soon, 1);
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "No date");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Dialog);
        assert!(app.service.tasks().is_empty());
        match &app.dialog {
            Some(DialogType::TaskForm(form)) => {
                assert_eq!(form.error.as_deref(), Some("Due date is required"));
            }
            _ => panic!("form should stay open"),
        }
        assert_eq!(
            app.current_notification().unwrap().notice.level,
            NoticeLevel::Error
        );

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.dialog.is_none());
    }

    #[test]
    fn test_edit_selected_task() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        let id = add(&mut app, "Read", 4);

        press(&mut app, KeyCode::Char('e'));
        type_str(&mut app, " ch. 3");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.service.get(&id).unwrap().title, "Read ch. 3");
        assert_eq!(app.service.tasks().len(), 1);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        add(&mut app, "Keep?", 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.service.tasks().len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.service.tasks().len(), 1, "default button is No");

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.service.tasks().is_empty());
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_toggle_under_pending_filter_moves_selection() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        add(&mut app, "A", 1);
        add(&mut app, "B", 2);
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.active_filter, Filter::Pending);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.visible_tasks().len(), 1);
        assert_eq!(app.selected, 0);
        assert_eq!(app.service.counts().completed, 1);
    }

    #[test]
    fn test_clear_completed_flow() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.mode, Mode::Normal);

        add(&mut app, "A", 1);
        add(&mut app, "B", 1);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.mode, Mode::Dialog);
        press(&mut app, KeyCode::Char('y'));

        let titles: Vec<_> = app.service.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["A"]);
    }

    #[test]
    fn test_navigation_and_overlays() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        for i in 0..3 {
            add(&mut app, &format!("T{}", i), i);
        }
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.selected, 2);
        type_str(&mut app, "gg");
        assert_eq!(app.selected, 0);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.active_filter, Filter::School);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_filter, Filter::Overdue);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Awards);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_clipboard_text() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let task = Task {
            id: "1".into(),
            title: "Essay".into(),
            description: "Intro first".into(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            category: Category::School,
            priority: Priority::High,
            completed: false,
            created_at: chrono::Utc::now(),
        };
        let text = task_clipboard_text(&task, today);
        assert!(text.starts_with("Essay\nDue: Mar 03, 2025"));
        assert!(text.contains("Category: School | Priority: High"));
        assert!(text.ends_with("\n\nIntro first"));
    }
}
