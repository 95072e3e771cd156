//! New/edit task form.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::text_input::{FieldInput, InputAction};
use crate::models::{Category, Priority, Task, TaskDraft, TaskId};
use crate::store::dates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    DueDate,
    Category,
    Priority,
}

impl FormField {
    pub const ORDER: [FormField; 5] = [
        FormField::Title,
        FormField::Description,
        FormField::DueDate,
        FormField::Category,
        FormField::Priority,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Task Title",
            FormField::Description => "Description",
            FormField::DueDate => "Due Date",
            FormField::Category => "Category",
            FormField::Priority => "Priority",
        }
    }

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> FormField {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> FormField {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

const DUE_PLACEHOLDER: &str = "YYYY-MM-DD, today, tomorrow or +N";

pub struct TaskForm {
    /// Task being edited; `None` for a new task.
    pub editing: Option<TaskId>,
    pub focus: FormField,
    pub title: FieldInput,
    pub description: FieldInput,
    pub due_date: FieldInput,
    pub category: Category,
    pub priority: Priority,
    completed: bool,
    /// Last submit error, shown under the fields.
    pub error: Option<String>,
}

impl TaskForm {
    pub fn new_task(category: Category, priority: Priority) -> Self {
        let mut form = Self {
            editing: None,
            focus: FormField::Title,
            title: FieldInput::single_line("", "What needs to be done?"),
            description: FieldInput::multi_line("", "Add details (optional)"),
            due_date: FieldInput::single_line("", DUE_PLACEHOLDER),
            category,
            priority,
            completed: false,
            error: None,
        };
        form.focus_field(FormField::Title);
        form
    }

    pub fn edit(task: &Task) -> Self {
        let due = task.due_date.format("%Y-%m-%d").to_string();
        let mut form = Self {
            editing: Some(task.id.clone()),
            focus: FormField::Title,
            title: FieldInput::single_line(&task.title, "What needs to be done?"),
            description: FieldInput::multi_line(&task.description, "Add details (optional)"),
            due_date: FieldInput::single_line(&due, DUE_PLACEHOLDER),
            category: task.category,
            priority: task.priority,
            completed: task.completed,
            error: None,
        };
        form.focus_field(FormField::Title);
        form
    }

    pub fn heading(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Task"
        } else {
            "Create New Task"
        }
    }

    pub fn focus_field(&mut self, field: FormField) {
        self.focus = field;
        self.title.set_focused(field == FormField::Title);
        self.description.set_focused(field == FormField::Description);
        self.due_date.set_focused(field == FormField::DueDate);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Tab => {
                self.focus_field(self.focus.next());
                return InputAction::Continue;
            }
            KeyCode::BackTab => {
                self.focus_field(self.focus.prev());
                return InputAction::Continue;
            }
            _ => {}
        }

        match self.focus {
            FormField::Title => self.title.handle_key(key),
            FormField::Description => self.description.handle_key(key),
            FormField::DueDate => self.due_date.handle_key(key),
            FormField::Category => self.handle_select_key(key, |form, forward| {
                form.category = cycle(&Category::ALL, form.category, forward);
            }),
            FormField::Priority => self.handle_select_key(key, |form, forward| {
                form.priority = cycle(&Priority::ALL, form.priority, forward);
            }),
        }
    }

    fn handle_select_key(
        &mut self,
        key: KeyEvent,
        step: impl Fn(&mut Self, bool),
    ) -> InputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => InputAction::Submit,
                KeyCode::Char('c') => InputAction::Cancel,
                _ => InputAction::Continue,
            };
        }
        match key.code {
            KeyCode::Esc => InputAction::Cancel,
            KeyCode::Enter => InputAction::Submit,
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                step(self, false);
                InputAction::Continue
            }
            KeyCode::Right
            | KeyCode::Char('l')
            | KeyCode::Down
            | KeyCode::Char('j')
            | KeyCode::Char(' ') => {
                step(self, true);
                InputAction::Continue
            }
            _ => InputAction::Continue,
        }
    }

    /// Build a draft from the fields. A blank due date is left unset so
    /// validation reports it; an unparseable one is an error here.
    pub fn to_draft(&self, today: NaiveDate) -> Result<TaskDraft, String> {
        let raw_due = self.due_date.value();
        let due_date = if raw_due.trim().is_empty() {
            None
        } else {
            Some(dates::parse_due_input(&raw_due, today)?)
        };

        Ok(TaskDraft {
            title: self.title.value(),
            description: self.description.value(),
            due_date,
            category: self.category,
            priority: self.priority,
            completed: self.completed,
        })
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}
