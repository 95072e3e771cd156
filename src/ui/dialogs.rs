use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::task_form::{FormField, TaskForm};
use super::{centered_rect, render_backdrop};
use crate::models::{Category, Priority, TaskId};

/// Action run when a confirmation is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(TaskId),
    ClearCompleted,
}

/// Dialog types
pub enum DialogType {
    /// New / edit task form
    TaskForm(TaskForm),
    /// Yes / no confirmation
    Confirm {
        title: String,
        message: String,
        yes_selected: bool,
        action: ConfirmAction,
    },
}

const BORDER: Color = Color::Rgb(76, 86, 106);
const BACKGROUND: Color = Color::Rgb(46, 52, 64);
const FROST: Color = Color::Rgb(129, 161, 193);
const CYAN: Color = Color::Rgb(136, 192, 208);
const SNOW: Color = Color::Rgb(216, 222, 233);
const RED: Color = Color::Rgb(191, 97, 106);
const GREEN: Color = Color::Rgb(163, 190, 140);
const YELLOW: Color = Color::Rgb(235, 203, 139);

/// Render the dialog centered over the screen
pub fn render_dialog(f: &mut Frame, dialog: &DialogType) {
    render_backdrop(f, f.area());

    let area = match dialog {
        DialogType::TaskForm(_) => centered_rect(70, 80, f.area()),
        DialogType::Confirm { .. } => centered_rect(50, 30, f.area()),
    };
    f.render_widget(Clear, area);

    match dialog {
        DialogType::TaskForm(form) => render_task_form(f, area, form),
        DialogType::Confirm {
            title,
            message,
            yes_selected,
            ..
        } => render_confirm_dialog(f, area, title, message, *yes_selected),
    }
}

fn render_task_form(f: &mut Frame, area: Rect, form: &TaskForm) {
    let block = Block::default()
        .title(format!("  {}  ", form.heading()))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(BACKGROUND));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(4),    // description
            Constraint::Length(3), // due date
            Constraint::Length(3), // category
            Constraint::Length(3), // priority
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

    let title_inner = render_field_block(f, chunks[0], form, FormField::Title);
    form.title.render(f, title_inner);

    let desc_inner = render_field_block(f, chunks[1], form, FormField::Description);
    form.description.render(f, desc_inner);

    let due_inner = render_field_block(f, chunks[2], form, FormField::DueDate);
    form.due_date.render(f, due_inner);

    let category_inner = render_field_block(f, chunks[3], form, FormField::Category);
    let categories: Vec<(&str, bool)> = Category::ALL
        .iter()
        .map(|c| (c.label(), *c == form.category))
        .collect();
    render_choices(f, category_inner, &categories);

    let priority_inner = render_field_block(f, chunks[4], form, FormField::Priority);
    let priorities: Vec<(&str, bool)> = Priority::ALL
        .iter()
        .map(|p| (p.label(), *p == form.priority))
        .collect();
    render_choices(f, priority_inner, &priorities);

    if let Some(error) = &form.error {
        let error_line = Paragraph::new(format!("✗ {}", error)).style(Style::default().fg(RED));
        f.render_widget(error_line, chunks[5]);
    }

    let hints = Paragraph::new("Tab next field  ←/→ change  Enter save  Ctrl+S save  Esc cancel")
        .style(Style::default().fg(FROST))
        .alignment(Alignment::Center);
    f.render_widget(hints, chunks[6]);
}

/// Bordered field box with its label; returns the inner area.
fn render_field_block(f: &mut Frame, area: Rect, form: &TaskForm, field: FormField) -> Rect {
    let focused = form.focus == field;
    let required = matches!(field, FormField::Title | FormField::DueDate);
    let label = if required {
        format!(" {} * ", field.label())
    } else {
        format!(" {} ", field.label())
    };

    let block = Block::default()
        .title(label)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { CYAN } else { BORDER }))
        .border_type(ratatui::widgets::BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);
    inner
}

fn render_choices(f: &mut Frame, area: Rect, choices: &[(&str, bool)]) {
    let mut spans = Vec::new();
    for (label, selected) in choices {
        let style = if *selected {
            Style::default()
                .fg(BACKGROUND)
                .bg(CYAN)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(SNOW)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::raw("  "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_confirm_dialog(f: &mut Frame, area: Rect, title: &str, message: &str, yes_selected: bool) {
    let block = Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(YELLOW))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(BACKGROUND));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // message
            Constraint::Length(3), // buttons
        ])
        .split(inner);

    let message_text = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(SNOW));
    f.render_widget(message_text, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[1]);

    let no_style = if !yes_selected {
        Style::default()
            .bg(RED)
            .fg(BACKGROUND)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(RED).add_modifier(Modifier::DIM)
    };
    let no_button = Paragraph::new("[ n ] No")
        .style(no_style)
        .alignment(Alignment::Center);
    f.render_widget(no_button, button_chunks[1]);

    let yes_style = if yes_selected {
        Style::default()
            .bg(GREEN)
            .fg(BACKGROUND)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(GREEN).add_modifier(Modifier::DIM)
    };
    let yes_button = Paragraph::new("[ y ] Yes")
        .style(yes_style)
        .alignment(Alignment::Center);
    f.render_widget(yes_button, button_chunks[2]);
}
