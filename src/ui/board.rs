//! Main screen: header, stat cards, filter bar and the task list.

use crate::app::App;
use crate::core::derive::{DueStatus, TaskCounts, TaskStats};
use crate::models::{Category, Filter, Priority, Task};
use crate::store::dates;
use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const ACCENT: Color = Color::Rgb(136, 192, 208);
const MUTED: Color = Color::Rgb(129, 161, 193);
const SELECTED_BG: Color = Color::Rgb(59, 66, 82);

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Length(4), // stat cards
            Constraint::Length(3), // filter bar
            Constraint::Min(0),    // task list
            Constraint::Length(1), // key hints
        ])
        .split(area);

    let counts = app.service.counts();
    render_header(f, chunks[0]);
    render_stat_cards(f, chunks[1], &TaskStats::from_counts(&counts));
    render_filter_bar(f, chunks[2], app.active_filter, &counts);
    render_task_list(f, chunks[3], app);
    render_hints(f, chunks[4]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "StudyFlow",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Master your time, ace your goals ✨",
            Style::default().fg(MUTED),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_stat_cards(f: &mut Frame, area: Rect, stats: &TaskStats) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let entries = [
        (
            "Completed",
            format!("{}/{}", stats.completed, stats.total),
            Color::Green,
        ),
        ("Due Soon", stats.due_soon.to_string(), Color::Yellow),
        ("Overdue", stats.overdue.to_string(), Color::Red),
        ("School Tasks", stats.school.to_string(), Color::Blue),
    ];

    for (card, (label, value, color)) in cards.iter().zip(entries) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .border_type(ratatui::widgets::BorderType::Rounded);
        let content = vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
        ];
        f.render_widget(
            Paragraph::new(content)
                .alignment(Alignment::Center)
                .block(block),
            *card,
        );
    }
}

/// Filter bar label; the count is shown only when non-zero.
pub fn filter_tab_label(filter: Filter, counts: &TaskCounts) -> String {
    match counts.get(filter) {
        0 => filter.label().to_string(),
        n => format!("{} ({})", filter.label(), n),
    }
}

fn render_filter_bar(f: &mut Frame, area: Rect, active: Filter, counts: &TaskCounts) {
    let mut spans = Vec::new();
    for (i, filter) in Filter::ALL.iter().enumerate() {
        let label = format!(" {} {} ", i + 1, filter_tab_label(*filter, counts));
        let style = if *filter == active {
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(ratatui::widgets::BorderType::Rounded);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Message shown when the active filter has no tasks.
pub fn empty_message(filter: Filter) -> String {
    match filter {
        Filter::All => "Start by creating your first task!".to_string(),
        other => format!("No {} tasks yet.", other.label().to_lowercase()),
    }
}

fn render_task_list(f: &mut Frame, area: Rect, app: &App) {
    let tasks = app.visible_tasks();
    let title = format!(" {} ({}) ", app.active_filter.label(), tasks.len());
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .border_type(ratatui::widgets::BorderType::Rounded);

    if tasks.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                empty_message(app.active_filter),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press n to add a task",
                Style::default().fg(MUTED),
            )),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        return;
    }

    let today = app.service.today();
    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| task_item(task, i == app.selected, today))
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn task_item(task: &Task, is_selected: bool, today: NaiveDate) -> ListItem<'static> {
    let priority_color = priority_color(task.priority);
    let category_color = match task.category {
        Category::School => Color::Blue,
        Category::Personal => Color::Magenta,
    };
    let status = DueStatus::of(task, today);
    let status_color = match status {
        DueStatus::Completed => Color::Green,
        DueStatus::Overdue => Color::Red,
        DueStatus::DueSoon => Color::Yellow,
        DueStatus::DaysLeft(_) => Color::Gray,
    };

    let selection_indicator = if is_selected {
        Span::styled("▶ ", Style::default().fg(Color::White))
    } else {
        Span::raw("  ")
    };
    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    let title_style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(" "),
        selection_indicator,
        Span::raw(checkbox),
        Span::styled("● ", Style::default().fg(priority_color)),
        Span::styled(task.title.clone(), title_style),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", task.category.label()),
            Style::default().fg(Color::Black).bg(category_color),
        ),
    ])];

    lines.push(Line::from(vec![
        Span::raw("        "),
        Span::styled(
            format!("📅 {}", dates::display_due_date(task.due_date)),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(status.label(), Style::default().fg(status_color)),
        Span::raw("  "),
        Span::styled(
            format!("{} priority", task.priority.label()),
            Style::default().fg(priority_color),
        ),
    ]));

    if let Some(first_line) = task.description.lines().next() {
        lines.push(Line::from(vec![
            Span::raw("        "),
            Span::styled(first_line.to_string(), Style::default().fg(MUTED)),
        ]));
    }

    let style = if is_selected {
        Style::default().bg(SELECTED_BG)
    } else {
        Style::default()
    };
    ListItem::new(lines).style(style)
}

fn render_hints(f: &mut Frame, area: Rect) {
    let hint = Line::from(vec![
        Span::styled("n", Style::default().fg(ACCENT)),
        Span::raw(" new  "),
        Span::styled("e", Style::default().fg(ACCENT)),
        Span::raw(" edit  "),
        Span::styled("space", Style::default().fg(ACCENT)),
        Span::raw(" done  "),
        Span::styled("d", Style::default().fg(ACCENT)),
        Span::raw(" delete  "),
        Span::styled("a", Style::default().fg(ACCENT)),
        Span::raw(" awards  "),
        Span::styled("?", Style::default().fg(ACCENT)),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(ACCENT)),
        Span::raw(" quit"),
    ]);
    f.render_widget(
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_colors() {
        assert_eq!(priority_color(Priority::High), Color::Red);
        assert_eq!(priority_color(Priority::Medium), Color::Yellow);
        assert_eq!(priority_color(Priority::Low), Color::Green);
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(empty_message(Filter::All), "Start by creating your first task!");
        assert_eq!(empty_message(Filter::DueSoon), "No due soon tasks yet.");
        assert_eq!(empty_message(Filter::School), "No school tasks yet.");
    }

    #[test]
    fn test_filter_tab_hides_zero_count() {
        let counts = TaskCounts {
            all: 3,
            school: 2,
            personal: 1,
            ..TaskCounts::default()
        };
        assert_eq!(filter_tab_label(Filter::All, &counts), "All Tasks (3)");
        assert_eq!(filter_tab_label(Filter::Overdue, &counts), "Overdue");
    }
}
