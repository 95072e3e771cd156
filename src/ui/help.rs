use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, render_backdrop};

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

fn key_line(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", keys), Style::default().fg(Color::Cyan)),
        Span::raw(action),
    ])
}

/// Key binding overlay
pub fn render(f: &mut Frame, area: Rect) {
    render_backdrop(f, area);

    let popup_area = centered_rect(80, 80, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts (Esc or ? to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    f.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(inner);

    let navigation_help = vec![
        heading("Navigation"),
        Line::from(""),
        key_line("j, ↓", "next task"),
        key_line("k, ↑", "previous task"),
        key_line("gg, Home", "first task"),
        key_line("G, End", "last task"),
        key_line("l, Tab", "next filter"),
        key_line("h, S-Tab", "previous filter"),
        key_line("1-7", "pick a filter"),
        key_line("q, Ctrl+C", "quit"),
        Line::from(""),
        heading("Filters"),
        Line::from(""),
        Line::from("1 All  2 School  3 Personal"),
        Line::from("4 Pending  5 Completed"),
        Line::from("6 Due Soon  7 Overdue"),
    ];

    let task_help = vec![
        heading("Tasks"),
        Line::from(""),
        key_line("n", "new task"),
        key_line("e, Enter", "edit task"),
        key_line("Space, x", "toggle done"),
        key_line("d", "delete task"),
        key_line("C", "clear completed"),
        key_line("y", "copy to clipboard"),
        Line::from(""),
        heading("Views"),
        Line::from(""),
        key_line("a", "awards"),
        key_line("?", "this help"),
    ];

    let dialog_help = vec![
        heading("Task form"),
        Line::from(""),
        key_line("Tab", "next field"),
        key_line("S-Tab", "previous field"),
        key_line("←/→", "change category/priority"),
        key_line("Enter", "save (newline in description)"),
        key_line("Ctrl+S", "save"),
        key_line("Ctrl+U", "clear line"),
        key_line("Esc", "cancel"),
        Line::from(""),
        heading("Due dates"),
        Line::from(""),
        Line::from("2025-03-01, today, tomorrow, +3"),
        Line::from("Due soon: within 3 days"),
        Line::from(""),
        heading("Confirm"),
        Line::from(""),
        key_line("y / n", "yes / no"),
        key_line("←/→", "choose button"),
    ];

    let nav_widget = Paragraph::new(navigation_help)
        .block(Block::default().borders(Borders::RIGHT))
        .wrap(Wrap { trim: false });
    let task_widget = Paragraph::new(task_help)
        .block(Block::default().borders(Borders::RIGHT))
        .wrap(Wrap { trim: false });
    let dialog_widget = Paragraph::new(dialog_help).wrap(Wrap { trim: false });

    f.render_widget(nav_widget, columns[0]);
    f.render_widget(task_widget, columns[1]);
    f.render_widget(dialog_widget, columns[2]);
}
