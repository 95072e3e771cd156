mod awards;
mod board;
pub mod dialogs;
mod help;
pub mod task_form;
pub mod text_input;
mod welcome;

pub use board::empty_message;

use crate::app::{App, Mode, Notification};
use crate::core::NoticeLevel;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Main render entry point
pub fn render(f: &mut Frame, app: &App) {
    board::render(f, f.area(), app);

    if let Some(dialog) = &app.dialog {
        dialogs::render_dialog(f, dialog);
    }

    match app.mode {
        Mode::Help => help::render(f, f.area()),
        Mode::Awards => awards::render(
            f,
            f.area(),
            app.service.completed_counter(),
            app.service.award_counting(),
        ),
        Mode::Normal | Mode::Dialog => {}
    }

    if app.show_welcome_dialog {
        welcome::render(f, f.area(), &app.config);
    }

    if let Some(notification) = app.current_notification() {
        render_notification(f, f.area(), notification);
    }
}

/// Notification bar over the top three rows
fn render_notification(f: &mut Frame, area: Rect, notification: &Notification) {
    let notification_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 3.min(area.height),
    };

    let (bg_color, fg_color, prefix) = match notification.notice.level {
        NoticeLevel::Info => (Color::Blue, Color::White, "ℹ"),
        NoticeLevel::Success => (Color::Green, Color::White, "✓"),
        NoticeLevel::Warning => (Color::Yellow, Color::Black, "⚠"),
        NoticeLevel::Error => (Color::Red, Color::White, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(
            format!(" {} ", prefix),
            Style::default()
                .fg(fg_color)
                .bg(bg_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            notification.notice.title.as_str(),
            Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            notification.notice.description.as_str(),
            Style::default().fg(fg_color),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(bg_color))
        .style(Style::default().bg(bg_color));

    f.render_widget(Paragraph::new(content).block(block), notification_area);
}

/// Dark backdrop behind popups
pub(crate) fn render_backdrop(f: &mut Frame, area: Rect) {
    let block = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    f.render_widget(block, area);
}

/// Centered rectangle taking the given percentages of `r`
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
