use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{centered_rect, render_backdrop};

/// First run welcome dialog
pub fn render(f: &mut Frame, area: Rect, config: &crate::config::Config) {
    render_backdrop(f, area);

    let popup_area = centered_rect(70, 60, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" 🎉 Welcome to StudyFlow! ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    f.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let section = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
    };
    let value = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let data_dir = config
        .resolved_data_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unavailable)".to_string());
    let config_path = crate::config::get_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unavailable)".to_string());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Master your time, ace your goals ✨",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Your tasks are saved in:"),
        Line::from(Span::styled(data_dir, dim)),
        Line::from(""),
        section("Settings:"),
        Line::from(Span::styled(config_path, dim)),
        Line::from(vec![
            Span::styled("Awards count ", dim),
            Span::styled(config.award_counting.to_string(), value),
            Span::styled(" completions", dim),
        ]),
        Line::from(""),
        section("Getting started:"),
        Line::from(vec![
            Span::styled("  n", Style::default().fg(Color::Yellow)),
            Span::raw("  create a task    "),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::raw("  all shortcuts"),
        ]),
        Line::from(vec![
            Span::styled("  studyflow --help", value),
            Span::styled("  command line usage", dim),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to start",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, inner);
}
