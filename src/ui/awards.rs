use crate::core::awards::{self, AwardCounting};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use super::{centered_rect, render_backdrop};

/// Awards overlay
pub fn render(f: &mut Frame, area: Rect, counter: u64, counting: AwardCounting) {
    render_backdrop(f, area);

    let popup_area = centered_rect(70, 85, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" 🏆 Your Awards (Esc to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let progress = awards::progress(counter);
    let mut constraints = vec![Constraint::Length(4)];
    constraints.extend(progress.iter().map(|_| Constraint::Length(2)));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let counting_note = match counting {
        AwardCounting::Live => "counting completed tasks in your list",
        AwardCounting::Lifetime => "counting every task you have ever completed",
    };
    let summary = vec![
        Line::from(Span::styled(
            awards::summary(counter),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(counting_note, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(next_up(counter), Style::default().fg(Color::Cyan))),
    ];
    f.render_widget(Paragraph::new(summary).alignment(Alignment::Center), rows[0]);

    for (row, item) in rows[1..].iter().zip(&progress) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(*row);

        let (badge, name_style) = if item.achieved {
            ("✓ ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            ("  ", Style::default().fg(Color::Gray))
        };
        let text = vec![
            Line::from(vec![
                Span::styled(badge, name_style),
                Span::styled(item.award.name, name_style),
            ]),
            Line::from(Span::styled(
                format!("  {}", item.award.description),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(text), cols[0]);

        let gauge_color = if item.achieved { Color::Green } else { Color::Cyan };
        let label = format!(
            "{}/{}",
            awards::group_thousands(counter.min(item.award.requirement)),
            awards::group_thousands(item.award.requirement)
        );
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(gauge_color).bg(Color::Rgb(46, 52, 64)))
            .percent(item.percent().min(100))
            .label(label);
        let gauge_area = Rect {
            height: 1,
            ..cols[1]
        };
        f.render_widget(gauge, gauge_area);
    }
}

fn next_up(counter: u64) -> String {
    match awards::next_award(counter) {
        Some(award) => format!(
            "Next: {} in {} more",
            award.name,
            awards::group_thousands(award.requirement - counter)
        ),
        None => "Every award unlocked".to_string(),
    }
}
