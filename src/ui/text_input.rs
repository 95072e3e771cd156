use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    Frame,
};
use tui_textarea::{CursorMove, TextArea};

/// Result of feeding a key to an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Keep editing
    Continue,
    /// Submit the surrounding form
    Submit,
    /// Close the surrounding dialog
    Cancel,
}

/// Form field backed by a `TextArea`. Single-line fields submit on Enter,
/// multi-line fields insert a newline.
pub struct FieldInput {
    textarea: TextArea<'static>,
    multiline: bool,
}

impl FieldInput {
    pub fn single_line(value: &str, placeholder: &str) -> Self {
        Self::build(value, placeholder, false)
    }

    pub fn multi_line(value: &str, placeholder: &str) -> Self {
        Self::build(value, placeholder, true)
    }

    fn build(value: &str, placeholder: &str, multiline: bool) -> Self {
        let mut textarea = if value.is_empty() {
            TextArea::default()
        } else {
            TextArea::from(value.lines().map(|s| s.to_string()))
        };
        textarea.move_cursor(CursorMove::Bottom);
        textarea.move_cursor(CursorMove::End);

        // Nord palette
        textarea.set_style(
            Style::default()
                .fg(Color::Rgb(236, 239, 244))
                .bg(Color::Rgb(46, 52, 64)),
        );
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text(placeholder);
        textarea.set_placeholder_style(Style::default().fg(Color::Rgb(76, 86, 106)));

        let mut input = Self {
            textarea,
            multiline,
        };
        input.set_focused(false);
        input
    }

    /// Current text; lines joined with `\n`.
    pub fn value(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Show or hide the block cursor.
    pub fn set_focused(&mut self, focused: bool) {
        let style = if focused {
            Style::default()
                .bg(Color::Rgb(136, 192, 208))
                .fg(Color::Rgb(46, 52, 64))
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(style);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => InputAction::Submit,
                KeyCode::Char('c') => InputAction::Cancel,
                KeyCode::Char('u') => {
                    self.textarea.delete_line_by_head();
                    InputAction::Continue
                }
                _ => InputAction::Continue,
            };
        }

        match key.code {
            KeyCode::Esc => return InputAction::Cancel,
            KeyCode::Enter if !self.multiline => return InputAction::Submit,
            KeyCode::Enter => {
                self.textarea.insert_newline();
            }
            KeyCode::Char(c) => {
                self.textarea.insert_char(c);
            }
            KeyCode::Backspace => {
                self.textarea.delete_char();
            }
            KeyCode::Delete => {
                self.textarea.delete_next_char();
            }
            KeyCode::Left => self.textarea.move_cursor(CursorMove::Back),
            KeyCode::Right => self.textarea.move_cursor(CursorMove::Forward),
            KeyCode::Up if self.multiline => self.textarea.move_cursor(CursorMove::Up),
            KeyCode::Down if self.multiline => self.textarea.move_cursor(CursorMove::Down),
            KeyCode::Home => self.textarea.move_cursor(CursorMove::Head),
            KeyCode::End => self.textarea.move_cursor(CursorMove::End),
            _ => {}
        }
        InputAction::Continue
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        f.render_widget(&self.textarea, area);
    }
}
