//! Modal dialogs drawn over the current screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

pub enum DialogResult<T> {
    Continue,
    Cancel,
    Submit(T),
}

/// Fixed-size rectangle centered in `area`, shrunk to fit if needed.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Blocking notice dismissed with Enter or Esc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDialog {
    title: String,
    message: String,
    kind: MessageKind,
}

impl MessageDialog {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            kind: MessageKind::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            kind: MessageKind::Error,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn handle_key(&self, key: KeyEvent) -> DialogResult<()> {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => DialogResult::Submit(()),
            _ => DialogResult::Continue,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = match self.kind {
            MessageKind::Info => Color::Cyan,
            MessageKind::Error => Color::Red,
        };
        let dialog_area = centered_rect(area, 60, 7);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(color).bold());
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(
            Paragraph::new(self.message.as_str()).wrap(Wrap { trim: true }),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled("[OK]", Style::default().fg(color).bold()))
                .alignment(Alignment::Center),
            chunks[1],
        );
    }
}

pub struct ConfirmDialog {
    title: String,
    message: String,
    selected: bool, // true = Yes, false = No
}

impl ConfirmDialog {
    pub fn new(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            selected: false,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResult<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => DialogResult::Cancel,
            KeyCode::Enter => {
                if self.selected {
                    DialogResult::Submit(())
                } else {
                    DialogResult::Cancel
                }
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => DialogResult::Submit(()),
            KeyCode::Left => {
                self.selected = true;
                DialogResult::Continue
            }
            KeyCode::Right => {
                self.selected = false;
                DialogResult::Continue
            }
            KeyCode::Tab => {
                self.selected = !self.selected;
                DialogResult::Continue
            }
            _ => DialogResult::Continue,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let dialog_area = centered_rect(area, 60, 8);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(Color::Yellow).bold());
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(
            Paragraph::new(self.message.as_str()).wrap(Wrap { trim: true }),
            chunks[0],
        );

        let highlight = |on: bool| {
            if on {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            }
        };
        let buttons = Line::from(vec![
            Span::styled("[Yes]", highlight(self.selected)),
            Span::raw("    "),
            Span::styled("[No]", highlight(!self.selected)),
        ]);
        frame.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            chunks[1],
        );
    }
}
