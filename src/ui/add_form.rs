use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use super::dialogs::DialogResult;
use crate::due::{DueInput, Meridiem, TimeFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Description,
    Date,
    Time,
    Meridiem,
}

/// What the form hands back on Enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    pub description: String,
    pub due: DueInput,
}

pub struct AddTaskForm {
    time_format: TimeFormat,
    description: Input,
    date: Input,
    time: Input,
    meridiem: Meridiem,
    focus: Field,
}

impl AddTaskForm {
    pub fn new(time_format: TimeFormat) -> Self {
        Self {
            time_format,
            description: Input::default(),
            date: Input::default(),
            time: Input::default(),
            meridiem: Meridiem::default(),
            focus: Field::Description,
        }
    }

    pub fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    fn fields(&self) -> &'static [Field] {
        if self.time_format.uses_meridiem() {
            &[Field::Description, Field::Date, Field::Time, Field::Meridiem]
        } else {
            &[Field::Description, Field::Date, Field::Time]
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    fn focused_input(&mut self) -> Option<&mut Input> {
        match self.focus {
            Field::Description => Some(&mut self.description),
            Field::Date => Some(&mut self.date),
            Field::Time => Some(&mut self.time),
            Field::Meridiem => None,
        }
    }

    /// Empties the text fields after a successful add. The AM/PM choice stays.
    pub fn clear(&mut self) {
        self.description.reset();
        self.date.reset();
        self.time.reset();
        self.focus = Field::Description;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResult<NewTaskData> {
        match key.code {
            KeyCode::Esc => DialogResult::Cancel,
            KeyCode::Enter => DialogResult::Submit(NewTaskData {
                description: self.description.value().to_string(),
                due: DueInput::new(self.date.value(), self.time.value(), self.meridiem),
            }),
            KeyCode::Tab | KeyCode::Down => {
                self.cycle_focus(true);
                DialogResult::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.cycle_focus(false);
                DialogResult::Continue
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.focus == Field::Meridiem => {
                self.meridiem = self.meridiem.toggle();
                DialogResult::Continue
            }
            _ => {
                if let Some(input) = self.focused_input() {
                    input.handle_event(&Event::Key(key));
                }
                DialogResult::Continue
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Add Task ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(1); 3];
        if self.time_format.uses_meridiem() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .spacing(1)
            .constraints(constraints)
            .split(inner);

        let time_label = match self.time_format {
            TimeFormat::TwelveHour => "Time (HH:MM):",
            TimeFormat::TwentyFourHour => "Time (HH:MM, 24h):",
        };
        let text_fields = [
            (Field::Description, "Task:", &self.description),
            (Field::Date, "Date (YYYY-MM-DD):", &self.date),
            (Field::Time, time_label, &self.time),
        ];
        for (i, (field, label, input)) in text_fields.into_iter().enumerate() {
            render_text_field(frame, rows[i], label, input, self.focus == field);
        }

        if self.time_format.uses_meridiem() {
            let focused = self.focus == Field::Meridiem;
            let choice = |m: Meridiem| {
                let marker = if self.meridiem == m { "(*)" } else { "( )" };
                let style = if focused && self.meridiem == m {
                    Style::default().fg(Color::Cyan).bold()
                } else {
                    Style::default()
                };
                Span::styled(format!("{} {}", marker, m), style)
            };
            let label_style = if focused {
                Style::default().fg(Color::Cyan).underlined()
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled("AM/PM:", label_style),
                Span::raw(" "),
                choice(Meridiem::Am),
                Span::raw("  "),
                choice(Meridiem::Pm),
            ]);
            frame.render_widget(Paragraph::new(line), rows[3]);
        }
    }
}

fn render_text_field(frame: &mut Frame, area: Rect, label: &str, input: &Input, focused: bool) {
    let (label_style, value_style) = if focused {
        (
            Style::default().fg(Color::Cyan).underlined(),
            Style::default().fg(Color::Cyan),
        )
    } else {
        (Style::default(), Style::default())
    };

    let value = input.value();
    let mut spans = vec![Span::styled(label, label_style), Span::raw(" ")];
    if focused {
        let cursor = input.visual_cursor();
        let before: String = value.chars().take(cursor).collect();
        let at: String = value
            .chars()
            .nth(cursor)
            .map(String::from)
            .unwrap_or_else(|| " ".to_string());
        let after: String = value.chars().skip(cursor + 1).collect();
        spans.push(Span::styled(before, value_style));
        spans.push(Span::styled(at, Style::default().fg(Color::Black).bg(Color::Cyan)));
        spans.push(Span::styled(after, value_style));
    } else {
        spans.push(Span::styled(value, value_style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
