//! Terminal user interface
//!
//! A main menu leads to one screen per store operation. Modal dialogs (errors,
//! confirmations, reminders) stack on top of whatever screen is showing.

mod add_form;
pub mod dialogs;

pub use add_form::{AddTaskForm, Field, NewTaskData};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, info};

use crate::due::TimeFormat;
use crate::reminder::{Reminder, ReminderKind};
use crate::task::TaskId;
use crate::task_store::SharedStore;
use dialogs::{ConfirmDialog, DialogResult, MessageDialog};

const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    AddTask,
    DeleteTask,
    DisplayTasks,
    MarkComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    AddTask,
    DeleteTask,
    DisplayTasks,
    MarkComplete,
    Exit,
}

pub const MENU: [MenuItem; 5] = [
    MenuItem::AddTask,
    MenuItem::DeleteTask,
    MenuItem::DisplayTasks,
    MenuItem::MarkComplete,
    MenuItem::Exit,
];

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::AddTask => "Add Task",
            MenuItem::DeleteTask => "Delete Task",
            MenuItem::DisplayTasks => "Display Tasks",
            MenuItem::MarkComplete => "Mark as Complete",
            MenuItem::Exit => "Exit Task Monitor",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            MenuItem::AddTask => 'a',
            MenuItem::DeleteTask => 'd',
            MenuItem::DisplayTasks => 'l',
            MenuItem::MarkComplete => 'm',
            MenuItem::Exit => 'q',
        }
    }
}

struct PendingDelete {
    id: TaskId,
    dialog: ConfirmDialog,
}

struct QueuedMessage {
    dialog: MessageDialog,
    /// Set for reminder dialogs.
    reminder: Option<(TaskId, ReminderKind)>,
}

pub struct App {
    store: SharedStore,
    reminders: mpsc::Receiver<Reminder>,
    screen: Screen,
    menu_state: ListState,
    task_state: ListState,
    add_form: AddTaskForm,
    pending_delete: Option<PendingDelete>,
    messages: VecDeque<QueuedMessage>,
    should_quit: bool,
}

impl App {
    pub fn new(
        store: SharedStore,
        time_format: TimeFormat,
        reminders: mpsc::Receiver<Reminder>,
    ) -> Self {
        Self {
            store,
            reminders,
            screen: Screen::Menu,
            menu_state: ListState::default().with_selected(Some(0)),
            task_state: ListState::default(),
            add_form: AddTaskForm::new(time_format),
            pending_delete: None,
            messages: VecDeque::new(),
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The dialog currently on top, if any.
    pub fn current_message(&self) -> Option<&MessageDialog> {
        self.messages.front().map(|m| &m.dialog)
    }

    /// Number of dialogs waiting to be dismissed.
    pub fn queued_messages(&self) -> usize {
        self.messages.len()
    }

    fn push_message(&mut self, dialog: MessageDialog) {
        self.messages.push_back(QueuedMessage {
            dialog,
            reminder: None,
        });
    }

    pub fn confirm_message(&self) -> Option<&str> {
        self.pending_delete.as_ref().map(|p| p.dialog.message())
    }

    /// Moves any reminders the monitor produced into the dialog queue. A
    /// reminder already waiting for the same task and window is not queued
    /// twice. Returns how many reminders were received.
    pub fn pump_reminders(&mut self) -> usize {
        let mut received = 0;
        while let Ok(reminder) = self.reminders.try_recv() {
            received += 1;
            let origin = (reminder.task_id, reminder.kind);
            if self.messages.iter().any(|m| m.reminder == Some(origin)) {
                debug!(task = %reminder.task_id, "reminder already waiting");
                continue;
            }
            info!(task = %reminder.task_id, "{}", reminder);
            self.messages.push_back(QueuedMessage {
                dialog: MessageDialog::info("Reminder", reminder.to_string()),
                reminder: Some(origin),
            });
        }
        received
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let Some(message) = self.messages.front() {
            if let DialogResult::Submit(()) = message.dialog.handle_key(key) {
                self.messages.pop_front();
            }
            return;
        }

        if let Some(pending) = self.pending_delete.as_mut() {
            match pending.dialog.handle_key(key) {
                DialogResult::Continue => {}
                DialogResult::Cancel => {
                    debug!(task = %pending.id, "deletion declined");
                    self.pending_delete = None;
                }
                DialogResult::Submit(()) => {
                    let id = pending.id;
                    self.pending_delete = None;
                    if self.store.lock().remove(id).is_ok() {
                        info!(task = %id, "task deleted");
                    }
                    self.clamp_task_selection();
                }
            }
            return;
        }

        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::AddTask => self.handle_add_key(key),
            Screen::DeleteTask => self.handle_list_key(key, Self::request_delete),
            Screen::MarkComplete => self.handle_list_key(key, Self::complete_selected),
            Screen::DisplayTasks => self.handle_list_key(key, |_| {}),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let selected = self.menu_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Up => self.menu_state.select(Some(selected.saturating_sub(1))),
            KeyCode::Down => self
                .menu_state
                .select(Some((selected + 1).min(MENU.len() - 1))),
            KeyCode::Enter => self.activate(MENU[selected]),
            KeyCode::Char(c) => {
                if let Some(item) = MENU.iter().find(|item| item.shortcut() == c) {
                    self.activate(*item);
                }
            }
            _ => {}
        }
    }

    fn activate(&mut self, item: MenuItem) {
        self.screen = match item {
            MenuItem::AddTask => Screen::AddTask,
            MenuItem::DeleteTask => Screen::DeleteTask,
            MenuItem::DisplayTasks => Screen::DisplayTasks,
            MenuItem::MarkComplete => Screen::MarkComplete,
            MenuItem::Exit => {
                self.should_quit = true;
                return;
            }
        };
        self.task_state.select(Some(0));
        self.clamp_task_selection();
    }

    fn handle_add_key(&mut self, key: KeyEvent) {
        match self.add_form.handle_key(key) {
            DialogResult::Continue => {}
            DialogResult::Cancel => self.screen = Screen::Menu,
            DialogResult::Submit(data) => {
                let format = self.add_form.time_format();
                let result = self
                    .store
                    .lock()
                    .add_from_input(data.description, &data.due, format);
                match result {
                    Ok(task) => {
                        info!(task = %task.id, "task added");
                        self.push_message(MessageDialog::info("Success", "Task added successfully."));
                        self.add_form.clear();
                    }
                    Err(err) => self.push_message(MessageDialog::error(err.to_string())),
                }
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, on_enter: fn(&mut Self)) {
        let len = self.store.lock().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Menu,
            KeyCode::Up => {
                if let Some(i) = self.task_state.selected() {
                    self.task_state.select(Some(i.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if let Some(i) = self.task_state.selected() {
                    if i + 1 < len {
                        self.task_state.select(Some(i + 1));
                    }
                }
            }
            KeyCode::Enter => on_enter(self),
            _ => {}
        }
    }

    /// Resolves the highlighted row to a task id. `None` when nothing is
    /// selected, which callers treat as a no-op.
    fn selected_task_id(&self) -> Option<TaskId> {
        let index = self.task_state.selected()?;
        self.store.lock().list().get(index).map(|t| t.id)
    }

    fn request_delete(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(description) = self.store.lock().get(id).map(|t| t.description.clone()) else {
            return;
        };
        self.pending_delete = Some(PendingDelete {
            id,
            dialog: ConfirmDialog::new(
                "Confirm Deletion",
                &format!("Are you sure you want to delete '{}'?", description),
            ),
        });
    }

    fn complete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            if self.store.lock().mark_complete(id).is_ok() {
                info!(task = %id, "task completed");
            }
        }
    }

    fn clamp_task_selection(&mut self) {
        let len = self.store.lock().len();
        let clamped = match (len, self.task_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
        self.task_state.select(clamped);
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        match self.screen {
            Screen::Menu => self.render_menu(frame, chunks[0]),
            Screen::AddTask => self.add_form.render(frame, chunks[0]),
            Screen::DeleteTask => self.render_tasks(frame, chunks[0], " Delete Task ", false),
            Screen::DisplayTasks => self.render_tasks(frame, chunks[0], " Tasks ", true),
            Screen::MarkComplete => self.render_tasks(frame, chunks[0], " Mark Complete ", false),
        }

        frame.render_widget(
            Paragraph::new(self.help_line()).style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );

        if let Some(pending) = &self.pending_delete {
            pending.dialog.render(frame, area);
        }
        if let Some(message) = self.messages.front() {
            message.dialog.render(frame, area);
        }
    }

    fn render_menu(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MENU
            .iter()
            .map(|item| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("[{}] ", item.shortcut()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(item.label()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Task Monitor ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.menu_state);
    }

    fn render_tasks(&mut self, frame: &mut Frame, area: Rect, title: &str, detailed: bool) {
        let tasks = self.store.lock().list();
        let items: Vec<ListItem> = tasks
            .iter()
            .map(|t| {
                if detailed {
                    let style = if t.completed {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(Span::styled(t.display_line(), style))
                } else {
                    ListItem::new(Span::raw(t.description.clone()))
                }
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.task_state);
    }

    fn help_line(&self) -> &'static str {
        if !self.messages.is_empty() {
            return " Enter: dismiss";
        }
        if self.pending_delete.is_some() {
            return " y: delete  n/Esc: keep";
        }
        match self.screen {
            Screen::Menu => " Up/Down: move  Enter: select  q: quit",
            Screen::AddTask => " Tab: next field  Enter: add  Esc: back",
            Screen::DeleteTask => " Up/Down: move  Enter: delete  Esc: back",
            Screen::MarkComplete => " Up/Down: move  Enter: mark complete  Esc: back",
            Screen::DisplayTasks => " Up/Down: scroll  Esc: back",
        }
    }
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.pump_reminders();
        terminal.draw(|f| app.render(f))?;

        if app.should_quit() {
            return Ok(());
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
}
