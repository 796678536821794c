//! Background reminder polling
//!
//! A dedicated thread wakes on a fixed interval, snapshots the task store and
//! reports tasks whose due time falls inside one of the lead windows.

use chrono::{Local, NaiveDateTime, TimeDelta};
use std::fmt;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Result, TaskError};
use crate::task::{Task, TaskId};
use crate::task_store::SharedStore;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    /// Due between 24 and 25 hours from now.
    DayAhead,
    /// Due within the next hour.
    DueNow,
}

impl ReminderKind {
    /// Lead window for a task due `delta` from now. Overdue tasks fall in no
    /// window and are never reminded again.
    pub fn for_delta(delta: TimeDelta) -> Option<Self> {
        if delta >= TimeDelta::hours(24) && delta < TimeDelta::hours(25) {
            Some(ReminderKind::DayAhead)
        } else if delta >= TimeDelta::zero() && delta < TimeDelta::hours(1) {
            Some(ReminderKind::DueNow)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub task_id: TaskId,
    pub description: String,
    pub kind: ReminderKind,
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReminderKind::DayAhead => {
                write!(f, "Reminder: 24 hours until '{}'.", self.description)
            }
            ReminderKind::DueNow => write!(f, "Reminder: It's time for '{}'.", self.description),
        }
    }
}

/// One pass over `tasks`, comparing every due time against the same `now`.
pub fn scan(tasks: &[Task], now: NaiveDateTime) -> Vec<Reminder> {
    tasks
        .iter()
        .filter(|t| !t.completed)
        .filter_map(|t| {
            ReminderKind::for_delta(t.due_at - now).map(|kind| Reminder {
                task_id: t.id,
                description: t.description.clone(),
                kind,
            })
        })
        .collect()
}

/// Where reminders go once a scan has produced them.
pub trait Notifier: Send + 'static {
    fn notify(&self, reminder: &Reminder) -> Result<()>;
}

impl<F> Notifier for F
where
    F: Fn(&Reminder) -> Result<()> + Send + 'static,
{
    fn notify(&self, reminder: &Reminder) -> Result<()> {
        self(reminder)
    }
}

/// Hands reminders to the UI thread.
pub struct ChannelNotifier {
    tx: mpsc::Sender<Reminder>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<Reminder>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, reminder: &Reminder) -> Result<()> {
        self.tx
            .send(reminder.clone())
            .map_err(|_| TaskError::NotifierClosed)
    }
}

pub struct ReminderMonitor<N: Notifier> {
    store: SharedStore,
    notifier: N,
}

impl<N: Notifier> ReminderMonitor<N> {
    pub fn new(store: SharedStore, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Runs one scan against `now` and delivers the results. Returns how many
    /// reminders were delivered successfully.
    pub fn scan_now(&self, now: NaiveDateTime) -> usize {
        // Snapshot first so delivery never happens under the store lock.
        let tasks = self.store.lock().list();
        let reminders = scan(&tasks, now);
        debug!(tasks = tasks.len(), due = reminders.len(), "reminder scan");

        let mut delivered = 0;
        for reminder in &reminders {
            match self.notifier.notify(reminder) {
                Ok(()) => delivered += 1,
                Err(err) => warn!(task = %reminder.task_id, "failed to deliver reminder: {}", err),
            }
        }
        delivered
    }

    /// Starts the polling thread. It scans immediately, then once per
    /// `interval`, until the process exits.
    pub fn spawn(
        store: SharedStore,
        interval: Duration,
        notifier: N,
    ) -> std::io::Result<thread::JoinHandle<()>> {
        let monitor = Self::new(store, notifier);
        info!(interval_secs = interval.as_secs(), "starting reminder monitor");
        thread::Builder::new()
            .name("reminder-monitor".to_string())
            .spawn(move || loop {
                monitor.scan_now(Local::now().naive_local());
                thread::sleep(interval);
            })
    }
}
