//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::due::TimeFormat;

#[derive(Debug, Parser)]
#[command(name = "task-monitor", version, about = "Terminal task tracker with due-time reminders")]
pub struct Cli {
    /// Due time entry format
    #[arg(long, value_enum)]
    pub time_format: Option<TimeFormat>,

    /// Seconds between reminder scans
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write debug logs to this file
    #[arg(long, value_name = "PATH", env = "TASK_MONITOR_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Command-line values win over the config file.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(format) = self.time_format {
            config.time_format = format;
        }
        if let Some(secs) = self.interval {
            config.poll_interval_secs = secs;
        }
        config
    }
}
