//! Due date/time entry formats

use chrono::NaiveDateTime;
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Result, TaskError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum TimeFormat {
    /// `YYYY-MM-DD HH:MM` plus an AM/PM selector
    #[default]
    #[serde(rename = "12h")]
    #[value(name = "12h")]
    TwelveHour,
    /// `YYYY-MM-DD HH:MM` on a 24-hour clock
    #[serde(rename = "24h")]
    #[value(name = "24h")]
    TwentyFourHour,
}

// chrono skips padding and accepts signed years, so the shape is checked first.
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap());
static TIME_SHAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}$").unwrap());

impl TimeFormat {
    /// Pattern shown to the user in prompts and validation errors.
    pub fn pattern(&self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "YYYY-MM-DD HH:MM AM/PM",
            TimeFormat::TwentyFourHour => "YYYY-MM-DD HH:MM",
        }
    }

    pub fn uses_meridiem(&self) -> bool {
        matches!(self, TimeFormat::TwelveHour)
    }

    pub fn parse(&self, input: &DueInput) -> Result<NaiveDateTime> {
        let date = input.date.trim();
        let time = input.time.trim();
        if !DATE_SHAPE.is_match(date) || !TIME_SHAPE.is_match(time) {
            return Err(TaskError::InvalidDueFormat(*self));
        }
        let parsed = match self {
            TimeFormat::TwelveHour => NaiveDateTime::parse_from_str(
                &format!("{} {} {}", date, time, input.meridiem),
                "%Y-%m-%d %I:%M %p",
            ),
            TimeFormat::TwentyFourHour => {
                NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M")
            }
        };
        parsed.map_err(|_| TaskError::InvalidDueFormat(*self))
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::TwelveHour => write!(f, "12h"),
            TimeFormat::TwentyFourHour => write!(f, "24h"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Meridiem {
    #[default]
    Am,
    Pm,
}

impl Meridiem {
    pub fn toggle(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => write!(f, "AM"),
            Meridiem::Pm => write!(f, "PM"),
        }
    }
}

/// Raw due-time strings as typed into the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueInput {
    pub date: String,
    pub time: String,
    /// Ignored by the 24-hour format.
    pub meridiem: Meridiem,
}

impl DueInput {
    pub fn new(date: impl Into<String>, time: impl Into<String>, meridiem: Meridiem) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            meridiem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_twelve_hour_pm() {
        let input = DueInput::new("2024-03-09", "2:05", Meridiem::Pm);
        let parsed = TimeFormat::TwelveHour.parse(&input).unwrap();
        assert_eq!(parsed, at(2024, 3, 9, 14, 5));
    }

    #[test]
    fn test_twelve_hour_midnight_and_noon() {
        let midnight = DueInput::new("2024-03-09", "12:00", Meridiem::Am);
        assert_eq!(TimeFormat::TwelveHour.parse(&midnight).unwrap().hour(), 0);

        let noon = DueInput::new("2024-03-09", "12:00", Meridiem::Pm);
        assert_eq!(TimeFormat::TwelveHour.parse(&noon).unwrap().hour(), 12);
    }

    #[test]
    fn test_twelve_hour_rejects_out_of_range_hour() {
        let input = DueInput::new("2024-03-09", "13:00", Meridiem::Pm);
        assert!(matches!(
            TimeFormat::TwelveHour.parse(&input),
            Err(TaskError::InvalidDueFormat(TimeFormat::TwelveHour))
        ));
    }

    #[test]
    fn test_twenty_four_hour() {
        let input = DueInput::new("2024-03-09", "23:59", Meridiem::Am);
        let parsed = TimeFormat::TwentyFourHour.parse(&input).unwrap();
        assert_eq!(parsed, at(2024, 3, 9, 23, 59));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let input = DueInput::new(" 2024-03-09 ", " 08:30\n", Meridiem::Am);
        let parsed = TimeFormat::TwentyFourHour.parse(&input).unwrap();
        assert_eq!(parsed, at(2024, 3, 9, 8, 30));
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        let cases = [
            ("", ""),
            ("2024-03-09", ""),
            ("09/03/2024", "10:00"),
            ("2024-02-30", "10:00"),
            ("2024-03-09", "10"),
            ("2024-03-09", "10:00:00"),
            ("tomorrow", "noon"),
            ("2024- 3- 9", "10:00"),
            ("2024-03-09", "10:  00"),
            ("+2024-03-09", "10:00"),
        ];
        for (date, time) in cases {
            let input = DueInput::new(date, time, Meridiem::Am);
            assert!(
                TimeFormat::TwentyFourHour.parse(&input).is_err(),
                "24h accepted {date:?} {time:?}"
            );
            assert!(
                TimeFormat::TwelveHour.parse(&input).is_err(),
                "12h accepted {date:?} {time:?}"
            );
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TaskError::InvalidDueFormat(TimeFormat::TwelveHour).to_string(),
            "Invalid date/time format. Please use YYYY-MM-DD HH:MM AM/PM."
        );
        assert_eq!(
            TaskError::InvalidDueFormat(TimeFormat::TwentyFourHour).to_string(),
            "Invalid date/time format. Please use YYYY-MM-DD HH:MM."
        );
    }

    #[test]
    fn test_meridiem_toggle() {
        assert_eq!(Meridiem::default(), Meridiem::Am);
        assert_eq!(Meridiem::Am.toggle(), Meridiem::Pm);
        assert_eq!(Meridiem::Pm.toggle(), Meridiem::Am);
    }

    #[test]
    fn test_time_format_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: TimeFormat,
        }
        let w: Wrapper = toml::from_str(r#"format = "24h""#).unwrap();
        assert_eq!(w.format, TimeFormat::TwentyFourHour);
    }
}
