use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;

/// Destination folders are named in this format, e.g. `2024-01-05`.
pub const FOLDER_FORMAT: &str = "%Y-%m-%d";

/// The calendar date, in local time, on which `time` falls.
pub fn local_date(time: SystemTime) -> NaiveDate {
    DateTime::<Local>::from(time).date_naive()
}

pub fn folder_name(date: NaiveDate) -> String {
    date.format(FOLDER_FORMAT).to_string()
}

/// Recognizes folders named by a previous run.
///
/// Chrono alone is too forgiving here (it will happily parse `2024-1-5`), so the shape of the
/// name is checked first and the calendar second.
pub struct DateFolders {
    pattern: Regex,
}

impl DateFolders {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(),
        }
    }

    pub fn parse(&self, name: &str) -> Option<NaiveDate> {
        if !self.pattern.is_match(name) {
            return None;
        }
        NaiveDate::parse_from_str(name, FOLDER_FORMAT).ok()
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.parse(name).is_some()
    }
}

/// Noon, local time, on the given day. Noon never falls in a DST gap.
#[cfg(test)]
pub fn local_noon(year: i32, month: u32, day: u32) -> SystemTime {
    local_time(year, month, day, 12, 0)
}

#[cfg(test)]
pub fn local_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> SystemTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .and_then(|time| time.and_local_timezone(Local).single())
        .unwrap()
        .into()
}
