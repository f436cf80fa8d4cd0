//! Temperature readings and their CSV log representation

use chrono::{DateTime, Local};
use serde::Serialize;

/// strftime pattern for the log file timestamp column
pub const LOG_TIMESTAMP_FORMAT: &str = "%d %B %Y %H:%M:%S";

/// Header written as the first line of a newly created log file
pub const LOG_HEADER: &str = "#Datetime, temperature";

/// A single temperature sample and the moment it was observed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub temperature: f64,
    pub observed_at: DateTime<Local>,
}

impl Reading {
    pub fn new(temperature: f64, observed_at: DateTime<Local>) -> Self {
        Self {
            temperature,
            observed_at,
        }
    }

    /// The record appended to the log file for this reading
    pub fn log_entry(&self) -> LogEntry {
        LogEntry {
            timestamp: self.observed_at,
            temperature: self.temperature,
        }
    }
}

/// A `(timestamp, temperature)` record in the append-only log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub temperature: f64,
}

impl LogEntry {
    /// Render as a CSV line without the trailing newline
    ///
    /// `18 October 2026 07:00:00,21.5`
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{}",
            format_timestamp(&self.timestamp),
            self.temperature
        )
    }
}

/// Format a timestamp the way the log file and the text status output do
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(LOG_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 18, h, m, s).unwrap()
    }

    #[test]
    fn test_csv_line_format() {
        let entry = Reading::new(21.5, at(7, 5, 9)).log_entry();
        assert_eq!(entry.to_csv_line(), "18 October 2026 07:05:09,21.5");
    }

    #[test]
    fn test_whole_number_has_no_fraction() {
        let entry = Reading::new(20.0, at(23, 59, 59)).log_entry();
        assert_eq!(entry.to_csv_line(), "18 October 2026 23:59:59,20");
    }

    #[test]
    fn test_negative_temperature() {
        let entry = Reading::new(-3.25, at(0, 0, 0)).log_entry();
        assert!(entry.to_csv_line().ends_with(",-3.25"));
    }

    #[test]
    fn test_log_entry_keeps_reading_fields() {
        let reading = Reading::new(19.75, at(12, 0, 0));
        let entry = reading.log_entry();
        assert_eq!(entry.timestamp, reading.observed_at);
        assert_eq!(entry.temperature, reading.temperature);
    }
}
