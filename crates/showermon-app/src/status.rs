//! Operator-facing status output
//!
//! Status events are not persisted. In `text` mode they are printed as short
//! human-readable lines; in `json` mode as NDJSON (one object per line, with an
//! `"event"` field naming the type).
//!
//! # Example Output
//!
//! ```json
//! {"event":"temperature_logged","temperature":21.5,"timestamp":"2026-10-18T07:00:00+02:00"}
//! {"event":"warming","temperature":24.0,"delta":4.0,"timestamp":"2026-10-18T07:01:00+02:00"}
//! {"event":"shower_query","line":"ShowerOn? 1"}
//! ```

use std::io::{self, Write};

use chrono::{DateTime, Local};
use serde::Serialize;

use showermon_core::format_timestamp;
use showermon_core::prelude::*;

use crate::config::StatusFormat;

/// Events reported to the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StatusEvent {
    /// Monitoring started
    Started { source: String, log_file: String },

    /// A temperature reading was appended to the data log
    TemperatureLogged {
        temperature: f64,
        timestamp: DateTime<Local>,
    },

    /// Not enough readings yet to detect a trend
    HistoryFilling { remaining: usize },

    /// Temperature is rising; a shower probably started
    Warming {
        temperature: f64,
        delta: f64,
        timestamp: DateTime<Local>,
    },

    /// Temperature is falling; a shower probably ended
    Cooling {
        temperature: f64,
        delta: f64,
        timestamp: DateTime<Local>,
    },

    /// `ShowerOn?` notice from the sensor
    ShowerQuery { line: String },

    /// `NUMBER OF SHOWERS?:` notice from the sensor
    ShowerCount { line: String },

    /// A `TEMP:` line could not be parsed and was skipped
    ParseFailed { line: String, reason: String },

    /// Monitoring stopped
    Stopped { reason: String },
}

impl StatusEvent {
    /// Render as a single human-readable line
    pub fn to_text(&self) -> String {
        match self {
            StatusEvent::Started { source, log_file } => {
                format!("Listening on {}, logging to {}", source, log_file)
            }
            StatusEvent::TemperatureLogged { temperature, .. } => {
                format!("Logged temperature. {}", temperature)
            }
            StatusEvent::HistoryFilling { .. } => "filling history buffer...".to_string(),
            StatusEvent::Warming { timestamp, .. } => {
                format!("getting warmer at {}", format_timestamp(timestamp))
            }
            StatusEvent::Cooling { timestamp, .. } => {
                format!("getting cooler at {}", format_timestamp(timestamp))
            }
            StatusEvent::ShowerQuery { line } | StatusEvent::ShowerCount { line } => line.clone(),
            StatusEvent::ParseFailed { line, reason } => {
                format!("Skipped unparseable reading {:?}: {}", line, reason)
            }
            StatusEvent::Stopped { reason } => format!("Stopped: {}", reason),
        }
    }
}

/// Writes status events in the configured format
pub struct StatusReporter {
    format: StatusFormat,
    out: Box<dyn Write + Send>,
}

impl StatusReporter {
    pub fn new(format: StatusFormat, out: Box<dyn Write + Send>) -> Self {
        Self { format, out }
    }

    /// Reporter writing to the process stdout
    pub fn stdout(format: StatusFormat) -> Self {
        Self::new(format, Box::new(io::stdout()))
    }

    /// Write one event and flush.
    ///
    /// Failures are logged and otherwise ignored; status output is not
    /// durable state.
    pub fn emit(&mut self, event: &StatusEvent) {
        let line = match self.format {
            StatusFormat::Text => event.to_text(),
            StatusFormat::Json => match serde_json::to_string(event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize status event: {}", e);
                    return;
                }
            },
        };

        if let Err(e) = writeln!(self.out, "{}", line) {
            error!("Failed to write status output: {}", e);
            return;
        }

        if let Err(e) = self.out.flush() {
            error!("Failed to flush status output: {}", e);
        }
    }
}
