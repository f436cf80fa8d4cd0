//! Monitor - per-line processing context
//!
//! The Monitor owns the trend detector and the data log and turns one raw
//! sensor line into its side effects plus the status events to report. It
//! holds no I/O handles besides the log file, so it can be driven directly
//! from tests.

use chrono::{DateTime, Local};

use showermon_core::prelude::*;
use showermon_core::{Reading, SensorMessage, Trend, TrendDetector};

use crate::log_sink::CsvLogSink;
use crate::status::StatusEvent;

/// Processing state for a single sensor stream
pub struct Monitor {
    detector: TrendDetector,
    sink: CsvLogSink,
}

impl Monitor {
    pub fn new(detector: TrendDetector, sink: CsvLogSink) -> Self {
        Self { detector, sink }
    }

    /// Process one line stamped with the current local time.
    pub fn handle_line(&mut self, line: &str) -> Result<Vec<StatusEvent>> {
        self.handle_line_at(line, Local::now())
    }

    /// Process one line observed at `now`.
    ///
    /// Returns the status events to report. Unparseable readings are
    /// reported as [`StatusEvent::ParseFailed`] and leave history and log
    /// untouched; only a log write failure is returned as an error.
    pub fn handle_line_at(
        &mut self,
        line: &str,
        now: DateTime<Local>,
    ) -> Result<Vec<StatusEvent>> {
        match SensorMessage::classify(line) {
            Ok(SensorMessage::Temperature(value)) => self.record(Reading::new(value, now)),
            Ok(SensorMessage::ShowerQuery(line)) => Ok(vec![StatusEvent::ShowerQuery { line }]),
            Ok(SensorMessage::ShowerCountQuery(line)) => {
                Ok(vec![StatusEvent::ShowerCount { line }])
            }
            Ok(SensorMessage::Unrecognized) => {
                trace!("Ignoring unrecognized line: {:?}", line);
                Ok(Vec::new())
            }
            Err(Error::Parse { line, reason }) => {
                warn!("Skipping unparseable reading {:?}: {}", line, reason);
                Ok(vec![StatusEvent::ParseFailed { line, reason }])
            }
            Err(e) => Err(e),
        }
    }

    /// Log the reading, then feed it to the detector.
    fn record(&mut self, reading: Reading) -> Result<Vec<StatusEvent>> {
        // A failed write leaves the history untouched.
        self.sink.append(&reading.log_entry())?;

        let value = reading.temperature;
        let delta = self.detector.pending_delta(value);
        let trend = self.detector.observe(value);
        debug!("Reading {} -> {} (delta {:?})", value, trend, delta);

        let mut events = vec![StatusEvent::TemperatureLogged {
            temperature: value,
            timestamp: reading.observed_at,
        }];

        match (trend, delta) {
            (Trend::Unknown, _) => events.push(StatusEvent::HistoryFilling {
                remaining: self.detector.warmup_remaining(),
            }),
            (Trend::Warming, Some(delta)) => {
                info!("Getting warmer: {} ({:+})", value, delta);
                events.push(StatusEvent::Warming {
                    temperature: value,
                    delta,
                    timestamp: reading.observed_at,
                });
            }
            (Trend::Cooling, Some(delta)) => {
                info!("Getting cooler: {} ({:+})", value, delta);
                events.push(StatusEvent::Cooling {
                    temperature: value,
                    delta,
                    timestamp: reading.observed_at,
                });
            }
            _ => {}
        }

        Ok(events)
    }

    pub fn detector(&self) -> &TrendDetector {
        &self.detector
    }

    pub fn sink(&self) -> &CsvLogSink {
        &self.sink
    }
}
