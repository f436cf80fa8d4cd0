//! Sensor line protocol
//!
//! The XBee relay forwards plain text lines from the shower sensor:
//!
//! ```text
//! TEMP: 21.50
//! ShowerOn? 1
//! NUMBER OF SHOWERS?: 3
//! ```
//!
//! Markers are matched by substring containment in the order
//! `TEMP:`, `ShowerOn?`, `NUMBER OF SHOWERS?:`. Anything else is ignored.

use crate::error::{Error, Result};

/// Marker for a temperature sample
pub const TEMPERATURE_MARKER: &str = "TEMP:";

/// Marker for the shower-on notice
pub const SHOWER_QUERY_MARKER: &str = "ShowerOn?";

/// Marker for the shower count notice
pub const SHOWER_COUNT_MARKER: &str = "NUMBER OF SHOWERS?:";

/// A classified line from the sensor
#[derive(Debug, Clone, PartialEq)]
pub enum SensorMessage {
    /// `TEMP: <float>`
    Temperature(f64),
    /// Raw line containing `ShowerOn?`
    ShowerQuery(String),
    /// Raw line containing `NUMBER OF SHOWERS?:`
    ShowerCountQuery(String),
    /// No known marker
    Unrecognized,
}

impl SensorMessage {
    /// Classify one line of sensor output.
    ///
    /// Trailing `\n` / `\r\n` are stripped before matching. A `TEMP:` line
    /// whose payload is not a finite number yields [`Error::Parse`].
    pub fn classify(line: &str) -> Result<Self> {
        let line = strip_line_ending(line);

        if let Some(idx) = line.find(TEMPERATURE_MARKER) {
            let payload = &line[idx + TEMPERATURE_MARKER.len()..];
            return parse_temperature(line, payload).map(SensorMessage::Temperature);
        }

        if line.contains(SHOWER_QUERY_MARKER) {
            return Ok(SensorMessage::ShowerQuery(line.to_string()));
        }

        if line.contains(SHOWER_COUNT_MARKER) {
            return Ok(SensorMessage::ShowerCountQuery(line.to_string()));
        }

        Ok(SensorMessage::Unrecognized)
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn parse_temperature(line: &str, payload: &str) -> Result<f64> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(Error::parse(line, "missing temperature value"));
    }

    let value: f64 = payload
        .parse()
        .map_err(|e: std::num::ParseFloatError| Error::parse(line, e.to_string()))?;

    if !value.is_finite() {
        return Err(Error::parse(line, "temperature is not a finite number"));
    }

    Ok(value)
}
