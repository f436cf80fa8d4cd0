//! # showermon-core - Core Domain Types
//!
//! Foundation crate for Shower Monitor. Provides the sensor line protocol,
//! the rolling-history trend detector, reading/log record types, error
//! handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Protocol (`message`)
//! - [`SensorMessage`] - Classified sensor line (temperature, shower notices, unrecognized)
//!
//! ### Trend Detection (`trend`)
//! - [`TrendDetector`] - Warming/cooling detection over a fixed-length [`History`]
//! - [`Trend`] - Classification of the latest reading
//! - [`TrendSettings`] - Window length and thresholds
//!
//! ### Readings (`reading`)
//! - [`Reading`] - Temperature plus observation time
//! - [`LogEntry`] - CSV record appended to the data log
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use showermon_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod message;
pub mod prelude;
pub mod reading;
pub mod trend;

pub use error::{Error, Result, ResultExt};
pub use message::{SensorMessage, SHOWER_COUNT_MARKER, SHOWER_QUERY_MARKER, TEMPERATURE_MARKER};
pub use reading::{format_timestamp, LogEntry, Reading, LOG_HEADER, LOG_TIMESTAMP_FORMAT};
pub use trend::{
    History, Trend, TrendDetector, TrendSettings, DEFAULT_COOLING_CHANGE, DEFAULT_HISTORY_LENGTH,
    DEFAULT_WARMING_CHANGE,
};
