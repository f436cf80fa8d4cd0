//! showermon-app - Application layer for Shower Monitor
//!
//! Ties the sensor line sources to the data log and operator status output:
//! - [`Monitor`] per-line processing (classify, log, detect trends)
//! - [`CsvLogSink`] append-only CSV data log
//! - [`StatusReporter`] text or NDJSON status events on stdout
//! - [`run`] / [`run_loop`] the async event loop and its setup
//! - [`config`] settings file and command-line overrides

pub mod config;
pub mod log_sink;
pub mod monitor;
pub mod runner;
pub mod signals;
pub mod status;

pub use config::{RunOptions, Settings, StatusFormat};
pub use log_sink::CsvLogSink;
pub use monitor::Monitor;
pub use runner::{resolve_settings, run, run_loop, StopReason};
pub use status::{StatusEvent, StatusReporter};
