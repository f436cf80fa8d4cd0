//! showermon-serial - Line sources for Shower Monitor
//!
//! This crate reads the sensor's text stream:
//! - [`LineSource`] trait and the generic [`ReaderLineSource`] (stdin, files, tests)
//! - [`SerialLineSource`] for the XBee USB serial adapter
//! - [`spawn_line_reader`] blocking reader thread feeding the async runner

pub mod reader;
pub mod serial;
pub mod source;

pub use reader::{read_lines, spawn_line_reader, SourceEvent, LINE_CHANNEL_CAPACITY};
pub use serial::{
    default_port, SerialLineSource, SerialPortReader, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT_MS,
};
pub use source::{LineRead, LineSource, ReaderLineSource};
