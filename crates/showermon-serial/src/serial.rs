//! Serial port line source for the XBee receiver

use std::io::{BufRead, BufReader};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use showermon_core::prelude::*;

use crate::source::{LineRead, LineSource, ReaderLineSource};

/// Baud rate the XBee radio is configured for
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

/// Read timeout; bounds how long shutdown waits on an idle port
pub const DEFAULT_TIMEOUT_MS: u64 = 1_000;

/// Device path of the USB serial adapter on this platform
pub fn default_port() -> &'static str {
    if cfg!(target_os = "macos") {
        "/dev/tty.usbserial-A700eXpG"
    } else {
        "/dev/ttyUSB0"
    }
}

/// Buffered handle on an open serial port
pub type SerialPortReader = BufReader<Box<dyn SerialPort>>;

/// Line source backed by a serial device
///
/// Unlike [`ReaderLineSource`], end-of-stream is an error here: a serial
/// device only reports EOF when it has gone away.
pub struct SerialLineSource<R = SerialPortReader> {
    inner: ReaderLineSource<R>,
}

impl SerialLineSource {
    /// Open `port` and discard anything already sitting in the input buffer.
    pub fn open(port: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let serial = serialport::new(port, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| Error::source_unavailable(port, e.to_string()))?;

        serial
            .clear(ClearBuffer::Input)
            .map_err(|e| Error::source_unavailable(port, e.to_string()))?;

        info!("Opened serial port {} at {} baud", port, baud_rate);

        Ok(Self::from_reader(BufReader::new(serial), port))
    }
}

impl<R: BufRead + Send> SerialLineSource<R> {
    /// Wrap an already-open byte stream with serial end-of-stream semantics.
    pub fn from_reader(reader: R, name: impl Into<String>) -> Self {
        Self {
            inner: ReaderLineSource::new(reader, name),
        }
    }
}

impl<R: BufRead + Send> LineSource for SerialLineSource<R> {
    fn read_line(&mut self) -> Result<LineRead> {
        match self.inner.read_line()? {
            LineRead::Closed => Err(Error::source_unavailable(
                self.inner.name(),
                "device closed the connection",
            )),
            other => Ok(other),
        }
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}
