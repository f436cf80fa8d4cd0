//! Blocking line sources
//!
//! A [`LineSource`] hands out one newline-terminated line at a time. Timeouts
//! are reported separately from end-of-stream so the reader thread can check
//! for shutdown without losing a partially received line.

use std::io::{BufRead, ErrorKind, Read};

use showermon_core::prelude::*;

/// Longest line accepted before the bytes are discarded
///
/// Sensor lines are a few dozen bytes; anything this long is line noise, e.g.
/// from a baud-rate mismatch.
pub const MAX_LINE_BYTES: usize = 1024;

/// Outcome of a single blocking read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRead {
    /// A complete line with `\n` / `\r\n` stripped
    Line(String),
    /// No complete line arrived before the read timeout
    Timeout,
    /// The stream reached end-of-file
    Closed,
}

/// Something that yields text lines, blocking until one is available
#[cfg_attr(test, mockall::automock)]
pub trait LineSource: Send {
    /// Block until the next line, a timeout, or end-of-stream.
    fn read_line(&mut self) -> Result<LineRead>;

    /// Human-readable name used in logs and errors (device path, "stdin", ...)
    fn name(&self) -> String;
}

/// [`LineSource`] over any buffered reader
///
/// Bytes received before a timeout are kept and completed by the next read.
/// Invalid UTF-8 is replaced rather than rejected. A line longer than
/// [`MAX_LINE_BYTES`] is dropped up to its newline and reported once as a
/// recoverable [`Error::Parse`].
pub struct ReaderLineSource<R> {
    reader: R,
    name: String,
    pending: Vec<u8>,
    discarding: bool,
}

impl<R: BufRead + Send> ReaderLineSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            pending: Vec::new(),
            discarding: false,
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.pending)
            .trim_end_matches(['\n', '\r'])
            .to_string();
        self.pending.clear();
        line
    }

    fn discard_overlong(&mut self) -> Error {
        let preview: String = String::from_utf8_lossy(&self.pending)
            .chars()
            .take(32)
            .collect();
        self.pending.clear();
        self.discarding = true;
        warn!("{}: dropping line longer than {} bytes", self.name, MAX_LINE_BYTES);
        Error::parse(
            preview,
            format!("no line ending within {} bytes", MAX_LINE_BYTES),
        )
    }
}

impl<R: BufRead + Send> LineSource for ReaderLineSource<R> {
    fn read_line(&mut self) -> Result<LineRead> {
        loop {
            let budget = (MAX_LINE_BYTES + 1).saturating_sub(self.pending.len()) as u64;
            let read = (&mut self.reader)
                .take(budget)
                .read_until(b'\n', &mut self.pending);

            match read {
                // Tail of an overlong line; drop through its newline
                Ok(n) if self.discarding => {
                    let ended = self.pending.ends_with(b"\n");
                    self.pending.clear();
                    if ended || n == 0 {
                        self.discarding = false;
                    }
                    if n == 0 {
                        return Ok(LineRead::Closed);
                    }
                }
                Ok(_) if self.pending.ends_with(b"\n") => {
                    return Ok(LineRead::Line(self.take_line()))
                }
                Ok(_) if self.pending.len() > MAX_LINE_BYTES => {
                    return Err(self.discard_overlong())
                }
                Ok(0) if self.pending.is_empty() => return Ok(LineRead::Closed),
                // Last line without a trailing newline
                Ok(0) => return Ok(LineRead::Line(self.take_line())),
                // Hit EOF mid-line; the next read returns 0
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(LineRead::Timeout)
                }
                Err(e) => return Err(Error::source_unavailable(&self.name, e.to_string())),
            }
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
