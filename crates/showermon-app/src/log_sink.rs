//! Append-only CSV data log
//!
//! ```text
//! #Datetime, temperature
//! 18 October 2026 07:00:00,21.5
//! 18 October 2026 07:00:10,21.75
//! ```
//!
//! A new file gets the header line; an existing file is appended to as-is.
//! Every record is written with a single `write_all` and flushed, so a reader
//! tailing the file never sees a partial line.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use showermon_core::prelude::*;
use showermon_core::{LogEntry, LOG_HEADER};

/// Open handle on the data log file
#[derive(Debug)]
pub struct CsvLogSink {
    path: PathBuf,
    file: File,
    records_written: u64,
}

impl CsvLogSink {
    /// Open `path` for appending, creating it with a header if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let file = match OpenOptions::new().append(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(format!("{}\n", LOG_HEADER).as_bytes())
                    .and_then(|_| file.flush())
                    .map_err(|e| Error::sink_unavailable(&path, e.to_string()))?;
                info!("Created data log {}", path.display());
                file
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let file = OpenOptions::new()
                    .append(true)
                    .open(&path)
                    .map_err(|e| Error::sink_unavailable(&path, e.to_string()))?;
                info!("Appending to existing data log {}", path.display());
                file
            }
            Err(e) => return Err(Error::sink_unavailable(&path, e.to_string())),
        };

        Ok(Self {
            path,
            file,
            records_written: 0,
        })
    }

    /// Append one record and flush it to disk.
    pub fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let record = format!("{}\n", entry.to_csv_line());
        self.file
            .write_all(record.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|e| Error::sink_unavailable(&self.path, e.to_string()))?;

        self.records_written += 1;
        trace!("Appended record {}: {}", self.records_written, record.trim_end());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended since this handle was opened
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}
