//! Dedicated blocking reader thread
//!
//! Owns the [`LineSource`] and forwards what it reads to the async runner as
//! [`SourceEvent`]s, in arrival order. The thread exits after end-of-stream,
//! a fatal read error, a shutdown signal (checked between reads), or when the
//! receiving side goes away.

use std::thread::JoinHandle;

use tokio::sync::{mpsc, watch};

use showermon_core::prelude::*;

use crate::source::{LineRead, LineSource};

/// Capacity of the line channel between reader thread and runner
pub const LINE_CHANNEL_CAPACITY: usize = 64;

/// What the reader thread reports to the runner
#[derive(Debug)]
pub enum SourceEvent {
    /// A complete line
    Line(String),
    /// Bytes that never formed a usable line were dropped
    Skipped { line: String, reason: String },
    /// The source reached end-of-stream
    Closed,
    /// The source failed and the reader stopped
    Failed(Error),
}

/// Spawn the reader thread for `source`.
pub fn spawn_line_reader(
    source: Box<dyn LineSource>,
    tx: mpsc::Sender<SourceEvent>,
    shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut source = source;
        read_lines(source.as_mut(), &tx, &shutdown_rx);
    })
}

/// Blocking read loop; runs on the reader thread.
pub fn read_lines(
    source: &mut dyn LineSource,
    tx: &mpsc::Sender<SourceEvent>,
    shutdown_rx: &watch::Receiver<bool>,
) {
    let name = source.name();
    debug!("Line reader started for {}", name);

    loop {
        if *shutdown_rx.borrow() {
            debug!("Line reader for {} stopping on shutdown", name);
            break;
        }

        let event = match source.read_line() {
            Ok(LineRead::Line(line)) => {
                trace!("{}: {}", name, line);
                SourceEvent::Line(line)
            }
            Ok(LineRead::Timeout) => {
                if tx.is_closed() {
                    debug!("Line channel closed");
                    break;
                }
                continue;
            }
            Ok(LineRead::Closed) => {
                info!("{} reached end of stream", name);
                let _ = tx.blocking_send(SourceEvent::Closed);
                break;
            }
            Err(Error::Parse { line, reason }) => SourceEvent::Skipped { line, reason },
            Err(e) => {
                error!("Reading from {} failed: {}", name, e);
                let _ = tx.blocking_send(SourceEvent::Failed(e));
                break;
            }
        };

        if tx.blocking_send(event).is_err() {
            debug!("Line channel closed");
            break;
        }
    }

    info!("Line reader for {} exiting", name);
}
