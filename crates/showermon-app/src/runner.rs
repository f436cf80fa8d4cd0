//! Runner - the monitoring event loop
//!
//! Wires the line reader thread, the signal handler, the [`Monitor`] and the
//! status reporter together, then processes lines one at a time until
//! shutdown, end of input, or a fatal error.

use std::io::BufReader;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use showermon_core::prelude::*;
use showermon_core::TrendDetector;
use showermon_serial::{
    spawn_line_reader, LineSource, ReaderLineSource, SerialLineSource, SourceEvent,
    LINE_CHANNEL_CAPACITY,
};

use crate::config::{self, RunOptions, Settings};
use crate::log_sink::CsvLogSink;
use crate::monitor::Monitor;
use crate::signals;
use crate::status::{StatusEvent, StatusReporter};

/// Why the loop ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// SIGINT/SIGTERM (or Ctrl+C)
    Shutdown,
    /// The line source reached end of input
    SourceClosed,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Shutdown => write!(f, "shutdown requested"),
            StopReason::SourceClosed => write!(f, "end of input"),
        }
    }
}

/// Application entry point
pub async fn run(options: RunOptions) -> Result<()> {
    color_eyre::install().map_err(|e| Error::init(e.to_string()))?;

    showermon_core::logging::init()?;

    info!("═══════════════════════════════════════════════════════");
    info!("Shower Monitor starting");
    info!("═══════════════════════════════════════════════════════");

    let settings = resolve_settings(&options)?;
    info!("Settings: {:?}", settings);

    // Both handles are held for the lifetime of the loop; failing to open
    // either one is fatal.
    let sink = CsvLogSink::open(&settings.log.path).context("Opening data log")?;
    let source = open_source(&options, &settings).context("Opening line source")?;
    let source_name = source.name();

    let mut reporter = StatusReporter::stdout(settings.status.format);
    let mut monitor = Monitor::new(TrendDetector::new(settings.trend)?, sink);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let _signals = signals::spawn_signal_handler(shutdown_tx.clone());

    let (line_tx, line_rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
    // Not joined: a reader blocked on stdin only returns at EOF.
    let _reader = spawn_line_reader(source, line_tx, shutdown_rx.clone());

    reporter.emit(&StatusEvent::Started {
        source: source_name,
        log_file: settings.log.path.display().to_string(),
    });

    let result = run_loop(&mut monitor, &mut reporter, line_rx, shutdown_rx).await;
    let _ = shutdown_tx.send(true);

    let reason = match &result {
        Ok(reason) => reason.to_string(),
        Err(e) => e.to_string(),
    };
    reporter.emit(&StatusEvent::Stopped {
        reason: reason.clone(),
    });

    info!(
        "Shower Monitor exiting ({}), {} readings logged",
        reason,
        monitor.sink().records_written()
    );

    result.map(|_| ())
}

/// Load the settings file, apply command-line overrides and validate
pub fn resolve_settings(options: &RunOptions) -> Result<Settings> {
    let mut settings = match &options.config {
        Some(path) => config::load_settings_file(path)?,
        None => {
            let cwd = std::env::current_dir()?;
            config::load_settings(&cwd)
        }
    };

    settings.apply_overrides(options);
    settings.validate()?;
    Ok(settings)
}

fn open_source(options: &RunOptions, settings: &Settings) -> Result<Box<dyn LineSource>> {
    if options.stdin {
        info!("Reading sensor lines from stdin");
        return Ok(Box::new(ReaderLineSource::new(
            BufReader::new(std::io::stdin()),
            "stdin",
        )));
    }

    let source = SerialLineSource::open(
        &settings.serial.port,
        settings.serial.baud_rate,
        Duration::from_millis(settings.serial.timeout_ms),
    )?;
    Ok(Box::new(source))
}

/// Process line events until shutdown, end of input, or a fatal error.
///
/// Lines are handled strictly one at a time in arrival order. A shutdown
/// signal takes effect between lines, never in the middle of one.
pub async fn run_loop(
    monitor: &mut Monitor,
    reporter: &mut StatusReporter,
    mut line_rx: mpsc::Receiver<SourceEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<StopReason> {
    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    info!("Shutdown requested");
                    return Ok(StopReason::Shutdown);
                }
            }

            event = line_rx.recv() => match event {
                Some(SourceEvent::Line(line)) => {
                    for status in monitor.handle_line(&line)? {
                        reporter.emit(&status);
                    }
                }
                Some(SourceEvent::Skipped { line, reason }) => {
                    reporter.emit(&StatusEvent::ParseFailed { line, reason });
                }
                Some(SourceEvent::Closed) => {
                    info!("Line source closed");
                    return Ok(StopReason::SourceClosed);
                }
                Some(SourceEvent::Failed(e)) => {
                    error!("Line source failed: {}", e);
                    return Err(e);
                }
                None => return Err(Error::ChannelClosed),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatusFormat;
    use crate::status::test_support::SharedBuffer;
    use tempfile::{tempdir, TempDir};

    struct Harness {
        temp: TempDir,
        monitor: Monitor,
        buffer: SharedBuffer,
        reporter: StatusReporter,
    }

    fn harness(format: StatusFormat) -> Harness {
        let temp = tempdir().unwrap();
        let sink = CsvLogSink::open(temp.path().join("log.csv")).unwrap();
        let buffer = SharedBuffer::default();
        Harness {
            monitor: Monitor::new(TrendDetector::default(), sink),
            reporter: StatusReporter::new(format, Box::new(buffer.clone())),
            buffer,
            temp,
        }
    }

    #[tokio::test]
    async fn test_processes_lines_until_source_closed() {
        let mut h = harness(StatusFormat::Text);
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tx.send(SourceEvent::Line("TEMP: 20".into())).await.unwrap();
        tx.send(SourceEvent::Line("noise".into())).await.unwrap();
        tx.send(SourceEvent::Line("ShowerOn? 1".into())).await.unwrap();
        tx.send(SourceEvent::Closed).await.unwrap();

        let reason = run_loop(&mut h.monitor, &mut h.reporter, rx, shutdown_rx)
            .await
            .unwrap();

        assert_eq!(reason, StopReason::SourceClosed);
        assert_eq!(
            h.buffer.contents(),
            "Logged temperature. 20\nfilling history buffer...\nShowerOn? 1\n"
        );
        let log = std::fs::read_to_string(h.temp.path().join("log.csv")).unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_source_failure_is_fatal() {
        let mut h = harness(StatusFormat::Text);
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tx.send(SourceEvent::Failed(Error::source_unavailable(
            "/dev/ttyUSB0",
            "unplugged",
        )))
        .await
        .unwrap();

        let err = run_loop(&mut h.monitor, &mut h.reporter, rx, shutdown_rx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_log_write_failure_ends_loop() {
        let sink = CsvLogSink::open("/dev/full").unwrap();
        let mut monitor = Monitor::new(TrendDetector::default(), sink);
        let buffer = SharedBuffer::default();
        let mut reporter = StatusReporter::new(StatusFormat::Text, Box::new(buffer.clone()));
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tx.send(SourceEvent::Line("TEMP: 20".into())).await.unwrap();
        tx.send(SourceEvent::Line("TEMP: 21".into())).await.unwrap();

        let err = run_loop(&mut monitor, &mut reporter, rx, shutdown_rx)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SinkUnavailable { .. }));
        assert!(buffer.contents().is_empty());
        assert_eq!(monitor.detector().warmup_remaining(), 6);
    }

    #[tokio::test]
    async fn test_skipped_bytes_are_reported_and_loop_continues() {
        let mut h = harness(StatusFormat::Json);
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tx.send(SourceEvent::Skipped {
            line: "\u{fffd}\u{fffd}".into(),
            reason: "no line ending within 1024 bytes".into(),
        })
        .await
        .unwrap();
        tx.send(SourceEvent::Line("TEMP: 20".into())).await.unwrap();
        tx.send(SourceEvent::Closed).await.unwrap();

        let reason = run_loop(&mut h.monitor, &mut h.reporter, rx, shutdown_rx)
            .await
            .unwrap();
        assert_eq!(reason, StopReason::SourceClosed);

        let output = h.buffer.contents();
        let first: serde_json::Value =
            serde_json::from_str(output.lines().next().unwrap()).unwrap();
        assert_eq!(first["event"], "parse_failed");
        assert_eq!(h.monitor.sink().records_written(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let mut h = harness(StatusFormat::Text);
        let (_tx, rx) = mpsc::channel::<SourceEvent>(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        shutdown_tx.send(true).unwrap();

        let reason = run_loop(&mut h.monitor, &mut h.reporter, rx, shutdown_rx)
            .await
            .unwrap();
        assert_eq!(reason, StopReason::Shutdown);
        assert!(h.buffer.contents().is_empty());
    }

    #[tokio::test]
    async fn test_reader_gone_without_close_is_error() {
        let mut h = harness(StatusFormat::Text);
        let (tx, rx) = mpsc::channel::<SourceEvent>(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        drop(tx);

        let err = run_loop(&mut h.monitor, &mut h.reporter, rx, shutdown_rx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ChannelClosed));
    }

    #[tokio::test]
    async fn test_parse_failure_does_not_stop_loop() {
        let mut h = harness(StatusFormat::Json);
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tx.send(SourceEvent::Line("TEMP: oops".into())).await.unwrap();
        tx.send(SourceEvent::Line("TEMP: 21".into())).await.unwrap();
        tx.send(SourceEvent::Closed).await.unwrap();

        run_loop(&mut h.monitor, &mut h.reporter, rx, shutdown_rx)
            .await
            .unwrap();

        let output = h.buffer.contents();
        let events: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events[0]["event"], "parse_failed");
        assert_eq!(events[1]["event"], "temperature_logged");
        assert_eq!(events[1]["temperature"], 21.0);
    }

    #[test]
    fn test_resolve_settings_with_explicit_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("showermon.toml");
        std::fs::write(&path, "[serial]\nbaud_rate = 9600\n").unwrap();

        let settings = resolve_settings(&RunOptions {
            config: Some(path),
            json: true,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(settings.serial.baud_rate, 9600);
        assert_eq!(settings.status.format, StatusFormat::Json);
    }

    #[test]
    fn test_resolve_settings_rejects_invalid_override() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("showermon.toml");
        std::fs::write(&path, "").unwrap();

        let err = resolve_settings(&RunOptions {
            config: Some(path),
            baud_rate: Some(0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }
}
