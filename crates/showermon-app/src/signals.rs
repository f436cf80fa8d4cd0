//! Termination signals mapped onto the shutdown flag

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use showermon_core::prelude::*;

/// Flip `shutdown_tx` to `true` on SIGINT/SIGTERM (Ctrl+C on Windows)
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) -> JoinHandle<()> {
    tokio::spawn(forward_shutdown(termination(), shutdown_tx))
}

/// Set the shutdown flag once `signal` resolves successfully.
///
/// A failed listener leaves the flag alone; the loop then only stops on end
/// of input or a fatal error.
async fn forward_shutdown<F>(signal: F, shutdown_tx: watch::Sender<bool>)
where
    F: Future<Output = Result<&'static str>>,
{
    match signal.await {
        Ok(name) => {
            info!("{} received, shutting down", name);
            let _ = shutdown_tx.send(true);
        }
        Err(e) => warn!("Not listening for termination signals: {}", e),
    }
}

#[cfg(unix)]
async fn termination() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let listen = |kind: SignalKind, name: &str| {
        signal(kind).map_err(|e| Error::signal(format!("{} listener: {}", name, e)))
    };
    let mut interrupt = listen(SignalKind::interrupt(), "SIGINT")?;
    let mut terminate = listen(SignalKind::terminate(), "SIGTERM")?;

    Ok(tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    })
}

#[cfg(windows)]
async fn termination() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::signal(format!("Ctrl+C listener: {}", e)))?;
    Ok("Ctrl+C")
}
