//! User interrupt sources
//!
//! An interrupt is a future that resolves when the user asks the run to
//! stop. It is polled only by the monitor's event loop.

use futures::future::BoxFuture;
use tokio::sync::oneshot;

/// Future resolving when the run should be interrupted
pub type Interrupt = BoxFuture<'static, ()>;

/// An interrupt that never fires
pub fn never() -> Interrupt {
    Box::pin(std::future::pending())
}

/// Fires on Ctrl+C
///
/// The listener is registered here rather than on first poll, so a Ctrl+C
/// that arrives while the run is still arming is not lost. Must be called
/// from within a tokio runtime. If the listener cannot be registered the
/// interrupt stays inert.
pub fn ctrl_c() -> Interrupt {
    match listen_ctrl_c() {
        Ok(interrupt) => interrupt,
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            never()
        }
    }
}

#[cfg(unix)]
fn listen_ctrl_c() -> std::io::Result<Interrupt> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    Ok(Box::pin(async move {
        if interrupt.recv().await.is_some() {
            tracing::info!("Received Ctrl+C, stopping run");
        } else {
            std::future::pending::<()>().await;
        }
    }))
}

#[cfg(windows)]
fn listen_ctrl_c() -> std::io::Result<Interrupt> {
    let mut interrupt = tokio::signal::windows::ctrl_c()?;
    Ok(Box::pin(async move {
        if interrupt.recv().await.is_some() {
            tracing::info!("Received Ctrl+C, stopping run");
        } else {
            std::future::pending::<()>().await;
        }
    }))
}

/// Fires when `rx` receives a value
///
/// Dropping the sender without sending does not count as an interrupt.
pub fn from_receiver(rx: oneshot::Receiver<()>) -> Interrupt {
    Box::pin(async move {
        if rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    })
}
