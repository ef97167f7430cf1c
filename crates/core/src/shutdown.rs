//! Graceful shutdown coordination
//!
//! A [`Shutdown`] handle owns a broadcast channel; background tasks hold a
//! [`ShutdownSignal`] and exit cleanly after finishing their current unit of
//! work. The handle can be triggered programmatically or wired to SIGINT /
//! SIGTERM via [`Shutdown::listen_for_signals`].

use tokio::sync::broadcast;
use tracing::info;

/// Shutdown coordinator handle
#[derive(Clone)]
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    /// Subscribe a task to the shutdown signal
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.notify.subscribe(),
        }
    }

    /// Broadcast shutdown to all subscribers
    pub fn trigger(&self) {
        // Only fails when there are no subscribers, which is fine.
        let _ = self.notify.send(());
    }

    /// Wait for SIGINT or SIGTERM, then trigger shutdown
    pub async fn listen_for_signals(&self) {
        wait_for_os_signal().await;
        info!("Shutdown signal received");
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn wait_for_os_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_os_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl-C handler");
}

/// Per-task shutdown receiver
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl ShutdownSignal {
    /// Wait until shutdown is requested
    ///
    /// A closed or lagged channel is treated as a shutdown request.
    pub async fn recv(&mut self) {
        let _ = self.rx.recv().await;
    }
}
