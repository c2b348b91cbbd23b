//! Shutdown coordination for the proxy server.

use tokio::sync::broadcast;

use crate::lifecycle::signals;

/// Coordinator for graceful shutdown.
///
/// The server subscribes once; `trigger` (tests, embedding code) or an OS
/// signal ends it.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscriber to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve when `rx` fires or an OS signal arrives.
///
/// A dropped coordinator is not a shutdown request.
pub async fn wait_for_shutdown(mut rx: broadcast::Receiver<()>) {
    let requested = async move {
        if let Err(broadcast::error::RecvError::Closed) = rx.recv().await {
            std::future::pending::<()>().await;
        }
    };
    tokio::select! {
        _ = requested => tracing::info!("Shutdown requested"),
        _ = signals::termination() => {}
    }
}
