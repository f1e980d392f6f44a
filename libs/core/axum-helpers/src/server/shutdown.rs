//! Graceful shutdown coordination.

use tokio::sync::watch;
use tracing::info;

/// Wait for SIGINT (ctrl-c) or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// Broadcasts a shutdown signal so cleanup tasks can run after the
/// server stops accepting connections.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    tx: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, rx)
    }

    /// Signal every subscribed task that shutdown has begun.
    pub fn signal(&self) {
        let _ = self.tx.send(true);
    }

    /// Resolve once shutdown has been signalled.
    pub async fn wait_for_signal(&self) {
        let mut rx = self.tx.subscribe();
        if *rx.borrow() {
            return;
        }
        let _ = rx.changed().await;
    }
}

/// Wait for the OS signal, then notify the coordinator.
pub async fn coordinated_shutdown(coordinator: ShutdownCoordinator) {
    shutdown_signal().await;
    coordinator.signal();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signal_releases_waiters() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        let waiter = coordinator.clone();

        let handle = tokio::spawn(async move {
            waiter.wait_for_signal().await;
        });

        coordinator.signal();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_after_signal_returns_immediately() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        coordinator.signal();
        coordinator.wait_for_signal().await;
    }
}
