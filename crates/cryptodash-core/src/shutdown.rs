//! Shutdown coordinator for the dashboard's background tasks.
//!
//! On quit the refresh ticker and the key pump are told to stop, given a short
//! grace period to return, and aborted if they have not.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use futures::future::join_all;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};

use crate::Result;

/// Shutdown signal broadcast to background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// Stop at the next opportunity.
    Graceful,
    /// Grace period exceeded; remaining tasks are being aborted.
    Force,
}

/// Coordinates shutdown of every spawned background task.
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<ShutdownSignal>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    requested: Arc<AtomicBool>,
    grace: Duration,
}

impl ShutdownCoordinator {
    /// Create a coordinator that waits up to `grace` for tasks to exit.
    pub fn new(grace: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            shutdown_tx,
            tasks: Arc::new(Mutex::new(Vec::new())),
            requested: Arc::new(AtomicBool::new(false)),
            grace,
        }
    }

    /// Get a receiver for shutdown signals.
    ///
    /// Async loops select on it; blocking loops poll
    /// [`ShutdownCoordinator::flag`] instead.
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownSignal> {
        self.shutdown_tx.subscribe()
    }

    /// Shared flag that turns true once shutdown starts.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.requested)
    }

    /// Register a task for cleanup on shutdown.
    pub async fn register_task(&self, task: JoinHandle<()>) {
        self.tasks.lock().await.push(task);
    }

    /// Signal every task, wait out the grace period, then abort stragglers.
    pub async fn shutdown(&self) -> Result<()> {
        if self.requested.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::info!("Shutting down background tasks");

        let _ = self.shutdown_tx.send(ShutdownSignal::Graceful);

        let tasks: Vec<JoinHandle<()>> = self.tasks.lock().await.drain(..).collect();
        let aborts: Vec<_> = tasks.iter().map(JoinHandle::abort_handle).collect();

        let finished = tokio::time::timeout(self.grace, join_all(tasks)).await;

        match finished {
            Ok(results) => {
                results
                    .iter()
                    .filter_map(|result| result.as_ref().err())
                    .filter(|e| !e.is_cancelled())
                    .for_each(|e| tracing::warn!("Background task failed: {e}"));
                tracing::info!("Shutdown completed");
            }
            Err(_) => {
                tracing::warn!("Shutdown grace period exceeded, aborting tasks");
                let _ = self.shutdown_tx.send(ShutdownSignal::Force);
                aborts.iter().for_each(tokio::task::AbortHandle::abort);
            }
        }
        Ok(())
    }

    /// Check if shutdown has been requested.
    pub fn is_shutting_down(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

/// Resolves when the process is asked to terminate from outside.
///
/// In raw mode Ctrl-C arrives as a key, so on Unix this waits for SIGTERM or
/// SIGHUP; elsewhere it falls back to the Ctrl-C handler.
pub async fn terminate_requested() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| crate::Error::io_error(format!("Failed to setup SIGTERM: {e}")))?;
        let mut sighup = signal(SignalKind::hangup())
            .map_err(|e| crate::Error::io_error(format!("Failed to setup SIGHUP: {e}")))?;

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
            _ = sighup.recv() => tracing::info!("Received SIGHUP"),
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| crate::Error::io_error(format!("Failed to listen for Ctrl-C: {e}")))?;
        tracing::info!("Received Ctrl-C");
        Ok(())
    }
}
