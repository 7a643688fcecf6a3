//! Debounced viewpoint logging.
//!
//! Every camera change (re)starts a single idle timer. Only when the camera
//! has been still for the whole quiet period is the latest viewpoint
//! written: sign in anonymously, then append one record. Failures are
//! logged and dropped; nothing is retried and rendering never sees them.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::store::{TelemetryStore, ViewRecord};
use crate::error::TelemetryError;
use crate::models::Camera;

/// Debounce state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    /// No timer running.
    Idle,
    /// A timer is counting down to log the latest camera.
    PendingLog,
}

/// Timer task; resolves to the spawned write once the quiet period ends.
type IdleTimer = JoinHandle<JoinHandle<()>>;

/// Watches camera changes for one graph and logs the view the user
/// settles on.
///
/// Owns at most one idle timer. A write that has already started is never
/// cancelled by later events; it runs to completion on its own task.
pub struct InteractionLogger<S> {
    store: Arc<S>,
    graph_id: String,
    quiet_period: Duration,
    timer: Option<IdleTimer>,
}

impl<S: TelemetryStore + 'static> InteractionLogger<S> {
    /// Logger writing to the collection named `graph_id`.
    pub fn new(store: Arc<S>, graph_id: impl Into<String>, quiet_period: Duration) -> Self {
        Self {
            store,
            graph_id: graph_id.into(),
            quiet_period,
            timer: None,
        }
    }

    pub fn graph_id(&self) -> &str {
        &self.graph_id
    }

    pub fn state(&self) -> LoggerState {
        match &self.timer {
            Some(timer) if !timer.is_finished() => LoggerState::PendingLog,
            _ => LoggerState::Idle,
        }
    }

    /// Handles a viewpoint change: cancels any running timer and starts a
    /// fresh one for `camera`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_camera_change(&mut self, camera: Camera) {
        if let Some(timer) = self.timer.take() {
            if !timer.is_finished() {
                timer.abort();
                tracing::trace!(graph_id = %self.graph_id, "Restarting idle timer");
            }
        }

        // Deadline is fixed here, not when the task is first polled.
        let idle = tokio::time::sleep(self.quiet_period);
        let store = Arc::clone(&self.store);
        let graph_id = self.graph_id.clone();

        self.timer = Some(tokio::spawn(async move {
            idle.await;
            tokio::spawn(async move {
                log_viewpoint(store.as_ref(), &graph_id, camera).await;
            })
        }));
    }

    /// Waits for the running timer, if any, and the write it triggers.
    ///
    /// Used on shutdown so the last settled view is not lost.
    pub async fn flush(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        match timer.await {
            Ok(write) => {
                if let Err(e) = write.await {
                    tracing::warn!(error = %e, "Viewpoint write task failed");
                }
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => tracing::warn!(error = %e, "Idle timer task failed"),
        }
    }
}

impl<S> Drop for InteractionLogger<S> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

async fn write_viewpoint<S: TelemetryStore + ?Sized>(
    store: &S,
    graph_id: &str,
    camera: Camera,
) -> Result<(), TelemetryError> {
    let identity = store.sign_in_anonymously().await?;
    store
        .append(&identity, graph_id, &ViewRecord::now(camera))
        .await
}

/// Writes one viewpoint, logging instead of returning failures.
async fn log_viewpoint<S: TelemetryStore + ?Sized>(store: &S, graph_id: &str, camera: Camera) {
    match write_viewpoint(store, graph_id, camera).await {
        Ok(()) => tracing::info!(graph_id, eye = ?camera.eye, "Logged viewpoint"),
        Err(e) => tracing::warn!(graph_id, error = %e, "Failed to log viewpoint"),
    }
}
