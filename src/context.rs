//! Application context shared by CLI handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::render::Renderer;
use crate::telemetry::{FirestoreStore, InteractionLogger};

/// Root application context.
///
/// Holds the loaded configuration and, when telemetry is configured, the
/// store client. Cheap to clone.
#[derive(Clone)]
pub struct Context {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Viewpoint store, absent when `[telemetry]` lacks credentials.
    pub telemetry: Option<Arc<FirestoreStore>>,
}

impl Context {
    /// Creates a context, connecting the telemetry store if it is configured.
    pub fn new(config: Config) -> Self {
        let telemetry = match FirestoreStore::from_config(&config.telemetry) {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                tracing::debug!(error = %e, "Viewpoint telemetry disabled");
                None
            }
        };

        Self {
            config: Arc::new(config),
            telemetry,
        }
    }

    /// A renderer using this context's configuration.
    pub fn renderer(&self) -> Renderer {
        Renderer::new(Arc::clone(&self.config))
    }

    /// A logger for `graph_id`, if telemetry is available.
    pub fn interaction_logger(&self, graph_id: &str) -> Option<InteractionLogger<FirestoreStore>> {
        let store = self.telemetry.as_ref()?;
        Some(InteractionLogger::new(
            Arc::clone(store),
            graph_id,
            self.config.telemetry.quiet_period(),
        ))
    }
}
