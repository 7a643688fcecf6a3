//! The telemetry store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TelemetryError;
use crate::models::Camera;

/// Ephemeral identity returned by anonymous sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymousIdentity {
    /// Opaque user id assigned by the store.
    pub user_id: String,
    /// Bearer token for subsequent writes.
    pub token: String,
}

/// One logged viewpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRecord {
    pub camera: Camera,
    pub timestamp: DateTime<Utc>,
}

impl ViewRecord {
    /// Record for `camera`, stamped now.
    pub fn now(camera: Camera) -> Self {
        Self {
            camera,
            timestamp: Utc::now(),
        }
    }
}

/// An external append-only document store with anonymous write access.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Obtains a fresh anonymous identity.
    async fn sign_in_anonymously(&self) -> Result<AnonymousIdentity, TelemetryError>;

    /// Appends `record` as a new document in `collection`.
    async fn append(
        &self,
        identity: &AnonymousIdentity,
        collection: &str,
        record: &ViewRecord,
    ) -> Result<(), TelemetryError>;
}
