//! Viewpoint telemetry.
//!
//! - `store` - the append-only store contract and the record it receives
//! - `firestore` - REST client for an anonymous-auth document store
//! - `logger` - debounced logging of camera changes

mod firestore;
mod logger;
mod store;

pub use firestore::FirestoreStore;
pub use logger::{InteractionLogger, LoggerState};
pub use store::{AnonymousIdentity, TelemetryStore, ViewRecord};
