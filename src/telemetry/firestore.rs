//! Firestore-compatible REST client.
//!
//! Sign-in uses the identity service's anonymous `accounts:signUp`
//! endpoint; documents are created with the returned ID token. Field
//! values use the typed JSON encoding the document service expects
//! (`doubleValue`, `mapValue`, `timestampValue`, ...).

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};

use super::store::{AnonymousIdentity, TelemetryStore, ViewRecord};
use crate::config::TelemetryConfig;
use crate::error::TelemetryError;

/// Anonymous sign-up response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    id_token: String,
    local_id: String,
}

/// REST client for anonymous sign-in and document appends.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    http: reqwest::Client,
    api_key: String,
    project_id: String,
    identity_endpoint: String,
    firestore_endpoint: String,
}

impl FirestoreStore {
    /// Builds a client from config; the API key and project id are required.
    pub fn from_config(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(TelemetryError::NotConfigured("telemetry.api_key"))?;
        let project_id = config
            .project_id
            .clone()
            .ok_or(TelemetryError::NotConfigured("telemetry.project_id"))?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            project_id,
            identity_endpoint: config.identity_endpoint.trim_end_matches('/').to_string(),
            firestore_endpoint: config.firestore_endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn sign_up_url(&self) -> String {
        format!("{}/accounts:signUp?key={}", self.identity_endpoint, self.api_key)
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.firestore_endpoint, self.project_id, collection
        )
    }
}

/// Encodes a JSON value as a typed document field.
fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        JsonValue::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

fn encode_fields(map: &Map<String, JsonValue>) -> JsonValue {
    JsonValue::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// The create-document body for a viewpoint record.
pub(crate) fn document_body(record: &ViewRecord) -> Result<JsonValue, TelemetryError> {
    let camera = serde_json::to_value(record.camera)
        .map_err(|e| TelemetryError::Append(format!("camera encoding: {e}")))?;
    Ok(json!({
        "fields": {
            "camera": encode_value(&camera),
            "timestamp": {
                "timestampValue": record.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
            },
        }
    }))
}

#[async_trait]
impl TelemetryStore for FirestoreStore {
    async fn sign_in_anonymously(&self) -> Result<AnonymousIdentity, TelemetryError> {
        let response = self
            .http
            .post(self.sign_up_url())
            .json(&json!({ "returnSecureToken": true }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelemetryError::Auth(format!("{status}: {body}")));
        }

        let body: SignUpResponse = response.json().await?;
        tracing::debug!(user_id = %body.local_id, "Signed in anonymously");
        Ok(AnonymousIdentity {
            user_id: body.local_id,
            token: body.id_token,
        })
    }

    async fn append(
        &self,
        identity: &AnonymousIdentity,
        collection: &str,
        record: &ViewRecord,
    ) -> Result<(), TelemetryError> {
        let response = self
            .http
            .post(self.collection_url(collection))
            .bearer_auth(&identity.token)
            .json(&document_body(record)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelemetryError::Append(format!("{status}: {body}")));
        }
        Ok(())
    }
}
