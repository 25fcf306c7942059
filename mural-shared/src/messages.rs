use chrono::{DateTime, Utc};
use uuid::Uuid;

///
/// Wire model for guestbook messages, used in HTTP responses and broadcast
/// payloads alike.
///
/// Field names are serialized in camelCase, matching what the browser-facing
/// API exposes (`createdAt`).
///
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
