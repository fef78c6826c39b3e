//! Session records as returned by the sessions endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::parse_timestamp;

/// Fields that may carry the session identifier, in priority order.
pub const SESSION_ID_FIELDS: [&str; 4] = ["sessionId", "id", "session_id", "session"];

/// Fields that may carry the creation (or last update) time, in priority order.
pub const CREATED_AT_FIELDS: [&str; 5] = [
    "createdAt",
    "created_at",
    "timestamp",
    "creationTime",
    "lastUpdateTime",
];

/// A server-side session scoped to an (app, user) pair.
///
/// The client only ever references sessions; `raw` keeps the server's
/// payload for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub app_name: Option<String>,
    pub user_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub raw: Value,
}

impl Session {
    /// A session known only by its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            raw: serde_json::json!({ "id": id }),
            id,
            app_name: None,
            user_id: None,
            created_at: None,
        }
    }

    /// Build a session from a server payload.
    ///
    /// Returns `None` when no identifier field can be found.
    pub fn from_value(raw: Value) -> Option<Self> {
        let obj = raw.as_object()?;
        let id = SESSION_ID_FIELDS
            .iter()
            .find_map(|field| obj.get(*field).and_then(id_string))?;
        let app_name = string_field(obj, &["appName", "app_name"]);
        let user_id = string_field(obj, &["userId", "user_id"]);
        let created_at = CREATED_AT_FIELDS
            .iter()
            .find_map(|field| obj.get(*field).and_then(parse_timestamp));

        Some(Self {
            id,
            app_name,
            user_id,
            created_at,
            raw,
        })
    }

    /// Parse a session-list payload.
    ///
    /// Accepts a bare array or an object with a `sessions` array. Entries
    /// without an identifier are skipped. Any other shape yields `None`.
    pub fn list_from_value(value: Value) -> Option<Vec<Self>> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut obj) => match obj.remove("sessions") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => return None,
            },
            _ => return None,
        };

        let total = items.len();
        let sessions: Vec<Self> = items.into_iter().filter_map(Self::from_value).collect();
        if sessions.len() < total {
            tracing::warn!(
                skipped = total - sessions.len(),
                "Skipping session entries without an identifier"
            );
        }
        Some(sessions)
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(obj: &serde_json::Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|f| obj.get(*f).and_then(Value::as_str).map(str::to_string))
}

/// Body of `POST /apps/{app}/users/{user}/sessions`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
