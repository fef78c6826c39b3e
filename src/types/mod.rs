//! Wire types for the session and run endpoints.

pub mod event;
pub mod message;
pub mod session;

pub use event::{extract_text, Event};
pub use message::{Content, FunctionCall, NewMessage, Part, Role, RunRequest};
pub use session::{CreateSessionRequest, Session};

use chrono::{DateTime, Utc};

/// Parse a timestamp that may be seconds since the epoch or an RFC 3339 string.
pub(crate) fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::Number(n) => {
            let secs = n.as_f64()?;
            if !secs.is_finite() {
                return None;
            }
            let whole = secs.trunc() as i64;
            let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
            DateTime::from_timestamp(whole, nanos.min(999_999_999))
        }
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}
