//! Response events produced by the agent for a turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::{Content, Part};
use super::parse_timestamp;

/// A unit of response content for one turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    pub fn parts(&self) -> &[Part] {
        self.content.as_ref().map(Content::parts).unwrap_or_default()
    }

    /// Role of the content block, if any.
    pub fn role(&self) -> Option<&str> {
        self.content.as_ref().and_then(|c| c.role.as_deref())
    }

    /// Whether this event was authored by the model (or carries no role).
    pub fn is_model(&self) -> bool {
        matches!(self.role(), None | Some("model"))
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_ref().and_then(parse_timestamp)
    }

    /// Non-empty text parts in their original order.
    pub fn text_fragments(&self) -> impl Iterator<Item = &str> {
        self.parts().iter().filter_map(Part::text_fragment)
    }
}

/// Collect text fragments across events of any role, preserving event and
/// part order.
pub fn extract_text(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .flat_map(Event::text_fragments)
        .map(str::to_string)
        .collect()
}
