//! Plain-text rendering of replies and session listings.

use std::fmt::Write;

use serde_json::Value;

use crate::cli::QueryKind;
use crate::conversation::TurnReply;
use crate::types::{Event, Session};

const RULE_WIDE: usize = 80;
const RULE_NARROW: usize = 40;

/// Render a turn reply with a banner, text, tool calls, and other part data.
pub fn render_reply(reply: &TurnReply, kind: QueryKind) -> String {
    let mut out = String::new();
    let wide = "=".repeat(RULE_WIDE);
    let _ = writeln!(out, "\n{wide}");
    let _ = writeln!(out, "TRIP PLANNER AGENT RESPONSE ({})", kind.label());
    let _ = writeln!(out, "{wide}");

    for event in reply.events.iter().filter(|e| e.is_model()) {
        render_event(&mut out, event);
    }

    let _ = writeln!(out, "\n{wide}\n");
    out
}

fn render_event(out: &mut String, event: &Event) {
    let narrow = "-".repeat(RULE_NARROW);
    for part in event.parts() {
        if let Some(text) = part.text_fragment() {
            let _ = writeln!(out, "\n{text}");
        }

        if let Some(ref call) = part.function_call {
            let name = call.name.as_deref().unwrap_or("Unknown Tool");
            let _ = writeln!(out, "\n⚡ TOOL USED: {name}");
            let _ = writeln!(out, "{narrow}");
            let _ = writeln!(out, "{}", pretty(&call.args_json()));
            let _ = writeln!(out, "{narrow}");
        }

        let mut others: Vec<(&str, &Value)> = Vec::new();
        if let Some(ref response) = part.function_response {
            others.push(("function_response", response));
        }
        others.extend(part.extra.iter().map(|(k, v)| (k.as_str(), v)));

        for (key, value) in others.into_iter().filter(|(_, v)| !v.is_null()) {
            let _ = writeln!(out, "\n▶ {}:", key.to_uppercase());
            let _ = writeln!(out, "{narrow}");
            let _ = writeln!(out, "{}", pretty(value));
            let _ = writeln!(out, "{narrow}");
        }
    }
}

/// Render the session list for `--list-sessions`.
pub fn render_session_list(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return "\nNo active sessions found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "\nFound {} active sessions:", sessions.len());
    for (i, session) in sessions.iter().enumerate() {
        let created = session
            .created_at
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| "Unknown".to_string());
        let _ = writeln!(out, "{}. Session ID: {}", i + 1, session.id);
        let _ = writeln!(out, "   Created: {created}");
        let _ = writeln!(out, "   Full session data: {}", pretty(&session.raw));
        let _ = writeln!(out);
    }
    out
}

fn pretty(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(value: Value) -> TurnReply {
        TurnReply::from_events(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn renders_banner_and_text() {
        let out = render_reply(
            &reply(json!([
                { "content": { "role": "model", "parts": [{ "text": "Day 1: Eiffel Tower" }] } }
            ])),
            QueryKind::Standard,
        );
        assert!(out.contains("TRIP PLANNER AGENT RESPONSE (STANDARD QUERY)"));
        assert!(out.contains("\nDay 1: Eiffel Tower\n"));
    }

    #[test]
    fn renders_tool_calls_with_decoded_args() {
        let out = render_reply(
            &reply(json!([
                { "content": { "role": "model", "parts": [
                    { "function_call": { "name": "find_flights", "args": "{\"to\":\"NRT\"}" } }
                ] } }
            ])),
            QueryKind::Complex,
        );
        assert!(out.contains("COMPLEX QUERY"));
        assert!(out.contains("TOOL USED: find_flights"));
        assert!(out.contains("\"to\": \"NRT\""));
    }

    #[test]
    fn renders_other_part_keys_upper_cased() {
        let out = render_reply(
            &reply(json!([
                { "content": { "role": "model", "parts": [
                    { "functionResponse": { "name": "find_flights", "response": { "ok": true } } },
                    { "executableCode": { "code": "print(1)" }, "thought": null }
                ] } }
            ])),
            QueryKind::Standard,
        );
        assert!(out.contains("FUNCTION_RESPONSE:"));
        assert!(out.contains("EXECUTABLECODE:"));
        assert!(!out.contains("THOUGHT:"));
    }

    #[test]
    fn skips_user_events_that_the_reply_text_keeps() {
        let reply = reply(json!([
            { "content": { "role": "user", "parts": [{ "text": "echoed question" }] } }
        ]));
        let out = render_reply(&reply, QueryKind::Standard);
        assert!(!out.contains("echoed question"));
        assert_eq!(reply.text(), "echoed question");
    }

    #[test]
    fn session_list_empty_and_populated() {
        assert!(render_session_list(&[]).contains("No active sessions found."));

        let session = Session::from_value(json!({ "id": "s-1", "lastUpdateTime": 0 })).unwrap();
        let out = render_session_list(&[session, Session::new("s-2")]);
        assert!(out.contains("Found 2 active sessions:"));
        assert!(out.contains("1. Session ID: s-1"));
        assert!(out.contains("Created: 1970-01-01T00:00:00+00:00"));
        assert!(out.contains("2. Session ID: s-2"));
        assert!(out.contains("Created: Unknown"));
    }
}
