//! CLI-specific error formatting for user-facing messages.

use crate::error::ClientError;

/// Map a [`ClientError`] to a user-facing help string with actionable guidance.
pub fn format_error_help(err: &ClientError) -> String {
    match err {
        ClientError::Connection(e) => format!(
            "Could not reach the agent server: {e}. Is it running? Point at it with --base-url or TRIP_PLANNER_BASE_URL"
        ),
        ClientError::Timeout(ms) => {
            format!("Request timed out after {ms}ms. Raise it with --timeout-secs")
        }
        ClientError::SessionNotFound { session_id, .. } => format!(
            "Session {session_id} could not be verified. Run with --fresh, or pick one from --list-sessions"
        ),
        ClientError::Protocol { status: 404, body } => format!(
            "Server returned 404: {body}. The session or app may not exist; check --app-name or run with --fresh"
        ),
        ClientError::Protocol { status, body } => format!("Server returned {status}: {body}"),
        ClientError::Configuration(msg) => format!(
            "Configuration error: {msg}. Check your .env, config file, or command-line flags"
        ),
        other => format!("{other}"),
    }
}
