//! Choosing the session a conversation runs on.
//!
//! Every strategy goes through [`resolve_session`], which returns a typed
//! [`SessionResolution`] instead of raising, so callers branch on the
//! outcome and tests can walk the whole decision table against a fake
//! [`SessionApi`].

use tracing::{debug, info, warn};

use crate::client::SessionApi;
use crate::error::ClientError;
use crate::types::Session;

/// How to pick a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Use exactly this session; it must already exist.
    Explicit(String),
    /// Always create a new session with a generated id.
    Fresh,
    /// Reuse the first listed session that still exists, else create one.
    ReuseOrCreate,
    /// Reuse this id if it exists, else create a session with it.
    Ensure(String),
}

/// Outcome of resolving a session.
#[derive(Debug)]
pub enum SessionResolution {
    /// An existing session was verified and reused.
    Found(Session),
    /// A new session was created and verified.
    Created(Session),
    Failed(ClientError),
}

impl SessionResolution {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Found(session) | Self::Created(session) => Some(session),
            Self::Failed(_) => None,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn into_result(self) -> Result<Session, ClientError> {
        match self {
            Self::Found(session) | Self::Created(session) => Ok(session),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Resolve a session for `(app_name, user_id)` according to `strategy`.
pub async fn resolve_session(
    api: &dyn SessionApi,
    app_name: &str,
    user_id: &str,
    strategy: &ResolveStrategy,
) -> SessionResolution {
    match strategy {
        ResolveStrategy::Explicit(session_id) => {
            match api.session_exists(app_name, user_id, session_id).await {
                Ok(true) => {
                    info!(session_id = %session_id, "Using explicitly specified session");
                    SessionResolution::Found(scoped(Session::new(session_id), app_name, user_id))
                }
                Ok(false) => SessionResolution::Failed(ClientError::session_not_found(
                    app_name, user_id, session_id,
                )),
                Err(err) => SessionResolution::Failed(err),
            }
        }
        ResolveStrategy::Fresh => create_and_verify(api, app_name, user_id, None).await,
        ResolveStrategy::ReuseOrCreate => {
            let sessions = match api.list_sessions(app_name, user_id).await {
                Ok(sessions) => sessions,
                Err(err) => return SessionResolution::Failed(err),
            };

            for candidate in sessions {
                match api.session_exists(app_name, user_id, &candidate.id).await {
                    Ok(true) => {
                        info!(session_id = %candidate.id, "Reusing existing session");
                        return SessionResolution::Found(scoped(candidate, app_name, user_id));
                    }
                    Ok(false) => {
                        warn!(session_id = %candidate.id, "Listed session failed verification");
                    }
                    Err(err) => return SessionResolution::Failed(err),
                }
            }

            debug!("No usable session listed; creating a new one");
            create_and_verify(api, app_name, user_id, None).await
        }
        ResolveStrategy::Ensure(session_id) => {
            match api.session_exists(app_name, user_id, session_id).await {
                Ok(true) => {
                    SessionResolution::Found(scoped(Session::new(session_id), app_name, user_id))
                }
                Ok(false) => create_and_verify(api, app_name, user_id, Some(session_id)).await,
                Err(err) => SessionResolution::Failed(err),
            }
        }
    }
}

/// Create a session and confirm the server knows it.
///
/// The id is fixed before the first request so that a 409 from a retried
/// create can still be checked. If the session exists afterwards it is
/// reported as `Found`.
async fn create_and_verify(
    api: &dyn SessionApi,
    app_name: &str,
    user_id: &str,
    session_id: Option<&str>,
) -> SessionResolution {
    let id = session_id
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let created = api.create_session(app_name, user_id, Some(id.as_str())).await;
    match created {
        Ok(session) => match api.session_exists(app_name, user_id, &session.id).await {
            Ok(true) => SessionResolution::Created(scoped(session, app_name, user_id)),
            Ok(false) => SessionResolution::Failed(ClientError::session_not_found(
                app_name,
                user_id,
                session.id,
            )),
            Err(err) => SessionResolution::Failed(err),
        },
        Err(ClientError::Protocol { status: 409, body }) => {
            info!(session_id = %id, "Session appears to already exist, verifying");
            let exists = api.session_exists(app_name, user_id, &id).await;
            match exists {
                Ok(true) => SessionResolution::Found(scoped(Session::new(id), app_name, user_id)),
                Ok(false) => SessionResolution::Failed(ClientError::protocol(409, body)),
                Err(err) => SessionResolution::Failed(err),
            }
        }
        Err(err) => SessionResolution::Failed(err),
    }
}

fn scoped(mut session: Session, app_name: &str, user_id: &str) -> Session {
    session.app_name.get_or_insert_with(|| app_name.to_string());
    session.user_id.get_or_insert_with(|| user_id.to_string());
    session
}
