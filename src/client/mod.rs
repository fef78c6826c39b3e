//! Session-conversation client for the agent HTTP API.

pub mod http;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{CreateSessionRequest, Event, NewMessage, RunRequest, Session};

use self::http::{segment, send, status_to_error, truncate_for_log, LOG_BODY_LIMIT};

/// Operations the agent server exposes for sessions and turns.
///
/// [`SessionClient`] is the HTTP implementation; the session resolver is
/// written against this trait so its decision table can be exercised
/// without a server.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// All sessions for a user. Non-2xx statuses and unreadable bodies
    /// yield an empty list.
    async fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<Session>>;

    /// `true` only when the server answers 200 for this session.
    async fn session_exists(&self, app_name: &str, user_id: &str, session_id: &str)
        -> Result<bool>;

    /// Create a session, generating a UUID when `session_id` is `None`.
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: Option<&str>,
    ) -> Result<Session>;

    /// Post one user turn to `/run` and return the response events.
    async fn send_message(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        text: &str,
        streaming: bool,
    ) -> Result<Vec<Event>>;
}

/// HTTP client bound to one server configuration.
#[derive(Debug, Clone)]
pub struct SessionClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl SessionClient {
    /// Validate the configuration and build a pooled HTTP client for it.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = http::build_client(&config)?;
        Ok(Self { http, config })
    }

    /// Use a caller-supplied reqwest client.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Result<Self> {
        config.validate()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    pub fn user_id(&self) -> &str {
        &self.config.user_id
    }

    fn sessions_url(&self, app_name: &str, user_id: &str) -> String {
        format!(
            "{}/apps/{}/users/{}/sessions",
            self.config.base_url(),
            segment(app_name),
            segment(user_id)
        )
    }

    fn session_url(&self, app_name: &str, user_id: &str, session_id: &str) -> String {
        format!(
            "{}/{}",
            self.sessions_url(app_name, user_id),
            segment(session_id)
        )
    }

    fn run_url(&self) -> String {
        format!("{}/run", self.config.base_url())
    }

    /// Fetch one session, or `None` on any non-200 status.
    pub async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<Session>> {
        self.config
            .retry
            .execute(|| self.get_session_once(app_name, user_id, session_id))
            .await
    }

    async fn get_session_once(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<Session>> {
        let url = self.session_url(app_name, user_id, session_id);
        debug!(%url, "GET session");
        let (status, body) = send(self.http.get(&url), self.config.request_timeout).await?;
        if status != reqwest::StatusCode::OK {
            debug!(session_id, status = status.as_u16(), "Session does not exist or is not valid");
            return Ok(None);
        }

        let session = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(Session::from_value)
            .unwrap_or_else(|| Session::new(session_id));
        Ok(Some(session))
    }

    async fn list_sessions_once(&self, app_name: &str, user_id: &str) -> Result<Vec<Session>> {
        let url = self.sessions_url(app_name, user_id);
        debug!(%url, "GET sessions");
        let (status, body) = send(self.http.get(&url), self.config.request_timeout).await?;
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                body = truncate_for_log(&body, LOG_BODY_LIMIT),
                "Listing sessions failed; treating as no sessions"
            );
            return Ok(Vec::new());
        }

        let value = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    error = %err,
                    body = truncate_for_log(&body, LOG_BODY_LIMIT),
                    "Session list is not JSON; treating as no sessions"
                );
                return Ok(Vec::new());
            }
        };
        match Session::list_from_value(value) {
            Some(sessions) => {
                debug!(count = sessions.len(), "Listed sessions");
                Ok(sessions)
            }
            None => {
                warn!(
                    body = truncate_for_log(&body, LOG_BODY_LIMIT),
                    "Unexpected session list format"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn create_session_once(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Session> {
        let url = self.sessions_url(app_name, user_id);
        let request = CreateSessionRequest {
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            description: self.config.session_description.clone(),
        };
        debug!(%url, session_id, "POST session");

        let (status, body) = send(
            self.http.post(&url).json(&request),
            self.config.request_timeout,
        )
        .await?;
        if !status.is_success() {
            return Err(status_to_error(status, &body));
        }

        let mut session = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(Session::from_value)
            .unwrap_or_else(|| Session::new(session_id));
        if session.id != session_id {
            info!(
                requested = session_id,
                assigned = %session.id,
                "Server assigned a different session id"
            );
        }
        session.app_name.get_or_insert_with(|| app_name.to_string());
        session.user_id.get_or_insert_with(|| user_id.to_string());

        info!(session_id = %session.id, "Session created");
        Ok(session)
    }

    async fn send_message_once(&self, request: &RunRequest) -> Result<Vec<Event>> {
        let url = self.run_url();
        debug!(%url, session_id = %request.session_id, "POST run");

        let (status, body) = send(
            self.http.post(&url).json(request),
            self.config.request_timeout,
        )
        .await?;
        if !status.is_success() {
            return Err(status_to_error(status, &body));
        }

        let events: Vec<Event> = serde_json::from_str(&body)?;
        debug!(
            events = events.len(),
            body = truncate_for_log(&body, LOG_BODY_LIMIT),
            "Run completed"
        );
        Ok(events)
    }
}

#[async_trait]
impl SessionApi for SessionClient {
    async fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<Session>> {
        self.config
            .retry
            .execute(|| self.list_sessions_once(app_name, user_id))
            .await
    }

    async fn session_exists(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<bool> {
        Ok(self
            .get_session(app_name, user_id, session_id)
            .await?
            .is_some())
    }

    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: Option<&str>,
    ) -> Result<Session> {
        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        self.config
            .retry
            .execute(|| self.create_session_once(app_name, user_id, &session_id))
            .await
    }

    async fn send_message(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        text: &str,
        streaming: bool,
    ) -> Result<Vec<Event>> {
        if text.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "message text must not be empty".into(),
            ));
        }

        let request = RunRequest {
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            new_message: NewMessage::user(text),
            streaming,
        };
        self.config
            .retry
            .execute(|| self.send_message_once(&request))
            .await
    }
}
