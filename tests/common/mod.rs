//! Shared test helpers and an in-memory session API.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use trip_planner::client::SessionApi;
use trip_planner::error::{ClientError, Result};
use trip_planner::types::{Event, Session};

pub const APP: &str = "trip-planner";
pub const USER: &str = "test-user";

/// A transport-level error, as produced when the server is unreachable.
pub fn connection_error() -> ClientError {
    let err = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    ClientError::Connection(err)
}

/// An event carrying one model text part.
pub fn model_text(text: &str) -> Event {
    serde_json::from_value(serde_json::json!({
        "author": "trip_planner",
        "content": { "role": "model", "parts": [{ "text": text }] }
    }))
    .unwrap()
}

/// In-memory stand-in for the agent server's session endpoints.
#[derive(Default)]
pub struct FakeSessionApi {
    sessions: Mutex<Vec<String>>,
    /// Ids reported by `list_sessions` but unknown to `session_exists`.
    stale: Mutex<Vec<String>>,
    create_status: Mutex<Option<u16>>,
    forget_created: AtomicBool,
    race_on_conflict: AtomicBool,
    offline: AtomicBool,
    creates: AtomicUsize,
    replies: Mutex<VecDeque<Vec<Event>>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeSessionApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(ids: &[&str]) -> Self {
        let api = Self::new();
        api.sessions
            .lock()
            .unwrap()
            .extend(ids.iter().map(|id| id.to_string()));
        api
    }

    /// List `id` but answer "not found" when it is checked.
    pub fn add_stale(&self, id: &str) {
        self.stale.lock().unwrap().push(id.to_string());
    }

    /// Make `create_session` fail with this status.
    pub fn fail_create_with(&self, status: u16) {
        *self.create_status.lock().unwrap() = Some(status);
    }

    /// Reject creation with 409 after registering the requested id, as if
    /// another client created it first.
    pub fn lose_create_race(&self) {
        self.fail_create_with(409);
        self.race_on_conflict.store(true, Ordering::SeqCst);
    }

    /// Accept creations without remembering them.
    pub fn forget_created_sessions(&self) {
        self.forget_created.store(true, Ordering::SeqCst);
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn queue_reply(&self, events: Vec<Event>) {
        self.replies.lock().unwrap().push_back(events);
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.lock().unwrap().clone()
    }

    /// `(session_id, text)` for every turn received.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(connection_error());
        }
        Ok(())
    }

    fn knows(&self, session_id: &str) -> bool {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .any(|id| id == session_id)
    }
}

#[async_trait]
impl SessionApi for FakeSessionApi {
    async fn list_sessions(&self, _app_name: &str, _user_id: &str) -> Result<Vec<Session>> {
        self.check_online()?;
        let stale = self.stale.lock().unwrap().clone();
        Ok(stale
            .into_iter()
            .chain(self.session_ids())
            .map(Session::new)
            .collect())
    }

    async fn session_exists(
        &self,
        _app_name: &str,
        _user_id: &str,
        session_id: &str,
    ) -> Result<bool> {
        self.check_online()?;
        Ok(self.knows(session_id))
    }

    async fn create_session(
        &self,
        _app_name: &str,
        _user_id: &str,
        session_id: Option<&str>,
    ) -> Result<Session> {
        self.check_online()?;
        self.creates.fetch_add(1, Ordering::SeqCst);
        let rejected = *self.create_status.lock().unwrap();
        if let Some(status) = rejected {
            if status == 409 && self.race_on_conflict.load(Ordering::SeqCst) {
                if let Some(id) = session_id {
                    self.sessions.lock().unwrap().push(id.to_string());
                }
            }
            return Err(ClientError::protocol(status, "create rejected"));
        }

        let id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        if self.knows(&id) {
            return Err(ClientError::protocol(409, "session already exists"));
        }
        if !self.forget_created.load(Ordering::SeqCst) {
            self.sessions.lock().unwrap().push(id.clone());
        }
        Ok(Session::new(id))
    }

    async fn send_message(
        &self,
        _app_name: &str,
        _user_id: &str,
        session_id: &str,
        text: &str,
        _streaming: bool,
    ) -> Result<Vec<Event>> {
        self.check_online()?;
        if !self.knows(session_id) {
            return Err(ClientError::protocol(404, "Session not found"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((session_id.to_string(), text.to_string()));

        let queued = self.replies.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| vec![model_text(&format!("Reply to: {text}"))]))
    }
}
