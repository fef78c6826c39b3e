//! Multi-turn conversations on a single resolved session.

use tracing::debug;

use crate::client::SessionApi;
use crate::error::Result;
use crate::session::{resolve_session, ResolveStrategy};
use crate::types::{extract_text, Event, Session};

/// The result of one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub events: Vec<Event>,
    /// Text fragments in event order, then part order.
    pub fragments: Vec<String>,
}

impl TurnReply {
    pub fn from_events(events: Vec<Event>) -> Self {
        let fragments = extract_text(&events);
        Self { events, fragments }
    }

    /// All fragments joined by blank lines.
    pub fn text(&self) -> String {
        self.fragments.join("\n\n")
    }

    pub fn has_text(&self) -> bool {
        !self.fragments.is_empty()
    }
}

/// A session bound to a client.
///
/// `send` takes `&mut self`, so turns on one conversation are serialized.
pub struct Conversation<'a> {
    api: &'a dyn SessionApi,
    app_name: String,
    user_id: String,
    session: Session,
    turns: usize,
    streaming: bool,
}

impl<'a> Conversation<'a> {
    pub fn new(
        api: &'a dyn SessionApi,
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session: Session,
    ) -> Self {
        Self {
            api,
            app_name: app_name.into(),
            user_id: user_id.into(),
            session,
            turns: 0,
            streaming: false,
        }
    }

    /// Resolve a session with `strategy` and open a conversation on it.
    pub async fn open(
        api: &'a dyn SessionApi,
        app_name: &str,
        user_id: &str,
        strategy: &ResolveStrategy,
    ) -> Result<Self> {
        let session = resolve_session(api, app_name, user_id, strategy)
            .await
            .into_result()?;
        Ok(Self::new(api, app_name, user_id, session))
    }

    /// Value sent as the `streaming` flag on each turn.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_id(&self) -> &str {
        &self.session.id
    }

    /// Number of completed turns.
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Send one user turn and wait for the full reply.
    pub async fn send(&mut self, text: &str) -> Result<TurnReply> {
        let events = self
            .api
            .send_message(
                &self.app_name,
                &self.user_id,
                &self.session.id,
                text,
                self.streaming,
            )
            .await?;
        self.turns += 1;

        let reply = TurnReply::from_events(events);
        debug!(
            session_id = %self.session.id,
            turn = self.turns,
            events = reply.events.len(),
            fragments = reply.fragments.len(),
            "Turn completed"
        );
        Ok(reply)
    }
}

impl std::fmt::Debug for Conversation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("app_name", &self.app_name)
            .field("user_id", &self.user_id)
            .field("session", &self.session.id)
            .field("turns", &self.turns)
            .finish()
    }
}
