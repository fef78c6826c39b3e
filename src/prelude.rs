//! Convenience re-exports for common use.

pub use crate::client::{SessionApi, SessionClient};
pub use crate::config::ClientConfig;
pub use crate::conversation::{Conversation, TurnReply};
pub use crate::error::{ClientError, Result};
pub use crate::session::{resolve_session, ResolveStrategy, SessionResolution};
pub use crate::types::{extract_text, Event, Session};
pub use crate::util::retry::RetryPolicy;
