//! Trip Planner client
//!
//! Session-scoped client for a Trip Planner agent served over HTTP. The
//! agent itself runs remotely; this crate creates or reuses sessions,
//! posts user turns to `/run`, and extracts the text the agent returns.
//!
//! # Quick Start
//!
//! ```no_run
//! use trip_planner::prelude::*;
//!
//! # async fn example() -> trip_planner::error::Result<()> {
//! let client = SessionClient::new(ClientConfig::load()?)?;
//! let mut conversation = Conversation::open(
//!     &client,
//!     client.app_name(),
//!     client.user_id(),
//!     &ResolveStrategy::Fresh,
//! )
//! .await?;
//! let reply = conversation
//!     .send("I want to plan a trip to Paris for 5 days in December.")
//!     .await?;
//! println!("{}", reply.text());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod prelude;
pub mod session;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
