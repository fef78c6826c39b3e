//! CLI entry point for the Trip Planner test tool.

pub mod errors;
pub mod render;
pub mod run;

pub use run::run;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::config::ClientConfig;
use crate::session::ResolveStrategy;
use crate::util::retry::RetryPolicy;

pub const BASIC_QUERY: &str = "I want to plan a trip to Paris for 5 days in December.";

pub const COMPLEX_QUERY: &str = "I want to plan a family trip to Japan for 10 days in April. \
We're interested in experiencing cherry blossom season, visiting historical sites, \
and trying authentic Japanese cuisine. We'd like to visit Tokyo, Kyoto, and possibly one other city. \
Our budget is medium, and we prefer a mix of hotel and traditional ryokan accommodations. \
Please suggest an itinerary.";

/// Trip Planner agent API test tool
#[derive(Parser, Debug)]
#[command(
    name = "trip-planner",
    version,
    about = "Talk to the Trip Planner agent over its HTTP API",
    after_help = "Default: a fresh session and the basic query (5-day Paris trip).\n\
                  Flags combine, e.g. --complex --no-fresh."
)]
pub struct Cli {
    /// Run the complex query (10-day Japan trip with cherry blossoms)
    #[arg(long)]
    pub complex: bool,

    /// List all sessions for the user and exit
    #[arg(long)]
    pub list_sessions: bool,

    /// Use a specific, existing session id
    #[arg(long, value_name = "ID")]
    pub session: Option<String>,

    /// Create a fresh session (default)
    #[arg(long, overrides_with = "no_fresh")]
    pub fresh: bool,

    /// Reuse an existing session, creating one only if none is usable
    #[arg(long, overrides_with = "fresh")]
    pub no_fresh: bool,

    /// Custom question to ask the agent
    #[arg(short, long, value_name = "TEXT")]
    pub question: Option<String>,

    /// Further questions sent on the same session after the first reply
    #[arg(long = "follow-up", value_name = "TEXT")]
    pub follow_up: Vec<String>,

    /// Agent server base URL (e.g. http://localhost:8080)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Application name on the agent server
    #[arg(long)]
    pub app_name: Option<String>,

    /// User id sessions are scoped to
    #[arg(long)]
    pub user_id: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Attempts per request; above 1 enables retry with backoff
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Which canned query (and banner) a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Standard,
    Complex,
}

impl QueryKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD QUERY",
            Self::Complex => "COMPLEX QUERY",
        }
    }

    pub fn default_query(&self) -> &'static str {
        match self {
            Self::Standard => BASIC_QUERY,
            Self::Complex => COMPLEX_QUERY,
        }
    }
}

impl Cli {
    pub fn use_fresh(&self) -> bool {
        !self.no_fresh
    }

    pub fn query_kind(&self) -> QueryKind {
        if self.complex {
            QueryKind::Complex
        } else {
            QueryKind::Standard
        }
    }

    /// The first question: `--question`, else the canned query.
    pub fn query_text(&self) -> String {
        self.question
            .clone()
            .unwrap_or_else(|| self.query_kind().default_query().to_string())
    }

    /// An explicit session wins over `--fresh` / `--no-fresh`.
    pub fn strategy(&self) -> ResolveStrategy {
        match (&self.session, self.use_fresh()) {
            (Some(id), _) => ResolveStrategy::Explicit(id.clone()),
            (None, true) => ResolveStrategy::Fresh,
            (None, false) => ResolveStrategy::ReuseOrCreate,
        }
    }

    /// Apply flag overrides on top of file/env configuration.
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }
        if let Some(ref app) = self.app_name {
            config.app_name = app.clone();
        }
        if let Some(ref user) = self.user_id {
            config.user_id = user.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = self.max_attempts {
            config.retry = RetryPolicy::with_attempts(attempts);
        }
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "trip_planner=info",
            1 => "trip_planner=debug",
            _ => "trip_planner=trace,reqwest=debug",
        }
    }
}
