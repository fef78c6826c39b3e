//! Unified error classification and recovery.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Timeout,
    RateLimit,
    Server,
    Protocol,
    Session,
    Conflict,
    Configuration,
    Serialization,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    CheckServer,
    RetryWithBackoff,
    IncreaseTimeout,
    CheckConfiguration,
    CreateFreshSession,
    InspectResponse,
}
