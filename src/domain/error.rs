//! Validation errors raised while constructing domain values.

use thiserror::Error;

/// Errors returned by domain value constructors and persisted-value parsers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The recurrence interval is below the supported floor.
    #[error("plan interval must be at least {minimum_minutes} minutes, got {got_seconds} seconds")]
    IntervalTooShort {
        /// The minimum interval, in minutes.
        minimum_minutes: i64,
        /// The rejected interval, in seconds.
        got_seconds: i64,
    },

    /// A persisted priority value does not match any known priority.
    #[error("unknown priority value: {0}")]
    UnknownPriority(i32),

    /// A persisted object-kind value does not match any known kind.
    #[error("unknown object kind: {0}")]
    UnknownObjectKind(String),
}
