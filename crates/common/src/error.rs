//! Error types

use thiserror::Error;

/// Main error type for BizLevel
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced level, video, test or artifact is absent from the catalog.
    /// This is a data error and surfaces loudly instead of being skipped.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The level is already in the completed set. Benign for retries.
    #[error("Level already completed: {0}")]
    AlreadyCompleted(String),

    /// Completion was requested before every video, test and artifact of the
    /// level was done, or the level is still locked.
    #[error("Completion gate not satisfied: {0}")]
    GateNotSatisfied(String),

    /// Transient store failure. Reads retry a bounded number of times.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A guarded write lost its optimistic check at commit time.
    #[error("Write conflict: {0}")]
    Conflict(String),

    /// The level catalog violates the dense unique order invariant.
    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
