use thiserror::Error;

/// Errors surfaced by environment setup and navigation queries.
///
/// Path-level failures that still produce a (partial) path, such as a stuck ascent or
/// disconnected regions, are reported through [`crate::PathOutcome`] instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NavError {
    #[error("navigation environment is not configured")]
    NotConfigured,

    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error("duplicate destination id: {0}")]
    DuplicateDestination(String),

    #[error("destination {0} has no navigable cell within the snap radius")]
    UnreachableDestination(String),

    #[error("no navigable cell near start point ({x}, {y})")]
    StartUnreachable { x: f32, y: f32 },

    #[error("destination {destination} is on floor {expected}, requested floor {requested}")]
    FloorMismatch {
        destination: String,
        expected: i32,
        requested: i32,
    },

    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),

    #[error("route error: {0}")]
    Route(String),
}

pub type Result<T> = std::result::Result<T, NavError>;
