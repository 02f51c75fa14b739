//! The `error` module defines the error type shared by the broadcaster,
//! subscriber and transport layers.
//!
//! Expected receive conditions (no data at startup, no fresh data later) are
//! not errors; they are reported through [`crate::subscriber::Outcome`].

use thiserror::Error;

/// Errors surfaced by the publish/subscribe endpoints.
#[derive(Debug, Error)]
pub enum PubSubError {
    /// The requested broadcast port is already bound on this host.
    #[error("port {port} is already in use")]
    BindConflict {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// `connect` was called before any connection settings were supplied.
    #[error("subscriber has no connection settings")]
    NotConfigured,

    /// `try_receive` was called before `connect`.
    #[error("subscriber is not connected")]
    NotConnected,

    /// The endpoint's socket has been released.
    #[error("socket is closed")]
    Closed,

    #[error("invalid topic {0:?}: topics must not contain whitespace")]
    InvalidTopic(String),

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Any other failure of the underlying transport.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<tungstenite::Error> for PubSubError {
    fn from(err: tungstenite::Error) -> Self {
        PubSubError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PubSubError>;
