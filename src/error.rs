//! Error types for the chat server
//!
//! Protocol errors are answered with an `#error ...` line and the session
//! stays connected (except during alias negotiation). Transport errors end
//! the session they occurred on and nothing else.

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

use crate::types::SessionId;

/// Application-level errors
#[derive(Debug, Error)]
pub enum ChatError {
    /// Alias already held by another active session
    #[error("Alias already taken: {0}")]
    AliasTaken(String),

    /// Alias candidate was empty
    #[error("Invalid alias")]
    AliasInvalid,

    /// Command keyword not in the command table
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Command issued without a required argument
    #[error("Missing argument for /{0}")]
    MissingArgument(&'static str),

    /// Private message addressed to an alias nobody holds
    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    /// Registry operation on a session that is not (or no longer) active
    #[error("Session not registered: {0}")]
    UnknownSession(SessionId),

    /// Line framing failed: read error, reset, or over-long line (fatal)
    #[error("Transport error: {0}")]
    Transport(#[from] LinesCodecError),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - server actor is gone)
    #[error("Channel send error")]
    ChannelSend,
}
