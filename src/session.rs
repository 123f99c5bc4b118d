//! Session struct definition
//!
//! Represents an active chat session as seen by the registry: its identity,
//! its alias, and the queue feeding its connection's writer.

use std::fmt;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::message::ServerLine;
use crate::types::{Alias, SessionId};

/// Lifecycle of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, waiting for the alias line
    Negotiating,
    /// Registered under an alias
    Active,
    /// Gone from the registry; transport closed or closing
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Negotiating => "negotiating",
            SessionState::Active => "active",
            SessionState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Active session
///
/// Holds the only sender of the connection's outbox. Dropping the session
/// closes the outbox, which lets the writer flush and shut the socket down.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this connection
    pub id: SessionId,
    /// Current alias
    pub alias: Alias,
    /// Server → connection line queue
    outbox: mpsc::Sender<String>,
}

impl Session {
    /// Create a new session with the given ID, alias and outbox
    pub fn new(id: SessionId, alias: Alias, outbox: mpsc::Sender<String>) -> Self {
        Self { id, alias, outbox }
    }

    /// Queue a line for this session
    ///
    /// Fire and forget: never waits, and a full or closed outbox only
    /// drops the line.
    pub fn write(&self, line: &ServerLine) {
        self.deliver(line.to_string());
    }

    /// Queue already-formatted text for this session
    pub(crate) fn deliver(&self, text: String) {
        match self.outbox.try_send(text) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Outbox full for '{}' ({}), line dropped", self.alias, self.id);
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Outbox closed for '{}' ({}), line dropped", self.alias, self.id);
            }
        }
    }

    /// Change the alias this session is known by
    pub fn rename(&mut self, alias: Alias) {
        self.alias = alias;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_write_appends_to_outbox() {
        let (tx, mut rx) = mpsc::channel(4);
        let session = Session::new(SessionId::new(), Alias::parse("alice").unwrap(), tx);

        session.write(&ServerLine::Alias(session.alias.clone()));

        assert_eq!(rx.recv().await.as_deref(), Some("#alias alice"));
    }

    #[test]
    fn test_session_write_full_outbox_drops() {
        let (tx, mut rx) = mpsc::channel(1);
        let session = Session::new(SessionId::new(), Alias::parse("alice").unwrap(), tx);

        session.deliver("first".to_string());
        session.deliver("second".to_string());

        assert_eq!(rx.try_recv().ok().as_deref(), Some("first"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_session_write_closed_outbox_is_silent() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let session = Session::new(SessionId::new(), Alias::parse("alice").unwrap(), tx);

        session.deliver("lost".to_string());
    }

    #[test]
    fn test_session_rename() {
        let (tx, _rx) = mpsc::channel(1);
        let mut session = Session::new(SessionId::new(), Alias::parse("alice").unwrap(), tx);

        session.rename(Alias::parse("alicia").unwrap());

        assert_eq!(session.alias.as_str(), "alicia");
    }
}
