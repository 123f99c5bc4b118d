//! Client registry
//!
//! The live set of active sessions keyed by alias. Owned by the
//! `ChatServer` actor, so every operation runs to completion before any
//! other session's command is looked at.

use std::collections::HashMap;

use crate::error::ChatError;
use crate::session::Session;
use crate::types::{Alias, SessionId};

/// Active sessions by alias
///
/// Invariant: `sessions` and `aliases` describe the same set; every alias
/// maps to exactly one session and every session id to its current alias.
#[derive(Debug, Default)]
pub struct Registry {
    /// Alias -> Session
    sessions: HashMap<Alias, Session>,
    /// SessionId -> Alias, for lookups from a connection's own commands
    aliases: HashMap<SessionId, Alias>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active session under its alias
    ///
    /// Fails with `AliasTaken` when another session already holds the alias.
    pub fn insert(&mut self, session: Session) -> Result<(), ChatError> {
        if self.sessions.contains_key(&session.alias) {
            return Err(ChatError::AliasTaken(session.alias.to_string()));
        }

        self.aliases.insert(session.id, session.alias.clone());
        self.sessions.insert(session.alias.clone(), session);
        Ok(())
    }

    /// Remove a session by identity
    ///
    /// Returns `None` when the session is not registered, which makes a
    /// second removal a no-op.
    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        let alias = self.aliases.remove(&id)?;
        self.sessions.remove(&alias)
    }

    /// Exact-match lookup by alias
    pub fn find(&self, alias: &str) -> Option<&Session> {
        self.sessions.get(alias)
    }

    /// Lookup by session id
    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.aliases.get(&id).and_then(|alias| self.sessions.get(alias))
    }

    /// Current alias of a session
    pub fn alias_of(&self, id: SessionId) -> Option<&Alias> {
        self.aliases.get(&id)
    }

    /// Snapshot of every active session
    pub fn all(&self) -> Vec<&Session> {
        self.sessions.values().collect()
    }

    /// Aliases of every active session except `id`
    pub fn roster_except(&self, id: SessionId) -> Vec<Alias> {
        self.sessions
            .values()
            .filter(|session| session.id != id)
            .map(|session| session.alias.clone())
            .collect()
    }

    /// Re-key a session under a new alias
    ///
    /// Returns the previous alias. Renaming to the alias the session already
    /// holds succeeds without changes; an unregistered `id` is reported as
    /// `UnknownSession`.
    pub fn rename(&mut self, id: SessionId, alias: Alias) -> Result<Alias, ChatError> {
        let Some(old) = self.aliases.get(&id).cloned() else {
            return Err(ChatError::UnknownSession(id));
        };

        if old == alias {
            return Ok(old);
        }
        if self.sessions.contains_key(&alias) {
            return Err(ChatError::AliasTaken(alias.to_string()));
        }

        let Some(mut session) = self.sessions.remove(&old) else {
            return Err(ChatError::UnknownSession(id));
        };
        session.rename(alias.clone());
        self.aliases.insert(id, alias.clone());
        self.sessions.insert(alias, session);
        Ok(old)
    }

    /// Number of active sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
