//! Command router
//!
//! Turns one raw line from an active session into registry changes and
//! outgoing lines. Command keywords resolve through a fixed table to a
//! `CommandKind`, and each kind has exactly one handler.

use tracing::{debug, info, warn};

use crate::broadcast::broadcast;
use crate::error::ChatError;
use crate::message::{ClientLine, ServerLine};
use crate::registry::Registry;
use crate::types::{Alias, SessionId};

/// Recognized commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Leave the chat
    Quit,
    /// Request the roster
    List,
    /// Direct message to one alias
    Private,
    /// Change own alias
    Alias,
}

impl CommandKind {
    /// Resolve a keyword (without the `/` prefix). Case-sensitive.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "quit" => Some(CommandKind::Quit),
            "list" => Some(CommandKind::List),
            "private" => Some(CommandKind::Private),
            "alias" => Some(CommandKind::Alias),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            CommandKind::Quit => "quit",
            CommandKind::List => "list",
            CommandKind::Private => "private",
            CommandKind::Alias => "alias",
        }
    }

    fn dispatch(self, registry: &mut Registry, id: SessionId, data: &str) -> Result<(), ChatError> {
        match self {
            CommandKind::Quit => handle_quit(registry, id),
            CommandKind::List => handle_list(registry, id),
            CommandKind::Private => handle_private(registry, id, data),
            CommandKind::Alias => handle_alias(registry, id, data),
        }
    }
}

/// Process one line received from session `id`
///
/// Lines from sessions that are not (or no longer) registered are ignored.
/// Protocol errors are answered to the sender only.
pub fn process(registry: &mut Registry, id: SessionId, raw: &str) {
    let Some(sender) = registry.alias_of(id).cloned() else {
        debug!("Dropping line from unregistered session {}", id);
        return;
    };

    let Some(line) = ClientLine::parse(raw) else {
        return;
    };

    let result = match line {
        ClientLine::Chat(content) => {
            let chat = ServerLine::Chat {
                from: sender,
                content: content.to_string(),
            };
            broadcast(registry, &chat, Some(id));
            Ok(())
        }
        ClientLine::Command { keyword, data } => match CommandKind::from_keyword(keyword) {
            Some(kind) => kind.dispatch(registry, id, data),
            None => Err(ChatError::UnknownCommand(keyword.to_string())),
        },
    };

    if let Err(e) = result {
        match ServerLine::try_from(e) {
            Ok(line) => {
                debug!("Command from {} rejected: {}", id, line);
                reply(registry, id, &line);
            }
            Err(e) => warn!("Command from {} failed: {}", id, e),
        }
    }
}

/// The roster line a session receives on join and on `/list`
pub fn roster(registry: &Registry, id: SessionId) -> ServerLine {
    ServerLine::List(registry.roster_except(id))
}

fn reply(registry: &Registry, id: SessionId, line: &ServerLine) {
    if let Some(session) = registry.get(id) {
        session.write(line);
    }
}

fn handle_quit(registry: &mut Registry, id: SessionId) -> Result<(), ChatError> {
    // Dropping the session closes its outbox; the connection winds down from there
    if let Some(session) = registry.remove(id) {
        info!("Client '{}' ({}) quit", session.alias, id);
    }
    Ok(())
}

fn handle_list(registry: &mut Registry, id: SessionId) -> Result<(), ChatError> {
    reply(registry, id, &roster(registry, id));
    Ok(())
}

fn handle_private(registry: &mut Registry, id: SessionId, data: &str) -> Result<(), ChatError> {
    let missing = || ChatError::MissingArgument(CommandKind::Private.keyword());

    let (recipient, content) = data.split_once(' ').ok_or_else(missing)?;
    if recipient.is_empty() || content.is_empty() {
        return Err(missing());
    }

    let Some(from) = registry.alias_of(id).cloned() else {
        return Ok(());
    };
    let Some(target) = registry.find(recipient) else {
        return Err(ChatError::RecipientNotFound(recipient.to_string()));
    };

    target.write(&ServerLine::Private {
        from,
        content: content.to_string(),
    });
    Ok(())
}

fn handle_alias(registry: &mut Registry, id: SessionId, data: &str) -> Result<(), ChatError> {
    let alias =
        Alias::parse(data).ok_or(ChatError::MissingArgument(CommandKind::Alias.keyword()))?;

    let old = registry.rename(id, alias.clone())?;
    reply(registry, id, &ServerLine::Alias(alias.clone()));

    if old != alias {
        info!("Client {} renamed '{}' -> '{}'", id, old, alias);
        broadcast(
            registry,
            &ServerLine::Renamed {
                from: old,
                to: alias,
            },
            Some(id),
        );
    }
    Ok(())
}
