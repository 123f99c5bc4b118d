//! ChatServer Actor implementation
//!
//! The central actor that owns the client registry. Connection tasks talk to
//! it only through `ServerCommand`s, so registry access needs no locks and
//! each command is applied atomically with respect to every other session.

use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::broadcast::broadcast;
use crate::config::ServerConfig;
use crate::connection::handle_connection;
use crate::error::ChatError;
use crate::message::ServerLine;
use crate::registry::Registry;
use crate::router;
use crate::session::Session;
use crate::types::{Alias, SessionId};

/// Commands sent from connection tasks to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// First line of a negotiating connection
    Join {
        session_id: SessionId,
        candidate: String,
        outbox: mpsc::Sender<String>,
        respond_to: oneshot::Sender<Result<Alias, ChatError>>,
    },
    /// A complete line from an active session
    Line {
        session_id: SessionId,
        line: String,
    },
    /// The connection's transport ended
    Disconnect {
        session_id: SessionId,
    },
}

/// The main ChatServer actor
pub struct ChatServer {
    /// Active sessions
    registry: Registry,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: Registry::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Join {
                session_id,
                candidate,
                outbox,
                respond_to,
            } => {
                let result = self.handle_join(session_id, &candidate, outbox);
                // The connection may already be gone
                let _ = respond_to.send(result);
            }
            ServerCommand::Line { session_id, line } => {
                router::process(&mut self.registry, session_id, &line);
            }
            ServerCommand::Disconnect { session_id } => {
                self.handle_disconnect(session_id);
            }
        }
    }

    /// Handle alias negotiation
    ///
    /// On success the new session gets its alias confirmation and the roster,
    /// and everyone else gets `#connected`. On failure nothing is registered.
    fn handle_join(
        &mut self,
        session_id: SessionId,
        candidate: &str,
        outbox: mpsc::Sender<String>,
    ) -> Result<Alias, ChatError> {
        let alias = Alias::parse(candidate).ok_or(ChatError::AliasInvalid)?;

        self.registry
            .insert(Session::new(session_id, alias.clone(), outbox))?;
        info!("Client {} joined as '{}'", session_id, alias);

        if let Some(session) = self.registry.get(session_id) {
            session.write(&ServerLine::Alias(alias.clone()));
            session.write(&router::roster(&self.registry, session_id));
        }
        broadcast(
            &self.registry,
            &ServerLine::Connected(alias.clone()),
            Some(session_id),
        );

        debug!("Total sessions: {}", self.registry.len());
        Ok(alias)
    }

    /// Handle transport loss
    ///
    /// Only a session still registered (i.e. one that did not `/quit`) is
    /// announced as disconnected.
    fn handle_disconnect(&mut self, session_id: SessionId) {
        let Some(session) = self.registry.remove(session_id) else {
            debug!("Session {} already removed", session_id);
            return;
        };

        info!("Client '{}' ({}) disconnected", session.alias, session_id);
        broadcast(&self.registry, &ServerLine::Disconnected(session.alias), None);

        debug!("Total sessions: {}", self.registry.len());
    }
}

/// Accept connections forever
///
/// Starts the ChatServer actor and spawns one connection task per accepted
/// socket. A failing connection never affects the listener.
pub async fn serve(listener: TcpListener, config: ServerConfig) {
    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
    tokio::spawn(ChatServer::new(cmd_rx).run());

    info!("ChatServer actor started");

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx, config).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
