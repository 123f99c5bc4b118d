//! TCP connection handler
//!
//! Drives one client connection through its session lifecycle: alias
//! negotiation, the active read/write loops, and teardown. Framing is done
//! by `LinesCodec`; this module only moves complete lines around.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::ChatError;
use crate::message::ServerLine;
use crate::server::ServerCommand;
use crate::session::SessionState;
use crate::types::SessionId;

/// Handle a new TCP connection
///
/// The first line is the alias candidate. If the server accepts it, lines
/// are forwarded to the server in arrival order until the peer goes away or
/// the session quits; otherwise `#error invalid_alias` is sent and the
/// connection is closed.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
    config: ServerConfig,
) -> Result<(), ChatError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let (reader, writer) = stream.into_split();
    let mut lines_in = FramedRead::new(reader, LinesCodec::new_with_max_length(config.max_line_length));
    let mut lines_out = FramedWrite::new(writer, LinesCodec::new());

    let session_id = SessionId::new();
    let mut state = SessionState::Negotiating;
    debug!("Session {} from {} is {}", session_id, peer_addr, state);

    let candidate = match lines_in.next().await {
        Some(Ok(line)) => line,
        Some(Err(e)) => return Err(e.into()),
        None => {
            debug!("Session {} closed before choosing an alias", session_id);
            return Ok(());
        }
    };

    // Create channel for server -> client lines
    let (outbox_tx, mut outbox_rx) = mpsc::channel::<String>(config.outbox_capacity);
    let (reply_tx, reply_rx) = oneshot::channel();

    cmd_tx
        .send(ServerCommand::Join {
            session_id,
            candidate,
            outbox: outbox_tx,
            respond_to: reply_tx,
        })
        .await
        .map_err(|_| ChatError::ChannelSend)?;

    let alias = match reply_rx.await {
        Ok(Ok(alias)) => alias,
        Ok(Err(e)) => {
            info!("Session {} from {} rejected: {}", session_id, peer_addr, e);
            let line = ServerLine::try_from(e)?;
            let _ = lines_out.send(line.to_string()).await;
            return Ok(());
        }
        Err(_) => return Err(ChatError::ChannelSend),
    };

    state = SessionState::Active;
    info!("Session {} from {} is {} as '{}'", session_id, peer_addr, state, alias);

    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (socket -> ServerCommand)
    let mut read_task = tokio::spawn(async move {
        while let Some(frame) = lines_in.next().await {
            match frame {
                Ok(line) => {
                    if cmd_tx_read
                        .send(ServerCommand::Line { session_id, line })
                        .await
                        .is_err()
                    {
                        debug!("Server closed, ending read task for {}", session_id);
                        break;
                    }
                }
                Err(e) => {
                    warn!("Read error for {}: {}", session_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", session_id);
    });

    // Spawn write task (outbox -> socket). Ends once the registry drops the
    // session's sender, after flushing whatever was queued before that.
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = outbox_rx.recv().await {
            if let Err(e) = lines_out.send(line).await {
                debug!("Write failed for {}: {}", session_id, e);
                break;
            }
        }
        // LinesCodec encodes any AsRef<str>, so the item type must be named
        let _ = SinkExt::<String>::close(&mut lines_out).await;
        debug!("Write task ended for {}", session_id);
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut read_task => {
            debug!("Read side of {} finished", session_id);
            write_task.abort();
        }
        _ = &mut write_task => {
            debug!("Write side of {} finished", session_id);
            read_task.abort();
        }
    }

    // No-op for a session that already quit
    let _ = cmd_tx.send(ServerCommand::Disconnect { session_id }).await;

    state = SessionState::Terminated;
    info!("Session {} ('{}') {}", session_id, alias, state);

    Ok(())
}
