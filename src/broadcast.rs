//! Broadcast delivery
//!
//! Fans one line out to every active session, optionally skipping the
//! session that caused it.

use crate::message::ServerLine;
use crate::registry::Registry;
use crate::types::SessionId;

/// Write `line` to every registered session except `exclude`
///
/// The line is formatted once. Each write is independent: a full or closed
/// outbox on one session does not affect the others. Returns the number of
/// sessions the line was handed to.
pub fn broadcast(registry: &Registry, line: &ServerLine, exclude: Option<SessionId>) -> usize {
    let text = line.to_string();
    let mut delivered = 0;

    for session in registry.all() {
        if Some(session.id) == exclude {
            continue;
        }
        session.deliver(text.clone());
        delivered += 1;
    }

    delivered
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::session::Session;
    use crate::types::Alias;

    fn join(registry: &mut Registry, name: &str) -> (SessionId, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        let id = SessionId::new();
        registry
            .insert(Session::new(id, Alias::parse(name).unwrap(), tx))
            .unwrap();
        (id, rx)
    }

    #[test]
    fn test_broadcast_skips_emitter() {
        let mut registry = Registry::new();
        let (alice, mut alice_rx) = join(&mut registry, "alice");
        let (_bob, mut bob_rx) = join(&mut registry, "bob");
        let (_carol, mut carol_rx) = join(&mut registry, "carol");

        let line = ServerLine::Connected(Alias::parse("alice").unwrap());
        let delivered = broadcast(&registry, &line, Some(alice));

        assert_eq!(delivered, 2);
        assert!(alice_rx.try_recv().is_err());
        assert_eq!(bob_rx.try_recv().ok().as_deref(), Some("#connected alice"));
        assert_eq!(carol_rx.try_recv().ok().as_deref(), Some("#connected alice"));
    }

    #[test]
    fn test_broadcast_without_exclusion() {
        let mut registry = Registry::new();
        let (_alice, mut alice_rx) = join(&mut registry, "alice");
        let (_bob, mut bob_rx) = join(&mut registry, "bob");

        let line = ServerLine::Disconnected(Alias::parse("dave").unwrap());
        assert_eq!(broadcast(&registry, &line, None), 2);

        assert_eq!(alice_rx.try_recv().ok().as_deref(), Some("#disconnected dave"));
        assert_eq!(bob_rx.try_recv().ok().as_deref(), Some("#disconnected dave"));
    }

    #[test]
    fn test_broadcast_survives_closed_outbox() {
        let mut registry = Registry::new();
        let (_alice, alice_rx) = join(&mut registry, "alice");
        let (_bob, mut bob_rx) = join(&mut registry, "bob");
        drop(alice_rx);

        let line = ServerLine::Connected(Alias::parse("carol").unwrap());
        broadcast(&registry, &line, None);

        assert_eq!(bob_rx.try_recv().ok().as_deref(), Some("#connected carol"));
    }

    #[test]
    fn test_broadcast_empty_registry() {
        let registry = Registry::new();
        let line = ServerLine::Connected(Alias::parse("alice").unwrap());
        assert_eq!(broadcast(&registry, &line, None), 0);
    }
}
