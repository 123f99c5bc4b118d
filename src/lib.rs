//! Line-based multi-client chat server library
//!
//! Clients connect over TCP and exchange newline-delimited UTF-8 text.
//!
//! # Protocol
//! - The first line a client sends is its alias (first token only). An empty
//!   or taken alias gets `#error invalid_alias` and the connection is closed.
//! - Plain lines are broadcast to everyone else as `<alias>: <line>`.
//! - `/list`, `/private <alias> <message>`, `/alias <name>` and `/quit` are
//!   commands; anything else starting with `/` gets `#error invalid_command`.
//! - Server notices start with `#`: `#alias`, `#list`, `#connected`,
//!   `#disconnected`, `#renamed`, `#private`, `#error`.
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the `Registry` of sessions
//! - Each connection has a `connection` task with a reader and a writer
//! - No locks needed - all registry access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use line_chat::{serve, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::with_port(4000);
//!     let listener = TcpListener::bind(config.bind_addr).await.unwrap();
//!     serve(listener, config).await;
//! }
//! ```

pub mod broadcast;
pub mod config;
pub mod connection;
pub mod error;
pub mod message;
pub mod registry;
pub mod router;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use broadcast::broadcast;
pub use config::ServerConfig;
pub use connection::handle_connection;
pub use error::ChatError;
pub use message::{ClientLine, ErrorCode, ServerLine};
pub use registry::Registry;
pub use router::CommandKind;
pub use server::{serve, ChatServer, ServerCommand};
pub use session::{Session, SessionState};
pub use types::{Alias, SessionId};
