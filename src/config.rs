//! Server configuration
//!
//! Built by the binary from command-line arguments; library users construct
//! it directly.

use std::net::{Ipv4Addr, SocketAddr};

/// Channel buffer size for server commands
pub const DEFAULT_COMMAND_BUFFER: usize = 256;

/// Lines queued per session before further lines to it are dropped
pub const DEFAULT_OUTBOX_CAPACITY: usize = 64;

/// Longest accepted line, in bytes, excluding the newline
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub bind_addr: SocketAddr,
    /// Capacity of the connection → server command channel
    pub command_buffer: usize,
    /// Capacity of each session's outbound line queue
    pub outbox_capacity: usize,
    /// A longer line is treated as a transport failure
    pub max_line_length: usize,
}

impl ServerConfig {
    /// Configuration with default limits for the given bind address
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            command_buffer: DEFAULT_COMMAND_BUFFER,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    /// Listen on every IPv4 interface at `port`
    pub fn with_port(port: u16) -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_port_binds_all_interfaces() {
        let config = ServerConfig::with_port(4000);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:4000");
        assert_eq!(config.outbox_capacity, DEFAULT_OUTBOX_CAPACITY);
        assert_eq!(config.max_line_length, DEFAULT_MAX_LINE_LENGTH);
    }
}
