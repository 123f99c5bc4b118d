//! Message protocol definitions
//!
//! Newline-delimited UTF-8 text in both directions. Client lines are either
//! plain chat or `/keyword data` commands; server lines are chat deliveries
//! or `#`-prefixed notices.

use std::fmt;

use crate::error::ChatError;
use crate::types::Alias;

/// First character of a client command line
pub const COMMAND_PREFIX: char = '/';

/// Client → Server line
///
/// Borrowed view over a raw line; nothing is copied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientLine<'a> {
    /// Plain chat message: the whole line, untouched
    Chat(&'a str),
    /// `/keyword data`: keyword without the prefix, data with leading
    /// whitespace skipped and otherwise verbatim
    Command { keyword: &'a str, data: &'a str },
}

impl<'a> ClientLine<'a> {
    /// Parse a raw line. Returns `None` for a line without any token.
    pub fn parse(line: &'a str) -> Option<Self> {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return None;
        }

        let Some(command) = trimmed.strip_prefix(COMMAND_PREFIX) else {
            return Some(ClientLine::Chat(line));
        };

        let (keyword, data) = command
            .split_once(char::is_whitespace)
            .unwrap_or((command, ""));

        Some(ClientLine::Command {
            keyword,
            data: data.trim_start(),
        })
    }
}

/// Server → Client line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerLine {
    /// Alias confirmed or changed
    Alias(Alias),
    /// Roster of the other active sessions
    List(Vec<Alias>),
    /// A session joined
    Connected(Alias),
    /// A session dropped without `/quit`
    Disconnected(Alias),
    /// A session changed its alias
    Renamed { from: Alias, to: Alias },
    /// Direct message delivery
    Private { from: Alias, content: String },
    /// Broadcast chat delivery
    Chat { from: Alias, content: String },
    /// Error reply
    Error(ErrorCode),
}

impl fmt::Display for ServerLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerLine::Alias(alias) => write!(f, "#alias {}", alias),
            ServerLine::List(aliases) => {
                f.write_str("#list")?;
                for alias in aliases {
                    write!(f, " {}", alias)?;
                }
                Ok(())
            }
            ServerLine::Connected(alias) => write!(f, "#connected {}", alias),
            ServerLine::Disconnected(alias) => write!(f, "#disconnected {}", alias),
            ServerLine::Renamed { from, to } => write!(f, "#renamed {} {}", from, to),
            ServerLine::Private { from, content } => write!(f, "#private {} {}", from, content),
            ServerLine::Chat { from, content } => write!(f, "{}: {}", from, content),
            ServerLine::Error(code) => write!(f, "#error {}", code),
        }
    }
}

/// Error codes carried by `#error` lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Alias empty or already taken
    InvalidAlias,
    /// Unknown command keyword
    InvalidCommand,
    /// Private message to an unknown alias
    InvalidRecipient,
    /// Command without its required argument
    MissingArgument,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidAlias => "invalid_alias",
            ErrorCode::InvalidCommand => "invalid_command",
            ErrorCode::InvalidRecipient => "invalid_recipient",
            ErrorCode::MissingArgument => "missing_argument",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a protocol error into the `#error` line answering it
///
/// Errors that have no wire representation (transport, IO, internal
/// channel, unregistered session) are handed back unchanged.
impl TryFrom<ChatError> for ServerLine {
    type Error = ChatError;

    fn try_from(err: ChatError) -> Result<Self, ChatError> {
        let code = match err {
            ChatError::AliasTaken(_) | ChatError::AliasInvalid => ErrorCode::InvalidAlias,
            ChatError::UnknownCommand(_) => ErrorCode::InvalidCommand,
            ChatError::MissingArgument(_) => ErrorCode::MissingArgument,
            ChatError::RecipientNotFound(_) => ErrorCode::InvalidRecipient,
            ChatError::UnknownSession(_)
            | ChatError::Transport(_)
            | ChatError::Io(_)
            | ChatError::ChannelSend => return Err(err),
        };
        Ok(ServerLine::Error(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(name: &str) -> Alias {
        Alias::parse(name).unwrap()
    }

    #[test]
    fn test_parse_chat_line() {
        assert_eq!(
            ClientLine::parse("  hello world"),
            Some(ClientLine::Chat("  hello world"))
        );
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(ClientLine::parse(""), None);
        assert_eq!(ClientLine::parse("   \t"), None);
    }

    #[test]
    fn test_parse_command_with_data() {
        assert_eq!(
            ClientLine::parse("/private   bob  hello  there "),
            Some(ClientLine::Command {
                keyword: "private",
                data: "bob  hello  there ",
            })
        );
    }

    #[test]
    fn test_parse_command_without_data() {
        assert_eq!(
            ClientLine::parse("/list"),
            Some(ClientLine::Command {
                keyword: "list",
                data: "",
            })
        );
    }

    #[test]
    fn test_parse_bare_prefix() {
        assert_eq!(
            ClientLine::parse("/ list"),
            Some(ClientLine::Command {
                keyword: "",
                data: "list",
            })
        );
    }

    #[test]
    fn test_server_line_format() {
        assert_eq!(ServerLine::Alias(alias("alice")).to_string(), "#alias alice");
        assert_eq!(
            ServerLine::List(vec![alias("bob"), alias("carol")]).to_string(),
            "#list bob carol"
        );
        assert_eq!(ServerLine::List(Vec::new()).to_string(), "#list");
        assert_eq!(
            ServerLine::Chat {
                from: alias("bob"),
                content: "hi all".to_string(),
            }
            .to_string(),
            "bob: hi all"
        );
        assert_eq!(
            ServerLine::Renamed {
                from: alias("bob"),
                to: alias("robert"),
            }
            .to_string(),
            "#renamed bob robert"
        );
    }

    #[test]
    fn test_error_line_format() {
        let cases = [
            (ChatError::RecipientNotFound("ghost".to_string()), "#error invalid_recipient"),
            (ChatError::AliasTaken("alice".to_string()), "#error invalid_alias"),
            (ChatError::AliasInvalid, "#error invalid_alias"),
            (ChatError::UnknownCommand("dance".to_string()), "#error invalid_command"),
            (ChatError::MissingArgument("alias"), "#error missing_argument"),
        ];

        for (err, expected) in cases {
            let line = ServerLine::try_from(err).unwrap();
            assert_eq!(line.to_string(), expected);
        }
    }

    #[test]
    fn test_fatal_errors_have_no_error_line() {
        let err = ServerLine::try_from(ChatError::ChannelSend).unwrap_err();
        assert!(matches!(err, ChatError::ChannelSend));

        let err = ServerLine::try_from(ChatError::Transport(
            tokio_util::codec::LinesCodecError::MaxLineLengthExceeded,
        ))
        .unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));

        let id = crate::types::SessionId::new();
        let err = ServerLine::try_from(ChatError::UnknownSession(id)).unwrap_err();
        assert!(matches!(err, ChatError::UnknownSession(other) if other == id));
    }
}
