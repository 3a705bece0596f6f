//! netcat command-line dialects.
//!
//! Builds of netcat disagree on how to close the connection once stdin hits
//! EOF. OpenBSD-derived builds expose `-N`; the traditional (Hobbit) build
//! only has the delayed close `-q <secs>`. Listening differs too: the
//! traditional build needs `-p` to bind a port while OpenBSD takes it
//! positionally.
//!
//! If the sender closes in a way the receiver does not notice, the transfer
//! hangs or truncates, so each side is probed separately.

use std::fmt;

/// Flag that closes the socket right after EOF on stdin.
pub const MODERN_CLOSE_FLAG: &str = "-N";

/// Flag that quits a number of seconds after EOF on stdin.
pub const LEGACY_CLOSE_FLAG: &str = "-q";

/// Which end of the data channel a netcat invocation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Remote receiver, waits for the connection
    Listen,
    /// Local sender, connects to the receiver
    Connect,
}

/// The command-line flavor a netcat binary understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NcDialect {
    /// OpenBSD-style listener: `nc -l <port>`
    ListenModern,
    /// Traditional listener: `nc -l -p <port>`
    ListenLegacy,
    /// OpenBSD-style sender: `nc -N <host> <port>`
    ConnectModern,
    /// Traditional sender: `nc -q 0 <host> <port>`
    ConnectLegacy,
    /// Neither close flag was found; legacy forms are used
    Unknown(Role),
}

impl NcDialect {
    /// Classify captured `nc -h` output for the given role.
    ///
    /// The modern marker wins when both markers appear.
    #[must_use]
    pub fn classify(help: &str, role: Role) -> Self {
        let (mut modern, mut legacy) = (false, false);
        for token in help.split_whitespace() {
            match token.trim_matches(|c: char| matches!(c, '[' | ']' | '(' | ')' | ',' | ':')) {
                MODERN_CLOSE_FLAG => modern = true,
                LEGACY_CLOSE_FLAG => legacy = true,
                _ => {}
            }
        }

        match (role, modern, legacy) {
            (Role::Listen, true, _) => Self::ListenModern,
            (Role::Listen, false, true) => Self::ListenLegacy,
            (Role::Connect, true, _) => Self::ConnectModern,
            (Role::Connect, false, true) => Self::ConnectLegacy,
            (role, false, false) => Self::Unknown(role),
        }
    }

    /// Role this dialect was probed for
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::ListenModern | Self::ListenLegacy => Role::Listen,
            Self::ConnectModern | Self::ConnectLegacy => Role::Connect,
            Self::Unknown(role) => role,
        }
    }

    /// Returns true if probing found neither marker
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Arguments for a receiver bound to `port`.
    #[must_use]
    pub fn listen_args(self, port: u16) -> Vec<String> {
        let port = port.to_string();
        match self {
            Self::ListenModern | Self::ConnectModern => vec!["-l".into(), port],
            _ => vec!["-l".into(), "-p".into(), port],
        }
    }

    /// Arguments for a sender connecting to `host:port`.
    #[must_use]
    pub fn connect_args(self, host: &str, port: u16) -> Vec<String> {
        let mut args = match self {
            Self::ListenModern | Self::ConnectModern => vec![MODERN_CLOSE_FLAG.to_owned()],
            _ => vec![LEGACY_CLOSE_FLAG.to_owned(), "0".to_owned()],
        };
        args.push(host.to_owned());
        args.push(port.to_string());
        args
    }
}

impl fmt::Display for NcDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::ListenModern => "listen-modern",
            Self::ListenLegacy => "listen-legacy",
            Self::ConnectModern => "connect-modern",
            Self::ConnectLegacy => "connect-legacy",
            Self::Unknown(_) => "unknown",
        };
        f.write_str(tag)
    }
}
