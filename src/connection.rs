// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::Direction;

/// How an instance port is wired in the generated top module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionKind {
    /// Exported as a top-level input.
    Input,
    /// Exported as a top-level output.
    Output,
    /// Joined to other instance ports through an internal wire.
    Wire,
    #[default]
    Unset,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Input => "input",
            ConnectionKind::Output => "output",
            ConnectionKind::Wire => "wire",
            ConnectionKind::Unset => "",
        }
    }

    /// Returns true if this kind exports a port of the given direction to the
    /// top level. Only an exact match counts.
    pub fn exports(&self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (ConnectionKind::Input, Direction::Input) | (ConnectionKind::Output, Direction::Output)
        )
    }
}

impl From<String> for ConnectionKind {
    fn from(text: String) -> Self {
        match text.as_str() {
            "input" => ConnectionKind::Input,
            "output" => ConnectionKind::Output,
            "wire" => ConnectionKind::Wire,
            "" => ConnectionKind::Unset,
            other => {
                warn!("Unknown connection kind \"{other}\", treating it as unset");
                ConnectionKind::Unset
            }
        }
    }
}

impl From<ConnectionKind> for String {
    fn from(kind: ConnectionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-declared binding of one instance port: its kind and the name of
/// the signal it attaches to. Stored as a `[kind, signal]` pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(ConnectionKind, String)", into = "(ConnectionKind, String)")]
pub struct Connection {
    pub kind: ConnectionKind,
    pub signal: String,
}

impl Connection {
    pub fn new(kind: ConnectionKind, signal: impl AsRef<str>) -> Self {
        Connection {
            kind,
            signal: signal.as_ref().to_string(),
        }
    }

    /// Returns true if a signal name has been given.
    pub fn has_signal(&self) -> bool {
        !self.signal.is_empty()
    }
}

impl From<(ConnectionKind, String)> for Connection {
    fn from((kind, signal): (ConnectionKind, String)) -> Self {
        Connection { kind, signal }
    }
}

impl From<Connection> for (ConnectionKind, String) {
    fn from(connection: Connection) -> Self {
        (connection.kind, connection.signal)
    }
}
