// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents the direction of a port. `Wire` is used when the header parser
/// could not determine a direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
    InOut,
    #[default]
    Wire,
}

impl Direction {
    /// Parses a direction keyword, ignoring case.
    pub fn from_keyword(keyword: &str) -> Option<Direction> {
        match keyword.to_ascii_lowercase().as_str() {
            "input" => Some(Direction::Input),
            "output" => Some(Direction::Output),
            "inout" => Some(Direction::InOut),
            "wire" => Some(Direction::Wire),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::InOut => "inout",
            Direction::Wire => "wire",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
