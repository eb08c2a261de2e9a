// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{Direction, Error, ModDef, Result};

/// A port on a module definition. `width` is either a decimal bit count
/// (`"1"` when the declaration has no range) or the raw text between the
/// brackets of a range, such as `"7:0"` or `"WIDTH-1:0"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
    pub dtype: String,
    pub width: String,
    /// Unpacked dimensions. Reserved; the header parser never fills it in.
    #[serde(default)]
    pub dimensions: Vec<String>,
}

impl Port {
    /// Creates a one-bit `wire` port.
    pub fn new(name: impl AsRef<str>, direction: Direction) -> Port {
        Port {
            name: name.as_ref().to_string(),
            direction,
            dtype: "wire".to_string(),
            width: "1".to_string(),
            dimensions: Vec::new(),
        }
    }

    /// Returns the same port with a different width expression.
    pub fn with_width(mut self, width: impl AsRef<str>) -> Port {
        self.width = width.as_ref().to_string();
        self
    }

    /// Returns the same port with a different type keyword.
    pub fn with_dtype(mut self, dtype: impl AsRef<str>) -> Port {
        self.dtype = dtype.as_ref().to_string();
        self
    }
}

impl ModDef {
    /// Adds a port to this module definition. Port names are unique within a
    /// module; adding a second port with an existing name fails and leaves
    /// the module unchanged.
    pub fn add_port(&mut self, port: Port) -> Result<()> {
        if self.get_port(&port.name).is_some() {
            return Err(Error::DuplicatePort {
                mod_def: self.name.clone(),
                port: port.name,
            });
        }
        self.ports.push(port);
        Ok(())
    }

    /// Returns the ports of this module definition in declaration order.
    pub fn get_ports(&self) -> &[Port] {
        &self.ports
    }

    /// Returns the port with the given name, if it exists.
    pub fn get_port(&self, name: impl AsRef<str>) -> Option<&Port> {
        self.ports.iter().find(|port| port.name == name.as_ref())
    }

    pub fn has_port(&self, name: impl AsRef<str>) -> bool {
        self.get_port(name).is_some()
    }
}
