// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;

use crate::{Connection, ConnectionKind, Parameter};

/// Represents an instance of a module definition, like `<mod_def_name>
/// <mod_inst_name> ( ... );` in Verilog.
///
/// An instance refers to its module definition by name; the definition itself
/// lives in the `Registry`, which refuses to drop it while instances remain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModInst {
    pub(crate) name: String,
    pub(crate) mod_def_name: String,
    pub(crate) connections: IndexMap<String, Connection>,
    pub(crate) parameter_values: IndexMap<String, String>,
}

impl ModInst {
    pub(crate) fn new(mod_def_name: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        ModInst {
            name: name.as_ref().to_string(),
            mod_def_name: mod_def_name.as_ref().to_string(),
            connections: IndexMap::new(),
            parameter_values: IndexMap::new(),
        }
    }

    /// Returns the name of this module instance.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the module definition being instantiated.
    pub fn mod_def_name(&self) -> &str {
        &self.mod_def_name
    }

    /// Returns the recorded port connections, in the order they were first
    /// made.
    pub fn connections(&self) -> &IndexMap<String, Connection> {
        &self.connections
    }

    pub fn get_connection(&self, port_name: impl AsRef<str>) -> Option<&Connection> {
        self.connections.get(port_name.as_ref())
    }

    /// Returns the parameter overrides of this instance.
    pub fn parameter_values(&self) -> &IndexMap<String, String> {
        &self.parameter_values
    }

    /// Returns the value this instance uses for `parameter`: its override if
    /// there is one, otherwise the module default.
    pub fn parameter_value<'a>(&'a self, parameter: &'a Parameter) -> &'a str {
        self.parameter_values
            .get(&parameter.name)
            .map(String::as_str)
            .unwrap_or(parameter.value.as_str())
    }

    pub(crate) fn connect(&mut self, port_name: &str, connection: Connection) {
        self.connections.insert(port_name.to_string(), connection);
    }

    /// Changes the kind of a port connection, keeping its signal name.
    pub(crate) fn set_connection_kind(&mut self, port_name: &str, kind: ConnectionKind) {
        self.connections
            .entry(port_name.to_string())
            .or_default()
            .kind = kind;
    }

    /// Changes the signal name of a port connection, keeping its kind.
    pub(crate) fn set_signal_name(&mut self, port_name: &str, signal: &str) {
        self.connections
            .entry(port_name.to_string())
            .or_default()
            .signal = signal.to_string();
    }

    pub(crate) fn disconnect(&mut self, port_name: &str) -> Option<Connection> {
        self.connections.shift_remove(port_name)
    }

    pub(crate) fn set_parameter_value(&mut self, parameter_name: &str, value: &str) {
        self.parameter_values
            .insert(parameter_name.to_string(), value.to_string());
    }

    pub(crate) fn clear_parameter_value(&mut self, parameter_name: &str) -> Option<String> {
        self.parameter_values.shift_remove(parameter_name)
    }
}
