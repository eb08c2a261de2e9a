// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use indexmap::IndexMap;

use crate::width::packed_range;
use crate::{ConnectionKind, Direction, Registry};

/// A problem that top module generation would silently paper over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LintIssue {
    /// A connection names a port the module does not declare, typically
    /// left over after the module was refreshed.
    UnknownPort { instance: String, port: String },
    /// An `input` or `output` connection on a port of another direction;
    /// no top-level port is generated for it.
    DirectionMismatch {
        instance: String,
        port: String,
        direction: Direction,
        kind: ConnectionKind,
    },
    /// A connection kind was chosen but no signal name was given.
    MissingSignal {
        instance: String,
        port: String,
        kind: ConnectionKind,
    },
    /// A signal name was given but no connection kind, so nothing declares
    /// the signal.
    UndeclaredSignal {
        instance: String,
        port: String,
        signal: String,
    },
    /// A module port with no signal attached.
    DanglingPort { instance: String, port: String },
    /// The same signal is declared more than once in the top module.
    DuplicateDeclaration { signal: String, count: usize },
    /// An internal wire is attached to ports of different widths; the last
    /// width seen is the one declared.
    WireWidthConflict {
        signal: String,
        first: String,
        second: String,
    },
    /// A parameter override for a parameter the module does not declare.
    UnknownParameter { instance: String, parameter: String },
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintIssue::UnknownPort { instance, port } => {
                write!(f, "{instance}.{port} is connected but the port does not exist")
            }
            LintIssue::DirectionMismatch {
                instance,
                port,
                direction,
                kind,
            } => write!(
                f,
                "{instance}.{port} is an {direction} port connected as {kind}"
            ),
            LintIssue::MissingSignal {
                instance,
                port,
                kind,
            } => write!(f, "{instance}.{port} is connected as {kind} without a signal"),
            LintIssue::UndeclaredSignal {
                instance,
                port,
                signal,
            } => write!(
                f,
                "{instance}.{port} uses signal \"{signal}\" without a connection kind"
            ),
            LintIssue::DanglingPort { instance, port } => write!(f, "{instance}.{port} is unconnected"),
            LintIssue::DuplicateDeclaration { signal, count } => {
                write!(f, "Signal \"{signal}\" is declared {count} times")
            }
            LintIssue::WireWidthConflict {
                signal,
                first,
                second,
            } => write!(
                f,
                "Wire \"{signal}\" connects ports of width {first} and {second}"
            ),
            LintIssue::UnknownParameter {
                instance,
                parameter,
            } => write!(
                f,
                "{instance} overrides parameter {parameter}, which does not exist"
            ),
        }
    }
}

impl Registry {
    /// Checks the instances for problems that `emit_top` tolerates. An empty
    /// result means the generated module declares every signal exactly once
    /// and leaves no port open. Generation itself is unaffected.
    pub fn lint(&self) -> Vec<LintIssue> {
        let mut issues = Vec::new();
        let mut declarations: IndexMap<&str, usize> = IndexMap::new();
        let mut wire_widths: IndexMap<&str, &str> = IndexMap::new();

        for inst in &self.instances {
            let Some(mod_def) = self.mod_defs.get(&inst.mod_def_name) else {
                continue;
            };

            for (port_name, connection) in &inst.connections {
                let Some(port) = mod_def.get_port(port_name) else {
                    issues.push(LintIssue::UnknownPort {
                        instance: inst.name.clone(),
                        port: port_name.clone(),
                    });
                    continue;
                };

                match (connection.kind, connection.has_signal()) {
                    (ConnectionKind::Unset, false) => {}
                    (ConnectionKind::Unset, true) => issues.push(LintIssue::UndeclaredSignal {
                        instance: inst.name.clone(),
                        port: port_name.clone(),
                        signal: connection.signal.clone(),
                    }),
                    (kind, false) => issues.push(LintIssue::MissingSignal {
                        instance: inst.name.clone(),
                        port: port_name.clone(),
                        kind,
                    }),
                    (ConnectionKind::Wire, true) => {
                        let signal = connection.signal.as_str();
                        if let Some(first) = wire_widths.insert(signal, &port.width) {
                            if packed_range(first) != packed_range(&port.width) {
                                issues.push(LintIssue::WireWidthConflict {
                                    signal: signal.to_string(),
                                    first: first.to_string(),
                                    second: port.width.clone(),
                                });
                            }
                        } else {
                            *declarations.entry(signal).or_default() += 1;
                        }
                    }
                    (kind, true) if kind.exports(port.direction) => {
                        *declarations.entry(connection.signal.as_str()).or_default() += 1;
                    }
                    (kind, true) => issues.push(LintIssue::DirectionMismatch {
                        instance: inst.name.clone(),
                        port: port_name.clone(),
                        direction: port.direction,
                        kind,
                    }),
                }
            }

            for port in &mod_def.ports {
                let connected = inst
                    .connections
                    .get(&port.name)
                    .is_some_and(|connection| connection.has_signal());
                if !connected {
                    issues.push(LintIssue::DanglingPort {
                        instance: inst.name.clone(),
                        port: port.name.clone(),
                    });
                }
            }

            for parameter in inst.parameter_values.keys() {
                if !mod_def.has_parameter(parameter) {
                    issues.push(LintIssue::UnknownParameter {
                        instance: inst.name.clone(),
                        parameter: parameter.clone(),
                    });
                }
            }
        }

        issues.extend(
            declarations
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(signal, count)| LintIssue::DuplicateDeclaration {
                    signal: signal.to_string(),
                    count,
                }),
        );

        issues
    }
}
