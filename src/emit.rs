// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, warn};

use crate::width::declaration;
use crate::{ConnectionKind, ModDef, ModInst, Port, Registry};

/// Generates the text of a module named `top_name` that instantiates every
/// instance in `instances`, in order.
///
/// Top-level ports come from connections whose kind matches the direction
/// of the instance port they bind (an `input` connection on an input port,
/// an `output` connection on an output port). Connections of kind `wire`
/// declare one internal wire per signal name; if the same signal is seen
/// with different widths, the last one wins. Parameters are listed in the
/// order the module declares them, using the instance override when there
/// is one. Ports without a connection are left open as `.port()`.
///
/// Generation is best-effort and never fails: mismatched connection kinds are
/// skipped, and duplicate top-level signal names are emitted as they are.
/// Use `Registry::lint` to find such problems.
///
/// The layout is normalized: top ports, wires and instance headers are
/// indented two spaces, connections and overrides four, and every instance
/// block is followed by one blank line. Tools that compare output should
/// compare tokens, not whitespace.
pub fn emit_top<'a>(
    top_name: &str,
    instances: impl IntoIterator<Item = &'a ModInst>,
    mod_defs: &IndexMap<String, ModDef>,
) -> String {
    let resolved = instances
        .into_iter()
        .filter_map(|inst| match mod_defs.get(&inst.mod_def_name) {
            Some(mod_def) => Some((inst, mod_def)),
            None => {
                warn!(
                    "Skipping instance {}: module {} is not known",
                    inst.name, inst.mod_def_name
                );
                None
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "Emitting top module {top_name} with {} instance(s)",
        resolved.len()
    );

    let mut lines = vec![
        format!("// Auto-generated top module: {top_name}"),
        format!("module {top_name} ("),
    ];

    // Top-level ports

    let top_ports = resolved
        .iter()
        .flat_map(|&(inst, mod_def)| connected_ports(inst, mod_def))
        .filter(|(port, kind, _)| kind.exports(port.direction))
        .map(|(port, _, signal)| {
            format!(
                "  {}",
                declaration(&format!("{} wire", port.direction), &port.width, signal)
            )
        })
        .collect::<Vec<_>>();

    if !top_ports.is_empty() {
        lines.push(top_ports.join(",\n"));
    }
    lines.push(");\n".to_string());

    // Internal wires

    let mut wires: IndexMap<&str, &str> = IndexMap::new();
    for &(inst, mod_def) in &resolved {
        for (port, kind, signal) in connected_ports(inst, mod_def) {
            if kind == ConnectionKind::Wire {
                wires.insert(signal, &port.width);
            }
        }
    }

    for (signal, width) in &wires {
        lines.push(format!("  {};", declaration("wire", width, signal)));
    }
    if !wires.is_empty() {
        lines.push(String::new());
    }

    // Instances

    for &(inst, mod_def) in &resolved {
        lines.push(format!("  // Source: {}", mod_def.filepath));

        let parameters = mod_def
            .parameters
            .iter()
            .map(|parameter| format!(".{}({})", parameter.name, inst.parameter_value(parameter)))
            .collect::<Vec<_>>();

        let parameter_clause = if parameters.is_empty() {
            String::new()
        } else {
            format!(" #(\n    {}\n  )", parameters.join(",\n    "))
        };

        lines.push(format!(
            "  {}{} {} (",
            mod_def.name, parameter_clause, inst.name
        ));

        let ports = mod_def
            .ports
            .iter()
            .map(|port| match inst.connections.get(&port.name) {
                Some(connection) => format!("    .{}({})", port.name, connection.signal),
                None => format!("    .{}()", port.name),
            })
            .join(",\n");
        if !ports.is_empty() {
            lines.push(ports);
        }

        lines.push("  );\n".to_string());
    }

    lines.push("endmodule".to_string());
    lines.join("\n")
}

/// Connections of `inst` that name a signal and refer to a port its module
/// declares, in the order the connections were made.
fn connected_ports<'a>(
    inst: &'a ModInst,
    mod_def: &'a ModDef,
) -> impl Iterator<Item = (&'a Port, ConnectionKind, &'a str)> + 'a {
    inst.connections
        .iter()
        .filter(|(_, connection)| connection.has_signal())
        .filter_map(move |(port_name, connection)| {
            mod_def
                .get_port(port_name)
                .map(|port| (port, connection.kind, connection.signal.as_str()))
        })
}

impl Registry {
    /// Generates a top module named `top_name` that instantiates every
    /// instance in this registry. See `emit_top`.
    pub fn emit_top(&self, top_name: impl AsRef<str>) -> String {
        emit_top(top_name.as_ref(), &self.instances, &self.mod_defs)
    }
}
