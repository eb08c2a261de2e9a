// SPDX-License-Identifier: Apache-2.0

//! The project payload embedded at the end of generated top modules.
//!
//! The payload is JSON, base64-encoded, on a single `// TOOL_DATA: <base64>`
//! comment line. The JSON uses `", "` and `": "` separators and escapes every
//! character outside printable ASCII, matching Python's `json.dumps`
//! defaults byte for byte. Older files carry the marker
//! `// VERILOG_TOOL_DATA:`, which is still accepted on read.

use std::io;
use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, Serializer};

use crate::{Connection, Error, ModDef, ModInst, Parameter, Port, Registry, Result};

/// Comment prefix of the payload line written after a generated module.
pub const TOOL_DATA_MARKER: &str = "// TOOL_DATA: ";

static TOOL_DATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"// (?:VERILOG_)?TOOL_DATA: (\S+)").expect("tool data pattern")
});

/// Serialized form of a `Registry`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolData {
    pub modules: IndexMap<String, ModuleRecord>,
    pub instances: Vec<InstanceRecord>,
}

/// Serialized form of a `ModDef`; the name is the key it is stored under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub filepath: String,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub macros: IndexMap<String, String>,
}

/// Serialized form of a `ModInst`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub module: String,
    pub instance_name: String,
    #[serde(default)]
    pub connections: IndexMap<String, Connection>,
    #[serde(default)]
    pub parameter_values: IndexMap<String, String>,
}

impl From<&Registry> for ToolData {
    fn from(registry: &Registry) -> Self {
        ToolData {
            modules: registry
                .mod_defs
                .iter()
                .map(|(name, mod_def)| {
                    (
                        name.clone(),
                        ModuleRecord {
                            filepath: mod_def.filepath.clone(),
                            ports: mod_def.ports.clone(),
                            parameters: mod_def.parameters.clone(),
                            macros: mod_def.macros.clone(),
                        },
                    )
                })
                .collect(),
            instances: registry
                .instances
                .iter()
                .map(|inst| InstanceRecord {
                    module: inst.mod_def_name.clone(),
                    instance_name: inst.name.clone(),
                    connections: inst.connections.clone(),
                    parameter_values: inst.parameter_values.clone(),
                })
                .collect(),
        }
    }
}

impl ToolData {
    /// Rebuilds a registry. Instances of modules missing from the payload are
    /// dropped, as are instances whose name was already taken.
    pub fn into_registry(self) -> Registry {
        let mut registry = Registry::new();

        for (name, record) in self.modules {
            registry.mod_defs.insert(
                name.clone(),
                ModDef {
                    name,
                    filepath: record.filepath,
                    ports: record.ports,
                    parameters: record.parameters,
                    macros: record.macros,
                },
            );
        }

        for record in self.instances {
            if !registry.mod_defs.contains_key(&record.module) {
                warn!(
                    "Dropping instance {}: module {} is not in the project",
                    record.instance_name, record.module
                );
                continue;
            }
            if registry.get_instance(&record.instance_name).is_some() {
                warn!("Dropping duplicate instance {}", record.instance_name);
                continue;
            }
            registry.instances.push(ModInst {
                name: record.instance_name,
                mod_def_name: record.module,
                connections: record.connections,
                parameter_values: record.parameter_values,
            });
        }

        registry
    }

    /// Serializes to JSON in the `json.dumps` layout.
    pub fn to_json(&self) -> Result<String> {
        let mut bytes = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut bytes, CompatFormatter);
        self.serialize(&mut serializer).map_err(Error::tool_data)?;
        String::from_utf8(bytes).map_err(Error::tool_data)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::tool_data)
    }
}

/// Encodes a registry as the base64 payload of a `TOOL_DATA` line.
pub fn encode_tool_data(registry: &Registry) -> Result<String> {
    Ok(STANDARD.encode(ToolData::from(registry).to_json()?))
}

/// Decodes a base64 payload back into a registry.
pub fn decode_tool_data(encoded: &str) -> Result<Registry> {
    let bytes = STANDARD.decode(encoded).map_err(Error::tool_data)?;
    let json = String::from_utf8(bytes).map_err(Error::tool_data)?;
    Ok(ToolData::from_json(&json)?.into_registry())
}

/// Returns the base64 payload of the last tool data line in `text`.
pub fn find_tool_data(text: &str) -> Option<&str> {
    TOOL_DATA_LINE
        .captures_iter(text)
        .last()
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// JSON formatter matching Python's `json.dumps` defaults.
struct CompatFormatter;

impl Formatter for CompatFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
