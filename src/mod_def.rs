// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use indexmap::IndexMap;

mod parameterize;
pub use parameterize::{Parameter, ParameterType};

mod parser;
pub(crate) use parser::read_source;
pub use parser::{HeaderParser, RegexHeaderParser};

mod parser_cfg;
pub use parser_cfg::ParserConfig;

mod ports;
pub use ports::Port;

/// Represents a module definition extracted from a Verilog source file, like
/// `module <name> ... endmodule`. Only the header is captured: name, ports,
/// parameters, and the macros that were expanded while reading it.
///
/// Once a `ModDef` is registered it is never edited in place; refreshing a
/// module replaces the whole record.
#[derive(Clone, Debug, PartialEq)]
pub struct ModDef {
    pub(crate) name: String,
    pub(crate) filepath: String,
    pub(crate) ports: Vec<Port>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) macros: IndexMap<String, String>,
}

impl ModDef {
    /// Creates an empty module definition with the given name, remembering
    /// `filepath` as the file it came from.
    pub fn new(name: impl AsRef<str>, filepath: impl AsRef<str>) -> ModDef {
        ModDef {
            name: name.as_ref().to_string(),
            filepath: filepath.as_ref().to_string(),
            ports: Vec::new(),
            parameters: Vec::new(),
            macros: IndexMap::new(),
        }
    }

    /// Returns the name of this module definition.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Returns the path of the file this module definition was parsed from.
    /// The file is not re-read unless the module is refreshed.
    pub fn get_filepath(&self) -> &str {
        &self.filepath
    }

    /// Returns the macros applied while parsing, in discovery order.
    pub fn get_macros(&self) -> &IndexMap<String, String> {
        &self.macros
    }

    /// Records a macro binding. A later binding for the same name replaces
    /// the earlier value.
    pub fn add_macro(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) {
        self.macros
            .insert(name.as_ref().to_string(), value.as_ref().to_string());
    }
}

impl fmt::Display for ModDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, crate::util::basename(&self.filepath))
    }
}
