// SPDX-License-Identifier: Apache-2.0

//! Read the headers of Verilog modules and stitch instances of them together
//! into a generated top module.
//!
//! Module headers are recovered with pattern matching rather than a full
//! grammar (see `RegexHeaderParser`). Parsed modules and their instances live
//! in a `Registry`; `Registry::emit_project` writes the top module along with
//! a payload line from which `Registry::from_emitted` restores the registry.

mod connection;
pub use connection::{Connection, ConnectionKind};

mod emit;
pub use emit::emit_top;

mod error;
pub use error::{Error, Result};

mod io;
pub use io::Direction;

mod mod_def;
pub use mod_def::{
    HeaderParser, ModDef, Parameter, ParameterType, ParserConfig, Port, RegexHeaderParser,
};

mod mod_inst;
pub use mod_inst::ModInst;

mod preprocess;
pub use preprocess::{Preprocessed, preprocess};

mod project;

mod registry;
pub use registry::{Registry, SharedRegistry};

pub mod tool_data;
pub use tool_data::{ToolData, decode_tool_data, encode_tool_data, find_tool_data};

mod util;

mod validate;
pub use validate::LintIssue;

mod width;
pub use width::packed_range;
