// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::sync::LazyLock;

use itertools::Itertools;
use log::{debug, info, warn};
use regex::Regex;

use crate::mod_def::parser_cfg::OwnedParserConfig;
use crate::preprocess::preprocess;
use crate::util::{capture, capture_or};
use crate::{Direction, Error, ModDef, Parameter, ParserConfig, Port, Result};

static MODULE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)module\s+(\w+)\s*(?:#\s*\(.*?\)\s*)?\s*\(?(.*?)\)?\s*;")
        .expect("module header pattern")
});

static DIRECTED_PORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(input|output|inout)\s*(wire|logic|reg)?\s*(?:\[([^\]]*?)\])?\s*(\w+)")
        .expect("directed port pattern")
});

static UNDIRECTED_PORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)(\w+)\s*(wire|logic|reg)?\s*(?:\[([^\]]*?)\])?\s*$")
        .expect("undirected port pattern")
});

static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)parameter\s+(?:type\s+)?\s*(\w+)\s*=\s*([^,;]+)")
        .expect("parameter pattern")
});

/// Extracts a module definition from Verilog source text. Implementations
/// only need to recover the header; the module body is not interpreted.
pub trait HeaderParser {
    /// Parses `text`, which was read from `filepath`. Returns
    /// `Error::NoModuleFound` if no module header is recognized.
    fn parse_header(&self, text: &str, filepath: &str) -> Result<ModDef>;
}

/// Pattern-matching header parser. It tolerates free-form whitespace,
/// optional type keywords, bracketed ranges, and `` `define `` macros, but is
/// not a Verilog grammar: only the first module in a file is seen, and a
/// header it cannot make sense of simply yields fewer ports.
#[derive(Clone, Debug)]
pub struct RegexHeaderParser {
    config: OwnedParserConfig,
}

impl Default for RegexHeaderParser {
    fn default() -> Self {
        RegexHeaderParser::new(&ParserConfig::default())
    }
}

impl RegexHeaderParser {
    pub fn new(cfg: &ParserConfig) -> Self {
        RegexHeaderParser {
            config: cfg.to_owned_config(),
        }
    }
}

impl HeaderParser for RegexHeaderParser {
    fn parse_header(&self, text: &str, filepath: &str) -> Result<ModDef> {
        let preprocessed = preprocess(text, &self.config.defines());
        let text = preprocessed.text.as_str();

        let header = MODULE_HEADER
            .captures(text)
            .ok_or_else(|| Error::NoModuleFound(filepath.to_string()))?;

        let mut mod_def = ModDef::new(&header[1], filepath);

        let port_section = capture(&header, 2).unwrap_or("");
        for port in parse_ports(port_section, self.config.ansi_fallback) {
            if let Err(e) = mod_def.add_port(port) {
                warn!("{e}; keeping the first declaration");
            }
        }

        for parameter in parse_parameters(text, self.config.trim_parameter_lists) {
            if let Err(e) = mod_def.add_parameter(parameter) {
                warn!("{e}; keeping the first declaration");
            }
        }

        mod_def.macros = preprocessed.macros;

        Ok(mod_def)
    }
}

fn parse_ports(port_section: &str, ansi_fallback: bool) -> Vec<Port> {
    let ports: Vec<Port> = DIRECTED_PORT
        .captures_iter(port_section)
        .map(|captures| Port {
            name: captures[4].to_string(),
            direction: Direction::from_keyword(&captures[1]).unwrap_or_default(),
            dtype: capture_or(&captures, 2, "wire").to_ascii_lowercase(),
            width: capture_or(&captures, 3, "1").to_string(),
            dimensions: Vec::new(),
        })
        .collect();

    if !ports.is_empty() || !ansi_fallback {
        return ports;
    }

    debug!("no directed ports in header, trying the direction-less pattern");

    UNDIRECTED_PORT
        .captures_iter(port_section)
        .map(|captures| Port {
            name: captures[1].to_string(),
            direction: Direction::Wire,
            dtype: capture_or(&captures, 2, "wire").to_ascii_lowercase(),
            width: capture_or(&captures, 3, "1").to_string(),
            dimensions: Vec::new(),
        })
        .collect()
}

fn parse_parameters(text: &str, trim_lists: bool) -> Vec<Parameter> {
    PARAMETER
        .captures_iter(text)
        .map(|captures| {
            let value = if trim_lists {
                trim_unbalanced(&captures[2])
            } else {
                captures[2].trim()
            };
            Parameter::new(&captures[1], value)
        })
        .collect()
}

/// Cuts `value` at the first `)` that closes a parenthesis opened before the
/// value started, e.g. the end of a `#( ... )` parameter list. Parentheses
/// inside `"..."` do not count.
fn trim_unbalanced(value: &str) -> &str {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (index, c) in value.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' if depth == 0 => return value[..index].trim(),
            ')' => depth -= 1,
            _ => {}
        }
    }
    value.trim()
}

/// Reads `path` as text, replacing invalid UTF-8 sequences rather than
/// failing.
pub(crate) fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl ModDef {
    /// Creates a new module definition from Verilog source code, using the
    /// default parser configuration. `filepath` is recorded as provenance.
    pub fn from_verilog(verilog: impl AsRef<str>, filepath: impl AsRef<str>) -> Result<Self> {
        RegexHeaderParser::default().parse_header(verilog.as_ref(), filepath.as_ref())
    }

    /// Creates a new module definition from Verilog source code, using the
    /// given parser configuration.
    pub fn from_verilog_with_config(
        verilog: impl AsRef<str>,
        filepath: impl AsRef<str>,
        cfg: &ParserConfig,
    ) -> Result<Self> {
        RegexHeaderParser::new(cfg).parse_header(verilog.as_ref(), filepath.as_ref())
    }

    /// Creates a new module definition from the first module declared in a
    /// Verilog file. An unreadable file is reported as `Error::Io`; a file
    /// without a recognizable module header as `Error::NoModuleFound`.
    pub fn from_verilog_file(verilog: &Path, cfg: &ParserConfig) -> Result<Self> {
        Self::from_verilog_file_with(verilog, &RegexHeaderParser::new(cfg))
    }

    /// Same as `from_verilog_file`, but with a caller-supplied parser.
    pub fn from_verilog_file_with(verilog: &Path, parser: &impl HeaderParser) -> Result<Self> {
        let text = read_source(verilog)?;
        let mod_def = parser.parse_header(&text, &verilog.to_string_lossy())?;
        info!(
            "Parsed module {} from {}: ports [{}], parameters [{}]",
            mod_def.name,
            verilog.display(),
            mod_def.ports.iter().map(|p| &p.name).join(", "),
            mod_def.parameters.iter().map(|p| &p.name).join(", ")
        );
        Ok(mod_def)
    }
}
