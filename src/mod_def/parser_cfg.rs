// SPDX-License-Identifier: Apache-2.0

/// Options for reading module headers.
#[derive(Clone, Debug)]
pub struct ParserConfig<'a> {
    /// Macros defined before the source is read, as if by `` `define ``.
    /// Definitions in the source replace these.
    pub defines: &'a [(&'a str, &'a str)],
    /// When no direction-led port is found in the header, retry with a
    /// direction-less pattern. This tolerates non-ANSI port lists at the cost
    /// of sometimes reporting a plain wire as a port.
    pub ansi_fallback: bool,
    /// Cut a parameter value at the `)` that closes the `#( ... )` list it
    /// sits in, ignoring parentheses inside string literals. When off, a
    /// value is the raw run of text up to the next `,` or `;`, trimmed.
    pub trim_parameter_lists: bool,
}

impl Default for ParserConfig<'_> {
    fn default() -> Self {
        ParserConfig {
            defines: &[],
            ansi_fallback: true,
            trim_parameter_lists: false,
        }
    }
}

impl ParserConfig<'_> {
    pub(crate) fn to_owned_config(&self) -> OwnedParserConfig {
        OwnedParserConfig {
            defines: self
                .defines
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            ansi_fallback: self.ansi_fallback,
            trim_parameter_lists: self.trim_parameter_lists,
        }
    }
}

/// Owned copy of a `ParserConfig`, held by parsers that outlive the borrowed
/// configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct OwnedParserConfig {
    pub(crate) defines: Vec<(String, String)>,
    pub(crate) ansi_fallback: bool,
    pub(crate) trim_parameter_lists: bool,
}

impl OwnedParserConfig {
    pub(crate) fn defines(&self) -> Vec<(&str, &str)> {
        self.defines
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
