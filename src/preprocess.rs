// SPDX-License-Identifier: Apache-2.0

//! Comment stripping and `` `define `` substitution ahead of header parsing.

use std::sync::LazyLock;

use indexmap::IndexMap;
use log::debug;
use regex::Regex;

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*?$").expect("line comment pattern"));

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern"));

static DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`define\s+(\w+)\s+(.+)").expect("define pattern"));

/// Text with comments removed and macros expanded, along with the macros
/// that were applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Preprocessed {
    pub text: String,
    pub macros: IndexMap<String, String>,
}

/// Strips comments from `source`, collects its `` `define NAME VALUE ``
/// lines, and replaces every `` `NAME `` with `VALUE`.
///
/// `predefined` macros are seeded before the source's own definitions, so a
/// definition in the source overrides a predefined one of the same name.
/// Each macro is substituted once, in discovery order; a value that itself
/// references a macro is not expanded again.
pub fn preprocess(source: &str, predefined: &[(&str, &str)]) -> Preprocessed {
    let text = LINE_COMMENT.replace_all(source, "");
    let text = BLOCK_COMMENT.replace_all(&text, "");

    let mut macros: IndexMap<String, String> = predefined
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    for captures in DEFINE.captures_iter(&text) {
        macros.insert(captures[1].to_string(), captures[2].trim().to_string());
    }

    let mut text = text.into_owned();
    for (name, value) in &macros {
        text = text.replace(&format!("`{name}"), value);
    }

    debug!("preprocessing found {} macro(s)", macros.len());

    Preprocessed { text, macros }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        let result = preprocess(
            "module a; // trailing\n/* block\n spanning */ wire b; /* x */ wire c;",
            &[],
        );
        assert_eq!(result.text, "module a; \n wire b;  wire c;");
        assert!(result.macros.is_empty());
    }

    #[test]
    fn test_later_define_overwrites() {
        let result = preprocess("`define W 4\n`define W 8\n[`W-1:0]", &[]);
        assert_eq!(result.macros.len(), 1);
        assert_eq!(result.macros["W"], "8");
        assert!(result.text.ends_with("[8-1:0]"));
    }

    #[test]
    fn test_no_recursive_expansion() {
        let result = preprocess("`define B 3\n`define A `B\nx = `A;", &[]);
        assert_eq!(result.macros["A"], "`B");
        assert!(result.text.ends_with("x = `B;"));
    }

    #[test]
    fn test_predefined_is_overridden() {
        let result = preprocess("`define DEPTH 16\n[`DEPTH:`LSB]", &[("DEPTH", "4"), ("LSB", "0")]);
        assert_eq!(result.macros["DEPTH"], "16");
        assert_eq!(result.macros["LSB"], "0");
        assert!(result.text.ends_with("[16:0]"));
    }

    #[test]
    fn test_define_inside_comment_ignored() {
        let result = preprocess("// `define HIDDEN 1\n`HIDDEN", &[]);
        assert!(result.macros.is_empty());
        assert_eq!(result.text, "\n`HIDDEN");
    }
}
