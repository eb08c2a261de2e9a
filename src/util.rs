// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use regex::Captures;

/// Returns the text of capture group `index`, or `None` if the group did not
/// participate in the match.
pub(crate) fn capture<'h>(captures: &Captures<'h>, index: usize) -> Option<&'h str> {
    captures.get(index).map(|m| m.as_str())
}

/// Returns the trimmed text of capture group `index`, falling back to
/// `default` when the group did not participate in the match or matched
/// nothing.
pub(crate) fn capture_or<'h>(captures: &Captures<'h>, index: usize, default: &'h str) -> &'h str {
    match capture(captures, index) {
        Some(text) if !text.is_empty() => text.trim(),
        _ => default,
    }
}

/// Final path component of `path`, or `path` itself if it has none.
pub(crate) fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
