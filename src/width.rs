// SPDX-License-Identifier: Apache-2.0

use num_bigint::BigInt;

/// Converts a port width into the packed range used when declaring a net of
/// that width, or `None` for a single bit.
///
/// A width containing a colon is already a range and is bracketed as is. A
/// decimal count `W` greater than one becomes `[W-1:0]`. Anything else that
/// is not a number, such as a parameter name, is bracketed verbatim.
pub fn packed_range(width: &str) -> Option<String> {
    if width == "1" {
        return None;
    }
    if width.contains(':') {
        return Some(format!("[{width}]"));
    }
    match width.trim().parse::<BigInt>() {
        Ok(bits) if bits > BigInt::from(1) => Some(format!("[{}:0]", bits - 1)),
        Ok(_) => None,
        Err(_) => Some(format!("[{width}]")),
    }
}

/// Formats a net declaration such as `input wire [7:0] data`.
pub(crate) fn declaration(keyword: &str, width: &str, name: &str) -> String {
    match packed_range(width) {
        Some(range) => format!("{keyword} {range} {name}"),
        None => format!("{keyword} {name}"),
    }
}
