// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use log::info;

use crate::mod_def::read_source;
use crate::tool_data::{TOOL_DATA_MARKER, decode_tool_data, encode_tool_data, find_tool_data};
use crate::{Error, Registry, Result};

impl Registry {
    /// Returns the generated top module followed by a `// TOOL_DATA:` line
    /// that carries this whole registry.
    pub fn emit_project(&self, top_name: impl AsRef<str>) -> Result<String> {
        let mut text = self.emit_top(top_name);
        text.push_str("\n\n");
        text.push_str(TOOL_DATA_MARKER);
        text.push_str(&encode_tool_data(self)?);
        Ok(text)
    }

    /// Writes the project to `path`. The top module is named after the file:
    /// `build/soc_top.v` produces `module soc_top`.
    pub fn save_project(&self, path: &Path) -> Result<()> {
        let top_name = top_name_for(path);
        let text = self.emit_project(&top_name)?;
        std::fs::write(path, text).map_err(|e| Error::io(path, e))?;
        info!("Project saved to {}", path.display());
        info!(
            "Top module '{top_name}' generated with {} instances",
            self.instances.len()
        );
        Ok(())
    }

    /// Rebuilds a registry from text previously produced by `emit_project`.
    /// Only the embedded payload is read; the generated module is ignored.
    pub fn from_emitted(text: &str) -> Result<Registry> {
        let encoded = find_tool_data(text).ok_or(Error::NoToolData)?;
        let registry = decode_tool_data(encoded)?;
        info!(
            "Loaded {} modules and {} instances",
            registry.mod_defs.len(),
            registry.instances.len()
        );
        Ok(registry)
    }

    /// Reads a project file written by `save_project`.
    pub fn open_project(path: &Path) -> Result<Registry> {
        let text = read_source(path)?;
        let registry = Registry::from_emitted(&text)?;
        info!("Project loaded from {}", path.display());
        Ok(registry)
    }
}

/// File name up to its first `.`.
fn top_name_for(path: &Path) -> String {
    let file_name = crate::util::basename(&path.to_string_lossy()).to_string();
    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}
