// SPDX-License-Identifier: Apache-2.0

//! Error types shared by the parser, the registry, and the project codec.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for vbuilder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong outside of top module generation, which is
/// best-effort and never fails.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be read or written.
    #[error("Error accessing file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read, but no module header was recognized in it.
    #[error("Could not find a module declaration in {0}")]
    NoModuleFound(String),

    #[error("Module '{0}' does not exist")]
    UnknownModDef(String),

    /// A module cannot be deleted while instances still reference it.
    #[error("Cannot delete module '{name}' because it has {count} instances")]
    ModDefInUse { name: String, count: usize },

    #[error("Instance name '{0}' already exists")]
    DuplicateInstance(String),

    #[error("Instance '{0}' does not exist")]
    UnknownInstance(String),

    #[error("Port '{port}' does not exist on module '{mod_def}'")]
    UnknownPort { mod_def: String, port: String },

    #[error("Parameter '{parameter}' does not exist on module '{mod_def}'")]
    UnknownParameter { mod_def: String, parameter: String },

    #[error("Port '{port}' is already declared on module '{mod_def}'")]
    DuplicatePort { mod_def: String, port: String },

    #[error("Parameter '{parameter}' is already declared on module '{mod_def}'")]
    DuplicateParameter { mod_def: String, parameter: String },

    /// Re-parsing a module's file produced a module with another name.
    #[error("Refreshing module '{expected}' produced module '{found}'")]
    RefreshRenamed { expected: String, found: String },

    /// No embedded project payload was found in the text.
    #[error("No tool data found")]
    NoToolData,

    /// The embedded project payload could not be decoded.
    #[error("Malformed tool data: {0}")]
    ToolData(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn tool_data(message: impl ToString) -> Self {
        Error::ToolData(message.to_string())
    }
}
