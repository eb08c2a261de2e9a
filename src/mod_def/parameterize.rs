// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{Error, ModDef, Result};

/// Type inferred from a parameter's default value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Int,
    String,
}

impl ParameterType {
    /// Infers the type of a raw default value: a leading digit means `Int`,
    /// a leading quote means `String`, anything else is left untyped.
    pub fn infer(value: &str) -> Option<ParameterType> {
        match value.chars().next() {
            Some(c) if c.is_ascii_digit() => Some(ParameterType::Int),
            Some('"') | Some('\'') => Some(ParameterType::String),
            _ => None,
        }
    }
}

/// A module parameter. `value` is the default as written in the source; it is
/// never evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub ptype: Option<ParameterType>,
}

impl Parameter {
    /// Creates a parameter, inferring its type from `value`.
    pub fn new(name: impl AsRef<str>, value: impl AsRef<str>) -> Parameter {
        let value = value.as_ref().to_string();
        Parameter {
            name: name.as_ref().to_string(),
            ptype: ParameterType::infer(&value),
            value,
        }
    }
}

impl ModDef {
    /// Adds a parameter to this module definition. Parameter names are unique
    /// within a module.
    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<()> {
        if self.get_parameter(&parameter.name).is_some() {
            return Err(Error::DuplicateParameter {
                mod_def: self.name.clone(),
                parameter: parameter.name,
            });
        }
        self.parameters.push(parameter);
        Ok(())
    }

    /// Returns the parameters of this module definition in declaration order.
    pub fn get_parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the parameter with the given name, if it exists.
    pub fn get_parameter(&self, name: impl AsRef<str>) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|parameter| parameter.name == name.as_ref())
    }

    pub fn has_parameter(&self, name: impl AsRef<str>) -> bool {
        self.get_parameter(name).is_some()
    }
}
