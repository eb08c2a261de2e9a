// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use indexmap::IndexMap;
use log::info;

use crate::{Error, HeaderParser, ModDef, ModInst, Parameter, ParserConfig, Port, RegexHeaderParser, Result};

mod instances;
mod shared;
pub use shared::SharedRegistry;

/// All module definitions and instances of one project.
///
/// Module definitions are keyed by name. Instances are kept in the order they
/// were created, which is also the order they are emitted in. Every instance
/// refers to a module definition held here, and a module definition cannot be
/// removed while an instance still refers to it.
///
/// Operations that can fail check everything before changing anything, so an
/// `Err` always leaves the registry as it was.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registry {
    pub(crate) mod_defs: IndexMap<String, ModDef>,
    pub(crate) instances: Vec<ModInst>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Adds a module definition, replacing any existing definition with the
    /// same name. Returns the replaced definition, if there was one.
    /// Instances of a replaced definition refer to the new one.
    pub fn add_mod_def(&mut self, mod_def: ModDef) -> Option<ModDef> {
        info!("Registered module {mod_def}");
        self.mod_defs.insert(mod_def.name.clone(), mod_def)
    }

    /// Parses the first module in the Verilog file at `path` and adds it.
    /// Nothing is added if the file cannot be read or contains no module.
    pub fn load_mod_def(&mut self, path: &Path, cfg: &ParserConfig) -> Result<&ModDef> {
        self.load_mod_def_with(path, &RegexHeaderParser::new(cfg))
    }

    /// Same as `load_mod_def`, but with a caller-supplied parser.
    pub fn load_mod_def_with(&mut self, path: &Path, parser: &impl HeaderParser) -> Result<&ModDef> {
        let mod_def = ModDef::from_verilog_file_with(path, parser)?;
        let name = mod_def.name.clone();
        self.add_mod_def(mod_def);
        Ok(&self.mod_defs[&name])
    }

    /// Re-parses the file a module definition came from and replaces the
    /// definition wholesale. The existing definition is kept if the file can
    /// no longer be read, no longer contains a module, or now declares a
    /// module with a different name.
    pub fn refresh_mod_def(&mut self, name: impl AsRef<str>, cfg: &ParserConfig) -> Result<&ModDef> {
        self.refresh_mod_def_with(name, &RegexHeaderParser::new(cfg))
    }

    /// Same as `refresh_mod_def`, but with a caller-supplied parser.
    pub fn refresh_mod_def_with(
        &mut self,
        name: impl AsRef<str>,
        parser: &impl HeaderParser,
    ) -> Result<&ModDef> {
        let name = name.as_ref();
        let filepath = self.get_existing_mod_def(name)?.filepath.clone();

        let refreshed = ModDef::from_verilog_file_with(Path::new(&filepath), parser)?;
        if refreshed.name != name {
            return Err(Error::RefreshRenamed {
                expected: name.to_string(),
                found: refreshed.name,
            });
        }

        info!("Refreshed module {name}");
        self.mod_defs.insert(name.to_string(), refreshed);
        Ok(&self.mod_defs[name])
    }

    /// Removes a module definition and returns it. Fails if the definition
    /// does not exist or is still instantiated.
    pub fn remove_mod_def(&mut self, name: impl AsRef<str>) -> Result<ModDef> {
        let name = name.as_ref();
        self.get_existing_mod_def(name)?;

        let count = self.instances_of(name).count();
        if count > 0 {
            return Err(Error::ModDefInUse {
                name: name.to_string(),
                count,
            });
        }

        info!("Deleted module: {name}");
        self.mod_defs
            .shift_remove(name)
            .ok_or_else(|| Error::UnknownModDef(name.to_string()))
    }

    /// Returns the module definition with the given name, if it exists.
    pub fn get_mod_def(&self, name: impl AsRef<str>) -> Option<&ModDef> {
        self.mod_defs.get(name.as_ref())
    }

    pub(crate) fn get_existing_mod_def(&self, name: &str) -> Result<&ModDef> {
        self.mod_defs
            .get(name)
            .ok_or_else(|| Error::UnknownModDef(name.to_string()))
    }

    /// Returns all module definitions, in the order they were first added.
    pub fn mod_defs(&self) -> impl Iterator<Item = &ModDef> {
        self.mod_defs.values()
    }

    /// Returns the instances of the named module definition.
    pub fn instances_of<'a>(&'a self, mod_def_name: &'a str) -> impl Iterator<Item = &'a ModInst> {
        self.instances
            .iter()
            .filter(move |inst| inst.mod_def_name == mod_def_name)
    }

    /// Looks up a port of an instance on the instance's module definition.
    pub fn port_info(&self, inst_name: impl AsRef<str>, port_name: impl AsRef<str>) -> Option<&Port> {
        let inst = self.get_instance(inst_name)?;
        self.get_mod_def(&inst.mod_def_name)?.get_port(port_name)
    }

    /// Looks up a parameter of an instance on the instance's module
    /// definition.
    pub fn parameter_info(
        &self,
        inst_name: impl AsRef<str>,
        parameter_name: impl AsRef<str>,
    ) -> Option<&Parameter> {
        let inst = self.get_instance(inst_name)?;
        self.get_mod_def(&inst.mod_def_name)?
            .get_parameter(parameter_name)
    }

    /// Returns true if the registry holds no module definitions and no
    /// instances.
    pub fn is_empty(&self) -> bool {
        self.mod_defs.is_empty() && self.instances.is_empty()
    }
}
