// SPDX-License-Identifier: Apache-2.0

use log::info;

use crate::{Connection, ConnectionKind, Error, ModInst, Registry, Result};

impl Registry {
    /// Returns all instances, in creation order.
    pub fn instances(&self) -> &[ModInst] {
        &self.instances
    }

    /// Returns the instance with the given name, if it exists.
    pub fn get_instance(&self, name: impl AsRef<str>) -> Option<&ModInst> {
        self.instances.iter().find(|inst| inst.name == name.as_ref())
    }

    fn instance_index(&self, name: &str) -> Result<usize> {
        self.instances
            .iter()
            .position(|inst| inst.name == name)
            .ok_or_else(|| Error::UnknownInstance(name.to_string()))
    }

    /// Instantiate a module definition, using the provided instance name. If
    /// no name is given, the instance is called `u_<mod_def_name>`. Instance
    /// names are unique across the registry.
    pub fn instantiate(
        &mut self,
        mod_def_name: impl AsRef<str>,
        name: Option<&str>,
    ) -> Result<&ModInst> {
        let mod_def_name = mod_def_name.as_ref();
        self.get_existing_mod_def(mod_def_name)?;

        let name = match name {
            Some(name) => name.to_string(),
            None => format!("u_{mod_def_name}"),
        };

        if self.get_instance(&name).is_some() {
            return Err(Error::DuplicateInstance(name));
        }

        info!("Instantiated module: {mod_def_name} as {name}");
        self.instances.push(ModInst::new(mod_def_name, name));
        Ok(&self.instances[self.instances.len() - 1])
    }

    /// Removes an instance and returns it. Its module definition is kept.
    pub fn remove_instance(&mut self, name: impl AsRef<str>) -> Result<ModInst> {
        let index = self.instance_index(name.as_ref())?;
        info!("Deleted instance: {}", name.as_ref());
        Ok(self.instances.remove(index))
    }

    /// Renames an instance. Fails, keeping the old name, if another instance
    /// already uses `new_name`. Renaming an instance to its own name does
    /// nothing.
    pub fn rename_instance(
        &mut self,
        old_name: impl AsRef<str>,
        new_name: impl AsRef<str>,
    ) -> Result<()> {
        let (old_name, new_name) = (old_name.as_ref(), new_name.as_ref());
        let index = self.instance_index(old_name)?;
        if old_name == new_name {
            return Ok(());
        }
        if self.get_instance(new_name).is_some() {
            return Err(Error::DuplicateInstance(new_name.to_string()));
        }

        info!("Renamed instance: {old_name} -> {new_name}");
        self.instances[index].name = new_name.to_string();
        Ok(())
    }

    /// Finds an instance whose module definition declares `port_name`.
    fn instance_with_port(&self, inst_name: &str, port_name: &str) -> Result<usize> {
        let index = self.instance_index(inst_name)?;
        let mod_def = self.get_existing_mod_def(&self.instances[index].mod_def_name)?;
        if !mod_def.has_port(port_name) {
            return Err(Error::UnknownPort {
                mod_def: mod_def.name.clone(),
                port: port_name.to_string(),
            });
        }
        Ok(index)
    }

    /// Binds a port of an instance, replacing any previous binding.
    pub fn connect(
        &mut self,
        inst_name: impl AsRef<str>,
        port_name: impl AsRef<str>,
        kind: ConnectionKind,
        signal: impl AsRef<str>,
    ) -> Result<()> {
        let port_name = port_name.as_ref();
        let index = self.instance_with_port(inst_name.as_ref(), port_name)?;
        self.instances[index].connect(port_name, Connection::new(kind, signal));
        Ok(())
    }

    /// Changes how a port of an instance is connected, keeping the signal
    /// name already given to it (if any).
    pub fn set_connection_kind(
        &mut self,
        inst_name: impl AsRef<str>,
        port_name: impl AsRef<str>,
        kind: ConnectionKind,
    ) -> Result<()> {
        let port_name = port_name.as_ref();
        let index = self.instance_with_port(inst_name.as_ref(), port_name)?;
        self.instances[index].set_connection_kind(port_name, kind);
        Ok(())
    }

    /// Changes the signal a port of an instance is connected to, keeping the
    /// connection kind already given to it (if any).
    pub fn set_signal_name(
        &mut self,
        inst_name: impl AsRef<str>,
        port_name: impl AsRef<str>,
        signal: impl AsRef<str>,
    ) -> Result<()> {
        let port_name = port_name.as_ref();
        let index = self.instance_with_port(inst_name.as_ref(), port_name)?;
        self.instances[index].set_signal_name(port_name, signal.as_ref());
        Ok(())
    }

    /// Removes the binding of a port, returning it. The port does not have to
    /// exist on the module definition any more, so that bindings left behind
    /// by a refresh can be cleaned up.
    pub fn disconnect(
        &mut self,
        inst_name: impl AsRef<str>,
        port_name: impl AsRef<str>,
    ) -> Result<Option<Connection>> {
        let index = self.instance_index(inst_name.as_ref())?;
        Ok(self.instances[index].disconnect(port_name.as_ref()))
    }

    /// Overrides a parameter of an instance.
    pub fn set_parameter_value(
        &mut self,
        inst_name: impl AsRef<str>,
        parameter_name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<()> {
        let parameter_name = parameter_name.as_ref();
        let index = self.instance_index(inst_name.as_ref())?;
        let mod_def = self.get_existing_mod_def(&self.instances[index].mod_def_name)?;
        if !mod_def.has_parameter(parameter_name) {
            return Err(Error::UnknownParameter {
                mod_def: mod_def.name.clone(),
                parameter: parameter_name.to_string(),
            });
        }
        self.instances[index].set_parameter_value(parameter_name, value.as_ref());
        Ok(())
    }

    /// Drops a parameter override, so the module default applies again.
    pub fn clear_parameter_value(
        &mut self,
        inst_name: impl AsRef<str>,
        parameter_name: impl AsRef<str>,
    ) -> Result<Option<String>> {
        let index = self.instance_index(inst_name.as_ref())?;
        Ok(self.instances[index].clear_parameter_value(parameter_name.as_ref()))
    }
}
