//! Module loading
//!
//! A loaded module owns one unlinked [`CallSite`] per `InvokeDynamic`
//! occurrence. Sites live as long as the loaded module.

use std::collections::HashMap;
use std::sync::Arc;

use rewire_domain::error::{Error, Result};
use rewire_domain::module::{self, Instruction, MethodDecl, Module};
use rewire_domain::value_objects::{Instance, Value};
use tracing::debug;

use crate::injection::CallSite;

/// Location of an instruction: `(method index, instruction index)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSiteId {
    /// Index of the method in the module's method table
    pub method: usize,
    /// Index of the instruction in the method body
    pub pc: usize,
}

/// A module ready for execution
#[derive(Debug)]
pub struct LoadedModule {
    name: String,
    module: Module,
    call_sites: HashMap<CallSiteId, CallSite>,
}

impl LoadedModule {
    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying module
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Method declaration and index by name
    pub fn method(&self, name: &str) -> Result<(usize, &MethodDecl)> {
        let index = self.module.method_index(name).ok_or_else(|| {
            Error::runtime(format!("no method '{name}' in module '{}'", self.name))
        })?;
        Ok((index, &self.module.methods[index]))
    }

    /// Create an instance with null fields
    pub fn instantiate(&self) -> Arc<Instance> {
        Instance::new(self.name.clone(), self.module.fields.len())
    }

    /// Create an instance and wrap it as a value
    pub fn new_object(&self) -> Value {
        Value::Object(self.instantiate())
    }

    /// Call site at `id`, if that instruction is an `InvokeDynamic`
    pub fn call_site(&self, id: CallSiteId) -> Option<&CallSite> {
        self.call_sites.get(&id)
    }

    /// All call sites, ordered by location
    pub fn call_sites(&self) -> Vec<(CallSiteId, &CallSite)> {
        let mut sites: Vec<_> = self.call_sites.iter().map(|(id, s)| (*id, s)).collect();
        sites.sort_by_key(|(id, _)| *id);
        sites
    }

    /// Number of call sites already linked
    pub fn linked_call_sites(&self) -> usize {
        self.call_sites.values().filter(|s| s.is_linked()).count()
    }
}

/// Builds [`LoadedModule`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct ModuleLoader;

impl ModuleLoader {
    /// Create a loader
    pub fn new() -> Self {
        Self
    }

    /// Decode and load module bytes
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<LoadedModule> {
        self.load(module::decode(bytes)?)
    }

    /// Load a decoded module
    pub fn load(&self, module: Module) -> Result<LoadedModule> {
        module.validate()?;
        let name = module.name()?.to_string();
        let mut call_sites = HashMap::new();
        for (method_index, method) in module.methods.iter().enumerate() {
            for (pc, insn) in method.code.iter().enumerate() {
                if let Instruction::InvokeDynamic { symbol, slot } = *insn {
                    let site = CallSite::new(
                        module.constants.str_at(symbol)?,
                        module.constants.str_at(slot)?,
                    );
                    call_sites.insert(
                        CallSiteId {
                            method: method_index,
                            pc,
                        },
                        site,
                    );
                }
            }
        }
        debug!(module = %name, call_sites = call_sites.len(), "Loaded module");
        Ok(LoadedModule {
            name,
            module,
            call_sites,
        })
    }
}
