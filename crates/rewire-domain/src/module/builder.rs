//! Programmatic module assembly
//!
//! Stands in for a source compiler when producing modules for demos and
//! tests.
//!
//! # Example
//!
//! ```
//! use rewire_domain::module::ModuleBuilder;
//!
//! let mut builder = ModuleBuilder::new("Greeter");
//! let greeting = builder.inject_field("greeting", "greeting").unwrap();
//! builder
//!     .method("greet", 0, 0, |m| {
//!         m.load_local_self().get_field(greeting).ret();
//!     })
//!     .unwrap();
//! let module = builder.build().unwrap();
//! assert_eq!(module.name().unwrap(), "Greeter");
//! ```

use super::{ConstantPool, FieldDecl, Instruction, Marker, MethodDecl, Module};
use crate::constants::INJECT_MARKER;
use crate::error::Result;

/// Assembles a [`Module`]
#[derive(Debug)]
pub struct ModuleBuilder {
    name: String,
    constants: ConstantPool,
    fields: Vec<FieldDecl>,
    methods: Vec<MethodDecl>,
}

impl ModuleBuilder {
    /// Start a module called `name`
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            constants: ConstantPool::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Intern a string constant
    pub fn constant(&mut self, value: &str) -> Result<u16> {
        self.constants.intern_str(value)
    }

    /// Declare a plain field, returning its index
    pub fn field(&mut self, name: &str) -> Result<u16> {
        self.field_with_markers(name, &[])
    }

    /// Declare a field marked as an injection point for provider `symbol`
    pub fn inject_field(&mut self, name: &str, symbol: &str) -> Result<u16> {
        self.field_with_markers(name, &[(INJECT_MARKER, symbol)])
    }

    /// Declare a field carrying arbitrary `(kind, value)` markers
    pub fn field_with_markers(&mut self, name: &str, markers: &[(&str, &str)]) -> Result<u16> {
        let name = self.constants.intern_str(name)?;
        let markers = self.markers(markers)?;
        let index = u16::try_from(self.fields.len())
            .map_err(|_| crate::error::Error::format("too many fields"))?;
        self.fields.push(FieldDecl { name, markers });
        Ok(index)
    }

    /// Declare a method and assemble its body
    pub fn method<F>(&mut self, name: &str, params: u8, locals: u8, body: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut CodeBuilder<'_>),
    {
        let name = self.constants.intern_str(name)?;
        let mut code = CodeBuilder {
            constants: &mut self.constants,
            code: Vec::new(),
            error: None,
        };
        body(&mut code);
        let CodeBuilder { code, error, .. } = code;
        if let Some(err) = error {
            return Err(err);
        }
        self.methods.push(MethodDecl {
            name,
            params,
            locals,
            markers: Vec::new(),
            code,
        });
        Ok(self)
    }

    /// Finish and validate the module
    pub fn build(mut self) -> Result<Module> {
        let name = self.constants.intern_str(&self.name)?;
        let module = Module {
            name,
            constants: self.constants,
            fields: self.fields,
            methods: self.methods,
        };
        module.validate()?;
        Ok(module)
    }

    fn markers(&mut self, markers: &[(&str, &str)]) -> Result<Vec<Marker>> {
        markers
            .iter()
            .map(|(kind, value)| {
                Ok(Marker {
                    kind: self.constants.intern_str(kind)?,
                    value: self.constants.intern_str(value)?,
                })
            })
            .collect()
    }
}

/// Appends instructions to a method body
///
/// Constant-pool failures are remembered and reported by
/// [`ModuleBuilder::method`].
#[derive(Debug)]
pub struct CodeBuilder<'a> {
    constants: &'a mut ConstantPool,
    code: Vec<Instruction>,
    error: Option<crate::error::Error>,
}

impl CodeBuilder<'_> {
    /// Index the next instruction will occupy
    pub fn pc(&self) -> u32 {
        u32::try_from(self.code.len()).unwrap_or(u32::MAX)
    }

    /// Append a raw instruction
    pub fn emit(&mut self, insn: Instruction) -> &mut Self {
        self.code.push(insn);
        self
    }

    /// Overwrite the jump target of the branch at `at`
    pub fn patch_target(&mut self, at: u32, target: u32) -> &mut Self {
        if let Some(insn) = self.code.get_mut(at as usize) {
            match insn {
                Instruction::Jump(t) | Instruction::JumpIfNull(t) => *t = target,
                _ => {}
            }
        }
        self
    }

    pub fn nop(&mut self) -> &mut Self {
        self.emit(Instruction::Nop)
    }

    pub fn push_null(&mut self) -> &mut Self {
        self.emit(Instruction::PushNull)
    }

    pub fn push_int(&mut self, value: i64) -> &mut Self {
        self.emit(Instruction::PushInt(value))
    }

    /// Push a string literal, interning it in the constant pool
    pub fn push_str(&mut self, value: &str) -> &mut Self {
        match self.constants.intern_str(value) {
            Ok(index) => self.emit(Instruction::PushConst(index)),
            Err(err) => {
                self.error.get_or_insert(err);
                self
            }
        }
    }

    pub fn load_local(&mut self, slot: u8) -> &mut Self {
        self.emit(Instruction::LoadLocal(slot))
    }

    /// Push the receiver (local 0)
    pub fn load_local_self(&mut self) -> &mut Self {
        self.load_local(0)
    }

    pub fn store_local(&mut self, slot: u8) -> &mut Self {
        self.emit(Instruction::StoreLocal(slot))
    }

    pub fn get_field(&mut self, field: u16) -> &mut Self {
        self.emit(Instruction::GetField(field))
    }

    pub fn put_field(&mut self, field: u16) -> &mut Self {
        self.emit(Instruction::PutField(field))
    }

    pub fn add(&mut self) -> &mut Self {
        self.emit(Instruction::Add)
    }

    pub fn concat(&mut self) -> &mut Self {
        self.emit(Instruction::Concat)
    }

    pub fn pop(&mut self) -> &mut Self {
        self.emit(Instruction::Pop)
    }

    pub fn dup(&mut self) -> &mut Self {
        self.emit(Instruction::Dup)
    }

    pub fn jump(&mut self, target: u32) -> &mut Self {
        self.emit(Instruction::Jump(target))
    }

    pub fn jump_if_null(&mut self, target: u32) -> &mut Self {
        self.emit(Instruction::JumpIfNull(target))
    }

    pub fn ret(&mut self) -> &mut Self {
        self.emit(Instruction::Return)
    }
}
