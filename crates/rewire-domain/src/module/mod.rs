//! RWM binary module format
//!
//! In-memory representation of a compiled module: a constant pool, declared
//! fields and methods with their markers, and per-method instruction
//! sequences. [`codec`] converts between this form and bytes; [`builder`]
//! assembles modules programmatically.
//!
//! ## Layout
//!
//! ```text
//! magic "RWM\0" | version u16 | name u16
//! constants: u16 count { tag u8 | Str: u32 len + utf8 | Int: i64 }
//! fields:    u16 count { name u16 | markers }
//! methods:   u16 count { name u16 | params u8 | locals u8 | markers | code }
//! markers:   u8 count  { kind u16 | value u16 }
//! code:      u32 count { instruction }
//! ```
//!
//! All integers are little-endian.

pub mod builder;
pub mod codec;
pub mod instruction;

pub use builder::ModuleBuilder;
pub use codec::{decode, encode};
pub use instruction::Instruction;

use crate::error::{Error, Result};

/// Constant pool entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    /// UTF-8 string
    Str(String),
    /// 64-bit signed integer
    Int(i64),
}

/// Indexed constant pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in index order
    pub fn entries(&self) -> &[Constant] {
        &self.entries
    }

    /// Entry at `index`
    pub fn get(&self, index: u16) -> Option<&Constant> {
        self.entries.get(usize::from(index))
    }

    /// String entry at `index`
    pub fn str_at(&self, index: u16) -> Result<&str> {
        match self.get(index) {
            Some(Constant::Str(value)) => Ok(value),
            Some(Constant::Int(_)) => Err(Error::format(format!(
                "constant #{index} is an integer, expected a string"
            ))),
            None => Err(Error::format(format!(
                "constant #{index} out of range ({} entries)",
                self.entries.len()
            ))),
        }
    }

    /// Index of an existing string entry
    pub fn find_str(&self, value: &str) -> Option<u16> {
        self.entries
            .iter()
            .position(|c| matches!(c, Constant::Str(s) if s == value))
            .and_then(|i| u16::try_from(i).ok())
    }

    /// Return the index of `value`, appending it when absent
    pub fn intern_str(&mut self, value: &str) -> Result<u16> {
        if let Some(index) = self.find_str(value) {
            return Ok(index);
        }
        self.push(Constant::Str(value.to_string()))
    }

    /// Append an entry unconditionally
    pub fn push(&mut self, constant: Constant) -> Result<u16> {
        let index = u16::try_from(self.entries.len())
            .map_err(|_| Error::format("constant pool exceeds 65535 entries"))?;
        self.entries.push(constant);
        Ok(index)
    }
}

/// A declarative marker attached to a field or method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Constant index of the marker kind (e.g. `"inject"`)
    pub kind: u16,
    /// Constant index of the marker's literal argument
    pub value: u16,
}

/// A declared field (slot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Constant index of the field name
    pub name: u16,
    /// Attached markers
    pub markers: Vec<Marker>,
}

/// A declared method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Constant index of the method name
    pub name: u16,
    /// Number of parameters; they follow the receiver in the local slots
    pub params: u8,
    /// Number of additional local slots
    pub locals: u8,
    /// Attached markers
    pub markers: Vec<Marker>,
    /// Instruction sequence
    pub code: Vec<Instruction>,
}

impl MethodDecl {
    /// Total local slots: the receiver at 0, then parameters, then locals
    pub fn frame_size(&self) -> usize {
        1 + usize::from(self.params) + usize::from(self.locals)
    }
}

/// A compiled module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Constant index of the module name
    pub name: u16,
    /// Constant pool
    pub constants: ConstantPool,
    /// Declared fields
    pub fields: Vec<FieldDecl>,
    /// Declared methods
    pub methods: Vec<MethodDecl>,
}

impl Module {
    /// Module name
    pub fn name(&self) -> Result<&str> {
        self.constants.str_at(self.name)
    }

    /// Name of field `index`
    pub fn field_name(&self, index: u16) -> Result<&str> {
        let field = self
            .fields
            .get(usize::from(index))
            .ok_or_else(|| Error::format(format!("field @{index} out of range")))?;
        self.constants.str_at(field.name)
    }

    /// Index of the field called `name`
    pub fn field_index(&self, name: &str) -> Option<u16> {
        self.fields
            .iter()
            .position(|f| self.constants.str_at(f.name).is_ok_and(|n| n == name))
            .and_then(|i| u16::try_from(i).ok())
    }

    /// Index of the method called `name`
    pub fn method_index(&self, name: &str) -> Option<usize> {
        self.methods
            .iter()
            .position(|m| self.constants.str_at(m.name).is_ok_and(|n| n == name))
    }

    /// Resolve a marker to its `(kind, value)` strings
    pub fn marker(&self, marker: &Marker) -> Result<(&str, &str)> {
        Ok((
            self.constants.str_at(marker.kind)?,
            self.constants.str_at(marker.value)?,
        ))
    }

    /// Check every cross reference in the module
    ///
    /// Verifies constant kinds, field and local indices and jump targets.
    pub fn validate(&self) -> Result<()> {
        self.name()?;
        for field in &self.fields {
            self.constants.str_at(field.name)?;
            self.validate_markers(&field.markers)?;
        }
        for method in &self.methods {
            let method_name = self.constants.str_at(method.name)?;
            self.validate_markers(&method.markers)?;
            self.validate_code(method_name, method)?;
        }
        Ok(())
    }

    fn validate_markers(&self, markers: &[Marker]) -> Result<()> {
        for marker in markers {
            self.marker(marker)?;
        }
        Ok(())
    }

    fn validate_code(&self, method_name: &str, method: &MethodDecl) -> Result<()> {
        let count = method.code.len();
        for (pc, insn) in method.code.iter().enumerate() {
            let fail = |what: String| {
                Error::format(format!("{method_name}[{pc}] `{insn}`: {what}"))
            };
            match *insn {
                Instruction::PushConst(index) => {
                    if self.constants.get(index).is_none() {
                        return Err(fail(format!("constant #{index} out of range")));
                    }
                }
                Instruction::LoadLocal(slot) | Instruction::StoreLocal(slot) => {
                    if usize::from(slot) >= method.frame_size() {
                        return Err(fail(format!(
                            "local {slot} outside frame of {}",
                            method.frame_size()
                        )));
                    }
                }
                Instruction::GetField(index) | Instruction::PutField(index) => {
                    if usize::from(index) >= self.fields.len() {
                        return Err(fail(format!("field @{index} out of range")));
                    }
                }
                Instruction::InvokeDynamic { symbol, slot } => {
                    self.constants.str_at(symbol).map_err(|e| fail(e.to_string()))?;
                    self.constants.str_at(slot).map_err(|e| fail(e.to_string()))?;
                }
                Instruction::Jump(target) | Instruction::JumpIfNull(target) => {
                    if target as usize >= count {
                        return Err(fail(format!("jump target {target} beyond {count}")));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
