//! RWM encoding and decoding
//!
//! Decoding never panics on hostile input: every read is bounds-checked and
//! the resulting module is validated before it is returned.

use super::instruction::{Instruction, opcode};
use super::{Constant, ConstantPool, FieldDecl, Marker, MethodDecl, Module};
use crate::constants::{CONSTANT_TAG_INT, CONSTANT_TAG_STR, MODULE_MAGIC, MODULE_VERSION};
use crate::error::{Error, Result};

/// Parse and validate a module
pub fn decode(bytes: &[u8]) -> Result<Module> {
    let mut reader = ByteReader::new(bytes);

    let magic = reader.take(4)?;
    if magic != MODULE_MAGIC {
        return Err(Error::format(format!("bad magic {magic:02x?}")));
    }
    let version = reader.u16()?;
    if version != MODULE_VERSION {
        return Err(Error::format(format!(
            "unsupported version {version} (expected {MODULE_VERSION})"
        )));
    }
    let name = reader.u16()?;

    let mut constants = ConstantPool::new();
    for _ in 0..reader.u16()? {
        constants.push(read_constant(&mut reader)?)?;
    }

    let field_count = reader.u16()?;
    let mut fields = Vec::with_capacity(usize::from(field_count));
    for _ in 0..field_count {
        let name = reader.u16()?;
        let markers = read_markers(&mut reader)?;
        fields.push(FieldDecl { name, markers });
    }

    let method_count = reader.u16()?;
    let mut methods = Vec::with_capacity(usize::from(method_count));
    for _ in 0..method_count {
        let name = reader.u16()?;
        let params = reader.u8()?;
        let locals = reader.u8()?;
        let markers = read_markers(&mut reader)?;
        let code = read_code(&mut reader)?;
        methods.push(MethodDecl {
            name,
            params,
            locals,
            markers,
            code,
        });
    }

    if !reader.is_empty() {
        return Err(Error::format(format!(
            "{} trailing bytes after last method",
            reader.remaining()
        )));
    }

    let module = Module {
        name,
        constants,
        fields,
        methods,
    };
    module.validate()?;
    Ok(module)
}

/// Serialize a module
///
/// Encoding is canonical: decoding a module and encoding it again yields the
/// original bytes.
pub fn encode(module: &Module) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(&MODULE_MAGIC);
    out.extend_from_slice(&MODULE_VERSION.to_le_bytes());
    out.extend_from_slice(&module.name.to_le_bytes());

    write_len_u16(&mut out, module.constants.len(), "constants")?;
    for constant in module.constants.entries() {
        match constant {
            Constant::Str(value) => {
                out.push(CONSTANT_TAG_STR);
                let len = u32::try_from(value.len())
                    .map_err(|_| Error::format("string constant exceeds 4 GiB"))?;
                out.extend_from_slice(&len.to_le_bytes());
                out.extend_from_slice(value.as_bytes());
            }
            Constant::Int(value) => {
                out.push(CONSTANT_TAG_INT);
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
    }

    write_len_u16(&mut out, module.fields.len(), "fields")?;
    for field in &module.fields {
        out.extend_from_slice(&field.name.to_le_bytes());
        write_markers(&mut out, &field.markers)?;
    }

    write_len_u16(&mut out, module.methods.len(), "methods")?;
    for method in &module.methods {
        out.extend_from_slice(&method.name.to_le_bytes());
        out.push(method.params);
        out.push(method.locals);
        write_markers(&mut out, &method.markers)?;
        let count = u32::try_from(method.code.len())
            .map_err(|_| Error::format("method exceeds u32::MAX instructions"))?;
        out.extend_from_slice(&count.to_le_bytes());
        for insn in &method.code {
            insn.encode(&mut out);
        }
    }
    Ok(out)
}

fn write_len_u16(out: &mut Vec<u8>, len: usize, what: &str) -> Result<()> {
    let len = u16::try_from(len).map_err(|_| Error::format(format!("too many {what}: {len}")))?;
    out.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn write_markers(out: &mut Vec<u8>, markers: &[Marker]) -> Result<()> {
    let count = u8::try_from(markers.len())
        .map_err(|_| Error::format(format!("too many markers: {}", markers.len())))?;
    out.push(count);
    for marker in markers {
        out.extend_from_slice(&marker.kind.to_le_bytes());
        out.extend_from_slice(&marker.value.to_le_bytes());
    }
    Ok(())
}

fn read_constant(reader: &mut ByteReader<'_>) -> Result<Constant> {
    match reader.u8()? {
        CONSTANT_TAG_STR => {
            let len = reader.u32()? as usize;
            let bytes = reader.take(len)?;
            let value = std::str::from_utf8(bytes)
                .map_err(|e| Error::format(format!("string constant is not UTF-8: {e}")))?;
            Ok(Constant::Str(value.to_string()))
        }
        CONSTANT_TAG_INT => Ok(Constant::Int(reader.i64()?)),
        tag => Err(Error::format(format!("unknown constant tag {tag:#04x}"))),
    }
}

fn read_markers(reader: &mut ByteReader<'_>) -> Result<Vec<Marker>> {
    let count = reader.u8()?;
    let mut markers = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let kind = reader.u16()?;
        let value = reader.u16()?;
        markers.push(Marker { kind, value });
    }
    Ok(markers)
}

fn read_code(reader: &mut ByteReader<'_>) -> Result<Vec<Instruction>> {
    let count = reader.u32()? as usize;
    // Every instruction takes at least one byte
    if count > reader.remaining() {
        return Err(Error::format(format!(
            "instruction count {count} exceeds remaining {} bytes",
            reader.remaining()
        )));
    }
    let mut code = Vec::with_capacity(count);
    for _ in 0..count {
        code.push(read_instruction(reader)?);
    }
    Ok(code)
}

fn read_instruction(reader: &mut ByteReader<'_>) -> Result<Instruction> {
    let op = reader.u8()?;
    let insn = match op {
        opcode::NOP => Instruction::Nop,
        opcode::PUSH_NULL => Instruction::PushNull,
        opcode::PUSH_INT => Instruction::PushInt(reader.i64()?),
        opcode::PUSH_CONST => Instruction::PushConst(reader.u16()?),
        opcode::LOAD_LOCAL => Instruction::LoadLocal(reader.u8()?),
        opcode::STORE_LOCAL => Instruction::StoreLocal(reader.u8()?),
        opcode::GET_FIELD => Instruction::GetField(reader.u16()?),
        opcode::PUT_FIELD => Instruction::PutField(reader.u16()?),
        opcode::ADD => Instruction::Add,
        opcode::CONCAT => Instruction::Concat,
        opcode::INVOKE_DYNAMIC => Instruction::InvokeDynamic {
            symbol: reader.u16()?,
            slot: reader.u16()?,
        },
        opcode::POP => Instruction::Pop,
        opcode::DUP => Instruction::Dup,
        opcode::JUMP => Instruction::Jump(reader.u32()?),
        opcode::JUMP_IF_NULL => Instruction::JumpIfNull(reader.u32()?),
        opcode::RETURN => Instruction::Return,
        other => {
            return Err(Error::format(format!(
                "unknown opcode {other:#04x} at byte {}",
                reader.position() - 1
            )));
        }
    };
    Ok(insn)
}

/// Bounds-checked little-endian cursor
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::format(format!(
                "unexpected end of module at byte {} (needed {len}, have {})",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.array()?))
    }
}
