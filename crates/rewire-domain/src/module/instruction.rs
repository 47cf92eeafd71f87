//! RWM instruction set
//!
//! Jump targets are instruction indices, not byte offsets. Replacing one
//! instruction with another therefore never invalidates control flow, even
//! when the encoded widths differ.

use std::fmt;

/// Opcode bytes
pub mod opcode {
    pub const NOP: u8 = 0x00;
    pub const PUSH_NULL: u8 = 0x01;
    pub const PUSH_INT: u8 = 0x02;
    pub const PUSH_CONST: u8 = 0x03;
    pub const LOAD_LOCAL: u8 = 0x10;
    pub const STORE_LOCAL: u8 = 0x11;
    pub const GET_FIELD: u8 = 0x20;
    pub const PUT_FIELD: u8 = 0x21;
    pub const ADD: u8 = 0x30;
    pub const CONCAT: u8 = 0x31;
    pub const INVOKE_DYNAMIC: u8 = 0x40;
    pub const POP: u8 = 0x50;
    pub const DUP: u8 = 0x51;
    pub const JUMP: u8 = 0x60;
    pub const JUMP_IF_NULL: u8 = 0x61;
    pub const RETURN: u8 = 0xF0;
}

/// A decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Do nothing
    Nop,
    /// Push `null`
    PushNull,
    /// Push an integer literal
    PushInt(i64),
    /// Push a constant pool entry
    PushConst(u16),
    /// Push a local variable (parameters come first)
    LoadLocal(u8),
    /// Pop into a local variable
    StoreLocal(u8),
    /// Pop an object, push the value of one of its fields
    GetField(u16),
    /// Pop a value and an object, store the value into the object's field
    PutField(u16),
    /// Pop two integers, push their sum
    Add,
    /// Pop two values, push the concatenation of their string forms
    Concat,
    /// Pop an object, push the value supplied by the provider linked to this site
    InvokeDynamic {
        /// Constant index of the symbolic provider name
        symbol: u16,
        /// Constant index of the replaced slot's name
        slot: u16,
    },
    /// Discard the top of the stack
    Pop,
    /// Duplicate the top of the stack
    Dup,
    /// Continue at the given instruction index
    Jump(u32),
    /// Pop a value, jump if it is `null`
    JumpIfNull(u32),
    /// Pop the return value and leave the method
    Return,
}

impl Instruction {
    /// Opcode byte of this instruction
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Nop => opcode::NOP,
            Self::PushNull => opcode::PUSH_NULL,
            Self::PushInt(_) => opcode::PUSH_INT,
            Self::PushConst(_) => opcode::PUSH_CONST,
            Self::LoadLocal(_) => opcode::LOAD_LOCAL,
            Self::StoreLocal(_) => opcode::STORE_LOCAL,
            Self::GetField(_) => opcode::GET_FIELD,
            Self::PutField(_) => opcode::PUT_FIELD,
            Self::Add => opcode::ADD,
            Self::Concat => opcode::CONCAT,
            Self::InvokeDynamic { .. } => opcode::INVOKE_DYNAMIC,
            Self::Pop => opcode::POP,
            Self::Dup => opcode::DUP,
            Self::Jump(_) => opcode::JUMP,
            Self::JumpIfNull(_) => opcode::JUMP_IF_NULL,
            Self::Return => opcode::RETURN,
        }
    }

    /// Encoded width in bytes, opcode included
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::PushInt(_) => 9,
            Self::PushConst(_) | Self::GetField(_) | Self::PutField(_) => 3,
            Self::LoadLocal(_) | Self::StoreLocal(_) => 2,
            Self::InvokeDynamic { .. } | Self::Jump(_) | Self::JumpIfNull(_) => 5,
            _ => 1,
        }
    }

    /// Append the encoded form to `out`
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.opcode());
        match *self {
            Self::PushInt(value) => out.extend_from_slice(&value.to_le_bytes()),
            Self::PushConst(index) | Self::GetField(index) | Self::PutField(index) => {
                out.extend_from_slice(&index.to_le_bytes());
            }
            Self::LoadLocal(slot) | Self::StoreLocal(slot) => out.push(slot),
            Self::InvokeDynamic { symbol, slot } => {
                out.extend_from_slice(&symbol.to_le_bytes());
                out.extend_from_slice(&slot.to_le_bytes());
            }
            Self::Jump(target) | Self::JumpIfNull(target) => {
                out.extend_from_slice(&target.to_le_bytes());
            }
            _ => {}
        }
    }

    /// Jump target, if this is a branch
    pub fn branch_target(&self) -> Option<u32> {
        match self {
            Self::Jump(target) | Self::JumpIfNull(target) => Some(*target),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nop => f.write_str("nop"),
            Self::PushNull => f.write_str("push_null"),
            Self::PushInt(value) => write!(f, "push_int {value}"),
            Self::PushConst(index) => write!(f, "push_const #{index}"),
            Self::LoadLocal(slot) => write!(f, "load_local {slot}"),
            Self::StoreLocal(slot) => write!(f, "store_local {slot}"),
            Self::GetField(index) => write!(f, "get_field @{index}"),
            Self::PutField(index) => write!(f, "put_field @{index}"),
            Self::Add => f.write_str("add"),
            Self::Concat => f.write_str("concat"),
            Self::InvokeDynamic { symbol, slot } => {
                write!(f, "invoke_dynamic #{symbol} slot #{slot}")
            }
            Self::Pop => f.write_str("pop"),
            Self::Dup => f.write_str("dup"),
            Self::Jump(target) => write!(f, "jump {target}"),
            Self::JumpIfNull(target) => write!(f, "jump_if_null {target}"),
            Self::Return => f.write_str("return"),
        }
    }
}
