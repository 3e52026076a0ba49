//! CIL instruction representation and operand types.
//!
//! Unlike a decoded instruction, an [`Instruction`] here is symbolic: branch targets reference
//! other instructions by identity ([`InstrId`]), and methods, types and strings are carried as
//! metadata objects instead of tokens. That keeps a body editable - prepending code never moves a
//! branch target - and defers token assignment to [`crate::assembly::encode`].
//!
//! # Key Components
//!
//! - [`Instruction`] - Opcode plus symbolic operand
//! - [`Operand`] - Type-safe operand representation
//! - [`Immediate`] - Immediate value types
//! - [`FlowType`] - Control flow behavior classification
//! - [`StackBehavior`] - Stack effect of an instruction

use std::fmt;

use crate::{
    assembly::{opcodes::OpCode, InstrId},
    metadata::{method::MethodRef, signatures::TypeSignature, token::Token},
};

/// Types of inline operands of CIL instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    /// No operand present
    None,
    /// Signed 8-bit integer (also short branch offsets)
    Int8,
    /// Unsigned 8-bit integer (short argument and local indices)
    UInt8,
    /// Unsigned 16-bit integer (argument and local indices)
    UInt16,
    /// Signed 32-bit integer (also long branch offsets)
    Int32,
    /// Signed 64-bit integer
    Int64,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// Metadata token reference
    Token,
}

impl OperandType {
    /// Returns the size in bytes of this operand type.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            OperandType::None => 0,
            OperandType::Int8 | OperandType::UInt8 => 1,
            OperandType::UInt16 => 2,
            OperandType::Int32 | OperandType::Float32 | OperandType::Token => 4,
            OperandType::Int64 | OperandType::Float64 => 8,
        }
    }
}

/// Represents an immediate value embedded in a CIL instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Immediate {
    /// Signed 8-bit immediate value
    Int8(i8),
    /// Signed 32-bit immediate value
    Int32(i32),
    /// Signed 64-bit immediate value
    Int64(i64),
    /// 32-bit floating point immediate value
    Float32(f32),
    /// 64-bit floating point immediate value
    Float64(f64),
}

/// Operand of an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand present
    None,
    /// Immediate value (constant embedded in instruction)
    Immediate(Immediate),
    /// Branch target, by instruction identity
    Target(InstrId),
    /// Local variable index
    Local(u16),
    /// Method argument index (including `this` for instance methods)
    Argument(u16),
    /// Method reference, for `call`, `callvirt` and `newobj`
    Method(MethodRef),
    /// Type reference, for `initobj`, `stobj` and `ldobj`
    Type(TypeSignature),
    /// Literal string, for `ldstr`
    String(String),
    /// Any other metadata token (fields)
    Token(Token),
}

/// How an instruction affects control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowType {
    /// Normal execution continues to next instruction
    Sequential,
    /// Conditional branch to another location
    ConditionalBranch,
    /// Always branches to another location (unconditional jump)
    UnconditionalBranch,
    /// Call to another method
    Call,
    /// Returns from current method
    Return,
    /// Exception throwing
    Throw,
}

/// Stack effect of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackBehavior {
    /// Number of items popped from stack
    pub pops: u8,
    /// Number of items pushed to stack
    pub pushes: u8,
}

impl StackBehavior {
    /// Create a new stack behavior
    #[must_use]
    pub const fn new(pops: u8, pushes: u8) -> Self {
        StackBehavior { pops, pushes }
    }

    /// Net effect on stack depth (pushes - pops)
    #[must_use]
    pub const fn net_effect(&self) -> i32 {
        self.pushes as i32 - self.pops as i32
    }
}

/// A single CIL instruction with a symbolic operand.
///
/// The constructors pick the shortest encoding for indices and constants, mirroring what a C#
/// compiler produces.
///
/// # Examples
///
/// ```rust
/// use dotguard::assembly::{Instruction, OpCode, Operand};
///
/// assert_eq!(Instruction::ldarg(0).opcode, OpCode::Ldarg0);
/// assert_eq!(Instruction::ldarg(7).opcode, OpCode::LdargS);
/// assert_eq!(Instruction::ldarg(7).operand, Operand::Argument(7));
/// assert_eq!(Instruction::ldc_i4(0).opcode, OpCode::LdcI4_0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The opcode
    pub opcode: OpCode,
    /// The operand, [`Operand::None`] for opcodes without inline operand
    pub operand: Operand,
}

impl Instruction {
    /// An instruction without operand
    #[must_use]
    pub fn new(opcode: OpCode) -> Self {
        Instruction {
            opcode,
            operand: Operand::None,
        }
    }

    /// An instruction with an operand
    #[must_use]
    pub fn with(opcode: OpCode, operand: Operand) -> Self {
        Instruction { opcode, operand }
    }

    /// Load argument `index`
    #[must_use]
    pub fn ldarg(index: u16) -> Self {
        match index {
            0 => Self::new(OpCode::Ldarg0),
            1 => Self::new(OpCode::Ldarg1),
            2 => Self::new(OpCode::Ldarg2),
            3 => Self::new(OpCode::Ldarg3),
            x if x <= 255 => Self::with(OpCode::LdargS, Operand::Argument(x)),
            x => Self::with(OpCode::Ldarg, Operand::Argument(x)),
        }
    }

    /// Load local `index`
    #[must_use]
    pub fn ldloc(index: u16) -> Self {
        match index {
            0 => Self::new(OpCode::Ldloc0),
            1 => Self::new(OpCode::Ldloc1),
            2 => Self::new(OpCode::Ldloc2),
            3 => Self::new(OpCode::Ldloc3),
            x if x <= 255 => Self::with(OpCode::LdlocS, Operand::Local(x)),
            x => Self::with(OpCode::Ldloc, Operand::Local(x)),
        }
    }

    /// Store into local `index`
    #[must_use]
    pub fn stloc(index: u16) -> Self {
        match index {
            0 => Self::new(OpCode::Stloc0),
            1 => Self::new(OpCode::Stloc1),
            2 => Self::new(OpCode::Stloc2),
            3 => Self::new(OpCode::Stloc3),
            x if x <= 255 => Self::with(OpCode::StlocS, Operand::Local(x)),
            x => Self::with(OpCode::Stloc, Operand::Local(x)),
        }
    }

    /// Load the address of local `index`
    #[must_use]
    pub fn ldloca(index: u16) -> Self {
        if index <= 255 {
            Self::with(OpCode::LdlocaS, Operand::Local(index))
        } else {
            Self::with(OpCode::Ldloca, Operand::Local(index))
        }
    }

    /// Load an int32 constant
    #[must_use]
    pub fn ldc_i4(value: i32) -> Self {
        match value {
            -1 => Self::new(OpCode::LdcI4M1),
            0 => Self::new(OpCode::LdcI4_0),
            1 => Self::new(OpCode::LdcI4_1),
            2 => Self::new(OpCode::LdcI4_2),
            3 => Self::new(OpCode::LdcI4_3),
            4 => Self::new(OpCode::LdcI4_4),
            5 => Self::new(OpCode::LdcI4_5),
            6 => Self::new(OpCode::LdcI4_6),
            7 => Self::new(OpCode::LdcI4_7),
            8 => Self::new(OpCode::LdcI4_8),
            x => match i8::try_from(x) {
                Ok(short) => Self::with(OpCode::LdcI4S, Operand::Immediate(Immediate::Int8(short))),
                Err(_) => Self::with(OpCode::LdcI4, Operand::Immediate(Immediate::Int32(x))),
            },
        }
    }

    /// Call `method`
    #[must_use]
    pub fn call(method: MethodRef) -> Self {
        Self::with(OpCode::Call, Operand::Method(method))
    }

    /// Branch to `target` with a branch `opcode`
    #[must_use]
    pub fn branch(opcode: OpCode, target: InstrId) -> Self {
        Self::with(opcode, Operand::Target(target))
    }

    /// An instruction taking a type operand (`initobj`, `stobj`, `ldobj`)
    #[must_use]
    pub fn typed(opcode: OpCode, ty: TypeSignature) -> Self {
        Self::with(opcode, Operand::Type(ty))
    }

    /// Load a literal string
    #[must_use]
    pub fn ldstr(value: impl Into<String>) -> Self {
        Self::with(OpCode::Ldstr, Operand::String(value.into()))
    }

    /// Stack effect of this instruction.
    ///
    /// Calls derive their effect from the referenced method; `ret` is reported as neutral since
    /// its effect depends on the enclosing method's return type.
    #[must_use]
    pub fn stack_behavior(&self) -> StackBehavior {
        match (self.opcode, &self.operand) {
            (OpCode::Call | OpCode::Callvirt, Operand::Method(method)) => {
                StackBehavior::new(method.stack_pops(), u8::from(method.returns_value))
            }
            (OpCode::Newobj, Operand::Method(method)) => {
                StackBehavior::new(method.stack_pops().saturating_sub(1), 1)
            }
            (opcode, _) => opcode.stack_behavior(),
        }
    }

    /// Branch target, if this is a branch
    #[must_use]
    pub fn target(&self) -> Option<InstrId> {
        match self.operand {
            Operand::Target(target) => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode.mnemonic())?;
        match &self.operand {
            Operand::None => Ok(()),
            Operand::Immediate(Immediate::Int8(v)) => write!(f, " {v}"),
            Operand::Immediate(Immediate::Int32(v)) => write!(f, " {v}"),
            Operand::Immediate(Immediate::Int64(v)) => write!(f, " {v}"),
            Operand::Immediate(Immediate::Float32(v)) => write!(f, " {v}"),
            Operand::Immediate(Immediate::Float64(v)) => write!(f, " {v}"),
            Operand::Target(target) => write!(f, " {target}"),
            Operand::Local(index) => write!(f, " V_{index}"),
            Operand::Argument(index) => write!(f, " A_{index}"),
            Operand::Method(method) => write!(f, " {}", method.full_name()),
            Operand::Type(ty) => write!(f, " {ty}"),
            Operand::String(value) => write!(f, " \"{value}\""),
            Operand::Token(token) => write!(f, " {token}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ldarg_forms() {
        assert_eq!(Instruction::ldarg(3), Instruction::new(OpCode::Ldarg3));
        assert_eq!(
            Instruction::ldarg(255),
            Instruction::with(OpCode::LdargS, Operand::Argument(255))
        );
        assert_eq!(
            Instruction::ldarg(256),
            Instruction::with(OpCode::Ldarg, Operand::Argument(256))
        );
    }

    #[test]
    fn test_local_forms() {
        assert_eq!(Instruction::ldloc(1), Instruction::new(OpCode::Ldloc1));
        assert_eq!(
            Instruction::ldloc(4),
            Instruction::with(OpCode::LdlocS, Operand::Local(4))
        );
        assert_eq!(
            Instruction::stloc(300),
            Instruction::with(OpCode::Stloc, Operand::Local(300))
        );
        assert_eq!(
            Instruction::ldloca(0),
            Instruction::with(OpCode::LdlocaS, Operand::Local(0))
        );
        assert_eq!(
            Instruction::ldloca(256),
            Instruction::with(OpCode::Ldloca, Operand::Local(256))
        );
    }

    #[test]
    fn test_ldc_i4_forms() {
        assert_eq!(Instruction::ldc_i4(-1).opcode, OpCode::LdcI4M1);
        assert_eq!(Instruction::ldc_i4(8).opcode, OpCode::LdcI4_8);
        assert_eq!(
            Instruction::ldc_i4(-100).operand,
            Operand::Immediate(Immediate::Int8(-100))
        );
        assert_eq!(
            Instruction::ldc_i4(1000).operand,
            Operand::Immediate(Immediate::Int32(1000))
        );
    }

    #[test]
    fn test_call_stack_behavior() {
        let is_server = MethodRef::new(Token::new(0x0A00_0001), "Mirror.NetworkBehaviour", "get_isServer")
            .instance()
            .returning();
        let behavior = Instruction::call(is_server).stack_behavior();
        assert_eq!(behavior, StackBehavior::new(1, 1));
        assert_eq!(behavior.net_effect(), 0);

        let log = MethodRef::new(Token::new(0x0A00_0002), "UnityEngine.Debug", "LogWarning")
            .with_params(1);
        assert_eq!(Instruction::call(log).stack_behavior(), StackBehavior::new(1, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Instruction::ldarg(9).to_string(), "ldarg.s A_9");
        assert_eq!(Instruction::ldstr("hi").to_string(), "ldstr \"hi\"");
        assert_eq!(
            Instruction::typed(OpCode::Initobj, TypeSignature::I4).to_string(),
            "initobj System.Int32"
        );
    }
}
