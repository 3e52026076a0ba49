//! Lowering of a symbolic [`InstructionStream`] to CIL bytecode.
//!
//! Encoding runs in two passes: the first assigns every instruction its byte offset (the form of
//! each instruction is already fixed by its opcode), the second writes opcodes and operands and
//! resolves branch targets from instruction identities to relative offsets. Types and literal
//! strings become tokens through a caller supplied [`TokenResolver`], since assigning `TypeSpec`
//! rows or `#US` heap offsets is the business of whatever writes the module.
//!
//! # Usage Examples
//!
//! ```rust
//! use dotguard::assembly::{encode, Instruction, InstructionStream, OpCode, TokenResolver};
//! use dotguard::metadata::{signatures::TypeSignature, token::Token};
//!
//! struct NoTokens;
//!
//! impl TokenResolver for NoTokens {
//!     fn type_token(&mut self, _ty: &TypeSignature) -> dotguard::Result<Token> {
//!         Err(dotguard::Error::Malformed { message: "no types".into(), file: file!(), line: line!() })
//!     }
//!     fn string_token(&mut self, _value: &str) -> dotguard::Result<Token> {
//!         Err(dotguard::Error::Malformed { message: "no strings".into(), file: file!(), line: line!() })
//!     }
//! }
//!
//! let (stream, _) = InstructionStream::from_instructions(vec![
//!     Instruction::ldarg(0),
//!     Instruction::new(OpCode::Ret),
//! ]);
//! assert_eq!(encode(&stream, &mut NoTokens)?, vec![0x02, 0x2A]);
//! # Ok::<(), dotguard::Error>(())
//! ```

use std::collections::HashMap;

use crate::{
    assembly::{Immediate, InstrId, Instruction, InstructionStream, Operand, OperandType},
    metadata::{signatures::TypeSignature, token::Token},
    Error, Result,
};

/// Assigns metadata tokens to the symbolic operands of a stream.
pub trait TokenResolver {
    /// Token for a type operand (`TypeDef`, `TypeRef` or `TypeSpec`)
    ///
    /// # Errors
    /// Returns an error if the type can not be referenced from the module.
    fn type_token(&mut self, ty: &TypeSignature) -> Result<Token>;

    /// User-string token for an `ldstr` literal
    ///
    /// # Errors
    /// Returns an error if the string can not be added to the `#US` heap.
    fn string_token(&mut self, value: &str) -> Result<Token>;
}

/// Encoded size of an instruction in bytes
#[must_use]
pub fn instruction_size(instruction: &Instruction) -> usize {
    instruction.opcode.size() + instruction.opcode.operand_type().size()
}

/// Byte offset of every instruction of `stream`
#[must_use]
pub fn instruction_offsets(stream: &InstructionStream) -> HashMap<InstrId, u32> {
    let mut offsets = HashMap::with_capacity(stream.len());
    let mut offset = 0_u32;
    for (id, instruction) in stream.iter() {
        offsets.insert(id, offset);
        #[allow(clippy::cast_possible_truncation)]
        {
            offset += instruction_size(instruction) as u32;
        }
    }
    offsets
}

/// Encode `stream` to CIL bytecode.
///
/// # Errors
/// Returns [`Error::InvalidOperand`] when an operand does not fit its opcode,
/// [`Error::BranchOutOfRange`] when a short branch can not reach its target,
/// [`Error::InstructionNotFound`] when a branch targets an instruction outside the stream, and
/// propagates errors from the `resolver`.
pub fn encode<R: TokenResolver + ?Sized>(
    stream: &InstructionStream,
    resolver: &mut R,
) -> Result<Vec<u8>> {
    let offsets = instruction_offsets(stream);
    let mut bytecode = Vec::new();

    for (id, instruction) in stream.iter() {
        let opcode = instruction.opcode;
        let mnemonic = opcode.mnemonic();
        if opcode.prefix() != 0 {
            bytecode.push(opcode.prefix());
        }
        bytecode.push(opcode.code());

        let next = i64::from(offsets[&id]) + instruction_size(instruction) as i64;
        let relative = |target: InstrId| -> Result<i64> {
            offsets
                .get(&target)
                .map(|offset| i64::from(*offset) - next)
                .ok_or(Error::InstructionNotFound(target))
        };

        match (opcode.operand_type(), &instruction.operand) {
            (OperandType::None, Operand::None) => {}
            (OperandType::Int8, Operand::Target(target)) if opcode.is_branch() => {
                let offset = relative(*target)?;
                let short = i8::try_from(offset)
                    .map_err(|_| Error::BranchOutOfRange { mnemonic, offset })?;
                bytecode.extend_from_slice(&short.to_le_bytes());
            }
            (OperandType::Int32, Operand::Target(target)) if opcode.is_branch() => {
                let offset = relative(*target)?;
                let long = i32::try_from(offset)
                    .map_err(|_| Error::BranchOutOfRange { mnemonic, offset })?;
                bytecode.extend_from_slice(&long.to_le_bytes());
            }
            (OperandType::Int8, Operand::Immediate(Immediate::Int8(value))) => {
                bytecode.extend_from_slice(&value.to_le_bytes());
            }
            (OperandType::Int32, Operand::Immediate(Immediate::Int32(value))) => {
                bytecode.extend_from_slice(&value.to_le_bytes());
            }
            (OperandType::Int64, Operand::Immediate(Immediate::Int64(value))) => {
                bytecode.extend_from_slice(&value.to_le_bytes());
            }
            (OperandType::Float32, Operand::Immediate(Immediate::Float32(value))) => {
                bytecode.extend_from_slice(&value.to_le_bytes());
            }
            (OperandType::Float64, Operand::Immediate(Immediate::Float64(value))) => {
                bytecode.extend_from_slice(&value.to_le_bytes());
            }
            (OperandType::UInt8, Operand::Local(index) | Operand::Argument(index)) => {
                let short = u8::try_from(*index).map_err(|_| Error::InvalidOperand {
                    mnemonic,
                    expected: "an index below 256",
                })?;
                bytecode.push(short);
            }
            (OperandType::UInt16, Operand::Local(index) | Operand::Argument(index)) => {
                bytecode.extend_from_slice(&index.to_le_bytes());
            }
            (OperandType::Token, operand) => {
                let token = match operand {
                    Operand::Method(method) => method.token,
                    Operand::Type(ty) => resolver.type_token(ty)?,
                    Operand::String(value) => resolver.string_token(value)?,
                    Operand::Token(token) => *token,
                    _ => {
                        return Err(Error::InvalidOperand {
                            mnemonic,
                            expected: "a method, type, string or token",
                        })
                    }
                };
                bytecode.extend_from_slice(&token.value().to_le_bytes());
            }
            (operand_type, _) => {
                return Err(Error::InvalidOperand {
                    mnemonic,
                    expected: expected_operand(operand_type, opcode.is_branch()),
                })
            }
        }
    }

    Ok(bytecode)
}

fn expected_operand(operand_type: OperandType, branch: bool) -> &'static str {
    match operand_type {
        _ if branch => "a branch target",
        OperandType::None => "no operand",
        OperandType::Int8 => "an int8 immediate",
        OperandType::UInt8 | OperandType::UInt16 => "a local or argument index",
        OperandType::Int32 => "an int32 immediate",
        OperandType::Int64 => "an int64 immediate",
        OperandType::Float32 => "a float32 immediate",
        OperandType::Float64 => "a float64 immediate",
        OperandType::Token => "a metadata reference",
    }
}
