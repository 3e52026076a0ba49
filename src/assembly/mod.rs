//! CIL instruction model, editable instruction streams and bytecode encoding.
//!
//! # Architecture
//!
//! - [`OpCode`] - Opcode table with encoding, stack effect and flow metadata
//! - [`Instruction`] / [`Operand`] - Symbolic instructions whose branch targets are instruction
//!   identities rather than offsets
//! - [`InstructionStream`] - Ordered body with stable [`InstrId`] anchors and `insert_before`
//! - [`BodyEmitter`] - Insertion cursor used to prepend code with stack tracking
//! - [`encode`] - Two-pass lowering to bytecode through a [`TokenResolver`]

mod emitter;
mod encoder;
mod instruction;
mod opcodes;
mod stream;

pub use emitter::{BodyEmitter, EmitStats};
pub use encoder::{encode, instruction_offsets, instruction_size, TokenResolver};
pub use instruction::{FlowType, Immediate, Instruction, Operand, OperandType, StackBehavior};
pub use opcodes::{OpCode, FE_PREFIX};
pub use stream::{InstrId, InstructionStream};
