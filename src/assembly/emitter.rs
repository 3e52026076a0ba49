//! Insertion cursor that prepends code to a method body.
//!
//! [`BodyEmitter`] inserts every instruction it is given before one fixed anchor instruction,
//! so a sequence of `emit` calls lands in program order ahead of the anchor. While emitting it
//! tracks the evaluation-stack depth of the inserted code and rejects sequences that underflow,
//! return with a dirty stack, or branch to the anchor with values left on the stack.
//!
//! The anchor is assumed to be reached with an empty evaluation stack, which holds for the
//! first instruction of a method.

use crate::{
    assembly::{FlowType, InstrId, Instruction, OpCode, StackBehavior},
    metadata::{method::MethodBody, signatures::TypeSignature},
    Error, Result,
};

/// What a [`BodyEmitter`] added to a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitStats {
    /// Number of instructions inserted
    pub instructions: usize,
    /// Number of local slots appended
    pub locals: usize,
    /// Highest evaluation-stack depth reached by the inserted code
    pub max_stack: u16,
}

/// Cursor inserting instructions before an anchor instruction of a [`MethodBody`].
pub struct BodyEmitter<'a> {
    body: &'a mut MethodBody,
    anchor: InstrId,
    returns_value: bool,
    depth: i32,
    stats: EmitStats,
}

impl<'a> BodyEmitter<'a> {
    /// Create an emitter inserting before `anchor`.
    ///
    /// `returns_value` decides how many values `ret` consumes.
    ///
    /// # Errors
    /// Returns [`Error::InstructionNotFound`] if `anchor` is not part of the body.
    pub fn new(body: &'a mut MethodBody, anchor: InstrId, returns_value: bool) -> Result<Self> {
        if body.instructions.position(anchor).is_none() {
            return Err(Error::InstructionNotFound(anchor));
        }

        Ok(BodyEmitter {
            body,
            anchor,
            returns_value,
            depth: 0,
            stats: EmitStats::default(),
        })
    }

    /// The instruction everything is inserted before
    #[must_use]
    pub fn anchor(&self) -> InstrId {
        self.anchor
    }

    /// Current evaluation-stack depth of the inserted code
    #[must_use]
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Insert `instruction` before the anchor.
    ///
    /// # Errors
    /// Returns [`Error::StackUnderflow`] if the instruction pops more than is available, or
    /// [`Error::Malformed`] if a `ret` or a branch to the anchor leaves values on the stack.
    pub fn emit(&mut self, instruction: Instruction) -> Result<InstrId> {
        let mnemonic = instruction.opcode.mnemonic();
        let behavior = if instruction.opcode == OpCode::Ret {
            StackBehavior::new(u8::from(self.returns_value), 0)
        } else {
            instruction.stack_behavior()
        };

        let after_pops = self.depth - i32::from(behavior.pops);
        if after_pops < 0 {
            return Err(Error::StackUnderflow(mnemonic));
        }

        let flow = instruction.opcode.flow_type();
        if flow == FlowType::Return && after_pops != 0 {
            return Err(malformed_error!(
                "'{}' leaves {} value(s) on the evaluation stack",
                mnemonic,
                after_pops
            ));
        }
        if instruction.target() == Some(self.anchor) && after_pops != 0 {
            return Err(malformed_error!(
                "Stack depth mismatch at branch '{}' to {}: expected 0, got {}",
                mnemonic,
                self.anchor,
                after_pops
            ));
        }

        let id = self
            .body
            .instructions
            .insert_before(self.anchor, instruction)?;

        self.depth = after_pops + i32::from(behavior.pushes);
        self.stats.max_stack = self
            .stats
            .max_stack
            .max(u16::try_from(self.depth).unwrap_or(u16::MAX));
        self.stats.instructions += 1;

        // Code after a terminator is only reachable through the anchor, which starts empty
        if matches!(
            flow,
            FlowType::Return | FlowType::Throw | FlowType::UnconditionalBranch
        ) {
            self.depth = 0;
        }

        Ok(id)
    }

    /// Append a local of type `ty` and request zero-initialized locals.
    ///
    /// # Errors
    /// Returns an error if the body already has the maximum number of locals.
    pub fn add_local(&mut self, ty: TypeSignature) -> Result<u16> {
        let index = self.body.add_local(ty)?;
        self.body.init_locals = true;
        self.stats.locals += 1;
        Ok(index)
    }

    /// Finish emitting, raising the body's `max_stack` to cover the inserted code
    pub fn finish(self) -> EmitStats {
        self.body.max_stack = self.body.max_stack.max(self.stats.max_stack);
        self.stats
    }
}
