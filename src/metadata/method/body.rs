//! Editable representation of a CIL method body.
//!
//! Header values follow ECMA-335 II.25.4.3: `max_stack` is the deepest evaluation stack the body
//! needs and `init_locals` (`CorILMethod_InitLocals`) asks the runtime to zero every local before
//! the first instruction runs, which verifiable code requires as soon as it has locals.

use crate::{
    assembly::{Instruction, InstructionStream},
    metadata::signatures::TypeSignature,
    Result,
};

/// Describes the body of one method.
#[derive(Debug, Clone, Default)]
pub struct MethodBody {
    /// The instructions, in execution order
    pub instructions: InstructionStream,
    /// Types of the local variables, indexed by local number
    pub locals: Vec<TypeSignature>,
    /// Flag, indicating to call default constructor on all local variables
    pub init_locals: bool,
    /// Maximum number of items on the operand stack
    pub max_stack: u16,
}

impl MethodBody {
    /// Create an empty body
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body from instructions in execution order
    #[must_use]
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        let (instructions, _) = InstructionStream::from_instructions(instructions);
        MethodBody {
            instructions,
            ..Self::default()
        }
    }

    /// Append a local variable and return its index.
    ///
    /// # Errors
    /// Returns an error if the body already has 65535 locals, the limit of `ldloc`.
    pub fn add_local(&mut self, ty: TypeSignature) -> Result<u16> {
        let index = u16::try_from(self.locals.len())
            .ok()
            .filter(|index| *index < u16::MAX)
            .ok_or_else(|| malformed_error!("Method body can not hold more than 65535 locals"))?;
        self.locals.push(ty);
        Ok(index)
    }
}
