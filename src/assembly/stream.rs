//! Editable instruction sequence with stable instruction identities.
//!
//! An [`InstructionStream`] stores instructions in an arena and keeps their order in a separate
//! index list. Every instruction is addressed by an [`InstrId`] that stays valid for the life of
//! the stream, no matter how many instructions are inserted before it. Branches reference their
//! targets by [`InstrId`], so prepending a prologue never invalidates a branch in the original
//! body, and a branch back to the former first instruction lands on exactly that instruction.
//!
//! # Examples
//!
//! ```rust
//! use dotguard::assembly::{Instruction, InstructionStream, OpCode};
//!
//! let mut stream = InstructionStream::new();
//! let ret = stream.push(Instruction::new(OpCode::Ret));
//! let nop = stream.insert_before(ret, Instruction::new(OpCode::Nop))?;
//!
//! assert_eq!(stream.first(), Some(nop));
//! assert_eq!(stream.position(ret), Some(1));
//! # Ok::<(), dotguard::Error>(())
//! ```

use std::fmt;

use crate::{assembly::Instruction, Error, Result};

/// Identity of an instruction inside one [`InstructionStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrId(u32);

impl InstrId {
    /// Index into the stream's arena
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L_{:04}", self.0)
    }
}

/// An ordered, editable sequence of instructions.
#[derive(Debug, Clone, Default)]
pub struct InstructionStream {
    arena: Vec<Instruction>,
    order: Vec<InstrId>,
}

impl InstructionStream {
    /// Create an empty stream
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stream from instructions in execution order.
    ///
    /// Returns the stream and the identities of the instructions, in the same order, so callers
    /// can wire up branches afterwards with [`InstructionStream::get_mut`].
    #[must_use]
    pub fn from_instructions(instructions: Vec<Instruction>) -> (Self, Vec<InstrId>) {
        let mut stream = Self::new();
        let ids = instructions
            .into_iter()
            .map(|instruction| stream.push(instruction))
            .collect();
        (stream, ids)
    }

    /// Append an instruction at the end
    pub fn push(&mut self, instruction: Instruction) -> InstrId {
        let id = self.allocate(instruction);
        self.order.push(id);
        id
    }

    /// Insert an instruction immediately before `anchor`.
    ///
    /// # Errors
    /// Returns [`Error::InstructionNotFound`] if `anchor` is not part of this stream.
    pub fn insert_before(&mut self, anchor: InstrId, instruction: Instruction) -> Result<InstrId> {
        let position = self
            .position(anchor)
            .ok_or(Error::InstructionNotFound(anchor))?;
        let id = self.allocate(instruction);
        self.order.insert(position, id);
        Ok(id)
    }

    /// The instruction executed first, if any
    #[must_use]
    pub fn first(&self) -> Option<InstrId> {
        self.order.first().copied()
    }

    /// Number of instructions
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the stream holds no instructions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up an instruction by identity
    #[must_use]
    pub fn get(&self, id: InstrId) -> Option<&Instruction> {
        if self.order.contains(&id) {
            self.arena.get(id.index())
        } else {
            None
        }
    }

    /// Look up an instruction by identity for modification
    pub fn get_mut(&mut self, id: InstrId) -> Option<&mut Instruction> {
        if self.order.contains(&id) {
            self.arena.get_mut(id.index())
        } else {
            None
        }
    }

    /// Current position of an instruction in execution order
    #[must_use]
    pub fn position(&self, id: InstrId) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == id)
    }

    /// Identity of the instruction at `position`
    #[must_use]
    pub fn id_at(&self, position: usize) -> Option<InstrId> {
        self.order.get(position).copied()
    }

    /// Iterate instructions in execution order
    pub fn iter(&self) -> impl Iterator<Item = (InstrId, &Instruction)> + '_ {
        self.order.iter().map(|id| (*id, &self.arena[id.index()]))
    }

    /// Identities in execution order
    #[must_use]
    pub fn ids(&self) -> &[InstrId] {
        &self.order
    }

    #[allow(clippy::cast_possible_truncation)]
    fn allocate(&mut self, instruction: Instruction) -> InstrId {
        let id = InstrId(self.arena.len() as u32);
        self.arena.push(instruction);
        id
    }
}

impl fmt::Display for InstructionStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, instruction) in self.iter() {
            writeln!(f, "{id}: {instruction}")?;
        }
        Ok(())
    }
}
