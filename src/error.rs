use thiserror::Error;

use crate::assembly::InstrId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Guard injection itself produces [`Error::InvalidDeclaringType`] and [`Error::MissingBody`]; the
/// remaining variants come from the instruction stream, the emitter and the encoder when they are
/// handed input that violates their contract.
///
/// # Error Categories
///
/// ## Weaving Errors
/// - [`Error::InvalidDeclaringType`] - A guard was requested on a type that is not network-aware
/// - [`Error::MissingBody`] - The method has no concrete instruction stream to guard
/// - [`Error::WeavingFailed`] - Aggregate failure of a pass that reported errors
///
/// ## Instruction Stream Errors
/// - [`Error::InstructionNotFound`] - An anchor does not belong to the stream
/// - [`Error::InvalidOperand`] - Operand does not match the opcode's operand type
/// - [`Error::BranchOutOfRange`] - A short branch cannot reach its target
/// - [`Error::StackUnderflow`] - An emitted sequence pops more than it pushed
/// - [`Error::Malformed`] - Any other structural inconsistency
///
/// # Examples
///
/// ```rust
/// use dotguard::Error;
///
/// let err = Error::InvalidDeclaringType {
///     kind: "Server".to_string(),
///     method: "Fire".to_string(),
///     declaring_type: "Game.Cannon".to_string(),
/// };
/// assert_eq!(
///     err.to_string(),
///     "Server method Fire must be declared in a network-aware type (Game.Cannon)"
/// );
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A guard was requested for a method whose declaring type lacks the network-aware
    /// capability.
    ///
    /// The method is left untouched. The error is local to the one method; a pass over a module
    /// is expected to record it and continue with the next method.
    #[error("{kind} method {method} must be declared in a network-aware type ({declaring_type})")]
    InvalidDeclaringType {
        /// Human readable label of the guard kind, e.g. `Server` or `Has Authority`
        kind: String,
        /// Name of the method the guard was requested for
        method: String,
        /// Full name of the declaring type that failed the capability check
        declaring_type: String,
    },

    /// The method has no body, or its body has no instructions.
    ///
    /// Abstract and extern methods never reach the weaver in a well-behaved pipeline.
    #[error("Method {0} has no instructions to guard")]
    MissingBody(String),

    /// A weaving pass finished with errors.
    ///
    /// The associated value is the number of errors recorded in the
    /// [`crate::metadata::diagnostics::Diagnostics`] of the pass.
    #[error("Weaving failed with {0} error(s)")]
    WeavingFailed(usize),

    /// The referenced instruction is not part of the stream.
    #[error("Instruction {0} is not part of this instruction stream")]
    InstructionNotFound(InstrId),

    /// An instruction carries an operand that its opcode can not encode.
    #[error("Invalid operand for '{mnemonic}' - expected {expected}")]
    InvalidOperand {
        /// Mnemonic of the offending instruction
        mnemonic: &'static str,
        /// Description of the operand the opcode expects
        expected: &'static str,
    },

    /// A short-form branch can not reach its target.
    #[error("Branch '{mnemonic}' can not reach its target (offset {offset})")]
    BranchOutOfRange {
        /// Mnemonic of the branch instruction
        mnemonic: &'static str,
        /// The relative offset that did not fit
        offset: i64,
    },

    /// An emitted sequence pops more values than are on the evaluation stack.
    #[error("Evaluation stack underflow at '{0}'")]
    StackUnderflow(&'static str),

    /// The input is structurally inconsistent.
    ///
    /// The error includes the source location where the inconsistency was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
