//! # dotguard Prelude
//!
//! The types needed to set up a weaving context, describe methods and inject guards.
//!
//! ```rust
//! use dotguard::prelude::*;
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotguard operations
pub use crate::Error;

/// The result type used throughout dotguard
pub use crate::Result;

// ================================================================================================
// Metadata
// ================================================================================================

pub use crate::metadata::{
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
    method::{
        MethodBody, MethodDefinition, MethodModifiers, MethodRef, ParamAttributes, ParamKind,
        Parameter, TypeDefinition,
    },
    signatures::{DefaultValue, PrimitiveKind, TypeRef, TypeSignature},
    token::Token,
};

// ================================================================================================
// Instructions
// ================================================================================================

pub use crate::assembly::{
    encode, BodyEmitter, EmitStats, InstrId, Instruction, InstructionStream, OpCode, Operand,
    TokenResolver,
};

// ================================================================================================
// Weaving
// ================================================================================================

pub use crate::weaver::{
    inject_guard, process_method_attributes, process_type, GuardContext, GuardKind,
    NetworkContext, Role, RolePredicates, DEFAULT_ATTRIBUTE_NAMESPACE, DEFAULT_BASE_TYPE,
};
