//! Early-return guard injection.
//!
//! A guard is a prologue placed ahead of a method's original first instruction:
//!
//! ```text
//!     ldarg.0
//!     call     <role predicate>
//!     brtrue   <original first instruction>
//!     ldstr    "<warning>"          // warning guards only
//!     call     <warning logger>     // warning guards only
//!     <default for each pure output parameter>
//!     <default return value>        // non-void methods only
//!     ret
//! original first instruction:
//!     ...
//! ```
//!
//! The branch targets the original first instruction by identity, so guards injected later are
//! placed in front of the previous prologue and run before it.

use log::{debug, warn};

use crate::{
    assembly::{BodyEmitter, EmitStats, InstrId, Instruction, OpCode},
    metadata::{
        method::{MethodBody, MethodDefinition, MethodRef, TypeDefinition},
        signatures::TypeSignature,
    },
    weaver::{
        defaults::{synthesize_output_default, synthesize_return_default},
        GuardContext, GuardKind,
    },
    Error, Result,
};

/// Prepend a role guard of `kind` to `method`, a method declared by `owner`.
///
/// `predicate` is the instance getter evaluated on argument 0; when it yields `false` the
/// method logs (for warning guards), assigns defaults and returns without running its body.
///
/// # Errors
/// - [`Error::InvalidDeclaringType`] if `owner` is not network-aware
/// - [`Error::MissingBody`] if the method has no body or an empty one
/// - an instruction stream error if the prologue does not fit the method, e.g. a predicate that
///   returns nothing or a parameter declared out of position
///
/// The method is left untouched whenever an error is returned.
pub fn inject_guard<C: GuardContext + ?Sized>(
    context: &C,
    owner: &TypeDefinition,
    method: &mut MethodDefinition,
    kind: GuardKind,
    predicate: &MethodRef,
) -> Result<()> {
    if !context.is_network_aware(owner) {
        let error = Error::InvalidDeclaringType {
            kind: kind.role.label().to_string(),
            method: method.name.clone(),
            declaring_type: owner.full_name(),
        };
        warn!("{error}");
        return Err(error);
    }

    let full_name = method.full_name();
    let outputs = method
        .params
        .iter()
        .filter(|param| param.is_output())
        .map(|param| Ok((method.argument_index(param)?, param.ty.element_type().clone())))
        .collect::<Result<Vec<(u16, TypeSignature)>>>()?;
    let return_type = method.return_type.clone();

    let Some(body) = method.body.as_mut() else {
        return Err(Error::MissingBody(full_name));
    };
    let Some(top) = body.instructions.first() else {
        return Err(Error::MissingBody(full_name));
    };

    // Restored if any step fails, the emitter writes into the live body
    let original = body.clone();
    let prologue = Prologue {
        kind,
        predicate,
        warning_text: kind.warning_text(&full_name),
        warning_method: context.warning_method(),
        outputs: &outputs,
        return_type: &return_type,
    };

    match prologue.emit(body, top) {
        Ok(stats) => {
            debug!(
                "Injected {} guard into {}: {} instruction(s), {} local(s), max stack {}",
                kind, full_name, stats.instructions, stats.locals, stats.max_stack
            );
            Ok(())
        }
        Err(error) => {
            *body = original;
            warn!("Failed to inject {kind} guard into {full_name}: {error}");
            Err(error)
        }
    }
}

/// Everything the early-return prologue of one guard is built from
struct Prologue<'a> {
    kind: GuardKind,
    predicate: &'a MethodRef,
    warning_text: String,
    warning_method: &'a MethodRef,
    outputs: &'a [(u16, TypeSignature)],
    return_type: &'a TypeSignature,
}

impl Prologue<'_> {
    fn emit(&self, body: &mut MethodBody, top: InstrId) -> Result<EmitStats> {
        let mut il = BodyEmitter::new(body, top, !self.return_type.is_void())?;

        il.emit(Instruction::ldarg(0))?;
        il.emit(Instruction::call(self.predicate.clone()))?;
        il.emit(Instruction::branch(OpCode::Brtrue, top))?;

        if self.kind.log_warning {
            il.emit(Instruction::ldstr(self.warning_text.clone()))?;
            il.emit(Instruction::call(self.warning_method.clone()))?;
        }

        for (argument, pointee) in self.outputs {
            synthesize_output_default(&mut il, *argument, pointee)?;
        }
        synthesize_return_default(&mut il, self.return_type)?;
        il.emit(Instruction::new(OpCode::Ret))?;

        Ok(il.finish())
    }
}
