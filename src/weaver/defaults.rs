//! Default values for the early-return path.
//!
//! A guarded method that bails out still has to leave every pure output parameter assigned and
//! a value of the declared return type on the stack. Primitives get a zero constant of the
//! matching width; everything else gets a fresh local cleared with `initobj`.

use crate::{
    assembly::{BodyEmitter, Immediate, Instruction, OpCode, Operand},
    metadata::signatures::{DefaultValue, PrimitiveKind, TypeSignature},
    Result,
};

/// Push the zero constant of `kind`
fn emit_zero(il: &mut BodyEmitter<'_>, kind: PrimitiveKind) -> Result<()> {
    match kind {
        PrimitiveKind::Int8 | PrimitiveKind::Int16 | PrimitiveKind::Int32 => {
            il.emit(Instruction::ldc_i4(0))?;
        }
        PrimitiveKind::Int64 => {
            il.emit(Instruction::with(
                OpCode::LdcI8,
                Operand::Immediate(Immediate::Int64(0)),
            ))?;
        }
        PrimitiveKind::Float32 => {
            il.emit(Instruction::with(
                OpCode::LdcR4,
                Operand::Immediate(Immediate::Float32(0.0)),
            ))?;
        }
        PrimitiveKind::Float64 => {
            il.emit(Instruction::with(
                OpCode::LdcR8,
                Operand::Immediate(Immediate::Float64(0.0)),
            ))?;
        }
        PrimitiveKind::NativeInt => {
            il.emit(Instruction::ldc_i4(0))?;
            il.emit(Instruction::new(OpCode::ConvI))?;
        }
    }
    Ok(())
}

/// Indirect store matching the width of `kind`
fn store_indirect(kind: PrimitiveKind) -> OpCode {
    match kind {
        PrimitiveKind::Int8 => OpCode::StindI1,
        PrimitiveKind::Int16 => OpCode::StindI2,
        PrimitiveKind::Int32 => OpCode::StindI4,
        PrimitiveKind::Int64 => OpCode::StindI8,
        PrimitiveKind::Float32 => OpCode::StindR4,
        PrimitiveKind::Float64 => OpCode::StindR8,
        PrimitiveKind::NativeInt => OpCode::StindI,
    }
}

/// Push the default of `ty` through a new zero-initialized local
fn emit_zero_local(il: &mut BodyEmitter<'_>, ty: &TypeSignature) -> Result<()> {
    let local = il.add_local(ty.clone())?;
    il.emit(Instruction::ldloca(local))?;
    il.emit(Instruction::typed(OpCode::Initobj, ty.clone()))?;
    il.emit(Instruction::ldloc(local))?;
    Ok(())
}

/// Store the default of `pointee` through the output parameter in argument slot `argument`.
///
/// Leaves the evaluation stack as it found it.
///
/// # Errors
/// Returns an error if the parameter points at `void`, or if a local cannot be added.
pub fn synthesize_output_default(
    il: &mut BodyEmitter<'_>,
    argument: u16,
    pointee: &TypeSignature,
) -> Result<()> {
    match pointee.default_value() {
        DefaultValue::Void => Err(malformed_error!(
            "Output parameter in argument slot {} refers to void",
            argument
        )),
        DefaultValue::Primitive(kind) => {
            il.emit(Instruction::ldarg(argument))?;
            emit_zero(il, kind)?;
            il.emit(Instruction::new(store_indirect(kind)))?;
            Ok(())
        }
        DefaultValue::ZeroInit => {
            il.emit(Instruction::ldarg(argument))?;
            emit_zero_local(il, pointee)?;
            il.emit(Instruction::typed(OpCode::Stobj, pointee.clone()))?;
            Ok(())
        }
    }
}

/// Push the default of `return_type`, ready for `ret`. Emits nothing for `void`.
///
/// # Errors
/// Returns an error if a local cannot be added.
pub fn synthesize_return_default(il: &mut BodyEmitter<'_>, return_type: &TypeSignature) -> Result<()> {
    match return_type.default_value() {
        DefaultValue::Void => Ok(()),
        DefaultValue::Primitive(kind) => emit_zero(il, kind),
        DefaultValue::ZeroInit => emit_zero_local(il, return_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::Instruction,
        metadata::{method::MethodBody, signatures::TypeRef, token::Token},
        test::factories::{struct_type, vector_type},
        Error,
    };

    fn emitted(
        returns_value: bool,
        locals: Vec<TypeSignature>,
        emit: impl FnOnce(&mut BodyEmitter<'_>) -> Result<()>,
    ) -> (MethodBody, Vec<Instruction>) {
        let mut body = MethodBody::from_instructions(vec![Instruction::new(OpCode::Ret)]);
        body.locals = locals;
        let anchor = body.instructions.first().unwrap();
        let mut il = BodyEmitter::new(&mut body, anchor, returns_value).unwrap();
        emit(&mut il).unwrap();
        il.finish();

        let inserted: Vec<_> = body
            .instructions
            .iter()
            .take(body.instructions.len() - 1)
            .map(|(_, instr)| instr.clone())
            .collect();
        (body, inserted)
    }

    fn opcodes(instructions: &[Instruction]) -> Vec<OpCode> {
        instructions.iter().map(|instr| instr.opcode).collect()
    }

    #[test]
    fn test_output_primitive_widths() {
        let cases = [
            (TypeSignature::Boolean, OpCode::LdcI4_0, OpCode::StindI1),
            (TypeSignature::Char, OpCode::LdcI4_0, OpCode::StindI2),
            (TypeSignature::U2, OpCode::LdcI4_0, OpCode::StindI2),
            (TypeSignature::I4, OpCode::LdcI4_0, OpCode::StindI4),
            (TypeSignature::U8, OpCode::LdcI8, OpCode::StindI8),
            (TypeSignature::R4, OpCode::LdcR4, OpCode::StindR4),
            (TypeSignature::R8, OpCode::LdcR8, OpCode::StindR8),
        ];

        for (pointee, load, store) in cases {
            let (body, inserted) =
                emitted(false, Vec::new(), |il| synthesize_output_default(il, 1, &pointee));
            assert_eq!(
                opcodes(&inserted),
                [OpCode::Ldarg1, load, store],
                "out {pointee}"
            );
            assert!(body.locals.is_empty());
            assert_eq!(body.max_stack, 2);
        }
    }

    #[test]
    fn test_output_native_int() {
        let (_, inserted) = emitted(false, Vec::new(), |il| {
            synthesize_output_default(il, 0, &TypeSignature::I)
        });
        assert_eq!(
            opcodes(&inserted),
            [OpCode::Ldarg0, OpCode::LdcI4_0, OpCode::ConvI, OpCode::StindI]
        );
    }

    #[test]
    fn test_output_zero_init() {
        let pointee = vector_type();
        let (body, inserted) = emitted(false, vec![TypeSignature::I4], |il| {
            synthesize_output_default(il, 2, &pointee)
        });

        assert_eq!(
            inserted,
            [
                Instruction::ldarg(2),
                Instruction::ldloca(1),
                Instruction::typed(OpCode::Initobj, pointee.clone()),
                Instruction::ldloc(1),
                Instruction::typed(OpCode::Stobj, pointee.clone()),
            ]
        );
        assert_eq!(body.locals, [TypeSignature::I4, pointee]);
        assert!(body.init_locals);
        assert_eq!(body.max_stack, 2);
    }

    #[test]
    fn test_output_reference_type() {
        let (_, inserted) = emitted(false, Vec::new(), |il| {
            synthesize_output_default(il, 1, &TypeSignature::String)
        });
        assert_eq!(
            opcodes(&inserted),
            [
                OpCode::Ldarg1,
                OpCode::LdlocaS,
                OpCode::Initobj,
                OpCode::Ldloc0,
                OpCode::Stobj
            ]
        );
    }

    #[test]
    fn test_output_void_rejected() {
        let mut body = MethodBody::from_instructions(vec![Instruction::new(OpCode::Ret)]);
        let anchor = body.instructions.first().unwrap();
        let mut il = BodyEmitter::new(&mut body, anchor, false).unwrap();
        let result = synthesize_output_default(&mut il, 1, &TypeSignature::Void);
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_return_void_emits_nothing() {
        let (body, inserted) = emitted(false, Vec::new(), |il| {
            synthesize_return_default(il, &TypeSignature::Void)
        });
        assert!(inserted.is_empty());
        assert_eq!(body.max_stack, 0);
    }

    #[test]
    fn test_return_primitives() {
        let cases = [
            (TypeSignature::Boolean, vec![OpCode::LdcI4_0]),
            (TypeSignature::I4, vec![OpCode::LdcI4_0]),
            (TypeSignature::I8, vec![OpCode::LdcI8]),
            (TypeSignature::R4, vec![OpCode::LdcR4]),
            (TypeSignature::R8, vec![OpCode::LdcR8]),
            (TypeSignature::U, vec![OpCode::LdcI4_0, OpCode::ConvI]),
        ];

        for (ty, expected) in cases {
            let (body, inserted) = emitted(true, Vec::new(), |il| {
                synthesize_return_default(il, &ty)?;
                il.emit(Instruction::new(OpCode::Ret))?;
                Ok(())
            });
            let mut expected = expected;
            expected.push(OpCode::Ret);
            assert_eq!(opcodes(&inserted), expected, "return {ty}");
            assert!(body.locals.is_empty());
        }
    }

    #[test]
    fn test_return_zero_init() {
        let ty = struct_type("MyStruct");
        let (body, inserted) = emitted(true, Vec::new(), |il| {
            synthesize_return_default(il, &ty)?;
            il.emit(Instruction::new(OpCode::Ret))?;
            Ok(())
        });

        assert_eq!(
            inserted,
            [
                Instruction::ldloca(0),
                Instruction::typed(OpCode::Initobj, ty.clone()),
                Instruction::ldloc(0),
                Instruction::new(OpCode::Ret),
            ]
        );
        assert_eq!(body.locals, [ty]);
        assert_eq!(body.max_stack, 1);
    }

    #[test]
    fn test_return_reference_types() {
        let cases = [
            TypeSignature::String,
            TypeSignature::Object,
            TypeSignature::SzArray(Box::new(TypeSignature::I4)),
            TypeSignature::Class(TypeRef::new(
                Token::from_parts(Token::TYPE_REF, 9),
                "Game",
                "Weapon",
            )),
        ];

        for ty in cases {
            let (body, inserted) = emitted(true, vec![TypeSignature::I4], |il| {
                synthesize_return_default(il, &ty)?;
                il.emit(Instruction::new(OpCode::Ret))?;
                Ok(())
            });

            assert_eq!(
                inserted,
                [
                    Instruction::ldloca(1),
                    Instruction::typed(OpCode::Initobj, ty.clone()),
                    Instruction::ldloc(1),
                    Instruction::new(OpCode::Ret),
                ],
                "return {ty}"
            );
            assert_eq!(body.locals, [TypeSignature::I4, ty.clone()]);
            assert!(body.init_locals);
        }
    }

    #[test]
    fn test_return_constants_are_zero() {
        let (_, inserted) = emitted(true, Vec::new(), |il| {
            synthesize_return_default(il, &TypeSignature::R8)
        });
        assert_eq!(
            inserted[0].operand,
            Operand::Immediate(Immediate::Float64(0.0))
        );
    }
}
