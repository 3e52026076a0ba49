//! CIL opcodes (ECMA-335 Partition III) known to the weaver.
//!
//! Every [`OpCode`] carries its encoding, mnemonic, operand type, static stack effect and
//! control-flow class. The set covers everything the weaver emits plus the common opcodes found
//! in the bodies it prepends to. Two-byte opcodes use the [`FE_PREFIX`] byte.
//!
//! `call`, `callvirt`, `newobj` and `ret` have a signature-dependent stack effect; their table
//! entry records zero and the real effect is derived from the operand, see
//! [`crate::assembly::Instruction::stack_behavior`].

use crate::assembly::instruction::{FlowType, OperandType, StackBehavior};

/// Shared first byte of all two-byte opcodes
pub const FE_PREFIX: u8 = 0xFE;

macro_rules! opcodes {
    ($(
        $(#[$doc:meta])*
        $variant:ident = ($prefix:expr, $code:expr, $mnemonic:literal, $operand:ident, $pops:expr, $pushes:expr, $flow:ident)
    ),* $(,)?) => {
        /// A CIL opcode
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum OpCode {
            $(
                $(#[$doc])*
                $variant,
            )*
        }

        impl OpCode {
            /// All opcodes known to this crate
            pub const ALL: &'static [OpCode] = &[$(OpCode::$variant),*];

            /// Prefix byte, `0` for single-byte opcodes
            #[must_use]
            pub const fn prefix(self) -> u8 {
                match self {
                    $(OpCode::$variant => $prefix,)*
                }
            }

            /// Opcode byte (the second byte for prefixed opcodes)
            #[must_use]
            pub const fn code(self) -> u8 {
                match self {
                    $(OpCode::$variant => $code,)*
                }
            }

            /// Textual mnemonic, as printed by ILDasm
            #[must_use]
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(OpCode::$variant => $mnemonic,)*
                }
            }

            /// Type of the inline operand
            #[must_use]
            pub const fn operand_type(self) -> OperandType {
                match self {
                    $(OpCode::$variant => OperandType::$operand,)*
                }
            }

            /// Static stack effect
            #[must_use]
            pub const fn stack_behavior(self) -> StackBehavior {
                match self {
                    $(OpCode::$variant => StackBehavior::new($pops, $pushes),)*
                }
            }

            /// How this opcode affects control flow
            #[must_use]
            pub const fn flow_type(self) -> FlowType {
                match self {
                    $(OpCode::$variant => FlowType::$flow,)*
                }
            }
        }
    };
}

opcodes! {
    /// No operation
    Nop = (0x00, 0x00, "nop", None, 0, 0, Sequential),
    /// Load argument 0 (`this` for instance methods)
    Ldarg0 = (0x00, 0x02, "ldarg.0", None, 0, 1, Sequential),
    /// Load argument 1
    Ldarg1 = (0x00, 0x03, "ldarg.1", None, 0, 1, Sequential),
    /// Load argument 2
    Ldarg2 = (0x00, 0x04, "ldarg.2", None, 0, 1, Sequential),
    /// Load argument 3
    Ldarg3 = (0x00, 0x05, "ldarg.3", None, 0, 1, Sequential),
    /// Load local 0
    Ldloc0 = (0x00, 0x06, "ldloc.0", None, 0, 1, Sequential),
    /// Load local 1
    Ldloc1 = (0x00, 0x07, "ldloc.1", None, 0, 1, Sequential),
    /// Load local 2
    Ldloc2 = (0x00, 0x08, "ldloc.2", None, 0, 1, Sequential),
    /// Load local 3
    Ldloc3 = (0x00, 0x09, "ldloc.3", None, 0, 1, Sequential),
    /// Store local 0
    Stloc0 = (0x00, 0x0A, "stloc.0", None, 1, 0, Sequential),
    /// Store local 1
    Stloc1 = (0x00, 0x0B, "stloc.1", None, 1, 0, Sequential),
    /// Store local 2
    Stloc2 = (0x00, 0x0C, "stloc.2", None, 1, 0, Sequential),
    /// Store local 3
    Stloc3 = (0x00, 0x0D, "stloc.3", None, 1, 0, Sequential),
    /// Load argument, short form
    LdargS = (0x00, 0x0E, "ldarg.s", UInt8, 0, 1, Sequential),
    /// Load argument address, short form
    LdargaS = (0x00, 0x0F, "ldarga.s", UInt8, 0, 1, Sequential),
    /// Store argument, short form
    StargS = (0x00, 0x10, "starg.s", UInt8, 1, 0, Sequential),
    /// Load local, short form
    LdlocS = (0x00, 0x11, "ldloc.s", UInt8, 0, 1, Sequential),
    /// Load local address, short form
    LdlocaS = (0x00, 0x12, "ldloca.s", UInt8, 0, 1, Sequential),
    /// Store local, short form
    StlocS = (0x00, 0x13, "stloc.s", UInt8, 1, 0, Sequential),
    /// Load null reference
    Ldnull = (0x00, 0x14, "ldnull", None, 0, 1, Sequential),
    /// Load -1
    LdcI4M1 = (0x00, 0x15, "ldc.i4.m1", None, 0, 1, Sequential),
    /// Load 0
    LdcI4_0 = (0x00, 0x16, "ldc.i4.0", None, 0, 1, Sequential),
    /// Load 1
    LdcI4_1 = (0x00, 0x17, "ldc.i4.1", None, 0, 1, Sequential),
    /// Load 2
    LdcI4_2 = (0x00, 0x18, "ldc.i4.2", None, 0, 1, Sequential),
    /// Load 3
    LdcI4_3 = (0x00, 0x19, "ldc.i4.3", None, 0, 1, Sequential),
    /// Load 4
    LdcI4_4 = (0x00, 0x1A, "ldc.i4.4", None, 0, 1, Sequential),
    /// Load 5
    LdcI4_5 = (0x00, 0x1B, "ldc.i4.5", None, 0, 1, Sequential),
    /// Load 6
    LdcI4_6 = (0x00, 0x1C, "ldc.i4.6", None, 0, 1, Sequential),
    /// Load 7
    LdcI4_7 = (0x00, 0x1D, "ldc.i4.7", None, 0, 1, Sequential),
    /// Load 8
    LdcI4_8 = (0x00, 0x1E, "ldc.i4.8", None, 0, 1, Sequential),
    /// Load int32, short form
    LdcI4S = (0x00, 0x1F, "ldc.i4.s", Int8, 0, 1, Sequential),
    /// Load int32
    LdcI4 = (0x00, 0x20, "ldc.i4", Int32, 0, 1, Sequential),
    /// Load int64
    LdcI8 = (0x00, 0x21, "ldc.i8", Int64, 0, 1, Sequential),
    /// Load float32
    LdcR4 = (0x00, 0x22, "ldc.r4", Float32, 0, 1, Sequential),
    /// Load float64
    LdcR8 = (0x00, 0x23, "ldc.r8", Float64, 0, 1, Sequential),
    /// Duplicate the top of the stack
    Dup = (0x00, 0x25, "dup", None, 1, 2, Sequential),
    /// Discard the top of the stack
    Pop = (0x00, 0x26, "pop", None, 1, 0, Sequential),
    /// Call a method
    Call = (0x00, 0x28, "call", Token, 0, 0, Call),
    /// Return from method
    Ret = (0x00, 0x2A, "ret", None, 0, 0, Return),
    /// Unconditional branch, short form
    BrS = (0x00, 0x2B, "br.s", Int8, 0, 0, UnconditionalBranch),
    /// Branch if false, short form
    BrfalseS = (0x00, 0x2C, "brfalse.s", Int8, 1, 0, ConditionalBranch),
    /// Branch if true, short form
    BrtrueS = (0x00, 0x2D, "brtrue.s", Int8, 1, 0, ConditionalBranch),
    /// Unconditional branch
    Br = (0x00, 0x38, "br", Int32, 0, 0, UnconditionalBranch),
    /// Branch if false
    Brfalse = (0x00, 0x39, "brfalse", Int32, 1, 0, ConditionalBranch),
    /// Branch if true
    Brtrue = (0x00, 0x3A, "brtrue", Int32, 1, 0, ConditionalBranch),
    /// Load int32 indirect
    LdindI4 = (0x00, 0x4A, "ldind.i4", None, 1, 1, Sequential),
    /// Store object reference indirect
    StindRef = (0x00, 0x51, "stind.ref", None, 2, 0, Sequential),
    /// Store int8 indirect
    StindI1 = (0x00, 0x52, "stind.i1", None, 2, 0, Sequential),
    /// Store int16 indirect
    StindI2 = (0x00, 0x53, "stind.i2", None, 2, 0, Sequential),
    /// Store int32 indirect
    StindI4 = (0x00, 0x54, "stind.i4", None, 2, 0, Sequential),
    /// Store int64 indirect
    StindI8 = (0x00, 0x55, "stind.i8", None, 2, 0, Sequential),
    /// Store float32 indirect
    StindR4 = (0x00, 0x56, "stind.r4", None, 2, 0, Sequential),
    /// Store float64 indirect
    StindR8 = (0x00, 0x57, "stind.r8", None, 2, 0, Sequential),
    /// Add
    Add = (0x00, 0x58, "add", None, 2, 1, Sequential),
    /// Subtract
    Sub = (0x00, 0x59, "sub", None, 2, 1, Sequential),
    /// Multiply
    Mul = (0x00, 0x5A, "mul", None, 2, 1, Sequential),
    /// Call a method through its vtable slot
    Callvirt = (0x00, 0x6F, "callvirt", Token, 0, 0, Call),
    /// Copy a value type from an address onto the stack
    Ldobj = (0x00, 0x71, "ldobj", Token, 1, 1, Sequential),
    /// Load a literal string
    Ldstr = (0x00, 0x72, "ldstr", Token, 0, 1, Sequential),
    /// Allocate an object and call its constructor
    Newobj = (0x00, 0x73, "newobj", Token, 0, 1, Call),
    /// Throw an exception
    Throw = (0x00, 0x7A, "throw", None, 1, 0, Throw),
    /// Load instance field
    Ldfld = (0x00, 0x7B, "ldfld", Token, 1, 1, Sequential),
    /// Store instance field
    Stfld = (0x00, 0x7D, "stfld", Token, 2, 0, Sequential),
    /// Store a value type through an address
    Stobj = (0x00, 0x81, "stobj", Token, 2, 0, Sequential),
    /// Convert to native int
    ConvI = (0x00, 0xD3, "conv.i", None, 1, 1, Sequential),
    /// Store native int indirect
    StindI = (0x00, 0xDF, "stind.i", None, 2, 0, Sequential),
    /// Compare equal
    Ceq = (FE_PREFIX, 0x01, "ceq", None, 2, 1, Sequential),
    /// Load argument
    Ldarg = (FE_PREFIX, 0x09, "ldarg", UInt16, 0, 1, Sequential),
    /// Load argument address
    Ldarga = (FE_PREFIX, 0x0A, "ldarga", UInt16, 0, 1, Sequential),
    /// Store argument
    Starg = (FE_PREFIX, 0x0B, "starg", UInt16, 1, 0, Sequential),
    /// Load local
    Ldloc = (FE_PREFIX, 0x0C, "ldloc", UInt16, 0, 1, Sequential),
    /// Load local address
    Ldloca = (FE_PREFIX, 0x0D, "ldloca", UInt16, 0, 1, Sequential),
    /// Store local
    Stloc = (FE_PREFIX, 0x0E, "stloc", UInt16, 1, 0, Sequential),
    /// Zero-initialize a value at an address
    Initobj = (FE_PREFIX, 0x15, "initobj", Token, 1, 0, Sequential),
}

impl OpCode {
    /// Encoded size of the opcode itself, without operand
    #[must_use]
    pub const fn size(self) -> usize {
        if self.prefix() == 0 {
            1
        } else {
            2
        }
    }

    /// Returns true for branch opcodes whose operand is a target
    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(
            self.flow_type(),
            FlowType::ConditionalBranch | FlowType::UnconditionalBranch
        )
    }
}
