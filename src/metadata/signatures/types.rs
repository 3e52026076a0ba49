use std::fmt;

use crate::metadata::token::Token;

/// A named reference to a class or value type (`TypeDef`, `TypeRef` or `TypeSpec` token).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Token of the referenced type
    pub token: Token,
    /// Namespace, empty for the global namespace or for nested types
    pub namespace: String,
    /// Simple name of the type
    pub name: String,
}

impl TypeRef {
    /// Create a new type reference
    pub fn new(token: Token, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef {
            token,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Namespace qualified name, e.g. `UnityEngine.Vector3`
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// Represents a type in a method signature or local variable list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// void
    Void,
    /// bool
    Boolean,
    /// char
    Char,
    /// signed 8bit integer
    I1,
    /// unsigned 8bit integer
    U1,
    /// signed 16bit integer
    I2,
    /// unsigned 16bit integer
    U2,
    /// signed 32bit integer
    I4,
    /// unsigned 32bit integer
    U4,
    /// signed 64bit integer
    I8,
    /// unsigned 64bit integer
    U8,
    /// 32bit floating-point
    R4,
    /// 64bit floating-point
    R8,
    /// signed integer, sized to executing platform
    I,
    /// unsigned integer, sized to executing platform
    U,
    /// System.String
    String,
    /// System.Object
    Object,
    /// CIL value-type
    ValueType(TypeRef),
    /// CIL Class
    Class(TypeRef),
    /// Single dimension array
    SzArray(Box<TypeSignature>),
    /// Unmanaged pointer to a type
    Ptr(Box<TypeSignature>),
    /// Type by reference (`ref`, `out`)
    ByRef(Box<TypeSignature>),
    /// Generic type parameter, index into the declaring type's parameters
    GenericParamType(u32),
    /// Generic method parameter, index into the method's parameters
    GenericParamMethod(u32),
}

/// Storage class of a scalar primitive, which decides the zero constant that is loaded and the
/// indirect store that writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// bool, int8, uint8
    Int8,
    /// char, int16, uint16
    Int16,
    /// int32, uint32
    Int32,
    /// int64, uint64
    Int64,
    /// float32
    Float32,
    /// float64
    Float64,
    /// native int, native uint
    NativeInt,
}

/// How the default ("zero") value of a type is produced.
///
/// This is the single classification the weaver keys on: scalar primitives get a constant,
/// everything else is zero-initialized in a local through `initobj`, which nulls references
/// and recursively clears value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// No value, only valid for return types
    Void,
    /// A scalar primitive, produced by a zero constant
    Primitive(PrimitiveKind),
    /// Anything else, produced by zero-initializing a local of the type
    ZeroInit,
}

impl TypeSignature {
    /// Returns the class of default value this type requires
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dotguard::metadata::signatures::{DefaultValue, PrimitiveKind, TypeSignature};
    ///
    /// assert_eq!(TypeSignature::Void.default_value(), DefaultValue::Void);
    /// assert_eq!(
    ///     TypeSignature::Boolean.default_value(),
    ///     DefaultValue::Primitive(PrimitiveKind::Int8)
    /// );
    /// assert_eq!(TypeSignature::String.default_value(), DefaultValue::ZeroInit);
    /// ```
    #[must_use]
    pub fn default_value(&self) -> DefaultValue {
        match self {
            TypeSignature::Void => DefaultValue::Void,
            TypeSignature::Boolean | TypeSignature::I1 | TypeSignature::U1 => {
                DefaultValue::Primitive(PrimitiveKind::Int8)
            }
            TypeSignature::Char | TypeSignature::I2 | TypeSignature::U2 => {
                DefaultValue::Primitive(PrimitiveKind::Int16)
            }
            TypeSignature::I4 | TypeSignature::U4 => DefaultValue::Primitive(PrimitiveKind::Int32),
            TypeSignature::I8 | TypeSignature::U8 => DefaultValue::Primitive(PrimitiveKind::Int64),
            TypeSignature::R4 => DefaultValue::Primitive(PrimitiveKind::Float32),
            TypeSignature::R8 => DefaultValue::Primitive(PrimitiveKind::Float64),
            TypeSignature::I | TypeSignature::U => DefaultValue::Primitive(PrimitiveKind::NativeInt),
            _ => DefaultValue::ZeroInit,
        }
    }

    /// Returns true for `void`
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeSignature::Void)
    }

    /// Returns true for managed references (`ref`/`out` parameter types)
    #[must_use]
    pub fn is_by_ref(&self) -> bool {
        matches!(self, TypeSignature::ByRef(_))
    }

    /// The type a reference, pointer or array refers to; `self` for every other type
    #[must_use]
    pub fn element_type(&self) -> &TypeSignature {
        match self {
            TypeSignature::ByRef(inner) | TypeSignature::Ptr(inner) | TypeSignature::SzArray(inner) => {
                inner
            }
            _ => self,
        }
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Void => write!(f, "System.Void"),
            TypeSignature::Boolean => write!(f, "System.Boolean"),
            TypeSignature::Char => write!(f, "System.Char"),
            TypeSignature::I1 => write!(f, "System.SByte"),
            TypeSignature::U1 => write!(f, "System.Byte"),
            TypeSignature::I2 => write!(f, "System.Int16"),
            TypeSignature::U2 => write!(f, "System.UInt16"),
            TypeSignature::I4 => write!(f, "System.Int32"),
            TypeSignature::U4 => write!(f, "System.UInt32"),
            TypeSignature::I8 => write!(f, "System.Int64"),
            TypeSignature::U8 => write!(f, "System.UInt64"),
            TypeSignature::R4 => write!(f, "System.Single"),
            TypeSignature::R8 => write!(f, "System.Double"),
            TypeSignature::I => write!(f, "System.IntPtr"),
            TypeSignature::U => write!(f, "System.UIntPtr"),
            TypeSignature::String => write!(f, "System.String"),
            TypeSignature::Object => write!(f, "System.Object"),
            TypeSignature::ValueType(ty) | TypeSignature::Class(ty) => {
                write!(f, "{}", ty.full_name())
            }
            TypeSignature::SzArray(inner) => write!(f, "{inner}[]"),
            TypeSignature::Ptr(inner) => write!(f, "{inner}*"),
            TypeSignature::ByRef(inner) => write!(f, "{inner}&"),
            TypeSignature::GenericParamType(index) => write!(f, "!{index}"),
            TypeSignature::GenericParamMethod(index) => write!(f, "!!{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector3() -> TypeSignature {
        TypeSignature::ValueType(TypeRef::new(
            Token::from_parts(Token::TYPE_REF, 4),
            "UnityEngine",
            "Vector3",
        ))
    }

    #[test]
    fn test_default_value_primitives() {
        let cases = [
            (TypeSignature::Boolean, PrimitiveKind::Int8),
            (TypeSignature::U1, PrimitiveKind::Int8),
            (TypeSignature::Char, PrimitiveKind::Int16),
            (TypeSignature::I4, PrimitiveKind::Int32),
            (TypeSignature::U8, PrimitiveKind::Int64),
            (TypeSignature::R4, PrimitiveKind::Float32),
            (TypeSignature::R8, PrimitiveKind::Float64),
            (TypeSignature::I, PrimitiveKind::NativeInt),
        ];

        for (ty, kind) in cases {
            assert_eq!(ty.default_value(), DefaultValue::Primitive(kind), "{ty}");
        }
    }

    #[test]
    fn test_default_value_zero_init() {
        assert_eq!(vector3().default_value(), DefaultValue::ZeroInit);
        assert_eq!(TypeSignature::Object.default_value(), DefaultValue::ZeroInit);
        assert_eq!(
            TypeSignature::SzArray(Box::new(TypeSignature::I4)).default_value(),
            DefaultValue::ZeroInit
        );
        assert_eq!(
            TypeSignature::GenericParamMethod(0).default_value(),
            DefaultValue::ZeroInit
        );
    }

    #[test]
    fn test_element_type() {
        let by_ref = TypeSignature::ByRef(Box::new(vector3()));
        assert!(by_ref.is_by_ref());
        assert_eq!(by_ref.element_type(), &vector3());
        assert_eq!(TypeSignature::I4.element_type(), &TypeSignature::I4);
    }

    #[test]
    fn test_display_full_names() {
        assert_eq!(TypeSignature::Void.to_string(), "System.Void");
        assert_eq!(vector3().to_string(), "UnityEngine.Vector3");
        assert_eq!(
            TypeSignature::ByRef(Box::new(TypeSignature::I4)).to_string(),
            "System.Int32&"
        );
        assert_eq!(
            TypeSignature::SzArray(Box::new(TypeSignature::String)).to_string(),
            "System.String[]"
        );
        assert_eq!(TypeSignature::GenericParamType(1).to_string(), "!1");
    }
}
