//! Method and parameter flags for .NET CIL methods.
//!
//! # Key Types
//! - [`MethodModifiers`]: Method attribute flags (static, virtual, abstract, ...)
//! - [`ParamAttributes`]: Parameter attribute flags (in, out, optional, ...)
//! - [`ParamKind`]: How a parameter passes data between caller and callee

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// All possible flags for `ParamAttributes`
    pub struct ParamAttributes: u32 {
        /// Param is `In`
        const IN = 0x0001;
        /// Param is `out`
        const OUT = 0x0002;
        /// Param is optional
        const OPTIONAL = 0x0010;
        /// Param has default value
        const HAS_DEFAULT = 0x1000;
        /// Param has `FieldMarshal`
        const HAS_FIELD_MARSHAL = 0x2000;
    }
}

/// How a parameter passes data between caller and callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Passed by value
    Input,
    /// Passed by reference, readable and writable by the callee (`ref`)
    ByRef,
    /// Passed by reference and only written by the callee (`out`); must be assigned on every
    /// exit path
    Output,
}

impl ParamKind {
    /// Classify a parameter from its flags and whether its type is a managed reference
    #[must_use]
    pub fn classify(flags: ParamAttributes, by_ref: bool) -> Self {
        if !by_ref {
            ParamKind::Input
        } else if flags.contains(ParamAttributes::OUT) && !flags.contains(ParamAttributes::IN) {
            ParamKind::Output
        } else {
            ParamKind::ByRef
        }
    }
}
