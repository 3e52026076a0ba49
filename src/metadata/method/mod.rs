//! Methods, their declaring types and their bodies, as seen by the weaver.
//!
//! This module models the pieces of a compiled module a guard injection reads and writes: the
//! method declaration with its signature and custom attributes, the owning type with its base
//! chain, the editable [`MethodBody`], and [`MethodRef`] references to methods that injected code
//! calls.
//!
//! # Key Types
//! - [`MethodDefinition`] - A method declaration with optional body
//! - [`Parameter`] - A declared parameter with flags and type
//! - [`TypeDefinition`] - The type declaring a method
//! - [`MethodRef`] - A resolved reference to a callable method
//! - [`MethodBody`] - Instructions, locals and header values of a method

mod body;
mod definition;
mod types;

pub use body::MethodBody;
pub use definition::{MethodDefinition, MethodRef, Parameter, TypeDefinition};
pub use types::{MethodModifiers, ParamAttributes, ParamKind};
