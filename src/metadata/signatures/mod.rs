//! Type signatures of parameters, return values and locals.
//!
//! This is the subset of the ECMA-335 signature model (II.23.2) the weaver needs to reason about
//! method shapes: every element type a parameter or return value can carry, with named
//! references for classes and value types so that diagnostics can print full method names.
//!
//! # Key Types
//! - [`TypeSignature`] - A parameter, return or local type
//! - [`TypeRef`] - A named reference to a class or value type
//! - [`DefaultValue`] - How the zero value of a type is produced
//! - [`PrimitiveKind`] - Storage width class of a scalar primitive

mod types;

pub use types::*;
