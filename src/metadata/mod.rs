//! Metadata model the weaver reads and mutates.
//!
//! # Key Components
//!
//! - [`token`] - Metadata tokens
//! - [`signatures`] - Parameter, return and local types, and their default-value class
//! - [`method`] - Method declarations, declaring types, method references and bodies
//! - [`diagnostics`] - Errors and warnings collected during a weaving pass

pub mod diagnostics;
pub mod method;
pub mod signatures;
pub mod token;
