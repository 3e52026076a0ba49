//! Role guard weaving.
//!
//! Methods of network-aware types can be restricted to a networking role (server, client,
//! authority, local player) with an attribute. The weaver rewrites such a method so it checks
//! the role first and, if the check fails, returns a default result without running its body.
//!
//! # Key Components
//!
//! - [`GuardKind`] / [`Role`] - What a guard checks and whether it logs
//! - [`GuardContext`] / [`NetworkContext`] - Runtime references and the network-aware check
//! - [`inject_guard`] - Prepend one guard to a method
//! - [`process_method_attributes`] / [`process_type`] - Attribute driven injection with diagnostics
//! - [`synthesize_output_default`] / [`synthesize_return_default`] - Defaults for the early return
//!
//! # Examples
//!
//! ```rust,ignore
//! use dotguard::prelude::*;
//!
//! let diagnostics = Diagnostics::new();
//! let injected = process_type(&context, &owner, &mut methods, &diagnostics);
//! diagnostics.into_result()?;
//! ```

mod attributes;
mod context;
mod defaults;
mod guard;
mod kind;

pub use attributes::{guard_kinds, process_method_attributes, process_type};
pub use context::{
    GuardContext, NetworkContext, RolePredicates, DEFAULT_ATTRIBUTE_NAMESPACE, DEFAULT_BASE_TYPE,
};
pub use defaults::{synthesize_output_default, synthesize_return_default};
pub use guard::inject_guard;
pub use kind::{GuardKind, Role};
