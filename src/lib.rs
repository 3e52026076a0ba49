// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotguard
//!
//! Role guard weaving for .NET method bodies.
//!
//! Networked game code marks methods with attributes such as `[Server]` or
//! `[LocalPlayerCallback]` to say where they may run. `dotguard` rewrites the CIL of such a
//! method so that it checks the required role on entry and returns early, optionally logging a
//! warning, when the check fails. Output parameters and the return value of the early exit are
//! filled with type-correct defaults, so the rewritten body stays verifiable.
//!
//! ## Features
//!
//! - **Stable instruction identities** - Inserting code never invalidates branch targets
//! - **Stack tracking** - Every inserted sequence is checked for depth and `max_stack` is raised
//! - **Type-correct defaults** - Zero constants and stores of the right width, `initobj` otherwise
//! - **Diagnostics** - Failures are collected per method instead of aborting a pass
//! - **Encoding** - Instruction streams assemble to ECMA-335 bytecode with branch resolution
//!
//! ## Quick Start
//!
//! ```rust
//! use dotguard::prelude::*;
//!
//! let member = |row| Token::from_parts(Token::MEMBER_REF, row);
//! let getter = |row, name: &str| {
//!     MethodRef::new(member(row), DEFAULT_BASE_TYPE, name).instance().returning()
//! };
//! let context = NetworkContext::new(
//!     RolePredicates {
//!         is_server: getter(1, "get_isServer"),
//!         is_client: getter(2, "get_isClient"),
//!         has_authority: getter(3, "get_hasAuthority"),
//!         is_local_player: getter(4, "get_isLocalPlayer"),
//!     },
//!     MethodRef::new(member(5), "UnityEngine.Debug", "LogWarning").with_params(1),
//! );
//!
//! let owner = TypeDefinition::new(Token::from_parts(Token::TYPE_DEF, 2), "Game", "Player")
//!     .extends(DEFAULT_BASE_TYPE);
//! let mut method = MethodDefinition::new(
//!     Token::from_parts(Token::METHOD_DEF, 1),
//!     "Game.Player",
//!     "Fire",
//!     TypeSignature::Void,
//! )
//! .with_attribute("Mirror.ServerAttribute")
//! .with_body(MethodBody::from_instructions(vec![
//!     Instruction::new(OpCode::Nop),
//!     Instruction::new(OpCode::Ret),
//! ]));
//!
//! let diagnostics = Diagnostics::new();
//! let injected = process_method_attributes(&context, &owner, &mut method, &diagnostics);
//!
//! assert_eq!(injected, 1);
//! assert_eq!(method.body.as_ref().map(|body| body.instructions.len()), Some(8));
//! diagnostics.into_result()?;
//! # Ok::<(), dotguard::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - Tokens, type signatures, method declarations and bodies, diagnostics
//! - [`assembly`] - Opcodes, instructions, the instruction stream, the insertion cursor and the encoder
//! - [`weaver`] - Guard kinds, the runtime context, guard injection and default synthesis
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: `debug` for every injected guard, `warn` for
//! guards that could not be injected or sit on static methods, `trace` for recognised attributes.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

/// CIL opcodes, instructions and the editing and encoding machinery built on them.
///
/// # Key Types
///
/// - [`assembly::OpCode`] - The opcodes the weaver emits and recognises
/// - [`assembly::Instruction`] - An opcode with a symbolic operand
/// - [`assembly::InstructionStream`] - Ordered instructions with stable identities
/// - [`assembly::BodyEmitter`] - Inserts code ahead of an anchor while tracking the stack
/// - [`assembly::encode`] - Assembles a stream to bytecode
pub mod assembly;

/// Metadata model: tokens, signatures, method definitions and bodies.
pub mod metadata;

/// Attribute driven role guard injection.
pub mod weaver;

/// `dotguard` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotguard` Error type
///
/// # Examples
///
/// ```rust
/// use dotguard::Error;
///
/// let error = Error::MissingBody("System.Void Game.Player::Aim()".to_string());
/// match error {
///     Error::InvalidDeclaringType { declaring_type, .. } => println!("Not networked: {declaring_type}"),
///     Error::MissingBody(method) => println!("Nothing to guard in {method}"),
///     e => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;
