//! Metadata tokens referencing rows of the module the weaver operates on.
//!
//! A token is a 32-bit value whose high byte names the table and whose low 24 bits hold the
//! 1-based row. The weaver never resolves tokens itself: predicate and warning methods arrive
//! already resolved, and types or user strings are turned into tokens by a
//! [`crate::assembly::TokenResolver`] when a stream is encoded.
//!
//! # Examples
//!
//! ```rust
//! use dotguard::metadata::token::Token;
//!
//! let token = Token::new(0x0600_0001);
//! assert_eq!(token.table(), Token::METHOD_DEF);
//! assert_eq!(token.row(), 1);
//! ```

use std::fmt;

/// A metadata token (table id in the high byte, row in the low 24 bits).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Token(pub u32);

impl Token {
    /// `TypeRef` table
    pub const TYPE_REF: u8 = 0x01;
    /// `TypeDef` table
    pub const TYPE_DEF: u8 = 0x02;
    /// `MethodDef` table
    pub const METHOD_DEF: u8 = 0x06;
    /// `MemberRef` table
    pub const MEMBER_REF: u8 = 0x0A;
    /// `TypeSpec` table
    pub const TYPE_SPEC: u8 = 0x1B;
    /// `#US` heap, used by `ldstr`
    pub const USER_STRING: u8 = 0x70;

    /// Create a new token from its raw value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Create a token from a table id and a row
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the table id
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the row
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is the nil token
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
