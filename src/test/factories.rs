//! Factories for fabricated metadata: a small networked game with a `Game.Player` type derived
//! from `Mirror.NetworkBehaviour` and an unrelated `Game.Scoreboard`.

use crate::{
    assembly::{Instruction, OpCode, TokenResolver},
    metadata::{
        method::{MethodBody, MethodDefinition, MethodRef, TypeDefinition},
        signatures::{TypeRef, TypeSignature},
        token::Token,
    },
    weaver::{NetworkContext, RolePredicates, DEFAULT_BASE_TYPE},
    Result,
};

fn member_row(name: &str) -> u32 {
    match name {
        "get_isServer" => 1,
        "get_isClient" => 2,
        "get_hasAuthority" => 3,
        "get_isLocalPlayer" => 4,
        "LogWarning" => 5,
        _ => 16,
    }
}

/// Instance getter on `Mirror.NetworkBehaviour` returning a bool
pub fn network_behaviour_ref(name: &str) -> MethodRef {
    MethodRef::new(
        Token::from_parts(Token::MEMBER_REF, member_row(name)),
        DEFAULT_BASE_TYPE,
        name,
    )
    .instance()
    .returning()
}

/// `UnityEngine.Debug::LogWarning(object)`
pub fn log_warning_ref() -> MethodRef {
    MethodRef::new(
        Token::from_parts(Token::MEMBER_REF, member_row("LogWarning")),
        "UnityEngine.Debug",
        "LogWarning",
    )
    .with_params(1)
}

/// Context resolving against `Mirror.NetworkBehaviour`
pub fn test_context() -> NetworkContext {
    NetworkContext::new(
        RolePredicates {
            is_server: network_behaviour_ref("get_isServer"),
            is_client: network_behaviour_ref("get_isClient"),
            has_authority: network_behaviour_ref("get_hasAuthority"),
            is_local_player: network_behaviour_ref("get_isLocalPlayer"),
        },
        log_warning_ref(),
    )
}

/// `Game.Player : Mirror.NetworkBehaviour : UnityEngine.MonoBehaviour`
pub fn network_type() -> TypeDefinition {
    TypeDefinition::new(Token::from_parts(Token::TYPE_DEF, 2), "Game", "Player")
        .extends(DEFAULT_BASE_TYPE)
        .extends("UnityEngine.MonoBehaviour")
}

/// `Game.Scoreboard : UnityEngine.MonoBehaviour`
pub fn plain_type() -> TypeDefinition {
    TypeDefinition::new(Token::from_parts(Token::TYPE_DEF, 3), "Game", "Scoreboard")
        .extends("UnityEngine.MonoBehaviour")
}

/// A value type declared in `Game`
pub fn struct_type(name: &str) -> TypeSignature {
    TypeSignature::ValueType(TypeRef::new(
        Token::from_parts(Token::TYPE_DEF, 4),
        "Game",
        name,
    ))
}

/// `UnityEngine.Vector3`
pub fn vector_type() -> TypeSignature {
    TypeSignature::ValueType(TypeRef::new(
        Token::from_parts(Token::TYPE_REF, 7),
        "UnityEngine",
        "Vector3",
    ))
}

/// Instance method of `Game.Player` with a small body.
///
/// Void methods get `nop; ret`, others return their only local: `nop; ldloc.0; ret`.
pub fn guarded_method(name: &str, return_type: TypeSignature) -> MethodDefinition {
    let mut instructions = vec![Instruction::new(OpCode::Nop)];
    let mut locals = Vec::new();
    if !return_type.is_void() {
        instructions.push(Instruction::ldloc(0));
        locals.push(return_type.clone());
    }
    instructions.push(Instruction::new(OpCode::Ret));

    let mut body = MethodBody::from_instructions(instructions);
    body.locals = locals;
    body.init_locals = !body.locals.is_empty();
    body.max_stack = 1;

    MethodDefinition::new(
        Token::from_parts(Token::METHOD_DEF, 1),
        "Game.Player",
        name,
        return_type,
    )
    .with_body(body)
}

/// Hands out `TypeSpec` rows and `#US` offsets in order of first use
#[derive(Debug, Default)]
pub struct TableResolver {
    /// Types given a `TypeSpec` row
    pub specs: Vec<TypeSignature>,
    /// Strings given a user-string token
    pub strings: Vec<String>,
}

impl TokenResolver for TableResolver {
    fn type_token(&mut self, ty: &TypeSignature) -> Result<Token> {
        if let TypeSignature::ValueType(named) | TypeSignature::Class(named) = ty {
            return Ok(named.token);
        }

        let row = match self.specs.iter().position(|spec| spec == ty) {
            Some(index) => index,
            None => {
                self.specs.push(ty.clone());
                self.specs.len() - 1
            }
        };
        Ok(Token::from_parts(Token::TYPE_SPEC, row as u32 + 1))
    }

    fn string_token(&mut self, value: &str) -> Result<Token> {
        let row = match self.strings.iter().position(|known| known == value) {
            Some(index) => index,
            None => {
                self.strings.push(value.to_string());
                self.strings.len() - 1
            }
        };
        Ok(Token::from_parts(Token::USER_STRING, row as u32 + 1))
    }
}
