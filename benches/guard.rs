//! Benchmarks for guard injection.
//!
//! Measures the cost of weaving a single method and of encoding the woven body:
//! - Callback guard on a void method
//! - Warning guard with output parameters and a value type return
//! - Stacked guards on a long body
//! - Encoding a woven body

extern crate dotguard;

use criterion::{criterion_group, criterion_main, Criterion};
use dotguard::prelude::*;
use std::hint::black_box;

fn member(row: u32) -> Token {
    Token::from_parts(Token::MEMBER_REF, row)
}

fn getter(row: u32, name: &str) -> MethodRef {
    MethodRef::new(member(row), DEFAULT_BASE_TYPE, name)
        .instance()
        .returning()
}

fn context() -> NetworkContext {
    NetworkContext::new(
        RolePredicates {
            is_server: getter(1, "get_isServer"),
            is_client: getter(2, "get_isClient"),
            has_authority: getter(3, "get_hasAuthority"),
            is_local_player: getter(4, "get_isLocalPlayer"),
        },
        MethodRef::new(member(5), "UnityEngine.Debug", "LogWarning").with_params(1),
    )
}

fn player() -> TypeDefinition {
    TypeDefinition::new(Token::from_parts(Token::TYPE_DEF, 2), "Game", "Player")
        .extends(DEFAULT_BASE_TYPE)
}

fn vector() -> TypeSignature {
    TypeSignature::ValueType(TypeRef::new(
        Token::from_parts(Token::TYPE_REF, 7),
        "UnityEngine",
        "Vector3",
    ))
}

fn method(return_type: TypeSignature, body_len: usize) -> MethodDefinition {
    let mut instructions = vec![Instruction::new(OpCode::Nop); body_len];
    instructions.push(Instruction::new(OpCode::Ret));
    MethodDefinition::new(
        Token::from_parts(Token::METHOD_DEF, 1),
        "Game.Player",
        "Fire",
        return_type,
    )
    .with_body(MethodBody::from_instructions(instructions))
}

struct Tables;

impl TokenResolver for Tables {
    fn type_token(&mut self, _ty: &TypeSignature) -> Result<Token> {
        Ok(Token::from_parts(Token::TYPE_SPEC, 1))
    }

    fn string_token(&mut self, _value: &str) -> Result<Token> {
        Ok(Token::from_parts(Token::USER_STRING, 1))
    }
}

/// Benchmark a silent guard on `void Fire()`.
fn bench_inject_callback_void(c: &mut Criterion) {
    let context = context();
    let owner = player();
    let template = method(TypeSignature::Void, 1);
    let predicate = context.role_predicate(Role::Server).clone();

    c.bench_function("inject_callback_void", |b| {
        b.iter(|| {
            let mut target = template.clone();
            inject_guard(
                &context,
                &owner,
                &mut target,
                GuardKind::callback(Role::Server),
                &predicate,
            )
            .unwrap();
            black_box(target)
        });
    });
}

/// Benchmark a warning guard on `Vector3 Fire(out int, out Vector3)`.
fn bench_inject_warning_outputs(c: &mut Criterion) {
    let context = context();
    let owner = player();
    let template = method(vector(), 1)
        .with_param(Parameter::output(0, "hits", TypeSignature::I4))
        .with_param(Parameter::output(1, "spot", vector()));
    let predicate = context.role_predicate(Role::Client).clone();

    c.bench_function("inject_warning_outputs", |b| {
        b.iter(|| {
            let mut target = template.clone();
            inject_guard(
                &context,
                &owner,
                &mut target,
                GuardKind::warning(Role::Client),
                &predicate,
            )
            .unwrap();
            black_box(target)
        });
    });
}

/// Benchmark four stacked guards driven by attributes on a 1000 instruction body.
fn bench_process_stacked_attributes(c: &mut Criterion) {
    let context = context();
    let owner = player();
    let template = GuardKind::all()
        .step_by(2)
        .fold(method(TypeSignature::Void, 1000), |method, kind| {
            method.with_attribute(kind.attribute_name("Mirror"))
        });

    c.bench_function("process_stacked_attributes", |b| {
        b.iter(|| {
            let mut target = template.clone();
            let diagnostics = Diagnostics::new();
            let injected = process_method_attributes(&context, &owner, &mut target, &diagnostics);
            black_box(injected)
        });
    });
}

/// Benchmark encoding a woven 1000 instruction body.
fn bench_encode_woven(c: &mut Criterion) {
    let context = context();
    let mut target = method(TypeSignature::I8, 1000).with_attribute("Mirror.ServerAttribute");
    process_method_attributes(&context, &player(), &mut target, &Diagnostics::new());
    let body = target.body.unwrap();

    c.bench_function("encode_woven", |b| {
        b.iter(|| {
            let bytes = encode(black_box(&body.instructions), &mut Tables).unwrap();
            black_box(bytes)
        });
    });
}

criterion_group!(
    benches,
    bench_inject_callback_void,
    bench_inject_warning_outputs,
    bench_process_stacked_attributes,
    bench_encode_woven,
);
criterion_main!(benches);
