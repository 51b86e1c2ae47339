//! Dispatch-loop throughput benchmarks for pure (non-host-touching) opcodes:
//! one bytecode generator per opcode family, one `criterion::benchmark_group`
//! per opcode, run through [`Plan`]/[`Frame`]/[`interpreter::run`].

use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evmcore::{frame::Frame, hardfork::Hardfork, interpreter, opcode, plan::Plan, test_utils::TestHost, types::Word};

const ITERATIONS: usize = 10_000;
const GAS: u64 = 1_000_000_000;

fn push_u64(code: &mut Vec<u8>, value: u64) {
    let bytes = value.to_be_bytes();
    code.push(opcode::PUSH8);
    code.extend_from_slice(&bytes);
}

/// Builds `PUSH <inputs>; OP; POP` repeated `ITERATIONS` times.
fn generate_pure_op_bytecode(op: u8, stack_in: u8) -> Bytes {
    let mut code = Vec::new();
    for i in 0..ITERATIONS {
        for _ in 0..stack_in {
            push_u64(&mut code, i as u64 ^ 0x9E3779B9);
        }
        code.push(op);
        code.push(opcode::POP);
    }
    code.push(opcode::STOP);
    Bytes::from(code)
}

fn run_bytecode(code: &Bytes) {
    let plan = Plan::build(code, Hardfork::Cancun, code.len() + 1).expect("benchmark bytecode fits");
    let mut frame = Frame::new(
        Arc::new(plan),
        GAS,
        1024,
        Address::ZERO,
        Address::ZERO,
        Word::ZERO,
        Bytes::new(),
        false,
        0,
        49152,
    );
    let mut host = TestHost::new();
    let outcome = interpreter::run(&mut frame, &mut host, Hardfork::Cancun);
    assert!(outcome.is_success(), "benchmark program must complete: {outcome:?}");
}

fn bench_pure_opcode(c: &mut Criterion, name: &str, op: u8, stack_in: u8) {
    let bytecode = generate_pure_op_bytecode(op, stack_in);
    let mut group = c.benchmark_group(name);
    group.bench_function("dispatch", |b| b.iter(|| run_bytecode(black_box(&bytecode))));
    group.finish();
}

fn bench_add(c: &mut Criterion) {
    bench_pure_opcode(c, "add", opcode::ADD, 2);
}

fn bench_mul(c: &mut Criterion) {
    bench_pure_opcode(c, "mul", opcode::MUL, 2);
}

fn bench_sdiv(c: &mut Criterion) {
    bench_pure_opcode(c, "sdiv", opcode::SDIV, 2);
}

fn bench_and(c: &mut Criterion) {
    bench_pure_opcode(c, "and", opcode::AND, 2);
}

fn bench_lt(c: &mut Criterion) {
    bench_pure_opcode(c, "lt", opcode::LT, 2);
}

fn bench_iszero(c: &mut Criterion) {
    bench_pure_opcode(c, "iszero", opcode::ISZERO, 1);
}

fn bench_dup1(c: &mut Criterion) {
    bench_pure_opcode(c, "dup1", opcode::DUP1, 1);
}

/// Benchmarks the fused `PUSH+ADD` opcode against the unfused baseline to
/// quantify the dispatch-count reduction fusion buys (§9 "Fusion is an
/// optimization... only dispatch count differs").
fn bench_fused_push_add(c: &mut Criterion) {
    let mut unfused = Vec::new();
    let mut fused = Vec::new();
    for i in 0..ITERATIONS {
        push_u64(&mut unfused, 1);
        push_u64(&mut unfused, i as u64);
        unfused.push(opcode::ADD);
        unfused.push(opcode::POP);

        // PUSH1 1 fuses with the following ADD into a synthetic PUSH_ADD
        // slot; the second PUSH stays a plain push since fusion only
        // pairs one PUSH with its immediate consumer.
        fused.push(opcode::PUSH1);
        fused.push(1);
        push_u64(&mut fused, i as u64);
        fused.push(opcode::ADD);
        fused.push(opcode::POP);
    }
    unfused.push(opcode::STOP);
    fused.push(opcode::STOP);
    let unfused = Bytes::from(unfused);
    let fused = Bytes::from(fused);

    let mut group = c.benchmark_group("push_add_fusion");
    group.bench_function("two_pushes", |b| b.iter(|| run_bytecode(black_box(&unfused))));
    group.bench_function("one_push_fused", |b| b.iter(|| run_bytecode(black_box(&fused))));
    group.finish();
}

criterion_group!(
    dispatch,
    bench_add,
    bench_mul,
    bench_sdiv,
    bench_and,
    bench_lt,
    bench_iszero,
    bench_dup1,
    bench_fused_push_add,
);
criterion_main!(dispatch);
