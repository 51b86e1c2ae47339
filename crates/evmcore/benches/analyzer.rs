//! Analyzer/plan-builder throughput across bytecode sizes, and plan-cache
//! hit-path latency: generate bytecode, then benchmark the pure function
//! over it — [`Analysis::build`]/[`Plan::build`]/[`PlanCache`].

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evmcore::{analyzer::Analysis, hardfork::Hardfork, opcode, plan::Plan, plan_cache::PlanCache};

const SIZES: &[usize] = &[32, 512, 4096, 24576];

/// A mix of jumpdests, pushes and arithmetic, repeated to fill `len` bytes —
/// dense enough to exercise all three analyzer passes, not just a tight
/// loop of one opcode.
fn generate_mixed_bytecode(len: usize) -> Vec<u8> {
    let mut code = Vec::with_capacity(len);
    while code.len() + 8 <= len {
        code.push(opcode::JUMPDEST);
        code.push(opcode::PUSH1);
        code.push(0x01);
        code.push(opcode::PUSH1);
        code.push(0x02);
        code.push(opcode::ADD);
        code.push(opcode::POP);
        code.push(opcode::PC);
    }
    code.resize(len, opcode::JUMPDEST);
    code
}

fn bench_analyzer_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyzer_build");
    for &size in SIZES {
        let code = generate_mixed_bytecode(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &code, |b, code| {
            b.iter(|| Analysis::build(black_box(code), Hardfork::Cancun, true))
        });
    }
    group.finish();
}

fn bench_plan_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_build");
    for &size in SIZES {
        let code = generate_mixed_bytecode(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &code, |b, code| {
            b.iter(|| Plan::build(black_box(code), Hardfork::Cancun, size + 1).unwrap())
        });
    }
    group.finish();
}

/// Plan-cache hit path: one miss to seed the cache, then repeated hits.
fn bench_plan_cache_hit(c: &mut Criterion) {
    let code = generate_mixed_bytecode(4096);
    let mut cache = PlanCache::new(8);
    cache.get_or_build(&code, Hardfork::Cancun, 24576).unwrap();

    c.bench_function("plan_cache_hit", |b| {
        b.iter(|| cache.get_or_build(black_box(&code), Hardfork::Cancun, 24576).unwrap())
    });
}

criterion_group!(analyzer, bench_analyzer_build, bench_plan_build, bench_plan_cache_hit);
criterion_main!(analyzer);
