//! A consensus-exact EVM execution engine: bytecode analyzer, plan builder,
//! plan cache, and dispatch interpreter, decoupled from any particular state
//! backend through the [`host::Host`] trait (§6.1).
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg_attr(not(feature = "std"), macro_use)]
#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod analyzer;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod fusion;
pub mod gas;
pub mod hardfork;
pub mod host;
pub mod interpreter;
pub mod memory;
pub mod opcode;
pub mod outcome;
pub mod plan;
pub mod plan_cache;
pub mod stack;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
pub mod word;

use alloy_primitives::{Address, Bytes};
use tracing::instrument;

use crate::{config::EngineConfig, error::FailureKind, host::Host, outcome::Outcome, plan_cache::PlanCache};

/// The static shape of one top-level call or sub-call into the engine
/// (§6.2).
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext {
    pub caller: Address,
    pub callee: Address,
    pub value: types::Word,
    pub is_static: bool,
    pub depth: u32,
}

/// A configured, cache-backed entry point into the engine (§6.2, §6.4).
///
/// Callers construct one `Engine` and reuse it across many `execute` calls
/// so the plan cache actually pays for itself (§4.3), rather than building
/// a fresh cache on every call.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    cache: PlanCache,
}

impl Engine {
    /// Builds an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { cache: PlanCache::new(config.cache_capacity), config }
    }

    /// Runs `code` against `host`'s state (§6.2 entry point).
    ///
    /// `#[instrument]` here, not on the dispatch loop or individual
    /// handlers: this fires once per call, not once per opcode.
    #[instrument(skip(self, code, input, host), fields(depth = context.depth, gas))]
    pub fn execute(
        &mut self,
        code: &[u8],
        input: &[u8],
        context: ExecutionContext,
        gas: u64,
        host: &mut dyn Host,
    ) -> Outcome {
        let hardfork = host.hardfork();
        let plan = match self.cache.get_or_build(code, hardfork, self.config.max_bytecode_size) {
            Ok(plan) => plan,
            Err(_) => return Outcome::Halt { kind: FailureKind::BytecodeTooLarge },
        };
        let mut frame = frame::Frame::new(
            plan,
            gas,
            self.config.stack_capacity,
            context.callee,
            context.caller,
            context.value,
            Bytes::copy_from_slice(input),
            context.is_static,
            context.depth,
            self.config.max_initcode_size,
        );
        interpreter::run(&mut frame, host, hardfork)
    }

    /// Drops all cached plans (§4.3), e.g. between independent test cases
    /// that want deterministic cache-miss counts.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// A single, uncached call into the engine (§6.2), for callers that don't
/// need a long-lived [`Engine`]. Equivalent to `Engine::default().execute`,
/// minus the plan-cache reuse across calls.
pub fn execute(
    code: &[u8],
    input: &[u8],
    context: ExecutionContext,
    gas: u64,
    host: &mut dyn Host,
) -> Outcome {
    Engine::default().execute(code, input, context, gas, host)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;
    use crate::{hardfork::Hardfork, test_utils::TestHost};

    #[test]
    fn execute_runs_a_simple_program() {
        let mut host = TestHost::new();
        host.hardfork = Hardfork::Cancun;
        let code = [0x60, 0x05, 0x60, 0x0A, 0x01, 0x00]; // PUSH1 5; PUSH1 10; ADD; STOP
        let context = ExecutionContext {
            caller: Address::ZERO,
            callee: Address::ZERO,
            value: types::Word::ZERO,
            is_static: false,
            depth: 0,
        };
        let outcome = execute(&code, &[], context, 1_000_000, &mut host);
        assert!(outcome.is_success());
    }

    #[test]
    fn engine_reuses_cached_plans_across_calls() {
        let mut host = TestHost::new();
        host.hardfork = Hardfork::Cancun;
        let mut engine = Engine::default();
        let code = [0x60, 0x01, 0x00];
        let context = ExecutionContext {
            caller: Address::ZERO,
            callee: Address::ZERO,
            value: types::Word::ZERO,
            is_static: false,
            depth: 0,
        };
        engine.execute(&code, &[], context, 100_000, &mut host);
        engine.execute(&code, &[], context, 100_000, &mut host);
        assert_eq!(engine.cache.hits(), 1);
        assert_eq!(engine.cache.misses(), 1);
    }

    #[test]
    fn empty_bytecode_succeeds_with_full_gas_left() {
        let mut host = TestHost::new();
        host.hardfork = Hardfork::Cancun;
        let context = ExecutionContext {
            caller: Address::ZERO,
            callee: Address::ZERO,
            value: types::Word::ZERO,
            is_static: false,
            depth: 0,
        };
        let outcome = execute(&[], &[], context, 1_000_000, &mut host);
        assert_eq!(outcome, Outcome::Success { gas_left: 1_000_000, gas_refund: 0, output: Bytes::new() });
    }
}
