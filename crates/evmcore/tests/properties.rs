//! Property-based checks over random bytecode and random arithmetic inputs,
//! covering the for-all invariants and round-trip/idempotence claims.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use evmcore::{
    error::FailureKind, frame::Frame, hardfork::Hardfork, interpreter, outcome::Outcome,
    plan::Plan, test_utils::TestHost, types::Word,
};
use proptest::prelude::*;

const MAX_BYTECODE_SIZE: usize = 24576;
const STACK_CAPACITY: usize = 1024;

fn run_with_gas(code: &[u8], gas: u64) -> Outcome {
    let plan = Plan::build(code, Hardfork::Cancun, MAX_BYTECODE_SIZE).expect("fits size cap");
    let mut frame = Frame::new(
        Arc::new(plan),
        gas,
        STACK_CAPACITY,
        Address::ZERO,
        Address::ZERO,
        Word::ZERO,
        Bytes::new(),
        false,
        0,
        49152,
    );
    let mut host = TestHost::new();
    interpreter::run(&mut frame, &mut host, Hardfork::Cancun)
}

proptest! {
    /// Gas charged never exceeds the initial allowance, and a Halt always
    /// reports zero gas left (§8 invariant 3).
    #[test]
    fn gas_left_never_exceeds_initial(code in prop::collection::vec(any::<u8>(), 0..256), gas in 0u64..2_000_000) {
        let outcome = run_with_gas(&code, gas);
        prop_assert!(outcome.gas_left() <= gas);
        if outcome.is_halt() {
            prop_assert_eq!(outcome.gas_left(), 0);
        }
    }

    /// Re-planning identical bytecode yields byte-identical plans (§8
    /// invariant 4, round-trip "Re-planning... produces the same
    /// instruction stream length and the same constants/jumpdest tables").
    #[test]
    fn replanning_is_deterministic(code in prop::collection::vec(any::<u8>(), 0..256)) {
        let a = Plan::build(&code, Hardfork::Cancun, MAX_BYTECODE_SIZE);
        let b = Plan::build(&code, Hardfork::Cancun, MAX_BYTECODE_SIZE);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.instructions, b.instructions);
                prop_assert_eq!(a.constants, b.constants);
                prop_assert_eq!(a.blocks, b.blocks);
            }
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "plan-build outcome differs across identical inputs"),
        }
    }

    /// Executing the same program twice from the same initial state produces
    /// identical outcomes (§8 round-trip "identical (bytecode, input,
    /// context, initial state) twice produces identical Outcome").
    #[test]
    fn execution_is_deterministic(code in prop::collection::vec(any::<u8>(), 0..64)) {
        let first = run_with_gas(&code, 500_000);
        let second = run_with_gas(&code, 500_000);
        prop_assert_eq!(first, second);
    }

    /// ADD is commutative and matches wrapping u256 addition regardless of
    /// operand order (sanity check on the arithmetic kernel feeding the
    /// stack-bounds invariant).
    #[test]
    fn add_is_commutative(a in any::<u64>(), b in any::<u64>()) {
        let code_ab = push_push_add(a, b);
        let code_ba = push_push_add(b, a);
        let outcome_ab = run_with_gas(&code_ab, 1_000_000);
        let outcome_ba = run_with_gas(&code_ba, 1_000_000);
        prop_assert_eq!(outcome_ab, outcome_ba);
    }

    /// A stack-overflowing program always halts with `StackOverflow`, never
    /// silently truncating (§8 invariant 1: `0 <= stack_size <= capacity`).
    #[test]
    fn excess_pushes_always_overflow(extra in 1usize..64) {
        let mut code = vec![0x5Fu8; STACK_CAPACITY + extra]; // PUSH0 * n
        code.push(0x00); // STOP
        let outcome = run_with_gas(&code, 50_000_000);
        prop_assert_eq!(
            outcome,
            Outcome::Halt { kind: FailureKind::StackOverflow { capacity: STACK_CAPACITY as u16 } }
        );
    }
}

fn push_push_add(a: u64, b: u64) -> Vec<u8> {
    let mut code = Vec::new();
    push_u64(&mut code, a);
    push_u64(&mut code, b);
    code.push(0x01); // ADD
    code.push(0x00); // STOP
    code
}

fn push_u64(code: &mut Vec<u8>, value: u64) {
    let bytes = value.to_be_bytes();
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    let data = &bytes[first_nonzero..];
    code.push(0x60 + (data.len() as u8).saturating_sub(1)); // PUSHn
    code.extend_from_slice(data);
}
