//! End-to-end dispatch scenarios against concrete byte sequences, run through
//! a real [`Plan`]/[`Frame`]/[`interpreter::run`] round trip rather than unit
//! tests against individual handlers.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use evmcore::{
    error::FailureKind, frame::Frame, hardfork::Hardfork, interpreter, outcome::Outcome,
    plan::Plan, test_utils::TestHost, types::Word,
};

fn run(code: &[u8], gas: u64) -> (Outcome, Frame) {
    let plan = Plan::build(code, Hardfork::Cancun, 24576).expect("bytecode fits the size cap");
    let mut frame = Frame::new(
        Arc::new(plan),
        gas,
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
    (outcome, frame)
}

#[test]
fn push_push_add_stop() {
    // PUSH1 5; PUSH1 10; ADD; STOP
    let (outcome, frame) = run(&[0x60, 0x05, 0x60, 0x0A, 0x01, 0x00], 1_000_000);
    assert_eq!(outcome, Outcome::Success { gas_left: 999_991, gas_refund: 0, output: Bytes::new() });
    assert_eq!(frame.stack.peek(1).unwrap(), Word::from(15u64));
}

#[test]
fn division_by_zero_is_zero() {
    // PUSH1 0; PUSH1 5; DIV; STOP
    let (outcome, frame) = run(&[0x60, 0x00, 0x60, 0x05, 0x04, 0x00], 1_000_000);
    assert!(outcome.is_success());
    assert_eq!(frame.stack.peek(1).unwrap(), Word::ZERO);
}

#[test]
fn jump_skips_over_invalid_opcodes() {
    // PUSH1 8; JUMP; INVALID; INVALID; INVALID; JUMPDEST; PUSH1 42; STOP
    let (outcome, frame) =
        run(&[0x60, 0x08, 0x56, 0xFE, 0xFE, 0xFE, 0x5B, 0x60, 0x2A, 0x00], 1_000_000);
    assert!(outcome.is_success());
    assert_eq!(frame.stack.peek(1).unwrap(), Word::from(42u64));
}

#[test]
fn jump_into_push_data_is_invalid() {
    // PUSH1 5; JUMP; PUSH1 42; STOP -- target PC 5 is push-data for PUSH1 42
    let (outcome, _frame) = run(&[0x60, 0x05, 0x56, 0x60, 0x2A, 0x00], 1_000_000);
    assert_eq!(outcome, Outcome::Halt { kind: FailureKind::InvalidJump });
}

#[test]
fn stack_overflow_is_caught_at_block_entry() {
    let code = vec![0x5F; 1025]; // PUSH0 repeated past the 1024-word capacity
    let (outcome, _frame) = run(&code, 10_000_000);
    assert_eq!(outcome, Outcome::Halt { kind: FailureKind::StackOverflow { capacity: 1024 } });
}

#[test]
fn return_copies_memory_into_output() {
    // PUSH1 0x42; PUSH1 0; MSTORE; PUSH1 32; PUSH1 0; RETURN
    let (outcome, _frame) =
        run(&[0x60, 0x42, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xF3], 1_000_000);
    match outcome {
        Outcome::Success { output, .. } => {
            assert_eq!(output.len(), 32);
            assert_eq!(&output[..31], &[0u8; 31]);
            assert_eq!(output[31], 0x42);
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

#[test]
fn single_invalid_opcode_halts() {
    let (outcome, _frame) = run(&[0xFE], 1_000_000);
    assert_eq!(outcome, Outcome::Halt { kind: FailureKind::InvalidOpcode { opcode: 0xFE } });
    assert_eq!(outcome.gas_left(), 0);
}

#[test]
fn truncated_push_is_zero_padded() {
    // PUSH2 with only one data byte before the code ends
    let (outcome, frame) = run(&[0x61, 0x01], 1_000_000);
    assert!(outcome.is_success());
    assert_eq!(frame.stack.peek(1).unwrap(), Word::from(0x0100u64));
}

#[test]
fn sdiv_min_by_minus_one_does_not_overflow() {
    // PUSH32 MIN_I256; PUSH1 -1 (as 32-byte literal); SDIV; STOP
    let mut code = vec![0x7F];
    code.extend_from_slice(&[0x80u8]); // MSB set -> most negative
    code.extend_from_slice(&[0u8; 31]);
    code.push(0x7F);
    code.extend_from_slice(&[0xFFu8; 32]); // -1
    code.push(0x05); // SDIV
    code.push(0x00); // STOP
    let (outcome, frame) = run(&code, 1_000_000);
    assert!(outcome.is_success());
    let mut expected = [0u8; 32];
    expected[0] = 0x80;
    assert_eq!(frame.stack.peek(1).unwrap(), Word::from_be_bytes(expected));
}

#[test]
fn exp_zero_to_zero_is_one() {
    // PUSH1 0; PUSH1 0; EXP; STOP
    let (outcome, frame) = run(&[0x60, 0x00, 0x60, 0x00, 0x0A, 0x00], 1_000_000);
    assert!(outcome.is_success());
    assert_eq!(frame.stack.peek(1).unwrap(), Word::from(1u64));
}

#[test]
fn empty_bytecode_succeeds_with_full_gas() {
    let (outcome, _frame) = run(&[], 1_000_000);
    assert_eq!(outcome, Outcome::Success { gas_left: 1_000_000, gas_refund: 0, output: Bytes::new() });
}
