//! Fusion-opcode detection (§3 "Fusion opcodes", §4.2 "Fusion detection").
//!
//! A literal `PUSH` immediately followed by one of a small set of consumer
//! opcodes collapses into a single synthetic instruction, skipping the
//! round trip through the stack. Fusion is purely a dispatch-count
//! optimization (§9 "Fusion extension"): a fused instruction's effect must
//! be exactly the composition of its two constituent opcodes, including
//! gas and stack effects, and it must never be emitted across a basic-block
//! boundary.

use crate::{analyzer::Analysis, constants::FUSION_OPCODE_BASE, opcode, types::Word};

/// Fused-opcode bytes, starting at [`FUSION_OPCODE_BASE`]. Never part of
/// the consensus 0x00-0xFF space and never persisted or transmitted
/// (§6.3).
pub const PUSH_ADD: u8 = FUSION_OPCODE_BASE;
pub const PUSH_SUB: u8 = FUSION_OPCODE_BASE + 1;
pub const PUSH_MUL: u8 = FUSION_OPCODE_BASE + 2;
pub const PUSH_DIV: u8 = FUSION_OPCODE_BASE + 3;
pub const PUSH_AND: u8 = FUSION_OPCODE_BASE + 4;
pub const PUSH_OR: u8 = FUSION_OPCODE_BASE + 5;
pub const PUSH_XOR: u8 = FUSION_OPCODE_BASE + 6;
pub const PUSH_JUMP: u8 = FUSION_OPCODE_BASE + 7;
pub const PUSH_JUMPI: u8 = FUSION_OPCODE_BASE + 8;
pub const PUSH_MLOAD: u8 = FUSION_OPCODE_BASE + 9;
pub const PUSH_MSTORE: u8 = FUSION_OPCODE_BASE + 10;
pub const PUSH_MSTORE8: u8 = FUSION_OPCODE_BASE + 11;

/// Highest byte a fusion opcode can take; used by the dispatch loop to
/// tell a real opcode from a synthetic one.
pub const MAX_FUSION_OPCODE: u8 = PUSH_MSTORE8;

/// Result of a successful fusion: the synthetic opcode byte, the literal
/// operand to encode (by the caller, which owns the constants table), the
/// PC the fused instruction is recorded at, and the PC to resume scanning
/// from (past both constituent opcodes).
pub struct Fused {
    pub opcode: u8,
    pub literal: Word,
    pub pc: usize,
    pub next_pc: usize,
}

fn consumer_fusion(consumer: u8) -> Option<u8> {
    Some(match consumer {
        opcode::ADD => PUSH_ADD,
        opcode::SUB => PUSH_SUB,
        opcode::MUL => PUSH_MUL,
        opcode::DIV => PUSH_DIV,
        opcode::AND => PUSH_AND,
        opcode::OR => PUSH_OR,
        opcode::XOR => PUSH_XOR,
        opcode::JUMP => PUSH_JUMP,
        opcode::JUMPI => PUSH_JUMPI,
        opcode::MLOAD => PUSH_MLOAD,
        opcode::MSTORE => PUSH_MSTORE,
        opcode::MSTORE8 => PUSH_MSTORE8,
        _ => return None,
    })
}

/// Attempts to fuse the `PUSH` starting at `push_pc` (whose data runs
/// `push_pc+1..push_data_end`, literal already decoded) with the opcode
/// immediately following it. Returns `None` if the next byte isn't a
/// fusible consumer, isn't adjacent, or would fuse across a block boundary.
pub fn try_fuse(
    code: &[u8],
    push_pc: usize,
    push_data_end: usize,
    literal: Word,
    analysis: &Analysis,
) -> Option<Fused> {
    let consumer_pc = push_data_end;
    if consumer_pc >= code.len() {
        return None;
    }
    // A fused instruction must stay within one basic block: the consumer
    // can't itself be an independently-reachable JUMPDEST (none of the
    // fusible consumers are JUMPDEST, so this also guards against a future
    // consumer set accidentally including one).
    if analysis.is_jumpdest(consumer_pc) {
        return None;
    }
    let consumer = code[consumer_pc];
    let fused_op = consumer_fusion(consumer)?;

    Some(Fused { opcode: fused_op, literal, pc: push_pc, next_pc: consumer_pc + 1 })
}
