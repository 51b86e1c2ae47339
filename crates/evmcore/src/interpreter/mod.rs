//! The dispatch loop (§4.4 "Dispatch", §4.5 "Gas pre-charge").
//!
//! Each basic block is entered exactly once — at PC 0, or whenever dispatch
//! lands on a `JUMPDEST` — and its static gas and stack bounds are charged
//! and checked up front (§4.4 "Stack-safety protocol"). Individual handlers
//! below only ever charge dynamic surcharges (memory expansion, access-list
//! warm/cold, `SLOAD`/`SSTORE`, `CALL`/`CREATE` family, `LOG*`, `SHA3`,
//! `EXP`); their fixed per-opcode cost was already paid by the block
//! preamble.

pub mod arithmetic;
pub mod bitwise;
pub mod comparison;
pub mod control;
pub mod environment;
pub mod memory_ops;
pub mod stack_ops;
pub mod storage;
pub mod system;

use crate::{
    constants,
    error::FailureKind,
    frame::Frame,
    fusion,
    hardfork::Hardfork,
    host::{CallKind, Host},
    opcode::{self, OPCODE_INFO},
    outcome::Outcome,
    plan::BlockMeta,
    types::{word_to_bool, Word},
};

enum Step {
    Continue,
    Jump(u32),
    Terminate(Outcome),
}

/// Runs `frame` to completion against `host`, returning the terminal
/// [`Outcome`] (§6.2).
pub fn run(frame: &mut Frame, host: &mut dyn Host, hardfork: Hardfork) -> Outcome {
    let entry = frame.plan.entry_block;
    if let Err(kind) = enter_block(frame, entry) {
        return Outcome::Halt { kind };
    }

    // The entry block (starting at pc 0) is already charged above. If its
    // first instruction happens to be a `JUMPDEST`, the loop below must not
    // re-enter and re-charge it on this first iteration.
    let mut entered_first_block = false;

    loop {
        let Some(instr) = frame.current() else {
            return control::stop(frame);
        };

        if instr.opcode == opcode::JUMPDEST && entered_first_block {
            if let Some(block) = frame.plan.block_at(instr.pc) {
                if let Err(kind) = enter_block(frame, block) {
                    return Outcome::Halt { kind };
                }
            }
        }
        entered_first_block = true;

        if cfg!(debug_assertions) {
            tracing::trace!(
                pc = instr.pc,
                opcode = instr.opcode,
                gas_remaining = frame.gas.remaining(),
                "dispatch"
            );
        }

        match step(frame, host, hardfork) {
            Ok(Step::Continue) => frame.index += 1,
            Ok(Step::Jump(target)) => frame.index = target as usize,
            Ok(Step::Terminate(outcome)) => return outcome,
            Err(kind) => return Outcome::Halt { kind },
        }
    }
}

/// Charges a block's pre-summarized static gas and checks that the stack
/// never underflows or overflows at any point inside it, given the stack
/// height on entry (§4.1 Pass 3, §4.4).
fn enter_block(frame: &mut Frame, block: BlockMeta) -> Result<(), FailureKind> {
    let current = frame.stack.len() as i32;
    let capacity = frame.stack.capacity() as i32;
    if current + (block.min_stack_delta as i32) < 0 {
        return Err(FailureKind::StackUnderflow {
            wanted: (-(current + block.min_stack_delta as i32)) as u16,
            have: current as u16,
        });
    }
    if current + block.max_stack_delta as i32 > capacity {
        return Err(FailureKind::StackOverflow { capacity: capacity as u16 });
    }
    frame.gas.charge(block.static_gas as u64)
}

fn step(frame: &mut Frame, host: &mut dyn Host, hardfork: Hardfork) -> Result<Step, FailureKind> {
    use opcode::*;

    let instr = frame.current().expect("caller checked `frame.current()` is Some");
    let op = instr.opcode;

    if op >= constants::FUSION_OPCODE_BASE {
        let literal = frame.plan.resolve(instr.operand);
        return match dispatch_fused(frame, op, literal)? {
            Some(target) => Ok(Step::Jump(target)),
            None => Ok(Step::Continue),
        };
    }

    let info = OPCODE_INFO[op as usize];
    if !info.valid || !hardfork.enables(info.since) {
        return Err(FailureKind::InvalidOpcode { opcode: op });
    }

    match op {
        STOP => return Ok(Step::Terminate(control::stop(frame))),
        RETURN => return Ok(Step::Terminate(control::ret(frame)?)),
        REVERT => return Ok(Step::Terminate(control::revert(frame)?)),
        INVALID => return Ok(Step::Terminate(control::invalid())),
        SELFDESTRUCT => return Ok(Step::Terminate(control::selfdestruct(frame, host, hardfork)?)),

        JUMP => return Ok(Step::Jump(control::jump_target(frame)?)),
        JUMPI => {
            return Ok(match control::jumpi_target(frame)? {
                Some(target) => Step::Jump(target),
                None => Step::Continue,
            })
        }

        ADD => arithmetic::add(frame)?,
        SUB => arithmetic::sub(frame)?,
        MUL => arithmetic::mul(frame)?,
        DIV => arithmetic::div(frame)?,
        SDIV => arithmetic::sdiv(frame)?,
        MOD => arithmetic::modulo(frame)?,
        SMOD => arithmetic::smod(frame)?,
        ADDMOD => arithmetic::addmod(frame)?,
        MULMOD => arithmetic::mulmod(frame)?,
        EXP => arithmetic::exp(frame, hardfork)?,
        SIGNEXTEND => arithmetic::signextend(frame)?,

        LT => comparison::lt(frame)?,
        GT => comparison::gt(frame)?,
        SLT => comparison::slt(frame)?,
        SGT => comparison::sgt(frame)?,
        EQ => comparison::eq(frame)?,
        ISZERO => comparison::iszero(frame)?,
        AND => bitwise::and(frame)?,
        OR => bitwise::or(frame)?,
        XOR => bitwise::xor(frame)?,
        NOT => bitwise::not(frame)?,
        BYTE => bitwise::byte(frame)?,
        SHL => bitwise::shl(frame)?,
        SHR => bitwise::shr(frame)?,
        SAR => bitwise::sar(frame)?,

        SHA3 => system::keccak256_op(frame)?,

        ADDRESS => environment::address(frame)?,
        BALANCE => environment::balance(frame, host)?,
        ORIGIN => environment::origin(frame, host)?,
        CALLER => environment::caller(frame)?,
        CALLVALUE => environment::callvalue(frame)?,
        CALLDATALOAD => environment::calldataload(frame)?,
        CALLDATASIZE => environment::calldatasize(frame)?,
        CALLDATACOPY => environment::calldatacopy(frame)?,
        CODESIZE => environment::codesize(frame)?,
        CODECOPY => environment::codecopy(frame)?,
        GASPRICE => environment::gasprice(frame, host)?,
        EXTCODESIZE => environment::extcodesize(frame, host)?,
        EXTCODECOPY => environment::extcodecopy(frame, host)?,
        RETURNDATASIZE => environment::returndatasize(frame)?,
        RETURNDATACOPY => environment::returndatacopy(frame)?,
        EXTCODEHASH => environment::extcodehash(frame, host)?,
        BLOCKHASH => environment::blockhash(frame, host)?,
        COINBASE => environment::coinbase(frame, host)?,
        TIMESTAMP => environment::timestamp(frame, host)?,
        NUMBER => environment::number(frame, host)?,
        DIFFICULTY => environment::difficulty(frame, host)?,
        GASLIMIT => environment::gaslimit(frame, host)?,
        CHAINID => environment::chainid(frame, host)?,
        SELFBALANCE => environment::selfbalance(frame, host)?,
        BASEFEE => environment::basefee(frame, host)?,
        BLOBHASH => environment::blobhash(frame, host)?,
        BLOBBASEFEE => environment::blobbasefee(frame, host)?,

        POP => stack_ops::pop(frame)?,
        MLOAD => memory_ops::mload(frame)?,
        MSTORE => memory_ops::mstore(frame)?,
        MSTORE8 => memory_ops::mstore8(frame)?,
        SLOAD => storage::sload(frame, host)?,
        SSTORE => storage::sstore(frame, host)?,
        PC => stack_ops::pc(frame)?,
        MSIZE => stack_ops::msize(frame)?,
        GAS => stack_ops::gas(frame)?,
        JUMPDEST => stack_ops::jumpdest(frame)?,
        TLOAD => storage::tload(frame, host)?,
        TSTORE => storage::tstore(frame, host)?,
        MCOPY => memory_ops::mcopy(frame)?,

        CREATE => system::create(frame, host, hardfork)?,
        CALL => system::call(frame, host, CallKind::Call)?,
        CALLCODE => system::call(frame, host, CallKind::CallCode)?,
        DELEGATECALL => system::call(frame, host, CallKind::DelegateCall)?,
        CREATE2 => system::create2(frame, host, hardfork)?,
        STATICCALL => system::call(frame, host, CallKind::StaticCall)?,

        op if opcode::is_push(op) => stack_ops::push(frame, frame.plan.resolve(instr.operand))?,
        op if opcode::is_dup(op) => stack_ops::dup(frame, (op - DUP1 + 1) as usize)?,
        op if opcode::is_swap(op) => stack_ops::swap(frame, (op - SWAP1 + 1) as usize)?,
        op if opcode::is_log(op) => system::log(frame, host, opcode::log_topic_count(op))?,

        other => return Err(FailureKind::InvalidOpcode { opcode: other }),
    }

    Ok(Step::Continue)
}

/// Dispatches one of the synthetic `PUSH+consumer` fusion opcodes (§3
/// "Fusion opcodes"). `literal` is the fused `PUSH`'s operand; every other
/// operand still comes off the real stack. Returns `Some(target)` for a
/// taken jump, `None` otherwise.
fn dispatch_fused(frame: &mut Frame, op: u8, literal: Word) -> Result<Option<u32>, FailureKind> {
    use fusion::*;

    match op {
        PUSH_ADD => {
            let b = frame.stack.pop()?;
            frame.stack.push(literal.wrapping_add(b))?;
        }
        PUSH_SUB => {
            let b = frame.stack.pop()?;
            frame.stack.push(literal.wrapping_sub(b))?;
        }
        PUSH_MUL => {
            let b = frame.stack.pop()?;
            frame.stack.push(literal.wrapping_mul(b))?;
        }
        PUSH_DIV => {
            let b = frame.stack.pop()?;
            frame.stack.push(if b.is_zero() { Word::ZERO } else { literal / b })?;
        }
        PUSH_AND => {
            let b = frame.stack.pop()?;
            frame.stack.push(literal & b)?;
        }
        PUSH_OR => {
            let b = frame.stack.pop()?;
            frame.stack.push(literal | b)?;
        }
        PUSH_XOR => {
            let b = frame.stack.pop()?;
            frame.stack.push(literal ^ b)?;
        }
        PUSH_JUMP => return Ok(Some(control::resolve(frame, literal)?)),
        PUSH_JUMPI => {
            let cond = frame.stack.pop()?;
            if word_to_bool(cond) {
                return Ok(Some(control::resolve(frame, literal)?));
            }
        }
        PUSH_MLOAD => {
            let offset = memory_ops::word_to_offset(literal)?;
            let cost = frame.memory.expansion_gas(offset, 32)?;
            frame.gas.charge(cost)?;
            let value = frame.memory.load_word(offset);
            frame.stack.push(value)?;
        }
        PUSH_MSTORE => {
            let value = frame.stack.pop()?;
            let offset = memory_ops::word_to_offset(literal)?;
            let cost = frame.memory.expansion_gas(offset, 32)?;
            frame.gas.charge(cost)?;
            frame.memory.store_word(offset, value);
        }
        PUSH_MSTORE8 => {
            let value = frame.stack.pop()?;
            let offset = memory_ops::word_to_offset(literal)?;
            let cost = frame.memory.expansion_gas(offset, 1)?;
            frame.gas.charge(cost)?;
            frame.memory.store_byte(offset, value.as_limbs()[0] as u8);
        }
        other => crate::error::fatal(&format!("dispatch_fused: unhandled fusion opcode 0x{other:02x}")),
    }
    Ok(None)
}
