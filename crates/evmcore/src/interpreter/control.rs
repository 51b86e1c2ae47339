//! `JUMP`/`JUMPI`, termination opcodes, and `SELFDESTRUCT` (§4.4 "Jumps",
//! "Termination opcodes").

use alloy_primitives::{Address, Bytes, B256};

use crate::{
    error::FailureKind,
    frame::Frame,
    hardfork::Hardfork,
    host::Host,
    interpreter::memory_ops::word_to_offset,
    outcome::Outcome,
    types::{word_to_bool, Word},
};

/// Resolves and returns the instruction index `JUMP` should land on.
pub fn jump_target(frame: &mut Frame) -> Result<u32, FailureKind> {
    let dest = frame.stack.pop()?;
    resolve(frame, dest)
}

/// Resolves `JUMPI`'s target, returning `None` if the condition is zero
/// (fall through to the next instruction as usual).
pub fn jumpi_target(frame: &mut Frame) -> Result<Option<u32>, FailureKind> {
    let (dest, cond) = (frame.stack.pop()?, frame.stack.pop()?);
    if word_to_bool(cond) {
        resolve(frame, dest).map(Some)
    } else {
        Ok(None)
    }
}

/// A pre-fused `PUSH+JUMP`/`PUSH+JUMPI` target taken from the operand slot
/// rather than the stack.
pub fn resolve(frame: &Frame, dest: Word) -> Result<u32, FailureKind> {
    let dest = word_to_offset(dest).map_err(|_| FailureKind::InvalidJump)?;
    frame.plan.resolve_jump_target(dest).ok_or(FailureKind::InvalidJump)
}

pub fn stop(frame: &Frame) -> Outcome {
    Outcome::Success { gas_left: frame.gas.remaining(), gas_refund: frame.gas.refund(), output: Bytes::new() }
}

pub fn ret(frame: &mut Frame) -> Result<Outcome, FailureKind> {
    let (offset, length) = (frame.stack.pop()?, frame.stack.pop()?);
    let offset = word_to_offset(offset)?;
    let length = word_to_offset(length)?;
    let cost = frame.memory.expansion_gas(offset, length)?;
    frame.gas.charge(cost)?;
    let output = frame.memory.load_range(offset, length);
    Ok(Outcome::Success { gas_left: frame.gas.remaining(), gas_refund: frame.gas.refund(), output })
}

pub fn revert(frame: &mut Frame) -> Result<Outcome, FailureKind> {
    let (offset, length) = (frame.stack.pop()?, frame.stack.pop()?);
    let offset = word_to_offset(offset)?;
    let length = word_to_offset(length)?;
    let cost = frame.memory.expansion_gas(offset, length)?;
    frame.gas.charge(cost)?;
    let output = frame.memory.load_range(offset, length);
    Ok(Outcome::Revert { gas_left: frame.gas.remaining(), output })
}

pub fn invalid() -> Outcome {
    Outcome::Halt { kind: FailureKind::InvalidOpcode { opcode: crate::opcode::INVALID } }
}

pub fn undefined(opcode: u8) -> Outcome {
    Outcome::Halt { kind: FailureKind::InvalidOpcode { opcode } }
}

/// `SELFDESTRUCT` (§4.4): under Cancun (EIP-6780) only removes the account
/// if it was created earlier in the same transaction; otherwise it always
/// transfers the balance and marks the account for destruction.
pub fn selfdestruct(
    frame: &mut Frame,
    host: &mut dyn Host,
    hardfork: Hardfork,
) -> Result<Outcome, FailureKind> {
    if frame.is_static {
        return Err(FailureKind::WriteProtection);
    }
    let beneficiary = frame.stack.pop()?;
    let beneficiary = Address::from_word(B256::from(beneficiary.to_be_bytes::<32>()));
    let cold = host.access_address(beneficiary);
    let mut cost = crate::gas::address_access_cost(cold);
    if !hardfork.enables(Hardfork::Tangerine) {
        cost = crate::constants::static_gas::SELFDESTRUCT;
    } else if !host.account_exists(beneficiary) && !host.balance(frame.address).is_zero() {
        cost += crate::constants::static_gas::SELFDESTRUCT_NEWACCOUNT;
    }
    frame.gas.charge(cost)?;

    if !hardfork.enables(Hardfork::Cancun) || host.created_this_transaction(frame.address) {
        host.mark_for_destruction(frame.address, beneficiary);
    } else {
        // Post-Cancun, pre-existing accounts only transfer balance.
        let balance = host.balance(frame.address);
        if !balance.is_zero() {
            host.mark_for_destruction(frame.address, beneficiary);
        }
    }
    Ok(Outcome::Success { gas_left: frame.gas.remaining(), gas_refund: frame.gas.refund(), output: Bytes::new() })
}
