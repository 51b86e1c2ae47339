//! `POP`, `PUSH0..PUSH32`, `DUP1..DUP16`, `SWAP1..SWAP16`, `PC`, `MSIZE`,
//! `GAS`, `JUMPDEST` (§ SUPPLEMENTED FEATURES "Stack manipulation opcodes").

use crate::{error::FailureKind, frame::Frame, types::Word};

pub fn pop(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.pop()?;
    Ok(())
}

pub fn push(frame: &mut Frame, literal: Word) -> Result<(), FailureKind> {
    frame.stack.push(literal)
}

pub fn dup(frame: &mut Frame, n: usize) -> Result<(), FailureKind> {
    frame.stack.dup(n)
}

pub fn swap(frame: &mut Frame, n: usize) -> Result<(), FailureKind> {
    frame.stack.swap(n)
}

pub fn pc(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(frame.pc()))
}

pub fn msize(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(frame.memory.size() as u64))
}

pub fn gas(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(frame.gas.remaining()))
}

/// `JUMPDEST` is a pure marker; its gas was already charged by the block
/// preamble that runs on entry to its block (§4.5).
pub fn jumpdest(_frame: &mut Frame) -> Result<(), FailureKind> {
    Ok(())
}
