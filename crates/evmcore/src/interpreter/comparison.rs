//! `LT`/`GT`/`SLT`/`SGT`/`EQ`/`ISZERO` (§4 "Word & arithmetic kernel").

use crate::{error::FailureKind, frame::Frame, types::{bool_to_word, Word}, word};

pub fn lt(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(bool_to_word(a < b))
}

pub fn gt(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(bool_to_word(a > b))
}

/// Signed less-than. When both operands share a sign bit, unsigned
/// ordering already agrees with signed ordering (flipping both words'
/// high bit by the same amount preserves relative order) — only the
/// mixed-sign case needs an explicit branch.
pub fn slt(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(bool_to_word(signed_lt(a, b)))
}

pub fn sgt(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(bool_to_word(signed_lt(b, a)))
}

fn signed_lt(a: Word, b: Word) -> bool {
    match (word::is_negative(a), word::is_negative(b)) {
        (true, false) => true,
        (false, true) => false,
        _ => a < b,
    }
}

pub fn eq(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(bool_to_word(a == b))
}

pub fn iszero(frame: &mut Frame) -> Result<(), FailureKind> {
    let a = frame.stack.pop()?;
    frame.stack.push(bool_to_word(a.is_zero()))
}
