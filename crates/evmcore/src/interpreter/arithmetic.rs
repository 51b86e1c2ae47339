//! `ADD`/`SUB`/`MUL`/`DIV`/`SDIV`/`MOD`/`SMOD`/`ADDMOD`/`MULMOD`/`EXP`/
//! `SIGNEXTEND` (§4 "Word & arithmetic kernel").

use crate::{error::FailureKind, frame::Frame, gas, hardfork::Hardfork, types::Word, word};

pub fn add(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(a.wrapping_add(b))
}

pub fn sub(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(a.wrapping_sub(b))
}

pub fn mul(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(a.wrapping_mul(b))
}

/// Division by zero is zero (§3 "Division and modulo by zero yield zero").
pub fn div(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(if b.is_zero() { Word::ZERO } else { a / b })
}

pub fn sdiv(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(word::sdiv(a, b))
}

pub fn modulo(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(if b.is_zero() { Word::ZERO } else { a % b })
}

pub fn smod(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(word::smod(a, b))
}

/// Full-precision `(a + b) mod n`: computed without first reducing `a + b`
/// modulo 2^256, since that truncation can discard a carry the modulus
/// needs (e.g. `a = b = 2^255`, `n = 3`: the wrapped sum is `0`, but the
/// true sum `2^256` is `1 mod 3`). `Uint::add_mod` does the full-precision
/// computation directly.
pub fn addmod(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b, n) = (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(if n.is_zero() { Word::ZERO } else { a.add_mod(b, n) })
}

/// Full-precision `(a * b) mod n`; see [`addmod`] for why this can't be
/// `a.wrapping_mul(b) % n`.
pub fn mulmod(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b, n) = (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(if n.is_zero() { Word::ZERO } else { a.mul_mod(b, n) })
}

/// `EXP(0, 0) = 1` (§8 boundary behavior); square-and-multiply, wrapping
/// mod 2^256 at each step.
pub fn exp(frame: &mut Frame, hardfork: Hardfork) -> Result<(), FailureKind> {
    let (base, exponent) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.gas.charge(gas::exp_cost(exponent, hardfork))?;
    let mut result = Word::from(1u64);
    let mut base = base;
    let mut exponent = exponent;
    while !exponent.is_zero() {
        if exponent.bit(0) {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exponent >>= 1;
    }
    frame.stack.push(result)
}

pub fn signextend(frame: &mut Frame) -> Result<(), FailureKind> {
    let (byte_index, value) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(word::signextend(byte_index, value))
}
