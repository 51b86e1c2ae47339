//! `AND`/`OR`/`XOR`/`NOT`/`BYTE`/`SHL`/`SHR`/`SAR` (§4 "Word & arithmetic
//! kernel").

use crate::{error::FailureKind, frame::Frame, types::Word, word};

pub fn and(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(a & b)
}

pub fn or(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(a | b)
}

pub fn xor(frame: &mut Frame) -> Result<(), FailureKind> {
    let (a, b) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(a ^ b)
}

pub fn not(frame: &mut Frame) -> Result<(), FailureKind> {
    let a = frame.stack.pop()?;
    frame.stack.push(!a)
}

pub fn byte(frame: &mut Frame) -> Result<(), FailureKind> {
    let (i, value) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(word::byte(i, value))
}

pub fn shl(frame: &mut Frame) -> Result<(), FailureKind> {
    let (shift, value) = (frame.stack.pop()?, frame.stack.pop()?);
    let result = if shift >= Word::from(256u64) {
        Word::ZERO
    } else {
        value.wrapping_shl(shift.as_limbs()[0] as usize)
    };
    frame.stack.push(result)
}

pub fn shr(frame: &mut Frame) -> Result<(), FailureKind> {
    let (shift, value) = (frame.stack.pop()?, frame.stack.pop()?);
    let result = if shift >= Word::from(256u64) {
        Word::ZERO
    } else {
        value.wrapping_shr(shift.as_limbs()[0] as usize)
    };
    frame.stack.push(result)
}

pub fn sar(frame: &mut Frame) -> Result<(), FailureKind> {
    let (shift, value) = (frame.stack.pop()?, frame.stack.pop()?);
    frame.stack.push(word::sar(shift, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardfork::Hardfork;

    fn frame_with(vals: &[u64]) -> Frame {
        let plan = crate::plan::Plan::build(&[], Hardfork::Cancun, 24576).unwrap();
        let mut frame = Frame::new(
            std::sync::Arc::new(plan),
            1_000_000,
            1024,
            Default::default(),
            Default::default(),
            Word::ZERO,
            Default::default(),
            false,
            0,
            49152,
        );
        for v in vals {
            frame.stack.push(Word::from(*v)).unwrap();
        }
        frame
    }

    #[test]
    fn shl_shifts_left() {
        let mut frame = frame_with(&[1, 4]);
        shl(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(16u64));
    }

    #[test]
    fn shift_of_256_or_more_is_zero() {
        let mut frame = frame_with(&[1, 256]);
        shr(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::ZERO);
    }

    #[test]
    fn not_is_bitwise_complement() {
        let mut frame = frame_with(&[0]);
        not(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::MAX);
    }
}
