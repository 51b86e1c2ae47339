//! `MLOAD`/`MSTORE`/`MSTORE8`/`MCOPY` (§4.6 "Memory Expansion").

use crate::{error::FailureKind, frame::Frame, types::Word};

fn charge_expansion(frame: &mut Frame, offset: u64, length: u64) -> Result<(), FailureKind> {
    let cost = frame.memory.expansion_gas(offset, length)?;
    frame.gas.charge(cost)
}

pub fn mload(frame: &mut Frame) -> Result<(), FailureKind> {
    let offset = frame.stack.pop()?;
    let offset = word_to_offset(offset)?;
    charge_expansion(frame, offset, 32)?;
    let value = frame.memory.load_word(offset);
    frame.stack.push(value)
}

pub fn mstore(frame: &mut Frame) -> Result<(), FailureKind> {
    let (offset, value) = (frame.stack.pop()?, frame.stack.pop()?);
    let offset = word_to_offset(offset)?;
    charge_expansion(frame, offset, 32)?;
    frame.memory.store_word(offset, value);
    Ok(())
}

pub fn mstore8(frame: &mut Frame) -> Result<(), FailureKind> {
    let (offset, value) = (frame.stack.pop()?, frame.stack.pop()?);
    let offset = word_to_offset(offset)?;
    charge_expansion(frame, offset, 1)?;
    frame.memory.store_byte(offset, value.as_limbs()[0] as u8);
    Ok(())
}

/// `MCOPY` (Cancun, EIP-5656): copies within memory, charging expansion to
/// cover whichever of the source/destination ranges reaches furthest, plus
/// the usual per-word copy surcharge.
pub fn mcopy(frame: &mut Frame) -> Result<(), FailureKind> {
    let (dest, src, length) = (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);
    let dest = word_to_offset(dest)?;
    let src = word_to_offset(src)?;
    let length = word_to_offset(length)?;
    if length == 0 {
        return Ok(());
    }
    charge_expansion(frame, dest.max(src), length)?;
    frame.gas.charge(crate::gas::copy_word_cost(length))?;
    let data = frame.memory.load_range(src, length);
    frame.memory.store_range(dest, length, &data);
    Ok(())
}

/// Converts a stack word to a `u64` memory offset, failing with
/// `OutOfMemory` rather than silently truncating for offsets no real gas
/// budget could ever afford to expand to (§4.6).
pub fn word_to_offset(value: Word) -> Result<u64, FailureKind> {
    if value > Word::from(u64::MAX) {
        Err(FailureKind::OutOfMemory)
    } else {
        Ok(value.as_limbs()[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardfork::Hardfork;

    fn frame_with(vals: &[Word]) -> Frame {
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
            frame.stack.push(*v).unwrap();
        }
        frame
    }

    #[test]
    fn mstore_then_mload_round_trips() {
        // MSTORE pops (offset, value): top=offset, second=value.
        let mut frame = frame_with(&[Word::from(0x42u64), Word::ZERO]);
        mstore(&mut frame).unwrap();
        frame.stack.push(Word::ZERO).unwrap();
        mload(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(0x42u64));
    }

    #[test]
    fn mstore8_writes_low_byte_only() {
        let mut frame = frame_with(&[Word::from(0x1FFu64), Word::ZERO]);
        mstore8(&mut frame).unwrap();
        frame.stack.push(Word::ZERO).unwrap();
        mload(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), Word::from(0xFFu64));
    }
}
