//! Environment and block-info opcodes (§ SUPPLEMENTED FEATURES).

use alloy_primitives::{Address, B256};

use crate::{error::FailureKind, frame::Frame, gas, host::Host, interpreter::memory_ops::word_to_offset, types::Word};

pub(crate) fn address_to_word(address: Address) -> Word {
    Word::from_be_slice(address.into_word().as_slice())
}

pub fn address(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.push(address_to_word(frame.address))
}

pub fn balance(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    let addr_word = frame.stack.pop()?;
    let addr = word_to_address(addr_word);
    let cold = host.access_address(addr);
    frame.gas.charge(gas::address_access_cost(cold))?;
    frame.stack.push(host.balance(addr))
}

pub fn origin(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(address_to_word(host.tx_context().origin))
}

pub fn caller(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.push(address_to_word(frame.caller))
}

pub fn callvalue(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.push(frame.value)
}

pub fn calldataload(frame: &mut Frame) -> Result<(), FailureKind> {
    let offset = frame.stack.pop()?;
    let offset = word_to_offset(offset).unwrap_or(u64::MAX) as usize;
    let mut bytes = [0u8; 32];
    if offset < frame.input.len() {
        let end = (offset + 32).min(frame.input.len());
        bytes[..end - offset].copy_from_slice(&frame.input[offset..end]);
    }
    frame.stack.push(Word::from_be_bytes(bytes))
}

pub fn calldatasize(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(frame.input.len() as u64))
}

pub fn calldatacopy(frame: &mut Frame) -> Result<(), FailureKind> {
    let (dest, offset, length) = (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);
    copy_into_memory(frame, dest, offset, length, |f, off, len| {
        slice_with_zero_pad(&f.input, off, len)
    })
}

pub fn codesize(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(frame.plan.code.len() as u64))
}

pub fn codecopy(frame: &mut Frame) -> Result<(), FailureKind> {
    let (dest, offset, length) = (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);
    copy_into_memory(frame, dest, offset, length, |f, off, len| {
        slice_with_zero_pad(&f.plan.code, off, len)
    })
}

pub fn gasprice(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(host.tx_context().gas_price)
}

pub fn extcodesize(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    let addr = word_to_address(frame.stack.pop()?);
    let cold = host.access_address(addr);
    frame.gas.charge(gas::address_access_cost(cold))?;
    frame.stack.push(Word::from(host.code_size(addr) as u64))
}

pub fn extcodecopy(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    let addr = word_to_address(frame.stack.pop()?);
    let (dest, offset, length) = (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);
    let cold = host.access_address(addr);
    frame.gas.charge(gas::address_access_cost(cold))?;
    let code = host.code(addr);
    copy_into_memory(frame, dest, offset, length, move |_, off, len| slice_with_zero_pad(&code, off, len))
}

pub fn extcodehash(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    let addr = word_to_address(frame.stack.pop()?);
    let cold = host.access_address(addr);
    frame.gas.charge(gas::address_access_cost(cold))?;
    if !host.account_exists(addr) {
        frame.stack.push(Word::ZERO)
    } else {
        frame.stack.push(host.code_hash(addr))
    }
}

pub fn returndatasize(frame: &mut Frame) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(frame.return_data.len() as u64))
}

pub fn returndatacopy(frame: &mut Frame) -> Result<(), FailureKind> {
    let (dest, offset, length) = (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);
    let off = word_to_offset(offset)?;
    let len = word_to_offset(length)?;
    if off.saturating_add(len) > frame.return_data.len() as u64 {
        return Err(FailureKind::OutOfMemory);
    }
    copy_into_memory(frame, dest, offset, length, |f, off, len| {
        slice_with_zero_pad(&f.return_data, off, len)
    })
}

pub fn blockhash(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    let number = frame.stack.pop()?;
    let number = word_to_offset(number).unwrap_or(u64::MAX);
    frame.stack.push(host.block_hash(number))
}

pub fn coinbase(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(address_to_word(host.block_info().coinbase))
}

pub fn timestamp(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(host.block_info().timestamp))
}

pub fn number(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(host.block_info().number))
}

/// `DIFFICULTY` pre-Merge, `PREVRANDAO` from Paris onward — same opcode
/// byte, same host field, different name only.
pub fn difficulty(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(host.block_info().prev_randao)
}

pub fn gaslimit(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(host.block_info().gas_limit))
}

pub fn chainid(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(Word::from(host.block_info().chain_id))
}

pub fn selfbalance(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(host.balance(frame.address))
}

pub fn basefee(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(host.block_info().base_fee)
}

pub fn blobhash(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    let index = frame.stack.pop()?;
    let ctx = host.tx_context();
    let index = word_to_offset(index).unwrap_or(u64::MAX) as usize;
    frame.stack.push(ctx.blob_hashes.get(index).copied().unwrap_or(Word::ZERO))
}

pub fn blobbasefee(frame: &mut Frame, host: &dyn Host) -> Result<(), FailureKind> {
    frame.stack.push(host.block_info().blob_base_fee)
}

pub(crate) fn word_to_address(word: Word) -> Address {
    Address::from_word(B256::from(word.to_be_bytes::<32>()))
}

fn slice_with_zero_pad(source: &[u8], offset: u64, length: u64) -> Vec<u8> {
    let offset = offset as usize;
    let length = length as usize;
    let mut out = vec![0u8; length];
    if offset < source.len() {
        let end = (offset + length).min(source.len());
        out[..end - offset].copy_from_slice(&source[offset..end]);
    }
    out
}

fn copy_into_memory(
    frame: &mut Frame,
    dest: Word,
    offset: Word,
    length: Word,
    read: impl FnOnce(&Frame, u64, u64) -> Vec<u8>,
) -> Result<(), FailureKind> {
    let dest = word_to_offset(dest)?;
    let off = word_to_offset(offset).unwrap_or(u64::MAX);
    let length = word_to_offset(length)?;
    if length == 0 {
        return Ok(());
    }
    let cost = frame.memory.expansion_gas(dest, length)?;
    frame.gas.charge(cost)?;
    frame.gas.charge(gas::copy_word_cost(length))?;
    let data = read(frame, off, length);
    frame.memory.store_range(dest, length, &data);
    Ok(())
}
