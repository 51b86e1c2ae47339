//! `SHA3`/`KECCAK256`, `LOG0..LOG4`, `CREATE`/`CREATE2`, and the `CALL`
//! family (§4.4 "Sub-calls", "Creates", "Logs", "Keccak").

use alloy_primitives::{keccak256, Address, Bytes, Log, LogData, B256};

use crate::{
    constants,
    error::FailureKind,
    frame::Frame,
    gas,
    hardfork::Hardfork,
    host::{CallKind, CallParams, CallResult, Host},
    interpreter::{
        environment::{address_to_word, word_to_address},
        memory_ops::word_to_offset,
    },
    types::Word,
};

pub fn keccak256_op(frame: &mut Frame) -> Result<(), FailureKind> {
    let (offset, length) = (frame.stack.pop()?, frame.stack.pop()?);
    let offset = word_to_offset(offset)?;
    let length = word_to_offset(length)?;
    let cost = frame.memory.expansion_gas(offset, length)?;
    frame.gas.charge(cost)?;
    frame.gas.charge(gas::keccak256_cost(length))?;
    let data = frame.memory.load_range(offset, length);
    frame.stack.push(Word::from_be_slice(keccak256(&data).as_slice()))
}

/// Shared body for `LOG0..LOG4`; `topics` is the opcode's fixed topic count.
pub fn log(frame: &mut Frame, host: &mut dyn Host, topics: u8) -> Result<(), FailureKind> {
    if frame.is_static {
        return Err(FailureKind::WriteProtection);
    }
    let (offset, length) = (frame.stack.pop()?, frame.stack.pop()?);
    let offset = word_to_offset(offset)?;
    let length = word_to_offset(length)?;
    let mut topic_words = Vec::with_capacity(topics as usize);
    for _ in 0..topics {
        topic_words.push(frame.stack.pop()?);
    }
    let cost = frame.memory.expansion_gas(offset, length)?;
    frame.gas.charge(cost)?;
    frame.gas.charge(gas::log_cost(topics, length))?;
    let data = frame.memory.load_range(offset, length);
    let topics = topic_words.into_iter().map(|w| B256::from(w.to_be_bytes::<32>())).collect();
    host.emit_log(Log { address: frame.address, data: LogData::new_unchecked(topics, Bytes::from(data)) });
    Ok(())
}

/// `CREATE` (§4.4 "Creates"): deploys `initcode` at the nonce-derived
/// address `keccak256(rlp(sender, nonce))[12:]`.
pub fn create(frame: &mut Frame, host: &mut dyn Host, hardfork: Hardfork) -> Result<(), FailureKind> {
    let (value, offset, length) = (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);
    let nonce = host.nonce(frame.address);
    let address = rlp_create_address(frame.address, nonce);
    create_common(frame, host, hardfork, value, offset, length, Word::ZERO, address, CallKind::Create)
}

/// `CREATE2` (EIP-1014, §4.4 "Creates"): deploys at the salt-derived address
/// `keccak256(0xff ++ sender ++ salt ++ keccak256(initcode))[12:]`.
pub fn create2(frame: &mut Frame, host: &mut dyn Host, hardfork: Hardfork) -> Result<(), FailureKind> {
    let (value, offset, length, salt) =
        (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);
    let off = word_to_offset(offset)?;
    let len = word_to_offset(length)?;
    let initcode = frame.memory.load_range(off, len);
    let address = create2_address(frame.address, salt, &initcode);
    create_common(frame, host, hardfork, value, offset, length, salt, address, CallKind::Create2)
}

#[allow(clippy::too_many_arguments)]
fn create_common(
    frame: &mut Frame,
    host: &mut dyn Host,
    hardfork: Hardfork,
    value: Word,
    offset: Word,
    length: Word,
    salt: Word,
    new_address: Address,
    kind: CallKind,
) -> Result<(), FailureKind> {
    if frame.is_static {
        return Err(FailureKind::WriteProtection);
    }
    let offset = word_to_offset(offset)?;
    let length = word_to_offset(length)?;
    let cost = frame.memory.expansion_gas(offset, length)?;
    frame.gas.charge(cost)?;

    if hardfork.enables(Hardfork::Shanghai) && length as usize > frame.max_initcode_size {
        frame.stack.push(Word::ZERO)?;
        return Ok(());
    }
    frame.gas.charge(constants::static_gas::CREATE)?;
    frame.gas.charge(gas::initcode_word_cost(length as usize, hardfork))?;

    if frame.depth + 1 >= constants::limits::MAX_CALL_DEPTH {
        frame.stack.push(Word::ZERO)?;
        return Ok(());
    }
    if host.balance(frame.address) < value {
        frame.stack.push(Word::ZERO)?;
        return Ok(());
    }

    let initcode = frame.memory.load_range(offset, length);
    let forwarded = gas::call_gas_forwarded(frame.gas.remaining(), frame.gas.remaining());
    frame.gas.charge_unchecked(forwarded);

    let result = host.inner_call(CallParams {
        kind,
        caller: frame.address,
        callee: new_address,
        value,
        input: Bytes::from(initcode),
        gas: forwarded,
        salt,
        is_static: false,
    });
    apply_call_result(frame, &result);
    if result.success {
        frame.stack.push(address_to_word(result.created_address.unwrap_or_default()))
    } else {
        frame.stack.push(Word::ZERO)
    }
}

/// `CALL`/`CALLCODE`/`DELEGATECALL`/`STATICCALL` (§4.4 "Sub-calls"), unified
/// over their shared stack shape (value is absent for the latter two).
pub fn call(frame: &mut Frame, host: &mut dyn Host, kind: CallKind) -> Result<(), FailureKind> {
    let gas_requested = frame.stack.pop()?;
    let callee = word_to_address(frame.stack.pop()?);
    let value = match kind {
        CallKind::Call | CallKind::CallCode => frame.stack.pop()?,
        _ => Word::ZERO,
    };
    let (args_offset, args_length, ret_offset, ret_length) =
        (frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?, frame.stack.pop()?);

    if kind == CallKind::Call && frame.is_static && !value.is_zero() {
        return Err(FailureKind::WriteProtection);
    }

    let args_offset = word_to_offset(args_offset)?;
    let args_length = word_to_offset(args_length)?;
    let ret_offset = word_to_offset(ret_offset)?;
    let ret_length = word_to_offset(ret_length)?;

    let args_cost = frame.memory.expansion_gas(args_offset, args_length)?;
    let ret_cost = frame.memory.expansion_gas(ret_offset, ret_length)?;
    frame.gas.charge(args_cost)?;
    frame.gas.charge(ret_cost)?;

    let value_transfer = matches!(kind, CallKind::Call | CallKind::CallCode) && !value.is_zero();
    let cold = host.access_address(callee);
    let mut base_cost = gas::address_access_cost(cold);
    if value_transfer {
        base_cost += constants::static_gas::CALLVALUE;
    }
    if kind == CallKind::Call && !host.account_exists(callee) && !value.is_zero() {
        base_cost += constants::static_gas::NEWACCOUNT;
    }
    frame.gas.charge(base_cost)?;

    if frame.depth + 1 >= constants::limits::MAX_CALL_DEPTH {
        frame.stack.push(Word::ZERO)?;
        return Ok(());
    }
    if value_transfer && host.balance(frame.address) < value {
        frame.stack.push(Word::ZERO)?;
        return Ok(());
    }

    let requested = word_to_offset(gas_requested).unwrap_or(u64::MAX);
    let forwarded = gas::call_gas_forwarded(requested, frame.gas.remaining());
    frame.gas.charge_unchecked(forwarded.min(frame.gas.remaining()));
    // The stipend is a free top-up funded by the value-transfer cost already
    // charged above; the callee receives it, the caller never pays for it.
    let gas_for_callee = if value_transfer {
        forwarded + constants::static_gas::CALL_STIPEND
    } else {
        forwarded
    };

    let input = frame.memory.load_range(args_offset, args_length);
    let is_static = frame.is_static || kind == CallKind::StaticCall;
    let (caller, effective_value) = match kind {
        CallKind::DelegateCall => (frame.caller, frame.value),
        _ => (frame.address, value),
    };

    let result = host.inner_call(CallParams {
        kind,
        caller,
        callee,
        value: effective_value,
        input: Bytes::from(input),
        gas: gas_for_callee,
        salt: Word::ZERO,
        is_static,
    });

    let output = result.output.clone();
    apply_call_result(frame, &result);
    let copy_len = (ret_length as usize).min(output.len());
    if copy_len > 0 {
        frame.memory.store_range(ret_offset, copy_len as u64, &output[..copy_len]);
    }
    frame.stack.push(if result.success { Word::from(1u64) } else { Word::ZERO })
}

fn apply_call_result(frame: &mut Frame, result: &CallResult) {
    frame.gas.refund_gas(result.gas_left);
    if result.success {
        frame.gas.add_refund(result.gas_refund);
    }
    frame.return_data = result.output.clone();
}

/// `keccak256(rlp([sender, nonce]))[12:]`, hand-rolled for just this
/// 2-element shape rather than pulling in a general RLP encoder.
fn rlp_create_address(sender: Address, nonce: u64) -> Address {
    let mut nonce_bytes = nonce.to_be_bytes().to_vec();
    while nonce_bytes.first() == Some(&0) && nonce_bytes.len() > 1 {
        nonce_bytes.remove(0);
    }
    if nonce == 0 {
        nonce_bytes.clear();
    }
    let nonce_rlp = rlp_encode_bytes(&nonce_bytes);
    let sender_rlp = rlp_encode_bytes(sender.as_slice());
    let mut payload = Vec::with_capacity(sender_rlp.len() + nonce_rlp.len());
    payload.extend_from_slice(&sender_rlp);
    payload.extend_from_slice(&nonce_rlp);
    let list = rlp_encode_list(&payload);
    let hash = keccak256(&list);
    Address::from_slice(&hash[12..])
}

fn rlp_encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < 0x80 {
        return vec![data[0]];
    }
    let mut out = rlp_length_prefix(0x80, data.len());
    out.extend_from_slice(data);
    out
}

fn rlp_encode_list(payload: &[u8]) -> Vec<u8> {
    let mut out = rlp_length_prefix(0xc0, payload.len());
    out.extend_from_slice(payload);
    out
}

fn rlp_length_prefix(base: u8, len: usize) -> Vec<u8> {
    if len < 56 {
        vec![base + len as u8]
    } else {
        let len_bytes = len.to_be_bytes();
        let len_bytes = &len_bytes[len_bytes.iter().position(|&b| b != 0).unwrap_or(7)..];
        let mut out = vec![base + 55 + len_bytes.len() as u8];
        out.extend_from_slice(len_bytes);
        out
    }
}

fn create2_address(sender: Address, salt: Word, initcode: &[u8]) -> Address {
    let initcode_hash = keccak256(initcode);
    let mut preimage = Vec::with_capacity(1 + 20 + 32 + 32);
    preimage.push(0xffu8);
    preimage.extend_from_slice(sender.as_slice());
    preimage.extend_from_slice(&salt.to_be_bytes::<32>());
    preimage.extend_from_slice(initcode_hash.as_slice());
    Address::from_slice(&keccak256(&preimage)[12..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_address_varies_with_nonce() {
        let sender = Address::from([0x11u8; 20]);
        let a = rlp_create_address(sender, 0);
        let b = rlp_create_address(sender, 1);
        let c = rlp_create_address(sender, 128);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn create_address_is_deterministic() {
        let sender = Address::from([0x22u8; 20]);
        assert_eq!(rlp_create_address(sender, 7), rlp_create_address(sender, 7));
    }

    #[test]
    fn create2_address_is_deterministic() {
        let sender = Address::from([1u8; 20]);
        let salt = Word::from(42u64);
        let code = [0x60, 0x00];
        let a = create2_address(sender, salt, &code);
        let b = create2_address(sender, salt, &code);
        assert_eq!(a, b);
    }
}
