//! `SLOAD`/`SSTORE`/`TLOAD`/`TSTORE` (§4.7 "Storage Semantics").

use crate::{constants, error::FailureKind, frame::Frame, gas, host::Host};

pub fn sload(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    let slot = frame.stack.pop()?;
    let cold = host.access_storage_slot(frame.address, slot);
    frame.gas.charge(gas::storage_access_cost(cold))?;
    let value = host.get_storage(frame.address, slot);
    frame.stack.push(value)
}

pub fn sstore(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    if frame.is_static {
        return Err(FailureKind::WriteProtection);
    }
    let (slot, new) = (frame.stack.pop()?, frame.stack.pop()?);
    let cold = host.access_storage_slot(frame.address, slot);
    let current = host.get_storage(frame.address, slot);
    let original = host.get_original_storage(frame.address, slot).unwrap_or_else(|| {
        tracing::warn!(address = %frame.address, "host returned no original storage value for a warm slot");
        current
    });
    let access_cost = gas::access_cost(cold, constants::access_list::COLD_SLOAD);
    let (charge, refund_delta) = gas::sstore_cost(original, current, new, access_cost);
    frame.gas.charge(charge)?;
    if refund_delta > 0 {
        frame.gas.add_refund(refund_delta as u64);
    } else if refund_delta < 0 {
        frame.gas.sub_refund((-refund_delta) as u64);
    }
    host.set_storage(frame.address, slot, new);
    Ok(())
}

pub fn tload(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    let slot = frame.stack.pop()?;
    let value = host.get_transient(frame.address, slot);
    frame.stack.push(value)
}

pub fn tstore(frame: &mut Frame, host: &mut dyn Host) -> Result<(), FailureKind> {
    if frame.is_static {
        return Err(FailureKind::WriteProtection);
    }
    let (slot, value) = (frame.stack.pop()?, frame.stack.pop()?);
    host.set_transient(frame.address, slot, value);
    Ok(())
}

