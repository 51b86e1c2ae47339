//! Gas meter and dynamic gas-cost functions (§3 "Gas meter", §4.5-§4.7).

use alloy_primitives::U256;

use crate::{constants, error::FailureKind, hardfork::Hardfork};

/// Signed remaining-gas counter for one frame.
///
/// Charging never lets the counter go negative — a charge that would
/// requires more than what remains fails fast with
/// [`FailureKind::OutOfGas`] and leaves the meter untouched, matching
/// "going negative = OutOfGas (terminal)" (§3).
#[derive(Debug, Clone, Copy)]
pub struct GasMeter {
    remaining: u64,
    refund: u64,
}

impl GasMeter {
    /// Creates a meter with the given initial budget.
    pub const fn new(initial: u64) -> Self {
        Self { remaining: initial, refund: 0 }
    }

    /// Gas left.
    #[inline]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Accumulated refund (SSTORE clears, EIP-2200/3529).
    #[inline]
    pub const fn refund(&self) -> u64 {
        self.refund
    }

    /// Deducts `amount`, failing without mutating state if insufficient.
    #[inline]
    pub fn charge(&mut self, amount: u64) -> Result<(), FailureKind> {
        match self.remaining.checked_sub(amount) {
            Some(left) => {
                self.remaining = left;
                Ok(())
            }
            None => Err(FailureKind::OutOfGas),
        }
    }

    /// Deducts `amount` without checking; caller must have proven
    /// sufficient gas via the enclosing block's pre-charge (§4.5).
    #[inline]
    pub fn charge_unchecked(&mut self, amount: u64) {
        debug_assert!(self.remaining >= amount);
        self.remaining = self.remaining.saturating_sub(amount);
    }

    /// Adds to the accumulated refund counter.
    #[inline]
    pub fn add_refund(&mut self, amount: u64) {
        self.refund += amount;
    }

    /// Removes from the accumulated refund counter (a slot un-clearing
    /// itself within the same transaction, EIP-2200's "undo" case).
    #[inline]
    pub fn sub_refund(&mut self, amount: u64) {
        self.refund = self.refund.saturating_sub(amount);
    }

    /// Returns unused gas to the meter, e.g. a sub-call's leftover gas.
    #[inline]
    pub fn refund_gas(&mut self, amount: u64) {
        self.remaining += amount;
    }
}

/// EIP-2929 access-list warm/cold gas, given whether the access was cold.
#[inline]
pub const fn access_cost(cold: bool, cold_cost: u64) -> u64 {
    if cold {
        cold_cost
    } else {
        constants::access_list::WARM_STORAGE_READ
    }
}

/// Cold/warm cost of touching an address (`BALANCE`, `EXTCODE*`, `CALL`
/// family, §6.1 `access_address`).
#[inline]
pub const fn address_access_cost(cold: bool) -> u64 {
    access_cost(cold, constants::access_list::COLD_ACCOUNT_ACCESS)
}

/// Cold/warm cost of touching a storage slot (`SLOAD`, §6.1
/// `access_storage_slot`).
#[inline]
pub const fn storage_access_cost(cold: bool) -> u64 {
    access_cost(cold, constants::access_list::COLD_SLOAD)
}

/// `SHA3`/`KECCAK256` cost: `30 + 6 * ceil(length/32)` (§4.4 "Keccak").
#[inline]
pub fn keccak256_cost(length: u64) -> u64 {
    constants::static_gas::KECCAK256 + constants::static_gas::KECCAK256_WORD * length.div_ceil(32)
}

/// `LOG0..LOG4` cost: `375 + 375*topics + 8*length` (§4.4 "Logs").
#[inline]
pub fn log_cost(topics: u8, length: u64) -> u64 {
    constants::static_gas::LOG
        + constants::static_gas::LOG_TOPIC * topics as u64
        + constants::static_gas::LOG_DATA * length
}

/// Per-word copy surcharge shared by `CODECOPY`/`CALLDATACOPY`/
/// `EXTCODECOPY`/`RETURNDATACOPY`/`MCOPY`.
#[inline]
pub fn copy_word_cost(length: u64) -> u64 {
    constants::static_gas::COPY_WORD * length.div_ceil(32)
}

/// `EXP` exponent cost: base 10 plus a per-byte surcharge on the exponent's
/// minimal big-endian byte length, 10/byte pre-Spurious-Dragon and 50/byte
/// from Spurious Dragon onward (§4.4).
pub fn exp_cost(exponent: U256, hardfork: Hardfork) -> u64 {
    let byte_len = (256 - exponent.leading_zeros() as u64).div_ceil(8);
    let per_byte = if hardfork.enables(Hardfork::SpuriousDragon) {
        constants::static_gas::EXP_BYTE
    } else {
        constants::static_gas::EXP_BYTE_FRONTIER
    };
    constants::static_gas::EXP + per_byte * byte_len
}

/// EIP-3860 initcode metering: `2` gas per 32-byte word of initcode,
/// charged in addition to the base `CREATE`/`CREATE2` cost, active from
/// Shanghai onward.
#[inline]
pub fn initcode_word_cost(initcode_len: usize, hardfork: Hardfork) -> u64 {
    if hardfork.enables(Hardfork::Shanghai) {
        constants::limits::INITCODE_WORD_GAS * (initcode_len as u64).div_ceil(32)
    } else {
        0
    }
}

/// The SSTORE gas charge and refund delta for one store, given the slot's
/// `original` (transaction-start), `current` (pre-store), and `new` values
/// (§4.7, EIP-2200 as amended by EIP-3529). `access_cost` is the caller's
/// already-computed EIP-2929 warm/cold component, folded into the returned
/// total so callers charge a single number.
pub fn sstore_cost(original: U256, current: U256, new: U256, access_cost: u64) -> (u64, i64) {
    if current == new {
        return (access_cost + constants::sstore::SLOAD_GAS, 0);
    }
    if original == current {
        return if original.is_zero() {
            (access_cost + constants::sstore::SET_GAS, 0)
        } else {
            let mut refund: i64 = 0;
            if new.is_zero() {
                refund += constants::sstore::CLEARS_REFUND as i64;
            }
            (access_cost + constants::sstore::RESET_GAS, refund)
        };
    }
    // original != current: slot was already dirtied earlier this transaction.
    let mut refund: i64 = 0;
    if !original.is_zero() {
        if current.is_zero() {
            refund -= constants::sstore::CLEARS_REFUND as i64;
        }
        if new.is_zero() {
            refund += constants::sstore::CLEARS_REFUND as i64;
        }
    }
    if original == new {
        let reimburse = if original.is_zero() {
            constants::sstore::SET_GAS - constants::sstore::SLOAD_GAS
        } else {
            constants::sstore::RESET_GAS - constants::sstore::SLOAD_GAS
        };
        refund += reimburse as i64;
    }
    (access_cost + constants::sstore::SLOAD_GAS, refund)
}

/// Gas forwarded to a sub-call under the 63/64 rule (§4.4 "Sub-calls").
///
/// Does not include the call stipend: the stipend is a free top-up funded
/// out of the value-transfer cost already charged to the caller, not
/// something the caller pays for again here. Callers that transfer value
/// add [`constants::static_gas::CALL_STIPEND`] to this result only when
/// building the gas handed to the callee, never to the amount charged to
/// their own gas meter.
pub fn call_gas_forwarded(requested: u64, available: u64) -> u64 {
    let cap = available - available / 64;
    requested.min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_fails_without_mutating_on_insufficient_gas() {
        let mut meter = GasMeter::new(10);
        assert_eq!(meter.charge(20), Err(FailureKind::OutOfGas));
        assert_eq!(meter.remaining(), 10);
        meter.charge(10).unwrap();
        assert_eq!(meter.remaining(), 0);
    }

    #[test]
    fn exp_cost_zero_exponent_is_base_only() {
        assert_eq!(exp_cost(U256::ZERO, Hardfork::Cancun), constants::static_gas::EXP);
    }

    #[test]
    fn exp_cost_scales_with_byte_length() {
        let cost = exp_cost(U256::from(256u64), Hardfork::Cancun);
        assert_eq!(cost, constants::static_gas::EXP + constants::static_gas::EXP_BYTE * 2);
    }

    #[test]
    fn sstore_noop_is_cheap() {
        let (gas, refund) = sstore_cost(U256::ZERO, U256::from(5u64), U256::from(5u64), 100);
        assert_eq!(gas, 100 + constants::sstore::SLOAD_GAS);
        assert_eq!(refund, 0);
    }

    #[test]
    fn sstore_clearing_nonzero_original_refunds() {
        let (_, refund) = sstore_cost(U256::from(5u64), U256::from(5u64), U256::ZERO, 100);
        assert_eq!(refund, constants::sstore::CLEARS_REFUND as i64);
    }

    #[test]
    fn call_gas_forwarding_respects_63_64_rule() {
        let forwarded = call_gas_forwarded(u64::MAX, 6400);
        assert_eq!(forwarded, 6400 - 6400 / 64);
    }

    #[test]
    fn call_gas_forwarding_never_includes_the_stipend() {
        let forwarded = call_gas_forwarded(100, 6400);
        assert_eq!(forwarded, 100);
    }
}
