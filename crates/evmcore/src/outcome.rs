//! The engine's terminal result type (§6.2).

use alloy_primitives::Bytes;

use crate::error::FailureKind;

/// What a call into the engine produced.
///
/// Unlike [`FailureKind`], this is not a `std::error::Error` impl — a
/// revert is a perfectly ordinary, expected result of running a contract,
/// not a library error, so it is kept separate from anything
/// `thiserror`-derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `STOP`/`RETURN`, or falling off the end of the bytecode.
    Success {
        /// Gas remaining after execution.
        gas_left: u64,
        /// Refund accumulated from `SSTORE` clears (EIP-2200/3529), added
        /// to the transaction-level refund by the caller; the core itself
        /// never nets this against `gas_left`.
        gas_refund: u64,
        /// `RETURN`'s memory slice, or empty for `STOP`.
        output: Bytes,
    },
    /// `REVERT`: remaining gas is preserved, output carries the revert data.
    Revert {
        /// Gas remaining after execution.
        gas_left: u64,
        /// `REVERT`'s memory slice.
        output: Bytes,
    },
    /// A terminal failure (§7): all remaining gas is consumed.
    Halt {
        /// Why execution halted.
        kind: FailureKind,
    },
}

impl Outcome {
    /// `true` for `Success`.
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// `true` for `Revert`.
    #[inline]
    pub const fn is_revert(&self) -> bool {
        matches!(self, Self::Revert { .. })
    }

    /// `true` for `Halt`.
    #[inline]
    pub const fn is_halt(&self) -> bool {
        matches!(self, Self::Halt { .. })
    }

    /// Gas remaining; `0` for `Halt` per §6.2.
    #[inline]
    pub const fn gas_left(&self) -> u64 {
        match self {
            Self::Success { gas_left, .. } | Self::Revert { gas_left, .. } => *gas_left,
            Self::Halt { .. } => 0,
        }
    }

    /// The output/return-data bytes, empty for `Halt`.
    pub fn output(&self) -> &Bytes {
        static EMPTY: Bytes = Bytes::new();
        match self {
            Self::Success { output, .. } | Self::Revert { output, .. } => output,
            Self::Halt { .. } => &EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halt_always_reports_zero_gas_left() {
        let outcome = Outcome::Halt { kind: FailureKind::OutOfGas };
        assert_eq!(outcome.gas_left(), 0);
        assert!(outcome.is_halt());
        assert!(outcome.output().is_empty());
    }

    #[test]
    fn success_carries_its_own_gas_and_output() {
        let outcome =
            Outcome::Success { gas_left: 100, gas_refund: 0, output: Bytes::from_static(&[1, 2]) };
        assert!(outcome.is_success());
        assert_eq!(outcome.gas_left(), 100);
        assert_eq!(outcome.output().as_ref(), &[1, 2]);
    }
}
