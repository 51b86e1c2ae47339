//! Named sets of consensus rules that gate opcode availability and gas costs.

use core::fmt;

/// A named Ethereum hardfork, ordered chronologically.
///
/// Gating throughout the interpreter reads as `hardfork >= Hardfork::London`,
/// which is why this type derives `PartialOrd`/`Ord` over its declaration
/// order rather than switching on string names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub enum Hardfork {
    /// Frontier genesis rules.
    Frontier,
    /// Homestead (`DELEGATECALL`).
    Homestead,
    /// Tangerine Whistle (EIP-150 gas repricing).
    Tangerine,
    /// Spurious Dragon.
    SpuriousDragon,
    /// Byzantium (`REVERT`, `STATICCALL`, `RETURNDATA*`).
    Byzantium,
    /// Constantinople (`CREATE2`, `SHL`/`SHR`/`SAR`, `EXTCODEHASH`).
    Constantinople,
    /// Petersburg.
    Petersburg,
    /// Istanbul (`CHAINID`, `SELFBALANCE`, EIP-1884 repricing).
    Istanbul,
    /// Berlin (EIP-2929 access lists, EIP-2930).
    Berlin,
    /// London (EIP-1559, EIP-3529 refund cuts).
    London,
    /// Paris / The Merge (`PREVRANDAO` replaces `DIFFICULTY`).
    Paris,
    /// Shanghai (`PUSH0`, EIP-3860 initcode metering).
    Shanghai,
    /// Cancun (`TLOAD`/`TSTORE`, `MCOPY`, `BLOBHASH`, `BLOBBASEFEE`, EIP-6780).
    Cancun,
}

impl Hardfork {
    /// The latest hardfork this engine understands.
    pub const LATEST: Self = Self::Cancun;

    /// Returns `true` if `self` enables everything `other` does.
    #[inline]
    pub const fn enables(self, other: Self) -> bool {
        self as u8 >= other as u8
    }
}

impl Default for Hardfork {
    /// Defaults to the latest known hardfork: new deployments should run
    /// current rules unless told otherwise.
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for Hardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Frontier => "Frontier",
            Self::Homestead => "Homestead",
            Self::Tangerine => "Tangerine Whistle",
            Self::SpuriousDragon => "Spurious Dragon",
            Self::Byzantium => "Byzantium",
            Self::Constantinople => "Constantinople",
            Self::Petersburg => "Petersburg",
            Self::Istanbul => "Istanbul",
            Self::Berlin => "Berlin",
            Self::London => "London",
            Self::Paris => "Paris",
            Self::Shanghai => "Shanghai",
            Self::Cancun => "Cancun",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_chronological() {
        assert!(Hardfork::Cancun > Hardfork::Shanghai);
        assert!(Hardfork::Shanghai.enables(Hardfork::London));
        assert!(!Hardfork::Berlin.enables(Hardfork::London));
    }

    #[test]
    fn default_is_latest() {
        assert_eq!(Hardfork::default(), Hardfork::LATEST);
    }
}
