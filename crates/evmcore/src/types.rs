//! Shared primitive aliases used across the crate.

use alloy_primitives::{Address, B256, U256};

/// A 256-bit EVM stack word. Two's-complement signed interpretation is
/// applied explicitly by the handlers that need it (§4.3 "Word &
/// arithmetic kernel"); the type itself carries no sign.
pub type Word = U256;

/// A 32-byte hash, used for bytecode hashes and storage keys/values.
pub type Hash = B256;

/// A 20-byte account address.
pub type Addr = Address;

/// Converts a `bool` to the canonical EVM boolean word (`0` or `1`).
#[inline]
pub const fn bool_to_word(b: bool) -> Word {
    if b {
        Word::from_limbs([1, 0, 0, 0])
    } else {
        Word::ZERO
    }
}

/// Canonical EVM truthiness: any non-zero word is `true`.
#[inline]
pub fn word_to_bool(w: Word) -> bool {
    !w.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_round_trip() {
        assert!(word_to_bool(bool_to_word(true)));
        assert!(!word_to_bool(bool_to_word(false)));
        assert_eq!(bool_to_word(true), Word::from(1u64));
    }
}
