//! Error taxonomy (§7): terminal execution failures and plan-build failures.
//!
//! These are two distinct enums on purpose. [`FailureKind`] is a runtime
//! execution outcome the engine reports to its caller through
//! [`crate::outcome::Outcome::Halt`]; [`PlanError`] is a structural failure
//! while building a [`crate::plan::Plan`] from bytecode, which the caller of
//! `Plan::build` must handle with ordinary `Result` propagation.

use thiserror::Error;

/// Terminal failure reasons a dispatch handler can report (§7 taxonomy).
///
/// Every variant here consumes the frame's remaining gas when translated to
/// an `Outcome::Halt`, matching §7's "All Fail outcomes consume the frame's
/// remaining gas". `Revert` is deliberately not a member of this enum — it
/// is a first-class [`crate::outcome::Outcome`] variant, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FailureKind {
    /// Gas meter went negative.
    #[error("out of gas")]
    OutOfGas,
    /// Popped more values than the stack holds.
    #[error("stack underflow: wanted {wanted}, have {have}")]
    StackUnderflow {
        /// Stack items the opcode needed.
        wanted: u16,
        /// Stack items actually present.
        have: u16,
    },
    /// Pushed past the configured stack capacity.
    #[error("stack overflow: capacity {capacity}")]
    StackOverflow {
        /// Configured stack capacity.
        capacity: u16,
    },
    /// `JUMP`/`JUMPI` target is not a valid `JUMPDEST`.
    #[error("invalid jump destination")]
    InvalidJump,
    /// Opcode byte is undefined, or gated by a hardfork not yet active.
    #[error("invalid opcode 0x{opcode:02x}")]
    InvalidOpcode {
        /// The offending opcode byte.
        opcode: u8,
    },
    /// A state-modifying opcode ran inside a `STATICCALL` chain.
    #[error("write protection: state-modifying opcode in a static call")]
    WriteProtection,
    /// Memory offset/length would exceed implementation bounds.
    #[error("out of memory bounds")]
    OutOfMemory,
    /// Sub-call/create nesting reached the 1024 depth limit.
    #[error("call depth exceeded")]
    CallDepthExceeded,
    /// Runtime bytecode exceeds the configured size cap (EIP-170).
    #[error("bytecode too large")]
    BytecodeTooLarge,
    /// Initcode exceeds the configured size cap (EIP-3860).
    #[error("initcode too large")]
    InitcodeTooLarge,
}

impl FailureKind {
    /// `true` for failures that consume all remaining gas (every variant:
    /// §7 draws no distinction among `Fail` kinds on this point).
    #[inline]
    pub const fn consumes_all_gas(self) -> bool {
        true
    }
}

/// Failures that can occur while building a [`crate::plan::Plan`] from
/// bytecode (§4.2 "Failure modes"). Distinct from [`FailureKind`]: these are
/// input/programmer errors surfaced before any gas is spent, not execution
/// outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PlanError {
    /// Bytecode length exceeds the configured maximum.
    #[error("bytecode length {len} exceeds configured maximum {max}")]
    BytecodeTooLarge {
        /// Actual bytecode length.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Logs an implementation-fault condition at `error!` and panics.
///
/// §7 lists `MissingJumpDestMetadata` and `PlanCacheCorruption` as faults
/// that "must not occur in a correct build" and are "treated as panics" —
/// they are never constructed as a `Result::Err` a caller could recover
/// from. This is the single call site that turns one into a panic, so every
/// occurrence is logged identically.
#[cold]
#[track_caller]
pub fn fatal(reason: &str) -> ! {
    tracing::error!(reason, "implementation fault");
    panic!("evmcore implementation fault: {reason}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kind_display_is_human_readable() {
        let err = FailureKind::StackUnderflow { wanted: 2, have: 0 };
        assert_eq!(err.to_string(), "stack underflow: wanted 2, have 0");
    }

    #[test]
    fn plan_error_display() {
        let err = PlanError::BytecodeTooLarge { len: 30000, max: 24576 };
        assert!(err.to_string().contains("30000"));
    }
}
