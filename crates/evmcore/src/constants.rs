//! Gas-table and size constants for the engine.
//!
//! Grouped into sub-modules by concern — gas-table section, structural
//! limits — since this engine has one consensus-exact table per hardfork
//! rather than a family of custom chain specs layered on top of it.

/// Flat, unconditioned opcode costs (the "static" part of §4.5's gas
/// pre-charge). Dynamic costs live in [`crate::gas`].
pub mod static_gas {
    /// Cost class: free.
    pub const ZERO: u64 = 0;
    /// Cost class: `JUMPDEST`.
    pub const JUMPDEST: u64 = 1;
    /// Cost class: `ADD`, `SUB`, `NOT`, `LT`, `GT`, ... cheapest ALU ops.
    pub const VERY_LOW: u64 = 3;
    /// Cost class: `MUL`, `DIV`, `SDIV`, `MOD`, `SMOD`, `SIGNEXTEND`, ...
    pub const LOW: u64 = 5;
    /// Cost class: `ADDMOD`, `MULMOD`, `JUMP`, `SLOAD` pre-Berlin base, ...
    pub const MID: u64 = 8;
    /// Cost class: `JUMPI`.
    pub const HIGH: u64 = 10;
    /// Cost class: `EXTCODESIZE` pre-Tangerine.
    pub const EXT: u64 = 20;
    /// Base cost of `BALANCE` pre-Tangerine.
    pub const BALANCE: u64 = 20;
    /// Base cost of `SLOAD` pre-Berlin (post-Tangerine).
    pub const SLOAD: u64 = 50;
    /// Base cost shared by `CALL`/`CALLCODE`/`DELEGATECALL`/`STATICCALL`.
    pub const CALL: u64 = 40;
    /// Gas stipend forwarded to a callee on a non-zero value transfer.
    pub const CALL_STIPEND: u64 = 2300;
    /// Value-transfer surcharge added to `CALL`/`CALLCODE` gas cost.
    pub const CALLVALUE: u64 = 9000;
    /// New-account surcharge added when a call's target does not exist.
    pub const NEWACCOUNT: u64 = 25000;
    /// Base cost of `EXP`.
    pub const EXP: u64 = 10;
    /// Per-byte cost of the exponent in `EXP` pre-Spurious-Dragon.
    pub const EXP_BYTE_FRONTIER: u64 = 10;
    /// Per-byte cost of the exponent in `EXP` from Spurious Dragon onward.
    pub const EXP_BYTE: u64 = 50;
    /// Base cost of `CREATE`/`CREATE2`.
    pub const CREATE: u64 = 32000;
    /// Per-byte cost of deployed code (EIP-170 era `CODEDEPOSIT`).
    pub const CODEDEPOSIT: u64 = 200;
    /// Per-byte cost of `SHA3`/`KECCAK256` input.
    pub const KECCAK256_WORD: u64 = 6;
    /// Base cost of `SHA3`/`KECCAK256`.
    pub const KECCAK256: u64 = 30;
    /// Base cost of `LOG0..LOG4`.
    pub const LOG: u64 = 375;
    /// Per-topic surcharge for `LOG0..LOG4`.
    pub const LOG_TOPIC: u64 = 375;
    /// Per-byte surcharge for `LOG0..LOG4` data.
    pub const LOG_DATA: u64 = 8;
    /// Pre-London `SELFDESTRUCT` refund (EIP-3529 removes this).
    pub const SELFDESTRUCT_REFUND: u64 = 24000;
    /// `SELFDESTRUCT` cost when the beneficiary account must be created.
    pub const SELFDESTRUCT_NEWACCOUNT: u64 = 25000;
    /// Flat `SELFDESTRUCT` cost pre-Tangerine.
    pub const SELFDESTRUCT: u64 = 0;
    /// Flat `SELFDESTRUCT` cost from Tangerine onward.
    pub const SELFDESTRUCT_TANGERINE: u64 = 5000;
    /// Intrinsic per-word copy cost (`CODECOPY`, `CALLDATACOPY`,
    /// `EXTCODECOPY`, `RETURNDATACOPY`, `MCOPY`).
    pub const COPY_WORD: u64 = 3;
}

/// EIP-2929 access-list gas costs.
pub mod access_list {
    /// Cost of touching a cold address for the first time in a transaction.
    pub const COLD_ACCOUNT_ACCESS: u64 = 2600;
    /// Cost of touching a cold storage slot for the first time.
    pub const COLD_SLOAD: u64 = 2100;
    /// Cost of re-touching an already-warm address or slot.
    pub const WARM_STORAGE_READ: u64 = 100;
}

/// EIP-2200 / EIP-3529 `SSTORE` gas-and-refund schedule.
pub mod sstore {
    /// Cost of a no-op `SSTORE` (value unchanged from the warm-cached value).
    pub const SLOAD_GAS: u64 = 100;
    /// Cost of flipping a slot away from its zero original value.
    pub const SET_GAS: u64 = 20000;
    /// Cost of changing a slot whose original value was non-zero.
    pub const RESET_GAS: u64 = 2900;
    /// Refund for clearing a slot back to zero (post-EIP-3529).
    pub const CLEARS_REFUND: u64 = 4800;
}

/// Transient storage (EIP-1153) gas costs.
pub mod transient {
    /// Flat cost of `TLOAD`/`TSTORE` — same as a warm storage read.
    pub const COST: u64 = super::access_list::WARM_STORAGE_READ;
}

/// Structural size limits (§6.4 `EngineConfig` defaults).
pub mod limits {
    /// Default runtime bytecode size cap (EIP-170).
    pub const MAX_BYTECODE_SIZE: usize = 24576;
    /// Default initcode size cap (EIP-3860).
    pub const MAX_INITCODE_SIZE: usize = 49152;
    /// Default stack capacity.
    pub const STACK_CAPACITY: usize = 1024;
    /// Default plan-cache entry capacity.
    pub const CACHE_CAPACITY: usize = 32;
    /// Maximum call/create nesting depth.
    pub const MAX_CALL_DEPTH: u32 = 1024;
    /// EIP-3860 initcode metering: gas charged per 32-byte word of initcode.
    pub const INITCODE_WORD_GAS: u64 = 2;
    /// `BLOCKHASH` only resolves the last 256 block hashes.
    pub const BLOCK_HASH_HISTORY: u64 = 256;
}

/// First opcode byte reserved for synthetic fusion handlers; never part of
/// the consensus 0x00-0xFF space and never persisted or transmitted (§6.3).
pub const FUSION_OPCODE_BASE: u8 = 0xB0;
