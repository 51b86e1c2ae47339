//! The canonical EVM opcode table (§6.3): byte value, mnemonic, static gas,
//! stack in/out arity and the hardfork that enables it.
//!
//! Synthetic fusion opcodes (§3 "Fusion opcodes") live in [`crate::fusion`]
//! and are deliberately absent from this table — they are internal-only and
//! must never be mistaken for part of the consensus 0x00-0xFF space.

use crate::hardfork::Hardfork;

/// Static metadata for one EVM opcode.
///
/// `static_gas` is the portion of the opcode's cost that does not depend on
/// stack contents, memory size, or host state — the contribution this
/// opcode adds to a basic block's pre-charged total (§4.1 Pass 3). Opcodes
/// whose entire cost is state-dependent (`SLOAD`, `SSTORE`, `CALL` family,
/// `CREATE` family, `LOG*`, `SHA3`, `EXP`, the `*COPY` family, memory
/// reads/writes) carry `static_gas = 0` here and charge their full cost
/// inline via [`crate::gas`]; `dynamic` records that fact so the analyzer
/// and any tracer can tell "truly free" apart from "priced elsewhere".
#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    /// Mnemonic, e.g. `"ADD"`.
    pub name: &'static str,
    /// Pre-chargeable static gas contribution.
    pub static_gas: u64,
    /// Number of stack items popped.
    pub stack_in: u8,
    /// Number of stack items pushed.
    pub stack_out: u8,
    /// Hardfork that introduces this opcode.
    pub since: Hardfork,
    /// Whether any part of this opcode's cost is charged dynamically.
    pub dynamic: bool,
    /// Whether this byte is a defined opcode at all.
    pub valid: bool,
}

impl OpInfo {
    const INVALID: Self = Self {
        name: "UNDEFINED",
        static_gas: 0,
        stack_in: 0,
        stack_out: 0,
        since: Hardfork::Frontier,
        dynamic: false,
        valid: false,
    };

    const fn new(
        name: &'static str,
        static_gas: u64,
        stack_in: u8,
        stack_out: u8,
        since: Hardfork,
        dynamic: bool,
    ) -> Self {
        Self { name, static_gas, stack_in, stack_out, since, dynamic, valid: true }
    }

    /// Net stack height change this opcode causes (`stack_out - stack_in`).
    #[inline]
    pub const fn stack_delta(&self) -> i16 {
        self.stack_out as i16 - self.stack_in as i16
    }
}

macro_rules! opcodes {
    ($($byte:literal, $konst:ident, $name:literal, $gas:expr, $in:expr, $out:expr, $since:expr $(, dynamic)? ;)*) => {
        $(
            #[doc = concat!("`", $name, "` opcode byte.")]
            pub const $konst: u8 = $byte;
        )*

        /// Dense lookup table, one [`OpInfo`] per possible opcode byte.
        pub static OPCODE_INFO: [OpInfo; 256] = {
            let mut table = [OpInfo::INVALID; 256];
            $(
                table[$byte as usize] = OpInfo::new($name, $gas, $in, $out, $since, opcodes!(@dyn));
            )*
            table
        };
    };
    (@dyn $($x:tt)*) => { false };
}

// The macro above can't conditionally emit `true` for the `dynamic` marker
// cleanly inside `const`, so dynamic-cost opcodes are listed with
// `static_gas = 0` and flagged by `gas::DYNAMIC_OPCODES` instead (see
// [`crate::gas`] for the canonical "does this opcode have dynamic cost"
// predicate, which matches by opcode byte).
use Hardfork::*;

opcodes! {
    0x00, STOP, "STOP", 0, 0, 0, Frontier;
    0x01, ADD, "ADD", 3, 2, 1, Frontier;
    0x02, MUL, "MUL", 5, 2, 1, Frontier;
    0x03, SUB, "SUB", 3, 2, 1, Frontier;
    0x04, DIV, "DIV", 5, 2, 1, Frontier;
    0x05, SDIV, "SDIV", 5, 2, 1, Frontier;
    0x06, MOD, "MOD", 5, 2, 1, Frontier;
    0x07, SMOD, "SMOD", 5, 2, 1, Frontier;
    0x08, ADDMOD, "ADDMOD", 8, 3, 1, Frontier;
    0x09, MULMOD, "MULMOD", 8, 3, 1, Frontier;
    0x0A, EXP, "EXP", 10, 2, 1, Frontier;
    0x0B, SIGNEXTEND, "SIGNEXTEND", 5, 2, 1, Frontier;

    0x10, LT, "LT", 3, 2, 1, Frontier;
    0x11, GT, "GT", 3, 2, 1, Frontier;
    0x12, SLT, "SLT", 3, 2, 1, Frontier;
    0x13, SGT, "SGT", 3, 2, 1, Frontier;
    0x14, EQ, "EQ", 3, 2, 1, Frontier;
    0x15, ISZERO, "ISZERO", 3, 1, 1, Frontier;
    0x16, AND, "AND", 3, 2, 1, Frontier;
    0x17, OR, "OR", 3, 2, 1, Frontier;
    0x18, XOR, "XOR", 3, 2, 1, Frontier;
    0x19, NOT, "NOT", 3, 1, 1, Frontier;
    0x1A, BYTE, "BYTE", 3, 2, 1, Frontier;
    0x1B, SHL, "SHL", 3, 2, 1, Constantinople;
    0x1C, SHR, "SHR", 3, 2, 1, Constantinople;
    0x1D, SAR, "SAR", 3, 2, 1, Constantinople;

    0x20, SHA3, "SHA3", 0, 2, 1, Frontier;

    0x30, ADDRESS, "ADDRESS", 2, 0, 1, Frontier;
    0x31, BALANCE, "BALANCE", 0, 1, 1, Frontier;
    0x32, ORIGIN, "ORIGIN", 2, 0, 1, Frontier;
    0x33, CALLER, "CALLER", 2, 0, 1, Frontier;
    0x34, CALLVALUE, "CALLVALUE", 2, 0, 1, Frontier;
    0x35, CALLDATALOAD, "CALLDATALOAD", 3, 1, 1, Frontier;
    0x36, CALLDATASIZE, "CALLDATASIZE", 2, 0, 1, Frontier;
    0x37, CALLDATACOPY, "CALLDATACOPY", 0, 3, 0, Frontier;
    0x38, CODESIZE, "CODESIZE", 2, 0, 1, Frontier;
    0x39, CODECOPY, "CODECOPY", 0, 3, 0, Frontier;
    0x3A, GASPRICE, "GASPRICE", 2, 0, 1, Frontier;
    0x3B, EXTCODESIZE, "EXTCODESIZE", 0, 1, 1, Frontier;
    0x3C, EXTCODECOPY, "EXTCODECOPY", 0, 4, 0, Frontier;
    0x3D, RETURNDATASIZE, "RETURNDATASIZE", 2, 0, 1, Byzantium;
    0x3E, RETURNDATACOPY, "RETURNDATACOPY", 0, 3, 0, Byzantium;
    0x3F, EXTCODEHASH, "EXTCODEHASH", 0, 1, 1, Constantinople;
    0x40, BLOCKHASH, "BLOCKHASH", 20, 1, 1, Frontier;
    0x41, COINBASE, "COINBASE", 2, 0, 1, Frontier;
    0x42, TIMESTAMP, "TIMESTAMP", 2, 0, 1, Frontier;
    0x43, NUMBER, "NUMBER", 2, 0, 1, Frontier;
    0x44, DIFFICULTY, "DIFFICULTY", 2, 0, 1, Frontier;
    0x45, GASLIMIT, "GASLIMIT", 2, 0, 1, Frontier;
    0x46, CHAINID, "CHAINID", 2, 0, 1, Istanbul;
    0x47, SELFBALANCE, "SELFBALANCE", 5, 0, 1, Istanbul;
    0x48, BASEFEE, "BASEFEE", 2, 0, 1, London;
    0x49, BLOBHASH, "BLOBHASH", 3, 1, 1, Cancun;
    0x4A, BLOBBASEFEE, "BLOBBASEFEE", 2, 0, 1, Cancun;

    0x50, POP, "POP", 2, 1, 0, Frontier;
    0x51, MLOAD, "MLOAD", 0, 1, 1, Frontier;
    0x52, MSTORE, "MSTORE", 0, 2, 0, Frontier;
    0x53, MSTORE8, "MSTORE8", 0, 2, 0, Frontier;
    0x54, SLOAD, "SLOAD", 0, 1, 1, Frontier;
    0x55, SSTORE, "SSTORE", 0, 2, 0, Frontier;
    0x56, JUMP, "JUMP", 8, 1, 0, Frontier;
    0x57, JUMPI, "JUMPI", 10, 2, 0, Frontier;
    0x58, PC, "PC", 2, 0, 1, Frontier;
    0x59, MSIZE, "MSIZE", 2, 0, 1, Frontier;
    0x5A, GAS, "GAS", 2, 0, 1, Frontier;
    0x5B, JUMPDEST, "JUMPDEST", 1, 0, 0, Frontier;
    0x5C, TLOAD, "TLOAD", 100, 1, 1, Cancun;
    0x5D, TSTORE, "TSTORE", 100, 2, 0, Cancun;
    0x5E, MCOPY, "MCOPY", 0, 3, 0, Cancun;
    0x5F, PUSH0, "PUSH0", 2, 0, 1, Shanghai;

    0x60, PUSH1, "PUSH1", 3, 0, 1, Frontier;
    0x61, PUSH2, "PUSH2", 3, 0, 1, Frontier;
    0x62, PUSH3, "PUSH3", 3, 0, 1, Frontier;
    0x63, PUSH4, "PUSH4", 3, 0, 1, Frontier;
    0x64, PUSH5, "PUSH5", 3, 0, 1, Frontier;
    0x65, PUSH6, "PUSH6", 3, 0, 1, Frontier;
    0x66, PUSH7, "PUSH7", 3, 0, 1, Frontier;
    0x67, PUSH8, "PUSH8", 3, 0, 1, Frontier;
    0x68, PUSH9, "PUSH9", 3, 0, 1, Frontier;
    0x69, PUSH10, "PUSH10", 3, 0, 1, Frontier;
    0x6A, PUSH11, "PUSH11", 3, 0, 1, Frontier;
    0x6B, PUSH12, "PUSH12", 3, 0, 1, Frontier;
    0x6C, PUSH13, "PUSH13", 3, 0, 1, Frontier;
    0x6D, PUSH14, "PUSH14", 3, 0, 1, Frontier;
    0x6E, PUSH15, "PUSH15", 3, 0, 1, Frontier;
    0x6F, PUSH16, "PUSH16", 3, 0, 1, Frontier;
    0x70, PUSH17, "PUSH17", 3, 0, 1, Frontier;
    0x71, PUSH18, "PUSH18", 3, 0, 1, Frontier;
    0x72, PUSH19, "PUSH19", 3, 0, 1, Frontier;
    0x73, PUSH20, "PUSH20", 3, 0, 1, Frontier;
    0x74, PUSH21, "PUSH21", 3, 0, 1, Frontier;
    0x75, PUSH22, "PUSH22", 3, 0, 1, Frontier;
    0x76, PUSH23, "PUSH23", 3, 0, 1, Frontier;
    0x77, PUSH24, "PUSH24", 3, 0, 1, Frontier;
    0x78, PUSH25, "PUSH25", 3, 0, 1, Frontier;
    0x79, PUSH26, "PUSH26", 3, 0, 1, Frontier;
    0x7A, PUSH27, "PUSH27", 3, 0, 1, Frontier;
    0x7B, PUSH28, "PUSH28", 3, 0, 1, Frontier;
    0x7C, PUSH29, "PUSH29", 3, 0, 1, Frontier;
    0x7D, PUSH30, "PUSH30", 3, 0, 1, Frontier;
    0x7E, PUSH31, "PUSH31", 3, 0, 1, Frontier;
    0x7F, PUSH32, "PUSH32", 3, 0, 1, Frontier;

    0x80, DUP1, "DUP1", 3, 1, 2, Frontier;
    0x81, DUP2, "DUP2", 3, 2, 3, Frontier;
    0x82, DUP3, "DUP3", 3, 3, 4, Frontier;
    0x83, DUP4, "DUP4", 3, 4, 5, Frontier;
    0x84, DUP5, "DUP5", 3, 5, 6, Frontier;
    0x85, DUP6, "DUP6", 3, 6, 7, Frontier;
    0x86, DUP7, "DUP7", 3, 7, 8, Frontier;
    0x87, DUP8, "DUP8", 3, 8, 9, Frontier;
    0x88, DUP9, "DUP9", 3, 9, 10, Frontier;
    0x89, DUP10, "DUP10", 3, 10, 11, Frontier;
    0x8A, DUP11, "DUP11", 3, 11, 12, Frontier;
    0x8B, DUP12, "DUP12", 3, 12, 13, Frontier;
    0x8C, DUP13, "DUP13", 3, 13, 14, Frontier;
    0x8D, DUP14, "DUP14", 3, 14, 15, Frontier;
    0x8E, DUP15, "DUP15", 3, 15, 16, Frontier;
    0x8F, DUP16, "DUP16", 3, 16, 17, Frontier;

    0x90, SWAP1, "SWAP1", 3, 2, 2, Frontier;
    0x91, SWAP2, "SWAP2", 3, 3, 3, Frontier;
    0x92, SWAP3, "SWAP3", 3, 4, 4, Frontier;
    0x93, SWAP4, "SWAP4", 3, 5, 5, Frontier;
    0x94, SWAP5, "SWAP5", 3, 6, 6, Frontier;
    0x95, SWAP6, "SWAP6", 3, 7, 7, Frontier;
    0x96, SWAP7, "SWAP7", 3, 8, 8, Frontier;
    0x97, SWAP8, "SWAP8", 3, 9, 9, Frontier;
    0x98, SWAP9, "SWAP9", 3, 10, 10, Frontier;
    0x99, SWAP10, "SWAP10", 3, 11, 11, Frontier;
    0x9A, SWAP11, "SWAP11", 3, 12, 12, Frontier;
    0x9B, SWAP12, "SWAP12", 3, 13, 13, Frontier;
    0x9C, SWAP13, "SWAP13", 3, 14, 14, Frontier;
    0x9D, SWAP14, "SWAP14", 3, 15, 15, Frontier;
    0x9E, SWAP15, "SWAP15", 3, 16, 16, Frontier;
    0x9F, SWAP16, "SWAP16", 3, 17, 17, Frontier;

    0xA0, LOG0, "LOG0", 0, 2, 0, Frontier;
    0xA1, LOG1, "LOG1", 0, 3, 0, Frontier;
    0xA2, LOG2, "LOG2", 0, 4, 0, Frontier;
    0xA3, LOG3, "LOG3", 0, 5, 0, Frontier;
    0xA4, LOG4, "LOG4", 0, 6, 0, Frontier;

    0xF0, CREATE, "CREATE", 0, 3, 1, Frontier;
    0xF1, CALL, "CALL", 0, 7, 1, Frontier;
    0xF2, CALLCODE, "CALLCODE", 0, 7, 1, Frontier;
    0xF3, RETURN, "RETURN", 0, 2, 0, Frontier;
    0xF4, DELEGATECALL, "DELEGATECALL", 0, 6, 1, Homestead;
    0xF5, CREATE2, "CREATE2", 0, 4, 1, Constantinople;
    0xFA, STATICCALL, "STATICCALL", 0, 6, 1, Byzantium;
    0xFD, REVERT, "REVERT", 0, 2, 0, Byzantium;
    0xFE, INVALID, "INVALID", 0, 0, 0, Frontier;
    0xFF, SELFDESTRUCT, "SELFDESTRUCT", 0, 1, 0, Frontier;
}

/// Returns the lowest PUSH width opcode byte, i.e. [`PUSH0`].
#[inline]
pub const fn is_push(op: u8) -> bool {
    op >= PUSH0 && op <= PUSH32
}

/// For `PUSH1..PUSH32`, the number of literal bytes that follow the opcode.
/// `PUSH0` returns `0`.
#[inline]
pub const fn push_data_len(op: u8) -> u8 {
    if op < PUSH1 {
        0
    } else {
        op - PUSH1 + 1
    }
}

/// `true` for `DUP1..DUP16`.
#[inline]
pub const fn is_dup(op: u8) -> bool {
    op >= DUP1 && op <= DUP16
}

/// `true` for `SWAP1..SWAP16`.
#[inline]
pub const fn is_swap(op: u8) -> bool {
    op >= SWAP1 && op <= SWAP16
}

/// `true` for `LOG0..LOG4`.
#[inline]
pub const fn is_log(op: u8) -> bool {
    op >= LOG0 && op <= LOG4
}

/// Number of topics for a `LOGn` opcode (0-4). Panics outside that range in
/// debug builds; callers must have already checked [`is_log`].
#[inline]
pub const fn log_topic_count(op: u8) -> u8 {
    op - LOG0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_round_trips_known_opcodes() {
        assert_eq!(OPCODE_INFO[ADD as usize].name, "ADD");
        assert_eq!(OPCODE_INFO[ADD as usize].stack_delta(), -1);
        assert!(OPCODE_INFO[ADD as usize].valid);
        assert!(!OPCODE_INFO[0x0C].valid);
        assert!(!OPCODE_INFO[0xEF].valid);
    }

    #[test]
    fn push_helpers_agree_with_table() {
        assert_eq!(push_data_len(PUSH1), 1);
        assert_eq!(push_data_len(PUSH32), 32);
        assert_eq!(push_data_len(PUSH0), 0);
        assert!(is_push(PUSH17));
        assert!(!is_push(DUP1));
    }

    #[test]
    fn dup_swap_stack_arity_is_consistent() {
        for n in 1u8..=16 {
            let dup = OPCODE_INFO[(DUP1 + n - 1) as usize];
            assert_eq!(dup.stack_in, n);
            assert_eq!(dup.stack_out, n + 1);
            let swap = OPCODE_INFO[(SWAP1 + n - 1) as usize];
            assert_eq!(swap.stack_in, n + 1);
            assert_eq!(swap.stack_out, n + 1);
        }
    }

    #[test]
    fn hardfork_gating_matches_known_eips() {
        assert_eq!(OPCODE_INFO[PUSH0 as usize].since, Hardfork::Shanghai);
        assert_eq!(OPCODE_INFO[TLOAD as usize].since, Hardfork::Cancun);
        assert_eq!(OPCODE_INFO[SHL as usize].since, Hardfork::Constantinople);
        assert_eq!(OPCODE_INFO[CHAINID as usize].since, Hardfork::Istanbul);
    }
}
