//! The capability boundary the interpreter calls out through (§6.1).

use alloy_primitives::{Address, Bytes, Log};
use auto_impl::auto_impl;

use crate::{hardfork::Hardfork, types::Word};

/// Static per-block context (§6.1 "Block/tx context").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub number: u64,
    pub timestamp: u64,
    pub gas_limit: u64,
    pub coinbase: Address,
    pub prev_randao: Word,
    pub base_fee: Word,
    pub blob_base_fee: Word,
    pub chain_id: u64,
}

/// Static per-transaction context (§6.1 "Block/tx context").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    pub origin: Address,
    pub gas_price: Word,
    pub blob_hashes: Vec<Word>,
}

/// Discriminant over the shapes of a sub-call/create (§6.1 `inner_call`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    CallCode,
    DelegateCall,
    StaticCall,
    Create,
    Create2,
}

/// Parameters for one sub-call or contract creation.
#[derive(Debug, Clone)]
pub struct CallParams {
    pub kind: CallKind,
    pub caller: Address,
    /// Callee for `Call`/`CallCode`/`DelegateCall`/`StaticCall`. For
    /// `Create`/`Create2` this is the address the interpreter already
    /// derived (nonce- or salt-based); the host deploys there rather than
    /// computing its own.
    pub callee: Address,
    pub value: Word,
    /// `input` for calls, `initcode` for creates.
    pub input: Bytes,
    pub gas: u64,
    /// `CREATE2` salt; unused otherwise.
    pub salt: Word,
    pub is_static: bool,
}

/// Result of a sub-call/create (§6.1 `CallResult`).
#[derive(Debug, Clone)]
pub struct CallResult {
    pub success: bool,
    pub gas_left: u64,
    pub gas_refund: u64,
    pub output: Bytes,
    /// Address of the newly created contract, for `Create`/`Create2`.
    pub created_address: Option<Address>,
}

/// An opaque token a host hands back from [`Host::create_snapshot`] and
/// accepts in [`Host::revert_to_snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotId(pub u64);

/// The capability interface the interpreter consumes (§6.1). A conformant
/// implementation backs this with a state database and access-list/
/// transient-storage bookkeeping; the interpreter never reaches around it.
///
/// `#[auto_impl(&mut, Box)]` lets call sites hold `&mut dyn Host` or
/// `Box<dyn Host>` interchangeably without a manual delegating impl.
#[auto_impl(&mut, Box)]
pub trait Host {
    /// Account balance; `Word::ZERO` for a non-existent account.
    fn balance(&mut self, address: Address) -> Word;
    /// Deployed bytecode; empty for an EOA or non-existent account.
    fn code(&mut self, address: Address) -> Bytes;
    /// `keccak256` of the deployed bytecode; `Word::ZERO` if empty.
    fn code_hash(&mut self, address: Address) -> Word;
    /// Length of the deployed bytecode.
    fn code_size(&mut self, address: Address) -> usize;
    /// Account nonce.
    fn nonce(&mut self, address: Address) -> u64;
    /// `true` if the account has been touched/created (EIP-161 sense).
    fn account_exists(&mut self, address: Address) -> bool;

    /// Persistent storage read.
    fn get_storage(&mut self, address: Address, slot: Word) -> Word;
    /// Persistent storage write.
    fn set_storage(&mut self, address: Address, slot: Word, value: Word);
    /// The slot's value at the start of the enclosing transaction, used by
    /// the EIP-2200/3529 SSTORE gas rule (§4.7). `None` only for a host
    /// that cannot answer (§"Design Notes": treated as `current == original`
    /// by the caller, with a `warn!`).
    fn get_original_storage(&mut self, address: Address, slot: Word) -> Option<Word>;

    /// Transient storage read (EIP-1153).
    fn get_transient(&mut self, address: Address, slot: Word) -> Word;
    /// Transient storage write (EIP-1153).
    fn set_transient(&mut self, address: Address, slot: Word, value: Word);

    /// Marks `address` warm for this transaction if it wasn't, returning
    /// whether the access was cold (EIP-2929).
    fn access_address(&mut self, address: Address) -> bool;
    /// Marks `(address, slot)` warm for this transaction if it wasn't,
    /// returning whether the access was cold (EIP-2929).
    fn access_storage_slot(&mut self, address: Address, slot: Word) -> bool;

    /// Static per-block context.
    fn block_info(&self) -> BlockInfo;
    /// Static per-transaction context.
    fn tx_context(&self) -> TxContext;
    /// One of the last 256 block hashes; `Word::ZERO` outside that window.
    fn block_hash(&mut self, number: u64) -> Word;

    /// Appends an event log.
    fn emit_log(&mut self, log: Log);

    /// Performs a sub-call or contract creation, re-entering the
    /// interpreter recursively on the same thread (§5 "Reentrancy").
    fn inner_call(&mut self, params: CallParams) -> CallResult;

    /// Takes a revertible snapshot of all host-owned state.
    fn create_snapshot(&mut self) -> SnapshotId;
    /// Rolls host-owned state back to a prior snapshot.
    fn revert_to_snapshot(&mut self, id: SnapshotId);

    /// Schedules `address` for destruction in favor of `beneficiary`; the
    /// host applies EIP-6780's "created this transaction" rule and any
    /// end-of-transaction bookkeeping.
    fn mark_for_destruction(&mut self, address: Address, beneficiary: Address);

    /// Whether `address` was created earlier in the current transaction,
    /// used by `SELFDESTRUCT` under EIP-6780. A host unable to track this
    /// should return `false`, which degrades `SELFDESTRUCT` to its
    /// pre-Cancun balance-only behavior (§9 open question).
    fn created_this_transaction(&self, address: Address) -> bool;

    /// The active hardfork.
    fn hardfork(&self) -> Hardfork;
}
