//! An in-memory [`Host`] for unit and integration tests, backed by plain
//! hash maps rather than a real state database, since this engine owns
//! its own state boundary rather than wrapping one.
//!
//! Builder methods follow a `set_account_field`/`account_field` pairing: a
//! `set_*` method mutates in place, a same-named method without the prefix
//! consumes and returns `self` for chaining.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use alloy_primitives::{Address, Bytes, Log};

use crate::{
    frame::Frame,
    hardfork::Hardfork,
    host::{BlockInfo, CallKind, CallParams, CallResult, Host, SnapshotId, TxContext},
    interpreter,
    plan::Plan,
    types::Word,
};

#[derive(Debug, Clone, Default)]
struct Account {
    balance: Word,
    nonce: u64,
    code: Bytes,
    code_hash: Word,
}

#[derive(Clone)]
struct Snapshot {
    accounts: HashMap<Address, Account>,
    storage: HashMap<(Address, Word), Word>,
    destroyed: Vec<(Address, Address)>,
    logs_len: usize,
}

/// A self-contained `Host` backed by plain hash maps, with no persistence.
/// Sub-calls (`inner_call`) recursively re-enter [`interpreter::run`]
/// against `self`, matching §5's same-thread reentrancy model.
pub struct TestHost {
    accounts: HashMap<Address, Account>,
    storage: HashMap<(Address, Word), Word>,
    original_storage: HashMap<(Address, Word), Word>,
    transient: HashMap<(Address, Word), Word>,
    warm_addresses: HashSet<Address>,
    warm_slots: HashSet<(Address, Word)>,
    block_hashes: HashMap<u64, Word>,
    created_this_tx: HashSet<Address>,
    pub logs: Vec<Log>,
    pub destroyed: Vec<(Address, Address)>,
    pub block: BlockInfo,
    pub tx: TxContext,
    pub hardfork: Hardfork,
    pub stack_capacity: usize,
    pub max_bytecode_size: usize,
    pub max_initcode_size: usize,
    next_create_address: u64,
    snapshots: Vec<Snapshot>,
}

impl Default for TestHost {
    fn default() -> Self {
        Self {
            accounts: HashMap::new(),
            storage: HashMap::new(),
            original_storage: HashMap::new(),
            transient: HashMap::new(),
            warm_addresses: HashSet::new(),
            warm_slots: HashSet::new(),
            block_hashes: HashMap::new(),
            created_this_tx: HashSet::new(),
            logs: Vec::new(),
            destroyed: Vec::new(),
            block: BlockInfo {
                number: 1,
                timestamp: 0,
                gas_limit: 30_000_000,
                coinbase: Address::ZERO,
                prev_randao: Word::ZERO,
                base_fee: Word::ZERO,
                blob_base_fee: Word::ZERO,
                chain_id: 1,
            },
            tx: TxContext { origin: Address::ZERO, gas_price: Word::ZERO, blob_hashes: Vec::new() },
            hardfork: Hardfork::LATEST,
            stack_capacity: crate::constants::limits::STACK_CAPACITY,
            max_bytecode_size: crate::constants::limits::MAX_BYTECODE_SIZE,
            max_initcode_size: crate::constants::limits::MAX_INITCODE_SIZE,
            next_create_address: 1,
            snapshots: Vec::new(),
        }
    }
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, address: Address) -> &mut Account {
        self.accounts.entry(address).or_default()
    }

    pub fn set_balance(&mut self, address: Address, balance: Word) {
        self.entry(address).balance = balance;
    }

    pub fn with_balance(mut self, address: Address, balance: Word) -> Self {
        self.set_balance(address, balance);
        self
    }

    pub fn set_nonce(&mut self, address: Address, nonce: u64) {
        self.entry(address).nonce = nonce;
    }

    pub fn with_nonce(mut self, address: Address, nonce: u64) -> Self {
        self.set_nonce(address, nonce);
        self
    }

    pub fn set_code(&mut self, address: Address, code: Bytes) {
        let hash = alloy_primitives::keccak256(&code);
        let account = self.entry(address);
        account.code_hash = Word::from_be_slice(hash.as_slice());
        account.code = code;
    }

    pub fn with_code(mut self, address: Address, code: Bytes) -> Self {
        self.set_code(address, code);
        self
    }

    pub fn set_storage_value(&mut self, address: Address, slot: Word, value: Word) {
        self.storage.insert((address, slot), value);
        self.original_storage.entry((address, slot)).or_insert(value);
    }

    pub fn with_storage_value(mut self, address: Address, slot: Word, value: Word) -> Self {
        self.set_storage_value(address, slot, value);
        self
    }

    pub fn mark_created_this_transaction(&mut self, address: Address) {
        self.created_this_tx.insert(address);
    }

    /// Runs `code` as a top-level call and returns the engine's [`crate::outcome::Outcome`].
    pub fn run_top_level(
        &mut self,
        code: &[u8],
        input: &[u8],
        address: Address,
        caller: Address,
        value: Word,
        gas: u64,
    ) -> crate::outcome::Outcome {
        let plan = Plan::build(code, self.hardfork, self.max_bytecode_size)
            .expect("test bytecode must fit the configured size cap");
        let mut frame = Frame::new(
            Arc::new(plan),
            gas,
            self.stack_capacity,
            address,
            caller,
            value,
            Bytes::copy_from_slice(input),
            false,
            0,
            self.max_initcode_size,
        );
        let hardfork = self.hardfork;
        interpreter::run(&mut frame, self, hardfork)
    }

    fn next_address(&mut self) -> Address {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&self.next_create_address.to_be_bytes());
        self.next_create_address += 1;
        Address::from(bytes)
    }

    fn snapshot_now(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.clone(),
            storage: self.storage.clone(),
            destroyed: self.destroyed.clone(),
            logs_len: self.logs.len(),
        }
    }
}

impl Host for TestHost {
    fn balance(&mut self, address: Address) -> Word {
        self.accounts.get(&address).map(|a| a.balance).unwrap_or(Word::ZERO)
    }

    fn code(&mut self, address: Address) -> Bytes {
        self.accounts.get(&address).map(|a| a.code.clone()).unwrap_or_default()
    }

    fn code_hash(&mut self, address: Address) -> Word {
        self.accounts.get(&address).map(|a| a.code_hash).unwrap_or(Word::ZERO)
    }

    fn code_size(&mut self, address: Address) -> usize {
        self.accounts.get(&address).map(|a| a.code.len()).unwrap_or(0)
    }

    fn nonce(&mut self, address: Address) -> u64 {
        self.accounts.get(&address).map(|a| a.nonce).unwrap_or(0)
    }

    fn account_exists(&mut self, address: Address) -> bool {
        self.accounts.contains_key(&address)
    }

    fn get_storage(&mut self, address: Address, slot: Word) -> Word {
        self.storage.get(&(address, slot)).copied().unwrap_or(Word::ZERO)
    }

    fn set_storage(&mut self, address: Address, slot: Word, value: Word) {
        self.original_storage.entry((address, slot)).or_insert(Word::ZERO);
        self.storage.insert((address, slot), value);
    }

    fn get_original_storage(&mut self, address: Address, slot: Word) -> Option<Word> {
        Some(self.original_storage.get(&(address, slot)).copied().unwrap_or(Word::ZERO))
    }

    fn get_transient(&mut self, address: Address, slot: Word) -> Word {
        self.transient.get(&(address, slot)).copied().unwrap_or(Word::ZERO)
    }

    fn set_transient(&mut self, address: Address, slot: Word, value: Word) {
        self.transient.insert((address, slot), value);
    }

    fn access_address(&mut self, address: Address) -> bool {
        self.warm_addresses.insert(address)
    }

    fn access_storage_slot(&mut self, address: Address, slot: Word) -> bool {
        self.warm_slots.insert((address, slot))
    }

    fn block_info(&self) -> BlockInfo {
        self.block
    }

    fn tx_context(&self) -> TxContext {
        self.tx.clone()
    }

    fn block_hash(&mut self, number: u64) -> Word {
        self.block_hashes.get(&number).copied().unwrap_or(Word::ZERO)
    }

    fn emit_log(&mut self, log: Log) {
        self.logs.push(log);
    }

    fn inner_call(&mut self, params: CallParams) -> CallResult {
        let (code, callee) = match params.kind {
            CallKind::Create | CallKind::Create2 => (params.input.clone(), params.callee),
            _ => (self.code(params.callee), params.callee),
        };

        if matches!(params.kind, CallKind::Call | CallKind::CallCode | CallKind::Create | CallKind::Create2)
            && !params.value.is_zero()
        {
            let from_balance = self.balance(params.caller);
            self.set_balance(params.caller, from_balance.saturating_sub(params.value));
            let to_balance = self.balance(params.callee);
            self.set_balance(params.callee, to_balance + params.value);
        }

        let plan = match Plan::build(&code, self.hardfork, self.max_bytecode_size) {
            Ok(plan) => plan,
            Err(_) => {
                return CallResult {
                    success: false,
                    gas_left: 0,
                    gas_refund: 0,
                    output: Bytes::new(),
                    created_address: None,
                }
            }
        };

        let mut frame = Frame::new(
            Arc::new(plan),
            params.gas,
            self.stack_capacity,
            callee,
            params.caller,
            params.value,
            if matches!(params.kind, CallKind::Create | CallKind::Create2) {
                Bytes::new()
            } else {
                params.input.clone()
            },
            params.is_static,
            1,
            self.max_initcode_size,
        );
        let hardfork = self.hardfork;
        let outcome = interpreter::run(&mut frame, self, hardfork);

        match outcome {
            crate::outcome::Outcome::Success { gas_left, gas_refund, output } => {
                let created_address = match params.kind {
                    CallKind::Create | CallKind::Create2 => {
                        self.set_code(callee, output.clone());
                        self.created_this_tx.insert(callee);
                        Some(callee)
                    }
                    _ => None,
                };
                CallResult { success: true, gas_left, gas_refund, output, created_address }
            }
            crate::outcome::Outcome::Revert { gas_left, output } => {
                CallResult { success: false, gas_left, gas_refund: 0, output, created_address: None }
            }
            crate::outcome::Outcome::Halt { .. } => {
                CallResult { success: false, gas_left: 0, gas_refund: 0, output: Bytes::new(), created_address: None }
            }
        }
    }

    fn create_snapshot(&mut self) -> SnapshotId {
        self.snapshots.push(self.snapshot_now());
        SnapshotId(self.snapshots.len() as u64 - 1)
    }

    fn revert_to_snapshot(&mut self, id: SnapshotId) {
        if let Some(snapshot) = self.snapshots.get(id.0 as usize).cloned() {
            self.accounts = snapshot.accounts;
            self.storage = snapshot.storage;
            self.destroyed = snapshot.destroyed;
            self.logs.truncate(snapshot.logs_len);
            self.snapshots.truncate(id.0 as usize);
        }
    }

    fn mark_for_destruction(&mut self, address: Address, beneficiary: Address) {
        let balance = self.balance(address);
        self.set_balance(address, Word::ZERO);
        let beneficiary_balance = self.balance(beneficiary);
        self.set_balance(beneficiary, beneficiary_balance + balance);
        self.destroyed.push((address, beneficiary));
    }

    fn created_this_transaction(&self, address: Address) -> bool {
        self.created_this_tx.contains(&address)
    }

    fn hardfork(&self) -> Hardfork {
        self.hardfork
    }
}

impl std::fmt::Debug for TestHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestHost").field("accounts", &self.accounts.len()).field("logs", &self.logs.len()).finish()
    }
}

/// Convenience for tests that just need a fresh address to call CREATE from.
impl TestHost {
    pub fn allocate_address(&mut self) -> Address {
        self.next_address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_add_program_succeeds() {
        let mut host = TestHost::new();
        let code = [0x60, 0x05, 0x60, 0x0A, 0x01, 0x00]; // PUSH1 5; PUSH1 10; ADD; STOP
        let outcome = host.run_top_level(&code, &[], Address::ZERO, Address::ZERO, Word::ZERO, 1_000_000);
        assert!(outcome.is_success());
    }

    #[test]
    fn snapshot_revert_restores_balance() {
        let mut host = TestHost::new();
        let addr = Address::from([1u8; 20]);
        host.set_balance(addr, Word::from(100u64));
        let snapshot = host.create_snapshot();
        host.set_balance(addr, Word::from(5u64));
        host.revert_to_snapshot(snapshot);
        assert_eq!(host.balance(addr), Word::from(100u64));
    }

    #[test]
    fn call_between_two_contracts_forwards_input() {
        let mut host = TestHost::new();
        let callee = Address::from([2u8; 20]);
        // PUSH1 0x42; PUSH1 0; MSTORE; PUSH1 32; PUSH1 0; RETURN
        let callee_code = [0x60, 0x42, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xF3];
        host.set_code(callee, Bytes::copy_from_slice(&callee_code));

        // PUSH1 0 (retlen=0... ) build a CALL to `callee`: we just exercise
        // inner_call directly here rather than hand-assembling CALL's stack.
        let result = host.inner_call(CallParams {
            kind: CallKind::Call,
            caller: Address::ZERO,
            callee,
            value: Word::ZERO,
            input: Bytes::new(),
            gas: 100_000,
            salt: Word::ZERO,
            is_static: false,
        });
        assert!(result.success);
        assert_eq!(result.output.len(), 32);
        assert_eq!(result.output[31], 0x42);
    }
}
