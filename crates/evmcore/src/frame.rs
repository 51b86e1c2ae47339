//! Per-call mutable execution state (§3 "Frame").

use std::sync::Arc;

use alloy_primitives::{Address, Bytes};

use crate::{gas::GasMeter, memory::Memory, plan::Plan, stack::Stack, types::Word};

/// Everything a single call/create invocation owns for its lifetime.
/// Destroyed when the call terminates; sub-calls get their own `Frame`
/// borrowing their own plan (§3, §9 "Cyclic ownership").
pub struct Frame {
    pub plan: Arc<Plan>,
    pub index: usize,
    pub gas: GasMeter,
    pub stack: Stack,
    pub memory: Memory,
    pub return_data: Bytes,
    pub address: Address,
    pub caller: Address,
    pub value: Word,
    pub input: Bytes,
    pub is_static: bool,
    pub depth: u32,
    /// `EngineConfig::max_initcode_size`, carried per-frame so `CREATE`/
    /// `CREATE2` (§4.4 "Creates") honor the caller's configured limit rather
    /// than a compiled-in default.
    pub max_initcode_size: usize,
}

impl Frame {
    /// Creates a fresh frame for the top of a call, at instruction index 0.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        plan: Arc<Plan>,
        gas: u64,
        stack_capacity: usize,
        address: Address,
        caller: Address,
        value: Word,
        input: Bytes,
        is_static: bool,
        depth: u32,
        max_initcode_size: usize,
    ) -> Self {
        Self {
            plan,
            index: 0,
            gas: GasMeter::new(gas),
            stack: Stack::new(stack_capacity),
            memory: Memory::new(),
            return_data: Bytes::new(),
            address,
            caller,
            value,
            input,
            is_static,
            depth,
            max_initcode_size,
        }
    }

    /// The instruction the frame is currently positioned on.
    #[inline]
    pub fn current(&self) -> Option<crate::plan::Instruction> {
        self.plan.instructions.get(self.index).copied()
    }

    /// Current bytecode PC, for the `PC` opcode and tracing.
    #[inline]
    pub fn pc(&self) -> u32 {
        self.current().map(|i| i.pc).unwrap_or(self.plan.code.len() as u32)
    }
}
