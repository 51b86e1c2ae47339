//! Plan builder (§4.2): compiles analyzed bytecode into a dispatchable
//! instruction stream.

use alloy_primitives::Bytes;

use crate::{
    analyzer::{Analysis, BlockSummary},
    constants,
    error::PlanError,
    fusion,
    hardfork::Hardfork,
    opcode::{self, OPCODE_INFO},
    types::Word,
};

/// One decoded instruction slot in the plan's dispatch stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Opcode byte: a real EVM opcode, or a synthetic fusion opcode
    /// (`>= FUSION_OPCODE_BASE`, §3 "Fusion opcodes").
    pub opcode: u8,
    /// The bytecode PC this instruction starts at (for `PC`, tracing, and
    /// jump-target reporting).
    pub pc: u32,
    /// This instruction's literal/constant operand, if any.
    pub operand: Operand,
}

/// An instruction's inline operand (§4.2 "Slot layout").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operand {
    #[default]
    None,
    /// A `PUSHn` literal or fused literal that fits in a `u64`.
    Imm(u64),
    /// Index into [`Plan::constants`] for a literal too wide for `Imm`.
    Const(u16),
}

/// Jumpdest-indexed block metadata, looked up when entering a new block
/// (§4.4 "Stack-safety protocol").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMeta {
    pub static_gas: u32,
    pub min_stack_delta: i16,
    pub max_stack_delta: i16,
}

impl From<BlockSummary> for BlockMeta {
    fn from(s: BlockSummary) -> Self {
        Self { static_gas: s.static_gas, min_stack_delta: s.min_stack_delta, max_stack_delta: s.max_stack_delta }
    }
}

/// The analyzer + planner's immutable output for one `(bytecode, hardfork)`
/// pair (§3 "Plan"). Shared by reference during execution; never mutated
/// after [`Plan::build`] returns.
#[derive(Debug, Clone)]
pub struct Plan {
    /// The source bytecode, kept so `CODESIZE`/`CODECOPY`/`EXTCODECOPY` can
    /// read raw bytes alongside the decoded instruction stream.
    pub code: Bytes,
    /// Decoded instruction stream, in bytecode order with fused pairs
    /// collapsed to a single slot.
    pub instructions: Vec<Instruction>,
    /// Side-table of `Word`-sized constants too wide for an inline `Imm`.
    pub constants: Vec<Word>,
    /// Block metadata, ordered by entry PC, looked up by binary search
    /// against `block_entry_pcs`.
    pub blocks: Vec<BlockMeta>,
    block_entry_pcs: Vec<u32>,
    /// Dense PC -> instruction-index map; `u32::MAX` marks "not an opcode
    /// start" (§4.2 "PC->index map"; dense form only, per §9's design note
    /// that the dense form is "strongly preferred for dynamic-jump hot
    /// paths" — this engine does not additionally maintain a sparse map).
    pc_to_index: Vec<u32>,
    pub entry_block: BlockMeta,
}

const NOT_AN_OPCODE_START: u32 = u32::MAX;

impl Plan {
    /// Builds a plan from raw bytecode at a given hardfork and size cap.
    pub fn build(code: &[u8], hardfork: Hardfork, max_bytecode_size: usize) -> Result<Self, PlanError> {
        if code.len() > max_bytecode_size {
            return Err(PlanError::BytecodeTooLarge { len: code.len(), max: max_bytecode_size });
        }

        let analysis = Analysis::build(code, hardfork, true);

        let mut instructions = Vec::with_capacity(code.len());
        let mut constants = Vec::new();
        let mut pc_to_index = vec![NOT_AN_OPCODE_START; code.len()];

        let mut pc = 0usize;
        while pc < code.len() {
            pc_to_index[pc] = instructions.len() as u32;
            let op = code[pc];

            if opcode::is_push(op) {
                let data_len = opcode::push_data_len(op) as usize;
                let end = (pc + 1 + data_len).min(code.len());
                let mut bytes = [0u8; 32];
                // §8: "PUSHn truncated at end of code: the missing bytes
                // are treated as zero" — `bytes` starts zeroed, so copying
                // only the available slice already implements the pad.
                bytes[32 - data_len..32 - data_len + (end - (pc + 1))]
                    .copy_from_slice(&code[pc + 1..end]);
                let literal = Word::from_be_bytes(bytes);

                if let Some(fused) = fusion::try_fuse(code, pc, end, literal, &analysis) {
                    let operand = operand_for(fused.literal, &mut constants);
                    instructions.push(Instruction { opcode: fused.opcode, pc: fused.pc as u32, operand });
                    pc = fused.next_pc;
                    continue;
                }

                let operand = operand_for(literal, &mut constants);
                instructions.push(Instruction { opcode: op, pc: pc as u32, operand });
                pc = pc + 1 + data_len;
                continue;
            }

            instructions.push(Instruction { opcode: op, pc: pc as u32, operand: Operand::None });
            pc += 1;
        }

        let blocks: Vec<BlockMeta> = analysis.blocks.iter().copied().map(BlockMeta::from).collect();
        let block_entry_pcs: Vec<u32> = analysis.blocks.iter().map(|b| b.entry_pc).collect();
        let entry_block = blocks.first().copied().unwrap_or(BlockMeta {
            static_gas: 0,
            min_stack_delta: 0,
            max_stack_delta: 0,
        });

        Ok(Self {
            code: Bytes::copy_from_slice(code),
            instructions,
            constants,
            blocks,
            block_entry_pcs,
            pc_to_index,
            entry_block,
        })
    }

    /// Resolves a `PC` -> instruction index, or `None` if `pc` is not an
    /// opcode start (§8 invariant 6).
    #[inline]
    pub fn index_of_pc(&self, pc: u64) -> Option<u32> {
        let pc = usize::try_from(pc).ok()?;
        match self.pc_to_index.get(pc).copied() {
            Some(NOT_AN_OPCODE_START) | None => None,
            Some(idx) => Some(idx),
        }
    }

    /// Resolves a jump target: `Some(index)` only if `pc` is both an
    /// opcode start and a legal `JUMPDEST` (§4.4 "Jumps"). Push-data bytes
    /// never get an instruction-stream entry, so checking the resolved
    /// instruction's opcode is equivalent to re-running the analyzer's
    /// jumpdest bitmap check.
    pub fn resolve_jump_target(&self, pc: u64) -> Option<u32> {
        let idx = self.index_of_pc(pc)?;
        if self.instructions[idx as usize].opcode == opcode::JUMPDEST {
            Some(idx)
        } else {
            None
        }
    }

    /// Block metadata for the block whose entry PC is exactly `pc`, used
    /// when dispatch lands on a `JUMPDEST`.
    pub fn block_at(&self, pc: u32) -> Option<BlockMeta> {
        self.block_entry_pcs.binary_search(&pc).ok().map(|i| self.blocks[i])
    }

    /// Resolves an [`Operand`] to its full [`Word`] value.
    #[inline]
    pub fn resolve(&self, operand: Operand) -> Word {
        match operand {
            Operand::None => Word::ZERO,
            Operand::Imm(v) => Word::from(v),
            Operand::Const(i) => self.constants[i as usize],
        }
    }

    /// Number of instructions in the stream.
    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Picks `Imm` when a literal fits in a `u64`, else interns it in
/// `constants` and returns a `Const` index (§4.2 "Operand slot").
pub(crate) fn operand_for(literal: Word, constants: &mut Vec<Word>) -> Operand {
    if literal <= Word::from(u64::MAX) {
        Operand::Imm(literal.as_limbs()[0])
    } else {
        let idx = constants.len();
        constants.push(literal);
        Operand::Const(idx as u16)
    }
}

/// Default `max_bytecode_size`/`max_initcode_size` pair, re-exported for
/// call sites that don't have an [`crate::config::EngineConfig`] handy.
pub const DEFAULT_MAX_BYTECODE_SIZE: usize = constants::limits::MAX_BYTECODE_SIZE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_add_program_compiles() {
        // PUSH1 5; PUSH1 10; ADD; STOP
        let code = [0x60, 0x05, 0x60, 0x0A, 0x01, 0x00];
        let plan = Plan::build(&code, Hardfork::Cancun, 24576).unwrap();
        assert!(!plan.is_empty());
        assert_eq!(plan.index_of_pc(0), Some(0));
        assert_eq!(plan.index_of_pc(1), None); // push-data
    }

    #[test]
    fn truncated_push_zero_pads() {
        let code = [0x7F]; // PUSH32, no data
        let plan = Plan::build(&code, Hardfork::Cancun, 24576).unwrap();
        assert_eq!(plan.resolve(plan.instructions[0].operand), Word::ZERO);
    }

    #[test]
    fn oversized_bytecode_is_rejected() {
        let code = vec![0x00u8; 100];
        let err = Plan::build(&code, Hardfork::Cancun, 10).unwrap_err();
        assert_eq!(err, PlanError::BytecodeTooLarge { len: 100, max: 10 });
    }

    #[test]
    fn replanning_is_deterministic() {
        let code = [0x60, 0x05, 0x60, 0x0A, 0x01, 0x00];
        let a = Plan::build(&code, Hardfork::Cancun, 24576).unwrap();
        let b = Plan::build(&code, Hardfork::Cancun, 24576).unwrap();
        assert_eq!(a.instructions, b.instructions);
        assert_eq!(a.constants, b.constants);
    }
}
