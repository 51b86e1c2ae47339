//! Tunable knobs for the plan cache and structural size limits (§6.4).

use crate::constants::limits;

/// Recognized engine configuration (§6.4 "Plan Cache Tuning Options").
///
/// A plain struct with a `const`-backed [`Default`], no builder-pattern
/// macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Plan-cache entry capacity.
    pub cache_capacity: usize,
    /// Maximum runtime bytecode size accepted by [`crate::plan::Plan::build`]
    /// (EIP-170).
    pub max_bytecode_size: usize,
    /// Maximum initcode size accepted by `CREATE`/`CREATE2` (EIP-3860).
    pub max_initcode_size: usize,
    /// Stack capacity for every frame.
    pub stack_capacity: usize,
    /// Whether the analyzer's jumpdest scan (§4.1 Pass 2) is vectorized.
    /// Purely a performance knob: disabling it must not change any observed
    /// `Outcome` (§8 "Fusion is an optimization" applies equally here).
    pub vectorize_jumpdest_scan: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: limits::CACHE_CAPACITY,
            max_bytecode_size: limits::MAX_BYTECODE_SIZE,
            max_initcode_size: limits::MAX_INITCODE_SIZE,
            stack_capacity: limits::STACK_CAPACITY,
            vectorize_jumpdest_scan: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_capacity, 32);
        assert_eq!(config.max_bytecode_size, 24576);
        assert_eq!(config.max_initcode_size, 49152);
        assert_eq!(config.stack_capacity, 1024);
        assert!(config.vectorize_jumpdest_scan);
    }
}
