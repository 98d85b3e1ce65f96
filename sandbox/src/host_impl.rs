//! Per-execution mutable state held in the Wasmtime Store.
//!
//! `HostState` owns the execution's `HostInterface` together with the
//! store's resource limiter. It lives inside `Store<HostState>` for the
//! duration of one execution and is consumed to produce the outcome.

use std::sync::Arc;

use wasmtime::{StoreLimits, StoreLimitsBuilder};

use eei_hostapi::{HostInterface, Kernel, StateTree};
use eei_primitives::{ExecutionOutcome, Message};

use crate::config::SandboxConfig;

/// Bytes per wasm page.
pub const WASM_PAGE_SIZE: usize = 65_536;

/// Per-execution mutable state held in the Wasmtime `Store`.
pub struct HostState {
    /// Host side of the execution: gas, state, sub-calls, results.
    pub host: HostInterface,
    /// Caps linear memory growth at `max_memory_pages`.
    pub limits: StoreLimits,
}

impl HostState {
    /// Create the host state for one execution of `message`.
    pub fn new(
        message: Message,
        tree: Arc<dyn StateTree>,
        kernel: Arc<dyn Kernel>,
        config: &SandboxConfig,
    ) -> Self {
        let limits = StoreLimitsBuilder::new()
            .memory_size(config.max_memory_pages as usize * WASM_PAGE_SIZE)
            .memories(1)
            .build();
        Self {
            host: HostInterface::new(message, tree, kernel),
            limits,
        }
    }

    /// Consume the state and report the execution's outcome.
    pub fn into_outcome(self) -> ExecutionOutcome {
        self.host.finish()
    }
}
