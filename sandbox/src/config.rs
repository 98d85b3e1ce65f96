//! Sandbox configuration.
//!
//! Only resource limits of the sandbox itself live here. Gas costs and the
//! block-hash window are consensus constants and are not configurable.

/// Configuration for the WASM sandbox.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Maximum linear memory pages (1 page = 64 KiB).
    /// Default: 256 pages = 16 MiB.
    pub max_memory_pages: u32,

    /// Wasmtime fuel limit (instruction metering).
    /// Prevents infinite loops in pure guest compute.
    pub fuel_limit: u64,

    /// Name of the exported `() -> ()` function that starts the execution.
    pub entry_point: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            max_memory_pages: 256, // 16 MiB
            fuel_limit: 100_000_000,
            entry_point: "main".into(),
        }
    }
}
