//! Sandbox error types.

use eei_hostapi::HostError;

/// Top-level error type for the sandbox crate.
///
/// Host-level traps (out of gas, memory faults, bad arguments) are not
/// errors here: they end the execution normally with a `Trapped` outcome.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Wasmtime engine, compilation, or instantiation error.
    #[error("wasmtime error: {0}")]
    Wasmtime(#[from] anyhow::Error),

    /// Module validation failed (missing exports, bad imports, etc.).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Host interface failure that is not a trap (embedder fault).
    #[error("host error: {0}")]
    HostError(#[from] HostError),

    /// Guest memory could not be located or accessed.
    #[error("memory error: {0}")]
    MemoryError(String),

    /// Fuel exhausted during execution.
    #[error("fuel exhausted (instruction limit)")]
    FuelExhausted,

    /// WASM guest trapped on its own (unreachable, division by zero, ...).
    #[error("guest trapped: {0}")]
    GuestTrapped(String),
}
