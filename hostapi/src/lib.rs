//! `eei-hostapi`: the host side of the EEI host-binding layer.
//!
//! This crate mediates between a sandboxed contract execution and
//! authoritative chain state. It provides:
//!
//! - `HostInterface`: one dispatch routine over the `HostOp` table
//! - `GasMeter`: authoritative per-execution gas and refund accounting
//! - `MemoryAccessor`: bounds-checked access to guest linear memory
//! - `StateTree` trait + `StateAccessor`: path-addressed state with soft-fail defaults
//! - `Kernel` trait + `CallDispatcher`: sub-call message construction and routing
//! - `ResultCollector`: return data, logs, self-destruct and the terminal state machine
//! - `MemTree` / `RecordingKernel`: in-memory collaborators for testing
//!
//! Shared types (paths, messages, the operation table, gas constants) come
//! from `eei-primitives`.

pub mod error;
pub mod gas_meter;
pub mod memory;
pub mod context;
pub mod state_tree;
pub mod mem_tree;
pub mod state;
pub mod kernel;
pub mod mem_kernel;
pub mod dispatcher;
pub mod result;
pub mod host;

// Re-export commonly used types at the crate root.
pub use error::{HostError, HostResult, KernelError, StateError};
pub use gas_meter::GasMeter;
pub use memory::MemoryAccessor;
pub use context::ExecutionContext;
pub use state_tree::StateTree;
pub use mem_tree::MemTree;
pub use state::{Lookup, StateAccessor, StorageWrite};
pub use kernel::Kernel;
pub use mem_kernel::RecordingKernel;
pub use dispatcher::{CallDispatcher, CallRequest, CallStatus};
pub use result::ResultCollector;
pub use host::HostInterface;
