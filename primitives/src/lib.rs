//! `eei-primitives`: foundational types for the EEI host-binding layer.
//!
//! This crate provides the byte-level types, state tree paths, gas schedule,
//! host operation table, trap/status model and execution boundary types
//! shared by the host interface and the sandbox binding.
//!
//! Nothing here performs I/O; every function is deterministic.

pub mod types;
pub mod path;
pub mod error;
pub mod gas;
pub mod op;
pub mod execution;
pub mod crypto;

// Re-export commonly used types at the crate root for convenience.
pub use types::{Address, Hash, Word, ADDRESS_SIZE_BYTES, U128_SIZE_BYTES, U256_SIZE_BYTES};
pub use path::{Path, Segment};
pub use error::{ExecutionStatus, HaltReason, TrapReason};
pub use op::{ArgKind, HostOp};
pub use execution::{
    BlockInfo, CallKind, ExecutionOutcome, ExecutionResult, Log, Message, Response,
};
pub use crypto::create_address;
