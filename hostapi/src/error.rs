//! Host-side error types.
//!
//! `HostError` is returned by every host operation. Only its `Trap` variant
//! corresponds to a protocol-level outcome; the remaining variants describe
//! a misbehaving embedder or guest binding.
//!
//! `StateError` and `KernelError` are the failures of the two external
//! collaborators. They are soft: the state accessor and call dispatcher
//! absorb them into documented defaults, so they never reach the guest.

use eei_primitives::{ExecutionStatus, HostOp, Path, TrapReason};

/// Error returned by a host operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Fatal trap; the execution transitions to `Trapped`.
    #[error("trap: {0}")]
    Trap(#[from] TrapReason),

    /// A host operation was issued after the execution reached a terminal state.
    #[error("execution is {0}; no further host operations accepted")]
    Terminated(ExecutionStatus),

    /// The binding passed the wrong number of arguments for `op`.
    #[error("{op}: expected {expected} arguments, got {got}")]
    BadArguments {
        op: HostOp,
        expected: usize,
        got: usize,
    },

    /// Internal host failure not attributable to the guest.
    #[error("internal host error: {0}")]
    Internal(String),
}

impl HostError {
    /// Create an out-of-gas trap.
    pub fn out_of_gas() -> Self {
        Self::Trap(TrapReason::OutOfGas)
    }

    /// Create a memory-fault trap.
    pub fn memory_fault() -> Self {
        Self::Trap(TrapReason::MemoryFault)
    }

    /// Create an invalid-argument trap.
    pub fn invalid_argument() -> Self {
        Self::Trap(TrapReason::InvalidArgument)
    }

    /// The trap reason, if this error aborts the execution.
    pub fn trap_reason(&self) -> Option<TrapReason> {
        match self {
            Self::Trap(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Convenience result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Failure of a state tree access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// No value is stored at the path.
    #[error("no value at {0}")]
    NotFound(Path),

    /// The tree could not serve the request.
    #[error("state tree unavailable: {0}")]
    Unavailable(String),
}

/// Failure of the routing kernel to deliver a message or its response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// No execution could be resolved for the destination path.
    #[error("no route to {0}")]
    Unroutable(Path),

    /// The kernel dropped the message or its response.
    #[error("kernel transport failure: {0}")]
    Transport(String),
}
