//! Fatal trap reasons and execution status.
//!
//! A trap aborts the whole execution. Soft failures of the state tree and
//! sub-call failures never appear here: they are absorbed at the accessor
//! boundary and surface as default values or a `0` return.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an execution was aborted.
///
/// The repr values are stable and may be reported across process boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[repr(i32)]
pub enum TrapReason {
    /// Remaining gas was below a charge.
    #[error("out of gas")]
    OutOfGas = 1,
    /// A memory range fell outside the execution's linear memory.
    #[error("memory fault")]
    MemoryFault = 2,
    /// An argument was outside its protocol range (e.g. topic count).
    #[error("invalid argument")]
    InvalidArgument = 3,
}

impl TrapReason {
    /// Convert from the numeric code.
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::OutOfGas),
            2 => Some(Self::MemoryFault),
            3 => Some(Self::InvalidArgument),
            _ => None,
        }
    }

    /// Numeric code of this reason.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// How an execution halted normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaltReason {
    Return,
    SelfDestruct,
}

/// State machine of one execution.
///
/// `Running → Halted(_) | Trapped(_)`; both right-hand states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExecutionStatus {
    #[default]
    Running,
    Halted(HaltReason),
    Trapped(TrapReason),
}

impl ExecutionStatus {
    /// Returns true once no further host operation may be accepted.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns true if the execution ended in a trap.
    pub fn is_trapped(self) -> bool {
        matches!(self, Self::Trapped(_))
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Halted(HaltReason::Return) => write!(f, "halted (return)"),
            Self::Halted(HaltReason::SelfDestruct) => write!(f, "halted (self-destruct)"),
            Self::Trapped(reason) => write!(f, "trapped ({})", reason),
        }
    }
}
