//! Accumulated result of one execution and its terminal-state machine.
//!
//! ```text
//! Running ─┬─> Halted(Return)
//!          ├─> Halted(SelfDestruct)
//!          └─> Trapped(OutOfGas | MemoryFault | InvalidArgument)
//! ```
//!
//! Once terminal, the collector rejects every mutation and the result is
//! frozen.

use eei_primitives::{
    Address, ExecutionResult, ExecutionStatus, HaltReason, Log, TrapReason,
};
use tracing::debug;

use crate::error::{HostError, HostResult};

#[derive(Debug, Default)]
pub struct ResultCollector {
    status: ExecutionStatus,
    result: ExecutionResult,
    logs: Vec<Log>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status
    }

    pub fn result(&self) -> &ExecutionResult {
        &self.result
    }

    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// `Err(Terminated)` once the execution has halted or trapped.
    pub fn ensure_running(&self) -> HostResult<()> {
        if self.status.is_terminal() {
            return Err(HostError::Terminated(self.status));
        }
        Ok(())
    }

    /// Halt with `value` as the return data. `None` keeps any earlier value.
    pub fn halt_return(&mut self, value: Option<Vec<u8>>) -> HostResult<()> {
        self.ensure_running()?;
        if let Some(value) = value {
            self.result.return_value = value;
        }
        self.transition(ExecutionStatus::Halted(HaltReason::Return));
        Ok(())
    }

    /// Append a log entry.
    pub fn log(&mut self, log: Log) -> HostResult<()> {
        self.ensure_running()?;
        self.logs.push(log);
        Ok(())
    }

    /// Record the self-destruct beneficiary and halt.
    pub fn self_destruct(&mut self, beneficiary: Address) -> HostResult<()> {
        self.ensure_running()?;
        self.result.self_destruct = true;
        self.result.self_destruct_address = Some(beneficiary);
        self.transition(ExecutionStatus::Halted(HaltReason::SelfDestruct));
        Ok(())
    }

    /// Abort the execution. A no-op if already terminal.
    pub fn trap(&mut self, reason: TrapReason) {
        if self.status.is_terminal() {
            return;
        }
        self.result.exception = true;
        self.transition(ExecutionStatus::Trapped(reason));
    }

    /// Close out the execution: a still-running one halts with `Return`.
    pub fn finish(mut self, gas_refund: u64) -> (ExecutionStatus, ExecutionResult, Vec<Log>) {
        if !self.status.is_terminal() {
            self.transition(ExecutionStatus::Halted(HaltReason::Return));
        }
        self.result.gas_refund = gas_refund;
        (self.status, self.result, self.logs)
    }

    fn transition(&mut self, to: ExecutionStatus) {
        debug!(from = %self.status, to = %to, "execution status");
        self.status = to;
    }
}
