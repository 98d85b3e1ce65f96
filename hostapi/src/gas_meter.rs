//! Per-execution gas meter.
//!
//! The `GasMeter` is the authoritative gas counter for one execution. It
//! starts from the gas carried by the message and is the only thing that
//! draws that allowance down. It also accumulates the refund counter.
//!
//! Charges are checked before applying, so on error the remaining gas is
//! unchanged.

use crate::error::HostError;

/// Remaining-gas and refund accounting for one execution.
#[derive(Debug, Clone)]
pub struct GasMeter {
    limit: u64,
    remaining: u64,
    refund: u64,
}

impl GasMeter {
    /// Create a meter holding `limit` gas.
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
            refund: 0,
        }
    }

    /// Charge gas. Returns `Err(OutOfGas)` if `remaining < amount`.
    pub fn charge(&mut self, amount: u64) -> Result<(), HostError> {
        if self.remaining < amount {
            return Err(HostError::out_of_gas());
        }
        self.remaining -= amount;
        Ok(())
    }

    /// Give back gas taken by an earlier charge.
    ///
    /// Used by the value-transfer path of `call`, which charges the callee's
    /// requested gas together with the surcharge and then returns it.
    pub fn restore(&mut self, amount: u64) {
        self.remaining = self.remaining.saturating_add(amount);
    }

    /// Add to the refund counter. No cap is applied here.
    pub fn refund(&mut self, amount: u64) {
        self.refund = self.refund.saturating_add(amount);
    }

    /// Gas left to spend.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Gas consumed out of the initial allowance.
    pub fn used(&self) -> u64 {
        self.limit.saturating_sub(self.remaining)
    }

    /// The initial allowance.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Total of all refunds so far.
    pub fn refund_total(&self) -> u64 {
        self.refund
    }
}
