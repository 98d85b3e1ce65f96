//! Read-only view of the current message and block.
//!
//! The environment getters (`getAddress`, `getCaller`, `getCallValue`,
//! `getBlock*`, ...) are served from here by direct field copy. Nothing in
//! this module touches the state tree.

use eei_primitives::{Address, BlockInfo, Message, Path};
use eei_primitives::types::ZERO_ADDRESS;

/// Immutable projection of the message driving one execution.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    message: Message,
    address: Address,
    caller: Address,
    origin: Address,
}

impl ExecutionContext {
    /// Build the context for `message`.
    ///
    /// Paths that do not name an account resolve to the zero address.
    pub fn new(message: Message) -> Self {
        let address = message.to.account_address().unwrap_or(ZERO_ADDRESS);
        let caller = message.from.account_address().unwrap_or(ZERO_ADDRESS);
        let origin = message.origin.account_address().unwrap_or(ZERO_ADDRESS);
        Self {
            message,
            address,
            caller,
            origin,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Path of the running code; relative lookups resolve against it.
    pub fn path(&self) -> &Path {
        &self.message.to
    }

    /// Address of the executing account.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Address directly responsible for this execution.
    pub fn caller(&self) -> &Address {
        &self.caller
    }

    /// Sender of the originating transaction.
    pub fn origin(&self) -> &Address {
        &self.origin
    }

    pub fn call_value(&self) -> u128 {
        self.message.value
    }

    pub fn call_data(&self) -> &[u8] {
        &self.message.data
    }

    pub fn gas_price(&self) -> u64 {
        self.message.gas_price
    }

    pub fn nonce(&self) -> u64 {
        self.message.nonce
    }

    pub fn block(&self) -> &BlockInfo {
        &self.message.block
    }
}
