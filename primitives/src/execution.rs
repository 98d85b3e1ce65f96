//! Execution boundary types: messages, kernel responses, logs and results.
//!
//! A [`Message`] is created per call (transaction or nested sub-call) and
//! lives until that call completes. Only the gas meter may draw down the
//! gas it carries. The routing kernel answers every message it dispatches
//! with a [`Response`].

use serde::{Deserialize, Serialize};

use crate::error::ExecutionStatus;
use crate::path::Path;
use crate::types::{Address, Word, ZERO_ADDRESS, ZERO_WORD};

/// Header fields of the block the execution runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub number: u64,
    pub timestamp: u64,
    pub difficulty: Word,
    pub gas_limit: u64,
    pub coinbase: Address,
}

impl Default for BlockInfo {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 0,
            difficulty: ZERO_WORD,
            gas_limit: 0,
            coinbase: ZERO_ADDRESS,
        }
    }
}

/// Flavor of a dispatched message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CallKind {
    /// Plain message call into the target account.
    #[default]
    Call,
    /// Run the target's code preserving the caller's sender and value.
    Delegate,
}

/// A call into an account, as handed to the routing kernel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Path of the code being executed (`accounts / <address> / code`).
    pub to: Path,
    /// Path of the account directly responsible for this call.
    pub from: Path,
    /// Path of the account that signed the originating transaction.
    pub origin: Path,
    /// Value transferred with the call.
    pub value: u128,
    /// Call data.
    pub data: Vec<u8>,
    /// Gas available to the callee.
    pub gas: u64,
    /// Gas price of the originating transaction.
    pub gas_price: u64,
    /// Nonce of the executing account, used for contract address derivation.
    pub nonce: u64,
    /// Block the execution runs in.
    pub block: BlockInfo,
    pub kind: CallKind,
    /// Whether the sender waits synchronously for the response.
    pub sync: bool,
}

impl Message {
    /// A message with empty data, zero value and default block context.
    pub fn new(to: Path, from: Path, gas: u64) -> Self {
        Self {
            to,
            origin: from.clone(),
            from,
            value: 0,
            data: Vec::new(),
            gas,
            gas_price: 0,
            nonce: 0,
            block: BlockInfo::default(),
            kind: CallKind::Call,
            sync: false,
        }
    }
}

/// Kernel response to a dispatched message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// The callee trapped.
    pub exception: bool,
    /// Bytes the callee returned.
    pub return_value: Vec<u8>,
}

impl Response {
    /// A successful response carrying `return_value`.
    pub fn success(return_value: Vec<u8>) -> Self {
        Self {
            exception: false,
            return_value,
        }
    }

    /// A response reporting that the callee trapped.
    pub fn exception() -> Self {
        Self {
            exception: true,
            return_value: Vec::new(),
        }
    }
}

/// A log entry emitted by the execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub data: Vec<u8>,
    /// Up to four topics, in argument order.
    pub topics: Vec<Word>,
}

/// Accumulated result of one execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub return_value: Vec<u8>,
    /// Gas credited back to the caller at the end of the execution.
    pub gas_refund: u64,
    pub self_destruct: bool,
    /// Beneficiary of the self-destruct, if any.
    pub self_destruct_address: Option<Address>,
    /// Set when the execution trapped.
    pub exception: bool,
}

/// Final report of one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Terminal status (never `Running`).
    pub status: ExecutionStatus,
    pub result: ExecutionResult,
    /// Logs in emission order.
    pub logs: Vec<Log>,
    /// Gas left unspent.
    pub gas_left: u64,
    /// Gas consumed out of the message's allowance.
    pub gas_used: u64,
}
