//! The host operation table.
//!
//! Each [`HostOp`] is one callable the sandboxed code may import. The table
//! fixes, per operation, its import name, base gas cost, argument layout and
//! result layout. The host charges the base cost before running the handler;
//! dynamic surcharges are charged by the handler itself.

use std::fmt;

use crate::gas::*;

/// Wasm value kind of one argument or result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    I32,
    I64,
}

use ArgKind::{I32, I64};

/// One protocol-defined host operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOp {
    GetAddress,
    GetBalance,
    GetTxOrigin,
    GetCaller,
    GetCallValue,
    GetCallDataSize,
    CallDataCopy,
    CallDataCopy256,
    GetCodeSize,
    CodeCopy,
    GetExternalCodeSize,
    ExternalCodeCopy,
    GetTxGasPrice,
    GetBlockHash,
    GetBlockCoinbase,
    GetBlockTimestamp,
    GetBlockNumber,
    GetBlockDifficulty,
    GetBlockGasLimit,
    Log,
    Create,
    Call,
    CallCode,
    CallDelegate,
    StorageStore,
    StorageLoad,
    Return,
    SelfDestruct,
}

impl HostOp {
    /// Every operation, in table order.
    pub const ALL: [HostOp; 28] = [
        HostOp::GetAddress,
        HostOp::GetBalance,
        HostOp::GetTxOrigin,
        HostOp::GetCaller,
        HostOp::GetCallValue,
        HostOp::GetCallDataSize,
        HostOp::CallDataCopy,
        HostOp::CallDataCopy256,
        HostOp::GetCodeSize,
        HostOp::CodeCopy,
        HostOp::GetExternalCodeSize,
        HostOp::ExternalCodeCopy,
        HostOp::GetTxGasPrice,
        HostOp::GetBlockHash,
        HostOp::GetBlockCoinbase,
        HostOp::GetBlockTimestamp,
        HostOp::GetBlockNumber,
        HostOp::GetBlockDifficulty,
        HostOp::GetBlockGasLimit,
        HostOp::Log,
        HostOp::Create,
        HostOp::Call,
        HostOp::CallCode,
        HostOp::CallDelegate,
        HostOp::StorageStore,
        HostOp::StorageLoad,
        HostOp::Return,
        HostOp::SelfDestruct,
    ];

    /// Import name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetAddress => "getAddress",
            Self::GetBalance => "getBalance",
            Self::GetTxOrigin => "getTxOrigin",
            Self::GetCaller => "getCaller",
            Self::GetCallValue => "getCallValue",
            Self::GetCallDataSize => "getCallDataSize",
            Self::CallDataCopy => "callDataCopy",
            Self::CallDataCopy256 => "callDataCopy256",
            Self::GetCodeSize => "getCodeSize",
            Self::CodeCopy => "codeCopy",
            Self::GetExternalCodeSize => "getExternalCodeSize",
            Self::ExternalCodeCopy => "externalCodeCopy",
            Self::GetTxGasPrice => "getTxGasPrice",
            Self::GetBlockHash => "getBlockHash",
            Self::GetBlockCoinbase => "getBlockCoinbase",
            Self::GetBlockTimestamp => "getBlockTimestamp",
            Self::GetBlockNumber => "getBlockNumber",
            Self::GetBlockDifficulty => "getBlockDifficulty",
            Self::GetBlockGasLimit => "getBlockGasLimit",
            Self::Log => "log",
            Self::Create => "create",
            Self::Call => "call",
            Self::CallCode => "callCode",
            Self::CallDelegate => "callDelegate",
            Self::StorageStore => "storageStore",
            Self::StorageLoad => "storageLoad",
            Self::Return => "return",
            Self::SelfDestruct => "selfDestruct",
        }
    }

    /// Look up an operation by its import name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Gas charged before the handler runs.
    pub fn base_cost(self) -> u64 {
        match self {
            Self::GetAddress
            | Self::GetTxOrigin
            | Self::GetCaller
            | Self::GetCallValue
            | Self::GetCallDataSize
            | Self::GetCodeSize
            | Self::GetTxGasPrice
            | Self::GetBlockCoinbase
            | Self::GetBlockTimestamp
            | Self::GetBlockNumber
            | Self::GetBlockDifficulty
            | Self::GetBlockGasLimit
            | Self::Return
            | Self::SelfDestruct => G_BASE,
            Self::GetBalance | Self::GetExternalCodeSize | Self::GetBlockHash => G_ACCOUNT_LOOKUP,
            Self::CallDataCopy256 => G_COPY_WORD,
            Self::CallDataCopy | Self::CodeCopy | Self::ExternalCodeCopy | Self::Log => 0,
            Self::Create => G_CREATE,
            Self::Call | Self::CallCode | Self::CallDelegate => G_CALL,
            Self::StorageStore => G_SSTORE,
            Self::StorageLoad => G_SLOAD,
        }
    }

    /// Argument layout, in call order.
    pub fn params(self) -> &'static [ArgKind] {
        match self {
            Self::GetAddress
            | Self::GetTxOrigin
            | Self::GetCaller
            | Self::GetCallValue
            | Self::GetBlockCoinbase
            | Self::GetBlockDifficulty
            | Self::SelfDestruct => &[I32],
            Self::GetCallDataSize
            | Self::GetCodeSize
            | Self::GetTxGasPrice
            | Self::GetBlockTimestamp
            | Self::GetBlockNumber
            | Self::GetBlockGasLimit => &[],
            // (addressOffset, resultOffset)
            Self::GetBalance => &[I32, I32],
            // (resultOffset, dataOffset, length)
            Self::CallDataCopy | Self::CodeCopy => &[I32, I32, I32],
            // (resultOffset, dataOffset)
            Self::CallDataCopy256 => &[I32, I32],
            // (addressOffset)
            Self::GetExternalCodeSize => &[I32],
            // (addressOffset, resultOffset, codeOffset, length)
            Self::ExternalCodeCopy => &[I32, I32, I32, I32],
            // (number, resultOffset)
            Self::GetBlockHash => &[I64, I32],
            // (dataOffset, length, numberOfTopics, topic1..4)
            Self::Log => &[I32, I32, I32, I32, I32, I32, I32],
            // (valueOffset, dataOffset, length, resultOffset)
            Self::Create => &[I32, I32, I32, I32],
            // (gas, addressOffset, valueOffset, dataOffset, dataLength, resultOffset, resultLength)
            Self::Call | Self::CallCode => &[I64, I32, I32, I32, I32, I32, I32],
            // (gas, addressOffset, dataOffset, dataLength, resultOffset, resultLength)
            Self::CallDelegate => &[I64, I32, I32, I32, I32, I32],
            // (pathOffset, valueOffset) / (pathOffset, resultOffset)
            Self::StorageStore | Self::StorageLoad => &[I32, I32],
            // (offset, length)
            Self::Return => &[I32, I32],
        }
    }

    /// Result layout, if the operation returns a value to the guest.
    pub fn result(self) -> Option<ArgKind> {
        match self {
            Self::GetCallDataSize
            | Self::GetCodeSize
            | Self::GetExternalCodeSize
            | Self::Create
            | Self::Call
            | Self::CallCode
            | Self::CallDelegate => Some(I32),
            Self::GetTxGasPrice
            | Self::GetBlockTimestamp
            | Self::GetBlockNumber
            | Self::GetBlockGasLimit => Some(I64),
            _ => None,
        }
    }

    /// Returns true if the operation may suspend on the state tree or kernel.
    pub fn suspends(self) -> bool {
        matches!(
            self,
            Self::GetBalance
                | Self::GetCodeSize
                | Self::CodeCopy
                | Self::GetExternalCodeSize
                | Self::ExternalCodeCopy
                | Self::GetBlockHash
                | Self::StorageStore
                | Self::StorageLoad
                | Self::Create
                | Self::Call
                | Self::CallCode
                | Self::CallDelegate
        )
    }
}

impl fmt::Display for HostOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
