//! Gas schedule for the host-binding layer.
//!
//! Every value here is consensus-relevant and must match the protocol
//! schedule bit-for-bit. Base costs per operation live in the
//! [`HostOp`](crate::op::HostOp) table; this module holds the shared
//! constants and the dynamic surcharge formulas.

// ── Base costs ──

/// Base cost of the cheap environment getters.
pub const G_BASE: u64 = 2;

/// Base cost of account lookups (`getBalance`, `getExternalCodeSize`, `getBlockHash`).
pub const G_ACCOUNT_LOOKUP: u64 = 20;

/// Base cost of `callDataCopy256`.
pub const G_COPY_WORD: u64 = 3;

/// Base cost of `create`.
pub const G_CREATE: u64 = 32_000;

/// Base cost of `call`, `callCode` and `callDelegate`.
pub const G_CALL: u64 = 40;

/// Base cost of `storageStore`.
pub const G_SSTORE: u64 = 5_000;

/// Base cost of `storageLoad`.
pub const G_SLOAD: u64 = 50;

// ── Dynamic surcharges ──

/// Fixed part of a memory copy surcharge.
pub const G_COPY: u64 = 3;

/// Fixed part of the `externalCodeCopy` surcharge.
pub const G_EXTERNAL_COPY: u64 = 20;

/// Per-32-byte-word part of any copy surcharge.
pub const G_COPY_PER_WORD: u64 = 3;

/// Fixed part of the `log` cost.
pub const G_LOG: u64 = 375;

/// Per-byte part of the `log` cost.
pub const G_LOG_DATA: u64 = 8;

/// Per-topic part of the `log` cost.
pub const G_LOG_TOPIC: u64 = 375;

/// Maximum number of topics a single log may carry.
pub const MAX_LOG_TOPICS: u32 = 4;

// ── Sub-calls ──

/// Surcharge for a `call` that transfers a non-zero value.
pub const G_CALL_VALUE: u64 = 9_000;

/// Gas stipend credited back against the value-transfer surcharge.
pub const G_CALL_STIPEND: u64 = 2_300;

/// Surcharge for a `callCode` that carries a non-zero value.
pub const G_CALLCODE_VALUE: u64 = G_CALL_VALUE - G_CALL_STIPEND;

/// Penalty charged to the caller when a `call` comes back with an exception.
pub const G_CALL_EXCEPTION: u64 = 25_000;

// ── Storage and refunds ──

/// Extra charge when a storage slot goes from absent/zero to non-zero.
pub const G_SSTORE_SET: u64 = 15_000;

/// Refund when a non-zero storage slot is cleared.
pub const R_SSTORE_CLEAR: u64 = 15_000;

/// Refund for `selfDestruct`.
pub const R_SELF_DESTRUCT: u64 = 24_000;

/// Number of recent blocks whose hashes `getBlockHash` may return.
pub const BLOCK_HASH_WINDOW: u64 = 256;

/// Number of 32-byte words needed to hold `length` bytes.
pub fn words(length: u64) -> u64 {
    length.div_ceil(32)
}

/// Surcharge for copying `length` bytes into memory: `3 + ceil(length/32)*3`.
pub fn copy_cost(length: u64) -> u64 {
    G_COPY.saturating_add(words(length).saturating_mul(G_COPY_PER_WORD))
}

/// Surcharge for `externalCodeCopy`: `20 + ceil(length/32)*3`.
pub fn external_copy_cost(length: u64) -> u64 {
    G_EXTERNAL_COPY.saturating_add(words(length).saturating_mul(G_COPY_PER_WORD))
}

/// Cost of a `log`: `375 + 8*length + 375*topics`.
pub fn log_cost(length: u64, topics: u32) -> u64 {
    G_LOG
        .saturating_add(length.saturating_mul(G_LOG_DATA))
        .saturating_add(u64::from(topics).saturating_mul(G_LOG_TOPIC))
}
