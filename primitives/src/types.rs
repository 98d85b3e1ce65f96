//! Core type aliases, sizes, and byte encodings for the host-binding layer.
//!
//! These types are shared by the host interface and the sandbox binding.

/// 20-byte account address.
pub type Address = [u8; 20];

/// 256-bit word: storage keys, storage values, log topics, difficulty.
pub type Word = [u8; 32];

/// 32-byte content hash returned by the state tree.
pub type Hash = [u8; 32];

/// Size of a 128-bit value (balances, call values) in execution memory.
pub const U128_SIZE_BYTES: usize = 16;

/// Size of an account address in execution memory.
pub const ADDRESS_SIZE_BYTES: usize = 20;

/// Size of a 256-bit word in execution memory.
pub const U256_SIZE_BYTES: usize = 32;

/// The all-zero address, written by `create` when the transfer is refused.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// The all-zero word.
pub const ZERO_WORD: Word = [0u8; 32];

/// Render an address as a state tree key: lowercase hex, no `0x` prefix.
pub fn address_to_key(address: &Address) -> String {
    hex::encode(address)
}

/// Render an address for display and memory copies: lowercase hex with `0x`.
pub fn address_to_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Parse an address from hex, with or without the `0x` prefix.
///
/// Returns `None` unless the input decodes to exactly 20 bytes.
pub fn address_from_hex(s: &str) -> Option<Address> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).ok()?;
    bytes.try_into().ok()
}

/// Encode a 128-bit value as it appears in execution memory (16 bytes, big-endian).
pub fn u128_to_bytes(value: u128) -> [u8; U128_SIZE_BYTES] {
    value.to_be_bytes()
}

/// Decode a big-endian value of at most 16 bytes, left-padding shorter input.
///
/// An empty slice decodes to zero. Returns `None` for slices longer than 16 bytes.
pub fn u128_from_bytes(bytes: &[u8]) -> Option<u128> {
    if bytes.len() > U128_SIZE_BYTES {
        return None;
    }
    let mut buf = [0u8; U128_SIZE_BYTES];
    buf[U128_SIZE_BYTES - bytes.len()..].copy_from_slice(bytes);
    Some(u128::from_be_bytes(buf))
}

/// Returns true if every byte of `bytes` is zero (the empty slice included).
pub fn is_zero(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| *b == 0)
}
