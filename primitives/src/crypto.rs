//! Deterministic contract address derivation.
//!
//! The exact hash and encoding are fixed by the protocol; this module only
//! adapts the external primitive to the crate's byte-array types.

use crate::types::Address;

/// Address of the contract created by `creator` at `nonce`:
/// the low 20 bytes of `keccak256(rlp([creator, nonce]))`.
pub fn create_address(creator: &Address, nonce: u64) -> Address {
    let derived = alloy_primitives::Address::from(*creator).create(nonce);
    derived.0 .0
}
