//! In-memory state tree for testing.
//!
//! `MemTree` implements `StateTree` using a `BTreeMap` keyed by `Path` for
//! deterministic ordering. Node hashes are BLAKE3 digests of the stored
//! value. Every `get`/`hash` call is counted so tests can assert that an
//! operation did or did not consult the tree.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use eei_primitives::path::{BALANCE, CODE, NONCE};
use eei_primitives::types::u128_to_bytes;
use eei_primitives::{Address, Hash, Path};

use crate::error::StateError;
use crate::state_tree::StateTree;

/// In-memory state tree backed by `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemTree {
    data: RwLock<BTreeMap<Path, Vec<u8>>>,
    reads: AtomicU64,
}

impl MemTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree pre-populated with data.
    pub fn with_data(data: BTreeMap<Path, Vec<u8>>) -> Self {
        Self {
            data: RwLock::new(data),
            reads: AtomicU64::new(0),
        }
    }

    /// Insert a value directly, bypassing the async interface.
    pub fn insert(&self, path: Path, value: Vec<u8>) {
        self.write_map().insert(path, value);
    }

    /// Seed an account's balance, nonce and code.
    pub fn insert_account(&self, address: &Address, balance: u128, nonce: u64, code: Vec<u8>) {
        let mut map = self.write_map();
        map.insert(Path::account_field(address, BALANCE), u128_to_bytes(balance).to_vec());
        map.insert(Path::account_field(address, NONCE), nonce.to_be_bytes().to_vec());
        map.insert(Path::account_field(address, CODE), code);
    }

    /// Current value at `path`, without counting a read.
    pub fn peek(&self, path: &Path) -> Option<Vec<u8>> {
        self.read_map().get(path).cloned()
    }

    /// Number of `get`/`hash` calls served so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    /// Returns true if the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    fn read_map(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<Path, Vec<u8>>> {
        // A poisoned lock only means a test panicked mid-write; the map is still usable.
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_map(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<Path, Vec<u8>>> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }

    fn lookup(&self, path: &Path) -> Result<Vec<u8>, StateError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.read_map()
            .get(path)
            .cloned()
            .ok_or_else(|| StateError::NotFound(path.clone()))
    }
}

#[async_trait]
impl StateTree for MemTree {
    async fn get(&self, path: &Path) -> Result<Vec<u8>, StateError> {
        self.lookup(path)
    }

    async fn hash(&self, path: &Path) -> Result<Hash, StateError> {
        let value = self.lookup(path)?;
        Ok(*blake3::hash(&value).as_bytes())
    }

    fn set(&self, path: &Path, value: Vec<u8>) -> Result<(), StateError> {
        self.write_map().insert(path.clone(), value);
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<(), StateError> {
        self.write_map().remove(path);
        Ok(())
    }
}
