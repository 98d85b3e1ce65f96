//! Path-addressed access to account fields, storage and block hashes.
//!
//! Every read goes through the [`StateTree`] and may suspend. Read
//! failures never reach the guest: each lookup substitutes a fixed default
//! and reports that it did so through [`Lookup::Default`].
//!
//! | lookup | default |
//! |---|---|
//! | balance | 0 (16 zero bytes in memory) |
//! | code | empty |
//! | storage slot | 32 zero bytes |
//! | block hash | 32 zero bytes |
//!
//! Block hashes outside the most recent [`BLOCK_HASH_WINDOW`] blocks are
//! answered with the default without consulting the tree.

use std::sync::Arc;

use eei_primitives::gas::BLOCK_HASH_WINDOW;
use eei_primitives::path::{BALANCE, CODE, STORAGE};
use eei_primitives::types::{is_zero, u128_from_bytes, ZERO_WORD};
use eei_primitives::{Address, Hash, Path, Segment, Word};
use tracing::{trace, warn};

use crate::error::{HostError, HostResult, StateError};
use crate::state_tree::StateTree;

/// Outcome of a soft-fail lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The tree answered.
    Found(T),
    /// The tree could not answer; the documented default is carried instead.
    Default(T),
}

impl<T> Lookup<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Found(v) | Self::Default(v) => v,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Found(v) | Self::Default(v) => v,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Effect of a `storageStore`, decided from the slot's prior value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageWrite {
    /// Empty slot receives a non-zero value. Costs an extra `G_SSTORE_SET`.
    Create,
    /// Non-zero slot receives another non-zero value.
    Update,
    /// Non-zero slot is zeroed. The slot is deleted and `R_SSTORE_CLEAR` refunded.
    Clear,
    /// Empty slot is zeroed. The slot is deleted without refund.
    Noop,
}

impl StorageWrite {
    /// Classify a write of `new` over `old`. An all-zero stored value counts
    /// as an empty slot.
    pub fn classify(old: &Lookup<Word>, new: &Word) -> Self {
        let existed = old.is_found() && !is_zero(old.value());
        match (existed, is_zero(new)) {
            (false, false) => Self::Create,
            (true, false) => Self::Update,
            (true, true) => Self::Clear,
            (false, true) => Self::Noop,
        }
    }
}

/// State tree access scoped to one execution.
#[derive(Clone)]
pub struct StateAccessor {
    tree: Arc<dyn StateTree>,
    /// Path of the running code (`accounts / <address> / code`).
    path: Path,
}

impl std::fmt::Debug for StateAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateAccessor")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl StateAccessor {
    pub fn new(tree: Arc<dyn StateTree>, path: Path) -> Self {
        Self { tree, path }
    }

    /// Raw read of `path`.
    pub async fn get(&self, path: &Path) -> Result<Vec<u8>, StateError> {
        self.tree.get(path).await
    }

    /// Raw write of `path`. A tree that refuses a write is an embedder
    /// fault, not a guest-visible outcome.
    pub fn set(&self, path: &Path, value: Vec<u8>) -> HostResult<()> {
        self.tree
            .set(path, value)
            .map_err(|e| HostError::Internal(e.to_string()))
    }

    /// Raw delete of `path`.
    pub fn delete(&self, path: &Path) -> HostResult<()> {
        self.tree
            .delete(path)
            .map_err(|e| HostError::Internal(e.to_string()))
    }

    /// Path of `target`'s account, resolved relative to the running code.
    pub fn account_path(&self, target: &Address) -> Path {
        self.path.sibling_account(target)
    }

    /// Balance of `target`. Missing or malformed balances read as zero.
    pub async fn balance(&self, target: &Address) -> Lookup<u128> {
        let path = self.account_path(target).child(BALANCE);
        match self.tree.get(&path).await {
            Ok(bytes) => match u128_from_bytes(&bytes) {
                Some(balance) => Lookup::Found(balance),
                None => {
                    warn!(path = %path, len = bytes.len(), "balance wider than 128 bits");
                    Lookup::Default(0)
                }
            },
            Err(e) => {
                trace!(path = %path, error = %e, "balance defaulted to zero");
                Lookup::Default(0)
            }
        }
    }

    /// Code of the running account.
    pub async fn own_code(&self) -> Lookup<Vec<u8>> {
        let path = self.path.clone();
        self.code_at(&path).await
    }

    /// Code of `target`.
    pub async fn external_code(&self, target: &Address) -> Lookup<Vec<u8>> {
        let path = self.account_path(target).child(CODE);
        self.code_at(&path).await
    }

    async fn code_at(&self, path: &Path) -> Lookup<Vec<u8>> {
        match self.tree.get(path).await {
            Ok(code) => Lookup::Found(code),
            Err(e) => {
                trace!(path = %path, error = %e, "code defaulted to empty");
                Lookup::Default(Vec::new())
            }
        }
    }

    /// `accounts / <self> / storage / <hex key>`
    pub fn storage_path(&self, key: &Word) -> Path {
        let account = self
            .path
            .account_root()
            .unwrap_or_else(|| self.path.resolve(&[Segment::Parent]));
        account.child(STORAGE).child(hex::encode(key))
    }

    /// Value of storage slot `key`; unset slots read as 32 zero bytes.
    pub async fn storage_load(&self, key: &Word) -> Lookup<Word> {
        let path = self.storage_path(key);
        match self.tree.get(&path).await {
            Ok(bytes) if bytes.len() == ZERO_WORD.len() => {
                let mut word = ZERO_WORD;
                word.copy_from_slice(&bytes);
                Lookup::Found(word)
            }
            Ok(bytes) => {
                warn!(path = %path, len = bytes.len(), "storage value is not 32 bytes");
                Lookup::Default(ZERO_WORD)
            }
            Err(e) => {
                trace!(path = %path, error = %e, "storage slot defaulted to zero");
                Lookup::Default(ZERO_WORD)
            }
        }
    }

    /// Apply a classified storage write.
    pub fn storage_apply(&self, key: &Word, value: &Word, write: StorageWrite) -> HostResult<()> {
        let path = self.storage_path(key);
        match write {
            StorageWrite::Create | StorageWrite::Update => self.set(&path, value.to_vec()),
            StorageWrite::Clear | StorageWrite::Noop => self.delete(&path),
        }
    }

    /// Hash of block `number`, as seen from block `current`.
    ///
    /// Only the [`BLOCK_HASH_WINDOW`] blocks strictly before `current` are
    /// looked up; anything else is zero without a tree query.
    pub async fn block_hash(&self, current: u64, number: i64) -> Lookup<Hash> {
        let distance = i128::from(current) - i128::from(number);
        let number = match u64::try_from(number) {
            Ok(n) if distance > 0 && distance <= i128::from(BLOCK_HASH_WINDOW) => n,
            _ => {
                trace!(current, number, "block hash outside window");
                return Lookup::Default(ZERO_WORD);
            }
        };
        let path = Path::block(number);
        match self.tree.hash(&path).await {
            Ok(hash) => Lookup::Found(hash),
            Err(e) => {
                trace!(path = %path, error = %e, "block hash defaulted to zero");
                Lookup::Default(ZERO_WORD)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem_tree::MemTree;

    const SELF_ADDR: Address = [0x11; 20];
    const OTHER: Address = [0x22; 20];

    fn setup() -> (Arc<MemTree>, StateAccessor) {
        let tree = Arc::new(MemTree::new());
        let accessor = StateAccessor::new(tree.clone(), Path::account_field(&SELF_ADDR, CODE));
        (tree, accessor)
    }

    #[tokio::test]
    async fn test_balance_found_and_default() {
        let (tree, state) = setup();
        tree.insert_account(&OTHER, 1234, 0, vec![]);
        assert_eq!(state.balance(&OTHER).await, Lookup::Found(1234));
        assert_eq!(state.balance(&[0x33; 20]).await, Lookup::Default(0));
    }

    #[tokio::test]
    async fn test_oversized_balance_defaults() {
        let (tree, state) = setup();
        tree.insert(Path::account_field(&OTHER, BALANCE), vec![1; 17]);
        assert_eq!(state.balance(&OTHER).await, Lookup::Default(0));
    }

    #[tokio::test]
    async fn test_code_lookups() {
        let (tree, state) = setup();
        tree.insert(Path::account_field(&SELF_ADDR, CODE), vec![0, 0x61, 0x73, 0x6d]);
        tree.insert(Path::account_field(&OTHER, CODE), vec![7; 10]);

        assert_eq!(state.own_code().await.into_inner().len(), 4);
        assert_eq!(state.external_code(&OTHER).await, Lookup::Found(vec![7; 10]));
        assert_eq!(state.external_code(&[0x44; 20]).await, Lookup::Default(vec![]));
    }

    #[test]
    fn test_storage_path_layout() {
        let (_, state) = setup();
        let mut key = ZERO_WORD;
        key[31] = 1;
        let path = state.storage_path(&key);
        assert_eq!(
            path,
            Path::account(&SELF_ADDR)
                .child(STORAGE)
                .child(format!("{}01", "00".repeat(31)))
        );
    }

    #[tokio::test]
    async fn test_storage_roundtrip() {
        let (_, state) = setup();
        let key = [5u8; 32];
        let value = [9u8; 32];
        assert_eq!(state.storage_load(&key).await, Lookup::Default(ZERO_WORD));

        state.storage_apply(&key, &value, StorageWrite::Create).unwrap();
        assert_eq!(state.storage_load(&key).await, Lookup::Found(value));

        state.storage_apply(&key, &ZERO_WORD, StorageWrite::Clear).unwrap();
        assert_eq!(state.storage_load(&key).await, Lookup::Default(ZERO_WORD));
    }

    #[test]
    fn test_classify_storage_write() {
        let nonzero = [1u8; 32];
        let absent = Lookup::Default(ZERO_WORD);
        let stored_zero = Lookup::Found(ZERO_WORD);
        let stored = Lookup::Found(nonzero);

        assert_eq!(StorageWrite::classify(&absent, &nonzero), StorageWrite::Create);
        assert_eq!(StorageWrite::classify(&stored_zero, &nonzero), StorageWrite::Create);
        assert_eq!(StorageWrite::classify(&stored, &[2u8; 32]), StorageWrite::Update);
        assert_eq!(StorageWrite::classify(&stored, &ZERO_WORD), StorageWrite::Clear);
        assert_eq!(StorageWrite::classify(&absent, &ZERO_WORD), StorageWrite::Noop);
    }

    #[tokio::test]
    async fn test_block_hash_window() {
        let (tree, state) = setup();
        tree.insert(Path::block(744), b"block 744".to_vec());
        tree.insert(Path::block(1000), b"block 1000".to_vec());

        // distance 256: inside
        let hash = state.block_hash(1000, 744).await;
        assert_eq!(hash, Lookup::Found(*blake3::hash(b"block 744").as_bytes()));
        assert_eq!(tree.reads(), 1);

        // distance 257, 0 and negative: zero without a query
        assert_eq!(state.block_hash(1000, 743).await, Lookup::Default(ZERO_WORD));
        assert_eq!(state.block_hash(1000, 1000).await, Lookup::Default(ZERO_WORD));
        assert_eq!(state.block_hash(1000, 1001).await, Lookup::Default(ZERO_WORD));
        assert_eq!(state.block_hash(1000, i64::MIN).await, Lookup::Default(ZERO_WORD));
        assert_eq!(state.block_hash(10, -5).await, Lookup::Default(ZERO_WORD));
        assert_eq!(tree.reads(), 1);

        // inside the window but absent
        assert_eq!(state.block_hash(1000, 999).await, Lookup::Default(ZERO_WORD));
        assert_eq!(tree.reads(), 2);
    }
}
