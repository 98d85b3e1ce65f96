//! Abstraction over the global state tree.
//!
//! The tree is a content-addressed key/value store shared by every
//! execution. Reads may suspend the calling execution until the tree
//! answers; writes are path-scoped and merging concurrent writes from
//! sibling executions is the tree's responsibility.
//!
//! Implementations:
//! - `MemTree` (this crate): in-memory tree for testing
//! - production trees are provided by the embedding node

use async_trait::async_trait;
use eei_primitives::{Hash, Path};

use crate::error::StateError;

/// Path-addressed access to authoritative state.
#[async_trait]
pub trait StateTree: Send + Sync {
    /// Read the value stored at `path`.
    ///
    /// Returns `Err(StateError::NotFound)` if nothing is stored there.
    async fn get(&self, path: &Path) -> Result<Vec<u8>, StateError>;

    /// Content hash of the node at `path`.
    async fn hash(&self, path: &Path) -> Result<Hash, StateError>;

    /// Store `value` at `path`, replacing any previous value.
    fn set(&self, path: &Path, value: Vec<u8>) -> Result<(), StateError>;

    /// Remove the value at `path`. Removing an absent path is not an error.
    fn delete(&self, path: &Path) -> Result<(), StateError>;
}
