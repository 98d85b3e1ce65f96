//! Hierarchical paths into the global state tree.
//!
//! A path is an ordered list of segments, e.g.
//! `accounts / <address> / storage / <key>`. Two reserved segments steer
//! relative resolution: [`Segment::Root`] jumps back to the tree root and
//! [`Segment::Parent`] ascends one level. Sibling accounts are addressed by
//! ascending out of the current account and descending into the target's
//! hex-encoded address.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{address_from_hex, address_to_key, Address};

/// Top-level subtree holding every account.
pub const ACCOUNTS: &str = "accounts";

/// Per-account subtree holding contract storage.
pub const STORAGE: &str = "storage";

/// Per-account leaf holding contract code.
pub const CODE: &str = "code";

/// Per-account leaf holding the balance (big-endian, at most 16 bytes).
pub const BALANCE: &str = "balance";

/// Per-account leaf holding the nonce.
pub const NONCE: &str = "nonce";

/// Top-level subtree holding historical blocks, keyed by number.
pub const BLOCKCHAIN: &str = "blockchain";

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Reset resolution to the tree root.
    Root,
    /// Ascend to the parent node.
    Parent,
    /// Descend into the named child.
    Key(String),
}

impl Segment {
    /// Convenience constructor for a named child segment.
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }
}

/// Ordered sequence of segments addressing a node in the state tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path, addressing the tree root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from raw segments, without resolving them.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Build an absolute path from named segments.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Segment::key).collect())
    }

    /// `accounts / <hex address>`
    pub fn account(address: &Address) -> Self {
        Self::from_keys([ACCOUNTS.to_string(), address_to_key(address)])
    }

    /// `accounts / <hex address> / <field>`
    pub fn account_field(address: &Address, field: &str) -> Self {
        Self::account(address).child(field)
    }

    /// `blockchain / <number>`
    pub fn block(number: u64) -> Self {
        Self::from_keys([BLOCKCHAIN.to_string(), number.to_string()])
    }

    /// The segments of this path.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a named child segment.
    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.0.push(Segment::key(name));
        self
    }

    /// Resolve `relative` against this path.
    ///
    /// `Root` discards everything resolved so far, `Parent` pops one segment
    /// (ascending past the root stays at the root), and `Key` pushes. Reserved
    /// segments already present in `self` are resolved the same way first, so
    /// the result only ever contains `Key` segments.
    pub fn resolve(&self, relative: &[Segment]) -> Self {
        let mut out: Vec<Segment> = Vec::with_capacity(self.0.len() + relative.len());
        for segment in self.0.iter().chain(relative) {
            match segment {
                Segment::Root => out.clear(),
                Segment::Parent => {
                    out.pop();
                }
                Segment::Key(_) => out.push(segment.clone()),
            }
        }
        Self(out)
    }

    /// Resolve the sibling account `target`: ascend two levels from this
    /// path, then descend into the target's hex-encoded address.
    ///
    /// From an execution path `accounts / <self> / code` this yields
    /// `accounts / <target>`.
    pub fn sibling_account(&self, target: &Address) -> Self {
        self.resolve(&[
            Segment::Parent,
            Segment::Parent,
            Segment::Key(address_to_key(target)),
        ])
    }

    /// Extract the account address that follows the `accounts` segment.
    ///
    /// Returns `None` if the path does not name an account or the segment
    /// is not a 20-byte hex address.
    pub fn account_address(&self) -> Option<Address> {
        let idx = self
            .0
            .iter()
            .position(|s| matches!(s, Segment::Key(k) if k == ACCOUNTS))?;
        match self.0.get(idx + 1)? {
            Segment::Key(k) => address_from_hex(k),
            _ => None,
        }
    }

    /// The path of the account this path lies in (`accounts / <address>`).
    pub fn account_root(&self) -> Option<Self> {
        self.account_address().map(|a| Self::account(&a))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.0 {
            match segment {
                Segment::Root => write!(f, "/~")?,
                Segment::Parent => write!(f, "/..")?,
                Segment::Key(k) => write!(f, "/{}", k)?,
            }
        }
        Ok(())
    }
}
