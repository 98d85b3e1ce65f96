//! Shared test helpers for integration tests.
//!
//! Provides fixed accounts, a WAT contract builder that derives import
//! declarations from the host operation table, message builders and a
//! one-call execution helper.

#![allow(dead_code)]

use std::sync::Arc;

use eei_hostapi::{MemTree, RecordingKernel};
use eei_primitives::path::CODE;
use eei_primitives::{Address, ArgKind, ExecutionOutcome, HostOp, Message, Path};
use eei_sandbox::{Sandbox, SandboxConfig, SandboxError};

// ── Accounts ──

/// The executing contract.
pub const CONTRACT: Address = [0xc0; 20];
/// The account that called the contract (and signed the transaction).
pub const CALLER: Address = [0xca; 20];
/// Some other account.
pub const OTHER: Address = [0x07; 20];

/// Block the test executions run in.
pub const BLOCK_NUMBER: u64 = 1_000;

// ── Contract Builders ──

fn wasm_type(kind: &ArgKind) -> &'static str {
    match kind {
        ArgKind::I32 => "i32",
        ArgKind::I64 => "i64",
    }
}

/// Import declaration for `op`, callable as `$<name>`.
pub fn import(op: HostOp) -> String {
    let mut decl = format!(r#"(import "ethereum" "{0}" (func ${0}"#, op.name());
    if !op.params().is_empty() {
        let params: Vec<&str> = op.params().iter().map(wasm_type).collect();
        decl.push_str(&format!(" (param {})", params.join(" ")));
    }
    if let Some(kind) = op.result() {
        decl.push_str(&format!(" (result {})", wasm_type(&kind)));
    }
    decl.push_str("))");
    decl
}

/// WAT string literal for `bytes`.
pub fn wat_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("\\{:02x}", b)).collect()
}

/// A contract importing `ops`, with one page of memory initialised from
/// `data` segments, whose `main` runs `body`.
pub fn contract(ops: &[HostOp], data: &[(u32, &[u8])], body: &str) -> String {
    let imports: Vec<String> = ops.iter().copied().map(import).collect();
    let segments: Vec<String> = data
        .iter()
        .map(|(offset, bytes)| format!(r#"(data (i32.const {}) "{}")"#, offset, wat_bytes(bytes)))
        .collect();
    format!(
        "(module\n{}\n(memory (export \"memory\") 1)\n{}\n(func (export \"main\")\n{}\n))",
        imports.join("\n"),
        segments.join("\n"),
        body
    )
}

// ── Messages ──

/// A message running `CONTRACT`'s code for `CALLER` with `gas`.
pub fn message(gas: u64) -> Message {
    let mut msg = Message::new(
        Path::account_field(&CONTRACT, CODE),
        Path::account(&CALLER),
        gas,
    );
    msg.block.number = BLOCK_NUMBER;
    msg.block.timestamp = 1_700_000_000;
    msg.block.gas_limit = 30_000_000;
    msg
}

// ── Execution ──

/// Collaborators of one test execution.
pub struct World {
    pub tree: Arc<MemTree>,
    pub kernel: Arc<RecordingKernel>,
}

impl World {
    pub fn new() -> Self {
        Self {
            tree: Arc::new(MemTree::new()),
            kernel: Arc::new(RecordingKernel::new()),
        }
    }

    /// Run `wat` for `msg` with the default sandbox configuration.
    pub async fn run(&self, wat: &str, msg: Message) -> Result<ExecutionOutcome, SandboxError> {
        self.run_with_config(wat, msg, SandboxConfig::default()).await
    }

    pub async fn run_with_config(
        &self,
        wat: &str,
        msg: Message,
        config: SandboxConfig,
    ) -> Result<ExecutionOutcome, SandboxError> {
        let sandbox = Sandbox::new(wat.as_bytes(), config)?;
        sandbox
            .execute(msg, self.tree.clone(), self.kernel.clone())
            .await
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
