//! Resource limit tests: fuel exhaustion, memory limits, module validation,
//! and failures that are not guest-visible traps.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use eei_hostapi::{HostError, RecordingKernel, StateError, StateTree};
use eei_primitives::{ExecutionStatus, HaltReason, Hash, HostOp, Path};
use eei_sandbox::{Sandbox, SandboxConfig, SandboxError};

use common::*;

// ── Test: fuel exhaustion ──

#[tokio::test]
async fn test_fuel_exhaustion() {
    let world = World::new();
    let wat = contract(&[], &[], "(loop $spin (br $spin))");
    let config = SandboxConfig {
        fuel_limit: 1_000,
        ..SandboxConfig::default()
    };

    let result = world.run_with_config(&wat, message(1_000), config).await;

    match result {
        Err(SandboxError::FuelExhausted) => {}
        other => panic!("expected FuelExhausted, got: {:?}", other),
    }
}

// ── Test: sufficient fuel ──

#[tokio::test]
async fn test_sufficient_fuel() {
    let world = World::new();
    let wat = contract(
        &[HostOp::GetAddress],
        &[],
        r#"
        (local $i i32)
        (loop $again
            (call $getAddress (i32.const 0))
            (local.set $i (i32.add (local.get $i) (i32.const 1)))
            (br_if $again (i32.lt_u (local.get $i) (i32.const 10))))
        "#,
    );

    let outcome = world.run(&wat, message(1_000)).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Halted(HaltReason::Return));
    assert_eq!(outcome.gas_used, 20);
}

// ── Test: guest traps are errors ──

#[tokio::test]
async fn test_guest_unreachable() {
    let world = World::new();
    let wat = contract(&[], &[], "unreachable");

    let result = world.run(&wat, message(1_000)).await;

    assert!(
        matches!(result, Err(SandboxError::GuestTrapped(_))),
        "unreachable should surface as GuestTrapped, got: {:?}",
        result
    );
}

#[tokio::test]
async fn test_guest_out_of_bounds_store() {
    let world = World::new();
    let wat = contract(&[], &[], "(i32.store (i32.const 65536) (i32.const 1))");

    let result = world.run(&wat, message(1_000)).await;

    assert!(matches!(result, Err(SandboxError::GuestTrapped(_))));
}

// ── Test: memory limits ──

#[tokio::test]
async fn test_memory_growth_denied_past_limit() {
    let world = World::new();
    let wat = contract(
        &[HostOp::Return],
        &[],
        r#"
        (i32.store (i32.const 0) (memory.grow (i32.const 1)))
        (call $return (i32.const 0) (i32.const 4))
        "#,
    );
    let config = SandboxConfig {
        max_memory_pages: 1,
        ..SandboxConfig::default()
    };

    let outcome = world.run_with_config(&wat, message(1_000), config).await.unwrap();

    assert_eq!(outcome.result.return_value, (-1i32).to_le_bytes().to_vec());
}

#[tokio::test]
async fn test_initial_memory_above_limit() {
    let world = World::new();
    let wat = r#"
        (module
            (memory (export "memory") 2)
            (func (export "main"))
        )
    "#;
    let config = SandboxConfig {
        max_memory_pages: 1,
        ..SandboxConfig::default()
    };

    let result = world.run_with_config(wat, message(1_000), config).await;

    assert!(
        matches!(result, Err(SandboxError::Wasmtime(_))),
        "instantiation above the page limit should fail, got: {:?}",
        result
    );
}

// ── Test: module validation ──

#[test]
fn test_rejects_unknown_host_operation() {
    let wat = r#"
        (module
            (import "ethereum" "getGasLeft" (func (result i64)))
            (memory (export "memory") 1)
            (func (export "main"))
        )
    "#;

    let err = Sandbox::new(wat.as_bytes(), SandboxConfig::default()).err();

    assert!(matches!(err, Some(SandboxError::ValidationError(_))));
}

#[test]
fn test_rejects_wrong_signature() {
    let wat = r#"
        (module
            (import "ethereum" "getAddress" (func (param i64)))
            (memory (export "memory") 1)
            (func (export "main"))
        )
    "#;

    let err = Sandbox::new(wat.as_bytes(), SandboxConfig::default()).err();

    assert!(matches!(err, Some(SandboxError::ValidationError(_))));
}

#[test]
fn test_rejects_foreign_import_module() {
    let wat = r#"
        (module
            (import "env" "abort" (func))
            (memory (export "memory") 1)
            (func (export "main"))
        )
    "#;

    let err = Sandbox::new(wat.as_bytes(), SandboxConfig::default()).err();

    assert!(matches!(err, Some(SandboxError::ValidationError(_))));
}

#[test]
fn test_rejects_missing_memory_export() {
    let wat = r#"(module (func (export "main")))"#;

    let err = Sandbox::new(wat.as_bytes(), SandboxConfig::default()).err();

    assert!(matches!(err, Some(SandboxError::ValidationError(_))));
}

#[test]
fn test_accepts_every_host_operation() {
    let wat = contract(&HostOp::ALL, &[], "");

    assert!(Sandbox::new(wat.as_bytes(), SandboxConfig::default()).is_ok());
}

// ── Test: embedder faults ──

/// A tree that serves no reads and refuses every write.
struct ReadOnlyTree;

#[async_trait]
impl StateTree for ReadOnlyTree {
    async fn get(&self, path: &Path) -> Result<Vec<u8>, StateError> {
        Err(StateError::NotFound(path.clone()))
    }

    async fn hash(&self, path: &Path) -> Result<Hash, StateError> {
        Err(StateError::NotFound(path.clone()))
    }

    fn set(&self, _path: &Path, _value: Vec<u8>) -> Result<(), StateError> {
        Err(StateError::Unavailable("read-only".into()))
    }

    fn delete(&self, _path: &Path) -> Result<(), StateError> {
        Err(StateError::Unavailable("read-only".into()))
    }
}

#[tokio::test]
async fn test_refused_write_is_host_error() {
    let wat = contract(
        &[HostOp::StorageStore],
        &[(63, &[0x01])],
        "(call $storageStore (i32.const 0) (i32.const 32))",
    );
    let sandbox = Sandbox::new(wat.as_bytes(), SandboxConfig::default()).unwrap();

    let result = sandbox
        .execute(
            message(100_000),
            Arc::new(ReadOnlyTree),
            Arc::new(RecordingKernel::new()),
        )
        .await;

    assert!(
        matches!(result, Err(SandboxError::HostError(HostError::Internal(_)))),
        "refused write should surface as a host error, got: {:?}",
        result
    );
}
