//! Determinism tests: identical inputs always produce identical outcomes.
//!
//! Every node replaying a message must observe the same gas use, logs,
//! result and state writes.

mod common;

use eei_primitives::{ExecutionOutcome, HostOp};

use common::*;

/// A contract touching storage, logs, call data and the return buffer.
fn busy_contract() -> String {
    contract(
        &[
            HostOp::CallDataCopy,
            HostOp::StorageStore,
            HostOp::StorageLoad,
            HostOp::Log,
            HostOp::Return,
        ],
        &[(63, &[0x55]), (96, &[0x22; 32])],
        r#"
        (call $callDataCopy (i32.const 0) (i32.const 0) (i32.const 32))
        (call $storageStore (i32.const 0) (i32.const 32))
        (call $storageLoad (i32.const 0) (i32.const 128))
        (call $log (i32.const 0) (i32.const 16) (i32.const 1)
                   (i32.const 96) (i32.const 0) (i32.const 0) (i32.const 0))
        (call $return (i32.const 128) (i32.const 32))
        "#,
    )
}

async fn run_fresh(wat: &str) -> ExecutionOutcome {
    let world = World::new();
    let mut msg = message(1_000_000);
    msg.data = (0u8..32).collect();
    world.run(wat, msg).await.unwrap()
}

// ── Test: 5-run identical output ──

#[tokio::test]
async fn test_five_run_identical_output() {
    let wat = busy_contract();

    let mut outcomes = Vec::new();
    for _ in 0..5 {
        outcomes.push(run_fresh(&wat).await);
    }

    let first = &outcomes[0];
    for (i, outcome) in outcomes.iter().enumerate().skip(1) {
        assert_eq!(first.status, outcome.status, "run {} status mismatch", i);
        assert_eq!(first.gas_used, outcome.gas_used, "run {} gas mismatch", i);
        assert_eq!(first.logs, outcome.logs, "run {} logs mismatch", i);
        assert_eq!(first.result, outcome.result, "run {} result mismatch", i);
    }
}

// ── Test: serialized outcomes are byte-identical ──

#[tokio::test]
async fn test_serialized_outcome_identical() {
    let wat = busy_contract();

    let a = serde_json::to_string(&run_fresh(&wat).await).unwrap();
    let b = serde_json::to_string(&run_fresh(&wat).await).unwrap();

    assert_eq!(a, b);
    let decoded: ExecutionOutcome = serde_json::from_str(&a).unwrap();
    assert_eq!(serde_json::to_string(&decoded).unwrap(), a);
}

// ── Test: same state writes ──

#[tokio::test]
async fn test_identical_state_writes() {
    let wat = busy_contract();
    let first = World::new();
    let second = World::new();

    for world in [&first, &second] {
        let mut msg = message(1_000_000);
        msg.data = (0u8..32).collect();
        world.run(&wat, msg).await.unwrap();
    }

    assert_eq!(first.tree.len(), 1);
    assert_eq!(first.tree.len(), second.tree.len());
}

// ── Test: gas limit changes only what is left ──

#[tokio::test]
async fn test_gas_use_independent_of_limit() {
    let wat = busy_contract();
    let mut outcomes = Vec::new();
    for limit in [100_000u64, 1_000_000] {
        let world = World::new();
        let mut msg = message(limit);
        msg.data = (0u8..32).collect();
        outcomes.push(world.run(&wat, msg).await.unwrap());
    }

    assert_eq!(outcomes[0].gas_used, outcomes[1].gas_used);
    assert_eq!(outcomes[0].gas_left + 900_000, outcomes[1].gas_left);
}

// ── Test: executions sharing a tree see earlier writes ──

#[tokio::test]
async fn test_second_execution_sees_first_write() {
    let wat = contract(
        &[HostOp::StorageStore],
        &[(63, &[0x01])],
        "(call $storageStore (i32.const 0) (i32.const 32))",
    );
    let world = World::new();

    let first = world.run(&wat, message(100_000)).await.unwrap();
    let second = world.run(&wat, message(100_000)).await.unwrap();

    // The first execution creates the slot; the second finds it set.
    assert_eq!(first.gas_used, 20_000);
    assert_eq!(second.gas_used, 5_000);
}
