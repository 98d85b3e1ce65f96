//! Gas accounting through the sandbox: base costs, dynamic surcharges,
//! refunds, and what happens when a charge cannot be paid.

mod common;

use eei_primitives::path::CODE;
use eei_primitives::{ExecutionStatus, HaltReason, HostOp, Path, Response, TrapReason};

use common::*;

// ── Dynamic copy cost ──

#[tokio::test]
async fn test_call_data_copy_charges_per_word() {
    let world = World::new();
    let wat = contract(
        &[HostOp::CallDataCopy],
        &[],
        "(call $callDataCopy (i32.const 0) (i32.const 0) (i32.const 40))",
    );
    let mut msg = message(1_000);
    msg.data = vec![7; 40];

    let outcome = world.run(&wat, msg).await.unwrap();

    // 3 + ceil(40/32)*3
    assert_eq!(outcome.gas_used, 9);
    assert_eq!(outcome.gas_left, 991);
}

#[tokio::test]
async fn test_zero_length_copy_costs_only_surcharge() {
    let world = World::new();
    let wat = contract(
        &[HostOp::CodeCopy],
        &[],
        "(call $codeCopy (i32.const 0) (i32.const 0) (i32.const 0))",
    );

    let outcome = world.run(&wat, message(1_000)).await.unwrap();

    assert_eq!(outcome.gas_used, 3);
    assert_eq!(world.tree.reads(), 0, "empty copy must not read code");
}

// ── Out of gas ──

#[tokio::test]
async fn test_out_of_gas_traps_before_operation() {
    let world = World::new();
    let wat = contract(
        &[HostOp::StorageLoad],
        &[],
        r#"
        (call $storageLoad (i32.const 0) (i32.const 32))
        unreachable
        "#,
    );

    let outcome = world.run(&wat, message(10)).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Trapped(TrapReason::OutOfGas));
    assert!(outcome.result.exception);
    assert_eq!(outcome.gas_left, 10);
    assert_eq!(outcome.gas_used, 0);
    assert_eq!(world.tree.reads(), 0);
}

#[tokio::test]
async fn test_exact_gas_is_enough() {
    let world = World::new();
    let wat = contract(
        &[HostOp::GetAddress, HostOp::GetCaller],
        &[],
        r#"
        (call $getAddress (i32.const 0))
        (call $getCaller (i32.const 20))
        "#,
    );

    let outcome = world.run(&wat, message(4)).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Halted(HaltReason::Return));
    assert_eq!(outcome.gas_left, 0);
}

#[tokio::test]
async fn test_surcharge_out_of_gas() {
    let world = World::new();
    // Base of `log` is zero; 375 + 8*100 cannot be paid from 1000.
    let wat = contract(
        &[HostOp::Log],
        &[],
        r#"
        (call $log (i32.const 0) (i32.const 100) (i32.const 0)
                   (i32.const 0) (i32.const 0) (i32.const 0) (i32.const 0))
        "#,
    );

    let outcome = world.run(&wat, message(1_000)).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Trapped(TrapReason::OutOfGas));
    assert!(outcome.logs.is_empty());
}

// ── Invalid arguments ──

#[tokio::test]
async fn test_five_log_topics_rejected_before_charge() {
    let world = World::new();
    let wat = contract(
        &[HostOp::Log],
        &[],
        r#"
        (call $log (i32.const 0) (i32.const 0) (i32.const 5)
                   (i32.const 0) (i32.const 0) (i32.const 0) (i32.const 0))
        "#,
    );

    let outcome = world.run(&wat, message(10_000)).await.unwrap();

    assert_eq!(
        outcome.status,
        ExecutionStatus::Trapped(TrapReason::InvalidArgument)
    );
    assert_eq!(outcome.gas_used, 0);
    assert!(outcome.logs.is_empty());
}

// ── Memory faults ──

#[tokio::test]
async fn test_memory_fault_keeps_base_charge() {
    let world = World::new();
    let wat = contract(&[HostOp::GetAddress], &[], "(call $getAddress (i32.const 65530))");

    let outcome = world.run(&wat, message(1_000)).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Trapped(TrapReason::MemoryFault));
    assert!(outcome.result.exception);
    assert_eq!(outcome.gas_used, 2);
}

// ── Storage pricing ──

#[tokio::test]
async fn test_sstore_create_update_clear() {
    let world = World::new();
    let wat = contract(
        &[HostOp::StorageStore],
        &[(31, &[0x01]), (63, &[0x2a]), (95, &[0x2b])],
        r#"
        (call $storageStore (i32.const 0) (i32.const 32))
        (call $storageStore (i32.const 0) (i32.const 64))
        (call $storageStore (i32.const 0) (i32.const 96))
        "#,
    );

    let outcome = world.run(&wat, message(100_000)).await.unwrap();

    // create: 5000 + 15000, update: 5000, clear: 5000
    assert_eq!(outcome.gas_used, 30_000);
    assert_eq!(outcome.result.gas_refund, 15_000);
    assert!(world.tree.is_empty(), "cleared slot must be deleted");
}

#[tokio::test]
async fn test_sstore_out_of_gas_on_create_surcharge() {
    let world = World::new();
    let wat = contract(
        &[HostOp::StorageStore],
        &[(63, &[0x2a])],
        "(call $storageStore (i32.const 0) (i32.const 32))",
    );

    let outcome = world.run(&wat, message(6_000)).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Trapped(TrapReason::OutOfGas));
    assert_eq!(outcome.gas_used, 5_000);
    assert!(world.tree.is_empty());
}

// ── Calls ──

#[tokio::test]
async fn test_value_call_to_failing_callee() {
    let world = World::new();
    world
        .kernel
        .respond(Path::account_field(&OTHER, CODE), Response::exception());
    let wat = contract(
        &[HostOp::Call, HostOp::Return],
        &[(0, &OTHER), (47, &[0x01])],
        r#"
        (i32.store8 (i32.const 200)
            (call $call (i64.const 1000) (i32.const 0) (i32.const 32)
                        (i32.const 0) (i32.const 0) (i32.const 0) (i32.const 0)))
        (call $return (i32.const 200) (i32.const 1))
        "#,
    );

    let outcome = world.run(&wat, message(100_000)).await.unwrap();

    assert_eq!(outcome.result.return_value, vec![0]);
    // base 40, value surcharge 6700, callee exception 25000, return 2
    assert_eq!(outcome.gas_used, 40 + 6_700 + 25_000 + 2);
    assert_eq!(world.kernel.sent()[0].value, 1);
}

#[tokio::test]
async fn test_value_call_needs_forwarded_gas_up_front() {
    let world = World::new();
    let wat = contract(
        &[HostOp::Call],
        &[(0, &OTHER), (47, &[0x01])],
        r#"
        (drop (call $call (i64.const 50000) (i32.const 0) (i32.const 32)
                          (i32.const 0) (i32.const 0) (i32.const 0) (i32.const 0)))
        "#,
    );

    let outcome = world.run(&wat, message(20_000)).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Trapped(TrapReason::OutOfGas));
    assert!(world.kernel.sent().is_empty());
}

// ── Refunds ──

#[tokio::test]
async fn test_self_destruct_refund() {
    let world = World::new();
    let wat = contract(&[HostOp::SelfDestruct], &[], "(call $selfDestruct (i32.const 0))");

    let outcome = world.run(&wat, message(1_000)).await.unwrap();

    assert_eq!(outcome.gas_used, 2);
    assert_eq!(outcome.result.gas_refund, 24_000);
}
