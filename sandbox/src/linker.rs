//! Host function registration via Wasmtime linker.
//!
//! Registers one async function per `HostOp` under the `ethereum` import
//! module. Each function:
//! 1. Converts the wasm arguments to the dispatch argument vector
//! 2. Borrows the guest memory together with the `HostState`
//! 3. Calls `HostInterface::invoke`, which charges gas and runs the op
//! 4. Writes the op's result value, if any
//!
//! A host error or a terminal transition (`return`, `selfDestruct`, a trap)
//! is returned as an error so the guest unwinds immediately; the runtime
//! reads the final status from the `HostState`.

use anyhow::anyhow;
use wasmtime::{Caller, Engine, FuncType, Linker, Memory, Val};

use eei_hostapi::HostError;
use eei_primitives::{ArgKind, HostOp};

use crate::error::SandboxError;
use crate::host_impl::HostState;
use crate::validation::{val_type, IMPORT_MODULE};

/// Get the guest's exported memory from a Caller.
fn get_memory(caller: &mut Caller<'_, HostState>) -> Option<Memory> {
    caller.get_export("memory").and_then(|e| e.into_memory())
}

/// Wasm function type of `op`.
pub fn func_type(engine: &Engine, op: HostOp) -> FuncType {
    FuncType::new(
        engine,
        op.params().iter().copied().map(val_type),
        op.result().map(val_type),
    )
}

/// Widen a wasm argument to the dispatch representation.
///
/// `i32` values keep their unsigned 32-bit pattern; `i64` values keep
/// their bits.
fn to_arg(val: &Val) -> u64 {
    match val {
        Val::I32(x) => u64::from(*x as u32),
        Val::I64(x) => *x as u64,
        _ => 0,
    }
}

/// Narrow a dispatch result to the op's wasm result type.
fn from_result(kind: ArgKind, value: u64) -> Val {
    match kind {
        ArgKind::I32 => Val::I32(value as u32 as i32),
        ArgKind::I64 => Val::I64(value as i64),
    }
}

/// Register every host operation with the linker.
pub fn register_host_functions(
    linker: &mut Linker<HostState>,
    engine: &Engine,
) -> Result<(), SandboxError> {
    for op in HostOp::ALL {
        register_op(linker, engine, op)?;
    }
    Ok(())
}

fn register_op(
    linker: &mut Linker<HostState>,
    engine: &Engine,
    op: HostOp,
) -> Result<(), SandboxError> {
    linker.func_new_async(
        IMPORT_MODULE,
        op.name(),
        func_type(engine, op),
        move |mut caller, params, results| {
            Box::new(async move {
                let args: Vec<u64> = params.iter().map(to_arg).collect();
                let memory =
                    get_memory(&mut caller).ok_or_else(|| anyhow!("guest exports no memory"))?;

                let (data, state) = memory.data_and_store_mut(&mut caller);
                let value = state.host.invoke(op, data, &args).await?;

                let status = state.host.status();
                if status.is_terminal() {
                    return Err(HostError::Terminated(status).into());
                }

                if let (Some(kind), Some(value), Some(slot)) =
                    (op.result(), value, results.first_mut())
                {
                    *slot = from_result(kind, value);
                }
                Ok::<(), anyhow::Error>(())
            })
        },
    )?;
    Ok(())
}
