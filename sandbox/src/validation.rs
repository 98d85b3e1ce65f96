//! WASM module validation: import/export checks against the host table.
//!
//! Validates that a compiled contract module can be bound before it is
//! accepted by the sandbox. Checks:
//!
//! 1. Memory export present
//! 2. Entry point exported as `() -> ()`
//! 3. All imports are functions from the `ethereum` module
//! 4. No WASI imports
//! 5. Every import names a known `HostOp` with that op's exact signature

use wasmtime::{ExternType, FuncType, Module, ValType};

use eei_primitives::{ArgKind, HostOp};

use crate::error::SandboxError;

/// Import module every host operation is registered under.
pub const IMPORT_MODULE: &str = "ethereum";

/// Wasm kind of `vt`, if it is one the host table uses.
pub(crate) fn arg_kind(vt: &ValType) -> Option<ArgKind> {
    match vt {
        ValType::I32 => Some(ArgKind::I32),
        ValType::I64 => Some(ArgKind::I64),
        _ => None,
    }
}

/// Wasm value type carrying `kind`.
pub(crate) fn val_type(kind: ArgKind) -> ValType {
    match kind {
        ArgKind::I32 => ValType::I32,
        ArgKind::I64 => ValType::I64,
    }
}

/// Validate that a contract module is bindable with `entry_point` as its start.
pub fn validate_module(module: &Module, entry_point: &str) -> Result<(), SandboxError> {
    validate_exports(module, entry_point)?;
    validate_imports(module)?;
    Ok(())
}

fn validate_exports(module: &Module, entry_point: &str) -> Result<(), SandboxError> {
    let has_memory = module
        .exports()
        .any(|e| e.name() == "memory" && matches!(e.ty(), ExternType::Memory(_)));
    if !has_memory {
        return Err(SandboxError::ValidationError(
            "module must export 'memory'".into(),
        ));
    }

    let export = module
        .exports()
        .find(|e| e.name() == entry_point)
        .ok_or_else(|| {
            SandboxError::ValidationError(format!("missing entry point: {}", entry_point))
        })?;

    let func_ty = match export.ty() {
        ExternType::Func(ft) => ft,
        _ => {
            return Err(SandboxError::ValidationError(format!(
                "export '{}' must be a function",
                entry_point
            )));
        }
    };
    if func_ty.params().len() != 0 || func_ty.results().len() != 0 {
        return Err(SandboxError::ValidationError(format!(
            "entry point '{}' must take no params and return nothing",
            entry_point
        )));
    }

    Ok(())
}

fn validate_imports(module: &Module) -> Result<(), SandboxError> {
    for import in module.imports() {
        let module_name = import.module();

        if module_name.starts_with("wasi") {
            return Err(SandboxError::ValidationError(format!(
                "WASI import not allowed: {}::{}",
                module_name,
                import.name()
            )));
        }

        if module_name != IMPORT_MODULE {
            return Err(SandboxError::ValidationError(format!(
                "import from unknown module '{}' (only '{}' allowed): {}",
                module_name,
                IMPORT_MODULE,
                import.name()
            )));
        }

        let func_ty = match import.ty() {
            ExternType::Func(ft) => ft,
            _ => {
                return Err(SandboxError::ValidationError(format!(
                    "non-function import not allowed: {}::{}",
                    module_name,
                    import.name()
                )));
            }
        };

        let op = HostOp::from_name(import.name()).ok_or_else(|| {
            SandboxError::ValidationError(format!("unknown host operation: {}", import.name()))
        })?;
        check_signature(op, &func_ty)?;
    }

    Ok(())
}

fn check_signature(op: HostOp, func_ty: &FuncType) -> Result<(), SandboxError> {
    let params: Vec<Option<ArgKind>> = func_ty.params().map(|vt| arg_kind(&vt)).collect();
    let results: Vec<Option<ArgKind>> = func_ty.results().map(|vt| arg_kind(&vt)).collect();

    let expected_params: Vec<Option<ArgKind>> = op.params().iter().copied().map(Some).collect();
    let expected_results: Vec<Option<ArgKind>> = op.result().into_iter().map(Some).collect();

    if params != expected_params || results != expected_results {
        return Err(SandboxError::ValidationError(format!(
            "import '{}' has wrong signature: expected {:?} -> {:?}, got {:?} -> {:?}",
            op, expected_params, expected_results, params, results
        )));
    }
    Ok(())
}
