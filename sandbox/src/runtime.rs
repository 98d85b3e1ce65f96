//! Sandbox runtime: Wasmtime engine, module loading, and execution.
//!
//! The `Sandbox` struct is the main entry point. It loads a contract
//! module, validates its imports and exports, and provides `execute` for
//! running one message against it.

use std::sync::Arc;

use tracing::{debug, info};
use wasmtime::{Config, Engine, Linker, Module, Store, Trap};

use eei_hostapi::{HostError, Kernel, StateTree};
use eei_primitives::{ExecutionOutcome, Message};

use crate::config::SandboxConfig;
use crate::error::SandboxError;
use crate::host_impl::HostState;
use crate::linker::register_host_functions;
use crate::validation::validate_module;

/// The deterministic contract execution sandbox.
///
/// Loads and validates a contract module, then runs messages by creating
/// a fresh Wasmtime instance for each execution (ensuring isolation).
pub struct Sandbox {
    engine: Engine,
    module: Module,
    config: SandboxConfig,
}

impl Sandbox {
    /// Create a new sandbox from WASM bytecode (binary or text format).
    ///
    /// Validates the module's exports and imports before accepting.
    pub fn new(wasm_bytes: &[u8], config: SandboxConfig) -> Result<Self, SandboxError> {
        let engine = create_engine(&config)?;
        let module = Module::new(&engine, wasm_bytes)?;
        validate_module(&module, &config.entry_point)?;
        Ok(Self {
            engine,
            module,
            config,
        })
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Execute `message`.
    ///
    /// Creates a fresh instance, runs the entry point and returns the
    /// execution's outcome. Host halts and host traps end the execution
    /// normally; guest traps and fuel exhaustion are errors. The instance
    /// is discarded after this call.
    pub async fn execute(
        &self,
        message: Message,
        tree: Arc<dyn StateTree>,
        kernel: Arc<dyn Kernel>,
    ) -> Result<ExecutionOutcome, SandboxError> {
        debug!(to = %message.to, gas = message.gas, "executing message");

        // 1. Create host state and store with fuel and memory limits
        let host_state = HostState::new(message, tree, kernel, &self.config);
        let mut store = Store::new(&self.engine, host_state);
        store.limiter(|state| &mut state.limits);
        store.set_fuel(self.config.fuel_limit)?;

        // 2. Create linker and register host functions
        let mut linker = Linker::new(&self.engine);
        register_host_functions(&mut linker, &self.engine)?;

        // 3. Instantiate module
        let instance = linker.instantiate_async(&mut store, &self.module).await?;
        instance
            .get_memory(&mut store, "memory")
            .ok_or_else(|| SandboxError::MemoryError("no memory export".into()))?;

        // 4. Run the entry point
        let entry = instance.get_typed_func::<(), ()>(&mut store, &self.config.entry_point)?;
        let result = entry.call_async(&mut store, ()).await;

        // 5. A host-side stop unwinds the guest; anything else is a guest failure
        if let Err(e) = result {
            let status = store.data().host.status();
            if !status.is_terminal() {
                return Err(classify_error(e));
            }
            debug!(status = %status, "guest unwound by host");
        }

        let fuel_left = store.get_fuel().unwrap_or(0);
        let outcome = store.into_data().into_outcome();
        info!(
            status = %outcome.status,
            gas_used = outcome.gas_used,
            fuel_used = self.config.fuel_limit.saturating_sub(fuel_left),
            "execution complete"
        );
        Ok(outcome)
    }
}

/// Create a Wasmtime engine with deterministic configuration.
fn create_engine(config: &SandboxConfig) -> Result<Engine, SandboxError> {
    let mut wasm_config = Config::new();

    // Host operations suspend on the state tree and kernel
    wasm_config.async_support(true);

    // Fuel bounds pure guest compute
    wasm_config.consume_fuel(true);

    // Determinism enforcement
    wasm_config.wasm_threads(false);
    wasm_config.wasm_relaxed_simd(false);
    wasm_config.wasm_simd(false);
    wasm_config.wasm_multi_memory(false);
    wasm_config.cranelift_nan_canonicalization(true);

    // Memory limits
    let max_bytes = (config.max_memory_pages as u64) * 65536;
    wasm_config.memory_guaranteed_dense_image_size(max_bytes.min(16 * 1024 * 1024));

    Ok(Engine::new(&wasm_config)?)
}

/// Classify a failed entry-point call that the host did not cause.
///
/// Fuel exhaustion → `SandboxError::FuelExhausted`
/// Non-trap host errors → `SandboxError::HostError`
/// Other traps → `SandboxError::GuestTrapped`
fn classify_error(e: anyhow::Error) -> SandboxError {
    if let Some(Trap::OutOfFuel) = e.downcast_ref::<Trap>() {
        return SandboxError::FuelExhausted;
    }
    if let Some(host) = e.downcast_ref::<HostError>() {
        return SandboxError::HostError(host.clone());
    }
    SandboxError::GuestTrapped(format!("{:#}", e))
}
