//! `eei-sandbox`: Wasmtime-based binding of EEI host operations.
//!
//! This crate loads, validates, and runs a contract module inside a
//! Wasmtime sandbox, with every host operation served by
//! `eei_hostapi::HostInterface`. It enforces:
//!
//! - **Determinism:** No SIMD, no threads, NaN canonicalization
//! - **Fuel metering:** Instruction-level metering to prevent infinite loops
//! - **Gas metering:** Host operation costs charged by the host's `GasMeter`
//! - **Memory limits:** Bounded linear memory growth
//! - **Import whitelisting:** Only `ethereum` imports that name a known op
//! - **Suspension:** Host operations run as async host functions
//!
//! The primary entry point is [`Sandbox::execute`].

pub mod error;
pub mod config;
pub mod host_impl;
pub mod validation;
pub mod linker;
pub mod runtime;

pub use error::SandboxError;
pub use config::SandboxConfig;
pub use runtime::Sandbox;
