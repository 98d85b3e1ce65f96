//! Routing kernel abstraction.
//!
//! The kernel resolves a message's destination path to a concrete
//! execution, runs it and answers with a [`Response`]. A sub-call suspends
//! the calling execution until the response arrives.
//!
//! Implementations:
//! - `RecordingKernel` (this crate): scripted responses for testing
//! - production kernels are provided by the embedding node

use async_trait::async_trait;
use eei_primitives::{Message, Response};

use crate::error::KernelError;

/// Dispatches messages to other executions.
#[async_trait]
pub trait Kernel: Send + Sync {
    /// Deliver `message` and wait for the callee's response.
    async fn send(&self, message: Message) -> Result<Response, KernelError>;
}
