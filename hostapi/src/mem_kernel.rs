//! In-memory kernel for testing.
//!
//! `RecordingKernel` keeps every message it receives and answers from a
//! per-destination script. Destinations without a script get an empty
//! successful response, or a transport failure if the kernel was built
//! with [`RecordingKernel::unroutable`].

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use eei_primitives::{Message, Path, Response};

use crate::error::KernelError;
use crate::kernel::Kernel;

#[derive(Debug, Default)]
pub struct RecordingKernel {
    responses: Mutex<BTreeMap<Path, Result<Response, KernelError>>>,
    sent: Mutex<Vec<Message>>,
    fail_unscripted: bool,
}

impl RecordingKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A kernel that cannot route any unscripted destination.
    pub fn unroutable() -> Self {
        Self {
            fail_unscripted: true,
            ..Self::default()
        }
    }

    /// Answer messages sent to `to` with `response`.
    pub fn respond(&self, to: Path, response: Response) {
        self.lock_responses().insert(to, Ok(response));
    }

    /// Fail messages sent to `to` with `error`.
    pub fn fail(&self, to: Path, error: KernelError) {
        self.lock_responses().insert(to, Err(error));
    }

    /// Messages received so far, in arrival order.
    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_responses(
        &self,
    ) -> std::sync::MutexGuard<'_, BTreeMap<Path, Result<Response, KernelError>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Kernel for RecordingKernel {
    async fn send(&self, message: Message) -> Result<Response, KernelError> {
        let scripted = self.lock_responses().get(&message.to).cloned();
        let to = message.to.clone();
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);

        match scripted {
            Some(answer) => answer,
            None if self.fail_unscripted => Err(KernelError::Unroutable(to)),
            None => Ok(Response::default()),
        }
    }
}
