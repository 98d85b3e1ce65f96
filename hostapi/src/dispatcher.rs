//! Sub-call construction and dispatch.
//!
//! The four sub-call flavors build a [`Message`] from the current
//! execution's context, apply their value-transfer gas rules and hand the
//! message to the [`Kernel`]. Each resolves to a [`CallStatus`]; a callee
//! that traps is an ordinary `Trapped` result for the caller, never an
//! error.

use std::sync::Arc;

use eei_primitives::gas::{G_CALLCODE_VALUE, G_CALL_EXCEPTION, G_CALL_STIPEND, G_CALL_VALUE};
use eei_primitives::path::CODE;
use eei_primitives::types::ZERO_ADDRESS;
use eei_primitives::{create_address, Address, CallKind, Message, Path, Response};
use tracing::{debug, warn};

use crate::context::ExecutionContext;
use crate::error::HostResult;
use crate::gas_meter::GasMeter;
use crate::kernel::Kernel;
use crate::state::StateAccessor;

/// Guest-visible result of a sub-call: `1` on success, `0` if it trapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Success,
    Trapped,
}

impl CallStatus {
    pub fn as_u64(self) -> u64 {
        match self {
            Self::Success => 1,
            Self::Trapped => 0,
        }
    }
}

/// Arguments of a sub-call, decoded from guest memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Gas requested for the callee.
    pub gas: u64,
    pub target: Address,
    pub value: u128,
    pub data: Vec<u8>,
}

/// Builds sub-call messages and forwards them to the kernel.
#[derive(Clone)]
pub struct CallDispatcher {
    kernel: Arc<dyn Kernel>,
}

impl std::fmt::Debug for CallDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallDispatcher").finish_non_exhaustive()
    }
}

impl CallDispatcher {
    pub fn new(kernel: Arc<dyn Kernel>) -> Self {
        Self { kernel }
    }

    /// Code path of `target`, resolved from the running code's path.
    fn target_path(env: &ExecutionContext, target: &Address) -> Path {
        env.path().sibling_account(target).child(CODE)
    }

    fn message(env: &ExecutionContext, req: CallRequest, kind: CallKind) -> Message {
        let from = env
            .path()
            .account_root()
            .unwrap_or_else(|| Path::account(env.address()));
        Message {
            to: Self::target_path(env, &req.target),
            from,
            origin: env.message().origin.clone(),
            value: req.value,
            data: req.data,
            gas: req.gas,
            gas_price: env.gas_price(),
            nonce: 0,
            block: env.block().clone(),
            kind,
            sync: false,
        }
    }

    /// Message-call into `req.target`.
    ///
    /// A non-zero value charges `9000 - 2300 + gas` and then gives `gas`
    /// back, so the caller pays 6700 and the callee runs on the requested
    /// gas. A callee exception or a kernel failure costs the caller a
    /// further 25000 and yields `Trapped`.
    pub async fn call(
        &self,
        env: &ExecutionContext,
        gas: &mut GasMeter,
        req: CallRequest,
    ) -> HostResult<(CallStatus, Vec<u8>)> {
        if req.value != 0 {
            let forwarded = req.gas;
            gas.charge((G_CALL_VALUE - G_CALL_STIPEND).saturating_add(forwarded))?;
            gas.restore(forwarded);
        }

        let message = Self::message(env, req, CallKind::Call);
        debug!(to = %message.to, value = message.value, gas = message.gas, "dispatching call");

        match self.kernel.send(message).await {
            Ok(Response {
                exception: false,
                return_value,
            }) => Ok((CallStatus::Success, return_value)),
            Ok(_) => {
                debug!("callee trapped");
                gas.charge(G_CALL_EXCEPTION)?;
                Ok((CallStatus::Trapped, Vec::new()))
            }
            Err(e) => {
                warn!(error = %e, "call not delivered");
                gas.charge(G_CALL_EXCEPTION)?;
                Ok((CallStatus::Trapped, Vec::new()))
            }
        }
    }

    /// Message-call into this account with `req.target`'s code.
    ///
    /// Charges 6700 for a non-zero value and fetches the target's code.
    /// The fetched code is not run and a failed fetch is ignored, so this
    /// always reports `Success`.
    // TODO: run the fetched code in this account's context once the kernel
    // can host a nested sandbox execution.
    pub async fn call_code(
        &self,
        gas: &mut GasMeter,
        state: &StateAccessor,
        req: CallRequest,
    ) -> HostResult<CallStatus> {
        if req.value != 0 {
            gas.charge(G_CALLCODE_VALUE)?;
        }
        let code = state.external_code(&req.target).await;
        debug!(
            found = code.is_found(),
            len = code.value().len(),
            "callCode fetched target code"
        );
        Ok(CallStatus::Success)
    }

    /// Run `req.target`'s code keeping this execution's sender and value.
    ///
    /// Sent synchronously. Returns the callee's result bytes in both the
    /// success and the exception case; a kernel failure yields `Trapped`
    /// with no bytes.
    pub async fn call_delegate(
        &self,
        env: &ExecutionContext,
        req: CallRequest,
    ) -> (CallStatus, Vec<u8>) {
        let mut message = Self::message(env, req, CallKind::Delegate);
        message.from = env.message().from.clone();
        message.value = env.call_value();
        message.sync = true;
        debug!(to = %message.to, gas = message.gas, "dispatching delegate call");

        match self.kernel.send(message).await {
            Ok(resp) if resp.exception => (CallStatus::Trapped, resp.return_value),
            Ok(resp) => (CallStatus::Success, resp.return_value),
            Err(e) => {
                warn!(error = %e, "delegate call not delivered");
                (CallStatus::Trapped, Vec::new())
            }
        }
    }

    /// Derive the address of a contract created with `value`.
    ///
    /// A value larger than the one carried by the current message yields the
    /// zero address and no effect. The new contract's init code is not run.
    pub fn create(&self, env: &ExecutionContext, value: u128) -> (CallStatus, Address) {
        if value > env.call_value() {
            debug!(value, available = env.call_value(), "create value exceeds call value");
            return (CallStatus::Trapped, ZERO_ADDRESS);
        }
        let address = create_address(env.address(), env.nonce());
        debug!(address = %hex::encode(address), nonce = env.nonce(), "create");
        (CallStatus::Success, address)
    }
}
