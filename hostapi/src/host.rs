//! The host interface facade.
//!
//! [`HostInterface::invoke`] is the single entry point for every host
//! operation. It checks the terminal state and arity, charges the
//! operation's base cost from the [`HostOp`] table, then runs the handler
//! against a [`HostContext`] borrowing the execution's components. Any trap
//! raised by a handler moves the execution to `Trapped`.
//!
//! Arguments arrive as `u64`s: `i32` parameters are zero-extended from
//! their unsigned 32-bit pattern, `i64` parameters carry their two's
//! complement bits.

use std::sync::Arc;

use eei_primitives::gas::{
    copy_cost, external_copy_cost, log_cost, G_SSTORE_SET, MAX_LOG_TOPICS, R_SELF_DESTRUCT,
    R_SSTORE_CLEAR,
};
use eei_primitives::types::{u128_to_bytes, U256_SIZE_BYTES};
use eei_primitives::{ExecutionOutcome, ExecutionStatus, HostOp, Log, Message};
use tracing::debug;

use crate::context::ExecutionContext;
use crate::dispatcher::{CallDispatcher, CallRequest, CallStatus};
use crate::error::{HostError, HostResult};
use crate::gas_meter::GasMeter;
use crate::kernel::Kernel;
use crate::memory::{clamped_slice, MemoryAccessor};
use crate::result::ResultCollector;
use crate::state::{StateAccessor, StorageWrite};
use crate::state_tree::StateTree;

/// Host side of one execution.
#[derive(Debug)]
pub struct HostInterface {
    env: ExecutionContext,
    gas: GasMeter,
    state: StateAccessor,
    calls: CallDispatcher,
    result: ResultCollector,
}

impl HostInterface {
    pub fn new(message: Message, tree: Arc<dyn StateTree>, kernel: Arc<dyn Kernel>) -> Self {
        let gas = GasMeter::new(message.gas);
        let state = StateAccessor::new(tree, message.to.clone());
        Self {
            env: ExecutionContext::new(message),
            gas,
            state,
            calls: CallDispatcher::new(kernel),
            result: ResultCollector::new(),
        }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.env
    }

    pub fn status(&self) -> ExecutionStatus {
        self.result.status()
    }

    pub fn gas_left(&self) -> u64 {
        self.gas.remaining()
    }

    pub fn gas_used(&self) -> u64 {
        self.gas.used()
    }

    pub fn gas_refund(&self) -> u64 {
        self.gas.refund_total()
    }

    /// Run `op` with `args` against the execution's `memory`.
    ///
    /// Returns the operation's result value, if it has one.
    pub async fn invoke(
        &mut self,
        op: HostOp,
        memory: &mut [u8],
        args: &[u64],
    ) -> HostResult<Option<u64>> {
        self.result.ensure_running()?;
        let expected = op.params().len();
        if args.len() != expected {
            return Err(HostError::BadArguments {
                op,
                expected,
                got: args.len(),
            });
        }

        let outcome = self.dispatch(op, memory, args).await;
        if let Err(e) = &outcome {
            if let Some(reason) = e.trap_reason() {
                debug!(op = %op, reason = %reason, "host operation trapped");
                self.result.trap(reason);
            }
        }
        outcome
    }

    async fn dispatch(
        &mut self,
        op: HostOp,
        memory: &mut [u8],
        args: &[u64],
    ) -> HostResult<Option<u64>> {
        let cost = op.base_cost();
        self.gas.charge(cost)?;
        debug!(op = %op, cost, gas_left = self.gas.remaining(), "host call");

        let mut cx = HostContext {
            env: &self.env,
            gas: &mut self.gas,
            memory: MemoryAccessor::new(memory),
            state: &self.state,
            calls: &self.calls,
            result: &mut self.result,
            args,
        };
        cx.run(op).await
    }

    /// Close the execution and report its outcome.
    pub fn finish(self) -> ExecutionOutcome {
        let gas_left = self.gas.remaining();
        let gas_used = self.gas.used();
        let (status, result, logs) = self.result.finish(self.gas.refund_total());
        debug!(status = %status, gas_used, refund = result.gas_refund, "execution finished");
        ExecutionOutcome {
            status,
            result,
            logs,
            gas_left,
            gas_used,
        }
    }
}

/// Everything a handler may touch during one host call.
struct HostContext<'a> {
    env: &'a ExecutionContext,
    gas: &'a mut GasMeter,
    memory: MemoryAccessor<'a>,
    state: &'a StateAccessor,
    calls: &'a CallDispatcher,
    result: &'a mut ResultCollector,
    args: &'a [u64],
}

impl HostContext<'_> {
    /// `i32` argument `i` as an unsigned offset or length.
    fn u32(&self, i: usize) -> u32 {
        self.args[i] as u32
    }

    /// `i32` argument `i` as a signed value.
    fn i32(&self, i: usize) -> i32 {
        self.args[i] as u32 as i32
    }

    /// `i64` argument `i` as a signed value.
    fn i64(&self, i: usize) -> i64 {
        self.args[i] as i64
    }

    async fn run(&mut self, op: HostOp) -> HostResult<Option<u64>> {
        match op {
            // ── environment ──
            HostOp::GetAddress => {
                let address = *self.env.address();
                self.memory.write(self.u32(0), &address)?;
                Ok(None)
            }
            HostOp::GetTxOrigin => {
                let origin = *self.env.origin();
                self.memory.write(self.u32(0), &origin)?;
                Ok(None)
            }
            HostOp::GetCaller => {
                let caller = *self.env.caller();
                self.memory.write(self.u32(0), &caller)?;
                Ok(None)
            }
            HostOp::GetCallValue => {
                let value = u128_to_bytes(self.env.call_value());
                self.memory.write(self.u32(0), &value)?;
                Ok(None)
            }
            HostOp::GetCallDataSize => Ok(Some(self.env.call_data().len() as u64)),
            HostOp::CallDataCopy => self.call_data_copy().map(|_| None),
            HostOp::CallDataCopy256 => {
                let data = clamped_slice(self.env.call_data(), u64::from(self.u32(1)), 32);
                self.memory
                    .write_padded(self.u32(0), U256_SIZE_BYTES as u32, data)?;
                Ok(None)
            }
            HostOp::GetTxGasPrice => Ok(Some(self.env.gas_price())),
            HostOp::GetBlockCoinbase => {
                let coinbase = self.env.block().coinbase;
                self.memory.write(self.u32(0), &coinbase)?;
                Ok(None)
            }
            HostOp::GetBlockDifficulty => {
                let difficulty = self.env.block().difficulty;
                self.memory.write(self.u32(0), &difficulty)?;
                Ok(None)
            }
            HostOp::GetBlockTimestamp => Ok(Some(self.env.block().timestamp)),
            HostOp::GetBlockNumber => Ok(Some(self.env.block().number)),
            HostOp::GetBlockGasLimit => Ok(Some(self.env.block().gas_limit)),

            // ── state ──
            HostOp::GetBalance => {
                let target = self.memory.read_address(self.u32(0))?;
                let balance = self.state.balance(&target).await.into_inner();
                self.memory.write(self.u32(1), &u128_to_bytes(balance))?;
                Ok(None)
            }
            HostOp::GetCodeSize => {
                let code = self.state.own_code().await;
                Ok(Some(code.value().len() as u64))
            }
            HostOp::CodeCopy => {
                let (result, offset, length) = (self.u32(0), self.u32(1), self.u32(2));
                self.gas.charge(copy_cost(u64::from(length)))?;
                if length > 0 {
                    let code = self.state.own_code().await.into_inner();
                    let src = clamped_slice(&code, u64::from(offset), u64::from(length));
                    self.memory.write_padded(result, length, src)?;
                }
                Ok(None)
            }
            HostOp::GetExternalCodeSize => {
                let target = self.memory.read_address(self.u32(0))?;
                let code = self.state.external_code(&target).await;
                Ok(Some(code.value().len() as u64))
            }
            HostOp::ExternalCodeCopy => {
                let (result, offset, length) = (self.u32(1), self.u32(2), self.u32(3));
                self.gas.charge(external_copy_cost(u64::from(length)))?;
                let target = self.memory.read_address(self.u32(0))?;
                if length > 0 {
                    let code = self.state.external_code(&target).await.into_inner();
                    let src = clamped_slice(&code, u64::from(offset), u64::from(length));
                    self.memory.write_padded(result, length, src)?;
                }
                Ok(None)
            }
            HostOp::GetBlockHash => {
                let current = self.env.block().number;
                let hash = self.state.block_hash(current, self.i64(0)).await.into_inner();
                self.memory.write(self.u32(1), &hash)?;
                Ok(None)
            }
            HostOp::StorageStore => self.storage_store().await.map(|_| None),
            HostOp::StorageLoad => {
                let key = self.memory.read_word(self.u32(0))?;
                let value = self.state.storage_load(&key).await.into_inner();
                self.memory.write(self.u32(1), &value)?;
                Ok(None)
            }

            // ── sub-calls ──
            HostOp::Create => {
                // (dataOffset, length) name the init code, which is not run.
                let value = self.memory.read_u128(self.u32(0))?;
                let (status, address) = self.calls.create(self.env, value);
                self.memory.write(self.u32(3), &address)?;
                Ok(Some(status.as_u64()))
            }
            HostOp::Call => {
                let req = self.call_request(true)?;
                let (status, ret) = self.calls.call(self.env, self.gas, req).await?;
                self.write_call_result(self.u32(5), self.u32(6), &ret)?;
                Ok(Some(status.as_u64()))
            }
            HostOp::CallCode => {
                let req = self.call_request(true)?;
                let status = self.calls.call_code(self.gas, self.state, req).await?;
                Ok(Some(status.as_u64()))
            }
            HostOp::CallDelegate => {
                let req = self.call_request(false)?;
                let (status, ret) = self.calls.call_delegate(self.env, req).await;
                self.write_call_result(self.u32(4), self.u32(5), &ret)?;
                Ok(Some(status.as_u64()))
            }

            // ── results ──
            HostOp::Log => self.log().map(|_| None),
            HostOp::Return => {
                let length = self.u32(1);
                let value = if length > 0 {
                    Some(self.memory.read(self.u32(0), length)?)
                } else {
                    None
                };
                self.result.halt_return(value)?;
                Ok(None)
            }
            HostOp::SelfDestruct => {
                let beneficiary = self.memory.read_address(self.u32(0))?;
                self.gas.refund(R_SELF_DESTRUCT);
                self.result.self_destruct(beneficiary)?;
                Ok(None)
            }
        }
    }

    fn call_data_copy(&mut self) -> HostResult<()> {
        let (result, offset, length) = (self.u32(0), self.u32(1), self.u32(2));
        self.gas.charge(copy_cost(u64::from(length)))?;
        if length > 0 {
            let data = clamped_slice(self.env.call_data(), u64::from(offset), u64::from(length));
            self.memory.write_padded(result, length, data)?;
        }
        Ok(())
    }

    async fn storage_store(&mut self) -> HostResult<()> {
        let key = self.memory.read_word(self.u32(0))?;
        let value = self.memory.read_word(self.u32(1))?;
        let old = self.state.storage_load(&key).await;
        let write = StorageWrite::classify(&old, &value);
        match write {
            StorageWrite::Create => self.gas.charge(G_SSTORE_SET)?,
            StorageWrite::Clear => self.gas.refund(R_SSTORE_CLEAR),
            StorageWrite::Update | StorageWrite::Noop => {}
        }
        self.state.storage_apply(&key, &value, write)
    }

    fn log(&mut self) -> HostResult<()> {
        let (offset, length, topics) = (self.u32(0), self.u32(1), self.i32(2));
        let count = match u32::try_from(topics) {
            Ok(n) if n <= MAX_LOG_TOPICS => n,
            _ => return Err(HostError::invalid_argument()),
        };
        self.gas.charge(log_cost(u64::from(length), count))?;

        let data = if length > 0 {
            self.memory.read(offset, length)?
        } else {
            Vec::new()
        };
        let topics = (0..count as usize)
            .map(|i| self.memory.read_word(self.u32(3 + i)))
            .collect::<HostResult<Vec<_>>>()?;
        self.result.log(Log { data, topics })
    }

    /// Decode `(gas, addressOffset, [valueOffset,] dataOffset, dataLength, ..)`.
    fn call_request(&self, with_value: bool) -> HostResult<CallRequest> {
        let gas = self.args[0];
        let target = self.memory.read_address(self.u32(1))?;
        let (value, data_at) = if with_value {
            (self.memory.read_u128(self.u32(2))?, 3)
        } else {
            (0, 2)
        };
        let data = self.memory.read(self.u32(data_at), self.u32(data_at + 1))?;
        Ok(CallRequest {
            gas,
            target,
            value,
            data,
        })
    }

    /// Copy at most `length` bytes of `ret` to `offset`.
    fn write_call_result(&mut self, offset: u32, length: u32, ret: &[u8]) -> HostResult<()> {
        let n = ret.len().min(length as usize);
        if n == 0 {
            return Ok(());
        }
        self.memory.write(offset, &ret[..n])
    }
}
