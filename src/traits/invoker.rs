// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::wasm::WasmResult;

/// The invocation primitive every pipeline strategy is built on.
///
/// Implementations are synchronous: each call runs one guest invocation to
/// completion. The orchestrator moves calls onto blocking worker threads, so
/// implementations must be shareable across threads.
pub trait GuestInvoker: Send + Sync {
    /// Module id used in logs and errors.
    fn id(&self) -> &str;

    /// Pure numeric call: integers in, integers out.
    fn invoke_numeric(&self, function: &str, args: &[u64]) -> WasmResult<Vec<u64>>;

    /// Payload in, payload out. `Ok(None)` when the guest returns no payload.
    fn invoke_packed(&self, function: &str, payload: &[u8]) -> WasmResult<Option<Vec<u8>>>;

    /// Payload in, integer out.
    fn invoke_packed_numeric(&self, function: &str, payload: &[u8]) -> WasmResult<u64>;
}
