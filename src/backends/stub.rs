// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process invokers for orchestration tests. None of these touch wasmtime.

use crate::backends::wasm::{WasmError, WasmResult};
use crate::traits::GuestInvoker;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Sleeps for `delay_ms`, then answers every call with `value`.
pub struct SlowInvoker {
    pub id: String,
    delay: Duration,
    value: u64,
}

impl SlowInvoker {
    pub fn new(id: &str, delay_ms: u64, value: u64) -> Self {
        Self {
            id: id.to_string(),
            delay: Duration::from_millis(delay_ms),
            value,
        }
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl GuestInvoker for SlowInvoker {
    fn id(&self) -> &str {
        &self.id
    }

    fn invoke_numeric(&self, _function: &str, _args: &[u64]) -> WasmResult<Vec<u64>> {
        self.pause();
        Ok(vec![self.value])
    }

    fn invoke_packed(&self, _function: &str, payload: &[u8]) -> WasmResult<Option<Vec<u8>>> {
        self.pause();
        Ok(Some(payload.to_vec()))
    }

    fn invoke_packed_numeric(&self, _function: &str, _payload: &[u8]) -> WasmResult<u64> {
        self.pause();
        Ok(self.value)
    }
}

/// Every call traps.
pub struct FailingInvoker {
    pub id: String,
}

impl FailingInvoker {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }

    fn failure(&self, function: &str) -> WasmError {
        WasmError::ExecutionFailed {
            module_id: self.id.clone(),
            function: function.to_string(),
            reason: "simulated trap".to_string(),
        }
    }
}

impl GuestInvoker for FailingInvoker {
    fn id(&self) -> &str {
        &self.id
    }

    fn invoke_numeric(&self, function: &str, _args: &[u64]) -> WasmResult<Vec<u64>> {
        Err(self.failure(function))
    }

    fn invoke_packed(&self, function: &str, _payload: &[u8]) -> WasmResult<Option<Vec<u8>>> {
        Err(self.failure(function))
    }

    fn invoke_packed_numeric(&self, function: &str, _payload: &[u8]) -> WasmResult<u64> {
        Err(self.failure(function))
    }
}

/// Returns the null reference for every packed call.
pub struct SilentInvoker {
    pub id: String,
}

impl SilentInvoker {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

impl GuestInvoker for SilentInvoker {
    fn id(&self) -> &str {
        &self.id
    }

    fn invoke_numeric(&self, _function: &str, _args: &[u64]) -> WasmResult<Vec<u64>> {
        Ok(Vec::new())
    }

    fn invoke_packed(&self, _function: &str, _payload: &[u8]) -> WasmResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn invoke_packed_numeric(&self, _function: &str, _payload: &[u8]) -> WasmResult<u64> {
        Ok(0)
    }
}

/// Records each call as `"<function> <args>"` (numeric) or
/// `"<function> <payload text>"` (packed) and echoes packed payloads.
#[derive(Clone)]
pub struct RecordingInvoker {
    pub id: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingInvoker {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }

    fn record(&self, entry: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(entry);
        }
    }
}

impl GuestInvoker for RecordingInvoker {
    fn id(&self) -> &str {
        &self.id
    }

    fn invoke_numeric(&self, function: &str, args: &[u64]) -> WasmResult<Vec<u64>> {
        self.record(format!("{} {:?}", function, args));
        Ok(args.to_vec())
    }

    fn invoke_packed(&self, function: &str, payload: &[u8]) -> WasmResult<Option<Vec<u8>>> {
        self.record(format!("{} {}", function, String::from_utf8_lossy(payload)));
        Ok(Some(payload.to_vec()))
    }

    fn invoke_packed_numeric(&self, function: &str, payload: &[u8]) -> WasmResult<u64> {
        self.record(format!("{} {}", function, String::from_utf8_lossy(payload)));
        Ok(payload.len() as u64)
    }
}

/// Hands back a fixed byte string for every packed call, whatever it was sent.
pub struct FixedReplyInvoker {
    pub id: String,
    reply: Vec<u8>,
}

impl FixedReplyInvoker {
    pub fn new(id: &str, reply: &str) -> Self {
        Self {
            id: id.to_string(),
            reply: reply.as_bytes().to_vec(),
        }
    }
}

impl GuestInvoker for FixedReplyInvoker {
    fn id(&self) -> &str {
        &self.id
    }

    fn invoke_numeric(&self, _function: &str, _args: &[u64]) -> WasmResult<Vec<u64>> {
        Ok(Vec::new())
    }

    fn invoke_packed(&self, _function: &str, _payload: &[u8]) -> WasmResult<Option<Vec<u8>>> {
        Ok(Some(self.reply.clone()))
    }

    fn invoke_packed_numeric(&self, _function: &str, _payload: &[u8]) -> WasmResult<u64> {
        Ok(self.reply.len() as u64)
    }
}
