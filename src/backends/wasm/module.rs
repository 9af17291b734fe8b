// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Compiled guest modules.
//!
//! A `GuestModule` is loaded and compiled once at startup and shared across
//! pipeline stages behind an `Arc`. Every invocation instantiates it into a
//! fresh `ModuleInstance`, so no guest memory or state survives between calls.

use crate::backends::wasm::allocation::AllocatorNames;
use crate::backends::wasm::capability_manager::{create_linker, HostState, WasiOptions};
use crate::backends::wasm::detector::require_core_module;
use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::backends::wasm::instance::ModuleInstance;
use crate::backends::wasm::loader::load_wasm_bytes;
use crate::config::consts::{DEFAULT_FUEL_LEVEL, DEFAULT_MAX_PAYLOAD_BYTES};
use crate::observability::messages::wasm::{InvocationCompleted, InvocationFailed, ModuleCompiled};
use crate::observability::messages::StructuredLog;
use crate::traits::GuestInvoker;
use std::path::Path;
use std::sync::Arc;
use wasmtime::{Engine, Linker, Module};

/// Per-instance limits and export names shared by every module of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSettings {
    pub fuel: u64,
    pub allocator: AllocatorNames,
    /// Upper bound for a single payload in either direction.
    pub max_payload_bytes: usize,
    pub wasi: WasiOptions,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            fuel: DEFAULT_FUEL_LEVEL,
            allocator: AllocatorNames::default(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            wasi: WasiOptions::default(),
        }
    }
}

pub struct GuestModule {
    id: String,
    module: Module,
    linker: Linker<HostState>,
    settings: Arc<InstanceSettings>,
}

impl GuestModule {
    /// Read, validate and compile a guest module from disk.
    pub fn load(
        id: &str,
        path: &Path,
        engine: &Engine,
        settings: Arc<InstanceSettings>,
    ) -> WasmResult<Self> {
        let bytes = load_wasm_bytes(path)?;
        Self::from_bytes(id, &path.display().to_string(), engine, &bytes, settings)
    }

    /// Compile an in-memory core module. Component Model binaries are rejected.
    pub fn from_bytes(
        id: &str,
        path: &str,
        engine: &Engine,
        bytes: &[u8],
        settings: Arc<InstanceSettings>,
    ) -> WasmResult<Self> {
        require_core_module(bytes)?;

        let module = Module::new(engine, bytes)
            .map_err(|e| WasmError::ModuleError(format!("Failed to compile '{}': {:#}", id, e)))?;
        let linker = create_linker(engine)?;

        ModuleCompiled {
            module_id: id,
            module_path: path,
            fuel_level: settings.fuel,
        }
        .log();

        Ok(Self {
            id: id.to_string(),
            module,
            linker,
            settings,
        })
    }

    pub fn instantiate(&self) -> WasmResult<ModuleInstance> {
        ModuleInstance::instantiate(&self.id, &self.linker, &self.module, &self.settings)
    }

    fn invoke<R>(
        &self,
        function: &str,
        call: impl FnOnce(&mut ModuleInstance) -> WasmResult<R>,
    ) -> WasmResult<R> {
        let result = self.instantiate().and_then(|mut instance| {
            let result = call(&mut instance);
            if result.is_ok() {
                let ledger = instance.ledger();
                InvocationCompleted {
                    module_id: &self.id,
                    function,
                    fuel_consumed: instance.fuel_consumed(),
                    ledger: &ledger,
                }
                .log();
            }
            result
        });

        if let Err(error) = &result {
            InvocationFailed {
                module_id: &self.id,
                function,
                error,
            }
            .log();
        }
        result
    }
}

impl GuestInvoker for GuestModule {
    fn id(&self) -> &str {
        &self.id
    }

    fn invoke_numeric(&self, function: &str, args: &[u64]) -> WasmResult<Vec<u64>> {
        self.invoke(function, |instance| instance.call_numeric(function, args))
    }

    fn invoke_packed(&self, function: &str, payload: &[u8]) -> WasmResult<Option<Vec<u8>>> {
        self.invoke(function, |instance| instance.call_packed(function, payload))
    }

    fn invoke_packed_numeric(&self, function: &str, payload: &[u8]) -> WasmResult<u64> {
        self.invoke(function, |instance| {
            instance.call_packed_numeric(function, payload)
        })
    }
}
