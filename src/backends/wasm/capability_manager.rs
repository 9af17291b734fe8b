// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine configuration and guest capabilities
//!
//! Creates the Wasmtime engine shared by every guest module and the per-store
//! host state. Guests built by TinyGo or `wasm32-wasip1` toolchains import a
//! handful of WASI preview 1 functions (`fd_write`, `proc_exit`, ...), so every
//! linker gets the preview 1 imports. Nothing beyond stdio is granted: no
//! preopened directories, no environment, no network.

use crate::backends::wasm::error::{WasmError, WasmResult};
use serde::Deserialize;
use wasmtime::{Config, Engine, Linker};
use wasmtime_wasi::p1::{self, WasiP1Ctx};
use wasmtime_wasi::WasiCtxBuilder;

/// WASI capabilities granted to guests.
///
/// ```yaml
/// wasm:
///   wasi:
///     inherit_stdio: false
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WasiOptions {
    /// Let guest `fd_write` to stdout/stderr reach the host's streams.
    #[serde(default = "default_inherit_stdio")]
    pub inherit_stdio: bool,
}

fn default_inherit_stdio() -> bool {
    true
}

impl Default for WasiOptions {
    fn default() -> Self {
        Self {
            inherit_stdio: default_inherit_stdio(),
        }
    }
}

/// Data owned by each guest store.
pub struct HostState {
    pub wasi: WasiP1Ctx,
}

impl HostState {
    /// Build the WASI context for one instance. `argv[0]` is the module id.
    pub fn new(options: &WasiOptions, module_id: &str) -> Self {
        let mut builder = WasiCtxBuilder::new();
        if options.inherit_stdio {
            builder.inherit_stdio();
        }
        builder.arg(module_id);
        Self {
            wasi: builder.build_p1(),
        }
    }
}

/// Creates the Wasmtime engine used for all guest modules.
///
/// **Settings:**
/// - `wasm_component_model(false)` - core modules only
/// - `consume_fuel(true)` - bounds runaway guests
/// - `epoch_interruption(false)` - avoids spurious interrupt traps
/// - Disabled features: threads, SIMD, multi-memory, memory64
pub fn create_engine() -> WasmResult<Engine> {
    let mut config = Config::new();

    config.wasm_component_model(false);
    config.wasm_threads(false);
    config.wasm_simd(false);
    config.wasm_relaxed_simd(false);
    config.wasm_multi_memory(false);
    config.wasm_memory64(false);
    config.consume_fuel(true);
    config.epoch_interruption(false);

    tracing::debug!("Creating engine for core WASM modules");
    Engine::new(&config).map_err(|e| WasmError::EngineError(e.to_string()))
}

/// Creates a linker with the WASI preview 1 imports bound to `HostState`.
pub fn create_linker(engine: &Engine) -> WasmResult<Linker<HostState>> {
    let mut linker = Linker::new(engine);
    p1::add_to_linker_sync(&mut linker, |state: &mut HostState| &mut state.wasi)
        .map_err(|e| WasmError::EngineError(format!("Failed to add WASI imports: {:#}", e)))?;
    Ok(linker)
}
