// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Guest backends for wasm-relay pipelines.
//!
//! ## WASM Backend
//! Core WebAssembly modules run under wasmtime, one fresh instance per call:
//! - **Invocation protocol**: numeric calls, and `(addr, len) -> packed`
//!   calls that move text or JSON through guest linear memory
//! - **Memory**: every host-made allocation is released after the call,
//!   including on traps
//! - **Limits**: fuel per instance, payload size cap, WASI preview 1 for
//!   guest runtimes that need stdio
//!
//! ## Stub Backend (Test-Only)
//! In-process `GuestInvoker`s for orchestration tests (only available in
//! test builds): slow, failing, silent, recording and fixed-reply invokers.
//!
//! # Architecture
//! ```text
//! Configuration → GuestModuleFactory → GuestModule (Arc<dyn GuestInvoker>) → Stage → Executor
//! ```
//!
//! # Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use wasm_relay::backends::wasm::capability_manager::create_engine;
//! use wasm_relay::backends::wasm::{invoke_payload, GuestModule, InstanceSettings};
//! use std::path::Path;
//!
//! let engine = create_engine()?;
//! let mary = GuestModule::load(
//!     "mary",
//!     Path::new("guests/greeters/mary.wat"),
//!     &engine,
//!     Arc::new(InstanceSettings::default()),
//! )?;
//!
//! let reply: Option<String> = invoke_payload(&mary, "greeting", &"0 -".to_string())?;
//! assert_eq!(reply.as_deref(), Some("0 - Hello from Mary"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(test)]
pub mod stub;
pub mod wasm;
