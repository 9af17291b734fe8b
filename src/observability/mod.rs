// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic and operational logging goes through message types defined
//! in `messages`. Each message is a plain struct implementing `Display`, so log
//! text lives in one place instead of being scattered as format strings across
//! the host, the pipeline engine and the configuration layer.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - pipeline and stage lifecycle events
//! * `messages::validation` - configuration validation events
//! * `messages::wasm` - guest module loading, invocation and memory events
//!
//! # Usage
//!
//! ```rust
//! use wasm_relay::observability::messages::wasm::InvocationFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "trap");
//! let msg = InvocationFailed {
//!     module_id: "alice",
//!     function: "greeting",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
