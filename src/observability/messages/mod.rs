// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `engine` - pipeline and stage lifecycle events
//! * `validation` - configuration validation events
//! * `wasm` - guest module loading, invocation and memory events
//!
//! Messages that carry useful fields also implement `StructuredLog`, which
//! emits the event with those fields attached and can open a matching span.
//!
//! ```rust
//! use wasm_relay::observability::messages::StructuredLog;
//! use wasm_relay::observability::messages::engine::PipelineStarted;
//!
//! let msg = PipelineStarted {
//!     strategy: "fan_out",
//!     stage_count: 3,
//!     max_concurrency: 3,
//! };
//!
//! msg.log();
//! let _span = msg.span("numbers").entered();
//! ```

use tracing::Span;

pub mod engine;
pub mod validation;
pub mod wasm;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event at its natural level.
    fn log(&self);

    /// Create a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
