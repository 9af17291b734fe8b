// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for guest module events.
//!
//! This module contains message types for logging events related to:
//! * Guest binary loading and compilation
//! * Export invocation outcomes and fuel consumption
//! * Guest allocations that could not be released

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Guest binary read from disk.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use wasm_relay::observability::messages::wasm::ModuleLoaded;
///
/// let msg = ModuleLoaded {
///     module_path: "guests/numbers/sum.wat",
///     size_bytes: 4096,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ModuleLoaded<'a> {
    pub module_path: &'a str,
    pub size_bytes: usize,
}

impl Display for ModuleLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded guest module: {} ({} bytes)",
            self.module_path, self.size_bytes
        )
    }
}

/// Guest binary could not be read or is unusable.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use wasm_relay::observability::messages::wasm::ModuleLoadFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
/// let msg = ModuleLoadFailed {
///     module_path: "guests/missing.wasm",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ModuleLoadFailed<'a> {
    pub module_path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load guest module '{}': {}",
            self.module_path, self.error
        )
    }
}

/// Guest module compiled and ready to instantiate.
pub struct ModuleCompiled<'a> {
    pub module_id: &'a str,
    pub module_path: &'a str,
    pub fuel_level: u64,
}

impl Display for ModuleCompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled guest module '{}' from {} with fuel_level={}",
            self.module_id, self.module_path, self.fuel_level
        )
    }
}

impl StructuredLog for ModuleCompiled<'_> {
    fn log(&self) {
        tracing::info!(
            module_id = self.module_id,
            module_path = self.module_path,
            fuel_level = self.fuel_level,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "module_compiled",
            span_name = name,
            module_id = self.module_id,
            module_path = self.module_path,
        )
    }
}

/// The guest deallocator trapped while the host was returning a region.
///
/// The region is abandoned; the failure is never propagated to the caller.
///
/// # Log Level
/// `warn!` - Degraded but recoverable
///
/// # Example
/// ```
/// use wasm_relay::observability::messages::wasm::GuestAllocationLeaked;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "wasm trap: unreachable");
/// let msg = GuestAllocationLeaked {
///     module_id: "alice",
///     address: 4096,
///     length: 12,
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct GuestAllocationLeaked<'a> {
    pub module_id: &'a str,
    pub address: u32,
    pub length: u32,
    pub error: &'a dyn std::fmt::Display,
}

impl Display for GuestAllocationLeaked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Leaked guest allocation in module '{}' at {}+{}: release failed: {}",
            self.module_id, self.address, self.length, self.error
        )
    }
}

impl StructuredLog for GuestAllocationLeaked<'_> {
    fn log(&self) {
        tracing::warn!(
            module_id = self.module_id,
            address = self.address,
            length = self.length,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "guest_allocation_leaked",
            span_name = name,
            module_id = self.module_id,
            address = self.address,
        )
    }
}

/// Export invocation finished.
///
/// # Log Level
/// `debug!` - Per-call detail
pub struct InvocationCompleted<'a> {
    pub module_id: &'a str,
    pub function: &'a str,
    pub fuel_consumed: u64,
    pub ledger: &'a dyn std::fmt::Display,
}

impl Display for InvocationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invoked '{}' in module '{}': fuel_consumed={} {}",
            self.function, self.module_id, self.fuel_consumed, self.ledger
        )
    }
}

impl StructuredLog for InvocationCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            module_id = self.module_id,
            function = self.function,
            fuel_consumed = self.fuel_consumed,
            ledger = %self.ledger,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "invocation",
            span_name = name,
            module_id = self.module_id,
            function = self.function,
        )
    }
}

/// Export invocation failed.
///
/// # Example
/// ```
/// use wasm_relay::observability::messages::wasm::InvocationFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "all fuel consumed");
/// let msg = InvocationFailed {
///     module_id: "spinner",
///     function: "act",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct InvocationFailed<'a> {
    pub module_id: &'a str,
    pub function: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for InvocationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation of '{}' in module '{}' failed: {}",
            self.function, self.module_id, self.error
        )
    }
}

impl StructuredLog for InvocationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            module_id = self.module_id,
            function = self.function,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "invocation_failed",
            span_name = name,
            module_id = self.module_id,
            function = self.function,
            error = %self.error,
        )
    }
}
