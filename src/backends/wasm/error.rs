// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for the host/guest marshaling protocol.
//!
//! Every failure that can happen while loading a guest module, moving a payload
//! across the boundary, or calling an export is represented here. All variants
//! implement `std::error::Error` via the `thiserror` crate; the pipeline layer
//! wraps them with stage context (see `crate::errors::ExecutionError`).

use thiserror::Error;

/// Error message for Component Model binaries handed to the core-module host.
///
/// The marshaling protocol relies on exported `memory`, allocator and entry
/// functions, which only core modules expose directly.
pub const WASM_UNSUPPORTED_ENCODING: &str = "Unsupported WASM binary: Component Model detected. \
Only core WASM modules exporting memory, an allocator and an entry function are supported.";

/// Error type for all guest module operations.
#[derive(Error, Debug)]
pub enum WasmError {
    /// The guest allocator export is missing, trapped, or returned a null address.
    #[error("Guest allocation of {requested} bytes failed in module '{module_id}': {reason}")]
    AllocationFailed {
        module_id: String,
        requested: u32,
        reason: String,
    },

    /// A read or write fell outside the guest's linear memory.
    #[error(
        "Memory access out of bounds in module '{module_id}': address={address}, length={length}, memory_size={memory_size}"
    )]
    OutOfBounds {
        module_id: String,
        address: u32,
        length: u32,
        memory_size: usize,
    },

    /// Text payload bytes are not valid UTF-8.
    #[error("Invalid UTF-8 payload: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    /// Structured payload bytes do not parse as JSON at all.
    #[error("Malformed structured payload: {0}")]
    MalformedPayload(String),

    /// Structured payload parsed but has missing or wrongly typed fields.
    #[error("Structured payload does not match the expected schema: {0}")]
    SchemaMismatch(String),

    /// Engine-level failure: trap, missing export, instantiation failure, fuel exhaustion.
    #[error("Execution of '{function}' in module '{module_id}' failed: {reason}")]
    ExecutionFailed {
        module_id: String,
        function: String,
        reason: String,
    },

    /// The export exists but its declared signature does not fit the requested call shape.
    #[error("Export '{function}' in module '{module_id}' has signature {found}, expected {expected}")]
    SignatureMismatch {
        module_id: String,
        function: String,
        expected: String,
        found: String,
    },

    /// The call returned a null reference where a payload was required.
    #[error("'{function}' in module '{module_id}' returned no payload")]
    MissingPayload { module_id: String, function: String },

    /// Payload cannot be addressed by 32-bit guest memory or exceeds the configured cap.
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    /// Invalid or malformed WASM binary format.
    #[error("Invalid WASM binary: {0}")]
    InvalidWasmBinary(String),

    /// Binary encoding the host cannot drive (Component Model).
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// WASM binary parsing error from wasmparser.
    #[error("WASM parser error: {0}")]
    ParserError(#[from] wasmparser::BinaryReaderError),

    /// WebAssembly text could not be assembled.
    #[error("WAT parse error: {0}")]
    WatError(#[from] wat::Error),

    /// Module compilation error.
    #[error("WASM module error: {0}")]
    ModuleError(String),

    /// File I/O error during module loading.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Input validation error (size limits, arguments, etc.).
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// Wasmtime engine creation or configuration error.
    #[error("Engine creation error: {0}")]
    EngineError(String),
}

impl From<serde_json::Error> for WasmError {
    fn from(error: serde_json::Error) -> Self {
        match error.classify() {
            serde_json::error::Category::Data => WasmError::SchemaMismatch(error.to_string()),
            _ => WasmError::MalformedPayload(error.to_string()),
        }
    }
}

/// Result type alias for WASM operations.
pub type WasmResult<T> = Result<T, WasmError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Sample {
        count: u32,
    }

    #[test]
    fn test_json_syntax_error_is_malformed() {
        let err: WasmError = serde_json::from_slice::<Sample>(b"{not json").unwrap_err().into();
        assert!(matches!(err, WasmError::MalformedPayload(_)));
    }

    #[test]
    fn test_json_eof_is_malformed() {
        let err: WasmError = serde_json::from_slice::<Sample>(b"").unwrap_err().into();
        assert!(matches!(err, WasmError::MalformedPayload(_)));
    }

    #[test]
    fn test_json_wrong_field_kind_is_schema_mismatch() {
        let err: WasmError = serde_json::from_slice::<Sample>(br#"{"count":"three"}"#)
            .unwrap_err()
            .into();
        assert!(matches!(err, WasmError::SchemaMismatch(_)));
    }

    #[test]
    fn test_json_missing_field_is_schema_mismatch() {
        let err: WasmError = serde_json::from_slice::<Sample>(b"{}").unwrap_err().into();
        assert!(matches!(err, WasmError::SchemaMismatch(_)));
        assert!(err.to_string().contains("count"));
    }
}
