// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM binary encoding detection
//!
//! The marshaling protocol drives core modules through their exported memory
//! and allocator. Component Model binaries hide both behind canonical ABI
//! lifting, so they are detected here with a wasmparser pass and rejected
//! before compilation.

use crate::backends::wasm::error::{WasmError, WASM_UNSUPPORTED_ENCODING};

use wasmparser::{Encoding, Parser, Payload};

/// Binary shape of a guest module.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModuleEncoding {
    /// Core module (binary version 1).
    Core,
    /// Component Model binary (version 2+, or a core module carrying a `component` section).
    Component,
}

impl ModuleEncoding {
    #[inline]
    pub fn is_core(self) -> bool {
        matches!(self, Self::Core)
    }
}

/// Detects whether a binary is a core module or a component.
///
/// # Errors
/// Returns an error if the input is empty, truncated, or otherwise invalid.
pub fn detect_encoding(bytes: &[u8]) -> Result<ModuleEncoding, WasmError> {
    let parser = Parser::new(0);
    let mut encoding = None;
    let mut has_component_section = false;

    for payload in parser.parse_all(bytes) {
        match payload? {
            Payload::Version { encoding: enc, .. } => {
                encoding = Some(enc);
            }
            Payload::CustomSection(reader) if reader.name() == "component" => {
                has_component_section = true;
            }
            _ => {}
        }
    }

    let encoding =
        encoding.ok_or_else(|| WasmError::InvalidWasmBinary("Invalid WASM binary".to_string()))?;

    match encoding {
        Encoding::Component => Ok(ModuleEncoding::Component),
        Encoding::Module if has_component_section => Ok(ModuleEncoding::Component),
        Encoding::Module => Ok(ModuleEncoding::Core),
    }
}

/// Accepts core modules only.
pub fn require_core_module(bytes: &[u8]) -> Result<(), WasmError> {
    match detect_encoding(bytes)? {
        ModuleEncoding::Core => Ok(()),
        ModuleEncoding::Component => Err(WasmError::UnsupportedEncoding(
            WASM_UNSUPPORTED_ENCODING.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let empty: &[u8] = &[];
        assert!(detect_encoding(empty).is_err());
    }

    #[test]
    fn test_invalid_input() {
        let bad = b"\x00\x00\x00\x00\x00\x00\x00\x00";
        assert!(detect_encoding(bad).is_err());
    }

    #[test]
    fn test_core_module_accepted() {
        let bytes = wat::parse_str(r#"(module (memory (export "memory") 1))"#).unwrap();
        assert_eq!(detect_encoding(&bytes).unwrap(), ModuleEncoding::Core);
        assert!(require_core_module(&bytes).is_ok());
    }

    #[test]
    fn test_component_rejected() {
        let bytes = wat::parse_str("(component)").unwrap();
        assert_eq!(detect_encoding(&bytes).unwrap(), ModuleEncoding::Component);
        assert!(matches!(
            require_core_module(&bytes),
            Err(WasmError::UnsupportedEncoding(_))
        ));
    }
}
