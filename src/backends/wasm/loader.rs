// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Guest binary loading and size validation
//!
//! Reads a guest module from disk. Files ending in `.wat` are assembled from
//! WebAssembly text; everything else is taken as a binary. Format detection
//! happens afterwards in the detector module.

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::observability::messages::wasm::{ModuleLoadFailed, ModuleLoaded};
use std::path::Path;

/// Maximum allowed size for guest binaries (16 MB)
const MAX_WASM_SIZE: usize = 16 * 1024 * 1024;

/// Loads guest bytes from a file and validates the size.
///
/// # Arguments
/// * `path` - Path to a `.wasm` binary or `.wat` text module
///
/// # Returns
/// * `Ok(Vec<u8>)` - The WASM binary bytes
/// * `Err(WasmError)` - If the file cannot be read, assembled, or exceeds the size limit
pub fn load_wasm_bytes<P: AsRef<Path>>(path: P) -> WasmResult<Vec<u8>> {
    let path = path.as_ref();
    let module_path = path.display().to_string();

    let result = read_module(path);
    match &result {
        Ok(bytes) => tracing::info!(
            "{}",
            ModuleLoaded {
                module_path: &module_path,
                size_bytes: bytes.len(),
            }
        ),
        Err(error) => tracing::error!(
            "{}",
            ModuleLoadFailed {
                module_path: &module_path,
                error,
            }
        ),
    }
    result
}

fn read_module(path: &Path) -> WasmResult<Vec<u8>> {
    let raw = std::fs::read(path)?;

    if raw.len() > MAX_WASM_SIZE {
        return Err(WasmError::ValidationError(format!(
            "WASM file too large: {} bytes (max: {} bytes)",
            raw.len(),
            MAX_WASM_SIZE
        )));
    }

    let is_text = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wat"));

    if is_text {
        Ok(wat::parse_bytes(&raw)?.into_owned())
    } else {
        Ok(raw)
    }
}
