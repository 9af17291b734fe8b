// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for building the module set of a pipeline.

use crate::backends::wasm::WasmError;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ModuleMapError {
    /// Engine could not be created for the pipeline.
    EngineCreationFailed { source: WasmError },

    /// Failed to load or compile a configured module
    ModuleCreationFailed {
        module_id: String,
        path: String,
        source: WasmError,
    },
}

impl fmt::Display for ModuleMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleMapError::EngineCreationFailed { source } => {
                write!(f, "Failed to create WASM engine: {}", source)
            }
            ModuleMapError::ModuleCreationFailed {
                module_id,
                path,
                source,
            } => {
                write!(
                    f,
                    "Failed to create module '{}' from '{}': {}",
                    module_id, path, source
                )
            }
        }
    }
}

impl Error for ModuleMapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModuleMapError::EngineCreationFailed { source }
            | ModuleMapError::ModuleCreationFailed { source, .. } => Some(source),
        }
    }
}
