// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::wasm::module::{GuestModule, InstanceSettings};
use crate::backends::wasm::{WasmError, WasmResult};
use crate::config::ModuleConfig;
use crate::traits::GuestInvoker;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wasmtime::Engine;

/// Factory for creating guest invokers from configuration.
///
/// # Example Configuration
///
/// ```yaml
/// modules:
///   - id: mary
///     module: ../guests/greeters/mary.wat
/// ```
pub struct GuestModuleFactory;

impl GuestModuleFactory {
    /// Load and compile the module described by `config`.
    ///
    /// Relative module paths are resolved against `base_dir`, the directory
    /// holding the pipeline file. All modules share `engine` and `settings`.
    ///
    /// # Errors
    ///
    /// - `ValidationError` when the `module` path is empty
    /// - any load, detection or compile error from `GuestModule::load`
    pub fn create_module(
        config: &ModuleConfig,
        base_dir: &Path,
        engine: &Engine,
        settings: Arc<InstanceSettings>,
    ) -> WasmResult<Arc<dyn GuestInvoker>> {
        if config.module.trim().is_empty() {
            return Err(WasmError::ValidationError(format!(
                "Module '{}' has no 'module' path",
                config.id
            )));
        }

        let path = Self::resolve_path(base_dir, &config.module);
        let module = GuestModule::load(&config.id, &path, engine, settings)?;
        Ok(Arc::new(module))
    }

    fn resolve_path(base_dir: &Path, module: &str) -> PathBuf {
        let path = Path::new(module);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}
