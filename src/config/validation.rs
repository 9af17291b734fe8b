// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Checks run independently and every problem found is returned, so a
//! broken pipeline file can be fixed in one pass:
//!
//! 1. at least one module
//! 2. module ids unique, module paths non-empty
//! 3. export names (entry points, allocator) non-empty
//! 4. fuel bounds ordered `minimum <= default <= maximum`
//! 5. `max_concurrency`, when given, at least 1
//!
//! ```rust
//! use wasm_relay::config::{validate_config, Config, ModuleConfig, Strategy};
//! use wasm_relay::errors::ValidationError;
//!
//! let config = Config {
//!     strategy: Strategy::Routed,
//!     entry_point: "greeting".to_string(),
//!     modules: vec![
//!         ModuleConfig { id: "alice".to_string(), module: "alice.wat".to_string(), entry_point: None },
//!         ModuleConfig { id: "alice".to_string(), module: "bob.wat".to_string(), entry_point: None },
//!     ],
//!     ..Config::default()
//! };
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert_eq!(errors, vec![ValidationError::DuplicateModuleId { module_id: "alice".to_string() }]);
//! ```

use crate::config::Config;
use crate::errors::ValidationError;
use std::collections::HashSet;

/// Validate a loaded configuration, collecting every error.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_modules(config, &mut errors);
    validate_export_names(config, &mut errors);
    validate_limits(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_modules(config: &Config, errors: &mut Vec<ValidationError>) {
    if config.modules.is_empty() {
        errors.push(ValidationError::NoModules);
        return;
    }

    let mut seen = HashSet::new();
    for module in &config.modules {
        if !seen.insert(module.id.as_str()) {
            errors.push(ValidationError::DuplicateModuleId {
                module_id: module.id.clone(),
            });
        }
        if module.module.trim().is_empty() {
            errors.push(ValidationError::MissingModulePath {
                module_id: module.id.clone(),
            });
        }
    }
}

fn validate_export_names(config: &Config, errors: &mut Vec<ValidationError>) {
    let mut require = |setting: String, name: &str| {
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyExportName { setting });
        }
    };

    require("entry_point".to_string(), &config.entry_point);
    require("allocator.allocate".to_string(), &config.allocator.allocate);
    require("allocator.release".to_string(), &config.allocator.release);
    for module in &config.modules {
        if let Some(entry_point) = &module.entry_point {
            require(format!("modules.{}.entry_point", module.id), entry_point);
        }
    }
}

fn validate_limits(config: &Config, errors: &mut Vec<ValidationError>) {
    let fuel = &config.wasm.fuel;
    let (minimum, default, maximum) = (fuel.get_minimum(), fuel.get_default(), fuel.get_maximum());
    if !(minimum <= default && default <= maximum) {
        errors.push(ValidationError::InvalidFuelBounds {
            minimum,
            default,
            maximum,
        });
    }

    if config.executor_options.max_concurrency == Some(0) {
        errors.push(ValidationError::ZeroConcurrency);
    }
}
