// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::wasm::allocation::AllocatorNames;
use crate::backends::wasm::capability_manager::WasiOptions;
use crate::config::consts::{
    DEFAULT_FUEL_LEVEL, DEFAULT_MAX_PAYLOAD_BYTES, MAX_FUEL_LEVEL, MIN_FUEL_LEVEL,
};
use crate::config::validation::validate_config;
use crate::engine::Document;
use crate::errors::{ConfigError, FailureStrategy};
use crate::observability::messages::validation::{
    ValidationCompleted, ValidationFailed, ValidationStarted,
};
use crate::observability::messages::StructuredLog;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for a relay pipeline.
///
/// Describes which strategy to run, which guest modules take part (in
/// order), and the limits every guest instance runs under. Loaded from YAML,
/// or from TOML when the file ends in `.toml`.
///
/// # Example
/// ```yaml
/// strategy: accumulate
/// entry_point: calc
/// allocator:
///   allocate: allocate
///   release: deallocate
/// wasm:
///   fuel:
///     default: 100000000
///   max_payload_bytes: 1048576
/// modules:
///   - id: status-discount
///     module: ../guests/order-rules/status-discount.wasm
/// initial_record:
///   input: { user_status: 7, item_count: 12, total: 150.0 }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub strategy: Strategy,
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    /// Export called on every module unless the module overrides it.
    pub entry_point: String,
    #[serde(default)]
    pub allocator: AllocatorNames,
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    #[serde(default)]
    pub wasm: WasmConfig,
    pub modules: Vec<ModuleConfig>,
    /// Starting record for `accumulate` when none is given on the command line.
    #[serde(default)]
    pub initial_record: Option<Document>,
    /// Directory module paths are resolved against. Set by `load_config`.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Export to call on `module`.
    pub fn entry_point_for<'a>(&'a self, module: &'a ModuleConfig) -> &'a str {
        module.entry_point.as_deref().unwrap_or(&self.entry_point)
    }
}

/// Pipeline strategy.
///
/// * `FanOut` - every module gets the same numeric operands
/// * `Routed` - each digit of the input picks one module
/// * `Accumulate` - a record passes through every module in order
#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    FanOut,
    Routed,
    Accumulate,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExecutorOptions {
    /// Concurrent module calls for `fan_out`. Defaults to the number of CPUs.
    pub max_concurrency: Option<usize>,
}

/// WASM-specific configuration options.
///
/// # Example
/// ```yaml
/// wasm:
///   fuel:
///     default: 100000000
///     minimum: 1000000
///     maximum: 500000000
///   max_payload_bytes: 10485760
///   wasi:
///     inherit_stdio: true
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct WasmConfig {
    #[serde(default)]
    pub fuel: FuelConfig,
    pub max_payload_bytes: Option<usize>,
    #[serde(default)]
    pub wasi: WasiOptions,
}

impl WasmConfig {
    pub fn get_max_payload_bytes(&self) -> usize {
        self.max_payload_bytes.unwrap_or(DEFAULT_MAX_PAYLOAD_BYTES)
    }
}

/// Fuel consumption configuration for WASM execution.
///
/// Fuel bounds the number of instructions a single call may execute, so a
/// runaway guest ends in a trap instead of hanging the host.
///
/// # Fields
/// * `default` - Fuel given to each instance (defaults to 100M)
/// * `minimum` - Lower bound for the default (defaults to 1M)
/// * `maximum` - Upper bound for the default (defaults to 500M)
#[derive(Debug, Default, Deserialize)]
pub struct FuelConfig {
    pub default: Option<u64>,
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
}

impl FuelConfig {
    pub fn get_default(&self) -> u64 {
        self.default.unwrap_or(DEFAULT_FUEL_LEVEL)
    }

    pub fn get_minimum(&self) -> u64 {
        self.minimum.unwrap_or(MIN_FUEL_LEVEL)
    }

    pub fn get_maximum(&self) -> u64 {
        self.maximum.unwrap_or(MAX_FUEL_LEVEL)
    }

    /// Clamp a fuel level into `[minimum, maximum]`.
    ///
    /// # Example
    /// ```
    /// use wasm_relay::config::FuelConfig;
    ///
    /// let config = FuelConfig::default();
    /// assert_eq!(config.validate_and_clamp(1_000_000_000), 500_000_000);
    /// assert_eq!(config.validate_and_clamp(10), 1_000_000);
    /// ```
    pub fn validate_and_clamp(&self, requested: u64) -> u64 {
        // Inverted bounds are reported by validation; never panic here.
        requested.max(self.get_minimum()).min(self.get_maximum())
    }

    /// The fuel level every instance starts with.
    pub fn resolved(&self) -> u64 {
        self.validate_and_clamp(self.get_default())
    }
}

/// One guest module in the pipeline.
///
/// # Example
/// ```yaml
/// id: mary
/// module: ../guests/greeters/mary.wat
/// entry_point: greeting
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleConfig {
    pub id: String,
    /// Path to a `.wasm` or `.wat` file, relative to the config file.
    pub module: String,
    #[serde(default)]
    pub entry_point: Option<String>,
}

/// Load a config from a YAML file, or a TOML file when the extension is `.toml`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let mut cfg: Config = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    cfg.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(cfg)
}

/// Load a config and validate it.
///
/// Every validation problem is reported at once in `ConfigError::Validation`.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;

    ValidationStarted {
        module_count: cfg.modules.len(),
    }
    .log();

    if let Err(validation_errors) = validate_config(&cfg) {
        ValidationFailed {
            error_count: validation_errors.len(),
        }
        .log();
        return Err(ConfigError::Validation(validation_errors));
    }

    ValidationCompleted {
        module_count: cfg.modules.len(),
    }
    .log();
    Ok(cfg)
}
