// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while validating a pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The pipeline lists no modules
    NoModules,
    /// Two modules share an id
    DuplicateModuleId {
        /// The duplicate module ID
        module_id: String,
    },
    /// A module has an empty `module` path
    MissingModulePath { module_id: String },
    /// An export name (entry point or allocator) is empty
    EmptyExportName {
        /// Which setting holds the empty name, e.g. `entry_point` or `allocator.release`
        setting: String,
    },
    /// Fuel bounds are not ordered `minimum <= default <= maximum`
    InvalidFuelBounds {
        minimum: u64,
        default: u64,
        maximum: u64,
    },
    /// `executor_options.max_concurrency` is zero
    ZeroConcurrency,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoModules => write!(f, "Pipeline must list at least one module"),
            ValidationError::DuplicateModuleId { module_id } => {
                write!(f, "Duplicate module ID: '{}'", module_id)
            }
            ValidationError::MissingModulePath { module_id } => {
                write!(f, "Module '{}' has an empty module path", module_id)
            }
            ValidationError::EmptyExportName { setting } => {
                write!(f, "Export name for '{}' must not be empty", setting)
            }
            ValidationError::InvalidFuelBounds {
                minimum,
                default,
                maximum,
            } => {
                write!(
                    f,
                    "Fuel bounds must satisfy minimum <= default <= maximum (got {} / {} / {})",
                    minimum, default, maximum
                )
            }
            ValidationError::ZeroConcurrency => {
                write!(f, "executor_options.max_concurrency must be at least 1")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while reading a pipeline configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Validation(Vec<ValidationError>),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
