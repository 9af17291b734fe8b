// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod module_map;

pub use config::{ConfigError, ValidationError};
pub use execution::{ExecutionError, FailureStrategy};
pub use module_map::ModuleMapError;
