// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration validation events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Configuration validation started.
///
/// # Example
/// ```
/// use wasm_relay::observability::messages::validation::ValidationStarted;
///
/// let msg = ValidationStarted { module_count: 3 };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ValidationStarted {
    pub module_count: usize,
}

impl Display for ValidationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting configuration validation for {} modules",
            self.module_count
        )
    }
}

impl StructuredLog for ValidationStarted {
    fn log(&self) {
        tracing::info!(module_count = self.module_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "validation",
            name = name,
            module_count = self.module_count,
        )
    }
}

pub struct ValidationCompleted {
    pub module_count: usize,
}

impl Display for ValidationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration validation completed successfully for {} modules",
            self.module_count
        )
    }
}

impl StructuredLog for ValidationCompleted {
    fn log(&self) {
        tracing::info!(module_count = self.module_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "validation_completed",
            name = name,
            module_count = self.module_count,
        )
    }
}

/// Configuration validation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationFailed {
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration validation failed with {} errors",
            self.error_count
        )
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::error!(error_count = self.error_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "validation_failed",
            name = name,
            error_count = self.error_count,
        )
    }
}
