// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline lifecycle and stage events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline execution lifecycle (start, completion, failure)
//! * Individual stage execution
//! * Symbol routing decisions

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Pipeline execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use wasm_relay::observability::messages::engine::PipelineStarted;
///
/// let msg = PipelineStarted {
///     strategy: "fan_out",
///     stage_count: 3,
///     max_concurrency: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineStarted<'a> {
    pub strategy: &'a str,
    pub stage_count: usize,
    pub max_concurrency: usize,
}

impl Display for PipelineStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting {} pipeline: {} stages, max_concurrency={}",
            self.strategy, self.stage_count, self.max_concurrency
        )
    }
}

impl StructuredLog for PipelineStarted<'_> {
    fn log(&self) {
        tracing::info!(
            strategy = self.strategy,
            stage_count = self.stage_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline",
            span_name = name,
            strategy = self.strategy,
            stage_count = self.stage_count,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// Pipeline execution completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use wasm_relay::observability::messages::engine::PipelineCompleted;
/// use std::time::Duration;
///
/// let msg = PipelineCompleted {
///     strategy: "accumulate",
///     stage_count: 3,
///     elapsed: Duration::from_millis(42),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineCompleted<'a> {
    pub strategy: &'a str,
    pub stage_count: usize,
    pub elapsed: Duration,
}

impl Display for PipelineCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Completed {} pipeline: {} stages in {:?}",
            self.strategy, self.stage_count, self.elapsed
        )
    }
}

impl StructuredLog for PipelineCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            strategy = self.strategy,
            stage_count = self.stage_count,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_completed",
            span_name = name,
            strategy = self.strategy,
            stage_count = self.stage_count,
            elapsed_ms = self.elapsed.as_millis() as u64,
        )
    }
}

/// Pipeline execution failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct PipelineFailed<'a> {
    pub strategy: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for PipelineFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} pipeline failed: {}", self.strategy, self.error)
    }
}

impl StructuredLog for PipelineFailed<'_> {
    fn log(&self) {
        tracing::error!(
            strategy = self.strategy,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "pipeline_failed",
            span_name = name,
            strategy = self.strategy,
            error = %self.error,
        )
    }
}

pub struct StageStarted<'a> {
    pub stage_index: usize,
    pub module_id: &'a str,
    pub function: &'a str,
}

impl Display for StageStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage {} started: '{}' in module '{}'",
            self.stage_index, self.function, self.module_id
        )
    }
}

impl StructuredLog for StageStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            stage_index = self.stage_index,
            module_id = self.module_id,
            function = self.function,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage",
            span_name = name,
            stage_index = self.stage_index,
            module_id = self.module_id,
            function = self.function,
        )
    }
}

pub struct StageCompleted<'a> {
    pub stage_index: usize,
    pub module_id: &'a str,
    pub elapsed: Duration,
}

impl Display for StageCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage {} completed in module '{}' after {:?}",
            self.stage_index, self.module_id, self.elapsed
        )
    }
}

impl StructuredLog for StageCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            stage_index = self.stage_index,
            module_id = self.module_id,
            elapsed_us = self.elapsed.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage_completed",
            span_name = name,
            stage_index = self.stage_index,
            module_id = self.module_id,
        )
    }
}

/// A symbol was dispatched to a module by the routed strategy.
///
/// # Example
/// ```
/// use wasm_relay::observability::messages::engine::StageRouted;
///
/// let msg = StageRouted {
///     position: 0,
///     symbol: '2',
///     module_index: 2,
///     module_id: "mary",
/// };
///
/// assert_eq!(msg.to_string(), "Routed symbol '2' at position 0 to module 2 ('mary')");
/// ```
pub struct StageRouted<'a> {
    pub position: usize,
    pub symbol: char,
    pub module_index: usize,
    pub module_id: &'a str,
}

impl Display for StageRouted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Routed symbol '{}' at position {} to module {} ('{}')",
            self.symbol, self.position, self.module_index, self.module_id
        )
    }
}

impl StructuredLog for StageRouted<'_> {
    fn log(&self) {
        tracing::debug!(
            position = self.position,
            symbol = %self.symbol,
            module_index = self.module_index,
            module_id = self.module_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage_routed",
            span_name = name,
            position = self.position,
            module_index = self.module_index,
        )
    }
}
