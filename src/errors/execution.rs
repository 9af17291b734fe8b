// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline execution errors and failure handling policy.

use crate::backends::wasm::WasmError;
use serde::Deserialize;
use thiserror::Error;

/// How a fan-out pipeline reacts when a stage fails.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Report the first failure in module order and discard everything else.
    #[default]
    FailFast,
    /// Run every stage, then report all failures together.
    CollectAll,
}

/// Errors raised while running a pipeline.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// A guest call failed; carries the stage that made it.
    #[error("Stage {stage_index} ('{function}' in module '{module_id}') failed: {source}")]
    StageFailed {
        stage_index: usize,
        module_id: String,
        function: String,
        #[source]
        source: WasmError,
    },

    /// Several stages failed under `collect_all`.
    #[error("{} of {total} stages failed: {}", .failures.len(), summarize(.failures))]
    MultipleFailures {
        total: usize,
        failures: Vec<ExecutionError>,
    },

    /// The pipeline input does not fit the strategy.
    #[error("Invalid pipeline input: {message}")]
    InvalidInput { message: String },

    /// The input shape does not match what the strategy consumes.
    #[error("{strategy} pipeline expects {expected} input")]
    InputMismatch {
        strategy: &'static str,
        expected: &'static str,
    },

    #[error("Pipeline has no stages")]
    NoStages,

    /// Task join or semaphore failure inside the orchestrator.
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

fn summarize(failures: &[ExecutionError]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ExecutionError {
    /// The guest-level cause, when the failure came from a single stage.
    pub fn wasm_error(&self) -> Option<&WasmError> {
        match self {
            ExecutionError::StageFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_failure(index: usize, module_id: &str) -> ExecutionError {
        ExecutionError::StageFailed {
            stage_index: index,
            module_id: module_id.to_string(),
            function: "act".to_string(),
            source: WasmError::ExecutionFailed {
                module_id: module_id.to_string(),
                function: "act".to_string(),
                reason: "wasm trap: unreachable".to_string(),
            },
        }
    }

    #[test]
    fn test_failure_strategy_defaults_to_fail_fast() {
        assert_eq!(FailureStrategy::default(), FailureStrategy::FailFast);
        let parsed: FailureStrategy = serde_yaml::from_str("collect_all").unwrap();
        assert_eq!(parsed, FailureStrategy::CollectAll);
    }

    #[test]
    fn test_stage_failure_names_stage() {
        let error = stage_failure(1, "product");
        let message = error.to_string();
        assert!(message.contains("Stage 1"));
        assert!(message.contains("product"));
        assert!(matches!(
            error.wasm_error(),
            Some(WasmError::ExecutionFailed { .. })
        ));
    }

    #[test]
    fn test_multiple_failures_summary() {
        let error = ExecutionError::MultipleFailures {
            total: 3,
            failures: vec![stage_failure(0, "sum"), stage_failure(2, "difference")],
        };
        let message = error.to_string();
        assert!(message.starts_with("2 of 3 stages failed"));
        assert!(message.contains("sum"));
        assert!(message.contains("difference"));
        assert!(error.wasm_error().is_none());
    }
}
