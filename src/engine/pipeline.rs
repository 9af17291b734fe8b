// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline inputs, outputs and the shared stage runner.

use crate::backends::wasm::WasmResult;
use crate::engine::document::Document;
use crate::errors::ExecutionError;
use crate::observability::messages::engine::{
    PipelineCompleted, PipelineFailed, PipelineStarted, StageCompleted, StageStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{GuestInvoker, Stage};
use serde::Serialize;
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

/// What a pipeline consumes. Each strategy accepts exactly one shape.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineInput {
    /// Operands for the numeric entry point (fan-out).
    Operands(Vec<u64>),
    /// A digit string; each digit selects a module (routed).
    Symbols(String),
    /// The initial record (accumulate).
    Record(Document),
}

/// What a pipeline produces.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    /// One entry per module, in module order.
    Values(Vec<StageValues>),
    /// One entry per symbol, in symbol order.
    Routed(Vec<RoutedOutput>),
    /// The record after the last stage.
    Record(Document),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageValues {
    pub module_id: String,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutedOutput {
    pub position: usize,
    pub symbol: char,
    pub module_index: usize,
    pub module_id: String,
    /// `None` when the module returned no payload.
    pub text: Option<String>,
}

/// Run one guest call for `stage` on a blocking worker thread.
///
/// Guest failures come back as `ExecutionError::StageFailed` tagged with
/// `stage_index`, the module id and the export name.
pub(crate) async fn run_stage<R, F>(
    stage_index: usize,
    stage: &Stage,
    call: F,
) -> Result<R, ExecutionError>
where
    R: Send + 'static,
    F: FnOnce(&dyn GuestInvoker, &str) -> WasmResult<R> + Send + 'static,
{
    let invoker = stage.invoker.clone();
    let function = stage.function.clone();
    let module_id = stage.module_id().to_string();

    StageStarted {
        stage_index,
        module_id: &module_id,
        function: &function,
    }
    .log();
    let started = Instant::now();

    let outcome = tokio::task::spawn_blocking(move || call(invoker.as_ref(), &function))
        .await
        .map_err(|e| ExecutionError::InternalError {
            message: format!("Stage {} task join error: {}", stage_index, e),
        })?;

    match outcome {
        Ok(value) => {
            StageCompleted {
                stage_index,
                module_id: &module_id,
                elapsed: started.elapsed(),
            }
            .log();
            Ok(value)
        }
        Err(source) => Err(ExecutionError::StageFailed {
            stage_index,
            module_id,
            function: stage.function.clone(),
            source,
        }),
    }
}

/// Wrap a pipeline body with lifecycle logging and a span.
pub(crate) async fn traced<Fut>(
    strategy: &'static str,
    stage_count: usize,
    max_concurrency: usize,
    body: Fut,
) -> Result<PipelineOutput, ExecutionError>
where
    Fut: Future<Output = Result<PipelineOutput, ExecutionError>>,
{
    let started_message = PipelineStarted {
        strategy,
        stage_count,
        max_concurrency,
    };
    started_message.log();
    let span = started_message.span(strategy);
    let started = Instant::now();

    let result = body.instrument(span).await;

    match &result {
        Ok(_) => PipelineCompleted {
            strategy,
            stage_count,
            elapsed: started.elapsed(),
        }
        .log(),
        Err(error) => PipelineFailed { strategy, error }.log(),
    }
    result
}
