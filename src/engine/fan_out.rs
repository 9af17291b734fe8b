// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::engine::pipeline::{run_stage, traced, PipelineInput, PipelineOutput, StageValues};
use crate::errors::{ExecutionError, FailureStrategy};
use crate::traits::{PipelineExecutor, Stages};

/// Independent fan-out: every module gets the same numeric operands.
///
/// All stages are spawned up front and run concurrently, bounded by a
/// semaphore of `max_concurrency` permits. Results are collected by awaiting
/// the tasks in module order, so output order never depends on completion
/// order.
///
/// ## Failure handling
/// - `FailFast`: the first failure in module order is returned and the
///   remaining tasks are aborted (calls already running finish on their
///   worker thread, their results are discarded).
/// - `CollectAll`: every stage runs; a single failure is returned as is,
///   several come back as `ExecutionError::MultipleFailures`.
pub struct FanOutExecutor {
    max_concurrency: usize,
    failure_strategy: FailureStrategy,
}

impl FanOutExecutor {
    pub fn new(max_concurrency: usize, failure_strategy: FailureStrategy) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
            failure_strategy,
        }
    }

    async fn run(
        &self,
        stages: &Stages,
        operands: Vec<u64>,
    ) -> Result<PipelineOutput, ExecutionError> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let operands: Arc<[u64]> = operands.into();
        let mut tasks = Vec::with_capacity(stages.len());

        for (stage_index, stage) in stages.iter().enumerate() {
            let stage = stage.clone();
            let semaphore = semaphore.clone();
            let operands = operands.clone();

            tasks.push(tokio::spawn(async move {
                let _permit =
                    semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| ExecutionError::InternalError {
                            message: format!(
                                "Failed to acquire semaphore permit for stage {}: {}",
                                stage_index, e
                            ),
                        })?;

                let values = run_stage(stage_index, &stage, move |invoker, function| {
                    invoker.invoke_numeric(function, &operands)
                })
                .await?;

                Ok::<_, ExecutionError>(StageValues {
                    module_id: stage.module_id().to_string(),
                    values,
                })
            }));
        }

        let total = tasks.len();
        let mut results = Vec::with_capacity(total);
        let mut failures = Vec::new();
        let mut pending = tasks.into_iter();

        while let Some(task) = pending.next() {
            match task.await {
                Ok(Ok(values)) => results.push(values),
                Ok(Err(error)) => match self.failure_strategy {
                    FailureStrategy::FailFast => {
                        pending.for_each(|task| task.abort());
                        return Err(error);
                    }
                    FailureStrategy::CollectAll => failures.push(error),
                },
                Err(join_error) => {
                    pending.for_each(|task| task.abort());
                    return Err(ExecutionError::InternalError {
                        message: format!("Task join error: {}", join_error),
                    });
                }
            }
        }

        match failures.len() {
            0 => Ok(PipelineOutput::Values(results)),
            1 => Err(failures.remove(0)),
            _ => Err(ExecutionError::MultipleFailures { total, failures }),
        }
    }
}

#[async_trait]
impl PipelineExecutor for FanOutExecutor {
    async fn execute(
        &self,
        stages: &Stages,
        input: PipelineInput,
    ) -> Result<PipelineOutput, ExecutionError> {
        let PipelineInput::Operands(operands) = input else {
            return Err(ExecutionError::InputMismatch {
                strategy: self.strategy_name(),
                expected: "numeric operands",
            });
        };
        if stages.is_empty() {
            return Err(ExecutionError::NoStages);
        }

        traced(
            self.strategy_name(),
            stages.len(),
            self.max_concurrency,
            self.run(stages, operands),
        )
        .await
    }

    fn strategy_name(&self) -> &'static str {
        "fan_out"
    }
}
