// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::backends::wasm::invoke_payload;
use crate::engine::pipeline::{run_stage, traced, PipelineInput, PipelineOutput, RoutedOutput};
use crate::errors::ExecutionError;
use crate::observability::messages::engine::StageRouted;
use crate::observability::messages::StructuredLog;
use crate::traits::{PipelineExecutor, Stages};

/// Position-routed selection.
///
/// Each symbol of a digit string picks module `digit % N`. The picked module
/// receives `"<position> -"` as text and its reply is reported against that
/// position. Calls run one at a time in symbol order; outputs never feed
/// each other.
#[derive(Debug, Default)]
pub struct RoutedExecutor;

impl RoutedExecutor {
    pub fn new() -> Self {
        Self
    }
}

/// Map every symbol to `(position, symbol, module_index)`.
///
/// Rejects the whole string if any symbol is not an ASCII digit, so no module
/// runs on bad input.
fn route(symbols: &str, module_count: usize) -> Result<Vec<(usize, char, usize)>, ExecutionError> {
    symbols
        .chars()
        .enumerate()
        .map(|(position, symbol)| {
            symbol
                .to_digit(10)
                .map(|digit| (position, symbol, digit as usize % module_count))
                .ok_or_else(|| ExecutionError::InvalidInput {
                    message: format!(
                        "symbol '{}' at position {} is not a decimal digit",
                        symbol, position
                    ),
                })
        })
        .collect()
}

#[async_trait]
impl PipelineExecutor for RoutedExecutor {
    async fn execute(
        &self,
        stages: &Stages,
        input: PipelineInput,
    ) -> Result<PipelineOutput, ExecutionError> {
        let PipelineInput::Symbols(symbols) = input else {
            return Err(ExecutionError::InputMismatch {
                strategy: self.strategy_name(),
                expected: "a digit string",
            });
        };
        if stages.is_empty() {
            return Err(ExecutionError::NoStages);
        }
        let routes = route(&symbols, stages.len())?;

        traced(self.strategy_name(), stages.len(), 1, async move {
            let mut outputs = Vec::with_capacity(routes.len());

            for (position, symbol, module_index) in routes {
                let stage = stages.get(module_index).ok_or_else(|| {
                    ExecutionError::InternalError {
                        message: format!("no stage at index {}", module_index),
                    }
                })?;
                StageRouted {
                    position,
                    symbol,
                    module_index,
                    module_id: stage.module_id(),
                }
                .log();

                let payload = format!("{} -", position);
                let text = run_stage(position, stage, move |invoker, function| {
                    invoke_payload::<String, String>(invoker, function, &payload)
                })
                .await?;

                outputs.push(RoutedOutput {
                    position,
                    symbol,
                    module_index,
                    module_id: stage.module_id().to_string(),
                    text,
                });
            }

            Ok(PipelineOutput::Routed(outputs))
        })
        .await
    }

    fn strategy_name(&self) -> &'static str {
        "routed"
    }
}
