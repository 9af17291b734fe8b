// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tracing::debug;

use crate::backends::wasm::{invoke_payload, Json, WasmError, WasmResult};
use crate::engine::document::Document;
use crate::engine::pipeline::{run_stage, traced, PipelineInput, PipelineOutput};
use crate::errors::ExecutionError;
use crate::traits::{GuestInvoker, PipelineExecutor, Stages};

/// Sequential accumulation over a `{input, output}` record.
///
/// Stage `k` receives exactly what stage `k - 1` returned. After every stage
/// the record is checked: `input` must be unchanged and the earlier `output`
/// entries must survive as a prefix.
#[derive(Debug, Default)]
pub struct AccumulateExecutor;

impl AccumulateExecutor {
    pub fn new() -> Self {
        Self
    }
}

/// Run one stage over `record` and return its successor.
fn advance(invoker: &dyn GuestInvoker, function: &str, record: Document) -> WasmResult<Document> {
    let sent = Json(record);
    let Json(next) = invoke_payload::<_, Json<Document>>(invoker, function, &sent)?
        .ok_or_else(|| WasmError::MissingPayload {
            module_id: invoker.id().to_string(),
            function: function.to_string(),
        })?;

    let Json(record) = sent;
    record.verify_successor(&next)?;
    debug!(
        "Module '{}' appended {} output entries",
        invoker.id(),
        record.appended_by(&next).len()
    );
    Ok(next)
}

#[async_trait]
impl PipelineExecutor for AccumulateExecutor {
    async fn execute(
        &self,
        stages: &Stages,
        input: PipelineInput,
    ) -> Result<PipelineOutput, ExecutionError> {
        let PipelineInput::Record(record) = input else {
            return Err(ExecutionError::InputMismatch {
                strategy: self.strategy_name(),
                expected: "an initial record",
            });
        };
        if stages.is_empty() {
            return Err(ExecutionError::NoStages);
        }

        traced(self.strategy_name(), stages.len(), 1, async move {
            let mut current = record;
            for (stage_index, stage) in stages.iter().enumerate() {
                current = run_stage(stage_index, stage, move |invoker, function| {
                    advance(invoker, function, current)
                })
                .await?;
            }
            Ok(PipelineOutput::Record(current))
        })
        .await
    }

    fn strategy_name(&self) -> &'static str {
        "accumulate"
    }
}
