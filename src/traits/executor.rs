// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::{PipelineInput, PipelineOutput};
use crate::errors::ExecutionError;
use crate::traits::invoker::GuestInvoker;
use async_trait::async_trait;
use std::sync::Arc;

/// One (module, export) application in a pipeline.
#[derive(Clone)]
pub struct Stage {
    pub invoker: Arc<dyn GuestInvoker>,
    pub function: String,
}

impl Stage {
    pub fn new(invoker: Arc<dyn GuestInvoker>, function: impl Into<String>) -> Self {
        Self {
            invoker,
            function: function.into(),
        }
    }

    pub fn module_id(&self) -> &str {
        self.invoker.id()
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("module_id", &self.invoker.id())
            .field("function", &self.function)
            .finish()
    }
}

/// Newtype wrapper for the ordered stage list. Order is fixed before execution.
#[derive(Debug, Clone, Default)]
pub struct Stages(pub Vec<Stage>);

impl Stages {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, stage: Stage) {
        self.0.push(stage);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.0.iter()
    }
}

impl From<Vec<Stage>> for Stages {
    fn from(stages: Vec<Stage>) -> Self {
        Self(stages)
    }
}

#[async_trait]
pub trait PipelineExecutor: Send + Sync {
    /// Run `input` through `stages` according to this executor's policy.
    ///
    /// Returns the strategy-specific output, or the first (or aggregated)
    /// stage failure. Partial results are never returned.
    async fn execute(
        &self,
        stages: &Stages,
        input: PipelineInput,
    ) -> Result<PipelineOutput, ExecutionError>;

    /// Strategy name as written in configuration.
    fn strategy_name(&self) -> &'static str;
}
