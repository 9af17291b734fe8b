// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{Config, Strategy};
use crate::engine::accumulate::AccumulateExecutor;
use crate::engine::fan_out::FanOutExecutor;
use crate::engine::routed::RoutedExecutor;
use crate::traits::PipelineExecutor;

/// Factory for creating pipeline executors from configuration
pub struct ExecutorFactory;

impl ExecutorFactory {
    /// Create a pipeline executor based on the configuration strategy
    pub fn from_config(cfg: &Config) -> Box<dyn PipelineExecutor> {
        match cfg.strategy {
            Strategy::FanOut => Box::new(FanOutExecutor::new(
                Self::max_concurrency(cfg),
                cfg.failure_strategy,
            )),
            Strategy::Routed => Box::new(RoutedExecutor::new()),
            Strategy::Accumulate => Box::new(AccumulateExecutor::new()),
        }
    }

    fn max_concurrency(cfg: &Config) -> usize {
        cfg.executor_options.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }
}
