// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline orchestration: one strategy abstraction over one invocation
//! primitive.
//!
//! | strategy     | input             | module selection       | output            |
//! |--------------|-------------------|------------------------|-------------------|
//! | `fan_out`    | numeric operands  | every module           | values per module |
//! | `routed`     | digit string      | `digit % N` per symbol | text per symbol   |
//! | `accumulate` | `{input, output}` | every module, in order | final record      |

pub mod accumulate;
pub mod document;
pub mod factory;
pub mod fan_out;
pub mod pipeline;
pub mod routed;

pub use accumulate::AccumulateExecutor;
pub use document::{Document, Record};
pub use factory::ExecutorFactory;
pub use fan_out::FanOutExecutor;
pub use pipeline::{PipelineInput, PipelineOutput, RoutedOutput, StageValues};
pub use routed::RoutedExecutor;
