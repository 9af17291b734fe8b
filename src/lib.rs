// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // guest module backends
pub mod config;     // pipeline files + runtime builder
pub mod engine;     // pipeline executors
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // unified abstractions
