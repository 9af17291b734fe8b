// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod allocation;
pub mod capability_manager;
pub mod detector;
pub mod error;
pub mod factory;
pub mod instance;
pub mod loader;
pub mod module;
pub mod packed_ref;
pub mod payload;
#[cfg(test)]
pub mod test_guests;

pub use allocation::{AllocationLedger, AllocatorNames, GuestAllocation};
pub use error::{WasmError, WasmResult};
pub use factory::GuestModuleFactory;
pub use module::{GuestModule, InstanceSettings};
pub use packed_ref::PackedRef;
pub use payload::{invoke_payload, Json, Payload};
