// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Guest allocation lifecycle.
//!
//! The host never owns guest memory directly: it asks the guest's exported
//! allocator for a region, writes into it, and must hand it back through the
//! guest's exported deallocator. This module turns that inverted ownership
//! into values the type system can track:
//!
//! - `GuestAllocation` is a region the host currently owns. It is neither
//!   `Clone` nor `Copy`, and releasing it consumes it, so a region cannot be
//!   freed twice.
//! - `AllocatorExports` is the resolved pair of allocate/free exports.
//! - `AllocationLedger` counts what happened during one instance's lifetime so
//!   leaks and double frees show up in logs and tests.
//!
//! The scoped acquire/release wrappers live on `ModuleInstance`
//! (`with_allocation` and `adopt`), which always release on every exit path.

use crate::backends::wasm::packed_ref::PackedRef;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use wasmtime::{AsContextMut, Func, Instance, Store, TypedFunc, ValType};

/// Allocator export used by TinyGo and libc-style guests.
pub const DEFAULT_ALLOCATE_EXPORT: &str = "malloc";
/// Deallocator export used by TinyGo and libc-style guests.
pub const DEFAULT_RELEASE_EXPORT: &str = "free";

/// Names of the guest's allocator and deallocator exports.
///
/// ```yaml
/// allocator:
///   allocate: allocate
///   release: deallocate
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AllocatorNames {
    #[serde(default = "default_allocate")]
    pub allocate: String,
    #[serde(default = "default_release")]
    pub release: String,
}

fn default_allocate() -> String {
    DEFAULT_ALLOCATE_EXPORT.to_string()
}

fn default_release() -> String {
    DEFAULT_RELEASE_EXPORT.to_string()
}

impl Default for AllocatorNames {
    fn default() -> Self {
        Self {
            allocate: default_allocate(),
            release: default_release(),
        }
    }
}

/// A region of guest linear memory currently owned by the host.
#[derive(Debug, PartialEq, Eq)]
pub struct GuestAllocation {
    address: u32,
    length: u32,
}

impl GuestAllocation {
    pub(crate) fn new(address: u32, length: u32) -> Self {
        Self { address, length }
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// The reference passed to (or received from) the guest for this region.
    pub fn as_packed(&self) -> PackedRef {
        PackedRef::new(self.address, self.length)
    }
}

/// Shape of the guest deallocator, detected from its declared signature.
enum ReleaseFunc {
    /// `free(address)`
    Address(TypedFunc<u32, ()>),
    /// `deallocate(address, length)`
    AddressAndLength(TypedFunc<(u32, u32), ()>),
}

/// Resolved allocate/free exports of one instance.
pub struct AllocatorExports {
    allocate: TypedFunc<u32, u32>,
    release: ReleaseFunc,
}

impl AllocatorExports {
    /// Look up both exports and check their signatures.
    ///
    /// Returns a human-readable reason on failure; the caller turns it into
    /// `WasmError::AllocationFailed` with module context.
    pub fn resolve<T>(
        store: &mut Store<T>,
        instance: &Instance,
        names: &AllocatorNames,
    ) -> Result<Self, String> {
        let allocate = instance
            .get_typed_func::<u32, u32>(&mut *store, &names.allocate)
            .map_err(|e| {
                format!(
                    "allocator export '{}' with signature (i32) -> i32 not available: {}",
                    names.allocate, e
                )
            })?;

        let release_func: Func = instance
            .get_func(&mut *store, &names.release)
            .ok_or_else(|| format!("deallocator export '{}' not found", names.release))?;

        let param_count = release_func.ty(&*store).params().len();
        let release = match param_count {
            1 => ReleaseFunc::Address(
                release_func
                    .typed::<u32, ()>(&*store)
                    .map_err(|e| format!("deallocator '{}': {}", names.release, e))?,
            ),
            2 => ReleaseFunc::AddressAndLength(
                release_func
                    .typed::<(u32, u32), ()>(&*store)
                    .map_err(|e| format!("deallocator '{}': {}", names.release, e))?,
            ),
            n => {
                return Err(format!(
                    "deallocator '{}' takes {} parameters, expected (i32) or (i32, i32)",
                    names.release, n
                ))
            }
        };

        Ok(Self { allocate, release })
    }

    /// Call the guest allocator. A null address is returned as-is; the caller decides.
    pub fn allocate(&self, store: impl AsContextMut, length: u32) -> wasmtime::Result<u32> {
        self.allocate.call(store, length)
    }

    /// Call the guest deallocator for a region the host owns.
    pub fn release(
        &self,
        store: impl AsContextMut,
        allocation: &GuestAllocation,
    ) -> wasmtime::Result<()> {
        match &self.release {
            ReleaseFunc::Address(free) => free.call(store, allocation.address),
            ReleaseFunc::AddressAndLength(dealloc) => {
                dealloc.call(store, (allocation.address, allocation.length))
            }
        }
    }
}

/// Per-instance accounting of guest allocations.
///
/// `allocated` counts regions the host requested, `adopted` counts non-null
/// references the guest handed back, `released` counts successful frees and
/// `leaked` counts frees that trapped. A balanced instance has nothing
/// outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationLedger {
    pub allocated: u32,
    pub adopted: u32,
    pub released: u32,
    pub leaked: u32,
}

impl AllocationLedger {
    pub fn outstanding(&self) -> u32 {
        (self.allocated + self.adopted).saturating_sub(self.released + self.leaked)
    }

    pub fn is_balanced(&self) -> bool {
        self.outstanding() == 0 && self.leaked == 0
    }
}

impl Display for AllocationLedger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "allocated={} adopted={} released={} leaked={}",
            self.allocated, self.adopted, self.released, self.leaked
        )
    }
}

/// Render a function signature the way error messages show it, e.g. `(i32, i32) -> i64`.
pub(crate) fn describe_signature(
    params: impl Iterator<Item = ValType>,
    results: impl Iterator<Item = ValType>,
) -> String {
    fn name(ty: &ValType) -> String {
        match ty {
            ValType::I32 => "i32".to_string(),
            ValType::I64 => "i64".to_string(),
            ValType::F32 => "f32".to_string(),
            ValType::F64 => "f64".to_string(),
            other => format!("{:?}", other),
        }
    }
    let params: Vec<String> = params.map(|t| name(&t)).collect();
    let results: Vec<String> = results.map(|t| name(&t)).collect();
    match results.len() {
        0 => format!("({})", params.join(", ")),
        1 => format!("({}) -> {}", params.join(", "), results[0]),
        _ => format!("({}) -> ({})", params.join(", "), results.join(", ")),
    }
}
