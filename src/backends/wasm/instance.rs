// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Guest instance and invocation protocol
//!
//! A `ModuleInstance` is one store plus one instantiated module, created for a
//! single invocation and dropped afterwards. It owns the allocation ledger and
//! implements the three call shapes:
//!
//! 1. `call_numeric` - integers in, integers out, no guest memory involved
//! 2. `call_packed` - payload in as `(address, length)`, payload out as a packed `i64`
//! 3. `call_packed_numeric` - payload in as `(address, length)`, integer out
//!
//! ## Memory ownership
//!
//! Host-written input goes through `with_allocation`, guest-returned output
//! goes through `adopt`. Both release the region after their scope runs,
//! whether the scope succeeded or not:
//!
//! ```text
//! allocate(len) -> write -> call entry -> release input
//!                                 |
//!                                 +-> packed ref -> read -> release output
//! ```
//!
//! Empty payloads skip allocation entirely and pass `(0, 0)`. A returned null
//! reference is neither read nor released.

use crate::backends::wasm::allocation::{
    describe_signature, AllocationLedger, AllocatorExports, AllocatorNames, GuestAllocation,
};
use crate::backends::wasm::capability_manager::HostState;
use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::backends::wasm::module::InstanceSettings;
use crate::backends::wasm::packed_ref::PackedRef;
use crate::observability::messages::wasm::GuestAllocationLeaked;
use crate::observability::messages::StructuredLog;
use std::fmt::Display;
use wasmtime::{Func, Instance, Linker, Memory, Module, Store, Val, ValType};

const MEMORY_EXPORT: &str = "memory";
const REACTOR_INITIALIZER: &str = "_initialize";
const INSTANTIATE: &str = "instantiate";
/// Fuel a release may spend after the guest call that preceded it ran dry.
const RELEASE_FUEL: u64 = 10_000;

pub struct ModuleInstance {
    module_id: String,
    store: Store<HostState>,
    instance: Instance,
    memory: Option<Memory>,
    allocator_names: AllocatorNames,
    allocator: Option<AllocatorExports>,
    ledger: AllocationLedger,
    fuel_budget: u64,
    max_payload_bytes: usize,
}

impl ModuleInstance {
    /// Create a fresh store, link WASI and instantiate the module.
    ///
    /// Reactor-style guests exporting `_initialize` have it run once here.
    /// The allocator is resolved lazily, so purely numeric guests need not
    /// export one.
    pub fn instantiate(
        module_id: &str,
        linker: &Linker<HostState>,
        module: &Module,
        settings: &InstanceSettings,
    ) -> WasmResult<Self> {
        let mut store = Store::new(module.engine(), HostState::new(&settings.wasi, module_id));
        store
            .set_fuel(settings.fuel)
            .map_err(|e| WasmError::EngineError(format!("Failed to set fuel: {:#}", e)))?;

        let instance = linker
            .instantiate(&mut store, module)
            .map_err(|e| execution_failed(module_id, INSTANTIATE, e))?;

        if let Ok(initialize) = instance.get_typed_func::<(), ()>(&mut store, REACTOR_INITIALIZER) {
            initialize
                .call(&mut store, ())
                .map_err(|e| execution_failed(module_id, REACTOR_INITIALIZER, e))?;
        }

        let memory = instance.get_memory(&mut store, MEMORY_EXPORT);

        Ok(Self {
            module_id: module_id.to_string(),
            store,
            instance,
            memory,
            allocator_names: settings.allocator.clone(),
            allocator: None,
            ledger: AllocationLedger::default(),
            fuel_budget: settings.fuel,
            max_payload_bytes: settings.max_payload_bytes,
        })
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn ledger(&self) -> AllocationLedger {
        self.ledger
    }

    pub fn fuel_consumed(&self) -> u64 {
        self.store
            .get_fuel()
            .map(|remaining| self.fuel_budget.saturating_sub(remaining))
            .unwrap_or(0)
    }

    // ---- allocation lifecycle ----

    fn resolve_allocator(&mut self) -> Result<(), String> {
        if self.allocator.is_none() {
            let exports =
                AllocatorExports::resolve(&mut self.store, &self.instance, &self.allocator_names)?;
            self.allocator = Some(exports);
        }
        Ok(())
    }

    /// Ask the guest for `length` bytes.
    pub fn allocate(&mut self, length: u32) -> WasmResult<GuestAllocation> {
        self.resolve_allocator()
            .map_err(|reason| self.allocation_failed(length, reason))?;

        let Some(allocator) = self.allocator.as_ref() else {
            return Err(self.allocation_failed(length, "allocator unavailable".to_string()));
        };

        let address = allocator
            .allocate(&mut self.store, length)
            .map_err(|e| self.allocation_failed(length, format!("{:#}", e)))?;

        if address == 0 && length > 0 {
            return Err(self.allocation_failed(length, "allocator returned a null address".to_string()));
        }

        if address != 0 {
            self.ledger.allocated += 1;
        }
        Ok(GuestAllocation::new(address, length))
    }

    /// Hand a region back to the guest.
    ///
    /// A null address is a no-op. A failing release is recorded as a leak and
    /// logged; it never fails the surrounding call.
    pub fn release(&mut self, allocation: GuestAllocation) {
        if allocation.address() == 0 {
            return;
        }

        if let Err(reason) = self.resolve_allocator() {
            self.record_leak(&allocation, &reason);
            return;
        }
        let Some(allocator) = self.allocator.as_ref() else {
            return;
        };

        if let Ok(remaining) = self.store.get_fuel() {
            if remaining < RELEASE_FUEL && self.store.set_fuel(RELEASE_FUEL).is_ok() {
                self.fuel_budget += RELEASE_FUEL - remaining;
            }
        }

        match allocator.release(&mut self.store, &allocation) {
            Ok(()) => self.ledger.released += 1,
            Err(e) => {
                let reason = format!("{:#}", e);
                self.record_leak(&allocation, &reason);
            }
        }
    }

    fn record_leak(&mut self, allocation: &GuestAllocation, reason: &str) {
        self.ledger.leaked += 1;
        GuestAllocationLeaked {
            module_id: &self.module_id,
            address: allocation.address(),
            length: allocation.length(),
            error: &reason,
        }
        .log();
    }

    /// Allocate a region, copy `bytes` into it, run `scope`, release the region.
    ///
    /// A failed write releases the region and returns before `scope` runs.
    pub fn with_allocation<R>(
        &mut self,
        bytes: &[u8],
        scope: impl FnOnce(&mut Self, &GuestAllocation) -> WasmResult<R>,
    ) -> WasmResult<R> {
        let length = self.checked_length(bytes.len())?;
        let allocation = self.allocate(length)?;

        if let Err(error) = self.write(&allocation, bytes) {
            self.release(allocation);
            return Err(error);
        }

        let result = scope(self, &allocation);
        self.release(allocation);
        result
    }

    /// Take ownership of a region the guest handed back, run `scope`, release it.
    ///
    /// A null reference runs `scope` with `None` and releases nothing.
    pub fn adopt<R>(
        &mut self,
        reference: PackedRef,
        scope: impl FnOnce(&mut Self, Option<&GuestAllocation>) -> WasmResult<R>,
    ) -> WasmResult<R> {
        if reference.is_null() {
            return scope(self, None);
        }

        self.ledger.adopted += 1;
        let allocation = GuestAllocation::new(reference.address(), reference.length());
        let result = scope(self, Some(&allocation));
        self.release(allocation);
        result
    }

    fn with_payload<R>(
        &mut self,
        payload: &[u8],
        scope: impl FnOnce(&mut Self, PackedRef) -> WasmResult<R>,
    ) -> WasmResult<R> {
        if payload.is_empty() {
            return scope(self, PackedRef::NULL);
        }
        self.with_allocation(payload, |this, allocation| scope(this, allocation.as_packed()))
    }

    // ---- linear memory ----

    fn memory(&self) -> WasmResult<Memory> {
        self.memory.ok_or_else(|| {
            execution_failed(&self.module_id, MEMORY_EXPORT, "module does not export 'memory'")
        })
    }

    pub fn write(&mut self, allocation: &GuestAllocation, bytes: &[u8]) -> WasmResult<()> {
        if bytes.len() > allocation.length() as usize {
            return Err(WasmError::ValidationError(format!(
                "{} bytes do not fit a {} byte allocation",
                bytes.len(),
                allocation.length()
            )));
        }
        let memory = self.memory()?;
        memory
            .write(&mut self.store, allocation.address() as usize, bytes)
            .map_err(|_| self.out_of_bounds(memory, allocation.address(), bytes.len() as u32))
    }

    pub fn read(&self, allocation: &GuestAllocation) -> WasmResult<Vec<u8>> {
        let length = allocation.length() as usize;
        if length > self.max_payload_bytes {
            return Err(WasmError::PayloadTooLarge {
                size: length,
                max: self.max_payload_bytes,
            });
        }
        let memory = self.memory()?;
        let mut buffer = vec![0u8; length];
        memory
            .read(&self.store, allocation.address() as usize, &mut buffer)
            .map_err(|_| self.out_of_bounds(memory, allocation.address(), allocation.length()))?;
        Ok(buffer)
    }

    // ---- call shapes ----

    /// Integers in, integers out.
    ///
    /// Each argument is converted to the declared parameter type: an `i32`
    /// parameter accepts `0..=u32::MAX`, an `i64` parameter any `u64`. Values
    /// are passed as bit patterns; results come back zero-extended.
    pub fn call_numeric(&mut self, function: &str, args: &[u64]) -> WasmResult<Vec<u64>> {
        let func = self.export(function)?;
        let (params, results) = self.signature(&func);

        if params.len() != args.len()
            || !params.iter().all(is_integer)
            || !results.iter().all(is_integer)
        {
            let expected = format!("{} integer parameters with integer results", args.len());
            return Err(self.mismatch(function, &expected, &params, &results));
        }

        let inputs = params
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (ty, &arg))| {
                to_val(ty, arg).ok_or_else(|| {
                    WasmError::ValidationError(format!(
                        "argument {} ({}) does not fit the i32 parameter of '{}'",
                        index, arg, function
                    ))
                })
            })
            .collect::<WasmResult<Vec<Val>>>()?;
        let mut outputs: Vec<Val> = results.iter().map(zero).collect();

        func.call(&mut self.store, &inputs, &mut outputs)
            .map_err(|e| execution_failed(&self.module_id, function, e))?;

        Ok(outputs.iter().map(from_val).collect())
    }

    /// Payload in, payload out. `Ok(None)` when the guest returns the null reference.
    pub fn call_packed(&mut self, function: &str, payload: &[u8]) -> WasmResult<Option<Vec<u8>>> {
        let func = self.export(function)?;
        let (params, results) = self.signature(&func);

        if !is_address_pair(&params) || !matches!(results.as_slice(), [ValType::I64]) {
            return Err(self.mismatch(function, "(i32, i32) -> i64", &params, &results));
        }

        let entry = func
            .typed::<(u32, u32), u64>(&self.store)
            .map_err(|e| execution_failed(&self.module_id, function, e))?;

        let returned = self.with_payload(payload, |this, input| {
            entry
                .call(&mut this.store, (input.address(), input.length()))
                .map_err(|e| execution_failed(&this.module_id, function, e))
        })?;

        self.adopt(PackedRef::decode(returned), |this, output| match output {
            Some(allocation) => this.read(allocation).map(Some),
            None => Ok(None),
        })
    }

    /// Payload in, integer out. Only the input region is released.
    pub fn call_packed_numeric(&mut self, function: &str, payload: &[u8]) -> WasmResult<u64> {
        let func = self.export(function)?;
        let (params, results) = self.signature(&func);

        let result_type = match (is_address_pair(&params), results.as_slice()) {
            (true, [ty @ (ValType::I32 | ValType::I64)]) => ty.clone(),
            _ => {
                return Err(self.mismatch(function, "(i32, i32) -> i32|i64", &params, &results));
            }
        };

        let mut outputs = vec![zero(&result_type)];
        self.with_payload(payload, |this, input| {
            let inputs = [
                Val::I32(input.address() as i32),
                Val::I32(input.length() as i32),
            ];
            func.call(&mut this.store, &inputs, &mut outputs)
                .map_err(|e| execution_failed(&this.module_id, function, e))
        })?;

        Ok(from_val(&outputs[0]))
    }

    // ---- helpers ----

    fn export(&mut self, function: &str) -> WasmResult<Func> {
        self.instance
            .get_func(&mut self.store, function)
            .ok_or_else(|| {
                execution_failed(&self.module_id, function, format!("export '{}' not found", function))
            })
    }

    fn signature(&self, func: &Func) -> (Vec<ValType>, Vec<ValType>) {
        let ty = func.ty(&self.store);
        (ty.params().collect(), ty.results().collect())
    }

    fn checked_length(&self, size: usize) -> WasmResult<u32> {
        if size > self.max_payload_bytes {
            return Err(WasmError::PayloadTooLarge {
                size,
                max: self.max_payload_bytes,
            });
        }
        Ok(PackedRef::from_len(0, size)?.length())
    }

    fn mismatch(
        &self,
        function: &str,
        expected: &str,
        params: &[ValType],
        results: &[ValType],
    ) -> WasmError {
        WasmError::SignatureMismatch {
            module_id: self.module_id.clone(),
            function: function.to_string(),
            expected: expected.to_string(),
            found: describe_signature(params.iter().cloned(), results.iter().cloned()),
        }
    }

    fn allocation_failed(&self, requested: u32, reason: String) -> WasmError {
        WasmError::AllocationFailed {
            module_id: self.module_id.clone(),
            requested,
            reason,
        }
    }

    fn out_of_bounds(&self, memory: Memory, address: u32, length: u32) -> WasmError {
        WasmError::OutOfBounds {
            module_id: self.module_id.clone(),
            address,
            length,
            memory_size: memory.data_size(&self.store),
        }
    }
}

fn execution_failed(module_id: &str, function: &str, reason: impl Display) -> WasmError {
    WasmError::ExecutionFailed {
        module_id: module_id.to_string(),
        function: function.to_string(),
        reason: format!("{:#}", reason),
    }
}

fn is_integer(ty: &ValType) -> bool {
    matches!(ty, ValType::I32 | ValType::I64)
}

fn is_address_pair(params: &[ValType]) -> bool {
    matches!(params, [ValType::I32, ValType::I32])
}

fn zero(ty: &ValType) -> Val {
    match ty {
        ValType::I64 => Val::I64(0),
        _ => Val::I32(0),
    }
}

fn to_val(ty: &ValType, arg: u64) -> Option<Val> {
    match ty {
        ValType::I32 => u32::try_from(arg).ok().map(|v| Val::I32(v as i32)),
        _ => Some(Val::I64(arg as i64)),
    }
}

fn from_val(val: &Val) -> u64 {
    match val {
        Val::I32(v) => *v as u32 as u64,
        Val::I64(v) => *v as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::wasm::test_guests;

    fn counter(instance: &mut ModuleInstance, export: &str) -> u64 {
        instance.call_numeric(export, &[]).unwrap()[0]
    }

    #[test]
    fn test_packed_call_round_trips_text() {
        let guest = test_guests::module("alice", &test_guests::greeter(" from alice"));
        let mut instance = guest.instantiate().unwrap();

        let output = instance.call_packed("greeting", b"0 -").unwrap().unwrap();
        assert_eq!(output, b"0 - from alice");

        let ledger = instance.ledger();
        assert_eq!(ledger.allocated, 1);
        assert_eq!(ledger.adopted, 1);
        assert_eq!(ledger.released, 2);
        assert!(ledger.is_balanced());

        // input region from the host plus output region from the guest
        assert_eq!(counter(&mut instance, "alloc_count"), 2);
        assert_eq!(counter(&mut instance, "free_count"), 2);
    }

    #[test]
    fn test_empty_payload_skips_allocation() {
        let guest = test_guests::module("alice", &test_guests::greeter("!"));
        let mut instance = guest.instantiate().unwrap();

        let output = instance.call_packed("greeting", b"").unwrap().unwrap();
        assert_eq!(output, b"!");
        assert_eq!(instance.ledger().allocated, 0);
        assert!(instance.ledger().is_balanced());
    }

    #[test]
    fn test_null_reference_is_neither_read_nor_released() {
        let guest = test_guests::module("nobody", &test_guests::returns_null());
        let mut instance = guest.instantiate().unwrap();

        assert_eq!(instance.call_packed("greeting", b"hello").unwrap(), None);

        let ledger = instance.ledger();
        assert_eq!(ledger.adopted, 0);
        assert_eq!(ledger.released, 1, "only the input region is released");
        assert_eq!(counter(&mut instance, "free_count"), 1);
    }

    #[test]
    fn test_trap_still_releases_input() {
        let guest = test_guests::module("crasher", &test_guests::trapping());
        let mut instance = guest.instantiate().unwrap();

        match instance.call_packed("greeting", b"doomed") {
            Err(WasmError::ExecutionFailed {
                module_id,
                function,
                reason,
            }) => {
                assert_eq!(module_id, "crasher");
                assert_eq!(function, "greeting");
                assert!(reason.contains("unreachable"), "reason was: {}", reason);
            }
            other => panic!("Expected ExecutionFailed, got {:?}", other),
        }

        assert!(instance.ledger().is_balanced());
        assert_eq!(counter(&mut instance, "free_count"), 1);
    }

    #[test]
    fn test_out_of_bounds_write_aborts_before_call() {
        let guest = test_guests::module("cramped", test_guests::cramped_allocator());
        let mut instance = guest.instantiate().unwrap();

        match instance.call_packed("greeting", b"0123456789") {
            Err(WasmError::OutOfBounds {
                address,
                length,
                memory_size,
                ..
            }) => {
                assert_eq!(address, 65530);
                assert_eq!(length, 10);
                assert_eq!(memory_size, 65536);
            }
            other => panic!("Expected OutOfBounds, got {:?}", other),
        }

        assert_eq!(counter(&mut instance, "calls"), 0);
        assert_eq!(counter(&mut instance, "free_count"), 1);
        assert!(instance.ledger().is_balanced());
    }

    #[test]
    fn test_out_of_bounds_read_still_releases_output() {
        let guest = test_guests::module("liar", &test_guests::returns_out_of_range());
        let mut instance = guest.instantiate().unwrap();

        let result = instance.call_packed("greeting", b"hi");
        assert!(matches!(result, Err(WasmError::OutOfBounds { address: 60000, .. })));

        let ledger = instance.ledger();
        assert_eq!(ledger.adopted, 1);
        assert_eq!(ledger.released, 2);
    }

    #[test]
    fn test_null_allocation_fails() {
        let guest = test_guests::module("stingy", test_guests::null_allocator());
        let mut instance = guest.instantiate().unwrap();

        let result = instance.call_packed("greeting", b"hi");
        assert!(matches!(
            result,
            Err(WasmError::AllocationFailed { requested: 2, .. })
        ));
    }

    #[test]
    fn test_missing_allocator_only_matters_for_payloads() {
        let guest = test_guests::module("bare", test_guests::without_allocator());
        let mut instance = guest.instantiate().unwrap();

        let result = instance.call_packed("greeting", b"hi");
        match result {
            Err(WasmError::AllocationFailed { reason, .. }) => assert!(reason.contains("malloc")),
            other => panic!("Expected AllocationFailed, got {:?}", other),
        }

        // with no input to write, the output region is read and its release is a recorded leak
        let mut instance = guest.instantiate().unwrap();
        let output = instance.call_packed("greeting", b"").unwrap().unwrap();
        assert_eq!(output, b"empty");
        assert_eq!(instance.ledger().leaked, 1);
    }

    #[test]
    fn test_trapping_release_is_logged_not_raised() {
        let guest = test_guests::module("leaky", test_guests::trapping_free());
        let mut instance = guest.instantiate().unwrap();

        let count = instance.call_packed_numeric("count", b"four").unwrap();
        assert_eq!(count, 4);

        let ledger = instance.ledger();
        assert_eq!(ledger.allocated, 1);
        assert_eq!(ledger.leaked, 1);
        assert!(!ledger.is_balanced());
    }

    #[test]
    fn test_two_parameter_release_receives_length() {
        let settings = InstanceSettings {
            allocator: AllocatorNames {
                allocate: "allocate".to_string(),
                release: "deallocate".to_string(),
            },
            ..InstanceSettings::default()
        };
        let guest = test_guests::module_with("rusty", test_guests::rust_style_allocator(), settings);
        let mut instance = guest.instantiate().unwrap();

        let count = instance.call_packed_numeric("count", b"seven!!").unwrap();
        assert_eq!(count, 7);
        assert_eq!(counter(&mut instance, "last_release_len"), 7);
        assert!(instance.ledger().is_balanced());
    }

    #[test]
    fn test_numeric_call_i32_and_i64() {
        let guest = test_guests::module("sum", &test_guests::numeric("add", "i32"));
        let mut instance = guest.instantiate().unwrap();
        assert_eq!(instance.call_numeric("act", &[2, 3]).unwrap(), vec![5]);

        let guest = test_guests::module("product", &test_guests::numeric("mul", "i64"));
        let mut instance = guest.instantiate().unwrap();
        assert_eq!(
            instance.call_numeric("act", &[1 << 33, 3]).unwrap(),
            vec![3 << 33]
        );
        assert_eq!(instance.ledger(), AllocationLedger::default());
    }

    #[test]
    fn test_numeric_argument_must_fit_parameter() {
        let guest = test_guests::module("sum", &test_guests::numeric("add", "i32"));
        let mut instance = guest.instantiate().unwrap();

        let result = instance.call_numeric("act", &[u64::from(u32::MAX) + 1, 1]);
        assert!(matches!(result, Err(WasmError::ValidationError(_))));
    }

    #[test]
    fn test_signature_mismatch_is_reported() {
        let guest = test_guests::module("sum", &test_guests::numeric("add", "i32"));
        let mut instance = guest.instantiate().unwrap();

        match instance.call_packed("act", b"x") {
            Err(WasmError::SignatureMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, "(i32, i32) -> i64");
                assert_eq!(found, "(i32, i32) -> i32");
            }
            other => panic!("Expected SignatureMismatch, got {:?}", other),
        }

        let result = instance.call_numeric("act", &[1]);
        assert!(matches!(result, Err(WasmError::SignatureMismatch { .. })));
    }

    #[test]
    fn test_missing_export_is_execution_failure() {
        let guest = test_guests::module("sum", &test_guests::numeric("add", "i32"));
        let mut instance = guest.instantiate().unwrap();

        match instance.call_numeric("nope", &[]) {
            Err(WasmError::ExecutionFailed { function, .. }) => assert_eq!(function, "nope"),
            other => panic!("Expected ExecutionFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_fuel_exhaustion_is_execution_failure() {
        let settings = InstanceSettings {
            fuel: 10_000,
            ..InstanceSettings::default()
        };
        let guest = test_guests::module_with("spinner", test_guests::spinner(), settings);
        let mut instance = guest.instantiate().unwrap();

        match instance.call_numeric("act", &[1, 2]) {
            Err(WasmError::ExecutionFailed { reason, .. }) => {
                assert!(reason.contains("fuel"), "reason was: {}", reason)
            }
            other => panic!("Expected ExecutionFailed, got {:?}", other),
        }
        assert_eq!(instance.fuel_consumed(), 10_000);
    }

    #[test]
    fn test_fuel_exhaustion_still_releases_input() {
        let settings = InstanceSettings {
            fuel: 10_000,
            ..InstanceSettings::default()
        };
        let guest = test_guests::module_with("runaway", &test_guests::packed_spinner(), settings);
        let mut instance = guest.instantiate().unwrap();

        match instance.call_packed("greeting", b"hello") {
            Err(WasmError::ExecutionFailed { reason, .. }) => {
                assert!(reason.contains("fuel"), "reason was: {}", reason)
            }
            other => panic!("Expected ExecutionFailed, got {:?}", other),
        }

        let ledger = instance.ledger();
        assert_eq!(ledger.allocated, 1);
        assert_eq!(ledger.released, 1);
        assert!(ledger.is_balanced(), "ledger was: {}", ledger);
        assert_eq!(counter(&mut instance, "free_count"), 1);
    }

    #[test]
    fn test_oversized_guest_output_is_rejected() {
        let settings = InstanceSettings {
            max_payload_bytes: 4,
            ..InstanceSettings::default()
        };
        let guest = test_guests::module_with(
            "chatty",
            &test_guests::constant("greeting", "too long", 8),
            settings,
        );
        let mut instance = guest.instantiate().unwrap();

        let result = instance.call_packed("greeting", b"");
        assert!(matches!(
            result,
            Err(WasmError::PayloadTooLarge { size: 8, max: 4 })
        ));
        assert!(instance.ledger().is_balanced());
    }
}
