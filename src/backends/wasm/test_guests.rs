// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Inline WAT guests used by the backend and engine tests.
//!
//! Every payload-handling guest links the same bump allocator: `malloc` hands
//! out addresses from 4096 upwards and never reuses them, `free` only counts.
//! `alloc_count` / `free_count` expose the guest's own view so tests can check
//! balance from both sides of the boundary.

use crate::backends::wasm::capability_manager::create_engine;
use crate::backends::wasm::module::{GuestModule, InstanceSettings};
use std::sync::Arc;

const BUMP_ALLOCATOR: &str = r#"
    (memory (export "memory") 1)
    (global $heap (mut i32) (i32.const 4096))
    (global $allocs (mut i32) (i32.const 0))
    (global $frees (mut i32) (i32.const 0))
    (func $malloc (export "malloc") (param $size i32) (result i32)
        (local $ptr i32)
        (global.set $allocs (i32.add (global.get $allocs) (i32.const 1)))
        (local.set $ptr (global.get $heap))
        (global.set $heap (i32.add (global.get $heap) (local.get $size)))
        (local.get $ptr))
    (func $free (export "free") (param $ptr i32)
        (global.set $frees (i32.add (global.get $frees) (i32.const 1))))
    (func (export "alloc_count") (result i32) (global.get $allocs))
    (func (export "free_count") (result i32) (global.get $frees))
"#;

/// The same bump allocator under the names a Rust guest exports:
/// `allocate(size)` and `deallocate(ptr, len)`.
const RUST_STYLE_ALLOCATOR: &str = r#"
    (memory (export "memory") 1)
    (global $heap (mut i32) (i32.const 4096))
    (global $allocs (mut i32) (i32.const 0))
    (global $frees (mut i32) (i32.const 0))
    (func $malloc (export "allocate") (param $size i32) (result i32)
        (local $ptr i32)
        (global.set $allocs (i32.add (global.get $allocs) (i32.const 1)))
        (local.set $ptr (global.get $heap))
        (global.set $heap (i32.add (global.get $heap) (local.get $size)))
        (local.get $ptr))
    (func (export "deallocate") (param $ptr i32) (param $len i32)
        (global.set $frees (i32.add (global.get $frees) (i32.const 1))))
    (func (export "alloc_count") (result i32) (global.get $allocs))
    (func (export "free_count") (result i32) (global.get $frees))
"#;

const PACK: &str = "(i64.or (i64.shl (i64.extend_i32_u (local.get $out)) (i64.const 32)) (i64.extend_i32_u (local.get $total)))";

/// Escape text for a WAT string literal.
fn wat_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// `greeting(addr, len) -> packed`: returns the input followed by `suffix`.
pub fn greeter(suffix: &str) -> String {
    format!(
        r#"(module
            {alloc}
            (data (i32.const 1024) "{data}")
            (func (export "greeting") (param $ptr i32) (param $len i32) (result i64)
                (local $out i32) (local $total i32)
                (local.set $total (i32.add (local.get $len) (i32.const {suffix_len})))
                (local.set $out (call $malloc (local.get $total)))
                (memory.copy (local.get $out) (local.get $ptr) (local.get $len))
                (memory.copy
                    (i32.add (local.get $out) (local.get $len))
                    (i32.const 1024)
                    (i32.const {suffix_len}))
                {pack}))"#,
        alloc = BUMP_ALLOCATOR,
        data = wat_string(suffix),
        suffix_len = suffix.len(),
        pack = PACK,
    )
}

/// `calc(addr, len) -> packed`: appends `entry` (a JSON value) to the
/// trailing `output` list of a compact `{"input":..,"output":[..]}` document.
pub fn appender(entry: &str) -> String {
    appender_over(BUMP_ALLOCATOR, entry)
}

/// `appender` linked against `allocate` / `deallocate(ptr, len)`.
pub fn rust_style_appender(entry: &str) -> String {
    appender_over(RUST_STYLE_ALLOCATOR, entry)
}

fn appender_over(allocator: &str, entry: &str) -> String {
    format!(
        r#"(module
            {alloc}
            (data (i32.const 1024) "{data}")
            (func (export "calc") (param $ptr i32) (param $len i32) (result i64)
                (local $out i32) (local $total i32) (local $head i32) (local $sep i32) (local $cursor i32)
                (local.set $head (i32.sub (local.get $len) (i32.const 2)))
                (local.set $sep
                    (i32.ne
                        (i32.load8_u (i32.add (local.get $ptr) (i32.sub (local.get $len) (i32.const 3))))
                        (i32.const 91)))
                (local.set $total
                    (i32.add (i32.add (local.get $head) (local.get $sep)) (i32.const {tail_len})))
                (local.set $out (call $malloc (local.get $total)))
                (memory.copy (local.get $out) (local.get $ptr) (local.get $head))
                (local.set $cursor (i32.add (local.get $out) (local.get $head)))
                (if (local.get $sep)
                    (then
                        (i32.store8 (local.get $cursor) (i32.const 44))
                        (local.set $cursor (i32.add (local.get $cursor) (i32.const 1)))))
                (memory.copy (local.get $cursor) (i32.const 1024) (i32.const {entry_len}))
                (local.set $cursor (i32.add (local.get $cursor) (i32.const {entry_len})))
                (i32.store16 (local.get $cursor) (i32.const 0x7d5d))
                {pack}))"#,
        alloc = allocator,
        data = wat_string(entry),
        entry_len = entry.len(),
        tail_len = entry.len() + 2,
        pack = PACK,
    )
}

/// Returns its input unchanged under the given export name.
pub fn echo(function: &str) -> String {
    format!(
        r#"(module
            {alloc}
            (func (export "{function}") (param $ptr i32) (param $len i32) (result i64)
                (local $out i32) (local $total i32)
                (local.set $total (local.get $len))
                (local.set $out (call $malloc (local.get $total)))
                (memory.copy (local.get $out) (local.get $ptr) (local.get $len))
                {pack}))"#,
        alloc = BUMP_ALLOCATOR,
        function = function,
        pack = PACK,
    )
}

/// Fixed output bytes, written in the data segment at 1024.
pub fn constant(function: &str, data: &str, length: usize) -> String {
    format!(
        r#"(module
            {alloc}
            (data (i32.const 1024) "{data}")
            (func (export "{function}") (param $ptr i32) (param $len i32) (result i64)
                (i64.or (i64.shl (i64.const 1024) (i64.const 32)) (i64.const {length}))))"#,
        alloc = BUMP_ALLOCATOR,
        function = function,
        data = data,
        length = length,
    )
}

/// Entry point traps after the host has written its input.
pub fn trapping() -> String {
    format!(
        r#"(module
            {alloc}
            (func (export "greeting") (param $ptr i32) (param $len i32) (result i64)
                unreachable))"#,
        alloc = BUMP_ALLOCATOR
    )
}

/// Entry point returns the null reference.
pub fn returns_null() -> String {
    format!(
        r#"(module
            {alloc}
            (func (export "greeting") (param $ptr i32) (param $len i32) (result i64)
                (i64.const 0)))"#,
        alloc = BUMP_ALLOCATOR
    )
}

/// Entry point returns a reference running past the end of memory.
pub fn returns_out_of_range() -> String {
    format!(
        r#"(module
            {alloc}
            (func (export "greeting") (param $ptr i32) (param $len i32) (result i64)
                (i64.or (i64.shl (i64.const 60000) (i64.const 32)) (i64.const 10000))))"#,
        alloc = BUMP_ALLOCATOR
    )
}

/// Allocator hands out an address six bytes before the end of memory.
/// `calls` counts entry invocations.
pub fn cramped_allocator() -> &'static str {
    r#"(module
        (memory (export "memory") 1)
        (global $frees (mut i32) (i32.const 0))
        (global $calls (mut i32) (i32.const 0))
        (func (export "malloc") (param $size i32) (result i32) (i32.const 65530))
        (func (export "free") (param $ptr i32)
            (global.set $frees (i32.add (global.get $frees) (i32.const 1))))
        (func (export "free_count") (result i32) (global.get $frees))
        (func (export "calls") (result i32) (global.get $calls))
        (func (export "greeting") (param $ptr i32) (param $len i32) (result i64)
            (global.set $calls (i32.add (global.get $calls) (i32.const 1)))
            (i64.const 0)))"#
}

/// Allocator always answers with the null address.
pub fn null_allocator() -> &'static str {
    r#"(module
        (memory (export "memory") 1)
        (func (export "malloc") (param $size i32) (result i32) (i32.const 0))
        (func (export "free") (param $ptr i32))
        (func (export "greeting") (param $ptr i32) (param $len i32) (result i64)
            (i64.const 0)))"#
}

/// Payload entry point with no allocator exports at all.
pub fn without_allocator() -> &'static str {
    r#"(module
        (memory (export "memory") 1)
        (data (i32.const 1024) "empty")
        (func (export "greeting") (param $ptr i32) (param $len i32) (result i64)
            (i64.or (i64.shl (i64.const 1024) (i64.const 32)) (i64.const 5))))"#
}

/// Deallocator traps on every call.
pub fn trapping_free() -> &'static str {
    r#"(module
        (memory (export "memory") 1)
        (global $heap (mut i32) (i32.const 4096))
        (func $malloc (export "malloc") (param $size i32) (result i32)
            (local $ptr i32)
            (local.set $ptr (global.get $heap))
            (global.set $heap (i32.add (global.get $heap) (local.get $size)))
            (local.get $ptr))
        (func (export "free") (param $ptr i32) unreachable)
        (func (export "count") (param $ptr i32) (param $len i32) (result i32)
            (local.get $len)))"#
}

/// Rust-style `allocate` / `deallocate(ptr, len)` pair.
/// `last_release_len` reports the length passed to the latest release.
pub fn rust_style_allocator() -> &'static str {
    r#"(module
        (memory (export "memory") 1)
        (global $heap (mut i32) (i32.const 4096))
        (global $last_len (mut i32) (i32.const -1))
        (func (export "allocate") (param $size i32) (result i32)
            (local $ptr i32)
            (local.set $ptr (global.get $heap))
            (global.set $heap (i32.add (global.get $heap) (local.get $size)))
            (local.get $ptr))
        (func (export "deallocate") (param $ptr i32) (param $len i32)
            (global.set $last_len (local.get $len)))
        (func (export "last_release_len") (result i32) (global.get $last_len))
        (func (export "count") (param $ptr i32) (param $len i32) (result i64)
            (i64.extend_i32_u (local.get $len))))"#
}

/// Numeric `act` guest over i32 or i64 operands.
pub fn numeric(op: &str, value_type: &str) -> String {
    format!(
        r#"(module
            (func (export "act") (param $a {ty}) (param $b {ty}) (result {ty})
                ({ty}.{op} (local.get $a) (local.get $b))))"#,
        ty = value_type,
        op = op,
    )
}

/// `act` never returns.
pub fn spinner() -> &'static str {
    r#"(module
        (func (export "act") (param $a i32) (param $b i32) (result i32)
            (loop $forever (br $forever))
            (i32.const 0)))"#
}

/// `greeting(addr, len) -> packed` that never returns.
pub fn packed_spinner() -> String {
    format!(
        r#"(module
            {alloc}
            (func (export "greeting") (param $ptr i32) (param $len i32) (result i64)
                (loop $forever (br $forever))
                (i64.const 0)))"#,
        alloc = BUMP_ALLOCATOR,
    )
}

/// Compile WAT into a `GuestModule` with default settings.
pub fn module(id: &str, wat: &str) -> GuestModule {
    module_with(id, wat, InstanceSettings::default())
}

pub fn module_with(id: &str, wat: &str, settings: InstanceSettings) -> GuestModule {
    let engine = create_engine().unwrap();
    let bytes = wat::parse_str(wat).unwrap();
    GuestModule::from_bytes(id, "inline.wat", &engine, &bytes, Arc::new(settings)).unwrap()
}
