// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Packed guest references.
//!
//! Guest entry points that hand a payload back to the host return a single
//! 64-bit value: the high 32 bits hold the address in linear memory, the low
//! 32 bits hold the byte length. Every call site goes through `PackedRef` so
//! the bit layout lives in exactly one place.

use crate::backends::wasm::error::{WasmError, WasmResult};
use std::fmt::{Display, Formatter};

/// A (guest address, byte length) pair as carried over the call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedRef {
    address: u32,
    length: u32,
}

impl PackedRef {
    /// The "no payload" reference.
    pub const NULL: PackedRef = PackedRef {
        address: 0,
        length: 0,
    };

    pub const fn new(address: u32, length: u32) -> Self {
        Self { address, length }
    }

    /// Build a reference from a host-side byte length, rejecting lengths a
    /// 32-bit guest cannot address.
    pub fn from_len(address: u32, length: usize) -> WasmResult<Self> {
        let length = u32::try_from(length).map_err(|_| WasmError::PayloadTooLarge {
            size: length,
            max: u32::MAX as usize,
        })?;
        Ok(Self::new(address, length))
    }

    /// `(address << 32) | length`
    pub const fn encode(self) -> u64 {
        ((self.address as u64) << 32) | self.length as u64
    }

    pub const fn decode(word: u64) -> Self {
        Self {
            address: (word >> 32) as u32,
            length: word as u32,
        }
    }

    pub const fn address(&self) -> u32 {
        self.address
    }

    pub const fn length(&self) -> u32 {
        self.length
    }

    /// An address of zero never points at a payload, whatever the length says.
    pub const fn is_null(&self) -> bool {
        self.address == 0
    }
}

impl From<u64> for PackedRef {
    fn from(word: u64) -> Self {
        Self::decode(word)
    }
}

impl From<PackedRef> for u64 {
    fn from(reference: PackedRef) -> Self {
        reference.encode()
    }
}

impl Display for PackedRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x}+{}", self.address, self.length)
    }
}
