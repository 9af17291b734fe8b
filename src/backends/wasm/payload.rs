// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Host values to and from boundary bytes.
//!
//! Text crosses as UTF-8. Structured records cross as JSON text and are
//! wrapped in `Json<T>` so any serde type can ride the packed call shape.

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::traits::GuestInvoker;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A value that can be written into and read back from guest memory.
pub trait Payload: Sized {
    fn encode(&self) -> WasmResult<Vec<u8>>;
    fn decode(bytes: Vec<u8>) -> WasmResult<Self>;
}

impl Payload for String {
    fn encode(&self) -> WasmResult<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }

    fn decode(bytes: Vec<u8>) -> WasmResult<Self> {
        Ok(String::from_utf8(bytes)?)
    }
}

/// Structured record encoded as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T> Payload for Json<T>
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self) -> WasmResult<Vec<u8>> {
        serde_json::to_vec(&self.0).map_err(WasmError::from)
    }

    fn decode(bytes: Vec<u8>) -> WasmResult<Self> {
        Ok(Json(serde_json::from_slice(&bytes)?))
    }
}

/// Encode `input`, call `function` with the packed shape and decode the reply.
///
/// `Ok(None)` means the guest returned the null reference.
pub fn invoke_payload<P, R>(
    invoker: &dyn GuestInvoker,
    function: &str,
    input: &P,
) -> WasmResult<Option<R>>
where
    P: Payload,
    R: Payload,
{
    let bytes = input.encode()?;
    invoker
        .invoke_packed(function, &bytes)?
        .map(R::decode)
        .transpose()
}
