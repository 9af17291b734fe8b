// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The record passed through an accumulating pipeline.
//!
//! ```json
//! { "input": { "user_status": 7, "item_count": 12 }, "output": [ { "code": 3 } ] }
//! ```
//!
//! `input` is fixed for the whole pipeline. Each stage returns the complete
//! record with zero or more entries appended to `output`.

use crate::backends::wasm::{WasmError, WasmResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub input: Record,
    /// Guests written in Go serialize an empty list as `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub output: Vec<Record>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Record>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Record>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    pub fn new(input: Record) -> Self {
        Self {
            input,
            output: Vec::new(),
        }
    }

    /// Check that `next` is a legal result of running one stage on `self`:
    /// `input` untouched and every existing `output` entry kept, in order.
    pub fn verify_successor(&self, next: &Document) -> WasmResult<()> {
        if !same_record(&next.input, &self.input) {
            return Err(WasmError::SchemaMismatch(
                "stage modified the immutable 'input' record".to_string(),
            ));
        }

        let kept = self.output.len();
        let rewritten = next
            .output
            .iter()
            .zip(&self.output)
            .any(|(new, old)| !same_record(new, old));
        if next.output.len() < kept || rewritten {
            return Err(WasmError::SchemaMismatch(format!(
                "stage dropped or rewrote earlier 'output' entries (had {}, returned {})",
                kept,
                next.output.len()
            )));
        }

        Ok(())
    }

    /// Entries `next` added on top of `self`.
    pub fn appended_by<'a>(&self, next: &'a Document) -> &'a [Record] {
        next.output.get(self.output.len()..).unwrap_or(&[])
    }
}

/// Numbers compare by value: a guest that decodes `150.0` into a float and
/// encodes it back as `150` has not changed the record.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| same_value(a, b))
        }
        (Value::Object(x), Value::Object(y)) => same_record(x, y),
        _ => a == b,
    }
}

fn same_record(a: &Record, b: &Record) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| same_value(value, other)))
}
