//! Order rule: 10% off for customers above status level 5.
//!
//! Receives the whole order record, appends one entry to `output` and hands
//! the record back. `input` and the entries already present are passed
//! through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const CODE: u32 = 3;
const REWARD: &str = "10% off for Rouge status";

#[derive(Deserialize, Serialize)]
struct OrderSummary {
    input: Map<String, Value>,
    #[serde(default)]
    output: Option<Vec<Value>>,
}

#[derive(Serialize)]
struct Reward {
    code: u32,
    active: bool,
    reward: &'static str,
}

fn applies(input: &Map<String, Value>) -> bool {
    input
        .get("user_status")
        .and_then(Value::as_i64)
        .is_some_and(|status| status > 5)
}

/// Apply the rule to the record at `ptr..ptr + len`.
///
/// Returns `(address << 32) | length` of the new record, or 0 when the input
/// is not a valid order record. The host releases the returned buffer with
/// `deallocate`.
#[no_mangle]
pub extern "C" fn calc(ptr: *const u8, len: usize) -> u64 {
    let bytes = unsafe { std::slice::from_raw_parts(ptr, len) };
    let Ok(mut order) = serde_json::from_slice::<OrderSummary>(bytes) else {
        return 0;
    };

    let entry = Reward {
        code: CODE,
        active: applies(&order.input),
        reward: REWARD,
    };
    let Ok(entry) = serde_json::to_value(entry) else {
        return 0;
    };
    order.output.get_or_insert_with(Vec::new).push(entry);

    match serde_json::to_vec(&order) {
        Ok(out) => leak(out),
        Err(_) => 0,
    }
}

fn leak(bytes: Vec<u8>) -> u64 {
    let len = bytes.len();
    let ptr = allocate(len);
    unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, len) };
    ((ptr as u64) << 32) | len as u64
}

/// Hand the host `size` bytes of guest memory.
#[no_mangle]
pub extern "C" fn allocate(size: usize) -> *mut u8 {
    let mut buf = Vec::<u8>::with_capacity(size);
    let ptr = buf.as_mut_ptr();
    std::mem::forget(buf);
    ptr
}

/// Release memory obtained from `allocate`.
#[no_mangle]
pub extern "C" fn deallocate(ptr: *mut u8, size: usize) {
    unsafe {
        let _ = Vec::from_raw_parts(ptr, 0, size);
    }
}
