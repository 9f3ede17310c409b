//! The hash() builtin.

use crate::{
    args::{ArgVec, one_arg},
    exception::RunResult,
    py_hash::truncate_hash,
    runtime::Runtime,
    value::Value,
};

/// `hash(obj)`: the deterministic full-width hash, truncated to the
/// small-int range by low-bits masking (see `py_hash::truncate_hash`).
pub(crate) fn builtin_hash(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let value = one_arg("hash", args)?;
    let full = rt.py_hash(value)?;
    Ok(Value::Int(truncate_hash(full)))
}
