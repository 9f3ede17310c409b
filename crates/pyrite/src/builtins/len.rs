//! The len() builtin.

use crate::{
    args::{ArgVec, one_arg},
    exception::{ExcType, RunResult},
    heap::HeapData,
    runtime::Runtime,
    value::Value,
};

/// `len(obj)` for the sized builtin types.
pub(crate) fn builtin_len(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let value = one_arg("len", args)?;
    let len = match value {
        Value::InternStr(q) => Some(rt.interns.get(q).chars().count()),
        Value::Ref(id) => match rt.heap.get(id) {
            HeapData::Str(s) => Some(s.chars().count()),
            HeapData::List(l) => Some(l.len()),
            HeapData::Tuple(t) => Some(t.len()),
            HeapData::Dict(d) => Some(d.len()),
            HeapData::Set(s) => Some(s.len()),
            HeapData::Range(r) => Some(r.len()),
            HeapData::Namespace(ns) => Some(ns.len()),
            _ => None,
        },
        _ => None,
    };
    match len {
        Some(n) => Ok(Value::Int(n as i64)),
        None => Err(ExcType::type_error(format!(
            "object of type '{}' has no len()",
            rt.type_name(value)
        ))),
    }
}
