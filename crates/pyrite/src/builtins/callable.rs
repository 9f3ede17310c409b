//! The callable() builtin.

use crate::{
    args::{ArgVec, one_arg},
    exception::RunResult,
    heap::HeapData,
    runtime::Runtime,
    value::Value,
};

/// `callable(obj)`: whether the call protocol would accept `obj`.
///
/// Mirrors the dispatch in `call_with_args`: builtins, functions, closures,
/// bound methods, and classes are callable; everything else is not.
pub(crate) fn builtin_callable(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let value = one_arg("callable", args)?;
    let result = match value {
        Value::Builtin(_) => true,
        Value::Ref(id) => matches!(
            rt.heap.get(id),
            HeapData::Function(_) | HeapData::Closure(_) | HeapData::BoundMethod(_) | HeapData::Class(_)
        ),
        _ => false,
    };
    Ok(Value::Bool(result))
}
