//! The iter() and next() builtins — the user-visible face of the iterator
//! protocol.

use crate::{
    args::{ArgVec, one_arg},
    exception::{ExcType, RunResult, SimpleException},
    runtime::Runtime,
    value::Value,
};

/// `iter(obj)`: delegates to the getiter capability.
pub(crate) fn builtin_iter(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let value = one_arg("iter", args)?;
    rt.getiter(value)
}

/// `next(it)`: one protocol step, translating the stop marker into a
/// `StopIteration` exception so it never reaches user code.
pub(crate) fn builtin_next(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let it = one_arg("next", args)?;
    let result = rt.iternext(it)?;
    if result == Value::StopIteration {
        Err(SimpleException::new(ExcType::StopIteration))
    } else {
        Ok(result)
    }
}
