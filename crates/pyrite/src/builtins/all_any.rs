//! The all() and any() builtins, which share their iteration loop.

use crate::{
    args::{ArgVec, one_arg},
    exception::RunResult,
    runtime::Runtime,
    value::Value,
};

/// `all(iterable)`: true unless some element is falsy. Short-circuits.
pub(crate) fn builtin_all(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let iterable = one_arg("all", args)?;
    let iter = rt.getiter(iterable)?;
    loop {
        let item = rt.iternext(iter)?;
        if item == Value::StopIteration {
            return Ok(Value::Bool(true));
        }
        if !rt.is_true(item) {
            return Ok(Value::Bool(false));
        }
    }
}

/// `any(iterable)`: true when some element is truthy. Short-circuits.
pub(crate) fn builtin_any(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let iterable = one_arg("any", args)?;
    let iter = rt.getiter(iterable)?;
    loop {
        let item = rt.iternext(iter)?;
        if item == Value::StopIteration {
            return Ok(Value::Bool(false));
        }
        if rt.is_true(item) {
            return Ok(Value::Bool(true));
        }
    }
}
