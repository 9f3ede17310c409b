//! The sum() builtin.

use crate::{
    args::{ArgVec, one_two_args},
    exception::RunResult,
    ops::BinaryOp,
    runtime::Runtime,
    value::Value,
};

/// `sum(iterable[, start])`: folds with the ADD binary operator, so any
/// addable element type works. `start` defaults to `0`.
pub(crate) fn builtin_sum(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let (iterable, start) = one_two_args("sum", args)?;
    let mut total = start.unwrap_or(Value::Int(0));
    let iter = rt.getiter(iterable)?;
    loop {
        let item = rt.iternext(iter)?;
        if item == Value::StopIteration {
            return Ok(total);
        }
        total = rt.binary_op(BinaryOp::Add, total, item)?;
    }
}
