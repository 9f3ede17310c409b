//! The min() and max() builtins, which share their implementation.

use crate::{
    args::{ArgVec, at_least_args},
    exception::{ExcType, RunResult},
    ops::BinaryOp,
    runtime::Runtime,
    value::Value,
};

pub(crate) fn builtin_max(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    min_max(rt, args, "max")
}

pub(crate) fn builtin_min(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    min_max(rt, args, "min")
}

/// Shared loop: a single argument is an iterable (empty raises
/// `ValueError`), multiple arguments compare directly. Strict less-than
/// comparisons throughout, so ties go to the earlier element.
fn min_max(rt: &mut Runtime, args: ArgVec, name: &str) -> RunResult<Value> {
    let args = at_least_args(name, 1, args)?;
    if args.len() == 1 {
        let iter = rt.getiter(args[0])?;
        let mut best: Option<Value> = None;
        loop {
            let item = rt.iternext(iter)?;
            if item == Value::StopIteration {
                break;
            }
            best = Some(match best {
                None => item,
                Some(current) => {
                    if better(rt, name, current, item)? {
                        item
                    } else {
                        current
                    }
                }
            });
        }
        best.ok_or_else(|| ExcType::value_error(format!("{name}() arg is an empty sequence")))
    } else {
        let mut best = args[0];
        for &candidate in &args[1..] {
            if better(rt, name, best, candidate)? {
                best = candidate;
            }
        }
        Ok(best)
    }
}

/// Whether `candidate` replaces `current` under this builtin's ordering.
fn better(rt: &mut Runtime, name: &str, current: Value, candidate: Value) -> RunResult<bool> {
    let (lhs, rhs) = if name == "max" {
        (current, candidate)
    } else {
        (candidate, current)
    };
    let less = rt.binary_op(BinaryOp::Less, lhs, rhs)?;
    Ok(rt.is_true(less))
}
