//! The range() builtin.

use crate::{
    args::{ArgVec, between_args},
    exception::{ExcType, RunResult},
    runtime::Runtime,
    value::Value,
};

/// `range(a)`, `range(a, b)`, `range(a, b, c)`.
///
/// A zero step is rejected with `ValueError` before the range exists.
pub(crate) fn builtin_range(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let args = between_args("range", 1, 3, args)?;
    let mut ints = [0_i64; 3];
    for (slot, &arg) in ints.iter_mut().zip(&args) {
        let Some(n) = arg.as_small_int() else {
            return Err(ExcType::type_error(format!(
                "'{}' object cannot be interpreted as an integer",
                rt.type_name(arg)
            )));
        };
        *slot = n;
    }
    match args.len() {
        1 => rt.new_range(0, ints[0], 1),
        2 => rt.new_range(ints[0], ints[1], 1),
        _ => rt.new_range(ints[0], ints[1], ints[2]),
    }
}
