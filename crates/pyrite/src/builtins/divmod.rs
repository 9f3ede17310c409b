//! The divmod() builtin.

use num_integer::Integer;

use crate::{
    args::{ArgVec, two_args},
    exception::{ExcType, RunResult},
    runtime::Runtime,
    types::Tuple,
    value::Value,
};

/// `divmod(a, b)` over small ints: the 2-tuple `(a // b, a % b)` with
/// floored semantics, consistent with the binary operators. Other operand
/// types raise `TypeError`; full dispatch is deferred.
pub(crate) fn builtin_divmod(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let (a, b) = two_args("divmod", args)?;
    match (a.as_small_int(), b.as_small_int()) {
        (Some(x), Some(y)) => {
            if y == 0 {
                return Err(ExcType::zero_division("integer division or modulo by zero"));
            }
            let quotient = Value::Int(x.div_floor(&y));
            let remainder = Value::Int(x.mod_floor(&y));
            Ok(rt
                .heap
                .alloc_value(crate::heap::HeapData::Tuple(Tuple::new(vec![quotient, remainder]))))
        }
        _ => Err(ExcType::type_error(format!(
            "unsupported operand type(s) for divmod(): '{}' and '{}'",
            rt.type_name(a),
            rt.type_name(b)
        ))),
    }
}
