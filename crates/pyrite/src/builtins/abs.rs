//! Implementation of the abs() builtin function.

use num_bigint::BigInt;
use num_traits::Signed;

use crate::{
    args::{ArgVec, one_arg},
    exception::{ExcType, RunResult},
    heap::HeapData,
    ops::bigint_to_value,
    runtime::Runtime,
    value::Value,
};

/// Returns the absolute value of a number.
///
/// For `i64::MIN`, which overflows on negation, promotes to a big integer.
pub(crate) fn builtin_abs(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let value = one_arg("abs", args)?;
    match value {
        Value::Int(n) => match n.checked_abs() {
            Some(abs_val) => Ok(Value::Int(abs_val)),
            None => Ok(bigint_to_value(&mut rt.heap, BigInt::from(n).abs())),
        },
        Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        #[cfg(feature = "float")]
        Value::Float(f) => Ok(Value::Float(f.abs())),
        Value::Ref(id) => match rt.heap.get(id) {
            HeapData::BigInt(b) => {
                let abs_val = b.abs();
                Ok(bigint_to_value(&mut rt.heap, abs_val))
            }
            #[cfg(feature = "float")]
            HeapData::Complex(c) => Ok(Value::Float(f64::hypot(c.real, c.imag))),
            _ => Err(bad_operand(rt, value)),
        },
        _ => Err(bad_operand(rt, value)),
    }
}

fn bad_operand(rt: &Runtime, value: Value) -> crate::exception::SimpleException {
    ExcType::type_error(format!("bad operand type for abs(): '{}'", rt.type_name(value)))
}
