//! The pow() builtin.

use crate::{
    args::{ArgVec, between_args},
    exception::RunResult,
    ops::BinaryOp,
    runtime::Runtime,
    value::Value,
};

/// `pow(a, b[, m])`: two arguments is `a ** b`; three is
/// `(a ** b) % m`, computed naively through the binary operators.
pub(crate) fn builtin_pow(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let args = between_args("pow", 2, 3, args)?;
    let power = rt.binary_op(BinaryOp::Power, args[0], args[1])?;
    match args.get(2) {
        None => Ok(power),
        Some(&modulus) => rt.binary_op(BinaryOp::Modulo, power, modulus),
    }
}
