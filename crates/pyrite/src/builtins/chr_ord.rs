//! The chr() and ord() builtins.

use crate::{
    args::{ArgVec, one_arg},
    exception::{ExcType, RunResult},
    runtime::Runtime,
    value::Value,
};

/// `chr(n)`: the one-character string for a code point in
/// `0..=0x10FFFF`; out-of-range (or surrogate) values raise `ValueError`.
pub(crate) fn builtin_chr(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let value = one_arg("chr", args)?;
    let Some(code) = value.as_small_int() else {
        return Err(ExcType::type_error(format!(
            "an integer is required (got type {})",
            rt.type_name(value)
        )));
    };
    if !(0..=0x10_FFFF).contains(&code) {
        return Err(ExcType::value_error("chr() arg not in range(0x110000)"));
    }
    let Some(c) = char::from_u32(code as u32) else {
        // Surrogate code points are not representable as text.
        return Err(ExcType::value_error("chr() arg not in range(0x110000)"));
    };
    Ok(rt.char_value(c))
}

/// `ord(s)`: the code point of a one-character string.
pub(crate) fn builtin_ord(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let value = one_arg("ord", args)?;
    let Some(s) = rt.str_value(value) else {
        return Err(ExcType::type_error(format!(
            "ord() expected string of length 1, but {} found",
            rt.type_name(value)
        )));
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Int(i64::from(c as u32))),
        _ => Err(ExcType::type_error(format!(
            "ord() expected a character, but string of length {} found",
            s.chars().count()
        ))),
    }
}
