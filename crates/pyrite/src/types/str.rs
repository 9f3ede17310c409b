use std::fmt::{self, Write};

use crate::{
    args::{ArgVec, check_zero_args, one_arg},
    exception::{ExcType, RunResult, SimpleException},
    heap::HeapData,
    intern::StaticStrings,
    runtime::Runtime,
    value::Value,
};

/// Writes the Python repr of a string: single-quoted with escapes.
pub(crate) fn str_repr_fmt(s: &str, f: &mut impl Write) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\x{:02x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}

/// Dispatches a call to one of the str method-table entries.
pub(crate) fn call_method(
    rt: &mut Runtime,
    self_val: Value,
    name: StaticStrings,
    args: ArgVec,
) -> RunResult<Value> {
    let Some(s) = rt.str_value(self_val) else {
        return Err(descriptor_error(rt, name, self_val));
    };

    match name {
        StaticStrings::Lower => {
            check_zero_args("lower", &args)?;
            Ok(rt.heap.alloc_value(HeapData::Str(s.to_lowercase())))
        }
        StaticStrings::Upper => {
            check_zero_args("upper", &args)?;
            Ok(rt.heap.alloc_value(HeapData::Str(s.to_uppercase())))
        }
        StaticStrings::Startswith => {
            let prefix = one_arg("startswith", args)?;
            let Some(prefix) = rt.str_value(prefix) else {
                return Err(ExcType::type_error("startswith first arg must be str"));
            };
            Ok(Value::Bool(s.starts_with(&prefix)))
        }
        StaticStrings::Endswith => {
            let suffix = one_arg("endswith", args)?;
            let Some(suffix) = rt.str_value(suffix) else {
                return Err(ExcType::type_error("endswith first arg must be str"));
            };
            Ok(Value::Bool(s.ends_with(&suffix)))
        }
        _ => Err(descriptor_error(rt, name, self_val)),
    }
}

fn descriptor_error(rt: &Runtime, name: StaticStrings, self_val: Value) -> SimpleException {
    ExcType::type_error(format!(
        "descriptor '{}' requires a 'str' object but received a '{}'",
        <&'static str>::from(name),
        rt.type_name(self_val),
    ))
}
