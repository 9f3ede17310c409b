//! The print() builtin and the REPL display hook.

use crate::{
    args::{ArgVec, one_arg},
    exception::RunResult,
    runtime::Runtime,
    value::Value,
};

/// `print(*args)`: space-separated, trailing newline. Strings are printed
/// raw (without quoting); every other value goes through its repr.
pub(crate) fn builtin_print(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    for (i, &arg) in args.iter().enumerate() {
        if i > 0 {
            rt.print_push(' ')?;
        }
        let text = rt.py_str(arg);
        rt.print_text(&text)?;
    }
    rt.print_push('\n')?;
    Ok(Value::None)
}

/// `__repl_print__(v)`: no-op for `None`, otherwise repr plus newline.
pub(crate) fn builtin_repl_print(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let value = one_arg("__repl_print__", args)?;
    if value == Value::None {
        return Ok(Value::None);
    }
    let text = rt.py_repr(value);
    rt.print_text(&text)?;
    rt.print_push('\n')?;
    Ok(Value::None)
}
