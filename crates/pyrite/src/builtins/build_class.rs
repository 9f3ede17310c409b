//! The `__build_class__` core hook.

use crate::{
    args::{ArgVec, at_least_args},
    builtins::Builtins,
    exception::RunResult,
    runtime::{CLASS_BODY_SENTINEL, Runtime},
    value::Value,
};

/// Builds a class from a compiled class body.
///
/// Arguments (natural order): the body function, the class name, then any
/// base objects. The body executes in a fresh namespace installed as
/// locals; that namespace becomes the class dict. The metaclass is `type`
/// for no bases, otherwise the type of the first base (proper multi-base
/// metaclass resolution is out of scope). The meta call receives
/// `(name, bases, namespace)` through the standard reverse-order argument
/// array, and a cell returned by the body receives the finished class.
pub(crate) fn builtin_build_class(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let args = at_least_args("__build_class__", 2, args)?;
    let body = args[0];
    let name = args[1];
    let bases: Vec<Value> = args[2..].to_vec();

    // Execute the body with a fresh locals namespace; restored on every
    // exit path, including an exception from the body.
    let class_ns = rt.new_namespace();
    let cell = rt.with_locals(class_ns, |rt| rt.call_function_1(body, CLASS_BODY_SENTINEL))?;

    let meta = if bases.is_empty() {
        Value::Builtin(Builtins::Type(crate::types::Type::Type))
    } else {
        Value::Builtin(Builtins::Type(bases[0].py_type(rt.heap())))
    };

    let bases_tuple = rt.new_tuple(bases);
    let ns_value = Value::Ref(class_ns);
    // Reverse order: args[0] is the last argument of meta(name, bases, ns).
    let new_class = rt.call_function_n(meta, &[ns_value, bases_tuple, name])?;

    // A truthy cell returned by the body receives the class.
    if cell != Value::None {
        rt.set_cell(cell, new_class);
    }

    Ok(new_class)
}
