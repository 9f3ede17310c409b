//! The isinstance() and issubclass() builtins.

use crate::{
    args::{ArgVec, two_args},
    builtins::Builtins,
    exception::{ExcType, RunResult},
    heap::{HeapData, HeapId},
    runtime::Runtime,
    types::Type,
    value::Value,
};

/// `isinstance(obj, classinfo)` where classinfo is a type object, an
/// exception factory, a user class, or a tuple of those.
pub(crate) fn builtin_isinstance(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let (obj, classinfo) = two_args("isinstance", args)?;
    Ok(Value::Bool(instance_check(rt, obj, classinfo)?))
}

fn instance_check(rt: &Runtime, obj: Value, classinfo: Value) -> RunResult<bool> {
    match classinfo {
        Value::Builtin(Builtins::Type(ty)) => Ok(type_check(rt, obj, ty)),
        Value::Builtin(Builtins::Exc(exc)) => Ok(rt.exc_kind(obj) == Some(exc)),
        Value::Ref(id) => match rt.heap.get(id) {
            HeapData::Class(_) => Ok(instance_of_class(rt, obj, id)),
            HeapData::Tuple(t) => {
                let options = t.items().to_vec();
                for option in options {
                    if instance_check(rt, obj, option)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Err(arg2_error("isinstance")),
        },
        _ => Err(arg2_error("isinstance")),
    }
}

fn type_check(rt: &Runtime, obj: Value, ty: Type) -> bool {
    let obj_ty = obj.py_type(rt.heap());
    if obj_ty == ty {
        return true;
    }
    // bool is a subclass of int.
    ty == Type::Int && obj_ty == Type::Bool
}

fn instance_of_class(rt: &Runtime, obj: Value, class: HeapId) -> bool {
    let Value::Ref(id) = obj else { return false };
    let HeapData::Instance(inst) = rt.heap().get(id) else {
        return false;
    };
    class_chain_contains(rt, inst.class, class)
}

/// Depth-first walk of the single-inheritance base chain.
fn class_chain_contains(rt: &Runtime, class: HeapId, target: HeapId) -> bool {
    if class == target {
        return true;
    }
    let HeapData::Class(c) = rt.heap().get(class) else {
        return false;
    };
    c.bases.iter().any(|&base| match base {
        Value::Ref(base_id) => class_chain_contains(rt, base_id, target),
        _ => false,
    })
}

/// `issubclass(cls, classinfo)`.
pub(crate) fn builtin_issubclass(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let (cls, classinfo) = two_args("issubclass", args)?;
    Ok(Value::Bool(subclass_check(rt, cls, classinfo)?))
}

fn subclass_check(rt: &Runtime, cls: Value, classinfo: Value) -> RunResult<bool> {
    // The first argument must itself be a class-like value.
    let cls_ok = matches!(cls, Value::Builtin(Builtins::Type(_) | Builtins::Exc(_)))
        || matches!(cls, Value::Ref(id) if matches!(rt.heap().get(id), HeapData::Class(_)));
    if !cls_ok {
        return Err(ExcType::type_error("issubclass() arg 1 must be a class"));
    }
    match classinfo {
        Value::Builtin(Builtins::Type(ty)) => Ok(match cls {
            Value::Builtin(Builtins::Type(cls_ty)) => cls_ty == ty || (cls_ty == Type::Bool && ty == Type::Int),
            _ => false,
        }),
        Value::Builtin(Builtins::Exc(exc)) => Ok(match cls {
            Value::Builtin(Builtins::Exc(cls_exc)) => cls_exc.matches(exc),
            _ => false,
        }),
        Value::Ref(id) => match rt.heap().get(id) {
            HeapData::Class(_) => Ok(match cls {
                Value::Ref(cls_id) if matches!(rt.heap().get(cls_id), HeapData::Class(_)) => {
                    class_chain_contains(rt, cls_id, id)
                }
                _ => false,
            }),
            HeapData::Tuple(t) => {
                let options = t.items().to_vec();
                for option in options {
                    if subclass_check(rt, cls, option)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Err(arg2_error("issubclass")),
        },
        _ => Err(arg2_error("issubclass")),
    }
}

fn arg2_error(name: &str) -> crate::exception::SimpleException {
    ExcType::type_error(format!("{name}() arg 2 must be a type or tuple of types"))
}
