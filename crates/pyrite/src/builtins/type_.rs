//! Type objects as constructors: `bool(x)`, `int(x)`, `list(it)`,
//! `type(x)` / `type(name, bases, ns)`, and friends.

use num_bigint::BigInt;

use crate::{
    args::{ArgVec, between_args},
    builtins::Builtins,
    exception::{ExcType, RunResult},
    heap::HeapData,
    ops::bigint_to_value,
    runtime::Runtime,
    types::{Dict, List, Set, Tuple, Type},
    value::Value,
};

/// Calls a type object with natural-order arguments.
pub(crate) fn call(rt: &mut Runtime, ty: Type, args: ArgVec) -> RunResult<Value> {
    match ty {
        Type::Bool => {
            let args = between_args("bool", 0, 1, args)?;
            Ok(Value::Bool(args.first().is_some_and(|&v| rt.is_true(v))))
        }
        Type::Int => {
            let args = between_args("int", 0, 1, args)?;
            match args.first() {
                None => Ok(Value::Int(0)),
                Some(&v) => int_convert(rt, v),
            }
        }
        #[cfg(feature = "float")]
        Type::Float => {
            let args = between_args("float", 0, 1, args)?;
            match args.first() {
                None => Ok(Value::Float(0.0)),
                Some(&v) => float_convert(rt, v),
            }
        }
        #[cfg(feature = "float")]
        Type::Complex => {
            let args = between_args("complex", 0, 2, args)?;
            let real = match args.first() {
                None => 0.0,
                Some(&v) => as_f64(rt, v).ok_or_else(|| complex_arg_error(rt, v))?,
            };
            let imag = match args.get(1) {
                None => 0.0,
                Some(&v) => as_f64(rt, v).ok_or_else(|| complex_arg_error(rt, v))?,
            };
            Ok(rt
                .heap
                .alloc_value(HeapData::Complex(crate::types::Complex { real, imag })))
        }
        Type::List => {
            let args = between_args("list", 0, 1, args)?;
            let items = match args.first() {
                None => Vec::new(),
                Some(&v) => rt.collect_iterable(v)?,
            };
            Ok(rt.heap.alloc_value(HeapData::List(List::new(items))))
        }
        Type::Tuple => {
            let args = between_args("tuple", 0, 1, args)?;
            let items = match args.first() {
                None => Vec::new(),
                Some(&v) => rt.collect_iterable(v)?,
            };
            Ok(rt.heap.alloc_value(HeapData::Tuple(Tuple::new(items))))
        }
        Type::Set => {
            let args = between_args("set", 0, 1, args)?;
            let mut set = Set::new();
            if let Some(&v) = args.first() {
                let items = rt.collect_iterable(v)?;
                for item in items {
                    set.insert(crate::types::DictKey::from_value(&rt.heap, &rt.interns, item)?);
                }
            }
            Ok(rt.heap.alloc_value(HeapData::Set(set)))
        }
        Type::Dict => {
            between_args("dict", 0, 0, args)?;
            Ok(rt.heap.alloc_value(HeapData::Dict(Dict::new())))
        }
        Type::Type => match args.len() {
            1 => Ok(type_of(rt, args[0])),
            3 => rt.new_class(args[0], args[1], args[2]),
            n => Err(ExcType::type_error(format!(
                "type() takes 1 or 3 arguments but {n} were given"
            ))),
        },
        other => Err(ExcType::type_error(format!("cannot create '{other}' instances"))),
    }
}

/// `type(x)`: the type object of a value. Instances report their class;
/// exception instances report their factory.
fn type_of(rt: &Runtime, v: Value) -> Value {
    if let Value::Ref(id) = v {
        match rt.heap().get(id) {
            HeapData::Instance(inst) => return Value::Ref(inst.class),
            HeapData::Exception(exc) => return Value::Builtin(Builtins::Exc(exc.exc_type())),
            _ => {}
        }
    }
    Value::Builtin(Builtins::Type(v.py_type(rt.heap())))
}

/// `int(x)` conversion for bools, ints, floats, and strings.
fn int_convert(rt: &mut Runtime, v: Value) -> RunResult<Value> {
    match v {
        Value::Int(_) => Ok(v),
        Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        #[cfg(feature = "float")]
        Value::Float(f) => Ok(Value::Int(f.trunc() as i64)),
        Value::Ref(id) => match rt.heap.get(id) {
            HeapData::BigInt(_) => Ok(v),
            HeapData::Str(_) => {
                let s = match rt.heap.get(id) {
                    HeapData::Str(s) => s.trim().to_owned(),
                    _ => unreachable!(),
                };
                parse_int(rt, &s)
            }
            _ => Err(int_arg_error(rt, v)),
        },
        Value::InternStr(q) => {
            let s = rt.interns.get(q).trim().to_owned();
            parse_int(rt, &s)
        }
        _ => Err(int_arg_error(rt, v)),
    }
}

fn parse_int(rt: &mut Runtime, s: &str) -> RunResult<Value> {
    if let Ok(n) = s.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    if let Ok(b) = s.parse::<BigInt>() {
        return Ok(bigint_to_value(&mut rt.heap, b));
    }
    Err(ExcType::value_error(format!(
        "invalid literal for int() with base 10: '{s}'"
    )))
}

fn int_arg_error(rt: &Runtime, v: Value) -> crate::exception::SimpleException {
    ExcType::type_error(format!(
        "int() argument must be a string or a number, not '{}'",
        rt.type_name(v)
    ))
}

#[cfg(feature = "float")]
fn float_convert(rt: &mut Runtime, v: Value) -> RunResult<Value> {
    if let Some(f) = as_f64(rt, v) {
        return Ok(Value::Float(f));
    }
    if let Some(s) = rt.str_value(v) {
        return match s.trim().parse::<f64>() {
            Ok(f) => Ok(Value::Float(f)),
            Err(_) => Err(ExcType::value_error(format!(
                "could not convert string to float: '{s}'"
            ))),
        };
    }
    Err(ExcType::type_error(format!(
        "float() argument must be a string or a number, not '{}'",
        rt.type_name(v)
    )))
}

#[cfg(feature = "float")]
fn as_f64(rt: &Runtime, v: Value) -> Option<f64> {
    use num_traits::ToPrimitive;
    match v {
        Value::Int(n) => Some(n as f64),
        Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        Value::Float(f) => Some(f),
        Value::Ref(id) => match rt.heap().get(id) {
            HeapData::BigInt(b) => b.to_f64(),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(feature = "float")]
fn complex_arg_error(rt: &Runtime, v: Value) -> crate::exception::SimpleException {
    ExcType::type_error(format!(
        "complex() argument must be a number, not '{}'",
        rt.type_name(v)
    ))
}
