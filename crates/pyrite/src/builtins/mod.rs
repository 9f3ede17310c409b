//! Builtin functions, types, and exception constructors.
//!
//! Each nontrivial builtin has its own submodule. The [`bootstrap`]
//! function populates the builtins namespace at runtime init with exactly
//! the names of the bootstrap list; `Builtins` values are immediate, so the
//! bootstrap allocates nothing on the heap.

mod abs;
mod all_any;
mod build_class;
mod callable;
mod chr_ord;
mod divmod;
mod hash;
mod isinstance;
mod len;
mod min_max;
mod next_iter;
mod pow;
mod print;
mod range_fn;
mod sum;
mod type_;

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::{
    args::ArgVec,
    exception::{ExcType, RunResult, SimpleException},
    heap::HeapData,
    intern::{Interns, StaticStrings},
    namespace::Namespace,
    runtime::Runtime,
    types::Type,
    value::Value,
};

/// Enumerates the builtin functions of the bootstrap list.
///
/// The `Display` form is the published name (`Abs` -> "abs",
/// `BuildClass` -> "__build_class__").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinFn {
    Abs,
    All,
    Any,
    Callable,
    Chr,
    Divmod,
    Hash,
    Isinstance,
    Issubclass,
    Iter,
    Len,
    Max,
    Min,
    Next,
    Ord,
    Pow,
    Print,
    Range,
    Sum,
    #[strum(serialize = "__build_class__")]
    BuildClass,
    #[strum(serialize = "__repl_print__")]
    ReplPrint,
}

/// A builtin callable as an immediate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtins {
    /// A builtin function like `print`, `len`, `abs`.
    Function(BuiltinFn),
    /// An exception factory like `ValueError`; calling it builds an
    /// exception instance.
    Exc(ExcType),
    /// A type object like `list` or `int`, callable as a constructor.
    Type(Type),
    /// An unbound method of a builtin type (e.g. `list.append`), produced
    /// by method-table lookup. When called, the first argument is the
    /// receiver.
    TypeMethod { ty: Type, name: StaticStrings },
}

impl Builtins {
    /// Calls this builtin with natural-order arguments.
    pub fn call(self, rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
        match self {
            Self::Function(f) => f.call(rt, args),
            Self::Exc(exc) => call_exc_factory(rt, exc, args),
            Self::Type(t) => type_::call(rt, t, args),
            Self::TypeMethod { ty, name } => call_type_method(rt, ty, name, args),
        }
    }

    /// Returns the type of this builtin value.
    #[must_use]
    pub fn py_type(self) -> Type {
        match self {
            Self::Function(_) | Self::TypeMethod { .. } => Type::BuiltinFunction,
            Self::Exc(_) | Self::Type(_) => Type::Type,
        }
    }

    /// Writes the Python repr for this callable.
    pub fn repr_fmt<W: Write>(self, f: &mut W) -> fmt::Result {
        match self {
            Self::Function(b) => write!(f, "<built-in function {b}>"),
            Self::Exc(e) => write!(f, "<class '{e}'>"),
            Self::Type(t) => write!(f, "<class '{t}'>"),
            Self::TypeMethod { ty, name } => {
                write!(f, "<built-in method {} of '{ty}' objects>", <&'static str>::from(name))
            }
        }
    }
}

impl fmt::Display for Builtins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(b) => write!(f, "{b}"),
            Self::Exc(e) => write!(f, "{e}"),
            Self::Type(t) => write!(f, "{t}"),
            Self::TypeMethod { name, .. } => write!(f, "{}", <&'static str>::from(*name)),
        }
    }
}

impl BuiltinFn {
    fn call(self, rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
        match self {
            Self::Abs => abs::builtin_abs(rt, args),
            Self::All => all_any::builtin_all(rt, args),
            Self::Any => all_any::builtin_any(rt, args),
            Self::Callable => callable::builtin_callable(rt, args),
            Self::Chr => chr_ord::builtin_chr(rt, args),
            Self::Divmod => divmod::builtin_divmod(rt, args),
            Self::Hash => hash::builtin_hash(rt, args),
            Self::Isinstance => isinstance::builtin_isinstance(rt, args),
            Self::Issubclass => isinstance::builtin_issubclass(rt, args),
            Self::Iter => next_iter::builtin_iter(rt, args),
            Self::Len => len::builtin_len(rt, args),
            Self::Max => min_max::builtin_max(rt, args),
            Self::Min => min_max::builtin_min(rt, args),
            Self::Next => next_iter::builtin_next(rt, args),
            Self::Ord => chr_ord::builtin_ord(rt, args),
            Self::Pow => pow::builtin_pow(rt, args),
            Self::Print => print::builtin_print(rt, args),
            Self::Range => range_fn::builtin_range(rt, args),
            Self::Sum => sum::builtin_sum(rt, args),
            Self::BuildClass => build_class::builtin_build_class(rt, args),
            Self::ReplPrint => print::builtin_repl_print(rt, args),
        }
    }
}

/// Calls an exception factory: zero arguments or a single message.
fn call_exc_factory(rt: &mut Runtime, exc: ExcType, args: ArgVec) -> RunResult<Value> {
    let instance = match args.len() {
        0 => SimpleException::new(exc),
        1 => SimpleException::new_msg(exc, rt.py_str(args[0])),
        n => return Err(ExcType::arg_count(<&'static str>::from(exc), 1, n)),
    };
    Ok(rt.heap.alloc_value(HeapData::Exception(instance)))
}

/// Calls an unbound builtin-type method: the first argument is the
/// receiver (or, for class-kind methods, the type object).
fn call_type_method(rt: &mut Runtime, ty: Type, name: StaticStrings, mut args: ArgVec) -> RunResult<Value> {
    if args.is_empty() {
        return Err(ExcType::type_error(format!(
            "descriptor '{}' of '{ty}' object needs an argument",
            <&'static str>::from(name)
        )));
    }
    let self_val = args.remove(0);
    match ty {
        Type::List => crate::types::list::call_method(rt, self_val, name, args),
        Type::Dict => crate::types::dict::call_method(rt, self_val, name, args),
        Type::Set => crate::types::set::call_method(rt, self_val, name, args),
        Type::Str => crate::types::str::call_method(rt, self_val, name, args),
        _ => Err(ExcType::type_error(format!(
            "'{ty}' object has no builtin methods"
        ))),
    }
}

/// Populates the builtins namespace with the bootstrap set: types,
/// exception factories, `Ellipsis`, the two core hooks, and the builtin
/// functions.
pub(crate) fn bootstrap(interns: &mut Interns, builtins: &mut Namespace) {
    use strum::IntoEnumIterator;

    let mut add = |interns: &mut Interns, name: &str, value: Value| {
        let q = interns.intern(name);
        builtins.insert(q, value);
    };

    // Types.
    for ty in [Type::Bool, Type::Dict, Type::Int, Type::List, Type::Set, Type::Tuple, Type::Type] {
        add(interns, <&'static str>::from(ty), Value::Builtin(Builtins::Type(ty)));
    }
    #[cfg(feature = "float")]
    for ty in [Type::Complex, Type::Float] {
        add(interns, <&'static str>::from(ty), Value::Builtin(Builtins::Type(ty)));
    }

    // Exception factories.
    for exc in [
        ExcType::AttributeError,
        ExcType::IndexError,
        ExcType::KeyError,
        ExcType::NameError,
        ExcType::TypeError,
        ExcType::SyntaxError,
        ExcType::ValueError,
        ExcType::OSError,
        ExcType::AssertionError,
    ] {
        add(interns, <&'static str>::from(exc), Value::Builtin(Builtins::Exc(exc)));
    }

    // Singletons.
    add(interns, "Ellipsis", Value::Ellipsis);

    // Core hooks and builtin functions; `BuiltinFn` covers both.
    for f in BuiltinFn::iter() {
        add(interns, <&'static str>::from(f), Value::Builtin(Builtins::Function(f)));
    }
}
