use serde::{Deserialize, Serialize};

use crate::{
    builtins::Builtins,
    heap::{Heap, HeapData, HeapId},
    intern::Qstr,
    types::Type,
};

/// Primary value type representing runtime objects.
///
/// Small immediate values (ints, singletons, interned strings, builtins) are
/// stored inline; everything else lives in the heap arena and is referenced
/// via `Ref(HeapId)`. The enum form replaces the source's low-bit word
/// tagging; packing into a machine word is an implementation choice the
/// contract does not require.
///
/// NOTE: it's important to keep this type small and `Copy`; the call and
/// dispatch paths move values freely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Internal "absent" marker filling call-protocol and method-lookup
    /// slots (the source's `NULL`). Never a user-visible value.
    Undefined,
    None,
    Ellipsis,
    /// Iterator-exhaustion marker returned by `iternext`.
    ///
    /// Distinct from the `StopIteration` exception; protocol boundaries
    /// (`next()`, unpacking, loop helpers) convert it and it must never
    /// escape into user code.
    StopIteration,
    Bool(bool),
    /// The small integer. Arithmetic that overflows promotes to a
    /// heap-boxed big integer.
    Int(i64),
    #[cfg(feature = "float")]
    Float(f64),
    /// An interned string. Computed strings are heap-allocated instead.
    InternStr(Qstr),
    /// A builtin function, exception factory, type object, or unbound
    /// builtin-type method.
    Builtin(Builtins),
    /// Heap object handle.
    Ref(HeapId),
}

impl Value {
    #[inline]
    #[must_use]
    pub fn is_small_int(self) -> bool {
        matches!(self, Self::Int(_))
    }

    #[inline]
    #[must_use]
    pub fn is_singleton(self) -> bool {
        matches!(
            self,
            Self::None | Self::Ellipsis | Self::Bool(_) | Self::StopIteration
        )
    }

    #[inline]
    #[must_use]
    pub fn is_heap(self) -> bool {
        matches!(self, Self::Ref(_))
    }

    #[inline]
    #[must_use]
    pub fn as_small_int(self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the type discriminator for this value.
    ///
    /// # Panics
    /// Panics on the internal markers (`Undefined`, `StopIteration`), which
    /// have no type: reaching here with one is a runtime bug.
    #[must_use]
    pub fn py_type(self, heap: &Heap) -> Type {
        match self {
            Self::Undefined => panic!("cannot get type of the absent marker"),
            Self::StopIteration => panic!("cannot get type of the stop-iteration marker"),
            Self::None => Type::NoneType,
            Self::Ellipsis => Type::Ellipsis,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            #[cfg(feature = "float")]
            Self::Float(_) => Type::Float,
            Self::InternStr(_) => Type::Str,
            Self::Builtin(b) => b.py_type(),
            Self::Ref(id) => heap.get(id).py_type(),
        }
    }

    /// Truthiness.
    ///
    /// Small ints by zero-test, `None` and `False` false, containers by
    /// emptiness, everything else true.
    ///
    /// # Panics
    /// Panics on the internal markers.
    #[must_use]
    pub fn is_true(self, heap: &Heap) -> bool {
        match self {
            Self::Undefined => panic!("truth test on the absent marker"),
            Self::StopIteration => panic!("truth test on the stop-iteration marker"),
            Self::None => false,
            Self::Ellipsis => true,
            Self::Bool(b) => b,
            Self::Int(n) => n != 0,
            #[cfg(feature = "float")]
            Self::Float(f) => f != 0.0,
            Self::InternStr(q) => q != Qstr::from(crate::intern::StaticStrings::EmptyString),
            Self::Builtin(_) => true,
            Self::Ref(id) => heap.get(id).is_true(),
        }
    }
}

/// Type-agnostic equality used by `==` / `!=` and container membership.
///
/// Immediates compare by identity with numeric unification across
/// bool/int/float/big-int; heap values compare structurally. Values of
/// unrelated types are unequal, never an error.
#[must_use]
pub fn py_eq(heap: &Heap, interns: &crate::intern::Interns, a: Value, b: Value) -> bool {
    if let (Some(x), Some(y)) = (numeric_class(heap, a), numeric_class(heap, b)) {
        return x == y;
    }
    match (a, b) {
        (Value::None, Value::None) | (Value::Ellipsis, Value::Ellipsis) => true,
        (Value::InternStr(qa), Value::InternStr(qb)) => qa == qb,
        (Value::InternStr(q), Value::Ref(id)) | (Value::Ref(id), Value::InternStr(q)) => {
            matches!(heap.get(id), HeapData::Str(s) if s == interns.get(q))
        }
        (Value::Builtin(ba), Value::Builtin(bb)) => ba == bb,
        (Value::Ref(ia), Value::Ref(ib)) => ia == ib || heap_eq(heap, interns, ia, ib),
        _ => false,
    }
}

/// Numeric comparison key: bool/int/big-int (and float) unify, so
/// `True == 1`, `2**40 == float(2**40)`, and big/small ints compare by value.
enum Numeric {
    Int(i64),
    Big(num_bigint::BigInt),
    #[cfg(feature = "float")]
    Float(f64),
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Big(a), Self::Big(b)) => a == b,
            (Self::Int(a), Self::Big(b)) | (Self::Big(b), Self::Int(a)) => *b == num_bigint::BigInt::from(*a),
            #[cfg(feature = "float")]
            (Self::Float(a), Self::Float(b)) => a == b,
            #[cfg(feature = "float")]
            (Self::Float(f), n) | (n, Self::Float(f)) => n.widen() == *f,
        }
    }
}

impl Numeric {
    #[cfg(feature = "float")]
    fn widen(&self) -> f64 {
        match self {
            Self::Int(n) => *n as f64,
            Self::Big(b) => num_traits::ToPrimitive::to_f64(b).unwrap_or(f64::NAN),
            Self::Float(f) => *f,
        }
    }
}

fn numeric_class(heap: &Heap, v: Value) -> Option<Numeric> {
    match v {
        Value::Bool(b) => Some(Numeric::Int(i64::from(b))),
        Value::Int(n) => Some(Numeric::Int(n)),
        #[cfg(feature = "float")]
        Value::Float(f) => Some(Numeric::Float(f)),
        Value::Ref(id) => match heap.get(id) {
            HeapData::BigInt(b) => Some(Numeric::Big(b.clone())),
            _ => None,
        },
        _ => None,
    }
}

fn heap_eq(heap: &Heap, interns: &crate::intern::Interns, a: HeapId, b: HeapId) -> bool {
    match (heap.get(a), heap.get(b)) {
        (HeapData::Str(x), HeapData::Str(y)) => x == y,
        (HeapData::BigInt(x), HeapData::BigInt(y)) => x == y,
        (HeapData::List(x), HeapData::List(y)) => seq_eq(heap, interns, x.items(), y.items()),
        (HeapData::Tuple(x), HeapData::Tuple(y)) => seq_eq(heap, interns, x.items(), y.items()),
        (HeapData::Dict(x), HeapData::Dict(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, va)| match y.get(k) {
                    Some(vb) => py_eq(heap, interns, *va, vb),
                    None => false,
                })
        }
        (HeapData::Set(x), HeapData::Set(y)) => x.len() == y.len() && x.iter().all(|k| y.contains(k)),
        (HeapData::Range(x), HeapData::Range(y)) => x == y,
        (HeapData::Exception(x), HeapData::Exception(y)) => x == y,
        _ => false,
    }
}

fn seq_eq(heap: &Heap, interns: &crate::intern::Interns, xs: &[Value], ys: &[Value]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(&x, &y)| py_eq(heap, interns, x, y))
}
