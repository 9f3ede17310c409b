//! Unary, binary, and comparison operator dispatch.
//!
//! The small-int fast path computes everything with checked arithmetic and
//! promotes to a boxed big integer instead of wrapping. Mixed small-int /
//! float (and complex) operands delegate to the float helpers; everything
//! else dispatches on the left operand's type, and an unsupported pairing
//! raises `TypeError`.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::{
    builtins::Builtins,
    exception::{ExcType, RunResult, SimpleException},
    heap::{Heap, HeapData},
    runtime::Runtime,
    tracer::TraceEvent,
    types::{List, Set, Tuple},
    value::{Value, py_eq},
};
#[cfg(feature = "float")]
use crate::types::Complex;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Positive,
    Negative,
    Invert,
}

/// Binary operators, their in-place variants, the comparisons, and the
/// exception-match pseudo-comparison used by handler dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    Xor,
    And,
    Lshift,
    Rshift,
    Add,
    Subtract,
    Multiply,
    FloorDivide,
    TrueDivide,
    Modulo,
    Power,
    InplaceOr,
    InplaceXor,
    InplaceAnd,
    InplaceLshift,
    InplaceRshift,
    InplaceAdd,
    InplaceSubtract,
    InplaceMultiply,
    InplaceFloorDivide,
    InplaceTrueDivide,
    InplaceModulo,
    InplacePower,
    Less,
    More,
    LessEqual,
    MoreEqual,
    Equal,
    NotEqual,
    ExceptionMatch,
}

impl BinaryOp {
    /// Folds an in-place variant to its plain counterpart.
    ///
    /// Immutable types fall through to the plain operation; truly mutable
    /// types (lists) intercept the in-place form before this is consulted.
    #[must_use]
    pub fn base(self) -> Self {
        match self {
            Self::InplaceOr => Self::Or,
            Self::InplaceXor => Self::Xor,
            Self::InplaceAnd => Self::And,
            Self::InplaceLshift => Self::Lshift,
            Self::InplaceRshift => Self::Rshift,
            Self::InplaceAdd => Self::Add,
            Self::InplaceSubtract => Self::Subtract,
            Self::InplaceMultiply => Self::Multiply,
            Self::InplaceFloorDivide => Self::FloorDivide,
            Self::InplaceTrueDivide => Self::TrueDivide,
            Self::InplaceModulo => Self::Modulo,
            Self::InplacePower => Self::Power,
            other => other,
        }
    }

    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Less | Self::More | Self::LessEqual | Self::MoreEqual | Self::Equal | Self::NotEqual
        )
    }
}

/// Boxes a big integer, demoting back to a small int when it fits.
///
/// Keeping small values canonical preserves the invariant that a small-int
/// quantity has exactly one representation.
pub(crate) fn bigint_to_value(heap: &mut Heap, b: BigInt) -> Value {
    match b.to_i64() {
        Some(n) => Value::Int(n),
        None => heap.alloc_value(HeapData::BigInt(b)),
    }
}

/// Widens ints and bools to `i64` for the arithmetic fast path.
fn coerce_int(v: Value) -> Option<i64> {
    match v {
        Value::Int(n) => Some(n),
        Value::Bool(b) => Some(i64::from(b)),
        _ => None,
    }
}

fn coerce_bigint(heap: &Heap, v: Value) -> Option<BigInt> {
    match v {
        Value::Int(n) => Some(BigInt::from(n)),
        Value::Bool(b) => Some(BigInt::from(i64::from(b))),
        Value::Ref(id) => match heap.get(id) {
            HeapData::BigInt(b) => Some(b.clone()),
            _ => None,
        },
        _ => None,
    }
}

impl Runtime {
    /// Applies a unary operator.
    ///
    /// Small ints compute in widened arithmetic and box on overflow; `not`
    /// tests against zero regardless of any type-specific truthiness. Other
    /// types support `not` (via the truth protocol) and, for numerics,
    /// sign/invert; anything else raises `TypeError`.
    pub fn unary_op(&mut self, op: UnaryOp, v: Value) -> RunResult<Value> {
        self.tracer.trace(TraceEvent::UnaryOp { op });
        if let Some(n) = coerce_int(v) {
            return Ok(match op {
                UnaryOp::Not => Value::Bool(n == 0),
                UnaryOp::Positive => Value::Int(n),
                UnaryOp::Negative => match n.checked_neg() {
                    Some(neg) => Value::Int(neg),
                    None => bigint_to_value(&mut self.heap, -BigInt::from(n)),
                },
                UnaryOp::Invert => Value::Int(!n),
            });
        }
        if op == UnaryOp::Not {
            return Ok(Value::Bool(!v.is_true(&self.heap)));
        }
        #[cfg(feature = "float")]
        if let Value::Float(f) = v {
            return Ok(match op {
                UnaryOp::Positive => Value::Float(f),
                UnaryOp::Negative => Value::Float(-f),
                UnaryOp::Not => unreachable!("handled above"),
                UnaryOp::Invert => return Err(self.bad_unary_operand(v)),
            });
        }
        if let Value::Ref(id) = v {
            if let HeapData::BigInt(b) = self.heap.get(id) {
                let result = match op {
                    UnaryOp::Positive => b.clone(),
                    UnaryOp::Negative => -b.clone(),
                    UnaryOp::Invert => -b.clone() - 1,
                    UnaryOp::Not => unreachable!("handled above"),
                };
                return Ok(bigint_to_value(&mut self.heap, result));
            }
        }
        Err(self.bad_unary_operand(v))
    }

    fn bad_unary_operand(&self, v: Value) -> SimpleException {
        ExcType::type_error(format!(
            "bad operand type for unary operator: '{}'",
            self.type_name(v)
        ))
    }

    /// Applies a binary, comparison, or exception-match operator.
    pub fn binary_op(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> RunResult<Value> {
        self.tracer.trace(TraceEvent::BinaryOp { op });

        // == and != short-circuit through type-agnostic equality.
        if matches!(op, BinaryOp::Equal | BinaryOp::NotEqual) {
            let equal = py_eq(&self.heap, &self.interns, lhs, rhs);
            return Ok(Value::Bool(if op == BinaryOp::Equal { equal } else { !equal }));
        }

        if op == BinaryOp::ExceptionMatch {
            return self.exception_match(lhs, rhs);
        }

        // Truly mutable types intercept their in-place ops before the fold
        // to the plain operation: `list += it` extends in place.
        if op == BinaryOp::InplaceAdd {
            if let Value::Ref(id) = lhs {
                if matches!(self.heap.get(id), HeapData::List(_)) {
                    let items = self.collect_iterable(rhs)?;
                    if let HeapData::List(l) = self.heap.get_mut(id) {
                        l.extend_from(&items);
                    }
                    return Ok(lhs);
                }
            }
        }

        let op = op.base();

        // Small-int fast path.
        if let (Some(l), Some(r)) = (coerce_int(lhs), coerce_int(rhs)) {
            return self.small_int_binary(op, l, r);
        }

        // Small-int x float / complex delegates to the right operand's helper.
        #[cfg(feature = "float")]
        {
            if let Some(result) = self.try_float_binary(op, lhs, rhs)? {
                return Ok(result);
            }
        }

        // Big-int arithmetic, either side.
        if matches!(lhs, Value::Ref(id) if matches!(self.heap.get(id), HeapData::BigInt(_)))
            || matches!(rhs, Value::Ref(id) if matches!(self.heap.get(id), HeapData::BigInt(_)))
        {
            if let (Some(l), Some(r)) = (coerce_bigint(&self.heap, lhs), coerce_bigint(&self.heap, rhs)) {
                return self.bigint_binary(op, l, r);
            }
        }

        // Comparisons over strings and sequences.
        if op.is_comparison() {
            if let Some(ordering) = self.py_cmp(lhs, rhs)? {
                return Ok(Value::Bool(match op {
                    BinaryOp::Less => ordering == Ordering::Less,
                    BinaryOp::More => ordering == Ordering::Greater,
                    BinaryOp::LessEqual => ordering != Ordering::Greater,
                    BinaryOp::MoreEqual => ordering != Ordering::Less,
                    _ => unreachable!("Equal/NotEqual handled above"),
                }));
            }
            return Err(self.unsupported_binary_operands(lhs, rhs));
        }

        // Type dispatch on the left operand.
        if let Some(result) = self.heap_binary(op, lhs, rhs)? {
            return Ok(result);
        }

        Err(self.unsupported_binary_operands(lhs, rhs))
    }

    fn unsupported_binary_operands(&self, lhs: Value, rhs: Value) -> SimpleException {
        ExcType::type_error(format!(
            "unsupported operand types for binary operator: '{}', '{}'",
            self.type_name(lhs),
            self.type_name(rhs)
        ))
    }

    /// `exception_match` between a raised exception value and a handler's
    /// exception factory (or another exception value): kind identity.
    fn exception_match(&self, lhs: Value, rhs: Value) -> RunResult<Value> {
        let (Some(raised), Some(handler)) = (self.exc_kind(lhs), self.exc_kind(rhs)) else {
            return Err(ExcType::type_error(
                "exception match requires exception values or exception types",
            ));
        };
        Ok(Value::Bool(raised.matches(handler)))
    }

    pub(crate) fn exc_kind(&self, v: Value) -> Option<ExcType> {
        match v {
            Value::Builtin(Builtins::Exc(e)) => Some(e),
            Value::Ref(id) => match self.heap.get(id) {
                HeapData::Exception(exc) => Some(exc.exc_type()),
                _ => None,
            },
            _ => None,
        }
    }

    fn small_int_binary(&mut self, op: BinaryOp, l: i64, r: i64) -> RunResult<Value> {
        let result = match op {
            BinaryOp::Or => l | r,
            BinaryOp::Xor => l ^ r,
            BinaryOp::And => l & r,
            BinaryOp::Lshift => return self.small_int_lshift(l, r),
            BinaryOp::Rshift => {
                if r < 0 {
                    return Err(ExcType::value_error("negative shift count"));
                }
                if r >= 64 {
                    if l < 0 { -1 } else { 0 }
                } else {
                    l >> r
                }
            }
            BinaryOp::Add => match l.checked_add(r) {
                Some(n) => n,
                None => return Ok(bigint_to_value(&mut self.heap, BigInt::from(l) + r)),
            },
            BinaryOp::Subtract => match l.checked_sub(r) {
                Some(n) => n,
                None => return Ok(bigint_to_value(&mut self.heap, BigInt::from(l) - r)),
            },
            BinaryOp::Multiply => match l.checked_mul(r) {
                Some(n) => n,
                None => return Ok(bigint_to_value(&mut self.heap, BigInt::from(l) * r)),
            },
            BinaryOp::FloorDivide => {
                if r == 0 {
                    return Err(ExcType::zero_division("integer division or modulo by zero"));
                }
                if l == i64::MIN && r == -1 {
                    return Ok(bigint_to_value(&mut self.heap, -BigInt::from(l)));
                }
                // Floored division, matching Python for mixed signs.
                l.div_floor(&r)
            }
            BinaryOp::Modulo => {
                if r == 0 {
                    return Err(ExcType::zero_division("integer division or modulo by zero"));
                }
                // Floored modulo: the result takes the sign of the divisor.
                l.mod_floor(&r)
            }
            BinaryOp::TrueDivide => {
                if r == 0 {
                    return Err(ExcType::zero_division("division by zero"));
                }
                #[cfg(feature = "float")]
                return Ok(Value::Float(l as f64 / r as f64));
                #[cfg(not(feature = "float"))]
                return Err(self.unsupported_binary_operands(Value::Int(l), Value::Int(r)));
            }
            BinaryOp::Power => return self.small_int_power(l, r),
            BinaryOp::Less => return Ok(Value::Bool(l < r)),
            BinaryOp::More => return Ok(Value::Bool(l > r)),
            BinaryOp::LessEqual => return Ok(Value::Bool(l <= r)),
            BinaryOp::MoreEqual => return Ok(Value::Bool(l >= r)),
            _ => unreachable!("unknown small-int binary op {op:?}"),
        };
        Ok(Value::Int(result))
    }

    fn small_int_lshift(&mut self, l: i64, r: i64) -> RunResult<Value> {
        if r < 0 {
            return Err(ExcType::value_error("negative shift count"));
        }
        let shift = u32::try_from(r).map_err(|_| ExcType::value_error("shift count too large"))?;
        if shift < 64 {
            let wide = i128::from(l) << shift;
            if let Ok(n) = i64::try_from(wide) {
                return Ok(Value::Int(n));
            }
        }
        Ok(bigint_to_value(&mut self.heap, BigInt::from(l) << shift))
    }

    /// `**` over small ints: exponentiation by squaring, promoting to a big
    /// integer on overflow. A negative exponent yields a float when floats
    /// are enabled and `ValueError` otherwise.
    fn small_int_power(&mut self, base: i64, exp: i64) -> RunResult<Value> {
        if exp < 0 {
            #[cfg(feature = "float")]
            return Ok(Value::Float((base as f64).powi(i32::try_from(exp).unwrap_or(i32::MIN))));
            #[cfg(not(feature = "float"))]
            return Err(ExcType::value_error("negative power without float support"));
        }
        let mut result: i64 = 1;
        let mut b = base;
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                match result.checked_mul(b) {
                    Some(n) => result = n,
                    None => return self.bigint_power(BigInt::from(base), exp),
                }
            }
            e /= 2;
            if e > 0 {
                match b.checked_mul(b) {
                    Some(n) => b = n,
                    None => return self.bigint_power(BigInt::from(base), exp),
                }
            }
        }
        Ok(Value::Int(result))
    }

    fn bigint_power(&mut self, base: BigInt, exp: i64) -> RunResult<Value> {
        let exp = u32::try_from(exp).map_err(|_| ExcType::value_error("exponent too large"))?;
        Ok(bigint_to_value(&mut self.heap, base.pow(exp)))
    }

    fn bigint_binary(&mut self, op: BinaryOp, l: BigInt, r: BigInt) -> RunResult<Value> {
        let result = match op {
            BinaryOp::Or => l | r,
            BinaryOp::Xor => l ^ r,
            BinaryOp::And => l & r,
            BinaryOp::Add => l + r,
            BinaryOp::Subtract => l - r,
            BinaryOp::Multiply => l * r,
            BinaryOp::FloorDivide => {
                if r.is_zero() {
                    return Err(ExcType::zero_division("integer division or modulo by zero"));
                }
                l.div_floor(&r)
            }
            BinaryOp::Modulo => {
                if r.is_zero() {
                    return Err(ExcType::zero_division("integer division or modulo by zero"));
                }
                l.mod_floor(&r)
            }
            BinaryOp::Power => {
                let exp = r
                    .to_i64()
                    .ok_or_else(|| ExcType::value_error("exponent too large"))?;
                return self.bigint_power(l, exp);
            }
            BinaryOp::Lshift => {
                let shift = r
                    .to_u32()
                    .ok_or_else(|| ExcType::value_error("negative shift count"))?;
                l << shift
            }
            BinaryOp::Rshift => {
                let shift = r
                    .to_u32()
                    .ok_or_else(|| ExcType::value_error("negative shift count"))?;
                l >> shift
            }
            BinaryOp::Less => return Ok(Value::Bool(l < r)),
            BinaryOp::More => return Ok(Value::Bool(l > r)),
            BinaryOp::LessEqual => return Ok(Value::Bool(l <= r)),
            BinaryOp::MoreEqual => return Ok(Value::Bool(l >= r)),
            BinaryOp::TrueDivide => {
                #[cfg(feature = "float")]
                {
                    if r.is_zero() {
                        return Err(ExcType::zero_division("division by zero"));
                    }
                    let lf = l.to_f64().unwrap_or(f64::INFINITY);
                    let rf = r.to_f64().unwrap_or(f64::INFINITY);
                    return Ok(Value::Float(lf / rf));
                }
                #[cfg(not(feature = "float"))]
                return Err(ExcType::type_error(
                    "unsupported operand types for binary operator: 'int', 'int'",
                ));
            }
            _ => {
                return Err(ExcType::type_error(
                    "unsupported operand types for binary operator: 'int', 'int'",
                ));
            }
        };
        Ok(bigint_to_value(&mut self.heap, result))
    }

    /// Float / complex delegation: fires when either operand is a float or
    /// complex and the other is numeric. Returns `Ok(None)` when neither
    /// side is float-like, letting dispatch continue.
    #[cfg(feature = "float")]
    fn try_float_binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> RunResult<Option<Value>> {
        let as_complex = |heap: &Heap, v: Value| -> Option<Complex> {
            match v {
                Value::Ref(id) => match heap.get(id) {
                    HeapData::Complex(c) => Some(*c),
                    _ => None,
                },
                _ => None,
            }
        };
        let as_float = |heap: &Heap, v: Value| -> Option<f64> {
            match v {
                Value::Float(f) => Some(f),
                Value::Int(n) => Some(n as f64),
                Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
                Value::Ref(id) => match heap.get(id) {
                    HeapData::BigInt(b) => b.to_f64(),
                    _ => None,
                },
                _ => None,
            }
        };

        // Complex takes precedence over float widening.
        let lc = as_complex(&self.heap, lhs);
        let rc = as_complex(&self.heap, rhs);
        if lc.is_some() || rc.is_some() {
            let widen = |c: Option<Complex>, v: Value| -> Option<Complex> {
                c.or_else(|| as_float(&self.heap, v).map(|f| Complex { real: f, imag: 0.0 }))
            };
            if let (Some(l), Some(r)) = (widen(lc, lhs), widen(rc, rhs)) {
                return self.complex_binary(op, l, r).map(Some);
            }
            return Ok(None);
        }

        if !matches!(lhs, Value::Float(_)) && !matches!(rhs, Value::Float(_)) {
            return Ok(None);
        }
        if let (Some(l), Some(r)) = (as_float(&self.heap, lhs), as_float(&self.heap, rhs)) {
            return self.float_binary(op, l, r).map(Some);
        }
        Ok(None)
    }

    #[cfg(feature = "float")]
    fn float_binary(&mut self, op: BinaryOp, l: f64, r: f64) -> RunResult<Value> {
        let result = match op {
            BinaryOp::Add => l + r,
            BinaryOp::Subtract => l - r,
            BinaryOp::Multiply => l * r,
            BinaryOp::TrueDivide => {
                if r == 0.0 {
                    return Err(ExcType::zero_division("float division by zero"));
                }
                l / r
            }
            BinaryOp::FloorDivide => {
                if r == 0.0 {
                    return Err(ExcType::zero_division("float floor division by zero"));
                }
                (l / r).floor()
            }
            BinaryOp::Modulo => {
                if r == 0.0 {
                    return Err(ExcType::zero_division("float modulo"));
                }
                // Floored modulo: result takes the sign of the divisor.
                l - r * (l / r).floor()
            }
            BinaryOp::Power => l.powf(r),
            BinaryOp::Less => return Ok(Value::Bool(l < r)),
            BinaryOp::More => return Ok(Value::Bool(l > r)),
            BinaryOp::LessEqual => return Ok(Value::Bool(l <= r)),
            BinaryOp::MoreEqual => return Ok(Value::Bool(l >= r)),
            _ => {
                return Err(ExcType::type_error(
                    "unsupported operand types for binary operator: 'float', 'float'",
                ));
            }
        };
        Ok(Value::Float(result))
    }

    #[cfg(feature = "float")]
    fn complex_binary(&mut self, op: BinaryOp, l: Complex, r: Complex) -> RunResult<Value> {
        let result = match op {
            BinaryOp::Add => Complex {
                real: l.real + r.real,
                imag: l.imag + r.imag,
            },
            BinaryOp::Subtract => Complex {
                real: l.real - r.real,
                imag: l.imag - r.imag,
            },
            BinaryOp::Multiply => Complex {
                real: l.real * r.real - l.imag * r.imag,
                imag: l.real * r.imag + l.imag * r.real,
            },
            BinaryOp::TrueDivide => {
                let denom = r.real * r.real + r.imag * r.imag;
                if denom == 0.0 {
                    return Err(ExcType::zero_division("complex division by zero"));
                }
                Complex {
                    real: (l.real * r.real + l.imag * r.imag) / denom,
                    imag: (l.imag * r.real - l.real * r.imag) / denom,
                }
            }
            _ => {
                return Err(ExcType::type_error(
                    "unsupported operand types for binary operator: 'complex', 'complex'",
                ));
            }
        };
        Ok(self.heap.alloc_value(HeapData::Complex(result)))
    }

    /// Total-order comparison for the types that define one: numbers,
    /// strings, lists, tuples. `None` means the pairing has no ordering.
    fn py_cmp(&self, lhs: Value, rhs: Value) -> RunResult<Option<Ordering>> {
        if let (Some(l), Some(r)) = (coerce_bigint(&self.heap, lhs), coerce_bigint(&self.heap, rhs)) {
            return Ok(Some(l.cmp(&r)));
        }
        if let (Some(l), Some(r)) = (self.str_value(lhs), self.str_value(rhs)) {
            return Ok(Some(l.cmp(&r)));
        }
        if let (Value::Ref(a), Value::Ref(b)) = (lhs, rhs) {
            let pair = match (self.heap.get(a), self.heap.get(b)) {
                (HeapData::List(x), HeapData::List(y)) => Some((x.items().to_vec(), y.items().to_vec())),
                (HeapData::Tuple(x), HeapData::Tuple(y)) => Some((x.items().to_vec(), y.items().to_vec())),
                _ => None,
            };
            if let Some((xs, ys)) = pair {
                return self.seq_cmp(&xs, &ys);
            }
        }
        Ok(None)
    }

    /// Lexicographic sequence comparison.
    fn seq_cmp(&self, xs: &[Value], ys: &[Value]) -> RunResult<Option<Ordering>> {
        for (&x, &y) in xs.iter().zip(ys) {
            if py_eq(&self.heap, &self.interns, x, y) {
                continue;
            }
            return self.py_cmp(x, y);
        }
        Ok(Some(xs.len().cmp(&ys.len())))
    }

    /// Binary operations dispatched on heap types: concatenation and
    /// repetition for sequences, set algebra, in-place list extend.
    fn heap_binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> RunResult<Option<Value>> {
        // str + str, str * int
        if let Some(l) = self.str_value(lhs) {
            match op {
                BinaryOp::Add => {
                    if let Some(r) = self.str_value(rhs) {
                        let mut combined = l;
                        combined.push_str(&r);
                        return Ok(Some(self.heap.alloc_value(HeapData::Str(combined))));
                    }
                }
                BinaryOp::Multiply => {
                    if let Some(n) = coerce_int(rhs) {
                        let repeated = l.repeat(usize::try_from(n).unwrap_or(0));
                        return Ok(Some(self.heap.alloc_value(HeapData::Str(repeated))));
                    }
                }
                _ => {}
            }
            return Ok(None);
        }

        let Value::Ref(lhs_id) = lhs else {
            return Ok(None);
        };

        match self.heap.get(lhs_id) {
            HeapData::List(_) => {
                let l_items = match self.heap.get(lhs_id) {
                    HeapData::List(l) => l.items().to_vec(),
                    _ => unreachable!(),
                };
                match op {
                    BinaryOp::Add => {
                        if let Value::Ref(rhs_id) = rhs {
                            if let HeapData::List(r) = self.heap.get(rhs_id) {
                                let mut combined = l_items;
                                combined.extend_from_slice(r.items());
                                return Ok(Some(self.heap.alloc_value(HeapData::List(List::new(combined)))));
                            }
                        }
                    }
                    BinaryOp::Multiply => {
                        if let Some(n) = coerce_int(rhs) {
                            let combined = repeat_items(&l_items, n);
                            return Ok(Some(self.heap.alloc_value(HeapData::List(List::new(combined)))));
                        }
                    }
                    _ => {}
                }
                Ok(None)
            }
            HeapData::Tuple(t) => {
                let l_items = t.items().to_vec();
                match op {
                    BinaryOp::Add => {
                        if let Value::Ref(rhs_id) = rhs {
                            if let HeapData::Tuple(r) = self.heap.get(rhs_id) {
                                let mut combined = l_items;
                                combined.extend_from_slice(r.items());
                                return Ok(Some(self.heap.alloc_value(HeapData::Tuple(Tuple::new(combined)))));
                            }
                        }
                    }
                    BinaryOp::Multiply => {
                        if let Some(n) = coerce_int(rhs) {
                            let combined = repeat_items(&l_items, n);
                            return Ok(Some(self.heap.alloc_value(HeapData::Tuple(Tuple::new(combined)))));
                        }
                    }
                    _ => {}
                }
                Ok(None)
            }
            HeapData::Set(_) => {
                let Value::Ref(rhs_id) = rhs else {
                    return Ok(None);
                };
                let (l_keys, r_keys) = match (self.heap.get(lhs_id), self.heap.get(rhs_id)) {
                    (HeapData::Set(l), HeapData::Set(r)) => (
                        l.iter().cloned().collect::<Vec<_>>(),
                        r.iter().cloned().collect::<Vec<_>>(),
                    ),
                    _ => return Ok(None),
                };
                let mut result = Set::new();
                match op {
                    BinaryOp::Or => {
                        for k in l_keys.into_iter().chain(r_keys) {
                            result.insert(k);
                        }
                    }
                    BinaryOp::And => {
                        for k in l_keys {
                            if r_keys.contains(&k) {
                                result.insert(k);
                            }
                        }
                    }
                    BinaryOp::Subtract => {
                        for k in l_keys {
                            if !r_keys.contains(&k) {
                                result.insert(k);
                            }
                        }
                    }
                    BinaryOp::Xor => {
                        for k in &l_keys {
                            if !r_keys.contains(k) {
                                result.insert(k.clone());
                            }
                        }
                        for k in r_keys {
                            if !l_keys.contains(&k) {
                                result.insert(k);
                            }
                        }
                    }
                    _ => return Ok(None),
                }
                Ok(Some(self.heap.alloc_value(HeapData::Set(result))))
            }
            _ => Ok(None),
        }
    }
}

/// Sequence repetition; a non-positive count yields the empty sequence.
fn repeat_items(items: &[Value], n: i64) -> Vec<Value> {
    let n = usize::try_from(n).unwrap_or(0);
    let mut out = Vec::with_capacity(items.len() * n);
    for _ in 0..n {
        out.extend_from_slice(items);
    }
    out
}
