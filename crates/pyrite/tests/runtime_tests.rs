//! Behavioral tests for the runtime core: name resolution, operator
//! dispatch, the call/attribute/iterator protocols, container construction,
//! and the builtins bootstrap.

use pyrite::{
    BinaryOp, BuiltinFn, Builtins, CollectStringPrint, ExcType, RunResult, Runtime, Type, UnaryOp, Value,
};

fn int_add(rt: &mut Runtime, a: i64, b: i64) -> Value {
    rt.binary_op(BinaryOp::Add, Value::Int(a), Value::Int(b)).unwrap()
}

/// Calls a builtin by its published name.
fn call_builtin(rt: &mut Runtime, name: &str, args_reversed: &[Value]) -> RunResult<Value> {
    let q = rt.intern(name);
    let f = rt.load_name(q).unwrap();
    rt.call_function_n(f, args_reversed)
}

// =============================================================================
// 1. Name resolution
// =============================================================================

/// Lookup falls back locals -> globals -> builtins, and stores are scoped.
#[test]
fn name_lookup_falls_back_to_globals() {
    let mut rt = Runtime::new();
    let x = rt.intern("x");
    rt.store_global(x, Value::Int(42));

    // Enter a frame with fresh (empty) locals.
    let frame = rt.new_namespace();
    let saved = rt.locals_get();
    rt.locals_set(frame);

    assert_eq!(rt.load_name(x).unwrap(), Value::Int(42), "miss in locals finds globals");
    rt.store_name(x, Value::Int(7));
    assert_eq!(rt.load_name(x).unwrap(), Value::Int(7), "locals now shadow globals");
    assert_eq!(rt.load_global(x).unwrap(), Value::Int(42), "globals are untouched");

    rt.locals_set(saved);
    assert_eq!(rt.load_name(x).unwrap(), Value::Int(42), "module scope sees the global");
}

/// A miss through the whole chain raises NameError with the standard message.
#[test]
fn missing_name_raises_name_error() {
    let mut rt = Runtime::new();
    let q = rt.intern("nope");
    let err = rt.load_name(q).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::NameError);
    assert_eq!(err.message(), Some("name 'nope' is not defined"));
}

/// Builtins resolve through load_name without any stores.
#[test]
fn builtins_resolve_through_load_name() {
    let mut rt = Runtime::new();
    let len = rt.intern("len");
    assert_eq!(
        rt.load_name(len).unwrap(),
        Value::Builtin(Builtins::Function(BuiltinFn::Len))
    );
    let ellipsis = rt.intern("Ellipsis");
    assert_eq!(rt.load_name(ellipsis).unwrap(), Value::Ellipsis);
}

/// Module scope establishes locals == globals and __name__ == "__main__".
#[test]
fn module_scope_shares_locals_and_globals() {
    let mut rt = Runtime::new();
    assert_eq!(rt.locals_get(), rt.globals_get());
    let dunder = rt.intern("__name__");
    let name = rt.load_name(dunder).unwrap();
    assert_eq!(rt.py_str(name), "__main__");
}

/// The locals swap round-trip preserves bindings.
#[test]
fn locals_swap_round_trip() {
    let mut rt = Runtime::new();
    let x = rt.intern("x");
    rt.store_name(x, Value::Int(5));
    let m = rt.new_namespace();
    let old = rt.locals_get();
    rt.locals_set(m);
    rt.locals_set(old);
    assert_eq!(rt.load_name(x).unwrap(), Value::Int(5));
}

// =============================================================================
// 2. Operator dispatch
// =============================================================================

#[test]
fn small_int_arithmetic() {
    let mut rt = Runtime::new();
    assert_eq!(int_add(&mut rt, 2, 3), Value::Int(5));
    assert_eq!(
        rt.binary_op(BinaryOp::FloorDivide, Value::Int(7), Value::Int(2)).unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        rt.binary_op(BinaryOp::Modulo, Value::Int(7), Value::Int(3)).unwrap(),
        Value::Int(1)
    );
    assert_eq!(
        rt.binary_op(BinaryOp::Power, Value::Int(2), Value::Int(10)).unwrap(),
        Value::Int(1024)
    );
    assert_eq!(
        rt.binary_op(BinaryOp::Less, Value::Int(2), Value::Int(3)).unwrap(),
        Value::Bool(true)
    );
}

/// Floor division and modulo follow Python's floored semantics for mixed
/// signs, not the host's truncated semantics.
#[test]
fn floored_division_for_mixed_signs() {
    let mut rt = Runtime::new();
    assert_eq!(
        rt.binary_op(BinaryOp::FloorDivide, Value::Int(-7), Value::Int(2)).unwrap(),
        Value::Int(-4)
    );
    assert_eq!(
        rt.binary_op(BinaryOp::Modulo, Value::Int(-7), Value::Int(2)).unwrap(),
        Value::Int(1),
        "modulo takes the sign of the divisor"
    );
    assert_eq!(
        rt.binary_op(BinaryOp::Modulo, Value::Int(7), Value::Int(-2)).unwrap(),
        Value::Int(-1)
    );
}

/// Arithmetic overflow promotes to a boxed integer instead of wrapping.
#[test]
fn overflow_promotes_to_big_int() {
    let mut rt = Runtime::new();
    let v = int_add(&mut rt, i64::MAX, 1);
    assert!(matches!(v, Value::Ref(_)), "overflowing add must box");
    assert_eq!(rt.py_repr(v), "9223372036854775808");

    let v = rt.binary_op(BinaryOp::Power, Value::Int(2), Value::Int(80)).unwrap();
    assert_eq!(rt.py_repr(v), "1208925819614629174706176");
}

#[test]
fn unary_ops() {
    let mut rt = Runtime::new();
    assert_eq!(rt.unary_op(UnaryOp::Not, Value::Int(0)).unwrap(), Value::Bool(true));
    assert_eq!(rt.unary_op(UnaryOp::Not, Value::Int(3)).unwrap(), Value::Bool(false));
    assert_eq!(rt.unary_op(UnaryOp::Negative, Value::Int(5)).unwrap(), Value::Int(-5));
    assert_eq!(rt.unary_op(UnaryOp::Invert, Value::Int(5)).unwrap(), Value::Int(-6));
    assert_eq!(rt.unary_op(UnaryOp::Positive, Value::Int(5)).unwrap(), Value::Int(5));

    // Negating i64::MIN promotes.
    let v = rt.unary_op(UnaryOp::Negative, Value::Int(i64::MIN)).unwrap();
    assert_eq!(rt.py_repr(v), "9223372036854775808");
}

#[test]
fn unsupported_operands_raise_type_error() {
    let mut rt = Runtime::new();
    let err = rt.binary_op(BinaryOp::Add, Value::None, Value::Int(2)).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert_eq!(
        err.message(),
        Some("unsupported operand types for binary operator: 'NoneType', 'int'")
    );

    let s = rt.new_str("x");
    let err = rt.unary_op(UnaryOp::Invert, s).unwrap_err();
    assert_eq!(err.message(), Some("bad operand type for unary operator: 'str'"));
}

/// True division produces floats, and negative powers promote to float
/// instead of failing.
#[cfg(feature = "float")]
#[test]
fn float_promotion_paths() {
    let mut rt = Runtime::new();
    assert_eq!(
        rt.binary_op(BinaryOp::TrueDivide, Value::Int(7), Value::Int(2)).unwrap(),
        Value::Float(3.5)
    );
    assert_eq!(
        rt.binary_op(BinaryOp::Power, Value::Int(2), Value::Int(-2)).unwrap(),
        Value::Float(0.25)
    );
    assert_eq!(
        rt.binary_op(BinaryOp::Add, Value::Int(1), Value::Float(0.5)).unwrap(),
        Value::Float(1.5)
    );
}

#[test]
fn division_by_zero() {
    let mut rt = Runtime::new();
    let err = rt
        .binary_op(BinaryOp::FloorDivide, Value::Int(1), Value::Int(0))
        .unwrap_err();
    assert_eq!(err.exc_type(), ExcType::ZeroDivisionError);
}

/// Equality goes through type-agnostic deep equality, matching the
/// `binary_op(EQ, a, b) <=> equal(a, b)` invariant.
#[test]
fn equality_is_structural() {
    let mut rt = Runtime::new();
    let a = rt.new_list(vec![Value::Int(1), Value::Int(2)]);
    let b = rt.new_list(vec![Value::Int(1), Value::Int(2)]);
    assert_ne!(a, b, "distinct heap objects");
    assert_eq!(rt.binary_op(BinaryOp::Equal, a, b).unwrap(), Value::Bool(true));
    assert_eq!(rt.binary_op(BinaryOp::NotEqual, a, b).unwrap(), Value::Bool(false));
    assert_eq!(
        rt.binary_op(BinaryOp::Equal, Value::Bool(true), Value::Int(1)).unwrap(),
        Value::Bool(true),
        "bool/int numeric unification"
    );
}

/// exception_match compares exception kind identity.
#[test]
fn exception_match_by_kind() {
    let mut rt = Runtime::new();
    let value_error = rt.intern("ValueError");
    let factory = rt.load_name(value_error).unwrap();
    let msg = rt.new_str("boom");
    let instance = rt.call_function_1(factory, msg).unwrap();

    let matched = rt.binary_op(BinaryOp::ExceptionMatch, instance, factory).unwrap();
    assert_eq!(matched, Value::Bool(true));

    let type_error = rt.intern("TypeError");
    let other = rt.load_name(type_error).unwrap();
    let matched = rt.binary_op(BinaryOp::ExceptionMatch, instance, other).unwrap();
    assert_eq!(matched, Value::Bool(false));
}

/// str and sequence operators dispatch on the left operand's type.
#[test]
fn sequence_operators() {
    let mut rt = Runtime::new();
    let a = rt.new_str("foo");
    let b = rt.new_str("bar");
    let combined = rt.binary_op(BinaryOp::Add, a, b).unwrap();
    assert_eq!(rt.py_str(combined), "foobar");

    let l1 = rt.new_list(vec![Value::Int(1)]);
    let l2 = rt.new_list(vec![Value::Int(2)]);
    let combined = rt.binary_op(BinaryOp::Add, l1, l2).unwrap();
    assert_eq!(rt.py_repr(combined), "[1, 2]");

    // list += mutates in place.
    let before = l1;
    let result = rt.binary_op(BinaryOp::InplaceAdd, l1, l2).unwrap();
    assert_eq!(result, before, "+= returns the same list object");
    assert_eq!(rt.py_repr(l1), "[1, 2]");

    let s = rt.new_str("ab");
    let repeated = rt.binary_op(BinaryOp::Multiply, s, Value::Int(3)).unwrap();
    assert_eq!(rt.py_str(repeated), "ababab");
}

// =============================================================================
// 3. Truthiness
// =============================================================================

#[test]
fn is_true_follows_emptiness() {
    let mut rt = Runtime::new();
    assert!(!rt.is_true(Value::None));
    assert!(!rt.is_true(Value::Bool(false)));
    assert!(!rt.is_true(Value::Int(0)));
    assert!(rt.is_true(Value::Int(-1)));
    let empty = rt.new_list(vec![]);
    assert!(!rt.is_true(empty));
    let full = rt.new_list(vec![Value::None]);
    assert!(rt.is_true(full));
    let empty_str = rt.new_str("");
    assert!(!rt.is_true(empty_str));
}

// =============================================================================
// 4. Attribute protocol
// =============================================================================

/// load_method on an instance method yields [self, function]; load_attr
/// wraps the pair into a callable bound method.
#[test]
fn method_load_and_bind() {
    let mut rt = Runtime::new();
    let list = rt.new_list(vec![Value::Int(1)]);
    let append = rt.intern("append");

    let [self_slot, fun] = rt.load_method(list, append).unwrap();
    assert_eq!(self_slot, list, "instance methods bind the receiver");
    assert!(matches!(fun, Value::Builtin(Builtins::TypeMethod { .. })));

    // Raw method-call shortcut: [arg(0), self, fun].
    let result = rt.call_method_n(1, &[Value::Int(2), self_slot, fun]).unwrap();
    assert_eq!(result, Value::None);
    assert_eq!(rt.py_repr(list), "[1, 2]");

    // Bound method object via load_attr.
    let bound = rt.load_attr(list, append).unwrap();
    rt.call_function_1(bound, Value::Int(3)).unwrap();
    assert_eq!(rt.py_repr(list), "[1, 2, 3]");
}

/// A plain attribute miss raises AttributeError with the object message.
#[test]
fn missing_attribute_raises() {
    let mut rt = Runtime::new();
    let list = rt.new_list(vec![]);
    let q = rt.intern("no_such");
    let err = rt.load_attr(list, q).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::AttributeError);
    assert_eq!(err.message(), Some("'list' object has no attribute 'no_such'"));
}

/// dict.fromkeys resolves as a class-kind method: the bound self is the
/// type object, and the call builds a fresh dict.
#[test]
fn class_kind_method_binds_the_type() {
    let mut rt = Runtime::new();
    let d = rt.new_dict();
    let fromkeys = rt.intern("fromkeys");
    let [self_slot, fun] = rt.load_method(d, fromkeys).unwrap();
    assert_eq!(self_slot, Value::Builtin(Builtins::Type(Type::Dict)));

    let keys = rt.new_list(vec![Value::Int(1), Value::Int(2)]);
    let result = rt.call_method_n(1, &[keys, self_slot, fun]).unwrap();
    assert_eq!(rt.py_repr(result), "{1: None, 2: None}");
}

/// store_attr works for instances and fails for attribute-less types.
#[test]
fn store_attr_dispatch() {
    let mut rt = Runtime::new();
    let q = rt.intern("attr");
    let err = rt.store_attr(Value::Int(1), q, Value::None).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::AttributeError);
}

// =============================================================================
// 5. Subscription
// =============================================================================

#[test]
fn store_subscr_list_and_dict() {
    let mut rt = Runtime::new();
    let list = rt.new_list(vec![Value::Int(1), Value::Int(2)]);
    rt.store_subscr(list, Value::Int(1), Value::Int(9)).unwrap();
    assert_eq!(rt.py_repr(list), "[1, 9]");
    rt.store_subscr(list, Value::Int(-2), Value::Int(8)).unwrap();
    assert_eq!(rt.py_repr(list), "[8, 9]");

    let err = rt.store_subscr(list, Value::Int(5), Value::None).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::IndexError);

    let dict = rt.new_dict();
    let key = rt.new_str("k");
    rt.store_subscr(dict, key, Value::Int(3)).unwrap();
    assert_eq!(rt.py_repr(dict), "{'k': 3}");

    let err = rt.store_subscr(Value::Int(0), Value::Int(0), Value::None).unwrap_err();
    assert_eq!(err.message(), Some("'int' object does not support item assignment"));
}

// =============================================================================
// 6. Iterator protocol
// =============================================================================

/// Collecting via iternext until the stop marker yields the elements in
/// order; the user-visible next() converts the marker to StopIteration.
#[test]
fn iterator_round_trip_and_exhaustion() {
    let mut rt = Runtime::new();
    let list = rt.new_list(vec![Value::Int(1), Value::Int(2)]);
    let it = rt.getiter(list).unwrap();

    assert_eq!(rt.iternext(it).unwrap(), Value::Int(1));
    assert_eq!(rt.iternext(it).unwrap(), Value::Int(2));
    assert_eq!(rt.iternext(it).unwrap(), Value::StopIteration);

    // next() raises once the marker appears.
    let it = rt.getiter(list).unwrap();
    assert_eq!(call_builtin(&mut rt, "next", &[it]).unwrap(), Value::Int(1));
    assert_eq!(call_builtin(&mut rt, "next", &[it]).unwrap(), Value::Int(2));
    let err = call_builtin(&mut rt, "next", &[it]).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::StopIteration);
}

#[test]
fn non_iterable_raises_type_error() {
    let mut rt = Runtime::new();
    let err = rt.getiter(Value::Int(3)).unwrap_err();
    assert_eq!(err.message(), Some("'int' object is not iterable"));
}

/// The __next__ attribute is synthesised from the iternext capability as a
/// bound builtin next.
#[test]
fn dunder_next_synthesis() {
    let mut rt = Runtime::new();
    let list = rt.new_list(vec![Value::Int(7)]);
    let it = rt.getiter(list).unwrap();
    let dunder_next = rt.intern("__next__");
    let [self_slot, fun] = rt.load_method(it, dunder_next).unwrap();
    assert_eq!(self_slot, it);
    assert_eq!(fun, Value::Builtin(Builtins::Function(BuiltinFn::Next)));

    let result = rt.call_method_n(0, &[self_slot, fun]).unwrap();
    assert_eq!(result, Value::Int(7));
}

#[test]
fn string_and_range_iteration() {
    let mut rt = Runtime::new();
    let s = rt.new_str("ab");
    let it = rt.getiter(s).unwrap();
    let a = rt.iternext(it).unwrap();
    assert_eq!(rt.py_str(a), "a");
    let b = rt.iternext(it).unwrap();
    assert_eq!(rt.py_str(b), "b");
    assert_eq!(rt.iternext(it).unwrap(), Value::StopIteration);

    let r = call_builtin(&mut rt, "range", &[Value::Int(3)]).unwrap();
    let it = rt.getiter(r).unwrap();
    assert_eq!(rt.iternext(it).unwrap(), Value::Int(0));
    assert_eq!(rt.iternext(it).unwrap(), Value::Int(1));
    assert_eq!(rt.iternext(it).unwrap(), Value::Int(2));
    assert_eq!(rt.iternext(it).unwrap(), Value::StopIteration);
}

// =============================================================================
// 7. Containers and unpacking
// =============================================================================

/// build_tuple / build_list consume reverse-ordered input and present
/// source order.
#[test]
fn container_construction_reverses_stack_order() {
    let mut rt = Runtime::new();
    // Source order (1, 2, 3) arrives as [3, 2, 1].
    let t = rt.build_tuple(&[Value::Int(3), Value::Int(2), Value::Int(1)]);
    assert_eq!(rt.py_repr(t), "(1, 2, 3)");
    let l = rt.build_list(&[Value::Int(3), Value::Int(2), Value::Int(1)]);
    assert_eq!(rt.py_repr(l), "[1, 2, 3]");
}

#[test]
fn map_and_set_construction() {
    let mut rt = Runtime::new();
    let m = rt.build_map(2);
    let k = rt.new_str("a");
    rt.store_map(m, k, Value::Int(1)).unwrap();
    assert_eq!(rt.py_repr(m), "{'a': 1}");

    let s = rt.build_set(&[Value::Int(1), Value::Int(2), Value::Int(1)]).unwrap();
    assert_eq!(rt.py_repr(s), "{1, 2}");
    rt.store_set(s, Value::Int(3)).unwrap();
    assert_eq!(rt.py_repr(s), "{1, 2, 3}");
}

#[test]
fn unpack_sequence_mismatches() {
    let mut rt = Runtime::new();
    let t = rt.new_tuple(vec![Value::Int(1), Value::Int(2)]);

    let err = rt.unpack_sequence(t, 3).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::ValueError);
    assert_eq!(err.message(), Some("need more than 2 values to unpack"));

    let err = rt.unpack_sequence(t, 1).unwrap_err();
    assert_eq!(err.message(), Some("too many values to unpack (expected 1)"));

    assert_eq!(rt.unpack_sequence(t, 2).unwrap(), vec![Value::Int(1), Value::Int(2)]);
}

/// Non-sequence iterables unpack through the iterator protocol.
#[test]
fn unpack_generic_iterable() {
    let mut rt = Runtime::new();
    let r = call_builtin(&mut rt, "range", &[Value::Int(3)]).unwrap();
    assert_eq!(
        rt.unpack_sequence(r, 3).unwrap(),
        vec![Value::Int(0), Value::Int(1), Value::Int(2)]
    );
    let r = call_builtin(&mut rt, "range", &[Value::Int(3)]).unwrap();
    let err = rt.unpack_sequence(r, 2).unwrap_err();
    assert_eq!(err.message(), Some("too many values to unpack (expected 2)"));
}

// =============================================================================
// 8. Builtins
// =============================================================================

#[test]
fn abs_invariants() {
    let mut rt = Runtime::new();
    assert_eq!(call_builtin(&mut rt, "abs", &[Value::Int(-5)]).unwrap(), Value::Int(5));
    assert_eq!(call_builtin(&mut rt, "abs", &[Value::Int(5)]).unwrap(), Value::Int(5));
    // abs(abs(x)) == abs(x)
    let once = call_builtin(&mut rt, "abs", &[Value::Int(-9)]).unwrap();
    let twice = call_builtin(&mut rt, "abs", &[once]).unwrap();
    assert_eq!(once, twice);
    // abs(i64::MIN) promotes.
    let v = call_builtin(&mut rt, "abs", &[Value::Int(i64::MIN)]).unwrap();
    assert_eq!(rt.py_repr(v), "9223372036854775808");
}

#[test]
fn sum_uses_binary_add() {
    let mut rt = Runtime::new();
    let empty = rt.new_list(vec![]);
    assert_eq!(call_builtin(&mut rt, "sum", &[empty]).unwrap(), Value::Int(0));

    let items = rt.new_list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    // Reverse order: start is the last argument.
    assert_eq!(
        call_builtin(&mut rt, "sum", &[Value::Int(10), items]).unwrap(),
        Value::Int(16)
    );
}

#[test]
fn min_max_contracts() {
    let mut rt = Runtime::new();
    let items = rt.new_list(vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
    assert_eq!(call_builtin(&mut rt, "max", &[items]).unwrap(), Value::Int(3));
    assert_eq!(call_builtin(&mut rt, "min", &[items]).unwrap(), Value::Int(1));

    // Multi-arg form; ties go to the earlier argument.
    let first = rt.new_list(vec![Value::Int(1)]);
    let second = rt.new_list(vec![Value::Int(1)]);
    // Reverse order: (first, second) arrives as [second, first].
    let winner = call_builtin(&mut rt, "max", &[second, first]).unwrap();
    assert_eq!(winner, first, "equal values keep the earlier argument");

    let empty = rt.new_list(vec![]);
    let err = call_builtin(&mut rt, "max", &[empty]).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::ValueError);
    assert_eq!(err.message(), Some("max() arg is an empty sequence"));
}

#[test]
fn chr_and_ord_boundaries() {
    let mut rt = Runtime::new();
    let a = call_builtin(&mut rt, "chr", &[Value::Int(97)]).unwrap();
    assert_eq!(rt.py_str(a), "a");
    let top = call_builtin(&mut rt, "chr", &[Value::Int(0x10_FFFF)]).unwrap();
    assert_eq!(rt.py_str(top), "\u{10FFFF}");
    let err = call_builtin(&mut rt, "chr", &[Value::Int(0x11_0000)]).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::ValueError);
    assert_eq!(err.message(), Some("chr() arg not in range(0x110000)"));

    let a = rt.new_str("a");
    assert_eq!(call_builtin(&mut rt, "ord", &[a]).unwrap(), Value::Int(97));
    let ab = rt.new_str("ab");
    let err = call_builtin(&mut rt, "ord", &[ab]).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
}

#[test]
fn pow_and_divmod() {
    let mut rt = Runtime::new();
    // Reverse order: pow(2, 10, 1000) arrives as [1000, 10, 2].
    assert_eq!(
        call_builtin(&mut rt, "pow", &[Value::Int(1000), Value::Int(10), Value::Int(2)]).unwrap(),
        Value::Int(24)
    );
    assert_eq!(
        call_builtin(&mut rt, "pow", &[Value::Int(10), Value::Int(2)]).unwrap(),
        Value::Int(1024)
    );

    let pair = call_builtin(&mut rt, "divmod", &[Value::Int(3), Value::Int(7)]).unwrap();
    assert_eq!(rt.py_repr(pair), "(2, 1)");

    let err = call_builtin(&mut rt, "divmod", &[Value::None, Value::Int(7)]).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
}

#[test]
fn len_and_callable() {
    let mut rt = Runtime::new();
    let s = rt.new_str("héllo");
    assert_eq!(call_builtin(&mut rt, "len", &[s]).unwrap(), Value::Int(5));
    let err = call_builtin(&mut rt, "len", &[Value::Int(1)]).unwrap_err();
    assert_eq!(err.message(), Some("object of type 'int' has no len()"));

    let q = rt.intern("print");
    let print = rt.load_name(q).unwrap();
    assert_eq!(call_builtin(&mut rt, "callable", &[print]).unwrap(), Value::Bool(true));
    assert_eq!(
        call_builtin(&mut rt, "callable", &[Value::Int(1)]).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn isinstance_and_issubclass() {
    let mut rt = Runtime::new();
    let int_q = rt.intern("int");
    let int_ty = rt.load_name(int_q).unwrap();
    let bool_q = rt.intern("bool");
    let bool_ty = rt.load_name(bool_q).unwrap();

    // Reverse order: isinstance(obj, classinfo) arrives as [classinfo, obj].
    assert_eq!(
        call_builtin(&mut rt, "isinstance", &[int_ty, Value::Int(3)]).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        call_builtin(&mut rt, "isinstance", &[int_ty, Value::Bool(true)]).unwrap(),
        Value::Bool(true),
        "bool is a subclass of int"
    );
    assert_eq!(
        call_builtin(&mut rt, "issubclass", &[int_ty, bool_ty]).unwrap(),
        Value::Bool(true)
    );
    let err = call_builtin(&mut rt, "issubclass", &[int_ty, Value::Int(1)]).unwrap_err();
    assert_eq!(err.message(), Some("issubclass() arg 1 must be a class"));
}

#[test]
fn hash_is_truncated_small_int() {
    let mut rt = Runtime::new();
    assert_eq!(call_builtin(&mut rt, "hash", &[Value::Int(42)]).unwrap(), Value::Int(42));
    let s = rt.new_str("hello");
    let h = call_builtin(&mut rt, "hash", &[s]).unwrap();
    let Value::Int(h) = h else { panic!("hash must return an int") };
    assert!(h >= 0 && h < (1 << 61), "hash is masked to the small-int range");

    let l = rt.new_list(vec![]);
    let err = call_builtin(&mut rt, "hash", &[l]).unwrap_err();
    assert_eq!(err.message(), Some("unhashable type: 'list'"));
}

#[test]
fn range_rejects_zero_step() {
    let mut rt = Runtime::new();
    let err = call_builtin(&mut rt, "range", &[Value::Int(0), Value::Int(2), Value::Int(1)]).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::ValueError);
    assert_eq!(err.message(), Some("range() arg 3 must not be zero"));
}

/// print writes raw strings, space separators, and a trailing newline
/// through the installed writer; __repl_print__ is a no-op for None.
#[test]
fn print_output() {
    let mut rt = Runtime::new();
    let collector = CollectStringPrint::new();
    rt.set_print_writer(Box::new(collector.clone()));

    let s = rt.new_str("a");
    let inner = rt.new_str("x");
    let l = rt.new_list(vec![Value::Int(1), inner]);
    // print("a", 1, [1, 'x']) in reverse order.
    call_builtin(&mut rt, "print", &[l, Value::Int(1), s]).unwrap();
    assert_eq!(collector.output(), "a 1 [1, 'x']\n");

    call_builtin(&mut rt, "__repl_print__", &[Value::None]).unwrap();
    assert_eq!(collector.output(), "a 1 [1, 'x']\n", "None prints nothing");

    let v = rt.new_str("hi");
    call_builtin(&mut rt, "__repl_print__", &[v]).unwrap();
    assert_eq!(collector.output(), "a 1 [1, 'x']\n'hi'\n", "repl print uses repr");
}

#[test]
fn type_constructors() {
    let mut rt = Runtime::new();
    assert_eq!(call_builtin(&mut rt, "bool", &[Value::Int(2)]).unwrap(), Value::Bool(true));
    assert_eq!(call_builtin(&mut rt, "int", &[]).unwrap(), Value::Int(0));
    let s = rt.new_str("123");
    assert_eq!(call_builtin(&mut rt, "int", &[s]).unwrap(), Value::Int(123));

    let t = rt.new_tuple(vec![Value::Int(1), Value::Int(2)]);
    let l = call_builtin(&mut rt, "list", &[t]).unwrap();
    assert_eq!(rt.py_repr(l), "[1, 2]");

    // type(x) returns the type object.
    let ty = call_builtin(&mut rt, "type", &[Value::Int(1)]).unwrap();
    assert_eq!(ty, Value::Builtin(Builtins::Type(Type::Int)));
}

// =============================================================================
// 9. Cells
// =============================================================================

#[test]
fn cell_get_set_round_trip() {
    let mut rt = Runtime::new();
    let cell = rt.new_cell(Value::None);
    assert_eq!(rt.get_cell(cell), Value::None);
    rt.set_cell(cell, Value::Int(9));
    assert_eq!(rt.get_cell(cell), Value::Int(9));
}

// =============================================================================
// 10. Calls and errors
// =============================================================================

#[test]
fn non_callables_raise_type_error() {
    let mut rt = Runtime::new();
    let err = rt.call_function_0(Value::Int(1)).unwrap_err();
    assert_eq!(err.message(), Some("'int' object is not callable"));

    let s = rt.new_str("x");
    let err = rt.call_function_0(s).unwrap_err();
    assert_eq!(err.message(), Some("'str' object is not callable"));
}

/// type_of(v) is total: every constructible value has a type.
#[test]
fn every_value_has_a_type() {
    let mut rt = Runtime::new();
    let values = vec![
        Value::None,
        Value::Ellipsis,
        Value::Bool(true),
        Value::Int(3),
        rt.new_str("s"),
        rt.new_list(vec![]),
        rt.new_tuple(vec![]),
        rt.new_dict(),
        rt.new_cell(Value::None),
    ];
    for v in values {
        // py_type panics on internal markers only; every real value
        // classifies.
        let _ = v.py_type(rt.heap());
    }
}

// =============================================================================
// 11. Constants and tracing
// =============================================================================

#[test]
fn const_string_loading() {
    let mut rt = Runtime::new();
    let q = rt.intern("hello_world");
    assert_eq!(rt.load_const_str(q), Value::InternStr(q));
}

#[cfg(feature = "float")]
#[test]
fn const_decimal_loading() {
    let mut rt = Runtime::new();
    let t = rt.intern("2.5");
    assert_eq!(rt.load_const_dec(t).unwrap(), Value::Float(2.5));

    let imag = rt.intern("3j");
    let c = rt.load_const_dec(imag).unwrap();
    assert_eq!(rt.py_repr(c), "3.0j");

    let bad = rt.intern("2.5.1");
    let err = rt.load_const_dec(bad).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::SyntaxError);
    assert_eq!(err.message(), Some("invalid syntax for number"));
}

/// Dispatch events flow through an installed tracer.
#[test]
fn tracer_records_dispatch_events() {
    use pyrite::tracer::RecordingTracer;

    let mut rt = Runtime::new();
    let tracer = RecordingTracer::new();
    rt.set_tracer(Box::new(tracer.clone()));

    let x = rt.intern("x");
    rt.store_name(x, Value::Int(1));
    rt.load_name(x).unwrap();
    rt.binary_op(BinaryOp::Add, Value::Int(1), Value::Int(2)).unwrap();

    let events = tracer.events();
    assert!(events.iter().any(|e| e.contains("StoreName")), "events: {events:?}");
    assert!(events.iter().any(|e| e.contains("LoadName")), "events: {events:?}");
    assert!(events.iter().any(|e| e.contains("BinaryOp")), "events: {events:?}");
}

// =============================================================================
// 12. Imports
// =============================================================================

#[test]
fn import_without_hook_raises_import_error() {
    let mut rt = Runtime::new();
    let name = rt.intern("os");
    let err = rt.import_name(name, Value::None, Value::Int(0)).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::ImportError);
    assert_eq!(err.message(), Some("no module named 'os'"));
}

/// import_from converts AttributeError into ImportError; other kinds pass
/// through untouched.
#[test]
fn import_from_converts_attribute_error() {
    let mut rt = Runtime::new();
    let name = rt.intern("thing");
    let module = rt.new_list(vec![]);
    let err = rt.import_from(module, name).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::ImportError);
    assert_eq!(err.message(), Some("cannot import name 'thing'"));
}
