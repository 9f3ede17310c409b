//! The stable operation table for native and inline-assembly code.
//!
//! Registered code blobs call back into the runtime through this dense
//! table instead of linking against individual symbols. Each entry is a
//! typed function pointer; the index is the [`RuntimeFun`] discriminant.
//! The `void*` table of a C runtime becomes an enum of typed entries here,
//! so a blob that picks the wrong signature fails to compile instead of
//! corrupting the stack.

use strum::{EnumCount, FromRepr};

use crate::{
    exception::RunResult,
    intern::Qstr,
    ops::{BinaryOp, UnaryOp},
    registry::CodeId,
    runtime::Runtime,
    value::Value,
};

/// The public operations, in table order. The order is ABI: compiled blobs
/// index by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumCount)]
#[repr(usize)]
pub enum RuntimeFun {
    LoadConstDec,
    LoadConstStr,
    LoadName,
    LoadGlobal,
    LoadBuildClass,
    LoadAttr,
    LoadMethod,
    StoreName,
    StoreAttr,
    StoreSubscr,
    IsTrue,
    UnaryOp,
    BuildTuple,
    BuildList,
    ListAppend,
    BuildMap,
    StoreMap,
    BuildSet,
    StoreSet,
    MakeFunctionFromId,
    CallFunctionN,
    CallMethodN,
    BinaryOp,
    GetIter,
    IterNext,
}

/// A typed table entry. Operations that conceptually return nothing return
/// `Value::None` so every entry yields a value.
#[derive(Clone, Copy)]
pub enum RuntimeEntry {
    /// Operations taking an interned string: const loads, name loads.
    Qstr(fn(&mut Runtime, Qstr) -> RunResult<Value>),
    /// Operations with no operands.
    Nullary(fn(&mut Runtime) -> RunResult<Value>),
    /// Attribute load.
    ValueQstr(fn(&mut Runtime, Value, Qstr) -> RunResult<Value>),
    /// Method load, producing the two-slot `[self, function]` output.
    Method(fn(&mut Runtime, Value, Qstr) -> RunResult<[Value; 2]>),
    /// Name store.
    QstrValue(fn(&mut Runtime, Qstr, Value) -> RunResult<Value>),
    /// Attribute store.
    ValueQstrValue(fn(&mut Runtime, Value, Qstr, Value) -> RunResult<Value>),
    /// Three-value operations: subscript store, map store.
    ValueValueValue(fn(&mut Runtime, Value, Value, Value) -> RunResult<Value>),
    /// Single-value operations: truth test, iteration.
    Value(fn(&mut Runtime, Value) -> RunResult<Value>),
    Unary(fn(&mut Runtime, UnaryOp, Value) -> RunResult<Value>),
    Binary(fn(&mut Runtime, BinaryOp, Value, Value) -> RunResult<Value>),
    /// Container construction from a reverse-ordered item array.
    Slice(fn(&mut Runtime, &[Value]) -> RunResult<Value>),
    /// Two-value operations: list append, set store.
    ValueValue(fn(&mut Runtime, Value, Value) -> RunResult<Value>),
    /// Sized construction (map hint).
    Size(fn(&mut Runtime, usize) -> RunResult<Value>),
    /// Function factory.
    Code(fn(&mut Runtime, CodeId) -> RunResult<Value>),
    /// Function call with a reverse-ordered argument array.
    CallN(fn(&mut Runtime, Value, &[Value]) -> RunResult<Value>),
    /// Method call with the `[args…, self, fun]` array layout.
    MethodN(fn(&mut Runtime, usize, &[Value]) -> RunResult<Value>),
}

/// The operation table; `FUN_TABLE[f as usize]` is the entry for `f`.
pub static FUN_TABLE: [RuntimeEntry; RuntimeFun::COUNT] = [
    RuntimeEntry::Qstr(rt_load_const_dec),
    RuntimeEntry::Qstr(rt_load_const_str),
    RuntimeEntry::Qstr(rt_load_name),
    RuntimeEntry::Qstr(rt_load_global),
    RuntimeEntry::Nullary(rt_load_build_class),
    RuntimeEntry::ValueQstr(rt_load_attr),
    RuntimeEntry::Method(rt_load_method),
    RuntimeEntry::QstrValue(rt_store_name),
    RuntimeEntry::ValueQstrValue(rt_store_attr),
    RuntimeEntry::ValueValueValue(rt_store_subscr),
    RuntimeEntry::Value(rt_is_true),
    RuntimeEntry::Unary(rt_unary_op),
    RuntimeEntry::Slice(rt_build_tuple),
    RuntimeEntry::Slice(rt_build_list),
    RuntimeEntry::ValueValue(rt_list_append),
    RuntimeEntry::Size(rt_build_map),
    RuntimeEntry::ValueValueValue(rt_store_map),
    RuntimeEntry::Slice(rt_build_set),
    RuntimeEntry::ValueValue(rt_store_set),
    RuntimeEntry::Code(rt_make_function_from_id),
    RuntimeEntry::CallN(rt_call_function_n),
    RuntimeEntry::MethodN(rt_call_method_n),
    RuntimeEntry::Binary(rt_binary_op),
    RuntimeEntry::Value(rt_getiter),
    RuntimeEntry::Value(rt_iternext),
];

fn rt_load_const_dec(rt: &mut Runtime, text: Qstr) -> RunResult<Value> {
    rt.load_const_dec(text)
}

fn rt_load_const_str(rt: &mut Runtime, text: Qstr) -> RunResult<Value> {
    Ok(rt.load_const_str(text))
}

fn rt_load_name(rt: &mut Runtime, name: Qstr) -> RunResult<Value> {
    rt.load_name(name)
}

fn rt_load_global(rt: &mut Runtime, name: Qstr) -> RunResult<Value> {
    rt.load_global(name)
}

fn rt_load_build_class(rt: &mut Runtime) -> RunResult<Value> {
    rt.load_build_class()
}

fn rt_load_attr(rt: &mut Runtime, base: Value, attr: Qstr) -> RunResult<Value> {
    rt.load_attr(base, attr)
}

fn rt_load_method(rt: &mut Runtime, base: Value, attr: Qstr) -> RunResult<[Value; 2]> {
    rt.load_method(base, attr)
}

fn rt_store_name(rt: &mut Runtime, name: Qstr, value: Value) -> RunResult<Value> {
    rt.store_name(name, value);
    Ok(Value::None)
}

fn rt_store_attr(rt: &mut Runtime, base: Value, attr: Qstr, value: Value) -> RunResult<Value> {
    rt.store_attr(base, attr, value)?;
    Ok(Value::None)
}

fn rt_store_subscr(rt: &mut Runtime, base: Value, index: Value, value: Value) -> RunResult<Value> {
    rt.store_subscr(base, index, value)?;
    Ok(Value::None)
}

fn rt_is_true(rt: &mut Runtime, value: Value) -> RunResult<Value> {
    Ok(Value::Bool(rt.is_true(value)))
}

fn rt_unary_op(rt: &mut Runtime, op: UnaryOp, value: Value) -> RunResult<Value> {
    rt.unary_op(op, value)
}

fn rt_build_tuple(rt: &mut Runtime, items: &[Value]) -> RunResult<Value> {
    Ok(rt.build_tuple(items))
}

fn rt_build_list(rt: &mut Runtime, items: &[Value]) -> RunResult<Value> {
    Ok(rt.build_list(items))
}

fn rt_list_append(rt: &mut Runtime, list: Value, item: Value) -> RunResult<Value> {
    rt.list_append(list, item)
}

fn rt_build_map(rt: &mut Runtime, hint: usize) -> RunResult<Value> {
    Ok(rt.build_map(hint))
}

fn rt_store_map(rt: &mut Runtime, map: Value, key: Value, value: Value) -> RunResult<Value> {
    rt.store_map(map, key, value)
}

fn rt_build_set(rt: &mut Runtime, items: &[Value]) -> RunResult<Value> {
    rt.build_set(items)
}

fn rt_store_set(rt: &mut Runtime, set: Value, item: Value) -> RunResult<Value> {
    rt.store_set(set, item)
}

fn rt_make_function_from_id(rt: &mut Runtime, id: CodeId) -> RunResult<Value> {
    Ok(rt.make_function_from_id(id))
}

fn rt_call_function_n(rt: &mut Runtime, fun: Value, args: &[Value]) -> RunResult<Value> {
    rt.call_function_n(fun, args)
}

fn rt_call_method_n(rt: &mut Runtime, n_args: usize, args: &[Value]) -> RunResult<Value> {
    rt.call_method_n(n_args, args)
}

fn rt_binary_op(rt: &mut Runtime, op: BinaryOp, lhs: Value, rhs: Value) -> RunResult<Value> {
    rt.binary_op(op, lhs, rhs)
}

fn rt_getiter(rt: &mut Runtime, value: Value) -> RunResult<Value> {
    rt.getiter(value)
}

fn rt_iternext(rt: &mut Runtime, value: Value) -> RunResult<Value> {
    rt.iternext(value)
}
