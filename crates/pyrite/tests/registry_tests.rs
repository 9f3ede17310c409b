//! Tests for the code registry, the function factory, host execution
//! hooks, closures, generators, class building, and the fun-table ABI.

use pyrite::{
    BuiltinFn, Builtins, CLASS_BODY_SENTINEL, ExcType, GeneratorState, HeapData, RunResult, Runtime, Type, Value,
    VmCall,
    fun_table::{FUN_TABLE, RuntimeEntry, RuntimeFun},
};

// =============================================================================
// Native code units
// =============================================================================

/// Native unit: returns the sum of its two arguments plus one.
fn native_add_one(rt: &mut Runtime, args: &[Value]) -> RunResult<Value> {
    let sum = rt.binary_op(pyrite::BinaryOp::Add, args[0], args[1])?;
    rt.binary_op(pyrite::BinaryOp::Add, sum, Value::Int(1))
}

/// Registering a native unit yields a callable function value with the
/// declared arity.
#[test]
fn native_function_round_trip() {
    let mut rt = Runtime::new();
    let id = rt.registry_mut().get_unique_code_id();
    rt.registry_mut().assign_native_code(id, native_add_one, 16, 2);

    let f = rt.make_function_from_id(id);
    assert!(matches!(f, Value::Ref(_)), "registered code produces a callable");
    assert_eq!(rt.call_function_2(f, Value::Int(2), Value::Int(3)).unwrap(), Value::Int(6));

    // Arity mismatch surfaces as TypeError.
    let err = rt.call_function_1(f, Value::Int(2)).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::TypeError);
}

/// An id that was never assigned produces None, matching "slot 0 means no
/// code".
#[test]
fn unassigned_id_produces_none() {
    let mut rt = Runtime::new();
    let id = rt.registry_mut().get_unique_code_id();
    assert_eq!(rt.make_function_from_id(id), Value::None);
}

/// Inline-assembly units share the native calling contract.
#[test]
fn inline_asm_function_is_callable() {
    fn asm_stub(_rt: &mut Runtime, args: &[Value]) -> RunResult<Value> {
        Ok(args[0])
    }
    let mut rt = Runtime::new();
    let id = rt.registry_mut().get_unique_code_id();
    rt.registry_mut().assign_inline_asm_code(id, asm_stub, 8, 1);
    let f = rt.make_function_from_id(id);
    assert_eq!(rt.call_function_1(f, Value::Int(5)).unwrap(), Value::Int(5));
}

// =============================================================================
// Bytecode units and the executor hook
// =============================================================================

/// Fake executor: returns a tuple of the positional arguments followed by
/// (name, value) for each keyword argument, so tests can observe exactly
/// what the VM would receive.
fn recording_exec(rt: &mut Runtime, call: VmCall) -> RunResult<Value> {
    let mut items = call.args.clone();
    for &(key, value) in &call.kwargs {
        items.push(Value::InternStr(key));
        items.push(value);
    }
    items.push(Value::Int(call.cells.len() as i64));
    Ok(rt.new_tuple(items))
}

fn make_bytecode_fn(rt: &mut Runtime, n_args: usize, is_generator: bool) -> Value {
    let id = rt.registry_mut().get_unique_code_id();
    rt.registry_mut()
        .assign_byte_code(id, vec![0x42], n_args, 2, 4, is_generator);
    rt.make_function_from_id(id)
}

/// Keyword calls deliver `a = pos0, k = kv` to the VM for
/// `call_n_kw(f, 1, 1, [kv, kk, pos0])`.
#[test]
fn call_with_keywords_reaches_the_vm() {
    let mut rt = Runtime::new();
    rt.set_bytecode_executor(recording_exec);
    let f = make_bytecode_fn(&mut rt, 2, false);

    let kk = rt.new_str("k");
    let kv = Value::Int(99);
    let pos0 = Value::Int(7);
    let result = rt.call_function_n_kw(f, 1, 1, &[kv, kk, pos0]).unwrap();

    let k_interned = rt.intern("k");
    let Value::Ref(id) = result else { panic!("executor returns a tuple") };
    let HeapData::Tuple(t) = rt.heap().get(id) else {
        panic!("executor returns a tuple")
    };
    assert_eq!(
        t.items(),
        &[pos0, Value::InternStr(k_interned), kv, Value::Int(0)],
        "positional first, then keyword pairs, then cell count"
    );
}

/// Bytecode calls pass natural-order positional arguments.
#[test]
fn bytecode_call_natural_order() {
    let mut rt = Runtime::new();
    rt.set_bytecode_executor(recording_exec);
    let f = make_bytecode_fn(&mut rt, 2, false);

    // Source order f(1, 2) arrives reversed as [2, 1].
    let result = rt.call_function_n(f, &[Value::Int(2), Value::Int(1)]).unwrap();
    let Value::Ref(id) = result else { panic!() };
    let HeapData::Tuple(t) = rt.heap().get(id) else { panic!() };
    assert_eq!(t.items(), &[Value::Int(1), Value::Int(2), Value::Int(0)]);
}

// =============================================================================
// Closures
// =============================================================================

/// make_closure_from_id carries the captured cells into every call.
#[test]
fn closure_carries_cells() {
    let mut rt = Runtime::new();
    rt.set_bytecode_executor(recording_exec);

    let id = rt.registry_mut().get_unique_code_id();
    rt.registry_mut().assign_byte_code(id, vec![0x01], 0, 1, 1, false);

    let cell_a = rt.new_cell(Value::Int(1));
    let cell_b = rt.new_cell(Value::Int(2));
    let cells = rt.new_tuple(vec![cell_a, cell_b]);
    let closure = rt.make_closure_from_id(id, cells);

    let result = rt.call_function_0(closure).unwrap();
    let Value::Ref(tid) = result else { panic!() };
    let HeapData::Tuple(t) = rt.heap().get(tid) else { panic!() };
    assert_eq!(t.items(), &[Value::Int(2)], "executor saw both captured cells");
}

// =============================================================================
// Generators
// =============================================================================

/// Resume hook standing in for the VM: yields 1, then 2, then finishes.
fn counting_resume(rt: &mut Runtime, generator: pyrite::HeapId) -> RunResult<Value> {
    let next_ip = match rt.heap().get(generator) {
        HeapData::Generator(g) => match &g.state {
            GeneratorState::Created => 1,
            GeneratorState::Suspended { ip, .. } => ip + 1,
            GeneratorState::Done => return Ok(Value::StopIteration),
        },
        _ => panic!("resume hook called on a non-generator"),
    };
    let HeapData::Generator(g) = rt.heap_mut().get_mut(generator) else {
        unreachable!()
    };
    if next_ip > 2 {
        g.state = GeneratorState::Done;
        return Ok(Value::StopIteration);
    }
    g.state = GeneratorState::Suspended {
        ip: next_ip,
        frame: vec![],
    };
    Ok(Value::Int(i64::from(next_ip)))
}

/// A generator-flagged code unit becomes a factory: calling it returns a
/// generator object that drives the iterator protocol through the resume
/// hook.
#[test]
fn generator_factory_and_iteration() {
    let mut rt = Runtime::new();
    rt.set_generator_resume(counting_resume);
    let f = make_bytecode_fn(&mut rt, 0, true);

    let generator = rt.call_function_0(f).unwrap();
    let Value::Ref(gid) = generator else {
        panic!("calling a generator factory returns a generator object")
    };
    assert!(matches!(rt.heap().get(gid), HeapData::Generator(_)));

    // Generators are their own iterators.
    let it = rt.getiter(generator).unwrap();
    assert_eq!(it, generator);

    assert_eq!(rt.iternext(it).unwrap(), Value::Int(1));
    assert_eq!(rt.iternext(it).unwrap(), Value::Int(2));
    assert_eq!(rt.iternext(it).unwrap(), Value::StopIteration);
    // Exhausted generators keep reporting the marker without re-entering
    // the VM.
    assert_eq!(rt.iternext(it).unwrap(), Value::StopIteration);
}

// =============================================================================
// Class construction
// =============================================================================

/// Class body: stores foo = 1 and a method m into the class namespace.
fn class_body(rt: &mut Runtime, args: &[Value]) -> RunResult<Value> {
    assert_eq!(args[0], CLASS_BODY_SENTINEL, "body receives the sentinel");
    let foo = rt.intern("foo");
    rt.store_name(foo, Value::Int(1));
    let m = rt.intern("m");
    let m_impl = rt.intern("m_impl");
    let method = rt.load_global(m_impl)?;
    rt.store_name(m, method);
    Ok(Value::None)
}

/// Instance method: returns the tuple (self, x).
fn method_impl(rt: &mut Runtime, args: &[Value]) -> RunResult<Value> {
    Ok(rt.new_tuple(vec![args[0], args[1]]))
}

fn build_test_class(rt: &mut Runtime) -> Value {
    // Register the body and the method as native units.
    let body_id = rt.registry_mut().get_unique_code_id();
    rt.registry_mut().assign_native_code(body_id, class_body, 0, 1);
    let body = rt.make_function_from_id(body_id);

    let m_id = rt.registry_mut().get_unique_code_id();
    rt.registry_mut().assign_native_code(m_id, method_impl, 0, 2);
    let method = rt.make_function_from_id(m_id);
    let m_impl = rt.intern("m_impl");
    rt.store_global(m_impl, method);

    let build_class = rt.load_build_class().unwrap();
    let name = rt.new_str("C");
    // Reverse order: __build_class__(body, "C") arrives as ["C", body].
    rt.call_function_n(build_class, &[name, body]).unwrap()
}

/// __build_class__ runs the body in a fresh namespace, restores locals,
/// and produces a class whose dict holds the body's stores.
#[test]
fn build_class_produces_a_class() {
    let mut rt = Runtime::new();
    let saved_locals = rt.locals_get();
    let class = build_test_class(&mut rt);

    assert_eq!(rt.locals_get(), saved_locals, "locals restored after the body");
    assert_eq!(class.py_type(rt.heap()), Type::Type);

    let foo = rt.intern("foo");
    assert_eq!(rt.load_attr(class, foo).unwrap(), Value::Int(1));

    // type(C) is type.
    let type_q = rt.intern("type");
    let type_builtin = rt.load_name(type_q).unwrap();
    let ty = rt.call_function_1(type_builtin, class).unwrap();
    assert_eq!(ty, Value::Builtin(Builtins::Type(Type::Type)));
}

/// Instances bind class functions as methods; calling the bound method
/// passes the instance as the leading argument.
#[test]
fn instance_method_binding() {
    let mut rt = Runtime::new();
    let class = build_test_class(&mut rt);

    let instance = rt.call_function_0(class).unwrap();
    let instance_ty = instance.py_type(rt.heap());
    assert_eq!(instance_ty, Type::Instance);

    let m = rt.intern("m");
    let [self_slot, fun] = rt.load_method(instance, m).unwrap();
    assert_eq!(self_slot, instance);

    // call_method_n layout: [arg(0), self, fun].
    let result = rt.call_method_n(1, &[Value::Int(5), self_slot, fun]).unwrap();
    let Value::Ref(tid) = result else { panic!() };
    let HeapData::Tuple(t) = rt.heap().get(tid) else { panic!() };
    assert_eq!(t.items(), &[instance, Value::Int(5)], "m(self, x) received the instance");

    // The bound-method object from load_attr behaves identically.
    let bound = rt.load_attr(instance, m).unwrap();
    let result = rt.call_function_1(bound, Value::Int(6)).unwrap();
    let Value::Ref(tid) = result else { panic!() };
    let HeapData::Tuple(t) = rt.heap().get(tid) else { panic!() };
    assert_eq!(t.items(), &[instance, Value::Int(6)]);
}

/// The body's returned cell receives the finished class.
#[test]
fn class_cell_receives_the_class() {
    fn body_with_cell(rt: &mut Runtime, _args: &[Value]) -> RunResult<Value> {
        let cell_name = rt.intern("the_cell");
        rt.load_global(cell_name)
    }

    let mut rt = Runtime::new();
    let cell = rt.new_cell(Value::None);
    let cell_name = rt.intern("the_cell");
    rt.store_global(cell_name, cell);

    let body_id = rt.registry_mut().get_unique_code_id();
    rt.registry_mut().assign_native_code(body_id, body_with_cell, 0, 1);
    let body = rt.make_function_from_id(body_id);

    let build_class = rt.load_build_class().unwrap();
    let name = rt.new_str("D");
    let class = rt.call_function_n(build_class, &[name, body]).unwrap();

    assert_eq!(rt.get_cell(cell), class, "the class landed in the body's cell");
}

/// Attribute errors on type objects carry the detailed message.
#[test]
fn type_object_attribute_error_message() {
    let mut rt = Runtime::new();
    let class = build_test_class(&mut rt);
    let q = rt.intern("missing");
    let err = rt.load_attr(class, q).unwrap_err();
    assert_eq!(err.message(), Some("type object 'C' has no attribute 'missing'"));
}

/// Static and class method wrappers follow descriptor rules on lookup.
#[test]
fn static_and_class_method_wrappers() {
    fn plain(_rt: &mut Runtime, args: &[Value]) -> RunResult<Value> {
        Ok(args[0])
    }

    let mut rt = Runtime::new();
    let class = build_test_class(&mut rt);
    let instance = rt.call_function_0(class).unwrap();

    let f_id = rt.registry_mut().get_unique_code_id();
    rt.registry_mut().assign_native_code(f_id, plain, 0, 1);
    let f = rt.make_function_from_id(f_id);

    let wrapped = rt.heap_mut().allocate(HeapData::StaticMethod(f));
    let s = rt.intern("s");
    rt.store_attr(class, s, Value::Ref(wrapped)).unwrap();

    let [self_slot, fun] = rt.load_method(instance, s).unwrap();
    assert_eq!(self_slot, Value::Undefined, "static methods come back unbound");
    assert_eq!(fun, f);

    let wrapped = rt.heap_mut().allocate(HeapData::ClassMethod(f));
    let c = rt.intern("c");
    rt.store_attr(class, c, Value::Ref(wrapped)).unwrap();

    let [self_slot, fun] = rt.load_method(instance, c).unwrap();
    assert_eq!(self_slot, class, "class methods bind the class");
    assert_eq!(fun, f);
}

// =============================================================================
// Import hook
// =============================================================================

/// The import hook receives the CPython-shaped 5-tuple.
#[test]
fn import_hook_contract() {
    fn fake_import(rt: &mut Runtime, args: &[Value; 5]) -> RunResult<Value> {
        assert!(matches!(args[0], Value::InternStr(_)), "name is a string");
        assert_eq!(args[1], Value::None);
        assert_eq!(args[2], Value::None);
        assert_eq!(args[4], Value::Int(0), "level must be 0");
        Ok(rt.new_str("fake module"))
    }

    let mut rt = Runtime::new();
    rt.set_import_hook(fake_import);
    let name = rt.intern("os");
    let module = rt.import_name(name, Value::None, Value::Int(0)).unwrap();
    assert_eq!(rt.py_str(module), "fake module");

    let err = rt.import_name(name, Value::None, Value::Int(1)).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::ValueError);
}

// =============================================================================
// The fun-table ABI
// =============================================================================

/// Native code drives the runtime through the typed operation table.
#[test]
fn fun_table_operations() {
    let mut rt = Runtime::new();
    let x = rt.intern("x");

    // store_name through the table.
    let RuntimeEntry::QstrValue(store_name) = FUN_TABLE[RuntimeFun::StoreName as usize] else {
        panic!("StoreName entry has the qstr+value shape")
    };
    store_name(&mut rt, x, Value::Int(11)).unwrap();

    // load_name through the table.
    let RuntimeEntry::Qstr(load_name) = FUN_TABLE[RuntimeFun::LoadName as usize] else {
        panic!("LoadName entry has the qstr shape")
    };
    assert_eq!(load_name(&mut rt, x).unwrap(), Value::Int(11));

    // binary_op through the table.
    let RuntimeEntry::Binary(binary_op) = FUN_TABLE[RuntimeFun::BinaryOp as usize] else {
        panic!("BinaryOp entry has the binary shape")
    };
    assert_eq!(
        binary_op(&mut rt, pyrite::BinaryOp::Add, Value::Int(2), Value::Int(3)).unwrap(),
        Value::Int(5)
    );

    // build_list + getiter + iternext through the table.
    let RuntimeEntry::Slice(build_list) = FUN_TABLE[RuntimeFun::BuildList as usize] else {
        panic!()
    };
    let list = build_list(&mut rt, &[Value::Int(2), Value::Int(1)]).unwrap();
    let RuntimeEntry::Value(getiter) = FUN_TABLE[RuntimeFun::GetIter as usize] else {
        panic!()
    };
    let it = getiter(&mut rt, list).unwrap();
    let RuntimeEntry::Value(iternext) = FUN_TABLE[RuntimeFun::IterNext as usize] else {
        panic!()
    };
    assert_eq!(iternext(&mut rt, it).unwrap(), Value::Int(1));
    assert_eq!(iternext(&mut rt, it).unwrap(), Value::Int(2));
    assert_eq!(iternext(&mut rt, it).unwrap(), Value::StopIteration);

    // is_true returns a bool value.
    let RuntimeEntry::Value(is_true) = FUN_TABLE[RuntimeFun::IsTrue as usize] else {
        panic!()
    };
    assert_eq!(is_true(&mut rt, list).unwrap(), Value::Bool(true));
}

/// next() synthesised on iterators also works through a builtin value
/// fetched from the table-driven path.
#[test]
fn builtin_next_value_identity() {
    let mut rt = Runtime::new();
    let next_q = rt.intern("next");
    assert_eq!(
        rt.load_name(next_q).unwrap(),
        Value::Builtin(Builtins::Function(BuiltinFn::Next))
    );
}
