//! The runtime core: environment, dispatch, and the compiler/VM-facing API.
//!
//! A [`Runtime`] owns the heap, the interner, the three namespaces, and the
//! code registry. The compiler front-end allocates code ids and registers
//! compiled units; the bytecode VM (and native/inline-asm blobs, via the
//! [`fun_table`](crate::fun_table)) drive execution through the operation
//! methods here.
//!
//! Argument arrays follow the VM stack contract: callers push arguments in
//! source order and pass the popped slice, so `args[0]` is the LAST source
//! argument. This reverse-order convention must be preserved; see the
//! individual `call_*` methods for the exact layouts.

use std::fmt::Write as _;

use crate::{
    args::ArgVec,
    builtins::{BuiltinFn, Builtins},
    exception::{ExcType, RunResult, SimpleException},
    function::{BytecodeExec, Closure, Function, FunctionKind, Generator, GeneratorResume, ImportHook, VmCall},
    heap::{Heap, HeapData, HeapId},
    intern::{Interns, Qstr, StaticStrings},
    io::{PrintWriter, StdPrint},
    namespace::{Env, Namespace},
    py_hash::{hash_int, hash_str_seed0},
    registry::{CodeId, CodeKind, CodeRegistry},
    tracer::{NoopTracer, TraceEvent, VmTracer},
    types::{BoundMethod, ClassObject, Dict, DictKey, Instance, Iter, List, MethodKind, Range, Set, Tuple},
    value::Value,
};

/// Sentinel passed as the single argument to a class body function.
///
/// The body compares its argument against this marker to decide whether to
/// produce a class cell; any returned cell becomes the class-cell target.
pub const CLASS_BODY_SENTINEL: Value = Value::Int(0xdead_beef);

/// The interpreter runtime state and dispatch surface.
///
/// Single-threaded by design: namespaces and the code registry are shared
/// mutable state with no locking, sound because exactly one logical
/// execution runs at a time. Generator resumption re-enters the host VM but
/// stays on the same thread.
pub struct Runtime {
    pub(crate) heap: Heap,
    pub(crate) interns: Interns,
    pub(crate) env: Env,
    pub(crate) registry: CodeRegistry,
    pub(crate) tracer: Box<dyn VmTracer>,
    print: Box<dyn PrintWriter>,
    bytecode_exec: Option<BytecodeExec>,
    generator_resume: Option<GeneratorResume>,
    import_hook: Option<ImportHook>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates a runtime with the module namespace established
    /// (`locals == globals`, `__name__ = "__main__"`) and the builtins
    /// namespace populated.
    #[must_use]
    pub fn new() -> Self {
        let mut heap = Heap::new();
        let module_ns = heap.allocate(HeapData::Namespace(Namespace::new()));
        let mut rt = Self {
            heap,
            interns: Interns::new(),
            env: Env::new(module_ns),
            registry: CodeRegistry::new(),
            tracer: Box::new(NoopTracer),
            print: Box::new(StdPrint),
            bytecode_exec: None,
            generator_resume: None,
            import_hook: None,
        };
        let dunder_name = Qstr::from(StaticStrings::DunderName);
        let main = Value::InternStr(Qstr::from(StaticStrings::DunderMain));
        rt.ns_mut(module_ns).insert(dunder_name, main);
        crate::builtins::bootstrap(&mut rt.interns, &mut rt.env.builtins);
        rt
    }

    // ======================================================================
    // Host configuration
    // ======================================================================

    pub fn set_tracer(&mut self, tracer: Box<dyn VmTracer>) {
        self.tracer = tracer;
    }

    pub fn set_print_writer(&mut self, print: Box<dyn PrintWriter>) {
        self.print = print;
    }

    /// Installs the host hook that executes bytecode units.
    pub fn set_bytecode_executor(&mut self, exec: BytecodeExec) {
        self.bytecode_exec = Some(exec);
    }

    /// Installs the host hook that resumes suspended generators.
    pub fn set_generator_resume(&mut self, resume: GeneratorResume) {
        self.generator_resume = Some(resume);
    }

    /// Installs the host `__import__` hook consumed by [`Runtime::import_name`].
    pub fn set_import_hook(&mut self, hook: ImportHook) {
        self.import_hook = Some(hook);
    }

    // ======================================================================
    // Access to owned state
    // ======================================================================

    #[must_use]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    #[must_use]
    pub fn registry(&self) -> &CodeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CodeRegistry {
        &mut self.registry
    }

    pub fn intern(&mut self, s: &str) -> Qstr {
        self.interns.intern(s)
    }

    #[must_use]
    pub fn interns(&self) -> &Interns {
        &self.interns
    }

    /// The builtins namespace. Mutation after init is permitted; the core
    /// itself performs none.
    pub fn builtins_mut(&mut self) -> &mut Namespace {
        &mut self.env.builtins
    }

    // ======================================================================
    // Value construction helpers
    // ======================================================================

    pub fn new_str(&mut self, s: &str) -> Value {
        self.heap.alloc_value(HeapData::Str(s.to_owned()))
    }

    pub fn new_list(&mut self, items: Vec<Value>) -> Value {
        self.heap.alloc_value(HeapData::List(List::new(items)))
    }

    pub fn new_tuple(&mut self, items: Vec<Value>) -> Value {
        self.heap.alloc_value(HeapData::Tuple(Tuple::new(items)))
    }

    pub fn new_dict(&mut self) -> Value {
        self.heap.alloc_value(HeapData::Dict(Dict::new()))
    }

    /// A fresh cell holding `value`; pass `Value::None` for the absent
    /// initial state.
    pub fn new_cell(&mut self, value: Value) -> Value {
        self.heap.alloc_value(HeapData::Cell(value))
    }

    // ======================================================================
    // Introspection
    // ======================================================================

    /// The printable type name used in error messages. Instances report
    /// their class name rather than the generic discriminator.
    #[must_use]
    pub fn type_name(&self, v: Value) -> String {
        match v {
            Value::Ref(id) => match self.heap.get(id) {
                HeapData::Instance(inst) => self.class_name(inst.class),
                other => other.py_type().to_string(),
            },
            other => other.py_type(&self.heap).to_string(),
        }
    }

    fn class_name(&self, class: HeapId) -> String {
        match self.heap.get(class) {
            HeapData::Class(c) => self.interns.get(c.name).to_owned(),
            _ => "type".to_owned(),
        }
    }

    /// The text of a string value (interned or heap), owned.
    #[must_use]
    pub(crate) fn str_value(&self, v: Value) -> Option<String> {
        match v {
            Value::InternStr(q) => Some(self.interns.get(q).to_owned()),
            Value::Ref(id) => match self.heap.get(id) {
                HeapData::Str(s) => Some(s.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Truthiness of a value (the `is_true` operation of the VM contract).
    #[must_use]
    pub fn is_true(&self, v: Value) -> bool {
        v.is_true(&self.heap)
    }

    // ======================================================================
    // Constants
    // ======================================================================

    /// Loads a decimal (float or imaginary) literal from its source text.
    ///
    /// Raises `SyntaxError` for malformed text, or when floats are disabled
    /// at build time.
    pub fn load_const_dec(&mut self, text: Qstr) -> RunResult<Value> {
        #[cfg(feature = "float")]
        {
            let s = self.interns.get(text);
            let (digits, imag) = match s.strip_suffix(['j', 'J']) {
                Some(rest) => (rest, true),
                None => (s, false),
            };
            let Ok(value) = digits.parse::<f64>() else {
                return Err(SimpleException::new_msg(
                    ExcType::SyntaxError,
                    "invalid syntax for number",
                ));
            };
            if imag {
                Ok(self.heap.alloc_value(HeapData::Complex(crate::types::Complex {
                    real: 0.0,
                    imag: value,
                })))
            } else {
                Ok(Value::Float(value))
            }
        }
        #[cfg(not(feature = "float"))]
        {
            let _ = text;
            Err(SimpleException::new_msg(
                ExcType::SyntaxError,
                "decimal numbers not supported",
            ))
        }
    }

    /// Loads a string constant: interned strings are immediate values.
    #[must_use]
    pub fn load_const_str(&mut self, text: Qstr) -> Value {
        Value::InternStr(text)
    }

    // ======================================================================
    // Name resolution (locals -> globals -> builtins)
    // ======================================================================

    fn ns(&self, id: HeapId) -> &Namespace {
        match self.heap.get(id) {
            HeapData::Namespace(ns) => ns,
            _ => panic!("namespace handle does not point at a namespace"),
        }
    }

    fn ns_mut(&mut self, id: HeapId) -> &mut Namespace {
        match self.heap.get_mut(id) {
            HeapData::Namespace(ns) => ns,
            _ => panic!("namespace handle does not point at a namespace"),
        }
    }

    /// Looks `name` up in locals, then globals, then builtins.
    pub fn load_name(&mut self, name: Qstr) -> RunResult<Value> {
        self.tracer.trace(TraceEvent::LoadName {
            name: self.interns.get(name),
        });
        if let Some(v) = self.ns(self.env.locals()).get(name) {
            return Ok(v);
        }
        self.lookup_global_chain(name)
    }

    /// Looks `name` up in globals, then builtins.
    pub fn load_global(&mut self, name: Qstr) -> RunResult<Value> {
        self.tracer.trace(TraceEvent::LoadName {
            name: self.interns.get(name),
        });
        self.lookup_global_chain(name)
    }

    fn lookup_global_chain(&self, name: Qstr) -> RunResult<Value> {
        if let Some(v) = self.ns(self.env.globals()).get(name) {
            return Ok(v);
        }
        if let Some(v) = self.env.builtins.get(name) {
            return Ok(v);
        }
        Err(ExcType::name_error(self.interns.get(name)))
    }

    /// Inserts or overwrites `name` in locals.
    pub fn store_name(&mut self, name: Qstr, value: Value) {
        self.tracer.trace(TraceEvent::StoreName {
            name: self.interns.get(name),
        });
        let locals = self.env.locals();
        self.ns_mut(locals).insert(name, value);
    }

    /// Inserts or overwrites `name` in globals.
    pub fn store_global(&mut self, name: Qstr, value: Value) {
        let globals = self.env.globals();
        self.ns_mut(globals).insert(name, value);
    }

    /// Convenience lookup of the class builder in builtins.
    pub fn load_build_class(&mut self) -> RunResult<Value> {
        self.env
            .builtins
            .get(Qstr::from(StaticStrings::DunderBuildClass))
            .ok_or_else(|| ExcType::name_error("__build_class__"))
    }

    // ======================================================================
    // Frame switching
    // ======================================================================

    #[must_use]
    pub fn locals_get(&self) -> HeapId {
        self.env.locals()
    }

    pub fn locals_set(&mut self, ns: HeapId) {
        self.env.set_locals(ns);
    }

    #[must_use]
    pub fn globals_get(&self) -> HeapId {
        self.env.globals()
    }

    pub fn globals_set(&mut self, ns: HeapId) {
        self.env.set_globals(ns);
    }

    /// Allocates a fresh empty namespace, for class bodies and frames.
    pub fn new_namespace(&mut self) -> HeapId {
        self.heap.allocate(HeapData::Namespace(Namespace::new()))
    }

    /// Runs `f` with `ns` installed as locals, restoring the previous locals
    /// on every exit path, including exceptional ones.
    pub fn with_locals<T>(&mut self, ns: HeapId, f: impl FnOnce(&mut Self) -> RunResult<T>) -> RunResult<T> {
        let saved = self.env.locals();
        self.env.set_locals(ns);
        let result = f(self);
        self.env.set_locals(saved);
        result
    }

    // ======================================================================
    // Cells
    // ======================================================================

    /// Reads a cell's current value.
    ///
    /// # Panics
    /// Panics when `cell` is not a cell object; only the compiler emits cell
    /// accesses, so a mismatch is a programming error.
    #[must_use]
    pub fn get_cell(&self, cell: Value) -> Value {
        match cell {
            Value::Ref(id) => match self.heap.get(id) {
                HeapData::Cell(v) => *v,
                _ => panic!("get_cell on a non-cell object"),
            },
            _ => panic!("get_cell on a non-cell value"),
        }
    }

    /// Stores into a cell. Panics on non-cells, as [`Runtime::get_cell`] does.
    pub fn set_cell(&mut self, cell: Value, value: Value) {
        match cell {
            Value::Ref(id) => match self.heap.get_mut(id) {
                HeapData::Cell(slot) => *slot = value,
                _ => panic!("set_cell on a non-cell object"),
            },
            _ => panic!("set_cell on a non-cell value"),
        }
    }

    // ======================================================================
    // Call protocol
    // ======================================================================

    pub fn call_function_0(&mut self, fun: Value) -> RunResult<Value> {
        self.call_function_n(fun, &[])
    }

    pub fn call_function_1(&mut self, fun: Value, arg: Value) -> RunResult<Value> {
        self.call_function_n(fun, &[arg])
    }

    pub fn call_function_2(&mut self, fun: Value, arg1: Value, arg2: Value) -> RunResult<Value> {
        // Reverse order: the last argument sits at index 0.
        self.call_function_n(fun, &[arg2, arg1])
    }

    /// Calls `fun` with `args` in reverse order (`args[0]` is the last
    /// source argument), the layout the VM pops off its stack.
    pub fn call_function_n(&mut self, fun: Value, args: &[Value]) -> RunResult<Value> {
        self.tracer.trace(TraceEvent::Call {
            n_args: args.len(),
            n_kw: 0,
        });
        let natural: ArgVec = args.iter().rev().copied().collect();
        self.call_with_args(fun, natural, Vec::new())
    }

    /// Calls `fun` with positional and keyword arguments.
    ///
    /// Layout: `[kw_val(n_kw-1), kw_key(n_kw-1), …, kw_val(0), kw_key(0),
    /// arg(n_args-1), …, arg(0)]` — keyword `value, key` pairs prepended,
    /// newest first, then the reversed positional arguments.
    pub fn call_function_n_kw(&mut self, fun: Value, n_args: usize, n_kw: usize, args: &[Value]) -> RunResult<Value> {
        assert_eq!(args.len(), n_args + 2 * n_kw, "call_function_n_kw layout mismatch");
        self.tracer.trace(TraceEvent::Call { n_args, n_kw });
        let natural: ArgVec = args[2 * n_kw..].iter().rev().copied().collect();
        let mut kwargs = Vec::with_capacity(n_kw);
        // Pair j (source order) sits at indices 2*(n_kw-1-j) (value) and
        // 2*(n_kw-1-j)+1 (key).
        for j in (0..n_kw).rev() {
            let value = args[2 * j];
            let key = args[2 * j + 1];
            let Some(key_str) = self.str_value(key) else {
                return Err(ExcType::type_error("keywords must be strings"));
            };
            let key = self.interns.intern(&key_str);
            kwargs.push((key, value));
        }
        self.call_with_args(fun, natural, kwargs)
    }

    /// Method-call shortcut: `args` is
    /// `[arg(n_args-1), …, arg(0), self_or_undefined, fun]` as produced by
    /// [`Runtime::load_method`] plus pushed arguments. A present self
    /// becomes the leading positional argument.
    pub fn call_method_n(&mut self, n_args: usize, args: &[Value]) -> RunResult<Value> {
        assert_eq!(args.len(), n_args + 2, "call_method_n layout mismatch");
        let fun = args[n_args + 1];
        let self_slot = args[n_args];
        let mut natural: ArgVec = ArgVec::new();
        if self_slot != Value::Undefined {
            natural.push(self_slot);
        }
        natural.extend(args[..n_args].iter().rev().copied());
        self.tracer.trace(TraceEvent::Call {
            n_args: natural.len(),
            n_kw: 0,
        });
        self.call_with_args(fun, natural, Vec::new())
    }

    /// Keyword variant of [`Runtime::call_method_n`]: keyword pairs are
    /// prepended exactly as in [`Runtime::call_function_n_kw`], and
    /// `self_or_undefined`/`fun` sit at the tail.
    pub fn call_method_n_kw(&mut self, n_args: usize, n_kw: usize, args: &[Value]) -> RunResult<Value> {
        let n = n_args + 2 * n_kw;
        assert_eq!(args.len(), n + 2, "call_method_n_kw layout mismatch");
        let fun = args[n + 1];
        let self_slot = args[n];
        if self_slot == Value::Undefined {
            return self.call_function_n_kw(fun, n_args, n_kw, &args[..n]);
        }
        // Rebuild with self as the leading positional argument: in reverse
        // order, the first argument goes last.
        let mut with_self: Vec<Value> = args[..n].to_vec();
        with_self.push(self_slot);
        self.call_function_n_kw(fun, n_args + 1, n_kw, &with_self)
    }

    /// Central callable dispatch, arguments in natural order.
    pub(crate) fn call_with_args(&mut self, fun: Value, args: ArgVec, kwargs: Vec<(Qstr, Value)>) -> RunResult<Value> {
        match fun {
            Value::Builtin(b) => {
                if !kwargs.is_empty() {
                    return Err(ExcType::type_error(format!("{b}() takes no keyword arguments")));
                }
                b.call(self, args)
            }
            Value::Ref(id) => match self.heap.get(id) {
                HeapData::Function(f) => {
                    let f = *f;
                    self.call_function_obj(&f, Vec::new(), args, kwargs)
                }
                HeapData::Closure(c) => {
                    let cells = c.cells.clone();
                    let function = c.function;
                    let f = match self.heap.get(function) {
                        HeapData::Function(f) => *f,
                        _ => panic!("closure does not wrap a function"),
                    };
                    self.call_function_obj(&f, cells, args, kwargs)
                }
                HeapData::BoundMethod(bm) => {
                    let bm = *bm;
                    let mut with_self = ArgVec::new();
                    with_self.push(bm.self_val);
                    with_self.extend(args);
                    self.call_with_args(bm.fun, with_self, kwargs)
                }
                HeapData::Class(_) => self.instantiate(id, args, kwargs),
                _ => Err(ExcType::not_callable(&self.type_name(fun))),
            },
            other => Err(ExcType::not_callable(&self.type_name(other))),
        }
    }

    /// Invokes a function object: generators become generator objects,
    /// bytecode goes to the host executor, native and inline-asm code is
    /// called through its registered pointer.
    fn call_function_obj(
        &mut self,
        f: &Function,
        cells: Vec<HeapId>,
        args: ArgVec,
        kwargs: Vec<(Qstr, Value)>,
    ) -> RunResult<Value> {
        if f.is_generator {
            let generator = Generator {
                code_id: f.code_id,
                frame_size: f.frame_size,
                args: args.to_vec(),
                cells,
                state: crate::function::GeneratorState::Created,
            };
            return Ok(self.heap.alloc_value(HeapData::Generator(generator)));
        }
        match f.kind {
            FunctionKind::Bytecode => {
                let exec = self.bytecode_exec.expect("no bytecode executor installed");
                exec(
                    self,
                    VmCall {
                        code: f.code_id,
                        args: args.to_vec(),
                        kwargs,
                        cells,
                    },
                )
            }
            FunctionKind::Native | FunctionKind::InlineAsm => {
                if !kwargs.is_empty() {
                    return Err(ExcType::type_error("function takes no keyword arguments"));
                }
                if args.len() != f.n_args {
                    return Err(ExcType::arg_count("function", f.n_args, args.len()));
                }
                let fun = match &self.registry.get(f.code_id).expect("function wraps a registered code id").kind
                {
                    CodeKind::Native { fun, .. } | CodeKind::InlineAsm { fun, .. } => *fun,
                    CodeKind::Bytecode { .. } => panic!("native function wraps bytecode"),
                };
                fun(self, &args)
            }
        }
    }

    /// Instantiates a user class: fresh instance, then `__init__` when the
    /// class chain defines one.
    fn instantiate(&mut self, class: HeapId, args: ArgVec, kwargs: Vec<(Qstr, Value)>) -> RunResult<Value> {
        let instance = self.heap.alloc_value(HeapData::Instance(Instance {
            class,
            attrs: Namespace::new(),
        }));
        let init = self.class_attr_lookup(class, Qstr::from(StaticStrings::DunderInit));
        match init {
            Some(init) => {
                let mut with_self = ArgVec::new();
                with_self.push(instance);
                with_self.extend(args);
                self.call_with_args(init, with_self, kwargs)?;
            }
            None => {
                if !args.is_empty() || !kwargs.is_empty() {
                    let name = self.class_name(class);
                    return Err(ExcType::type_error(format!("{name}() takes no arguments")));
                }
            }
        }
        Ok(instance)
    }

    /// Walks a class namespace and its bases depth-first for `name`.
    fn class_attr_lookup(&self, class: HeapId, name: Qstr) -> Option<Value> {
        let c = match self.heap.get(class) {
            HeapData::Class(c) => c,
            _ => return None,
        };
        if let Some(v) = self.ns(c.ns).get(name) {
            return Some(v);
        }
        for &base in &c.bases {
            if let Value::Ref(base_id) = base {
                if let Some(v) = self.class_attr_lookup(base_id, name) {
                    return Some(v);
                }
            }
        }
        None
    }

    // ======================================================================
    // Attribute protocol
    // ======================================================================

    /// Looks up `attr` on `base` without building a bound-method object.
    ///
    /// Output layout follows the VM contract:
    /// - `[self, function]` when a method was found (`self` is the bound
    ///   receiver);
    /// - `[Undefined, value]` when a plain attribute (or unbound function)
    ///   was found.
    pub fn load_method(&mut self, base: Value, attr: Qstr) -> RunResult<[Value; 2]> {
        self.tracer.trace(TraceEvent::LoadAttr {
            type_of_base: base.py_type(&self.heap),
            attr: self.interns.get(attr),
        });

        // 1. The type's own attribute lookup.
        if let Some(found) = self.type_load_attr(base, attr) {
            return Ok(found);
        }

        // 2. Synthesise `__next__` from the iternext capability.
        if attr == Qstr::from(StaticStrings::DunderNext) && self.has_iternext(base) {
            return Ok([base, Value::Builtin(Builtins::Function(BuiltinFn::Next))]);
        }

        // 3. Generic lookup in the builtin type's method table.
        let ty = base.py_type(&self.heap);
        for def in ty.method_table() {
            if Qstr::from(def.name) == attr {
                let fun = Value::Builtin(Builtins::TypeMethod { ty, name: def.name });
                return Ok(match def.kind {
                    MethodKind::Instance => [base, fun],
                    MethodKind::Static => [Value::Undefined, fun],
                    MethodKind::Class => [Value::Builtin(Builtins::Type(ty)), fun],
                });
            }
        }

        // 4. Nothing found: type objects get the more detailed message.
        let attr_str = self.interns.get(attr);
        if let Value::Ref(id) = base {
            if let HeapData::Class(c) = self.heap.get(id) {
                return Err(ExcType::type_attribute_error(self.interns.get(c.name), attr_str));
            }
        }
        Err(ExcType::attribute_error(&self.type_name(base), attr_str))
    }

    /// The per-type attribute lookup consulted before generic dispatch:
    /// instances, classes, and modules resolve their own namespaces.
    fn type_load_attr(&self, base: Value, attr: Qstr) -> Option<[Value; 2]> {
        let Value::Ref(id) = base else { return None };
        match self.heap.get(id) {
            HeapData::Instance(inst) => {
                if let Some(v) = inst.attrs.get(attr) {
                    return Some([Value::Undefined, v]);
                }
                let class = inst.class;
                let found = self.class_attr_lookup(class, attr)?;
                Some(self.bind_class_attr(found, base, class))
            }
            HeapData::Class(_) => {
                let found = self.class_attr_lookup(id, attr)?;
                // Looked up on the class itself: functions stay unbound,
                // classmethods bind the class.
                match found {
                    Value::Ref(found_id) => match self.heap.get(found_id) {
                        HeapData::StaticMethod(f) => Some([Value::Undefined, *f]),
                        HeapData::ClassMethod(f) => Some([base, *f]),
                        _ => Some([Value::Undefined, found]),
                    },
                    _ => Some([Value::Undefined, found]),
                }
            }
            HeapData::Module(m) => {
                let v = self.ns(m.ns).get(attr)?;
                Some([Value::Undefined, v])
            }
            _ => None,
        }
    }

    /// Descriptor handling for a value found in a class namespace during an
    /// instance lookup.
    fn bind_class_attr(&self, found: Value, instance: Value, class: HeapId) -> [Value; 2] {
        match found {
            Value::Ref(found_id) => match self.heap.get(found_id) {
                // Plain functions become instance-bound methods.
                HeapData::Function(_) | HeapData::Closure(_) => [instance, found],
                HeapData::StaticMethod(f) => [Value::Undefined, *f],
                HeapData::ClassMethod(f) => [Value::Ref(class), *f],
                _ => [Value::Undefined, found],
            },
            _ => [Value::Undefined, found],
        }
    }

    fn has_iternext(&self, v: Value) -> bool {
        match v {
            Value::Ref(id) => matches!(self.heap.get(id), HeapData::Iter(_) | HeapData::Generator(_)),
            _ => false,
        }
    }

    /// Attribute load: a found method is wrapped into a fresh bound-method
    /// value.
    pub fn load_attr(&mut self, base: Value, attr: Qstr) -> RunResult<Value> {
        let [self_slot, fun] = self.load_method(base, attr)?;
        if self_slot == Value::Undefined {
            Ok(fun)
        } else {
            Ok(self.heap.alloc_value(HeapData::BoundMethod(BoundMethod {
                self_val: self_slot,
                fun,
            })))
        }
    }

    /// Attribute store, dispatched on the base's type. Types without a
    /// store capability raise `AttributeError`.
    pub fn store_attr(&mut self, base: Value, attr: Qstr, value: Value) -> RunResult<()> {
        if let Value::Ref(id) = base {
            match self.heap.get(id) {
                HeapData::Instance(_) => {
                    if let HeapData::Instance(inst) = self.heap.get_mut(id) {
                        inst.attrs.insert(attr, value);
                    }
                    return Ok(());
                }
                HeapData::Class(c) => {
                    let ns = c.ns;
                    self.ns_mut(ns).insert(attr, value);
                    return Ok(());
                }
                HeapData::Module(m) => {
                    let ns = m.ns;
                    self.ns_mut(ns).insert(attr, value);
                    return Ok(());
                }
                _ => {}
            }
        }
        let attr_str = self.interns.get(attr).to_owned();
        Err(ExcType::attribute_error(&self.type_name(base), &attr_str))
    }

    /// Subscript store: lists and dicts natively, everything else through
    /// the store-subscript capability check.
    pub fn store_subscr(&mut self, base: Value, index: Value, value: Value) -> RunResult<()> {
        if let Value::Ref(id) = base {
            match self.heap.get(id) {
                HeapData::List(_) => {
                    let Some(i) = index.as_small_int() else {
                        return Err(ExcType::type_error(format!(
                            "list indices must be integers, not '{}'",
                            self.type_name(index)
                        )));
                    };
                    if let HeapData::List(list) = self.heap.get_mut(id) {
                        return list.set_item(i, value);
                    }
                }
                HeapData::Dict(_) => {
                    let key = DictKey::from_value(&self.heap, &self.interns, index)?;
                    if let HeapData::Dict(dict) = self.heap.get_mut(id) {
                        dict.insert(key, value);
                    }
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(ExcType::type_error(format!(
            "'{}' object does not support item assignment",
            self.type_name(base)
        )))
    }

    // ======================================================================
    // Iterator protocol
    // ======================================================================

    /// Returns an iterator over `v`, or `TypeError` when its type has no
    /// iteration capability.
    pub fn getiter(&mut self, v: Value) -> RunResult<Value> {
        self.tracer.trace(TraceEvent::GetIter {
            type_of_base: v.py_type(&self.heap),
        });
        let iter = match v {
            Value::InternStr(_) => Iter::Str { source: v, index: 0 },
            Value::Ref(id) => match self.heap.get(id) {
                HeapData::List(_) | HeapData::Tuple(_) => Iter::Seq { seq: id, index: 0 },
                HeapData::Str(_) => Iter::Str { source: v, index: 0 },
                HeapData::Range(r) => Iter::Range {
                    next: r.start,
                    stop: r.stop,
                    step: r.step,
                },
                HeapData::Dict(_) => Iter::Dict { dict: id, index: 0 },
                HeapData::Set(_) => Iter::Set { set: id, index: 0 },
                // Iterators and generators are their own iterators.
                HeapData::Iter(_) | HeapData::Generator(_) => return Ok(v),
                _ => return Err(ExcType::not_iterable(&self.type_name(v))),
            },
            _ => return Err(ExcType::not_iterable(&self.type_name(v))),
        };
        Ok(self.heap.alloc_value(HeapData::Iter(iter)))
    }

    /// Advances an iterator.
    ///
    /// Returns the next value, or the stop-iteration marker on exhaustion.
    /// The marker never escapes to user code: callers either translate it
    /// into a `StopIteration` exception (`next()`) or treat it as loop
    /// termination.
    pub fn iternext(&mut self, it: Value) -> RunResult<Value> {
        self.tracer.trace(TraceEvent::IterNext);
        let Value::Ref(id) = it else {
            return Err(ExcType::not_an_iterator(&self.type_name(it)));
        };
        let iter = match self.heap.get(id) {
            HeapData::Iter(iter) => *iter,
            HeapData::Generator(g) => {
                if matches!(g.state, crate::function::GeneratorState::Done) {
                    return Ok(Value::StopIteration);
                }
                let resume = self.generator_resume.expect("no generator resume hook installed");
                return resume(self, id);
            }
            _ => return Err(ExcType::not_an_iterator(&self.type_name(it))),
        };
        let (result, advanced) = self.iter_step(iter)?;
        if let HeapData::Iter(slot) = self.heap.get_mut(id) {
            *slot = advanced;
        }
        Ok(result)
    }

    /// One step of a container iterator: the yielded value (or stop marker)
    /// plus the advanced state.
    fn iter_step(&mut self, iter: Iter) -> RunResult<(Value, Iter)> {
        match iter {
            Iter::Seq { seq, index } => {
                let item = match self.heap.get(seq) {
                    HeapData::List(l) => l.items().get(index).copied(),
                    HeapData::Tuple(t) => t.items().get(index).copied(),
                    _ => panic!("sequence iterator over a non-sequence"),
                };
                match item {
                    Some(v) => Ok((v, Iter::Seq { seq, index: index + 1 })),
                    None => Ok((Value::StopIteration, iter)),
                }
            }
            Iter::Str { source, index } => {
                let s = self.str_value(source).expect("string iterator over a non-string");
                match s.chars().nth(index) {
                    Some(c) => {
                        let v = self.char_value(c);
                        Ok((v, Iter::Str { source, index: index + 1 }))
                    }
                    None => Ok((Value::StopIteration, iter)),
                }
            }
            Iter::Range { next, stop, step } => {
                let exhausted = if step > 0 { next >= stop } else { next <= stop };
                if exhausted {
                    Ok((Value::StopIteration, iter))
                } else {
                    Ok((
                        Value::Int(next),
                        Iter::Range {
                            next: next + step,
                            stop,
                            step,
                        },
                    ))
                }
            }
            Iter::Dict { dict, index } => {
                let key = match self.heap.get(dict) {
                    HeapData::Dict(d) => d.get_index(index).map(|(k, _)| k.clone()),
                    _ => panic!("dict iterator over a non-dict"),
                };
                match key {
                    Some(k) => {
                        let v = k.to_value(&mut self.heap);
                        Ok((v, Iter::Dict { dict, index: index + 1 }))
                    }
                    None => Ok((Value::StopIteration, iter)),
                }
            }
            Iter::Set { set, index } => {
                let key = match self.heap.get(set) {
                    HeapData::Set(s) => s.get_index(index).cloned(),
                    _ => panic!("set iterator over a non-set"),
                };
                match key {
                    Some(k) => {
                        let v = k.to_value(&mut self.heap);
                        Ok((v, Iter::Set { set, index: index + 1 }))
                    }
                    None => Ok((Value::StopIteration, iter)),
                }
            }
        }
    }

    /// A one-character string value; ASCII characters stay immediate.
    pub(crate) fn char_value(&mut self, c: char) -> Value {
        if c.is_ascii() {
            Value::InternStr(Qstr::from_ascii(c as u8))
        } else {
            self.heap.alloc_value(HeapData::Str(c.to_string()))
        }
    }

    /// Drains an iterable into a vector via `getiter`/`iternext`.
    pub(crate) fn collect_iterable(&mut self, v: Value) -> RunResult<Vec<Value>> {
        let iter = self.getiter(v)?;
        let mut items = Vec::new();
        loop {
            let item = self.iternext(iter)?;
            if item == Value::StopIteration {
                return Ok(items);
            }
            items.push(item);
        }
    }

    // ======================================================================
    // Container construction and unpacking
    // ======================================================================

    /// Builds a tuple from reverse-ordered items (stack pop order); the
    /// result presents source order.
    pub fn build_tuple(&mut self, items: &[Value]) -> Value {
        self.heap
            .alloc_value(HeapData::Tuple(Tuple::from_reverse(items.to_vec())))
    }

    /// Builds a list from reverse-ordered items.
    pub fn build_list(&mut self, items: &[Value]) -> Value {
        self.heap
            .alloc_value(HeapData::List(List::from_reverse(items.to_vec())))
    }

    /// Builds a set; item order is irrelevant.
    pub fn build_set(&mut self, items: &[Value]) -> RunResult<Value> {
        let mut set = Set::new();
        for &item in items {
            set.insert(DictKey::from_value(&self.heap, &self.interns, item)?);
        }
        Ok(self.heap.alloc_value(HeapData::Set(set)))
    }

    /// Adds an item to a set under construction, returning the set.
    pub fn store_set(&mut self, set: Value, item: Value) -> RunResult<Value> {
        let key = DictKey::from_value(&self.heap, &self.interns, item)?;
        let Value::Ref(id) = set else {
            panic!("store_set target is not a set");
        };
        match self.heap.get_mut(id) {
            HeapData::Set(s) => s.insert(key),
            _ => panic!("store_set target is not a set"),
        }
        Ok(set)
    }

    /// Builds an empty dict pre-sized for `hint` entries.
    pub fn build_map(&mut self, hint: usize) -> Value {
        self.heap.alloc_value(HeapData::Dict(Dict::with_capacity(hint)))
    }

    /// Stores a key/value pair into a dict under construction, returning
    /// the dict.
    pub fn store_map(&mut self, map: Value, key: Value, value: Value) -> RunResult<Value> {
        let key = DictKey::from_value(&self.heap, &self.interns, key)?;
        let Value::Ref(id) = map else {
            panic!("store_map target is not a dict");
        };
        match self.heap.get_mut(id) {
            HeapData::Dict(d) => d.insert(key, value),
            _ => panic!("store_map target is not a dict"),
        }
        Ok(map)
    }

    /// Appends to a list (the VM's comprehension support), returning the
    /// list.
    pub fn list_append(&mut self, list: Value, item: Value) -> RunResult<Value> {
        let Value::Ref(id) = list else {
            panic!("list_append target is not a list");
        };
        match self.heap.get_mut(id) {
            HeapData::List(l) => l.push(item),
            _ => panic!("list_append target is not a list"),
        }
        Ok(list)
    }

    /// Unpacks `seq` into exactly `n` values, in source order.
    ///
    /// Tuples and lists unpack directly; any other iterable goes through
    /// the iterator protocol. Length mismatches raise `ValueError`.
    pub fn unpack_sequence(&mut self, seq: Value, n: usize) -> RunResult<Vec<Value>> {
        if let Value::Ref(id) = seq {
            let direct = match self.heap.get(id) {
                HeapData::Tuple(t) => Some(t.items().to_vec()),
                HeapData::List(l) => Some(l.items().to_vec()),
                _ => None,
            };
            if let Some(items) = direct {
                if items.len() < n {
                    return Err(need_more_values(items.len()));
                }
                if items.len() > n {
                    return Err(too_many_values(n));
                }
                return Ok(items);
            }
        }
        // Generic iterables unpack through the iterator protocol.
        let iter = self.getiter(seq)?;
        let mut items = Vec::with_capacity(n);
        loop {
            let item = self.iternext(iter)?;
            if item == Value::StopIteration {
                if items.len() < n {
                    return Err(need_more_values(items.len()));
                }
                return Ok(items);
            }
            if items.len() == n {
                return Err(too_many_values(n));
            }
            items.push(item);
        }
    }

    // ======================================================================
    // Code registry surface
    // ======================================================================

    /// Builds a function value from a registered code id.
    ///
    /// Returns `None` (the value) for an unregistered id, mirroring the
    /// registry's "slot 0 means no code" convention.
    pub fn make_function_from_id(&mut self, id: CodeId) -> Value {
        let Some(desc) = self.registry.get(id) else {
            return Value::None;
        };
        let kind = match desc.kind {
            CodeKind::Bytecode { .. } => FunctionKind::Bytecode,
            CodeKind::Native { .. } => FunctionKind::Native,
            CodeKind::InlineAsm { .. } => FunctionKind::InlineAsm,
        };
        let function = Function {
            code_id: id,
            kind,
            n_args: desc.n_args,
            frame_size: desc.n_locals + desc.n_stack,
            is_generator: desc.is_generator,
        };
        self.heap.alloc_value(HeapData::Function(function))
    }

    /// Wraps the function for `id` in a closure carrying captured cells.
    ///
    /// `closure_tuple` is a tuple of cell objects captured by the compiler.
    ///
    /// # Panics
    /// Panics when `closure_tuple` is not a tuple of cells; closure shapes
    /// are compiler-emitted, so a mismatch is a programming error.
    pub fn make_closure_from_id(&mut self, id: CodeId, closure_tuple: Value) -> Value {
        let function = self.make_function_from_id(id);
        let Value::Ref(function_id) = function else {
            return Value::None;
        };
        let cells: Vec<HeapId> = match closure_tuple {
            Value::Ref(tuple_id) => match self.heap.get(tuple_id) {
                HeapData::Tuple(t) => t
                    .items()
                    .iter()
                    .map(|&cell| match cell {
                        Value::Ref(cell_id) if matches!(self.heap.get(cell_id), HeapData::Cell(_)) => cell_id,
                        _ => panic!("closure tuple must contain cells"),
                    })
                    .collect(),
                _ => panic!("closure argument must be a tuple"),
            },
            _ => panic!("closure argument must be a tuple"),
        };
        self.heap.alloc_value(HeapData::Closure(Closure {
            function: function_id,
            cells,
        }))
    }

    // ======================================================================
    // Imports
    // ======================================================================

    /// Calls the host `__import__` hook with the CPython-shaped argument
    /// tuple `(name, None, None, fromlist, level)`. `level` must be 0.
    pub fn import_name(&mut self, name: Qstr, fromlist: Value, level: Value) -> RunResult<Value> {
        if level.as_small_int() != Some(0) {
            return Err(ExcType::value_error("relative imports are not supported"));
        }
        let Some(hook) = self.import_hook else {
            return Err(SimpleException::new_msg(
                ExcType::ImportError,
                format!("no module named '{}'", self.interns.get(name)),
            ));
        };
        let args = [Value::InternStr(name), Value::None, Value::None, fromlist, level];
        hook(self, &args)
    }

    /// `from module import name`: an attribute load with `AttributeError`
    /// converted to `ImportError`.
    pub fn import_from(&mut self, module: Value, name: Qstr) -> RunResult<Value> {
        self.load_attr(module, name).map_err(|exc| {
            if exc.exc_type() == ExcType::AttributeError {
                SimpleException::new_msg(
                    ExcType::ImportError,
                    format!("cannot import name '{}'", self.interns.get(name)),
                )
            } else {
                exc
            }
        })
    }

    // ======================================================================
    // Class construction
    // ======================================================================

    /// Builds a range value, rejecting a zero step.
    pub(crate) fn new_range(&mut self, start: i64, stop: i64, step: i64) -> RunResult<Value> {
        if step == 0 {
            return Err(ExcType::value_error("range() arg 3 must not be zero"));
        }
        Ok(self.heap.alloc_value(HeapData::Range(Range::new(start, stop, step))))
    }

    /// Creates a class object from `(name, bases, namespace)`, the
    /// metaclass call shape.
    pub(crate) fn new_class(&mut self, name: Value, bases: Value, ns: Value) -> RunResult<Value> {
        let Some(name_str) = self.str_value(name) else {
            return Err(ExcType::type_error("type() argument 1 must be str"));
        };
        let name = self.interns.intern(&name_str);
        let bases = match bases {
            Value::Ref(id) => match self.heap.get(id) {
                HeapData::Tuple(t) => t.items().to_vec(),
                _ => return Err(ExcType::type_error("type() argument 2 must be a tuple")),
            },
            _ => return Err(ExcType::type_error("type() argument 2 must be a tuple")),
        };
        let ns = match ns {
            Value::Ref(id) if matches!(self.heap.get(id), HeapData::Namespace(_)) => id,
            _ => return Err(ExcType::type_error("type() argument 3 must be a namespace")),
        };
        Ok(self.heap.alloc_value(HeapData::Class(ClassObject { name, bases, ns })))
    }

    // ======================================================================
    // Printing and repr
    // ======================================================================

    /// Writes `text` through the installed print writer.
    pub(crate) fn print_text(&mut self, text: &str) -> RunResult<()> {
        self.print.write(text)
    }

    pub(crate) fn print_push(&mut self, end: char) -> RunResult<()> {
        self.print.push(end)
    }

    /// The Python repr of a value (strings quoted).
    #[must_use]
    pub fn py_repr(&self, v: Value) -> String {
        let mut out = String::new();
        self.repr_fmt(v, &mut out);
        out
    }

    /// The printable form of a value: strings raw, everything else repr.
    #[must_use]
    pub fn py_str(&self, v: Value) -> String {
        match self.str_value(v) {
            Some(s) => s,
            None => self.py_repr(v),
        }
    }

    fn repr_fmt(&self, v: Value, out: &mut String) {
        match v {
            Value::Undefined => out.push_str("<undefined>"),
            Value::StopIteration => out.push_str("<stop-iteration>"),
            Value::None => out.push_str("None"),
            Value::Ellipsis => out.push_str("Ellipsis"),
            Value::Bool(true) => out.push_str("True"),
            Value::Bool(false) => out.push_str("False"),
            Value::Int(n) => {
                let _ = write!(out, "{n}");
            }
            #[cfg(feature = "float")]
            Value::Float(f) => {
                let _ = write!(out, "{f:?}");
            }
            Value::InternStr(q) => {
                let _ = crate::types::str::str_repr_fmt(self.interns.get(q), out);
            }
            Value::Builtin(b) => {
                let _ = b.repr_fmt(out);
            }
            Value::Ref(id) => self.heap_repr_fmt(id, out),
        }
    }

    fn heap_repr_fmt(&self, id: HeapId, out: &mut String) {
        match self.heap.get(id) {
            HeapData::Str(s) => {
                let _ = crate::types::str::str_repr_fmt(s, out);
            }
            HeapData::BigInt(b) => {
                let _ = write!(out, "{b}");
            }
            #[cfg(feature = "float")]
            HeapData::Complex(c) => {
                if c.real == 0.0 {
                    let _ = write!(out, "{:?}j", c.imag);
                } else {
                    let _ = write!(out, "({:?}{}{:?}j)", c.real, if c.imag < 0.0 { "" } else { "+" }, c.imag);
                }
            }
            HeapData::List(l) => {
                out.push('[');
                for (i, &item) in l.items().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.repr_fmt(item, out);
                }
                out.push(']');
            }
            HeapData::Tuple(t) => {
                out.push('(');
                for (i, &item) in t.items().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.repr_fmt(item, out);
                }
                if t.len() == 1 {
                    out.push(',');
                }
                out.push(')');
            }
            HeapData::Dict(d) => {
                out.push('{');
                for (i, (k, &val)) in d.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.dict_key_repr(k, out);
                    out.push_str(": ");
                    self.repr_fmt(val, out);
                }
                out.push('}');
            }
            HeapData::Set(s) => {
                if s.is_empty() {
                    out.push_str("set()");
                    return;
                }
                out.push('{');
                for (i, k) in s.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.dict_key_repr(k, out);
                }
                out.push('}');
            }
            HeapData::Range(r) => {
                if r.step == 1 {
                    let _ = write!(out, "range({}, {})", r.start, r.stop);
                } else {
                    let _ = write!(out, "range({}, {}, {})", r.start, r.stop, r.step);
                }
            }
            HeapData::Cell(_) => out.push_str("<cell>"),
            HeapData::Function(_) | HeapData::Closure(_) => {
                let _ = write!(out, "<function at 0x{:x}>", id.index());
            }
            HeapData::BoundMethod(_) => {
                let _ = write!(out, "<bound method at 0x{:x}>", id.index());
            }
            HeapData::StaticMethod(_) => out.push_str("<staticmethod object>"),
            HeapData::ClassMethod(_) => out.push_str("<classmethod object>"),
            HeapData::Generator(_) => {
                let _ = write!(out, "<generator object at 0x{:x}>", id.index());
            }
            HeapData::Iter(_) => {
                let _ = write!(out, "<iterator object at 0x{:x}>", id.index());
            }
            HeapData::Class(c) => {
                let _ = write!(out, "<class '{}'>", self.interns.get(c.name));
            }
            HeapData::Instance(inst) => {
                let _ = write!(out, "<{} object at 0x{:x}>", self.class_name(inst.class), id.index());
            }
            HeapData::Exception(exc) => {
                let _ = exc.repr_fmt(out);
            }
            HeapData::Namespace(ns) => {
                out.push('{');
                for (i, (k, val)) in ns.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = crate::types::str::str_repr_fmt(self.interns.get(k), out);
                    out.push_str(": ");
                    self.repr_fmt(val, out);
                }
                out.push('}');
            }
            HeapData::Module(m) => {
                let _ = write!(out, "<module '{}'>", self.interns.get(m.name));
            }
        }
    }

    fn dict_key_repr(&self, key: &DictKey, out: &mut String) {
        match key {
            DictKey::None => out.push_str("None"),
            DictKey::Int(n) => {
                let _ = write!(out, "{n}");
            }
            DictKey::Big(b) => {
                let _ = write!(out, "{b}");
            }
            DictKey::Str(s) => {
                let _ = crate::types::str::str_repr_fmt(s, out);
            }
            DictKey::Tuple(keys) => {
                out.push('(');
                for (i, k) in keys.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.dict_key_repr(k, out);
                }
                if keys.len() == 1 {
                    out.push(',');
                }
                out.push(')');
            }
            #[cfg(feature = "float")]
            DictKey::Float(bits) => {
                let _ = write!(out, "{:?}", f64::from_bits(*bits));
            }
        }
    }

    // ======================================================================
    // Hashing
    // ======================================================================

    /// Full-width deterministic hash of a value, or `TypeError` for
    /// unhashable types.
    pub(crate) fn py_hash(&self, v: Value) -> RunResult<u64> {
        match v {
            Value::None => Ok(hash_str_seed0("None")),
            Value::Ellipsis => Ok(hash_str_seed0("Ellipsis")),
            Value::Bool(b) => Ok(hash_int(i64::from(b))),
            Value::Int(n) => Ok(hash_int(n)),
            #[cfg(feature = "float")]
            Value::Float(f) => Ok(crate::py_hash::hash_float(f)),
            Value::InternStr(q) => Ok(hash_str_seed0(self.interns.get(q))),
            Value::Builtin(_) => Ok(hash_str_seed0(&self.py_repr(v))),
            Value::Ref(id) => match self.heap.get(id) {
                HeapData::Str(s) => Ok(hash_str_seed0(s)),
                HeapData::BigInt(b) => Ok(bigint_hash(b)),
                HeapData::Tuple(t) => {
                    // xor-rotate fold over item hashes; deterministic and
                    // order-sensitive, which is all dict parity needs here.
                    let mut acc: u64 = 0x345678;
                    for &item in t.items() {
                        acc = acc.rotate_left(13) ^ self.py_hash(item)?;
                    }
                    Ok(acc)
                }
                _ => Err(ExcType::type_error(format!("unhashable type: '{}'", self.type_name(v)))),
            },
            _ => Err(ExcType::type_error(format!("unhashable type: '{}'", self.type_name(v)))),
        }
    }
}

/// Sign-preserving modular hash of a big integer, mirroring the small-int
/// algorithm.
fn bigint_hash(b: &num_bigint::BigInt) -> u64 {
    use num_traits::{Signed, ToPrimitive};
    let modulus = num_bigint::BigInt::from((1_i64 << 61) - 1);
    let rem = (b.abs() % &modulus).to_i64().expect("remainder fits 61 bits");
    let signed = if b.is_negative() { -rem } else { rem };
    let adjusted = if signed == -1 { -2 } else { signed };
    u64::from_ne_bytes(adjusted.to_ne_bytes())
}

fn need_more_values(got: usize) -> SimpleException {
    ExcType::value_error(format!("need more than {got} values to unpack"))
}

fn too_many_values(expected: usize) -> SimpleException {
    ExcType::value_error(format!("too many values to unpack (expected {expected})"))
}
