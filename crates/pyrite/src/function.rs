use serde::{Deserialize, Serialize};

use crate::{
    exception::RunResult,
    heap::HeapId,
    intern::Qstr,
    registry::CodeId,
    runtime::Runtime,
    value::Value,
};

/// Which kind of compiled unit backs a function object.
///
/// Copied out of the code descriptor at function creation so call dispatch
/// does not consult the registry for the common checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionKind {
    Bytecode,
    Native,
    InlineAsm,
}

/// A callable wrapping a registered code unit.
///
/// For bytecode, `frame_size` is `n_locals + n_stack` and invocation
/// delegates to the host-installed bytecode executor. When `is_generator`
/// is set the function is a generator factory: calling it returns a
/// `Generator` heap object instead of executing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Function {
    pub code_id: CodeId,
    pub kind: FunctionKind,
    pub n_args: usize,
    pub frame_size: usize,
    pub is_generator: bool,
}

/// A function carrying cells captured from enclosing scopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Closure {
    /// Heap handle of the wrapped `Function`.
    pub function: HeapId,
    pub cells: Vec<HeapId>,
}

/// Execution state of a generator, owned by the host VM between resumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GeneratorState {
    /// Created but never resumed.
    Created,
    /// Suspended at a yield; `frame` holds locals + evaluation stack.
    Suspended { ip: u32, frame: Vec<Value> },
    /// Exhausted; further resumes yield the stop marker.
    Done,
}

/// A suspended generator produced by calling a generator factory.
///
/// The core exposes generators through the iterator protocol only;
/// resumption re-enters the host VM via the generator-resume hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    pub code_id: CodeId,
    pub frame_size: usize,
    /// Call arguments, natural order, consumed on first resume.
    pub args: Vec<Value>,
    /// Captured cells when the factory was a closure.
    pub cells: Vec<HeapId>,
    pub state: GeneratorState,
}

/// One bytecode invocation handed to the host VM.
#[derive(Debug)]
pub struct VmCall {
    pub code: CodeId,
    /// Positional arguments in natural order.
    pub args: Vec<Value>,
    /// Keyword arguments in source order.
    pub kwargs: Vec<(Qstr, Value)>,
    /// Captured cells when the callee is a closure.
    pub cells: Vec<HeapId>,
}

/// Host hook executing a bytecode unit to completion.
pub type BytecodeExec = fn(&mut Runtime, VmCall) -> RunResult<Value>;

/// Host hook resuming a suspended generator.
///
/// Returns the next yielded value, or the stop-iteration marker when the
/// generator is exhausted.
pub type GeneratorResume = fn(&mut Runtime, HeapId) -> RunResult<Value>;

/// Host `__import__` hook.
///
/// Receives the CPython-shaped 5-tuple `(name, globals, locals, fromlist,
/// level)` as an argument array; `globals`/`locals` are passed as `None`.
pub type ImportHook = fn(&mut Runtime, &[Value; 5]) -> RunResult<Value>;
