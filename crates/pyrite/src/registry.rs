use serde::{Deserialize, Serialize};

use crate::{exception::RunResult, runtime::Runtime, value::Value};

/// Dense id of a compiled unit in the process-wide code registry.
///
/// Ids start at 1; 0 means "no code". The compiler front-end allocates ids
/// via [`CodeRegistry::get_unique_code_id`] before assigning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeId(u32);

impl CodeId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Signature of a native (or inline-assembly) code unit.
///
/// Arguments arrive in natural order; this is the uniform contract the core
/// invokes registered code through. Native code calls back into the core via
/// the [`fun_table`](crate::fun_table).
pub type NativeFn = fn(&mut Runtime, &[Value]) -> RunResult<Value>;

/// Kind-specific payload of a code descriptor.
#[derive(Debug, Clone)]
pub enum CodeKind {
    Bytecode { code: Vec<u8> },
    Native { fun: NativeFn, len: usize },
    InlineAsm { fun: NativeFn, len: usize },
}

/// A registered compiled unit.
///
/// `n_locals` and `n_stack` are meaningful for bytecode only; native and
/// inline-assembly units register them as zero.
#[derive(Debug, Clone)]
pub struct CodeDescriptor {
    pub kind: CodeKind,
    pub n_args: usize,
    pub n_locals: usize,
    pub n_stack: usize,
    pub is_generator: bool,
}

/// Grow-on-demand table of code descriptors, living for the process
/// lifetime.
#[derive(Debug)]
pub struct CodeRegistry {
    codes: Vec<Option<CodeDescriptor>>,
    next_id: u32,
}

impl Default for CodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            codes: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocates the next code id. Ids are monotonic and never reused.
    pub fn get_unique_code_id(&mut self) -> CodeId {
        let id = self.next_id;
        self.next_id += 1;
        CodeId(id)
    }

    /// Returns the empty slot for `id`, growing the table on demand.
    ///
    /// # Panics
    /// Panics when `id` was not allocated via `get_unique_code_id` or when
    /// the slot is already assigned: a code id is written exactly once, and
    /// a second registration is a programming error, not a user error.
    fn empty_slot(&mut self, id: CodeId) -> &mut Option<CodeDescriptor> {
        assert!(
            (1..self.next_id).contains(&id.0),
            "code id {} was never allocated",
            id.0
        );
        if self.codes.len() < self.next_id as usize {
            self.codes.resize_with(self.next_id as usize, || None);
        }
        let slot = &mut self.codes[id.index()];
        assert!(slot.is_none(), "code id {} assigned twice", id.0);
        slot
    }

    pub fn assign_byte_code(
        &mut self,
        id: CodeId,
        code: Vec<u8>,
        n_args: usize,
        n_locals: usize,
        n_stack: usize,
        is_generator: bool,
    ) {
        #[cfg(feature = "dump-code")]
        dump_code(&code);
        *self.empty_slot(id) = Some(CodeDescriptor {
            kind: CodeKind::Bytecode { code },
            n_args,
            n_locals,
            n_stack,
            is_generator,
        });
    }

    pub fn assign_native_code(&mut self, id: CodeId, fun: NativeFn, len: usize, n_args: usize) {
        *self.empty_slot(id) = Some(CodeDescriptor {
            kind: CodeKind::Native { fun, len },
            n_args,
            n_locals: 0,
            n_stack: 0,
            is_generator: false,
        });
    }

    pub fn assign_inline_asm_code(&mut self, id: CodeId, fun: NativeFn, len: usize, n_args: usize) {
        *self.empty_slot(id) = Some(CodeDescriptor {
            kind: CodeKind::InlineAsm { fun, len },
            n_args,
            n_locals: 0,
            n_stack: 0,
            is_generator: false,
        });
    }

    /// Looks up a registered descriptor; `None` for ids never allocated or
    /// not yet assigned.
    #[must_use]
    pub fn get(&self, id: CodeId) -> Option<&CodeDescriptor> {
        self.codes.get(id.index()).and_then(Option::as_ref)
    }
}

/// Appends raw bytecode to the `out-code` debug dump.
///
/// Not a stable format; failures are ignored. Native and inline-assembly
/// units are not dumped because their machine code is not readable from
/// safe Rust.
#[cfg(feature = "dump-code")]
fn dump_code(bytes: &[u8]) {
    use std::io::Write;
    if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open("out-code") {
        let _ = f.write_all(bytes);
    }
}
