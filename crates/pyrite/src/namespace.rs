use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{heap::HeapId, intern::Qstr, value::Value};

/// A name -> value mapping used for variable storage.
///
/// This is the namespace primitive behind locals, globals, builtins, class
/// dicts, instance attributes, and module attributes. Keys are interned
/// strings; iteration follows insertion order, which keeps method resolution
/// and repr output deterministic. The open-addressed table of the source is
/// an implementation detail the map type absorbs.
///
/// Serialized as a sequence of pairs: qstr keys are not strings on the
/// wire, which rules out the map representation in self-describing formats.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(with = "entries_as_pairs")]
    entries: IndexMap<Qstr, Value>,
}

mod entries_as_pairs {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::{intern::Qstr, value::Value};

    pub fn serialize<S: Serializer>(map: &IndexMap<Qstr, Value>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<IndexMap<Qstr, Value>, D::Error> {
        let pairs: Vec<(Qstr, Value)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl Namespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: Qstr) -> Option<Value> {
        self.entries.get(&name).copied()
    }

    /// Inserts or overwrites a binding.
    pub fn insert(&mut self, name: Qstr, value: Value) {
        self.entries.insert(name, value);
    }

    #[must_use]
    pub fn contains(&self, name: Qstr) -> bool {
        self.entries.contains_key(&name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Qstr, Value)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }
}

/// The process-wide name-resolution environment.
///
/// `locals` and `globals` are handles to heap-allocated namespaces so the
/// caller can swap them when entering a class body, function frame, or
/// module frame (and so a class body's namespace can become the class
/// dict). `builtins` is initialised once and never swapped; mutating it
/// afterwards is permitted but the core performs none.
///
/// At module top level `locals == globals` (same heap slot).
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Env {
    locals: HeapId,
    globals: HeapId,
    pub(crate) builtins: Namespace,
}

impl Env {
    pub fn new(module_ns: HeapId) -> Self {
        Self {
            locals: module_ns,
            globals: module_ns,
            builtins: Namespace::new(),
        }
    }

    #[inline]
    pub fn locals(&self) -> HeapId {
        self.locals
    }

    #[inline]
    pub fn globals(&self) -> HeapId {
        self.globals
    }

    pub fn set_locals(&mut self, ns: HeapId) {
        self.locals = ns;
    }

    pub fn set_globals(&mut self, ns: HeapId) {
        self.globals = ns;
    }
}
