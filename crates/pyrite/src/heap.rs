use std::collections::BTreeMap;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::{
    exception::SimpleException,
    function::{Closure, Function, Generator},
    namespace::Namespace,
    types::{BoundMethod, ClassObject, Dict, Instance, Iter, List, Module, Range, Set, Tuple, Type},
    value::Value,
};
#[cfg(feature = "float")]
use crate::types::Complex;

/// Handle to a heap slot.
///
/// Uses `u32` to keep `Value` small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeapId(u32);

impl HeapId {
    #[inline]
    #[must_use]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Heap-allocated object payloads.
///
/// The variant is the object's type discriminator for its entire lifetime;
/// slots are never repurposed.
#[derive(Debug, Serialize, Deserialize)]
pub enum HeapData {
    Str(String),
    /// Boxed integer produced by small-int overflow promotion.
    BigInt(BigInt),
    #[cfg(feature = "float")]
    Complex(Complex),
    List(List),
    Tuple(Tuple),
    Dict(Dict),
    Set(Set),
    Range(Range),
    /// Single-slot mutable box for closure variables and the class-cell
    /// protocol. `Value::None` is the initial absent value.
    Cell(Value),
    Function(Function),
    Closure(Closure),
    BoundMethod(BoundMethod),
    StaticMethod(Value),
    ClassMethod(Value),
    Generator(Generator),
    Iter(Iter),
    Class(ClassObject),
    Instance(Instance),
    Exception(SimpleException),
    Namespace(Namespace),
    Module(Module),
}

impl HeapData {
    #[must_use]
    pub fn py_type(&self) -> Type {
        match self {
            Self::Str(_) => Type::Str,
            Self::BigInt(_) => Type::Int,
            #[cfg(feature = "float")]
            Self::Complex(_) => Type::Complex,
            Self::List(_) => Type::List,
            Self::Tuple(_) => Type::Tuple,
            Self::Dict(_) => Type::Dict,
            Self::Set(_) => Type::Set,
            Self::Range(_) => Type::Range,
            Self::Cell(_) => Type::Cell,
            Self::Function(_) | Self::Closure(_) => Type::Function,
            Self::BoundMethod(_) => Type::BoundMethod,
            Self::StaticMethod(_) => Type::StaticMethod,
            Self::ClassMethod(_) => Type::ClassMethod,
            Self::Generator(_) => Type::Generator,
            Self::Iter(_) => Type::Iterator,
            Self::Class(_) => Type::Type,
            Self::Instance(_) => Type::Instance,
            Self::Exception(_) => Type::Exception,
            Self::Namespace(_) => Type::Namespace,
            Self::Module(_) => Type::Module,
        }
    }

    /// Truthiness of a heap object: containers by emptiness, zero big ints
    /// false (they only arise transiently), everything else true.
    #[must_use]
    pub fn is_true(&self) -> bool {
        use num_traits::Zero;
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::BigInt(b) => !b.is_zero(),
            Self::List(l) => !l.is_empty(),
            Self::Tuple(t) => !t.is_empty(),
            Self::Dict(d) => !d.is_empty(),
            Self::Set(s) => !s.is_empty(),
            Self::Range(r) => r.len() != 0,
            #[cfg(feature = "float")]
            Self::Complex(c) => c.real != 0.0 || c.imag != 0.0,
            _ => true,
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "Str",
            Self::BigInt(_) => "BigInt",
            #[cfg(feature = "float")]
            Self::Complex(_) => "Complex",
            Self::List(_) => "List",
            Self::Tuple(_) => "Tuple",
            Self::Dict(_) => "Dict",
            Self::Set(_) => "Set",
            Self::Range(_) => "Range",
            Self::Cell(_) => "Cell",
            Self::Function(_) => "Function",
            Self::Closure(_) => "Closure",
            Self::BoundMethod(_) => "BoundMethod",
            Self::StaticMethod(_) => "StaticMethod",
            Self::ClassMethod(_) => "ClassMethod",
            Self::Generator(_) => "Generator",
            Self::Iter(_) => "Iter",
            Self::Class(_) => "Class",
            Self::Instance(_) => "Instance",
            Self::Exception(_) => "Exception",
            Self::Namespace(_) => "Namespace",
            Self::Module(_) => "Module",
        }
    }
}

/// Snapshot of heap state at a point in time.
///
/// The `objects_by_type` map uses `BTreeMap` for deterministic iteration
/// order, making snapshots suitable for display and comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapStats {
    /// Total number of objects on the heap.
    pub live_objects: usize,
    /// Breakdown of objects by `HeapData` variant name.
    pub objects_by_type: BTreeMap<&'static str, usize>,
}

/// Grow-only arena of heap objects.
///
/// The memory allocator and collector are out of scope at this layer: the
/// core never frees, so slots are appended and ids stay valid for the
/// process lifetime.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Heap {
    slots: Vec<HeapData>,
}

impl Heap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new heap object, returning its id.
    pub fn allocate(&mut self, data: HeapData) -> HeapId {
        let id = HeapId(u32::try_from(self.slots.len()).expect("heap arena overflow"));
        self.slots.push(data);
        id
    }

    /// Allocates a new heap object, returning it as a `Value`.
    pub fn alloc_value(&mut self, data: HeapData) -> Value {
        Value::Ref(self.allocate(data))
    }

    /// # Panics
    /// Panics if `id` was not produced by this heap.
    #[must_use]
    pub fn get(&self, id: HeapId) -> &HeapData {
        &self.slots[id.index()]
    }

    /// # Panics
    /// Panics if `id` was not produced by this heap.
    pub fn get_mut(&mut self, id: HeapId) -> &mut HeapData {
        &mut self.slots[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Captures object counts by variant for monitoring heap growth.
    #[must_use]
    pub fn stats(&self) -> HeapStats {
        let mut objects_by_type: BTreeMap<&'static str, usize> = BTreeMap::new();
        for slot in &self.slots {
            *objects_by_type.entry(slot.variant_name()).or_insert(0) += 1;
        }
        HeapStats {
            live_objects: self.slots.len(),
            objects_by_type,
        }
    }
}
