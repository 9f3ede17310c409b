use serde::{Deserialize, Serialize};

use crate::{heap::HeapId, intern::Qstr, namespace::Namespace, value::Value};

/// A user-defined class built by `__build_class__` (or a direct metaclass
/// call).
///
/// The class dict is the namespace the class body executed in; it is shared,
/// not copied, so later `store_attr` on the class is visible to instances.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassObject {
    pub name: Qstr,
    /// Base classes in declaration order. Attribute lookup walks these
    /// depth-first; metaclass resolution only consults the first.
    pub bases: Vec<Value>,
    /// Heap handle of the class namespace.
    pub ns: HeapId,
}

/// An instance of a user-defined class.
#[derive(Debug, Serialize, Deserialize)]
pub struct Instance {
    pub class: HeapId,
    pub attrs: Namespace,
}

/// A function paired with the `self` it was looked up on.
///
/// Calling a bound method prepends `self_val` as the leading positional
/// argument and delegates to `fun`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundMethod {
    pub self_val: Value,
    pub fun: Value,
}
