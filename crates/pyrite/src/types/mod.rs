//! Type discrimination and the minimal concrete objects.
//!
//! `Type` is the per-process type discriminator consulted by the dispatch
//! layer; the operation slots of the source's type descriptors map to the
//! capability checks in `runtime.rs` / `ops.rs`, and the ordered method
//! tables live here as `&'static [MethodDef]` slices. The concrete objects
//! (list, dict, tuple, ...) are deliberately minimal: the core specifies the
//! dispatch contract each type satisfies, not full library behavior.

pub mod class;
pub mod dict;
pub mod iter;
pub mod list;
pub mod module;
pub mod range;
pub mod set;
pub mod str;
pub mod tuple;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

pub(crate) use class::{BoundMethod, ClassObject, Instance};
pub(crate) use dict::{Dict, DictKey};
pub(crate) use iter::Iter;
pub(crate) use list::List;
pub(crate) use module::Module;
pub(crate) use range::Range;
pub(crate) use set::Set;
pub(crate) use tuple::Tuple;

use crate::intern::StaticStrings;

/// The runtime type of a value.
///
/// The `Display` form is the printable name used in error messages
/// ("'int' object is not callable"). Instances of user classes report their
/// class name through `Runtime::type_name`, not through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum Type {
    #[strum(serialize = "NoneType")]
    NoneType,
    Ellipsis,
    Bool,
    Int,
    Float,
    Complex,
    Str,
    List,
    Tuple,
    Dict,
    Set,
    Range,
    Function,
    #[strum(serialize = "builtin_function_or_method")]
    BuiltinFunction,
    #[strum(serialize = "bound_method")]
    BoundMethod,
    StaticMethod,
    ClassMethod,
    Cell,
    Generator,
    Iterator,
    Type,
    /// Instances of user-defined classes; error messages substitute the
    /// class name for this.
    #[strum(serialize = "object")]
    Instance,
    #[strum(serialize = "Exception")]
    Exception,
    Namespace,
    Module,
}

/// How a method-table entry binds when looked up on an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Bound with `self = base`.
    Instance,
    /// Returned unbound.
    Static,
    /// Bound with `self = type_of(base)`.
    Class,
}

/// One entry in a builtin type's ordered method table.
///
/// The table order is the resolution order, so lookups are deterministic.
#[derive(Debug, Clone, Copy)]
pub struct MethodDef {
    pub name: StaticStrings,
    pub kind: MethodKind,
}

const fn instance(name: StaticStrings) -> MethodDef {
    MethodDef {
        name,
        kind: MethodKind::Instance,
    }
}

static LIST_METHODS: &[MethodDef] = &[
    instance(StaticStrings::Append),
    instance(StaticStrings::Extend),
    instance(StaticStrings::Insert),
    instance(StaticStrings::Pop),
    instance(StaticStrings::Remove),
    instance(StaticStrings::Reverse),
    instance(StaticStrings::Clear),
    instance(StaticStrings::Copy),
    instance(StaticStrings::Count),
    instance(StaticStrings::Index),
];

static DICT_METHODS: &[MethodDef] = &[
    instance(StaticStrings::Get),
    instance(StaticStrings::Keys),
    instance(StaticStrings::Values),
    instance(StaticStrings::Items),
    instance(StaticStrings::Pop),
    instance(StaticStrings::Clear),
    instance(StaticStrings::Copy),
    instance(StaticStrings::Update),
    instance(StaticStrings::Setdefault),
    MethodDef {
        name: StaticStrings::Fromkeys,
        kind: MethodKind::Class,
    },
];

static SET_METHODS: &[MethodDef] = &[
    instance(StaticStrings::Add),
    instance(StaticStrings::Remove),
    instance(StaticStrings::Discard),
    instance(StaticStrings::Pop),
    instance(StaticStrings::Clear),
    instance(StaticStrings::Copy),
    instance(StaticStrings::Union),
    instance(StaticStrings::Intersection),
    instance(StaticStrings::Difference),
    instance(StaticStrings::Update),
];

static STR_METHODS: &[MethodDef] = &[
    instance(StaticStrings::Lower),
    instance(StaticStrings::Upper),
    instance(StaticStrings::Startswith),
    instance(StaticStrings::Endswith),
];

impl Type {
    /// The ordered method table for this builtin type; empty when the type
    /// has none.
    #[must_use]
    pub(crate) fn method_table(self) -> &'static [MethodDef] {
        match self {
            Self::List => LIST_METHODS,
            Self::Dict => DICT_METHODS,
            Self::Set => SET_METHODS,
            Self::Str => STR_METHODS,
            _ => &[],
        }
    }
}

/// A complex number value.
#[cfg(feature = "float")]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub real: f64,
    pub imag: f64,
}
