use serde::{Deserialize, Serialize};

use crate::{heap::HeapId, value::Value};

/// State of an in-progress iteration over a builtin container.
///
/// The iterator holds a handle plus a cursor rather than borrowed data, so
/// the underlying container may be mutated between steps (index-based
/// cursors follow CPython's list-iterator behavior there). Stepping logic
/// lives in `Runtime::iternext`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Iter {
    /// Iteration over a list or tuple by index.
    Seq { seq: HeapId, index: usize },
    /// Iteration over the characters of a string.
    Str { source: Value, index: usize },
    /// Iteration over an arithmetic progression.
    Range { next: i64, stop: i64, step: i64 },
    /// Iteration over a dict's keys, by slot index.
    Dict { dict: HeapId, index: usize },
    /// Iteration over a set's elements, by slot index.
    Set { set: HeapId, index: usize },
}
