use serde::{Deserialize, Serialize};

use crate::{heap::HeapId, intern::Qstr};

/// A module object as produced by the host's import hook.
///
/// The core itself never creates modules; it only reads and writes their
/// attributes through the attribute protocol (`import_from` is `load_attr`
/// with the error kind converted).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Module {
    pub name: Qstr,
    pub ns: HeapId,
}
