//! String interning for namespace keys and attribute names.
//!
//! Names used by the runtime (variable names, attribute names, method names)
//! are interned short strings called qstrs. Equality of qstrs is id equality,
//! which makes namespace lookups and attribute dispatch cheap.
//!
//! Qstr ids are laid out as follows:
//! * 0 to 128 - single character strings for all 128 ASCII characters
//! * 1000 to 1000+count(StaticStrings) - pre-interned static names
//! * 10_000+ - strings interned per runtime

use std::sync::LazyLock;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use strum::{EnumString, FromRepr, IntoStaticStr};

/// An interned string id.
///
/// Uses `u32` to save space; equality is identity. To get the actual string
/// content, use `Interns::get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Qstr(u32);

/// Qstr id offsets for the three regions.
const STATIC_STRING_ID_OFFSET: u32 = 1000;
const DYNAMIC_STRING_ID_OFFSET: u32 = 10_000;

impl Qstr {
    /// Returns the qstr for a single ASCII character.
    #[must_use]
    pub fn from_ascii(byte: u8) -> Self {
        debug_assert!(byte < 128, "qstr ASCII region covers 0..128");
        Self(u32::from(byte))
    }

    #[inline]
    #[must_use]
    pub(crate) fn index(self) -> u32 {
        self.0
    }
}

impl From<StaticStrings> for Qstr {
    fn from(s: StaticStrings) -> Self {
        Self(STATIC_STRING_ID_OFFSET + s as u32)
    }
}

/// Static strings for all 128 ASCII characters, built once on first access.
///
/// The strings are leaked to obtain `'static` lifetime; the leak is bounded
/// (128 single-byte strings).
static ASCII_STRS: LazyLock<[&'static str; 128]> = LazyLock::new(|| {
    std::array::from_fn(|i| {
        let s = char::from(u8::try_from(i).expect("index out of u8 range")).to_string();
        &*Box::leak(s.into_boxed_str())
    })
});

/// Names known at compile time which don't need to be interned dynamically.
///
/// Covers the dunder names the runtime consults, the builtin type method
/// names, and the names published by the builtins bootstrap.
#[repr(u16)]
#[derive(
    Debug, Clone, Copy, FromRepr, EnumString, IntoStaticStr, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum StaticStrings {
    #[strum(serialize = "")]
    EmptyString,
    #[strum(serialize = "__main__")]
    DunderMain,
    #[strum(serialize = "__name__")]
    DunderName,
    #[strum(serialize = "__init__")]
    DunderInit,
    #[strum(serialize = "__next__")]
    DunderNext,
    #[strum(serialize = "__import__")]
    DunderImport,
    #[strum(serialize = "__build_class__")]
    DunderBuildClass,
    #[strum(serialize = "__repl_print__")]
    DunderReplPrint,

    // ==========================
    // List methods
    // Also uses shared: Pop, Clear, Copy, Remove, Count, Index
    Append,
    Insert,
    Extend,
    Reverse,

    // ==========================
    // Dict methods
    // Also uses shared: Pop, Clear, Copy, Update
    Get,
    Keys,
    Values,
    Items,
    Setdefault,
    Fromkeys,

    // ==========================
    // Set methods
    // Also uses shared: Pop, Clear, Copy, Update, Remove
    Add,
    Discard,
    Union,
    Intersection,
    Difference,

    // ==========================
    // String methods
    Lower,
    Upper,
    Startswith,
    Endswith,

    // ==========================
    // Shared methods
    Pop,
    Clear,
    Copy,
    Remove,
    Count,
    Index,
    Update,
}

/// Storage for interned strings.
///
/// Pre-interned content (ASCII characters and `StaticStrings`) is resolved
/// without touching the dynamic table; dynamic interns are deduplicated via
/// a reverse index.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Interns {
    dynamic: Vec<String>,
    reverse: AHashMap<String, u32>,
}

impl Interns {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string, returning its qstr.
    ///
    /// Single ASCII characters and static names resolve to their fixed ids;
    /// everything else lands in (or is found in) the dynamic region.
    pub fn intern(&mut self, s: &str) -> Qstr {
        if s.len() == 1 {
            let byte = s.as_bytes()[0];
            if byte < 128 {
                return Qstr::from_ascii(byte);
            }
        }
        if let Ok(static_str) = s.parse::<StaticStrings>() {
            return static_str.into();
        }
        if let Some(&idx) = self.reverse.get(s) {
            return Qstr(DYNAMIC_STRING_ID_OFFSET + idx);
        }
        let idx = u32::try_from(self.dynamic.len()).expect("intern table overflow");
        self.dynamic.push(s.to_owned());
        self.reverse.insert(s.to_owned(), idx);
        Qstr(DYNAMIC_STRING_ID_OFFSET + idx)
    }

    /// Returns the string content for a qstr.
    ///
    /// # Panics
    /// Panics if the qstr does not belong to this interner (a programming
    /// error: qstrs are only minted by `intern` and the static regions).
    #[must_use]
    pub fn get(&self, q: Qstr) -> &str {
        let id = q.index();
        if id < 128 {
            return ASCII_STRS[id as usize];
        }
        if id >= DYNAMIC_STRING_ID_OFFSET {
            return &self.dynamic[(id - DYNAMIC_STRING_ID_OFFSET) as usize];
        }
        let static_str = StaticStrings::from_repr(
            u16::try_from(id - STATIC_STRING_ID_OFFSET).expect("static qstr id out of range"),
        )
        .expect("invalid static qstr id");
        static_str.into()
    }

    /// Number of dynamically interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dynamic.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dynamic.is_empty()
    }
}
