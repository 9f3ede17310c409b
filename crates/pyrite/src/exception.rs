use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Result type alias for operations that can raise a Python exception.
pub type RunResult<T> = Result<T, SimpleException>;

/// Exception kinds known to the runtime core.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `Into<&'static str>`
/// implementations. The string representation matches the variant name exactly
/// (e.g., `ValueError` -> "ValueError").
///
/// The kinds published in the builtins namespace at init are the nine listed by
/// the bootstrap; `StopIteration`, `ImportError`, and `ZeroDivisionError` exist
/// as kinds raised by core operations but are not published as names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum ExcType {
    AssertionError,
    AttributeError,
    ImportError,
    IndexError,
    KeyError,
    NameError,
    OSError,
    StopIteration,
    SyntaxError,
    TypeError,
    ValueError,
    ZeroDivisionError,
}

impl ExcType {
    /// Whether an exception of kind `self` is caught by a handler for `handler`.
    ///
    /// Kind identity only; the core's taxonomy is flat.
    #[must_use]
    pub fn matches(self, handler: Self) -> bool {
        self == handler
    }

    pub(crate) fn type_error(msg: impl Into<String>) -> SimpleException {
        SimpleException::new_msg(Self::TypeError, msg)
    }

    pub(crate) fn value_error(msg: impl Into<String>) -> SimpleException {
        SimpleException::new_msg(Self::ValueError, msg)
    }

    /// The `NameError` raised when the L->G->B lookup chain is exhausted.
    pub(crate) fn name_error(name: &str) -> SimpleException {
        SimpleException::new_msg(Self::NameError, format!("name '{name}' is not defined"))
    }

    pub(crate) fn attribute_error(type_name: &str, attr: &str) -> SimpleException {
        SimpleException::new_msg(
            Self::AttributeError,
            format!("'{type_name}' object has no attribute '{attr}'"),
        )
    }

    /// `AttributeError` variant used when the base is itself a type object.
    pub(crate) fn type_attribute_error(class_name: &str, attr: &str) -> SimpleException {
        SimpleException::new_msg(
            Self::AttributeError,
            format!("type object '{class_name}' has no attribute '{attr}'"),
        )
    }

    pub(crate) fn not_callable(type_name: &str) -> SimpleException {
        SimpleException::new_msg(Self::TypeError, format!("'{type_name}' object is not callable"))
    }

    pub(crate) fn not_iterable(type_name: &str) -> SimpleException {
        SimpleException::new_msg(Self::TypeError, format!("'{type_name}' object is not iterable"))
    }

    pub(crate) fn not_an_iterator(type_name: &str) -> SimpleException {
        SimpleException::new_msg(Self::TypeError, format!("'{type_name}' object is not an iterator"))
    }

    pub(crate) fn zero_division(msg: &'static str) -> SimpleException {
        SimpleException::new_msg(Self::ZeroDivisionError, msg)
    }

    /// Arity mismatch for fixed-arity callables.
    pub(crate) fn arg_count(name: &str, expected: usize, got: usize) -> SimpleException {
        SimpleException::new_msg(
            Self::TypeError,
            format!("{name}() takes {expected} positional arguments but {got} were given"),
        )
    }
}

/// A raised exception: a kind tag plus an optional formatted message.
///
/// Exceptions are first-class values; the heap stores instances of this same
/// struct, so raising a caught-and-reraised exception value is a clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimpleException {
    exc_type: ExcType,
    message: Option<String>,
}

impl SimpleException {
    pub fn new(exc_type: ExcType) -> Self {
        Self { exc_type, message: None }
    }

    pub fn new_msg(exc_type: ExcType, message: impl Into<String>) -> Self {
        Self {
            exc_type,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Writes the Python repr of this exception instance, e.g. `ValueError('boom')`.
    pub(crate) fn repr_fmt(&self, f: &mut impl fmt::Write) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}({msg:?})", self.exc_type),
            None => write!(f, "{}()", self.exc_type),
        }
    }
}

impl Display for SimpleException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {msg}", self.exc_type),
            None => write!(f, "{}", self.exc_type),
        }
    }
}
