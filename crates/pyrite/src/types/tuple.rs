use serde::{Deserialize, Serialize};

use crate::value::Value;

/// An immutable sequence of values.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Tuple(Vec<Value>);

impl Tuple {
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self(items)
    }

    /// Builds a tuple from stack-popped items: the input is in reverse order
    /// (last item first), the tuple presents source order.
    #[must_use]
    pub fn from_reverse(mut items: Vec<Value>) -> Self {
        items.reverse();
        Self(items)
    }

    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
