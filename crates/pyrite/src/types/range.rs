use serde::{Deserialize, Serialize};

/// An arithmetic progression, as produced by the `range` builtin.
///
/// `step` is never zero; the constructor path rejects that with
/// `ValueError` before a range is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl Range {
    #[must_use]
    pub fn new(start: i64, stop: i64, step: i64) -> Self {
        debug_assert!(step != 0, "range step must be rejected before construction");
        Self { start, stop, step }
    }

    /// Number of elements in the progression.
    #[must_use]
    pub fn len(&self) -> usize {
        let span = if self.step > 0 {
            self.stop.saturating_sub(self.start)
        } else {
            self.start.saturating_sub(self.stop)
        };
        if span <= 0 {
            return 0;
        }
        let step = self.step.unsigned_abs();
        (span as u64).div_ceil(step) as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
