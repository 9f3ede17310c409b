//! Pluggable tracing of runtime dispatch.
//!
//! The debug printf lines of a classic interpreter become structured trace
//! events here: install a [`VmTracer`] on the runtime to observe name
//! resolution, operator dispatch, and calls without recompiling.

use crate::{
    ops::{BinaryOp, UnaryOp},
    types::Type,
};

/// One dispatch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    LoadName { name: &'a str },
    StoreName { name: &'a str },
    UnaryOp { op: UnaryOp },
    BinaryOp { op: BinaryOp },
    Call { n_args: usize, n_kw: usize },
    LoadAttr { type_of_base: Type, attr: &'a str },
    GetIter { type_of_base: Type },
    IterNext,
}

/// Observer of runtime dispatch events.
pub trait VmTracer {
    fn trace(&mut self, event: TraceEvent<'_>);
}

/// Tracer that discards all events. The default.
#[derive(Debug, Default)]
pub struct NoopTracer;

impl VmTracer for NoopTracer {
    fn trace(&mut self, _event: TraceEvent<'_>) {}
}

/// Tracer that prints every event to stderr.
#[derive(Debug, Default)]
pub struct StderrTracer;

impl VmTracer for StderrTracer {
    fn trace(&mut self, event: TraceEvent<'_>) {
        eprintln!("trace: {event:?}");
    }
}

/// Tracer that records events for later inspection, mainly from tests.
///
/// The event log is shared so the runtime can own the tracer while the
/// caller keeps a reading handle.
#[derive(Debug, Default, Clone)]
pub struct RecordingTracer(std::rc::Rc<std::cell::RefCell<Vec<String>>>);

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded event log.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl VmTracer for RecordingTracer {
    fn trace(&mut self, event: TraceEvent<'_>) {
        self.0.borrow_mut().push(format!("{event:?}"));
    }
}
