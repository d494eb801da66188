//! The per-phase context.

use crate::counters::Counters;
use crate::diagnostics::ErrorQueue;
use crate::names::NameTable;

/// Shared read-mostly state handed to every checker phase.
///
/// The context is a small copyable bundle of borrows. The name table is
/// read-only for the duration of a phase; the error queue and telemetry
/// sink are the only shared-mutable members and are internally
/// synchronized, so contexts can be handed to workers finalizing
/// distinct method bodies in parallel.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// Interned names and the reserved-name predicates.
    pub names: &'a NameTable,
    /// Append-only diagnostic queue.
    pub errors: &'a ErrorQueue,
    /// Telemetry sink.
    pub counters: &'a Counters,
    /// Gates the internal consistency assertions.
    pub debug_mode: bool,
}

impl<'a> Context<'a> {
    /// Creates a context over the given shared state.
    pub fn new(names: &'a NameTable, errors: &'a ErrorQueue, counters: &'a Counters) -> Self {
        Self {
            names,
            errors,
            counters,
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Returns a copy with `debug_mode` forced on. Used by tests that
    /// exercise the consistency assertions.
    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }
}
