//! Sable compiler core
//!
//! This crate holds the state shared by every phase of the sable type
//! checker: the interned name table, local variable identity, the
//! append-only diagnostic queue, and the telemetry sink. Phases receive
//! all of it through a small copyable [`Context`].

pub mod context;
pub mod counters;
pub mod diagnostics;
pub mod locals;
pub mod names;

pub use context::Context;
pub use counters::Counters;
pub use diagnostics::{Diagnostic, ErrorQueue, Level};
pub use locals::LocalVariable;
pub use names::{NameId, NameTable};
