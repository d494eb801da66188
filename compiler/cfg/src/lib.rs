//! Sable control-flow graphs
//!
//! This crate defines the control-flow graph the sable type checker
//! infers over, and the finalization pipeline that rewrites a freshly
//! lowered graph into inference-ready form: redundant edges
//! simplified, alias chains eliminated, loop headers discovered, dead
//! stores pruned, loop-nesting bounds computed, and per-block phi
//! arguments filled in.
//!
//! The front-end lowers one method body into a raw [`Cfg`]; calling
//! [`finalize`] completes it. Passes are exported individually as
//! well, in the order [`finalize`] runs them.

pub mod block_args;
pub mod builder;
pub mod cfg;
pub mod dealias;
pub mod finalize;
pub mod instruction;
pub mod liveness;
pub mod loops;
pub mod simplify;
pub mod topo;

pub use builder::CfgBuilder;
pub use cfg::{BasicBlock, BlockExit, BlockFlags, BlockId, Cfg, ReadsAndWrites};
pub use finalize::finalize;
pub use instruction::{Binding, Instruction};
