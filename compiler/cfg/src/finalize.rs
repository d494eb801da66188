//! The finalization pipeline.
//!
//! Runs the passes in their fixed order over a freshly lowered graph.
//! After [`finalize`] returns the graph is in the form flow-sensitive
//! type inference consumes: simplified, dealiased, dead stores pruned,
//! both topological orders populated, loop headers flagged, loop
//! bounds computed, and block arguments filled in. The caller treats
//! the graph as immutable from then on.
//!
//! Finalization is single-threaded per graph and never suspends;
//! parallelism lives a level up, where distinct method bodies are
//! dispatched to workers, each owning its graph outright.

use crate::block_args::fill_in_block_arguments;
use crate::cfg::Cfg;
use crate::dealias::dealias;
use crate::liveness::{collect_reads_writes, remove_dead_assigns};
use crate::loops::{compute_min_max_loops, mark_loop_headers};
use crate::simplify::simplify;
use crate::topo::{topo_sort_bwd, topo_sort_fwd};
use sable_core::Context;

/// Rewrites a raw CFG into its finalized form, in place.
///
/// The input must satisfy the front-end contract: back edges
/// populated and symmetric, lower-nesting predecessors listed first,
/// every live block reachable from the entry.
pub fn finalize(ctx: Context<'_>, cfg: &mut Cfg) {
    simplify(ctx, cfg);
    topo_sort_fwd(cfg);
    topo_sort_bwd(cfg);
    mark_loop_headers(cfg);
    dealias(ctx, cfg);

    // Dealiasing rewrote operands, so the read/write sets are computed
    // only now. Removing dead assigns leaves stale write entries
    // behind, but those variables have no reads and fall out of the
    // argument computation on their own.
    let mut rnw = collect_reads_writes(ctx, cfg);
    remove_dead_assigns(ctx, &rnw, cfg);
    compute_min_max_loops(&rnw, cfg);
    fill_in_block_arguments(ctx, &mut rnw, cfg);

    cfg.sanity_check(ctx);
}
