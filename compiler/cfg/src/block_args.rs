//! Block-argument computation.
//!
//! A variable must be passed into a block in phi position iff it could
//! be written before the block AND could be read at or after it. Exact
//! per-variable liveness is more than type inference needs; instead two
//! cheap over-approximations are computed and intersected:
//!
//!  - a forward fixed point accumulating reads over the successor
//!    graph: everything read by the block or anything reachable from it,
//!  - a backward fixed point accumulating writes over the predecessor
//!    graph: everything written by the block or anything before it.
//!
//! Each bound is linear per iteration, and the iteration counts stay
//! small because method graphs are small.

use crate::cfg::{Cfg, ReadsAndWrites};
use rustc_hash::FxHashSet;
use sable_core::{Context, LocalVariable};

/// Populates every live block's `args` from the read/write sets.
///
/// The read/write sets are consumed destructively: variables that
/// never escape their block, reads with no writes, and writes with no
/// reads are cleared out before the bounds are computed.
pub fn fill_in_block_arguments(ctx: Context<'_>, rnw: &mut ReadsAndWrites, cfg: &mut Cfg) {
    let n = cfg.num_blocks();
    let mut reads_by_block: Vec<FxHashSet<LocalVariable>> = vec![FxHashSet::default(); n];
    let mut writes_by_block: Vec<FxHashSet<LocalVariable>> = vec![FxHashSet::default(); n];

    let ReadsAndWrites { reads, writes } = rnw;
    for (var, rds) in reads.iter_mut() {
        let wts = writes.entry(*var).or_default();
        ctx.counters.histogram_inc("cfg.reads_per_var", rds.len());
        if rds.len() == 1 && wts.len() == 1 && rds.iter().next() == wts.iter().next() {
            // Written and read only inside one block: never escapes.
            wts.clear();
            rds.clear();
        } else if wts.is_empty() {
            // An uninitialized read propagates undefined, not an
            // argument.
            rds.clear();
        }
    }
    for (var, wts) in writes.iter_mut() {
        ctx.counters.histogram_inc("cfg.writes_per_var", wts.len());
        let rds = reads.entry(*var).or_default();
        if rds.is_empty() {
            wts.clear();
        }
        for &bb in rds.iter() {
            reads_by_block[bb.index()].insert(*var);
        }
        for &bb in wts.iter() {
            writes_by_block[bb.index()].insert(*var);
        }
    }

    let dead = cfg.dead();

    // Upper bound 1: reads accumulated over the forward graph. The
    // forward sort lists successors first, so most of the flow settles
    // in one sweep.
    let mut upper_bounds1: Vec<FxHashSet<LocalVariable>> = vec![FxHashSet::default(); n];
    let order = cfg.forwards_topo_sort.clone();
    let mut changed = true;
    while changed {
        changed = false;
        for &bb in &order {
            let before = upper_bounds1[bb.index()].len();
            let mut acc = std::mem::take(&mut upper_bounds1[bb.index()]);
            acc.extend(reads_by_block[bb.index()].iter().copied());
            let bexit = cfg.block(bb).bexit;
            if bexit.thenb != dead {
                acc.extend(upper_bounds1[bexit.thenb.index()].iter().copied());
            }
            if bexit.elseb != dead {
                acc.extend(upper_bounds1[bexit.elseb.index()].iter().copied());
            }
            changed |= acc.len() != before;
            upper_bounds1[bb.index()] = acc;
        }
    }

    // Upper bound 2: writes accumulated over the backward graph, in
    // the loop-aware backward order so loop bodies see their header's
    // writes early.
    let mut upper_bounds2: Vec<FxHashSet<LocalVariable>> = vec![FxHashSet::default(); n];
    let order = cfg.backwards_topo_sort.clone();
    changed = true;
    while changed {
        changed = false;
        for &bb in &order {
            let before = upper_bounds2[bb.index()].len();
            let mut acc = std::mem::take(&mut upper_bounds2[bb.index()]);
            acc.extend(writes_by_block[bb.index()].iter().copied());
            for &parent in &cfg.block(bb).back_edges {
                if parent != dead {
                    acc.extend(upper_bounds2[parent.index()].iter().copied());
                }
            }
            changed |= acc.len() != before;
            upper_bounds2[bb.index()] = acc;
        }
    }

    let ids = cfg.block_ids().to_vec();
    for bb in ids {
        let could_write = &upper_bounds2[bb.index()];
        let mut args: Vec<LocalVariable> = upper_bounds1[bb.index()]
            .iter()
            .filter(|var| could_write.contains(*var))
            .copied()
            .collect();
        args.sort_unstable_by_key(|var| (var.name, var.unique));
        ctx.counters.histogram_inc("cfg.block_arguments", args.len());
        cfg.block_mut(bb).args = args;
    }
}
