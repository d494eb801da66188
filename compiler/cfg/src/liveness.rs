//! Per-variable read/write sets and dead-store removal.

use crate::cfg::{Cfg, ReadsAndWrites};
use sable_core::Context;

/// Collects, for every variable, the set of blocks reading it and the
/// set of blocks writing it. The exit condition counts as a read.
///
/// Passes that rewrite bindings invalidate the result; recomputation
/// is the caller's responsibility.
pub fn collect_reads_writes(ctx: Context<'_>, cfg: &Cfg) -> ReadsAndWrites {
    let mut rnw = ReadsAndWrites::default();
    for &bb in cfg.block_ids() {
        let block = cfg.block(bb);
        ctx.counters
            .histogram_inc("cfg.bindings_per_block", block.exprs.len());
        for binding in &block.exprs {
            rnw.writes.entry(binding.bind).or_default().insert(bb);
            binding.value.for_each_operand(|operand| {
                rnw.reads.entry(operand).or_default().insert(bb);
            });
        }
        if let Some(cond) = block.bexit.cond {
            rnw.reads.entry(cond).or_default().insert(bb);
        }
    }
    rnw
}

/// Erases bindings whose result is never read.
///
/// Only side-effect-free instruction tags are candidates; a `Send` or
/// `Return` always stays. Bindings whose target aliases a module-level
/// global are never dead: the store is observable elsewhere.
pub fn remove_dead_assigns(ctx: Context<'_>, rnw: &ReadsAndWrites, cfg: &mut Cfg) {
    let ids = cfg.block_ids().to_vec();
    for bb in ids {
        let names = ctx.names;
        cfg.block_mut(bb).exprs.retain(|binding| {
            if binding.bind.is_alias_for_global(names) {
                return true;
            }
            if rnw.reads.contains_key(&binding.bind) {
                return true;
            }
            !binding.value.is_side_effect_free()
        });
    }
}
