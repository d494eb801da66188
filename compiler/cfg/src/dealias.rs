//! Alias-chain elimination.
//!
//! Lowering an expression like `a.foo(a = "2", ...)` binds the receiver
//! into a synthetic temporary before the argument reassigns `a`; the
//! temporary then denotes the old `a`. This pass rewrites reads of such
//! temporaries back to the variable they denote, per block, flowing
//! alias maps along the backward topological order.

use crate::cfg::Cfg;
use crate::instruction::Instruction;
use rustc_hash::FxHashMap;
use sable_core::{Context, LocalVariable};

/// Rewrites `what` through the alias map. Only synthetic temporaries
/// are rewritten; user-visible variables always denote themselves.
fn maybe_dealias(
    ctx: Context<'_>,
    what: LocalVariable,
    aliases: &FxHashMap<LocalVariable, LocalVariable>,
) -> LocalVariable {
    if what.is_synthetic_temporary(ctx.names) {
        aliases.get(&what).copied().unwrap_or(what)
    } else {
        what
    }
}

/// Replaces temporary-variable reads with their originating variable.
///
/// Each block's entry map is the meet over its predecessors' out-maps:
/// a key survives only if every predecessor agrees on its value.
/// Predecessors not yet visited (loop back edges) contribute an empty
/// map, which drops every key at a loop header; correct, though more
/// conservative than necessary there.
pub fn dealias(ctx: Context<'_>, cfg: &mut Cfg) {
    let mut out_aliases: Vec<FxHashMap<LocalVariable, LocalVariable>> =
        vec![FxHashMap::default(); cfg.num_blocks()];
    let order = cfg.backwards_topo_sort.clone();
    let dead = cfg.dead();

    for bb in order {
        if bb == dead {
            continue;
        }

        let back_edges = cfg.block(bb).back_edges.clone();
        let mut current = match back_edges.first() {
            Some(&first) => out_aliases[first.index()].clone(),
            None => FxHashMap::default(),
        };
        for &parent in &back_edges {
            let other = &out_aliases[parent.index()];
            current.retain(|k, v| other.get(k) == Some(v));
        }

        let block = cfg.block_mut(bb);
        for binding in &mut block.exprs {
            if let Instruction::Ident(what) = &mut binding.value {
                *what = maybe_dealias(ctx, *what, &current);
            }
            // The target was just reassigned: any alias denoting it is
            // stale from here on.
            current.retain(|_, v| *v != binding.bind);
            match &mut binding.value {
                Instruction::Ident(what) => {
                    *what = maybe_dealias(ctx, *what, &current);
                }
                Instruction::Send { recv, args, .. } => {
                    *recv = maybe_dealias(ctx, *recv, &current);
                    for arg in args {
                        *arg = maybe_dealias(ctx, *arg, &current);
                    }
                }
                Instruction::Return(what) => {
                    *what = maybe_dealias(ctx, *what, &current);
                }
                _ => {}
            }
            if let Instruction::Ident(what) = &binding.value {
                current.insert(binding.bind, *what);
            }
        }
        if let Some(cond) = block.bexit.cond {
            block.bexit.cond = Some(maybe_dealias(ctx, cond, &current));
        }

        out_aliases[bb.index()] = current;
    }
}
