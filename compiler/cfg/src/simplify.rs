//! Graph simplification.
//!
//! Scans the block list to a fixed point, applying four rewrites per
//! block: unreachable removal, merging a sole-predecessor unconditional
//! successor, bypassing an empty successor, and shortcutting empty
//! unconditional trampolines out of either branch arm. Back-edge lists
//! are kept deduped and sorted by id along the way.
//!
//! Blocks whose exit condition carries the reserved block-call marker
//! are protected block headers and are never bypassed.

use crate::cfg::{BasicBlock, BlockId, Cfg};
use sable_core::Context;

/// True if the block's exit is the protected block-call header form.
fn exit_is_block_header(ctx: Context<'_>, block: &BasicBlock) -> bool {
    block
        .bexit
        .cond
        .map_or(false, |cond| cond.name == ctx.names.block_call())
}

fn erase_back_edge(cfg: &mut Cfg, from: BlockId, of: BlockId) {
    cfg.block_mut(from).back_edges.retain(|&p| p != of);
}

/// Simplifies the graph in place until no rewrite applies.
///
/// Each rewrite strictly shrinks the block count or the edge distance
/// to the terminal blocks, so the scan converges. The entry block and
/// the dead sentinel are never rewritten away.
pub fn simplify(ctx: Context<'_>, cfg: &mut Cfg) {
    cfg.sanity_check(ctx);
    let mut changed = true;
    while changed {
        changed = false;
        let mut i = 0;
        while i < cfg.basic_blocks.len() {
            let bb = cfg.basic_blocks[i];
            let thenb = cfg.block(bb).bexit.thenb;
            let elseb = cfg.block(bb).bexit.elseb;
            let dead = cfg.dead();

            if bb != dead && bb != cfg.entry() {
                if cfg.block(bb).back_edges.is_empty() {
                    // Unreachable: unhook from the successors and drop.
                    erase_back_edge(cfg, thenb, bb);
                    if elseb != thenb {
                        erase_back_edge(cfg, elseb, bb);
                    }
                    cfg.remove_from_live_lists(bb);
                    changed = true;
                    cfg.sanity_check(ctx);
                    // The next block slid into position i.
                    continue;
                } else {
                    let back_edges = &mut cfg.block_mut(bb).back_edges;
                    back_edges.sort_unstable();
                    back_edges.dedup();
                }
            }

            if thenb == elseb && thenb != dead && thenb != bb {
                if cfg.block(thenb).back_edges.len() == 1 {
                    // Sole predecessor: squash the successor into bb.
                    let tail = std::mem::take(&mut cfg.block_mut(thenb).exprs);
                    cfg.block_mut(bb).exprs.extend(tail);
                    cfg.block_mut(thenb).back_edges.clear();
                    let texit = cfg.block(thenb).bexit;
                    cfg.block_mut(bb).bexit = texit;
                    cfg.block_mut(texit.thenb).back_edges.push(bb);
                    if texit.thenb != texit.elseb {
                        cfg.block_mut(texit.elseb).back_edges.push(bb);
                    }
                    changed = true;
                    cfg.sanity_check(ctx);
                    continue;
                } else if !exit_is_block_header(ctx, cfg.block(thenb))
                    && cfg.block(thenb).exprs.is_empty()
                {
                    // Empty successor with other predecessors: route
                    // around it. Block headers stay.
                    let texit = cfg.block(thenb).bexit;
                    cfg.block_mut(bb).bexit = texit;
                    erase_back_edge(cfg, thenb, bb);
                    cfg.block_mut(texit.thenb).back_edges.push(bb);
                    if texit.thenb != texit.elseb {
                        cfg.block_mut(texit.elseb).back_edges.push(bb);
                    }
                    changed = true;
                    cfg.sanity_check(ctx);
                    continue;
                }
            }

            if thenb != dead
                && cfg.block(thenb).exprs.is_empty()
                && cfg.block(thenb).bexit.is_unconditional()
                && cfg.block(bb).bexit.thenb != cfg.block(thenb).bexit.thenb
            {
                // Shortcut the then arm over an empty trampoline.
                let target = cfg.block(thenb).bexit.thenb;
                cfg.block_mut(bb).bexit.thenb = target;
                cfg.block_mut(target).back_edges.push(bb);
                erase_back_edge(cfg, thenb, bb);
                changed = true;
                cfg.sanity_check(ctx);
                continue;
            }
            if elseb != dead
                && cfg.block(elseb).exprs.is_empty()
                && cfg.block(elseb).bexit.is_unconditional()
                && cfg.block(bb).bexit.elseb != cfg.block(elseb).bexit.elseb
            {
                // Shortcut the else arm over an empty trampoline.
                let target = cfg.block(elseb).bexit.elseb;
                cfg.block_mut(bb).bexit.elseb = target;
                cfg.block_mut(target).back_edges.push(bb);
                erase_back_edge(cfg, elseb, bb);
                changed = true;
                cfg.sanity_check(ctx);
                continue;
            }

            i += 1;
        }
    }
}
