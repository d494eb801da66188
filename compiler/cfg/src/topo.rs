//! Topological orderings of the block graph.
//!
//! Two complementary orders are produced. The forward order is a plain
//! DFS post-order from the entry block. The backward order is not an
//! arbitrary reversal: the graph has cycles, so no true topological
//! sort exists, and the consumers need outer-loop predecessors ordered
//! before loop headers and loop headers before their bodies. Both
//! traversals use an explicit stack; deep method bodies must not be
//! able to exhaust the thread stack.

use crate::cfg::{BlockId, Cfg};

/// Fills `forwards_topo_sort` with a DFS post-order from the entry.
///
/// The then successor is explored before the else successor, and a
/// block is recorded after both. The output covers every block
/// reachable from the entry exactly once.
pub fn topo_sort_fwd(cfg: &mut Cfg) {
    let mut visited = vec![false; cfg.num_blocks()];
    let mut sort = Vec::with_capacity(cfg.block_ids().len());
    let mut stack: Vec<(BlockId, bool)> = vec![(cfg.entry(), false)];

    while let Some((bb, expanded)) = stack.pop() {
        if expanded {
            sort.push(bb);
            continue;
        }
        if visited[bb.index()] {
            continue;
        }
        visited[bb.index()] = true;
        stack.push((bb, true));
        let bexit = cfg.block(bb).bexit;
        // Pushed in reverse so the then branch is explored first.
        stack.push((bexit.elseb, false));
        stack.push((bexit.thenb, false));
    }

    cfg.forwards_topo_sort = sort;
}

/// One in-progress block of the backward traversal.
#[derive(Clone, Copy)]
struct Frame {
    block: BlockId,
    /// Next predecessor to explore.
    idx: usize,
    /// The leading run of strictly-lower-depth predecessors has been
    /// exhausted.
    outer_done: bool,
    emitted: bool,
}

impl Frame {
    fn new(block: BlockId) -> Self {
        Self {
            block,
            idx: 0,
            outer_done: false,
            emitted: false,
        }
    }
}

/// Fills `backwards_topo_sort` with the loop-aware backward ordering.
///
/// The traversal walks predecessor edges starting from the dead
/// sentinel, the sole sink. Each predecessor list leads with the
/// predecessors at strictly lower nesting depth (a front-end
/// obligation). Those are explored first; if any existed, the block is
/// a loop header and is recorded *before* its remaining
/// same-or-deeper predecessors, so loop bodies are ordered after the
/// header they belong to.
pub fn topo_sort_bwd(cfg: &mut Cfg) {
    let mut visited = vec![false; cfg.num_blocks()];
    let mut sort = Vec::with_capacity(cfg.block_ids().len());
    let start = cfg.dead();
    visited[start.index()] = true;
    let mut stack = vec![Frame::new(start)];

    while let Some(&Frame {
        block,
        idx,
        outer_done,
        emitted,
    }) = stack.last()
    {
        let preds = &cfg.block(block).back_edges;

        if !outer_done {
            if idx < preds.len() {
                let p = preds[idx];
                if cfg.block(p).outer_loops < cfg.block(block).outer_loops {
                    stack.last_mut().unwrap().idx += 1;
                    if !visited[p.index()] {
                        visited[p.index()] = true;
                        stack.push(Frame::new(p));
                    }
                    continue;
                }
            }
            let top = stack.last_mut().unwrap();
            top.outer_done = true;
            if idx > 0 {
                // At least one outer predecessor: this is a loop
                // header, recorded ahead of the loop body.
                sort.push(block);
                top.emitted = true;
            }
            continue;
        }

        if idx < preds.len() {
            let p = preds[idx];
            stack.last_mut().unwrap().idx += 1;
            if !visited[p.index()] {
                visited[p.index()] = true;
                stack.push(Frame::new(p));
            }
            continue;
        }

        if !emitted {
            sort.push(block);
        }
        stack.pop();
    }

    cfg.backwards_topo_sort = sort;
}
