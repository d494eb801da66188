//! Construction helper for raw CFGs.
//!
//! The front-end hands the finalization pipeline a graph with exits set
//! and back edges populated, predecessors at strictly lower nesting
//! depth first. [`CfgBuilder`] produces graphs honoring that contract;
//! tests, the property generators, and the benchmarks assemble their
//! inputs through it.

use crate::cfg::{BlockExit, BlockId, Cfg};
use crate::instruction::{Binding, Instruction};
use sable_core::LocalVariable;

/// Assembles a [`Cfg`] in the shape the front-end would deliver.
pub struct CfgBuilder {
    cfg: Cfg,
}

impl CfgBuilder {
    /// Starts a graph with the entry block and the dead sentinel.
    pub fn new() -> Self {
        Self { cfg: Cfg::new() }
    }

    /// The entry block.
    pub fn entry(&self) -> BlockId {
        self.cfg.entry()
    }

    /// The dead sentinel sink.
    pub fn dead(&self) -> BlockId {
        self.cfg.dead()
    }

    /// Adds a block at the given loop-nesting depth.
    pub fn block(&mut self, outer_loops: u32) -> BlockId {
        self.cfg.alloc_block(outer_loops)
    }

    /// Appends `bind := value` to a block.
    pub fn bind(&mut self, block: BlockId, bind: LocalVariable, value: Instruction) {
        self.cfg
            .block_mut(block)
            .exprs
            .push(Binding::new(bind, value));
    }

    /// Sets an unconditional exit.
    pub fn branch(&mut self, from: BlockId, to: BlockId) {
        self.cfg.block_mut(from).bexit = BlockExit {
            cond: None,
            thenb: to,
            elseb: to,
        };
    }

    /// Sets a conditional exit.
    pub fn cond_branch(
        &mut self,
        from: BlockId,
        cond: LocalVariable,
        thenb: BlockId,
        elseb: BlockId,
    ) {
        self.cfg.block_mut(from).bexit = BlockExit {
            cond: Some(cond),
            thenb,
            elseb,
        };
    }

    /// Appends `bind := return what` and routes the block into the
    /// dead sentinel, the way the front-end terminates a method body.
    pub fn ret(&mut self, block: BlockId, bind: LocalVariable, what: LocalVariable) {
        self.bind(block, bind, Instruction::Return(what));
        let dead = self.dead();
        self.branch(block, dead);
    }

    /// Wires back edges from the exits and orders each predecessor
    /// list with lower-nesting predecessors first, then finishes the
    /// graph.
    pub fn build(mut self) -> Cfg {
        let dead = self.cfg.dead();
        let ids: Vec<BlockId> = self.cfg.block_ids().to_vec();
        for &id in &ids {
            if id == dead {
                continue;
            }
            let bexit = self.cfg.block(id).bexit;
            self.cfg.block_mut(bexit.thenb).back_edges.push(id);
            if bexit.elseb != bexit.thenb {
                self.cfg.block_mut(bexit.elseb).back_edges.push(id);
            }
        }
        for &id in &ids {
            let depth = self.cfg.block(id).outer_loops;
            let preds = std::mem::take(&mut self.cfg.block_mut(id).back_edges);
            let mut preds: Vec<(bool, BlockId)> = preds
                .into_iter()
                .map(|p| (self.cfg.block(p).outer_loops >= depth, p))
                .collect();
            preds.sort_by_key(|&(inner, p)| (inner, p));
            self.cfg.block_mut(id).back_edges = preds.into_iter().map(|(_, p)| p).collect();
        }
        self.cfg
    }
}

impl Default for CfgBuilder {
    fn default() -> Self {
        Self::new()
    }
}
