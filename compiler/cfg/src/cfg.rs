//! The control-flow graph.
//!
//! Blocks live in an arena owned by the [`Cfg`]; all cross-block
//! references are typed [`BlockId`] indices rather than pointers, so a
//! pass can rewrite a block's successors' back-edge lists while walking
//! the block list. Arena slots are never reused: a removed block leaves
//! the live list but keeps its slot, which keeps ids stable for the
//! side tables the passes key by id.

use crate::instruction::Binding;
use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHashSet};
use sable_core::{Context, LocalVariable};
use std::fmt;

/// A unique identifier for a basic block, indexing the CFG's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// Returns the raw index of this block ID.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

bitflags! {
    /// Persistent block attributes.
    ///
    /// Topo-sort visitation is tracked in side tables scoped to the
    /// sort, not here.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: u8 {
        /// The block has an incoming edge from a deeper-nested block.
        const LOOP_HEADER = 1 << 0;
    }
}

/// The branch exit terminating a basic block.
///
/// An unconditional branch is encoded as `thenb == elseb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockExit {
    /// The branch condition; `None` for an unconditional exit.
    pub cond: Option<LocalVariable>,
    /// Target when the condition holds.
    pub thenb: BlockId,
    /// Target when the condition does not hold.
    pub elseb: BlockId,
}

impl BlockExit {
    /// True if both branch targets coincide.
    pub fn is_unconditional(&self) -> bool {
        self.thenb == self.elseb
    }
}

impl fmt::Display for BlockExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconditional() {
            write!(f, "goto {}", self.thenb)
        } else {
            match self.cond {
                Some(cond) => write!(f, "if {} goto {} else {}", cond, self.thenb, self.elseb),
                None => write!(f, "if ? goto {} else {}", self.thenb, self.elseb),
            }
        }
    }
}

/// A basic block: a straight-line binding sequence plus one branch exit.
#[derive(Debug, Clone)]
pub struct BasicBlock {
    /// Arena index, stable across simplification.
    pub id: BlockId,
    /// Bindings executed top to bottom.
    pub exprs: Vec<Binding>,
    /// The branch exit.
    pub bexit: BlockExit,
    /// Predecessor blocks. The front-end orders predecessors at
    /// strictly lower nesting depth first; simplification keeps the
    /// list deduped and sorted by id.
    pub back_edges: Vec<BlockId>,
    /// Loop-nesting depth assigned at construction.
    pub outer_loops: u32,
    /// Persistent attributes.
    pub flags: BlockFlags,
    /// Variables this block accepts in phi position, sorted by name id.
    pub args: Vec<LocalVariable>,
}

impl BasicBlock {
    fn new(id: BlockId, outer_loops: u32) -> Self {
        Self {
            id,
            exprs: Vec::new(),
            bexit: BlockExit {
                cond: None,
                thenb: id,
                elseb: id,
            },
            back_edges: Vec::new(),
            outer_loops,
            flags: BlockFlags::empty(),
            args: Vec::new(),
        }
    }

    /// True if the block was marked as a loop header.
    pub fn is_loop_header(&self) -> bool {
        self.flags.contains(BlockFlags::LOOP_HEADER)
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")?;
        }
        writeln!(f, ": [depth {}]", self.outer_loops)?;
        for binding in &self.exprs {
            writeln!(f, "    {}", binding)?;
        }
        writeln!(f, "    {}", self.bexit)
    }
}

/// Per-variable sets of the blocks that read and write it.
#[derive(Debug, Clone, Default)]
pub struct ReadsAndWrites {
    /// Blocks mentioning the variable as an operand.
    pub reads: FxHashMap<LocalVariable, FxHashSet<BlockId>>,
    /// Blocks binding the variable.
    pub writes: FxHashMap<LocalVariable, FxHashSet<BlockId>>,
}

/// A control-flow graph for one method body.
#[derive(Clone)]
pub struct Cfg {
    blocks: Vec<BasicBlock>,
    /// Live blocks in id order. Removal during simplification erases
    /// from this list; the arena slot stays behind.
    pub(crate) basic_blocks: Vec<BlockId>,
    entry: BlockId,
    dead: BlockId,
    /// Forward DFS post-order over the live blocks.
    pub forwards_topo_sort: Vec<BlockId>,
    /// Loop-aware backward ordering over the live blocks.
    pub backwards_topo_sort: Vec<BlockId>,
    /// Per variable, the minimum loop depth it is mentioned at.
    pub min_loops: FxHashMap<LocalVariable, u32>,
    /// Per variable, the maximum loop depth it is written at.
    pub max_loop_write: FxHashMap<LocalVariable, u32>,
}

impl Cfg {
    /// Creates a graph holding only the entry block and the dead
    /// sentinel. The sentinel's exit points at itself; it is the sole
    /// sink, and branches known not to execute target it.
    pub fn new() -> Self {
        let entry = BlockId(0);
        let dead = BlockId(1);
        Self {
            blocks: vec![BasicBlock::new(entry, 0), BasicBlock::new(dead, 0)],
            basic_blocks: vec![entry, dead],
            entry,
            dead,
            forwards_topo_sort: Vec::new(),
            backwards_topo_sort: Vec::new(),
            min_loops: FxHashMap::default(),
            max_loop_write: FxHashMap::default(),
        }
    }

    /// The entry block.
    pub fn entry(&self) -> BlockId {
        self.entry
    }

    /// The dead sentinel sink.
    pub fn dead(&self) -> BlockId {
        self.dead
    }

    /// Appends a fresh block at the given loop-nesting depth.
    pub fn alloc_block(&mut self, outer_loops: u32) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BasicBlock::new(id, outer_loops));
        self.basic_blocks.push(id);
        id
    }

    /// Borrows a block by id.
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    /// Mutably borrows a block by id.
    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id.index()]
    }

    /// The live blocks, in id order.
    pub fn block_ids(&self) -> &[BlockId] {
        &self.basic_blocks
    }

    /// The size of the block arena. Side tables indexed by block id
    /// must be this long, not [`Cfg::block_ids`]`.len()`: removed
    /// blocks keep their slots.
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// True if the block is in the live list.
    pub fn is_live(&self, id: BlockId) -> bool {
        self.basic_blocks.binary_search(&id).is_ok()
    }

    /// Erases a block from the live list and from both topo sorts.
    pub(crate) fn remove_from_live_lists(&mut self, id: BlockId) {
        self.basic_blocks.retain(|&b| b != id);
        self.forwards_topo_sort.retain(|&b| b != id);
        self.backwards_topo_sort.retain(|&b| b != id);
    }

    /// Verifies back-edge symmetry over the whole graph.
    ///
    /// Debug-mode only; a violation is a programmer error and panics
    /// with a diagnostic.
    pub fn sanity_check(&self, ctx: Context<'_>) {
        if !ctx.debug_mode {
            return;
        }
        for &id in &self.basic_blocks {
            let bb = self.block(id);
            for &parent in &bb.back_edges {
                let pexit = &self.block(parent).bexit;
                assert!(
                    pexit.thenb == id || pexit.elseb == id,
                    "{} lists {} as a predecessor, but {} does not branch to it",
                    id,
                    parent,
                    parent
                );
            }
            if id == self.dead {
                continue;
            }
            assert!(
                self.block(bb.bexit.thenb).back_edges.contains(&id),
                "back edge missing: {} branches to {} on then",
                id,
                bb.bexit.thenb
            );
            assert!(
                self.block(bb.bexit.elseb).back_edges.contains(&id),
                "back edge missing: {} branches to {} on else",
                id,
                bb.bexit.elseb
            );
        }
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Cfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &id in &self.basic_blocks {
            write!(f, "{}", self.block(id))?;
        }
        Ok(())
    }
}
