//! Loop structure over the block graph.
//!
//! Loop membership is carried by the `outer_loops` depth the front-end
//! assigns each block. This module derives the two things type
//! inference needs from it: which blocks head a loop, and per variable,
//! the shallowest depth it is mentioned at and the deepest depth it is
//! written at.

use crate::cfg::{BlockFlags, Cfg, ReadsAndWrites};

/// Flags every block entered from a predecessor at strictly lower
/// nesting depth as a loop header.
pub fn mark_loop_headers(cfg: &mut Cfg) {
    let ids = cfg.block_ids().to_vec();
    for bb in ids {
        let depth = cfg.block(bb).outer_loops;
        let is_header = cfg
            .block(bb)
            .back_edges
            .iter()
            .any(|&parent| cfg.block(parent).outer_loops < depth);
        if is_header {
            cfg.block_mut(bb).flags |= BlockFlags::LOOP_HEADER;
        }
    }
}

/// Computes `min_loops` and `max_loop_write` from the read/write sets.
///
/// `min_loops[v]` is the minimum nesting depth of any block mentioning
/// `v`; reads are folded in first and the writes pass refines the
/// entry without overwriting a smaller value already present.
/// `max_loop_write[v]` is the maximum depth of any block writing `v`.
pub fn compute_min_max_loops(rnw: &ReadsAndWrites, cfg: &mut Cfg) {
    for (&var, blocks) in &rnw.reads {
        let mut min = cfg.min_loops.get(&var).copied().unwrap_or(u32::MAX);
        for &bb in blocks {
            min = min.min(cfg.block(bb).outer_loops);
        }
        cfg.min_loops.insert(var, min);
    }

    for (&var, blocks) in &rnw.writes {
        let mut min = cfg.min_loops.get(&var).copied().unwrap_or(u32::MAX);
        let mut max = cfg.max_loop_write.get(&var).copied().unwrap_or(0);
        for &bb in blocks {
            let depth = cfg.block(bb).outer_loops;
            min = min.min(depth);
            max = max.max(depth);
        }
        cfg.min_loops.insert(var, min);
        cfg.max_loop_write.insert(var, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CfgBuilder;
    use crate::instruction::Instruction;
    use crate::liveness::collect_reads_writes;
    use sable_core::{Context, Counters, ErrorQueue, LocalVariable, NameTable};

    fn var(names: &mut NameTable, name: &str) -> LocalVariable {
        let id = names.intern(name);
        LocalVariable::new(id, 0)
    }

    #[test]
    fn test_loop_header_is_flagged() {
        let mut names = NameTable::new();
        let c = var(&mut names, "c");
        let x = var(&mut names, "x");
        let ret = var(&mut names, "<ret>");

        let mut b = CfgBuilder::new();
        let entry = b.entry();
        let header = b.block(1);
        let body = b.block(1);
        let post = b.block(0);
        b.branch(entry, header);
        b.cond_branch(header, c, body, post);
        b.branch(body, header);
        b.ret(post, ret, x);
        let mut cfg = b.build();

        mark_loop_headers(&mut cfg);

        assert!(cfg.block(header).is_loop_header());
        assert!(!cfg.block(body).is_loop_header());
        assert!(!cfg.block(post).is_loop_header());
        assert!(!cfg.block(entry).is_loop_header());
    }

    #[test]
    fn test_min_max_loops_for_loop_carried_variable() {
        let mut names = NameTable::new();
        let errors = ErrorQueue::new();
        let counters = Counters::new();
        let c = var(&mut names, "c");
        let i = var(&mut names, "i");
        let ret = var(&mut names, "<ret>");

        // i initialized at depth 0, rebound at depth 1, read at both.
        let mut b = CfgBuilder::new();
        let entry = b.entry();
        let header = b.block(1);
        let body = b.block(1);
        let post = b.block(0);
        b.bind(entry, i, Instruction::IntLit(0));
        b.branch(entry, header);
        b.cond_branch(header, c, body, post);
        b.bind(body, i, Instruction::IntLit(1));
        b.branch(body, header);
        b.ret(post, ret, i);
        let mut cfg = b.build();

        let ctx = Context::new(&names, &errors, &counters);
        let rnw = collect_reads_writes(ctx, &cfg);
        compute_min_max_loops(&rnw, &mut cfg);

        assert_eq!(cfg.min_loops.get(&i), Some(&0));
        assert_eq!(cfg.max_loop_write.get(&i), Some(&1));
    }

    #[test]
    fn test_write_pass_does_not_raise_existing_min() {
        let mut names = NameTable::new();
        let errors = ErrorQueue::new();
        let counters = Counters::new();
        let c = var(&mut names, "c");
        let v = var(&mut names, "v");
        let y = var(&mut names, "y");
        let ret = var(&mut names, "<ret>");

        // v is read at depth 0 but only written at depth 1: the reads
        // pass sets min 0 and the writes pass must not raise it.
        let mut b = CfgBuilder::new();
        let entry = b.entry();
        let header = b.block(1);
        let body = b.block(1);
        let post = b.block(0);
        b.branch(entry, header);
        b.cond_branch(header, c, body, post);
        b.bind(body, v, Instruction::IntLit(7));
        b.branch(body, header);
        b.bind(post, y, Instruction::Ident(v));
        b.ret(post, ret, y);
        let mut cfg = b.build();

        let ctx = Context::new(&names, &errors, &counters);
        let rnw = collect_reads_writes(ctx, &cfg);
        compute_min_max_loops(&rnw, &mut cfg);

        assert_eq!(cfg.min_loops.get(&v), Some(&0));
        assert_eq!(cfg.max_loop_write.get(&v), Some(&1));
    }

    #[test]
    fn test_read_only_variable_has_no_max_loop_write() {
        let mut names = NameTable::new();
        let errors = ErrorQueue::new();
        let counters = Counters::new();
        let v = var(&mut names, "v");
        let y = var(&mut names, "y");
        let ret = var(&mut names, "<ret>");

        let mut b = CfgBuilder::new();
        let entry = b.entry();
        b.bind(entry, y, Instruction::Ident(v));
        b.ret(entry, ret, y);
        let mut cfg = b.build();

        let ctx = Context::new(&names, &errors, &counters);
        let rnw = collect_reads_writes(ctx, &cfg);
        compute_min_max_loops(&rnw, &mut cfg);

        assert_eq!(cfg.min_loops.get(&v), Some(&0));
        assert_eq!(cfg.max_loop_write.get(&v), None);
    }
}
