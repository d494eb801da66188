//! End-to-end scenarios for the finalization pipeline.

use sable_cfg::{finalize, CfgBuilder, Instruction};
use sable_core::{Context, Counters, ErrorQueue, LocalVariable, NameTable};

struct Fixture {
    names: NameTable,
    errors: ErrorQueue,
    counters: Counters,
}

impl Fixture {
    fn new() -> Self {
        Self {
            names: NameTable::new(),
            errors: ErrorQueue::new(),
            counters: Counters::new(),
        }
    }

    fn ctx(&self) -> Context<'_> {
        Context::new(&self.names, &self.errors, &self.counters).with_debug_mode(true)
    }

    fn var(&mut self, name: &str) -> LocalVariable {
        let id = self.names.intern(name);
        LocalVariable::new(id, 0)
    }

    fn temp(&mut self, base: &str) -> LocalVariable {
        let id = self.names.temporary(base);
        LocalVariable::new(id, 0)
    }
}

/// An empty trampoline on one arm is routed around and removed.
#[test]
fn empty_trampoline_is_bypassed() {
    let mut fx = Fixture::new();
    let c = fx.var("c");
    let x = fx.var("x");
    let ret = fx.var("<ret>");
    let slf = fx.var("self");
    let foo = fx.names.intern("foo");

    let mut b = CfgBuilder::new();
    let entry = b.entry();
    let tramp = b.block(0);
    let side = b.block(0);
    let tail = b.block(0);
    b.cond_branch(entry, c, tramp, side);
    b.branch(tramp, tail);
    b.bind(side, x, Instruction::IntLit(1));
    b.branch(side, tail);
    b.bind(side, slf, Instruction::SelfRef);
    b.bind(
        tail,
        x,
        Instruction::Send {
            recv: slf,
            method: foo,
            args: vec![],
        },
    );
    b.ret(tail, ret, x);
    let mut cfg = b.build();

    finalize(fx.ctx(), &mut cfg);

    assert!(!cfg.is_live(tramp));
    assert_eq!(cfg.block(entry).bexit.thenb, tail);
    assert!(cfg.block(tail).back_edges.contains(&entry));
    assert!(!cfg.block(tail).back_edges.contains(&tramp));
}

/// Unread synthetic temporaries vanish; a read one is preserved.
#[test]
fn dead_temps_from_assignment_in_argument() {
    let mut fx = Fixture::new();
    let t1 = fx.temp("arg");
    let t2 = fx.temp("arg");
    let t3 = fx.temp("arg");
    let x = fx.var("x");
    let ret = fx.var("<ret>");
    let slf = fx.var("self");
    let foo = fx.names.intern("foo");
    let s = fx.names.intern("hello");

    let mut b = CfgBuilder::new();
    let entry = b.entry();
    b.bind(entry, slf, Instruction::SelfRef);
    b.bind(entry, t1, Instruction::IntLit(2));
    b.bind(entry, t2, Instruction::BoolLit(true));
    b.bind(entry, t3, Instruction::StringLit(s));
    b.bind(
        entry,
        x,
        Instruction::Send {
            recv: slf,
            method: foo,
            args: vec![t1],
        },
    );
    b.ret(entry, ret, x);
    let mut cfg = b.build();

    finalize(fx.ctx(), &mut cfg);

    let binds: Vec<LocalVariable> = cfg
        .block(cfg.entry())
        .exprs
        .iter()
        .map(|b| b.bind)
        .collect();
    assert!(binds.contains(&t1), "read temporary must be preserved");
    assert!(!binds.contains(&t2), "unread temporary must be removed");
    assert!(!binds.contains(&t3), "unread temporary must be removed");
}

/// `t := a; y := t.bar(t)` collapses to `y := a.bar(a)` and the
/// temporary binding is then removed as dead.
#[test]
fn alias_chain_collapses_and_dies() {
    let mut fx = Fixture::new();
    let a = fx.var("a");
    let t = fx.temp("recv");
    let y = fx.var("y");
    let ret = fx.var("<ret>");
    let bar = fx.names.intern("bar");

    let mut b = CfgBuilder::new();
    let entry = b.entry();
    b.bind(entry, a, Instruction::IntLit(1));
    b.bind(entry, t, Instruction::Ident(a));
    b.bind(
        entry,
        y,
        Instruction::Send {
            recv: t,
            method: bar,
            args: vec![t],
        },
    );
    b.ret(entry, ret, y);
    let mut cfg = b.build();

    finalize(fx.ctx(), &mut cfg);

    let exprs = &cfg.block(cfg.entry()).exprs;
    assert!(
        exprs.iter().all(|binding| binding.bind != t),
        "the temporary's own binding must be dead"
    );
    let send = exprs
        .iter()
        .find(|binding| binding.bind == y)
        .expect("send binding");
    match &send.value {
        Instruction::Send { recv, args, .. } => {
            assert_eq!(*recv, a);
            assert_eq!(args, &vec![a]);
        }
        other => panic!("expected send, got {}", other),
    }
}

/// A variable living entirely inside one block is no block's argument.
#[test]
fn block_local_variable_is_not_an_argument() {
    let mut fx = Fixture::new();
    let c = fx.var("c");
    let v = fx.var("v");
    let y = fx.var("y");
    let ret = fx.var("<ret>");
    let slf = fx.var("self");
    let foo = fx.names.intern("foo");

    let mut b = CfgBuilder::new();
    let entry = b.entry();
    let arm = b.block(0);
    let other = b.block(0);
    b.bind(entry, slf, Instruction::SelfRef);
    b.cond_branch(entry, c, arm, other);
    b.bind(arm, v, Instruction::IntLit(1));
    b.bind(arm, y, Instruction::Ident(v));
    b.ret(arm, ret, y);
    b.bind(
        other,
        y,
        Instruction::Send {
            recv: slf,
            method: foo,
            args: vec![],
        },
    );
    b.ret(other, ret, y);
    let mut cfg = b.build();

    finalize(fx.ctx(), &mut cfg);

    for &bb in cfg.block_ids() {
        assert!(
            !cfg.block(bb).args.contains(&v),
            "{} must not take the block-local as an argument",
            bb
        );
    }
}

/// A loop-carried variable becomes an argument of the loop header.
#[test]
fn loop_carried_variable_is_a_header_argument() {
    let mut fx = Fixture::new();
    let c = fx.var("c");
    let i = fx.var("i");
    let ret = fx.var("<ret>");

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

    finalize(fx.ctx(), &mut cfg);

    assert!(cfg.block(header).is_loop_header());
    assert!(cfg.block(header).args.contains(&i));
    assert_eq!(cfg.min_loops.get(&i), Some(&0));
    assert_eq!(cfg.max_loop_write.get(&i), Some(&1));
}

/// A block with no predecessors disappears, along with its edges.
#[test]
fn unreachable_block_is_discarded() {
    let mut fx = Fixture::new();
    let x = fx.var("x");
    let ret = fx.var("<ret>");
    let slf = fx.var("self");
    let foo = fx.names.intern("foo");

    let mut b = CfgBuilder::new();
    let entry = b.entry();
    let tail = b.block(0);
    b.branch(entry, tail);
    b.bind(tail, slf, Instruction::SelfRef);
    b.bind(
        tail,
        x,
        Instruction::Send {
            recv: slf,
            method: foo,
            args: vec![],
        },
    );
    b.ret(tail, ret, x);
    let mut cfg = b.build();

    // An orphan pointing at the live tail, with its own back edge
    // registered but nothing pointing at it.
    let orphan = cfg.alloc_block(0);
    cfg.block_mut(orphan).bexit.thenb = tail;
    cfg.block_mut(orphan).bexit.elseb = tail;
    cfg.block_mut(tail).back_edges.push(orphan);

    finalize(fx.ctx(), &mut cfg);

    assert!(!cfg.is_live(orphan));
    assert!(!cfg.block(tail).back_edges.contains(&orphan));
    assert!(!cfg.forwards_topo_sort.contains(&orphan));
    assert!(!cfg.backwards_topo_sort.contains(&orphan));
}
