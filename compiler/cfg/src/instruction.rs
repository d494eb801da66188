//! Instructions for the sable CFG.
//!
//! A method body lowers into bindings of the form `bind := value`, where
//! `value` is one of a closed set of instruction tags. The set is closed
//! on purpose: dead-store elimination discriminates by tag, and a new
//! tag must make an explicit appearance on its allow-list.

use sable_core::{LocalVariable, NameId};
use std::fmt;

/// The value side of a binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Copy of another local.
    Ident(LocalVariable),
    /// Method call.
    Send {
        recv: LocalVariable,
        method: NameId,
        args: Vec<LocalVariable>,
    },
    /// Return from the method.
    Return(LocalVariable),
    /// The receiver of the enclosing method.
    SelfRef,
    /// The argument at the given position.
    LoadArg(u16),
    /// Boolean literal.
    BoolLit(bool),
    /// Integer literal.
    IntLit(i64),
    /// Float literal.
    FloatLit(f64),
    /// String literal, interned.
    StringLit(NameId),
    /// Symbol literal, interned.
    SymbolLit(NameId),
    /// Array splat of another local.
    ArraySplat(LocalVariable),
    /// Hash splat of another local.
    HashSplat(LocalVariable),
}

impl Instruction {
    /// Calls `f` for every local this instruction reads.
    pub fn for_each_operand(&self, mut f: impl FnMut(LocalVariable)) {
        match self {
            Instruction::Ident(what)
            | Instruction::Return(what)
            | Instruction::ArraySplat(what)
            | Instruction::HashSplat(what) => f(*what),
            Instruction::Send { recv, args, .. } => {
                f(*recv);
                for arg in args {
                    f(*arg);
                }
            }
            Instruction::SelfRef
            | Instruction::LoadArg(_)
            | Instruction::BoolLit(_)
            | Instruction::IntLit(_)
            | Instruction::FloatLit(_)
            | Instruction::StringLit(_)
            | Instruction::SymbolLit(_) => {}
        }
    }

    /// True if erasing this instruction cannot change program behavior.
    ///
    /// This could be written as "not `Send` and not `Return`", but the
    /// tags are listed explicitly so that a newly added tag has to take
    /// a position here.
    pub fn is_side_effect_free(&self) -> bool {
        matches!(
            self,
            Instruction::Ident(_)
                | Instruction::ArraySplat(_)
                | Instruction::HashSplat(_)
                | Instruction::BoolLit(_)
                | Instruction::IntLit(_)
                | Instruction::FloatLit(_)
                | Instruction::StringLit(_)
                | Instruction::SymbolLit(_)
                | Instruction::SelfRef
                | Instruction::LoadArg(_)
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Ident(what) => write!(f, "{}", what),
            Instruction::Send { recv, method, args } => {
                write!(f, "{}.{}(", recv, method)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Instruction::Return(what) => write!(f, "return {}", what),
            Instruction::SelfRef => write!(f, "self"),
            Instruction::LoadArg(index) => write!(f, "load_arg({})", index),
            Instruction::BoolLit(val) => write!(f, "{}", val),
            Instruction::IntLit(val) => write!(f, "{}", val),
            Instruction::FloatLit(val) => write!(f, "{}", val),
            Instruction::StringLit(name) => write!(f, "str({})", name),
            Instruction::SymbolLit(name) => write!(f, "sym({})", name),
            Instruction::ArraySplat(what) => write!(f, "*{}", what),
            Instruction::HashSplat(what) => write!(f, "**{}", what),
        }
    }
}

/// One executed step of a basic block: `bind := value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The local the result is bound to.
    pub bind: LocalVariable,
    /// The instruction producing the result.
    pub value: Instruction,
}

impl Binding {
    /// Creates a binding.
    pub fn new(bind: LocalVariable, value: Instruction) -> Self {
        Self { bind, value }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.bind, self.value)
    }
}
