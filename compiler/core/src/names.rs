//! Interned names.
//!
//! Every identifier the checker touches is interned once into a
//! [`NameTable`] and referred to by its dense [`NameId`] afterwards.
//! The table also tracks the two reserved classes of names the CFG
//! passes care about: compiler-minted synthetic temporaries, and local
//! names that shadow module-level globals.

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// A unique identifier for an interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameId(pub u32);

impl NameId {
    /// Returns the raw index of this name ID.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// The interner for identifier names.
///
/// Interning is append-only; a name, once interned, keeps its ID for the
/// lifetime of the table. The table is frozen (shared read-only) while
/// CFGs are being finalized.
#[derive(Debug)]
pub struct NameTable {
    strings: Vec<String>,
    ids: FxHashMap<String, NameId>,
    synthetic: FxHashSet<NameId>,
    globals: FxHashSet<NameId>,
    block_call: NameId,
    next_temporary: u32,
}

impl NameTable {
    /// Creates a table with the reserved names pre-interned.
    pub fn new() -> Self {
        let mut table = Self {
            strings: Vec::new(),
            ids: FxHashMap::default(),
            synthetic: FxHashSet::default(),
            globals: FxHashSet::default(),
            block_call: NameId(0),
            next_temporary: 0,
        };
        table.block_call = table.intern("<blockCall>");
        table.synthetic.insert(table.block_call);
        table
    }

    /// Interns a name, returning its ID. Idempotent.
    pub fn intern(&mut self, name: &str) -> NameId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = NameId(self.strings.len() as u32);
        self.strings.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Resolves an ID back to its string.
    pub fn resolve(&self, id: NameId) -> &str {
        &self.strings[id.index()]
    }

    /// Mints a fresh synthetic-temporary name.
    ///
    /// Temporaries live in a reserved namespace the front-end cannot
    /// collide with; only they are candidates for dealiasing.
    pub fn temporary(&mut self, base: &str) -> NameId {
        let n = self.next_temporary;
        self.next_temporary += 1;
        let id = self.intern(&format!("<tmp {base} {n}>"));
        self.synthetic.insert(id);
        id
    }

    /// The reserved marker name carried by block-call trampolines.
    ///
    /// Blocks whose exit condition bears this name are protected from
    /// being merged away during simplification.
    pub fn block_call(&self) -> NameId {
        self.block_call
    }

    /// Records that a local name shadows a module-level global.
    pub fn register_global(&mut self, id: NameId) {
        self.globals.insert(id);
    }

    /// True for names minted by [`NameTable::temporary`].
    pub fn is_synthetic_temporary(&self, id: NameId) -> bool {
        self.synthetic.contains(&id)
    }

    /// True for names registered with [`NameTable::register_global`].
    pub fn is_global(&self, id: NameId) -> bool {
        self.globals.contains(&id)
    }

    /// Returns the number of interned names, reserved ones included.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if the table holds no names. The reserved names
    /// are interned at construction, so a live table never is.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}
