//! Entry point: definitions in, per-compilation hook table out.

use subst_ir::DefinitionsTree;

use crate::{register_all, HookTable};

/// A configured set of constant definitions.
///
/// `Defines` itself is plain data and can be shared between builds. Each
/// compilation unit calls [`Defines::register`] to get its own `HookTable`;
/// tables and their reentrancy guards are never shared.
#[derive(Clone, Debug, Default)]
pub struct Defines {
    tree: DefinitionsTree,
}

impl Defines {
    pub fn new(tree: DefinitionsTree) -> Self {
        Defines { tree }
    }

    pub fn tree(&self) -> &DefinitionsTree {
        &self.tree
    }

    /// Build a fresh hook table for one compilation unit.
    pub fn register(&self) -> HookTable {
        let mut table = HookTable::new();
        register_all(&mut table, &self.tree);
        table
    }
}
