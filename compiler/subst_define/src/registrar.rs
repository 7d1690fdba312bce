//! Path registrar.
//!
//! Walks a definitions tree depth-first, joining keys with `.`. Leaves go to
//! the substitution binder; nested trees are walked first and then bound as
//! a whole through the object path binder.

use subst_ir::{render_source, DefinitionValue, DefinitionsTree, SymbolPath};
use tracing::{debug, trace};

use crate::binder::{bind_leaf, bind_object_path};
use crate::HookTable;

/// Register every path in `tree` with `table`.
///
/// Every strict prefix of a leaf path is registered as renamable, so the host
/// never treats `process` or `process.env` as an ordinary local binding when
/// `process.env.NODE_ENV` is defined.
#[tracing::instrument(level = "debug", skip_all, fields(entries = tree.len()))]
pub fn register_all(table: &mut HookTable, tree: &DefinitionsTree) {
    walk(table, tree, "");
    debug!(paths = table.len(), "definitions registered");
}

fn walk(table: &mut HookTable, tree: &DefinitionsTree, prefix: &str) {
    for (key, value) in tree.iter() {
        let full_key = format!("{prefix}{key}");
        trace!(path = %full_key, kind = value.kind_name(), "registering definition");

        if let DefinitionValue::Object(subtree) = value {
            walk(table, subtree, &format!("{full_key}."));
            bind_object_path(table, &full_key, subtree);
            continue;
        }

        let path = SymbolPath::parse(&full_key);
        for renamable in path.strict_prefixes() {
            table.register_can_rename(&renamable);
        }
        bind_leaf(table, &path, render_source(value));
    }
}
