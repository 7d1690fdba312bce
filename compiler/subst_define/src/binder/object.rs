//! Object path binder.
//!
//! A nested tree is substitutable as a whole. Its serialized form is never
//! evaluated, so unlike leaves no reentrancy guard is needed.

use subst_ir::{quote_string, render_tree, DefinitionsTree};

use crate::host::{ConstDependency, HookOutcome};
use crate::{EvaluatedExpression, HookTable};

/// Bind the hooks for a path whose value is `tree`.
pub fn bind_object_path(table: &mut HookTable, path: &str, tree: &DefinitionsTree) {
    let code = render_tree(tree);

    table.register_can_rename(path);
    table.on_evaluate_identifier(path, |site, _| {
        Some(EvaluatedExpression::object().with_span(site.span))
    });
    table.on_evaluate_typeof(path, |site, _| {
        Some(EvaluatedExpression::string("object").with_span(site.span))
    });
    table.on_rewrite_expression(path, move |site, _, sink| {
        sink.add_dependency(ConstDependency::new(code.as_str(), site));
        HookOutcome::Handled
    });
    table.on_rewrite_typeof(path, |site, _, sink| {
        sink.add_dependency(ConstDependency::new(quote_string("object"), site));
        HookOutcome::Handled
    });
}
