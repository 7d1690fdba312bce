//! Substitution binder for leaf paths.

use subst_ir::{quote_string, SymbolPath};
use tracing::trace;

use crate::host::{ConstDependency, Evaluator, ExprSite, HookOutcome};
use crate::{EvaluatedExpression, HookTable, ReentrancyGuard};

/// Bind the substitution hooks for one leaf path.
///
/// `raw_code` is the rendered replacement. For a `typeof` query it already
/// is the `typeof` answer (e.g. `"number"`); otherwise the answer is derived
/// lazily by evaluating `typeof (raw_code)`.
///
/// Plain paths get `can_rename`, `evaluate_identifier` and
/// `rewrite_expression`. Every path gets `evaluate_typeof` and
/// `rewrite_typeof`.
pub fn bind_leaf(table: &mut HookTable, path: &SymbolPath, raw_code: String) {
    let key = path.dotted();
    let typeof_source = if path.is_typeof_query() {
        raw_code.clone()
    } else {
        format!("typeof ({raw_code})")
    };

    if !path.is_typeof_query() {
        table.register_can_rename(&key);

        let guard = ReentrancyGuard::new();
        let code = raw_code.clone();
        table.on_evaluate_identifier(&key, move |site, evaluator| {
            guarded_evaluate(&guard, &code, site, evaluator)
        });

        table.on_rewrite_expression(&key, move |site, _evaluator, sink| {
            sink.add_dependency(ConstDependency::new(raw_code.as_str(), site));
            HookOutcome::Handled
        });
    }

    let guard = ReentrancyGuard::new();
    let source = typeof_source.clone();
    table.on_evaluate_typeof(&key, move |site, evaluator| {
        guarded_evaluate(&guard, &source, site, evaluator)
    });

    table.on_rewrite_typeof(&key, move |site, evaluator, sink| {
        let result = evaluator.evaluate(&typeof_source);
        let Some(name) = result.as_str() else {
            return HookOutcome::Declined;
        };
        sink.add_dependency(ConstDependency::new(quote_string(name), site));
        HookOutcome::Handled
    });
}

/// Evaluate `source` unless this hook is already evaluating further up the
/// stack, in which case decline.
fn guarded_evaluate(
    guard: &ReentrancyGuard,
    source: &str,
    site: &ExprSite,
    evaluator: &dyn Evaluator,
) -> Option<EvaluatedExpression> {
    let Some(_scope) = guard.enter() else {
        trace!(source, "re-entrant evaluation declined");
        return None;
    };
    Some(evaluator.evaluate(source).with_span(site.span))
}
