use super::*;
use crate::host::ConstDependency;
use crate::test_support::{site, ScriptedEvaluator};
use pretty_assertions::assert_eq;
use subst_ir::Span;

#[test]
fn test_empty_table_declines_everything() {
    let table = HookTable::new();
    let evaluator = ScriptedEvaluator::new();
    let mut sink: Vec<ConstDependency> = Vec::new();

    assert!(table.is_empty());
    assert!(!table.can_rename("FOO"));
    assert_eq!(table.evaluate_identifier("FOO", &site(0, 3), &evaluator), None);
    assert_eq!(table.evaluate_typeof("FOO", &site(0, 3), &evaluator), None);
    assert_eq!(
        table.rewrite_expression("FOO", &site(0, 3), &evaluator, &mut sink),
        HookOutcome::Declined
    );
    assert_eq!(
        table.rewrite_typeof("FOO", &site(0, 3), &evaluator, &mut sink),
        HookOutcome::Declined
    );
    assert!(sink.is_empty());
}

#[test]
fn test_can_rename_only_registration() {
    let mut table = HookTable::new();
    table.register_can_rename("process");
    assert!(table.can_rename("process"));
    assert!(table.is_registered("process", HookKind::CanRename));
    assert!(!table.is_registered("process", HookKind::RewriteExpression));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_first_non_declining_hook_wins() {
    let mut table = HookTable::new();
    table.on_evaluate_identifier("X", |_, _| None);
    table.on_evaluate_identifier("X", |s, _| {
        Some(EvaluatedExpression::number(1.0).with_span(s.span))
    });
    table.on_evaluate_identifier("X", |_, _| Some(EvaluatedExpression::number(2.0)));

    let result = table.evaluate_identifier("X", &site(4, 5), &ScriptedEvaluator::new());
    assert_eq!(
        result,
        Some(EvaluatedExpression::number(1.0).with_span(Span::new(4, 5)))
    );
}

#[test]
fn test_rewrite_hooks_receive_sink() {
    let mut table = HookTable::new();
    table.on_rewrite_expression("X", |_, _, _| HookOutcome::Declined);
    table.on_rewrite_expression("X", |s, _, sink| {
        sink.add_dependency(ConstDependency::new("42", s));
        HookOutcome::Handled
    });

    let mut sink: Vec<ConstDependency> = Vec::new();
    let outcome = table.rewrite_expression("X", &site(0, 1), &ScriptedEvaluator::new(), &mut sink);
    assert_eq!(outcome, HookOutcome::Handled);
    assert_eq!(sink, vec![ConstDependency::new("42", &site(0, 1))]);
}

#[test]
fn test_paths_and_debug_listing() {
    let mut table = HookTable::new();
    table.register_can_rename("b");
    table.on_rewrite_typeof("a", |_, _, _| HookOutcome::Declined);

    let mut paths: Vec<_> = table.paths().collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["a", "b"]);
    assert_eq!(
        format!("{table:?}"),
        r#"{"a": ["rewrite_typeof"], "b": ["can_rename"]}"#
    );
}

#[test]
fn test_hook_kind_names() {
    let names: Vec<_> = HookKind::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(
        names,
        vec![
            "can_rename",
            "evaluate_identifier",
            "evaluate_typeof",
            "rewrite_expression",
            "rewrite_typeof"
        ]
    );
}
