#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::parse_program;
use pretty_assertions::assert_eq;
use subst_define::{DefinitionValue, Defines, DefinitionsTree, Span};

fn emitted(tree: DefinitionsTree, source: &str) -> Vec<(String, Span)> {
    let hooks = Defines::new(tree).register();
    let program = parse_program(source).unwrap();
    Walker::new(source, &hooks)
        .walk_program(&program)
        .into_iter()
        .map(|dependency| (dependency.expression, dependency.span))
        .collect()
}

fn node_env() -> DefinitionsTree {
    DefinitionsTree::new().with("process.env.NODE_ENV", DefinitionValue::string("production"))
}

fn features() -> DefinitionsTree {
    DefinitionsTree::new().with("FEATURES", DefinitionsTree::new().with("a", true).with("b", false))
}

#[test]
fn test_free_member_chain_is_rewritten() {
    assert_eq!(
        emitted(node_env(), "if (process.env.NODE_ENV) {}"),
        vec![("\"production\"".to_owned(), Span::new(4, 24))]
    );
}

#[test]
fn test_prefix_alone_is_not_rewritten() {
    assert!(emitted(node_env(), "process.env; process.env.OTHER").is_empty());
}

#[test]
fn test_longest_chain_wins_then_object_part() {
    assert_eq!(
        emitted(features(), "FEATURES.a; FEATURES.c"),
        vec![
            ("true".to_owned(), Span::new(0, 10)),
            (r#"{"a":true,"b":false}"#.to_owned(), Span::new(12, 20)),
        ]
    );
}

#[test]
fn test_typeof_rewrites_whole_unary() {
    assert_eq!(
        emitted(node_env(), "typeof process.env.NODE_ENV"),
        vec![("\"string\"".to_owned(), Span::new(0, 27))]
    );
}

#[test]
fn test_typeof_sees_through_parentheses() {
    assert_eq!(
        emitted(node_env(), "typeof (process.env.NODE_ENV)"),
        vec![("\"string\"".to_owned(), Span::new(0, 29))]
    );
}

#[test]
fn test_declined_typeof_falls_back_to_operand() {
    let tree = DefinitionsTree::new().with("VALUE", DefinitionValue::code("compute()"));
    assert_eq!(
        emitted(tree, "typeof VALUE"),
        vec![("compute()".to_owned(), Span::new(7, 12))]
    );
}

#[test]
fn test_locals_shadow_definitions() {
    let source = "function f(FEATURES) { return FEATURES.a; }\n\
                  { let FEATURES = 1; FEATURES.a; }\n\
                  FEATURES.b;";
    let emitted = emitted(features(), source);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].0, "false");
}

#[test]
fn test_var_is_hoisted_to_function_scope() {
    let source = "function f() { FEATURES.a; if (x) { var FEATURES = {}; } }";
    assert!(emitted(features(), source).is_empty());
}

#[test]
fn test_block_scoped_declaration_does_not_leak() {
    let source = "{ const FEATURES = 1; } FEATURES.a";
    assert_eq!(
        emitted(features(), source),
        vec![("true".to_owned(), Span::new(24, 34))]
    );
}

#[test]
fn test_alias_resolves_to_definition() {
    let source = "var x = FEATURES; x.a; x.b";
    assert_eq!(
        emitted(features(), source),
        vec![
            (r#"{"a":true,"b":false}"#.to_owned(), Span::new(8, 16)),
            ("true".to_owned(), Span::new(18, 21)),
            ("false".to_owned(), Span::new(23, 26)),
        ]
    );
}

#[test]
fn test_alias_of_prefix() {
    let source = "const env = process.env; env.NODE_ENV";
    assert_eq!(
        emitted(node_env(), source),
        vec![("\"production\"".to_owned(), Span::new(25, 37))]
    );
}

#[test]
fn test_non_renamable_initialiser_is_plain_local() {
    let source = "var x = somethingElse; x.a";
    assert!(emitted(features(), source).is_empty());
}

#[test]
fn test_assignment_target_is_not_rewritten() {
    let tree = DefinitionsTree::new().with("DEBUG", true);
    assert_eq!(
        emitted(tree, "DEBUG = DEBUG"),
        vec![("true".to_owned(), Span::new(8, 13))]
    );
}

#[test]
fn test_shorthand_property_keeps_key() {
    let tree = DefinitionsTree::new().with("DEBUG", true);
    assert_eq!(
        emitted(tree, "({ DEBUG })"),
        vec![("DEBUG: true".to_owned(), Span::new(3, 8))]
    );
}

#[test]
fn test_nested_expressions_are_walked() {
    let tree = DefinitionsTree::new().with("N", 2);
    let source = "f(N, [N], { k: N }, () => N, N ? -N : N + N)[N]";
    assert_eq!(emitted(tree, source).len(), 9);
}

#[test]
fn test_arrow_parameters_shadow() {
    let tree = DefinitionsTree::new().with("N", 2);
    assert!(emitted(tree, "(N) => N; N => N").is_empty());
}
