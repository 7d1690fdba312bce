//! Property-based tests for substitution.
//!
//! Random definitions are rendered, spliced and evaluated back through the
//! host to check that:
//! 1. Rendered strings and numbers evaluate to the value they came from
//! 2. Every strict prefix of a dotted key is renamable and nothing more
//! 3. `typeof` answers hold at every level of a nested tree
//! 4. Definitions that reference each other always terminate

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::float_cmp,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use subst_define::{
    DefinitionValue, Defines, DefinitionsTree, EvaluatedKind, Evaluator, HookKind,
};
use subst_host::{compile, HostEvaluator};

// -- Strategies --

/// Upper-case path segments never collide with keywords or builtins.
fn segment_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Z0-9_]{0,6}").expect("valid regex")
}

fn path_strategy(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment_strategy(), 1..=max_len)
}

fn finite_number_strategy() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |n| n.is_finite())
}

/// Nest `value` under `path`, outermost segment first.
fn nested(path: &[String], value: DefinitionValue) -> DefinitionsTree {
    let (last, outer) = path.split_last().expect("non-empty path");
    let mut tree = DefinitionsTree::new().with(last.as_str(), value);
    for segment in outer.iter().rev() {
        tree = DefinitionsTree::new().with(segment.as_str(), tree);
    }
    tree
}

fn evaluate(tree: DefinitionsTree, source: &str) -> EvaluatedKind {
    let hooks = Defines::new(tree).register();
    HostEvaluator::new(&hooks).evaluate(source).into_kind()
}

// -- Rendering round trips --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// A string definition evaluates back to the same string.
    #[test]
    fn prop_string_definition_round_trips(value in any::<String>()) {
        let tree = DefinitionsTree::new().with("VALUE", DefinitionValue::string(value.clone()));
        prop_assert_eq!(evaluate(tree, "VALUE"), EvaluatedKind::String(value));
    }

    /// A number definition evaluates back to the same number.
    #[test]
    fn prop_number_definition_round_trips(value in finite_number_strategy()) {
        let tree = DefinitionsTree::new().with("VALUE", value);
        let kind = evaluate(tree, "VALUE");
        let EvaluatedKind::Number(evaluated) = kind else {
            return Err(TestCaseError::fail(format!("not a number: {:?}", kind)));
        };
        // Negative zero renders as `0`
        prop_assert_eq!(evaluated, value);
    }

    /// Spliced string definitions compare equal to their own literal.
    #[test]
    fn prop_spliced_string_is_valid_source(value in any::<String>()) {
        let tree = DefinitionsTree::new().with("VALUE", DefinitionValue::string(value));
        let hooks = Defines::new(tree).register();
        let compiled = compile("VALUE === VALUE", &hooks).unwrap();
        let kind = HostEvaluator::new(&hooks).evaluate(&compiled.output).into_kind();
        prop_assert_eq!(kind, EvaluatedKind::Boolean(true));
    }
}

// -- Registration --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 500,
        ..ProptestConfig::default()
    })]

    /// Strict prefixes of a dotted key are renamable but not rewritable.
    #[test]
    fn prop_dotted_key_registers_strict_prefixes(path in path_strategy(6)) {
        let key = path.join(".");
        let hooks = Defines::new(DefinitionsTree::new().with(key.as_str(), 1)).register();

        for end in 1..path.len() {
            let prefix = path[..end].join(".");
            prop_assert!(hooks.can_rename(&prefix), "prefix {} not renamable", prefix);
            prop_assert!(!hooks.is_registered(&prefix, HookKind::RewriteExpression));
        }
        prop_assert!(hooks.can_rename(&key));
        prop_assert!(hooks.is_registered(&key, HookKind::RewriteExpression));
        prop_assert_eq!(hooks.len(), path.len());
    }

    /// Nested trees answer `"object"` at every inner level.
    #[test]
    fn prop_nested_typeof_at_every_level(
        path in path_strategy(5),
        value in finite_number_strategy(),
    ) {
        let hooks = Defines::new(nested(&path, value.into())).register();

        for end in 1..=path.len() {
            let source = format!("typeof {}", path[..end].join("."));
            let expected = if end == path.len() { "\"number\"" } else { "\"object\"" };
            prop_assert_eq!(compile(&source, &hooks).unwrap().output, expected);
        }
    }
}

// -- Termination --

const CYCLE_KEYS: usize = 4;

/// Each key's code is a sum of references to other keys, possibly itself.
fn reference_graph_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..CYCLE_KEYS, 1..4), CYCLE_KEYS)
}

fn reference_tree(graph: &[Vec<usize>]) -> DefinitionsTree {
    graph
        .iter()
        .enumerate()
        .map(|(key, refs)| {
            let code = refs
                .iter()
                .map(|target| format!("K{}", target))
                .collect::<Vec<_>>()
                .join(" + ");
            (format!("K{}", key), DefinitionValue::code(code))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 500,
        ..ProptestConfig::default()
    })]

    /// Cyclic references never recurse forever and every use is replaced.
    #[test]
    fn prop_reference_cycles_terminate(graph in reference_graph_strategy()) {
        let hooks = Defines::new(reference_tree(&graph)).register();
        let compiled = compile("[typeof K0, K1, typeof K2, K3]", &hooks).unwrap();
        prop_assert_eq!(compiled.dependencies.len(), CYCLE_KEYS);

        // Every key reaches only other keys, so nothing is ever known
        let evaluator = HostEvaluator::new(&hooks);
        for key in 0..CYCLE_KEYS {
            let kind = evaluator.evaluate(&format!("K{}", key)).into_kind();
            prop_assert_eq!(kind, EvaluatedKind::Unknown);
        }
    }
}
