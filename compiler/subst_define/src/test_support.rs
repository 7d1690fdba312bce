//! Shared test doubles for the host interfaces.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use subst_ir::{Location, Span};

use crate::host::{Evaluator, ExprSite};
use crate::{EvaluatedExpression, HookTable};

/// Evaluator answering from a fixed source -> result table.
///
/// Unlisted sources evaluate to `Unknown`. Every request is recorded.
#[derive(Default)]
pub struct ScriptedEvaluator {
    answers: FxHashMap<String, EvaluatedExpression>,
    pub requests: RefCell<Vec<String>>,
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        ScriptedEvaluator::default()
    }

    #[must_use]
    pub fn answer(mut self, source: &str, result: EvaluatedExpression) -> Self {
        self.answers.insert(source.to_owned(), result);
        self
    }
}

impl Evaluator for ScriptedEvaluator {
    fn evaluate(&self, source: &str) -> EvaluatedExpression {
        self.requests.borrow_mut().push(source.to_owned());
        self.answers
            .get(source)
            .cloned()
            .unwrap_or_else(EvaluatedExpression::unknown)
    }
}

/// Evaluator that treats every source text as a single identifier and asks
/// the hook table about it, like a host evaluating `A` inside `A`'s own
/// replacement would.
pub struct LoopbackEvaluator<'a> {
    pub table: &'a HookTable,
    pub calls: RefCell<usize>,
}

impl<'a> LoopbackEvaluator<'a> {
    pub fn new(table: &'a HookTable) -> Self {
        LoopbackEvaluator {
            table,
            calls: RefCell::new(0),
        }
    }
}

impl Evaluator for LoopbackEvaluator<'_> {
    fn evaluate(&self, source: &str) -> EvaluatedExpression {
        *self.calls.borrow_mut() += 1;
        let name = source.split_whitespace().next().unwrap_or_default();
        self.table
            .evaluate_identifier(name, &site(0, 0), self)
            .unwrap_or_else(EvaluatedExpression::unknown)
    }
}

pub fn site(start: u32, end: u32) -> ExprSite {
    ExprSite::new(Span::new(start, end), Location::default())
}
