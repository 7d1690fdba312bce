//! The host side of the hook contract.
//!
//! A host parser supplies an `Evaluator` for replacement text and a
//! `DependencySink` that collects constant-substitution instructions. Hooks
//! receive the matched node as an `ExprSite`.

use subst_ir::{Location, Span};

use crate::EvaluatedExpression;

/// The node a hook fired for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ExprSite {
    pub span: Span,
    pub loc: Location,
}

impl ExprSite {
    #[inline]
    pub const fn new(span: Span, loc: Location) -> Self {
        ExprSite { span, loc }
    }
}

/// Instruction to replace `span` with `expression` when rendering output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstDependency {
    pub expression: String,
    pub span: Span,
    pub loc: Location,
}

impl ConstDependency {
    pub fn new(expression: impl Into<String>, site: &ExprSite) -> Self {
        ConstDependency {
            expression: expression.into(),
            span: site.span,
            loc: site.loc,
        }
    }
}

/// Result of a rewrite hook.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HookOutcome {
    /// The node was rewritten; the host must not walk into it further.
    Handled,
    /// Not applicable; the host continues with its default behaviour.
    Declined,
}

impl HookOutcome {
    #[inline]
    pub fn is_handled(self) -> bool {
        matches!(self, HookOutcome::Handled)
    }
}

/// Evaluates source text in the host's expression language.
///
/// Implementations are expected to consult the same `HookTable` for the
/// identifiers they meet, which is why evaluation hooks are guarded against
/// re-entry.
pub trait Evaluator {
    fn evaluate(&self, source: &str) -> EvaluatedExpression;
}

/// Receives constant-substitution instructions.
pub trait DependencySink {
    fn add_dependency(&mut self, dependency: ConstDependency);
}

impl DependencySink for Vec<ConstDependency> {
    fn add_dependency(&mut self, dependency: ConstDependency) {
        self.push(dependency);
    }
}
