//! Per-compilation hook table.
//!
//! Maps a dotted path to its `PathHooks`: a renamable flag plus four ordered
//! callback slots. The host queries it through one typed method per hook
//! kind. Several registrations may land on the same path; they run in
//! registration order and the first one that does not decline wins.

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::host::{DependencySink, Evaluator, ExprSite, HookOutcome};
use crate::EvaluatedExpression;

/// Callback answering "what does this identifier / `typeof` evaluate to".
pub type EvaluateHook = Box<dyn Fn(&ExprSite, &dyn Evaluator) -> Option<EvaluatedExpression>>;

/// Callback rewriting a matched node by emitting into the sink.
pub type RewriteHook =
    Box<dyn Fn(&ExprSite, &dyn Evaluator, &mut dyn DependencySink) -> HookOutcome>;

/// The kinds of registration a path can carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    CanRename,
    EvaluateIdentifier,
    EvaluateTypeof,
    RewriteExpression,
    RewriteTypeof,
}

impl HookKind {
    pub const ALL: [HookKind; 5] = [
        HookKind::CanRename,
        HookKind::EvaluateIdentifier,
        HookKind::EvaluateTypeof,
        HookKind::RewriteExpression,
        HookKind::RewriteTypeof,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HookKind::CanRename => "can_rename",
            HookKind::EvaluateIdentifier => "evaluate_identifier",
            HookKind::EvaluateTypeof => "evaluate_typeof",
            HookKind::RewriteExpression => "rewrite_expression",
            HookKind::RewriteTypeof => "rewrite_typeof",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything registered for one path.
#[derive(Default)]
struct PathHooks {
    can_rename: bool,
    evaluate_identifier: SmallVec<[EvaluateHook; 1]>,
    evaluate_typeof: SmallVec<[EvaluateHook; 1]>,
    rewrite_expression: SmallVec<[RewriteHook; 1]>,
    rewrite_typeof: SmallVec<[RewriteHook; 1]>,
}

impl PathHooks {
    fn has(&self, kind: HookKind) -> bool {
        match kind {
            HookKind::CanRename => self.can_rename,
            HookKind::EvaluateIdentifier => !self.evaluate_identifier.is_empty(),
            HookKind::EvaluateTypeof => !self.evaluate_typeof.is_empty(),
            HookKind::RewriteExpression => !self.rewrite_expression.is_empty(),
            HookKind::RewriteTypeof => !self.rewrite_typeof.is_empty(),
        }
    }
}

/// Hook registrations for one compilation unit.
#[derive(Default)]
pub struct HookTable {
    paths: FxHashMap<String, PathHooks>,
}

impl HookTable {
    pub fn new() -> Self {
        HookTable::default()
    }

    /// Number of distinct paths with at least one registration.
    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// All registered paths, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    pub fn is_registered(&self, path: &str, kind: HookKind) -> bool {
        self.paths.get(path).is_some_and(|hooks| hooks.has(kind))
    }

    fn entry(&mut self, path: &str) -> &mut PathHooks {
        self.paths.entry(path.to_owned()).or_default()
    }

    // Registration

    pub fn register_can_rename(&mut self, path: &str) {
        self.entry(path).can_rename = true;
    }

    pub fn on_evaluate_identifier(
        &mut self,
        path: &str,
        hook: impl Fn(&ExprSite, &dyn Evaluator) -> Option<EvaluatedExpression> + 'static,
    ) {
        self.entry(path).evaluate_identifier.push(Box::new(hook));
    }

    pub fn on_evaluate_typeof(
        &mut self,
        path: &str,
        hook: impl Fn(&ExprSite, &dyn Evaluator) -> Option<EvaluatedExpression> + 'static,
    ) {
        self.entry(path).evaluate_typeof.push(Box::new(hook));
    }

    pub fn on_rewrite_expression(
        &mut self,
        path: &str,
        hook: impl Fn(&ExprSite, &dyn Evaluator, &mut dyn DependencySink) -> HookOutcome + 'static,
    ) {
        self.entry(path).rewrite_expression.push(Box::new(hook));
    }

    pub fn on_rewrite_typeof(
        &mut self,
        path: &str,
        hook: impl Fn(&ExprSite, &dyn Evaluator, &mut dyn DependencySink) -> HookOutcome + 'static,
    ) {
        self.entry(path).rewrite_typeof.push(Box::new(hook));
    }

    // Queries

    /// Whether `path` is a substitutable symbol rather than a real variable.
    pub fn can_rename(&self, path: &str) -> bool {
        self.is_registered(path, HookKind::CanRename)
    }

    pub fn evaluate_identifier(
        &self,
        path: &str,
        site: &ExprSite,
        evaluator: &dyn Evaluator,
    ) -> Option<EvaluatedExpression> {
        let hooks = self.paths.get(path)?;
        first_evaluation(
            &hooks.evaluate_identifier,
            path,
            HookKind::EvaluateIdentifier,
            site,
            evaluator,
        )
    }

    pub fn evaluate_typeof(
        &self,
        path: &str,
        site: &ExprSite,
        evaluator: &dyn Evaluator,
    ) -> Option<EvaluatedExpression> {
        let hooks = self.paths.get(path)?;
        first_evaluation(
            &hooks.evaluate_typeof,
            path,
            HookKind::EvaluateTypeof,
            site,
            evaluator,
        )
    }

    pub fn rewrite_expression(
        &self,
        path: &str,
        site: &ExprSite,
        evaluator: &dyn Evaluator,
        sink: &mut dyn DependencySink,
    ) -> HookOutcome {
        let Some(hooks) = self.paths.get(path) else {
            return HookOutcome::Declined;
        };
        first_rewrite(
            &hooks.rewrite_expression,
            path,
            HookKind::RewriteExpression,
            site,
            evaluator,
            sink,
        )
    }

    pub fn rewrite_typeof(
        &self,
        path: &str,
        site: &ExprSite,
        evaluator: &dyn Evaluator,
        sink: &mut dyn DependencySink,
    ) -> HookOutcome {
        let Some(hooks) = self.paths.get(path) else {
            return HookOutcome::Declined;
        };
        first_rewrite(
            &hooks.rewrite_typeof,
            path,
            HookKind::RewriteTypeof,
            site,
            evaluator,
            sink,
        )
    }
}

fn first_evaluation(
    slot: &[EvaluateHook],
    path: &str,
    kind: HookKind,
    site: &ExprSite,
    evaluator: &dyn Evaluator,
) -> Option<EvaluatedExpression> {
    for hook in slot {
        trace!(path, %kind, span = %site.span, "hook fired");
        if let Some(result) = hook(site, evaluator) {
            return Some(result);
        }
    }
    None
}

fn first_rewrite(
    slot: &[RewriteHook],
    path: &str,
    kind: HookKind,
    site: &ExprSite,
    evaluator: &dyn Evaluator,
    sink: &mut dyn DependencySink,
) -> HookOutcome {
    for hook in slot {
        trace!(path, %kind, span = %site.span, "hook fired");
        if hook(site, evaluator, &mut *sink).is_handled() {
            return HookOutcome::Handled;
        }
    }
    HookOutcome::Declined
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<_> = self.paths.iter().collect();
        paths.sort_by(|a, b| a.0.cmp(b.0));
        let mut map = f.debug_map();
        for (path, hooks) in paths {
            let kinds: Vec<_> = HookKind::ALL
                .into_iter()
                .filter(|kind| hooks.has(*kind))
                .map(HookKind::name)
                .collect();
            map.entry(path, &kinds);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests;
