//! Subst Define - compile-time constant substitution.
//!
//! Given a `DefinitionsTree` such as
//! `{ "process.env.NODE_ENV": "\"production\"", FEATURES: { a: true } }`,
//! this crate registers hooks that let a host parser replace references to
//! those paths with literal source text and answer `typeof` queries about
//! them without running anything.
//!
//! # Architecture
//!
//! - `Defines`: owns the definitions tree and builds one `HookTable` per
//!   compilation unit
//! - `register_all`: walks the tree, registering renamable prefixes and
//!   delegating to the binders
//! - `bind_leaf` / `bind_object_path`: attach the per-path callbacks
//! - `HookTable`: typed path -> callbacks mapping the host queries
//! - `ReentrancyGuard`: stops a replacement that mentions its own symbol from
//!   re-evaluating itself forever
//!
//! The host side of the contract is the `Evaluator` and `DependencySink`
//! traits in [`host`]. Hooks never fail: they either handle a node or decline
//! and let the host fall back to its default behaviour.

pub mod binder;
mod defines;
mod evaluated;
mod guard;
pub mod host;
mod hooks;
mod registrar;

#[cfg(test)]
mod test_support;

pub use binder::{bind_leaf, bind_object_path};
pub use defines::Defines;
pub use evaluated::{EvaluatedExpression, EvaluatedKind};
pub use guard::{GuardScope, GuardState, ReentrancyGuard};
pub use hooks::{EvaluateHook, HookKind, HookTable, RewriteHook};
pub use host::{ConstDependency, DependencySink, Evaluator, ExprSite, HookOutcome};
pub use registrar::register_all;

// Re-export the data model so hosts can depend on this crate alone
pub use subst_ir::{
    Callable, DefinitionValue, DefinitionsTree, Location, Pattern, Position, Span, SymbolPath,
};
