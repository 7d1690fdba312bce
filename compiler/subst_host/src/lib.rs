//! Subst Host - a reference host for constant substitution.
//!
//! Implements the host side of the hook contract for a small JavaScript-like
//! language so definitions can be exercised end to end:
//!
//! ```text
//! source -> parse -> Walker (fires hooks) -> ConstDependency list -> splice -> output
//! ```
//!
//! - [`parse_program`] / [`parse_expression`]: on-demand lexer and recursive
//!   descent parser
//! - [`HostEvaluator`]: static evaluator for replacement text, consulting the
//!   hook table for identifiers and `typeof`
//! - [`Walker`]: scope-aware traversal that fires rewrite hooks
//! - [`apply_replacements`]: splices replacement text into the source
//!
//! The language is a subset: no loops, classes, template literals, or
//! comma expressions.

pub mod ast;
mod errors;
mod eval;
mod lexer;
mod parser;
mod splice;
mod stack;
mod walker;

use std::sync::Once;

use subst_define::{ConstDependency, HookTable};
use tracing::debug;

pub use errors::ParseError;
pub use eval::HostEvaluator;
pub use parser::{parse_expression, parse_program};
pub use splice::apply_replacements;
pub use stack::ensure_sufficient_stack;
pub use walker::Walker;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call in a
/// process has any effect.
///
/// ```text
/// RUST_LOG=subst_define=trace      # every hook firing
/// RUST_LOG=subst_host=debug        # compile summaries, unparsable input
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Result of compiling one source text.
#[derive(Clone, Debug, PartialEq)]
pub struct Compiled {
    /// The source with every substitution applied.
    pub output: String,
    /// Substitutions in the order the walker emitted them.
    pub dependencies: Vec<ConstDependency>,
}

/// Parse `source`, fire the hooks in `hooks` over it, and splice in the
/// results.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn compile(source: &str, hooks: &HookTable) -> Result<Compiled, ParseError> {
    let program = parse_program(source)?;
    let dependencies = Walker::new(source, hooks).walk_program(&program);
    let output = apply_replacements(source, &dependencies);
    debug!(replacements = dependencies.len(), "compiled");
    Ok(Compiled {
        output,
        dependencies,
    })
}
