//! Subst IR - shared data model for compile-time constant substitution.
//!
//! This crate holds everything the substitution engine and its hosts agree on:
//!
//! - `Span`, `Position`, `Location`: where a matched node lives in the source
//! - `DefinitionValue`, `DefinitionsTree`: the user-supplied replacement table
//! - `Pattern`, `Callable`: opaque replacement values that only render to text
//! - `SymbolPath`: a parsed dotted key, with its `typeof` marker split off
//! - `render_source`: the value serializer producing replacement source text
//!
//! Nothing in here evaluates code. Rendering is pure text generation, which
//! keeps it usable both at setup time and while hooks fire.

mod location;
pub mod render;
mod span;
mod symbol_path;
mod value;

pub use location::{Location, Position};
pub use render::{format_number, quote_string, render_source, render_tree};
pub use span::{Span, SpanError};
pub use symbol_path::SymbolPath;
pub use value::{Callable, DefinitionValue, DefinitionsTree, Pattern};
