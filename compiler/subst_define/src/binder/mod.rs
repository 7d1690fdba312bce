//! Binders attach the per-path callbacks to a `HookTable`.
//!
//! - [`bind_leaf`]: a path whose value is a final replacement
//! - [`bind_object_path`]: a path whose value is a nested tree

mod leaf;
mod object;

pub use leaf::bind_leaf;
pub use object::bind_object_path;
