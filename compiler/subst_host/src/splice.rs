//! Replacement splicing.

use subst_define::{ConstDependency, Span};
use tracing::{debug, trace};

/// Replace each dependency's span in `source` with its expression text.
///
/// Replacements are applied in span order. One that starts inside an
/// already replaced range is skipped, as is one whose span does not fall on
/// character boundaries of `source`.
pub fn apply_replacements(source: &str, dependencies: &[ConstDependency]) -> String {
    let mut ordered: Vec<&ConstDependency> = dependencies.iter().collect();
    ordered.sort_by_key(|dependency| (dependency.span.start, dependency.span.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    let mut applied: Option<Span> = None;
    for dependency in ordered {
        if applied.is_some_and(|previous| previous.overlaps(dependency.span)) {
            trace!(span = %dependency.span, "overlapping replacement skipped");
            continue;
        }
        let range = dependency.span.to_range();
        let (Some(before), Some(_)) = (source.get(cursor..range.start), source.get(range.clone()))
        else {
            debug!(span = %dependency.span, "replacement outside source skipped");
            continue;
        };
        output.push_str(before);
        output.push_str(&dependency.expression);
        cursor = range.end;
        applied = Some(dependency.span);
    }
    output.push_str(source.get(cursor..).unwrap_or_default());
    output
}
