//! Value serializer.
//!
//! Turns a `DefinitionValue` into a source fragment that can be spliced into
//! the program in place of a symbol reference. Pure text generation: nothing
//! here evaluates code, so it is safe to call at setup time and from hooks.

use crate::{DefinitionValue, DefinitionsTree};

/// Render a replacement value as source text.
pub fn render_source(value: &DefinitionValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Render a nested tree as an object literal: `{"key":value,...}`.
///
/// Keys are always quoted so that non-identifier key text stays valid.
pub fn render_tree(tree: &DefinitionsTree) -> String {
    let mut out = String::new();
    write_tree(&mut out, tree);
    out
}

/// Quote a string as a double-quoted literal with JSON escaping.
pub fn quote_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

/// Render a number the way the language prints it.
///
/// Finite values use the shortest round-trip digits: plain decimal for
/// magnitudes in `[1e-6, 1e21)`, exponent form (`1e+21`, `5e-324`) outside
/// it. Negative zero prints as `0` and the non-finite values use their
/// global names.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        let name = if value > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_owned()
    } else if value == 0.0 {
        "0".to_owned()
    } else if (1e-6..1e21).contains(&value.abs()) {
        format!("{value}")
    } else {
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    }
}

fn write_value(out: &mut String, value: &DefinitionValue) {
    match value {
        DefinitionValue::Null => out.push_str("null"),
        DefinitionValue::Undefined => out.push_str("undefined"),
        DefinitionValue::Pattern(pattern) => out.push_str(&pattern.source_text()),
        DefinitionValue::Callable(callable) => {
            out.push('(');
            out.push_str(callable.source_text());
            out.push(')');
        }
        DefinitionValue::Object(tree) => write_tree(out, tree),
        DefinitionValue::Number(n) => out.push_str(&format_number(*n)),
        DefinitionValue::String(s) => out.push_str(&quote_string(s)),
        DefinitionValue::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        DefinitionValue::Code(code) => out.push_str(code),
    }
}

fn write_tree(out: &mut String, tree: &DefinitionsTree) {
    out.push('{');
    for (i, (key, child)) in tree.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote_string(key));
        out.push(':');
        write_value(out, child);
    }
    out.push('}');
}
