//! Replacement values and the definitions tree.
//!
//! A `DefinitionsTree` maps key fragments to `DefinitionValue`s. Nesting
//! expresses dotted paths: `{ process: { env: { NODE_ENV: .. } } }` and
//! `{ "process.env.NODE_ENV": .. }` both define `process.env.NODE_ENV`.
//!
//! The variant is chosen when the tree is built. A `Pattern` is never
//! mistaken for a nested tree, and `Code` is never mistaken for a string.

use std::fmt;

/// A regular-expression literal used as a replacement value.
///
/// Opaque to the engine: its only capability is rendering back to
/// `/body/flags` source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
    body: String,
    flags: String,
}

impl Pattern {
    pub fn new(body: impl Into<String>, flags: impl Into<String>) -> Self {
        Pattern {
            body: body.into(),
            flags: flags.into(),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Canonical literal form, e.g. `/ab+c/gi`.
    pub fn source_text(&self) -> String {
        format!("/{}/{}", self.body, self.flags)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.body, self.flags)
    }
}

/// A function used as a replacement value, held as its source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Callable {
    source: String,
}

impl Callable {
    pub fn new(source: impl Into<String>) -> Self {
        Callable {
            source: source.into(),
        }
    }

    /// The function's own source text, unwrapped.
    pub fn source_text(&self) -> &str {
        &self.source
    }
}

/// A single replacement value.
#[derive(Clone, Debug, PartialEq)]
pub enum DefinitionValue {
    Null,
    Undefined,
    Number(f64),
    /// A string value. Rendered as a quoted literal.
    String(String),
    Boolean(bool),
    Pattern(Pattern),
    Callable(Callable),
    /// Raw replacement source, emitted verbatim (`"A + 1"`, `"\"production\""`).
    Code(String),
    /// A nested tree, substitutable as a whole and per entry.
    Object(DefinitionsTree),
}

impl DefinitionValue {
    /// A string value, rendered quoted.
    pub fn string(value: impl Into<String>) -> Self {
        DefinitionValue::String(value.into())
    }

    /// Raw source text, rendered verbatim.
    pub fn code(source: impl Into<String>) -> Self {
        DefinitionValue::Code(source.into())
    }

    /// Short variant name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DefinitionValue::Null => "null",
            DefinitionValue::Undefined => "undefined",
            DefinitionValue::Number(_) => "number",
            DefinitionValue::String(_) => "string",
            DefinitionValue::Boolean(_) => "boolean",
            DefinitionValue::Pattern(_) => "pattern",
            DefinitionValue::Callable(_) => "callable",
            DefinitionValue::Code(_) => "code",
            DefinitionValue::Object(_) => "object",
        }
    }
}

impl From<bool> for DefinitionValue {
    fn from(value: bool) -> Self {
        DefinitionValue::Boolean(value)
    }
}

impl From<f64> for DefinitionValue {
    fn from(value: f64) -> Self {
        DefinitionValue::Number(value)
    }
}

impl From<i32> for DefinitionValue {
    fn from(value: i32) -> Self {
        DefinitionValue::Number(f64::from(value))
    }
}

impl From<Pattern> for DefinitionValue {
    fn from(value: Pattern) -> Self {
        DefinitionValue::Pattern(value)
    }
}

impl From<Callable> for DefinitionValue {
    fn from(value: Callable) -> Self {
        DefinitionValue::Callable(value)
    }
}

impl From<DefinitionsTree> for DefinitionValue {
    fn from(value: DefinitionsTree) -> Self {
        DefinitionValue::Object(value)
    }
}

/// Ordered mapping from key fragments to replacement values.
///
/// Iteration order is insertion order. Re-inserting a key replaces the value
/// in place and keeps its original position.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DefinitionsTree {
    entries: Vec<(String, DefinitionValue)>,
}

impl DefinitionsTree {
    pub fn new() -> Self {
        DefinitionsTree::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DefinitionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an entry, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DefinitionValue>,
    ) -> Option<DefinitionValue> {
        let key = key.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&DefinitionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DefinitionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<DefinitionValue>> FromIterator<(K, V)> for DefinitionsTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = DefinitionsTree::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}
