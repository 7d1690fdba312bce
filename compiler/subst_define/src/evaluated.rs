//! Evaluation results exchanged between hooks and the host evaluator.

use subst_ir::{format_number, Pattern, Span};

/// What the evaluator managed to learn about an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluatedKind {
    /// Nothing is known statically.
    Unknown,
    Null,
    Undefined,
    Boolean(bool),
    Number(f64),
    String(String),
    RegExp(Pattern),
    /// A function value; its body is never inspected.
    Function,
    /// An object or array whose contents are not tracked.
    Object,
}

/// An evaluation result tagged with the source range it describes.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluatedExpression {
    kind: EvaluatedKind,
    span: Option<Span>,
}

impl EvaluatedExpression {
    pub fn new(kind: EvaluatedKind) -> Self {
        EvaluatedExpression { kind, span: None }
    }

    pub fn unknown() -> Self {
        Self::new(EvaluatedKind::Unknown)
    }

    pub fn null() -> Self {
        Self::new(EvaluatedKind::Null)
    }

    pub fn undefined() -> Self {
        Self::new(EvaluatedKind::Undefined)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(EvaluatedKind::Boolean(value))
    }

    pub fn number(value: f64) -> Self {
        Self::new(EvaluatedKind::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(EvaluatedKind::String(value.into()))
    }

    pub fn regexp(pattern: Pattern) -> Self {
        Self::new(EvaluatedKind::RegExp(pattern))
    }

    pub fn function() -> Self {
        Self::new(EvaluatedKind::Function)
    }

    pub fn object() -> Self {
        Self::new(EvaluatedKind::Object)
    }

    #[inline]
    pub fn kind(&self) -> &EvaluatedKind {
        &self.kind
    }

    #[inline]
    pub fn into_kind(self) -> EvaluatedKind {
        self.kind
    }

    #[inline]
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Attach the range of the node this result stands for.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self.kind, EvaluatedKind::String(_))
    }

    /// The string value, if this result is string-typed.
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            EvaluatedKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// The `typeof` answer for this value, when it is known.
    pub fn typeof_name(&self) -> Option<&'static str> {
        Some(match self.kind {
            EvaluatedKind::Unknown => return None,
            EvaluatedKind::Undefined => "undefined",
            EvaluatedKind::Boolean(_) => "boolean",
            EvaluatedKind::Number(_) => "number",
            EvaluatedKind::String(_) => "string",
            EvaluatedKind::Function => "function",
            EvaluatedKind::Null | EvaluatedKind::RegExp(_) | EvaluatedKind::Object => "object",
        })
    }

    /// Whether the value is truthy, when it is known.
    pub fn truthiness(&self) -> Option<bool> {
        match &self.kind {
            EvaluatedKind::Unknown => None,
            EvaluatedKind::Null | EvaluatedKind::Undefined => Some(false),
            EvaluatedKind::Boolean(b) => Some(*b),
            EvaluatedKind::Number(n) => Some(*n != 0.0 && !n.is_nan()),
            EvaluatedKind::String(s) => Some(!s.is_empty()),
            EvaluatedKind::RegExp(_) | EvaluatedKind::Function | EvaluatedKind::Object => {
                Some(true)
            }
        }
    }

    /// String conversion of a primitive, as used by `+` concatenation.
    pub fn to_primitive_string(&self) -> Option<String> {
        match &self.kind {
            EvaluatedKind::Null => Some("null".to_owned()),
            EvaluatedKind::Undefined => Some("undefined".to_owned()),
            EvaluatedKind::Boolean(b) => Some(b.to_string()),
            EvaluatedKind::Number(n) => Some(format_number(*n)),
            EvaluatedKind::String(s) => Some(s.clone()),
            EvaluatedKind::RegExp(p) => Some(p.source_text()),
            EvaluatedKind::Unknown | EvaluatedKind::Function | EvaluatedKind::Object => None,
        }
    }
}
