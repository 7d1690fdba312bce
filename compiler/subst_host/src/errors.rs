//! Parse errors.

use subst_ir::Span;

/// Error produced while lexing or parsing host source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("source of {len} bytes exceeds the addressable span range")]
    SourceTooLarge { len: usize },

    #[error("unexpected character `{ch}` at {span}")]
    UnexpectedCharacter { ch: char, span: Span },

    #[error("unterminated string literal at {span}")]
    UnterminatedString { span: Span },

    #[error("unterminated block comment at {span}")]
    UnterminatedComment { span: Span },

    #[error("unterminated regular expression at {span}")]
    UnterminatedRegex { span: Span },

    #[error("invalid escape sequence at {span}")]
    InvalidEscape { span: Span },

    #[error("invalid number literal at {span}")]
    InvalidNumber { span: Span },

    #[error("expected {expected}, found {found} at {span}")]
    Expected {
        expected: &'static str,
        found: String,
        span: Span,
    },

    #[error("invalid assignment target at {span}")]
    InvalidAssignmentTarget { span: Span },
}

impl ParseError {
    /// Source range the error points at.
    pub fn span(&self) -> Span {
        match self {
            ParseError::SourceTooLarge { .. } => Span::DUMMY,
            ParseError::UnexpectedCharacter { span, .. }
            | ParseError::UnterminatedString { span }
            | ParseError::UnterminatedComment { span }
            | ParseError::UnterminatedRegex { span }
            | ParseError::InvalidEscape { span }
            | ParseError::InvalidNumber { span }
            | ParseError::Expected { span, .. }
            | ParseError::InvalidAssignmentTarget { span } => *span,
        }
    }
}
