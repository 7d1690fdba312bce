//! Recursive descent parser.
//!
//! Pulls tokens from the lexer one at a time with a single token of
//! lookahead. Speculative parses (arrow function parameter lists) take a
//! snapshot of the lexer and current token and restore it on failure.

mod expr;
mod stmt;

use subst_ir::Span;

use crate::ast::{Expr, Program};
use crate::lexer::{Keyword, Lexer, Punct, Token, TokenKind};
use crate::ParseError;

/// Parse a whole program.
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let mut parser = Parser::new(source)?;
    parser.program()
}

/// Parse a single expression that must span the whole input.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(source)?;
    let expr = parser.expression()?;
    if !parser.at_eof() {
        return Err(parser.unexpected("end of input"));
    }
    Ok(expr)
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    /// End of the most recently consumed token.
    prev_end: u32,
}

/// Saved parser position for backtracking.
struct Snapshot<'src> {
    lexer: Lexer<'src>,
    current: Token,
    prev_end: u32,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Result<Self, ParseError> {
        if u32::try_from(source.len()).is_err() {
            return Err(ParseError::SourceTooLarge { len: source.len() });
        }
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            prev_end: 0,
        })
    }

    // Token access

    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        self.prev_end = self.current.span.end;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn at(&self, punct: Punct) -> bool {
        self.current.kind == TokenKind::Punct(punct)
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    fn at_eof(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    fn eat(&mut self, punct: Punct) -> Result<bool, ParseError> {
        if self.at(punct) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, punct: Punct) -> Result<Token, ParseError> {
        if self.at(punct) {
            return self.advance();
        }
        Err(self.unexpected(punct.as_str()))
    }

    fn expect_identifier(&mut self) -> Result<(String, Span), ParseError> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            let token = self.advance()?;
            return Ok((name, token.span));
        }
        Err(self.unexpected("identifier"))
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Expected {
            expected,
            found: self.current.kind.describe(),
            span: self.current.span,
        }
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end)
    }

    // Backtracking

    fn snapshot(&self) -> Snapshot<'src> {
        Snapshot {
            lexer: self.lexer.clone(),
            current: self.current.clone(),
            prev_end: self.prev_end,
        }
    }

    fn restore(&mut self, snapshot: Snapshot<'src>) {
        self.lexer = snapshot.lexer;
        self.current = snapshot.current;
        self.prev_end = snapshot.prev_end;
    }
}

#[cfg(test)]
mod tests;
