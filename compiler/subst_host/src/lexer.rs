//! On-demand lexer.
//!
//! The parser pulls one token at a time. `/` always lexes as a division
//! punctuator; when the parser is at an operand position it asks for the
//! same offset to be re-scanned as a regular expression literal.

use subst_ir::{Pattern, Span};

use crate::ParseError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Keyword {
    Var,
    Let,
    Const,
    Function,
    Return,
    If,
    Else,
    Typeof,
    Void,
    True,
    False,
    Null,
}

impl Keyword {
    fn from_text(text: &str) -> Option<Keyword> {
        Some(match text {
            "var" => Keyword::Var,
            "let" => Keyword::Let,
            "const" => Keyword::Const,
            "function" => Keyword::Function,
            "return" => Keyword::Return,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "typeof" => Keyword::Typeof,
            "void" => Keyword::Void,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "null" => Keyword::Null,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Var => "var",
            Keyword::Let => "let",
            Keyword::Const => "const",
            Keyword::Function => "function",
            Keyword::Return => "return",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Typeof => "typeof",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Punct {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Question,
    Colon,
    Arrow,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AndAnd,
    OrOr,
}

/// Longest match first.
const PUNCTUATORS: &[(&str, Punct)] = &[
    ("===", Punct::EqEqEq),
    ("!==", Punct::NotEqEq),
    ("=>", Punct::Arrow),
    ("==", Punct::EqEq),
    ("!=", Punct::NotEq),
    ("<=", Punct::LtEq),
    (">=", Punct::GtEq),
    ("&&", Punct::AndAnd),
    ("||", Punct::OrOr),
    ("+=", Punct::PlusAssign),
    ("-=", Punct::MinusAssign),
    ("*=", Punct::StarAssign),
    ("/=", Punct::SlashAssign),
    ("%=", Punct::PercentAssign),
    ("(", Punct::LParen),
    (")", Punct::RParen),
    ("{", Punct::LBrace),
    ("}", Punct::RBrace),
    ("[", Punct::LBracket),
    ("]", Punct::RBracket),
    (";", Punct::Semi),
    (",", Punct::Comma),
    (".", Punct::Dot),
    ("?", Punct::Question),
    (":", Punct::Colon),
    ("=", Punct::Assign),
    ("<", Punct::Lt),
    (">", Punct::Gt),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("%", Punct::Percent),
    ("!", Punct::Bang),
];

impl Punct {
    pub fn as_str(self) -> &'static str {
        PUNCTUATORS
            .iter()
            .find(|(_, punct)| *punct == self)
            .map_or("?", |(text, _)| *text)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Keyword(Keyword),
    Number(f64),
    String(String),
    Regex(Pattern),
    Punct(Punct),
    Eof,
}

impl TokenKind {
    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(name) => format!("identifier `{name}`"),
            TokenKind::Keyword(keyword) => format!("`{}`", keyword.as_str()),
            TokenKind::Number(_) => "number literal".to_owned(),
            TokenKind::String(_) => "string literal".to_owned(),
            TokenKind::Regex(_) => "regular expression".to_owned(),
            TokenKind::Punct(punct) => format!("`{}`", punct.as_str()),
            TokenKind::Eof => "end of input".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

#[derive(Clone, Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Lexer<'src> {
    /// The caller guarantees `source.len()` fits in a `u32`.
    pub fn new(source: &'src str) -> Self {
        Lexer { source, pos: 0 }
    }

    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia()?;
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, span(start, start)));
        };

        let kind = if is_ident_start(ch) {
            self.identifier(start)
        } else if ch.is_ascii_digit()
            || (ch == '.' && self.peek_second().is_some_and(|c| c.is_ascii_digit()))
        {
            self.number(start)?
        } else if ch == '"' || ch == '\'' {
            self.string(ch, start)?
        } else {
            TokenKind::Punct(self.punct(ch, start)?)
        };
        Ok(Token::new(kind, span(start, self.pos)))
    }

    /// Re-scan from `start` (a `/` or `/=` token) as a regular expression.
    pub fn rescan_regex(&mut self, start: u32) -> Result<Token, ParseError> {
        let start = start as usize;
        self.pos = start + 1;
        let mut in_class = false;
        loop {
            match self.peek() {
                None | Some('\n' | '\r') => {
                    return Err(ParseError::UnterminatedRegex {
                        span: span(start, self.pos),
                    });
                }
                Some('\\') => {
                    self.bump();
                    if matches!(self.peek(), None | Some('\n' | '\r')) {
                        return Err(ParseError::UnterminatedRegex {
                            span: span(start, self.pos),
                        });
                    }
                    self.bump();
                }
                Some('[') => {
                    in_class = true;
                    self.bump();
                }
                Some(']') => {
                    in_class = false;
                    self.bump();
                }
                Some('/') if !in_class => break,
                Some(_) => self.bump(),
            }
        }
        let source = self.source;
        let body = &source[start + 1..self.pos];
        self.bump();
        let flags_start = self.pos;
        self.eat_while(is_ident_continue);
        let flags = &source[flags_start..self.pos];
        Ok(Token::new(
            TokenKind::Regex(Pattern::new(body, flags)),
            span(start, self.pos),
        ))
    }

    // Character access

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                self.eat_while(|c| c != '\n');
            } else if rest.starts_with("/*") {
                let Some(close) = rest[2..].find("*/") else {
                    return Err(ParseError::UnterminatedComment {
                        span: span(self.pos, self.source.len()),
                    });
                };
                self.pos += close + 4;
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.eat_while(char::is_whitespace);
            } else {
                return Ok(());
            }
        }
    }

    // Token kinds

    fn identifier(&mut self, start: usize) -> TokenKind {
        self.eat_while(is_ident_continue);
        let text = &self.source[start..self.pos];
        match Keyword::from_text(text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(text.to_owned()),
        }
    }

    fn number(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        let invalid = |end| ParseError::InvalidNumber {
            span: span(start, end),
        };

        let value = if self.rest().starts_with("0x") || self.rest().starts_with("0X") {
            self.pos += 2;
            let digits_start = self.pos;
            self.eat_while(|c| c.is_ascii_hexdigit());
            let digits = &self.source[digits_start..self.pos];
            if digits.is_empty() {
                return Err(invalid(self.pos));
            }
            digits
                .chars()
                .filter_map(|c| c.to_digit(16))
                .fold(0.0, |acc, digit| acc * 16.0 + f64::from(digit))
        } else {
            self.eat_while(|c| c.is_ascii_digit());
            if self.peek() == Some('.') {
                self.bump();
                self.eat_while(|c| c.is_ascii_digit());
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(invalid(self.pos));
                }
                self.eat_while(|c| c.is_ascii_digit());
            }
            self.source[start..self.pos]
                .parse::<f64>()
                .map_err(|_| invalid(self.pos))?
        };

        // `3in` is not a number followed by an identifier
        if self.peek().is_some_and(is_ident_start) {
            self.eat_while(is_ident_continue);
            return Err(invalid(self.pos));
        }
        Ok(TokenKind::Number(value))
    }

    fn string(&mut self, quote: char, start: usize) -> Result<TokenKind, ParseError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n' | '\r') => {
                    return Err(ParseError::UnterminatedString {
                        span: span(start, self.pos),
                    });
                }
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(TokenKind::String(value));
                }
                Some('\\') => self.escape(start, &mut value)?,
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
    }

    fn escape(&mut self, string_start: usize, value: &mut String) -> Result<(), ParseError> {
        let escape_start = self.pos;
        self.bump();
        let Some(ch) = self.peek() else {
            return Err(ParseError::UnterminatedString {
                span: span(string_start, self.pos),
            });
        };
        self.bump();
        let decoded = match ch {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            'x' => self.hex_escape(escape_start, 2)?,
            'u' => self.unicode_escape(escape_start)?,
            // Line continuations
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
                return Ok(());
            }
            '\n' | '\u{2028}' | '\u{2029}' => return Ok(()),
            other => other,
        };
        value.push(decoded);
        Ok(())
    }

    fn hex_digits(&mut self, escape_start: usize, count: usize) -> Result<u32, ParseError> {
        let digits = self
            .rest()
            .get(..count)
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()));
        let Some(digits) = digits else {
            return Err(ParseError::InvalidEscape {
                span: span(escape_start, self.pos),
            });
        };
        let code = u32::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidEscape {
            span: span(escape_start, self.pos),
        })?;
        self.pos += count;
        Ok(code)
    }

    fn hex_escape(&mut self, escape_start: usize, count: usize) -> Result<char, ParseError> {
        let code = self.hex_digits(escape_start, count)?;
        self.char_from(code, escape_start)
    }

    fn unicode_escape(&mut self, escape_start: usize) -> Result<char, ParseError> {
        if self.peek() == Some('{') {
            self.bump();
            let source = self.source;
            let digits_start = self.pos;
            self.eat_while(|c| c.is_ascii_hexdigit());
            let digits = &source[digits_start..self.pos];
            if digits.is_empty() || self.peek() != Some('}') {
                return Err(ParseError::InvalidEscape {
                    span: span(escape_start, self.pos),
                });
            }
            self.bump();
            let code = u32::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidEscape {
                span: span(escape_start, self.pos),
            })?;
            return self.char_from(code, escape_start);
        }

        let code = self.hex_digits(escape_start, 4)?;
        if (0xD800..0xDC00).contains(&code) && self.rest().starts_with("\\u") {
            // Surrogate pair spelled as two escapes
            self.pos += 2;
            let low = self.hex_digits(escape_start, 4)?;
            if (0xDC00..0xE000).contains(&low) {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return self.char_from(combined, escape_start);
            }
        }
        self.char_from(code, escape_start)
    }

    fn char_from(&self, code: u32, escape_start: usize) -> Result<char, ParseError> {
        char::from_u32(code).ok_or(ParseError::InvalidEscape {
            span: span(escape_start, self.pos),
        })
    }

    fn punct(&mut self, ch: char, start: usize) -> Result<Punct, ParseError> {
        let rest = self.rest();
        let Some((text, punct)) = PUNCTUATORS
            .iter()
            .find(|(text, _)| rest.starts_with(text))
        else {
            return Err(ParseError::UnexpectedCharacter {
                ch,
                span: span(start, start + ch.len_utf8()),
            });
        };
        self.pos += text.len();
        Ok(*punct)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Sources longer than `u32::MAX` are rejected before lexing starts.
fn span(start: usize, end: usize) -> Span {
    Span::try_from_range(start..end).unwrap_or(Span::DUMMY)
}
