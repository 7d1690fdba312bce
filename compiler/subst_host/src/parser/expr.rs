//! Expression grammar, lowest precedence first.
//!
//! assignment > conditional > `||` > `&&` > equality > relational >
//! additive > multiplicative > unary > postfix > primary

use subst_ir::format_number;

use super::Parser;
use crate::ast::{
    AssignOp, BinaryOp, Expr, ExprKind, Function, FunctionBody, LogicalOp, Param, Property,
    UnaryOp,
};
use crate::lexer::{Keyword, Punct, TokenKind};
use crate::stack::ensure_sufficient_stack;
use crate::ParseError;

type Operand<'src> = fn(&mut Parser<'src>) -> Result<Expr, ParseError>;

impl<'src> Parser<'src> {
    pub(crate) fn expression(&mut self) -> Result<Expr, ParseError> {
        self.assignment()
    }

    pub(super) fn assignment(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.assignment_inner())
    }

    fn assignment_inner(&mut self) -> Result<Expr, ParseError> {
        if let Some(arrow) = self.try_arrow()? {
            return Ok(arrow);
        }

        let start = self.current.span.start;
        let target = self.conditional()?;
        let TokenKind::Punct(punct) = self.current.kind else {
            return Ok(target);
        };
        let Some(op) = assign_op(punct) else {
            return Ok(target);
        };
        if !matches!(
            target.kind,
            ExprKind::Identifier(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        ) {
            return Err(ParseError::InvalidAssignmentTarget { span: target.span });
        }
        self.advance()?;
        let value = self.assignment()?;
        Ok(Expr::new(
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            self.span_from(start),
        ))
    }

    /// `x => ..` or `(a, b) => ..`; restores the position when the input
    /// turns out not to be an arrow function.
    fn try_arrow(&mut self) -> Result<Option<Expr>, ParseError> {
        let start = self.current.span.start;
        let snapshot = self.snapshot();

        let params = match &self.current.kind {
            TokenKind::Identifier(name) => {
                let param = Param {
                    name: name.clone(),
                    span: self.current.span,
                };
                match self.advance() {
                    Ok(_) if self.at(Punct::Arrow) => vec![param],
                    _ => {
                        self.restore(snapshot);
                        return Ok(None);
                    }
                }
            }
            TokenKind::Punct(Punct::LParen) => match self.params() {
                Ok(params) if self.at(Punct::Arrow) => params,
                _ => {
                    self.restore(snapshot);
                    return Ok(None);
                }
            },
            _ => return Ok(None),
        };

        self.advance()?;
        let body = if self.at(Punct::LBrace) {
            FunctionBody::Block(self.block()?)
        } else {
            FunctionBody::Expr(Box::new(self.assignment()?))
        };
        let span = self.span_from(start);
        Ok(Some(Expr::new(
            ExprKind::Arrow(Box::new(Function {
                name: None,
                params,
                body,
                span,
            })),
            span,
        )))
    }

    fn conditional(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let test = self.logical_or()?;
        if !self.eat(Punct::Question)? {
            return Ok(test);
        }
        let consequent = self.assignment()?;
        self.expect(Punct::Colon)?;
        let alternate = self.assignment()?;
        Ok(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            self.span_from(start),
        ))
    }

    fn logical_or(&mut self) -> Result<Expr, ParseError> {
        self.logical(LogicalOp::Or, Punct::OrOr, Parser::logical_and)
    }

    fn logical_and(&mut self) -> Result<Expr, ParseError> {
        self.logical(LogicalOp::And, Punct::AndAnd, Parser::equality)
    }

    fn logical(
        &mut self,
        op: LogicalOp,
        punct: Punct,
        operand: Operand<'src>,
    ) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let mut left = operand(self)?;
        while self.eat(punct)? {
            let right = operand(self)?;
            left = Expr::new(
                ExprKind::Logical {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                self.span_from(start),
            );
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        self.binary(Parser::relational, |punct| match punct {
            Punct::EqEq => Some(BinaryOp::Eq),
            Punct::NotEq => Some(BinaryOp::NotEq),
            Punct::EqEqEq => Some(BinaryOp::StrictEq),
            Punct::NotEqEq => Some(BinaryOp::StrictNotEq),
            _ => None,
        })
    }

    fn relational(&mut self) -> Result<Expr, ParseError> {
        self.binary(Parser::additive, |punct| match punct {
            Punct::Lt => Some(BinaryOp::Lt),
            Punct::LtEq => Some(BinaryOp::LtEq),
            Punct::Gt => Some(BinaryOp::Gt),
            Punct::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        })
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        self.binary(Parser::multiplicative, |punct| match punct {
            Punct::Plus => Some(BinaryOp::Add),
            Punct::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        self.binary(Parser::unary, |punct| match punct {
            Punct::Star => Some(BinaryOp::Mul),
            Punct::Slash => Some(BinaryOp::Div),
            Punct::Percent => Some(BinaryOp::Rem),
            _ => None,
        })
    }

    /// Left-associative binary level.
    fn binary(
        &mut self,
        operand: Operand<'src>,
        operator: fn(Punct) -> Option<BinaryOp>,
    ) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let mut left = operand(self)?;
        loop {
            let TokenKind::Punct(punct) = self.current.kind else {
                break;
            };
            let Some(op) = operator(punct) else {
                break;
            };
            self.advance()?;
            let right = operand(self)?;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                self.span_from(start),
            );
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current.kind {
            TokenKind::Punct(Punct::Bang) => UnaryOp::Not,
            TokenKind::Punct(Punct::Minus) => UnaryOp::Minus,
            TokenKind::Punct(Punct::Plus) => UnaryOp::Plus,
            TokenKind::Keyword(Keyword::Typeof) => UnaryOp::Typeof,
            TokenKind::Keyword(Keyword::Void) => UnaryOp::Void,
            _ => return self.postfix(),
        };
        let start = self.current.span.start;
        self.advance()?;
        let operand = ensure_sufficient_stack(|| self.unary())?;
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            self.span_from(start),
        ))
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let mut expr = self.primary()?;
        loop {
            let kind = if self.eat(Punct::Dot)? {
                let property_span = self.current.span;
                let property = match &self.current.kind {
                    TokenKind::Identifier(name) => name.clone(),
                    TokenKind::Keyword(keyword) => keyword.as_str().to_owned(),
                    _ => return Err(self.unexpected("property name")),
                };
                self.advance()?;
                ExprKind::Member {
                    object: Box::new(expr),
                    property,
                    property_span,
                }
            } else if self.eat(Punct::LBracket)? {
                let index = self.expression()?;
                self.expect(Punct::RBracket)?;
                ExprKind::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                }
            } else if self.at(Punct::LParen) {
                let arguments = self.arguments()?;
                ExprKind::Call {
                    callee: Box::new(expr),
                    arguments,
                }
            } else {
                return Ok(expr);
            };
            expr = Expr::new(kind, self.span_from(start));
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(Punct::LParen)?;
        let mut arguments = Vec::new();
        while !self.at(Punct::RParen) {
            arguments.push(self.assignment()?);
            if !self.eat(Punct::Comma)? {
                break;
            }
        }
        self.expect(Punct::RParen)?;
        Ok(arguments)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;

        // Operand position: a slash starts a regular expression
        if self.at(Punct::Slash) || self.at(Punct::SlashAssign) {
            self.current = self.lexer.rescan_regex(start)?;
        }

        let kind = match &self.current.kind {
            TokenKind::Number(value) => ExprKind::Number(*value),
            TokenKind::String(value) => ExprKind::String(value.clone()),
            TokenKind::Regex(pattern) => ExprKind::Regex(pattern.clone()),
            TokenKind::Identifier(name) => ExprKind::Identifier(name.clone()),
            TokenKind::Keyword(Keyword::True) => ExprKind::Bool(true),
            TokenKind::Keyword(Keyword::False) => ExprKind::Bool(false),
            TokenKind::Keyword(Keyword::Null) => ExprKind::Null,
            TokenKind::Keyword(Keyword::Function) => {
                self.advance()?;
                let name = match &self.current.kind {
                    TokenKind::Identifier(_) => Some(self.expect_identifier()?.0),
                    _ => None,
                };
                let function = self.function_rest(start, name)?;
                return Ok(Expr::new(
                    ExprKind::Function(Box::new(function)),
                    self.span_from(start),
                ));
            }
            TokenKind::Punct(Punct::LParen) => {
                self.advance()?;
                let inner = self.expression()?;
                self.expect(Punct::RParen)?;
                return Ok(Expr::new(
                    ExprKind::Paren(Box::new(inner)),
                    self.span_from(start),
                ));
            }
            TokenKind::Punct(Punct::LBracket) => return self.array(start),
            TokenKind::Punct(Punct::LBrace) => return self.object(start),
            _ => return Err(self.unexpected("expression")),
        };
        self.advance()?;
        Ok(Expr::new(kind, self.span_from(start)))
    }

    fn array(&mut self, start: u32) -> Result<Expr, ParseError> {
        self.advance()?;
        let mut elements = Vec::new();
        while !self.at(Punct::RBracket) {
            elements.push(self.assignment()?);
            if !self.eat(Punct::Comma)? {
                break;
            }
        }
        self.expect(Punct::RBracket)?;
        Ok(Expr::new(ExprKind::Array(elements), self.span_from(start)))
    }

    fn object(&mut self, start: u32) -> Result<Expr, ParseError> {
        self.advance()?;
        let mut properties = Vec::new();
        while !self.at(Punct::RBrace) {
            properties.push(self.property()?);
            if !self.eat(Punct::Comma)? {
                break;
            }
        }
        self.expect(Punct::RBrace)?;
        Ok(Expr::new(ExprKind::Object(properties), self.span_from(start)))
    }

    fn property(&mut self) -> Result<Property, ParseError> {
        let key_span = self.current.span;
        let (key, is_identifier) = match &self.current.kind {
            TokenKind::Identifier(name) => (name.clone(), true),
            TokenKind::Keyword(keyword) => (keyword.as_str().to_owned(), false),
            TokenKind::String(value) => (value.clone(), false),
            TokenKind::Number(value) => (format_number(*value), false),
            _ => return Err(self.unexpected("property key")),
        };
        self.advance()?;

        if is_identifier && (self.at(Punct::Comma) || self.at(Punct::RBrace)) {
            let value = Expr::new(ExprKind::Identifier(key.clone()), key_span);
            return Ok(Property {
                key,
                key_span,
                value,
                shorthand: true,
            });
        }

        self.expect(Punct::Colon)?;
        let value = self.assignment()?;
        Ok(Property {
            key,
            key_span,
            value,
            shorthand: false,
        })
    }
}

fn assign_op(punct: Punct) -> Option<AssignOp> {
    Some(match punct {
        Punct::Assign => AssignOp::Assign,
        Punct::PlusAssign => AssignOp::Add,
        Punct::MinusAssign => AssignOp::Sub,
        Punct::StarAssign => AssignOp::Mul,
        Punct::SlashAssign => AssignOp::Div,
        Punct::PercentAssign => AssignOp::Rem,
        _ => return None,
    })
}
