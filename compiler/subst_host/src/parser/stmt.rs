//! Statement grammar.

use subst_ir::Span;

use super::Parser;
use crate::ast::{DeclKind, Declarator, Function, FunctionBody, Param, Program, Stmt};
use crate::lexer::{Keyword, Punct, TokenKind};
use crate::stack::ensure_sufficient_stack;
use crate::ParseError;

impl Parser<'_> {
    pub(super) fn program(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        while !self.at_eof() {
            body.push(self.statement()?);
        }
        Ok(Program {
            body,
            span: Span::new(0, self.current.span.end),
        })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        ensure_sufficient_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Var) => self.var_decl(DeclKind::Var),
            TokenKind::Keyword(Keyword::Let) => self.var_decl(DeclKind::Let),
            TokenKind::Keyword(Keyword::Const) => self.var_decl(DeclKind::Const),
            TokenKind::Keyword(Keyword::Function) => {
                self.advance()?;
                let (name, _) = self.expect_identifier()?;
                let function = self.function_rest(start, Some(name))?;
                Ok(Stmt::Function(Box::new(function)))
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.advance()?;
                let argument = if self.at(Punct::Semi) || self.at(Punct::RBrace) || self.at_eof()
                {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.eat(Punct::Semi)?;
                Ok(Stmt::Return {
                    argument,
                    span: self.span_from(start),
                })
            }
            TokenKind::Keyword(Keyword::If) => self.if_stmt(start),
            TokenKind::Punct(Punct::LBrace) => {
                let body = self.block()?;
                Ok(Stmt::Block {
                    body,
                    span: self.span_from(start),
                })
            }
            TokenKind::Punct(Punct::Semi) => {
                self.advance()?;
                Ok(Stmt::Empty(self.span_from(start)))
            }
            _ => {
                let expr = self.expression()?;
                self.eat(Punct::Semi)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn var_decl(&mut self, kind: DeclKind) -> Result<Stmt, ParseError> {
        let start = self.current.span.start;
        self.advance()?;
        let mut declarators = Vec::new();
        loop {
            let (name, name_span) = self.expect_identifier()?;
            let init = if self.eat(Punct::Assign)? {
                Some(self.assignment()?)
            } else {
                None
            };
            declarators.push(Declarator {
                name,
                name_span,
                init,
            });
            if !self.eat(Punct::Comma)? {
                break;
            }
        }
        self.eat(Punct::Semi)?;
        Ok(Stmt::VarDecl {
            kind,
            declarators,
            span: self.span_from(start),
        })
    }

    fn if_stmt(&mut self, start: u32) -> Result<Stmt, ParseError> {
        self.advance()?;
        self.expect(Punct::LParen)?;
        let test = self.expression()?;
        self.expect(Punct::RParen)?;
        let consequent = Box::new(self.statement()?);
        let alternate = if self.at_keyword(Keyword::Else) {
            self.advance()?;
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            test,
            consequent,
            alternate,
            span: self.span_from(start),
        })
    }

    /// `{ statements }`
    pub(super) fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(Punct::LBrace)?;
        let mut body = Vec::new();
        while !self.at(Punct::RBrace) {
            if self.at_eof() {
                return Err(self.unexpected("`}`"));
            }
            body.push(self.statement()?);
        }
        self.advance()?;
        Ok(body)
    }

    /// Parameter list and block body, after `function` and the optional name.
    pub(super) fn function_rest(
        &mut self,
        start: u32,
        name: Option<String>,
    ) -> Result<Function, ParseError> {
        let params = self.params()?;
        let body = self.block()?;
        Ok(Function {
            name,
            params,
            body: FunctionBody::Block(body),
            span: self.span_from(start),
        })
    }

    /// `( a, b, )`
    pub(super) fn params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(Punct::LParen)?;
        let mut params = Vec::new();
        while !self.at(Punct::RParen) {
            let (name, span) = self.expect_identifier()?;
            params.push(Param { name, span });
            if !self.eat(Punct::Comma)? {
                break;
            }
        }
        self.expect(Punct::RParen)?;
        Ok(params)
    }
}
