//! Syntax tree for the host language.
//!
//! Every node carries the `Span` it was parsed from; the walker hands those
//! spans to hooks and the splicer replaces exactly those ranges.

use subst_ir::{Pattern, Span};

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub name_span: Span,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    VarDecl {
        kind: DeclKind,
        declarators: Vec<Declarator>,
        span: Span,
    },
    /// `function name(..) { .. }`; `name` is always present.
    Function(Box<Function>),
    Return {
        argument: Option<Expr>,
        span: Span,
    },
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
        span: Span,
    },
    Block {
        body: Vec<Stmt>,
        span: Span,
    },
    Expr(Expr),
    Empty(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::Block { span, .. }
            | Stmt::Empty(span) => *span,
            Stmt::Function(function) => function.span,
            Stmt::Expr(expr) => expr.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// Concise arrow body: `x => x + 1`.
    Expr(Box<Expr>),
}

/// A function declaration, function expression or arrow function.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub key: String,
    pub key_span: Span,
    pub value: Expr,
    /// `{ FOO }`: the key doubles as the value.
    pub shorthand: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
    Typeof,
    Void,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// The expression inside any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    /// Dotted name of an identifier or a chain of non-computed member
    /// accesses rooted at an identifier: `a`, `a.b.c`.
    ///
    /// Returns the root identifier and the property names after it.
    pub fn member_chain(&self) -> Option<(&str, Vec<&str>)> {
        match &self.kind {
            ExprKind::Identifier(name) => Some((name.as_str(), Vec::new())),
            ExprKind::Member {
                object, property, ..
            } => {
                let (root, mut properties) = object.member_chain()?;
                properties.push(property.as_str());
                Some((root, properties))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Regex(Pattern),
    Identifier(String),
    Array(Vec<Expr>),
    Object(Vec<Property>),
    Function(Box<Function>),
    Arrow(Box<Function>),
    Paren(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: String,
        property_span: Span,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
}
