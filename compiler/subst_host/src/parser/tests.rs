#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::ast::{BinaryOp, DeclKind, ExprKind, FunctionBody, LogicalOp, Stmt, UnaryOp};
use pretty_assertions::assert_eq;
use subst_ir::Pattern;

fn expr(source: &str) -> Expr {
    parse_expression(source).unwrap()
}

/// Compact s-expression rendering so precedence tests stay readable.
fn sexp(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Null => "null".to_owned(),
        ExprKind::Bool(b) => b.to_string(),
        ExprKind::Number(n) => n.to_string(),
        ExprKind::String(s) => format!("{s:?}"),
        ExprKind::Regex(pattern) => pattern.source_text(),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Array(items) => {
            let items: Vec<_> = items.iter().map(sexp).collect();
            format!("[{}]", items.join(" "))
        }
        ExprKind::Object(properties) => {
            let properties: Vec<_> = properties
                .iter()
                .map(|p| format!("{}:{}", p.key, sexp(&p.value)))
                .collect();
            format!("{{{}}}", properties.join(" "))
        }
        ExprKind::Function(_) => "fn".to_owned(),
        ExprKind::Arrow(_) => "arrow".to_owned(),
        ExprKind::Paren(inner) => format!("({})", sexp(inner)),
        ExprKind::Unary { op, operand } => format!("({op:?} {})", sexp(operand)),
        ExprKind::Binary { op, left, right } => {
            format!("({op:?} {} {})", sexp(left), sexp(right))
        }
        ExprKind::Logical { op, left, right } => {
            format!("({op:?} {} {})", sexp(left), sexp(right))
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => format!("(? {} {} {})", sexp(test), sexp(consequent), sexp(alternate)),
        ExprKind::Assign { op, target, value } => {
            format!("({op:?}= {} {})", sexp(target), sexp(value))
        }
        ExprKind::Member {
            object, property, ..
        } => format!("{}.{property}", sexp(object)),
        ExprKind::Index { object, index } => format!("{}[{}]", sexp(object), sexp(index)),
        ExprKind::Call { callee, arguments } => {
            let arguments: Vec<_> = arguments.iter().map(sexp).collect();
            format!("{}({})", sexp(callee), arguments.join(" "))
        }
    }
}

// Expressions

#[test]
fn test_precedence() {
    assert_eq!(sexp(&expr("a + b * c")), "(Add a (Mul b c))");
    assert_eq!(sexp(&expr("a - b - c")), "(Sub (Sub a b) c)");
    assert_eq!(
        sexp(&expr("a || b && c == d")),
        "(Or a (And b (Eq c d)))"
    );
    assert_eq!(sexp(&expr("!a < -b")), "(Lt (Not a) (Minus b))");
    assert_eq!(sexp(&expr("a ? b : c ? d : e")), "(? a b (? c d e))");
    assert_eq!(sexp(&expr("a = b = 1")), "(Assign= a (Assign= b 1))");
}

#[test]
fn test_typeof_binds_tighter_than_comparison() {
    assert_eq!(
        sexp(&expr("typeof process.env.X === \"string\"")),
        "(StrictEq (Typeof process.env.X) \"string\")"
    );
}

#[test]
fn test_postfix_chains() {
    assert_eq!(sexp(&expr("a.b[c](d, e).f")), "a.b[c](d e).f");
    assert_eq!(sexp(&expr("x.default.if")), "x.default.if");
}

#[test]
fn test_member_chain_helper() {
    let chain = expr("process.env.NODE_ENV");
    assert_eq!(
        chain.member_chain(),
        Some(("process", vec!["env", "NODE_ENV"]))
    );
    assert_eq!(expr("a[b].c").member_chain(), None);
    assert_eq!(expr("(a).b").member_chain(), None);
}

#[test]
fn test_unparenthesized_strips_every_paren() {
    let inner = expr("((a.b))");
    assert_eq!(
        inner.unparenthesized().member_chain(),
        Some(("a", vec!["b"]))
    );
    assert_eq!(inner.unparenthesized().span, Span::new(2, 5));
    let bare = expr("a.b");
    assert_eq!(bare.unparenthesized(), &bare);
}

#[test]
fn test_spans() {
    let parsed = expr("  foo.bar + 1");
    assert_eq!(parsed.span, Span::new(2, 13));
    let ExprKind::Binary { left, .. } = &parsed.kind else {
        panic!("expected binary, got {parsed:?}");
    };
    assert_eq!(left.span, Span::new(2, 9));
    let ExprKind::Member { property_span, .. } = &left.kind else {
        panic!("expected member");
    };
    assert_eq!(*property_span, Span::new(6, 9));
}

#[test]
fn test_literals() {
    assert_eq!(sexp(&expr("[1, 'two', null, true,]")), "[1 \"two\" null true]");
    assert_eq!(
        sexp(&expr("{a: 1, \"b c\": 2, 3: x, if: y}")),
        "{a:1 b c:2 3:x if:y}"
    );
}

#[test]
fn test_shorthand_property() {
    let parsed = expr("{ FOO, bar: 1 }");
    let ExprKind::Object(properties) = &parsed.kind else {
        panic!("expected object");
    };
    assert!(properties[0].shorthand);
    assert_eq!(properties[0].value.kind, ExprKind::Identifier("FOO".to_owned()));
    assert_eq!(properties[0].value.span, Span::new(2, 5));
    assert!(!properties[1].shorthand);
}

#[test]
fn test_regex_in_operand_position() {
    let parsed = expr("x = /a+b/g");
    let ExprKind::Assign { value, .. } = &parsed.kind else {
        panic!("expected assignment");
    };
    assert_eq!(value.kind, ExprKind::Regex(Pattern::new("a+b", "g")));

    // Division stays division
    assert_eq!(sexp(&expr("a / b / c")), "(Div (Div a b) c)");
    assert_eq!(sexp(&expr("/=/.test(s)")), "/=/.test(s)");
}

#[test]
fn test_arrow_functions() {
    let single = expr("x => x + 1");
    let ExprKind::Arrow(function) = &single.kind else {
        panic!("expected arrow");
    };
    assert_eq!(function.params.len(), 1);
    assert!(matches!(function.body, FunctionBody::Expr(_)));

    let multi = expr("(a, b) => { return a; }");
    let ExprKind::Arrow(function) = &multi.kind else {
        panic!("expected arrow");
    };
    assert_eq!(function.params.len(), 2);
    assert!(matches!(&function.body, FunctionBody::Block(body) if body.len() == 1));

    // Parenthesized expressions are not mistaken for parameter lists
    assert_eq!(sexp(&expr("(a) + b")), "(Add (a) b)");
    assert!(parse_expression("(a, b)").is_err());
}

#[test]
fn test_function_expression() {
    let parsed = expr("function named(a) { return a; }");
    let ExprKind::Function(function) = &parsed.kind else {
        panic!("expected function");
    };
    assert_eq!(function.name.as_deref(), Some("named"));
    assert_eq!(function.span, parsed.span);
}

#[test]
fn test_logical_ops() {
    let parsed = expr("a && b");
    assert!(matches!(
        parsed.kind,
        ExprKind::Logical {
            op: LogicalOp::And,
            ..
        }
    ));
    let parsed = expr("void 0");
    assert!(matches!(
        parsed.kind,
        ExprKind::Unary {
            op: UnaryOp::Void,
            ..
        }
    ));
    let parsed = expr("1 !== 2");
    assert!(matches!(
        parsed.kind,
        ExprKind::Binary {
            op: BinaryOp::StrictNotEq,
            ..
        }
    ));
}

// Statements

#[test]
fn test_program_statements() {
    let program = parse_program(
        "var a = 1, b; let c = a\nconst d = 2;\nfunction f(x) { if (x) { return; } else return x }\n;",
    )
    .unwrap();
    assert_eq!(program.body.len(), 5);
    assert!(matches!(
        &program.body[0],
        Stmt::VarDecl { kind: DeclKind::Var, declarators, .. } if declarators.len() == 2
    ));
    assert!(matches!(
        &program.body[1],
        Stmt::VarDecl {
            kind: DeclKind::Let,
            ..
        }
    ));
    let Stmt::Function(function) = &program.body[3] else {
        panic!("expected function declaration");
    };
    assert_eq!(function.name.as_deref(), Some("f"));
    assert!(matches!(program.body[4], Stmt::Empty(_)));
}

#[test]
fn test_block_statement_at_statement_start() {
    let program = parse_program("{ a; b }").unwrap();
    assert!(matches!(&program.body[0], Stmt::Block { body, .. } if body.len() == 2));
}

// Errors

#[test]
fn test_parse_errors() {
    assert_eq!(
        parse_expression("a +"),
        Err(ParseError::Expected {
            expected: "expression",
            found: "end of input".to_owned(),
            span: Span::new(3, 3),
        })
    );
    assert!(matches!(
        parse_expression("1 = 2"),
        Err(ParseError::InvalidAssignmentTarget { .. })
    ));
    assert!(matches!(
        parse_expression("a b"),
        Err(ParseError::Expected {
            expected: "end of input",
            ..
        })
    ));
    assert!(matches!(
        parse_program("function (x) {}"),
        Err(ParseError::Expected {
            expected: "identifier",
            ..
        })
    ));
    assert!(matches!(
        parse_program("{ a;"),
        Err(ParseError::Expected { .. })
    ));
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 5_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert!(parse_expression(&source).is_ok());

    let source = format!("{}x", "!".repeat(depth));
    assert!(parse_expression(&source).is_ok());
}
