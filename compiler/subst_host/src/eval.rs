//! Static evaluator for replacement text.
//!
//! Folds literals and operators over what can be known without running
//! anything. Identifier chains and `typeof` ask the hook table first, which
//! is how one definition can refer to another. Whatever cannot be decided
//! comes back as `Unknown`.

use subst_define::{EvaluatedExpression, EvaluatedKind, Evaluator, ExprSite, HookTable};
use subst_ir::Location;
use tracing::debug;

use crate::ast::{BinaryOp, Expr, ExprKind, LogicalOp, UnaryOp};
use crate::parser::parse_expression;
use crate::stack::ensure_sufficient_stack;

/// Evaluator backed by a compilation unit's hook table.
#[derive(Copy, Clone)]
pub struct HostEvaluator<'a> {
    hooks: &'a HookTable,
}

impl<'a> HostEvaluator<'a> {
    pub fn new(hooks: &'a HookTable) -> Self {
        HostEvaluator { hooks }
    }

    /// Evaluate an expression parsed from `source`; the result carries the
    /// expression's span.
    pub fn evaluate_expr(&self, expr: &Expr, source: &str) -> EvaluatedExpression {
        ensure_sufficient_stack(|| self.eval(expr, source)).with_span(expr.span)
    }

    fn eval(&self, expr: &Expr, source: &str) -> EvaluatedExpression {
        match &expr.kind {
            ExprKind::Null => EvaluatedExpression::null(),
            ExprKind::Bool(value) => EvaluatedExpression::boolean(*value),
            ExprKind::Number(value) => EvaluatedExpression::number(*value),
            ExprKind::String(value) => EvaluatedExpression::string(value.as_str()),
            ExprKind::Regex(pattern) => EvaluatedExpression::regexp(pattern.clone()),
            ExprKind::Identifier(_) | ExprKind::Member { .. } => self.eval_chain(expr, source),
            ExprKind::Array(_) | ExprKind::Object(_) => EvaluatedExpression::object(),
            ExprKind::Function(_) | ExprKind::Arrow(_) => EvaluatedExpression::function(),
            ExprKind::Paren(inner) => self.evaluate_expr(inner, source),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, expr, source),
            ExprKind::Binary { op, left, right } => {
                let left = self.evaluate_expr(left, source);
                let right = self.evaluate_expr(right, source);
                binary(*op, &left, &right)
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.evaluate_expr(left, source);
                match (op, left.truthiness()) {
                    (LogicalOp::And, Some(false)) | (LogicalOp::Or, Some(true)) => left,
                    (LogicalOp::And, Some(true)) | (LogicalOp::Or, Some(false)) => {
                        self.evaluate_expr(right, source)
                    }
                    (_, None) => EvaluatedExpression::unknown(),
                }
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => match self.evaluate_expr(test, source).truthiness() {
                Some(true) => self.evaluate_expr(consequent, source),
                Some(false) => self.evaluate_expr(alternate, source),
                None => EvaluatedExpression::unknown(),
            },
            ExprKind::Assign { .. } | ExprKind::Index { .. } | ExprKind::Call { .. } => {
                EvaluatedExpression::unknown()
            }
        }
    }

    fn eval_chain(&self, expr: &Expr, source: &str) -> EvaluatedExpression {
        let Some((root, properties)) = expr.member_chain() else {
            return EvaluatedExpression::unknown();
        };
        let name = dotted(root, &properties);
        if let Some(result) = self
            .hooks
            .evaluate_identifier(&name, &site(expr, source), self)
        {
            return result;
        }
        if !properties.is_empty() {
            return EvaluatedExpression::unknown();
        }
        match root {
            "undefined" => EvaluatedExpression::undefined(),
            "NaN" => EvaluatedExpression::number(f64::NAN),
            "Infinity" => EvaluatedExpression::number(f64::INFINITY),
            _ => EvaluatedExpression::unknown(),
        }
    }

    fn eval_unary(
        &self,
        op: UnaryOp,
        operand: &Expr,
        expr: &Expr,
        source: &str,
    ) -> EvaluatedExpression {
        if op == UnaryOp::Typeof {
            if let Some((root, properties)) = operand.unparenthesized().member_chain() {
                let name = dotted(root, &properties);
                let typeof_site = site(expr, source);
                if let Some(result) = self.hooks.evaluate_typeof(&name, &typeof_site, self) {
                    return result;
                }
            }
        }

        let value = self.evaluate_expr(operand, source);
        match op {
            UnaryOp::Typeof => value
                .typeof_name()
                .map_or_else(EvaluatedExpression::unknown, EvaluatedExpression::string),
            UnaryOp::Not => value
                .truthiness()
                .map_or_else(EvaluatedExpression::unknown, |truthy| {
                    EvaluatedExpression::boolean(!truthy)
                }),
            UnaryOp::Minus => to_number(&value)
                .map_or_else(EvaluatedExpression::unknown, |n| EvaluatedExpression::number(-n)),
            UnaryOp::Plus => to_number(&value)
                .map_or_else(EvaluatedExpression::unknown, EvaluatedExpression::number),
            UnaryOp::Void => EvaluatedExpression::undefined(),
        }
    }
}

impl Evaluator for HostEvaluator<'_> {
    fn evaluate(&self, source: &str) -> EvaluatedExpression {
        match parse_expression(source) {
            Ok(expr) => self.evaluate_expr(&expr, source),
            Err(error) => {
                debug!(%error, source, "unparsable evaluation input");
                EvaluatedExpression::unknown()
            }
        }
    }
}

pub(crate) fn dotted(root: &str, properties: &[&str]) -> String {
    let mut name = root.to_owned();
    for property in properties {
        name.push('.');
        name.push_str(property);
    }
    name
}

pub(crate) fn site(expr: &Expr, source: &str) -> ExprSite {
    ExprSite::new(expr.span, Location::of_span(source, expr.span))
}

// Operators

fn binary(
    op: BinaryOp,
    left: &EvaluatedExpression,
    right: &EvaluatedExpression,
) -> EvaluatedExpression {
    let number = |f: fn(f64, f64) -> f64| match (to_number(left), to_number(right)) {
        (Some(l), Some(r)) => EvaluatedExpression::number(f(l, r)),
        _ => EvaluatedExpression::unknown(),
    };
    let boolean = |value: Option<bool>| {
        value.map_or_else(EvaluatedExpression::unknown, EvaluatedExpression::boolean)
    };

    match op {
        BinaryOp::Add => {
            if left.is_string() || right.is_string() {
                match (left.to_primitive_string(), right.to_primitive_string()) {
                    (Some(l), Some(r)) => EvaluatedExpression::string(l + &r),
                    _ => EvaluatedExpression::unknown(),
                }
            } else {
                number(|l, r| l + r)
            }
        }
        BinaryOp::Sub => number(|l, r| l - r),
        BinaryOp::Mul => number(|l, r| l * r),
        BinaryOp::Div => number(|l, r| l / r),
        BinaryOp::Rem => number(|l, r| l % r),
        BinaryOp::StrictEq => boolean(strict_equals(left, right)),
        BinaryOp::StrictNotEq => boolean(strict_equals(left, right).map(|eq| !eq)),
        BinaryOp::Eq => boolean(loose_equals(left, right)),
        BinaryOp::NotEq => boolean(loose_equals(left, right).map(|eq| !eq)),
        BinaryOp::Lt => boolean(compare(left, right, |o| o.is_lt())),
        BinaryOp::LtEq => boolean(compare(left, right, |o| o.is_le())),
        BinaryOp::Gt => boolean(compare(left, right, |o| o.is_gt())),
        BinaryOp::GtEq => boolean(compare(left, right, |o| o.is_ge())),
    }
}

fn is_object_like(kind: &EvaluatedKind) -> bool {
    matches!(
        kind,
        EvaluatedKind::Object | EvaluatedKind::Function | EvaluatedKind::RegExp(_)
    )
}

#[allow(clippy::float_cmp, reason = "language equality is exact")]
fn strict_equals(left: &EvaluatedExpression, right: &EvaluatedExpression) -> Option<bool> {
    use EvaluatedKind as K;
    match (left.kind(), right.kind()) {
        (K::Unknown, _) | (_, K::Unknown) => None,
        // Object identity is not tracked
        (l, r) if is_object_like(l) && is_object_like(r) => None,
        (K::Null, K::Null) | (K::Undefined, K::Undefined) => Some(true),
        (K::Boolean(l), K::Boolean(r)) => Some(l == r),
        (K::Number(l), K::Number(r)) => Some(l == r),
        (K::String(l), K::String(r)) => Some(l == r),
        _ => Some(false),
    }
}

#[allow(clippy::float_cmp, reason = "language equality is exact")]
fn loose_equals(left: &EvaluatedExpression, right: &EvaluatedExpression) -> Option<bool> {
    use EvaluatedKind as K;
    let nullish = |kind: &EvaluatedKind| matches!(kind, K::Null | K::Undefined);
    match (left.kind(), right.kind()) {
        (K::Unknown, _) | (_, K::Unknown) => None,
        (l, r) if nullish(l) || nullish(r) => Some(nullish(l) && nullish(r)),
        (l, r) if is_object_like(l) || is_object_like(r) => None,
        (l, r) if std::mem::discriminant(l) == std::mem::discriminant(r) => {
            strict_equals(left, right)
        }
        _ => {
            let (l, r) = (to_number(left)?, to_number(right)?);
            Some(l == r)
        }
    }
}

fn compare(
    left: &EvaluatedExpression,
    right: &EvaluatedExpression,
    accept: fn(std::cmp::Ordering) -> bool,
) -> Option<bool> {
    if let (Some(l), Some(r)) = (left.as_str(), right.as_str()) {
        return Some(accept(l.cmp(r)));
    }
    let (l, r) = (to_number(left)?, to_number(right)?);
    // NaN compares false every way
    Some(l.partial_cmp(&r).is_some_and(accept))
}

/// Numeric conversion of a primitive.
fn to_number(value: &EvaluatedExpression) -> Option<f64> {
    match value.kind() {
        EvaluatedKind::Null => Some(0.0),
        EvaluatedKind::Undefined => Some(f64::NAN),
        EvaluatedKind::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        EvaluatedKind::Number(n) => Some(*n),
        EvaluatedKind::String(s) => Some(string_to_number(s)),
        EvaluatedKind::Unknown
        | EvaluatedKind::RegExp(_)
        | EvaluatedKind::Function
        | EvaluatedKind::Object => None,
    }
}

#[allow(clippy::cast_precision_loss, reason = "large hex literals round like the language does")]
fn string_to_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
    }
    // Rust accepts spellings like "inf" and "nan" that the language does not
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}
