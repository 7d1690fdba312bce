//! AST walker that fires rewrite hooks.
//!
//! Tracks declared names in a scope stack so that local variables and
//! parameters shadow definitions. `var x = FEATURES;` where `FEATURES` is
//! renamable makes `x` an alias: `x.a` is then looked up as `FEATURES.a`.
//!
//! For a member chain the longest dotted name is tried first; if no hook
//! handles it the walker descends into the object part, so `a.b.c` falls
//! back to `a.b` and then `a`.

use rustc_hash::FxHashMap;
use subst_define::{ConstDependency, DependencySink, HookTable};
use tracing::trace;

use crate::ast::{
    DeclKind, Declarator, Expr, ExprKind, Function, FunctionBody, Program, Property, Stmt, UnaryOp,
};
use crate::eval::{dotted, site, HostEvaluator};
use crate::stack::ensure_sufficient_stack;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Binding {
    /// An ordinary local variable, parameter or function name.
    Local,
    /// A local initialised from a renamable path.
    Alias(String),
}

pub struct Walker<'a> {
    source: &'a str,
    hooks: &'a HookTable,
    evaluator: HostEvaluator<'a>,
    scopes: Vec<FxHashMap<String, Binding>>,
    dependencies: Vec<ConstDependency>,
}

impl<'a> Walker<'a> {
    pub fn new(source: &'a str, hooks: &'a HookTable) -> Self {
        Walker {
            source,
            hooks,
            evaluator: HostEvaluator::new(hooks),
            scopes: vec![FxHashMap::default()],
            dependencies: Vec::new(),
        }
    }

    /// Walk `program` and return the substitutions the hooks emitted, in
    /// traversal order.
    pub fn walk_program(mut self, program: &Program) -> Vec<ConstDependency> {
        self.hoist(&program.body, true);
        self.walk_statements(&program.body);
        self.dependencies
    }

    // Scopes

    fn in_scope(&mut self, f: impl FnOnce(&mut Self)) {
        self.scopes.push(FxHashMap::default());
        f(self);
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_owned(), Binding::Local);
        }
    }

    fn set_alias(&mut self, name: &str, target: String) {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(binding) = scope.get_mut(name) {
                *binding = Binding::Alias(target);
                return;
            }
        }
    }

    fn lookup(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Declare what `body` introduces in the current scope. `var`
    /// declarations, including those nested in blocks, belong to the
    /// function-level scope.
    fn hoist(&mut self, body: &[Stmt], function_level: bool) {
        for stmt in body {
            match stmt {
                Stmt::VarDecl {
                    kind: DeclKind::Let | DeclKind::Const,
                    declarators,
                    ..
                } => {
                    for declarator in declarators {
                        self.declare(&declarator.name);
                    }
                }
                Stmt::Function(function) => {
                    if let Some(name) = &function.name {
                        self.declare(name);
                    }
                }
                _ => {}
            }
            if function_level {
                self.hoist_vars(stmt);
            }
        }
    }

    fn hoist_vars(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl {
                kind: DeclKind::Var,
                declarators,
                ..
            } => {
                for declarator in declarators {
                    self.declare(&declarator.name);
                }
            }
            Stmt::If {
                consequent,
                alternate,
                ..
            } => {
                self.hoist_vars(consequent);
                if let Some(alternate) = alternate {
                    self.hoist_vars(alternate);
                }
            }
            Stmt::Block { body, .. } => {
                for stmt in body {
                    self.hoist_vars(stmt);
                }
            }
            _ => {}
        }
    }

    /// The dotted name a member chain refers to after applying local
    /// bindings, or `None` when it is rooted at a local variable.
    fn free_name(&self, expr: &Expr) -> Option<String> {
        let (root, properties) = expr.member_chain()?;
        let root = match self.lookup(root) {
            Some(Binding::Local) => return None,
            Some(Binding::Alias(target)) => target.as_str(),
            None => root,
        };
        Some(dotted(root, &properties))
    }

    // Statements

    fn walk_statements(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.walk_statement(stmt);
        }
    }

    fn walk_statement(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| self.walk_statement_inner(stmt));
    }

    fn walk_statement_inner(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { declarators, .. } => {
                for declarator in declarators {
                    self.walk_declarator(declarator);
                }
            }
            Stmt::Function(function) => self.walk_function(function),
            Stmt::Return { argument, .. } => {
                if let Some(argument) = argument {
                    self.walk_expr(argument);
                }
            }
            Stmt::If {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.walk_expr(test);
                self.walk_statement(consequent);
                if let Some(alternate) = alternate {
                    self.walk_statement(alternate);
                }
            }
            Stmt::Block { body, .. } => self.in_scope(|walker| {
                walker.hoist(body, false);
                walker.walk_statements(body);
            }),
            Stmt::Expr(expr) => self.walk_expr(expr),
            Stmt::Empty(_) => {}
        }
    }

    fn walk_declarator(&mut self, declarator: &Declarator) {
        let Some(init) = &declarator.init else {
            return;
        };
        if let Some(target) = self
            .free_name(init)
            .filter(|name| self.hooks.can_rename(name))
        {
            trace!(name = %declarator.name, %target, "alias declared");
            self.set_alias(&declarator.name, target);
        }
        self.walk_expr(init);
    }

    fn walk_function(&mut self, function: &Function) {
        self.in_scope(|walker| {
            if let Some(name) = &function.name {
                walker.declare(name);
            }
            for param in &function.params {
                walker.declare(&param.name);
            }
            match &function.body {
                FunctionBody::Block(body) => {
                    walker.hoist(body, true);
                    walker.walk_statements(body);
                }
                FunctionBody::Expr(expr) => walker.walk_expr(expr),
            }
        });
    }

    // Expressions

    fn walk_expr(&mut self, expr: &Expr) {
        ensure_sufficient_stack(|| self.walk_expr_inner(expr));
    }

    fn walk_expr_inner(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Identifier(_) => {
                self.rewrite_chain(expr);
            }
            ExprKind::Member { object, .. } => {
                if !self.rewrite_chain(expr) {
                    self.walk_expr(object);
                }
            }
            ExprKind::Unary {
                op: UnaryOp::Typeof,
                operand,
            } => {
                if !self.rewrite_typeof(expr, operand) {
                    self.walk_expr(operand);
                }
            }
            ExprKind::Unary { operand, .. } | ExprKind::Paren(operand) => self.walk_expr(operand),
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.walk_expr(left);
                self.walk_expr(right);
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.walk_expr(test);
                self.walk_expr(consequent);
                self.walk_expr(alternate);
            }
            ExprKind::Assign { target, value, .. } => {
                self.walk_assign_target(target);
                self.walk_expr(value);
            }
            ExprKind::Index { object, index } => {
                self.walk_expr(object);
                self.walk_expr(index);
            }
            ExprKind::Call { callee, arguments } => {
                self.walk_expr(callee);
                for argument in arguments {
                    self.walk_expr(argument);
                }
            }
            ExprKind::Array(items) => {
                for item in items {
                    self.walk_expr(item);
                }
            }
            ExprKind::Object(properties) => {
                for property in properties {
                    if property.shorthand {
                        self.walk_shorthand(property);
                    } else {
                        self.walk_expr(&property.value);
                    }
                }
            }
            ExprKind::Function(function) | ExprKind::Arrow(function) => {
                self.walk_function(function);
            }
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Number(_)
            | ExprKind::String(_)
            | ExprKind::Regex(_) => {}
        }
    }

    /// The assigned name itself is never replaced; only the expressions
    /// computing where to store are walked.
    fn walk_assign_target(&mut self, target: &Expr) {
        match &target.kind {
            ExprKind::Member { object, .. } => self.walk_expr(object),
            ExprKind::Index { object, index } => {
                self.walk_expr(object);
                self.walk_expr(index);
            }
            _ => {}
        }
    }

    fn rewrite_chain(&mut self, expr: &Expr) -> bool {
        let Some(name) = self.free_name(expr) else {
            return false;
        };
        let site = site(expr, self.source);
        self.hooks
            .rewrite_expression(&name, &site, &self.evaluator, &mut self.dependencies)
            .is_handled()
    }

    fn rewrite_typeof(&mut self, expr: &Expr, operand: &Expr) -> bool {
        let Some(name) = self.free_name(operand.unparenthesized()) else {
            return false;
        };
        let site = site(expr, self.source);
        self.hooks
            .rewrite_typeof(&name, &site, &self.evaluator, &mut self.dependencies)
            .is_handled()
    }

    /// `{ FOO }` becomes `{ FOO: <replacement> }`.
    fn walk_shorthand(&mut self, property: &Property) {
        let Some(name) = self.free_name(&property.value) else {
            return;
        };
        let site = site(&property.value, self.source);
        let mut sink = ShorthandSink {
            key: &property.key,
            inner: &mut self.dependencies,
        };
        let _ = self
            .hooks
            .rewrite_expression(&name, &site, &self.evaluator, &mut sink);
    }
}

/// Prefixes each replacement with the property key it stands in for.
struct ShorthandSink<'a> {
    key: &'a str,
    inner: &'a mut Vec<ConstDependency>,
}

impl DependencySink for ShorthandSink<'_> {
    fn add_dependency(&mut self, mut dependency: ConstDependency) {
        dependency.expression = format!("{}: {}", self.key, dependency.expression);
        self.inner.push(dependency);
    }
}

#[cfg(test)]
mod tests;
