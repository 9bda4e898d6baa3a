//! Static resolver pass for the **Lox** front end.
//!
//! This resolver does three things in one AST walk:
//! 1. Build lexical scopes (stack of maps from name to slot index + "defined yet?").
//! 2. Report static errors (redeclaration, read in own initializer, misplaced
//!    `return`, `this` or `super`, self‑inheritance).
//! 3. Record, on every `Variable`, `Assign`, `This` and `Super` node, the
//!    `(depth, index)` pair of its binding when it is a local.  Names found in no
//!    scope are globals and keep `None`, so the environment looks them up by name.
//!
//! Scopes are laid out the way an evaluator builds frames: one per block, one
//! per function call (parameters first, then body locals), one holding `super`
//! around a subclass's methods and one holding `this` around every class body.

use crate::error::LoxError;
use crate::expr::{
    Assign, Binary, Call, Expr, ExprVisitor, Get, Grouping, Literal, Logical, Resolution,
    ResolutionCell, Set, Super, Ternary, This, Unary, Variable,
};
use crate::stmt::{
    Block, Break, Class, Continue, Expression, Function, If, Print, Return, Stmt, StmtVisitor,
    Var, While,
};
use crate::token::Token;
use log::{debug, info};
use std::collections::HashMap;

/// What kind of function body we are in.  Used to validate `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

/// Are we inside a class, and does it have a superclass?
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

#[derive(Copy, Clone, Debug)]
struct Local {
    index: usize,
    defined: bool,
}

type Scope<'a> = HashMap<&'a str, Local>;

/// Resolver: tracks scopes, enforces static rules, and writes binding
/// locations into the AST.
pub struct Resolver<'a> {
    scopes: Vec<Scope<'a>>,
    current_function: FunctionType,
    current_class: ClassType,
    errors: Vec<LoxError>,
}

impl<'a> Default for Resolver<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Resolver<'a> {
    pub fn new() -> Self {
        info!("Resolver instantiated");

        Resolver {
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            errors: Vec::new(),
        }
    }

    /// Walk all top‑level statements and return every semantic error found.
    pub fn resolve(mut self, statements: &[Stmt<'a>]) -> Vec<LoxError> {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        self.resolve_stmts(statements);

        info!("Resolve pass finished with {} error(s)", self.errors.len());

        self.errors
    }

    fn resolve_stmts(&mut self, statements: &[Stmt<'a>]) {
        for stmt in statements {
            stmt.accept(self);
        }
    }

    #[inline]
    fn resolve_expr(&mut self, expr: &Expr<'a>) {
        expr.accept(self);
    }

    fn error(&mut self, token: &Token<'_>, message: &str) {
        self.errors.push(LoxError::resolve(token, message));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function’s parameters + body.
    fn resolve_function(&mut self, function: &Function<'a>, kind: FunctionType) {
        let enclosing: FunctionType = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&function.body);
        self.end_scope();

        self.current_function = enclosing;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Reserve the next slot of the innermost scope for `name`.
    fn declare(&mut self, name: &Token<'a>) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        if scope.contains_key(name.lexeme) {
            self.error(name, "Already a variable with this name in this scope.");
            return;
        }

        let index: usize = scope.len();
        scope.insert(
            name.lexeme,
            Local {
                index,
                defined: false,
            },
        );
    }

    fn define(&mut self, name: &Token<'a>) {
        if let Some(local) = self
            .scopes
            .last_mut()
            .and_then(|scope| scope.get_mut(name.lexeme))
        {
            local.defined = true;
        }
    }

    /// Implicit binding (`this`, `super`) that is defined from the start.
    fn define_builtin(&mut self, name: &'a str) {
        if let Some(scope) = self.scopes.last_mut() {
            let index: usize = scope.len();
            scope.insert(
                name,
                Local {
                    index,
                    defined: true,
                },
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this occurrence as a local at `(depth, index)`, or leave it
    /// unresolved when no scope declares it (global).
    fn resolve_local(&mut self, cell: &ResolutionCell, name: &Token<'a>) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if let Some(local) = scope.get(name.lexeme) {
                debug!(
                    "Resolved '{}' at depth {}, slot {}",
                    name.lexeme, depth, local.index
                );

                cell.set(Some(Resolution {
                    depth,
                    index: local.index,
                }));
                return;
            }
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statement resolution
// ─────────────────────────────────────────────────────────────────────────────

impl<'a> StmtVisitor<'a> for Resolver<'a> {
    type Output = ();

    fn visit_block(&mut self, stmt: &Block<'a>) {
        self.begin_scope();
        self.resolve_stmts(&stmt.statements);
        self.end_scope();
    }

    fn visit_class(&mut self, stmt: &Class<'a>) {
        let enclosing_class: ClassType = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(&stmt.name);
        self.define(&stmt.name);

        if let Some(superclass) = &stmt.superclass {
            if superclass.name.lexeme == stmt.name.lexeme {
                self.error(&superclass.name, "A class can't inherit from itself.");
            }

            self.current_class = ClassType::Subclass;
            self.visit_variable(superclass);

            self.begin_scope();
            self.define_builtin("super");
        }

        self.begin_scope();
        self.define_builtin("this");

        for method in &stmt.methods {
            let kind: FunctionType = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };

            self.resolve_function(method, kind);
        }

        self.end_scope();

        if stmt.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn visit_expression(&mut self, stmt: &Expression<'a>) {
        self.resolve_expr(&stmt.expression);
    }

    /// The name is defined before the body so the function can recurse.
    fn visit_function(&mut self, stmt: &Function<'a>) {
        self.declare(&stmt.name);
        self.define(&stmt.name);

        self.resolve_function(stmt, FunctionType::Function);
    }

    fn visit_if(&mut self, stmt: &If<'a>) {
        self.resolve_expr(&stmt.condition);
        stmt.then_branch.accept(self);
        if let Some(else_branch) = &stmt.else_branch {
            else_branch.accept(self);
        }
    }

    fn visit_print(&mut self, stmt: &Print<'a>) {
        self.resolve_expr(&stmt.expression);
    }

    fn visit_return(&mut self, stmt: &Return<'a>) {
        if self.current_function == FunctionType::None {
            self.error(&stmt.keyword, "Can't return from top-level code.");
        }

        if let Some(value) = &stmt.value {
            if self.current_function == FunctionType::Initializer {
                self.error(&stmt.keyword, "Can't return a value from an initializer.");
            }

            self.resolve_expr(value);
        }
    }

    fn visit_continue(&mut self, _stmt: &Continue<'a>) {}

    fn visit_break(&mut self, _stmt: &Break<'a>) {}

    /// declare → resolve initializer → define, so the initializer cannot
    /// see the variable it initializes.
    fn visit_var(&mut self, stmt: &Var<'a>) {
        self.declare(&stmt.name);
        if let Some(initializer) = &stmt.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&stmt.name);
    }

    fn visit_while(&mut self, stmt: &While<'a>) {
        self.resolve_expr(&stmt.condition);
        stmt.body.accept(self);
        if let Some(increment) = &stmt.increment {
            self.resolve_expr(increment);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Expression resolution
// ─────────────────────────────────────────────────────────────────────────────

impl<'a> ExprVisitor<'a> for Resolver<'a> {
    type Output = ();

    fn visit_assign(&mut self, expr: &Assign<'a>) {
        self.resolve_expr(&expr.value);
        self.resolve_local(&expr.resolution, &expr.name);
    }

    fn visit_binary(&mut self, expr: &Binary<'a>) {
        self.resolve_expr(&expr.left);
        self.resolve_expr(&expr.right);
    }

    fn visit_ternary(&mut self, expr: &Ternary<'a>) {
        self.resolve_expr(&expr.condition);
        self.resolve_expr(&expr.then_branch);
        self.resolve_expr(&expr.else_branch);
    }

    fn visit_call(&mut self, expr: &Call<'a>) {
        self.resolve_expr(&expr.callee);
        for argument in &expr.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get(&mut self, expr: &Get<'a>) {
        self.resolve_expr(&expr.object);
    }

    fn visit_grouping(&mut self, expr: &Grouping<'a>) {
        self.resolve_expr(&expr.expression);
    }

    fn visit_literal(&mut self, _expr: &Literal) {}

    fn visit_logical(&mut self, expr: &Logical<'a>) {
        self.resolve_expr(&expr.left);
        self.resolve_expr(&expr.right);
    }

    fn visit_set(&mut self, expr: &Set<'a>) {
        self.resolve_expr(&expr.value);
        self.resolve_expr(&expr.object);
    }

    fn visit_super(&mut self, expr: &Super<'a>) {
        match self.current_class {
            ClassType::None => {
                self.error(&expr.keyword, "Can't use 'super' outside of a class.");
            }
            ClassType::Class => {
                self.error(
                    &expr.keyword,
                    "Can't use 'super' in a class with no superclass.",
                );
            }
            ClassType::Subclass => {}
        }

        self.resolve_local(&expr.resolution, &expr.keyword);
    }

    fn visit_this(&mut self, expr: &This<'a>) {
        if self.current_class == ClassType::None {
            self.error(&expr.keyword, "Can't use 'this' outside of a class.");
            return;
        }

        self.resolve_local(&expr.resolution, &expr.keyword);
    }

    fn visit_unary(&mut self, expr: &Unary<'a>) {
        self.resolve_expr(&expr.right);
    }

    fn visit_variable(&mut self, expr: &Variable<'a>) {
        let read_in_initializer: bool = self
            .scopes
            .last()
            .and_then(|scope| scope.get(expr.name.lexeme))
            .is_some_and(|local| !local.defined);

        if read_in_initializer {
            self.error(
                &expr.name,
                "Can't read local variable in its own initializer.",
            );
        }

        self.resolve_local(&expr.resolution, &expr.name);
    }
}
