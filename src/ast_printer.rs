use crate::expr::{
    Assign, Binary, Call, Expr, ExprVisitor, Get, Grouping, Literal, Logical, Set, Super,
    Ternary, This, Unary, Variable,
};
use crate::stmt::{
    Block, Break, Class, Continue, Expression, Function, If, Print, Return, Stmt, StmtVisitor,
    Var, While,
};
use crate::token::LiteralValue;

/// Renders the AST in Lisp-style parenthesized prefix form,
/// e.g. `1 + 2 * 3` → `(+ 1.0 (* 2.0 3.0))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr<'_>) -> String {
        expr.accept(&mut AstPrinter)
    }

    pub fn print_stmt(stmt: &Stmt<'_>) -> String {
        stmt.accept(&mut AstPrinter)
    }

    /// One line per top‑level statement.
    pub fn print_program(statements: &[Stmt<'_>]) -> String {
        statements
            .iter()
            .map(Self::print_stmt)
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn parenthesize<I>(name: &str, parts: I) -> String
    where
        I: IntoIterator<Item = String>,
    {
        let mut s: String = format!("({}", name);
        for part in parts {
            s.push(' ');
            s.push_str(&part);
        }
        s.push(')');
        s
    }

    fn function(keyword: &str, function: &Function<'_>) -> String {
        let params: Vec<&str> = function.params.iter().map(|p| p.lexeme).collect();

        let mut parts: Vec<String> = vec![
            function.name.lexeme.to_string(),
            format!("({})", params.join(" ")),
        ];
        parts.extend(function.body.iter().map(Self::print_stmt));

        Self::parenthesize(keyword, parts)
    }
}

impl<'a> ExprVisitor<'a> for AstPrinter {
    type Output = String;

    fn visit_assign(&mut self, expr: &Assign<'a>) -> String {
        format!("(= {} {})", expr.name.lexeme, Self::print(&expr.value))
    }

    // ── binary operator (comma included) ──────────────────────────────
    fn visit_binary(&mut self, expr: &Binary<'a>) -> String {
        format!(
            "({} {} {})",
            expr.operator.lexeme,
            Self::print(&expr.left),
            Self::print(&expr.right)
        )
    }

    fn visit_ternary(&mut self, expr: &Ternary<'a>) -> String {
        format!(
            "(?: {} {} {})",
            Self::print(&expr.condition),
            Self::print(&expr.then_branch),
            Self::print(&expr.else_branch)
        )
    }

    fn visit_call(&mut self, expr: &Call<'a>) -> String {
        let mut parts: Vec<String> = vec![Self::print(&expr.callee)];
        parts.extend(expr.arguments.iter().map(Self::print));

        Self::parenthesize("call", parts)
    }

    fn visit_get(&mut self, expr: &Get<'a>) -> String {
        format!("(. {} {})", Self::print(&expr.object), expr.name.lexeme)
    }

    fn visit_grouping(&mut self, expr: &Grouping<'a>) -> String {
        format!("(group {})", Self::print(&expr.expression))
    }

    // ── literals ──────────────────────────────────────────────────────
    fn visit_literal(&mut self, expr: &Literal) -> String {
        match &expr.value {
            // 3 → 3.0
            LiteralValue::Number(n) if n.fract() == 0.0 => format!("{:.1}", n),
            other => other.to_string(),
        }
    }

    fn visit_logical(&mut self, expr: &Logical<'a>) -> String {
        format!(
            "({} {} {})",
            expr.operator.lexeme,
            Self::print(&expr.left),
            Self::print(&expr.right)
        )
    }

    fn visit_set(&mut self, expr: &Set<'a>) -> String {
        format!(
            "(= (. {} {}) {})",
            Self::print(&expr.object),
            expr.name.lexeme,
            Self::print(&expr.value)
        )
    }

    fn visit_super(&mut self, expr: &Super<'a>) -> String {
        format!("(super {})", expr.method.lexeme)
    }

    fn visit_this(&mut self, _expr: &This<'a>) -> String {
        "this".into()
    }

    fn visit_unary(&mut self, expr: &Unary<'a>) -> String {
        format!("({} {})", expr.operator.lexeme, Self::print(&expr.right))
    }

    fn visit_variable(&mut self, expr: &Variable<'a>) -> String {
        expr.name.lexeme.into()
    }
}

impl<'a> StmtVisitor<'a> for AstPrinter {
    type Output = String;

    fn visit_block(&mut self, stmt: &Block<'a>) -> String {
        Self::parenthesize("block", stmt.statements.iter().map(Self::print_stmt))
    }

    fn visit_class(&mut self, stmt: &Class<'a>) -> String {
        let mut parts: Vec<String> = vec![stmt.name.lexeme.to_string()];

        if let Some(superclass) = &stmt.superclass {
            parts.push(format!("< {}", superclass.name.lexeme));
        }
        parts.extend(stmt.methods.iter().map(|m| Self::function("method", m)));

        Self::parenthesize("class", parts)
    }

    fn visit_expression(&mut self, stmt: &Expression<'a>) -> String {
        format!("(; {})", Self::print(&stmt.expression))
    }

    fn visit_function(&mut self, stmt: &Function<'a>) -> String {
        Self::function("fun", stmt)
    }

    fn visit_if(&mut self, stmt: &If<'a>) -> String {
        let mut parts: Vec<String> = vec![
            Self::print(&stmt.condition),
            Self::print_stmt(&stmt.then_branch),
        ];
        if let Some(else_branch) = &stmt.else_branch {
            parts.push(Self::print_stmt(else_branch));
        }

        Self::parenthesize("if", parts)
    }

    fn visit_print(&mut self, stmt: &Print<'a>) -> String {
        format!("(print {})", Self::print(&stmt.expression))
    }

    fn visit_return(&mut self, stmt: &Return<'a>) -> String {
        Self::parenthesize("return", stmt.value.iter().map(Self::print))
    }

    fn visit_continue(&mut self, _stmt: &Continue<'a>) -> String {
        "(continue)".into()
    }

    fn visit_break(&mut self, _stmt: &Break<'a>) -> String {
        "(break)".into()
    }

    fn visit_var(&mut self, stmt: &Var<'a>) -> String {
        let mut parts: Vec<String> = vec![stmt.name.lexeme.to_string()];
        parts.extend(stmt.initializer.iter().map(Self::print));

        Self::parenthesize("var", parts)
    }

    fn visit_while(&mut self, stmt: &While<'a>) -> String {
        let mut parts: Vec<String> = vec![
            Self::print(&stmt.condition),
            Self::print_stmt(&stmt.body),
        ];
        parts.extend(stmt.increment.iter().map(Self::print));

        Self::parenthesize("while", parts)
    }
}
