//! Statement nodes of the Lox AST, mirroring [`crate::expr`]: one struct per
//! variant, dispatched through [`StmtVisitor`].

use serde::Serialize;

use crate::expr::{Expr, Variable};
use crate::token::Token;

/// Braced scope containing zero or more declarations/statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block<'a> {
    pub statements: Vec<Stmt<'a>>,
}

/// `class Name (< Superclass)? { methods }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class<'a> {
    pub name: Token<'a>,
    pub superclass: Option<Variable<'a>>,
    pub methods: Vec<Function<'a>>,
}

/// Stand‑alone expression terminated by a semicolon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression<'a> {
    pub expression: Expr<'a>,
}

/// Function or method declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function<'a> {
    pub name: Token<'a>,

    /// Parameter name tokens, at most `MAX_ARGUMENTS` of them in valid code.
    pub params: Vec<Token<'a>>,

    pub body: Vec<Stmt<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct If<'a> {
    pub condition: Expr<'a>,
    pub then_branch: Box<Stmt<'a>>,
    pub else_branch: Option<Box<Stmt<'a>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Print<'a> {
    pub expression: Expr<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return<'a> {
    /// The `return` keyword token (for error locations).
    pub keyword: Token<'a>,

    /// Absent ⇒ `nil` is returned.
    pub value: Option<Expr<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Continue<'a> {
    pub keyword: Token<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Break<'a> {
    pub keyword: Token<'a>,
}

/// Variable declaration: `"var" IDENT ("=" initializer)? ";"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Var<'a> {
    pub name: Token<'a>,
    pub initializer: Option<Expr<'a>>,
}

/// `while` loop.  Desugared `for` loops keep their increment here so that
/// `continue` still runs it before the next condition check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct While<'a> {
    pub condition: Expr<'a>,
    pub body: Box<Stmt<'a>>,
    pub increment: Option<Expr<'a>>,
}

/// **Abstract‑Syntax‑Tree node** for *statements*.  A program is a sequence
/// of these nodes returned by [`crate::parser::Parser::parse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt<'a> {
    Block(Block<'a>),
    Class(Class<'a>),
    Expression(Expression<'a>),
    Function(Function<'a>),
    If(If<'a>),
    Print(Print<'a>),
    Return(Return<'a>),
    Continue(Continue<'a>),
    Break(Break<'a>),
    Var(Var<'a>),
    While(While<'a>),
}

/// One method per statement variant.
pub trait StmtVisitor<'a> {
    type Output;

    fn visit_block(&mut self, stmt: &Block<'a>) -> Self::Output;
    fn visit_class(&mut self, stmt: &Class<'a>) -> Self::Output;
    fn visit_expression(&mut self, stmt: &Expression<'a>) -> Self::Output;
    fn visit_function(&mut self, stmt: &Function<'a>) -> Self::Output;
    fn visit_if(&mut self, stmt: &If<'a>) -> Self::Output;
    fn visit_print(&mut self, stmt: &Print<'a>) -> Self::Output;
    fn visit_return(&mut self, stmt: &Return<'a>) -> Self::Output;
    fn visit_continue(&mut self, stmt: &Continue<'a>) -> Self::Output;
    fn visit_break(&mut self, stmt: &Break<'a>) -> Self::Output;
    fn visit_var(&mut self, stmt: &Var<'a>) -> Self::Output;
    fn visit_while(&mut self, stmt: &While<'a>) -> Self::Output;
}

impl<'a> Stmt<'a> {
    pub fn accept<V: StmtVisitor<'a>>(&self, visitor: &mut V) -> V::Output {
        match self {
            Stmt::Block(s) => visitor.visit_block(s),
            Stmt::Class(s) => visitor.visit_class(s),
            Stmt::Expression(s) => visitor.visit_expression(s),
            Stmt::Function(s) => visitor.visit_function(s),
            Stmt::If(s) => visitor.visit_if(s),
            Stmt::Print(s) => visitor.visit_print(s),
            Stmt::Return(s) => visitor.visit_return(s),
            Stmt::Continue(s) => visitor.visit_continue(s),
            Stmt::Break(s) => visitor.visit_break(s),
            Stmt::Var(s) => visitor.visit_var(s),
            Stmt::While(s) => visitor.visit_while(s),
        }
    }
}
