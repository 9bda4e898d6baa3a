//! Expression nodes of the Lox AST.
//!
//! Every variant wraps a small struct holding exactly the tokens and
//! sub‑expressions its grammar rule needs.  Passes walk the tree through
//! [`ExprVisitor`]: [`Expr::accept`] dispatches to the one method matching
//! the variant, so a new pass never touches these definitions.

use std::cell::Cell;

use serde::Serialize;

use crate::token::{LiteralValue, Token};

/// Static location of a variable: how many scopes up, and which slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Number of `enclosing` hops from the use site.
    pub depth: usize,

    /// Slot index inside that frame.
    pub index: usize,
}

/// Written once by the resolver; `None` means "look the name up dynamically".
pub type ResolutionCell = Cell<Option<Resolution>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assign<'a> {
    pub name: Token<'a>,
    pub value: Box<Expr<'a>>,
    pub resolution: ResolutionCell,
}

/// Infix operator, including the comma operator (`operator` is the `,`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binary<'a> {
    pub left: Box<Expr<'a>>,
    pub operator: Token<'a>,
    pub right: Box<Expr<'a>>,
}

/// `condition ? then_branch : else_branch`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ternary<'a> {
    pub condition: Box<Expr<'a>>,
    pub question: Token<'a>,
    pub then_branch: Box<Expr<'a>>,
    pub colon: Token<'a>,
    pub else_branch: Box<Expr<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call<'a> {
    pub callee: Box<Expr<'a>>,
    /// The closing `)`, kept for error locations.
    pub paren: Token<'a>,
    pub arguments: Vec<Expr<'a>>,
}

/// `object.name`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Get<'a> {
    pub object: Box<Expr<'a>>,
    pub name: Token<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grouping<'a> {
    pub expression: Box<Expr<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub value: LiteralValue,
}

/// Short‑circuiting `and` / `or`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Logical<'a> {
    pub left: Box<Expr<'a>>,
    pub operator: Token<'a>,
    pub right: Box<Expr<'a>>,
}

/// `object.name = value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Set<'a> {
    pub object: Box<Expr<'a>>,
    pub name: Token<'a>,
    pub value: Box<Expr<'a>>,
}

/// `super.method`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Super<'a> {
    pub keyword: Token<'a>,
    pub method: Token<'a>,
    pub resolution: ResolutionCell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct This<'a> {
    pub keyword: Token<'a>,
    pub resolution: ResolutionCell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unary<'a> {
    pub operator: Token<'a>,
    pub right: Box<Expr<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable<'a> {
    pub name: Token<'a>,
    pub resolution: ResolutionCell,
}

/// **Abstract‑Syntax‑Tree node** representing every kind of *expression*.
/// The lifetime `'a` ties tokens back to the source buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr<'a> {
    Assign(Assign<'a>),
    Binary(Binary<'a>),
    Ternary(Ternary<'a>),
    Call(Call<'a>),
    Get(Get<'a>),
    Grouping(Grouping<'a>),
    Literal(Literal),
    Logical(Logical<'a>),
    Set(Set<'a>),
    Super(Super<'a>),
    This(This<'a>),
    Unary(Unary<'a>),
    Variable(Variable<'a>),
}

/// One method per expression variant.
pub trait ExprVisitor<'a> {
    type Output;

    fn visit_assign(&mut self, expr: &Assign<'a>) -> Self::Output;
    fn visit_binary(&mut self, expr: &Binary<'a>) -> Self::Output;
    fn visit_ternary(&mut self, expr: &Ternary<'a>) -> Self::Output;
    fn visit_call(&mut self, expr: &Call<'a>) -> Self::Output;
    fn visit_get(&mut self, expr: &Get<'a>) -> Self::Output;
    fn visit_grouping(&mut self, expr: &Grouping<'a>) -> Self::Output;
    fn visit_literal(&mut self, expr: &Literal) -> Self::Output;
    fn visit_logical(&mut self, expr: &Logical<'a>) -> Self::Output;
    fn visit_set(&mut self, expr: &Set<'a>) -> Self::Output;
    fn visit_super(&mut self, expr: &Super<'a>) -> Self::Output;
    fn visit_this(&mut self, expr: &This<'a>) -> Self::Output;
    fn visit_unary(&mut self, expr: &Unary<'a>) -> Self::Output;
    fn visit_variable(&mut self, expr: &Variable<'a>) -> Self::Output;
}

impl<'a> Expr<'a> {
    pub fn accept<V: ExprVisitor<'a>>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Assign(e) => visitor.visit_assign(e),
            Expr::Binary(e) => visitor.visit_binary(e),
            Expr::Ternary(e) => visitor.visit_ternary(e),
            Expr::Call(e) => visitor.visit_call(e),
            Expr::Get(e) => visitor.visit_get(e),
            Expr::Grouping(e) => visitor.visit_grouping(e),
            Expr::Literal(e) => visitor.visit_literal(e),
            Expr::Logical(e) => visitor.visit_logical(e),
            Expr::Set(e) => visitor.visit_set(e),
            Expr::Super(e) => visitor.visit_super(e),
            Expr::This(e) => visitor.visit_this(e),
            Expr::Unary(e) => visitor.visit_unary(e),
            Expr::Variable(e) => visitor.visit_variable(e),
        }
    }

    // ── constructors used by the parser ────────────────────────────────

    pub fn assign(name: Token<'a>, value: Expr<'a>) -> Self {
        Expr::Assign(Assign {
            name,
            value: Box::new(value),
            resolution: Cell::new(None),
        })
    }

    pub fn binary(left: Expr<'a>, operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Binary(Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn logical(left: Expr<'a>, operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Logical(Logical {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn unary(operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Unary(Unary {
            operator,
            right: Box::new(right),
        })
    }

    pub fn literal(value: LiteralValue) -> Self {
        Expr::Literal(Literal { value })
    }

    pub fn grouping(expression: Expr<'a>) -> Self {
        Expr::Grouping(Grouping {
            expression: Box::new(expression),
        })
    }

    pub fn variable(name: Token<'a>) -> Self {
        Expr::Variable(Variable {
            name,
            resolution: Cell::new(None),
        })
    }

    pub fn this(keyword: Token<'a>) -> Self {
        Expr::This(This {
            keyword,
            resolution: Cell::new(None),
        })
    }

    pub fn super_access(keyword: Token<'a>, method: Token<'a>) -> Self {
        Expr::Super(Super {
            keyword,
            method,
            resolution: Cell::new(None),
        })
    }
}
