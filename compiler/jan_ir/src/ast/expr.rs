//! Expression nodes.

use std::sync::Arc;

use super::{BinaryOp, FunctionDef, IncDecOp, UnaryOp};
use crate::{DurationUnit, Name, Span};

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Whether this expression may appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    Ident(Name),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `++x`, `x--`; the target must be assignable.
    IncDec {
        op: IncDecOp,
        prefix: bool,
        target: Box<Expr>,
    },
    /// `if c then a else b` and `c ? a : b`.
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Member {
        object: Box<Expr>,
        name: Name,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Arg>,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// `a[from:to]`, either bound may be omitted.
    Slice {
        object: Box<Expr>,
        from: Option<Box<Expr>>,
        to: Option<Box<Expr>>,
    },
    List(Vec<Expr>),
    Map(Vec<(Expr, Expr)>),
    Lambda(Arc<FunctionDef>),
}

/// Call argument, optionally named (`f(x, limit: 3)`).
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: Option<Name>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// `@2024-08-07`
    Date { year: i32, month: u32, day: u32 },
    /// `@2024-08-07-12:00[:30]`
    DateTime {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    },
    /// `@today`, resolved at evaluation time.
    Today,
    /// `@now`, resolved at evaluation time.
    Now,
    /// `@5d`
    Duration { amount: i64, unit: DurationUnit },
    /// `re/pattern/`, compiled once when the script is loaded.
    Regex(Arc<str>),
}
