//! Script syntax tree.
//!
//! The tree is immutable once built. Function bodies are held behind `Arc`
//! so a runtime function value can keep its definition alive after the
//! [`Script`] that declared it is dropped, and so compiled scripts can be
//! handed to other threads.

mod expr;
mod operators;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::{LineIndex, Location, Name, Span};

pub use expr::{Arg, Expr, ExprKind, Literal};
pub use operators::{AssignOp, BinaryOp, IncDecOp, UnaryOp};

/// A compiled script: top-level statements plus the source they came from.
#[derive(Debug)]
pub struct Script {
    pub name: String,
    pub source: Arc<str>,
    pub body: Vec<Stmt>,
    lines: LineIndex,
}

impl Script {
    pub fn new(name: impl Into<String>, source: impl Into<Arc<str>>, body: Vec<Stmt>) -> Self {
        let source = source.into();
        let lines = LineIndex::new(&source);
        Script {
            name: name.into(),
            source,
            body,
            lines,
        }
    }

    /// Resolve a span of this script to a line/column location.
    pub fn location(&self, span: Span) -> Location {
        self.lines.location(span)
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }
}

/// Braced sequence of statements; executing it opens a block scope.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Expression evaluated for its value; the last one executed is the script result.
    Expr(Expr),
    /// `target op= value`. The target is an identifier, member or index expression.
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
    },
    /// `function name(params) { ... }`, an assignment of a function value to `name`.
    Function(Arc<FunctionDef>),
    If {
        cond: Expr,
        then_block: Block,
        /// Either a plain block or another `If` statement for `else if`.
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Block,
    },
    DoWhile {
        body: Block,
        cond: Expr,
    },
    /// `for (var in iterable) { ... }`
    For {
        var: Name,
        iterable: Expr,
        body: Block,
    },
    /// `for (var from start to end) { ... }`, inclusive on both ends.
    ForRange {
        var: Name,
        start: Expr,
        end: Expr,
        body: Block,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    Throw(Expr),
    Try(Box<TryStmt>),
    Block(Block),
    /// `import module [as alias]`
    Import {
        module: Name,
        alias: Option<Name>,
    },
}

/// `try { } catch name { } finally { }`; at least one of catch/finally is present.
#[derive(Debug, Clone)]
pub struct TryStmt {
    pub body: Block,
    pub catch: Option<(Name, Block)>,
    pub finally: Option<Block>,
}

/// Named function or lambda.
#[derive(Debug)]
pub struct FunctionDef {
    /// `None` for lambdas.
    pub name: Option<Name>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub span: Span,
}

impl FunctionDef {
    /// Number of arguments a call must supply.
    pub fn required_params(&self) -> usize {
        self.params
            .iter()
            .filter(|p| matches!(p.kind, ParamKind::Positional))
            .count()
    }
}

#[derive(Debug)]
pub enum FunctionBody {
    Block(Block),
    /// Lambda shorthand, `x -> x + 1`.
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Name,
    pub kind: ParamKind,
}

#[derive(Debug, Clone)]
pub enum ParamKind {
    Positional,
    /// `name = expr`, evaluated at call time when the argument is missing.
    Default(Expr),
    /// `*rest`, collects surplus positional arguments into a list.
    VarArgs,
    /// `**kwargs`, collects unmatched keyword arguments into a map.
    KwArgs,
}
