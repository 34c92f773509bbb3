//! Shared syntax-level types for the Janitor scripting language.
//!
//! # Contents
//!
//! - [`Name`] and [`StringInterner`]: compact interned identifiers
//! - [`Span`], [`Location`] and [`LineIndex`]: source positions
//! - [`DurationUnit`]: unit tags shared by literals and runtime durations
//! - [`ast`]: the script syntax tree produced by `jan_parse` and walked by `jan_eval`

pub mod ast;
mod interner;
mod name;
mod span;
mod units;

pub use ast::{
    Arg, AssignOp, BinaryOp, Block, Expr, ExprKind, FunctionBody, FunctionDef, IncDecOp,
    Literal, Param, ParamKind, Script, Stmt, StmtKind, TryStmt, UnaryOp,
};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::{LineIndex, Location, Span};
pub use units::DurationUnit;
