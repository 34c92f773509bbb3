//! Expression evaluation.

use std::sync::Arc;

use jan_ir::{BinaryOp, Expr, ExprKind, FunctionDef, Literal};
use jan_stack::ensure_sufficient_stack;
use jan_values::{
    temporal_out_of_range, undefined_variable, EvalResult, PackedDate, PackedDateTime, Value,
};
use rustc_hash::FxHashMap;

use crate::indexing::{index_place, slice};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::process::ScriptProcess;

impl ScriptProcess<'_> {
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Literal(literal) => self.eval_literal(literal),
            ExprKind::Ident(name) => self
                .lookup(*name)
                .ok_or_else(|| undefined_variable(self.name_of(*name)).into()),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
            ExprKind::Unary { op, operand } => {
                let operand = self.eval_expr(operand)?;
                Ok(evaluate_unary(&operand, *op)?)
            }
            ExprKind::IncDec { op, prefix, target } => self.eval_inc_dec(*op, *prefix, target),
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                if self.eval_expr(cond)?.unpack().is_truthy() {
                    self.eval_expr(then_expr)
                } else {
                    self.eval_expr(else_expr)
                }
            }
            ExprKind::Member { object, name } => {
                let object = self.eval_expr(object)?;
                Ok(self.get_attribute(&object, *name)?)
            }
            ExprKind::Call { callee, args } => self.eval_call(callee, args),
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                Ok(index_place(&object, &index)?.into_value())
            }
            ExprKind::Slice { object, from, to } => {
                let object = self.eval_expr(object)?;
                let from = self.eval_optional(from.as_deref())?;
                let to = self.eval_optional(to.as_deref())?;
                Ok(slice(&object, &from, &to)?)
            }
            ExprKind::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval_expr(item).map(|v| v.unpack()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(values))
            }
            ExprKind::Map(entries) => {
                let mut map = FxHashMap::default();
                for (key, value) in entries {
                    let key = self.eval_expr(key)?.unpack();
                    let value = self.eval_expr(value)?.unpack();
                    map.insert(key, value);
                }
                Ok(Value::map(map))
            }
            ExprKind::Lambda(def) => Ok(self.make_function(def)),
        }
    }

    fn eval_optional(&mut self, expr: Option<&Expr>) -> EvalResult {
        match expr {
            Some(expr) => Ok(self.eval_expr(expr)?.unpack()),
            None => Ok(Value::Null),
        }
    }

    fn eval_literal(&mut self, literal: &Literal) -> EvalResult {
        let value = match literal {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::bool(*b),
            Literal::Int(n) => Value::int(*n),
            Literal::Float(f) => Value::float(*f),
            Literal::Str(s) => Value::string(&**s),
            Literal::Date { year, month, day } => PackedDate::new(*year, *month, *day)
                .map(Value::Date)
                .ok_or_else(temporal_out_of_range)?,
            Literal::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => PackedDateTime::new(*year, *month, *day, *hour, *minute, *second)
                .map(Value::DateTime)
                .ok_or_else(temporal_out_of_range)?,
            Literal::Today => Value::Date(PackedDate::from_naive(chrono::Local::now().date_naive())),
            Literal::Now => Value::DateTime(PackedDateTime::from_naive(chrono::Local::now().naive_local())),
            Literal::Duration { amount, unit } => Value::duration(*amount, *unit),
            Literal::Regex(pattern) => self.regexes.literal(pattern)?,
        };
        Ok(value)
    }

    /// Binary operators; `and` and `or` evaluate their right side only
    /// when it decides the result.
    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        let left = self.eval_expr(left)?.unpack();
        match op {
            BinaryOp::And => {
                if !left.is_truthy() {
                    return Ok(Value::bool(false));
                }
                let right = self.eval_expr(right)?.unpack();
                Ok(Value::bool(right.is_truthy()))
            }
            BinaryOp::Or => {
                if left.is_truthy() {
                    return Ok(left);
                }
                Ok(self.eval_expr(right)?.unpack())
            }
            _ => {
                let right = self.eval_expr(right)?;
                Ok(evaluate_binary(&left, &right, op, &mut self.regexes)?)
            }
        }
    }

    /// A function value closing over the current scope.
    pub(crate) fn make_function(&mut self, def: &Arc<FunctionDef>) -> Value {
        let closure = self.capture_scope();
        let name = def.name.map(|name| self.name_of(name));
        Value::function(Arc::clone(def), closure, name)
    }
}
