//! Load-time checks on literals.
//!
//! The parser accepts any text between `re/` and `/` and any digits in a
//! date literal. Both are checked here when a script is compiled, so a bad
//! pattern or an impossible date is a compile failure rather than a
//! runtime error on first evaluation.

use jan_ir::{
    Block, Expr, ExprKind, FunctionBody, FunctionDef, Literal, ParamKind, Script, Span, Stmt,
    StmtKind,
};
use jan_stack::ensure_sufficient_stack;
use jan_values::{PackedDate, PackedDateTime};
use regex::Regex;

/// Every invalid literal in `script`, in source order.
pub(crate) fn literal_errors(script: &Script) -> Vec<(Span, String)> {
    let mut checker = LiteralChecker { errors: Vec::new() };
    checker.stmts(&script.body);
    checker.errors.sort_by_key(|(span, _)| span.start);
    checker.errors
}

struct LiteralChecker {
    errors: Vec<(Span, String)>,
}

impl LiteralChecker {
    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn block(&mut self, block: &Block) {
        self.stmts(&block.stmts);
    }

    fn stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| match &stmt.kind {
            StmtKind::Expr(expr) | StmtKind::Throw(expr) | StmtKind::Return(Some(expr)) => self.expr(expr),
            StmtKind::Assign { target, value, .. } => {
                self.expr(target);
                self.expr(value);
            }
            StmtKind::Function(def) => self.function(def),
            StmtKind::If {
                cond,
                then_block,
                else_branch,
            } => {
                self.expr(cond);
                self.block(then_block);
                if let Some(else_branch) = else_branch {
                    self.stmt(else_branch);
                }
            }
            StmtKind::While { cond, body } | StmtKind::DoWhile { body, cond } => {
                self.expr(cond);
                self.block(body);
            }
            StmtKind::For { iterable, body, .. } => {
                self.expr(iterable);
                self.block(body);
            }
            StmtKind::ForRange { start, end, body, .. } => {
                self.expr(start);
                self.expr(end);
                self.block(body);
            }
            StmtKind::Try(try_stmt) => {
                self.block(&try_stmt.body);
                if let Some((_, catch)) = &try_stmt.catch {
                    self.block(catch);
                }
                if let Some(finally) = &try_stmt.finally {
                    self.block(finally);
                }
            }
            StmtKind::Block(block) => self.block(block),
            StmtKind::Return(None) | StmtKind::Break | StmtKind::Continue | StmtKind::Import { .. } => {}
        });
    }

    fn function(&mut self, def: &FunctionDef) {
        for param in &def.params {
            if let ParamKind::Default(default) = &param.kind {
                self.expr(default);
            }
        }
        match &def.body {
            FunctionBody::Block(block) => self.block(block),
            FunctionBody::Expr(expr) => self.expr(expr),
        }
    }

    fn expr(&mut self, expr: &Expr) {
        ensure_sufficient_stack(|| match &expr.kind {
            ExprKind::Literal(literal) => self.literal(literal, expr.span),
            ExprKind::Ident(_) => {}
            ExprKind::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            ExprKind::Unary { operand, .. } => self.expr(operand),
            ExprKind::IncDec { target, .. } => self.expr(target),
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.expr(cond);
                self.expr(then_expr);
                self.expr(else_expr);
            }
            ExprKind::Member { object, .. } => self.expr(object),
            ExprKind::Call { callee, args } => {
                self.expr(callee);
                for arg in args {
                    self.expr(&arg.value);
                }
            }
            ExprKind::Index { object, index } => {
                self.expr(object);
                self.expr(index);
            }
            ExprKind::Slice { object, from, to } => {
                self.expr(object);
                for bound in [from, to].into_iter().flatten() {
                    self.expr(bound);
                }
            }
            ExprKind::List(items) => {
                for item in items {
                    self.expr(item);
                }
            }
            ExprKind::Map(entries) => {
                for (key, value) in entries {
                    self.expr(key);
                    self.expr(value);
                }
            }
            ExprKind::Lambda(def) => self.function(def),
        });
    }

    fn literal(&mut self, literal: &Literal, span: Span) {
        match literal {
            Literal::Regex(pattern) => {
                if let Err(err) = Regex::new(pattern) {
                    self.errors.push((span, format!("invalid regex literal: {err}")));
                }
            }
            Literal::Date { year, month, day } => {
                if PackedDate::new(*year, *month, *day).is_none() {
                    self.errors.push((span, format!("invalid date: {year:04}-{month:02}-{day:02}")));
                }
            }
            Literal::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => {
                if PackedDateTime::new(*year, *month, *day, *hour, *minute, *second).is_none() {
                    self.errors.push((
                        span,
                        format!("invalid datetime: {year:04}-{month:02}-{day:02}-{hour:02}:{minute:02}:{second:02}"),
                    ));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jan_ir::StringInterner;
    use pretty_assertions::assert_eq;

    fn errors(source: &str) -> Vec<String> {
        let interner = StringInterner::new();
        let parsed = jan_parse::parse("test", source, &interner);
        assert!(!parsed.has_errors(), "{:?}", parsed.messages());
        literal_errors(&parsed.script)
            .into_iter()
            .map(|(_, message)| message)
            .collect()
    }

    #[test]
    fn valid_literals_pass() {
        assert!(errors("x = re/a+b/; d = @2024-02-29;").is_empty());
    }

    #[test]
    fn bad_regex_in_nested_function_is_found() {
        let found = errors("function f() { return \"x\" ~ re/(unclosed/; }");
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("invalid regex literal"));
    }

    #[test]
    fn impossible_dates_are_found() {
        assert_eq!(errors("d = @2023-02-30;"), vec!["invalid date: 2023-02-30".to_owned()]);
    }
}
