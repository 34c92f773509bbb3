//! Expression productions.
//!
//! Precedence, loosest first: conditional (`if-then-else`, `?:`), `or`,
//! `and`, `not`, equality and matching, comparison, additive,
//! multiplicative, unary, postfix.

use std::sync::Arc;

use jan_ir::{
    Arg, BinaryOp, Expr, ExprKind, FunctionBody, FunctionDef, IncDecOp, Literal, Param,
    ParamKind, UnaryOp,
};
use jan_lexer::TokenKind;
use jan_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

/// Lowest precedence handled by [`Parser::parse_binary`] (equality).
const EQUALITY_PRECEDENCE: u8 = 3;

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_ternary())
    }

    fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_or()?;
        if !self.cursor.eat(&TokenKind::Question) {
            return Ok(cond);
        }
        let then_expr = self.parse_expr()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let else_expr = self.parse_expr()?;
        let span = cond.span.merge(else_expr.span);
        Ok(Expr::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        ))
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while matches!(self.cursor.kind(), TokenKind::Or | TokenKind::PipePipe) {
            self.cursor.advance();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while matches!(self.cursor.kind(), TokenKind::And | TokenKind::AmpAmp) {
            self.cursor.advance();
            let right = self.parse_not()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.cursor.kind(), TokenKind::Not | TokenKind::Bang) {
            let start = self.cursor.advance().span;
            let operand = self.parse_not()?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_binary(EQUALITY_PRECEDENCE)
    }

    /// Precedence climbing over the non-logical binary operators.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = binary_op(self.cursor.kind()) {
            if op.precedence() < min_precedence {
                break;
            }
            self.cursor.advance();
            let right = self.parse_binary(op.precedence() + 1)?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.span();
        match self.cursor.kind() {
            TokenKind::Minus => {
                self.cursor.advance();
                let operand = ensure_sufficient_stack(|| self.parse_unary())?;
                // Negative numeric literals become plain literals.
                let folded = match operand.kind {
                    ExprKind::Literal(Literal::Int(n)) => Some(Literal::Int(n.wrapping_neg())),
                    ExprKind::Literal(Literal::Float(f)) => Some(Literal::Float(-f)),
                    _ => None,
                };
                let span = start.merge(operand.span);
                Ok(match folded {
                    Some(literal) => Expr::new(ExprKind::Literal(literal), span),
                    None => Expr::new(
                        ExprKind::Unary {
                            op: UnaryOp::Neg,
                            operand: Box::new(operand),
                        },
                        span,
                    ),
                })
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = inc_dec_op(self.cursor.kind());
                self.cursor.advance();
                let target = ensure_sufficient_stack(|| self.parse_unary())?;
                inc_dec(op, true, target, start)
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let (name, name_span) = self.cursor.expect_ident()?;
                    let span = expr.span.merge(name_span);
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
                // Calls, indexing and postfix ++/-- do not continue across a line break.
                TokenKind::LParen if !self.cursor.at_line_start() => {
                    let args = self.parse_args()?;
                    let span = expr.span.merge(self.cursor.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LBracket if !self.cursor.at_line_start() => {
                    expr = self.parse_index(expr)?;
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus if !self.cursor.at_line_start() => {
                    let op = inc_dec_op(self.cursor.kind());
                    let end = self.cursor.advance().span;
                    let start = expr.span;
                    expr = inc_dec(op, false, expr, start.merge(end))?;
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `[index]` or `[from:to]` after an expression.
    fn parse_index(&mut self, object: Expr) -> Result<Expr, ParseError> {
        let object_span = object.span;
        self.cursor.expect(&TokenKind::LBracket)?;
        let from = if self.cursor.check(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let kind = if self.cursor.eat(&TokenKind::Colon) {
            let to = if self.cursor.check(&TokenKind::RBracket) {
                None
            } else {
                Some(Box::new(self.parse_expr()?))
            };
            ExprKind::Slice {
                object: Box::new(object),
                from: from.map(Box::new),
                to,
            }
        } else {
            let Some(index) = from else {
                return Err(self.cursor.unexpected("index expression"));
            };
            ExprKind::Index {
                object: Box::new(object),
                index: Box::new(index),
            }
        };
        let end = self.cursor.expect(&TokenKind::RBracket)?;
        Ok(Expr::new(kind, object_span.merge(end)))
    }

    /// `( arg, name: arg, ... )`
    fn parse_args(&mut self) -> Result<Vec<Arg>, ParseError> {
        self.cursor.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            let name = match self.cursor.kind() {
                TokenKind::Ident(name) if self.cursor.check_ahead(1, &TokenKind::Colon) => {
                    let name = *name;
                    self.cursor.advance();
                    self.cursor.advance();
                    Some(name)
                }
                _ => None,
            };
            if name.is_none() && args.iter().any(|a: &Arg| a.name.is_some()) {
                return Err(ParseError::new(
                    "positional argument after named argument",
                    self.cursor.span(),
                ));
            }
            let value = self.parse_expr()?;
            args.push(Arg { name, value });
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.cursor.current().clone();
        let span = token.span;
        let literal = |lit: Literal| Ok(Expr::new(ExprKind::Literal(lit), span));
        match token.kind {
            TokenKind::Int(n) => {
                self.cursor.advance();
                literal(Literal::Int(n))
            }
            TokenKind::Float(f) => {
                self.cursor.advance();
                literal(Literal::Float(f))
            }
            TokenKind::Str(s) => {
                self.cursor.advance();
                literal(Literal::Str(s))
            }
            TokenKind::True | TokenKind::False => {
                self.cursor.advance();
                literal(Literal::Bool(matches!(token.kind, TokenKind::True)))
            }
            TokenKind::Null => {
                self.cursor.advance();
                literal(Literal::Null)
            }
            TokenKind::Date { year, month, day } => {
                self.cursor.advance();
                literal(Literal::Date { year, month, day })
            }
            TokenKind::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => {
                self.cursor.advance();
                literal(Literal::DateTime {
                    year,
                    month,
                    day,
                    hour,
                    minute,
                    second,
                })
            }
            TokenKind::Today => {
                self.cursor.advance();
                literal(Literal::Today)
            }
            TokenKind::Now => {
                self.cursor.advance();
                literal(Literal::Now)
            }
            TokenKind::Duration { amount, unit } => {
                self.cursor.advance();
                literal(Literal::Duration { amount, unit })
            }
            TokenKind::Regex(pattern) => {
                self.cursor.advance();
                literal(Literal::Regex(pattern))
            }
            TokenKind::Ident(name) => {
                if self.cursor.check_ahead(1, &TokenKind::Arrow) {
                    self.cursor.advance();
                    let params = vec![Param {
                        name,
                        kind: ParamKind::Positional,
                    }];
                    return self.finish_lambda(params, span);
                }
                self.cursor.advance();
                Ok(Expr::new(ExprKind::Ident(name), span))
            }
            TokenKind::LParen => {
                if self.is_lambda_params() {
                    let params = self.parse_params()?;
                    return self.finish_lambda(params, span);
                }
                self.cursor.advance();
                let inner = self.parse_expr()?;
                let end = self.cursor.expect(&TokenKind::RParen)?;
                Ok(Expr::new(inner.kind, span.merge(end)))
            }
            TokenKind::Function => {
                self.cursor.advance();
                let params = self.parse_params()?;
                let body = self.parse_block()?;
                let full = span.merge(body.span);
                Ok(Expr::new(
                    ExprKind::Lambda(Arc::new(FunctionDef {
                        name: None,
                        params,
                        body: FunctionBody::Block(body),
                        span: full,
                    })),
                    full,
                ))
            }
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_map_literal(),
            TokenKind::If => {
                self.cursor.advance();
                let cond = self.parse_expr()?;
                self.finish_conditional_expr(span, cond)
            }
            _ => Err(self.cursor.unexpected("expression")),
        }
    }

    /// Whether the `(` at the cursor opens a lambda parameter list.
    fn is_lambda_params(&self) -> bool {
        self.cursor
            .matching_close()
            .is_some_and(|close| self.cursor.check_ahead(close + 1, &TokenKind::Arrow))
    }

    /// `-> expr` or `-> { block }` after the parameters.
    fn finish_lambda(
        &mut self,
        params: Vec<Param>,
        start: jan_ir::Span,
    ) -> Result<Expr, ParseError> {
        self.cursor.expect(&TokenKind::Arrow)?;
        let body = if self.cursor.check(&TokenKind::LBrace) {
            FunctionBody::Block(self.parse_block()?)
        } else {
            FunctionBody::Expr(self.parse_expr()?)
        };
        let span = start.merge(self.cursor.previous_span());
        Ok(Expr::new(
            ExprKind::Lambda(Arc::new(FunctionDef {
                name: None,
                params,
                body,
                span,
            })),
            span,
        ))
    }

    fn parse_list_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBracket)?;
        let mut items = Vec::new();
        while !self.cursor.check(&TokenKind::RBracket) {
            items.push(self.parse_expr()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RBracket)?;
        Ok(Expr::new(ExprKind::List(items), start.merge(end)))
    }

    /// `{ key: value, ... }`; a bare identifier key is taken as a string.
    fn parse_map_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBrace)?;
        let mut entries = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            let key = match self.cursor.kind() {
                TokenKind::Ident(name) if self.cursor.check_ahead(1, &TokenKind::Colon) => {
                    let text: Arc<str> = self.interner.lookup(*name).into();
                    let span = self.cursor.advance().span;
                    Expr::new(ExprKind::Literal(Literal::Str(text)), span)
                }
                _ => self.parse_expr()?,
            };
            self.cursor.expect(&TokenKind::Colon)?;
            let value = self.parse_expr()?;
            entries.push((key, value));
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(ExprKind::Map(entries), start.merge(end)))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq | TokenKind::LtGt => BinaryOp::NotEq,
        TokenKind::Tilde => BinaryOp::Match,
        TokenKind::NotTilde => BinaryOp::NotMatch,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        _ => return None,
    })
}

fn inc_dec_op(kind: &TokenKind) -> IncDecOp {
    if matches!(kind, TokenKind::PlusPlus) {
        IncDecOp::Inc
    } else {
        IncDecOp::Dec
    }
}

fn inc_dec(
    op: IncDecOp,
    prefix: bool,
    target: Expr,
    span: jan_ir::Span,
) -> Result<Expr, ParseError> {
    if !target.is_assignable() {
        return Err(ParseError::new(
            format!("`{}` needs a variable, member or index target", op.as_symbol()),
            target.span,
        ));
    }
    let span = span.merge(target.span);
    Ok(Expr::new(
        ExprKind::IncDec {
            op,
            prefix,
            target: Box::new(target),
        },
        span,
    ))
}
