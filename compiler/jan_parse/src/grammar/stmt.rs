//! Statement productions.

use std::sync::Arc;

use jan_ir::{
    AssignOp, Block, Expr, ExprKind, FunctionBody, FunctionDef, Name, Param, ParamKind, Span,
    Stmt, StmtKind, TryStmt,
};
use jan_lexer::TokenKind;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.span();
        match self.cursor.kind() {
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(Stmt::new(StmtKind::Block(block), span))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => {
                self.cursor.advance();
                let cond = self.parse_paren_condition()?;
                let body = self.parse_block()?;
                let span = start.merge(body.span);
                Ok(Stmt::new(StmtKind::While { cond, body }, span))
            }
            TokenKind::Do => {
                self.cursor.advance();
                let body = self.parse_block()?;
                self.cursor.expect(&TokenKind::While)?;
                let cond = self.parse_paren_condition()?;
                self.end_stmt()?;
                let span = start.merge(cond.span);
                Ok(Stmt::new(StmtKind::DoWhile { body, cond }, span))
            }
            TokenKind::For => self.parse_for(),
            TokenKind::Break => {
                self.cursor.advance();
                self.end_stmt()?;
                Ok(Stmt::new(StmtKind::Break, start))
            }
            TokenKind::Continue => {
                self.cursor.advance();
                self.end_stmt()?;
                Ok(Stmt::new(StmtKind::Continue, start))
            }
            TokenKind::Return => {
                self.cursor.advance();
                let value = if self.at_stmt_end() {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.end_stmt()?;
                let span = value.as_ref().map_or(start, |v| start.merge(v.span));
                Ok(Stmt::new(StmtKind::Return(value), span))
            }
            TokenKind::Throw => {
                self.cursor.advance();
                let value = self.parse_expr()?;
                self.end_stmt()?;
                let span = start.merge(value.span);
                Ok(Stmt::new(StmtKind::Throw(value), span))
            }
            TokenKind::Try => self.parse_try(),
            TokenKind::Function if matches!(self.cursor.peek(1).kind, TokenKind::Ident(_)) => {
                self.parse_function_decl()
            }
            TokenKind::Import => self.parse_import(),
            _ => self.parse_expr_or_assignment(),
        }
    }

    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            while self.cursor.eat(&TokenKind::Semicolon) {}
            if self.cursor.check(&TokenKind::RBrace) {
                break;
            }
            if self.cursor.is_at_end() {
                return Err(ParseError::new("unclosed block, expected `}`", start));
            }
            self.parse_statement_recovering(&mut stmts);
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        Ok(Block {
            stmts,
            span: start.merge(end),
        })
    }

    fn at_stmt_end(&self) -> bool {
        matches!(
            self.cursor.kind(),
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) || self.cursor.at_line_start()
    }

    /// A simple statement ends at `;`, a line break, `}` or end of input.
    fn end_stmt(&mut self) -> Result<(), ParseError> {
        if self.cursor.eat(&TokenKind::Semicolon) || self.at_stmt_end() {
            Ok(())
        } else {
            Err(self.cursor.unexpected("`;` or line break"))
        }
    }

    fn parse_paren_condition(&mut self) -> Result<Expr, ParseError> {
        self.cursor.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(cond)
    }

    /// `if (c) { } else ...` statement, or an `if c then a else b` expression statement.
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::If)?;
        let cond = self.parse_expr()?;
        if self.cursor.check(&TokenKind::Then) {
            let expr = self.finish_conditional_expr(start, cond)?;
            self.end_stmt()?;
            let span = expr.span;
            return Ok(Stmt::new(StmtKind::Expr(expr), span));
        }

        let then_block = self.parse_block()?;
        let mut span = start.merge(then_block.span);
        let else_branch = if self.cursor.eat(&TokenKind::Else) {
            let branch = if self.cursor.check(&TokenKind::If) {
                self.parse_if()?
            } else {
                let block = self.parse_block()?;
                let block_span = block.span;
                Stmt::new(StmtKind::Block(block), block_span)
            };
            span = span.merge(branch.span);
            Some(Box::new(branch))
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                cond,
                then_block,
                else_branch,
            },
            span,
        ))
    }

    /// `for (x in expr) { }` or `for (i from a to b) { }`
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::For)?;
        self.cursor.expect(&TokenKind::LParen)?;
        let (var, _) = self.cursor.expect_ident()?;
        let kind = if self.cursor.eat(&TokenKind::In) {
            let iterable = self.parse_expr()?;
            self.cursor.expect(&TokenKind::RParen)?;
            let body = self.parse_block()?;
            StmtKind::For {
                var,
                iterable,
                body,
            }
        } else if self.cursor.eat(&TokenKind::From) {
            let range_start = self.parse_expr()?;
            self.cursor.expect(&TokenKind::To)?;
            let range_end = self.parse_expr()?;
            self.cursor.expect(&TokenKind::RParen)?;
            let body = self.parse_block()?;
            StmtKind::ForRange {
                var,
                start: range_start,
                end: range_end,
                body,
            }
        } else {
            return Err(self.cursor.unexpected("`in` or `from`"));
        };
        Ok(Stmt::new(kind, start.merge(self.cursor.previous_span())))
    }

    /// `try { } catch e { } finally { }`; the catch name may be parenthesized.
    fn parse_try(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::Try)?;
        let body = self.parse_block()?;
        let catch = if self.cursor.eat(&TokenKind::Catch) {
            let parenthesized = self.cursor.eat(&TokenKind::LParen);
            let (name, _) = self.cursor.expect_ident()?;
            if parenthesized {
                self.cursor.expect(&TokenKind::RParen)?;
            }
            Some((name, self.parse_block()?))
        } else {
            None
        };
        let finally = if self.cursor.eat(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };
        if catch.is_none() && finally.is_none() {
            return Err(ParseError::new(
                "`try` needs a `catch` or `finally` block",
                start,
            ));
        }
        let span = start.merge(self.cursor.previous_span());
        Ok(Stmt::new(
            StmtKind::Try(Box::new(TryStmt {
                body,
                catch,
                finally,
            })),
            span,
        ))
    }

    /// `function name(params) { body }`
    fn parse_function_decl(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::Function)?;
        let (name, _) = self.cursor.expect_ident()?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Ok(Stmt::new(
            StmtKind::Function(Arc::new(FunctionDef {
                name: Some(name),
                params,
                body: FunctionBody::Block(body),
                span,
            })),
            span,
        ))
    }

    /// `( param, param = default, *rest, **kwargs )`
    pub(crate) fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.cursor.expect(&TokenKind::LParen)?;
        let mut params: Vec<Param> = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            let param = self.parse_param()?;
            if params.iter().any(|p| p.name == param.name) {
                return Err(ParseError::new(
                    "duplicate parameter name",
                    self.cursor.previous_span(),
                ));
            }
            params.push(param);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        if self.cursor.eat(&TokenKind::StarStar) {
            let (name, _) = self.cursor.expect_ident()?;
            return Ok(Param {
                name,
                kind: ParamKind::KwArgs,
            });
        }
        if self.cursor.eat(&TokenKind::Star) {
            let (name, _) = self.cursor.expect_ident()?;
            return Ok(Param {
                name,
                kind: ParamKind::VarArgs,
            });
        }
        let (name, _) = self.cursor.expect_ident()?;
        let kind = if self.cursor.eat(&TokenKind::Assign) {
            ParamKind::Default(self.parse_expr()?)
        } else {
            ParamKind::Positional
        };
        Ok(Param { name, kind })
    }

    /// `import a.b [as c]` or `import 'a.b' as c`
    fn parse_import(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::Import)?;
        let module = self.parse_module_path()?;
        let alias = if self.cursor.eat(&TokenKind::As) {
            Some(self.cursor.expect_ident()?.0)
        } else {
            None
        };
        self.end_stmt()?;
        Ok(Stmt::new(
            StmtKind::Import { module, alias },
            start.merge(self.cursor.previous_span()),
        ))
    }

    /// Module path, either quoted or a dotted identifier chain.
    fn parse_module_path(&mut self) -> Result<Name, ParseError> {
        match self.cursor.kind().clone() {
            TokenKind::Str(path) => {
                self.cursor.advance();
                Ok(self.interner.intern(&path))
            }
            TokenKind::Ident(first) => {
                self.cursor.advance();
                if !self.cursor.check(&TokenKind::Dot) {
                    return Ok(first);
                }
                let mut path = self.interner.lookup(first).to_owned();
                while self.cursor.eat(&TokenKind::Dot) {
                    let (segment, _) = self.cursor.expect_ident()?;
                    path.push('.');
                    path.push_str(self.interner.lookup(segment));
                }
                Ok(self.interner.intern(&path))
            }
            _ => Err(self.cursor.unexpected("module name")),
        }
    }

    /// Expression statement, or an assignment if an assignment operator follows.
    fn parse_expr_or_assignment(&mut self) -> Result<Stmt, ParseError> {
        let target = self.parse_expr()?;
        let op = match self.cursor.kind() {
            TokenKind::Assign => Some(AssignOp::Assign),
            TokenKind::PlusAssign => Some(AssignOp::Add),
            TokenKind::MinusAssign => Some(AssignOp::Sub),
            TokenKind::StarAssign => Some(AssignOp::Mul),
            TokenKind::SlashAssign => Some(AssignOp::Div),
            TokenKind::PercentAssign => Some(AssignOp::Mod),
            _ => None,
        };
        let Some(op) = op else {
            self.end_stmt()?;
            let span = target.span;
            return Ok(Stmt::new(StmtKind::Expr(target), span));
        };
        if !target.is_assignable() {
            return Err(ParseError::new("invalid assignment target", target.span));
        }
        self.cursor.advance();
        let value = self.parse_expr()?;
        self.end_stmt()?;
        let span = target.span.merge(value.span);
        Ok(Stmt::new(StmtKind::Assign { target, op, value }, span))
    }

    /// Shared by statement-level `if ... then` and the expression form.
    pub(crate) fn finish_conditional_expr(
        &mut self,
        start: Span,
        cond: Expr,
    ) -> Result<Expr, ParseError> {
        self.cursor.expect(&TokenKind::Then)?;
        let then_expr = self.parse_expr()?;
        self.cursor.expect(&TokenKind::Else)?;
        let else_expr = self.parse_expr()?;
        let span = start.merge(else_expr.span);
        Ok(Expr::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        ))
    }
}
