//! Recursive descent parser for Janitor scripts.
//!
//! Syntax problems never abort the parse. Each failing statement is recorded
//! as a [`ParseError`], the parser resynchronizes at the next statement
//! boundary, and the whole batch is returned in [`ParseOutput`] so the host
//! decides whether a non-empty list is fatal.

mod cursor;
mod grammar;


use jan_ir::{Script, Span, Stmt, StringInterner};
use jan_lexer::TokenKind;

use cursor::Cursor;

/// Syntax problem at a span.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }
}

/// Parse result: a script built from every statement that parsed, plus
/// all lexical and syntax errors.
#[derive(Debug)]
pub struct ParseOutput {
    pub script: Script,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors rendered as `line:column: message`.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", self.script.location(e.span), e.message))
            .collect()
    }
}

/// Lex and parse `source` into a script named `name`.
pub fn parse(name: &str, source: &str, interner: &StringInterner) -> ParseOutput {
    let lexed = jan_lexer::lex(source, interner);
    let mut errors: Vec<ParseError> = lexed
        .errors
        .into_iter()
        .map(|e| ParseError::new(e.message, e.span))
        .collect();

    let mut parser = Parser::new(Cursor::new(lexed.tokens), interner);
    let body = parser.parse_statements_until_eof();
    errors.append(&mut parser.errors);
    errors.sort_by_key(|e| e.span.start);

    tracing::debug!(script = name, statements = body.len(), errors = errors.len(), "parsed");
    ParseOutput {
        script: Script::new(name, source, body),
        errors,
    }
}

/// Parser state.
pub(crate) struct Parser<'a> {
    cursor: Cursor,
    interner: &'a StringInterner,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(cursor: Cursor, interner: &'a StringInterner) -> Self {
        Parser {
            cursor,
            interner,
            errors: Vec::new(),
        }
    }

    fn parse_statements_until_eof(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        loop {
            while self.cursor.eat(&TokenKind::Semicolon) {}
            if self.cursor.is_at_end() {
                break;
            }
            if self.cursor.check(&TokenKind::RBrace) {
                let error = ParseError::new("unmatched `}`", self.cursor.span());
                self.errors.push(error);
                self.cursor.advance();
                continue;
            }
            self.parse_statement_recovering(&mut stmts);
        }
        stmts
    }

    /// Parse one statement into `stmts`; on failure record the error and skip
    /// to the next statement boundary.
    fn parse_statement_recovering(&mut self, stmts: &mut Vec<Stmt>) {
        match self.parse_stmt() {
            Ok(stmt) => stmts.push(stmt),
            Err(error) => {
                self.errors.push(error);
                self.synchronize();
            }
        }
    }

    /// Skip tokens until a plausible statement start.
    fn synchronize(&mut self) {
        let start = self.cursor.span();
        loop {
            match self.cursor.kind() {
                TokenKind::Eof | TokenKind::RBrace => return,
                TokenKind::Semicolon => {
                    self.cursor.advance();
                    return;
                }
                TokenKind::If
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Function
                | TokenKind::Try
                | TokenKind::Import
                    if self.cursor.span() != start =>
                {
                    return;
                }
                _ if self.cursor.at_line_start() && self.cursor.span() != start => return,
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }
}
