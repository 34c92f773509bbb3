//! Lexer for Janitor scripts using logos with identifier interning.
//!
//! Lexing never stops at the first problem: invalid slices become
//! [`TokenKind::Error`] tokens and a [`LexError`] is recorded, so the parser
//! can keep going and report everything in one batch.

mod convert;
mod raw_token;
mod token;

#[cfg(test)]
mod tests;

use jan_ir::{Span, StringInterner};
use logos::Logos;

use raw_token::RawToken;
pub use token::{Token, TokenKind};

/// Lexical problem at a span.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// Lexer output: tokens terminated by [`TokenKind::Eof`], plus collected errors.
#[derive(Debug, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Tokenize `source`, interning identifiers into `interner`.
pub fn lex(source: &str, interner: &StringInterner) -> LexOutput {
    let mut output = LexOutput::default();
    let mut lexer = RawToken::lexer(source);
    let mut newline_before = false;

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let slice = lexer.slice();
        let kind = match result {
            Ok(RawToken::Newline) => {
                newline_before = true;
                continue;
            }
            Ok(raw) => convert::convert(raw, slice, interner).unwrap_or_else(|message| {
                output.errors.push(LexError { message, span });
                TokenKind::Error
            }),
            Err(()) => {
                output.errors.push(LexError {
                    message: unexpected_message(slice),
                    span,
                });
                TokenKind::Error
            }
        };
        output.tokens.push(Token {
            kind,
            span,
            newline_before,
        });
        newline_before = false;
    }

    let end = Span::from_range(source.len()..source.len());
    output.tokens.push(Token {
        kind: TokenKind::Eof,
        span: end,
        newline_before,
    });
    output
}

fn unexpected_message(slice: &str) -> String {
    if slice.starts_with("\"\"\"") || slice.starts_with("'''") {
        "unterminated triple-quoted string".to_owned()
    } else if slice.starts_with('"') || slice.starts_with('\'') {
        "unterminated string literal".to_owned()
    } else {
        format!("unexpected character `{slice}`")
    }
}
