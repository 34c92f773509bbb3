use super::*;
use jan_ir::DurationUnit;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    let interner = StringInterner::new();
    let output = lex(source, &interner);
    assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
    output.tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn arithmetic_expression() {
    assert_eq!(
        kinds("1 + 2 * 3"),
        vec![
            TokenKind::Int(1),
            TokenKind::Plus,
            TokenKind::Int(2),
            TokenKind::Star,
            TokenKind::Int(3),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn string_quote_styles() {
    assert_eq!(
        kinds(r#"'a\'b' "c\nd" '''multi
line'''"#),
        vec![
            TokenKind::Str("a'b".into()),
            TokenKind::Str("c\nd".into()),
            TokenKind::Str("multi\nline".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn temporal_literals() {
    assert_eq!(
        kinds("@2024-08-07 @2024-08-07-12:30 @2024-08-07-12:30:15 @today @now @3mo @1d"),
        vec![
            TokenKind::Date {
                year: 2024,
                month: 8,
                day: 7
            },
            TokenKind::DateTime {
                year: 2024,
                month: 8,
                day: 7,
                hour: 12,
                minute: 30,
                second: 0
            },
            TokenKind::DateTime {
                year: 2024,
                month: 8,
                day: 7,
                hour: 12,
                minute: 30,
                second: 15
            },
            TokenKind::Today,
            TokenKind::Now,
            TokenKind::Duration {
                amount: 3,
                unit: DurationUnit::Months
            },
            TokenKind::Duration {
                amount: 1,
                unit: DurationUnit::Days
            },
            TokenKind::Eof,
        ]
    );
}

#[test]
fn regex_literal() {
    assert_eq!(
        kinds(r"x ~ re/a\/b+/"),
        vec![
            TokenKind::Ident(StringInterner::new().intern("x")),
            TokenKind::Tilde,
            TokenKind::Regex("a/b+".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 // one\n/* two\n */ 2"),
        vec![TokenKind::Int(1), TokenKind::Int(2), TokenKind::Eof]
    );
}

#[test]
fn newline_flag_marks_line_starts() {
    let interner = StringInterner::new();
    let output = lex("a = 1\nb = 2", &interner);
    let flags: Vec<bool> = output.tokens.iter().map(|t| t.newline_before).collect();
    assert_eq!(flags, vec![false, false, false, true, false, false, false]);
}

#[test]
fn keywords_versus_identifiers() {
    let interner = StringInterner::new();
    let output = lex("if iffy", &interner);
    assert_eq!(output.tokens[0].kind, TokenKind::If);
    assert_eq!(output.tokens[1].kind, TokenKind::Ident(interner.intern("iffy")));
}

#[test]
fn compound_operators() {
    assert_eq!(
        kinds("+= ++ <= <> !~ != && ||"),
        vec![
            TokenKind::PlusAssign,
            TokenKind::PlusPlus,
            TokenKind::LtEq,
            TokenKind::LtGt,
            TokenKind::NotTilde,
            TokenKind::NotEq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn errors_are_collected_not_fatal() {
    let interner = StringInterner::new();
    let output = lex("1 $ 2 'open", &interner);
    assert_eq!(output.errors.len(), 2);
    assert_eq!(output.errors[0].message, "unexpected character `$`");
    assert!(output.tokens.iter().any(|t| t.kind == TokenKind::Int(2)));
}

#[test]
fn integer_overflow_is_reported() {
    let interner = StringInterner::new();
    let output = lex("99999999999999999999", &interner);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.tokens[0].kind, TokenKind::Error);
}

#[test]
fn unescape_unicode() {
    assert_eq!(convert::unescape(r"\u00e9x"), "\u{e9}x");
    assert_eq!(convert::unescape(r"\q"), "\\q");
}
