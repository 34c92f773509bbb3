//! Converts raw logos tokens to [`TokenKind`], decoding literals and
//! interning identifiers.

use jan_ir::{DurationUnit, StringInterner};

use crate::raw_token::RawToken;
use crate::TokenKind;

/// Convert one raw token. Literal decoding failures are returned as messages.
pub(crate) fn convert(
    raw: RawToken,
    slice: &str,
    interner: &StringInterner,
) -> Result<TokenKind, String> {
    let kind = match raw {
        RawToken::Newline => return Err("unexpected line break".to_owned()),
        RawToken::If => TokenKind::If,
        RawToken::Then => TokenKind::Then,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::From => TokenKind::From,
        RawToken::To => TokenKind::To,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Return => TokenKind::Return,
        RawToken::Throw => TokenKind::Throw,
        RawToken::Try => TokenKind::Try,
        RawToken::Catch => TokenKind::Catch,
        RawToken::Finally => TokenKind::Finally,
        RawToken::Function => TokenKind::Function,
        RawToken::Import => TokenKind::Import,
        RawToken::As => TokenKind::As,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,

        RawToken::Int => TokenKind::Int(parse_int(slice)?),
        RawToken::Float => TokenKind::Float(parse_float(slice)?),
        RawToken::DoubleString | RawToken::SingleString => {
            TokenKind::Str(unescape(&slice[1..slice.len() - 1]).into())
        }
        RawToken::TripleString => TokenKind::Str(unescape(&slice[3..slice.len() - 3]).into()),
        RawToken::Date => {
            let (year, month, day) = parse_date(&slice[1..11])?;
            TokenKind::Date { year, month, day }
        }
        RawToken::DateTime => {
            let (year, month, day) = parse_date(&slice[1..11])?;
            let (hour, minute, second) = parse_time(&slice[12..])?;
            TokenKind::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
            }
        }
        RawToken::Today => TokenKind::Today,
        RawToken::Now => TokenKind::Now,
        RawToken::Duration => {
            let body = &slice[1..];
            let split = body
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(body.len());
            let amount = parse_int(&body[..split])?;
            let unit = DurationUnit::from_tag(&body[split..])
                .ok_or_else(|| format!("unknown duration unit `{}`", &body[split..]))?;
            TokenKind::Duration { amount, unit }
        }
        RawToken::Regex => TokenKind::Regex(slice[3..slice.len() - 1].replace("\\/", "/").into()),
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Question => TokenKind::Question,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Assign => TokenKind::Assign,
        RawToken::PlusAssign => TokenKind::PlusAssign,
        RawToken::MinusAssign => TokenKind::MinusAssign,
        RawToken::StarAssign => TokenKind::StarAssign,
        RawToken::SlashAssign => TokenKind::SlashAssign,
        RawToken::PercentAssign => TokenKind::PercentAssign,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::StarStar => TokenKind::StarStar,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtGt => TokenKind::LtGt,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::NotTilde => TokenKind::NotTilde,
        RawToken::Bang => TokenKind::Bang,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
    };
    Ok(kind)
}

fn parse_int(slice: &str) -> Result<i64, String> {
    let digits: String = slice.chars().filter(|c| *c != '_').collect();
    digits
        .parse()
        .map_err(|_| format!("integer literal `{slice}` is out of range"))
}

fn parse_float(slice: &str) -> Result<f64, String> {
    let digits: String = slice.chars().filter(|c| *c != '_').collect();
    digits
        .parse()
        .map_err(|_| format!("invalid float literal `{slice}`"))
}

/// `yyyy-MM-dd`; only the field ranges are checked here, calendar validity
/// (e.g. February 30th) is checked when the script is compiled.
fn parse_date(text: &str) -> Result<(i32, u32, u32), String> {
    let field = |range: std::ops::Range<usize>| -> Result<u32, String> {
        text.get(range)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| format!("invalid date literal `@{text}`"))
    };
    let year = i32::try_from(field(0..4)?).map_err(|_| format!("invalid year in `@{text}`"))?;
    let month = field(5..7)?;
    let day = field(8..10)?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(format!("invalid date literal `@{text}`"));
    }
    Ok((year, month, day))
}

/// `HH:mm` or `HH:mm:ss`.
fn parse_time(text: &str) -> Result<(u32, u32, u32), String> {
    let mut parts = text.split(':').map(str::parse::<u32>);
    let mut next = || parts.next().transpose().map_err(|_| format!("invalid time `{text}`"));
    let hour = next()?.unwrap_or(0);
    let minute = next()?.unwrap_or(0);
    let second = next()?.unwrap_or(0);
    if hour > 23 || minute > 59 || second > 59 {
        return Err(format!("invalid time `{text}`"));
    }
    Ok((hour, minute, second))
}

/// Decode backslash escapes. Unknown escapes are kept verbatim.
pub(crate) fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    _ => out.push_str("\\u"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
