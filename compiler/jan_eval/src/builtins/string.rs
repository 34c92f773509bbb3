//! Methods of `string`.
//!
//! Positions and lengths count characters, not bytes.

use std::iter::Peekable;
use std::str::Chars;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use chrono::{NaiveDate, NaiveDateTime};
use jan_values::{
    index_out_of_bounds, invalid_argument, undefined_variable, CallArgs, DispatchTable, EvalError,
    EvalResult, PackedDate, PackedDateTime, Value,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::indexing::{element_index, slice_range};
use crate::limits::MAX_STRING_BYTES;

pub(super) fn install(table: &mut DispatchTable) {
    table
        .method("length", length)
        .method("trim", trim)
        .method("contains", contains)
        .method("containsIgnoreCase", contains_ignore_case)
        .method("splitLines", split_lines)
        .method("indexOf", index_of)
        .method("lastIndexOf", last_index_of)
        .method("empty", empty)
        .method("startsWith", starts_with)
        .method("endsWith", ends_with)
        .method("removeLeadingZeros", remove_leading_zeros)
        .method("substring", substring)
        .method("replaceAll", replace_all)
        .method("replace", replace)
        .method("replaceFirst", replace_first)
        .method("toUpperCase", to_upper_case)
        .method("toLowerCase", to_lower_case)
        .method("count", count)
        .method("format", format)
        .method("expand", expand)
        .method("int", to_int)
        .method("toInt", to_int)
        .method("toFloat", to_float)
        .method("get", get)
        .method("isNumeric", is_numeric)
        .method("startsWithNumbers", starts_with_numbers)
        .method("split", split)
        .method("toCamelCase", to_camel_case)
        .method("toConstantCase", to_constant_case)
        .method("encode", encode)
        .method("toBinaryUtf8", to_binary_utf8)
        .method("decodeBase64", decode_base64)
        .method("urlEncode", url_encode)
        .method("urlDecode", url_decode)
        .method("cutFilename", cut_filename)
        .method("parseDate", parse_date)
        .method("parseDateTime", parse_date_time);
}

fn text(receiver: &Value) -> &str {
    receiver.as_str().unwrap_or_default()
}

/// Character position of byte offset `byte` in `s`.
fn char_position(s: &str, byte: usize) -> i64 {
    i64::try_from(s[..byte].chars().count()).unwrap_or(i64::MAX)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn char_range(s: &str, range: std::ops::Range<usize>) -> String {
    s.chars().skip(range.start).take(range.len()).collect()
}

fn compile(function: &str, pattern: &str) -> Result<Regex, EvalError> {
    Regex::new(pattern).map_err(|err| invalid_argument(function, &format!("invalid pattern: {err}")))
}

/// Pattern argument: a regex value, or a string compiled as one.
fn pattern_arg(args: &CallArgs<'_>, index: usize) -> Result<Regex, EvalError> {
    match args.get(index)? {
        Value::Regex(re) => Ok((**re).clone()),
        _ => compile(args.function(), args.get_str(index)?),
    }
}

/// Split results drop trailing empty parts, unless nothing matched.
fn split_result(mut parts: Vec<&str>) -> Value {
    if parts.len() > 1 {
        while parts.last().is_some_and(|part| part.is_empty()) {
            parts.pop();
        }
    }
    Value::list(parts.into_iter().map(Value::string).collect())
}

fn length(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::int(i64::try_from(char_len(text(s))).unwrap_or(i64::MAX)))
}

fn trim(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::string(text(s).trim()))
}

fn contains(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    Ok(Value::bool(text(s).contains(args.get_str(0)?)))
}

fn contains_ignore_case(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let needle = args.get_str(0)?.to_lowercase();
    Ok(Value::bool(text(s).to_lowercase().contains(&needle)))
}

/// Lines split on `\n`, with a `\r` on either side of it removed.
fn split_lines(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let raw: Vec<&str> = text(s).split('\n').collect();
    let last = raw.len() - 1;
    let lines = raw
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line = if i > 0 { line.strip_prefix('\r').unwrap_or(line) } else { line };
            if i < last {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            }
        })
        .collect();
    Ok(split_result(lines))
}

fn index_of(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let s = text(s);
    let found = s.find(args.get_str(0)?).map_or(-1, |byte| char_position(s, byte));
    Ok(Value::int(found))
}

fn last_index_of(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let s = text(s);
    let found = s.rfind(args.get_str(0)?).map_or(-1, |byte| char_position(s, byte));
    Ok(Value::int(found))
}

fn empty(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::bool(text(s).is_empty()))
}

/// An empty prefix never matches.
fn starts_with(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let prefix = args.get_str(0)?;
    Ok(Value::bool(!prefix.is_empty() && text(s).starts_with(prefix)))
}

fn ends_with(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let suffix = args.get_str(0)?;
    Ok(Value::bool(!suffix.is_empty() && text(s).ends_with(suffix)))
}

fn remove_leading_zeros(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::string(text(s).trim_start_matches('0')))
}

fn substring(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(1, 2)?;
    let s = text(s);
    let len = char_len(s);
    let from = args.get_int(0)?;
    let to = args.get_optional_int(1)?;
    let in_bounds = |bound: i64| usize::try_from(bound).ok().filter(|b| *b <= len);
    let start = in_bounds(from).ok_or_else(|| index_out_of_bounds(from, len))?;
    let end = match to {
        Some(to) => in_bounds(to).ok_or_else(|| index_out_of_bounds(to, len))?,
        None => len,
    };
    if end < start {
        return Err(invalid_argument(args.function(), &format!("begin {start} is after end {end}")).into());
    }
    Ok(Value::string(char_range(s, start..end)))
}

fn replace_all(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(2)?;
    let re = pattern_arg(args, 0)?;
    let replacement = args.get_str(1)?;
    Ok(Value::string(re.replace_all(text(s), replacement).into_owned()))
}

/// Literal replacement of every occurrence.
fn replace(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(2)?;
    Ok(Value::string(text(s).replace(args.get_str(0)?, args.get_str(1)?)))
}

fn replace_first(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(2)?;
    let re = pattern_arg(args, 0)?;
    let replacement = args.get_str(1)?;
    Ok(Value::string(re.replace(text(s), replacement).into_owned()))
}

fn to_upper_case(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::string(text(s).to_uppercase()))
}

fn to_lower_case(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::string(text(s).to_lowercase()))
}

/// Non-overlapping occurrences; an empty needle counts zero.
fn count(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let needle = args.get_str(0)?;
    if needle.is_empty() {
        return Ok(Value::int(0));
    }
    let found = text(s).matches(needle).count();
    Ok(Value::int(i64::try_from(found).unwrap_or(i64::MAX)))
}

fn format(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    let formatted = printf(text(s), args.values()).map_err(|message| invalid_argument(args.function(), &message))?;
    Ok(Value::string(formatted))
}

/// `${name}` placeholders filled from a map argument or keyword arguments.
fn expand(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(0, 1)?;
    let map = match args.get_nullable(0) {
        Some(_) => Some(args.get_map(0)?),
        None => None,
    };
    let lookup = |name: &str| -> Option<Value> {
        if let Some(value) = args.kwarg(name) {
            return Some(value.clone());
        }
        map.and_then(|map| map.borrow().get(&Value::string(name)).cloned())
    };
    let template = text(s);
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = rest[start + 2..start + 2 + len].trim();
        let value = lookup(name).ok_or_else(|| undefined_variable(name))?;
        out.push_str(&value.to_string());
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);
    Ok(Value::string(out))
}

/// Blank strings read as zero.
fn to_int(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let raw = text(s);
    if raw.trim().is_empty() {
        return Ok(Value::int(0));
    }
    raw.parse::<i64>().map(Value::int).map_err(|err| {
        invalid_argument(args.function(), &format!("invalid value for toInt conversion: '{raw}': {err}")).into()
    })
}

fn to_float(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let raw = text(s);
    if raw.trim().is_empty() {
        return Ok(Value::float(0.0));
    }
    raw.trim().parse::<f64>().map(Value::float).map_err(|err| {
        invalid_argument(args.function(), &format!("invalid value for toFloat conversion: '{raw}': {err}")).into()
    })
}

/// `get(i)` is a character; `get(a, b)` a substring, reversed when `b`
/// comes before `a`. Null bounds mean the start and the end.
fn get(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(1, 2)?;
    let s = text(s);
    let len = char_len(s);
    if args.len() == 1 {
        let raw = args.get_int(0)?;
        let position = element_index(raw, len).ok_or_else(|| index_out_of_bounds(raw, len))?;
        return Ok(Value::string(char_range(s, position..position + 1)));
    }
    let from = args.get_optional_int(0)?;
    let to = args.get_optional_int(1)?;
    let (Some(from), Some(to)) = (from, to) else {
        return Ok(Value::string(char_range(s, slice_range(from, to, len))));
    };
    let start = slice_range(Some(from), None, len).start;
    let end = slice_range(Some(to), None, len).start;
    if end < start {
        let reversed: String = char_range(s, end..start).chars().rev().collect();
        return Ok(Value::string(reversed));
    }
    Ok(Value::string(char_range(s, start..end)))
}

fn is_numeric(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let s = text(s);
    Ok(Value::bool(!s.is_empty() && s.chars().all(|c| c.is_ascii_digit())))
}

fn starts_with_numbers(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::bool(text(s).starts_with(|c: char| c.is_ascii_digit())))
}

/// Split by a regex value, into characters on `""`, otherwise on the
/// literal separator.
fn split(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let s = text(s);
    match args.get(0)? {
        Value::Regex(re) => Ok(split_result(re.split(s).collect())),
        _ => {
            let separator = args.get_str(0)?;
            if separator.is_empty() {
                return Ok(Value::list(s.chars().map(|c| Value::string(c.to_string())).collect()));
            }
            Ok(split_result(s.split(separator).collect()))
        }
    }
}

/// Upper-cased words: anything but ASCII letters and digits separates.
fn words(s: &str) -> Vec<String> {
    s.to_uppercase()
        .split(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit()))
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}

fn to_constant_case(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let words = words(text(s));
    if words.is_empty() {
        return Ok(Value::Null);
    }
    let joined = words.join("_");
    if joined.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(Value::string(format!("_{joined}")));
    }
    Ok(Value::string(joined))
}

fn to_camel_case(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let words = words(text(s));
    if words.is_empty() {
        return Ok(Value::Null);
    }
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.push(first);
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    Ok(Value::string(out))
}

/// The UTF-8 bytes; no other charset is supported.
fn encode(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(0, 1)?;
    if let Some(charset) = args.get_optional_str(0)? {
        if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("utf8") {
            return Err(invalid_argument(args.function(), &format!("unsupported charset: {charset}")).into());
        }
    }
    Ok(Value::binary(text(s).as_bytes().to_vec()))
}

fn to_binary_utf8(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::binary(text(s).as_bytes().to_vec()))
}

fn decode_base64(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let bytes = BASE64_STANDARD
        .decode(text(s).trim())
        .map_err(|err| invalid_argument(args.function(), format!("invalid base64: {err}")))?;
    Ok(Value::binary(bytes))
}

/// Bytes left alone by form encoding, besides letters and digits.
const FORM_ENCODE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'-').remove(b'*').remove(b'_');

/// `application/x-www-form-urlencoded`: UTF-8 bytes, a space as `+`.
fn url_encode(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let encoded = utf8_percent_encode(text(s), FORM_ENCODE).to_string();
    Ok(Value::string(encoded.replace("%20", "+")))
}

/// Inverse of `urlEncode`; invalid UTF-8 decodes to U+FFFD.
fn url_decode(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let spaced = text(s).replace('+', " ");
    Ok(Value::string(percent_decode_str(&spaced).decode_utf8_lossy()))
}

/// The file name part of a path, shortened to `max` characters. A
/// shortened name keeps its extension.
fn cut_filename(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let raw = args.get_int(0)?;
    let max = usize::try_from(raw)
        .map_err(|_| invalid_argument(args.function(), format!("negative length: {raw}")))?;
    Ok(Value::string(shorten_filename(text(s), max)))
}

fn shorten_filename(path: &str, max: usize) -> String {
    let path = path.trim();
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if char_len(name) <= max {
        return name.to_owned();
    }
    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
            let keep = max.saturating_sub(char_len(extension) + 1);
            format!("{}.{}", char_range(stem, 0..keep).trim(), extension.trim())
        }
        _ => char_range(name, 0..max).trim().to_owned(),
    }
}

/// Parse with a strftime pattern; a blank string is null.
fn parse_date(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let raw = text(s).trim();
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    let date = NaiveDate::parse_from_str(raw, args.get_str(0)?)
        .map_err(|err| invalid_argument(args.function(), &format!("cannot parse '{raw}': {err}")))?;
    Ok(Value::date(PackedDate::from_naive(date)))
}

fn parse_date_time(s: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let raw = text(s).trim();
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    let dt = NaiveDateTime::parse_from_str(raw, args.get_str(0)?)
        .map_err(|err| invalid_argument(args.function(), &format!("cannot parse '{raw}': {err}")))?;
    Ok(Value::datetime(PackedDateTime::from_naive(dt)))
}

/// One `%` conversion of a format string.
#[derive(Default)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    width: usize,
    precision: Option<usize>,
}

impl Spec {
    fn pad(&self, body: String) -> String {
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }
        let fill = self.width - len;
        if self.left {
            format!("{body}{}", " ".repeat(fill))
        } else if self.zero {
            match body.strip_prefix('-') {
                Some(digits) => format!("-{}{digits}", "0".repeat(fill)),
                None => format!("{}{body}", "0".repeat(fill)),
            }
        } else {
            format!("{}{body}", " ".repeat(fill))
        }
    }

    fn signed(&self, body: String) -> String {
        if self.plus && !body.starts_with('-') {
            format!("+{body}")
        } else {
            body
        }
    }
}

/// A run of decimal digits in a conversion, at most [`MAX_STRING_BYTES`].
fn read_count(chars: &mut Peekable<Chars<'_>>, what: &str) -> Result<usize, String> {
    let mut count: usize = 0;
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        count = count
            .checked_mul(10)
            .and_then(|count| count.checked_add(digit.to_digit(10).map_or(0, |d| d as usize)))
            .filter(|count| *count <= MAX_STRING_BYTES)
            .ok_or_else(|| format!("{what} exceeds {MAX_STRING_BYTES}"))?;
    }
    Ok(count)
}

/// `printf`-style formatting: `%s %d %f %x %X %%` and `%n`, with the
/// flags `-`, `0` and `+`, a width and a precision.
fn printf(pattern: &str, args: &[Value]) -> Result<String, String> {
    let mut out = String::with_capacity(pattern.len());
    let mut args = args.iter();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut spec = Spec::default();
        while let Some(flag) = chars.next_if(|c| matches!(c, '-' | '0' | '+')) {
            match flag {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                _ => spec.plus = true,
            }
        }
        spec.width = read_count(&mut chars, "width")?;
        if chars.next_if_eq(&'.').is_some() {
            spec.precision = Some(read_count(&mut chars, "precision")?);
        }
        let conversion = chars.next().ok_or("format string ends inside a conversion")?;
        let mut next_arg = || args.next().ok_or_else(|| format!("missing argument for '%{conversion}'"));
        let body = match conversion {
            '%' => "%".to_owned(),
            'n' => "\n".to_owned(),
            's' | 'S' => {
                let text = next_arg()?.to_string();
                let text = match spec.precision {
                    Some(max) => text.chars().take(max).collect(),
                    None => text,
                };
                if conversion == 'S' {
                    text.to_uppercase()
                } else {
                    text
                }
            }
            'd' => {
                let arg = next_arg()?;
                let n = arg.as_int().ok_or_else(|| format!("%d needs an int, got {}", arg.class_name()))?;
                spec.signed(n.to_string())
            }
            'x' | 'X' => {
                let arg = next_arg()?;
                let n = arg.as_int().ok_or_else(|| format!("%x needs an int, got {}", arg.class_name()))?;
                if conversion == 'x' {
                    format!("{n:x}")
                } else {
                    format!("{n:X}")
                }
            }
            'f' => {
                let arg = next_arg()?;
                let f = arg.as_f64().ok_or_else(|| format!("%f needs a number, got {}", arg.class_name()))?;
                spec.signed(format!("{f:.*}", spec.precision.unwrap_or(6)))
            }
            other => return Err(format!("unknown conversion '%{other}'")),
        };
        out.push_str(&spec.pad(body));
        if out.len() > MAX_STRING_BYTES {
            return Err(format!("result exceeds {MAX_STRING_BYTES} bytes"));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn printf_conversions() {
        let args = [Value::string("abc"), Value::int(42), Value::float(1.5)];
        assert_eq!(printf("%s-%d-%.2f", &args).as_deref(), Ok("abc-42-1.50"));
        assert_eq!(printf("[%5s|%-5s]", &[Value::string("ab"), Value::string("cd")]).as_deref(), Ok("[   ab|cd   ]"));
        assert_eq!(printf("%05d", &[Value::int(-42)]).as_deref(), Ok("-0042"));
        assert_eq!(printf("%+d%%", &[Value::int(7)]).as_deref(), Ok("+7%"));
        assert_eq!(printf("%x", &[Value::int(255)]).as_deref(), Ok("ff"));
    }

    #[test]
    fn printf_failures() {
        assert!(printf("%d", &[]).is_err());
        assert!(printf("%d", &[Value::string("x")]).is_err());
        assert!(printf("%q", &[Value::int(1)]).is_err());
        assert!(printf("100%", &[]).is_err());
    }

    #[test]
    fn filenames_keep_their_extension() {
        assert_eq!(shorten_filename(" /tmp/report.pdf ", 20), "report.pdf");
        assert_eq!(shorten_filename("C:\\docs\\annual report.pdf", 10), "annual.pdf");
        assert_eq!(shorten_filename("archive.tar.gz", 8), "archi.gz");
        assert_eq!(shorten_filename("README", 3), "REA");
        assert_eq!(shorten_filename(".profile", 4), ".pro");
    }

    #[test]
    fn printf_bounds_width_and_precision() {
        let arg = [Value::int(1)];
        assert_eq!(
            printf("%99999999999999999999999d", &arg).err().as_deref(),
            Some("width exceeds 16777216")
        );
        assert_eq!(
            printf("%.99999999999999999999999f", &[Value::float(1.0)]).err().as_deref(),
            Some("precision exceeds 16777216")
        );
        assert!(printf("%16777217d", &arg).is_err());
        assert_eq!(printf("%16777216d", &arg).map(|out| out.len()), Ok(1 << 24));
        assert!(printf("%016777216d", &arg).is_ok());
        assert!(printf("%16777216d%d", &[Value::int(1), Value::int(2)]).is_err());
    }

    #[test]
    fn words_split_on_anything_but_letters_and_digits() {
        assert_eq!(words("hello world-again"), vec!["HELLO", "WORLD", "AGAIN"]);
        assert_eq!(words("__x__1"), vec!["X", "1"]);
        assert!(words("  ").is_empty());
    }

    #[test]
    fn split_drops_trailing_empty_parts() {
        let parts = split_result(vec!["a", "b", "", ""]);
        assert_eq!(parts, Value::list(vec![Value::string("a"), Value::string("b")]));
        let lone = split_result(vec![""]);
        assert_eq!(lone, Value::list(vec![Value::string("")]));
    }
}
