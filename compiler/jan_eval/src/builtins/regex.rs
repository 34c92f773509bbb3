//! Methods of `regex`, and the `matcher` objects it hands out.
//!
//! `extract` and `extractAll` yield the first capture group, or the whole
//! match for a pattern without groups.

use std::any::Any;
use std::cell::RefCell;

use jan_values::{invalid_argument, CallArgs, DispatchTable, EvalError, EvalResult, HostObject, Value};
use regex::{Captures, Regex};

pub(super) const MATCHER_CLASS: &str = "matcher";

pub(super) fn install(table: &mut DispatchTable) {
    table
        .method("extract", extract)
        .method("extractAll", extract_all)
        .method("replaceAll", replace_all)
        .method("replaceFirst", replace_first)
        .method("split", split)
        .method("matcher", matcher);
}

pub(super) fn install_matcher(table: &mut DispatchTable) {
    table
        .method("find", find)
        .method("matches", matches)
        .method("group", group)
        .method("start", start)
        .method("end", end);
}

fn pattern(receiver: &Value) -> Option<&Regex> {
    match receiver {
        Value::Regex(re) => Some(&**re),
        _ => None,
    }
}

fn extracted(captures: &Captures<'_>) -> Value {
    captures
        .get(1)
        .or_else(|| captures.get(0))
        .map_or(Value::Null, |m| Value::string(m.as_str()))
}

fn extract(re: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let subject = args.get_str(0)?;
    Ok(pattern(re)
        .and_then(|re| re.captures(subject))
        .map_or(Value::Null, |captures| extracted(&captures)))
}

fn extract_all(re: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let subject = args.get_str(0)?;
    let found = pattern(re)
        .map(|re| re.captures_iter(subject).map(|captures| extracted(&captures)).collect())
        .unwrap_or_default();
    Ok(Value::list(found))
}

fn replace_all(re: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(2)?;
    let subject = args.get_str(0)?;
    let replacement = args.get_str(1)?;
    Ok(Value::string(match pattern(re) {
        Some(re) => re.replace_all(subject, replacement).into_owned(),
        None => subject.to_owned(),
    }))
}

fn replace_first(re: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(2)?;
    let subject = args.get_str(0)?;
    let replacement = args.get_str(1)?;
    Ok(Value::string(match pattern(re) {
        Some(re) => re.replace(subject, replacement).into_owned(),
        None => subject.to_owned(),
    }))
}

/// Trailing empty parts are dropped.
fn split(re: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let subject = args.get_str(0)?;
    let mut parts: Vec<&str> = match pattern(re) {
        Some(re) => re.split(subject).collect(),
        None => vec![subject],
    };
    if parts.len() > 1 {
        while parts.last().is_some_and(|part| part.is_empty()) {
            parts.pop();
        }
    }
    Ok(Value::list(parts.into_iter().map(Value::string).collect()))
}

/// A pattern applied to one subject. `find()` steps through the matches
/// and `matches()` tests the whole subject; `group`, `start` and `end`
/// read whichever matched last.
#[derive(Debug)]
struct Matcher {
    pattern: Regex,
    subject: String,
    state: RefCell<MatchState>,
}

#[derive(Debug, Default)]
struct MatchState {
    /// Byte offset the next `find()` searches from; `None` once exhausted.
    next: Option<usize>,
    /// Byte spans of the groups of the current match, empty without one.
    groups: Vec<Option<(usize, usize)>>,
}

impl HostObject for Matcher {
    fn class_name(&self) -> &str {
        MATCHER_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Matcher {
    fn record(&self, captures: Option<&Captures<'_>>) -> bool {
        let mut state = self.state.borrow_mut();
        state.groups = captures
            .map(|captures| captures.iter().map(|m| m.map(|m| (m.start(), m.end()))).collect())
            .unwrap_or_default();
        !state.groups.is_empty()
    }

    /// Byte span of the group named by the optional argument: a number,
    /// a group name, or the whole match when absent.
    fn span(&self, args: &CallArgs<'_>) -> Result<Option<(usize, usize)>, EvalError> {
        let state = self.state.borrow();
        if state.groups.is_empty() {
            return Err(invalid_argument(args.function(), "no match available"));
        }
        let index = match args.get_nullable(0) {
            None | Some(Value::Null) => 0,
            Some(Value::Str(name)) => self
                .pattern
                .capture_names()
                .position(|group| group == Some(name.as_str()))
                .ok_or_else(|| invalid_argument(args.function(), format!("no group named '{}'", name.as_str())))?,
            Some(_) => {
                let raw = args.get_int(0)?;
                usize::try_from(raw)
                    .ok()
                    .filter(|index| *index < state.groups.len())
                    .ok_or_else(|| invalid_argument(args.function(), format!("no group {raw}")))?
            }
        };
        Ok(state.groups[index])
    }

    /// Character position of byte offset `byte` in the subject.
    fn position(&self, byte: usize) -> Value {
        Value::int(i64::try_from(self.subject[..byte].chars().count()).unwrap_or(i64::MAX))
    }
}

/// `re.matcher(s)`: a matcher over `s` with no current match.
fn matcher(re: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    let subject = args.get_str(0)?;
    let Some(pattern) = pattern(re) else {
        return Ok(Value::Null);
    };
    Ok(Value::object(Matcher {
        pattern: pattern.clone(),
        subject: subject.to_owned(),
        state: RefCell::new(MatchState {
            next: Some(0),
            groups: Vec::new(),
        }),
    }))
}

fn matcher_of(receiver: &Value) -> Option<&Matcher> {
    receiver.downcast_object::<Matcher>()
}

/// Advance to the next match; false once there is none.
fn find(receiver: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let Some(m) = matcher_of(receiver) else {
        return Ok(Value::bool(false));
    };
    let from = m.state.borrow().next;
    let captures = from.and_then(|from| m.pattern.captures_at(&m.subject, from));
    let found = m.record(captures.as_ref());
    m.state.borrow_mut().next = captures.and_then(|captures| {
        let whole = captures.get(0)?;
        if !whole.is_empty() {
            return Some(whole.end());
        }
        // An empty match moves on by one character.
        let step = m.subject[whole.end()..].chars().next().map(char::len_utf8)?;
        Some(whole.end() + step)
    });
    Ok(Value::bool(found))
}

/// Whether the pattern matches the whole subject; the match becomes current.
fn matches(receiver: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let Some(m) = matcher_of(receiver) else {
        return Ok(Value::bool(false));
    };
    let anchored = Regex::new(&format!("^(?:{})$", m.pattern.as_str()))
        .map_err(|err| invalid_argument(args.function(), format!("invalid pattern: {err}")))?;
    let captures = anchored.captures(&m.subject);
    Ok(Value::bool(m.record(captures.as_ref())))
}

/// Text of a group of the current match; null for a group that did not take part.
fn group(receiver: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(0, 1)?;
    let Some(m) = matcher_of(receiver) else {
        return Ok(Value::Null);
    };
    Ok(m.span(args)?
        .map_or(Value::Null, |(from, to)| Value::string(&m.subject[from..to])))
}

fn start(receiver: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(0, 1)?;
    let Some(m) = matcher_of(receiver) else {
        return Ok(Value::Null);
    };
    Ok(m.span(args)?.map_or(Value::int(-1), |(from, _)| m.position(from)))
}

fn end(receiver: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(0, 1)?;
    let Some(m) = matcher_of(receiver) else {
        return Ok(Value::Null);
    };
    Ok(m.span(args)?.map_or(Value::int(-1), |(_, to)| m.position(to)))
}
