//! Pattern matching: `~` and `!~`, plus the per-process regex cache.

use std::sync::Arc;

use jan_ir::BinaryOp;
use jan_values::{binary_type_mismatch, invalid_argument, EvalError, Value};
use regex::Regex;
use rustc_hash::FxHashMap;

/// Regexes compiled during one run.
///
/// Regex literals compile once per process no matter how often the
/// expression is evaluated. `~` needs a whole-string match, which the
/// `regex` crate expresses as an anchored copy of the pattern; those copies
/// are cached here as well.
#[derive(Default)]
pub struct RegexCache {
    literals: FxHashMap<Arc<str>, Value>,
    anchored: FxHashMap<Box<str>, Regex>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of a regex literal.
    pub fn literal(&mut self, pattern: &Arc<str>) -> Result<Value, EvalError> {
        if let Some(value) = self.literals.get(pattern) {
            return Ok(value.clone());
        }
        let regex = Regex::new(pattern).map_err(|err| invalid_argument("re", err))?;
        let value = Value::regex(regex);
        self.literals.insert(Arc::clone(pattern), value.clone());
        Ok(value)
    }

    /// Whether `left` matches `right`.
    ///
    /// A string on the right is a glob, a regex must match the whole
    /// string. Null on either side never matches.
    pub fn pattern_match(&mut self, left: &Value, right: &Value, op: BinaryOp) -> Result<bool, EvalError> {
        match (left, right) {
            (Value::Null, _) | (_, Value::Null) => Ok(false),
            (Value::Str(subject), Value::Str(pattern)) => Ok(pattern.glob_matches(subject.as_str())),
            (Value::Str(subject), Value::Regex(regex)) => self.full_match(regex, subject.as_str()),
            _ => Err(binary_type_mismatch(op.as_symbol(), left.class_name(), right.class_name())),
        }
    }

    fn full_match(&mut self, regex: &Regex, subject: &str) -> Result<bool, EvalError> {
        // Leftmost-first semantics may stop short of a longer whole-string
        // match, so only a hit spanning everything is conclusive.
        if regex
            .find(subject)
            .is_some_and(|m| m.start() == 0 && m.end() == subject.len())
        {
            return Ok(true);
        }
        let pattern = regex.as_str();
        if let Some(anchored) = self.anchored.get(pattern) {
            return Ok(anchored.is_match(subject));
        }
        let anchored = Regex::new(&format!("^(?:{pattern})$")).map_err(|err| invalid_argument("~", err))?;
        let matched = anchored.is_match(subject);
        self.anchored.insert(pattern.into(), anchored);
        Ok(matched)
    }

    #[cfg(test)]
    pub(crate) fn anchored_len(&self) -> usize {
        self.anchored.len()
    }
}
