//! String payload with a lazily compiled glob matcher.

use std::cell::OnceCell;
use std::fmt;

use regex::Regex;

/// Text of a string value.
///
/// When a string is used as the right side of `~`, it is read as a glob
/// (`*` matches any run of characters, everything else is literal, case is
/// ignored) and the compiled matcher is cached on this instance. A pattern
/// held in a variable and matched in a loop therefore compiles once.
pub struct ScriptString {
    text: Box<str>,
    glob: OnceCell<Option<Regex>>,
}

impl ScriptString {
    pub fn new(text: impl Into<Box<str>>) -> Self {
        ScriptString {
            text: text.into(),
            glob: OnceCell::new(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether `subject` matches this string read as a glob pattern.
    pub fn glob_matches(&self, subject: &str) -> bool {
        match self.glob.get_or_init(|| compile_glob(&self.text)) {
            Some(matcher) => matcher.is_match(subject),
            None => false,
        }
    }

    #[cfg(test)]
    fn has_cached_glob(&self) -> bool {
        self.glob.get().is_some()
    }
}

fn compile_glob(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    match Regex::new(&format!("(?is)^{body}$")) {
        Ok(matcher) => Some(matcher),
        Err(err) => {
            tracing::warn!(pattern, %err, "glob pattern does not compile");
            None
        }
    }
}

impl fmt::Debug for ScriptString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.text, f)
    }
}

impl fmt::Display for ScriptString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_is_a_full_case_insensitive_match() {
        let pattern = ScriptString::new("a*c");
        assert!(pattern.glob_matches("abc"));
        assert!(pattern.glob_matches("ABBBC"));
        assert!(pattern.glob_matches("ac"));
        assert!(!pattern.glob_matches("abcd"));
    }

    #[test]
    fn glob_needs_the_literal_parts() {
        assert!(!ScriptString::new("*d*").glob_matches("abc"));
        assert!(ScriptString::new("*d*").glob_matches("d"));
    }

    #[test]
    fn glob_allows_several_wildcards() {
        let pattern = ScriptString::new("hallo*welt");
        assert!(pattern.glob_matches("Hallo, schöne neue Welt"));
        assert!(ScriptString::new("*a*b*").glob_matches("xxaYYbzz"));
    }

    #[test]
    fn glob_treats_regex_syntax_literally() {
        let pattern = ScriptString::new("a.c(1)");
        assert!(pattern.glob_matches("A.C(1)"));
        assert!(!pattern.glob_matches("abc(1)"));
    }

    #[test]
    fn glob_spans_lines() {
        assert!(ScriptString::new("first*last").glob_matches("first\nmiddle\nlast"));
    }

    #[test]
    fn matcher_is_cached_after_first_use() {
        let pattern = ScriptString::new("x*");
        assert!(!pattern.has_cached_glob());
        assert!(pattern.glob_matches("xyz"));
        assert!(pattern.has_cached_glob());
    }
}
