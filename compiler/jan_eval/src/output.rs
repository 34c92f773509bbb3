//! Where a script's `print` lines and warnings go.
//!
//! A [`Runtime`](crate::Runtime) owns one [`ScriptOutput`] and hands it to
//! every process it starts. `print(...)` writes a line through
//! [`ScriptOutput::print`]; runtime warnings (such as a script assigning to
//! a builtin name) go through [`ScriptOutput::warn`] after being logged with
//! `tracing`.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

type Hook = Box<dyn Fn(&str) + Send + Sync>;

/// The print and warn hooks of a runtime.
pub enum ScriptOutput {
    /// Lines to stdout. Warnings are left to the `tracing` subscriber.
    Stdout,
    /// Lines and warnings kept in memory, for tests and hosts with their
    /// own UI.
    Capture(Transcript),
    /// Host callbacks.
    Hooks { print: Hook, warn: Hook },
    /// Discards everything.
    Silent,
}

/// Printed lines and warnings of every run, in arrival order.
#[derive(Default)]
pub struct Transcript {
    printed: Mutex<String>,
    warnings: Mutex<Vec<String>>,
}

impl ScriptOutput {
    pub fn print(&self, line: &str) {
        match self {
            ScriptOutput::Stdout => println!("{line}"),
            ScriptOutput::Capture(transcript) => {
                let mut printed = transcript.printed.lock();
                printed.push_str(line);
                printed.push('\n');
            }
            ScriptOutput::Hooks { print, .. } => print(line),
            ScriptOutput::Silent => {}
        }
    }

    pub fn warn(&self, message: &str) {
        match self {
            ScriptOutput::Capture(transcript) => transcript.warnings.lock().push(message.to_owned()),
            ScriptOutput::Hooks { warn, .. } => warn(message),
            ScriptOutput::Stdout | ScriptOutput::Silent => {}
        }
    }

    /// Everything printed so far; empty unless capturing.
    pub fn printed(&self) -> String {
        match self {
            ScriptOutput::Capture(transcript) => transcript.printed.lock().clone(),
            _ => String::new(),
        }
    }

    /// Warnings so far; empty unless capturing.
    pub fn warnings(&self) -> Vec<String> {
        match self {
            ScriptOutput::Capture(transcript) => transcript.warnings.lock().clone(),
            _ => Vec::new(),
        }
    }

    pub fn clear(&self) {
        if let ScriptOutput::Capture(transcript) = self {
            transcript.printed.lock().clear();
            transcript.warnings.lock().clear();
        }
    }
}

impl fmt::Debug for ScriptOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScriptOutput::Stdout => "Stdout",
            ScriptOutput::Capture(_) => "Capture",
            ScriptOutput::Hooks { .. } => "Hooks",
            ScriptOutput::Silent => "Silent",
        })
    }
}

pub type SharedOutput = Arc<ScriptOutput>;

pub fn stdout_output() -> SharedOutput {
    Arc::new(ScriptOutput::Stdout)
}

pub fn capture_output() -> SharedOutput {
    Arc::new(ScriptOutput::Capture(Transcript::default()))
}

pub fn silent_output() -> SharedOutput {
    Arc::new(ScriptOutput::Silent)
}

/// Route lines and warnings to host callbacks.
pub fn hook_output(
    print: impl Fn(&str) + Send + Sync + 'static,
    warn: impl Fn(&str) + Send + Sync + 'static,
) -> SharedOutput {
    Arc::new(ScriptOutput::Hooks {
        print: Box::new(print),
        warn: Box::new(warn),
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn capture_keeps_lines_and_warnings_apart() {
        let output = capture_output();
        output.print("hello");
        output.warn("careful");
        output.print("world");
        assert_eq!(output.printed(), "hello\nworld\n");
        assert_eq!(output.warnings(), vec!["careful".to_owned()]);
        output.clear();
        assert_eq!((output.printed(), output.warnings()), (String::new(), Vec::new()));
    }

    #[test]
    fn hooks_receive_both_streams() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (on_print, on_warn) = (Arc::clone(&seen), Arc::clone(&seen));
        let output = hook_output(
            move |line| on_print.lock().push(format!("print {line}")),
            move |message| on_warn.lock().push(format!("warn {message}")),
        );
        output.print("a");
        output.warn("b");
        assert_eq!(*seen.lock(), vec!["print a".to_owned(), "warn b".to_owned()]);
        assert_eq!(output.printed(), "");
    }

    #[test]
    fn silent_discards_everything() {
        let output = silent_output();
        output.print("hello");
        output.warn("careful");
        assert_eq!(output.printed(), "");
        assert!(output.warnings().is_empty());
    }

    #[test]
    fn capture_is_shared_across_threads() {
        let output = capture_output();
        let other = Arc::clone(&output);
        let worker = std::thread::spawn(move || {
            for _ in 0..50 {
                other.print("a");
            }
        });
        for _ in 0..50 {
            output.print("b");
        }
        worker.join().unwrap();
        assert_eq!(output.printed().lines().count(), 100);
    }
}
