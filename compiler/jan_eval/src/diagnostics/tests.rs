use jan_values::EvalErrorKind;
use pretty_assertions::assert_eq;

use super::*;

fn frame(name: &str, line: u32) -> CallFrame {
    CallFrame {
        name: name.to_string(),
        call_site: Some(Location::new(line, 1)),
    }
}

#[test]
fn push_and_pop_track_depth() {
    let mut stack = CallStack::default();
    assert!(stack.is_empty());
    stack.push(frame("f", 1)).unwrap();
    stack.push(frame("g", 2)).unwrap();
    assert_eq!(stack.depth(), 2);
    assert_eq!(stack.current_frame().map(|f| f.name.as_str()), Some("g"));
    stack.pop();
    assert_eq!(stack.depth(), 1);
}

#[test]
fn depth_limit_rejects_the_extra_frame() {
    let mut stack = CallStack::new(Some(2));
    stack.push(frame("a", 1)).unwrap();
    stack.push(frame("b", 2)).unwrap();
    let err = stack.push(frame("c", 3)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::Internal);
    assert_eq!(err.message, "maximum recursion depth exceeded");
    assert_eq!(stack.depth(), 2);
}

#[test]
fn capture_lists_most_recent_first() {
    let mut stack = CallStack::default();
    stack.push(frame("outer", 1)).unwrap();
    stack.push(frame("inner", 4)).unwrap();
    let trace = stack.capture();
    let names: Vec<_> = trace.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["inner", "outer"]);
    assert_eq!(trace[0].to_string(), "inner (called at 4:1)");
}
