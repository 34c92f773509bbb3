use super::*;
use pretty_assertions::assert_eq;

#[test]
fn undefined_variable_is_a_name_error() {
    let err = undefined_variable("x");
    assert_eq!(err.kind, EvalErrorKind::Name);
    assert_eq!(err.message, "name 'x' is not defined");
}

#[test]
fn arity_messages() {
    assert_eq!(
        wrong_arg_count("len", 1, Some(1), 2).message,
        "len() expects 1 argument, got 2"
    );
    assert_eq!(
        wrong_arg_count("substring", 1, Some(2), 0).message,
        "substring() expects 1 to 2 arguments, got 0"
    );
    assert_eq!(
        wrong_arg_count("f", 2, None, 1).message,
        "f() expects at least 2 arguments, got 1"
    );
}

#[test]
fn wrong_arg_type_is_one_based() {
    let err = wrong_arg_type("indexOf", 0, "string", "int");
    assert_eq!(err.kind, EvalErrorKind::Argument);
    assert_eq!(err.message, "indexOf() argument 1 must be string, not int");
}

#[test]
fn assertion_messages() {
    assert_eq!(assertion_failed(None).message, "assertion failed!");
    assert_eq!(
        assertion_failed(Some("x is positive")).message,
        "assertion failed: x is positive"
    );
}

#[test]
fn budget_message_names_both_numbers() {
    let err = call_budget_exceeded(11, 10);
    assert_eq!(err.kind, EvalErrorKind::Internal);
    assert_eq!(err.message, "call budget exceeded: 11 calls (budget 10)");
}

#[test]
fn display_includes_location_when_known() {
    let err = division_by_zero();
    assert_eq!(err.to_string(), "arithmetic error: division by zero");
    let err = err.with_location(Location::new(3, 7));
    assert_eq!(err.to_string(), "arithmetic error at 3:7: division by zero");
}

#[test]
fn location_is_only_filled_once() {
    let err = division_by_zero()
        .with_location_if_missing(Some(Location::new(1, 1)))
        .with_location_if_missing(Some(Location::new(9, 9)));
    assert_eq!(err.location, Some(Location::new(1, 1)));
}

#[test]
fn control_action_from_error() {
    let action: ControlAction = division_by_zero().into();
    assert!(action.is_error());
    assert_eq!(action.into_eval_error().kind, EvalErrorKind::Arithmetic);
}

#[test]
fn signals_are_not_errors() {
    assert!(!ControlAction::Break.is_error());
    assert!(!ControlAction::Return(Value::Null).is_error());
    assert!(!ControlAction::Throw(Value::int(1)).is_error());
}

#[test]
fn escaped_loop_signal_is_internal() {
    let err = ControlAction::Continue.into_eval_error();
    assert_eq!(err.kind, EvalErrorKind::Internal);
    assert!(err.message.contains("continue"));
}

#[test]
fn escaped_throw_keeps_the_value_text() {
    let err = ControlAction::Throw(Value::string("boom")).into_eval_error();
    assert_eq!(err.kind, EvalErrorKind::Thrown);
    assert_eq!(err.message, "boom");
}

#[test]
fn signals_ignore_location_stamping() {
    let action = ControlAction::Break.with_location_if_missing(Some(Location::new(2, 2)));
    assert!(matches!(action, ControlAction::Break));
    let action: ControlAction = undefined_variable("y").into();
    match action.with_location_if_missing(Some(Location::new(2, 2))) {
        ControlAction::Error(err) => assert_eq!(err.location, Some(Location::new(2, 2))),
        other => panic!("expected error, got {other:?}"),
    }
}
