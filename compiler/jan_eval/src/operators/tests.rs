use jan_ir::{BinaryOp, DurationUnit, IncDecOp, UnaryOp};
use jan_values::{ComparisonResult, EvalErrorKind, PackedDate, PackedDateTime, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use regex::Regex;

use super::*;

fn binary(left: &Value, op: BinaryOp, right: &Value) -> OpResult {
    evaluate_binary(left, right, op, &mut RegexCache::new())
}

fn ok(left: &Value, op: BinaryOp, right: &Value) -> Value {
    binary(left, op, right).unwrap()
}

fn err_kind(left: &Value, op: BinaryOp, right: &Value) -> EvalErrorKind {
    binary(left, op, right).unwrap_err().kind
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::date(PackedDate::new(y, m, d).unwrap())
}

fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Value {
    Value::datetime(PackedDateTime::new(y, mo, d, h, mi, s).unwrap())
}

#[test]
fn int_arithmetic() {
    assert_eq!(ok(&Value::int(7), BinaryOp::Add, &Value::int(3)), Value::int(10));
    assert_eq!(ok(&Value::int(7), BinaryOp::Sub, &Value::int(10)), Value::int(-3));
    assert_eq!(ok(&Value::int(7), BinaryOp::Div, &Value::int(2)), Value::int(3));
    assert_eq!(ok(&Value::int(-7), BinaryOp::Div, &Value::int(2)), Value::int(-3));
    assert_eq!(ok(&Value::int(7), BinaryOp::Mod, &Value::int(3)), Value::int(1));
}

#[test]
fn int_overflow_and_zero_division_are_arithmetic_errors() {
    assert_eq!(err_kind(&Value::int(i64::MAX), BinaryOp::Add, &Value::int(1)), EvalErrorKind::Arithmetic);
    assert_eq!(err_kind(&Value::int(1), BinaryOp::Div, &Value::int(0)), EvalErrorKind::Arithmetic);
    assert_eq!(err_kind(&Value::int(1), BinaryOp::Mod, &Value::int(0)), EvalErrorKind::Arithmetic);
    assert_eq!(err_kind(&Value::float(1.0), BinaryOp::Div, &Value::int(0)), EvalErrorKind::Arithmetic);
}

#[test]
fn mixed_numbers_promote_to_float() {
    assert_eq!(ok(&Value::int(1), BinaryOp::Add, &Value::float(0.5)), Value::float(1.5));
    assert_eq!(ok(&Value::float(3.0), BinaryOp::Div, &Value::int(2)), Value::float(1.5));
}

#[test]
fn string_concatenation_uses_host_strings() {
    assert_eq!(ok(&Value::string("a"), BinaryOp::Add, &Value::int(1)), Value::string("a1"));
    assert_eq!(ok(&Value::float(2.0), BinaryOp::Add, &Value::string("x")), Value::string("2.0x"));
    assert_eq!(ok(&Value::string("n="), BinaryOp::Add, &Value::Null), Value::string("n=null"));
}

#[test]
fn string_repetition() {
    let ab = Value::string("ab");
    assert_eq!(ok(&ab, BinaryOp::Mul, &Value::int(3)), Value::string("ababab"));
    assert_eq!(ok(&ab, BinaryOp::Mul, &Value::int(0)), Value::string(""));
    assert_eq!(ok(&ab, BinaryOp::Mul, &Value::int(-2)), Value::string(""));
    assert_eq!(ok(&Value::int(3), BinaryOp::Mul, &ab), Value::string("ababab"));
    assert_eq!(err_kind(&ab, BinaryOp::Mul, &Value::float(2.0)), EvalErrorKind::Type);
}

#[test]
fn oversized_repetition_fails_before_allocating() {
    let ab = Value::string("ab");
    let err = binary(&ab, BinaryOp::Mul, &Value::int(1_000_000_000_000)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::Arithmetic);
    assert!(err.message.contains("would exceed 16777216 bytes"), "{}", err.message);
    assert_eq!(err_kind(&ab, BinaryOp::Mul, &Value::int(i64::MAX)), EvalErrorKind::Arithmetic);

    let at_limit = ok(&Value::string("a"), BinaryOp::Mul, &Value::int(1 << 24));
    assert_eq!(at_limit.as_str().map(str::len), Some(1 << 24));
}

#[test]
fn mismatched_operands_name_both_classes() {
    let err = binary(&Value::list(vec![]), BinaryOp::Sub, &Value::int(1)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::Type);
    assert_eq!(err.message, "operator `-` cannot be applied to list and int");
}

#[test]
fn date_arithmetic() {
    let day = Value::duration(1, DurationUnit::Days);
    assert_eq!(ok(&date(2024, 2, 28), BinaryOp::Add, &day), date(2024, 2, 29));
    assert_eq!(ok(&day, BinaryOp::Add, &date(2024, 2, 28)), date(2024, 2, 29));
    assert_eq!(ok(&date(2024, 3, 1), BinaryOp::Sub, &day), date(2024, 2, 29));
    assert_eq!(
        ok(&date(2024, 1, 31), BinaryOp::Add, &Value::duration(1, DurationUnit::Months)),
        date(2024, 2, 29)
    );
    assert_eq!(
        ok(&date(2024, 1, 1), BinaryOp::Add, &Value::duration(2, DurationUnit::Hours)),
        datetime(2024, 1, 1, 2, 0, 0)
    );
    assert_eq!(
        ok(&date(2024, 3, 10), BinaryOp::Sub, &date(2024, 3, 1)),
        Value::duration(9, DurationUnit::Days)
    );
    assert_eq!(err_kind(&day, BinaryOp::Sub, &date(2024, 1, 1)), EvalErrorKind::Type);
}

#[test]
fn datetime_arithmetic() {
    let start = datetime(2024, 5, 1, 23, 30, 0);
    assert_eq!(
        ok(&start, BinaryOp::Add, &Value::duration(45, DurationUnit::Minutes)),
        datetime(2024, 5, 2, 0, 15, 0)
    );
    assert_eq!(
        ok(&datetime(2024, 5, 2, 0, 15, 0), BinaryOp::Sub, &start),
        Value::duration(2700, DurationUnit::Seconds)
    );
}

#[test]
fn duration_arithmetic() {
    let hour = Value::duration(1, DurationUnit::Hours);
    let minutes = Value::duration(30, DurationUnit::Minutes);
    assert_eq!(ok(&hour, BinaryOp::Add, &minutes), Value::duration(90, DurationUnit::Minutes));
    assert_eq!(ok(&hour, BinaryOp::Sub, &minutes), Value::duration(30, DurationUnit::Minutes));
    assert_eq!(ok(&hour, BinaryOp::Mul, &Value::int(3)).to_string(), "@3h");
    assert_eq!(ok(&Value::int(2), BinaryOp::Mul, &hour).to_string(), "@2h");
    assert_eq!(ok(&hour, BinaryOp::Div, &Value::int(4)), Value::duration(15, DurationUnit::Minutes));
    assert_eq!(ok(&hour, BinaryOp::Mul, &Value::float(0.5)), Value::duration(30, DurationUnit::Minutes));
    assert_eq!(err_kind(&hour, BinaryOp::Div, &Value::int(0)), EvalErrorKind::Arithmetic);
    assert_eq!(err_kind(&Value::int(2), BinaryOp::Div, &hour), EvalErrorKind::Type);
}

#[test]
fn comparisons() {
    assert_eq!(ok(&Value::int(1), BinaryOp::Lt, &Value::int(2)), Value::bool(true));
    assert_eq!(ok(&Value::int(2), BinaryOp::LtEq, &Value::float(2.0)), Value::bool(true));
    assert_eq!(ok(&Value::string("b"), BinaryOp::Gt, &Value::string("a")), Value::bool(true));
    assert_eq!(ok(&date(2024, 1, 2), BinaryOp::Gt, &datetime(2024, 1, 1, 23, 59, 59)), Value::bool(true));
    assert_eq!(ok(&date(2024, 1, 1), BinaryOp::GtEq, &datetime(2024, 1, 1, 0, 0, 0)), Value::bool(true));
    assert_eq!(
        ok(&Value::duration(1, DurationUnit::Days), BinaryOp::Gt, &Value::duration(23, DurationUnit::Hours)),
        Value::bool(true)
    );
}

#[test]
fn unordered_pairs_are_not_implemented() {
    let err = binary(&Value::string("1"), BinaryOp::Lt, &Value::int(2)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::NotImplemented);
    assert_eq!(err.message, "cannot compare string with int");
}

#[test]
fn equality_is_structural() {
    assert_eq!(ok(&Value::int(2), BinaryOp::Eq, &Value::float(2.0)), Value::bool(true));
    assert_eq!(ok(&Value::string("a"), BinaryOp::Eq, &Value::string("a")), Value::bool(true));
    assert_eq!(ok(&Value::string("1"), BinaryOp::Eq, &Value::int(1)), Value::bool(false));
    assert_eq!(
        ok(&Value::list(vec![Value::int(1)]), BinaryOp::NotEq, &Value::list(vec![Value::int(1)])),
        Value::bool(false)
    );
    assert_eq!(ok(&Value::Null, BinaryOp::Eq, &Value::Null), Value::bool(true));
    assert_eq!(
        ok(&Value::duration(1, DurationUnit::Days), BinaryOp::Eq, &Value::duration(86400, DurationUnit::Seconds)),
        Value::bool(true)
    );
}

#[test]
fn glob_matching() {
    let abc = Value::string("abc");
    assert_eq!(ok(&abc, BinaryOp::Match, &Value::string("a*c")), Value::bool(true));
    assert_eq!(ok(&abc, BinaryOp::Match, &Value::string("*d*")), Value::bool(false));
    assert_eq!(ok(&abc, BinaryOp::NotMatch, &Value::string("*d*")), Value::bool(true));
    assert_eq!(ok(&Value::Null, BinaryOp::Match, &Value::string("*")), Value::bool(false));
    assert_eq!(err_kind(&Value::int(1), BinaryOp::Match, &Value::string("*")), EvalErrorKind::Type);
}

#[test]
fn regex_matching_needs_the_whole_string() {
    let mut cache = RegexCache::new();
    let re = Value::regex(Regex::new("a|ab").unwrap());
    let matched = evaluate_binary(&Value::string("ab"), &re, BinaryOp::Match, &mut cache).unwrap();
    assert_eq!(matched, Value::bool(true));
    let matched = evaluate_binary(&Value::string("abc"), &re, BinaryOp::Match, &mut cache).unwrap();
    assert_eq!(matched, Value::bool(false));
    assert_eq!(cache.anchored_len(), 1);
}

#[test]
fn regex_literals_compile_once() {
    let mut cache = RegexCache::new();
    let pattern: std::sync::Arc<str> = "[0-9]+".into();
    let first = cache.literal(&pattern).unwrap();
    let second = cache.literal(&pattern).unwrap();
    assert!(first.identical(&second));
    let bad: std::sync::Arc<str> = "(".into();
    assert_eq!(cache.literal(&bad).unwrap_err().kind, EvalErrorKind::Argument);
}

#[test]
fn logic_operators_on_evaluated_operands() {
    assert_eq!(ok(&Value::Null, BinaryOp::Or, &Value::int(17)), Value::int(17));
    assert_eq!(ok(&Value::int(3), BinaryOp::Or, &Value::int(17)), Value::int(3));
    assert_eq!(ok(&Value::int(3), BinaryOp::And, &Value::string("")), Value::bool(false));
}

#[test]
fn unary_operators() {
    assert_eq!(evaluate_unary(&Value::int(5), UnaryOp::Neg).unwrap(), Value::int(-5));
    assert_eq!(evaluate_unary(&Value::float(0.5), UnaryOp::Neg).unwrap(), Value::float(-0.5));
    assert_eq!(evaluate_unary(&Value::string(""), UnaryOp::Not).unwrap(), Value::bool(true));
    assert_eq!(
        evaluate_unary(&Value::string("x"), UnaryOp::Neg).unwrap_err().kind,
        EvalErrorKind::Type
    );
    assert_eq!(
        evaluate_unary(&Value::int(i64::MIN), UnaryOp::Neg).unwrap_err().kind,
        EvalErrorKind::Arithmetic
    );
}

#[test]
fn increment_only_steps_ints() {
    assert_eq!(evaluate_inc_dec(&Value::int(1), IncDecOp::Inc).unwrap(), Value::int(2));
    assert_eq!(evaluate_inc_dec(&Value::int(1), IncDecOp::Dec).unwrap(), Value::int(0));
    assert!(evaluate_inc_dec(&Value::float(1.0), IncDecOp::Inc).is_err());
}

proptest! {
    #[test]
    fn int_float_addition_commutes_and_promotes(a in -1_000_000i64..1_000_000, b in -1.0e6f64..1.0e6) {
        #[expect(clippy::cast_precision_loss, reason = "small ints are exact")]
        let expected = Value::float(a as f64 + b);
        prop_assert_eq!(ok(&Value::int(a), BinaryOp::Add, &Value::float(b)), expected.clone());
        prop_assert_eq!(ok(&Value::float(b), BinaryOp::Add, &Value::int(a)), expected);
    }

    #[test]
    fn date_comparison_is_total(
        y1 in 1900i32..2100, m1 in 1u32..=12, d1 in 1u32..=28,
        y2 in 1900i32..2100, m2 in 1u32..=12, d2 in 1u32..=28,
    ) {
        let a = date(y1, m1, d1);
        let b = date(y2, m2, d2);
        let lt = ok(&a, BinaryOp::Lt, &b).is_truthy();
        let eq = ok(&a, BinaryOp::Eq, &b).is_truthy();
        let gt = ok(&a, BinaryOp::Gt, &b).is_truthy();
        prop_assert_eq!(u8::from(lt) + u8::from(eq) + u8::from(gt), 1);
        let expected = match compare_values(&a, &b).unwrap() {
            ComparisonResult::Less => (true, false, false),
            ComparisonResult::Equals => (false, true, false),
            ComparisonResult::Greater => (false, false, true),
        };
        prop_assert_eq!((lt, eq, gt), expected);
    }

    #[test]
    fn repetition_length(s in "[a-z]{0,5}", n in -3i64..6) {
        let repeated = ok(&Value::string(s.as_str()), BinaryOp::Mul, &Value::int(n));
        let expected = s.len() * usize::try_from(n.max(0)).unwrap();
        prop_assert_eq!(repeated.as_str().map(str::len), Some(expected));
    }
}
