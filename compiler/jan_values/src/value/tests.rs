use std::collections::hash_map::DefaultHasher;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn truthiness() {
    let falsy = [
        Value::Null,
        Value::bool(false),
        Value::int(0),
        Value::float(0.0),
        Value::string(""),
        Value::list(vec![]),
        Value::map_from([]),
        Value::set([]),
        Value::binary(vec![]),
        Value::duration(0, DurationUnit::Days),
        Value::date(PackedDate::EMPTY),
    ];
    for value in &falsy {
        assert!(!value.is_truthy(), "{value:?} should be false");
    }

    let truthy = [
        Value::bool(true),
        Value::int(-1),
        Value::float(0.5),
        Value::string("0"),
        Value::list(vec![Value::Null]),
        Value::duration(1, DurationUnit::Seconds),
        Value::date(PackedDate::new(2020, 1, 1).unwrap()),
    ];
    for value in &truthy {
        assert!(value.is_truthy(), "{value:?} should be true");
    }
}

#[test]
fn class_names() {
    assert_eq!(Value::Null.class_name(), "null");
    assert_eq!(Value::string("a").class_name(), "string");
    assert_eq!(Value::float(1.0).class_name(), "float");
    assert_eq!(Value::list(vec![]).class_name(), "list");
    assert_eq!(Value::duration(1, DurationUnit::Hours).class_name(), "duration");
    assert_eq!(
        Value::native("f", |_: &mut CallArgs<'_>| Ok(Value::Null)).class_name(),
        "function"
    );
}

#[test]
fn host_strings() {
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::float(3.0).to_string(), "3.0");
    assert_eq!(Value::float(2.5).to_string(), "2.5");
    assert_eq!(
        Value::list(vec![Value::int(1), Value::string("a")]).to_string(),
        "[1, a]"
    );
    assert_eq!(
        Value::map_from([(Value::string("k"), Value::string("v"))]).to_string(),
        "{k=v}"
    );
    assert_eq!(Value::binary(vec![1, 2]).to_string(), "[1, 2]");
    assert_eq!(
        Value::date(PackedDate::new(2024, 3, 9).unwrap()).to_string(),
        "@2024-03-09"
    );
    assert_eq!(Value::duration(5, DurationUnit::Minutes).to_string(), "@5mi");
}

#[test]
fn numbers_compare_across_int_and_float() {
    assert_eq!(Value::int(2), Value::float(2.0));
    assert_ne!(Value::int(2), Value::float(2.5));
    assert_ne!(Value::int(1), Value::string("1"));
    assert_eq!(hash_of(&Value::int(2)), hash_of(&Value::float(2.0)));
}

#[test]
fn durations_compare_by_length() {
    assert_eq!(
        Value::duration(60, DurationUnit::Minutes),
        Value::duration(1, DurationUnit::Hours)
    );
    assert_ne!(
        Value::duration(1, DurationUnit::Days),
        Value::duration(1, DurationUnit::Hours)
    );
}

#[test]
fn map_keys_match_numerically() {
    let map = Value::map_from([(Value::int(1), Value::string("one"))]);
    let Value::Map(entries) = &map else {
        unreachable!()
    };
    assert_eq!(
        entries.borrow().get(&Value::float(1.0)),
        Some(&Value::string("one"))
    );
}

#[test]
fn coercion() {
    assert_eq!(Value::int(2).coerce(ValueKind::Float), Some(Value::float(2.0)));
    assert_eq!(Value::float(3.0).coerce(ValueKind::Int), Some(Value::int(3)));
    assert_eq!(Value::float(3.5).coerce(ValueKind::Int), None);
    assert_eq!(Value::string("3").coerce(ValueKind::Int), None);

    let date = PackedDate::new(2021, 6, 30).unwrap();
    assert_eq!(
        Value::date(date).coerce(ValueKind::DateTime),
        Some(Value::datetime(date.start_of_day()))
    );
}

#[test]
fn containers_alias_on_clone() {
    let list = Value::list(vec![Value::int(1)]);
    let alias = list.clone();
    if let Value::List(items) = &alias {
        items.borrow_mut().push(Value::int(2));
    }
    assert_eq!(list.to_string(), "[1, 2]");
    assert!(list.identical(&alias));

    let copy = Value::list(vec![Value::int(1), Value::int(2)]);
    assert_eq!(list, copy);
    assert!(!list.identical(&copy));
}

#[test]
fn self_containing_list_renders_hashes_and_compares() {
    let list = Value::list(vec![Value::int(1)]);
    let Value::List(items) = &list else { unreachable!() };
    items.borrow_mut().push(list.clone());

    assert_eq!(list.to_string(), "[1, [...]]");
    assert_eq!(format!("{list:?}"), "List([Int(1), List([...])])");
    assert_eq!(hash_of(&list), hash_of(&list.clone()));
    assert_eq!(list, list.clone());

    let other = Value::list(vec![Value::int(1)]);
    let Value::List(other_items) = &other else { unreachable!() };
    other_items.borrow_mut().push(other.clone());
    assert_eq!(list, other);
    assert_eq!(hash_of(&list), hash_of(&other));

    items.borrow_mut().clear();
    other_items.borrow_mut().clear();
}

#[test]
fn map_can_key_itself_while_being_written() {
    let map = Value::map_from([]);
    let Value::Map(entries) = &map else { unreachable!() };
    entries.borrow_mut().insert(map.clone(), Value::int(1));

    assert_eq!(map.to_string(), "{{...}=1}");
    assert_eq!(entries.borrow().len(), 1);
    entries.borrow_mut().clear();
}

#[test]
fn set_can_hold_itself() {
    let set = Value::set([]);
    let Value::Set(members) = &set else { unreachable!() };
    members.borrow_mut().insert(set.clone());

    assert_eq!(set.to_string(), "[[...]]");
    assert_eq!(set, set.clone());
    members.borrow_mut().clear();
}

#[test]
fn native_functions_equal_only_themselves() {
    let f = Value::native("f", |_: &mut CallArgs<'_>| Ok(Value::Null));
    let g = Value::native("f", |_: &mut CallArgs<'_>| Ok(Value::Null));
    assert_eq!(f, f.clone());
    assert_ne!(f, g);
}

#[test]
fn float_to_exact_int_bounds() {
    assert_eq!(float_to_exact_int(4.0), Some(4));
    assert_eq!(float_to_exact_int(-0.0), Some(0));
    assert_eq!(float_to_exact_int(0.1), None);
    assert_eq!(float_to_exact_int(f64::NAN), None);
    assert_eq!(float_to_exact_int(f64::INFINITY), None);
    assert_eq!(float_to_exact_int(1e300), None);
}

proptest! {
    #[test]
    fn int_and_float_agree_on_equality_and_hash(n in -1_000_000_000i64..1_000_000_000) {
        #[expect(clippy::cast_precision_loss, reason = "small ints are exact")]
        let f = Value::float(n as f64);
        let i = Value::int(n);
        prop_assert_eq!(&i, &f);
        prop_assert_eq!(hash_of(&i), hash_of(&f));
    }

    #[test]
    fn coerce_to_own_kind_is_identity(n in any::<i64>()) {
        prop_assert_eq!(Value::int(n).coerce(ValueKind::Int), Some(Value::int(n)));
    }
}
