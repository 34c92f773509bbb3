use jan_values::{EvalErrorKind, Value};
use pretty_assertions::assert_eq;

use crate::environment::Environment;
use crate::errors::ScriptFailure;
use crate::output::silent_output;
use crate::runtime::Runtime;

fn run(source: &str) -> Result<Value, ScriptFailure> {
    Runtime::new(Environment::standard())
        .with_output(silent_output())
        .compile("builtins", source)
        .unwrap()
        .run(|_| {})
}

fn eval(source: &str) -> Value {
    match run(source) {
        Ok(value) => value,
        Err(failure) => panic!("{}", failure.report()),
    }
}

/// Host string of the result, for collection results.
fn shown(source: &str) -> String {
    eval(source).to_string()
}

fn error_kind(source: &str) -> EvalErrorKind {
    match run(source) {
        Ok(value) => panic!("expected failure, got {value}"),
        Err(failure) => failure.kind,
    }
}

fn s(text: &str) -> Value {
    Value::string(text)
}

// string

#[test]
fn string_queries() {
    assert_eq!(eval("'héllo'.length()"), Value::int(5));
    assert_eq!(eval("'  x '.trim()"), s("x"));
    assert_eq!(eval("'Hello'.containsIgnoreCase('ELL')"), Value::bool(true));
    assert_eq!(eval("'abcabc'.indexOf('c')"), Value::int(2));
    assert_eq!(eval("'abcabc'.lastIndexOf('c')"), Value::int(5));
    assert_eq!(eval("'abc'.indexOf('z')"), Value::int(-1));
    assert_eq!(eval("''.empty()"), Value::bool(true));
    assert_eq!(eval("'abc'.startsWith('')"), Value::bool(false));
    assert_eq!(eval("'abc'.endsWith('bc')"), Value::bool(true));
    assert_eq!(eval("'banana'.count('an')"), Value::int(2));
}

#[test]
fn string_transforms() {
    assert_eq!(eval("'00120'.removeLeadingZeros()"), s("120"));
    assert_eq!(eval("'a.b.c'.replace('.', '-')"), s("a-b-c"));
    assert_eq!(eval("'a1b22'.replaceAll('[0-9]+', '#')"), s("a#b#"));
    assert_eq!(eval("'a1b22'.replaceFirst(re/[0-9]+/, '#')"), s("a#b22"));
    assert_eq!(eval("'MiXed'.toUpperCase() + 'MiXed'.toLowerCase()"), s("MIXEDmixed"));
}

#[test]
fn substring_follows_the_bounds() {
    assert_eq!(eval("'hello'.substring(1)"), s("ello"));
    assert_eq!(eval("'hello'.substring(1, 3)"), s("el"));
    assert_eq!(eval("'hello'.substring(5)"), s(""));
    assert_eq!(error_kind("'hello'.substring(6)"), EvalErrorKind::Argument);
    assert_eq!(error_kind("'hello'.substring(3, 1)"), EvalErrorKind::Argument);
}

#[test]
fn get_reads_characters_and_ranges() {
    assert_eq!(eval("'hello'.get(1)"), s("e"));
    assert_eq!(eval("'hello'.get(-1)"), s("o"));
    assert_eq!(eval("'hello'.get(1, 3)"), s("el"));
    assert_eq!(eval("'hello'.get(3, 1)"), s("le"));
    assert_eq!(eval("'hello'.get(null, 2)"), s("he"));
}

#[test]
fn split_drops_trailing_empty_parts() {
    assert_eq!(shown("'a,b,,'.split(',')"), "[a, b]");
    assert_eq!(shown("'a1b22c'.split(re/[0-9]+/)"), "[a, b, c]");
    assert_eq!(shown("'abc'.split('')"), "[a, b, c]");
    assert_eq!(shown("'one\\r\\ntwo\\n'.splitLines()"), "[one, two]");
}

#[test]
fn numeric_conversions() {
    assert_eq!(eval("'42'.toInt() + '42'.int()"), Value::int(84));
    assert_eq!(eval("'  '.toInt()"), Value::int(0));
    assert_eq!(eval("'2.5'.toFloat()"), Value::float(2.5));
    assert_eq!(eval("'123'.isNumeric()"), Value::bool(true));
    assert_eq!(eval("'12a'.isNumeric()"), Value::bool(false));
    assert_eq!(eval("'12a'.startsWithNumbers()"), Value::bool(true));
    let failure = run("'x1'.toInt()").err().unwrap();
    assert_eq!(failure.kind, EvalErrorKind::Argument);
    assert!(failure.message.contains("invalid value for toInt conversion: 'x1'"), "{}", failure.message);
}

#[test]
fn case_conversions() {
    assert_eq!(eval("'hello big world'.toCamelCase()"), s("helloBigWorld"));
    assert_eq!(eval("'hello-big world'.toConstantCase()"), s("HELLO_BIG_WORLD"));
    assert_eq!(eval("'1st place'.toConstantCase()"), s("_1ST_PLACE"));
    assert_eq!(eval("'--'.toCamelCase()"), Value::Null);
}

#[test]
fn format_and_expand() {
    assert_eq!(eval("'%s has %d items'.format('cart', 3)"), s("cart has 3 items"));
    assert_eq!(eval("'%.1f%%'.format(12.345)"), s("12.3%"));
    assert_eq!(error_kind("'%d'.format('x')"), EvalErrorKind::Argument);
    assert_eq!(error_kind("'%99999999999999999999d'.format(1)"), EvalErrorKind::Argument);
    assert_eq!(error_kind("'%.99999999999999999999f'.format(1.0)"), EvalErrorKind::Argument);
    assert_eq!(error_kind("'ab' * 1000000000000"), EvalErrorKind::Arithmetic);
    assert_eq!(eval("'Hi ${name}, ${n}'.expand({name: 'Ann', n: 1})"), s("Hi Ann, 1"));
    assert_eq!(eval("'Hi ${name}'.expand({name: 'Ann'}, name: 'Bo')"), s("Hi Bo"));
    assert_eq!(error_kind("'Hi ${who}'.expand()"), EvalErrorKind::Name);
}

#[test]
fn encode_and_decode() {
    assert_eq!(eval("'hé'.encode().size()"), Value::int(3));
    assert_eq!(eval("'hé'.encode('UTF-8').decode()"), s("hé"));
    assert_eq!(eval("'hé'.encode().string"), s("hé"));
    assert_eq!(error_kind("'x'.encode('latin1')"), EvalErrorKind::Argument);
}

#[test]
fn parse_dates_with_patterns() {
    assert_eq!(shown("'07.08.2024'.parseDate('%d.%m.%Y')"), "@2024-08-07");
    assert_eq!(eval("'07.08.2024'.parseDate('%d.%m.%Y') == @2024-08-07"), Value::bool(true));
    assert_eq!(eval("' '.parseDate('%d.%m.%Y')"), Value::Null);
    assert_eq!(
        eval("'2024-08-07 10:30:00'.parseDateTime('%Y-%m-%d %H:%M:%S').time()"),
        s("10:30:00")
    );
    assert_eq!(error_kind("'junk'.parseDate('%Y')"), EvalErrorKind::Argument);
}

// list

#[test]
fn list_builders_return_the_list() {
    assert_eq!(shown("[1].add(2).add(0, 0)"), "[0, 1, 2]");
    assert_eq!(shown("[1].addAll([2, 3]).remove(2)"), "[1, 3]");
    assert_eq!(shown("[1, 2, 1, 3].removeAll(1)"), "[2, 3]");
    assert_eq!(shown("[1, 2, 3].put(-1, 9)"), "[1, 2, 9]");
    assert_eq!(shown("[3, 1, 2].sort()"), "[1, 2, 3]");
}

#[test]
fn list_add_mutates_in_place() {
    assert_eq!(eval("xs = []\nys = xs\nxs.add(1)\nys.size()"), Value::int(1));
}

#[test]
fn list_queries() {
    assert_eq!(eval("[1, 2, 2].count(2)"), Value::int(2));
    assert_eq!(eval("[1, 2].contains(2.0)"), Value::bool(true));
    assert_eq!(eval("[].isEmpty()"), Value::bool(true));
    assert_eq!(eval("[1, 2, 3].get(-1)"), Value::int(3));
    assert_eq!(shown("[1, 2, 3].get(1, null)"), "[2, 3]");
    assert_eq!(error_kind("[1].get(4)"), EvalErrorKind::Argument);
}

#[test]
fn list_callbacks() {
    assert_eq!(shown("[1, 2, 3, 4].filter(x -> x % 2 == 0)"), "[2, 4]");
    assert_eq!(shown("[1, 2].map(x -> x * 10)"), "[10, 20]");
    assert_eq!(eval("[1, 'a', 2.5].join()"), s("1 a 2.5"));
    assert_eq!(eval("[1, 2].join(', ')"), s("1, 2"));
}

#[test]
fn sorting_mixed_lists_fails() {
    assert_eq!(error_kind("[1, 'a'].sort()"), EvalErrorKind::NotImplemented);
}

#[test]
fn list_conversions() {
    assert_eq!(eval("[1, 1, 2].toSet().size()"), Value::int(2));
    assert_eq!(eval("xs = [1]\nys = xs.toList()\nys.add(2)\nxs.size()"), Value::int(1));
}

// map and set

#[test]
fn map_methods() {
    assert_eq!(eval("({a: 1}).get('a')"), Value::int(1));
    assert_eq!(eval("({a: 1}).get('b', 7)"), Value::int(7));
    assert_eq!(eval("({a: 1}).get('b')"), Value::Null);
    assert_eq!(eval("map().put('k', 1).put('j', 2).remove('k').size()"), Value::int(1));
    assert_eq!(eval("({a: 1}).containsKey('a')"), Value::bool(true));
    assert_eq!(shown("({a: 1, b: 2}).keys().sort()"), "[a, b]");
    assert_eq!(shown("({a: 1, b: 2}).values().sort()"), "[1, 2]");
    assert_eq!(eval("map().isEmpty()"), Value::bool(true));
}

#[test]
fn map_attributes_read_keys() {
    assert_eq!(eval("m = {name: 'x'}\nm.name"), s("x"));
    assert_eq!(eval("m = {name: 'x'}\nm.missing"), Value::Null);
}

#[test]
fn set_methods() {
    assert_eq!(eval("set(1, 2).add(2).add(3).size()"), Value::int(3));
    assert_eq!(eval("set(1, 2).remove(1).contains(1)"), Value::bool(false));
    assert_eq!(shown("set(3, 1, 2).toList().sort()"), "[1, 2, 3]");
    assert_eq!(eval("set().isEmpty()"), Value::bool(true));
}

#[test]
fn containers_can_hold_themselves() {
    assert_eq!(eval("m = map()\nm.put(m, 1)\nm.size()"), Value::int(1));
    assert_eq!(eval("m = map()\nm[m] = 1\nm.size()"), Value::int(1));
    assert_eq!(shown("m = map()\nm.k = m\nm"), "{k={...}}");
    assert_eq!(eval("s = set()\ns.add(s)\ns.size()"), Value::int(1));
    assert_eq!(shown("s = set()\ns.add(s)\ns"), "[[...]]");
}

#[test]
fn self_containing_lists_print_and_compare() {
    assert_eq!(eval("l = []\nl.add(l)\nstr(l)"), s("[[...]]"));
    assert_eq!(eval("l = [1]\nl.add(l)\nl == [1, l]"), Value::bool(true));
    assert_eq!(eval("l = []\nl.add(l)\nm = map()\nm.put(l, 'x')\nm.get(l)"), s("x"));
    assert_eq!(eval("l = []\nl.add(l)\nl.remove(l)\nl.size()"), Value::int(0));
}

// numbers, binary, temporal, regex

#[test]
fn int_property_on_numbers() {
    assert_eq!(eval("(7).int"), Value::int(7));
    assert_eq!(eval("(-2.9).int"), Value::int(-2));
}

#[test]
fn binary_methods() {
    assert_eq!(eval("'abc'.encode().length"), Value::int(3));
    assert_eq!(eval("'abc'.encode().toString()"), s("abc"));
}

#[test]
fn duration_units() {
    assert_eq!(eval("@2h.minutes"), Value::int(120));
    assert_eq!(eval("@90mi.hours"), Value::int(1));
    assert_eq!(eval("@2w.days"), Value::int(14));
    assert_eq!(eval("@1d == @86400s"), Value::bool(true));
}

#[test]
fn date_and_datetime_parts() {
    assert_eq!(eval("@2024-08-07.month"), Value::int(8));
    assert_eq!(eval("@2024-08-07.day"), Value::int(7));
    assert_eq!(eval("@1970-01-02-00:00:10.epoch"), Value::int(86_410));
    assert_eq!(eval("@1970-01-02-00:00:10.toEpoch()"), Value::int(86_410));
    assert_eq!(eval("@2024-08-07-10:30:05.string()"), s("2024-08-07 10:30:05"));
    assert_eq!(eval("@2024-08-07-10:30:05.format('%d/%m')"), s("07/08"));
    assert_eq!(eval("@2024-08-07-10:30:05.date() == @2024-08-07"), Value::bool(true));
    assert_eq!(eval("@2024-08-07-10:30:05.year()"), Value::int(2024));
    assert_eq!(eval("@2024-08-07.year"), Value::int(2024));
}

#[test]
fn regex_methods() {
    assert_eq!(eval("re/id=([0-9]+)/.extract('x id=42 y')"), s("42"));
    assert_eq!(eval("re/[0-9]+/.extract('abc')"), Value::Null);
    assert_eq!(shown("re/[0-9]+/.extractAll('a1b22c333')"), "[1, 22, 333]");
    assert_eq!(eval("re/[0-9]/.replaceAll('a1b2', '_')"), s("a_b_"));
    assert_eq!(eval("re/[0-9]/.replaceFirst('a1b2', '_')"), s("a_b2"));
    assert_eq!(shown("re/,/.split('a,b,')"), "[a, b]");
}

#[test]
fn calendar_weeks_follow_iso_8601() {
    assert_eq!(eval("@2024-08-07-10:30:05.kw()"), s("32"));
    assert_eq!(eval("@2021-01-03-00:00:00.kw()"), s("53"));
    assert_eq!(eval("@2024-01-01-00:00:00.kw()"), s("01"));
}

#[test]
fn format_at_timezone_names_the_zone() {
    assert_eq!(
        eval("@2024-08-07-10:30:05.formatAtTimezone('Europe/Berlin')"),
        s("2024-08-07 10:30:05 CEST")
    );
    assert_eq!(
        eval("@2024-01-07-10:30:05.formatAtTimezone('Europe/Berlin', '%H:%M %z')"),
        s("10:30 +0100")
    );
    assert_eq!(error_kind("@2024-01-07-10:30:05.formatAtTimezone('Mars/Base')"), EvalErrorKind::Argument);
}

#[test]
fn int_epoch_reads_seconds_as_a_datetime() {
    assert_eq!(eval("(86410).epoch == @1970-01-02-00:00:10"), Value::bool(true));
    assert_eq!(eval("@2024-08-07-10:30:05.epoch.epoch == @2024-08-07-10:30:05"), Value::bool(true));
}

#[test]
fn binary_encodings() {
    assert_eq!(eval("'hello'.toBinaryUtf8().encodeBase64()"), s("aGVsbG8="));
    assert_eq!(eval("'aGVsbG8='.decodeBase64().toString()"), s("hello"));
    assert_eq!(error_kind("'not base64!'.decodeBase64()"), EvalErrorKind::Argument);
    assert_eq!(eval("'abc'.toBinaryUtf8().sha256().size()"), Value::int(32));
    assert_eq!(
        eval("'abc'.toBinaryUtf8().sha256().encodeBase64()"),
        s("ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0=")
    );
}

#[test]
fn url_encoding_uses_form_rules() {
    assert_eq!(eval("'a b&c=d/é*'.urlEncode()"), s("a+b%26c%3Dd%2F%C3%A9*"));
    assert_eq!(eval("'a+b%26c%3Dd%2F%C3%A9*'.urlDecode()"), s("a b&c=d/é*"));
}

#[test]
fn cut_filename_keeps_the_extension() {
    assert_eq!(eval("'/data/quarterly-report.pdf'.cutFilename(12)"), s("quarterl.pdf"));
    assert_eq!(eval("'notes.txt'.cutFilename(20)"), s("notes.txt"));
    assert_eq!(error_kind("'x'.cutFilename(-1)"), EvalErrorKind::Argument);
}

#[test]
fn random_sublist_picks_distinct_elements_in_order() {
    assert_eq!(eval("[1, 2, 3].randomSublist(3).size()"), Value::int(3));
    assert_eq!(shown("[1, 2, 3].randomSublist(5)"), "[1, 2, 3]");
    assert_eq!(shown("[1, 2, 3].randomSublist(0)"), "[]");
    assert_eq!(eval("r = [1, 2, 3, 4, 5].randomSublist(2)\nr.size() == 2 && r.get(0) < r.get(1)"), Value::bool(true));
}

#[test]
fn json_round_trips_through_maps_and_lists() {
    assert_eq!(eval("({b: [1, 2.5, 'x'], a: true, n: null}).toJson()"), s("{\"a\":true,\"b\":[1,2.5,\"x\"]}"));
    assert_eq!(eval("[1, @2024-08-07, map()].toJson()"), s("[1,\"2024-08-07\",{}]"));
    assert_eq!(eval("map().parseJson('{\"a\": {\"b\": [1, 2.0]}}').a.b.get(1)"), Value::int(2));
    assert_eq!(eval("[0].parseJson('[1, \"two\", null]').size()"), Value::int(4));
    assert_eq!(eval("map().parseJson('  ').isEmpty()"), Value::bool(true));
}

#[test]
fn json_failures_are_native_errors() {
    assert_eq!(error_kind("map().parseJson('[1]')"), EvalErrorKind::Native);
    assert_eq!(error_kind("[].parseJson('{')"), EvalErrorKind::Native);
    assert_eq!(error_kind("[@1d].toJson()"), EvalErrorKind::Native);
    assert_eq!(error_kind("l = []\nl.add(l)\nl.toJson()"), EvalErrorKind::Native);
}

#[test]
fn matcher_steps_through_matches() {
    let source = "m = re/(?<key>[a-z]+)=([0-9]+)/.matcher('é a=1, bc=22')
found = []
while (m.find()) { found.add(m.group('key') + ':' + m.group(2) + '@' + m.start()); }
found";
    assert_eq!(shown(source), "[a:1@2, bc:22@7]");
    assert_eq!(eval("m = re/[0-9]+/.matcher('123')\nm.matches() && m.end() == 3"), Value::bool(true));
    assert_eq!(eval("re/[0-9]+/.matcher('12a').matches()"), Value::bool(false));
    assert_eq!(error_kind("re/x/.matcher('x').group()"), EvalErrorKind::Argument);
    assert_eq!(eval("m = re/a(b)?/.matcher('a')\nm.find()\nm.group(1)"), Value::Null);
}

// root table and globals

#[test]
fn every_value_has_a_class() {
    assert_eq!(eval("(1).class + ' ' + 'x'.class + ' ' + [].class"), s("int string list"));
    assert_eq!(eval("type(@1d)"), s("duration"));
}

#[test]
fn global_conversions() {
    assert_eq!(eval("len('héllo') + len([1, 2]) + len({a: 1})"), Value::int(8));
    assert_eq!(eval("str(12) + str(null)"), s("12null"));
    assert_eq!(eval("int(2.9) + int('3') + int(true)"), Value::int(6));
    assert_eq!(eval("float(2) + float('0.5')"), Value::float(2.5));
    assert_eq!(error_kind("len(3)"), EvalErrorKind::Argument);
    assert_eq!(error_kind("int('x')"), EvalErrorKind::Argument);
}

#[test]
fn global_collection_constructors() {
    assert_eq!(shown("list(set(2))"), "[2]");
    assert_eq!(shown("list(1, 2)"), "[1, 2]");
    assert_eq!(eval("xs = [1]\nys = list(xs)\nys.add(2)\nxs.size()"), Value::int(1));
    assert_eq!(eval("set(1, 1, 2).size()"), Value::int(2));
    assert_eq!(eval("map(a: 1, b: 2).get('b')"), Value::int(2));
    assert_eq!(eval("m = map({a: 1}, b: 2)\nm.size()"), Value::int(2));
}

#[test]
fn assert_passes_or_fails_with_a_message() {
    assert_eq!(eval("assert(1 < 2)"), Value::bool(true));
    let failure = run("assert(1 > 2, 'math broke')").err().unwrap();
    assert_eq!(failure.kind, EvalErrorKind::Assertion);
    assert!(failure.message.contains("math broke"), "{}", failure.message);
    let failure = run("assert(false, ' ')").err().unwrap();
    assert!(failure.message.contains("assertion failed!"), "{}", failure.message);
    assert_eq!(error_kind("assert()"), EvalErrorKind::Argument);
}
