//! Host-side behaviour: globals, host objects and their dispatch tables,
//! modules, run limits, compile checks and sharing scripts across threads.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use jan_eval::{
    capture_output, hook_output, native_failure, CallArgs, DispatchTable, Environment, EvalErrorKind,
    EvalResult, HostObject, ModuleDef, RunLimits, RunnableScript, Runtime, SharedOutput, Value,
    ValueKind,
};
use pretty_assertions::assert_eq;

fn compile_in(env: Arc<Environment>, source: &str) -> RunnableScript {
    Runtime::new(env)
        .with_output(capture_output())
        .compile("embedding", source)
        .unwrap()
}

// Host objects

/// Counts how often it leaves a scope.
#[derive(Debug)]
struct Resource {
    released: Arc<AtomicUsize>,
}

impl HostObject for Resource {
    fn class_name(&self) -> &str {
        "resource"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn leave_scope(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

fn resource_env(released: &Arc<AtomicUsize>) -> Arc<Environment> {
    let released = Arc::clone(released);
    Environment::builder()
        .global_function("acquire", move |_args: &mut CallArgs<'_>| -> EvalResult {
            Ok(Value::object(Resource {
                released: Arc::clone(&released),
            }))
        })
        .build()
}

#[test]
fn leave_hooks_fire_once_per_scope_on_an_uncaught_throw() {
    let released = Arc::new(AtomicUsize::new(0));
    let source = "function f() { a = acquire(); if (true) { b = acquire(); for (i from 1 to 1) { throw 'fail'; } } }\nf()";
    let script = compile_in(resource_env(&released), source);
    let failure = script.run(|_| {}).unwrap_err();
    assert_eq!(failure.kind, EvalErrorKind::Thrown);
    assert_eq!(released.load(Ordering::SeqCst), 2);
}

#[test]
fn leave_hooks_fire_when_each_call_returns() {
    let released = Arc::new(AtomicUsize::new(0));
    let script = compile_in(resource_env(&released), "function use() { r = acquire(); return 1; }\nuse() + use()");
    assert_eq!(script.run(|_| {}).unwrap(), Value::int(2));
    assert_eq!(released.load(Ordering::SeqCst), 2);
}

#[test]
fn rebinding_a_name_releases_the_old_object() {
    let released = Arc::new(AtomicUsize::new(0));
    let script = compile_in(resource_env(&released), "r = acquire()\nr = acquire()\nr.class");
    assert_eq!(script.run(|_| {}).unwrap(), Value::string("resource"));
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

/// A string with host-side identity; operators see the inner string.
#[derive(Debug)]
struct Label {
    text: String,
}

impl HostObject for Label {
    fn class_name(&self) -> &str {
        "label"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unpack(&self) -> Option<Value> {
        Some(Value::string(self.text.as_str()))
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        (name == "raw").then(|| Value::string(format!("<{}>", self.text)))
    }
}

fn label_length(label: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let text = label.downcast_object::<Label>().map_or("", |l| l.text.as_str());
    Ok(Value::int(i64::try_from(text.len()).unwrap_or(i64::MAX) * 100))
}

fn label_env() -> Arc<Environment> {
    let builder = Environment::builder();
    let mut table = DispatchTable::with_parent("label", builder.builtin_table(ValueKind::String), |v| Some(v.unpack()));
    table.method("length", label_length);
    builder.host_type("label", table).build()
}

#[test]
fn local_method_shadows_the_parent_table() {
    let script = compile_in(label_env(), "l.length()");
    let value = script.run(|globals| {
        globals.bind("l", Value::object(Label { text: "abc".into() }));
    });
    assert_eq!(value.unwrap(), Value::int(300));
}

#[test]
fn unknown_names_go_to_the_parent_with_the_inner_value() {
    let script = compile_in(label_env(), "[l.toUpperCase(), l + '!', l.raw, l.class].join(' ')");
    let value = script.run(|globals| {
        globals.bind("l", Value::object(Label { text: "abc".into() }));
    });
    assert_eq!(value.unwrap(), Value::string("ABC abc! <abc> string"));
}

// Globals and modules

#[test]
fn host_global_functions_take_keyword_arguments() {
    let env = Environment::builder()
        .global_function("greet", |args: &mut CallArgs<'_>| -> EvalResult {
            let name = args.get_str(0)?.to_owned();
            let greeting = args.kwarg("greeting").and_then(Value::as_str).unwrap_or("hello").to_owned();
            Ok(Value::string(format!("{greeting} {name}")))
        })
        .build();
    let script = compile_in(env, "greet('ann') + ', ' + greet('bo', greeting: 'hi')");
    assert_eq!(script.run(|_| {}).unwrap(), Value::string("hello ann, hi bo"));
}

#[test]
fn host_global_values_are_fresh_per_run() {
    let env = Environment::builder().global_value("seen", || Value::list(Vec::new())).build();
    let script = compile_in(env, "seen.add(1)\nseen.size()");
    assert_eq!(script.run(|_| {}).unwrap(), Value::int(1));
    assert_eq!(script.run(|_| {}).unwrap(), Value::int(1));
}

fn failing_fetch_env() -> Arc<Environment> {
    Environment::builder()
        .global_function("fetch", |args: &mut CallArgs<'_>| -> EvalResult {
            let url = args.get_str(0)?.to_owned();
            Err(native_failure(args.function(), format!("connection refused: {url}")).into())
        })
        .build()
}

#[test]
fn host_failures_reach_the_host_as_native_errors() {
    let script = compile_in(failing_fetch_env(), "x = 1
fetch('db:5432')
x = 2");
    let failure = script.run(|_| {}).unwrap_err();
    assert_eq!(failure.kind, EvalErrorKind::Native);
    assert_eq!(failure.message, "fetch: connection refused: db:5432");
    assert_eq!(failure.location.map(|loc| loc.line), Some(2));
    assert!(failure.thrown.is_none());
}

#[test]
fn host_failures_can_be_caught_by_scripts() {
    let source = "try { fetch('db:5432'); } catch e { e.kind + ' / ' + e.message }";
    let value = compile_in(failing_fetch_env(), source).run(|_| {}).unwrap();
    assert_eq!(value, Value::string("native error / fetch: connection refused: db:5432"));
}

fn math_env() -> Arc<Environment> {
    let math = ModuleDef::new("math")
        .function("twice", |args: &mut CallArgs<'_>| -> EvalResult { Ok(Value::int(args.get_int(0)? * 2)) })
        .value("answer", || Value::int(42));
    Environment::builder().module(math).build()
}

#[test]
fn modules_are_imported_by_name_or_alias() {
    assert_eq!(
        compile_in(math_env(), "import math\nmath.twice(4)").run(|_| {}).unwrap(),
        Value::int(8)
    );
    assert_eq!(
        compile_in(math_env(), "import math as m\nm.answer + m.twice(1)").run(|_| {}).unwrap(),
        Value::int(44)
    );
}

#[test]
fn module_members_are_read_only() {
    let failure = compile_in(math_env(), "import math\nmath.answer = 1").run(|_| {}).unwrap_err();
    assert_eq!(failure.kind, EvalErrorKind::Type);
}

#[test]
fn unknown_module_is_a_name_error() {
    let failure = compile_in(math_env(), "import nothing").run(|_| {}).unwrap_err();
    assert_eq!(failure.kind, EvalErrorKind::Name);
    assert_eq!(failure.message, "no such module: nothing");
}

// Runs

#[test]
fn kept_globals_feed_a_later_script() {
    let env = Environment::standard();
    let setup = compile_in(Arc::clone(&env), "function double(x) { return x * 2; }\nbase = 20");
    let (_, globals) = setup.run_and_keep_globals(|_| {}).unwrap();
    let follow_up = compile_in(env, "double(base) + 2");
    assert_eq!(follow_up.run_in_scope(&globals).unwrap(), Value::int(42));
}

#[test]
fn printed_lines_reach_the_runtime_output() {
    let print: SharedOutput = capture_output();
    let script = Runtime::new(Environment::standard())
        .with_output(Arc::clone(&print))
        .compile("out", "for (i from 1 to 3) { print('line', i); }")
        .unwrap();
    script.run(|_| {}).unwrap();
    assert_eq!(print.printed(), "line 1\nline 2\nline 3\n");
}

#[test]
fn warnings_reach_the_host_hooks() {
    let warnings = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen = Arc::clone(&warnings);
    let script = Runtime::new(Environment::standard())
        .with_output(hook_output(|_| {}, move |message| seen.lock().push(message.to_owned())))
        .compile("warns", "len = 3\nlen")
        .unwrap();
    assert_eq!(script.run(|_| {}).unwrap(), Value::int(3));
    assert_eq!(
        *warnings.lock(),
        vec!["assignment to builtin 'len' defines a local variable".to_owned()]
    );
}

#[test]
fn scripts_run_on_several_threads_at_once() {
    let script = Arc::new(compile_in(Environment::standard(), "total = 0\nfor (i from 1 to n) { total += i; }\ntotal"));
    let handles: Vec<_> = (1..=4)
        .map(|n| {
            let script = Arc::clone(&script);
            thread::spawn(move || {
                let value = script.run(|globals| {
                    globals.bind("n", Value::int(n * 10));
                });
                value.map(|v| v.as_int()).map_err(|failure| failure.to_string())
            })
        })
        .collect();
    let totals: Vec<_> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
    assert_eq!(totals, vec![Some(55), Some(210), Some(465), Some(820)]);
}

// Limits

#[test]
fn call_budget_stops_runaway_scripts() {
    let env = Environment::builder()
        .limits(RunLimits::unlimited().with_call_budget(10))
        .build();
    let failure = compile_in(env, "function f() { return 1; }\nwhile (true) { f(); }")
        .run(|_| {})
        .unwrap_err();
    assert_eq!(failure.kind, EvalErrorKind::Internal);
    assert_eq!(failure.message, "call budget exceeded: 11 calls (budget 10)");
}

#[test]
fn depth_limit_stops_unbounded_recursion() {
    let env = Environment::builder()
        .limits(RunLimits::unlimited().with_max_depth(50))
        .build();
    let failure = compile_in(env, "function down(n) { return down(n + 1); }\ndown(0)")
        .run(|_| {})
        .unwrap_err();
    assert_eq!(failure.message, "maximum recursion depth exceeded");
}

// Compile checks

#[test]
fn check_reports_every_problem_with_its_position() {
    let runtime = Runtime::new(Environment::standard());
    assert!(runtime.check("x = 1\nprint(x)").is_empty());
    let problems = runtime.check("x = re/(/\ny = @2023-02-30");
    assert_eq!(problems.len(), 2);
    assert!(problems[0].starts_with("1:5: invalid regex literal"), "{problems:?}");
    assert!(problems[1].starts_with("2:5: invalid date"), "{problems:?}");
}

#[test]
fn compile_failure_keeps_the_parse_error() {
    let failure = Runtime::new(Environment::standard()).compile("broken", "x = ;").unwrap_err();
    assert_eq!(failure.name, "broken");
    assert!(failure.cause.is_some());
    assert!(failure.to_string().starts_with("script 'broken' failed to compile"));
}

#[test]
fn protect_reports_instead_of_propagating() {
    type JobResult = Result<Value, Box<dyn std::error::Error>>;
    let runtime = Runtime::new(Environment::standard()).with_output(capture_output());
    let failed = runtime.protect("bad job", |rt| -> JobResult { Ok(rt.compile("job", "1 +")?.run(|_| {})?) });
    assert_eq!(failed, None);
    let value = runtime.protect("good job", |rt| -> JobResult { Ok(rt.compile("job", "40 + 2")?.run(|_| {})?) });
    assert_eq!(value, Some(Value::int(42)));
}
