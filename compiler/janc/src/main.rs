//! Janitor CLI
//!
//! Runs, evaluates and checks Janitor scripts from the command line.

mod globals;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jan_eval::{Environment, RunLimits, Runtime, Value};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

use globals::GlobalArg;

#[derive(Parser)]
#[command(name = "janc")]
#[command(about = "Run and check Janitor scripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Abort a run after this many function and method calls
    #[arg(long, global = true)]
    call_budget: Option<u32>,

    /// Maximum nesting of script function calls
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Bind a global before the run, as `name=value` (repeatable)
    #[arg(long = "global", value_name = "NAME=VALUE", value_parser = globals::parse_global, global = true)]
    globals: Vec<GlobalArg>,

    /// Log as an indented call tree instead of flat lines
    #[arg(long, global = true)]
    tree: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run a script file and print its result
    Run { file: PathBuf },
    /// Evaluate a one-line expression
    Eval { expr: String },
    /// Report compile problems without running
    Check { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.tree);

    let runtime = Runtime::new(build_environment(&cli));
    match &cli.command {
        Command::Run { file } => {
            let Some(source) = read_source(file) else {
                return ExitCode::from(2);
            };
            run(&runtime, &file.display().to_string(), &source, false)
        }
        Command::Eval { expr } => run(&runtime, "<eval>", expr, true),
        Command::Check { file } => {
            let Some(source) = read_source(file) else {
                return ExitCode::from(2);
            };
            check(&runtime, file, &source)
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings only by default).
fn init_tracing(tree: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if tree {
        registry
            .with(HierarchicalLayer::new(2).with_targets(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn build_environment(cli: &Cli) -> std::sync::Arc<Environment> {
    let mut limits = RunLimits::default();
    if let Some(budget) = cli.call_budget {
        limits = limits.with_call_budget(budget);
    }
    if let Some(depth) = cli.max_depth {
        limits = limits.with_max_depth(depth);
    }
    let mut builder = Environment::builder().limits(limits);
    for global in &cli.globals {
        let literal = global.value.clone();
        builder = builder.global_value(&global.name, move || literal.to_value());
    }
    builder.build()
}

fn read_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(err) => {
            eprintln!("error: cannot read '{}': {err}", path.display());
            None
        }
    }
}

fn run(runtime: &Runtime, name: &str, source: &str, show_null: bool) -> ExitCode {
    let script = match runtime.compile(name, source) {
        Ok(script) => script,
        Err(failure) => {
            for message in &failure.messages {
                eprintln!("{name}:{message}");
            }
            return ExitCode::from(2);
        }
    };
    match script.run(|_| {}) {
        Ok(Value::Null) if !show_null => ExitCode::SUCCESS,
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("{}", failure.report());
            ExitCode::FAILURE
        }
    }
}

fn check(runtime: &Runtime, path: &Path, source: &str) -> ExitCode {
    let problems = runtime.check(source);
    if problems.is_empty() {
        println!("{}: ok", path.display());
        return ExitCode::SUCCESS;
    }
    for problem in &problems {
        eprintln!("{}:{problem}", path.display());
    }
    ExitCode::from(2)
}
