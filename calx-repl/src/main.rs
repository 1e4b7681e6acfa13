use ariadne::Source;
use calx_compute::{
    algebra::reduce,
    env::Environment,
    error::kind::UnsupportedReduction,
    eval::{compile, compile_source, EvalConfig, Evaluator},
    resolve::Resolver,
    value::Value,
};
use calx_error::Error;
use calx_parser::{parse_program, parser::stmt::{Program, Stmt}};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Where a function declared on a REPL line is sampled: `(from, to, points)`.
const LINE_SAMPLES: (f64, f64, usize) = (-2.0, 2.0, 5);

/// Report the error to stderr.
///
/// The `ariadne` crate's [`Report`](ariadne::Report) type does not implement `Display`, so it can
/// only be printed through its `eprint` method.
fn report(err: &Error, input: &str) {
    if let Err(io_err) = err.build_report("input").eprint(("input", Source::from(input))) {
        eprintln!("{}", io_err);
    }
}

/// Evaluates the `let` and expression statements of a program, returning the value of the last
/// expression.
fn evaluate(program: &Program) -> Result<Option<Value>, Error> {
    let locals = Resolver::resolve(program)?;
    let mut env = Environment::new();
    let mut evaluator = Evaluator::new(&mut env, &locals, EvalConfig::default());

    let mut last = None;
    for stmt in program {
        match stmt {
            Stmt::Expr(expr) => last = Some(evaluator.eval(expr)?),
            Stmt::Let(stmt) => {
                let value = evaluator.eval(&stmt.value)?;
                evaluator.define(stmt.name.name.as_str(), value);
            },
            // programs that declare functions are compiled instead
            Stmt::Fn(_) => (),
        }
    }
    Ok(last)
}

/// Runs one line typed into the REPL.
///
/// A line that declares a function is compiled, and the function is printed at a few points. A
/// single expression is printed in canonical algebraic form, unless it uses syntax that has no
/// algebraic form, in which case it is evaluated numerically like any other line.
fn run_line(input: &str) -> Result<(), Error> {
    let program = parse_program(input)?;

    if program.iter().any(|stmt| matches!(stmt, Stmt::Fn(_))) {
        let f = compile(program)?;
        let (from, to, points) = LINE_SAMPLES;
        for (x, y) in f.sample(from, to, points) {
            println!("{}({}) = {}", f.name(), x, y);
        }
        return Ok(());
    }

    if let [Stmt::Expr(expr)] = program.as_slice() {
        match reduce(expr) {
            Ok(reduced) => {
                println!("{}", reduced);
                return Ok(());
            },
            Err(err) if err.is::<UnsupportedReduction>() => {
                debug!(reason = %err.message(), "reduction unsupported, evaluating instead");
            },
            Err(err) => return Err(err),
        }
    }

    if let Some(value) = evaluate(&program)? {
        println!("{}", value);
    }
    Ok(())
}

/// Compiles a whole source file and prints its entry function at `x = 0, 1, ..., 10`.
fn execute(input: &str) {
    let f = match compile_source(input) {
        Ok(f) => f,
        Err(err) => return report(&err, input),
    };

    for x in 0..=10 {
        let x = f64::from(x);
        match f.eval(x) {
            Ok(y) => println!("{}({}) = {}", f.name(), x, y),
            Err(err) => report(&err, input),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // run source file
        match fs::read_to_string(&filename) {
            Ok(input) => execute(&input),
            Err(err) => eprintln!("could not read `{}`: {}", filename, err),
        }
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        match io::stdin().read_to_string(&mut input) {
            Ok(_) => execute(&input),
            Err(err) => eprintln!("could not read stdin: {}", err),
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                return;
            },
        };

        fn process_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            if let Err(err) = run_line(&input) {
                report(&err, &input);
            }
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
