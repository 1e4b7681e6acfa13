use calx_parser::{parse_program, parser::stmt::{Program, Stmt}};
use crate::{
    env::Environment,
    error::{kind, Error},
    resolve::{Locals, Resolver},
    value::{Closure, Value},
};
use std::rc::Rc;
use super::{EvalConfig, Evaluator};
use tracing::debug;

/// A program compiled into a numeric function of one variable.
///
/// The function is the last one the program declares. Top-level `let` and expression statements
/// have already run; their results live in the global scope that every evaluation starts from.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// The global scope after the program's top-level statements ran.
    env: Environment,

    locals: Rc<Locals>,

    /// The function that [`Compiled::eval`] calls.
    entry: Rc<Closure>,

    config: EvalConfig,
}

impl Compiled {
    /// Returns the name of the compiled function.
    pub fn name(&self) -> &str {
        self.entry.name()
    }

    /// Returns the name of the compiled function's parameter.
    pub fn param(&self) -> &str {
        self.entry.decl.params
            .first()
            .map_or("", |param| param.name.as_str())
    }

    /// Evaluates the function at `x`.
    ///
    /// Each evaluation works on its own copy of the global scope, so assignments made by one
    /// evaluation are never seen by another.
    pub fn eval(&self, x: f64) -> Result<f64, Error> {
        let mut env = self.env.clone();
        let mut evaluator = Evaluator::new(&mut env, &self.locals, self.config);
        let call_site = [self.entry.decl.signature_span()];
        let value = evaluator.call_closure(&self.entry, vec![Value::Number(x)], &call_site)?;
        value.as_number().ok_or_else(|| Error::new(vec![self.entry.decl.body.span()], kind::TypeMismatch {
            expected: "number",
            found: value.typename(),
        }))
    }

    /// Evaluates the function at `x`, returning `NaN` if the evaluation fails.
    pub fn call(&self, x: f64) -> f64 {
        self.eval(x).unwrap_or(f64::NAN)
    }

    /// Returns the function as a closure, returning `NaN` wherever the evaluation fails.
    pub fn as_fn(&self) -> impl Fn(f64) -> f64 + '_ {
        move |x| self.call(x)
    }

    /// Evaluates the function at `n` evenly spaced points from `from` to `to`, inclusive.
    pub fn sample(&self, from: f64, to: f64, n: usize) -> Vec<(f64, f64)> {
        match n {
            0 => Vec::new(),
            1 => vec![(from, self.call(from))],
            _ => {
                let step = (to - from) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        // land exactly on `to` instead of accumulating rounding error
                        let x = if i == n - 1 { to } else { from + step * i as f64 };
                        (x, self.call(x))
                    })
                    .collect()
            },
        }
    }
}

/// Compiles a program with the default [`EvalConfig`].
pub fn compile(program: Program) -> Result<Compiled, Error> {
    compile_with(program, EvalConfig::default())
}

/// Compiles a program.
///
/// The program is resolved, then its statements run in order in a fresh global scope: `let`
/// declares a variable, `fn` declares a function, and expressions are evaluated for their
/// effects. The last declared function becomes the entry point and must take exactly one
/// parameter.
pub fn compile_with(program: Program, config: EvalConfig) -> Result<Compiled, Error> {
    let locals = Resolver::resolve(&program)?;
    let mut env = Environment::new();
    let mut entry = None;

    {
        let mut evaluator = Evaluator::new(&mut env, &locals, config);
        for stmt in program {
            match stmt {
                Stmt::Expr(expr) => {
                    evaluator.eval(&expr)?;
                },
                Stmt::Let(stmt) => {
                    let value = evaluator.eval(&stmt.value)?;
                    evaluator.define(stmt.name.name, value);
                },
                Stmt::Fn(decl) => {
                    let name = decl.name.name.clone();
                    let closure = Rc::new(Closure { decl, scope: evaluator.scope });
                    evaluator.define(name, Value::Function(Rc::clone(&closure)));
                    entry = Some(closure);
                },
            }
        }
    }

    let entry = entry.ok_or_else(|| Error::new(Vec::new(), kind::NoEntryFunction))?;
    if entry.arity() != 1 {
        return Err(Error::new(vec![entry.decl.signature_span()], kind::EntryArity {
            name: entry.name().to_string(),
            given: entry.arity(),
        }));
    }

    debug!(name = entry.name(), "compiled entry function");
    Ok(Compiled {
        env,
        locals: Rc::new(locals),
        entry,
        config,
    })
}

/// Parses and compiles source code.
pub fn compile_source(source: &str) -> Result<Compiled, Error> {
    parse_program(source).and_then(compile)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use crate::eval::TrigMode;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn compiles_single_function() {
        let f = compile_source("fn f(x) = x^2 + 1;").unwrap();
        assert_eq!(f.name(), "f");
        assert_eq!(f.param(), "x");
        assert_eq!(f.eval(3.0).unwrap(), 10.0);
        assert_eq!(f.call(-2.0), 5.0);
    }

    #[test]
    fn helpers_and_globals() {
        let source = "
            let scale = 3
            fn sq(t) = t * t
            fn f(x) = scale * sq(x) - 1
        ";
        let f = compile_source(source).unwrap();
        assert_eq!(f.eval(2.0).unwrap(), 11.0);
    }

    #[test]
    fn last_function_is_the_entry() {
        let f = compile_source("fn g(x) = x + 1\nfn h(y) = g(y) * 2").unwrap();
        assert_eq!(f.name(), "h");
        assert_eq!(f.eval(4.0).unwrap(), 10.0);
    }

    #[test]
    fn closures_see_later_assignments() {
        let source = "let a = 1; fn g(x) = a * x; a = 5; fn f(x) = g(x)";
        let f = compile_source(source).unwrap();
        assert_eq!(f.eval(2.0).unwrap(), 10.0);
    }

    #[test]
    fn evaluations_do_not_share_state() {
        let source = "let n = 0; fn f(x) = (n = n + x) * 0 + n";
        let f = compile_source(source).unwrap();
        assert_eq!(f.eval(3.0).unwrap(), 3.0);
        assert_eq!(f.eval(3.0).unwrap(), 3.0);
    }

    #[test]
    fn natives_and_trig_mode() {
        let program = parse_program("fn f(x) = sin(x) + abs(-2)").unwrap();
        let degrees = compile_with(program.clone(), EvalConfig::default().with_trig_mode(TrigMode::Degrees)).unwrap();
        let radians = compile(program).unwrap();
        assert_float_relative_eq!(degrees.eval(90.0).unwrap(), 3.0);
        assert_float_relative_eq!(radians.eval(std::f64::consts::FRAC_PI_2).unwrap(), 3.0);
    }

    #[test]
    fn failed_evaluations_are_nan() {
        let f = compile_source("fn f(x) = [x]").unwrap();
        assert!(f.eval(1.0).unwrap_err().is::<kind::TypeMismatch>());
        assert!(f.call(1.0).is_nan());
        assert!((f.as_fn())(1.0).is_nan());
    }

    #[test]
    fn sampling() {
        let f = compile_source("fn f(x) = 2 * x").unwrap();
        assert_eq!(f.sample(0.0, 1.0, 5), vec![
            (0.0, 0.0),
            (0.25, 0.5),
            (0.5, 1.0),
            (0.75, 1.5),
            (1.0, 2.0),
        ]);
        assert_eq!(f.sample(3.0, 9.0, 1), vec![(3.0, 6.0)]);
        assert!(f.sample(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn entry_errors() {
        let err = compile_source("let a = 1").unwrap_err();
        assert!(err.is::<kind::NoEntryFunction>());

        let err = compile_source("fn f(x, y) = x + y").unwrap_err();
        assert_eq!(err.spans, vec![0..9]);
        assert_eq!(err.downcast_kind(), Some(&kind::EntryArity {
            name: "f".to_string(),
            given: 2,
        }));
    }

    #[test]
    fn errors_prevent_compilation() {
        assert!(compile_source("fn f(x) = x +").is_err());
        assert!(compile_source("fn f(x) = y").unwrap_err().is::<kind::UndefinedVariable>());
        assert!(compile_source("let a = 1 / b\nfn f(x) = x").is_err());
        assert!(compile_source("fn f(x) = x\nf(1, 2)").unwrap_err().is::<kind::TooManyArguments>());
    }

    #[test]
    fn undefined_global_reports_line() {
        let source = "let a = 1\nfn g(x) = x + b\nlet c = g(1)\nlet b = 2\nfn f(x) = x";
        let err = compile_source(source).unwrap_err();
        assert_eq!(err.describe(source), "on line 2, from the environment: `b` is not defined");
    }
}
