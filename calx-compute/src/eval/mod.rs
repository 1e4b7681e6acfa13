//! Numeric evaluation of syntax trees.
//!
//! The [`Evaluator`] interprets an [`Expr`] directly, producing a [`Value`]. Variables live in
//! an [`Environment`]; references to function parameters are read at the distance computed by
//! the [`Resolver`](crate::resolve::Resolver), and everything else is a global looked up by name.
//! Most callers go through [`compile`], which turns a program into a callable numeric function.

pub mod compile;
pub mod config;
pub mod native;

pub use compile::{compile, compile_source, compile_with, Compiled};
pub use config::{EvalConfig, TrigMode};

use calx_parser::parser::{
    assign::Assign,
    binary::Binary,
    call::{Call, NativeCall},
    expr::Expr,
    literal::{LitFloat, LitInt, LitSym, Literal},
    logic::{Logical, Not, Relation},
    paren::Paren,
    token::op::{BinOpKind, LogicOpKind, RelOpKind, UnaryOpKind},
    unary::Unary,
    vector::{Matrix, Vector},
    visit::Visitor,
};
use crate::{
    env::{Environment, ScopeId},
    error::{kind, Error},
    resolve::Locals,
    value::{Closure, Value},
};
use std::ops::Range;
use tracing::trace;

/// Evaluates expressions to [`Value`]s.
pub struct Evaluator<'a> {
    /// Where variables are stored.
    env: &'a mut Environment,

    /// The scope distances of parameter references.
    locals: &'a Locals,

    config: EvalConfig,

    /// The scope that expressions are currently evaluated in.
    scope: ScopeId,

    /// The number of function calls currently being evaluated.
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator that starts in the global scope of `env`.
    pub fn new(env: &'a mut Environment, locals: &'a Locals, config: EvalConfig) -> Self {
        let scope = env.global();
        Self { env, locals, config, scope, depth: 0 }
    }

    /// Evaluates an expression.
    pub fn eval(&mut self, expr: &Expr) -> Result<Value, Error> {
        expr.accept(self)
    }

    /// Declares a variable in the current scope.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.env.define(self.scope, name, value);
    }

    /// Returns the value of a variable.
    fn lookup(&self, sym: &LitSym) -> Result<Value, Error> {
        match self.locals.get(sym) {
            Some(distance) => self.env.get_at(self.scope, distance, sym),
            None => self.env.get(self.env.global(), sym),
        }
    }

    /// Evaluates an expression that must produce a number.
    fn eval_number(&mut self, expr: &Expr) -> Result<f64, Error> {
        let value = expr.accept(self)?;
        value.as_number().ok_or_else(|| mismatch(expr.span(), "number", &value))
    }

    /// Evaluates an expression that must produce a boolean.
    fn eval_boolean(&mut self, expr: &Expr) -> Result<bool, Error> {
        let value = expr.accept(self)?;
        value.as_boolean().ok_or_else(|| mismatch(expr.span(), "boolean", &value))
    }

    /// Calls a user-defined function with already evaluated arguments. `call_site` is reported
    /// if the number of arguments is wrong or the recursion limit is reached.
    pub fn call_closure(
        &mut self,
        closure: &Closure,
        args: Vec<Value>,
        call_site: &[Range<usize>],
    ) -> Result<Value, Error> {
        let expected = closure.arity();
        let given = args.len();
        if given > expected {
            return Err(Error::new(call_site.to_vec(), kind::TooManyArguments {
                name: closure.name().to_string(),
                expected,
                given,
            }));
        } else if given < expected {
            return Err(Error::new(call_site.to_vec(), kind::MissingArgument {
                name: closure.name().to_string(),
                index: given,
                expected,
                given,
            }));
        }

        if self.depth >= self.config.max_depth {
            return Err(Error::new(call_site.to_vec(), kind::StackOverflow {
                name: closure.name().to_string(),
                depth: self.config.max_depth,
            }));
        }

        let call_scope = self.env.push_scope(closure.scope);
        for (param, arg) in closure.decl.params.iter().zip(args) {
            self.env.define(call_scope, param.name.clone(), arg);
        }

        trace!(name = closure.name(), depth = self.depth, "call");
        let outer_scope = std::mem::replace(&mut self.scope, call_scope);
        self.depth += 1;
        let result = closure.decl.body.accept(self);
        self.depth -= 1;
        self.scope = outer_scope;
        self.env.pop_scope(call_scope);

        result
    }
}

/// Builds the error for a value of the wrong type.
fn mismatch(span: Range<usize>, expected: &'static str, found: &Value) -> Error {
    Error::new(vec![span], kind::TypeMismatch {
        expected,
        found: found.typename(),
    })
}

impl Visitor for Evaluator<'_> {
    type Output = Result<Value, Error>;

    fn visit_integer(&mut self, int: &LitInt) -> Self::Output {
        Ok(Value::Number(int.value.parse().unwrap_or(f64::NAN)))
    }

    fn visit_float(&mut self, float: &LitFloat) -> Self::Output {
        Ok(Value::Number(float.value.parse().unwrap_or(f64::NAN)))
    }

    fn visit_literal(&mut self, literal: &Literal) -> Self::Output {
        Ok(match literal {
            Literal::Boolean(b) => Value::Boolean(b.value),
            Literal::Str(s) => Value::Str(s.value.clone()),
        })
    }

    fn visit_variable(&mut self, sym: &LitSym) -> Self::Output {
        self.lookup(sym)
    }

    fn visit_paren(&mut self, paren: &Paren) -> Self::Output {
        paren.expr.accept(self)
    }

    fn visit_binary(&mut self, binary: &Binary) -> Self::Output {
        let lhs = self.eval_number(&binary.lhs)?;
        let rhs = self.eval_number(&binary.rhs)?;
        Ok(Value::Number(match binary.op.kind {
            BinOpKind::Exp => lhs.powf(rhs),
            BinOpKind::Mul => lhs * rhs,
            BinOpKind::Div => lhs / rhs,
            BinOpKind::Add => lhs + rhs,
            BinOpKind::Sub => lhs - rhs,
        }))
    }

    fn visit_unary(&mut self, unary: &Unary) -> Self::Output {
        let operand = self.eval_number(&unary.operand)?;
        Ok(Value::Number(match unary.op.kind {
            UnaryOpKind::Neg => -operand,
            UnaryOpKind::Factorial => native::factorial(operand),
        }))
    }

    fn visit_assign(&mut self, assign: &Assign) -> Self::Output {
        let value = assign.value.accept(self)?;
        match self.locals.get(&assign.target) {
            Some(distance) => self.env.assign_at(self.scope, distance, &assign.target, value.clone())?,
            None => {
                let global = self.env.global();
                self.env.assign(global, &assign.target, value.clone())?;
            },
        }
        Ok(value)
    }

    fn visit_relation(&mut self, relation: &Relation) -> Self::Output {
        let ordering = |evaluator: &mut Self| -> Result<(f64, f64), Error> {
            Ok((evaluator.eval_number(&relation.lhs)?, evaluator.eval_number(&relation.rhs)?))
        };

        Ok(Value::Boolean(match relation.op.kind {
            RelOpKind::Eq => relation.lhs.accept(self)? == relation.rhs.accept(self)?,
            RelOpKind::NotEq => relation.lhs.accept(self)? != relation.rhs.accept(self)?,
            RelOpKind::Greater => {
                let (lhs, rhs) = ordering(self)?;
                lhs > rhs
            },
            RelOpKind::GreaterEq => {
                let (lhs, rhs) = ordering(self)?;
                lhs >= rhs
            },
            RelOpKind::Less => {
                let (lhs, rhs) = ordering(self)?;
                lhs < rhs
            },
            RelOpKind::LessEq => {
                let (lhs, rhs) = ordering(self)?;
                lhs <= rhs
            },
        }))
    }

    /// `and` and `or` only evaluate their right operand when the left one does not decide the
    /// result.
    fn visit_logical(&mut self, logical: &Logical) -> Self::Output {
        let lhs = self.eval_boolean(&logical.lhs)?;
        let result = match (logical.op.kind, lhs) {
            (LogicOpKind::And, false) => false,
            (LogicOpKind::Or, true) => true,
            _ => self.eval_boolean(&logical.rhs)?,
        };
        Ok(Value::Boolean(result))
    }

    fn visit_not(&mut self, not: &Not) -> Self::Output {
        Ok(Value::Boolean(!self.eval_boolean(&not.operand)?))
    }

    fn visit_call(&mut self, call: &Call) -> Self::Output {
        let closure = match self.lookup(&call.name)? {
            Value::Function(closure) => closure,
            other => return Err(Error::new(vec![call.name.span.clone()], kind::NotCallable {
                name: call.name.name.clone(),
                found: other.typename(),
            })),
        };

        let args = call.args.iter()
            .map(|arg| arg.accept(self))
            .collect::<Result<Vec<_>, _>>()?;
        self.call_closure(&closure, args, &call.outer_span())
    }

    fn visit_native_call(&mut self, call: &NativeCall) -> Self::Output {
        let args = call.args.iter()
            .map(|arg| self.eval_number(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Number(native::call_native(call.func, &args, self.config.trig_mode)))
    }

    fn visit_vector(&mut self, vector: &Vector) -> Self::Output {
        vector.elements.iter()
            .map(|element| element.accept(self))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Vector)
    }

    fn visit_matrix(&mut self, matrix: &Matrix) -> Self::Output {
        matrix.rows.iter()
            .map(|row| row.iter().map(|element| element.accept(self)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Matrix)
    }
}

#[cfg(test)]
mod tests {
    use calx_parser::parse_program;
    use calx_parser::parser::stmt::Stmt;
    use crate::resolve::Resolver;
    use pretty_assertions::assert_eq;
    use super::*;

    /// Runs each statement of a program at the top level, returning the value of the last one.
    fn run(source: &str) -> Result<Value, Error> {
        let program = parse_program(source)?;
        let locals = Resolver::resolve(&program)?;
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env, &locals, EvalConfig::default());

        let mut last = Value::Boolean(false);
        for stmt in &program {
            last = match stmt {
                Stmt::Expr(expr) => evaluator.eval(expr)?,
                Stmt::Let(stmt) => {
                    let value = evaluator.eval(&stmt.value)?;
                    evaluator.define(stmt.name.name.clone(), value.clone());
                    value
                },
                Stmt::Fn(decl) => {
                    let closure = std::rc::Rc::new(Closure {
                        decl: decl.clone(),
                        scope: evaluator.scope,
                    });
                    let value = Value::Function(closure);
                    evaluator.define(decl.name.name.clone(), value.clone());
                    value
                },
            };
        }
        Ok(last)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(run("1 + 2 * 3 - 4 / 8").unwrap(), Value::Number(6.5));
        assert_eq!(run("2 ^ 3 ^ 2").unwrap(), Value::Number(512.0));
        assert_eq!(run("-2 ^ 2").unwrap(), Value::Number(-4.0));
        assert_eq!(run("3! + 0.5").unwrap(), Value::Number(6.5));
        assert!(run("(-3)!").unwrap().as_number().unwrap().is_nan());
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(run("1 < 2 and 2 <= 2").unwrap(), Value::Boolean(true));
        assert_eq!(run("not (1 == 1) or 3 != 3").unwrap(), Value::Boolean(false));
        assert_eq!(run("[1, 2] == [1, 2]").unwrap(), Value::Boolean(true));
        assert_eq!(run("\"a\" != \"b\"").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn logical_operators_short_circuit() {
        // the right operand would fail if it were evaluated
        assert_eq!(run("false and 1").unwrap(), Value::Boolean(false));
        assert_eq!(run("true or 1").unwrap(), Value::Boolean(true));
        assert!(run("true and 1").unwrap_err().is::<kind::TypeMismatch>());
    }

    #[test]
    fn variables_and_assignment() {
        assert_eq!(run("let a = 2; a = a + 1; a * 2").unwrap(), Value::Number(6.0));

        let err = run("b = 1").unwrap_err();
        assert!(err.is::<kind::UndefinedAssignment>());
    }

    #[test]
    fn function_calls() {
        let source = "fn sq(x) = x^2\nfn hyp(a, b) = sqrt(sq(a) + sq(b))\nhyp(3, 4)";
        assert_eq!(run(source).unwrap(), Value::Number(5.0));
    }

    #[test]
    fn parameters_shadow_globals() {
        assert_eq!(run("let x = 100; fn f(x) = x + 1; f(1) + x").unwrap(), Value::Number(102.0));
    }

    #[test]
    fn recursion_with_short_circuit_base_case() {
        let source = "fn even(n) = n == 0 or not even(n - 1)\neven(10)";
        assert_eq!(run(source).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn call_errors() {
        let err = run("fn f(x) = x\nf(1, 2)").unwrap_err();
        assert_eq!(err.downcast_kind(), Some(&kind::TooManyArguments {
            name: "f".to_string(),
            expected: 1,
            given: 2,
        }));
        assert_eq!(err.spans, vec![12..14, 18..19]);

        let err = run("fn f(x, y) = x\nf(1)").unwrap_err();
        assert_eq!(err.downcast_kind(), Some(&kind::MissingArgument {
            name: "f".to_string(),
            index: 1,
            expected: 2,
            given: 1,
        }));

        let err = run("let g = 2; g(1)").unwrap_err();
        assert_eq!(err.downcast_kind(), Some(&kind::NotCallable {
            name: "g".to_string(),
            found: "number",
        }));
    }

    #[test]
    fn stack_overflow() {
        let err = run("fn f(x) = f(x)\nf(1)").unwrap_err();
        assert_eq!(err.downcast_kind(), Some(&kind::StackOverflow {
            name: "f".to_string(),
            depth: config::MAX_RECURSION_DEPTH,
        }));
    }

    #[test]
    fn type_mismatch_spans_the_operand() {
        let err = run("1 + [2]").unwrap_err();
        assert_eq!(err.spans, vec![4..7]);
        assert_eq!(err.downcast_kind(), Some(&kind::TypeMismatch {
            expected: "number",
            found: "vector",
        }));
    }

    #[test]
    fn vectors_and_matrices() {
        assert_eq!(run("[1 + 1, [true]]").unwrap(), Value::Vector(vec![
            Value::Number(2.0),
            Value::Vector(vec![Value::Boolean(true)]),
        ]));
        assert_eq!(run("[[1, 2], [3, 4]]").unwrap().to_string(), "[[1, 2], [3, 4]]");
    }
}
