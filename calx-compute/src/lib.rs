//! Environment, evaluation and algebraic reduction for the calx expression language.
//!
//! This crate interprets the syntax trees produced by [`calx_parser`] in two independent ways:
//!
//! - [`algebra`] reduces an expression to a canonical [`Expression`], folding exact integer and
//!   rational arithmetic, gathering sums and distributing atoms over sums, without assigning any
//!   value to its symbols.
//! - [`eval`] compiles a program of `let` and `fn` statements into a callable numeric function,
//!   for example to sample it when plotting.
//!
//! ```
//! use calx_compute::{compile_source, reduce_source};
//!
//! let expr = reduce_source("a * (b + c) + 1/2 + 1").unwrap();
//! assert_eq!(expr.to_string(), "a * b + a * c + 3/2");
//!
//! let f = compile_source("fn f(x) = x^2 + 1;").unwrap();
//! assert_eq!(f.eval(3.0).unwrap(), 10.0);
//! ```
//!
//! Every failure, from parsing to evaluation, is a [`calx_error::Error`], so the stages compose
//! with [`Result::and_then`]:
//!
//! ```
//! use calx_compute::compile;
//! use calx_parser::parse_program;
//!
//! let f = parse_program("fn f(x) = 2 * x").and_then(compile).unwrap();
//! assert_eq!(f.call(4.0), 8.0);
//! assert!(parse_program("fn f(x) = 2 *").and_then(compile).is_err());
//! ```

pub mod algebra;
pub mod env;
pub mod error;
pub mod eval;
pub mod resolve;
pub mod value;

pub use algebra::{reduce, reduce_source, Expression};
pub use eval::{compile, compile_source, compile_with, Compiled, EvalConfig, TrigMode};
