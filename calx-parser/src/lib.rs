//! Tokenizer and parser for the calx expression language.
//!
//! Source text is split into tokens by [`tokenizer`], then turned into a syntax tree by
//! [`parser`]. Most callers only need [`parse`], for a single expression, or [`parse_program`],
//! for a sequence of statements:
//!
//! ```
//! use calx_parser::{parse, parse_program};
//!
//! let expr = parse("x^2 + 1").unwrap();
//! assert_eq!(expr.to_string(), "x^2 + 1");
//!
//! let program = parse_program("let a = 2; fn f(x) = a * x").unwrap();
//! assert_eq!(program.len(), 2);
//! ```

pub mod parser;
pub mod tokenizer;

pub use parser::{parse, parse_program};
