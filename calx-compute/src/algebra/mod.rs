//! The algebraic model: canonical [`Expression`] trees, their printing and numeric
//! approximation, and the [`reduce`] pass that builds them from syntax trees.

pub mod approx;
pub mod expr;
pub mod iter;
pub mod print;
pub mod reduce;

pub use approx::Approximate;
pub use expr::{Expression, ExpressionVisitor, Node};
pub use print::Printer;
pub use reduce::{reduce, reduce_source, Reducer};
