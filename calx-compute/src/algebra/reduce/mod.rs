//! Reduction of syntax trees to canonical algebraic [`Expression`]s.
//!
//! The [`Reducer`] walks an [`Expr`] bottom-up. Numbers are folded exactly, sums are gathered
//! and atoms are distributed over sums (see [`rules`]). Syntax that has no algebraic meaning,
//! such as floats, vectors or comparisons, fails with [`kind::UnsupportedReduction`].

pub mod rules;

use calx_parser::{
    parse,
    parser::{
        assign::Assign,
        binary::Binary,
        call::{Call, NativeCall},
        expr::Expr,
        literal::{LitFloat, LitInt, LitSym, Literal},
        logic::{Logical, Not, Relation},
        paren::Paren,
        token::op::{BinOpKind, UnaryOpKind},
        unary::Unary,
        vector::{Matrix, Vector},
        visit::Visitor,
    },
};
use crate::error::{kind, Error};
use rug::Integer;
use std::ops::Range;
use super::expr::Expression;

/// Reduces syntax trees to [`Expression`]s.
#[derive(Debug, Default)]
pub struct Reducer;

impl Reducer {
    fn unsupported(form: &'static str, span: Range<usize>) -> Result<Expression, Error> {
        Err(Error::new(vec![span], kind::UnsupportedReduction { form }))
    }
}

impl Visitor for Reducer {
    type Output = Result<Expression, Error>;

    fn visit_integer(&mut self, int: &LitInt) -> Self::Output {
        // the tokenizer only lets decimal digits through
        let value = int.value
            .bytes()
            .fold(Integer::new(), |acc, digit| acc * 10 + u32::from(digit - b'0'));
        Ok(Expression::Int(value))
    }

    fn visit_float(&mut self, float: &LitFloat) -> Self::Output {
        Self::unsupported("float", float.span.clone())
    }

    fn visit_literal(&mut self, literal: &Literal) -> Self::Output {
        Self::unsupported("literal", literal.span())
    }

    fn visit_variable(&mut self, sym: &LitSym) -> Self::Output {
        Ok(Expression::sym(sym.name.as_str()))
    }

    fn visit_paren(&mut self, paren: &Paren) -> Self::Output {
        let mut inner = paren.expr.accept(self)?;
        inner.add_paren_level();
        Ok(inner)
    }

    fn visit_binary(&mut self, binary: &Binary) -> Self::Output {
        // the right operand is not reduced if the left one fails
        let lhs = binary.lhs.accept(self)?;
        let rhs = binary.rhs.accept(self)?;

        Ok(match binary.op.kind {
            BinOpKind::Add => rules::add(lhs, rhs),
            BinOpKind::Sub => Expression::difference(lhs, rhs),
            BinOpKind::Mul => rules::multiply(lhs, rhs),
            BinOpKind::Div => rules::divide(lhs, rhs, binary.rhs.span())?,
            BinOpKind::Exp => Expression::power(lhs, rhs),
        })
    }

    fn visit_unary(&mut self, unary: &Unary) -> Self::Output {
        let operand = unary.operand.accept(self)?;
        Ok(match unary.op.kind {
            UnaryOpKind::Neg => rules::negate(operand),
            UnaryOpKind::Factorial => Expression::factorial(operand),
        })
    }

    fn visit_assign(&mut self, assign: &Assign) -> Self::Output {
        Self::unsupported("assignment", assign.span())
    }

    fn visit_relation(&mut self, relation: &Relation) -> Self::Output {
        Self::unsupported("relation", relation.span())
    }

    fn visit_logical(&mut self, logical: &Logical) -> Self::Output {
        Self::unsupported("logical", logical.span())
    }

    fn visit_not(&mut self, not: &Not) -> Self::Output {
        Self::unsupported("not", not.span())
    }

    fn visit_call(&mut self, call: &Call) -> Self::Output {
        Self::unsupported("function call", call.span())
    }

    fn visit_native_call(&mut self, call: &NativeCall) -> Self::Output {
        Self::unsupported("native call", call.span())
    }

    fn visit_vector(&mut self, vector: &Vector) -> Self::Output {
        Self::unsupported("vector", vector.span())
    }

    fn visit_matrix(&mut self, matrix: &Matrix) -> Self::Output {
        Self::unsupported("matrix", matrix.span())
    }
}

/// Reduces a syntax tree to a canonical algebraic expression.
pub fn reduce(expr: &Expr) -> Result<Expression, Error> {
    expr.accept(&mut Reducer)
}

/// Parses and reduces a single expression.
pub fn reduce_source(source: &str) -> Result<Expression, Error> {
    parse(source).and_then(|expr| reduce(&expr))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> Expression {
        Expression::sym(name)
    }

    fn int(n: i32) -> Expression {
        Expression::int(n)
    }

    fn reduced(source: &str) -> Expression {
        reduce_source(source).unwrap()
    }

    #[test]
    fn atoms() {
        assert_eq!(reduced("42"), int(42));
        assert_eq!(reduced("123456789012345678901234567890").to_string(), "123456789012345678901234567890");
        assert_eq!(reduced("x"), sym("x"));
    }

    #[test]
    fn integer_arithmetic() {
        assert_eq!(reduced("2 + 3"), int(5));
        assert_eq!(reduced("6 / 3"), int(2));
        assert_eq!(reduced("7 / 2"), Expression::rational(7, 2).unwrap());
        assert_eq!(reduced("-4"), int(-4));
        assert_eq!(reduced("-(1 / 2)"), Expression::rational(-1, 2).unwrap());
    }

    #[test]
    fn rationals_mix_with_integers() {
        assert_eq!(reduced("1/2 + 1"), Expression::rational(3, 2).unwrap());
        assert_eq!(reduced("1 + 1/2"), Expression::rational(3, 2).unwrap());
        assert_eq!(reduced("1/3 + 2/3"), int(1));
    }

    #[test]
    fn subtraction_and_powers_are_kept() {
        assert_eq!(reduced("5 - 3"), Expression::difference(int(5), int(3)));
        assert_eq!(reduced("2^3"), Expression::power(int(2), int(3)));
        assert_eq!(reduced("n!"), Expression::factorial(sym("n")));
        assert_eq!(reduced("-x"), Expression::product(vec![int(-1), sym("x")]));
    }

    #[test]
    fn sums_are_gathered() {
        assert_eq!(reduced("x + 1 + 2"), Expression::sum(vec![sym("x"), int(3)]));
        assert_eq!(reduced("x + x"), Expression::product(vec![int(2), sym("x")]));
        assert_eq!(
            reduced("2*a + b + 3*a"),
            Expression::sum(vec![Expression::product(vec![int(5), sym("a")]), sym("b")]),
        );
        assert_eq!(reduced("a + 1 + -1"), sym("a"));
    }

    #[test]
    fn distribution() {
        assert_eq!(
            reduced("a * (b + c)"),
            Expression::sum(vec![
                Expression::product(vec![sym("a"), sym("b")]),
                Expression::product(vec![sym("a"), sym("c")]),
            ]),
        );
        assert_eq!(reduced("(x + 1) * 2").to_string(), "x * 2 + 1 * 2");
        assert_eq!(reduced("x^2 * (a + b)").to_string(), "x^2 * (a + b)");
    }

    #[test]
    fn groupings_are_counted() {
        let one = reduced("(a + b)");
        assert_eq!(one.paren_level(), 1);
        assert_eq!(one, Expression::sum(vec![sym("a"), sym("b")]));

        let two = reduced("((a * b))");
        assert_eq!(two.paren_level(), 2);
        assert_eq!(two.to_string(), "((a * b))");

        assert_eq!(reduced("(x)").paren_level(), 0);
    }

    #[test]
    fn groupings_do_not_change_simplification() {
        assert_eq!(reduced("(a + b) + c"), reduced("a + b + c"));
        assert_eq!(reduced("a + (b + c)"), reduced("a + b + c"));
        assert_eq!(reduced("(x + 1) + x"), reduced("x + 1 + x"));
        assert_eq!(reduced("(x + 1) + x").to_string(), "2 * x + 1");
        assert_eq!(reduced("(x + 1) + (2 + x)").to_string(), "2 * x + 3");

        // only a grouping around the whole expression survives
        assert_eq!(reduced("(a + b + c)").paren_level(), 1);
        assert_eq!(reduced("(a + b) + c").paren_level(), 0);
    }

    #[test]
    fn division_by_zero() {
        let err = reduce_source("7 / 0").unwrap_err();
        assert!(err.is::<kind::DivisionByZero>());
        assert_eq!(err.spans, vec![4..5]);

        assert_eq!(reduced("x / 0").to_string(), "x / 0");

        assert!(reduce_source("1 / (2 - 2 + 0)").is_ok());
        assert!(reduce_source("3 / (0)").unwrap_err().is::<kind::DivisionByZero>());
    }

    #[test]
    fn unsupported_forms() {
        let cases = [
            ("1.5", "float", 0..3),
            ("true", "literal", 0..4),
            ("[1, 2]", "vector", 0..6),
            ("[[1, 2], [3, 4]]", "matrix", 0..16),
            ("f(x)", "function call", 0..4),
            ("sin(x)", "native call", 0..6),
            ("x < 1", "relation", 0..5),
            ("a and b", "logical", 0..7),
            ("not a", "not", 0..5),
            ("x = 1", "assignment", 0..5),
        ];

        for (source, form, span) in cases {
            let err = reduce_source(source).unwrap_err();
            assert_eq!(err.downcast_kind(), Some(&kind::UnsupportedReduction { form }), "{}", source);
            assert_eq!(err.spans, vec![span], "{}", source);
        }
    }

    #[test]
    fn failures_short_circuit() {
        let err = reduce_source("1.5 + [1]").unwrap_err();
        assert_eq!(err.downcast_kind(), Some(&kind::UnsupportedReduction { form: "float" }));

        let err = reduce_source("x + 2 * 0.5").unwrap_err();
        assert_eq!(err.spans, vec![8..11]);
    }

    #[test]
    fn printed_trees_reduce_to_themselves() {
        let sources = [
            "a * (b + c)",
            "(x + 1) * 2",
            "x - (y - z)",
            "2^3^x",
            "(2^3)^x",
            "-x^2 + 7/2",
            "((a + b)) * c^2",
            "(n + 1)! / 3",
            "x * -(1/2)",
            "-(a - b)!",
            "2*a + b + 3*a - 4",
        ];

        for source in sources {
            let first = reduced(source);
            let printed = first.to_string();
            let second = reduce_source(&printed).unwrap();
            assert_eq!(first, second, "{} printed as {}", source, printed);
            assert_eq!(second.to_string(), printed);
        }
    }

    /// Every tree of the given depth built from small integer literals and the four arithmetic
    /// operators, with compound operands grouped.
    fn integer_trees(depth: usize) -> Vec<String> {
        let mut trees = ["0", "1", "2", "3"].map(String::from).to_vec();
        for _ in 0..depth {
            let operands = trees.clone();
            for lhs in &operands {
                for rhs in &operands {
                    for op in ["+", "-", "*", "/"] {
                        let group = |tree: &String| match tree.len() {
                            1 => tree.clone(),
                            _ => format!("({})", tree),
                        };
                        trees.push(format!("{} {} {}", group(lhs), op, group(rhs)));
                    }
                }
            }
        }
        trees.sort();
        trees.dedup();
        trees
    }

    #[test]
    fn printed_integer_trees_reduce_to_themselves() {
        let mut checked = 0;
        for source in integer_trees(2) {
            let Ok(first) = reduce_source(&source) else {
                assert!(reduce_source(&source).unwrap_err().is::<kind::DivisionByZero>(), "{}", source);
                continue;
            };

            let printed = first.to_string();
            let second = reduce_source(&printed).unwrap();
            assert_eq!(first, second, "{} printed as {}", source, printed);
            assert_eq!(second.to_string(), printed, "{}", source);
            checked += 1;
        }
        assert!(checked > 10_000);
    }
}
