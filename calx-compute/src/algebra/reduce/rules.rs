//! Rewrite rules applied while building sums, products and quotients.

use crate::{algebra::expr::{Expression, Node}, error::{kind, Error}};
use rug::{Integer, Rational};
use std::ops::Range;
use tracing::trace;

/// Adds two expressions.
///
/// Two numbers are folded into one. Anything else becomes a sum that is immediately
/// [gathered](gather).
pub fn add(lhs: Expression, rhs: Expression) -> Expression {
    match (lhs, rhs) {
        (Expression::Int(a), Expression::Int(b)) => {
            trace!(%a, %b, "fold integer sum");
            Expression::Int(a + b)
        },
        (lhs, rhs) => match (lhs.as_rational(), rhs.as_rational()) {
            (Some(a), Some(b)) => {
                trace!(%a, %b, "fold rational sum");
                Expression::from_rational(a + b)
            },
            _ => gather(vec![lhs, rhs]),
        },
    }
}

/// Multiplies two expressions.
///
/// If one side is a sum and the other an atom, the atom is distributed over the terms of the sum
/// from the side it was written on, and the resulting sum is gathered. Otherwise the result is a
/// plain product.
pub fn multiply(lhs: Expression, rhs: Expression) -> Expression {
    match (lhs, rhs) {
        (Expression::Sum(node), atom) if atom.is_atom() => {
            trace!(terms = node.operands.len(), factor = %atom, "distribute from the right");
            let terms = node.operands
                .into_iter()
                .map(|term| multiply(term, atom.clone()))
                .collect();
            gather(terms)
        },
        (atom, Expression::Sum(node)) if atom.is_atom() => {
            trace!(terms = node.operands.len(), factor = %atom, "distribute from the left");
            let terms = node.operands
                .into_iter()
                .map(|term| multiply(atom.clone(), term))
                .collect();
            gather(terms)
        },
        (lhs, rhs) => Expression::product(vec![lhs, rhs]),
    }
}

/// Divides two expressions. `rhs_span` is where the divisor was written.
///
/// Dividing an integer by an integer produces an exact rational in lowest terms, and fails if the
/// divisor is zero. Any other division is kept as a quotient, even by zero.
pub fn divide(lhs: Expression, rhs: Expression, rhs_span: Range<usize>) -> Result<Expression, Error> {
    let division_by_zero = || Error::new(vec![rhs_span.clone()], kind::DivisionByZero);

    match (lhs, rhs) {
        (Expression::Int(_), divisor) if divisor.is_zero() => Err(division_by_zero()),
        (Expression::Int(numer), Expression::Int(denom)) => {
            trace!(%numer, %denom, "fold integer quotient");
            Expression::rational(numer, denom).ok_or_else(division_by_zero)
        },
        (lhs, rhs) => Ok(Expression::quotient(lhs, rhs)),
    }
}

/// Negates an expression. Numbers are negated directly, and anything else is multiplied by `-1`.
pub fn negate(expr: Expression) -> Expression {
    match expr {
        Expression::Int(n) => Expression::Int(-n),
        Expression::Rational(r) => Expression::Rational(-r),
        expr => Expression::product(vec![Expression::int(-1), expr]),
    }
}

/// Splits a term into its numeric coefficient and the rest of the term. Only a product of exactly
/// a number and one other factor has a coefficient other than 1.
fn split_coefficient(term: &Expression) -> (Rational, &Expression) {
    if let Expression::Product(Node { operands, .. }) = term {
        if let [coefficient, rest] = operands.as_slice() {
            if let (Some(coefficient), false) = (coefficient.as_rational(), rest.is_numeric()) {
                return (coefficient, rest);
            }
        }
    }
    (Rational::from(1), term)
}

/// Terms of a sum that differ only by their coefficient.
struct LikeTerms {
    /// The position of the first of these terms among the non-numeric terms of the sum.
    first: usize,

    /// The sum of the coefficients.
    coefficient: Rational,

    /// The term without its coefficient.
    base: Expression,

    /// The term as it was written, until another like term is combined with it.
    original: Option<Expression>,
}

impl LikeTerms {
    /// Turns the group back into a single term, or [`None`] if the coefficients cancelled out.
    fn into_term(self) -> Option<Expression> {
        if self.coefficient == 0 {
            return None;
        }

        Some(match self.original {
            Some(original) => original,
            None if self.coefficient == 1 => self.base,
            None => Expression::product(vec![Expression::from_rational(self.coefficient), self.base]),
        })
    }
}

/// Gathers the terms of a sum into canonical form.
///
/// - Terms that are themselves sums are flattened into this one, grouped or not.
/// - Numeric terms are folded into a single constant, placed where the first of them was. A zero
///   constant is dropped.
/// - Like terms are combined (`a + a` becomes `2 * a`), and terms whose coefficients cancel out
///   are dropped.
/// - A sum left with no terms is `0`, and a sum of one term is that term.
pub fn gather(terms: Vec<Expression>) -> Expression {
    let mut flat = Vec::with_capacity(terms.len());
    for term in terms {
        match term {
            Expression::Sum(node) => flat.extend(node.operands),
            term => flat.push(term),
        }
    }

    let mut constant: Option<(usize, Rational)> = None;
    let mut symbolic = Vec::with_capacity(flat.len());
    for term in flat {
        match term.as_rational() {
            Some(value) => {
                if let Some((_, total)) = constant.as_mut() {
                    *total += value;
                } else {
                    constant = Some((symbolic.len(), value));
                }
            },
            None => symbolic.push(term),
        }
    }

    let mut groups: Vec<LikeTerms> = Vec::new();
    for (index, term) in symbolic.into_iter().enumerate() {
        let (coefficient, base) = split_coefficient(&term);
        match groups.iter_mut().find(|group| group.base == *base) {
            Some(group) => {
                group.coefficient += coefficient;
                group.original = None;
            },
            None => {
                let base = base.clone();
                groups.push(LikeTerms { first: index, coefficient, base, original: Some(term) });
            },
        }
    }

    let mut gathered = groups
        .into_iter()
        .filter_map(|group| {
            let first = group.first;
            group.into_term().map(|term| (first, term))
        })
        .collect::<Vec<_>>();

    if let Some((at, value)) = constant {
        if value != 0 {
            let position = gathered
                .iter()
                .position(|(first, _)| *first >= at)
                .unwrap_or(gathered.len());
            gathered.insert(position, (at, Expression::from_rational(value)));
        }
    }

    trace!(terms = gathered.len(), "gathered sum");
    let mut terms = gathered.into_iter().map(|(_, term)| term).collect::<Vec<_>>();
    match terms.len() {
        0 => Expression::Int(Integer::new()),
        1 => terms.remove(0),
        _ => Expression::sum(terms),
    }
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

    #[test]
    fn numeric_sums_fold() {
        assert_eq!(add(int(2), int(3)), int(5));
        assert_eq!(add(Expression::rational(1, 2).unwrap(), int(1)), Expression::rational(3, 2).unwrap());
        assert_eq!(add(Expression::rational(1, 2).unwrap(), Expression::rational(1, 2).unwrap()), int(1));
    }

    #[test]
    fn constants_fold_in_place() {
        let sum = gather(vec![sym("a"), int(1), sym("b"), int(2)]);
        assert_eq!(sum, Expression::sum(vec![sym("a"), int(3), sym("b")]));

        let sum = gather(vec![int(1), sym("a"), int(-1)]);
        assert_eq!(sum, sym("a"));
    }

    #[test]
    fn like_terms_combine() {
        assert_eq!(gather(vec![sym("a"), sym("a")]), Expression::product(vec![int(2), sym("a")]));

        let sum = gather(vec![
            Expression::product(vec![int(2), sym("a")]),
            sym("b"),
            Expression::product(vec![int(3), sym("a")]),
        ]);
        assert_eq!(sum, Expression::sum(vec![Expression::product(vec![int(5), sym("a")]), sym("b")]));
    }

    #[test]
    fn cancelled_terms_are_dropped() {
        let sum = gather(vec![sym("a"), Expression::product(vec![int(-1), sym("a")])]);
        assert_eq!(sum, int(0));

        let sum = gather(vec![Expression::product(vec![int(0), sym("a")]), sym("b")]);
        assert_eq!(sum, sym("b"));
    }

    #[test]
    fn grouped_sums_are_flattened() {
        let mut inner = Expression::sum(vec![sym("a"), sym("b")]);
        inner.add_paren_level();
        let sum = gather(vec![inner, sym("c")]);
        assert_eq!(sum, Expression::sum(vec![sym("a"), sym("b"), sym("c")]));
        assert_eq!(sum.paren_level(), 0);

        let mut inner = Expression::sum(vec![sym("x"), int(1)]);
        inner.add_paren_level();
        let sum = gather(vec![inner, sym("x")]);
        assert_eq!(sum, Expression::sum(vec![Expression::product(vec![int(2), sym("x")]), int(1)]));
    }

    #[test]
    fn distribution() {
        let sum = Expression::sum(vec![sym("b"), sym("c")]);
        assert_eq!(
            multiply(sym("a"), sum.clone()),
            Expression::sum(vec![
                Expression::product(vec![sym("a"), sym("b")]),
                Expression::product(vec![sym("a"), sym("c")]),
            ]),
        );
        assert_eq!(
            multiply(sum, int(2)),
            Expression::sum(vec![
                Expression::product(vec![sym("b"), int(2)]),
                Expression::product(vec![sym("c"), int(2)]),
            ]),
        );

        let power = Expression::power(sym("x"), int(2));
        let sum = Expression::sum(vec![sym("b"), sym("c")]);
        assert_eq!(multiply(power.clone(), sum.clone()), Expression::product(vec![power, sum]));
    }

    #[test]
    fn quotients() {
        assert_eq!(divide(int(6), int(3), 4..5).unwrap(), int(2));
        assert_eq!(divide(int(7), int(2), 4..5).unwrap(), Expression::rational(7, 2).unwrap());
        assert_eq!(divide(sym("x"), int(2), 4..5).unwrap(), Expression::quotient(sym("x"), int(2)));

        let err = divide(int(3), int(0), 4..5).unwrap_err();
        assert!(err.is::<kind::DivisionByZero>());
        assert_eq!(err.spans, vec![4..5]);

        assert_eq!(divide(sym("x"), int(0), 4..5).unwrap(), Expression::quotient(sym("x"), int(0)));
        assert_eq!(
            divide(Expression::rational(1, 2).unwrap(), int(0), 4..5).unwrap(),
            Expression::quotient(Expression::rational(1, 2).unwrap(), int(0)),
        );
    }

    #[test]
    fn negation() {
        assert_eq!(negate(int(3)), int(-3));
        assert_eq!(negate(Expression::rational(1, 2).unwrap()), Expression::rational(-1, 2).unwrap());
        assert_eq!(negate(sym("x")), Expression::product(vec![int(-1), sym("x")]));
    }
}
