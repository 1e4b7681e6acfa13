//! Re-serialization of [`Expression`]s into source text.
//!
//! Every compound is wrapped in as many parentheses as its [`paren_level`](Node::paren_level)
//! records. Ungrouped operands get the parentheses their precedence requires, so that the
//! printed text parses and reduces back to an equal tree.

use calx_parser::parser::Precedence;
use rug::{Integer, Rational};
use std::fmt;
use super::expr::{Expression, ExpressionVisitor, Node};

/// Returns the precedence of the operator that binds an expression together, as the parser sees
/// it. Grouped expressions bind as tightly as a literal.
fn precedence(expr: &Expression) -> Precedence {
    if expr.paren_level() > 0 {
        return Precedence::Primary;
    }

    match expr {
        Expression::Int(n) if *n < 0 => Precedence::Neg,
        Expression::Int(_) | Expression::Sym(_) | Expression::FunCall(..) => Precedence::Primary,
        // `n/d` is a quotient once printed
        Expression::Rational(_) => Precedence::Factor,
        Expression::Sum(_) | Expression::Difference(_) => Precedence::Term,
        Expression::Product(_) | Expression::Quotient(_) => Precedence::Factor,
        Expression::Power(_) => Precedence::Exp,
        Expression::Factorial(_) => Precedence::Factorial,
    }
}

/// Writes an [`Expression`] to a formatter.
pub struct Printer<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl<'a, 'b> Printer<'a, 'b> {
    pub fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self { f }
    }

    /// Writes an operand of an operator with precedence `min`. With `strict`, an operand of equal
    /// precedence is also parenthesized, as on the non-associative side of the operator.
    fn operand(&mut self, expr: &Expression, min: Precedence, strict: bool) -> fmt::Result {
        let prec = precedence(expr);
        let needs_parens = if strict { prec <= min } else { prec < min };

        if needs_parens {
            write!(self.f, "(")?;
            expr.accept(self)?;
            write!(self.f, ")")
        } else {
            expr.accept(self)
        }
    }

    /// Writes the node's recorded groupings around `body`.
    fn grouped(
        &mut self,
        node: &Node,
        body: impl FnOnce(&mut Self) -> fmt::Result,
    ) -> fmt::Result {
        for _ in 0..node.paren_level {
            write!(self.f, "(")?;
        }
        body(self)?;
        for _ in 0..node.paren_level {
            write!(self.f, ")")?;
        }
        Ok(())
    }

    /// Writes the operands separated by `op`.
    fn infix(
        &mut self,
        node: &Node,
        op: &str,
        prec: Precedence,
        right_assoc: bool,
    ) -> fmt::Result {
        self.grouped(node, |printer| {
            for (i, operand) in node.operands.iter().enumerate() {
                if i > 0 {
                    write!(printer.f, "{}", op)?;
                }
                let strict = if right_assoc { i == 0 } else { i > 0 };
                printer.operand(operand, prec, strict)?;
            }
            Ok(())
        })
    }
}

impl ExpressionVisitor for Printer<'_, '_> {
    type Output = fmt::Result;

    fn visit_int(&mut self, int: &Integer) -> fmt::Result {
        write!(self.f, "{}", int)
    }

    fn visit_rational(&mut self, rational: &Rational) -> fmt::Result {
        write!(self.f, "{}/{}", rational.numer(), rational.denom())
    }

    fn visit_sym(&mut self, name: &str) -> fmt::Result {
        write!(self.f, "{}", name)
    }

    fn visit_sum(&mut self, node: &Node) -> fmt::Result {
        self.infix(node, " + ", Precedence::Term, false)
    }

    fn visit_product(&mut self, node: &Node) -> fmt::Result {
        self.infix(node, " * ", Precedence::Factor, false)
    }

    fn visit_difference(&mut self, node: &Node) -> fmt::Result {
        self.infix(node, " - ", Precedence::Term, false)
    }

    fn visit_quotient(&mut self, node: &Node) -> fmt::Result {
        self.infix(node, " / ", Precedence::Factor, false)
    }

    fn visit_power(&mut self, node: &Node) -> fmt::Result {
        self.infix(node, "^", Precedence::Exp, true)
    }

    fn visit_factorial(&mut self, node: &Node) -> fmt::Result {
        self.grouped(node, |printer| {
            for operand in &node.operands {
                printer.operand(operand, Precedence::Factorial, false)?;
            }
            write!(printer.f, "!")
        })
    }

    fn visit_fun_call(&mut self, name: &str, node: &Node) -> fmt::Result {
        self.grouped(node, |printer| {
            write!(printer.f, "{}(", name)?;
            for (i, arg) in node.operands.iter().enumerate() {
                if i > 0 {
                    write!(printer.f, ", ")?;
                }
                arg.accept(printer)?;
            }
            write!(printer.f, ")")
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.accept(&mut Printer::new(f))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> Expression {
        Expression::sym(name)
    }

    #[test]
    fn atoms() {
        assert_eq!(Expression::int(-4).to_string(), "-4");
        assert_eq!(Expression::rational(-3, 4).unwrap().to_string(), "-3/4");
        assert_eq!(sym("x").to_string(), "x");
    }

    #[test]
    fn groupings_are_printed() {
        let mut sum = Expression::sum(vec![sym("a"), sym("b")]);
        sum.add_paren_level();
        sum.add_paren_level();
        assert_eq!(sum.to_string(), "((a + b))");
    }

    #[test]
    fn precedence_parentheses() {
        let expr = Expression::product(vec![
            Expression::sum(vec![sym("a"), sym("b")]),
            sym("c"),
        ]);
        assert_eq!(expr.to_string(), "(a + b) * c");

        let expr = Expression::difference(sym("a"), Expression::difference(sym("b"), sym("c")));
        assert_eq!(expr.to_string(), "a - (b - c)");

        let expr = Expression::difference(Expression::difference(sym("a"), sym("b")), sym("c"));
        assert_eq!(expr.to_string(), "a - b - c");
    }

    #[test]
    fn powers_are_right_associative() {
        let right = Expression::power(sym("a"), Expression::power(sym("b"), sym("c")));
        assert_eq!(right.to_string(), "a^b^c");

        let left = Expression::power(Expression::power(sym("a"), sym("b")), sym("c"));
        assert_eq!(left.to_string(), "(a^b)^c");

        let negative_base = Expression::power(Expression::int(-2), Expression::int(2));
        assert_eq!(negative_base.to_string(), "(-2)^2");
    }

    #[test]
    fn negatives_and_rationals_as_operands() {
        let expr = Expression::product(vec![sym("x"), Expression::int(-1)]);
        assert_eq!(expr.to_string(), "x * -1");

        let expr = Expression::product(vec![sym("x"), Expression::rational(1, 2).unwrap()]);
        assert_eq!(expr.to_string(), "x * (1/2)");

        let expr = Expression::power(Expression::rational(1, 2).unwrap(), sym("n"));
        assert_eq!(expr.to_string(), "(1/2)^n");
    }

    #[test]
    fn factorials_and_calls() {
        let expr = Expression::factorial(Expression::factorial(sym("n")));
        assert_eq!(expr.to_string(), "n!!");

        let expr = Expression::factorial(Expression::sum(vec![sym("n"), Expression::int(1)]));
        assert_eq!(expr.to_string(), "(n + 1)!");

        let expr = Expression::fun_call("f", vec![sym("x"), Expression::sum(vec![sym("y"), sym("z")])]);
        assert_eq!(expr.to_string(), "f(x, y + z)");
    }
}
