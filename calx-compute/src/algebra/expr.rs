use rug::{Integer, Rational};
use super::iter::ExpressionIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The operands of a compound [`Expression`], together with the number of explicit groupings
/// written around it in the source.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// The operands, in order.
    pub operands: Vec<Expression>,

    /// How many pairs of parentheses surrounded this node in the source. This only affects how
    /// the node is printed.
    pub paren_level: u32,
}

impl Node {
    /// Creates an ungrouped node with the given operands.
    pub fn new(operands: Vec<Expression>) -> Self {
        Self { operands, paren_level: 0 }
    }
}

/// Nodes compare by their operands only; groupings are ignored.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.operands == other.operands
    }
}

impl Eq for Node {}

/// An algebraic expression, the canonical form produced by [`reduce`](super::reduce).
///
/// Unlike the syntax tree it is built from, an [`Expression`] has no spans, and sums may hold any
/// number of terms. Equality is structural and ordered, and ignores the
/// [`paren_level`](Node::paren_level) of every node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expression {
    /// An integer.
    Int(Integer),

    /// A rational number in lowest terms whose denominator is greater than 1.
    Rational(Rational),

    /// An unresolved symbol.
    Sym(String),

    /// Two or more terms added together.
    Sum(Node),

    /// Two or more factors multiplied together.
    Product(Node),

    /// `[minuend, subtrahend]`.
    Difference(Node),

    /// `[dividend, divisor]`.
    Quotient(Node),

    /// `[base, exponent]`.
    Power(Node),

    /// `[operand]`.
    Factorial(Node),

    /// A call to a named function.
    FunCall(String, Node),
}

/// An operation over every kind of [`Expression`].
pub trait ExpressionVisitor {
    /// The result of visiting an expression.
    type Output;

    fn visit_int(&mut self, int: &Integer) -> Self::Output;
    fn visit_rational(&mut self, rational: &Rational) -> Self::Output;
    fn visit_sym(&mut self, name: &str) -> Self::Output;
    fn visit_sum(&mut self, node: &Node) -> Self::Output;
    fn visit_product(&mut self, node: &Node) -> Self::Output;
    fn visit_difference(&mut self, node: &Node) -> Self::Output;
    fn visit_quotient(&mut self, node: &Node) -> Self::Output;
    fn visit_power(&mut self, node: &Node) -> Self::Output;
    fn visit_factorial(&mut self, node: &Node) -> Self::Output;
    fn visit_fun_call(&mut self, name: &str, node: &Node) -> Self::Output;
}

impl Expression {
    /// Creates an integer expression.
    pub fn int(n: impl Into<Integer>) -> Self {
        Expression::Int(n.into())
    }

    /// Creates a symbol.
    pub fn sym(name: impl Into<String>) -> Self {
        Expression::Sym(name.into())
    }

    /// Creates the number `numer / denom` in lowest terms, as an [`Expression::Int`] if the
    /// denominator divides the numerator. Returns [`None`] if `denom` is zero.
    pub fn rational(numer: impl Into<Integer>, denom: impl Into<Integer>) -> Option<Self> {
        let denom = denom.into();
        if denom == 0 {
            return None;
        }
        Some(Self::from_rational(Rational::from((numer.into(), denom))))
    }

    /// Wraps a rational, normalizing a denominator of 1 to an [`Expression::Int`].
    pub fn from_rational(rational: Rational) -> Self {
        if *rational.denom() == 1 {
            Expression::Int(rational.into_numer_denom().0)
        } else {
            Expression::Rational(rational)
        }
    }

    /// Creates a sum of the given terms.
    pub fn sum(terms: Vec<Expression>) -> Self {
        Expression::Sum(Node::new(terms))
    }

    /// Creates a product of the given factors.
    pub fn product(factors: Vec<Expression>) -> Self {
        Expression::Product(Node::new(factors))
    }

    /// Creates `lhs - rhs`.
    pub fn difference(lhs: Expression, rhs: Expression) -> Self {
        Expression::Difference(Node::new(vec![lhs, rhs]))
    }

    /// Creates `lhs / rhs`.
    pub fn quotient(lhs: Expression, rhs: Expression) -> Self {
        Expression::Quotient(Node::new(vec![lhs, rhs]))
    }

    /// Creates `base ^ exponent`.
    pub fn power(base: Expression, exponent: Expression) -> Self {
        Expression::Power(Node::new(vec![base, exponent]))
    }

    /// Creates `operand!`.
    pub fn factorial(operand: Expression) -> Self {
        Expression::Factorial(Node::new(vec![operand]))
    }

    /// Creates a call to the named function.
    pub fn fun_call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunCall(name.into(), Node::new(args))
    }

    /// Returns the node holding the operands of a compound expression.
    pub fn node(&self) -> Option<&Node> {
        match self {
            Expression::Int(_) | Expression::Rational(_) | Expression::Sym(_) => None,
            Expression::Sum(node)
                | Expression::Product(node)
                | Expression::Difference(node)
                | Expression::Quotient(node)
                | Expression::Power(node)
                | Expression::Factorial(node)
                | Expression::FunCall(_, node) => Some(node),
        }
    }

    /// Returns a mutable reference to the node holding the operands of a compound expression.
    pub fn node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Expression::Int(_) | Expression::Rational(_) | Expression::Sym(_) => None,
            Expression::Sum(node)
                | Expression::Product(node)
                | Expression::Difference(node)
                | Expression::Quotient(node)
                | Expression::Power(node)
                | Expression::Factorial(node)
                | Expression::FunCall(_, node) => Some(node),
        }
    }

    /// Returns true if the expression has no operands.
    pub fn is_atom(&self) -> bool {
        self.node().is_none()
    }

    /// Returns true if the expression is an integer or a rational.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Expression::Int(_) | Expression::Rational(_))
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expression::Int(n) if *n == 0)
    }

    /// Returns the value of a numeric expression as a rational.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Expression::Int(n) => Some(Rational::from(n)),
            Expression::Rational(r) => Some(r.clone()),
            _ => None,
        }
    }

    /// Returns the number of operands of a compound expression, or [`None`] for an atom.
    pub fn operand_count(&self) -> Option<usize> {
        self.node().map(|node| node.operands.len())
    }

    /// Returns the operand at the given index, or [`None`] for an atom or an index out of range.
    pub fn operand(&self, index: usize) -> Option<&Expression> {
        self.node().and_then(|node| node.operands.get(index))
    }

    /// Returns the immediate operands of the expression. Atoms have none.
    pub fn children(&self) -> &[Expression] {
        self.node().map(|node| node.operands.as_slice()).unwrap_or(&[])
    }

    /// Calls `f` on each immediate operand, in order. This does not recurse.
    pub fn for_each_child(&self, f: impl FnMut(&Expression)) {
        self.children().iter().for_each(f);
    }

    /// Returns the number of groupings around the expression. Atoms are never grouped.
    pub fn paren_level(&self) -> u32 {
        self.node().map_or(0, |node| node.paren_level)
    }

    /// Records one more grouping around a compound expression. Atoms are left unchanged.
    pub fn add_paren_level(&mut self) {
        if let Some(node) = self.node_mut() {
            node.paren_level += 1;
        }
    }

    /// Dispatches to the visitor method matching this expression.
    pub fn accept<V: ExpressionVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expression::Int(n) => visitor.visit_int(n),
            Expression::Rational(r) => visitor.visit_rational(r),
            Expression::Sym(name) => visitor.visit_sym(name),
            Expression::Sum(node) => visitor.visit_sum(node),
            Expression::Product(node) => visitor.visit_product(node),
            Expression::Difference(node) => visitor.visit_difference(node),
            Expression::Quotient(node) => visitor.visit_quotient(node),
            Expression::Power(node) => visitor.visit_power(node),
            Expression::Factorial(node) => visitor.visit_factorial(node),
            Expression::FunCall(name, node) => visitor.visit_fun_call(name, node),
        }
    }

    /// Returns an iterator over every expression in the tree, children before their parents.
    pub fn post_order_iter(&self) -> ExpressionIter<'_> {
        ExpressionIter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn rational_normalization() {
        assert_eq!(Expression::rational(6, 3), Some(Expression::int(2)));
        assert_eq!(Expression::rational(14, 4), Some(Expression::Rational(Rational::from((7, 2)))));
        assert_eq!(Expression::rational(-3, 6), Some(Expression::Rational(Rational::from((-1, 2)))));
        assert_eq!(Expression::rational(1, 0), None);
    }

    #[test]
    fn equality_ignores_groupings() {
        let mut grouped = Expression::sum(vec![Expression::sym("a"), Expression::sym("b")]);
        grouped.add_paren_level();
        grouped.add_paren_level();

        let plain = Expression::sum(vec![Expression::sym("a"), Expression::sym("b")]);
        assert_eq!(grouped.paren_level(), 2);
        assert_eq!(grouped, plain);
        assert_ne!(plain, Expression::sum(vec![Expression::sym("b"), Expression::sym("a")]));
        assert_ne!(plain, Expression::product(vec![Expression::sym("a"), Expression::sym("b")]));
    }

    #[test]
    fn atoms_have_no_operands() {
        let mut atom = Expression::sym("x");
        atom.add_paren_level();
        assert_eq!(atom.paren_level(), 0);
        assert_eq!(atom.operand_count(), None);
        assert_eq!(atom.operand(0), None);
        assert!(atom.children().is_empty());
    }

    #[test]
    fn operands_and_children() {
        let expr = Expression::quotient(Expression::int(1), Expression::sym("y"));
        assert_eq!(expr.operand_count(), Some(2));
        assert_eq!(expr.operand(1), Some(&Expression::sym("y")));
        assert_eq!(expr.operand(2), None);

        let mut seen = Vec::new();
        expr.for_each_child(|child| seen.push(child.clone()));
        assert_eq!(seen, vec![Expression::int(1), Expression::sym("y")]);
    }

    #[test]
    fn clone_is_deep() {
        let original = Expression::power(
            Expression::sum(vec![Expression::sym("a"), Expression::int(1)]),
            Expression::int(2),
        );
        let mut copy = original.clone();
        if let Some(node) = copy.node_mut() {
            node.operands[0] = Expression::sym("b");
        }
        assert_eq!(original.operand(0), Some(&Expression::sum(vec![Expression::sym("a"), Expression::int(1)])));
        assert_ne!(original, copy);
    }
}
