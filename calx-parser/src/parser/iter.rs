use super::expr::Expr;

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first).
///
/// This iterator is created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression matches the last visited expression.
    fn is_last_visited(&self, expr: &'a Expr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }

    /// Visits the node on top of the stack if its last child was just visited, or if it has no
    /// children. Otherwise, pushes the children so that the leftmost one is visited first.
    fn descend<I>(&mut self, children: I) -> Option<Option<&'a Expr>>
    where
        I: DoubleEndedIterator<Item = &'a Expr> + Clone,
    {
        match children.clone().next_back() {
            Some(last) if !self.is_last_visited(last) => {
                self.stack.extend(children.rev());
                None
            },
            _ => Some(self.visit()),
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            let visited = match expr {
                Expr::Integer(_)
                    | Expr::Float(_)
                    | Expr::Literal(_)
                    | Expr::Variable(_) => Some(self.visit()),
                Expr::Paren(paren) => self.descend(std::iter::once(&*paren.expr)),
                Expr::Binary(binary) => self.descend([&*binary.lhs, &*binary.rhs].into_iter()),
                Expr::Unary(unary) => self.descend(std::iter::once(&*unary.operand)),
                Expr::Assign(assign) => self.descend(std::iter::once(&*assign.value)),
                Expr::Relation(relation) => self.descend([&*relation.lhs, &*relation.rhs].into_iter()),
                Expr::Logical(logical) => self.descend([&*logical.lhs, &*logical.rhs].into_iter()),
                Expr::Not(not) => self.descend(std::iter::once(&*not.operand)),
                Expr::Call(call) => self.descend(call.args.iter()),
                Expr::NativeCall(call) => self.descend(call.args.iter()),
                Expr::Vector(vector) => self.descend(vector.elements.iter()),
                Expr::Matrix(matrix) => self.descend(matrix.rows.iter().flatten()),
            };

            if let Some(visited) = visited {
                return visited;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::parser::parse;

    /// Renders each visited expression.
    fn order(source: &str) -> Vec<String> {
        let expr = parse(source).unwrap();
        expr.post_order_iter().map(|expr| expr.to_string()).collect()
    }

    #[test]
    fn binary_children_first() {
        assert_eq!(order("1 + 2 * x"), vec!["1", "2", "x", "2 * x", "1 + 2 * x"]);
    }

    #[test]
    fn calls_and_groupings() {
        assert_eq!(order("f(a, (b))!"), vec!["a", "b", "(b)", "f(a, (b))", "f(a, (b))!"]);
    }

    #[test]
    fn empty_call_is_a_leaf() {
        assert_eq!(order("g()"), vec!["g()"]);
    }

    #[test]
    fn matrix_elements_in_row_order() {
        assert_eq!(order("[[1, 2], [3, 4]]"), vec!["1", "2", "3", "4", "[[1, 2], [3, 4]]"]);
    }
}
