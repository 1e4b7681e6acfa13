use super::expr::Expression;

/// An iterator that traverses an [`Expression`] in left-to-right post-order, visiting every
/// operand before the expression that holds it.
///
/// This iterator is created by [`Expression::post_order_iter`].
pub struct ExpressionIter<'a> {
    stack: Vec<&'a Expression>,
    last_visited: Option<&'a Expression>,
}

impl<'a> ExpressionIter<'a> {
    /// Creates a new iterator rooted at `expr`.
    pub fn new(expr: &'a Expression) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }
}

impl<'a> Iterator for ExpressionIter<'a> {
    type Item = &'a Expression;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            let children = expr.children();

            // a node is ready once its last operand was the previous node visited
            let ready = match (children.last(), self.last_visited) {
                (None, _) => true,
                (Some(last), Some(visited)) => std::ptr::eq(last, visited),
                (Some(_), None) => false,
            };

            if ready {
                self.last_visited = self.stack.pop();
                return self.last_visited;
            }

            self.stack.extend(children.iter().rev());
        }
    }
}
