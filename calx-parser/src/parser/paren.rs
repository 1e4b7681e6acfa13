use std::{fmt, ops::Range};
use crate::parser::{
    error::{kind, Error},
    expr::Expr,
    token::{CloseParen, OpenParen},
    Parse,
    Parser,
};
use crate::tokenizer::TokenKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parenthesized expression. Groupings are kept in the tree so that later stages can tell
/// `(a + b) + c` apart from `a + b + c`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this expression was parsed from, including the
    /// parentheses.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the grouping, parentheses included.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Strips every directly nested grouping, so `((x))` yields `x`.
    pub fn innermost(&self) -> &Expr {
        match self.expr.as_ref() {
            Expr::Paren(inner) => inner.innermost(),
            expr => expr,
        }
    }
}

impl Parse for Paren {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.try_parse::<OpenParen>()?;

        // `()` groups nothing
        if input.peek_kind() == Some(TokenKind::CloseParen) {
            let close = input.try_parse::<CloseParen>()?;
            return Err(Error::new_fatal(vec![open.span.start..close.span.end], kind::EmptyParenthesis));
        }

        let expr = Box::new(input.try_parse::<Expr>()?);
        match input.try_parse::<CloseParen>() {
            Ok(close) => Ok(Self { expr, span: open.span.start..close.span.end }),
            Err(_) => Err(Error::new_fatal(vec![open.span], kind::UnclosedParenthesis { opening: true })),
        }
    }
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.expr)
    }
}
