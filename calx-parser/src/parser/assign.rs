use std::{fmt, ops::Range};
use crate::parser::{
    error::Error,
    expr::Expr,
    literal::LitSym,
    token::Assign as AssignToken,
    Parse,
    Parser,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An assignment to an existing variable, such as `x = 1`. Assignment is right-associative, so
/// `x = y = 1` assigns `1` to `y`, then to `x`.
///
/// Assignment never declares a variable: see [`LetStmt`](crate::parser::stmt::LetStmt).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assign {
    /// The variable being assigned to.
    pub target: LitSym,

    /// The value to assign.
    pub value: Box<Expr>,

    /// The region of the source code that this assignment was parsed from.
    pub span: Range<usize>,
}

impl Assign {
    /// Returns the span of the assignment.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Assign {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let target = input.try_parse::<LitSym>()?;
        input.try_parse::<AssignToken>()?;
        // `name =` can only be an assignment, so commit to it
        let value = input.try_parse::<Expr>().map_err(|mut err| {
            err.fatal = true;
            err
        })?;
        let span = target.span.start..value.span().end;
        Ok(Self {
            target,
            value: Box::new(value),
            span,
        })
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}
