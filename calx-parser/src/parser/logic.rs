use std::{fmt, ops::Range};
use crate::parser::{
    binary::Binary,
    error::Error,
    expr::Expr,
    token::{op::{LogicOp, RelOp}, Not as NotToken},
    unary::Unary,
    Parse,
    Parser,
    Precedence,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A comparison between two expressions, such as `a <= b`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Relation {
    /// The left-hand side of the comparison.
    pub lhs: Box<Expr>,

    /// The comparison operator.
    pub op: RelOp,

    /// The right-hand side of the comparison.
    pub rhs: Box<Expr>,

    /// The region of the source code that this comparison was parsed from.
    pub span: Range<usize>,
}

impl Relation {
    /// Returns the span of the comparison.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// A logical connective between two expressions, such as `a and b`. The right-hand side is only
/// evaluated if the left-hand side does not decide the result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Logical {
    /// The left-hand side of the connective.
    pub lhs: Box<Expr>,

    /// The logical operator.
    pub op: LogicOp,

    /// The right-hand side of the connective.
    pub rhs: Box<Expr>,

    /// The region of the source code that this connective was parsed from.
    pub span: Range<usize>,
}

impl Logical {
    /// Returns the span of the connective.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for Logical {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// A logical negation, such as `not a`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Not {
    /// The negated expression.
    pub operand: Box<Expr>,

    /// The region of the source code that this negation was parsed from.
    pub span: Range<usize>,
}

impl Not {
    /// Returns the span of the negation.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Not {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let keyword = input.try_parse::<NotToken>()?;

        // `not` binds as tightly as unary minus
        let lhs = Unary::parse_or_lower(input)?;
        let operand = Binary::parse_expr(input, lhs, Precedence::Neg)?;
        let span = keyword.span.start..operand.span().end;
        Ok(Self {
            operand: Box::new(operand),
            span,
        })
    }
}

impl fmt::Display for Not {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "not {}", self.operand)
    }
}
