use std::{fmt, ops::Range};
use crate::parser::{
    error::{kind, Error},
    expr::Expr,
    logic::{Logical, Relation},
    token::op::{BinOp, BinOpKind, InfixOp},
    unary::Unary,
    Associativity,
    Parser,
    Precedence,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An arithmetic operation with two operands, such as `1 + 2` or `x^2`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    pub lhs: Box<Expr>,
    pub op: BinOp,
    pub rhs: Box<Expr>,

    /// From the start of `lhs` to the end of `rhs`.
    pub span: Range<usize>,
}

impl Binary {
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Creates the node representing `lhs op rhs`.
    fn build(lhs: Expr, op: InfixOp, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match op {
            InfixOp::Bin(op) => Expr::Binary(Binary { lhs, op, rhs, span }),
            InfixOp::Rel(op) => Expr::Relation(Relation { lhs, op, rhs, span }),
            InfixOp::Logic(op) => Expr::Logical(Logical { lhs, op, rhs, span }),
        }
    }

    /// Finishes `lhs op rhs` once `rhs` has been parsed.
    ///
    /// Operators following `rhs` that bind tighter than `op`, or as tightly when they are
    /// right-associative, belong to `rhs`: in `3 + 4 * 5` the `* 5` is folded into `rhs` before
    /// the sum is built. Anything looser is left for the caller's loop.
    fn complete_rhs(
        input: &mut Parser,
        lhs: Expr,
        op: InfixOp,
        mut rhs: Expr,
    ) -> Result<Expr, Error> {
        let bound = op.precedence();

        while let Ok(next) = input.clone().try_parse::<InfixOp>() {
            let next_bound = next.precedence();
            let claims_rhs = next_bound > bound
                || (next_bound == bound && next.associativity() == Associativity::Right);
            if !claims_rhs {
                break;
            }
            rhs = Self::parse_expr(input, rhs, next_bound)?;
        }

        Ok(Self::build(lhs, op, rhs))
    }

    /// Parses a chain of operators and operands starting with the already-parsed `lhs`, consuming
    /// only operators whose precedence is at least `precedence`.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<Expr, Error> {
        loop {
            let mut lookahead = input.clone();
            let Ok(op) = lookahead.try_parse_then::<InfixOp, _>(|op, input| {
                if op.precedence() >= precedence {
                    Ok(())
                } else {
                    Err(input.error(kind::NonFatal))
                }
            }) else {
                break;
            };

            input.set_cursor(&lookahead);
            let rhs = Unary::parse_or_lower(input)?;
            lhs = Self::complete_rhs(input, lhs, op, rhs)?;
        }

        Ok(lhs)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.kind {
            BinOpKind::Exp => write!(f, "{}{}{}", self.lhs, self.op, self.rhs),
            _ => write!(f, "{} {} {}", self.lhs, self.op, self.rhs),
        }
    }
}
