use std::{fmt, ops::Range};
use crate::{
    parser::{
        binary::Binary,
        error::{kind, Error},
        expr::{parse_primary, Expr},
        logic::Not,
        token::op::{UnaryOp, UnaryOpKind},
        Associativity,
        Parse,
        Parser,
    },
    try_parse_catch_fatal,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parses a unary operator, but only one that is written on the given side of its operand.
fn try_parse_unary_op(input: &mut Parser, associativity: Associativity) -> Result<UnaryOp, Error> {
    input.try_parse_then::<UnaryOp, _>(|op, input| {
        (op.associativity() == associativity)
            .then_some(())
            .ok_or_else(|| input.error(kind::NonFatal))
    })
}

/// An operation with one operand: prefix `-x` or postfix `n!`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    pub operand: Box<Expr>,
    pub op: UnaryOp,
    pub span: Range<usize>,
}

impl Unary {
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a prefix negation, such as `-x`. The operand absorbs any operators that bind more
    /// tightly than negation, so `-x^2` is `-(x^2)`.
    fn parse_prefix(input: &mut Parser) -> Result<Expr, Error> {
        let op = try_parse_unary_op(input, Associativity::Right)?;
        let first = Unary::parse_or_lower(input)?;
        let operand = Binary::parse_expr(input, first, op.precedence())?;
        let span = op.span.start..operand.span().end;
        Ok(Expr::Unary(Self {
            operand: Box::new(operand),
            op,
            span,
        }))
    }

    /// Parses a primary expression followed by any number of postfix operators, such as `3!!`.
    fn parse_postfix(input: &mut Parser) -> Result<Expr, Error> {
        let mut operand = parse_primary(input)?;
        let start = operand.span().start;

        while let Ok(op) = try_parse_unary_op(input, Associativity::Left) {
            let span = start..op.span.end;
            operand = Expr::Unary(Self {
                operand: Box::new(operand),
                op,
                span,
            });
        }

        Ok(operand)
    }

    /// Parses `not x`, a prefix negation, or a primary expression with its postfix operators.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        let _ = try_parse_catch_fatal!(
            input.try_parse::<Not>().map(Expr::Not),
            input.try_parse_with_fn(Self::parse_prefix),
        );
        input.try_parse_with_fn(Self::parse_postfix)
    }
}

impl Parse for Unary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match Self::parse_or_lower(input)? {
            Expr::Unary(unary) => Ok(unary),
            expr => Err(Error::new(vec![expr.span()], kind::NonFatal)),
        }
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.kind {
            UnaryOpKind::Neg => write!(f, "{}{}", self.op, self.operand),
            UnaryOpKind::Factorial => write!(f, "{}{}", self.operand, self.op),
        }
    }
}
