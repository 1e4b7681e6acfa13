//! Structs to help parse binary, relational, logical and unary operators.

use crate::{
    parser::{
        error::{Error, kind},
        Associativity,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    Neg,
    Factorial,
}

impl UnaryOpKind {
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Neg => Precedence::Neg,
            Self::Factorial => Precedence::Factorial,
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Neg => Associativity::Right,
            Self::Factorial => Associativity::Left,
        }
    }
}

/// A unary operator token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    pub kind: UnaryOpKind,
    pub span: Range<usize>,
}

impl UnaryOp {
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for UnaryOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Sub => Ok(UnaryOpKind::Neg),
            TokenKind::Factorial => Ok(UnaryOpKind::Factorial),
            _ => Err(Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected: &[TokenKind::Sub, TokenKind::Factorial],
                found: token.kind,
            })),
        }?;

        Ok(Self {
            kind,
            span: token.span,
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            UnaryOpKind::Neg => write!(f, "-"),
            UnaryOpKind::Factorial => write!(f, "!"),
        }
    }
}

/// Which arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Add,
    Sub,
}

impl BinOpKind {
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Exp => Precedence::Exp,
            Self::Mul | Self::Div => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Exp => Associativity::Right,
            Self::Mul | Self::Div | Self::Add | Self::Sub => Associativity::Left,
        }
    }
}

/// An arithmetic operator that takes two operands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    pub kind: BinOpKind,
    pub span: Range<usize>,
}

impl BinOp {
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            BinOpKind::Exp => write!(f, "^"),
            BinOpKind::Mul => write!(f, "*"),
            BinOpKind::Div => write!(f, "/"),
            BinOpKind::Add => write!(f, "+"),
            BinOpKind::Sub => write!(f, "-"),
        }
    }
}

/// Which comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RelOpKind {
    Eq,
    NotEq,
    Greater,
    GreaterEq,
    Less,
    LessEq,
}

/// A comparison operator, such as `<` or `==`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelOp {
    pub kind: RelOpKind,
    pub span: Range<usize>,
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            RelOpKind::Eq => write!(f, "=="),
            RelOpKind::NotEq => write!(f, "!="),
            RelOpKind::Greater => write!(f, ">"),
            RelOpKind::GreaterEq => write!(f, ">="),
            RelOpKind::Less => write!(f, "<"),
            RelOpKind::LessEq => write!(f, "<="),
        }
    }
}

/// Which connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LogicOpKind {
    And,
    Or,
}

/// A logical operator, `and` (`&&`) or `or` (`||`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogicOp {
    pub kind: LogicOpKind,
    pub span: Range<usize>,
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            LogicOpKind::And => write!(f, "and"),
            LogicOpKind::Or => write!(f, "or"),
        }
    }
}

/// Any operator that appears between two operands. The precedence climbing parser works on this
/// type, and builds the matching node once both operands are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfixOp {
    /// An arithmetic operator.
    Bin(BinOp),

    /// A comparison operator.
    Rel(RelOp),

    /// A logical operator.
    Logic(LogicOp),
}

impl InfixOp {
    /// Returns the precedence of the operator.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Bin(op) => op.precedence(),
            Self::Rel(_) => Precedence::Compare,
            Self::Logic(op) => match op.kind {
                LogicOpKind::And => Precedence::And,
                LogicOpKind::Or => Precedence::Or,
            },
        }
    }

    /// Returns the associativity of the operator.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Bin(op) => op.associativity(),
            Self::Rel(_) | Self::Logic(_) => Associativity::Left,
        }
    }
}

impl Parse for InfixOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let span = token.span.clone();
        let bin = |kind: BinOpKind| -> Result<Self, Error> {
            Ok(Self::Bin(BinOp { kind, span: span.clone() }))
        };
        let rel = |kind: RelOpKind| -> Result<Self, Error> {
            Ok(Self::Rel(RelOp { kind, span: span.clone() }))
        };
        let logic = |kind: LogicOpKind| -> Result<Self, Error> {
            Ok(Self::Logic(LogicOp { kind, span: span.clone() }))
        };

        match token.kind {
            TokenKind::Exp => bin(BinOpKind::Exp),
            TokenKind::Mul => bin(BinOpKind::Mul),
            TokenKind::Div => bin(BinOpKind::Div),
            TokenKind::Add => bin(BinOpKind::Add),
            TokenKind::Sub => bin(BinOpKind::Sub),
            TokenKind::Eq => rel(RelOpKind::Eq),
            TokenKind::NotEq => rel(RelOpKind::NotEq),
            TokenKind::Greater => rel(RelOpKind::Greater),
            TokenKind::GreaterEq => rel(RelOpKind::GreaterEq),
            TokenKind::Less => rel(RelOpKind::Less),
            TokenKind::LessEq => rel(RelOpKind::LessEq),
            TokenKind::And => logic(LogicOpKind::And),
            TokenKind::Or => logic(LogicOpKind::Or),
            _ => Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Exp,
                    TokenKind::Mul,
                    TokenKind::Div,
                    TokenKind::Add,
                    TokenKind::Sub,
                    TokenKind::Eq,
                    TokenKind::NotEq,
                    TokenKind::Greater,
                    TokenKind::GreaterEq,
                    TokenKind::Less,
                    TokenKind::LessEq,
                    TokenKind::And,
                    TokenKind::Or,
                ],
                found: token.kind,
            })),
        }
    }
}
