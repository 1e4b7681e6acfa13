use std::{fmt, ops::Range};
use crate::{
    parser::{
        assign::Assign,
        binary::Binary,
        call::{Call, NativeCall},
        error::{kind, Error},
        iter::ExprIter,
        literal::{LitFloat, LitInt, LitSym, Literal},
        logic::{Logical, Not, Relation},
        paren::Paren,
        token::CloseParen,
        unary::Unary,
        vector::{Matrix, Vector},
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
    try_parse_catch_fatal,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The tokens that can begin a primary expression.
const PRIMARY_TOKENS: &[TokenKind] = &[
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Boolean,
    TokenKind::Str,
    TokenKind::Name,
    TokenKind::OpenParen,
    TokenKind::OpenSquare,
];

/// A node of the expression syntax tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// An integer literal, such as `42`.
    Integer(LitInt),

    /// A floating-point literal, such as `4.2`.
    Float(LitFloat),

    /// A boolean or string literal.
    Literal(Literal),

    /// A reference to a variable, such as `x`.
    Variable(LitSym),

    /// `( expr )`.
    Paren(Paren),

    /// An arithmetic operation, such as `1 + 2`.
    Binary(Binary),

    /// A negation or factorial, such as `-x` or `n!`.
    Unary(Unary),

    /// An assignment to an existing variable, such as `x = 1`.
    Assign(Assign),

    /// A comparison, such as `a < b`.
    Relation(Relation),

    /// A logical connective, such as `a and b`.
    Logical(Logical),

    /// A logical negation, such as `not a`.
    Not(Not),

    /// A call to a user-defined function, such as `f(1, 2)`.
    Call(Call),

    /// A call to a built-in numeric function, such as `sin(x)`.
    NativeCall(NativeCall),

    /// A vector literal, such as `[1, 2, 3]`.
    Vector(Vector),

    /// A matrix literal, such as `[[1, 2], [3, 4]]`.
    Matrix(Matrix),
}

impl Expr {
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Integer(int) => int.span.clone(),
            Expr::Float(float) => float.span.clone(),
            Expr::Literal(literal) => literal.span(),
            Expr::Variable(sym) => sym.span.clone(),
            Expr::Paren(paren) => paren.span(),
            Expr::Binary(binary) => binary.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Assign(assign) => assign.span(),
            Expr::Relation(relation) => relation.span(),
            Expr::Logical(logical) => logical.span(),
            Expr::Not(not) => not.span(),
            Expr::Call(call) => call.span(),
            Expr::NativeCall(call) => call.span(),
            Expr::Vector(vector) => vector.span(),
            Expr::Matrix(matrix) => matrix.span(),
        }
    }

    /// Visits every node of the tree, children before parents, left to right.
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Strips any number of enclosing parentheses.
    pub fn innermost(&self) -> &Expr {
        match self {
            Expr::Paren(paren) => paren.innermost(),
            expr => expr,
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if let Ok(close) = input.clone().try_parse::<CloseParen>() {
            return Err(Error::new_fatal(vec![close.span], kind::UnclosedParenthesis { opening: false }));
        }

        let _ = try_parse_catch_fatal!(input.try_parse::<Assign>().map(Self::Assign));
        let lhs = input.try_parse_with_fn(Unary::parse_or_lower)?;
        let expr = Binary::parse_expr(input, lhs, Precedence::Any)?;

        // a valid assignment would have been parsed above
        if input.peek_kind() == Some(TokenKind::Assign) {
            return Err(Error::new_fatal(vec![expr.span()], kind::InvalidAssignmentTarget));
        }

        Ok(expr)
    }
}

/// Parses a primary expression: a literal, a name, a call, a parenthesized expression, or a
/// vector / matrix literal.
pub fn parse_primary(input: &mut Parser) -> Result<Expr, Error> {
    // function calls can overlap with names, so we need to try parsing a function call first
    let _ = try_parse_catch_fatal!(
        input.try_parse_with_fn(Call::parse_expr),
        input.try_parse::<LitInt>().map(Expr::Integer),
        input.try_parse::<LitFloat>().map(Expr::Float),
        input.try_parse::<Literal>().map(Expr::Literal),
        input.try_parse::<LitSym>().map(Expr::Variable),
        input.try_parse::<Paren>().map(Expr::Paren),
        input.try_parse_with_fn(Vector::parse_expr),
    );

    let token = input.clone().next_token()?;
    Err(Error::new(vec![token.span], kind::UnexpectedToken {
        expected: PRIMARY_TOKENS,
        found: token.kind,
    }))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Integer(int) => int.fmt(f),
            Expr::Float(float) => float.fmt(f),
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Variable(sym) => sym.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Assign(assign) => assign.fmt(f),
            Expr::Relation(relation) => relation.fmt(f),
            Expr::Logical(logical) => logical.fmt(f),
            Expr::Not(not) => not.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::NativeCall(call) => call.fmt(f),
            Expr::Vector(vector) => vector.fmt(f),
            Expr::Matrix(matrix) => matrix.fmt(f),
        }
    }
}
