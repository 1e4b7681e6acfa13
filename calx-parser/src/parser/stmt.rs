use std::{fmt, ops::Range};
use crate::{
    parser::{
        error::{kind, Error},
        expr::Expr,
        literal::LitSym,
        token::{Assign, CloseParen, Fn, Let, OpenParen},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
    try_parse_catch_fatal,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sequence of statements.
pub type Program = Vec<Stmt>;

/// Marks an error as fatal. Used once a keyword has committed the parser to one kind of
/// statement.
fn commit(mut err: Error) -> Error {
    err.fatal = true;
    err
}

/// A variable declaration, such as `let x = 2`. The variable is declared in the current scope.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LetStmt {
    /// The name of the declared variable.
    pub name: LitSym,

    /// The initial value of the variable.
    pub value: Expr,

    /// The region of the source code that this statement was parsed from.
    pub span: Range<usize>,
}

impl Parse for LetStmt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let keyword = input.try_parse::<Let>()?;
        let name = input.try_parse::<LitSym>().map_err(commit)?;
        input.try_parse::<Assign>().map_err(commit)?;
        let value = input.try_parse::<Expr>().map_err(commit)?;
        let span = keyword.span.start..value.span().end;
        Ok(Self { name, value, span })
    }
}

impl fmt::Display for LetStmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "let {} = {}", self.name, self.value)
    }
}

/// A function declaration, such as `fn f(x) = x^2 + 1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FnDecl {
    /// The name of the function.
    pub name: LitSym,

    /// The names of the parameters, in order.
    pub params: Vec<LitSym>,

    /// The body of the function.
    pub body: Expr,

    /// The region of the source code that this declaration was parsed from.
    pub span: Range<usize>,
}

impl FnDecl {
    /// Returns the span of the function's signature, from the `fn` keyword to the last
    /// parameter.
    pub fn signature_span(&self) -> Range<usize> {
        let end = self.params.last().map_or(self.name.span.end, |param| param.span.end);
        self.span.start..end
    }
}

impl Parse for FnDecl {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let keyword = input.try_parse::<Fn>()?;
        let name = input.try_parse::<LitSym>().map_err(commit)?;
        let open_paren = input.try_parse::<OpenParen>().map_err(commit)?;

        let params = if input.peek_kind() == Some(TokenKind::CloseParen) {
            Vec::new()
        } else {
            input.try_parse_delimited::<LitSym>(TokenKind::Comma).map_err(commit)?
        };

        input.try_parse::<CloseParen>()
            .map_err(|_| Error::new_fatal(
                vec![open_paren.span.clone()],
                kind::UnclosedParenthesis { opening: true },
            ))?;
        input.try_parse::<Assign>().map_err(commit)?;
        let body = input.try_parse::<Expr>().map_err(commit)?;

        let span = keyword.span.start..body.span().end;
        Ok(Self { name, params, body, span })
    }
}

impl fmt::Display for FnDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fn {}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            param.fmt(f)?;
        }
        write!(f, ") = {}", self.body)
    }
}

/// A statement, the unit of a [`Program`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stmt {
    /// An expression evaluated for its value or its effect.
    Expr(Expr),

    /// A variable declaration.
    Let(LetStmt),

    /// A function declaration.
    Fn(FnDecl),
}

impl Stmt {
    /// Returns the span of the statement.
    pub fn span(&self) -> Range<usize> {
        match self {
            Stmt::Expr(expr) => expr.span(),
            Stmt::Let(stmt) => stmt.span.clone(),
            Stmt::Fn(decl) => decl.span.clone(),
        }
    }
}

impl Parse for Stmt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let _ = try_parse_catch_fatal!(
            input.try_parse::<FnDecl>().map(Stmt::Fn),
            input.try_parse::<LetStmt>().map(Stmt::Let),
        );
        input.try_parse::<Expr>().map(Stmt::Expr)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => expr.fmt(f),
            Stmt::Let(stmt) => stmt.fmt(f),
            Stmt::Fn(decl) => decl.fmt(f),
        }
    }
}
