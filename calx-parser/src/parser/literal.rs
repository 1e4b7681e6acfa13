use crate::parser::{
    error::Error,
    token::{Boolean, Float, Int, Name, Str},
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer literal, represented as a [`String`] of decimal digits so that arbitrarily large
/// values survive parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The digits.
    pub value: String,
    pub span: Range<usize>,
}

impl Parse for LitInt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input
            .try_parse::<Int>()
            .map(|int| Self {
                value: int.lexeme,
                span: int.span,
            })
    }
}

impl fmt::Display for LitInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A decimal literal with a fractional part, such as `4.25`, kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    pub value: String,
    pub span: Range<usize>,
}

impl Parse for LitFloat {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input
            .try_parse::<Float>()
            .map(|float| Self {
                value: float.lexeme,
                span: float.span,
            })
    }
}

impl fmt::Display for LitFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// `true` or `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitBool {
    pub value: bool,
    pub span: Range<usize>,
}

impl Parse for LitBool {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input
            .try_parse::<Boolean>()
            .map(|boolean| Self {
                value: boolean.lexeme == "true",
                span: boolean.span,
            })
    }
}

impl fmt::Display for LitBool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A string literal, such as `"hello"`. Escape sequences are resolved when parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitStr {
    /// The contents of the string, without the surrounding quotes.
    pub value: String,
    pub span: Range<usize>,
}

/// Resolves the escape sequences in the body of a string literal. Unknown escapes keep the
/// escaped character.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

impl Parse for LitStr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input
            .try_parse::<Str>()
            .map(|string| {
                let body = &string.lexeme[1..string.lexeme.len() - 1];
                Self {
                    value: unescape(body),
                    span: string.span,
                }
            })
    }
}

impl fmt::Display for LitStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.value.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\t' => write!(f, "\\t")?,
                c => write!(f, "{}", c)?,
            }
        }
        write!(f, "\"")
    }
}

/// A name, referring to a variable or a function.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    pub name: String,
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input
            .try_parse::<Name>()
            .map(|name| Self {
                name: name.lexeme,
                span: name.span,
            })
    }
}

impl fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A non-numeric literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// A boolean literal, either `true` or `false`.
    Boolean(LitBool),

    /// A string literal, such as `"text"`.
    Str(LitStr),
}

impl Literal {
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Boolean(boolean) => boolean.span.clone(),
            Literal::Str(string) => string.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input.try_parse::<LitBool>().map(Literal::Boolean)
            .or_else(|_| input.try_parse::<LitStr>().map(Literal::Str))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Boolean(boolean) => boolean.fmt(f),
            Literal::Str(string) => string.fmt(f),
        }
    }
}
