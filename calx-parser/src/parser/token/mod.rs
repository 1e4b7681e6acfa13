pub mod op;

use crate::{
    parser::{error::{kind, Error}, Parser, Parse},
    tokenizer::TokenKind,
};
use std::ops::Range;

/// Consumes the next token if it is of the given kind, returning its lexeme and span.
fn expect_kind(input: &mut Parser, expected: &'static [TokenKind]) -> Result<(String, Range<usize>), Error> {
    let token = input.next_token()?;
    if expected.contains(&token.kind) {
        Ok((token.lexeme.to_owned(), token.span))
    } else {
        Err(Error::new(vec![token.span], kind::UnexpectedToken {
            expected,
            found: token.kind,
        }))
    }
}

/// Declares a type for each listed [`TokenKind`], so that a parser can ask for a specific token
/// with `input.try_parse::<OpenParen>()`.
macro_rules! token_kinds {
    ($($name:ident)*) => {
        $(
            #[doc = concat!("A single [`TokenKind::", stringify!($name), "`] token.")]
            #[derive(Clone, Debug, PartialEq)]
            #[allow(dead_code)]
            pub(crate) struct $name {
                pub(crate) lexeme: String,
                pub(crate) span: Range<usize>,
            }

            impl Parse for $name {
                fn parse(input: &mut Parser) -> Result<Self, Error> {
                    expect_kind(input, &[TokenKind::$name])
                        .map(|(lexeme, span)| Self { lexeme, span })
                }
            }
        )*
    };
}

token_kinds!(
    Sub
    Factorial
    Not
    Assign
    Fn
    Let
    Boolean
    Str
    Name
    Comma
    OpenParen
    CloseParen
    OpenSquare
    CloseSquare
    Int
    Float
);
