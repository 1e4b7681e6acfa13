pub mod token;

use calx_error::Error;
use crate::parser::error::kind;
use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Input that the tokenizer cannot recognize results in an [`UnrecognizedCharacter`] error.
///
/// [`UnrecognizedCharacter`]: kind::UnrecognizedCharacter
pub fn tokenize_complete(input: &str) -> Result<Box<[Token]>, Error> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let Ok(kind) = result else {
            return Err(Error::new(vec![lexer.span()], kind::UnrecognizedCharacter {
                lexeme: lexer.slice().to_string(),
            }));
        };

        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    Ok(tokens.into_boxed_slice())
}
