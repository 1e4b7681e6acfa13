use std::{fmt, ops::Range};
use crate::{
    parser::{
        error::{kind, Error},
        expr::Expr,
        token::{CloseSquare, OpenSquare},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Writes a bracketed, comma-separated list of items.
fn fmt_list<T: fmt::Display>(f: &mut fmt::Formatter, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        item.fmt(f)?;
    }
    write!(f, "]")
}

/// A vector literal, such as `[1, 2, 3]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector {
    /// The elements of the vector.
    pub elements: Vec<Expr>,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Vector {
    /// Returns the span of the vector literal.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a bracketed list. A non-empty list whose elements are all vectors is a
    /// [`Matrix`], and its rows must all have the same length.
    pub fn parse_expr(input: &mut Parser) -> Result<Expr, Error> {
        let vector = input.try_parse::<Vector>()?;

        let is_matrix = !vector.elements.is_empty()
            && vector.elements.iter().all(|element| matches!(element, Expr::Vector(_)));
        if !is_matrix {
            return Ok(Expr::Vector(vector));
        }

        let rows = vector.elements
            .into_iter()
            .filter_map(|element| match element {
                Expr::Vector(row) => Some(row),
                _ => None,
            })
            .collect::<Vec<_>>();

        let expected = rows[0].elements.len();
        if let Some(ragged) = rows.iter().find(|row| row.elements.len() != expected) {
            return Err(Error::new_fatal(vec![ragged.span.clone()], kind::RaggedMatrix {
                expected,
                found: ragged.elements.len(),
            }));
        }

        Ok(Expr::Matrix(Matrix {
            rows: rows.into_iter().map(|row| row.elements).collect(),
            span: vector.span,
        }))
    }
}

impl Parse for Vector {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open_square = input.try_parse::<OpenSquare>()?;

        let elements = if input.peek_kind() == Some(TokenKind::CloseSquare) {
            Vec::new()
        } else {
            input.try_parse_delimited::<Expr>(TokenKind::Comma)?
        };

        let close_square = input.try_parse::<CloseSquare>()
            .map_err(|_| Error::new_fatal(vec![open_square.span.clone()], kind::UnclosedBracket))?;

        Ok(Self {
            elements,
            span: open_square.span.start..close_square.span.end,
        })
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_list(f, &self.elements)
    }
}

/// A matrix literal, such as `[[1, 2], [3, 4]]`. Every row has the same number of elements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    /// The rows of the matrix.
    pub rows: Vec<Vec<Expr>>,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Matrix {
    /// Returns the span of the matrix literal.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the number of rows and columns of the matrix.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            fmt_list(f, row)?;
        }
        write!(f, "]")
    }
}
