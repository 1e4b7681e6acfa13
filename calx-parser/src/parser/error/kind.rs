use ariadne::Fmt;
use calx_attrs::ErrorKind;
use calx_error::EXPR;
use crate::tokenizer::TokenKind;

/// A placeholder for a failed speculative parse. It tells the caller to try another rule, and
/// never reaches the user on its own.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "internal parser error",
    labels = ["here"],
    help = "this is a bug in the parser; please report it"
)]
pub struct NonFatal;

/// The tokenizer could not recognize a piece of the source code.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unrecognized character sequence `{}`", lexeme),
    labels = ["here"],
)]
pub struct UnrecognizedCharacter {
    /// The text that could not be recognized.
    pub lexeme: String,
}

/// The input stopped in the middle of an expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the input ended too early",
    labels = [format!("an {} is missing here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// A complete parse left tokens behind.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "extra input after the expression",
    labels = [format!("this is not part of the {}", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// A token of the wrong kind.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("did not expect {:?} here", found),
    labels = [format!(
        "expected {}",
        expected.iter().map(|kind| format!("{:?}", kind)).collect::<Vec<_>>().join(" or "),
    )],
)]
pub struct UnexpectedToken {
    pub expected: &'static [TokenKind],
    pub found: TokenKind,
}

/// A parenthesis without its partner.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "mismatched parenthesis",
    labels = ["this parenthesis has no partner"],
    help = if *opening {
        "close it with `)`"
    } else {
        "remove it, or open a group with `(` before it"
    },
)]
pub struct UnclosedParenthesis {
    /// True for a `(` that is never closed, false for a stray `)`.
    pub opening: bool,
}

/// `()` with nothing inside.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty parentheses",
    labels = ["an expression is missing here"],
)]
pub struct EmptyParenthesis;

/// A square bracket was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed bracket",
    labels = ["this bracket is not closed"],
    help = "add a closing bracket `]` after the last element",
)]
pub struct UnclosedBracket;

/// The left-hand side of an assignment was not a variable name.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid assignment target",
    labels = ["this cannot be assigned to"],
    help = format!("only {} can be assigned; use {} to declare a function", "variable names".fg(EXPR), "fn".fg(EXPR)),
)]
pub struct InvalidAssignmentTarget;

/// The rows of a matrix literal have different lengths.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "matrix rows must all have the same length",
    labels = [format!("this row has {} element(s), but the first row has {}", found, expected)],
)]
pub struct RaggedMatrix {
    /// The length of the first row.
    pub expected: usize,

    /// The length of the offending row.
    pub found: usize,
}

/// A built-in function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("wrong number of arguments for built-in function `{}`", name),
    labels = [format!("this call has {} argument(s)", given)],
    help = format!("`{}` takes {} argument(s)", name, expected.fg(EXPR)),
)]
pub struct NativeArity {
    /// The name of the built-in function.
    pub name: &'static str,

    /// A description of the accepted argument count.
    pub expected: &'static str,

    /// The number of arguments given.
    pub given: usize,
}

/// A statement was not followed by a separator.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected the end of the statement",
    labels = ["this should start on a new line"],
    help = format!("separate statements with a {} or a line break", "`;`".fg(EXPR)),
)]
pub struct MissingSeparator;
