pub mod assign;
pub mod binary;
pub mod call;
pub mod error;
pub mod expr;
pub mod iter;
pub mod literal;
pub mod logic;
pub mod paren;
pub mod stmt;
pub mod token;
pub mod unary;
pub mod vector;
pub mod visit;

use calx_error::ErrorKind;
use error::{Error, kind};
use expr::Expr;
use stmt::Program;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Tries each parsing expression in turn and returns the first success from the enclosing
/// function.
///
/// A fatal error stops the search and is returned from the enclosing function as well. If every
/// expression fails with a recoverable error, the macro evaluates to the last of those errors.
#[macro_export]
macro_rules! try_parse_catch_fatal {
    ($($attempt:expr),+ $(,)?) => {{
        $(
            #[allow(unused_variables)]
            let last = match $attempt {
                Ok(parsed) => return Ok(parsed),
                Err(failure) if failure.fatal => return Err(failure),
                Err(failure) => failure,
            };
        )+
        last
    }};
}

/// Turns a token stream into syntax trees.
///
/// The parser owns the full token stream of one source, including whitespace and comments, and a
/// cursor into it. Parsing functions consume tokens by advancing the cursor, and rewind it when
/// they fail.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    tokens: Box<[Token<'source>]>,

    /// Index of the first token not yet consumed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source. Fails if the source contains characters the
    /// tokenizer does not recognize.
    pub fn new(source: &'source str) -> Result<Self, Error> {
        Ok(Self {
            tokens: tokenize_complete(source)?,
            cursor: 0,
        })
    }

    /// Builds a recoverable error located at [`Parser::span`].
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Builds a fatal error located at [`Parser::span`].
    pub fn error_fatal(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new_fatal(vec![self.span()], kind)
    }

    /// The empty span just past the last token.
    pub fn eof_span(&self) -> Range<usize> {
        match self.tokens.last() {
            Some(last) => last.span.end..last.span.end,
            None => 0..0,
        }
    }

    /// The span of the token under the cursor, or [`Parser::eof_span`] once the stream is
    /// exhausted.
    pub fn span(&self) -> Range<usize> {
        match self.current_token() {
            Some(token) => token.span.clone(),
            None => self.eof_span(),
        }
    }

    /// Moves the cursor to where `other`'s cursor is.
    pub fn set_cursor(&mut self, other: &Parser) {
        self.cursor = other.cursor;
    }

    /// The token just before the cursor, if any.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.cursor.checked_sub(1).and_then(|index| self.tokens.get(index))
    }

    /// The token under the cursor, if any, whitespace included.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Consumes tokens up to and including the next meaningful one, which is returned.
    /// Whitespace, line breaks and comments in between are dropped.
    ///
    /// Fails with [`kind::UnexpectedEof`] if only whitespace is left.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        let skipped = self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .position(|token| !token.is_whitespace());

        match skipped {
            Some(offset) => {
                let token = self.tokens[self.cursor + offset].clone();
                self.cursor += offset + 1;
                Ok(token)
            },
            None => {
                self.cursor = self.tokens.len();
                Err(self.error(kind::UnexpectedEof))
            },
        }
    }

    /// Returns the kind of the next meaningful token without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map(|token| token.kind)
    }

    /// Returns true if only whitespace, line breaks and comments remain in the stream.
    pub fn at_end(&self) -> bool {
        self.peek_kind().is_none()
    }

    /// Consumes any run of statement separators (semicolons and line breaks), together with
    /// whitespace and comments around them.
    ///
    /// Returns true if at least one separator was consumed.
    pub fn skip_separators(&mut self) -> bool {
        let mut found = false;
        while let Some(token) = self.tokens.get(self.cursor) {
            if token.kind.is_separator() {
                found = true;
            } else if !token.kind.is_inline_whitespace() {
                break;
            }
            self.cursor += 1;
        }
        found
    }

    /// Parses a `T` at the cursor. On failure the cursor is put back where it was, so callers
    /// can go on to try something else.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Parses one or more `T`s separated by `delimiter` tokens, rewinding on failure.
    ///
    /// Parsing stops at the first item that fails after a delimiter has been seen, leaving the
    /// cursor after that delimiter. Fatal errors are always returned.
    pub fn try_parse_delimited<T: Parse>(&mut self, delimiter: TokenKind) -> Result<Vec<T>, Error> {
        let start = self.cursor;
        let mut items = Vec::new();

        loop {
            match self.try_parse::<T>() {
                Ok(item) => items.push(item),
                Err(err) if err.fatal || items.is_empty() => {
                    self.cursor = start;
                    return Err(err);
                },
                Err(_) => return Ok(items),
            }

            if self.peek_kind() != Some(delimiter) {
                return Ok(items);
            }
            // the delimiter is a meaningful token, so this consumes it
            let _ = self.next_token();
        }
    }

    /// Runs a parsing function at the cursor, rewinding on failure.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser) -> Result<T, Error>,
    {
        let start = self.cursor;
        let result = f(self);
        if result.is_err() {
            self.cursor = start;
        }
        result
    }

    /// Parses a `T` and then checks it with `predicate`. If either step fails, the cursor is
    /// rewound and the error is returned.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        self.try_parse_with_fn(|input| {
            let parsed = T::parse(input)?;
            predicate(&parsed, input)?;
            Ok(parsed)
        })
    }

    /// Parses a `T` that must span the rest of the stream. Anything other than whitespace left
    /// after it is a fatal error.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        if self.at_end() {
            Ok(value)
        } else {
            Err(self.leftover_error(kind::ExpectedEof))
        }
    }

    /// Attempts to parse multiple values from the given stream of tokens, each separated by
    /// semicolons or line breaks. All the tokens must be consumed by the parser; if not, an
    /// error is returned.
    pub fn try_parse_full_many<T: Parse>(&mut self) -> Result<Vec<T>, Error> {
        let mut values = Vec::new();
        self.skip_separators();

        while !self.at_end() {
            values.push(T::parse(self)?);

            if !self.skip_separators() && !self.at_end() {
                return Err(self.leftover_error(kind::MissingSeparator));
            }
        }

        Ok(values)
    }

    /// Creates a fatal error for a token left over after a complete parse. A stray closing
    /// parenthesis is reported as such, and anything else as the given kind.
    fn leftover_error(&mut self, otherwise: impl ErrorKind + 'static) -> Error {
        while self.tokens.get(self.cursor).is_some_and(Token::is_whitespace) {
            self.cursor += 1;
        }

        if self.peek_kind() == Some(TokenKind::CloseParen) {
            self.error_fatal(kind::UnclosedParenthesis { opening: false })
        } else {
            self.error_fatal(otherwise)
        }
    }
}

/// Implemented by every syntax tree node.
pub trait Parse: Sized {
    /// Parses `Self` starting at the cursor, consuming its tokens on success.
    ///
    /// Implementations are free to leave the cursor anywhere on failure; wrap the call in
    /// [`Parser::try_parse`] when the cursor must be restored.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// Which way a chain of operators of equal precedence groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// `a op b op c` groups as `(a op b) op c`. Unary operators of this kind are postfix.
    Left,

    /// `a op b op c` groups as `a op (b op c)`. Unary operators of this kind are prefix.
    Right,
}

/// How tightly an operator binds. Variants are ordered from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of assignment (`=`).
    Assign,

    /// Precedence of logical or (`or`, `||`).
    Or,

    /// Precedence of logical and (`and`, `&&`).
    And,

    /// Precedence of comparisons (`>`, `>=`, `<`, `<=`, `==`, and `!=`).
    Compare,

    /// `+` and binary `-`.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary subtraction (`-`) and logical not (`not`).
    Neg,

    /// `^`.
    Exp,

    /// Postfix `!`.
    Factorial,

    /// Precedence of literals, names, calls and groupings, which never need parentheses.
    Primary,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

/// Parses a single expression. The whole source must be consumed.
pub fn parse(source: &str) -> Result<Expr, Error> {
    Parser::new(source)?.try_parse_full::<Expr>()
}

/// Parses a program: a sequence of statements separated by semicolons or line breaks.
pub fn parse_program(source: &str) -> Result<Program, Error> {
    Parser::new(source)?.try_parse_full_many()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use binary::Binary;
    use call::NativeFn;
    use literal::{LitInt, LitSym, LitStr, Literal};
    use stmt::Stmt;
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};
    use unary::Unary;

    /// Renders an expression with every operation wrapped in parentheses, making the shape of
    /// the tree visible.
    fn grouped(expr: &Expr) -> String {
        let list = |args: &[Expr]| args.iter().map(grouped).collect::<Vec<_>>().join(", ");
        match expr {
            Expr::Integer(_) | Expr::Float(_) | Expr::Literal(_) | Expr::Variable(_)
                | Expr::Vector(_) | Expr::Matrix(_) => expr.to_string(),
            Expr::Paren(paren) => format!("({})", grouped(&paren.expr)),
            Expr::Binary(binary) => format!("({} {} {})", grouped(&binary.lhs), binary.op, grouped(&binary.rhs)),
            Expr::Relation(relation) => format!("({} {} {})", grouped(&relation.lhs), relation.op, grouped(&relation.rhs)),
            Expr::Logical(logical) => format!("({} {} {})", grouped(&logical.lhs), logical.op, grouped(&logical.rhs)),
            Expr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => format!("(-{})", grouped(&unary.operand)),
                UnaryOpKind::Factorial => format!("({}!)", grouped(&unary.operand)),
            },
            Expr::Not(not) => format!("(not {})", grouped(&not.operand)),
            Expr::Assign(assign) => format!("({} = {})", assign.target, grouped(&assign.value)),
            Expr::Call(call) => format!("{}({})", call.name, list(&call.args)),
            Expr::NativeCall(call) => format!("{}({})", call.func, list(&call.args)),
        }
    }

    fn shape(source: &str) -> String {
        grouped(&parse(source).unwrap())
    }

    #[test]
    fn literal_int() {
        let expr = parse("16").unwrap();

        assert_eq!(expr, Expr::Integer(LitInt {
            value: "16".to_string(),
            span: 0..2,
        }));
    }

    #[test]
    fn literal_int_is_not_truncated() {
        let expr = parse("123456789012345678901234567890").unwrap();

        assert_eq!(expr, Expr::Integer(LitInt {
            value: "123456789012345678901234567890".to_string(),
            span: 0..30,
        }));
    }

    #[test]
    fn literal_string_with_escapes() {
        let expr = parse(r#""a \"b\" c""#).unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Str(LitStr {
            value: r#"a "b" c"#.to_string(),
            span: 0..11,
        })));
    }

    #[test]
    fn literal_symbol_with_whitespace() {
        let expr = parse("  pi  ").unwrap();

        assert_eq!(expr, Expr::Variable(LitSym {
            name: "pi".to_string(),
            span: 2..4,
        }));
    }

    #[test]
    fn unary_left_associativity() {
        let expr = parse("3!!").unwrap();

        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(Expr::Unary(Unary {
                operand: Box::new(Expr::Integer(LitInt {
                    value: "3".to_string(),
                    span: 0..1,
                })),
                op: UnaryOp {
                    kind: UnaryOpKind::Factorial,
                    span: 1..2,
                },
                span: 0..2,
            })),
            op: UnaryOp {
                kind: UnaryOpKind::Factorial,
                span: 2..3,
            },
            span: 0..3,
        }));
    }

    #[test]
    fn binary_left_associativity() {
        let expr = parse("3 * x * 5").unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(Expr::Integer(LitInt {
                    value: "3".to_string(),
                    span: 0..1,
                })),
                op: BinOp {
                    kind: BinOpKind::Mul,
                    span: 2..3,
                },
                rhs: Box::new(Expr::Variable(LitSym {
                    name: "x".to_string(),
                    span: 4..5,
                })),
                span: 0..5,
            })),
            op: BinOp {
                kind: BinOpKind::Mul,
                span: 6..7,
            },
            rhs: Box::new(Expr::Integer(LitInt {
                value: "5".to_string(),
                span: 8..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn binary_right_associativity() {
        let expr = parse("2 ^ 3 ^ 4").unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Integer(LitInt {
                value: "2".to_string(),
                span: 0..1,
            })),
            op: BinOp {
                kind: BinOpKind::Exp,
                span: 2..3,
            },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(Expr::Integer(LitInt {
                    value: "3".to_string(),
                    span: 4..5,
                })),
                op: BinOp {
                    kind: BinOpKind::Exp,
                    span: 6..7,
                },
                rhs: Box::new(Expr::Integer(LitInt {
                    value: "4".to_string(),
                    span: 8..9,
                })),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn precedence_of_arithmetic() {
        assert_eq!(shape("1 + 2 * 3 - 4"), "((1 + (2 * 3)) - 4)");
        assert_eq!(shape("1 - 2 - 3"), "((1 - 2) - 3)");
        assert_eq!(shape("8 / 4 / 2"), "((8 / 4) / 2)");
        assert_eq!(shape("a + b * c ^ d"), "(a + (b * (c ^ d)))");
    }

    #[test]
    fn precedence_of_negation_and_factorial() {
        assert_eq!(shape("-x ^ 2"), "(-(x ^ 2))");
        assert_eq!(shape("-x * 2"), "((-x) * 2)");
        assert_eq!(shape("2 ^ -x"), "(2 ^ (-x))");
        assert_eq!(shape("-x!"), "(-(x!))");
        assert_eq!(shape("2 ^ 3!"), "(2 ^ (3!))");
        assert_eq!(shape("--3"), "(-(-3))");
    }

    #[test]
    fn precedence_of_comparison_and_logic() {
        assert_eq!(shape("a or b and c < d + 1"), "(a or (b and (c < (d + 1))))");
        assert_eq!(shape("a && b || c"), "((a and b) or c)");
        assert_eq!(shape("not a and b"), "((not a) and b)");
        assert_eq!(shape("a == b != c"), "((a == b) != c)");
        assert_eq!(shape("x >= 1 and x <= 2"), "((x >= 1) and (x <= 2))");
    }

    #[test]
    fn parentheses_are_kept() {
        assert_eq!(shape("(a + b) * c"), "(((a + b)) * c)");
        assert_eq!(shape("((x))"), "((x))");
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(shape("x = y = 1 + 2"), "(x = (y = (1 + 2)))");
        assert_eq!(shape("x = (y = 3) * 2"), "(x = (((y = 3)) * 2))");
    }

    #[test]
    fn calls_and_native_calls() {
        assert_eq!(shape("f(1, x + 1)"), "f(1, (x + 1))");
        assert_eq!(shape("g()"), "g()");

        let Expr::NativeCall(call) = parse("log(100, 10)").unwrap() else {
            panic!("expected a native call");
        };
        assert_eq!(call.func, NativeFn::Log);
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.span, 0..12);
    }

    #[test]
    fn vectors_and_matrices() {
        let Expr::Vector(vector) = parse("[1, x, [2]]").unwrap() else {
            panic!("expected a vector");
        };
        assert_eq!(vector.elements.len(), 3);

        let Expr::Matrix(matrix) = parse("[[1, 2], [3, 4], [5, 6]]").unwrap() else {
            panic!("expected a matrix");
        };
        assert_eq!(matrix.dimensions(), (3, 2));

        assert!(matches!(parse("[]").unwrap(), Expr::Vector(vector) if vector.elements.is_empty()));
    }

    #[test]
    fn display_reproduces_source() {
        let source = r#"f(a, -b!) + [1, 2] * (c - 2.5)^2 / sqrt(x) == "s""#;
        assert_eq!(parse(source).unwrap().to_string(), source);

        let source = "not (a < 1) or [[1, 2], [3, 4]] != m";
        assert_eq!(parse(source).unwrap().to_string(), source);
    }

    #[test]
    fn unclosed_parenthesis() {
        let err = parse("(1 + 2").unwrap_err();
        assert!(err.fatal);
        assert_eq!(err.spans, vec![0..1]);
        assert_eq!(err.downcast_kind(), Some(&kind::UnclosedParenthesis { opening: true }));

        let err = parse("1 + 2)").unwrap_err();
        assert_eq!(err.spans, vec![5..6]);
        assert_eq!(err.downcast_kind(), Some(&kind::UnclosedParenthesis { opening: false }));

        let err = parse("f(1, 2").unwrap_err();
        assert_eq!(err.downcast_kind(), Some(&kind::UnclosedParenthesis { opening: true }));
    }

    #[test]
    fn empty_parenthesis() {
        let err = parse("2 * ( )").unwrap_err();
        assert!(err.is::<kind::EmptyParenthesis>());
        assert_eq!(err.spans, vec![4..7]);
    }

    #[test]
    fn ragged_matrix() {
        let err = parse("[[1, 2], [3]]").unwrap_err();
        assert!(err.fatal);
        assert_eq!(err.spans, vec![9..12]);
        assert_eq!(err.downcast_kind(), Some(&kind::RaggedMatrix { expected: 2, found: 1 }));
    }

    #[test]
    fn unclosed_bracket() {
        let err = parse("[1, 2").unwrap_err();
        assert!(err.is::<kind::UnclosedBracket>());
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn invalid_assignment_target() {
        let err = parse("1 + x = 3").unwrap_err();
        assert!(err.fatal);
        assert!(err.is::<kind::InvalidAssignmentTarget>());
        assert_eq!(err.spans, vec![0..5]);

        assert!(parse("f(x) = 3").unwrap_err().is::<kind::InvalidAssignmentTarget>());
    }

    #[test]
    fn native_arity() {
        let err = parse("sin(1, 2)").unwrap_err();
        assert_eq!(err.downcast_kind(), Some(&kind::NativeArity {
            name: "sin",
            expected: "exactly 1",
            given: 2,
        }));

        assert!(parse("sqrt()").unwrap_err().is::<kind::NativeArity>());
    }

    #[test]
    fn unexpected_eof_and_tokens() {
        assert!(parse("1 +").unwrap_err().is::<kind::UnexpectedEof>());
        assert!(parse("").unwrap_err().is::<kind::UnexpectedEof>());

        let err = parse("$").unwrap_err();
        assert_eq!(err.spans, vec![0..1]);
        assert!(matches!(
            err.downcast_kind::<kind::UnexpectedToken>(),
            Some(kind::UnexpectedToken { found: TokenKind::Symbol, .. })
        ));

        // `x =` commits to an assignment
        let err = parse("x =").unwrap_err();
        assert!(err.fatal);
        assert!(err.is::<kind::UnexpectedEof>());
    }

    #[test]
    fn program_statements() {
        let program = parse_program("let a = 2; fn f(x) = a * x\nf(3);").unwrap();
        assert_eq!(program.len(), 3);

        let Stmt::Let(stmt) = &program[0] else {
            panic!("expected a let statement");
        };
        assert_eq!(stmt.name.name, "a");
        assert_eq!(stmt.value.to_string(), "2");

        let Stmt::Fn(decl) = &program[1] else {
            panic!("expected a function declaration");
        };
        assert_eq!(decl.name.name, "f");
        assert_eq!(decl.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(decl.body.to_string(), "a * x");
        assert_eq!(decl.span, 11..26);

        assert!(matches!(&program[2], Stmt::Expr(Expr::Call(_))));
    }

    #[test]
    fn program_separators_and_comments() {
        let program = parse_program("\n\n  let a = 1 ;;\n  // a comment\n  a + 1 // trailing\n").unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program[1].to_string(), "a + 1");

        assert!(parse_program("   ").unwrap().is_empty());
        assert_eq!(parse_program("fn g() = 1").unwrap()[0].to_string(), "fn g() = 1");
    }

    #[test]
    fn expressions_continue_across_lines() {
        let program = parse_program("1 +\n  2").unwrap();
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn program_errors() {
        let err = parse_program("1 2").unwrap_err();
        assert!(err.is::<kind::MissingSeparator>());
        assert_eq!(err.spans, vec![2..3]);

        let err = parse_program("fn f(x) = ").unwrap_err();
        assert!(err.fatal);
        assert!(err.is::<kind::UnexpectedEof>());

        let source = "let a = 1\nlet b = )";
        let err = parse_program(source).unwrap_err();
        assert_eq!(err.line(source), 2);
        assert_eq!(err.downcast_kind(), Some(&kind::UnclosedParenthesis { opening: false }));
    }
}
