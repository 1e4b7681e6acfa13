use std::{fmt::{self, Display}, ops::Range};
use crate::{
    parser::{
        error::{kind, Error},
        expr::Expr,
        literal::LitSym,
        token::{CloseParen, OpenParen},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Writes a comma-separated list of expressions.
fn fmt_args(f: &mut fmt::Formatter, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        arg.fmt(f)?;
    }
    Ok(())
}

/// A call to a user-defined function: `name(args...)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The callee.
    pub name: LitSym,

    pub args: Vec<Expr>,
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// The spans to highlight when pointing at the call as a whole: `name(` and `)`.
    pub fn outer_span(&self) -> [Range<usize>; 2] {
        [
            self.name.span.start..self.paren_span.start + 1,
            self.paren_span.end - 1..self.paren_span.end,
        ]
    }

    /// Parses a call, producing a [`NativeCall`] if the callee names a built-in function.
    pub fn parse_expr(input: &mut Parser) -> Result<Expr, Error> {
        let call = input.try_parse::<Call>()?;
        match NativeFn::from_name(&call.name.name) {
            Some(func) => NativeCall::new(func, call).map(Expr::NativeCall),
            None => Ok(Expr::Call(call)),
        }
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        let open_paren = input.try_parse::<OpenParen>()?;

        let args = if input.peek_kind() == Some(TokenKind::CloseParen) {
            Vec::new()
        } else {
            input.try_parse_delimited::<Expr>(TokenKind::Comma)?
        };

        let close_paren = input.try_parse::<CloseParen>()
            .map_err(|_| Error::new_fatal(
                vec![open_paren.span.clone()],
                kind::UnclosedParenthesis { opening: true },
            ))?;

        let span = name.span.start..close_paren.span.end;
        Ok(Self {
            name,
            args,
            span,
            paren_span: open_paren.span.start..close_paren.span.end,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        fmt_args(f, &self.args)?;
        write!(f, ")")
    }
}

/// A built-in numeric function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NativeFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Cbrt,
    Exp,
    Ln,
    Log,
    Abs,
    Floor,
    Ceil,
    Round,
}

impl NativeFn {
    /// Every built-in function, in declaration order.
    pub const ALL: [NativeFn; 18] = [
        Self::Sin, Self::Cos, Self::Tan,
        Self::Asin, Self::Acos, Self::Atan,
        Self::Sinh, Self::Cosh, Self::Tanh,
        Self::Sqrt, Self::Cbrt, Self::Exp, Self::Ln, Self::Log,
        Self::Abs, Self::Floor, Self::Ceil, Self::Round,
    ];

    /// Returns the built-in function with the given name, if there is one.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|func| func.name() == name)
    }

    /// The name the function is called by.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Log => "log",
            Self::Abs => "abs",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
        }
    }

    /// The inclusive range of argument counts the function accepts.
    ///
    /// `log(x)` is the base-10 logarithm, and `log(x, b)` is the base-`b` logarithm.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Self::Log => (1, 2),
            _ => (1, 1),
        }
    }

    /// Returns true if the function takes or returns an angle, so that it depends on the
    /// trigonometric mode.
    pub fn is_trig(self) -> bool {
        matches!(self, Self::Sin | Self::Cos | Self::Tan | Self::Asin | Self::Acos | Self::Atan)
    }
}

impl fmt::Display for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A call to a built-in numeric function, such as `sqrt(2)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NativeCall {
    /// The function being called.
    pub func: NativeFn,

    pub args: Vec<Expr>,
    pub span: Range<usize>,
}

impl NativeCall {
    /// Converts a parsed call to a built-in function, checking that the number of arguments is
    /// accepted by the function.
    fn new(func: NativeFn, call: Call) -> Result<Self, Error> {
        let (min, max) = func.arity();
        let given = call.args.len();
        if given < min || given > max {
            return Err(Error::new_fatal(call.outer_span().to_vec(), kind::NativeArity {
                name: func.name(),
                expected: if min == max { "exactly 1" } else { "1 or 2" },
                given,
            }));
        }

        Ok(Self {
            func,
            args: call.args,
            span: call.span,
        })
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for NativeCall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.func)?;
        fmt_args(f, &self.args)?;
        write!(f, ")")
    }
}
