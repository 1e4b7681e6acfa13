use ariadne::Fmt;
use calx_attrs::ErrorKind;
use calx_error::EXPR;

/// Formats a "did you mean" hint from a list of similar names.
fn suggest(suggestions: &[String]) -> Option<String> {
    match suggestions {
        [] => None,
        [one] => Some(format!("did you mean `{}`?", one.fg(EXPR))),
        many => Some(format!(
            "did you mean one of these? {}",
            many.iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

/// The variable is not defined in any scope visible from where it was used.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("from the environment: `{}` is not defined", name),
    labels = ["this variable"],
    help = suggest(suggestions).unwrap_or_else(|| {
        format!("to define it, type: {} {} = {}", "let".fg(EXPR), name.fg(EXPR), "<expression>".fg(EXPR))
    }),
)]
pub struct UndefinedVariable {
    /// The name of the variable.
    pub name: String,

    /// Similarly named variables that are defined, if any.
    pub suggestions: Vec<String>,
}

/// Assignment to a variable that was never declared. Assignment only updates existing bindings.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("from the environment: cannot assign to `{}` because it is not defined", name),
    labels = ["this variable"],
    help = format!("declare it first with: {} {} = {}", "let".fg(EXPR), name.fg(EXPR), "<expression>".fg(EXPR)),
)]
pub struct UndefinedAssignment {
    /// The name of the variable.
    pub name: String,
}

/// The resolver computed a scope distance that does not hold the variable at runtime.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("from the environment: `{}` was expected {} scope(s) up, but it is not there", name, distance),
    labels = ["this variable"],
    help = "this is a bug in the resolver; please report it",
)]
pub struct UnresolvedScope {
    /// The name of the variable.
    pub name: String,

    /// The number of scopes between the use of the variable and its declaration.
    pub distance: usize,
}

/// A function declares the same parameter name more than once.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the parameter `{}` is declared more than once", name),
    labels = ["first declared here", "declared again here"],
    help = "rename one of the parameters",
)]
pub struct DuplicateParameter {
    /// The name of the parameter.
    pub name: String,
}

/// A syntax form that has no algebraic representation.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unsupported form for reduction: {}", form),
    labels = ["this expression"],
    help = format!(
        "only integers, variables, groupings and the {} operators can be reduced",
        "+ - * / ^ !".fg(EXPR)
    ),
)]
pub struct UnsupportedReduction {
    /// The name of the syntax form, such as `"float"` or `"vector"`.
    pub form: &'static str,
}

/// An integer was divided by zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this divisor is zero"],
)]
pub struct DivisionByZero;

/// Too many arguments were given to a function call.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("too many arguments were given to the `{}` function", name),
    labels = ["this function call", ""],
    help = format!(
        "the `{}` function takes {} argument(s); there are {} argument(s) provided here",
        name.fg(EXPR),
        expected,
        given
    ),
)]
pub struct TooManyArguments {
    /// The name of the function that was called.
    pub name: String,

    /// The number of arguments that were expected.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// An argument to a function call is missing.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("missing argument #{} for the `{}` function", index + 1, name),
    labels = ["this function call", ""],
    help = format!(
        "the `{}` function takes {} argument(s); there are {} argument(s) provided here",
        name.fg(EXPR),
        expected,
        given
    ),
)]
pub struct MissingArgument {
    /// The name of the function that was called.
    pub name: String,

    /// The index of the first missing argument.
    pub index: usize,

    /// The number of arguments that were expected.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// Something that is not a function was called.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a function", name),
    labels = [format!("this has type `{}`", found)],
)]
pub struct NotCallable {
    /// The name that was called.
    pub name: String,

    /// The type of the value bound to the name.
    pub found: &'static str,
}

/// An operand has the wrong type for the operation applied to it.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expected a value of type `{}`, found `{}`", expected, found),
    labels = [format!("this has type `{}`", found)],
)]
pub struct TypeMismatch {
    /// The type the operation accepts.
    pub expected: &'static str,

    /// The type of the value that was given.
    pub found: &'static str,
}

/// Function calls nested deeper than the configured limit.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "maximum recursion depth exceeded",
    labels = [format!("this call to `{}` nests more than {} calls deep", name, depth)],
    help = "functions in calx have no base case unless one is written with `and` / `or`",
)]
pub struct StackOverflow {
    /// The function whose call exceeded the limit.
    pub name: String,

    /// The configured limit.
    pub depth: usize,
}

/// The entry function of a compiled program must take exactly one parameter.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the entry function `{}` must take exactly one parameter", name),
    labels = [format!("this function takes {} parameter(s)", given)],
    help = format!("declare it as: {}", format!("fn {}(x) = ...", name).fg(EXPR)),
)]
pub struct EntryArity {
    /// The name of the entry function.
    pub name: String,

    /// The number of parameters it declares.
    pub given: usize,
}

/// A compiled program must declare at least one function.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the program does not declare a function to compile",
    help = format!("add a declaration such as: {}", "fn f(x) = x^2 + 1".fg(EXPR)),
)]
pub struct NoEntryFunction;
