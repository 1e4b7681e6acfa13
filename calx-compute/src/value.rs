use calx_parser::parser::stmt::FnDecl;
use crate::env::ScopeId;
use std::{fmt, rc::Rc};

/// A user-defined function, together with the scope it was declared in.
///
/// The scope is captured by reference: assignments made to that scope after the declaration are
/// visible to the function when it is called.
#[derive(Debug)]
pub struct Closure {
    /// The declaration of the function.
    pub decl: FnDecl,

    /// The scope the function was declared in, which becomes the parent of each call's scope.
    pub scope: ScopeId,
}

impl Closure {
    /// Returns the name of the function.
    pub fn name(&self) -> &str {
        &self.decl.name.name
    }

    /// Returns the number of parameters the function takes.
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }
}

/// A value produced by the numeric evaluator.
#[derive(Debug, Clone)]
pub enum Value {
    /// A real number.
    Number(f64),

    /// A boolean, produced by comparisons and logical operators.
    Boolean(bool),

    /// A string literal.
    Str(String),

    /// A vector of values.
    Vector(Vec<Value>),

    /// A matrix of values, stored as rows of equal length.
    Matrix(Vec<Vec<Value>>),

    /// A user-defined function.
    Function(Rc<Closure>),
}

impl Value {
    /// Returns the name of the value's type, used in error messages.
    pub fn typename(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Str(_) => "string",
            Value::Vector(_) => "vector",
            Value::Matrix(_) => "matrix",
            Value::Function(_) => "function",
        }
    }

    /// Returns the value as a number, if it is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a boolean, if it is one.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Functions compare by identity; everything else compares structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => lhs == rhs,
            (Value::Boolean(lhs), Value::Boolean(rhs)) => lhs == rhs,
            (Value::Str(lhs), Value::Str(rhs)) => lhs == rhs,
            (Value::Vector(lhs), Value::Vector(rhs)) => lhs == rhs,
            (Value::Matrix(lhs), Value::Matrix(rhs)) => lhs == rhs,
            (Value::Function(lhs), Value::Function(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Writes a bracketed, comma-separated list of values.
fn fmt_list(f: &mut fmt::Formatter, values: &[Value]) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        value.fmt(f)?;
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Vector(values) => fmt_list(f, values),
            Value::Matrix(rows) => {
                write!(f, "[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_list(f, row)?;
                }
                write!(f, "]")
            },
            Value::Function(closure) => {
                write!(f, "<function {}(", closure.name())?;
                for (i, param) in closure.decl.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ")>")
            },
        }
    }
}
