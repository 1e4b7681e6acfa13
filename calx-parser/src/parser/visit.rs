//! A visitor over the syntax tree, so that each interpretation of an [`Expr`] (reduction to an
//! algebraic expression, static resolution, numeric evaluation) lives in its own type.

use super::{
    assign::Assign,
    binary::Binary,
    call::{Call, NativeCall},
    expr::Expr,
    literal::{LitFloat, LitInt, LitSym, Literal},
    logic::{Logical, Not, Relation},
    paren::Paren,
    unary::Unary,
    vector::{Matrix, Vector},
};

/// An operation over every kind of [`Expr`] node.
pub trait Visitor {
    /// The result of visiting a node.
    type Output;

    fn visit_integer(&mut self, int: &LitInt) -> Self::Output;
    fn visit_float(&mut self, float: &LitFloat) -> Self::Output;
    fn visit_literal(&mut self, literal: &Literal) -> Self::Output;
    fn visit_variable(&mut self, sym: &LitSym) -> Self::Output;
    fn visit_paren(&mut self, paren: &Paren) -> Self::Output;
    fn visit_binary(&mut self, binary: &Binary) -> Self::Output;
    fn visit_unary(&mut self, unary: &Unary) -> Self::Output;
    fn visit_assign(&mut self, assign: &Assign) -> Self::Output;
    fn visit_relation(&mut self, relation: &Relation) -> Self::Output;
    fn visit_logical(&mut self, logical: &Logical) -> Self::Output;
    fn visit_not(&mut self, not: &Not) -> Self::Output;
    fn visit_call(&mut self, call: &Call) -> Self::Output;
    fn visit_native_call(&mut self, call: &NativeCall) -> Self::Output;
    fn visit_vector(&mut self, vector: &Vector) -> Self::Output;
    fn visit_matrix(&mut self, matrix: &Matrix) -> Self::Output;
}

impl Expr {
    /// Dispatches to the visitor method matching this node.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Integer(int) => visitor.visit_integer(int),
            Expr::Float(float) => visitor.visit_float(float),
            Expr::Literal(literal) => visitor.visit_literal(literal),
            Expr::Variable(sym) => visitor.visit_variable(sym),
            Expr::Paren(paren) => visitor.visit_paren(paren),
            Expr::Binary(binary) => visitor.visit_binary(binary),
            Expr::Unary(unary) => visitor.visit_unary(unary),
            Expr::Assign(assign) => visitor.visit_assign(assign),
            Expr::Relation(relation) => visitor.visit_relation(relation),
            Expr::Logical(logical) => visitor.visit_logical(logical),
            Expr::Not(not) => visitor.visit_not(not),
            Expr::Call(call) => visitor.visit_call(call),
            Expr::NativeCall(call) => visitor.visit_native_call(call),
            Expr::Vector(vector) => visitor.visit_vector(vector),
            Expr::Matrix(matrix) => visitor.visit_matrix(matrix),
        }
    }
}
