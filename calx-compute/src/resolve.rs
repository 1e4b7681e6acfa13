//! Static resolution of variable references.
//!
//! Before a program runs, the [`Resolver`] walks it once and records, for every reference to a
//! function parameter, how many scopes separate the reference from the parameter's declaration.
//! The evaluator then reads the variable directly from that scope instead of searching the whole
//! chain. Names that are not parameters are globals and are looked up by name.

use calx_parser::parser::{
    assign::Assign,
    binary::Binary,
    call::{Call, NativeCall},
    literal::{LitFloat, LitInt, LitSym, Literal},
    logic::{Logical, Not, Relation},
    paren::Paren,
    stmt::{FnDecl, Program, Stmt},
    unary::Unary,
    vector::{Matrix, Vector},
    visit::Visitor,
};
use crate::error::{kind, Error};
use levenshtein::levenshtein;
use std::{collections::{HashMap, HashSet}, ops::Range};
use tracing::{debug, trace};

/// The scope distances computed by the [`Resolver`], keyed by the start of each reference's
/// span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locals(HashMap<usize, usize>);

impl Locals {
    /// Returns the number of scopes between the reference and the scope that declares it, or
    /// [`None`] if the reference is to a global.
    pub fn get(&self, sym: &LitSym) -> Option<usize> {
        self.0.get(&sym.span.start).copied()
    }

    /// Returns the number of resolved references.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no reference was resolved to a local scope.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Computes [`Locals`] for a program and rejects references to names that are never declared.
#[derive(Debug, Default)]
pub struct Resolver {
    /// The parameter scopes currently entered, innermost last. Each maps a parameter name to the
    /// span of its declaration.
    scopes: Vec<HashMap<String, Range<usize>>>,

    /// Every name declared at the top level of the program. Function bodies run after the whole
    /// program is loaded, so they may refer to any of them.
    globals: HashSet<String>,

    /// The top-level names declared so far, visible to top-level statements.
    declared: HashSet<String>,

    locals: Locals,
}

impl Resolver {
    /// Resolves every statement in the program.
    pub fn resolve(program: &Program) -> Result<Locals, Error> {
        let mut resolver = Self {
            globals: program.iter()
                .filter_map(|stmt| match stmt {
                    Stmt::Let(stmt) => Some(stmt.name.name.clone()),
                    Stmt::Fn(decl) => Some(decl.name.name.clone()),
                    Stmt::Expr(_) => None,
                })
                .collect(),
            ..Self::default()
        };

        for stmt in program {
            resolver.resolve_stmt(stmt)?;
        }

        debug!(globals = resolver.globals.len(), locals = resolver.locals.len(), "resolved program");
        Ok(resolver.locals)
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Expr(expr) => expr.accept(self),
            Stmt::Let(stmt) => {
                stmt.value.accept(self)?;
                self.declared.insert(stmt.name.name.clone());
                Ok(())
            },
            Stmt::Fn(decl) => {
                self.declared.insert(decl.name.name.clone());
                self.resolve_fn(decl)
            },
        }
    }

    fn resolve_fn(&mut self, decl: &FnDecl) -> Result<(), Error> {
        let mut params = HashMap::new();
        for param in &decl.params {
            if let Some(first) = params.insert(param.name.clone(), param.span.clone()) {
                return Err(Error::new(vec![first, param.span.clone()], kind::DuplicateParameter {
                    name: param.name.clone(),
                }));
            }
        }

        self.scopes.push(params);
        let result = decl.body.accept(self);
        self.scopes.pop();
        result
    }

    /// Records the distance to the scope declaring `sym`, if it is a parameter. Returns true if
    /// it was found in a local scope.
    fn resolve_local(&mut self, sym: &LitSym) -> bool {
        let found = self.scopes.iter()
            .rev()
            .position(|scope| scope.contains_key(&sym.name));
        if let Some(distance) = found {
            trace!(name = %sym.name, distance, "resolved local");
            self.locals.0.insert(sym.span.start, distance);
        }
        found.is_some()
    }

    /// Resolves a read of `sym`, failing if no scope or global declares it.
    fn resolve_read(&mut self, sym: &LitSym) -> Result<(), Error> {
        if self.resolve_local(sym) {
            return Ok(());
        }

        let visible = if self.scopes.is_empty() { &self.declared } else { &self.globals };
        if visible.contains(&sym.name) {
            return Ok(());
        }

        let mut suggestions = visible.iter()
            .chain(self.scopes.iter().flat_map(|scope| scope.keys()))
            .filter(|candidate| levenshtein(candidate, &sym.name) < 2)
            .cloned()
            .collect::<Vec<_>>();
        suggestions.sort();
        suggestions.dedup();

        Err(Error::new(vec![sym.span.clone()], kind::UndefinedVariable {
            name: sym.name.clone(),
            suggestions,
        }))
    }
}

impl Visitor for Resolver {
    type Output = Result<(), Error>;

    fn visit_integer(&mut self, _: &LitInt) -> Self::Output {
        Ok(())
    }

    fn visit_float(&mut self, _: &LitFloat) -> Self::Output {
        Ok(())
    }

    fn visit_literal(&mut self, _: &Literal) -> Self::Output {
        Ok(())
    }

    fn visit_variable(&mut self, sym: &LitSym) -> Self::Output {
        self.resolve_read(sym)
    }

    fn visit_paren(&mut self, paren: &Paren) -> Self::Output {
        paren.expr.accept(self)
    }

    fn visit_binary(&mut self, binary: &Binary) -> Self::Output {
        binary.lhs.accept(self)?;
        binary.rhs.accept(self)
    }

    fn visit_unary(&mut self, unary: &Unary) -> Self::Output {
        unary.operand.accept(self)
    }

    /// Assignment targets are not checked here; assigning to an undeclared global is reported by
    /// the environment when the assignment runs.
    fn visit_assign(&mut self, assign: &Assign) -> Self::Output {
        assign.value.accept(self)?;
        self.resolve_local(&assign.target);
        Ok(())
    }

    fn visit_relation(&mut self, relation: &Relation) -> Self::Output {
        relation.lhs.accept(self)?;
        relation.rhs.accept(self)
    }

    fn visit_logical(&mut self, logical: &Logical) -> Self::Output {
        logical.lhs.accept(self)?;
        logical.rhs.accept(self)
    }

    fn visit_not(&mut self, not: &Not) -> Self::Output {
        not.operand.accept(self)
    }

    fn visit_call(&mut self, call: &Call) -> Self::Output {
        self.resolve_read(&call.name)?;
        call.args.iter().try_for_each(|arg| arg.accept(self))
    }

    fn visit_native_call(&mut self, call: &NativeCall) -> Self::Output {
        call.args.iter().try_for_each(|arg| arg.accept(self))
    }

    fn visit_vector(&mut self, vector: &Vector) -> Self::Output {
        vector.elements.iter().try_for_each(|element| element.accept(self))
    }

    fn visit_matrix(&mut self, matrix: &Matrix) -> Self::Output {
        matrix.rows.iter().flatten().try_for_each(|element| element.accept(self))
    }
}
