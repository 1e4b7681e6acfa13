//! Lexically scoped storage for variables.
//!
//! An [`Environment`] is an arena of [`Scope`]s addressed by [`ScopeId`] handles. Every scope
//! except the global one has a parent, and lookups that miss in a scope continue in its parent.
//! Scopes are pushed when a function is called and popped when the call returns, so the arena
//! behaves like a stack; closures keep the [`ScopeId`] of the scope they were declared in.

use calx_parser::parser::literal::LitSym;
use crate::{error::{kind, Error}, value::Value};
use levenshtein::levenshtein;
use std::collections::HashMap;
use tracing::trace;

/// A handle to a scope in an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A single scope, holding the variables declared in it.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// The variables declared in this scope.
    vars: HashMap<String, Value>,

    /// The enclosing scope, or [`None`] for the global scope.
    parent: Option<ScopeId>,
}

impl Scope {
    /// Returns the enclosing scope.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Returns the value of the variable with the given name, if it is declared in this scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

/// Storage for every variable visible to an evaluation.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            scopes: vec![Scope::default()], // global scope
        }
    }
}

impl Environment {
    /// Creates an environment containing only the global scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the global scope.
    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Returns the scope with the given handle.
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    /// Creates a new scope whose parent is `parent`.
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            vars: HashMap::new(),
            parent: Some(parent),
        });
        trace!(scope = id.0, parent = parent.0, "pushed scope");
        id
    }

    /// Removes the given scope, which must be the most recently pushed one. The global scope is
    /// never removed.
    pub fn pop_scope(&mut self, id: ScopeId) {
        debug_assert_eq!(id.0 + 1, self.scopes.len(), "scopes must be popped in stack order");
        if id.0 != 0 && id.0 + 1 == self.scopes.len() {
            self.scopes.pop();
            trace!(scope = id.0, "popped scope");
        }
    }

    /// Walks `distance` parent links up from `scope`. Returns [`None`] if that walks past the
    /// global scope.
    pub fn ancestor(&self, scope: ScopeId, distance: usize) -> Option<ScopeId> {
        let mut current = scope;
        for _ in 0..distance {
            current = self.scopes.get(current.0)?.parent?;
        }
        self.scopes.get(current.0).map(|_| current)
    }

    /// Iterates over `scope` and each of its ancestors, innermost first.
    fn chain(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> + '_ {
        std::iter::successors(self.scopes.get(scope.0), move |scope| {
            scope.parent.and_then(|parent| self.scopes.get(parent.0))
        })
    }

    /// Returns the names visible from `scope` that are spelled similarly to `name`.
    fn similar_names(&self, scope: ScopeId, name: &str) -> Vec<String> {
        let mut names = self.chain(scope)
            .flat_map(|scope| scope.vars.keys())
            .filter(|candidate| levenshtein(candidate, name) < 2)
            .cloned()
            .collect::<Vec<_>>();
        names.sort();
        names.dedup();
        names
    }

    /// Declares a variable in `scope`, replacing any variable of the same name declared in that
    /// same scope. Variables in enclosing scopes are shadowed, not modified.
    pub fn define(&mut self, scope: ScopeId, name: impl Into<String>, value: Value) {
        let name = name.into();
        trace!(scope = scope.0, name = %name, value = %value, "define");
        if let Some(target) = self.scopes.get_mut(scope.0) {
            target.vars.insert(name, value);
        }
    }

    /// Returns the value of the variable, searching `scope` and then each enclosing scope.
    pub fn get(&self, scope: ScopeId, sym: &LitSym) -> Result<Value, Error> {
        trace!(scope = scope.0, name = %sym.name, "get");
        self.chain(scope)
            .find_map(|scope| scope.vars.get(&sym.name))
            .cloned()
            .ok_or_else(|| Error::new(vec![sym.span.clone()], kind::UndefinedVariable {
                name: sym.name.clone(),
                suggestions: self.similar_names(scope, &sym.name),
            }))
    }

    /// Updates the nearest existing variable with the given name, searching `scope` and then
    /// each enclosing scope. Fails if no such variable exists; this never declares a variable.
    pub fn assign(&mut self, scope: ScopeId, sym: &LitSym, value: Value) -> Result<(), Error> {
        trace!(scope = scope.0, name = %sym.name, value = %value, "assign");
        let owner = self.chain(scope)
            .position(|scope| scope.vars.contains_key(&sym.name))
            .and_then(|distance| self.ancestor(scope, distance));

        let slot = match owner {
            Some(owner) => self.scopes[owner.0].vars.get_mut(&sym.name),
            None => None,
        };
        match slot {
            Some(slot) => {
                *slot = value;
                Ok(())
            },
            None => Err(Error::new(vec![sym.span.clone()], kind::UndefinedAssignment {
                name: sym.name.clone(),
            })),
        }
    }

    /// Returns the value of the variable declared exactly `distance` scopes above `scope`.
    pub fn get_at(&self, scope: ScopeId, distance: usize, sym: &LitSym) -> Result<Value, Error> {
        trace!(scope = scope.0, distance, name = %sym.name, "get_at");
        self.ancestor(scope, distance)
            .and_then(|owner| self.scopes[owner.0].vars.get(&sym.name))
            .cloned()
            .ok_or_else(|| unresolved(sym, distance))
    }

    /// Updates the variable declared exactly `distance` scopes above `scope`.
    pub fn assign_at(
        &mut self,
        scope: ScopeId,
        distance: usize,
        sym: &LitSym,
        value: Value,
    ) -> Result<(), Error> {
        trace!(scope = scope.0, distance, name = %sym.name, value = %value, "assign_at");
        let owner = self.ancestor(scope, distance).ok_or_else(|| unresolved(sym, distance))?;
        match self.scopes[owner.0].vars.get_mut(&sym.name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            },
            None => Err(unresolved(sym, distance)),
        }
    }
}

/// Builds the error for a precomputed distance that does not lead to the variable.
fn unresolved(sym: &LitSym, distance: usize) -> Error {
    Error::new_fatal(vec![sym.span.clone()], kind::UnresolvedScope {
        name: sym.name.clone(),
        distance,
    })
}
