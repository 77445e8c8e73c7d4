//! Lexical scope chain (spec.md §4.3).
//!
//! An `Environment` is a name→value map plus an optional link to its
//! enclosing scope. The chain is acyclic and finite by construction: a
//! child's `enclosing` always points to a strictly shorter-lived parent.
//! `Rc<RefCell<_>>` gives each block its own owned link while letting the
//! interpreter swap "current environment" in and out on block entry/exit
//! without fighting the borrow checker over shared mutable scope state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::diagnostics::RuntimeError;
use crate::token::Token;
use crate::value::Value;

pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// The persistent global scope; has no enclosing environment.
    pub fn new_global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: None,
        }))
    }

    /// A new child scope, created on block entry and discarded on block exit.
    pub fn new_enclosed(enclosing: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }))
    }

    /// Unconditionally binds `name` in this scope, shadowing any enclosing
    /// binding with the same name. Redefinition in the same scope overwrites.
    pub fn define(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    /// Walks the chain from innermost outward; first match wins.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }
        Err(RuntimeError::new(
            name.clone(),
            format!("Undefined variable '{}'.", name.lexeme),
        ))
    }

    /// Overwrites an existing binding found by walking the chain outward.
    /// Never creates a new binding; assignment to an undeclared name fails.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }
        Err(RuntimeError::new(
            name.clone(),
            format!("Undefined variable '{}'.", name.lexeme),
        ))
    }
}
