// ABOUTME: Environment chain for variable bindings and lexical scopes

use crate::error::EnvError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// One scope: a name→value mapping, the names marked const, and the parent
/// link. Nodes are reference-counted because closures keep their defining
/// scope alive past the frame that created it.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    consts: RefCell<HashSet<String>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a root environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            consts: RefCell::new(HashSet::new()),
            parent: None,
        })
    }

    /// Creates a child scope.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            consts: RefCell::new(HashSet::new()),
            parent: Some(parent),
        })
    }

    /// Defines a binding in THIS scope. Redefinition in the same scope is an
    /// error; shadowing an outer scope is not.
    pub fn define(&self, name: &str, value: Value, constant: bool) -> Result<(), EnvError> {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(name) {
            return Err(EnvError::AlreadyDefined(name.to_string()));
        }
        bindings.insert(name.to_string(), value);
        if constant {
            self.consts.borrow_mut().insert(name.to_string());
        }
        Ok(())
    }

    /// Overwrites or creates a binding in THIS scope without collision or
    /// const checks. Used for internal frame slots (`this`, parameters re-use
    /// `define`) and the builtin registry.
    pub fn define_unchecked(&self, name: &str, value: Value) {
        self.bindings
            .borrow_mut()
            .insert(name.to_string(), value);
    }

    /// Looks a name up through the parent chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.get(name)
    }

    /// Reassigns an existing binding, walking the parent chain to the
    /// defining scope. Fails on const bindings and on names never defined.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), EnvError> {
        if self.bindings.borrow().contains_key(name) {
            if self.consts.borrow().contains(name) {
                return Err(EnvError::ConstReassign(name.to_string()));
            }
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(EnvError::Undefined(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Number(42.0), false).unwrap();
        assert_eq!(env.get("x"), Some(Value::Number(42.0)));
    }

    #[test]
    fn test_undefined_name() {
        let env = Environment::new();
        assert_eq!(env.get("missing"), None);
        assert_eq!(
            env.assign("missing", Value::Null),
            Err(EnvError::Undefined("missing".to_string()))
        );
    }

    #[test]
    fn test_redefinition_in_same_scope_fails() {
        let env = Environment::new();
        env.define("x", Value::Number(1.0), false).unwrap();
        assert_eq!(
            env.define("x", Value::Number(2.0), false),
            Err(EnvError::AlreadyDefined("x".to_string()))
        );
    }

    #[test]
    fn test_shadowing_in_child_scope() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0), false).unwrap();
        let child = Environment::with_parent(parent.clone());
        child.define("x", Value::Number(2.0), false).unwrap();
        assert_eq!(child.get("x"), Some(Value::Number(2.0)));
        assert_eq!(parent.get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_assign_walks_to_defining_scope() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0), false).unwrap();
        let child = Environment::with_parent(parent.clone());
        child.assign("x", Value::Number(5.0)).unwrap();
        assert_eq!(parent.get("x"), Some(Value::Number(5.0)));
    }

    #[test]
    fn test_const_cannot_be_reassigned() {
        let env = Environment::new();
        env.define("c", Value::Number(1.0), true).unwrap();
        assert_eq!(
            env.assign("c", Value::Number(2.0)),
            Err(EnvError::ConstReassign("c".to_string()))
        );
        // Shadowing a const in a child scope is still allowed
        let child = Environment::with_parent(env);
        child.define("c", Value::Number(2.0), false).unwrap();
        assert_eq!(child.get("c"), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_lookup_through_multiple_levels() {
        let grandparent = Environment::new();
        grandparent.define("a", Value::Number(1.0), false).unwrap();
        let parent = Environment::with_parent(grandparent);
        parent.define("b", Value::Number(2.0), false).unwrap();
        let child = Environment::with_parent(parent);
        assert_eq!(child.get("a"), Some(Value::Number(1.0)));
        assert_eq!(child.get("b"), Some(Value::Number(2.0)));
    }
}
