// ABOUTME: Runtime value types shared by the evaluator and builtins

use crate::ast::FunctionDef;
use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::token::Span;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Signature shared by every host builtin: ordered arguments in, a value or
/// a throw out.
pub type BuiltinFn = fn(&mut Interpreter, &[Value]) -> Result<Value, Signal>;

/// A host-provided callable installed into the root environment.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// A closure: the definition plus the environment captured at construction.
/// `this` is present only on instance-bound method closures.
pub struct Function {
    pub decl: Rc<FunctionDef>,
    pub env: Rc<Environment>,
    pub this: Option<Value>,
}

impl Function {
    pub fn name(&self) -> &str {
        self.decl.name.as_deref().unwrap_or("<anonymous>")
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bound `this` points back at the instance holding this closure;
        // printing only the name keeps Debug acyclic.
        f.debug_struct("Function")
            .field("name", &self.decl.name)
            .field("params", &self.decl.params)
            .finish_non_exhaustive()
    }
}

/// A class declaration value: ordered methods plus the environment enclosing
/// the declaration, which method closures capture.
pub struct ClassDef {
    pub name: String,
    pub methods: Vec<Rc<FunctionDef>>,
    pub env: Rc<Environment>,
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Opaque value produced by a host builtin or the host-module resolver.
/// The interpreter passes these through by reference only.
pub trait HostValue: fmt::Debug {
    fn host_type(&self) -> &str {
        "host"
    }
}

pub type Array = Rc<RefCell<Vec<Value>>>;
pub type Record = Rc<RefCell<IndexMap<String, Value>>>;

/// The closed set of runtime values. Arrays and records are shared by
/// reference; scalars copy. Instances are records whose slots hold
/// method-bound closures.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Array),
    Record(Record),
    Function(Rc<Function>),
    Class(Rc<ClassDef>),
    Builtin(Builtin),
    Host(Rc<dyn HostValue>),
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn record(slots: IndexMap<String, Value>) -> Self {
        Value::Record(Rc::new(RefCell::new(slots)))
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// The record shape carried by runtime-error throws.
    pub fn error_record(message: String, span: Option<Span>) -> Self {
        let mut slots = IndexMap::new();
        slots.insert("message".to_string(), Value::Str(message));
        if let Some(span) = span {
            slots.insert("line".to_string(), Value::Number(f64::from(span.line)));
            slots.insert("col".to_string(), Value::Number(f64::from(span.col)));
        }
        Value::record(slots)
    }

    /// `null` and `false` are falsy; every other value is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    /// The runtime tag name reported by the `type` builtin.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Builtin(_) => "builtin",
            Value::Host(_) => "host",
        }
    }

    /// The form used by `print`, `join`, and string coercion: bare strings,
    /// repr for everything else.
    pub fn display_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Structural equality: scalars by value, arrays element-wise, records by
/// key-set and per-key values, callables and host objects by identity.
/// Mixed-type comparisons are false, never an error.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Record(a), Value::Record(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len()
                    && a.iter().all(|(key, value)| b.get(key) == Some(value))
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => {
                a.name == b.name && std::ptr::fn_addr_eq(a.func, b.func)
            }
            (Value::Host(a), Value::Host(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => {
                // Whole numbers print without a trailing .0
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Value::Record(slots) => {
                write!(f, "{{")?;
                for (i, (key, value)) in slots.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => match &func.decl.name {
                Some(name) => write!(f, "<fun {}>", name),
                None => write!(f, "<fun>"),
            },
            Value::Class(class) => write!(f, "<class {}>", class.name),
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            Value::Host(host) => write!(f, "<{}>", host.host_type()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(-2.5).to_string(), "-2.5");
        assert_eq!(Value::Number(0.0).to_string(), "0");
    }

    #[test]
    fn test_container_display() {
        let arr = Value::array(vec![
            Value::Number(1.0),
            Value::str("x"),
            Value::Null,
        ]);
        assert_eq!(arr.to_string(), "[1, \"x\", null]");

        let mut slots = IndexMap::new();
        slots.insert("a".to_string(), Value::Number(1.0));
        slots.insert("b".to_string(), Value::Bool(true));
        assert_eq!(Value::record(slots).to_string(), "{a: 1, b: true}");
    }

    #[test]
    fn test_display_string_leaves_strings_bare() {
        assert_eq!(Value::str("hi").display_string(), "hi");
        assert_eq!(Value::str("hi").to_string(), "\"hi\"");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::str("").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
    }

    #[test]
    fn test_array_equality_is_structural() {
        let a = Value::array(vec![Value::Number(1.0), Value::Number(2.0)]);
        let b = Value::array(vec![Value::Number(1.0), Value::Number(2.0)]);
        let c = Value::array(vec![Value::Number(1.0)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_record_equality_ignores_insertion_order() {
        let mut ab = IndexMap::new();
        ab.insert("a".to_string(), Value::Number(1.0));
        ab.insert("b".to_string(), Value::Number(2.0));
        let mut ba = IndexMap::new();
        ba.insert("b".to_string(), Value::Number(2.0));
        ba.insert("a".to_string(), Value::Number(1.0));
        assert_eq!(Value::record(ab), Value::record(ba));
    }

    #[test]
    fn test_cross_type_equality_is_false() {
        assert_ne!(Value::Number(1.0), Value::str("1"));
        assert_ne!(Value::array(vec![]), Value::Null);
    }

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_error_record_shape() {
        let value = Value::error_record(
            "boom".to_string(),
            Some(Span { line: 3, col: 7 }),
        );
        let Value::Record(slots) = &value else {
            panic!("expected record");
        };
        let slots = slots.borrow();
        assert_eq!(slots.get("message"), Some(&Value::str("boom")));
        assert_eq!(slots.get("line"), Some(&Value::Number(3.0)));
    }
}
