//! Value introspection: len, type
//!
//! - `len`: Number of Unicode scalars in a string, elements in an array,
//!   or slots in a record
//! - `type`: Runtime tag name of any value

use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::value::Value;
use std::rc::Rc;

/// Returns the length of a string, array, or record.
pub fn builtin_len(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    if args.len() != 1 {
        return Err(interp.throw(format!("len: expected 1 argument, got {}", args.len())));
    }
    match &args[0] {
        Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
        Value::Array(elements) => Ok(Value::Number(elements.borrow().len() as f64)),
        Value::Record(slots) => Ok(Value::Number(slots.borrow().len() as f64)),
        other => Err(interp.throw(format!(
            "len: expected a string, array, or record, got {}",
            other.type_name()
        ))),
    }
}

/// Returns the runtime tag name of a value.
pub fn builtin_type(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    if args.len() != 1 {
        return Err(interp.throw(format!("type: expected 1 argument, got {}", args.len())));
    }
    Ok(Value::str(args[0].type_name()))
}

/// Register introspection builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define_unchecked("len", super::builtin("len", builtin_len));
    env.define_unchecked("type", super::builtin("type", builtin_type));
}
