//! Array and record operations: range, keys, values, push, pop, join
//!
//! - `range`: Numeric range as an array; 1, 2, or 3 arguments
//! - `keys` / `values`: Record reflection in insertion order
//! - `push`: Append to an array, returns the new length
//! - `pop`: Remove and return the last element, null when empty
//! - `join`: Display forms of elements joined with a separator

use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::value::Value;
use std::rc::Rc;

/// Builds an array of numbers. `range(end)` counts from zero, `range(start,
/// end)` by ones, `range(start, end, step)` by the given step; a negative
/// step counts down. A zero step throws.
pub fn builtin_range(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    let mut numbers = [0.0; 3];
    if args.is_empty() || args.len() > 3 {
        return Err(interp.throw(format!("range: expected 1-3 arguments, got {}", args.len())));
    }
    for (i, arg) in args.iter().enumerate() {
        match arg {
            Value::Number(n) => numbers[i] = *n,
            other => {
                return Err(interp.throw(format!(
                    "range: expected a number, got {} at argument {}",
                    other.type_name(),
                    i + 1
                )));
            }
        }
    }
    let (start, end, step) = match args.len() {
        1 => (0.0, numbers[0], 1.0),
        2 => (numbers[0], numbers[1], 1.0),
        _ => (numbers[0], numbers[1], numbers[2]),
    };
    if step == 0.0 {
        return Err(interp.throw("range: step must not be zero"));
    }
    let mut elements = Vec::new();
    let mut current = start;
    while (step > 0.0 && current < end) || (step < 0.0 && current > end) {
        elements.push(Value::Number(current));
        current += step;
    }
    Ok(Value::array(elements))
}

/// Returns a record's keys as an array of strings, in insertion order.
pub fn builtin_keys(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Record(slots)] => Ok(Value::array(
            slots.borrow().keys().map(Value::str).collect(),
        )),
        [other] => Err(interp.throw(format!("keys: expected a record, got {}", other.type_name()))),
        _ => Err(interp.throw(format!("keys: expected 1 argument, got {}", args.len()))),
    }
}

/// Returns a record's values as an array, in insertion order.
pub fn builtin_values(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Record(slots)] => Ok(Value::array(slots.borrow().values().cloned().collect())),
        [other] => Err(interp.throw(format!(
            "values: expected a record, got {}",
            other.type_name()
        ))),
        _ => Err(interp.throw(format!("values: expected 1 argument, got {}", args.len()))),
    }
}

/// Appends a value to an array in place and returns the new length.
pub fn builtin_push(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Array(elements), value] => {
            let mut elements = elements.borrow_mut();
            elements.push(value.clone());
            Ok(Value::Number(elements.len() as f64))
        }
        [other, _] => Err(interp.throw(format!("push: expected an array, got {}", other.type_name()))),
        _ => Err(interp.throw(format!("push: expected 2 arguments, got {}", args.len()))),
    }
}

/// Removes and returns the last element of an array; null when empty.
pub fn builtin_pop(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Array(elements)] => Ok(elements.borrow_mut().pop().unwrap_or(Value::Null)),
        [other] => Err(interp.throw(format!("pop: expected an array, got {}", other.type_name()))),
        _ => Err(interp.throw(format!("pop: expected 1 argument, got {}", args.len()))),
    }
}

/// Joins the display forms of an array's elements with a separator.
pub fn builtin_join(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Array(elements), Value::Str(sep)] => {
            let joined = elements
                .borrow()
                .iter()
                .map(Value::display_string)
                .collect::<Vec<_>>()
                .join(sep);
            Ok(Value::Str(joined))
        }
        [Value::Array(_), other] => Err(interp.throw(format!(
            "join: expected a string separator, got {}",
            other.type_name()
        ))),
        [other, _] => Err(interp.throw(format!("join: expected an array, got {}", other.type_name()))),
        _ => Err(interp.throw(format!("join: expected 2 arguments, got {}", args.len()))),
    }
}

/// Register collection builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define_unchecked("range", super::builtin("range", builtin_range));
    env.define_unchecked("keys", super::builtin("keys", builtin_keys));
    env.define_unchecked("values", super::builtin("values", builtin_values));
    env.define_unchecked("push", super::builtin("push", builtin_push));
    env.define_unchecked("pop", super::builtin("pop", builtin_pop));
    env.define_unchecked("join", super::builtin("join", builtin_join));
}
