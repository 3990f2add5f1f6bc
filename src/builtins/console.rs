//! Console output: print
//!
//! - `print`: Output the display form of each argument, space-separated,
//!   with a trailing newline. Strings print bare; containers print as repr.
//!
//! Returns null

use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::value::Value;
use std::rc::Rc;

/// Prints values to stdout with a trailing newline. Returns null.
pub fn builtin_print(_interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    let line = args
        .iter()
        .map(Value::display_string)
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", line);
    Ok(Value::Null)
}

/// Register console builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define_unchecked("print", super::builtin("print", builtin_print));
}
