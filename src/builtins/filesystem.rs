//! Filesystem I/O: read_file, write_file, exists
//!
//! - `read_file`: Read entire file contents as a string
//! - `write_file`: Write a string to a file, creating it if missing
//! - `exists`: Test whether a path exists
//!
//! I/O failures surface as catchable throws

use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::value::Value;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Reads and returns the contents of a file as a string.
pub fn builtin_read_file(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Str(path)] => fs::read_to_string(path)
            .map(Value::Str)
            .map_err(|e| interp.throw(format!("read_file: {}: {}", path, e))),
        [other] => Err(interp.throw(format!(
            "read_file: expected a path string, got {}",
            other.type_name()
        ))),
        _ => Err(interp.throw(format!(
            "read_file: expected 1 argument, got {}",
            args.len()
        ))),
    }
}

/// Writes a string to a file, creating it if it does not exist.
pub fn builtin_write_file(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Str(path), Value::Str(contents)] => fs::write(path, contents)
            .map(|_| Value::Null)
            .map_err(|e| interp.throw(format!("write_file: {}: {}", path, e))),
        [Value::Str(_), other] => Err(interp.throw(format!(
            "write_file: expected string contents, got {}",
            other.type_name()
        ))),
        [other, _] => Err(interp.throw(format!(
            "write_file: expected a path string, got {}",
            other.type_name()
        ))),
        _ => Err(interp.throw(format!(
            "write_file: expected 2 arguments, got {}",
            args.len()
        ))),
    }
}

/// Tests whether a path exists.
pub fn builtin_exists(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Str(path)] => Ok(Value::Bool(Path::new(path).exists())),
        [other] => Err(interp.throw(format!(
            "exists: expected a path string, got {}",
            other.type_name()
        ))),
        _ => Err(interp.throw(format!("exists: expected 1 argument, got {}", args.len()))),
    }
}

/// Register filesystem builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define_unchecked("read_file", super::builtin("read_file", builtin_read_file));
    env.define_unchecked("write_file", super::builtin("write_file", builtin_write_file));
    env.define_unchecked("exists", super::builtin("exists", builtin_exists));
}
