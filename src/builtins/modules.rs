//! Module loading: require, host_require
//!
//! - `require`: Load a module by specifier. Path specifiers (`./`, `../`,
//!   `/`) evaluate an aurora source file once per interpreter and cache its
//!   export record; other specifiers resolve through the host-module
//!   registry.
//! - `host_require`: Host-module registry only, no file loading.

use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::value::Value;
use std::rc::Rc;

/// Loads a module and returns its export record (or host object).
pub fn builtin_require(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Str(spec)] => interp.load_module(spec, None),
        [other] => Err(interp.throw(format!(
            "require: expected a specifier string, got {}",
            other.type_name()
        ))),
        _ => Err(interp.throw(format!(
            "require: expected 1 argument, got {}",
            args.len()
        ))),
    }
}

/// Resolves a registered host module by name.
pub fn builtin_host_require(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Str(name)] => interp.load_host_module(name, None),
        [other] => Err(interp.throw(format!(
            "host_require: expected a module name string, got {}",
            other.type_name()
        ))),
        _ => Err(interp.throw(format!(
            "host_require: expected 1 argument, got {}",
            args.len()
        ))),
    }
}

/// Register module builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define_unchecked("require", super::builtin("require", builtin_require));
    env.define_unchecked(
        "host_require",
        super::builtin("host_require", builtin_host_require),
    );
}
