//! # Built-in Functions
//!
//! Host-provided callables installed into the root environment at
//! interpreter construction, organized by category:
//!
//! - **[console]**: print — Output
//! - **[types]**: len, type — Value introspection
//! - **[collections]**: range, keys, values, push, pop, join — Arrays and records
//! - **[filesystem]**: read_file, write_file, exists — Whole-file I/O
//! - **[system]**: clock, cwd, home_dir, env, exec — Process and host access
//! - **[network]**: http_get — Synchronous HTTP
//! - **[json]**: json_parse, json_stringify — JSON encoding and decoding
//! - **[modules]**: require, host_require — Module loading
//!
//! Every builtin has the same invocation shape: an ordered argument list in,
//! a value out, or a `Signal::Throw` carrying an error record.

use crate::env::Environment;
use crate::value::{Builtin, BuiltinFn, Value};
use std::rc::Rc;

pub mod collections;
pub mod console;
pub mod filesystem;
pub mod json;
pub mod modules;
pub mod network;
pub mod system;
pub mod types;

/// Register all built-in functions in the environment
pub fn register_builtins(env: &Rc<Environment>) {
    console::register(env);
    types::register(env);
    collections::register(env);
    filesystem::register(env);
    system::register(env);
    network::register(env);
    json::register(env);
    modules::register(env);
}

/// Wraps a builtin function as a value for registration.
pub(crate) fn builtin(name: &'static str, func: BuiltinFn) -> Value {
    Value::Builtin(Builtin { name, func })
}
