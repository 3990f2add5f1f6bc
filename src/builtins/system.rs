//! Process and host access: clock, cwd, home_dir, env, exec
//!
//! - `clock`: Wall-clock seconds since the Unix epoch
//! - `cwd`: Process working directory
//! - `home_dir`: The user's home directory
//! - `env`: Process environment variables as a record
//! - `exec`: Run a shell command, return captured stdout
//!
//! `exec` blocks the interpreter until the child exits

use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::value::Value;
use indexmap::IndexMap;
use std::process::Command;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns wall-clock seconds since the Unix epoch.
pub fn builtin_clock(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    if !args.is_empty() {
        return Err(interp.throw(format!("clock: expected 0 arguments, got {}", args.len())));
    }
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    Ok(Value::Number(seconds))
}

/// Returns the process working directory.
pub fn builtin_cwd(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    if !args.is_empty() {
        return Err(interp.throw(format!("cwd: expected 0 arguments, got {}", args.len())));
    }
    std::env::current_dir()
        .map(|p| Value::Str(p.display().to_string()))
        .map_err(|e| interp.throw(format!("cwd: {}", e)))
}

/// Returns the user's home directory.
pub fn builtin_home_dir(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    if !args.is_empty() {
        return Err(interp.throw(format!("home_dir: expected 0 arguments, got {}", args.len())));
    }
    match dirs::home_dir() {
        Some(path) => Ok(Value::Str(path.display().to_string())),
        None => Err(interp.throw("home_dir: no home directory for this process")),
    }
}

/// Returns the process environment as a record.
pub fn builtin_env(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    if !args.is_empty() {
        return Err(interp.throw(format!("env: expected 0 arguments, got {}", args.len())));
    }
    let mut slots = IndexMap::new();
    for (key, value) in std::env::vars() {
        slots.insert(key, Value::Str(value));
    }
    Ok(Value::record(slots))
}

/// Runs a command through `sh -c` and returns its captured stdout. Throws
/// when the shell cannot be spawned or the command exits non-zero.
pub fn builtin_exec(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    let command = match args {
        [Value::Str(command)] => command,
        [other] => {
            return Err(interp.throw(format!(
                "exec: expected a command string, got {}",
                other.type_name()
            )));
        }
        _ => {
            return Err(interp.throw(format!("exec: expected 1 argument, got {}", args.len())));
        }
    };
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|e| interp.throw(format!("exec: {}", e)))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(interp.throw(format!(
            "exec: command failed with {}: {}",
            output.status,
            stderr.trim_end()
        )));
    }
    Ok(Value::Str(
        String::from_utf8_lossy(&output.stdout).into_owned(),
    ))
}

/// Register system builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define_unchecked("clock", super::builtin("clock", builtin_clock));
    env.define_unchecked("cwd", super::builtin("cwd", builtin_cwd));
    env.define_unchecked("home_dir", super::builtin("home_dir", builtin_home_dir));
    env.define_unchecked("env", super::builtin("env", builtin_env));
    env.define_unchecked("exec", super::builtin("exec", builtin_exec));
}
