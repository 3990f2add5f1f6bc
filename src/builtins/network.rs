//! Network I/O: http_get
//!
//! - `http_get`: Synchronous GET request, response body as a string
//!
//! Requests have a 30 second timeout. Failures, including non-2xx status
//! codes, surface as catchable throws.

use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::value::Value;
use std::rc::Rc;
use std::time::Duration;

/// Performs an HTTP GET request and returns the response body as a string.
pub fn builtin_http_get(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    let url = match args {
        [Value::Str(url)] => url,
        [other] => {
            return Err(interp.throw(format!(
                "http_get: expected a URL string, got {}",
                other.type_name()
            )));
        }
        _ => {
            return Err(interp.throw(format!(
                "http_get: expected 1 argument, got {}",
                args.len()
            )));
        }
    };
    let response = ureq::get(url)
        .timeout(Duration::from_secs(30))
        .call()
        .map_err(|e| interp.throw(format!("http_get: {}: {}", url, e)))?;
    response
        .into_string()
        .map(Value::Str)
        .map_err(|e| interp.throw(format!("http_get: {}: {}", url, e)))
}

/// Register network builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define_unchecked("http_get", super::builtin("http_get", builtin_http_get));
}
