//! JSON encoding and decoding: json_parse, json_stringify
//!
//! Type mapping:
//! - record ↔ JSON object (insertion order preserved)
//! - array ↔ JSON array
//! - number ↔ JSON number
//! - string ↔ JSON string
//! - bool ↔ JSON boolean
//! - null ↔ JSON null
//!
//! Functions, classes, builtins, and host objects do not encode.

use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::value::Value;
use indexmap::IndexMap;
use std::rc::Rc;

fn value_to_json(interp: &mut Interpreter, value: &Value) -> Result<serde_json::Value, Signal> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Number(n) => {
            // Whole numbers encode as JSON integers, not 1.0-style floats
            if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                return Ok(serde_json::Value::from(*n as i64));
            }
            match serde_json::Number::from_f64(*n) {
                Some(number) => Ok(serde_json::Value::Number(number)),
                None => Err(interp.throw(format!("json_stringify: cannot encode number {}", n))),
            }
        }
        Value::Str(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Array(elements) => {
            let elements = elements.borrow().clone();
            let mut encoded = Vec::with_capacity(elements.len());
            for element in &elements {
                encoded.push(value_to_json(interp, element)?);
            }
            Ok(serde_json::Value::Array(encoded))
        }
        Value::Record(slots) => {
            let slots = slots.borrow().clone();
            let mut object = serde_json::Map::new();
            for (key, value) in &slots {
                object.insert(key.clone(), value_to_json(interp, value)?);
            }
            Ok(serde_json::Value::Object(object))
        }
        other => Err(interp.throw(format!(
            "json_stringify: cannot encode {}",
            other.type_name()
        ))),
    }
}

fn json_to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Array(elements) => {
            Value::array(elements.iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(object) => {
            let mut slots = IndexMap::with_capacity(object.len());
            for (key, value) in object {
                slots.insert(key.clone(), json_to_value(value));
            }
            Value::record(slots)
        }
    }
}

/// Parses JSON text into a value.
pub fn builtin_json_parse(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    match args {
        [Value::Str(text)] => serde_json::from_str::<serde_json::Value>(text)
            .map(|json| json_to_value(&json))
            .map_err(|e| interp.throw(format!("json_parse: {}", e))),
        [other] => Err(interp.throw(format!(
            "json_parse: expected a string, got {}",
            other.type_name()
        ))),
        _ => Err(interp.throw(format!(
            "json_parse: expected 1 argument, got {}",
            args.len()
        ))),
    }
}

/// Encodes a value as compact JSON text.
pub fn builtin_json_stringify(interp: &mut Interpreter, args: &[Value]) -> Result<Value, Signal> {
    if args.len() != 1 {
        return Err(interp.throw(format!(
            "json_stringify: expected 1 argument, got {}",
            args.len()
        )));
    }
    let json = value_to_json(interp, &args[0])?;
    Ok(Value::Str(json.to_string()))
}

/// Register JSON builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define_unchecked("json_parse", super::builtin("json_parse", builtin_json_parse));
    env.define_unchecked(
        "json_stringify",
        super::builtin("json_stringify", builtin_json_stringify),
    );
}
