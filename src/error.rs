// ABOUTME: Error types and control-flow signals for the interpreter

use crate::token::Span;
use crate::value::Value;
use thiserror::Error;

/// A lex or parse failure. These abort compilation of the source unit and
/// are never catchable by `try`/`catch`.
#[derive(Error, Debug, Clone)]
#[error("{message} at {file}:{line}:{col}")]
pub struct SyntaxError {
    pub message: String,
    pub file: String,
    pub line: u32,
    pub col: u32,
    /// True when the input simply ended too early (unterminated string,
    /// unexpected EOF token). The REPL uses this to keep buffering.
    pub incomplete: bool,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, file: &str, span: Span) -> Self {
        SyntaxError {
            message: message.into(),
            file: file.to_string(),
            line: span.line,
            col: span.col,
            incomplete: false,
        }
    }

    pub fn incomplete(message: impl Into<String>, file: &str, span: Span) -> Self {
        SyntaxError {
            incomplete: true,
            ..Self::new(message, file, span)
        }
    }
}

/// Binding failures reported by the environment chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("'{0}' is already defined in this scope")]
    AlreadyDefined(String),

    #[error("undefined variable '{0}'")]
    Undefined(String),

    #[error("cannot assign to constant '{0}'")]
    ConstReassign(String),
}

/// Non-value outcome of evaluating a node. Signals propagate outward until
/// a matching construct catches them: `Return` at the nearest function
/// frame, `Break`/`Continue` at the nearest loop, `Throw` at the nearest
/// `try` with a catch clause.
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Value),
    Break,
    Continue,
    Throw(Value),
}

impl Signal {
    /// A runtime error as a throwable record: `{message}`.
    pub fn error(message: impl Into<String>) -> Self {
        Signal::Throw(Value::error_record(message.into(), None))
    }

    /// A runtime error carrying the offending position: `{message, line, col}`.
    pub fn error_at(message: impl Into<String>, span: Span) -> Self {
        Signal::Throw(Value::error_record(message.into(), Some(span)))
    }
}

/// Top-level outcome of running a source unit.
#[derive(Error, Debug, Clone)]
pub enum AuroraError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("uncaught error: {}", thrown_summary(value))]
    Uncaught { value: Value, trace: Vec<String> },
}

/// Short display form of a thrown value: the `message` slot when the value
/// is an error record, the display form otherwise.
pub fn thrown_summary(value: &Value) -> String {
    if let Value::Record(slots) = value {
        if let Some(Value::Str(msg)) = slots.borrow().get("message") {
            return msg.clone();
        }
    }
    value.display_string()
}
