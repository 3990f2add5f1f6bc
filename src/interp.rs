// ABOUTME: Tree-walking evaluator with environments, signals, and call frames

use crate::ast::{BinaryOp, BindKind, Expr, LogicalOp, Program, Stmt, UnaryOp};
use crate::builtins::register_builtins;
use crate::env::Environment;
use crate::error::{AuroraError, EnvError, Signal};
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::token::{Literal, Span};
use crate::value::{ClassDef, Function, Value};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Call depth after which further calls throw instead of blowing the host
/// stack.
const MAX_CALL_DEPTH: usize = 256;

/// How many innermost frames an uncaught error reports.
const TRACE_LIMIT: usize = 10;

/// The interpreter: root environment, module cache, and the call-frame
/// bookkeeping used for back-traces. Strictly sequential; one instance
/// evaluates one program at a time.
pub struct Interpreter {
    globals: Rc<Environment>,
    pub(crate) modules: HashMap<PathBuf, Value>,
    pub(crate) host_modules: HashMap<String, Value>,
    frames: Vec<String>,
    last_trace: Vec<String>,
    file: Rc<str>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new();
        register_builtins(&globals);
        Interpreter {
            globals,
            modules: HashMap::new(),
            host_modules: HashMap::new(),
            frames: Vec::new(),
            last_trace: Vec::new(),
            file: Rc::from("<main>"),
        }
    }

    pub fn globals(&self) -> &Rc<Environment> {
        &self.globals
    }

    /// Lexes, parses, and evaluates a source unit in the root environment.
    /// Returns the value of the last statement.
    pub fn run(&mut self, source: &str, file: &str) -> Result<Value, AuroraError> {
        let tokens = tokenize(source, file)?;
        let program = parse(tokens)?;
        self.eval_program(&program, self.globals.clone())
    }

    /// Evaluates an already-parsed program, converting an escaping throw
    /// into a top-level error with its captured back-trace.
    pub fn eval_program(
        &mut self,
        program: &Program,
        env: Rc<Environment>,
    ) -> Result<Value, AuroraError> {
        match self.exec_program_body(program, env) {
            Ok(value) => Ok(value),
            Err(Signal::Throw(value)) => Err(AuroraError::Uncaught {
                value,
                trace: std::mem::take(&mut self.last_trace),
            }),
            Err(_) => unreachable!("exec_program_body converts stray signals"),
        }
    }

    /// Runs a program body, converting loose control-flow signals at the
    /// program boundary into runtime errors.
    pub(crate) fn exec_program_body(
        &mut self,
        program: &Program,
        env: Rc<Environment>,
    ) -> Result<Value, Signal> {
        let saved = std::mem::replace(&mut self.file, program.file.clone());
        let mut result = Ok(Value::Null);
        for stmt in &program.body {
            result = self.exec(stmt, &env);
            if result.is_err() {
                break;
            }
        }
        self.file = saved;
        result.map_err(|signal| match signal {
            Signal::Return(_) => self.throw("'return' outside of a function"),
            Signal::Break => self.throw("'break' outside of a loop"),
            Signal::Continue => self.throw("'continue' outside of a loop"),
            throw => throw,
        })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn exec(&mut self, stmt: &Stmt, env: &Rc<Environment>) -> Result<Value, Signal> {
        match stmt {
            Stmt::Block { body } => {
                let scope = Environment::with_parent(env.clone());
                let mut last = Value::Null;
                for stmt in body {
                    last = self.exec(stmt, &scope)?;
                }
                Ok(last)
            }

            Stmt::VarDecl {
                kind,
                name,
                init,
                span,
            } => {
                let value = match init {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::Null,
                };
                env.define(name, value, *kind == BindKind::Const)
                    .map_err(|e| self.throw_at(e.to_string(), *span))?;
                Ok(Value::Null)
            }

            Stmt::Function { decl } => {
                let closure = Value::Function(Rc::new(Function {
                    decl: decl.clone(),
                    env: env.clone(),
                    this: None,
                }));
                let name = decl.name.as_deref().expect("declaration has a name");
                env.define(name, closure, true)
                    .map_err(|e| self.throw_at(e.to_string(), decl.span))?;
                Ok(Value::Null)
            }

            Stmt::Class {
                name,
                methods,
                span,
            } => {
                let class = Value::Class(Rc::new(ClassDef {
                    name: name.clone(),
                    methods: methods.clone(),
                    env: env.clone(),
                }));
                env.define(name, class, true)
                    .map_err(|e| self.throw_at(e.to_string(), *span))?;
                Ok(Value::Null)
            }

            Stmt::Import { local, path, span } => {
                let value = self.load_module(path, Some(*span))?;
                if let Some(name) = local {
                    env.define(name, value, true)
                        .map_err(|e| self.throw_at(e.to_string(), *span))?;
                }
                Ok(Value::Null)
            }

            Stmt::If { test, then, alt } => {
                if self.eval(test, env)?.is_truthy() {
                    self.exec(then, env)
                } else if let Some(alt) = alt {
                    self.exec(alt, env)
                } else {
                    Ok(Value::Null)
                }
            }

            Stmt::While { test, body } => {
                while self.eval(test, env)?.is_truthy() {
                    match self.exec(body, env) {
                        Ok(_) | Err(Signal::Continue) => {}
                        Err(Signal::Break) => break,
                        Err(other) => return Err(other),
                    }
                }
                Ok(Value::Null)
            }

            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                // One enclosing scope covers init, test, update, and body.
                let scope = Environment::with_parent(env.clone());
                if let Some(init) = init {
                    self.exec(init, &scope)?;
                }
                loop {
                    if let Some(test) = test {
                        if !self.eval(test, &scope)?.is_truthy() {
                            break;
                        }
                    }
                    match self.exec(body, &scope) {
                        Ok(_) | Err(Signal::Continue) => {}
                        Err(Signal::Break) => break,
                        Err(other) => return Err(other),
                    }
                    if let Some(update) = update {
                        self.eval(update, &scope)?;
                    }
                }
                Ok(Value::Null)
            }

            Stmt::Return { value, span: _ } => {
                let value = match value {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::Null,
                };
                Err(Signal::Return(value))
            }

            Stmt::Break { span: _ } => Err(Signal::Break),
            Stmt::Continue { span: _ } => Err(Signal::Continue),

            Stmt::Try {
                body,
                param,
                handler,
            } => {
                let scope = Environment::with_parent(env.clone());
                let result = (|| -> Result<Value, Signal> {
                    let mut last = Value::Null;
                    for stmt in body {
                        last = self.exec(stmt, &scope)?;
                    }
                    Ok(last)
                })();
                match result {
                    Err(Signal::Throw(thrown)) => match handler {
                        Some(handler) => {
                            let scope = Environment::with_parent(env.clone());
                            if let Some(param) = param {
                                scope.define_unchecked(param, thrown);
                            }
                            let mut last = Value::Null;
                            for stmt in handler {
                                last = self.exec(stmt, &scope)?;
                            }
                            Ok(last)
                        }
                        // `try` without `catch` does not catch.
                        None => Err(Signal::Throw(thrown)),
                    },
                    other => other,
                }
            }

            Stmt::Throw { value, span: _ } => {
                let thrown = self.eval(value, env)?;
                self.capture_trace();
                Err(Signal::Throw(thrown))
            }

            Stmt::Expr { expr } => self.eval(expr, env),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn eval(&mut self, expr: &Expr, env: &Rc<Environment>) -> Result<Value, Signal> {
        match expr {
            Expr::Literal { value } => Ok(match value {
                Literal::Number(n) => Value::Number(*n),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Null => Value::Null,
            }),

            Expr::Ident { name, span } => env
                .get(name)
                .ok_or_else(|| self.throw_at(EnvError::Undefined(name.clone()).to_string(), *span)),

            // `this` is an ordinary frame binding, defined only by method
            // and constructor invocations.
            Expr::This { span } => env
                .get("this")
                .ok_or_else(|| {
                    self.throw_at(EnvError::Undefined("this".to_string()).to_string(), *span)
                }),

            Expr::Array { elements } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element, env)?);
                }
                Ok(Value::array(values))
            }

            Expr::Object { props } => {
                let mut slots = IndexMap::with_capacity(props.len());
                for (key, value) in props {
                    let value = self.eval(value, env)?;
                    slots.insert(key.clone(), value);
                }
                Ok(Value::record(slots))
            }

            Expr::Function { decl } => Ok(Value::Function(Rc::new(Function {
                decl: decl.clone(),
                env: env.clone(),
                this: None,
            }))),

            Expr::Assign {
                target,
                value,
                span,
            } => self.eval_assign(target, value, *span, env),

            Expr::Logical { op, left, right } => {
                let left = self.eval(left, env)?;
                match op {
                    LogicalOp::Or if left.is_truthy() => Ok(left),
                    LogicalOp::And if !left.is_truthy() => Ok(left),
                    _ => self.eval(right, env),
                }
            }

            Expr::Binary {
                op,
                left,
                right,
                span,
            } => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                self.apply_binary(*op, left, right, *span)
            }

            Expr::Unary { op, operand, span } => {
                let operand = self.eval(operand, env)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
                    UnaryOp::Neg => match operand {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(self.throw_at(
                            format!("unary '-' requires a number, got {}", other.type_name()),
                            *span,
                        )),
                    },
                }
            }

            Expr::Property { object, name, span } => {
                let object = self.eval(object, env)?;
                self.property_get(&object, name, *span)
            }

            Expr::Index {
                object,
                index,
                span,
            } => {
                let object = self.eval(object, env)?;
                let index = self.eval(index, env)?;
                self.index_get(&object, &index, *span)
            }

            Expr::Call { callee, args, span } => {
                // A property callee binds `this` to the receiver, evaluated
                // exactly once.
                if let Expr::Property {
                    object,
                    name,
                    span: prop_span,
                } = callee.as_ref()
                {
                    let receiver = self.eval(object, env)?;
                    let method = self.property_get(&receiver, name, *prop_span)?;
                    let args = self.eval_args(args, env)?;
                    return self.call_value(method, args, Some(receiver), *span);
                }
                let callee = self.eval(callee, env)?;
                let args = self.eval_args(args, env)?;
                self.call_value(callee, args, None, *span)
            }

            Expr::New { callee, args, span } => {
                let class = self.eval(callee, env)?;
                let args = self.eval_args(args, env)?;
                match class {
                    Value::Class(class) => self.instantiate(&class, args, *span),
                    other => Err(self.throw_at(
                        format!("'new' requires a class, got {}", other.type_name()),
                        *span,
                    )),
                }
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr], env: &Rc<Environment>) -> Result<Vec<Value>, Signal> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, env)?);
        }
        Ok(values)
    }

    fn eval_assign(
        &mut self,
        target: &Expr,
        value: &Expr,
        span: Span,
        env: &Rc<Environment>,
    ) -> Result<Value, Signal> {
        match target {
            Expr::Ident { name, .. } => {
                let value = self.eval(value, env)?;
                env.assign(name, value.clone())
                    .map_err(|e| self.throw_at(e.to_string(), span))?;
                Ok(value)
            }

            Expr::Property { object, name, .. } => {
                let object = self.eval(object, env)?;
                let value = self.eval(value, env)?;
                match object {
                    Value::Record(slots) => {
                        slots.borrow_mut().insert(name.clone(), value.clone());
                        Ok(value)
                    }
                    other => Err(self.throw_at(
                        format!("cannot set property '{}' on {}", name, other.type_name()),
                        span,
                    )),
                }
            }

            Expr::Index { object, index, .. } => {
                let object = self.eval(object, env)?;
                let index = self.eval(index, env)?;
                let value = self.eval(value, env)?;
                self.index_set(&object, &index, value, span)
            }

            // The parser only produces the three shapes above.
            _ => Err(self.throw_at("invalid assignment target", span)),
        }
    }

    // ------------------------------------------------------------------
    // Operators
    // ------------------------------------------------------------------

    fn apply_binary(
        &mut self,
        op: BinaryOp,
        left: Value,
        right: Value,
        span: Span,
    ) -> Result<Value, Signal> {
        use BinaryOp::*;
        match op {
            Eq => return Ok(Value::Bool(left == right)),
            NotEq => return Ok(Value::Bool(left != right)),
            Add => {
                return match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                    // If either side is a string the other is coerced
                    // through its display form.
                    (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!(
                        "{}{}",
                        left.display_string(),
                        right.display_string()
                    ))),
                    _ => Err(self.binary_type_error(op, &left, &right, span)),
                };
            }
            _ => {}
        }

        if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
            // Lexicographic by Unicode scalar value
            let ordered = match op {
                Lt => a < b,
                LtEq => a <= b,
                Gt => a > b,
                GtEq => a >= b,
                _ => return Err(self.binary_type_error(op, &left, &right, span)),
            };
            return Ok(Value::Bool(ordered));
        }

        let (Value::Number(a), Value::Number(b)) = (&left, &right) else {
            return Err(self.binary_type_error(op, &left, &right, span));
        };
        let (a, b) = (*a, *b);
        Ok(match op {
            Sub => Value::Number(a - b),
            Mul => Value::Number(a * b),
            // Division by zero follows IEEE-754: ±inf / NaN, no throw
            Div => Value::Number(a / b),
            Rem => Value::Number(a % b),
            Pow => Value::Number(a.powf(b)),
            Lt => Value::Bool(a < b),
            LtEq => Value::Bool(a <= b),
            Gt => Value::Bool(a > b),
            GtEq => Value::Bool(a >= b),
            Add | Eq | NotEq => unreachable!("handled above"),
        })
    }

    fn binary_type_error(&mut self, op: BinaryOp, left: &Value, right: &Value, span: Span) -> Signal {
        self.throw_at(
            format!(
                "unsupported operand types for '{}': {} and {}",
                op.symbol(),
                left.type_name(),
                right.type_name()
            ),
            span,
        )
    }

    // ------------------------------------------------------------------
    // Property and index access
    // ------------------------------------------------------------------

    fn property_get(&mut self, object: &Value, name: &str, span: Span) -> Result<Value, Signal> {
        match object {
            Value::Record(slots) => Ok(slots.borrow().get(name).cloned().unwrap_or(Value::Null)),
            other => Err(self.throw_at(
                format!("cannot read property '{}' of {}", name, other.type_name()),
                span,
            )),
        }
    }

    fn index_get(&mut self, object: &Value, index: &Value, span: Span) -> Result<Value, Signal> {
        match object {
            Value::Array(elements) => match index {
                Value::Number(n) => {
                    // Out-of-bounds and non-integer reads yield null
                    if n.fract() != 0.0 || *n < 0.0 {
                        return Ok(Value::Null);
                    }
                    let elements = elements.borrow();
                    Ok(elements.get(*n as usize).cloned().unwrap_or(Value::Null))
                }
                other => Err(self.throw_at(
                    format!("array index must be a number, got {}", other.type_name()),
                    span,
                )),
            },
            Value::Record(slots) => {
                let key = index.display_string();
                Ok(slots.borrow().get(&key).cloned().unwrap_or(Value::Null))
            }
            other => Err(self.throw_at(format!("{} is not indexable", other.type_name()), span)),
        }
    }

    fn index_set(
        &mut self,
        object: &Value,
        index: &Value,
        value: Value,
        span: Span,
    ) -> Result<Value, Signal> {
        match object {
            Value::Array(elements) => match index {
                Value::Number(n) => {
                    if n.fract() != 0.0 || *n < 0.0 {
                        return Err(self.throw_at(
                            format!("array index must be a non-negative integer, got {}", n),
                            span,
                        ));
                    }
                    let idx = *n as usize;
                    let mut elements = elements.borrow_mut();
                    if idx < elements.len() {
                        elements[idx] = value.clone();
                    } else {
                        // Writing past the end extends, null-filling any gap
                        while elements.len() < idx {
                            elements.push(Value::Null);
                        }
                        elements.push(value.clone());
                    }
                    Ok(value)
                }
                other => Err(self.throw_at(
                    format!("array index must be a number, got {}", other.type_name()),
                    span,
                )),
            },
            Value::Record(slots) => {
                let key = index.display_string();
                slots.borrow_mut().insert(key, value.clone());
                Ok(value)
            }
            other => Err(self.throw_at(format!("{} is not indexable", other.type_name()), span)),
        }
    }

    // ------------------------------------------------------------------
    // Calls and construction
    // ------------------------------------------------------------------

    /// Invokes any callable value. `this_override` is set by property-call
    /// sites; instance-bound closures carry their own receiver.
    pub(crate) fn call_value(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        this_override: Option<Value>,
        span: Span,
    ) -> Result<Value, Signal> {
        if self.frames.len() >= MAX_CALL_DEPTH {
            return Err(self.throw_at("maximum call depth exceeded", span));
        }
        match callee {
            Value::Function(func) => {
                if args.len() != func.decl.params.len() {
                    return Err(self.throw_at(
                        format!(
                            "{}: expected {} argument{}, got {}",
                            func.name(),
                            func.decl.params.len(),
                            if func.decl.params.len() == 1 { "" } else { "s" },
                            args.len()
                        ),
                        span,
                    ));
                }

                let frame = Environment::with_parent(func.env.clone());
                for (param, arg) in func.decl.params.iter().zip(args) {
                    frame.define_unchecked(param, arg);
                }
                if let Some(receiver) = this_override.or_else(|| func.this.clone()) {
                    frame.define_unchecked("this", receiver);
                }

                self.frames
                    .push(format!("{} ({}:{})", func.name(), self.file, span));
                let saved = std::mem::replace(&mut self.file, func.decl.file.clone());
                let mut outcome = Ok(Value::Null);
                for stmt in &func.decl.body {
                    if let Err(signal) = self.exec(stmt, &frame) {
                        outcome = Err(signal);
                        break;
                    }
                }
                self.file = saved;
                self.frames.pop();

                match outcome {
                    Ok(_) => Ok(Value::Null),
                    Err(Signal::Return(value)) => Ok(value),
                    Err(Signal::Break) => Err(self.throw("'break' outside of a loop")),
                    Err(Signal::Continue) => Err(self.throw("'continue' outside of a loop")),
                    Err(throw) => Err(throw),
                }
            }

            Value::Builtin(builtin) => {
                self.frames
                    .push(format!("{} ({}:{})", builtin.name, self.file, span));
                let result = (builtin.func)(self, &args);
                self.frames.pop();
                result
            }

            Value::Class(class) => Err(self.throw_at(
                format!("class '{}' must be invoked with 'new'", class.name),
                span,
            )),

            other => Err(self.throw_at(
                format!("value of type {} is not callable", other.type_name()),
                span,
            )),
        }
    }

    /// Builds an instance record: one closure per method, each bound to the
    /// new instance, then runs the `constructor` slot when present.
    fn instantiate(
        &mut self,
        class: &Rc<ClassDef>,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, Signal> {
        let slots = Rc::new(std::cell::RefCell::new(IndexMap::new()));
        let instance = Value::Record(slots.clone());

        for method in &class.methods {
            let name = method.name.clone().expect("methods are named");
            let bound = Value::Function(Rc::new(Function {
                decl: method.clone(),
                env: class.env.clone(),
                this: Some(instance.clone()),
            }));
            slots.borrow_mut().insert(name, bound);
        }

        let constructor = slots.borrow().get("constructor").cloned();
        if let Some(constructor) = constructor {
            self.call_value(constructor, args, None, span)?;
        }
        Ok(instance)
    }

    // ------------------------------------------------------------------
    // Runtime errors and back-traces
    // ------------------------------------------------------------------

    /// Snapshot of the innermost call frames, most recent first. Taken when
    /// a throw is created, while the frames are still on the stack.
    fn capture_trace(&mut self) {
        self.last_trace = self
            .frames
            .iter()
            .rev()
            .take(TRACE_LIMIT)
            .cloned()
            .collect();
    }

    pub(crate) fn throw(&mut self, message: impl Into<String>) -> Signal {
        self.capture_trace();
        Signal::error(message)
    }

    pub(crate) fn throw_at(&mut self, message: impl Into<String>, span: Span) -> Signal {
        self.capture_trace();
        Signal::error_at(message, span)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
