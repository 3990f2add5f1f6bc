// ABOUTME: Module loader: path resolution, per-interpreter cache, host modules

use crate::env::Environment;
use crate::error::Signal;
use crate::interp::Interpreter;
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::token::Span;
use crate::value::Value;
use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;

impl Interpreter {
    /// Resolves a module specifier. `./`, `../`, and `/` prefixes name an
    /// aurora source file; anything else goes to the host-module registry.
    pub fn load_module(&mut self, spec: &str, span: Option<Span>) -> Result<Value, Signal> {
        if spec.starts_with("./") || spec.starts_with("../") || spec.starts_with('/') {
            self.load_source_module(spec, span)
        } else {
            self.load_host_module(spec, span)
        }
    }

    /// Registers an opaque host module; `require("<name>")` and
    /// `host_require("<name>")` resolve to it. Intended for embedding hosts.
    pub fn register_host_module(&mut self, name: impl Into<String>, value: Value) {
        self.host_modules.insert(name.into(), value);
    }

    pub(crate) fn load_host_module(
        &mut self,
        name: &str,
        span: Option<Span>,
    ) -> Result<Value, Signal> {
        match self.host_modules.get(name) {
            Some(value) => Ok(value.clone()),
            None => Err(self.raise(format!("unknown host module '{}'", name), span)),
        }
    }

    fn load_source_module(&mut self, spec: &str, span: Option<Span>) -> Result<Value, Signal> {
        let absolute = self.resolve_path(spec, span)?;
        if let Some(cached) = self.modules.get(&absolute) {
            return Ok(cached.clone());
        }

        let source = fs::read_to_string(&absolute)
            .map_err(|e| self.raise(format!("cannot read module '{}': {}", spec, e), span))?;
        let file = absolute.display().to_string();
        let program = tokenize(&source, &file)
            .and_then(parse)
            .map_err(|e| self.raise(e.to_string(), span))?;

        // Fresh scope under the root environment, with the exports record
        // and a module record sharing the same exports slot.
        let module_env = Environment::with_parent(self.globals().clone());
        let exports = Value::record(IndexMap::new());
        let mut module_slots = IndexMap::new();
        module_slots.insert("exports".to_string(), exports.clone());
        let module_record = Value::record(module_slots);
        module_env.define_unchecked("exports", exports.clone());
        module_env.define_unchecked("module", module_record.clone());

        // Seed the cache before evaluating so a cyclic require observes the
        // exports populated so far instead of recursing forever.
        self.modules.insert(absolute.clone(), exports);

        if let Err(signal) = self.exec_program_body(&program, module_env) {
            self.modules.remove(&absolute);
            return Err(signal);
        }

        // Whatever `module.exports` holds at the end wins, so wholesale
        // reassignment propagates to the cache.
        let Value::Record(slots) = &module_record else {
            unreachable!("module record is a record");
        };
        let finished = slots
            .borrow()
            .get("exports")
            .cloned()
            .unwrap_or(Value::Null);
        self.modules.insert(absolute, finished.clone());
        Ok(finished)
    }

    /// Specifiers resolve against the process working directory and are
    /// canonicalised so the cache sees one key per file.
    fn resolve_path(&mut self, spec: &str, span: Option<Span>) -> Result<PathBuf, Signal> {
        let joined = match std::env::current_dir() {
            Ok(cwd) => cwd.join(spec),
            Err(e) => {
                return Err(self.raise(format!("cannot resolve module '{}': {}", spec, e), span));
            }
        };
        fs::canonicalize(&joined)
            .map_err(|e| self.raise(format!("cannot resolve module '{}': {}", spec, e), span))
    }

    fn raise(&mut self, message: String, span: Option<Span>) -> Signal {
        match span {
            Some(span) => self.throw_at(message, span),
            None => self.throw(message),
        }
    }
}
