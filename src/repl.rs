// ABOUTME: Interactive REPL with persisted history and multi-line buffering

use crate::config::{self, CONTINUE_PROMPT, HELP_TEXT, PROMPT};
use crate::error::{thrown_summary, AuroraError};
use crate::interp::Interpreter;
use crate::value::Value;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

/// Runs the interactive loop until `.exit` or end of input. Input history
/// persists to the user's home directory across sessions.
pub fn run(interp: &mut Interpreter) -> rustyline::Result<()> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = DefaultEditor::with_config(config)?;

    let history_file = config::history_path();
    let _ = rl.load_history(&history_file);

    println!("{} v{}", config::WELCOME_MESSAGE, config::VERSION);
    println!("{}", config::WELCOME_FOOTER);

    // Lines that do not yet parse to a complete program accumulate here
    // until they do, or until a `;;` line forces evaluation.
    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { PROMPT } else { CONTINUE_PROMPT };
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if buffer.is_empty() {
                    match trimmed {
                        "" => continue,
                        ".exit" => break,
                        ".help" => {
                            println!("{}", HELP_TEXT);
                            continue;
                        }
                        _ if trimmed == ".load" || trimmed.starts_with(".load ") => {
                            load_file(interp, trimmed[".load".len()..].trim());
                            continue;
                        }
                        ";;" => continue,
                        _ => {}
                    }
                } else if trimmed == ";;" {
                    let source = std::mem::take(&mut buffer);
                    eval_and_report(interp, &source);
                    continue;
                }

                buffer.push_str(&line);
                buffer.push('\n');

                // Evaluate as soon as the buffer parses; keep buffering
                // while the input is merely incomplete.
                match interp.run(&buffer, "<repl>") {
                    Err(AuroraError::Syntax(e)) if e.incomplete => {}
                    outcome => {
                        buffer.clear();
                        report(outcome);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                buffer.clear();
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => {
                eprintln!("error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_file);
    Ok(())
}

/// `.load <path>`: evaluates a file in the active interpreter, so its
/// definitions stay available at the prompt.
fn load_file(interp: &mut Interpreter, path: &str) {
    if path.is_empty() {
        eprintln!("usage: .load <path>");
        return;
    }
    match std::fs::read_to_string(path) {
        Ok(source) => report(interp.run(&source, path)),
        Err(e) => eprintln!("cannot load {}: {}", path, e),
    }
}

fn eval_and_report(interp: &mut Interpreter, source: &str) {
    report(interp.run(source, "<repl>"));
}

fn report(outcome: Result<Value, AuroraError>) {
    match outcome {
        Ok(Value::Null) => {}
        Ok(value) => println!("=> {}", value),
        Err(AuroraError::Syntax(e)) => eprintln!("{}", e),
        Err(AuroraError::Uncaught { value, trace }) => {
            eprintln!("uncaught error: {}", thrown_summary(&value));
            for frame in &trace {
                eprintln!("  at {}", frame);
            }
        }
    }
}
