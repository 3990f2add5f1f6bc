use aurora_lang::error::{thrown_summary, AuroraError};
use aurora_lang::interp::Interpreter;
use aurora_lang::{config, repl};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

// sysexits-style codes, so callers can tell the failing phase apart
const EXIT_SYNTAX: u8 = 65;
const EXIT_NOINPUT: u8 = 66;
const EXIT_RUNTIME: u8 = 70;

/// AuroraLang interpreter
#[derive(Parser, Debug)]
#[command(name = "aurora")]
#[command(version = config::VERSION)]
#[command(about = "A small dynamically-typed scripting language")]
#[command(long_about = "Evaluates an aurora source file, a one-liner, or starts the REPL")]
struct CliArgs {
    /// Script file to execute (starts the REPL when omitted)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Evaluate a code string and exit
    #[arg(short = 'e', long = "eval", value_name = "CODE", conflicts_with = "script")]
    eval: Option<String>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let mut interp = Interpreter::new();

    if let Some(code) = args.eval {
        return run_source(&mut interp, &code, "<eval>");
    }

    if let Some(path) = args.script {
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("cannot read {}: {}", path.display(), e);
                return ExitCode::from(EXIT_NOINPUT);
            }
        };
        return run_source(&mut interp, &source, &path.display().to_string());
    }

    match repl::run(&mut interp) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_source(interp: &mut Interpreter, source: &str, file: &str) -> ExitCode {
    match interp.run(source, file) {
        Ok(_) => ExitCode::SUCCESS,
        Err(AuroraError::Syntax(e)) => {
            eprintln!("{}", e);
            ExitCode::from(EXIT_SYNTAX)
        }
        Err(AuroraError::Uncaught { value, trace }) => {
            eprintln!("uncaught error: {}", thrown_summary(&value));
            for frame in &trace {
                eprintln!("  at {}", frame);
            }
            ExitCode::from(EXIT_RUNTIME)
        }
    }
}
