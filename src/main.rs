//! Kozi binary entry point.
//!
//! Behavior summary (`spec.md` §6):
//! - No args → start the interactive REPL.
//! - One path argument → run it as a source file.
//! - `-h`/`--help` → print help text and exit 0.
//! - `-v`/`--version` → print the version and exit 0.
//! - Two or more arguments → usage error, exit 64.
//!
//! Exit codes otherwise come straight from [`kozi::error::InterpretResult::exit_code`],
//! with one ambient addition: a source file that can't be read or isn't
//! valid UTF-8 exits via [`kozi::cli::SourceError::exit_code`] instead.

use std::env;
use std::io;
use std::process::ExitCode;

use kozi::chunk::Chunk;
use kozi::cli::{self, Command};
use kozi::vm::Vm;

fn main() -> ExitCode {
    let args = env::args().skip(1);

    match cli::parse_args(args) {
        Command::Repl => {
            kozi::repl::run();
            ExitCode::SUCCESS
        }
        Command::Help => {
            println!("{}", cli::help_text());
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("kozi {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Command::Usage => {
            eprintln!("{}", cli::USAGE);
            ExitCode::from(64)
        }
        Command::RunFile(path) => run_file(&path),
    }
}

fn run_file(path: &str) -> ExitCode {
    let source = match cli::read_source(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(err.exit_code() as u8);
        }
    };

    let mut chunk = Chunk::new();
    let mut stdout = io::stdout();
    let mut vm = Vm::new(&mut stdout);
    let mut stderr = io::stderr();

    let result = kozi::interpret(&source, &mut chunk, &mut vm, &mut stderr);
    ExitCode::from(result.exit_code() as u8)
}
