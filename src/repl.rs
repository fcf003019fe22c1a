//! # Interactive REPL
//!
//! `spec.md` §6: "Zero args → start an interactive REPL: prompt `> `, read
//! one line, interpret it, loop until EOF." One long-lived [`Vm`] and
//! [`Chunk`] are shared across lines so that globals (and the constant pool)
//! persist for the whole session; each line is just another call to
//! [`crate::interpret`].

use std::io::{self, BufRead, Write};

use crate::chunk::Chunk;
use crate::interpret;
use crate::vm::Vm;

/// Run the REPL to completion (until stdin hits EOF).
pub fn run() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut chunk = Chunk::new();
    let mut vm = Vm::new(&mut stdout);

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        if line.trim().is_empty() {
            continue;
        }

        let mut diagnostics = io::stderr();
        // A bad line reports to stderr and the loop keeps going; only a
        // non-interactive run (`main.rs`) cares about the exit code.
        let _ = interpret(&line, &mut chunk, &mut vm, &mut diagnostics);
    }
}
