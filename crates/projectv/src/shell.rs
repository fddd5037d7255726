//! Interactive session
//!
//! Keeps the loaded project and golden selection between commands. Errors
//! are printed and the loop continues.

use crate::cli;
use crate::commands::{self, Flow, Mode};
use anyhow::Result;
use projectv_core::process::ProcessRunner;
use projectv_core::session::Session;
use std::io::{self, Write};

const PROMPT: &str = "projectv> ";

pub(crate) fn run<R: ProcessRunner>(session: &mut Session<R>) -> Result<()> {
    println!("projectV {} - type `help` for commands, `quit` to leave.", projectv_core::VERSION);
    let mut line = String::new();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }
        if execute_line(session, &line) == Flow::Quit {
            return Ok(());
        }
    }
}

fn execute_line<R: ProcessRunner>(session: &mut Session<R>, line: &str) -> Flow {
    let words = match shell_words::split(line) {
        Ok(words) if words.is_empty() => return Flow::Continue,
        Ok(words) => words,
        Err(e) => {
            eprintln!("Error: {e}");
            return Flow::Continue;
        }
    };

    let matches = match cli::shell().try_get_matches_from(words) {
        Ok(matches) => matches,
        Err(e) => {
            // Help output and usage errors render themselves
            let _ = e.print();
            return Flow::Continue;
        }
    };

    match commands::dispatch(session, &matches, Mode::Shell) {
        Ok(flow) => flow,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {e}");
            Flow::Continue
        }
    }
}
