use crate::builtins::handle_builtin;
use crate::errors::ShellError;
use crate::exec;
use crate::jobs::JobTable;
use crate::parser::{self, MAX_LINE};
use crate::rc;
use nix::unistd;
use once_cell::sync::OnceCell;
use std::io::{self, Write};

/// Process-wide prompt string, set once at startup and read-only afterwards
/// so the signal-presentation thread can use it without locking.
static PROMPT: OnceCell<String> = OnceCell::new();

/// Builds the `hostname% ` prompt. Called once, before the signal handlers
/// are installed.
pub fn init_prompt() {
    let host = unistd::gethostname()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| String::from("ish"));
    let _ = PROMPT.set(format!("{}% ", host));
}

pub fn prompt() -> &'static str {
    PROMPT.get().map(String::as_str).unwrap_or("ish% ")
}

/// Runs the main shell loop: prints the prompt (if enabled), reads input,
/// and dispatches it. After every line the job table is swept for children
/// that finished while the line was being processed.
///
/// - `emit_prompt`: if true, prints the command prompt.
/// - `verbose`: if true, echoes each command before dispatch.
pub fn run_shell(emit_prompt: bool, verbose: bool) {
    let mut jobs = JobTable::new();
    rc::load_startup_file(&mut jobs);

    loop {
        if emit_prompt {
            print!("{}", prompt());
            let _ = io::stdout().flush();
        }

        let mut cmdline = String::new();
        match io::stdin().read_line(&mut cmdline) {
            Ok(0) => break, // End-of-file (Ctrl-D)
            Ok(_) => {
                dispatch_line(&cmdline, &mut jobs, verbose);
                jobs.sweep_finished();
            }
            Err(e) => {
                eprintln!("ish: error reading input: {}", e);
                break;
            }
        }
    }
}

/// Dispatches one raw input line: built-ins run in-process on the whole
/// line; everything else is split into `;` segments executed strictly left
/// to right.
fn dispatch_line(cmdline: &str, jobs: &mut JobTable, verbose: bool) {
    if cmdline.len() > MAX_LINE {
        eprintln!("ish: {}", ShellError::LineTooLong(MAX_LINE));
        return;
    }
    let line = cmdline.trim();
    if line.is_empty() {
        return;
    }
    if verbose {
        println!("Received command: {}", line);
    }
    if handle_builtin(line, jobs) {
        return;
    }
    for segment in parser::split_segments(line) {
        if let Err(e) = exec::run_segment(segment, jobs) {
            eprintln!("ish: {}", e);
        }
    }
}
