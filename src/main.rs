mod builtins;
mod errors;
mod exec;
mod jobs;
mod parser;
mod rc;
mod shell;
mod signals;
mod utils;

use std::env;

fn main() {
    // Parse command-line arguments.
    let args: Vec<String> = env::args().collect();
    let mut emit_prompt = true;
    let mut verbose = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "-h" => utils::print_usage(),
            "-v" => verbose = true,
            "-p" => emit_prompt = false,
            _ => {}
        }
    }

    // The prompt must exist before the signal thread can redraw it.
    shell::init_prompt();
    signals::install_signal_handlers();

    shell::run_shell(emit_prompt, verbose);
}
