use std::process;

pub fn print_usage() -> ! {
    println!("Usage: ish [-hvp]");
    println!("   -h   Print this help message");
    println!("   -v   Enable verbose mode");
    println!("   -p   Do not print a command prompt");
    process::exit(1);
}

/// Unrecoverable environment failure (fork or pipe creation): report and
/// take the whole interpreter down.
pub fn fatal(msg: &str) -> ! {
    eprintln!("ish: {}", msg);
    process::exit(1);
}
