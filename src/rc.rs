use crate::builtins;
use crate::exec;
use crate::jobs::JobTable;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

const RC_NAME: &str = ".ishrc";

/// Reads the startup file at launch, if one exists. Only two line shapes
/// are honored: an exact `ls`, executed immediately in the foreground, and
/// `setenv name value`. Everything else is ignored.
pub fn load_startup_file(jobs: &mut JobTable) {
    let path = match find_startup_file() {
        Some(path) => path,
        None => return,
    };
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("ish: {}: {}", path.display(), e);
            return;
        }
    };
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let line = line.trim();
        if line == "ls" {
            if let Err(e) = exec::run_segment(line, jobs) {
                eprintln!("ish: {}", e);
            }
        } else if line.starts_with("setenv ") {
            // Shares the interactive handler, including its malformed-line
            // reporting.
            builtins::handle_builtin(line, jobs);
        }
    }
}

/// The per-directory file wins; the home directory is the fallback.
fn find_startup_file() -> Option<PathBuf> {
    let local = PathBuf::from(RC_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs_next::home_dir()
        .map(|home| home.join(RC_NAME))
        .filter(|path| path.exists())
}
