use crate::shell;
use signal_hook::consts::signal::{SIGCONT, SIGINT, SIGTSTP};
use signal_hook::iterator::Signals;
use std::io::{self, Write};
use std::thread;

/// Installs the interactive signal handlers. On SIGINT (Ctrl-C), SIGTSTP
/// (Ctrl-Z), or SIGCONT the shell redraws its prompt and nothing else: the
/// handler thread touches no job state, so it is safe at any point in the
/// read/dispatch cycle, including while a foreground child is being waited.
pub fn install_signal_handlers() {
    let mut signals =
        Signals::new(&[SIGINT, SIGTSTP, SIGCONT]).expect("unable to register signal handlers");
    thread::spawn(move || {
        for _ in signals.forever() {
            let mut stdout = io::stdout();
            let _ = write!(stdout, "\n{}", shell::prompt());
            let _ = stdout.flush();
        }
    });
}
